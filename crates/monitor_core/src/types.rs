//! Definição de tipos/structs de telemetria.
//!
//! Espelha os grupos aninhados do payload enviado pelo host
//! (`cpu`, `memory`, `disk`, `network`, `gpu`, `temperatures`).
//! Todo campo ausente no payload fica com o default zero/vazio –
//! nunca existe campo não inicializado.

use serde::{Deserialize, Serialize};

/// Capacidade máxima do nome da CPU (bytes). Valores maiores são truncados.
pub const CPU_NAME_MAX: usize = 64;

/// Capacidade máxima do nome do disco (bytes). Valores maiores são truncados.
pub const DISK_NAME_MAX: usize = 32;

// ──────────────────────────────────────────────
// CPU
// ──────────────────────────────────────────────

/// Dados de CPU recebidos do host.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CpuData {
    /// Uso total da CPU (0–100%)
    pub usage: f32,
    /// Temperatura do pacote/die (°C)
    pub temp: f32,
    /// Nome do processador (truncado em [`CPU_NAME_MAX`] bytes)
    pub name: String,
}

// ──────────────────────────────────────────────
// Memória
// ──────────────────────────────────────────────

/// Dados de memória RAM.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MemoryData {
    /// Memória usada (GB)
    pub used: f32,
    /// Memória total (GB)
    pub total: f32,
    /// Percentual de uso (0–100%)
    pub percent: f32,
}

// ──────────────────────────────────────────────
// Disco
// ──────────────────────────────────────────────

/// Dados do disco principal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiskData {
    /// Espaço usado (GB)
    pub used: f32,
    /// Espaço total (GB)
    pub total: f32,
    /// Percentual de uso (0–100%)
    pub percent: f32,
}

// ──────────────────────────────────────────────
// Rede
// ──────────────────────────────────────────────

/// Taxas de rede.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkData {
    /// Upload (KB/s)
    pub upload: f32,
    /// Download (KB/s)
    pub download: f32,
}

// ──────────────────────────────────────────────
// GPU (opcional)
// ──────────────────────────────────────────────

/// Dados de GPU. Grupo opcional no payload – zerado quando ausente.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GpuData {
    /// Carga do GPU core (0–100%)
    pub usage: f32,
    /// Temperatura do core (°C)
    pub temp: f32,
}

impl GpuData {
    /// GPU presente no payload? (host sem GPU dedicada envia zeros)
    pub fn is_present(&self) -> bool {
        self.usage > 0.0 || self.temp > 0.0
    }
}

// ──────────────────────────────────────────────
// Sensores extras (opcional)
// ──────────────────────────────────────────────

/// Temperaturas adicionais (placa-mãe + primeiro disco reportado).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SensorData {
    /// Temperatura da placa-mãe (°C)
    pub motherboard_temp: f32,
    /// Temperatura do primeiro disco (°C)
    pub disk_temp: f32,
    /// Nome do primeiro disco (truncado em [`DISK_NAME_MAX`] bytes)
    pub disk_name: String,
}

impl SensorData {
    pub fn is_present(&self) -> bool {
        self.motherboard_temp > 0.0 || self.disk_temp > 0.0
    }
}

// ──────────────────────────────────────────────
// Amostra completa
// ──────────────────────────────────────────────

/// Uma amostra completa de telemetria decodificada.
///
/// Instâncias são transientes: decodificadas, consumidas por
/// histórico/alertas/render no mesmo tick e descartadas – exceto a
/// última amostra válida, retida para redesenho parcial.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SystemSample {
    pub cpu: CpuData,
    pub memory: MemoryData,
    pub disk: DiskData,
    pub network: NetworkData,
    pub gpu: GpuData,
    pub sensors: SensorData,
    /// Instante de captura (ms desde o boot do monitor)
    pub timestamp_ms: u64,
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sample_is_zeroed() {
        let s = SystemSample::default();
        assert_eq!(s.cpu.usage, 0.0);
        assert_eq!(s.cpu.temp, 0.0);
        assert!(s.cpu.name.is_empty());
        assert_eq!(s.memory.percent, 0.0);
        assert_eq!(s.disk.percent, 0.0);
        assert_eq!(s.network.upload, 0.0);
        assert_eq!(s.timestamp_ms, 0);
    }

    #[test]
    fn gpu_presence() {
        assert!(!GpuData::default().is_present());
        assert!(
            GpuData {
                usage: 12.0,
                temp: 0.0
            }
            .is_present()
        );
        assert!(
            GpuData {
                usage: 0.0,
                temp: 45.0
            }
            .is_present()
        );
    }

    #[test]
    fn sensor_presence() {
        assert!(!SensorData::default().is_present());
        let s = SensorData {
            motherboard_temp: 38.0,
            ..Default::default()
        };
        assert!(s.is_present());
    }
}
