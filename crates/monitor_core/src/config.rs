//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável. Todas as seções usam
//! `serde(default)`: um arquivo parcial é mesclado sobre os defaults e
//! um arquivo ilegível nunca derruba o monitor – só gera warning.

use crate::theme::DisplayTheme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

/// Variante de transporte. Selecionada uma única vez no startup;
/// trocar exige restart – não há failover a quente.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Link de datagrama na rede local (UDP)
    #[default]
    Wifi,
    /// Link de periférico de curto alcance (BLE)
    Ble,
}

/// Configuração do transporte.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Variante ativa: "wifi" ou "ble"
    pub kind: TransportKind,
    /// SSID da rede (vazio = wifi não configurado, begin falha)
    pub wifi_ssid: String,
    /// Senha da rede
    pub wifi_password: String,
    /// Porta UDP de escuta
    pub port: u16,
    /// Nome anunciado pelo periférico BLE
    pub ble_name: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::Wifi,
            wifi_ssid: String::new(),
            wifi_password: String::new(),
            port: 8080,
            ble_name: "RustMonitor".into(),
        }
    }
}

/// Configuração do display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Tema: "default", "minimal", "graph", "compact"
    pub theme: DisplayTheme,
    /// Silêncio de dados antes de voltar à tela idle (segundos)
    pub idle_timeout_secs: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: DisplayTheme::Default,
            idle_timeout_secs: 10.0,
        }
    }
}

/// Thresholds de alerta.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Temperatura de CPU a partir da qual alerta (°C)
    pub cpu_temp_high: f32,
    /// Percentual de memória abaixo do qual alerta (%)
    pub memory_low: f32,
    /// Percentual de disco abaixo do qual alerta (%)
    pub disk_low: f32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            cpu_temp_high: 80.0,
            memory_low: 20.0,
            disk_low: 10.0,
        }
    }
}

/// Configuração raiz do monitor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub transport: TransportConfig,
    pub display: DisplayConfig,
    pub alerts: AlertThresholds,
}

impl MonitorConfig {
    /// Carrega configuração de um arquivo TOML. Nunca falha: qualquer
    /// erro de leitura/parse cai nos defaults.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<MonitorConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        MonitorConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.transport.port == 0 {
            errors.push("Porta do transporte não pode ser 0".into());
        }
        if self.transport.kind == TransportKind::Ble && self.transport.ble_name.is_empty() {
            errors.push("Nome BLE não pode ser vazio".into());
        }
        if self.display.idle_timeout_secs < 1.0 {
            errors.push(format!(
                "Idle timeout inválido: {} (mínimo 1s)",
                self.display.idle_timeout_secs
            ));
        }
        if self.alerts.cpu_temp_high <= 0.0 {
            errors.push("Threshold de temperatura de CPU deve ser positivo".into());
        }

        errors
    }
}

// ──────────────────────────────────────────────
// ConfigWatcher – recarga a quente
// ──────────────────────────────────────────────

/// Observa o `config.toml` em disco e recarrega quando ele muda.
///
/// O loop principal chama [`poll`](ConfigWatcher::poll) a cada tick:
/// a checagem é um único stat, e o arquivo só é relido quando mtime ou
/// tamanho mudam. Editar o arquivo troca tema, thresholds e timeout a
/// quente; a seção de transporte continua exigindo restart.
pub struct ConfigWatcher {
    path: PathBuf,
    last_seen: Option<(SystemTime, u64)>,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_seen = stamp(&path);
        Self { path, last_seen }
    }

    /// Configuração fresca se o arquivo mudou desde a última checagem.
    pub fn poll(&mut self) -> Option<MonitorConfig> {
        let current = stamp(&self.path)?;
        if Some(current) == self.last_seen {
            return None;
        }
        self.last_seen = Some(current);
        Some(MonitorConfig::load(&self.path))
    }
}

/// (mtime, tamanho) do arquivo, se existir.
fn stamp(path: &Path) -> Option<(SystemTime, u64)> {
    let meta = std::fs::metadata(path).ok()?;
    Some((meta.modified().ok()?, meta.len()))
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MonitorConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn default_thresholds_match_reference() {
        let th = AlertThresholds::default();
        assert_eq!(th.cpu_temp_high, 80.0);
        assert_eq!(th.memory_low, 20.0);
        assert_eq!(th.disk_low, 10.0);
    }

    #[test]
    fn roundtrip_toml() {
        let config = MonitorConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: MonitorConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.transport.port, parsed.transport.port);
        assert_eq!(config.display.theme, parsed.display.theme);
        assert_eq!(config.transport.kind, parsed.transport.kind);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"
[transport]
kind = "ble"
port = 9999
"#;
        let config: MonitorConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.transport.kind, TransportKind::Ble);
        assert_eq!(config.transport.port, 9999);
        // Outros campos devem ter valor padrão
        assert_eq!(config.transport.ble_name, "RustMonitor");
        assert_eq!(config.display.idle_timeout_secs, 10.0);
        assert_eq!(config.alerts.cpu_temp_high, 80.0);
    }

    #[test]
    fn theme_parses_from_toml() {
        let partial = r#"
[display]
theme = "compact"
"#;
        let config: MonitorConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.display.theme, DisplayTheme::Compact);
    }

    #[test]
    fn zero_port_is_invalid() {
        let mut config = MonitorConfig::default();
        config.transport.port = 0;
        assert!(!config.validate().is_empty());
    }

    #[test]
    fn watcher_reloads_on_file_change() {
        let path =
            std::env::temp_dir().join(format!("monitor_watch_{}.toml", std::process::id()));
        std::fs::write(&path, "[display]\ntheme = \"default\"\n").unwrap();

        let mut watcher = ConfigWatcher::new(path.clone());
        // Arquivo intocado: nada a recarregar
        assert!(watcher.poll().is_none());

        std::thread::sleep(std::time::Duration::from_millis(50));
        std::fs::write(&path, "[display]\ntheme = \"graph\"\n").unwrap();
        let fresh = watcher.poll().expect("arquivo mudou");
        assert_eq!(fresh.display.theme, DisplayTheme::Graph);

        // Recarga consumida: próximo poll volta a ser silencioso
        assert!(watcher.poll().is_none());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn watcher_is_quiet_while_file_is_missing() {
        let path = std::env::temp_dir().join(format!(
            "monitor_watch_missing_{}.toml",
            std::process::id()
        ));
        let mut watcher = ConfigWatcher::new(path.clone());
        assert!(watcher.poll().is_none());

        // Arquivo aparece depois: primeira mudança detectada
        std::fs::write(&path, "[transport]\nport = 9000\n").unwrap();
        let fresh = watcher.poll().expect("arquivo criado");
        assert_eq!(fresh.transport.port, 9000);
        std::fs::remove_file(&path).ok();
    }
}
