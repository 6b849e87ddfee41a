//! Histórico rolante de métricas para os gráficos.
//!
//! Ring buffer de capacidade fixa: escrita O(1) com índice que avança
//! módulo N, sobrescrevendo sempre o valor mais antigo. Overflow é
//! estruturalmente impossível.

use crate::types::SystemSample;

/// Capacidade de cada série (amostras retidas por métrica).
pub const HISTORY_SIZE: usize = 60;

/// Série rolante de uma métrica numérica.
#[derive(Debug, Clone)]
pub struct MetricHistory {
    values: [f32; HISTORY_SIZE],
    /// Próxima posição de escrita (avança módulo [`HISTORY_SIZE`])
    index: usize,
}

impl Default for MetricHistory {
    fn default() -> Self {
        Self {
            values: [0.0; HISTORY_SIZE],
            index: 0,
        }
    }
}

impl MetricHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acrescenta um valor, sobrescrevendo o mais antigo quando cheio.
    pub fn push(&mut self, value: f32) {
        self.values[self.index] = value;
        self.index = (self.index + 1) % HISTORY_SIZE;
    }

    /// Retorna a série completa em ordem cronológica (mais antigo →
    /// mais recente), independente da posição física do wrap.
    pub fn snapshot(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(HISTORY_SIZE);
        out.extend_from_slice(&self.values[self.index..]);
        out.extend_from_slice(&self.values[..self.index]);
        out
    }

    /// Último valor escrito.
    pub fn latest(&self) -> f32 {
        let last = (self.index + HISTORY_SIZE - 1) % HISTORY_SIZE;
        self.values[last]
    }
}

/// As três séries rastreadas para gráficos: CPU%, memória%, disco%.
#[derive(Debug, Clone, Default)]
pub struct HistoryBank {
    pub cpu: MetricHistory,
    pub memory: MetricHistory,
    pub disk: MetricHistory,
}

impl HistoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra uma amostra em todas as séries.
    pub fn record(&mut self, sample: &SystemSample) {
        self.cpu.push(sample.cpu.usage);
        self.memory.push(sample.memory.percent);
        self.disk.push(sample.disk.percent);
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_starts_zeroed() {
        let h = MetricHistory::new();
        assert_eq!(h.snapshot(), vec![0.0; HISTORY_SIZE]);
    }

    #[test]
    fn snapshot_is_chronological_after_wrap() {
        let mut h = MetricHistory::new();
        // N+1 escritas: o primeiro valor (1.0) deve sumir
        for i in 0..=HISTORY_SIZE {
            h.push((i + 1) as f32);
        }
        let snap = h.snapshot();
        assert_eq!(snap.len(), HISTORY_SIZE);
        // Os N valores mais recentes, do mais antigo ao mais novo
        assert_eq!(snap[0], 2.0);
        assert_eq!(snap[HISTORY_SIZE - 1], (HISTORY_SIZE + 1) as f32);
        // O valor original mais antigo foi sobrescrito
        assert!(!snap.contains(&1.0));
        // Ordem estritamente crescente nesse caso
        for w in snap.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn latest_tracks_last_push() {
        let mut h = MetricHistory::new();
        h.push(10.0);
        assert_eq!(h.latest(), 10.0);
        h.push(20.0);
        assert_eq!(h.latest(), 20.0);
        for _ in 0..HISTORY_SIZE {
            h.push(5.0);
        }
        assert_eq!(h.latest(), 5.0);
    }

    #[test]
    fn bank_records_the_three_metrics() {
        let mut bank = HistoryBank::new();
        let mut sample = SystemSample::default();
        sample.cpu.usage = 33.0;
        sample.memory.percent = 44.0;
        sample.disk.percent = 55.0;
        bank.record(&sample);
        assert_eq!(bank.cpu.latest(), 33.0);
        assert_eq!(bank.memory.latest(), 44.0);
        assert_eq!(bank.disk.latest(), 55.0);
    }
}
