//! Avaliador de alertas com debounce e mensagem única.
//!
//! Prioridade fixa de avaliação: temperatura de CPU alta, senão memória
//! livre baixa, senão disco livre baixo – o primeiro match vence e no
//! máximo uma mensagem fica visível por vez. Entrar em "ativo" respeita
//! uma janela de debounce de 5000 ms desde a última ativação; a
//! condição deixar de valer limpa o alerta imediatamente no próximo
//! tick, sem debounce.

use crate::config::AlertThresholds;
use crate::types::SystemSample;

/// Janela mínima entre ativações sucessivas (ms).
pub const ALERT_DEBOUNCE_MS: u64 = 5000;

/// Resultado de uma avaliação, do ponto de vista do render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertChange {
    /// Alerta (re)ativado – banner deve ser desenhado.
    Raised(String),
    /// Condição deixou de valer – banner deve ser limpo.
    Cleared,
    /// Nada a fazer neste tick.
    Unchanged,
}

/// Estado de alerta do monitor: no máximo um alerta ativo.
#[derive(Debug, Clone, Default)]
pub struct AlertEvaluator {
    active: Option<String>,
    /// Instante da última transição para ativo (ms)
    last_raised_ms: u64,
}

impl AlertEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mensagem do alerta ativo, se houver.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Avalia uma amostra contra os thresholds.
    ///
    /// `now_ms` é o relógio monotônico do monitor; a janela de debounce
    /// é medida a partir da última transição para ativo.
    pub fn evaluate(
        &mut self,
        sample: &SystemSample,
        thresholds: &AlertThresholds,
        now_ms: u64,
    ) -> AlertChange {
        match condition_message(sample, thresholds) {
            Some(message) => {
                let debounced = self.active.is_some()
                    && now_ms.saturating_sub(self.last_raised_ms) < ALERT_DEBOUNCE_MS;
                if debounced {
                    return AlertChange::Unchanged;
                }
                self.last_raised_ms = now_ms;
                self.active = Some(message.clone());
                AlertChange::Raised(message)
            }
            None => {
                if self.active.take().is_some() {
                    AlertChange::Cleared
                } else {
                    AlertChange::Unchanged
                }
            }
        }
    }
}

/// Primeira condição que vale, em ordem de prioridade. As condições de
/// prioridade menor são suprimidas enquanto uma maior estiver valendo.
fn condition_message(sample: &SystemSample, th: &AlertThresholds) -> Option<String> {
    if sample.cpu.temp >= th.cpu_temp_high {
        Some(format!("High CPU Temp: {:.1}C", sample.cpu.temp))
    } else if sample.memory.percent <= th.memory_low {
        Some(format!("Low Memory: {:.1}%", sample.memory.percent))
    } else if sample.disk.percent <= th.disk_low {
        Some(format!("Low Disk: {:.1}%", sample.disk.percent))
    } else {
        None
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> AlertThresholds {
        AlertThresholds {
            cpu_temp_high: 80.0,
            memory_low: 20.0,
            disk_low: 10.0,
        }
    }

    fn sample(cpu_temp: f32, mem_pct: f32, disk_pct: f32) -> SystemSample {
        let mut s = SystemSample::default();
        s.cpu.temp = cpu_temp;
        s.memory.percent = mem_pct;
        s.disk.percent = disk_pct;
        s
    }

    #[test]
    fn normal_sample_raises_nothing() {
        let mut ev = AlertEvaluator::new();
        let change = ev.evaluate(&sample(50.0, 60.0, 50.0), &thresholds(), 0);
        assert_eq!(change, AlertChange::Unchanged);
        assert!(ev.active().is_none());
    }

    #[test]
    fn cpu_temp_has_priority_over_other_conditions() {
        // Memória e disco também qualificariam, mas CPU vence
        let mut ev = AlertEvaluator::new();
        let s = sample(85.0, 15.0, 5.0);
        match ev.evaluate(&s, &thresholds(), 0) {
            AlertChange::Raised(msg) => assert!(msg.starts_with("High CPU Temp")),
            other => panic!("esperava Raised, veio {other:?}"),
        }
    }

    #[test]
    fn cpu_alert_message_format() {
        // cpuTemp=85 com mem/disk acima dos thresholds baixos
        let mut ev = AlertEvaluator::new();
        match ev.evaluate(&sample(85.0, 50.0, 50.0), &thresholds(), 0) {
            AlertChange::Raised(msg) => assert_eq!(msg, "High CPU Temp: 85.0C"),
            other => panic!("esperava Raised, veio {other:?}"),
        }
    }

    #[test]
    fn second_condition_within_window_is_debounced() {
        let mut ev = AlertEvaluator::new();
        assert!(matches!(
            ev.evaluate(&sample(85.0, 50.0, 50.0), &thresholds(), 1000),
            AlertChange::Raised(_)
        ));
        // Outra condição qualificante 3s depois: uma única ativação visível
        assert_eq!(
            ev.evaluate(&sample(90.0, 50.0, 50.0), &thresholds(), 4000),
            AlertChange::Unchanged
        );
        // Janela vencida: reativa
        assert!(matches!(
            ev.evaluate(&sample(90.0, 50.0, 50.0), &thresholds(), 6001),
            AlertChange::Raised(_)
        ));
    }

    #[test]
    fn clear_is_immediate_without_debounce() {
        let mut ev = AlertEvaluator::new();
        ev.evaluate(&sample(85.0, 50.0, 50.0), &thresholds(), 1000);
        assert!(ev.active().is_some());
        // Próximo tick, 100ms depois: condição parou de valer → limpa já
        assert_eq!(
            ev.evaluate(&sample(50.0, 50.0, 50.0), &thresholds(), 1100),
            AlertChange::Cleared
        );
        assert!(ev.active().is_none());
    }

    #[test]
    fn reactivation_after_clear_skips_debounce() {
        // Sem alerta ativo, a próxima ativação não espera a janela
        let mut ev = AlertEvaluator::new();
        ev.evaluate(&sample(85.0, 50.0, 50.0), &thresholds(), 1000);
        ev.evaluate(&sample(50.0, 50.0, 50.0), &thresholds(), 1100);
        assert!(matches!(
            ev.evaluate(&sample(85.0, 50.0, 50.0), &thresholds(), 1200),
            AlertChange::Raised(_)
        ));
    }

    #[test]
    fn lower_priority_conditions_fire_in_order() {
        let mut ev = AlertEvaluator::new();
        match ev.evaluate(&sample(50.0, 15.0, 5.0), &thresholds(), 0) {
            AlertChange::Raised(msg) => assert_eq!(msg, "Low Memory: 15.0%"),
            other => panic!("esperava Raised, veio {other:?}"),
        }
        let mut ev = AlertEvaluator::new();
        match ev.evaluate(&sample(50.0, 60.0, 5.0), &thresholds(), 0) {
            AlertChange::Raised(msg) => assert_eq!(msg, "Low Disk: 5.0%"),
            other => panic!("esperava Raised, veio {other:?}"),
        }
    }
}
