//! # Monitor Core
//!
//! Crate compartilhada do monitor de telemetria ao vivo: tipos de
//! amostra, decodificador tolerante do payload JSON, histórico rolante,
//! avaliador de alertas, temas e configuração TOML.
//!
//! ## Módulos
//! - [`types`] – Structs de telemetria (CPU, memória, disco, rede…)
//! - [`decode`] – Decodificação tolerante a campos do payload
//! - [`history`] – Séries rolantes de capacidade fixa para gráficos
//! - [`alerts`] – Alerta único com prioridade fixa e debounce
//! - [`theme`] – Temas/layouts do dashboard
//! - [`config`] – Configuração unificada via TOML

pub mod alerts;
pub mod config;
pub mod decode;
pub mod history;
pub mod theme;
pub mod types;

// Re-exports convenientes
pub use alerts::{AlertChange, AlertEvaluator};
pub use config::{ConfigWatcher, MonitorConfig, TransportKind};
pub use decode::{DecodeError, decode_sample};
pub use history::{HISTORY_SIZE, HistoryBank, MetricHistory};
pub use theme::DisplayTheme;
pub use types::SystemSample;
