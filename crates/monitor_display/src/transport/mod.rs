//! Camada de transporte: dois variantes mutuamente exclusivos.
//!
//! O link de periférico (BLE) e o link de datagrama (UDP) implementam o
//! mesmo conjunto de capacidades [`CommLink`]; o [`manager::CommManager`]
//! seleciona exatamente um no startup e delega tudo a ele. Não existe
//! failover entre variantes sem restart.

pub mod ble;
pub mod manager;
pub mod udp;

use std::io;

/// Estado de conexão, propriedade exclusiva do link ativo.
/// O manager e o loop de tick apenas leem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    /// Periférico anunciando / estação associando
    Advertising,
    Connected,
}

/// Erros de transporte.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Credenciais WiFi não configuradas (SSID vazio)")]
    MissingCredentials,

    #[error("Falha ao associar à rede \"{ssid}\" após {attempts} tentativas")]
    AssociationFailed { ssid: String, attempts: u32 },

    #[error("Falha no socket UDP: {0}")]
    Socket(#[from] io::Error),

    #[error("Falha no rádio do periférico: {0}")]
    Radio(String),
}

/// Conjunto de capacidades de uma sessão de transporte.
///
/// Contrato comum aos dois variantes:
/// - [`receive`](CommLink::receive) retorna no máximo um payload bruto
///   por chamada e nunca bloqueia;
/// - [`is_connected`](CommLink::is_connected) nunca bloqueia;
/// - [`stop`](CommLink::stop) libera todos os recursos e é idempotente.
pub trait CommLink {
    /// Inicia o transporte. Falha deixa o chamador em modo degradado
    /// (tela idle, sem dados) – nunca derruba o processo.
    fn begin(&mut self) -> Result<(), TransportError>;

    /// Um passo de manutenção por tick: drena eventos do rádio,
    /// rederiva conectividade, reanuncia se preciso. Nunca bloqueia.
    fn update(&mut self);

    fn is_connected(&self) -> bool;

    /// Consome o payload bruto pendente, se houver.
    fn receive(&mut self) -> Option<Vec<u8>>;

    fn stop(&mut self);
}
