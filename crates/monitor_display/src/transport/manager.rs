//! Seleção e posse do transporte ativo.
//!
//! Exatamente uma sessão de transporte vive pelo processo inteiro,
//! escolhida no startup a partir da configuração. O manager delega o
//! contrato begin/update/isConnected/receive/stop ao link ativo e
//! nunca tenta failover para o outro variante.

use super::ble::{BleLink, HostEndpoint, channel_host};
use super::udp::{LocalStation, LogDiscovery, UdpLink};
use super::{CommLink, TransportError};
use monitor_core::config::{MonitorConfig, TransportKind};
use tracing::info;

pub struct CommManager {
    link: Box<dyn CommLink>,
    kind: TransportKind,
}

impl CommManager {
    /// Constrói o manager com o variante configurado.
    ///
    /// Para BLE, retorna também o [`HostEndpoint`] pelo qual uma ponte
    /// de rádio real injeta os eventos do periférico; para WiFi o
    /// endpoint é `None`.
    pub fn from_config(config: &MonitorConfig) -> (Self, Option<HostEndpoint>) {
        let t = &config.transport;
        match t.kind {
            TransportKind::Wifi => {
                info!("Iniciando comunicação WiFi...");
                let link = UdpLink::new(
                    Box::new(LocalStation::default()),
                    Some(Box::new(LogDiscovery)),
                    t.wifi_ssid.clone(),
                    t.wifi_password.clone(),
                    t.port,
                );
                (Self::new(Box::new(link), t.kind), None)
            }
            TransportKind::Ble => {
                info!("Iniciando comunicação BLE...");
                let (host, endpoint) = channel_host();
                let link = BleLink::new(Box::new(host), t.ble_name.clone());
                (Self::new(Box::new(link), t.kind), Some(endpoint))
            }
        }
    }

    /// Constrói o manager sobre um link arbitrário (testes/pontes).
    pub fn new(link: Box<dyn CommLink>, kind: TransportKind) -> Self {
        Self { link, kind }
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    pub fn begin(&mut self) -> Result<(), TransportError> {
        self.link.begin()
    }

    pub fn update(&mut self) {
        self.link.update();
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    pub fn receive(&mut self) -> Option<Vec<u8>> {
        self.link.receive()
    }

    pub fn stop(&mut self) {
        self.link.stop();
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wifi_config_builds_udp_link_without_endpoint() {
        let config = MonitorConfig::default();
        let (manager, endpoint) = CommManager::from_config(&config);
        assert_eq!(manager.kind(), TransportKind::Wifi);
        assert!(endpoint.is_none());
    }

    #[test]
    fn ble_config_builds_peripheral_link_with_endpoint() {
        let mut config = MonitorConfig::default();
        config.transport.kind = TransportKind::Ble;
        let (manager, endpoint) = CommManager::from_config(&config);
        assert_eq!(manager.kind(), TransportKind::Ble);
        assert!(endpoint.is_some());
    }

    #[test]
    fn wifi_without_ssid_fails_begin_without_panicking() {
        // Modo degradado: begin falha, o chamador segue em idle
        let config = MonitorConfig::default(); // ssid vazio
        let (mut manager, _) = CommManager::from_config(&config);
        assert!(manager.begin().is_err());
        // Polling continua seguro mesmo sem transporte ativo
        manager.update();
        assert!(!manager.is_connected());
        assert!(manager.receive().is_none());
        manager.stop();
    }

    #[test]
    fn ble_delivers_payload_through_manager() {
        let mut config = MonitorConfig::default();
        config.transport.kind = TransportKind::Ble;
        let (mut manager, endpoint) = CommManager::from_config(&config);
        manager.begin().unwrap();

        let ep = endpoint.unwrap();
        ep.central_connected();
        ep.write(b"{\"cpu\":{\"usage\":1.0}}");
        manager.update();

        assert!(manager.is_connected());
        assert_eq!(manager.receive().unwrap(), b"{\"cpu\":{\"usage\":1.0}}");
        manager.stop();
    }
}
