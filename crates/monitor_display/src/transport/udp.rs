//! Link de datagrama na rede local (UDP).
//!
//! Associa à rede em modo estação com retry limitado (20 × 500ms =
//! teto de 10s), abre um socket UDP não bloqueante na porta
//! configurada e opcionalmente anuncia um registro de descoberta.
//! Cada poll lê no máximo um pacote; a conectividade é rederivada a
//! cada poll do status do rádio, sem espera bloqueante.

use super::{CommLink, TransportError};
use std::net::UdpSocket;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tentativas de associação × delay entre tentativas.
pub const ASSOC_ATTEMPTS: u32 = 20;
pub const ASSOC_DELAY_MS: u64 = 500;

/// Tamanho fixo do buffer de recepção (um payload por pacote).
pub const RECV_BUFFER_SIZE: usize = 1024;

/// Rádio em modo estação, visto pelo link. Em hosts cujo SO é dono do
/// rádio, [`LocalStation`] reporta associação imediata.
pub trait Station {
    /// Dispara a associação (não bloqueia; o link faz o retry).
    fn start(&mut self, ssid: &str, password: &str);

    /// Status atual do rádio. Nunca bloqueia.
    fn is_associated(&self) -> bool;

    fn disconnect(&mut self);
}

/// Registro de descoberta (ex: mDNS) anunciado após o bind.
pub trait Discovery {
    fn announce(&mut self, service_name: &str, port: u16);
    fn withdraw(&mut self);
}

/// Estação para hosts onde o SO gerencia a rede: associada enquanto
/// iniciada.
#[derive(Debug, Default)]
pub struct LocalStation {
    started: bool,
}

impl Station for LocalStation {
    fn start(&mut self, ssid: &str, _password: &str) {
        info!("Rede gerenciada pelo SO; assumindo associação a \"{ssid}\"");
        self.started = true;
    }

    fn is_associated(&self) -> bool {
        self.started
    }

    fn disconnect(&mut self) {
        self.started = false;
    }
}

/// Descoberta que apenas registra no log; um responder mDNS real
/// conecta aqui.
#[derive(Debug, Default)]
pub struct LogDiscovery;

impl Discovery for LogDiscovery {
    fn announce(&mut self, service_name: &str, port: u16) {
        info!("Descoberta: anunciando \"{service_name}\" na porta {port}");
    }

    fn withdraw(&mut self) {
        debug!("Descoberta: registro retirado");
    }
}

/// Sessão de transporte do variante datagrama.
pub struct UdpLink {
    station: Box<dyn Station>,
    discovery: Option<Box<dyn Discovery>>,
    ssid: String,
    password: String,
    port: u16,
    socket: Option<UdpSocket>,
    connected: bool,
    buf: [u8; RECV_BUFFER_SIZE],
    assoc_attempts: u32,
    assoc_delay: Duration,
}

impl UdpLink {
    pub fn new(
        station: Box<dyn Station>,
        discovery: Option<Box<dyn Discovery>>,
        ssid: String,
        password: String,
        port: u16,
    ) -> Self {
        Self {
            station,
            discovery,
            ssid,
            password,
            port,
            socket: None,
            connected: false,
            buf: [0u8; RECV_BUFFER_SIZE],
            assoc_attempts: ASSOC_ATTEMPTS,
            assoc_delay: Duration::from_millis(ASSOC_DELAY_MS),
        }
    }

    /// Ajusta o orçamento do retry de associação (testes).
    #[cfg(test)]
    fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.assoc_attempts = attempts;
        self.assoc_delay = delay;
        self
    }

    /// Porta efetiva do socket (útil quando configurada como 0).
    pub fn local_port(&self) -> Option<u16> {
        self.socket
            .as_ref()
            .and_then(|s| s.local_addr().ok())
            .map(|a| a.port())
    }

    /// Retry limitado: teto explícito de `attempts × delay`.
    fn associate(&mut self) -> Result<(), TransportError> {
        self.station.start(&self.ssid, &self.password);

        for attempt in 0..self.assoc_attempts {
            if self.station.is_associated() {
                debug!("Associado após {attempt} tentativas");
                return Ok(());
            }
            std::thread::sleep(self.assoc_delay);
        }

        if self.station.is_associated() {
            return Ok(());
        }
        self.station.disconnect();
        Err(TransportError::AssociationFailed {
            ssid: self.ssid.clone(),
            attempts: self.assoc_attempts,
        })
    }
}

impl CommLink for UdpLink {
    fn begin(&mut self) -> Result<(), TransportError> {
        if self.ssid.is_empty() {
            // Garante rádio desligado quando não configurado
            self.station.disconnect();
            return Err(TransportError::MissingCredentials);
        }

        self.associate()?;

        let socket = UdpSocket::bind(("0.0.0.0", self.port))?;
        socket.set_nonblocking(true)?;
        info!(
            "UDP escutando em 0.0.0.0:{}",
            socket.local_addr().map(|a| a.port()).unwrap_or(self.port)
        );

        if let Some(discovery) = self.discovery.as_mut() {
            let port = socket.local_addr().map(|a| a.port()).unwrap_or(self.port);
            discovery.announce("monitor", port);
        }

        self.socket = Some(socket);
        self.connected = true;
        Ok(())
    }

    fn update(&mut self) {
        if self.socket.is_none() {
            return;
        }
        // Conectividade rederivada a cada poll; edge logado uma vez só
        let associated = self.station.is_associated();
        if !associated && self.connected {
            warn!("Rede desconectada");
            self.connected = false;
        } else if associated && !self.connected {
            info!("Rede reconectada");
            self.connected = true;
        }
    }

    fn is_connected(&self) -> bool {
        self.connected && self.station.is_associated()
    }

    fn receive(&mut self) -> Option<Vec<u8>> {
        let socket = self.socket.as_ref()?;
        match socket.recv_from(&mut self.buf) {
            Ok((len, addr)) => {
                debug!("{len} bytes de {addr}");
                Some(self.buf[..len].to_vec())
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => None,
            Err(e) => {
                warn!("Erro ao receber UDP: {e}");
                None
            }
        }
    }

    fn stop(&mut self) {
        if let Some(discovery) = self.discovery.as_mut() {
            discovery.withdraw();
        }
        self.socket = None;
        self.station.disconnect();
        self.connected = false;
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Estação de teste com status de associação controlável.
    struct FakeStation {
        associated: Arc<AtomicBool>,
    }

    impl Station for FakeStation {
        fn start(&mut self, _ssid: &str, _password: &str) {}
        fn is_associated(&self) -> bool {
            self.associated.load(Ordering::SeqCst)
        }
        fn disconnect(&mut self) {
            self.associated.store(false, Ordering::SeqCst);
        }
    }

    fn fake_station(associated: bool) -> (Box<dyn Station>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(associated));
        (
            Box::new(FakeStation {
                associated: flag.clone(),
            }),
            flag,
        )
    }

    fn link_on_ephemeral_port(associated: bool) -> (UdpLink, Arc<AtomicBool>) {
        let (station, flag) = fake_station(associated);
        let link = UdpLink::new(station, None, "rede".into(), "senha".into(), 0)
            .with_retry(3, Duration::from_millis(1));
        (link, flag)
    }

    #[test]
    fn empty_ssid_fails_begin() {
        let (station, _) = fake_station(true);
        let mut link = UdpLink::new(station, None, String::new(), String::new(), 0);
        assert!(matches!(
            link.begin(),
            Err(TransportError::MissingCredentials)
        ));
    }

    #[test]
    fn association_retry_is_bounded() {
        let (mut link, _flag) = link_on_ephemeral_port(false);
        match link.begin() {
            Err(TransportError::AssociationFailed { attempts, .. }) => {
                assert_eq!(attempts, 3);
            }
            other => panic!("esperava AssociationFailed, veio {other:?}"),
        }
        assert!(!link.is_connected());
    }

    #[test]
    fn receives_at_most_one_packet_per_poll() {
        let (mut link, _flag) = link_on_ephemeral_port(true);
        link.begin().unwrap();
        let port = link.local_port().unwrap();

        let tx = UdpSocket::bind("127.0.0.1:0").unwrap();
        tx.send_to(b"um", ("127.0.0.1", port)).unwrap();
        tx.send_to(b"dois", ("127.0.0.1", port)).unwrap();
        std::thread::sleep(Duration::from_millis(100));

        assert_eq!(link.receive().unwrap(), b"um");
        assert_eq!(link.receive().unwrap(), b"dois");
        assert!(link.receive().is_none());
    }

    #[test]
    fn disconnection_edge_is_rederived_per_poll() {
        let (mut link, flag) = link_on_ephemeral_port(true);
        link.begin().unwrap();
        link.update();
        assert!(link.is_connected());

        flag.store(false, Ordering::SeqCst);
        link.update();
        assert!(!link.is_connected());

        flag.store(true, Ordering::SeqCst);
        link.update();
        assert!(link.is_connected());
    }

    #[test]
    fn stop_releases_socket_and_is_idempotent() {
        let (mut link, _flag) = link_on_ephemeral_port(true);
        link.begin().unwrap();
        link.stop();
        assert!(link.local_port().is_none());
        assert!(link.receive().is_none());
        link.stop();
        assert!(!link.is_connected());
    }
}
