//! Link de periférico de curto alcance (BLE).
//!
//! O monitor atua como periférico anunciante com uma característica
//! gravável: um write do central pareado entrega o payload completo de
//! uma vez (limitado pelo MTU negociado). O stack de rádio é um
//! colaborador [`PeripheralHost`]; seus callbacks de conexão e de dados
//! chegam como eventos pollados ([`HostEvent`]), sem herança múltipla.

use super::{CommLink, ConnectionState, TransportError};
use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Delay de cortesia entre tentativas de anúncio (ms).
pub const ADVERTISE_RETRY_MS: u64 = 500;

/// Eventos assíncronos vindos do stack de rádio.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// Um central conectou ao periférico.
    CentralConnected,
    /// O central desconectou.
    CentralDisconnected,
    /// Write na característica: payload completo em um shot.
    CharacteristicWrite(Vec<u8>),
}

/// Stack de rádio do periférico, visto pelo link.
///
/// Uma implementação real registra serviço + característica e empurra
/// os eventos do rádio; [`ChannelHost`] é o ponto de composição
/// fornecido (ponte via channel) e também o dublê de teste.
pub trait PeripheralHost {
    /// Registra serviço e característica e prepara o anúncio.
    fn init(&mut self, device_name: &str) -> Result<(), TransportError>;

    /// (Re)inicia o anúncio. Chamado a cada retomada pós-desconexão.
    fn start_advertising(&mut self) -> Result<(), TransportError>;

    /// Próximo evento pendente do rádio, se houver. Nunca bloqueia.
    fn poll_event(&mut self) -> Option<HostEvent>;

    fn shutdown(&mut self);
}

/// Sessão de transporte do variante periférico.
pub struct BleLink {
    host: Box<dyn PeripheralHost>,
    device_name: String,
    state: ConnectionState,
    /// Último payload escrito, consumido no próximo poll (o mais
    /// recente vence se dois writes chegarem no mesmo tick)
    pending: Option<Vec<u8>>,
    last_advertise: Option<Instant>,
    started: bool,
}

impl BleLink {
    pub fn new(host: Box<dyn PeripheralHost>, device_name: String) -> Self {
        Self {
            host,
            device_name,
            state: ConnectionState::Disconnected,
            pending: None,
            last_advertise: None,
            started: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.host.poll_event() {
            match event {
                HostEvent::CentralConnected => {
                    self.state = ConnectionState::Connected;
                    info!("Central BLE conectado");
                }
                HostEvent::CentralDisconnected => {
                    self.state = ConnectionState::Disconnected;
                    info!("Central BLE desconectado");
                }
                HostEvent::CharacteristicWrite(payload) => {
                    if payload.is_empty() {
                        continue;
                    }
                    if self.pending.is_some() {
                        debug!("Write BLE sobrescreve payload não consumido");
                    }
                    self.pending = Some(payload);
                }
            }
        }
    }
}

impl CommLink for BleLink {
    fn begin(&mut self) -> Result<(), TransportError> {
        info!("Inicializando BLE: {}", self.device_name);
        self.host.init(&self.device_name)?;
        self.host.start_advertising()?;
        self.state = ConnectionState::Advertising;
        self.last_advertise = Some(Instant::now());
        self.started = true;
        info!("Anúncio BLE iniciado");
        Ok(())
    }

    fn update(&mut self) {
        if !self.started {
            return;
        }
        self.drain_events();

        // Sem central conectado: reanuncia indefinidamente, com delay
        // de cortesia de 500ms entre tentativas (sem bloquear o tick)
        if self.state != ConnectionState::Connected {
            let due = self
                .last_advertise
                .is_none_or(|t| t.elapsed().as_millis() as u64 >= ADVERTISE_RETRY_MS);
            if due {
                match self.host.start_advertising() {
                    Ok(()) => self.state = ConnectionState::Advertising,
                    Err(e) => warn!("Falha ao reanunciar BLE: {e}"),
                }
                self.last_advertise = Some(Instant::now());
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    fn receive(&mut self) -> Option<Vec<u8>> {
        self.pending.take()
    }

    fn stop(&mut self) {
        if self.started {
            self.host.shutdown();
            self.started = false;
        }
        self.state = ConnectionState::Disconnected;
        self.pending = None;
    }
}

// ──────────────────────────────────────────────
// ChannelHost – ponte de eventos via channel
// ──────────────────────────────────────────────

/// Host de periférico alimentado por um channel: a ponte para um stack
/// de rádio real (ou para testes) injeta eventos pelo [`HostEndpoint`].
/// Todos os endpoints dropados = ponte encerrada; reanunciar passa a
/// falhar com [`TransportError::Radio`].
pub struct ChannelHost {
    rx: Receiver<HostEvent>,
    advertising: bool,
    bridge_gone: bool,
}

/// Lado produtor do [`ChannelHost`].
#[derive(Clone)]
pub struct HostEndpoint {
    tx: Sender<HostEvent>,
}

impl HostEndpoint {
    pub fn central_connected(&self) {
        let _ = self.tx.try_send(HostEvent::CentralConnected);
    }

    pub fn central_disconnected(&self) {
        let _ = self.tx.try_send(HostEvent::CentralDisconnected);
    }

    /// Entrega um write de característica. Retorna false se o buffer
    /// de eventos estiver cheio (payload descartado).
    pub fn write(&self, payload: &[u8]) -> bool {
        self.tx
            .try_send(HostEvent::CharacteristicWrite(payload.to_vec()))
            .is_ok()
    }
}

/// Cria o par host/endpoint com buffer de 64 eventos.
pub fn channel_host() -> (ChannelHost, HostEndpoint) {
    let (tx, rx) = bounded(64);
    (
        ChannelHost {
            rx,
            advertising: false,
            bridge_gone: false,
        },
        HostEndpoint { tx },
    )
}

impl PeripheralHost for ChannelHost {
    fn init(&mut self, device_name: &str) -> Result<(), TransportError> {
        debug!("ChannelHost registrado como \"{device_name}\"");
        Ok(())
    }

    fn start_advertising(&mut self) -> Result<(), TransportError> {
        if self.bridge_gone {
            return Err(TransportError::Radio(
                "ponte de eventos do rádio encerrada".into(),
            ));
        }
        self.advertising = true;
        Ok(())
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.bridge_gone = true;
                None
            }
        }
    }

    fn shutdown(&mut self) {
        self.advertising = false;
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
