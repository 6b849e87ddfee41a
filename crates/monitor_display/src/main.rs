//! # Monitor Display
//!
//! Recebe métricas de sistema por um de dois transportes (UDP na rede
//! local ou periférico BLE), decodifica os payloads JSON e renderiza um
//! dashboard ao vivo com histórico, alertas e temas.
//!
//! ## Uso
//! ```bash
//! monitor_display                   # Config em config.toml ao lado do exe
//! RUST_LOG=debug monitor_display    # Logs detalhados (stderr)
//! ```

mod render;
mod surface;
mod term;
mod transport;

use monitor_core::alerts::{AlertChange, AlertEvaluator};
use monitor_core::config::{ConfigWatcher, MonitorConfig, TransportKind};
use monitor_core::decode::decode_sample;
use monitor_core::history::HistoryBank;
use render::{ClockStrings, RenderEngine};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use term::TerminalSurface;
use tracing::{error, info, warn};
use transport::manager::CommManager;

/// Período do tick principal.
const TICK_MS: u64 = 50;

fn main() {
    // ── Logging ──
    // O dashboard é dono do stdout; logs vão para stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Carregar config ──
    let config_path = MonitorConfig::default_path();
    let mut config = MonitorConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    for problem in config.validate() {
        warn!("Config: {problem}");
    }

    // Editar o config.toml troca tema/thresholds/timeout a quente;
    // trocar o transporte exige restart
    let mut config_watcher = ConfigWatcher::new(config_path);

    // ── Shutdown limpo em Ctrl-C ──
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        }) {
            warn!("Não foi possível instalar handler de Ctrl-C: {e}");
        }
    }

    // ── Transporte ──
    // O endpoint do periférico fica vivo pelo processo inteiro; uma
    // ponte de rádio real injeta eventos BLE por ele.
    let (mut comm, _radio_bridge) = CommManager::from_config(&config);
    let degraded = match comm.begin() {
        Ok(()) => false,
        Err(e) => {
            // Modo degradado: tela idle, sem dados, processo vivo
            error!("Falha ao iniciar transporte: {e}");
            true
        }
    };

    // ── Display ──
    let surface = match TerminalSurface::new() {
        Ok(s) => s,
        Err(e) => {
            error!("Falha ao inicializar terminal: {e}");
            comm.stop();
            std::process::exit(1);
        }
    };
    let mut render = RenderEngine::new(surface, config.display.theme);
    render.begin(&clock_now());

    if degraded {
        render.show_status("Transport offline - check config");
    } else {
        let info = match comm.kind() {
            TransportKind::Wifi => format!("UDP port {}", config.transport.port),
            TransportKind::Ble => format!("BLE \"{}\"", config.transport.ble_name),
        };
        render.show_connection_info(&info);
    }
    render.flush();

    // ── Loop principal ──
    let boot = Instant::now();
    let mut history = HistoryBank::default();
    let mut alerts = AlertEvaluator::new();
    let mut last_sample = Instant::now();

    info!("Monitor ativo (transporte: {:?})", comm.kind());

    while running.load(Ordering::SeqCst) {
        let tick_start = Instant::now();

        if let Some(fresh) = config_watcher.poll() {
            info!("Configuração recarregada");
            for problem in fresh.validate() {
                warn!("Config: {problem}");
            }
            config = fresh;
        }

        comm.update();

        if let Some(payload) = comm.receive() {
            let text = String::from_utf8_lossy(&payload);
            let now_ms = boot.elapsed().as_millis() as u64;

            match decode_sample(&text, now_ms) {
                Ok(sample) => {
                    history.record(&sample);

                    match alerts.evaluate(&sample, &config.alerts, now_ms) {
                        AlertChange::Raised(message) => warn!("Alerta: {message}"),
                        AlertChange::Cleared => info!("Alerta limpo"),
                        AlertChange::Unchanged => {}
                    }

                    render.update(
                        &sample,
                        &history,
                        config.display.theme,
                        alerts.active(),
                        &clock_now(),
                    );
                    last_sample = Instant::now();
                }
                Err(e) => {
                    // Payload malformado: descartado, display intacto
                    warn!("Payload inválido: {e}");
                }
            }
        }

        // Silêncio de dados → volta à tela de espera
        let idle_timeout = Duration::from_secs_f64(config.display.idle_timeout_secs);
        if render.idle_on_silence(last_sample.elapsed(), idle_timeout, &clock_now()) {
            info!(
                "Sem dados há {:.0}s; voltando à tela idle",
                idle_timeout.as_secs_f64()
            );
        }

        render.update_clock(&clock_now());
        render.flush();

        let elapsed = tick_start.elapsed();
        if elapsed < Duration::from_millis(TICK_MS) {
            std::thread::sleep(Duration::from_millis(TICK_MS) - elapsed);
        }
    }

    info!("Encerrando...");
    comm.stop();
}

/// Strings de relógio do tick atual, no fuso local.
fn clock_now() -> ClockStrings {
    let now = chrono::Local::now();
    ClockStrings::new(
        now.format("%H:%M:%S").to_string(),
        now.format("%d/%m/%Y").to_string(),
    )
}
