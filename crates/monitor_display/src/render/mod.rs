//! Render engine: máquina de estados de renderização do dashboard.
//!
//! Estado = {Idle, Active} × tema atual. Idle na partida e após
//! silêncio de dados; Active na primeira amostra decodificada. Política
//! de redesenho: ticks de rotina redesenham só as regiões cujos valores
//! mudaram desde o último draw; o overlay de relógio só é redesenhado
//! quando a string formatada muda. Um clear de tela inteira acontece em
//! troca de tema e periodicamente (10s) para limitar artefatos de
//! redesenho parcial.

mod layouts;

use crate::surface::{ColorScheme, DrawSurface};
use monitor_core::history::HistoryBank;
use monitor_core::theme::DisplayTheme;
use monitor_core::types::SystemSample;
use std::time::{Duration, Instant};
use tracing::info;

/// Intervalo do clear periódico de tela inteira (ms).
pub const FULL_CLEAR_INTERVAL_MS: u64 = 10_000;

/// Estado de renderização.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Tela de espera: sem dados ao vivo.
    Idle,
    /// Dashboard com métricas ao vivo.
    Active,
}

/// Strings de relógio já formatadas, fornecidas pelo tick.
#[derive(Debug, Clone, Default)]
pub struct ClockStrings {
    /// "HH:MM:SS"
    pub time: String,
    /// "DD/MM/AAAA"
    pub date: String,
}

impl ClockStrings {
    pub fn new(time: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            date: date.into(),
        }
    }

    pub fn date_time(&self) -> String {
        format!("{} {}", self.date, self.time)
    }
}

/// Engine de renderização sobre uma superfície de desenho.
pub struct RenderEngine<S: DrawSurface> {
    surface: S,
    colors: ColorScheme,
    theme: DisplayTheme,
    state: RenderState,
    /// Última amostra desenhada, para detecção de mudança por região
    last_drawn: Option<SystemSample>,
    last_alert: Option<String>,
    /// Última string de relógio desenhada
    last_clock: String,
    last_full_clear: Instant,
}

impl<S: DrawSurface> RenderEngine<S> {
    pub fn new(surface: S, theme: DisplayTheme) -> Self {
        Self {
            surface,
            colors: ColorScheme::default(),
            theme,
            state: RenderState::Idle,
            last_drawn: None,
            last_alert: None,
            last_clock: String::new(),
            last_full_clear: Instant::now(),
        }
    }

    /// Desenha a tela inicial de espera.
    pub fn begin(&mut self, clock: &ClockStrings) {
        self.show_idle_screen(clock);
        info!("Display inicializado");
    }

    #[cfg(test)]
    pub fn state(&self) -> RenderState {
        self.state
    }

    #[cfg(test)]
    pub fn theme(&self) -> DisplayTheme {
        self.theme
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Um passo de renderização com uma amostra recém-decodificada.
    ///
    /// `theme` é relido da configuração a cada tick; trocar de tema
    /// força exatamente um clear de tela inteira antes do próximo
    /// redesenho parcial. `alert` é a mensagem ativa do avaliador
    /// (no máximo uma).
    pub fn update(
        &mut self,
        sample: &SystemSample,
        history: &HistoryBank,
        theme: DisplayTheme,
        alert: Option<&str>,
        clock: &ClockStrings,
    ) {
        let mut full_clear = false;

        if theme != self.theme {
            info!("Tema: {} → {}", self.theme.name(), theme.name());
            self.theme = theme;
            full_clear = true;
        }
        if self.state == RenderState::Idle {
            self.state = RenderState::Active;
            full_clear = true;
        }
        if self.last_full_clear.elapsed().as_millis() as u64 >= FULL_CLEAR_INTERVAL_MS {
            full_clear = true;
        }

        if full_clear {
            self.surface.fill_screen(self.colors.bg);
            self.last_full_clear = Instant::now();
            // Tela limpa: invalida todo o estado de detecção de mudança
            self.last_drawn = None;
            self.last_clock.clear();
        }

        match self.theme {
            DisplayTheme::Default => self.render_default(sample, clock),
            DisplayTheme::Minimal => self.render_minimal(sample, clock),
            DisplayTheme::Graph => self.render_graph(sample, history, clock),
            DisplayTheme::Compact => self.render_compact(sample, history, clock),
        }

        // Banner de alerta por cima do layout, só quando muda
        if full_clear || self.last_alert.as_deref() != alert {
            match alert {
                Some(message) => self.draw_alert_banner(message),
                None => {
                    if self.last_alert.is_some() {
                        self.clear_alert_banner();
                    }
                }
            }
            self.last_alert = alert.map(str::to_owned);
        }

        self.last_drawn = Some(sample.clone());
    }

    /// Redesenha só o overlay de relógio, e só se a string formatada
    /// mudou desde o último draw. Chamado todo tick, com ou sem dados.
    pub fn update_clock(&mut self, clock: &ClockStrings) {
        self.draw_clock(clock);
    }

    /// Timeout de silêncio de dados: em Active há `timeout` ou mais sem
    /// amostra decodificada, volta à tela de espera. Retorna true se
    /// houve transição neste tick.
    pub fn idle_on_silence(
        &mut self,
        silence: Duration,
        timeout: Duration,
        clock: &ClockStrings,
    ) -> bool {
        if self.state == RenderState::Active && silence >= timeout {
            self.show_idle_screen(clock);
            return true;
        }
        false
    }

    /// Volta à tela de espera (startup ou timeout de silêncio).
    pub fn show_idle_screen(&mut self, clock: &ClockStrings) {
        self.state = RenderState::Idle;
        self.last_drawn = None;
        self.last_alert = None;

        self.surface.fill_screen(self.colors.bg);

        let w = self.surface.width();
        let h = self.surface.height();
        let line = (h / 21).max(1);

        self.surface.set_text_size(2);
        self.surface.set_text_color(self.colors.text, self.colors.bg);
        let title = "System Monitor";
        let tw = self.surface.text_width(title);
        self.surface.set_cursor((w - tw) / 2, h * 7 / 16);
        self.surface.print(title);

        self.surface.set_text_size(1);
        let waiting = "Waiting for data...";
        let tw = self.surface.text_width(waiting);
        self.surface.set_cursor((w - tw) / 2, h * 17 / 32);
        self.surface.print(waiting);

        self.surface
            .set_text_color(self.colors.label, self.colors.bg);
        let y_date = h * 5 / 8;
        let tw = self.surface.text_width(&clock.date);
        self.surface.set_cursor((w - tw) / 2, y_date);
        self.surface.print(&clock.date);
        let tw = self.surface.text_width(&clock.time);
        self.surface.set_cursor((w - tw) / 2, y_date + line);
        self.surface.print(&clock.time);

        self.last_clock = clock.time.clone();
        info!("Display voltou à tela idle");
    }

    /// Linha de status genérica no rodapé.
    pub fn show_status(&mut self, message: &str) {
        let w = self.surface.width();
        let h = self.surface.height();
        let line = (h / 21).max(1);
        let pad = (w / 48).max(1);

        self.surface.fill_rect(0, h - line, w, line, self.colors.bg);
        self.surface.set_text_size(1);
        self.surface
            .set_text_color(self.colors.label, self.colors.bg);
        self.surface.set_cursor(pad, h - line);
        self.surface.print(message);
    }

    /// Informação de conexão centralizada, acima da data/hora da tela
    /// idle.
    pub fn show_connection_info(&mut self, info: &str) {
        let w = self.surface.width();
        let h = self.surface.height();
        let line = (h / 21).max(1);
        let y = h * 5 / 8 - line;

        self.surface.fill_rect(0, y, w, line, self.colors.bg);
        self.surface.set_text_size(1);
        self.surface
            .set_text_color(self.colors.label, self.colors.bg);
        let tw = self.surface.text_width(info);
        self.surface.set_cursor((w - tw) / 2, y);
        self.surface.print(info);
    }

    /// Apresenta o frame no backend.
    pub fn flush(&mut self) {
        self.surface.flush();
    }

    // ── Internos ──

    fn draw_alert_banner(&mut self, message: &str) {
        let w = self.surface.width();
        let banner_h = self.banner_height();

        self.surface.fill_rect(0, 0, w, banner_h, self.colors.alert);
        self.surface.set_text_size(1);
        self.surface
            .set_text_color(self.colors.text, self.colors.alert);
        self.surface
            .set_cursor((w / 48).max(1), banner_h / 3);
        self.surface.print(&format!("ALERT: {message}"));
    }

    fn clear_alert_banner(&mut self) {
        let w = self.surface.width();
        let banner_h = self.banner_height();
        self.surface.fill_rect(0, 0, w, banner_h, self.colors.bg);
    }

    fn banner_height(&self) -> i32 {
        (self.surface.height() * 3 / 32).max(1)
    }

    /// Região do grupo mudou desde o último draw?
    fn changed<T: PartialEq>(
        &self,
        sample: &SystemSample,
        get: impl for<'a> Fn(&'a SystemSample) -> &'a T,
    ) -> bool {
        match &self.last_drawn {
            None => true,
            Some(prev) => get(prev) != get(sample),
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
