//! Layouts dos quatro temas do dashboard.
//!
//! Cada tema define o próprio arranjo (visão completa, dígitos grandes,
//! gráficos de série temporal, denso compacto), mas todos compartilham
//! a detecção de mudança por região e a política de clear do engine. A
//! geometria é derivada das dimensões da superfície.

use super::{ClockStrings, RenderEngine, RenderState};
use crate::surface::{Color, DrawSurface};
use monitor_core::history::HistoryBank;
use monitor_core::theme::DisplayTheme;
use monitor_core::types::SystemSample;

/// Métricas de geometria derivadas da superfície.
struct Frame {
    w: i32,
    h: i32,
}

impl Frame {
    fn of<S: DrawSurface>(surface: &S) -> Self {
        Self {
            w: surface.width(),
            h: surface.height(),
        }
    }

    fn pad(&self) -> i32 {
        (self.w / 48).max(1)
    }

    fn line(&self) -> i32 {
        (self.h / 21).max(1)
    }

    fn bar_h(&self) -> i32 {
        (self.h / 16).max(1)
    }

    fn graph_h(&self) -> i32 {
        (self.h * 3 / 16).max(3)
    }
}

impl<S: DrawSurface> RenderEngine<S> {
    /// Overlay de relógio: desenhado só quando a string formatada muda.
    /// Posição depende do estado e do tema.
    pub(super) fn draw_clock(&mut self, clock: &ClockStrings) {
        if self.last_clock == clock.time {
            return;
        }
        self.last_clock = clock.time.clone();

        let f = Frame::of(&self.surface);
        let line = f.line();

        self.surface.set_text_size(1);
        self.surface
            .set_text_color(self.colors.label, self.colors.bg);

        if self.state == RenderState::Idle {
            // Tela de espera: data e hora centralizadas
            let y_date = f.h * 5 / 8;
            self.surface
                .fill_rect(0, y_date, f.w, line * 2, self.colors.bg);
            let tw = self.surface.text_width(&clock.date);
            self.surface.set_cursor((f.w - tw) / 2, y_date);
            self.surface.print(&clock.date);
            let tw = self.surface.text_width(&clock.time);
            self.surface.set_cursor((f.w - tw) / 2, y_date + line);
            self.surface.print(&clock.time);
            return;
        }

        match self.theme {
            DisplayTheme::Minimal | DisplayTheme::Compact => {
                // Data + hora centralizadas no topo
                let text = clock.date_time();
                let tw = self.surface.text_width(&text);
                let y = f.pad();
                self.surface.fill_rect(0, y, f.w, line, self.colors.bg);
                self.surface.set_cursor((f.w - tw) / 2, y);
                self.surface.print(&text);
            }
            DisplayTheme::Default | DisplayTheme::Graph => {
                // Hora no canto superior direito
                let tw = self.surface.text_width(&clock.time);
                let pad = f.pad();
                let x = f.w - tw - pad;
                self.surface
                    .fill_rect(x, pad, tw + pad, line, self.colors.bg);
                self.surface.set_cursor(x, pad);
                self.surface.print(&clock.time);
            }
        }
    }

    // ──────────────────────────────────────────
    // Tema Default: visão completa com barras
    // ──────────────────────────────────────────

    pub(super) fn render_default(&mut self, sample: &SystemSample, clock: &ClockStrings) {
        let f = Frame::of(&self.surface);
        let (pad, line, bar) = (f.pad(), f.line(), f.bar_h());
        let bar_w = f.w - 2 * pad;

        self.draw_clock(clock);
        let mut y = pad + line;

        // CPU
        if self.changed(sample, |s| &s.cpu) {
            self.section_label(pad, y, "CPU:");
            self.draw_progress_bar(pad, y + line, bar_w, bar, sample.cpu.usage, self.colors.cpu);
            self.bar_overlay(
                pad * 2,
                y + line,
                &format!("{:.1}% | {:.1}C", sample.cpu.usage, sample.cpu.temp),
            );
        }
        y += line + bar + line / 2 + 1;

        // Memória
        if self.changed(sample, |s| &s.memory) {
            self.section_label(pad, y, "Memory:");
            self.draw_progress_bar(
                pad,
                y + line,
                bar_w,
                bar,
                sample.memory.percent,
                self.colors.memory,
            );
            self.bar_overlay(
                pad * 2,
                y + line,
                &format!(
                    "{:.1}/{:.1} GB ({:.1}%)",
                    sample.memory.used, sample.memory.total, sample.memory.percent
                ),
            );
        }
        y += line + bar + line / 2 + 1;

        // Disco
        if self.changed(sample, |s| &s.disk) {
            self.section_label(pad, y, "Disk:");
            self.draw_progress_bar(
                pad,
                y + line,
                bar_w,
                bar,
                sample.disk.percent,
                self.colors.disk,
            );
            self.bar_overlay(
                pad * 2,
                y + line,
                &format!(
                    "{:.1}/{:.1} GB ({:.1}%)",
                    sample.disk.used, sample.disk.total, sample.disk.percent
                ),
            );
        }
        y += line + bar + line / 2 + 1;

        // Rede
        if self.changed(sample, |s| &s.network) {
            self.section_label(pad, y, "Network:");
            self.text_line(
                pad * 2,
                y + line,
                &format!("UP: {:.2} KB/s", sample.network.upload),
                self.colors.text,
            );
            self.text_line(
                pad * 2,
                y + line * 2,
                &format!("DN: {:.2} KB/s", sample.network.download),
                self.colors.text,
            );
        }
        y += line * 3 + line / 2;

        // GPU (se presente)
        if sample.gpu.is_present() {
            if self.changed(sample, |s| &s.gpu) {
                self.section_label(pad, y, "GPU:");
                self.text_line(
                    pad * 2,
                    y + line,
                    &format!("{:.1}% | {:.1}C", sample.gpu.usage, sample.gpu.temp),
                    self.colors.text,
                );
            }
            y += line * 2 + line / 2;
        }

        // Temperaturas extras (se presentes)
        if sample.sensors.is_present() && self.changed(sample, |s| &s.sensors) {
            self.section_label(pad, y, "Temps:");
            let mut parts = Vec::new();
            if sample.sensors.motherboard_temp > 0.0 {
                parts.push(format!("MB: {:.1}C", sample.sensors.motherboard_temp));
            }
            if sample.sensors.disk_temp > 0.0 {
                let name = if sample.sensors.disk_name.is_empty() {
                    "Disk"
                } else {
                    &sample.sensors.disk_name
                };
                parts.push(format!("{name}: {:.1}C", sample.sensors.disk_temp));
            }
            self.text_line(pad * 2, y + line, &parts.join(" | "), self.colors.text);
        }
    }

    // ──────────────────────────────────────────
    // Tema Minimal: dígitos grandes
    // ──────────────────────────────────────────

    pub(super) fn render_minimal(&mut self, sample: &SystemSample, clock: &ClockStrings) {
        let f = Frame::of(&self.surface);
        let (pad, line) = (f.pad(), f.line());
        let step = (f.h / 8).max(line * 2);
        let row_h = (step * 2 / 3).max(1);

        self.draw_clock(clock);
        let mut y = pad + line * 2;

        self.surface.set_text_size(2);

        let cpu_changed = self.changed(sample, |s| &s.cpu);
        if cpu_changed {
            self.big_row(y, row_h, pad, &format!("CPU: {:.0}%", sample.cpu.usage), self.colors.cpu);
        }
        y += step;

        if self.changed(sample, |s| &s.memory) {
            self.big_row(
                y,
                row_h,
                pad,
                &format!("MEM: {:.0}%", sample.memory.percent),
                self.colors.memory,
            );
        }
        y += step;

        if self.changed(sample, |s| &s.disk) {
            self.big_row(
                y,
                row_h,
                pad,
                &format!("DISK: {:.0}%", sample.disk.percent),
                self.colors.disk,
            );
        }
        y += step;

        if cpu_changed {
            self.big_row(
                y,
                row_h,
                pad,
                &format!("TEMP: {:.0}C", sample.cpu.temp),
                self.colors.alert,
            );
        }
    }

    // ──────────────────────────────────────────
    // Tema Graph: séries temporais
    // ──────────────────────────────────────────

    pub(super) fn render_graph(
        &mut self,
        sample: &SystemSample,
        history: &HistoryBank,
        clock: &ClockStrings,
    ) {
        let f = Frame::of(&self.surface);
        let (pad, line, graph_h) = (f.pad(), f.line(), f.graph_h());
        let graph_w = f.w - 2 * pad;

        self.draw_clock(clock);
        let mut y = pad;

        // CPU: header + gráfico. O gráfico avança a cada amostra
        // registrada, então o traço é redesenhado todo update.
        if self.changed(sample, |s| &s.cpu) {
            self.text_line(
                pad,
                y,
                &format!("CPU: {:.1}%", sample.cpu.usage),
                self.colors.cpu,
            );
        }
        y += line;
        self.draw_graph(pad, y, graph_w, graph_h, &history.cpu.snapshot(), 100.0, self.colors.cpu);
        y += graph_h + line / 2 + 1;

        // Memória
        if self.changed(sample, |s| &s.memory) {
            self.text_line(
                pad,
                y,
                &format!("MEM: {:.1}%", sample.memory.percent),
                self.colors.memory,
            );
        }
        y += line;
        self.draw_graph(
            pad,
            y,
            graph_w,
            graph_h,
            &history.memory.snapshot(),
            100.0,
            self.colors.memory,
        );
        y += graph_h + line / 2 + 1;

        // Disco + rede em uma linha
        if self.changed(sample, |s| &s.disk) || self.changed(sample, |s| &s.network) {
            self.text_line(
                pad,
                y,
                &format!(
                    "DISK: {:.1}% | NET: U{:.1} D{:.1} KB/s",
                    sample.disk.percent, sample.network.upload, sample.network.download
                ),
                self.colors.disk,
            );
        }
        y += line;

        // Temperaturas em uma linha (se presentes)
        let has_temps = sample.gpu.temp > 0.0 || sample.sensors.is_present();
        if has_temps
            && (self.changed(sample, |s| &s.gpu) || self.changed(sample, |s| &s.sensors))
        {
            let mut text = String::from("TEMP:");
            if sample.gpu.temp > 0.0 {
                text.push_str(&format!(" GPU:{:.0}C", sample.gpu.temp));
            }
            if sample.sensors.motherboard_temp > 0.0 {
                text.push_str(&format!(" MB:{:.0}C", sample.sensors.motherboard_temp));
            }
            if sample.sensors.disk_temp > 0.0 {
                let name = if sample.sensors.disk_name.is_empty() {
                    "DSK"
                } else {
                    &sample.sensors.disk_name
                };
                text.push_str(&format!(" {name}:{:.0}C", sample.sensors.disk_temp));
            }
            self.text_line(pad, y, &text, self.colors.label);
        }
    }

    // ──────────────────────────────────────────
    // Tema Compact: denso, barras + gráficos pequenos
    // ──────────────────────────────────────────

    pub(super) fn render_compact(
        &mut self,
        sample: &SystemSample,
        history: &HistoryBank,
        clock: &ClockStrings,
    ) {
        let f = Frame::of(&self.surface);
        let (pad, line) = (f.pad(), f.line());
        let row_step = line + line / 3 + 1;
        let bar_x = f.w * 11 / 24;
        let bar_w = f.w - bar_x - pad;

        self.draw_clock(clock);
        let mut y = pad + line;

        if self.changed(sample, |s| &s.cpu) {
            self.compact_row(
                pad,
                y,
                bar_x,
                bar_w,
                line,
                &format!("CPU:{:3.0}% {:4.1}C", sample.cpu.usage, sample.cpu.temp),
                sample.cpu.usage,
                self.colors.cpu,
            );
        }
        y += row_step;

        if self.changed(sample, |s| &s.memory) {
            self.compact_row(
                pad,
                y,
                bar_x,
                bar_w,
                line,
                &format!(
                    "MEM:{:3.0}% {:.1}/{:.1}GB",
                    sample.memory.percent, sample.memory.used, sample.memory.total
                ),
                sample.memory.percent,
                self.colors.memory,
            );
        }
        y += row_step;

        if self.changed(sample, |s| &s.disk) {
            self.compact_row(
                pad,
                y,
                bar_x,
                bar_w,
                line,
                &format!(
                    "DSK:{:3.0}% {:.0}/{:.0}GB",
                    sample.disk.percent, sample.disk.used, sample.disk.total
                ),
                sample.disk.percent,
                self.colors.disk,
            );
        }
        y += row_step;

        if self.changed(sample, |s| &s.network) {
            self.text_line(
                pad,
                y,
                &format!(
                    "NET: U{:.1} D{:.1} KB/s",
                    sample.network.upload, sample.network.download
                ),
                self.colors.network,
            );
        }
        y += row_step;

        if sample.sensors.is_present() {
            if self.changed(sample, |s| &s.sensors) {
                let mut parts = Vec::new();
                if sample.sensors.motherboard_temp > 0.0 {
                    parts.push(format!("MB:{:.0}C", sample.sensors.motherboard_temp));
                }
                if sample.sensors.disk_temp > 0.0 {
                    let name = if sample.sensors.disk_name.is_empty() {
                        "DSK"
                    } else {
                        &sample.sensors.disk_name
                    };
                    parts.push(format!("{name}:{:.0}C", sample.sensors.disk_temp));
                }
                self.text_line(pad, y, &parts.join(" "), self.colors.label);
            }
            y += row_step;
        }

        // Gráficos pequenos de CPU e memória
        let graph_h = ((f.h - y - line) / 2 - line / 2).max(3);
        let graph_w = f.w - 2 * pad;
        y += line / 2;
        self.draw_graph(pad, y, graph_w, graph_h, &history.cpu.snapshot(), 100.0, self.colors.cpu);
        y += graph_h + line / 2 + 1;
        self.draw_graph(
            pad,
            y,
            graph_w,
            graph_h,
            &history.memory.snapshot(),
            100.0,
            self.colors.memory,
        );
    }

    // ──────────────────────────────────────────
    // Primitivas compartilhadas pelos layouts
    // ──────────────────────────────────────────

    /// Barra de progresso: moldura + preenchimento proporcional.
    fn draw_progress_bar(&mut self, x: i32, y: i32, w: i32, h: i32, percent: f32, color: Color) {
        let percent = percent.clamp(0.0, 100.0);
        let fill_w = ((w as f32 * percent) / 100.0) as i32;

        self.surface.draw_rect(x, y, w, h, self.colors.text);
        self.surface
            .fill_rect(x + 1, y + 1, w - 2, h - 2, self.colors.bg);
        self.surface
            .fill_rect(x + 1, y + 1, (fill_w - 2).max(0), h - 2, color);
    }

    /// Gráfico de linha sobre a série em ordem cronológica.
    fn draw_graph(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        series: &[f32],
        max_val: f32,
        color: Color,
    ) {
        self.surface.draw_rect(x, y, w, h, self.colors.text);
        self.surface
            .fill_rect(x + 1, y + 1, w - 2, h - 2, self.colors.bg);

        if series.len() <= 1 || w < 10 || h < 4 {
            return;
        }

        let step = (w - 2) as f32 / series.len() as f32;
        for i in 1..series.len() {
            let v1 = series[i - 1].clamp(0.0, max_val);
            let v2 = series[i].clamp(0.0, max_val);

            let x1 = x + 1 + ((i - 1) as f32 * step) as i32;
            let x2 = x + 1 + (i as f32 * step) as i32;

            let y1 = y + h - 2 - ((v1 * (h - 4) as f32) / max_val) as i32;
            let y2 = y + h - 2 - ((v2 * (h - 4) as f32) / max_val) as i32;

            let y1 = y1.clamp(y + 1, y + h - 2);
            let y2 = y2.clamp(y + 1, y + h - 2);

            self.surface.draw_line(x1, y1, x2, y2, color);
        }
    }

    /// Rótulo de seção (ex: "CPU:").
    fn section_label(&mut self, x: i32, y: i32, label: &str) {
        self.surface.set_text_size(1);
        self.surface
            .set_text_color(self.colors.label, self.colors.bg);
        self.surface.set_cursor(x, y);
        self.surface.print(label);
    }

    /// Linha de texto com a região limpa antes do print.
    fn text_line(&mut self, x: i32, y: i32, text: &str, color: Color) {
        let w = self.surface.width();
        let line = (self.surface.height() / 21).max(1);
        self.surface.fill_rect(x, y, w - x, line, self.colors.bg);
        self.surface.set_text_size(1);
        self.surface.set_text_color(color, self.colors.bg);
        self.surface.set_cursor(x, y);
        self.surface.print(text);
    }

    /// Texto sobreposto dentro de uma barra de progresso.
    fn bar_overlay(&mut self, x: i32, y: i32, text: &str) {
        self.surface.set_text_size(1);
        self.surface.set_text_color(self.colors.text, self.colors.bg);
        self.surface.set_cursor(x, y);
        self.surface.print(text);
    }

    /// Linha de dígitos grandes do tema Minimal.
    fn big_row(&mut self, y: i32, row_h: i32, pad: i32, text: &str, color: Color) {
        let w = self.surface.width();
        self.surface.fill_rect(0, y, w, row_h, self.colors.bg);
        self.surface.set_text_size(2);
        self.surface.set_text_color(color, self.colors.bg);
        self.surface.set_cursor(pad * 4, y);
        self.surface.print(text);
    }

    /// Linha do tema Compact: texto à esquerda + barra à direita.
    #[allow(clippy::too_many_arguments)]
    fn compact_row(
        &mut self,
        pad: i32,
        y: i32,
        bar_x: i32,
        bar_w: i32,
        line: i32,
        text: &str,
        percent: f32,
        color: Color,
    ) {
        self.surface
            .fill_rect(pad, y, bar_x - pad, line, self.colors.bg);
        self.surface.set_text_size(1);
        self.surface.set_text_color(color, self.colors.bg);
        self.surface.set_cursor(pad, y);
        self.surface.print(text);
        self.draw_progress_bar(bar_x, y, bar_w, line, percent, color);
    }
}
