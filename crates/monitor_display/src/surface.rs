//! Superfície de desenho: operações primitivas consumidas pelo render.
//!
//! O render engine só conhece este contrato (retângulos, cursor, texto,
//! medida de texto, linhas); o backend concreto fica atrás do trait –
//! terminal no binário, superfície gravadora nos testes.

use monitor_core::theme::{Palette, hex_to_rgb};

/// Cor RGB da superfície.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converte de hex string "#RRGGBB" (fallback branco).
    pub fn from_hex(hex: &str) -> Self {
        let (r, g, b) = hex_to_rgb(hex);
        Self { r, g, b }
    }
}

/// Paleta convertida para cores concretas da superfície.
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    pub bg: Color,
    pub text: Color,
    pub label: Color,
    pub cpu: Color,
    pub memory: Color,
    pub disk: Color,
    pub network: Color,
    pub alert: Color,
}

impl ColorScheme {
    pub fn from_palette(p: &Palette) -> Self {
        Self {
            bg: Color::from_hex(&p.bg),
            text: Color::from_hex(&p.text),
            label: Color::from_hex(&p.label),
            cpu: Color::from_hex(&p.cpu),
            memory: Color::from_hex(&p.memory),
            disk: Color::from_hex(&p.disk),
            network: Color::from_hex(&p.network),
            alert: Color::from_hex(&p.alert),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::from_palette(&Palette::default())
    }
}

/// Operações primitivas de desenho.
pub trait DrawSurface {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn fill_screen(&mut self, color: Color);
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color);

    fn set_cursor(&mut self, x: i32, y: i32);
    fn set_text_color(&mut self, fg: Color, bg: Color);
    fn set_text_size(&mut self, size: u8);
    fn print(&mut self, text: &str);
    fn text_width(&self, text: &str) -> i32;

    /// Apresenta o frame. Backends imediatos podem ignorar.
    fn flush(&mut self) {}
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_hex() {
        assert_eq!(Color::from_hex("#00ff88"), Color::new(0, 255, 136));
        assert_eq!(Color::from_hex("oops"), Color::new(255, 255, 255));
    }

    #[test]
    fn scheme_converts_default_palette() {
        let scheme = ColorScheme::default();
        assert_eq!(scheme.bg, Color::new(0, 0, 0));
        assert_eq!(scheme.cpu, Color::new(0, 255, 0));
        assert_eq!(scheme.alert, Color::new(255, 0, 0));
    }
}
