//! Temas visuais do dashboard.
//!
//! Um tema seleciona um *layout* – os quatro variantes compartilham a
//! mesma paleta de cores e a mesma política de redesenho. Trocar de
//! tema é uma transição do render engine, nunca um objeto novo.

use serde::{Deserialize, Serialize};

/// Layout de renderização do dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayTheme {
    /// Visão completa: barras de progresso + métricas
    #[default]
    Default,
    /// Dígitos grandes, poucas métricas
    Minimal,
    /// Gráficos de série temporal (CPU e memória)
    Graph,
    /// Multi-métrica denso com gráficos pequenos
    Compact,
}

impl DisplayTheme {
    /// Nome em minúsculas, o mesmo usado no config.toml.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Minimal => "minimal",
            Self::Graph => "graph",
            Self::Compact => "compact",
        }
    }
}

/// Paleta de cores compartilhada pelos layouts, em hex string.
/// A conversão para a cor concreta da superfície fica no display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    pub bg: Color32Hex,
    pub text: Color32Hex,
    pub label: Color32Hex,
    pub cpu: Color32Hex,
    pub memory: Color32Hex,
    pub disk: Color32Hex,
    pub network: Color32Hex,
    pub alert: Color32Hex,
}

/// Cor em formato hex string (ex: "#00ff88") para serialização.
pub type Color32Hex = String;

impl Default for Palette {
    fn default() -> Self {
        Self {
            bg: "#000000".into(),
            text: "#ffffff".into(),
            label: "#00ffff".into(),
            cpu: "#00ff00".into(),
            memory: "#ffff00".into(),
            disk: "#ffa500".into(),
            network: "#ff00ff".into(),
            alert: "#ff0000".into(),
        }
    }
}

/// Converte uma string hex "#RRGGBB" para tupla (r, g, b).
pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return (255, 255, 255); // fallback branco
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
    (r, g, b)
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_rgb_valid() {
        assert_eq!(hex_to_rgb("#ff0000"), (255, 0, 0));
        assert_eq!(hex_to_rgb("#00ff88"), (0, 255, 136));
        assert_eq!(hex_to_rgb("1a1a1a"), (26, 26, 26));
    }

    #[test]
    fn theme_name_matches_serde_form() {
        // name() deve bater com o que o serde aceita no config.toml
        for theme in [
            DisplayTheme::Default,
            DisplayTheme::Minimal,
            DisplayTheme::Graph,
            DisplayTheme::Compact,
        ] {
            let toml_str = format!("theme = \"{}\"", theme.name());
            #[derive(serde::Deserialize)]
            struct Row {
                theme: DisplayTheme,
            }
            let parsed: Row = toml::from_str(&toml_str).unwrap();
            assert_eq!(parsed.theme, theme);
        }
    }
}
