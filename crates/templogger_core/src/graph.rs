//! Auxiliares para a configuração de gráficos.
//!
//! O contrato não restringe o formato de `color`; estas funções servem a
//! consumidores que precisam de cores concretas.

use crate::types::{GraphConfig, GraphSeriesConfig, SensorInfo};

/// Paleta padrão das séries, na ordem da legenda.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#00d9ff", "#00ff88", "#ffa500", "#ff6b6b", "#bb86fc", "#ffcc00", "#ff00ff", "#7744aa",
];

/// Converte `#rrggbb` ou `#rgb` (com ou sem `#`) em (r, g, b).
///
/// Retorna `None` para qualquer outra sintaxe CSS (`rgb(...)`, nomes...).
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => Some((
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

impl GraphConfig {
    /// Uma série por sensor visível, na ordem da configuração, ciclando a paleta.
    pub fn for_sensors(sensors: &[SensorInfo]) -> Self {
        let config = sensors
            .iter()
            .filter(|s| s.visible)
            .zip(DEFAULT_PALETTE.iter().cycle())
            .map(|(sensor, color)| GraphSeriesConfig {
                name: sensor.name.clone(),
                color: (*color).into(),
            })
            .collect();
        Self { config }
    }

    pub fn series(&self, name: &str) -> Option<&GraphSeriesConfig> {
        self.config.iter().find(|s| s.name == name)
    }
}
