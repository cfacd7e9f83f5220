//! Unidade de exibição das temperaturas.
//!
//! O dispositivo já grava cada leitura na unidade configurada; a conversão
//! aqui serve apenas a consumidores que precisam de outra unidade.

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Unidade correspondente à flag `fahrenheit` da configuração.
    pub fn from_fahrenheit_flag(fahrenheit: bool) -> Self {
        if fahrenheit {
            TemperatureUnit::Fahrenheit
        } else {
            TemperatureUnit::Celsius
        }
    }

    /// Símbolo publicado junto com os valores (ex: Home Assistant).
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Converte `value`, expresso nesta unidade, para `target`.
    pub fn convert(self, value: f64, target: TemperatureUnit) -> f64 {
        match (self, target) {
            (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => value * 9.0 / 5.0 + 32.0,
            (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => (value - 32.0) * 5.0 / 9.0,
            _ => value,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_selects_unit() {
        assert_eq!(TemperatureUnit::from_fahrenheit_flag(true), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::from_fahrenheit_flag(false), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::Fahrenheit.to_string(), "°F");
    }

    #[test]
    fn conversion_reference_points() {
        let c = TemperatureUnit::Celsius;
        let f = TemperatureUnit::Fahrenheit;
        assert_eq!(c.convert(100.0, f), 212.0);
        assert_eq!(c.convert(-40.0, f), -40.0);
        assert_eq!(f.convert(32.0, c), 0.0);
        assert_eq!(c.convert(21.5, c), 21.5);
    }

    #[test]
    fn conversion_roundtrip_is_close() {
        let c = TemperatureUnit::Celsius;
        let f = TemperatureUnit::Fahrenheit;
        let back = f.convert(c.convert(23.4, f), c);
        assert!((back - 23.4).abs() < 1e-9);
    }
}
