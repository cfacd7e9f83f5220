//! Tipos canônicos do contrato de dados do templogger.
//!
//! Cada conceito tem exatamente uma forma. Os nomes dos campos são os nomes
//! de fio (JSON) usados pelo firmware e pela interface web, inclusive o
//! estilo inconsistente (`pollinterval` vs `time_sync`).
//!
//! `Serialize` é derivado; `Deserialize` passa sempre pelo validador de
//! [`crate::schema`] (`try_from = "serde_json::Value"`).

use crate::serial::parse_serial;
use crate::units::TemperatureUnit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ──────────────────────────────────────────────
// Leituras de temperatura
// ──────────────────────────────────────────────

/// Última leitura de um sensor DS18B20.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct TemperatureReading {
    /// Identificador estável do sensor
    pub serial: u64,
    /// Rótulo configurado pelo usuário
    pub name: String,
    /// Carimbo de tempo bruto do dispositivo (unidade não interpretada)
    pub time: u64,
    /// Valor medido, já na unidade de exibição configurada
    pub value: f64,
    /// `true` somente se a última leitura foi bem-sucedida
    pub valid: bool,
}

impl TemperatureReading {
    /// Valor utilizável da leitura. `None` quando `valid` é falso: nesse caso
    /// `value` é obsoleto, qualquer que seja o número transmitido.
    pub fn current_value(&self) -> Option<f64> {
        self.valid.then_some(self.value)
    }
}

// ──────────────────────────────────────────────
// Energia (pro3em / plugs)
// ──────────────────────────────────────────────

/// Último valor por serial. A ordem das chaves não tem significado; o
/// `BTreeMap` só torna a serialização determinística.
pub type UpdateMap = BTreeMap<String, f64>;

// ──────────────────────────────────────────────
// Hints
// ──────────────────────────────────────────────

/// Flags de estado do dispositivo, sem relação com os valores medidos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct DeviceHints {
    /// Relógio do dispositivo sincronizado
    pub time_sync: bool,
    /// Dispositivo ainda usa a senha de fábrica
    pub default_password: bool,
    /// Link de rádio degradado ou inacessível
    pub radio_problem: bool,
}

impl DeviceHints {
    /// Verdadeiro se alguma flag merece atenção do usuário.
    pub fn has_problems(&self) -> bool {
        !self.time_sync || self.default_password || self.radio_problem
    }
}

// ──────────────────────────────────────────────
// Snapshots de live data
// ──────────────────────────────────────────────

/// Snapshot da visão "live graph".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct LiveDataSnapshot {
    pub temperatures: Vec<TemperatureReading>,
    pub hints: DeviceHints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<UpdateMap>,
}

impl LiveDataSnapshot {
    /// Leitura correspondente a um sensor configurado.
    ///
    /// O serial da configuração é texto hexadecimal; o da leitura é inteiro.
    pub fn reading_for(&self, sensor: &SensorInfo) -> Option<&TemperatureReading> {
        let serial = parse_serial(&sensor.serial)?;
        self.temperatures.iter().find(|t| t.serial == serial)
    }

    /// Leituras cujo valor pode ser exibido.
    pub fn valid_readings(&self) -> impl Iterator<Item = &TemperatureReading> {
        self.temperatures.iter().filter(|t| t.valid)
    }
}

/// Identidade de um sensor na visão "status".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct SensorIdentity {
    pub serial: u64,
    pub name: String,
    pub valid: bool,
}

/// Snapshot da visão "status": identidades em vez de leituras completas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct LiveDataStatus {
    pub config: Vec<SensorIdentity>,
    pub hints: DeviceHints,
}

impl LiveDataStatus {
    pub fn identity(&self, serial: u64) -> Option<&SensorIdentity> {
        self.config.iter().find(|s| s.serial == serial)
    }
}

// ──────────────────────────────────────────────
// Gráficos
// ──────────────────────────────────────────────

/// Uma série do gráfico: rótulo e cor (sintaxe CSS presumida, não validada).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct GraphSeriesConfig {
    pub name: String,
    pub color: String,
}

/// Configuração do gráfico. A ordem define legenda e renderização.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct GraphConfig {
    pub config: Vec<GraphSeriesConfig>,
}

/// Uma amostra plotada (x = tempo, y = valor, por convenção).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

/// Séries de amostras por identificador de sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorSeries(pub BTreeMap<String, Vec<Point2D>>);

impl SensorSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sensor: impl Into<String>, point: Point2D) {
        self.0.entry(sensor.into()).or_default().push(point);
    }

    pub fn points(&self, sensor: &str) -> &[Point2D] {
        self.0.get(sensor).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Chaves cujas amostras não têm `x` monotônico não-decrescente.
    /// O contrato não rejeita esses dados; apenas os reporta.
    pub fn non_monotonic_keys(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, points)| points.windows(2).any(|w| w[1].x < w[0].x))
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

// ──────────────────────────────────────────────
// Configuração do logger
// ──────────────────────────────────────────────

/// Um sensor conhecido pela configuração do dispositivo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct SensorInfo {
    /// Serial em texto hexadecimal, como o dispositivo o formata
    pub serial: String,
    /// Presença física no barramento
    pub connected: bool,
    /// Preferência de exibição, independente de `connected`
    pub visible: bool,
    pub name: String,
}

/// Configuração do temperature logger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct DeviceConfig {
    /// Segundos entre leituras (> 0)
    pub pollinterval: u64,
    /// Preferência de unidade de exibição
    pub fahrenheit: bool,
    pub sensors: Vec<SensorInfo>,
}

impl DeviceConfig {
    pub fn unit(&self) -> TemperatureUnit {
        TemperatureUnit::from_fahrenheit_flag(self.fahrenheit)
    }

    pub fn visible_sensors(&self) -> impl Iterator<Item = &SensorInfo> {
        self.sensors.iter().filter(|s| s.visible)
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(serial: u64, value: f64, valid: bool) -> TemperatureReading {
        TemperatureReading {
            serial,
            name: format!("t{serial}"),
            time: 1_700_000_000,
            value,
            valid,
        }
    }

    fn sensor(serial: &str, visible: bool) -> SensorInfo {
        SensorInfo {
            serial: serial.into(),
            connected: true,
            visible,
            name: format!("sensor {serial}"),
        }
    }

    #[test]
    fn invalid_reading_has_no_current_value() {
        assert_eq!(reading(1, 21.5, true).current_value(), Some(21.5));
        assert_eq!(reading(1, 21.5, false).current_value(), None);
    }

    #[test]
    fn default_hints_report_unsynced_clock() {
        assert!(DeviceHints::default().has_problems());
        let ok = DeviceHints {
            time_sync: true,
            default_password: false,
            radio_problem: false,
        };
        assert!(!ok.has_problems());
    }

    #[test]
    fn reading_for_matches_hex_serial() {
        let snapshot = LiveDataSnapshot {
            temperatures: vec![reading(0x1a2b, 20.0, true), reading(0x00ff, 22.0, false)],
            hints: DeviceHints::default(),
            update: None,
        };
        let found = snapshot.reading_for(&sensor("1a2b", true)).unwrap();
        assert_eq!(found.serial, 0x1a2b);
        assert!(snapshot.reading_for(&sensor("beef", true)).is_none());
        assert!(snapshot.reading_for(&sensor("zz", true)).is_none());
        assert_eq!(snapshot.valid_readings().count(), 1);
    }

    #[test]
    fn status_identity_lookup() {
        let status = LiveDataStatus {
            config: vec![SensorIdentity {
                serial: 7,
                name: "cellar".into(),
                valid: true,
            }],
            hints: DeviceHints::default(),
        };
        assert_eq!(status.identity(7).map(|s| s.name.as_str()), Some("cellar"));
        assert!(status.identity(8).is_none());
    }

    #[test]
    fn series_reports_non_monotonic_keys() {
        let mut series = SensorSeries::new();
        series.push("a", Point2D { x: 1.0, y: 20.0 });
        series.push("a", Point2D { x: 1.0, y: 20.5 });
        series.push("a", Point2D { x: 2.0, y: 21.0 });
        series.push("b", Point2D { x: 5.0, y: 1.0 });
        series.push("b", Point2D { x: 4.0, y: 1.0 });

        assert_eq!(series.points("a").len(), 3);
        assert!(series.points("missing").is_empty());
        assert_eq!(series.non_monotonic_keys(), vec!["b"]);
    }

    #[test]
    fn visible_sensors_ignore_connection_state() {
        let mut hidden = sensor("2", false);
        hidden.connected = true;
        let mut shown = sensor("1", true);
        shown.connected = false;
        let config = DeviceConfig {
            pollinterval: 30,
            fahrenheit: true,
            sensors: vec![shown, hidden],
        };
        let visible: Vec<_> = config.visible_sensors().map(|s| s.serial.as_str()).collect();
        assert_eq!(visible, vec!["1"]);
        assert_eq!(config.unit(), TemperatureUnit::Fahrenheit);
    }
}
