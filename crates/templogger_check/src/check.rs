//! Validação de um payload e coleta de avisos.

use crate::error::CliError;
use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::path::Path;
use templogger_core::graph::parse_hex_color;
use templogger_core::limits::{LimitViolation, check_device_config};
use templogger_core::schema::{
    parse_device_config, parse_graph_config, parse_hints, parse_live_data, parse_live_status,
    parse_sensor_info, parse_sensor_series, parse_temperature_reading, parse_update_mapping,
};
use templogger_core::{AppConfig, DeviceHints, GraphConfig, SchemaError, WireFormat};

/// Entidade contra a qual o payload é validado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PayloadKind {
    Temperature,
    Update,
    Hints,
    Live,
    Status,
    DeviceConfig,
    SensorInfo,
    GraphConfig,
    Series,
}

impl PayloadKind {
    pub const ALL: [PayloadKind; 9] = [
        PayloadKind::Temperature,
        PayloadKind::Update,
        PayloadKind::Hints,
        PayloadKind::Live,
        PayloadKind::Status,
        PayloadKind::DeviceConfig,
        PayloadKind::SensorInfo,
        PayloadKind::GraphConfig,
        PayloadKind::Series,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PayloadKind::Temperature => "temperature",
            PayloadKind::Update => "update",
            PayloadKind::Hints => "hints",
            PayloadKind::Live => "live",
            PayloadKind::Status => "status",
            PayloadKind::DeviceConfig => "device-config",
            PayloadKind::SensorInfo => "sensor-info",
            PayloadKind::GraphConfig => "graph-config",
            PayloadKind::Series => "series",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resultado de um payload aceito pelo contrato.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub kind: PayloadKind,
    /// Forma canônica (`to_wire`) do payload
    pub normalized: Value,
    /// Observações que não rejeitam o payload
    pub warnings: Vec<String>,
    /// Violações de limite do dispositivo (só `device-config`)
    pub violations: Vec<LimitViolation>,
    /// Gráfico sugerido para os sensores visíveis (só `device-config`)
    pub suggested_graph: Option<GraphConfig>,
}

impl CheckReport {
    fn new(kind: PayloadKind, normalized: Value) -> Self {
        Self {
            kind,
            normalized,
            warnings: Vec::new(),
            violations: Vec::new(),
            suggested_graph: None,
        }
    }

    /// Em modo estrito, violações de limite também rejeitam o payload.
    pub fn accepted(&self, strict: bool) -> bool {
        !strict || self.violations.is_empty()
    }
}

/// Lê JSON de um arquivo ou, sem caminho, da entrada padrão.
pub fn read_payload(path: Option<&Path>) -> Result<Value, CliError> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(serde_json::from_str(&content)?)
        }
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|source| CliError::Io {
                    path: "<stdin>".into(),
                    source,
                })?;
            Ok(serde_json::from_str(&content)?)
        }
    }
}

/// Valida `raw` como `kind`.
pub fn check_payload(
    kind: PayloadKind,
    raw: &Value,
    config: &AppConfig,
) -> Result<CheckReport, SchemaError> {
    let report = match kind {
        PayloadKind::Temperature => {
            let reading = parse_temperature_reading(raw)?;
            let mut report = CheckReport::new(kind, reading.to_wire());
            if !reading.valid {
                report
                    .warnings
                    .push(format!("Leitura de {:?} inválida; valor obsoleto", reading.name));
            }
            report
        }
        PayloadKind::Update => CheckReport::new(kind, parse_update_mapping(raw)?.to_wire()),
        PayloadKind::Hints => {
            let hints = parse_hints(raw)?;
            let mut report = CheckReport::new(kind, hints.to_wire());
            hint_warnings(&hints, &mut report.warnings);
            report
        }
        PayloadKind::Live => {
            let snapshot = parse_live_data(raw)?;
            let mut report = CheckReport::new(kind, snapshot.to_wire());
            let stale = snapshot.temperatures.len() - snapshot.valid_readings().count();
            if stale > 0 {
                report
                    .warnings
                    .push(format!("{stale} leitura(s) inválida(s) no snapshot"));
            }
            hint_warnings(&snapshot.hints, &mut report.warnings);
            report
        }
        PayloadKind::Status => {
            let status = parse_live_status(raw)?;
            let mut report = CheckReport::new(kind, status.to_wire());
            hint_warnings(&status.hints, &mut report.warnings);
            report
        }
        PayloadKind::DeviceConfig => {
            let device = parse_device_config(raw)?;
            let mut report = CheckReport::new(kind, device.to_wire());
            report.violations = check_device_config(&device, &config.limits);
            report.suggested_graph = Some(GraphConfig::for_sensors(&device.sensors));
            report
        }
        PayloadKind::SensorInfo => CheckReport::new(kind, parse_sensor_info(raw)?.to_wire()),
        PayloadKind::GraphConfig => {
            let graph = parse_graph_config(raw)?;
            let mut report = CheckReport::new(kind, graph.to_wire());
            for series in &graph.config {
                if parse_hex_color(&series.color).is_none() {
                    report.warnings.push(format!(
                        "Cor {:?} da série {:?} não é hexadecimal",
                        series.color, series.name
                    ));
                }
            }
            report
        }
        PayloadKind::Series => {
            let series = parse_sensor_series(raw)?;
            let mut report = CheckReport::new(kind, series.to_wire());
            if config.check.warn_non_monotonic {
                for key in series.non_monotonic_keys() {
                    report
                        .warnings
                        .push(format!("Série {key:?} com x fora de ordem"));
                }
            }
            report
        }
    };
    Ok(report)
}

fn hint_warnings(hints: &DeviceHints, warnings: &mut Vec<String>) {
    if !hints.time_sync {
        warnings.push("Relógio do dispositivo não sincronizado".into());
    }
    if hints.default_password {
        warnings.push("Dispositivo usa a senha padrão".into());
    }
    if hints.radio_problem {
        warnings.push("Problema no rádio do dispositivo".into());
    }
}
