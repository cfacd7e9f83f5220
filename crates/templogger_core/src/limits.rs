//! Limites do dispositivo e códigos de erro da API.
//!
//! O contrato aceita qualquer `pollinterval > 0`, mas o firmware recusa
//! configurações fora dos seus limites e trunca ou ignora outras. Este módulo
//! reporta essas violações sem rejeitar o payload; cabe ao chamador decidir.

use crate::config::DeviceLimits;
use crate::schema::{SchemaError, SchemaErrorKind};
use crate::serial::parse_serial;
use crate::types::DeviceConfig;
use serde_json::Value;

/// Códigos numéricos com que a API de configuração do dispositivo recusa um
/// POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    GenericParseError,
    GenericValueMissing,
    PollIntervalTooSmall,
    PollIntervalTooBig,
}

impl ErrorCode {
    pub fn code(self) -> u16 {
        match self {
            ErrorCode::GenericParseError => 1004,
            ErrorCode::GenericValueMissing => 1005,
            ErrorCode::PollIntervalTooSmall => 2001,
            ErrorCode::PollIntervalTooBig => 2002,
        }
    }

    /// Código com que o dispositivo responderia a uma configuração que o
    /// contrato rejeitou.
    ///
    /// O firmware primeiro exige `pollinterval` em 16 bits sem sinal,
    /// `fahrenheit` booleano e `sensors` array (senão 1005). Só depois compara
    /// o intervalo com o mínimo, então apenas `pollinterval: 0` com o resto do
    /// envelope correto chega a 2001.
    pub fn for_schema_error(err: &SchemaError, raw: &Value) -> Self {
        let zero_interval = err.kind() == SchemaErrorKind::InvalidValue
            && err.field() == "pollinterval"
            && raw.get("pollinterval").and_then(Value::as_u64) == Some(0);
        let envelope_ok = raw.get("fahrenheit").is_some_and(Value::is_boolean)
            && raw.get("sensors").is_some_and(Value::is_array);

        if zero_interval && envelope_ok {
            ErrorCode::PollIntervalTooSmall
        } else {
            ErrorCode::GenericValueMissing
        }
    }
}

/// Uma violação de limite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitViolation {
    pub field: String,
    pub message: String,
    /// Código da recusa do dispositivo. `None` quando o firmware aceita o
    /// POST mas trunca ou descarta o valor.
    pub code: Option<ErrorCode>,
}

impl LimitViolation {
    /// O dispositivo recusaria a configuração inteira.
    pub fn is_rejection(&self) -> bool {
        self.code.is_some()
    }
}

/// Verifica uma configuração contra os limites do dispositivo.
pub fn check_device_config(config: &DeviceConfig, limits: &DeviceLimits) -> Vec<LimitViolation> {
    let mut violations = Vec::new();

    if config.pollinterval > u64::from(u16::MAX) {
        push(
            &mut violations,
            "pollinterval",
            format!(
                "Intervalo {} não cabe em 16 bits sem sinal",
                config.pollinterval
            ),
            Some(ErrorCode::GenericValueMissing),
        );
    } else if config.pollinterval < limits.min_poll_interval_secs {
        push(
            &mut violations,
            "pollinterval",
            format!(
                "Intervalo mínimo é {} segundos (recebido {})",
                limits.min_poll_interval_secs, config.pollinterval
            ),
            Some(ErrorCode::PollIntervalTooSmall),
        );
    } else if config.pollinterval > limits.max_poll_interval_secs {
        push(
            &mut violations,
            "pollinterval",
            format!(
                "Intervalo máximo é {} segundos (recebido {})",
                limits.max_poll_interval_secs, config.pollinterval
            ),
            Some(ErrorCode::PollIntervalTooBig),
        );
    }

    if config.sensors.len() > limits.max_sensors {
        push(
            &mut violations,
            "sensors",
            format!(
                "Só os primeiros {} sensores são gravados (recebidos {})",
                limits.max_sensors,
                config.sensors.len()
            ),
            None,
        );
    }

    for (i, sensor) in config.sensors.iter().enumerate() {
        match parse_serial(&sensor.serial) {
            Some(0) | None => push(
                &mut violations,
                &format!("sensors[{i}].serial"),
                format!("Serial {:?} é gravado como 0 (slot livre)", sensor.serial),
                None,
            ),
            Some(_) => {}
        }
        if sensor.name.len() > limits.max_name_len {
            push(
                &mut violations,
                &format!("sensors[{i}].name"),
                format!(
                    "Nome com {} bytes é truncado em {}",
                    sensor.name.len(),
                    limits.max_name_len
                ),
                None,
            );
        }
    }

    violations
}

fn push(
    violations: &mut Vec<LimitViolation>,
    field: &str,
    message: String,
    code: Option<ErrorCode>,
) {
    violations.push(LimitViolation {
        field: field.into(),
        message,
        code,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SensorInfo;
    use serde_json::json;

    fn config(pollinterval: u64, sensors: usize) -> DeviceConfig {
        DeviceConfig {
            pollinterval,
            fahrenheit: false,
            sensors: (1..=sensors)
                .map(|i| SensorInfo {
                    serial: format!("{i:x}"),
                    connected: true,
                    visible: true,
                    name: format!("sensor {i}"),
                })
                .collect(),
        }
    }

    fn codes(violations: &[LimitViolation]) -> Vec<Option<u16>> {
        violations.iter().map(|v| v.code.map(ErrorCode::code)).collect()
    }

    #[test]
    fn no_violations_within_limits() {
        let limits = DeviceLimits::default();
        assert!(check_device_config(&config(5, 3), &limits).is_empty());
        assert!(check_device_config(&config(3600, 30), &limits).is_empty());
    }

    #[test]
    fn poll_interval_bounds() {
        let limits = DeviceLimits::default();
        assert_eq!(codes(&check_device_config(&config(4, 1), &limits)), vec![Some(2001)]);
        assert_eq!(codes(&check_device_config(&config(3601, 1), &limits)), vec![Some(2002)]);
        assert_eq!(codes(&check_device_config(&config(65535, 1), &limits)), vec![Some(2002)]);
    }

    #[test]
    fn interval_beyond_u16_is_value_missing() {
        let limits = DeviceLimits::default();
        assert_eq!(codes(&check_device_config(&config(65536, 1), &limits)), vec![Some(1005)]);
        assert_eq!(codes(&check_device_config(&config(70000, 1), &limits)), vec![Some(1005)]);
    }

    #[test]
    fn too_many_sensors_are_dropped_not_rejected() {
        let violations = check_device_config(&config(60, 31), &DeviceLimits::default());
        assert_eq!(codes(&violations), vec![None]);
        assert_eq!(violations[0].field, "sensors");
        assert!(!violations[0].is_rejection());
    }

    #[test]
    fn bad_serials_and_long_names() {
        let mut cfg = config(60, 3);
        cfg.sensors[0].serial = "0".into();
        cfg.sensors[1].serial = "not-hex".into();
        cfg.sensors[2].name = "x".repeat(32);

        let violations = check_device_config(&cfg, &DeviceLimits::default());
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["sensors[0].serial", "sensors[1].serial", "sensors[2].name"]);
        assert!(violations.iter().all(|v| !v.is_rejection()));
    }

    #[test]
    fn custom_limits_apply() {
        let limits = DeviceLimits {
            min_poll_interval_secs: 1,
            max_poll_interval_secs: 10,
            max_sensors: 2,
            max_name_len: 31,
        };
        assert!(check_device_config(&config(1, 2), &limits).is_empty());
        assert_eq!(codes(&check_device_config(&config(11, 3), &limits)), vec![Some(2002), None]);
    }

    fn rejected(raw: &Value) -> ErrorCode {
        let err = crate::schema::parse_device_config(raw).unwrap_err();
        ErrorCode::for_schema_error(&err, raw)
    }

    #[test]
    fn zero_interval_maps_to_too_small() {
        let raw = json!({"pollinterval": 0, "fahrenheit": false, "sensors": []});
        assert_eq!(rejected(&raw), ErrorCode::PollIntervalTooSmall);

        let no_unit = json!({"pollinterval": 0, "sensors": []});
        assert_eq!(rejected(&no_unit), ErrorCode::GenericValueMissing);
    }

    #[test]
    fn negative_interval_maps_to_value_missing() {
        let raw = json!({"pollinterval": -5, "fahrenheit": false, "sensors": []});
        assert_eq!(rejected(&raw).code(), 1005);
    }

    #[test]
    fn other_rejections_map_to_value_missing() {
        let raw = json!({"pollinterval": 30, "sensors": []});
        assert_eq!(rejected(&raw), ErrorCode::GenericValueMissing);

        let empty_name = json!({"pollinterval": 30, "fahrenheit": true, "sensors": [
            {"serial": "28ff", "connected": true, "name": ""}
        ]});
        assert_eq!(rejected(&empty_name), ErrorCode::GenericValueMissing);
    }
}
