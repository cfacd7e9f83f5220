//! Validação e serialização do contrato de dados.
//!
//! Entrada: um payload não tipado (`serde_json::Value`, tipicamente o JSON
//! recebido do dispositivo ou da interface web). Saída: o tipo canônico de
//! [`crate::types`] ou um [`SchemaError`]. Não existe sucesso parcial.
//!
//! Regras comuns a todos os objetos:
//! - campo ausente → [`SchemaError::MissingField`]
//! - campo presente com tipo errado (inclusive `null`) → [`SchemaError::TypeMismatch`]
//! - restrição semântica violada → [`SchemaError::InvalidValue`]
//! - campos extras são ignorados (compatibilidade futura)
//!
//! Caminhos de erro usam a forma `sensors[2].name`; a raiz do payload é `$`.

use crate::types::{
    DeviceConfig, DeviceHints, GraphConfig, GraphSeriesConfig, LiveDataSnapshot, LiveDataStatus,
    Point2D, SensorIdentity, SensorInfo, SensorSeries, TemperatureReading, UpdateMap,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Caminho da raiz do payload nas mensagens de erro.
pub const ROOT: &str = "$";

/// Categoria de um [`SchemaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaErrorKind {
    MissingField,
    TypeMismatch,
    InvalidValue,
}

/// Erros de validação do schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Campo obrigatório ausente: `{field}`")]
    MissingField { field: String },

    #[error("Tipo incompatível em `{field}`: esperado {expected}, recebido {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Valor inválido em `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl SchemaError {
    pub fn kind(&self) -> SchemaErrorKind {
        match self {
            SchemaError::MissingField { .. } => SchemaErrorKind::MissingField,
            SchemaError::TypeMismatch { .. } => SchemaErrorKind::TypeMismatch,
            SchemaError::InvalidValue { .. } => SchemaErrorKind::InvalidValue,
        }
    }

    /// Caminho do campo rejeitado.
    pub fn field(&self) -> &str {
        match self {
            SchemaError::MissingField { field }
            | SchemaError::TypeMismatch { field, .. }
            | SchemaError::InvalidValue { field, .. } => field,
        }
    }
}

// ──────────────────────────────────────────────
// Trait de fio
// ──────────────────────────────────────────────

/// Conversão entre o tipo canônico e sua forma de fio.
///
/// Lei de ida e volta: para todo valor `e` construído com floats finitos,
/// `T::parse(&e.to_wire()) == Ok(e)`.
pub trait WireFormat: Sized {
    fn parse(raw: &Value) -> Result<Self, SchemaError>;
    fn to_wire(&self) -> Value;
}

/// Inverso estrutural de cada `parse_*`.
pub fn serialize<T: WireFormat>(value: &T) -> Value {
    value.to_wire()
}

// ──────────────────────────────────────────────
// Operações públicas
// ──────────────────────────────────────────────

pub fn parse_temperature_reading(raw: &Value) -> Result<TemperatureReading, SchemaError> {
    logged("TemperatureReading", temperature_reading_at(raw, ROOT))
}

pub fn parse_update_mapping(raw: &Value) -> Result<UpdateMap, SchemaError> {
    logged("UpdateMap", update_mapping_at(raw, ROOT))
}

pub fn parse_hints(raw: &Value) -> Result<DeviceHints, SchemaError> {
    logged("DeviceHints", hints_at(raw, ROOT))
}

pub fn parse_device_config(raw: &Value) -> Result<DeviceConfig, SchemaError> {
    logged("DeviceConfig", device_config_at(raw, ROOT))
}

pub fn parse_sensor_info(raw: &Value) -> Result<SensorInfo, SchemaError> {
    logged("SensorInfo", sensor_info_at(raw, ROOT))
}

pub fn parse_sensor_identity(raw: &Value) -> Result<SensorIdentity, SchemaError> {
    logged("SensorIdentity", sensor_identity_at(raw, ROOT))
}

pub fn parse_live_data(raw: &Value) -> Result<LiveDataSnapshot, SchemaError> {
    logged("LiveDataSnapshot", live_data_at(raw, ROOT))
}

pub fn parse_live_status(raw: &Value) -> Result<LiveDataStatus, SchemaError> {
    logged("LiveDataStatus", live_status_at(raw, ROOT))
}

pub fn parse_graph_series(raw: &Value) -> Result<GraphSeriesConfig, SchemaError> {
    logged("GraphSeriesConfig", graph_series_at(raw, ROOT))
}

pub fn parse_graph_config(raw: &Value) -> Result<GraphConfig, SchemaError> {
    logged("GraphConfig", graph_config_at(raw, ROOT))
}

pub fn parse_point(raw: &Value) -> Result<Point2D, SchemaError> {
    logged("Point2D", point_at(raw, ROOT))
}

pub fn parse_sensor_series(raw: &Value) -> Result<SensorSeries, SchemaError> {
    logged("SensorSeries", sensor_series_at(raw, ROOT))
}

fn logged<T>(entity: &str, result: Result<T, SchemaError>) -> Result<T, SchemaError> {
    if let Err(e) = &result {
        debug!("Payload {entity} rejeitado: {e}");
    }
    result
}

// ──────────────────────────────────────────────
// Parsers por entidade
// ──────────────────────────────────────────────

fn temperature_reading_at(raw: &Value, path: &str) -> Result<TemperatureReading, SchemaError> {
    let f = Fields::of(raw, path)?;
    Ok(TemperatureReading {
        serial: f.u64("serial")?,
        name: f.string("name")?,
        time: f.u64("time")?,
        value: f.f64("value")?,
        valid: f.bool("valid")?,
    })
}

fn update_mapping_at(raw: &Value, path: &str) -> Result<UpdateMap, SchemaError> {
    let obj = expect_object(raw, path)?;
    obj.iter()
        .map(|(serial, v)| as_f64(v, &child(path, serial)).map(|value| (serial.clone(), value)))
        .collect()
}

fn hints_at(raw: &Value, path: &str) -> Result<DeviceHints, SchemaError> {
    let f = Fields::of(raw, path)?;
    Ok(DeviceHints {
        time_sync: f.bool("time_sync")?,
        default_password: f.bool("default_password")?,
        radio_problem: f.bool("radio_problem")?,
    })
}

fn sensor_identity_at(raw: &Value, path: &str) -> Result<SensorIdentity, SchemaError> {
    let f = Fields::of(raw, path)?;
    Ok(SensorIdentity {
        serial: f.u64("serial")?,
        name: f.string("name")?,
        valid: f.bool("valid")?,
    })
}

fn live_data_at(raw: &Value, path: &str) -> Result<LiveDataSnapshot, SchemaError> {
    let f = Fields::of(raw, path)?;
    let (items, items_path) = f.array("temperatures")?;
    let temperatures = list(items, &items_path, temperature_reading_at)?;
    let (hints, hints_path) = f.get("hints")?;
    let update = match f.optional("update") {
        Some((v, p)) => Some(update_mapping_at(v, &p)?),
        None => None,
    };
    Ok(LiveDataSnapshot {
        temperatures,
        hints: hints_at(hints, &hints_path)?,
        update,
    })
}

fn live_status_at(raw: &Value, path: &str) -> Result<LiveDataStatus, SchemaError> {
    let f = Fields::of(raw, path)?;
    let (items, items_path) = f.array("config")?;
    let config = list(items, &items_path, sensor_identity_at)?;
    let (hints, hints_path) = f.get("hints")?;
    Ok(LiveDataStatus {
        config,
        hints: hints_at(hints, &hints_path)?,
    })
}

fn graph_series_at(raw: &Value, path: &str) -> Result<GraphSeriesConfig, SchemaError> {
    let f = Fields::of(raw, path)?;
    Ok(GraphSeriesConfig {
        name: f.string("name")?,
        color: f.string("color")?,
    })
}

fn graph_config_at(raw: &Value, path: &str) -> Result<GraphConfig, SchemaError> {
    let f = Fields::of(raw, path)?;
    let (items, items_path) = f.array("config")?;
    Ok(GraphConfig {
        config: list(items, &items_path, graph_series_at)?,
    })
}

fn point_at(raw: &Value, path: &str) -> Result<Point2D, SchemaError> {
    let f = Fields::of(raw, path)?;
    Ok(Point2D {
        x: f.f64("x")?,
        y: f.f64("y")?,
    })
}

fn sensor_series_at(raw: &Value, path: &str) -> Result<SensorSeries, SchemaError> {
    let obj = expect_object(raw, path)?;
    let mut series = SensorSeries::new();
    for (sensor, points) in obj {
        let points_path = child(path, sensor);
        let items = as_array(points, &points_path)?;
        series
            .0
            .insert(sensor.clone(), list(items, &points_path, point_at)?);
    }
    Ok(series)
}

fn sensor_info_at(raw: &Value, path: &str) -> Result<SensorInfo, SchemaError> {
    let f = Fields::of(raw, path)?;
    let serial = f.string("serial")?;
    let connected = f.bool("connected")?;
    // O endpoint GET do dispositivo não envia `visible`
    let visible = match f.optional("visible") {
        Some((v, p)) => as_bool(v, &p)?,
        None => true,
    };
    let name = f.string("name")?;
    if name.is_empty() {
        return Err(SchemaError::InvalidValue {
            field: child(path, "name"),
            reason: "nome do sensor não pode ser vazio".into(),
        });
    }
    Ok(SensorInfo {
        serial,
        connected,
        visible,
        name,
    })
}

fn device_config_at(raw: &Value, path: &str) -> Result<DeviceConfig, SchemaError> {
    let f = Fields::of(raw, path)?;
    let pollinterval = poll_interval(&f)?;
    let fahrenheit = f.bool("fahrenheit")?;
    let (items, items_path) = f.array("sensors")?;
    Ok(DeviceConfig {
        pollinterval,
        fahrenheit,
        sensors: list(items, &items_path, sensor_info_at)?,
    })
}

fn poll_interval(f: &Fields<'_>) -> Result<u64, SchemaError> {
    let (v, field) = f.get("pollinterval")?;
    let Value::Number(n) = v else {
        return Err(mismatch(&field, "integer", v));
    };
    match n.as_u64() {
        Some(0) => Err(SchemaError::InvalidValue {
            field,
            reason: "intervalo deve ser maior que zero".into(),
        }),
        Some(secs) => Ok(secs),
        None if n.is_i64() => Err(SchemaError::InvalidValue {
            field,
            reason: format!("intervalo deve ser maior que zero (recebido {n})"),
        }),
        None => Err(mismatch(&field, "integer", v)),
    }
}

// ──────────────────────────────────────────────
// Acesso a campos
// ──────────────────────────────────────────────

/// Visão de um objeto JSON com o caminho usado nas mensagens de erro.
struct Fields<'a> {
    obj: &'a Map<String, Value>,
    path: &'a str,
}

impl<'a> Fields<'a> {
    fn of(raw: &'a Value, path: &'a str) -> Result<Self, SchemaError> {
        Ok(Self {
            obj: expect_object(raw, path)?,
            path,
        })
    }

    fn get(&self, name: &str) -> Result<(&'a Value, String), SchemaError> {
        let field = child(self.path, name);
        match self.obj.get(name) {
            Some(v) => Ok((v, field)),
            None => Err(SchemaError::MissingField { field }),
        }
    }

    /// Campo opcional: só a ausência conta como ausência, `null` não.
    fn optional(&self, name: &str) -> Option<(&'a Value, String)> {
        self.obj.get(name).map(|v| (v, child(self.path, name)))
    }

    fn u64(&self, name: &str) -> Result<u64, SchemaError> {
        let (v, field) = self.get(name)?;
        as_u64(v, &field)
    }

    fn f64(&self, name: &str) -> Result<f64, SchemaError> {
        let (v, field) = self.get(name)?;
        as_f64(v, &field)
    }

    fn bool(&self, name: &str) -> Result<bool, SchemaError> {
        let (v, field) = self.get(name)?;
        as_bool(v, &field)
    }

    fn string(&self, name: &str) -> Result<String, SchemaError> {
        let (v, field) = self.get(name)?;
        v.as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch(&field, "string", v))
    }

    fn array(&self, name: &str) -> Result<(&'a [Value], String), SchemaError> {
        let (v, field) = self.get(name)?;
        let items = as_array(v, &field)?;
        Ok((items, field))
    }
}

fn list<T>(
    items: &[Value],
    path: &str,
    parse: impl Fn(&Value, &str) -> Result<T, SchemaError>,
) -> Result<Vec<T>, SchemaError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse(item, &format!("{path}[{i}]")))
        .collect()
}

fn child(path: &str, name: &str) -> String {
    if path == ROOT {
        name.to_owned()
    } else {
        format!("{path}.{name}")
    }
}

fn expect_object<'a>(raw: &'a Value, path: &str) -> Result<&'a Map<String, Value>, SchemaError> {
    raw.as_object().ok_or_else(|| mismatch(path, "object", raw))
}

fn as_array<'a>(v: &'a Value, field: &str) -> Result<&'a [Value], SchemaError> {
    v.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| mismatch(field, "array", v))
}

fn as_u64(v: &Value, field: &str) -> Result<u64, SchemaError> {
    v.as_u64()
        .ok_or_else(|| mismatch(field, "non-negative integer", v))
}

fn as_f64(v: &Value, field: &str) -> Result<f64, SchemaError> {
    match v {
        Value::Number(n) => n.as_f64().ok_or_else(|| mismatch(field, "number", v)),
        _ => Err(mismatch(field, "number", v)),
    }
}

fn as_bool(v: &Value, field: &str) -> Result<bool, SchemaError> {
    v.as_bool().ok_or_else(|| mismatch(field, "boolean", v))
}

fn mismatch(field: &str, expected: &'static str, found: &Value) -> SchemaError {
    SchemaError::TypeMismatch {
        field: field.to_owned(),
        expected,
        found: describe(found),
    }
}

fn describe(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_u64() => "integer",
        Value::Number(n) if n.is_i64() => "negative integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ──────────────────────────────────────────────
// Serialização
// ──────────────────────────────────────────────

fn object<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect(),
    )
}

fn array<T: WireFormat>(items: &[T]) -> Value {
    Value::Array(items.iter().map(WireFormat::to_wire).collect())
}

impl WireFormat for TemperatureReading {
    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        parse_temperature_reading(raw)
    }

    fn to_wire(&self) -> Value {
        object([
            ("serial", self.serial.into()),
            ("name", self.name.as_str().into()),
            ("time", self.time.into()),
            ("value", self.value.into()),
            ("valid", self.valid.into()),
        ])
    }
}

impl WireFormat for UpdateMap {
    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        parse_update_mapping(raw)
    }

    fn to_wire(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(serial, value)| (serial.clone(), Value::from(*value)))
                .collect(),
        )
    }
}

impl WireFormat for DeviceHints {
    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        parse_hints(raw)
    }

    fn to_wire(&self) -> Value {
        object([
            ("time_sync", self.time_sync.into()),
            ("default_password", self.default_password.into()),
            ("radio_problem", self.radio_problem.into()),
        ])
    }
}

impl WireFormat for LiveDataSnapshot {
    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        parse_live_data(raw)
    }

    fn to_wire(&self) -> Value {
        let mut wire = object([
            ("temperatures", array(&self.temperatures)),
            ("hints", self.hints.to_wire()),
        ]);
        if let (Some(update), Value::Object(map)) = (&self.update, &mut wire) {
            map.insert("update".into(), update.to_wire());
        }
        wire
    }
}

impl WireFormat for SensorIdentity {
    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        parse_sensor_identity(raw)
    }

    fn to_wire(&self) -> Value {
        object([
            ("serial", self.serial.into()),
            ("name", self.name.as_str().into()),
            ("valid", self.valid.into()),
        ])
    }
}

impl WireFormat for LiveDataStatus {
    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        parse_live_status(raw)
    }

    fn to_wire(&self) -> Value {
        object([
            ("config", array(&self.config)),
            ("hints", self.hints.to_wire()),
        ])
    }
}

impl WireFormat for GraphSeriesConfig {
    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        parse_graph_series(raw)
    }

    fn to_wire(&self) -> Value {
        object([
            ("name", self.name.as_str().into()),
            ("color", self.color.as_str().into()),
        ])
    }
}

impl WireFormat for GraphConfig {
    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        parse_graph_config(raw)
    }

    fn to_wire(&self) -> Value {
        object([("config", array(&self.config))])
    }
}

impl WireFormat for Point2D {
    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        parse_point(raw)
    }

    fn to_wire(&self) -> Value {
        object([("x", self.x.into()), ("y", self.y.into())])
    }
}

impl WireFormat for SensorSeries {
    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        parse_sensor_series(raw)
    }

    fn to_wire(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(sensor, points)| (sensor.clone(), array(points)))
                .collect(),
        )
    }
}

impl WireFormat for SensorInfo {
    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        parse_sensor_info(raw)
    }

    fn to_wire(&self) -> Value {
        object([
            ("serial", self.serial.as_str().into()),
            ("connected", self.connected.into()),
            ("visible", self.visible.into()),
            ("name", self.name.as_str().into()),
        ])
    }
}

impl WireFormat for DeviceConfig {
    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        parse_device_config(raw)
    }

    fn to_wire(&self) -> Value {
        object([
            ("pollinterval", self.pollinterval.into()),
            ("fahrenheit", self.fahrenheit.into()),
            ("sensors", array(&self.sensors)),
        ])
    }
}

/// Faz `Deserialize` (via `#[serde(try_from = "serde_json::Value")]`)
/// passar pelo mesmo validador.
macro_rules! try_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = SchemaError;

                fn try_from(raw: Value) -> Result<Self, Self::Error> {
                    <$ty as WireFormat>::parse(&raw)
                }
            }
        )*
    };
}

try_from_value!(
    TemperatureReading,
    DeviceHints,
    LiveDataSnapshot,
    SensorIdentity,
    LiveDataStatus,
    GraphSeriesConfig,
    GraphConfig,
    Point2D,
    SensorInfo,
    DeviceConfig,
);

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
