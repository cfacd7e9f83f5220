//! # Templogger Core
//!
//! Contrato de dados compartilhado entre o temperature logger e seus
//! clientes: tipos canônicos, validação de payloads JSON, serialização
//! simétrica e configuração TOML.
//!
//! ## Módulos
//! - [`types`] – Leituras, hints, snapshots, gráficos e configuração do logger
//! - [`schema`] – Validação (`parse_*`) e serialização (`to_wire`)
//! - [`limits`] – Limites do firmware e códigos de erro da API
//! - [`serial`] – Seriais em texto hexadecimal
//! - [`units`] – Celsius / Fahrenheit
//! - [`graph`] – Cores e séries de gráfico
//! - [`config`] – Configuração unificada via TOML

pub mod types;
pub mod schema;
pub mod limits;
pub mod serial;
pub mod units;
pub mod graph;
pub mod config;

// Re-exports convenientes
pub use types::{
    DeviceConfig, DeviceHints, GraphConfig, GraphSeriesConfig, LiveDataSnapshot, LiveDataStatus,
    Point2D, SensorIdentity, SensorInfo, SensorSeries, TemperatureReading, UpdateMap,
};
pub use schema::{SchemaError, SchemaErrorKind, WireFormat, serialize};
pub use config::{AppConfig, CheckConfig, DeviceLimits};
