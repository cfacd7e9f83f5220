//! Erros do verificador.

use crate::check::PayloadKind;
use serde_json::Value;
use std::path::PathBuf;
use templogger_core::SchemaError;
use templogger_core::limits::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Erro de I/O em {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON malformado: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload {kind} rejeitado: {source}")]
    Schema {
        kind: PayloadKind,
        source: SchemaError,
        /// Resposta da API do dispositivo (só `device-config`)
        device_code: Option<ErrorCode>,
    },
}

impl CliError {
    /// Rejeição de `raw` pelo contrato.
    pub fn rejected(kind: PayloadKind, raw: &Value, source: SchemaError) -> Self {
        let device_code = (kind == PayloadKind::DeviceConfig)
            .then(|| ErrorCode::for_schema_error(&source, raw));
        CliError::Schema {
            kind,
            source,
            device_code,
        }
    }

    /// 1 = payload rejeitado, 2 = I/O. Erros de uso saem pelo clap, também com 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Json(_) | CliError::Schema { .. } => 1,
            CliError::Io { .. } => 2,
        }
    }

    /// Código que a API do dispositivo usaria para o mesmo payload.
    pub fn device_code(&self) -> Option<ErrorCode> {
        match self {
            CliError::Json(_) => Some(ErrorCode::GenericParseError),
            CliError::Schema { device_code, .. } => *device_code,
            CliError::Io { .. } => None,
        }
    }
}
