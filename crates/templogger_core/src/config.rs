//! Configuração unificada via TOML.
//!
//! Um único `templogger.toml` com os limites do dispositivo e as opções do
//! verificador.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Nome do arquivo de configuração padrão.
pub const CONFIG_FILE_NAME: &str = "templogger.toml";

/// Variável de ambiente que sobrepõe o caminho padrão.
pub const CONFIG_ENV_VAR: &str = "TEMPLOGGER_CONFIG";

/// Erros ao persistir a configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro de serialização TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Erro de I/O em {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Limites que o firmware aplica ao aceitar uma configuração.
///
/// São mais estritos que o contrato (que só exige `pollinterval > 0`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceLimits {
    /// Intervalo mínimo de leitura (s)
    pub min_poll_interval_secs: u64,
    /// Intervalo máximo de leitura (s)
    pub max_poll_interval_secs: u64,
    /// Sensores configuráveis
    pub max_sensors: usize,
    /// Tamanho máximo do nome do sensor (bytes)
    pub max_name_len: usize,
}

impl Default for DeviceLimits {
    fn default() -> Self {
        Self {
            min_poll_interval_secs: 5,
            max_poll_interval_secs: 3600,
            max_sensors: 30,
            max_name_len: 31,
        }
    }
}

/// Opções do verificador de linha de comando.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Violação de limite do dispositivo também rejeita o payload
    pub strict: bool,
    /// Saída JSON indentada
    pub pretty: bool,
    /// Avisar sobre séries com `x` fora de ordem
    pub warn_non_monotonic: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            strict: false,
            pretty: true,
            warn_non_monotonic: true,
        }
    }
}

/// Configuração raiz.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub check: CheckConfig,
    pub limits: DeviceLimits,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    ///
    /// Arquivo ausente ou inválido resulta na configuração padrão, que
    /// reproduz os limites do firmware.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{} ausente, usando limites padrão do firmware", path.display());
                return AppConfig::default();
            }
            Err(e) => {
                warn!("Erro ao ler {}: {}", path.display(), e);
                return AppConfig::default();
            }
        };

        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!(
                    "Configuração carregada de {} (intervalo {}..={} s, {} sensores)",
                    path.display(),
                    config.limits.min_poll_interval_secs,
                    config.limits.max_poll_interval_secs,
                    config.limits.max_sensors
                );
                config
            }
            Err(e) => {
                warn!("Erro ao parsear {}: {}", path.display(), e);
                AppConfig::default()
            }
        }
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Caminho do `templogger.toml`: `$TEMPLOGGER_CONFIG` se definida, senão
    /// ao lado do executável.
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let limits = &self.limits;

        if limits.min_poll_interval_secs == 0 {
            errors.push("Intervalo mínimo de leitura não pode ser 0".into());
        }
        if limits.min_poll_interval_secs > limits.max_poll_interval_secs {
            errors.push(format!(
                "Intervalo mínimo ({}) maior que o máximo ({})",
                limits.min_poll_interval_secs, limits.max_poll_interval_secs
            ));
        }
        if limits.max_sensors == 0 {
            errors.push("Número máximo de sensores não pode ser 0".into());
        }
        if limits.max_name_len == 0 {
            errors.push("Tamanho máximo do nome não pode ser 0".into());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("templogger-{tag}-{}.toml", std::process::id()))
    }

    #[test]
    fn defaults_match_firmware_limits() {
        let config = AppConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.limits.min_poll_interval_secs, 5);
        assert_eq!(config.limits.max_poll_interval_secs, 3600);
        assert_eq!(config.limits.max_sensors, 30);
        assert_eq!(config.limits.max_name_len, 31);
    }

    #[test]
    fn check_and_limits_sections() {
        let content = r#"
[check]
strict = true
warn_non_monotonic = false

[limits]
max_poll_interval_secs = 600
max_name_len = 15
"#;
        let config: AppConfig = toml::from_str(content).unwrap();
        assert!(config.check.strict);
        assert!(config.check.pretty);
        assert!(!config.check.warn_non_monotonic);
        assert_eq!(config.limits.min_poll_interval_secs, 5);
        assert_eq!(config.limits.max_poll_interval_secs, 600);
        assert_eq!(config.limits.max_sensors, 30);
        assert_eq!(config.limits.max_name_len, 15);
    }

    #[test]
    fn validate_reports_each_bad_limit() {
        let mut config = AppConfig::default();
        config.limits.min_poll_interval_secs = 100;
        config.limits.max_poll_interval_secs = 10;
        config.limits.max_sensors = 0;
        assert_eq!(config.validate().len(), 2);

        config.limits = DeviceLimits {
            min_poll_interval_secs: 0,
            max_name_len: 0,
            ..DeviceLimits::default()
        };
        assert_eq!(config.validate().len(), 2);
    }

    #[test]
    fn saved_file_keeps_custom_limits() {
        let path = temp_path("config-save");
        let mut config = AppConfig::default();
        config.check.strict = true;
        config.limits.max_sensors = 8;

        config.save(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded = AppConfig::load(&path);
        let _ = std::fs::remove_file(&path);

        assert!(content.contains("[limits]"));
        assert!(content.contains("max_sensors = 8"));
        assert_eq!(loaded, config);
    }

    #[test]
    fn unreadable_or_invalid_file_falls_back_to_default() {
        let missing = AppConfig::load(Path::new("/nonexistent/templogger.toml"));
        assert_eq!(missing, AppConfig::default());

        let path = temp_path("config-invalid");
        std::fs::write(&path, "[limits]\nmax_sensors = \"muitos\"\n").unwrap();
        let loaded = AppConfig::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn default_path_ends_with_file_name() {
        if std::env::var_os(CONFIG_ENV_VAR).is_none() {
            assert!(AppConfig::default_path().ends_with(CONFIG_FILE_NAME));
        }
    }
}
