//! Argumentos de linha de comando.

use crate::check::PayloadKind;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Valida payloads de live data e de configuração do temperature logger
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "templogger_check", version, about, long_about = None)]
pub struct CheckArgs {
    /// Entidade contra a qual o payload é validado
    #[arg(value_enum)]
    pub kind: PayloadKind,

    /// Arquivo JSON (`-` ou ausente = stdin)
    pub input: Option<PathBuf>,

    /// Arquivo TOML (padrão: $TEMPLOGGER_CONFIG ou templogger.toml ao lado do executável)
    #[arg(long, value_name = "CAMINHO")]
    pub config: Option<PathBuf>,

    /// Violações de limite do dispositivo rejeitam o payload
    #[arg(long)]
    pub strict: bool,

    /// Saída JSON em uma linha
    #[arg(long)]
    pub compact: bool,

    /// Imprime a configuração de gráfico sugerida (só device-config)
    #[arg(long)]
    pub graph: bool,
}

impl CheckArgs {
    /// Interpreta os argumentos (com o nome do programa) e aplica as
    /// restrições entre opções.
    pub fn try_parse_checked<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Self::try_parse_from(args)?;
        if args.graph && args.kind != PayloadKind::DeviceConfig {
            return Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "--graph só vale para device-config",
            ));
        }
        Ok(args)
    }

    /// Caminho do payload; `None` = stdin.
    pub fn input_path(&self) -> Option<&Path> {
        self.input.as_deref().filter(|p| *p != Path::new("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CheckArgs, clap::Error> {
        CheckArgs::try_parse_checked(std::iter::once("templogger_check").chain(args.iter().copied()))
    }

    fn error_kind(args: &[&str]) -> ErrorKind {
        parse(args).unwrap_err().kind()
    }

    #[test]
    fn kind_and_file() {
        let args = parse(&["hints", "payload.json", "--strict"]).unwrap();
        assert_eq!(args.kind, PayloadKind::Hints);
        assert_eq!(args.input_path(), Some(Path::new("payload.json")));
        assert!(args.strict);
        assert!(!args.compact);
        assert!(!args.graph);
        assert_eq!(args.config, None);
    }

    #[test]
    fn dash_or_missing_file_means_stdin() {
        let args = parse(&["live", "-", "--config", "x.toml"]).unwrap();
        assert_eq!(args.input_path(), None);
        assert_eq!(args.config, Some(PathBuf::from("x.toml")));

        let args = parse(&["status"]).unwrap();
        assert_eq!(args.input_path(), None);
    }

    #[test]
    fn kebab_case_kinds() {
        assert_eq!(parse(&["device-config"]).unwrap().kind, PayloadKind::DeviceConfig);
        assert_eq!(parse(&["sensor-info"]).unwrap().kind, PayloadKind::SensorInfo);
        assert_eq!(parse(&["graph-config"]).unwrap().kind, PayloadKind::GraphConfig);
    }

    #[test]
    fn help_exits_successfully() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
        assert_eq!(error_kind(&["live", "-h"]), ErrorKind::DisplayHelp);
    }

    #[test]
    fn usage_errors_exit_with_two() {
        assert_eq!(error_kind(&[]), ErrorKind::MissingRequiredArgument);
        assert_eq!(error_kind(&["live", "--verbose"]), ErrorKind::UnknownArgument);
        assert_eq!(error_kind(&["weather"]), ErrorKind::InvalidValue);
        assert_eq!(error_kind(&["hints", "--graph"]), ErrorKind::ArgumentConflict);

        for args in [
            &["live", "--config"][..],
            &["live", "a", "b"][..],
            &["weather"][..],
            &["hints", "--graph"][..],
        ] {
            assert_eq!(parse(args).unwrap_err().exit_code(), 2, "{args:?}");
        }
    }

    #[test]
    fn graph_for_device_config() {
        let args = parse(&["device-config", "--graph", "--compact"]).unwrap();
        assert!(args.graph);
        assert!(args.compact);
    }

    #[test]
    fn command_definition_is_consistent() {
        CheckArgs::command().debug_assert();
    }
}
