//! # Templogger Check
//!
//! Valida payloads de live data e de configuração do temperature logger
//! contra o contrato de dados e imprime a forma canônica.
//!
//! ## Uso
//! ```bash
//! templogger_check live snapshot.json
//! curl -s http://logger/api/templogger/config | templogger_check device-config --strict
//! ```
//!
//! Saída: 0 = payload aceito, 1 = payload rejeitado, 2 = erro de uso ou I/O.

mod args;
mod check;
mod error;

use args::CheckArgs;
use check::{check_payload, read_payload};
use error::CliError;
use std::process::ExitCode;
use templogger_core::config::AppConfig;
use templogger_core::WireFormat;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Erros de uso e --help/--version saem pelo clap (2 e 0)
    let args = match CheckArgs::try_parse_checked(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    // ── Config ──
    let config = load_config(&args);

    match run(&args, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            match e.device_code() {
                Some(code) => error!("{e} (código {})", code.code()),
                None => error!("{e}"),
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn load_config(args: &CheckArgs) -> AppConfig {
    let config = match &args.config {
        Some(path) => AppConfig::load(path),
        None => {
            let path = AppConfig::default_path();
            let config = AppConfig::load(&path);
            // Salva config padrão se não existir
            if !path.exists() {
                if let Err(e) = config.save(&path) {
                    warn!("Não foi possível salvar config padrão: {e}");
                }
            }
            config
        }
    };

    for problem in config.validate() {
        warn!("Configuração: {problem}");
    }
    config
}

/// Retorna `Ok(false)` quando o payload é válido mas rejeitado em modo estrito.
fn run(args: &CheckArgs, config: &AppConfig) -> Result<bool, CliError> {
    let strict = args.strict || config.check.strict;
    let pretty = config.check.pretty && !args.compact;

    let raw = read_payload(args.input_path())?;
    let report = check_payload(args.kind, &raw, config)
        .map_err(|e| CliError::rejected(args.kind, &raw, e))?;

    for warning in &report.warnings {
        warn!("{warning}");
    }
    for violation in &report.violations {
        match violation.code {
            Some(code) => warn!(
                "Dispositivo recusaria `{}`: {} (código {})",
                violation.field,
                violation.message,
                code.code()
            ),
            None => warn!("Limite do dispositivo em `{}`: {}", violation.field, violation.message),
        }
    }

    let output = match (&report.suggested_graph, args.graph) {
        (Some(graph), true) => graph.to_wire(),
        _ => report.normalized.clone(),
    };
    let text = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{text}");

    let accepted = report.accepted(strict);
    if accepted {
        info!(
            "Payload {} aceito ({} aviso(s))",
            report.kind,
            report.warnings.len() + report.violations.len()
        );
    } else {
        error!(
            "Payload {} rejeitado em modo estrito: {} violação(ões) de limite",
            report.kind,
            report.violations.len()
        );
    }
    Ok(accepted)
}
