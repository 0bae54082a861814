//! httpdummy: dummy HTTP server with some diagnostic paths.
//!
//! - `/slow/:duration`  : slow streamed response
//! - `/post[/:duration]`: body sink, optionally paced
//! - `/_status/health`, `/_status/metrics`

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use httpdummy_core::metrics::Registry;
use httpdummy_web::{config::Cli, logging, rlimit, WebBackend};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(Cli::exit_status(&e));
        }
    };
    if cli.help {
        let _ = Cli::command().print_help();
        return ExitCode::from(1);
    }

    if let Err(e) = logging::init() {
        eprintln!("{e}");
        return ExitCode::from(1);
    }
    tracing::info!("Starting httpdummy version: {}", env!("CARGO_PKG_VERSION"));
    rlimit::raise_nofile();

    let backend = match cli.into_config().and_then(|cfg| WebBackend::new(cfg, Registry::global())) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), "error starting web listener: {e}");
            return ExitCode::from(1);
        }
    };

    match backend.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), "{e}");
            ExitCode::from(1)
        }
    }
}
