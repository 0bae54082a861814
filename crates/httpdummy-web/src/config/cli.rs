use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use httpdummy_core::error::Result;

use super::{load_from_file, Config};

/// dummy http server with some diagnostic paths
#[derive(Debug, Parser)]
#[command(name = "httpdummy", version, disable_help_flag = true)]
pub struct Cli {
    /// show help
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// log http requests
    #[arg(long)]
    pub log_http_requests: bool,

    /// answer unknown paths with status 200
    #[arg(long = "code-404-as-200")]
    pub code_404_as_200: bool,

    /// Listen addr [default: 127.0.0.1:3001]
    #[arg(long, env = "LISTEN_ADDR")]
    pub listen_addr: Option<String>,

    /// YAML config file; flags override its values
    #[arg(long, env = "HTTPDUMMY_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Process exit status for an argument error from `try_parse`.
    /// `--version` is a clean exit; usage mistakes exit 1 like `--help` does.
    pub fn exit_status(err: &clap::Error) -> u8 {
        match err.kind() {
            ErrorKind::DisplayVersion => 0,
            _ => 1,
        }
    }

    /// Resolve the effective config: defaults, then the file, then flags.
    pub fn into_config(self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => load_from_file(path)?,
            None => Config::default(),
        };
        if let Some(addr) = self.listen_addr {
            cfg.listen_addr = addr;
        }
        cfg.log_http_requests |= self.log_http_requests;
        cfg.code_404_as_200 |= self.code_404_as_200;
        cfg.validate()?;
        Ok(cfg)
    }
}
