//! Command line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Hash-linked block chain node.
#[derive(Parser, Debug)]
#[command(name = "hashchain-node", version, propagate_version = true)]
pub struct Cli {
    /// Log output format. The filter itself comes from `RUST_LOG`.
    #[arg(
        long,
        global = true,
        env = "HASHCHAIN_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve an in-memory chain over HTTP.
    Serve(ServeArgs),
    /// Validate a chain stored as a JSON array file or a directory of
    /// per-block JSON files.
    Verify(VerifyArgs),
    /// Append two blocks to a fresh chain and print the result.
    Demo,
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address the HTTP API listens on.
    #[arg(long, env = "HASHCHAIN_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Chain file or directory.
    pub path: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output.
    Pretty,
    /// One JSON object per line.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["hashchain-node", "serve"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Pretty);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap())
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn verify_takes_path_and_global_format() {
        let cli =
            Cli::try_parse_from(["hashchain-node", "verify", "chain.json", "--log-format", "json"])
                .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Verify(args) => assert_eq!(args.path, PathBuf::from("chain.json")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_address() {
        assert!(Cli::try_parse_from(["hashchain-node", "serve", "--addr", "nowhere"]).is_err());
    }
}
