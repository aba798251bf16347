use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "corridorwatch", version, about = "Poll traffic conditions along road corridors")]
pub struct Args {
    /// TOML configuration file
    #[arg(long, global = true, default_value = "corridorwatch.toml")]
    pub config: PathBuf,

    /// SQLite database holding polled samples
    #[arg(long, global = true, default_value = "corridorwatch.db")]
    pub database: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the poll scheduler and serve the read API
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },
    /// Run a single poll cycle and exit
    PollOnce,
    /// Load and validate the configuration, then exit
    CheckConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["corridorwatch", "poll-once"]).unwrap();
        assert_eq!(args.config, PathBuf::from("corridorwatch.toml"));
        assert_eq!(args.database, PathBuf::from("corridorwatch.db"));
        assert!(matches!(args.command, Command::PollOnce));
    }

    #[test]
    fn test_serve_bind() {
        let args = Args::try_parse_from([
            "corridorwatch",
            "--config",
            "denver.toml",
            "serve",
            "--bind",
            "0.0.0.0:9000",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("denver.toml"));
        match args.command {
            Command::Serve { bind } => assert_eq!(bind.port(), 9000),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_bind() {
        assert!(Args::try_parse_from(["corridorwatch", "serve", "--bind", "localhost"]).is_err());
    }
}
