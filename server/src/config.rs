use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PATH: &str = "/api/game/ws";
pub const DEFAULT_HEARTBEAT_SECS: u64 = 30;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// What log level to use
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// WebSocket endpoint path
    #[arg(short, long, default_value = DEFAULT_PATH)]
    pub path: String,

    /// Force a seed instead of random, makes every game reproducible
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Seconds between pings, a connection that misses one pong is dropped
    #[arg(long, default_value_t = DEFAULT_HEARTBEAT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub heartbeat_secs: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Always starts with `/`.
    pub path: String,
    pub seed: Option<u64>,
    pub heartbeat: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            path: DEFAULT_PATH.into(),
            seed: None,
            heartbeat: Duration::from_secs(DEFAULT_HEARTBEAT_SECS),
        }
    }
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        let path = if args.path.starts_with('/') {
            args.path.clone()
        } else {
            format!("/{}", args.path)
        };
        Self {
            bind: args.bind,
            path,
            seed: args.seed,
            heartbeat: Duration::from_secs(args.heartbeat_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("wumpus-server").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_match_server_config_default() {
        let args = parse(&[]).unwrap();

        assert_eq!(ServerConfig::from(&args), ServerConfig::default());
        assert_eq!(args.verbose.log_level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "--bind",
            "0.0.0.0:8080",
            "--path",
            "ws",
            "--seed",
            "42",
            "--heartbeat-secs",
            "5",
            "-vv",
        ])
        .unwrap();

        let config = ServerConfig::from(&args);

        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.path, "/ws");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.heartbeat, Duration::from_secs(5));
        assert_eq!(args.verbose.log_level_filter(), log::LevelFilter::Trace);
    }

    #[test]
    fn zero_heartbeat_is_rejected() {
        assert!(parse(&["--heartbeat-secs", "0"]).is_err());
        assert!(parse(&["--seed", "-3"]).is_err());
    }
}
