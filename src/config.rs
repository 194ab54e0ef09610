use std::net::{IpAddr, Ipv4Addr};

use clap::Parser;
use tracing::Level;

use crate::codec::DEFAULT_MAX_BULK_LEN;

const PORT: u16 = 6379;

/// Server settings, read from the command line with environment variable fallbacks.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// The address to bind to
    #[arg(short, long, env = "MINIDIS_BIND", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub bind: IpAddr,

    /// The port to listen on
    #[arg(short, long, env = "MINIDIS_PORT", default_value_t = PORT)]
    pub port: u16,

    /// Largest bulk string accepted from a client, in bytes
    #[arg(long, env = "MINIDIS_MAX_BULK_LEN", default_value_t = DEFAULT_MAX_BULK_LEN)]
    pub max_bulk_len: usize,

    /// Maximum level of the emitted logs
    #[arg(short, long, env = "MINIDIS_LOG_LEVEL", default_value_t = Level::INFO)]
    pub log_level: Level,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["minidis"]).unwrap();

        assert_eq!(config.bind, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.port, 6379);
        assert_eq!(config.max_bulk_len, DEFAULT_MAX_BULK_LEN);
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn from_args() {
        let config = Config::try_parse_from([
            "minidis",
            "--bind",
            "0.0.0.0",
            "--port",
            "7000",
            "--max-bulk-len",
            "1024",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(config.bind, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.port, 7000);
        assert_eq!(config.max_bulk_len, 1024);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn invalid_port() {
        assert!(Config::try_parse_from(["minidis", "--port", "70000"]).is_err());
    }
}
