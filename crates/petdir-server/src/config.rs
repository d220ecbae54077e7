use clap::Args;
use petdir_core::DEFAULT_POOL_SIZE;
use tokio::net::TcpListener;

/// Startup configuration. Every flag can also come from the environment.
#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    /// Path to the SQLite database file
    #[arg(long, env = "PETDIR_DB", default_value = "petdir.db")]
    pub db: String,

    /// Host name or address to listen on (IPv4, IPv6 or a resolvable name)
    #[arg(long, env = "PETDIR_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Maximum simultaneous store connections
    #[arg(long, env = "PETDIR_POOL_SIZE", default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: usize,
}

impl ServerConfig {
    /// Resolve `host` and bind the listener on the first usable address.
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        config: ServerConfig,
    }

    #[test]
    fn test_flags_override_defaults() {
        let w = Wrapper::parse_from(["petdir-server", "--db", "/tmp/x.db", "--port", "8080", "--pool-size", "4"]);
        assert_eq!(w.config.db, "/tmp/x.db");
        assert_eq!(w.config.port, 8080);
        assert_eq!(w.config.pool_size, 4);
        assert_eq!(w.config.host, "0.0.0.0");
    }

    #[tokio::test]
    async fn test_binds_host_name() {
        let w = Wrapper::parse_from(["petdir-server", "--host", "localhost", "--port", "0"]);
        let listener = w.config.bind().await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_binds_ipv4_literal() {
        let w = Wrapper::parse_from(["petdir-server", "--host", "127.0.0.1", "--port", "0"]);
        let listener = w.config.bind().await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bad_host_rejected() {
        let w = Wrapper::parse_from(["petdir-server", "--host", "not an ip", "--port", "0"]);
        assert!(w.config.bind().await.is_err());
    }
}
