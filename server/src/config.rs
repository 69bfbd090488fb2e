use std::net::SocketAddr;

/// Process-wide settings, built from positional `std::env::args()` the way
/// the teacher's binaries take theirs, not a `config`/`clap`-driven setup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Checked against the `X-Admin-Token` header on the god-view route.
    /// Not a security boundary (spec.md §1) — a plain string compare.
    pub admin_token: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: "0.0.0.0:8080".parse().unwrap(),
            admin_token: "dev-admin-token".to_string(),
        }
    }
}

impl ServerConfig {
    /// Parses `[bind_addr] [admin_token]` positional args, falling back to
    /// defaults for anything omitted.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
        let mut config = ServerConfig::default();
        if let Some(addr) = args.next() {
            if let Ok(parsed) = addr.parse() {
                config.bind_addr = parsed;
            }
        }
        if let Some(token) = args.next() {
            config.admin_token = token;
        }
        config
    }
}
