use std::net::{IpAddr, SocketAddr};

use anyhow::Context;

pub const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("ADVISOR_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host
            .trim()
            .parse::<IpAddr>()
            .with_context(|| format!("ADVISOR_HOST is not an IP address: {host}"))?;

        let port = match lookup("ADVISOR_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("ADVISOR_PORT is not a valid port: {raw}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self { host, port })
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
