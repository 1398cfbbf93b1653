//! Listener settings.

// @Configuration
/// Where the service listens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Listening port.
    pub port: u16,
    /// Transport security.
    pub tls: TlsConfig,
}

// @Configuration
/// Transport security switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// Whether TLS is enabled.
    pub enabled: bool,
    /// Certificate chain, if TLS is enabled.
    pub certificate: Option<String>, // key = "cert"
}

// @DefaultConfig
/// Listener defaults.
#[must_use]
pub fn default_server() -> ServerConfig {
    ServerConfig {
        host: String::from("127.0.0.1"),
        port: 8080,
        tls: TlsConfig::default(),
    }
}
