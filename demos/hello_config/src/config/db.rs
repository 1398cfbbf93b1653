//! Database settings.

// @Configuration
/// Connection settings for the backing store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbConfig {
    /// Connection string.
    pub url: String,
    /// Maximum pooled connections.
    pub pool: u32, // key = "poolSize"
}

// @DefaultConfig
// String::from("sqlite://hello.db") dbConfig.url

// @DefaultConfig
// 4 dbConfig.poolSize
