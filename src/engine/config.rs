//! HTTP engine configuration.

use std::time::Duration;

use crate::transport::ProxyConfig;

/// Default user agent sent with tunnel requests.
pub const DEFAULT_USER_AGENT: &str = concat!("tunnel-http-transport/", env!("CARGO_PKG_VERSION"));

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Timeout for a whole request, or none to leave it to the supervisor.
    pub request_timeout: Option<Duration>,

    /// Timeout for establishing the TCP connection.
    pub connect_timeout: Option<Duration>,

    /// User agent header.
    pub user_agent: String,

    /// Proxy used from the start.
    pub proxy: Option<ProxyConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Set the whole-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the initial proxy.
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ProxyKind;

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
        assert!(config.user_agent.starts_with("tunnel-http-transport/"));
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_config_builder() {
        let proxy = ProxyConfig::new(ProxyKind::Http, "10.0.0.1", 3128);
        let config = EngineConfigBuilder::new()
            .request_timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(3))
            .user_agent("test-agent")
            .proxy(proxy.clone())
            .build();

        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.proxy, Some(proxy));
    }
}
