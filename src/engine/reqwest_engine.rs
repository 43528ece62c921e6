//! [`reqwest`]-backed implementation of [`HttpEngine`].

use std::error::Error as StdError;
use std::io;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::debug;

use super::config::EngineConfig;
use crate::transport::{
    CompletionNotifier, FailureCategory, HttpEngine, HttpFailure, HttpRequest, HttpResponse,
    ProxyConfig, TransportError, TransportResult,
};

/// A [`reqwest`]-backed [`HttpEngine`].
///
/// Each request runs in its own task on the runtime that created the engine.
/// Changing the proxy swaps the client; requests already spawned keep the
/// client they were built with.
#[derive(Debug)]
pub struct ReqwestEngine {
    client: reqwest::Client,
    config: EngineConfig,
    proxied: bool,
    runtime: Handle,
}

impl ReqwestEngine {
    /// Create an engine with default settings.
    ///
    /// # Errors
    ///
    /// Fails outside a tokio runtime or if the client cannot be built.
    pub fn new() -> TransportResult<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine from `config`.
    ///
    /// # Errors
    ///
    /// Fails outside a tokio runtime, on an invalid proxy, or if the client
    /// cannot be built.
    pub fn with_config(config: EngineConfig) -> TransportResult<Self> {
        let runtime = Handle::try_current().map_err(|e| TransportError::Engine(e.to_string()))?;
        let client = build_client(&config, config.proxy.as_ref())?;
        let proxied = config.proxy.is_some();
        Ok(Self {
            client,
            config,
            proxied,
            runtime,
        })
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl HttpEngine for ReqwestEngine {
    type Handle = AbortHandle;

    fn issue(&self, request: HttpRequest, notifier: CompletionNotifier) -> AbortHandle {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        builder = builder.body(request.body);

        let proxied = self.proxied;
        let task = self.runtime.spawn(async move {
            let outcome = execute(builder, proxied).await;
            if let Err(failure) = &outcome {
                debug!(id = %notifier.id(), category = %failure.category, "request failed");
            }
            notifier.complete(outcome);
        });
        task.abort_handle()
    }

    fn set_proxy(&mut self, proxy: Option<&ProxyConfig>) -> TransportResult<()> {
        self.client = build_client(&self.config, proxy)?;
        self.proxied = proxy.is_some();
        Ok(())
    }
}

fn build_client(config: &EngineConfig, proxy: Option<&ProxyConfig>) -> TransportResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(config.user_agent.as_str());

    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }

    builder = match proxy {
        Some(proxy) => {
            let proxy = reqwest::Proxy::all(proxy.to_url()?)
                .map_err(|e| TransportError::Engine(e.to_string()))?;
            builder.proxy(proxy)
        }
        None => builder.no_proxy(),
    };

    builder
        .build()
        .map_err(|e| TransportError::Engine(e.to_string()))
}

async fn execute(
    builder: reqwest::RequestBuilder,
    proxied: bool,
) -> Result<HttpResponse, HttpFailure> {
    let response = builder.send().await.map_err(|e| classify(&e, proxied))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HttpFailure::from_status(
            status.as_u16(),
            status.canonical_reason().unwrap_or("unexpected status"),
        ));
    }

    let body = response.bytes().await.map_err(|e| classify(&e, proxied))?;
    Ok(HttpResponse {
        status: status.as_u16(),
        body: body.to_vec(),
    })
}

/// Classify a reqwest error for logging.
fn classify(err: &reqwest::Error, proxied: bool) -> HttpFailure {
    let category = if err.is_timeout() {
        FailureCategory::Timeout
    } else if err.is_connect() {
        match connect_category(err) {
            FailureCategory::Network if proxied => FailureCategory::Proxy,
            category => category,
        }
    } else if err.is_body() || err.is_decode() {
        FailureCategory::Content
    } else if err.is_request() || err.is_redirect() || err.is_builder() {
        FailureCategory::Protocol
    } else {
        FailureCategory::Unknown
    };

    HttpFailure {
        category,
        status: err.status().map(|status| status.as_u16()),
        message: err.to_string(),
    }
}

fn connect_category(err: &(dyn StdError + 'static)) -> FailureCategory {
    let mut source = Some(err);
    while let Some(e) = source {
        if let Some(io) = e.downcast_ref::<io::Error>() {
            match io.kind() {
                io::ErrorKind::ConnectionRefused => return FailureCategory::ConnectionRefused,
                io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
                    return FailureCategory::RemoteHostClosed;
                }
                io::ErrorKind::TimedOut => return FailureCategory::Timeout,
                _ => {}
            }
        }
        if e.to_string().contains("dns error") {
            return FailureCategory::HostNotFound;
        }
        source = e.source();
    }
    FailureCategory::Network
}
