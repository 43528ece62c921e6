//! HTTP engine seam.
//!
//! The connection hands fully-formed POST requests to an [`HttpEngine`] and
//! receives exactly one [`Completion`] per request back on its completion
//! channel. The engine owns pooling, proxies, and DNS.

use std::fmt;

use tokio::sync::mpsc;

use super::error::TransportResult;
use super::failure::HttpFailure;
use super::proxy::ProxyConfig;
use crate::core::HTTP_CONTENT_TYPE;

/// Identifier of an in-flight request, unique per connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// Create a request id from a raw counter value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw counter value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_u64())
    }
}

/// An outbound POST request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Target URL.
    pub url: String,
    /// Request headers.
    pub headers: Vec<(&'static str, String)>,
    /// Request body.
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create a tunnel POST with the fixed content type and exact length.
    pub fn post(url: String, body: Vec<u8>) -> Self {
        let headers = vec![
            ("content-type", HTTP_CONTENT_TYPE.to_string()),
            ("content-length", body.len().to_string()),
        ];
        Self { url, headers, body }
    }

    /// Look up a header by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A successful HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The response body bytes.
    pub body: Vec<u8>,
}

/// Result of one request, posted back to the owning connection.
#[derive(Debug)]
pub struct Completion {
    /// Request this completion belongs to.
    pub id: RequestId,
    /// Response or failure.
    pub outcome: Result<HttpResponse, HttpFailure>,
}

/// One-shot sender for a request's completion.
///
/// Consumed on use, so an engine cannot report the same request twice.
#[derive(Debug)]
pub struct CompletionNotifier {
    id: RequestId,
    tx: mpsc::UnboundedSender<Completion>,
}

impl CompletionNotifier {
    /// Create a notifier posting to `tx`.
    pub fn new(id: RequestId, tx: mpsc::UnboundedSender<Completion>) -> Self {
        Self { id, tx }
    }

    /// Request this notifier reports for.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Post the outcome to the connection.
    ///
    /// Silently dropped if the connection has already detached.
    pub fn complete(self, outcome: Result<HttpResponse, HttpFailure>) {
        let _ = self.tx.send(Completion {
            id: self.id,
            outcome,
        });
    }
}

/// Cancellation handle for an issued request.
pub trait AbortRequest {
    /// Abort the request, suppressing its completion where possible.
    fn abort(self);
}

impl AbortRequest for tokio::task::AbortHandle {
    fn abort(self) {
        tokio::task::AbortHandle::abort(&self);
    }
}

/// Asynchronous HTTP client used by the connection.
///
/// `issue` MUST NOT block. The engine calls `notifier.complete` once the
/// exchange finishes, from any thread.
pub trait HttpEngine {
    /// Handle used to abort an in-flight request.
    type Handle: AbortRequest;

    /// Start a request.
    fn issue(&self, request: HttpRequest, notifier: CompletionNotifier) -> Self::Handle;

    /// Route future requests through `proxy`, or directly when `None`.
    ///
    /// Requests already issued are unaffected.
    fn set_proxy(&mut self, proxy: Option<&ProxyConfig>) -> TransportResult<()>;
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording engine for state machine tests.

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    pub(crate) struct Issued {
        pub request: HttpRequest,
        pub proxy: Option<ProxyConfig>,
        pub notifier: Option<CompletionNotifier>,
        pub aborted: Arc<AtomicBool>,
    }

    #[derive(Default)]
    struct State {
        issued: Vec<Issued>,
        proxy: Option<ProxyConfig>,
    }

    #[derive(Clone, Default)]
    pub(crate) struct MockEngine {
        state: Arc<Mutex<State>>,
    }

    pub(crate) struct MockHandle(Arc<AtomicBool>);

    impl AbortRequest for MockHandle {
        fn abort(self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    impl MockEngine {
        pub fn issued_count(&self) -> usize {
            self.state.lock().unwrap().issued.len()
        }

        pub fn request(&self, index: usize) -> HttpRequest {
            self.state.lock().unwrap().issued[index].request.clone()
        }

        pub fn proxy_of(&self, index: usize) -> Option<ProxyConfig> {
            self.state.lock().unwrap().issued[index].proxy.clone()
        }

        pub fn is_aborted(&self, index: usize) -> bool {
            self.state.lock().unwrap().issued[index]
                .aborted
                .load(Ordering::SeqCst)
        }

        pub fn complete(&self, index: usize, outcome: Result<HttpResponse, HttpFailure>) {
            let notifier = self.state.lock().unwrap().issued[index]
                .notifier
                .take()
                .expect("request already completed");
            notifier.complete(outcome);
        }

        pub fn respond(&self, index: usize, body: Vec<u8>) {
            self.complete(index, Ok(HttpResponse { status: 200, body }));
        }
    }

    impl HttpEngine for MockEngine {
        type Handle = MockHandle;

        fn issue(&self, request: HttpRequest, notifier: CompletionNotifier) -> MockHandle {
            let aborted = Arc::new(AtomicBool::new(false));
            let mut state = self.state.lock().unwrap();
            let proxy = state.proxy.clone();
            state.issued.push(Issued {
                request,
                proxy,
                notifier: Some(notifier),
                aborted: Arc::clone(&aborted),
            });
            MockHandle(aborted)
        }

        fn set_proxy(&mut self, proxy: Option<&ProxyConfig>) -> TransportResult<()> {
            self.state.lock().unwrap().proxy = proxy.cloned();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new(7);
        assert_eq!(id.as_u64(), 7);
        assert_eq!(id.to_string(), "#7");
    }

    #[test]
    fn test_post_headers() {
        let request = HttpRequest::post("http://a:80/api".into(), vec![0u8; 12]);
        assert_eq!(request.header("Content-Type"), Some(HTTP_CONTENT_TYPE));
        assert_eq!(request.header("content-length"), Some("12"));
        assert_eq!(request.header("x-missing"), None);
    }

    #[test]
    fn test_notifier_posts_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let notifier = CompletionNotifier::new(RequestId::new(7), tx);
        assert_eq!(notifier.id(), RequestId::new(7));

        notifier.complete(Ok(HttpResponse {
            status: 200,
            body: vec![],
        }));

        let completion = rx.try_recv().unwrap();
        assert_eq!(completion.id, RequestId::new(7));
        assert!(completion.outcome.is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_notifier_after_detach() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let notifier = CompletionNotifier::new(RequestId::new(1), tx);
        notifier.complete(Err(HttpFailure::from_status(500, "late")));
    }
}
