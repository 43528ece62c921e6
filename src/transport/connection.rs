//! HTTP connection state machine.
//!
//! Every outbound frame becomes one POST to `http://<host>:80/api`. The
//! connection starts in [`ConnectionStatus::Connecting`], sends a handshake
//! probe, and only becomes [`ConnectionStatus::Ready`] once a response echoes
//! the probe's nonce.
//!
//! The owner drives the connection from a single task: completions posted by
//! the engine are queued on a per-connection channel and applied through
//! [`HttpConnection::process_next`] or [`HttpConnection::process_ready`], so no
//! two completions are ever handled concurrently.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use super::address;
use super::engine::{Completion, CompletionNotifier, HttpEngine, HttpRequest};
use super::error::{TransportError, TransportResult};
use super::failure::map_failure;
use super::frame::{decode_response, strip_header};
use super::proxy::ProxyConfig;
use super::tracker::RequestTracker;
use crate::core::{Frame, HTTP_TRANSPORT_PORT, HandshakeCodec, Nonce};

/// Connection lifecycle state.
///
/// Only ever advances: Connecting → Ready → Finished, or Connecting → Finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Handshake probe outstanding.
    Connecting,
    /// Handshake validated, frames flow both ways.
    Ready,
    /// Torn down, no further network activity.
    Finished,
}

/// Notification delivered to the connection's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Handshake validated, the connection is usable.
    Connected,
    /// At least one frame was appended to the inbound queue.
    DataReceived,
    /// An error occurred. Negative HTTP statuses, `-500` for malformed
    /// responses, and [`ERROR_CODE_OTHER`](crate::core::ERROR_CODE_OTHER) for
    /// everything else.
    Error(i32),
}

/// HTTP-tunneled transport connection.
///
/// Generic over the HTTP engine `E` and the handshake codec `C`.
///
/// # Example
///
/// ```ignore
/// use tunnel_http_transport::prelude::*;
///
/// let (mut conn, mut events) = HttpConnection::new(ReqwestEngine::new()?, ReqPqCodec::new());
/// conn.connect("203.0.113.5")?;
///
/// loop {
///     tokio::select! {
///         _ = conn.process_next() => {}
///         Some(event) = events.recv() => match event {
///             ConnectionEvent::Connected => println!("ping {:?}", conn.ping_time()),
///             ConnectionEvent::DataReceived => {
///                 for frame in conn.take_received() {
///                     // hand to the session
///                 }
///             }
///             ConnectionEvent::Error(code) => {
///                 conn.disconnect();
///                 break;
///             }
///         },
///     }
/// }
/// ```
pub struct HttpConnection<E: HttpEngine, C: HandshakeCodec> {
    engine: E,
    codec: C,
    address: String,
    check_nonce: Nonce,
    status: ConnectionStatus,
    probe_sent_at: Option<Instant>,
    handshake_latency: Duration,
    requests: RequestTracker<E::Handle>,
    received: VecDeque<Frame>,
    proxy_override: Option<ProxyConfig>,
    completions_tx: Option<mpsc::UnboundedSender<Completion>>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
}

impl<E: HttpEngine, C: HandshakeCodec> HttpConnection<E, C> {
    /// Create a connection and the receiver for its events.
    ///
    /// The handshake nonce is generated here and never changes.
    pub fn new(engine: E, codec: C) -> (Self, mpsc::UnboundedReceiver<ConnectionEvent>) {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let conn = Self {
            engine,
            codec,
            address: String::new(),
            check_nonce: Nonce::random(),
            status: ConnectionStatus::Connecting,
            probe_sent_at: None,
            handshake_latency: Duration::ZERO,
            requests: RequestTracker::new(),
            received: VecDeque::new(),
            proxy_override: None,
            completions_tx: Some(completions_tx),
            completions_rx,
            events: events_tx,
        };
        (conn, events_rx)
    }

    /// Start connecting to `address` by sending the handshake probe.
    ///
    /// The result arrives later as [`ConnectionEvent::Connected`] or
    /// [`ConnectionEvent::Error`].
    pub fn connect(&mut self, address: impl Into<String>) -> TransportResult<()> {
        self.address = address.into();
        debug!(url = %self.url(), "HTTP transport address");

        let probe = self.codec.build_probe(&self.check_nonce);
        debug!(address = %self.address, "sending fake handshake through HTTP transport");

        self.probe_sent_at = Some(Instant::now());
        self.send(&probe)
    }

    /// Send an outbound buffer.
    ///
    /// The first two words are the transport header and are not transmitted.
    /// Does nothing once the connection is finished. A buffer shorter than
    /// three words never reaches the engine: it is reported as
    /// [`ConnectionEvent::Error`] and returned as
    /// [`TransportError::MalformedOutbound`].
    pub fn send(&mut self, buffer: &Frame) -> TransportResult<()> {
        if self.status == ConnectionStatus::Finished {
            return Ok(());
        }
        let Some(completions) = &self.completions_tx else {
            return Ok(());
        };

        let body = match strip_header(buffer) {
            Ok(body) => body,
            Err(e) => {
                warn!(len = buffer.byte_len(), "HTTP error: writing bad packet");
                trace!(bytes = %hex::encode(buffer.to_bytes()), "bad packet dump");
                self.emit(ConnectionEvent::Error(e.code()));
                return Err(e);
            }
        };

        let id = self.requests.next_id();
        let notifier = CompletionNotifier::new(id, completions.clone());
        debug!(%id, len = body.len(), "HTTP info: sending request");
        trace!(%id, body = %hex::encode(&body), "request body");

        let request = HttpRequest::post(self.url(), body);
        let handle = self.engine.issue(request, notifier);
        self.requests.track(id, handle);
        Ok(())
    }

    /// Tear the connection down.
    ///
    /// Aborts every in-flight request and detaches from the completion
    /// channel. Calling it again has no effect.
    pub fn disconnect(&mut self) {
        if self.status == ConnectionStatus::Finished {
            return;
        }
        self.status = ConnectionStatus::Finished;

        let aborted = self.requests.cancel_all();
        self.completions_tx = None;
        self.completions_rx.close();
        debug!(address = %self.address, aborted, "HTTP connection finished");
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `false` once the connection is finished. Cancel-safe, so it
    /// can sit in a `tokio::select!` loop.
    pub async fn process_next(&mut self) -> bool {
        if self.status == ConnectionStatus::Finished {
            return false;
        }
        match self.completions_rx.recv().await {
            Some(completion) => {
                self.handle_completion(completion);
                true
            }
            None => false,
        }
    }

    /// Apply every completion that is already queued, without waiting.
    ///
    /// Returns the number of completions applied.
    pub fn process_ready(&mut self) -> usize {
        let mut applied = 0;
        while self.status != ConnectionStatus::Finished {
            match self.completions_rx.try_recv() {
                Ok(completion) => {
                    self.handle_completion(completion);
                    applied += 1;
                }
                Err(_) => break,
            }
        }
        applied
    }

    fn handle_completion(&mut self, completion: Completion) {
        if self.status == ConnectionStatus::Finished {
            return;
        }

        match completion.outcome {
            Ok(response) => {
                self.requests.untrack(completion.id);
                debug!(id = %completion.id, len = response.body.len(), "HTTP info: read response");
                let frame = decode_response(&response.body);
                self.handle_frame(frame);
            }
            Err(failure) => {
                if !self.requests.untrack(completion.id) {
                    debug!(id = %completion.id, "ignoring completion of untracked request");
                    return;
                }
                let code = map_failure(&failure);
                self.emit(ConnectionEvent::Error(code));
            }
        }
    }

    fn handle_frame(&mut self, frame: Frame) {
        if let Some(code) = frame.as_error_code() {
            self.emit(ConnectionEvent::Error(code));
            return;
        }
        if frame.is_empty() {
            return;
        }

        match self.status {
            ConnectionStatus::Ready => {
                self.received.push_back(frame);
                self.emit(ConnectionEvent::DataReceived);
            }
            ConnectionStatus::Connecting => match self.check_handshake(&frame) {
                Ok(()) => {
                    self.status = ConnectionStatus::Ready;
                    self.handshake_latency = self
                        .probe_sent_at
                        .map(|sent| sent.elapsed())
                        .unwrap_or_default();
                    info!(
                        address = %self.address,
                        latency_ms = self.handshake_latency.as_millis() as u64,
                        "HTTP transport connected by handshake response"
                    );
                    self.emit(ConnectionEvent::Connected);
                }
                Err(e) => {
                    warn!(address = %self.address, "handshake response rejected: {e}");
                    self.emit(ConnectionEvent::Error(e.code()));
                }
            },
            ConnectionStatus::Finished => {}
        }
    }

    fn check_handshake(&self, frame: &Frame) -> TransportResult<()> {
        let nonce = self.codec.parse_response(frame)?;
        if nonce != self.check_nonce {
            return Err(TransportError::NonceMismatch);
        }
        Ok(())
    }

    fn emit(&self, event: ConnectionEvent) {
        let _ = self.events.send(event);
    }

    fn url(&self) -> String {
        address::build_url(&self.address, HTTP_TRANSPORT_PORT)
    }

    /// Route future requests through `proxy`.
    ///
    /// Requests already in flight keep their original route.
    pub fn set_proxy_override(&mut self, proxy: ProxyConfig) -> TransportResult<()> {
        proxy.validate()?;
        self.engine.set_proxy(Some(&proxy))?;
        self.proxy_override = Some(proxy);
        Ok(())
    }

    /// Send future requests directly.
    pub fn clear_proxy_override(&mut self) -> TransportResult<()> {
        self.engine.set_proxy(None)?;
        self.proxy_override = None;
        Ok(())
    }

    /// Current proxy override.
    pub fn proxy_override(&self) -> Option<&ProxyConfig> {
        self.proxy_override.as_ref()
    }

    /// Pop the oldest received frame.
    pub fn pop_received(&mut self) -> Option<Frame> {
        self.received.pop_front()
    }

    /// Take every received frame, oldest first.
    pub fn take_received(&mut self) -> Vec<Frame> {
        self.received.drain(..).collect()
    }

    /// Number of frames waiting in the inbound queue.
    pub fn received_len(&self) -> usize {
        self.received.len()
    }

    /// Check if the handshake has completed and the connection is usable.
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Ready
    }

    /// Handshake round-trip time, or zero while not connected.
    pub fn ping_time(&self) -> Duration {
        if self.is_connected() {
            self.handshake_latency
        } else {
            Duration::ZERO
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Target host.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Nonce carried by the handshake probe.
    pub fn check_nonce(&self) -> &Nonce {
        &self.check_nonce
    }

    /// Number of requests in flight.
    pub fn in_flight(&self) -> usize {
        self.requests.len()
    }

    /// The HTTP transport always relies on the owner's long-poll wait requests
    /// to receive server-initiated frames.
    pub fn uses_http_wait(&self) -> bool {
        true
    }

    /// Socket-level debug state. There is no socket to inspect, so always -1.
    pub fn debug_state(&self) -> i32 {
        -1
    }

    /// Check if the owner should issue a wait request: nothing is in flight,
    /// so the server has no open request to answer on.
    pub fn needs_http_wait(&self) -> bool {
        self.requests.is_empty()
    }

    /// Transport label for telemetry, empty while not connected.
    pub fn transport_label(&self) -> String {
        address::describe(&self.address, self.is_connected())
    }

    /// Log tag naming the transport and address family.
    pub fn tag(&self) -> String {
        address::tag(&self.address)
    }
}

impl<E: HttpEngine, C: HandshakeCodec> Drop for HttpConnection<E, C> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
