//! Pull-based reader for one streamed reply.
//!
//! [`ReplyReader`] owns a single session: it opens the transport lazily on
//! the first [`next_token`](ReplyReader::next_token) call, feeds body chunks
//! through the [`FrameDecoder`], parses `data:` payloads and runs accepted
//! tokens through the session's [`TokenFilter`].
//!
//! The reader is finite and non-restartable. Once it reaches a terminal
//! state every further call returns `Ok(None)`.

use super::error::StreamError;
use super::registry::SessionLease;
use crate::config::ConsumerConfig;
use crate::ports::chat_transport::{ByteStream, ChatTransport, TransportError};
use crate::ports::stream_logger::{StreamLogEvent, StreamLogger};
use aivy_domain::{
    DomainError, FrameDecoder, ReplyBuffer, ReplyEvent, ReplyOutcome, SessionState,
    StreamRequest, Termination, TokenFilter, data_payloads, log_preview,
};
use futures::StreamExt;
use futures::stream::BoxStream;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Lazily evaluated token sequence of one reply.
pub type TokenStream = BoxStream<'static, Result<String, StreamError>>;

/// Longest payload echoed into debug logs.
const LOG_PREVIEW_BYTES: usize = 120;

pub struct ReplyReader {
    request: StreamRequest,
    transport: Arc<dyn ChatTransport>,
    logger: Arc<dyn StreamLogger>,
    lease: SessionLease,
    idle_timeout: Option<Duration>,
    state: SessionState,
    body: Option<ByteStream>,
    decoder: FrameDecoder,
    /// `data:` payloads of the frame currently being processed.
    pending: VecDeque<String>,
    /// Terminal half of an event whose token was just returned.
    deferred: Option<ReplyEvent>,
    filter: TokenFilter,
    reply: ReplyBuffer,
    termination: Option<Termination>,
}

impl ReplyReader {
    pub(crate) fn new(
        request: StreamRequest,
        transport: Arc<dyn ChatTransport>,
        logger: Arc<dyn StreamLogger>,
        lease: SessionLease,
        config: &ConsumerConfig,
    ) -> Self {
        Self {
            request,
            transport,
            logger,
            lease,
            idle_timeout: config.idle_timeout,
            state: SessionState::Idle,
            body: None,
            decoder: FrameDecoder::new(),
            pending: VecDeque::new(),
            deferred: None,
            filter: TokenFilter::new(config.dedup),
            reply: ReplyBuffer::new(),
            termination: None,
        }
    }

    pub fn request_id(&self) -> u64 {
        self.lease.request_id()
    }

    pub fn request(&self) -> &StreamRequest {
        &self.request
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Reply text accepted so far.
    pub fn reply(&self) -> &str {
        self.reply.as_str()
    }

    /// Read until the next accepted token.
    ///
    /// Returns `Ok(None)` when the reply completed (a `done` event or a clean
    /// end of body), and on every call after any terminal state.
    pub async fn next_token(&mut self) -> Result<Option<String>, StreamError> {
        if self.state.is_terminal() {
            return Ok(None);
        }

        loop {
            if self.lease.is_cancelled() {
                return Err(self.abort());
            }

            if let Some(event) = self.deferred.take() {
                self.apply_terminal(event)?;
                if self.state.is_terminal() {
                    return Ok(None);
                }
                continue;
            }

            if let Some(payload) = self.pending.pop_front() {
                let Some(event) = ReplyEvent::parse(&payload) else {
                    debug!(
                        "Request {}: skipping malformed payload: {}",
                        self.request_id(),
                        log_preview(&payload, LOG_PREVIEW_BYTES)
                    );
                    continue;
                };
                if let Some(token) = self.apply_event(event)? {
                    return Ok(Some(token));
                }
                if self.state.is_terminal() {
                    return Ok(None);
                }
                continue;
            }

            if let Some(frame) = self.decoder.next_frame() {
                self.pending.extend(data_payloads(&frame));
                continue;
            }

            if self.state == SessionState::Idle {
                self.connect().await?;
                continue;
            }

            if !self.read_chunk().await? {
                return Ok(None);
            }
        }
    }

    /// Hand `token` to `deliver` through the session's delivery gate.
    ///
    /// Returns `false` when the session was superseded or cancelled; the
    /// callback is not run in that case.
    pub fn deliver(&self, deliver: impl FnOnce()) -> bool {
        self.lease.deliver(deliver)
    }

    /// Cancel this session. The next `next_token` call returns `Aborted`.
    pub fn cancel(&self) {
        self.lease.close();
    }

    /// Read to the end, calling `on_token` for each accepted token.
    ///
    /// `on_token` may cancel or supersede this reader's conversation. The
    /// token being delivered completes and the reader then settles as
    /// [`StreamError::Aborted`].
    pub async fn run<F>(mut self, mut on_token: F) -> Result<ReplyOutcome, StreamError>
    where
        F: FnMut(&str),
    {
        while let Some(token) = self.next_token().await? {
            if !self.deliver(|| on_token(&token)) {
                debug!(
                    "Request {}: delivery refused, session superseded",
                    self.request_id()
                );
                self.cancel();
                return match self.next_token().await {
                    Err(e) => Err(e),
                    Ok(_) => Err(StreamError::Aborted),
                };
            }
        }

        let state = self.state;
        self.into_outcome().ok_or(StreamError::Domain(DomainError::InvalidTransition {
            from: state,
            to: SessionState::Completed,
        }))
    }

    /// Turn the reader into a lazily evaluated stream of tokens.
    ///
    /// The stream yields each accepted token, then ends. A failure is
    /// yielded as the final item.
    pub fn into_stream(self) -> TokenStream {
        futures::stream::unfold(Some(self), |reader| async move {
            let mut reader = reader?;
            match reader.next_token().await {
                Ok(Some(token)) => Some((Ok(token), Some(reader))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
        .boxed()
    }

    /// The completed reply, or `None` unless the reader reached `Completed`.
    pub fn into_outcome(self) -> Option<ReplyOutcome> {
        if self.state != SessionState::Completed {
            return None;
        }
        let termination = self.termination?;
        let tokens = self.reply.appends();
        Some(ReplyOutcome {
            conversation_id: self.request.conversation_id().clone(),
            request_id: self.lease.request_id(),
            text: self.reply.into_string(),
            tokens,
            termination,
        })
    }

    async fn connect(&mut self) -> Result<(), StreamError> {
        self.transition(SessionState::Connecting)?;
        info!(
            "Request {}: opening stream for conversation {}",
            self.request_id(),
            self.request.conversation_id()
        );
        self.logger.log(StreamLogEvent::new(
            "stream_opened",
            serde_json::json!({
                "conversation_id": self.request.conversation_id().as_str(),
                "request_id": self.request_id(),
                "message_bytes": self.request.message().len(),
                "dedup": self.filter.policy().as_str(),
            }),
        ));

        let cancel = self.lease.cancel_token().clone();
        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            opened = self.transport.open(&self.request) => Some(opened),
        };

        match opened {
            None => Err(self.abort()),
            Some(Err(e)) => Err(self.fail(e.into())),
            Some(Ok(body)) => {
                self.body = Some(body);
                Ok(())
            }
        }
    }

    /// Read one body chunk into the decoder.
    ///
    /// Returns `Ok(false)` when the body ended and the reply completed.
    async fn read_chunk(&mut self) -> Result<bool, StreamError> {
        let Some(body) = self.body.as_mut() else {
            self.complete(Termination::Eof);
            return Ok(false);
        };

        let cancel = self.lease.cancel_token().clone();
        let idle_timeout = self.idle_timeout;
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            chunk = next_chunk(body, idle_timeout) => Some(chunk),
        };

        match next {
            None => Err(self.abort()),
            Some(None) => {
                self.body = None;
                if let Some(rest) = self.decoder.finish() {
                    debug!(
                        "Request {}: discarding incomplete trailing frame: {}",
                        self.request_id(),
                        log_preview(&rest, LOG_PREVIEW_BYTES)
                    );
                }
                debug!(
                    "Request {}: body ended without a done event",
                    self.request_id()
                );
                self.complete(Termination::Eof);
                Ok(false)
            }
            Some(Some(Err(e))) => Err(self.fail(e.into())),
            Some(Some(Ok(chunk))) => {
                if self.state == SessionState::Connecting {
                    self.transition(SessionState::Streaming)?;
                }
                trace!("Request {}: chunk of {} bytes", self.request_id(), chunk.len());
                self.decoder.push(&chunk);
                Ok(true)
            }
        }
    }

    /// Apply one event in priority order: token, then error, then done.
    fn apply_event(&mut self, event: ReplyEvent) -> Result<Option<String>, StreamError> {
        let ReplyEvent { token, error, done } = event;

        if let Some(token) = token {
            match self.filter.accept(&token, self.reply.as_str()) {
                Some(text) => {
                    self.transition(SessionState::Streaming)?;
                    self.reply.append(&text);
                    trace!("Request {}: token {:?}", self.request_id(), text);
                    self.logger.log(StreamLogEvent::new(
                        "token",
                        serde_json::json!({
                            "request_id": self.request_id(),
                            "token": text,
                        }),
                    ));
                    if error.is_some() || done {
                        self.deferred = Some(ReplyEvent {
                            token: None,
                            error,
                            done,
                        });
                    }
                    return Ok(Some(text));
                }
                None => {
                    debug!(
                        "Request {}: suppressed duplicate token {:?}",
                        self.request_id(),
                        token
                    );
                }
            }
        }

        self.apply_terminal(ReplyEvent {
            token: None,
            error,
            done,
        })?;
        Ok(None)
    }

    fn apply_terminal(&mut self, event: ReplyEvent) -> Result<(), StreamError> {
        if let Some(message) = event.error {
            return Err(self.fail(StreamError::Protocol(message)));
        }
        if event.done {
            self.complete(Termination::Done);
        }
        Ok(())
    }

    fn transition(&mut self, next: SessionState) -> Result<(), StreamError> {
        let from = self.state;
        self.state.advance(next)?;
        if from != next {
            debug!("Request {}: {} -> {}", self.request_id(), from, next);
        }
        Ok(())
    }

    /// Enter a terminal state, dropping the body and anything not yet parsed.
    fn finish(&mut self, state: SessionState) {
        if let Err(e) = self.transition(state) {
            warn!("Request {}: {}", self.lease.request_id(), e);
        }
        self.body = None;
        self.pending.clear();
        self.deferred = None;
    }

    fn complete(&mut self, termination: Termination) {
        self.finish(SessionState::Completed);
        self.termination = Some(termination);
        info!(
            "Request {}: stream completed ({} bytes, {} tokens, {:?})",
            self.request_id(),
            self.reply.as_str().len(),
            self.reply.appends(),
            termination
        );
        self.logger.log(StreamLogEvent::new(
            "stream_completed",
            serde_json::json!({
                "request_id": self.request_id(),
                "reply": self.reply.as_str(),
                "tokens": self.reply.appends(),
                "terminated_by_done": termination == Termination::Done,
            }),
        ));
    }

    fn fail(&mut self, error: StreamError) -> StreamError {
        self.finish(SessionState::Failed);
        warn!("Request {}: stream failed: {}", self.request_id(), error);
        let status = match &error {
            StreamError::Transport(e) => e.status(),
            _ => None,
        };
        self.logger.log(StreamLogEvent::new(
            "stream_failed",
            serde_json::json!({
                "request_id": self.request_id(),
                "error": error.to_string(),
                "status": status,
            }),
        ));
        error
    }

    fn abort(&mut self) -> StreamError {
        self.finish(SessionState::Cancelled);
        self.reply = ReplyBuffer::new();
        self.decoder = FrameDecoder::new();
        debug!("Request {}: stream aborted", self.request_id());
        self.logger.log(StreamLogEvent::new(
            "stream_aborted",
            serde_json::json!({ "request_id": self.request_id() }),
        ));
        StreamError::Aborted
    }
}

/// Next chunk of `body`, failing with `IdleTimeout` when the body stays
/// silent for longer than `idle_timeout`.
async fn next_chunk(
    body: &mut ByteStream,
    idle_timeout: Option<Duration>,
) -> Option<Result<bytes::Bytes, TransportError>> {
    match idle_timeout {
        None => body.next().await,
        Some(limit) => match tokio::time::timeout(limit, body.next()).await {
            Ok(chunk) => chunk,
            Err(_) => Some(Err(TransportError::IdleTimeout(limit.as_secs()))),
        },
    }
}
