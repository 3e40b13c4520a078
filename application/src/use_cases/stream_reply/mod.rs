//! Stream Reply use case.
//!
//! Consumes a Server-Sent-Events reply body and delivers de-duplicated
//! tokens in order. At most one stream per conversation is live: opening a
//! new one supersedes the previous stream, which then settles as
//! [`StreamError::Aborted`] without delivering anything further.
//!
//! Three delivery forms share the same reader:
//!
//! - [`StreamReplyUseCase::open_stream`]: callback per token, resolves with
//!   the [`ReplyOutcome`]
//! - [`StreamReplyUseCase::open_reader`]: pull tokens with
//!   [`ReplyReader::next_token`]
//! - [`ReplyReader::into_stream`]: a `futures::Stream` of tokens

pub mod error;
pub mod reader;
pub mod registry;

pub use error::StreamError;
pub use reader::{ReplyReader, TokenStream};
pub use registry::{SessionLease, SessionRegistry};

use crate::config::ConsumerConfig;
use crate::ports::chat_transport::ChatTransport;
use crate::ports::stream_logger::{NoStreamLogger, StreamLogger};
use aivy_domain::{ConversationId, ReplyOutcome, StreamRequest};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Use case for streaming chat replies.
///
/// Cheap to clone; clones share the session registry, so supersession
/// works across clones handed to different tasks.
#[derive(Clone)]
pub struct StreamReplyUseCase {
    transport: Arc<dyn ChatTransport>,
    registry: Arc<SessionRegistry>,
    config: ConsumerConfig,
    stream_logger: Arc<dyn StreamLogger>,
}

impl StreamReplyUseCase {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            registry: Arc::new(SessionRegistry::new()),
            config: ConsumerConfig::default(),
            stream_logger: Arc::new(NoStreamLogger),
        }
    }

    pub fn with_config(mut self, config: ConsumerConfig) -> Self {
        self.config = config;
        self
    }

    /// Create with a stream logger.
    pub fn with_stream_logger(mut self, logger: Arc<dyn StreamLogger>) -> Self {
        self.stream_logger = logger;
        self
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Register a session for `request` and return its reader.
    ///
    /// Any live session of the same conversation is cancelled before this
    /// returns. No I/O happens until the reader is first polled.
    pub fn open_reader(&self, request: StreamRequest, cancel: CancellationToken) -> ReplyReader {
        let lease = self
            .registry
            .register(request.conversation_id().clone(), &cancel);
        ReplyReader::new(
            request,
            Arc::clone(&self.transport),
            Arc::clone(&self.stream_logger),
            lease,
            &self.config,
        )
    }

    /// Stream the reply to `request`, calling `on_token` for each accepted token.
    ///
    /// Resolves with the full reply once a `done` event arrives or the body
    /// ends. Fails with [`StreamError::Aborted`] when `cancel` fires or a
    /// newer request for the same conversation supersedes this one;
    /// `on_token` is never called after that point. `on_token` itself may
    /// cancel or supersede the conversation.
    pub async fn open_stream<F>(
        &self,
        request: StreamRequest,
        on_token: F,
        cancel: CancellationToken,
    ) -> Result<ReplyOutcome, StreamError>
    where
        F: FnMut(&str),
    {
        self.open_reader(request, cancel).run(on_token).await
    }

    /// Cancel the live stream of `conversation_id`, if any.
    pub fn cancel(&self, conversation_id: &ConversationId) -> bool {
        self.registry.cancel(conversation_id)
    }
}
