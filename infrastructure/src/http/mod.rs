//! HTTP adapter for the chat backend's streaming endpoint.
//!
//! [`HttpChatTransport`] implements the
//! [`ChatTransport`](aivy_application::ChatTransport) port with reqwest.

mod transport;
mod wire;

pub use transport::{HttpChatTransport, HttpTransportConfig};
pub use wire::WireStreamRequest;
