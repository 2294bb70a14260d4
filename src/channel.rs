//! # Channel Pairs
//!
//! Every boundary in the pipeline is a pair of bounded tokio channels: one
//! carrying requests toward a service, one carrying its responses back.
//!
//! - [`ServiceChannel`] is the *client* half. It writes requests and reads
//!   responses, and exposes the pair as a synchronous call ([`ServiceChannel::call`])
//!   or a fire-and-forget send ([`ServiceChannel::cast`]).
//! - [`ServiceEndpoint`] is the *service* half. It reads requests and writes
//!   responses.
//!
//! Each side only ever closes the channel it writes into: the client signals
//! "no more requests" by dropping its sender, and the service signals "no more
//! responses" by dropping its own.

use thiserror::Error;
use tokio::sync::mpsc;

/// The remote end of a channel pair is gone for good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelClosed {
    #[error("request channel closed")]
    Requests,
    #[error("response channel closed")]
    Responses,
}

/// Client half of a channel pair
#[derive(Debug)]
pub struct ServiceChannel<Req, Resp> {
    pub requests: mpsc::Sender<Req>,
    pub responses: mpsc::Receiver<Resp>,
}

/// Service half of a channel pair
#[derive(Debug)]
pub struct ServiceEndpoint<Req, Resp> {
    pub requests: mpsc::Receiver<Req>,
    pub responses: mpsc::Sender<Resp>,
}

/// Create a connected pair of bounded channels.
///
/// # Panics
///
/// Panics if `buffer_size` is zero (tokio's bounded channel contract).
/// Configured sizes are validated by [`MemoizerConfig::validate`](crate::config::MemoizerConfig::validate).
pub fn service_channel<Req, Resp>(
    buffer_size: usize,
) -> (ServiceChannel<Req, Resp>, ServiceEndpoint<Req, Resp>) {
    let (request_tx, request_rx) = mpsc::channel(buffer_size);
    let (response_tx, response_rx) = mpsc::channel(buffer_size);
    (
        ServiceChannel {
            requests: request_tx,
            responses: response_rx,
        },
        ServiceEndpoint {
            requests: request_rx,
            responses: response_tx,
        },
    )
}

impl<Req, Resp> ServiceChannel<Req, Resp> {
    /// Send one request and wait for the next response.
    ///
    /// The pairing relies on the service answering one-in, one-out in FIFO
    /// order; callers must not have other calls outstanding on this pair.
    pub async fn call(&mut self, request: Req) -> Result<Resp, ChannelClosed> {
        self.cast(request).await?;
        self.responses.recv().await.ok_or(ChannelClosed::Responses)
    }

    /// Send one request without waiting for a response
    pub async fn cast(&self, request: Req) -> Result<(), ChannelClosed> {
        self.requests
            .send(request)
            .await
            .map_err(|_| ChannelClosed::Requests)
    }

    /// Wait for the next response without sending anything
    pub async fn recv(&mut self) -> Option<Resp> {
        self.responses.recv().await
    }
}

impl<Req, Resp> ServiceEndpoint<Req, Resp> {
    /// Next request, or `None` once every client sender is dropped
    pub async fn next_request(&mut self) -> Option<Req> {
        self.requests.recv().await
    }

    pub async fn respond(&self, response: Resp) -> Result<(), ChannelClosed> {
        self.responses
            .send(response)
            .await
            .map_err(|_| ChannelClosed::Responses)
    }
}
