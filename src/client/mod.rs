//! # Memoizer Client
//!
//! Caller-side driver for the memoizer's channel pair. It allocates request
//! identifiers and checks that every response correlates with a request it
//! sent.
//!
//! Two ways to submit work:
//!
//! - [`MemoizerClient::classify`] sends one request and waits for its response.
//! - [`MemoizerClient::classify_batch`] keeps sending while there is room and
//!   drains responses as they arrive. With bounded channels, sending a whole
//!   batch before reading anything can deadlock once both directions fill up,
//!   so the batch driver multiplexes the two with `tokio::select!`.

use tracing::debug;

use crate::channel::ServiceChannel;
use crate::constants::services;
use crate::error::{MemoizerError, MemoizerResult};
use crate::messages::{Request, Response};

#[derive(Debug)]
pub struct MemoizerClient {
    channel: ServiceChannel<Request, Response>,
    next_id: i64,
}

impl MemoizerClient {
    pub fn new(channel: ServiceChannel<Request, Response>) -> Self {
        Self::with_first_id(channel, 0)
    }

    /// Start allocating identifiers at `first_id`
    pub fn with_first_id(channel: ServiceChannel<Request, Response>, first_id: i64) -> Self {
        Self {
            channel,
            next_id: first_id,
        }
    }

    /// Identifier the next request will carry
    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    /// Submit one payload and wait for its response
    pub async fn classify(&mut self, payload: impl Into<Vec<u8>>) -> MemoizerResult<Response> {
        let id = self.allocate_ids(1)?;

        let response = self
            .channel
            .call(Request::new(id, payload))
            .await
            .map_err(|_| disconnected())?;

        if response.id != id {
            return Err(MemoizerError::UnexpectedResponse {
                service: services::MEMOIZER,
                id: response.id,
            });
        }
        Ok(response)
    }

    /// Submit many payloads, interleaving sends with receives.
    ///
    /// Responses are returned in payload order, whatever order they arrived in.
    pub async fn classify_batch(&mut self, payloads: Vec<Vec<u8>>) -> MemoizerResult<Vec<Response>> {
        let total = payloads.len();
        let first_id = self.allocate_ids(total)?;

        let mut outgoing = payloads.into_iter();
        let mut slots: Vec<Option<Response>> = vec![None; total];
        let mut sent = 0usize;
        let mut received = 0usize;

        while received < total {
            tokio::select! {
                permit = self.channel.requests.reserve(), if sent < total => {
                    let permit = permit.map_err(|_| disconnected())?;
                    if let Some(payload) = outgoing.next() {
                        permit.send(Request::new(first_id + sent as i64, payload));
                        sent += 1;
                    }
                }
                response = self.channel.responses.recv() => {
                    let response = response.ok_or_else(disconnected)?;
                    let slot = response
                        .id
                        .checked_sub(first_id)
                        .and_then(|offset| usize::try_from(offset).ok())
                        .filter(|&index| index < sent)
                        .and_then(|index| slots.get_mut(index))
                        .filter(|slot| slot.is_none());

                    match slot {
                        Some(slot) => *slot = Some(response),
                        None => {
                            return Err(MemoizerError::UnexpectedResponse {
                                service: services::MEMOIZER,
                                id: response.id,
                            })
                        }
                    }
                    received += 1;
                }
            }
        }

        debug!(first_id, total, "Batch completed");
        Ok(slots.into_iter().flatten().collect())
    }

    /// Reserve `count` consecutive identifiers and return the first.
    ///
    /// The identifier after the last one must still fit in an `i64`, so
    /// `i64::MAX` itself is never handed out.
    fn allocate_ids(&mut self, count: usize) -> MemoizerResult<i64> {
        let exhausted = || MemoizerError::IdsExhausted {
            next_id: self.next_id,
            requested: count,
        };
        let next = i64::try_from(count)
            .ok()
            .and_then(|count| self.next_id.checked_add(count))
            .ok_or_else(exhausted)?;

        let first = self.next_id;
        self.next_id = next;
        Ok(first)
    }

    /// Stop submitting work and wait for the memoizer to close its response
    /// channel. Returns any responses that were still in flight.
    pub async fn close(self) -> Vec<Response> {
        let ServiceChannel {
            requests,
            mut responses,
        } = self.channel;
        drop(requests);

        let mut leftovers = Vec::new();
        while let Some(response) = responses.recv().await {
            leftovers.push(response);
        }
        leftovers
    }
}

fn disconnected() -> MemoizerError {
    MemoizerError::Disconnected {
        service: services::MEMOIZER,
    }
}
