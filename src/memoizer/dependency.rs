//! # Upstream Dependency State
//!
//! Each upstream service is either `Available`, holding the client half of its
//! channel pair, or `Degraded`. The only transition is `Available → Degraded`.
//! Degrading drops the channel ends, so a degraded dependency can no longer be
//! called and is never signalled again at shutdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::channel::{ChannelClosed, ServiceChannel};

/// Observable state of an upstream dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyState {
    Available,
    Degraded,
}

impl fmt::Display for DependencyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyState::Available => f.write_str("available"),
            DependencyState::Degraded => f.write_str("degraded"),
        }
    }
}

enum Link<Req, Resp> {
    Available(ServiceChannel<Req, Resp>),
    Degraded,
}

/// An upstream service reached through a channel pair
pub struct Dependency<Req, Resp> {
    name: &'static str,
    link: Link<Req, Resp>,
}

impl<Req, Resp> Dependency<Req, Resp> {
    pub fn new(name: &'static str, channel: ServiceChannel<Req, Resp>) -> Self {
        Self {
            name,
            link: Link::Available(channel),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> DependencyState {
        match self.link {
            Link::Available(_) => DependencyState::Available,
            Link::Degraded => DependencyState::Degraded,
        }
    }

    /// The channel pair, or `None` once degraded
    pub fn channel(&mut self) -> Option<&mut ServiceChannel<Req, Resp>> {
        match &mut self.link {
            Link::Available(channel) => Some(channel),
            Link::Degraded => None,
        }
    }

    /// Permanently mark the dependency degraded and release its channel ends
    pub fn degrade(&mut self, reason: ChannelClosed) {
        if let Link::Available(_) = self.link {
            warn!(
                dependency = self.name,
                reason = %reason,
                "🔴 Dependency degraded, no longer consulted"
            );
            self.link = Link::Degraded;
        }
    }

    /// Signal that no further requests will be sent.
    ///
    /// Dropping our request sender is the shutdown signal: the service sees
    /// end-of-stream and closes its own response path.
    pub fn shutdown(self) {
        match self.link {
            Link::Available(channel) => {
                info!(dependency = self.name, "🛑 Signalling shutdown to dependency");
                drop(channel);
            }
            Link::Degraded => {
                info!(
                    dependency = self.name,
                    "Dependency already degraded, skipping shutdown signal"
                );
            }
        }
    }
}

impl<Req, Resp> fmt::Debug for Dependency<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}
