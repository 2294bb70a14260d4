//! # Memoizer
//!
//! The orchestration state machine and the pieces it is built from:
//!
//! - [`core`] - the sequential request loop ([`Memoizer`])
//! - [`dependency`] - per-upstream `Available → Degraded` state
//! - [`stats`] - counters returned when the loop ends

pub mod core;
pub mod dependency;
pub mod stats;


pub use self::core::Memoizer;
pub use dependency::{Dependency, DependencyState};
pub use stats::MemoizerStats;
