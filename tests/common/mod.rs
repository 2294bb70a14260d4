pub mod pipeline;
pub mod strategies;

pub use pipeline::*;
