//! Dispatch engine and deferred execution

mod engine;
mod queue;

pub use engine::{Dispatcher, Emission};
pub use queue::{DeferredQueue, Job};
