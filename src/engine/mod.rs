//! The runtime: compiled engine, event pipeline and game progress.

mod observer;
mod pipeline;
mod progress;
mod runtime;

pub use observer::{EvaluationObserver, NoopObserver, TracingObserver};
pub use progress::GameProgress;
pub use runtime::GameEngine;
