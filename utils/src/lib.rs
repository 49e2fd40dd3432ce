//! Shared utilities for the Agora governance engines.

pub mod events;
pub mod gate;
pub mod logging;

pub use events::EventBus;
pub use gate::{CallGate, CallPermit};
pub use logging::{init_tracing, init_tracing_json};
