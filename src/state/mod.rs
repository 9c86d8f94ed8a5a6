//! State management module
//!
//! The configuration shared between wizard steps and the run state machine.

pub mod flow_state;
pub mod shared_config;

// Re-export commonly used types
pub use flow_state::FlowState;
pub use shared_config::{predicted_duration, SharedConfig};
