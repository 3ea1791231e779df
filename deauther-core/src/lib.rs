//! deauther-rs Core Library
//!
//! This crate provides the fundamental traits, types, and error handling
//! shared by the deauther-rs protocol implementations and CLI.

pub mod attack;
pub mod clock;
pub mod error;
pub mod interface;
pub mod packet;
pub mod parameter;
pub mod protocol;
pub mod types;

// Re-export commonly used types
pub use attack::{
    Attack, AttackContext, AttackDescriptor, AttackHandle, AttackId, AttackStats,
    AttackStatsCounters,
};
pub use clock::{Clock, MonotonicClock};
pub use error::{Error, Result};
pub use interface::{MonitorInterface, Transmitter};
pub use packet::Packet;
pub use parameter::{ParamDescriptor, ParameterType};
pub use protocol::{AttackParams, ParamValue, Protocol, ProtocolStats};
pub use types::*;
