//! Protocol implementations for deauther-rs
//!
//! Each protocol module includes:
//! - Frame parsing and construction
//! - Attack implementations
//! - Statistics tracking
//!
//! ## Available Protocols
//!
//! ### IEEE 802.11 Management
//! Rate-controlled deauthentication and disassociation frame transmission
//! against a round-robin list of targets.
//! See [`dot11`] module for details.

pub mod dot11;

pub use dot11::Dot11Protocol;
