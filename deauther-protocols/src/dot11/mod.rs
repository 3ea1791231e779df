//! IEEE 802.11 Deauthentication / Disassociation Implementation
//!
//! This module transmits forged 802.11 management frames that tell a station
//! (or every station, via broadcast) that its association with an access
//! point has ended. Frames are paced by a configurable rate and walk a list
//! of targets round-robin. Each frame is handed to the transmitter with its
//! target's channel; [`deauther_core::MonitorInterface`] does not retune the
//! radio, so tuning is left to the operator.
//!
//! ## Frame Structure
//!
//! Both subtypes share one 26-byte layout and differ only in byte 0:
//! ```text
//! Frame Control (2 bytes)
//!   0xC0 0x00: Deauthentication
//!   0xA0 0x00: Disassociation
//! Duration (2 bytes): 0x00 0x00 (filled by the driver)
//! Address 1 (6 bytes): receiver
//! Address 2 (6 bytes): transmitter
//! Address 3 (6 bytes): BSSID (= transmitter)
//! Sequence Control (2 bytes): 0x00 0x00
//! Reason Code (2 bytes): 0x01 0x00 (unspecified)
//! ```
//!
//! Frames are written to the radio behind a minimal radiotap header (see
//! [`deauther_core::MonitorInterface`]).
//!
//! ## Pacing
//!
//! With `rate` frames per second and `f` frames per target visit (1 when a
//! single subtype is enabled, 2 when both are), consecutive visits are at
//! least `(1000 / rate) * f` milliseconds apart. Every 1000 ms the frames of
//! the last window are folded into the running total and reported as
//! `[Deauth attack: N pkts/s, M total]`.
//!
//! ## Attacks
//!
//! ### Deauthentication (Attack ID 0)
//!
//! **Parameters:**
//! - `targets`: comma separated `transmitter/receiver/channel` triples (required)
//! - `deauth`: send deauthentication frames (default: true)
//! - `disassoc`: send disassociation frames (default: true)
//! - `rate`: frames per second (default: 20)
//! - `timeout`: seconds until the attack stops by itself, 0 = never (default: 300)
//! - `max_packets`: total frame budget, 0 = unlimited (default: 0)
//! - `silent`: suppress summary and status lines (default: false)
//!
//! ## Example Usage
//!
//! ```rust
//! use deauther_protocols::dot11::Dot11Protocol;
//! use deauther_core::{AttackId, protocol::AttackParams};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dot11 = Dot11Protocol::new();
//!
//! let params = AttackParams::new()
//!     .set("targets", "aa:bb:cc:dd:ee:ff/ff:ff:ff:ff:ff:ff/6")
//!     .set("disassoc", false)
//!     .set("rate", 50u32);
//!
//! // let handle = dot11.launch_attack(AttackId(0), params, Box::new(interface)).await?;
//! # Ok(())
//! # }
//! ```

pub mod attack;
pub mod controller;
pub mod packet;
pub mod protocol;
pub mod scheduler;
pub mod target;


pub use attack::DeauthAttack;
pub use controller::{AttackController, DeauthConfig, DeauthEvent, EventSink, TracingSink};
pub use packet::{FrameBuilder, MgmtFrame, MgmtSubtype, FRAME_LEN};
pub use protocol::{Dot11Protocol, Dot11Stats};
pub use scheduler::{format_duration_ms, RateScheduler, STATUS_WINDOW_MS};
pub use target::{Target, TargetList};
