//! Running attacks: the `Attack` trait, its context and the caller-side handle

use crate::{ParamDescriptor, Result, Transmitter};
use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

/// Index into [`Protocol::attacks`](crate::Protocol::attacks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttackId(pub u8);

/// A long-running transmit task
///
/// Attacks have no paused state: they run until they finish on their own
/// or until [`Attack::stop`] clears the running flag.
#[async_trait]
pub trait Attack: Send + Sync {
    /// Run to completion on the calling task
    ///
    /// Runs until the attack terminates by itself or the context's running
    /// flag is cleared. Must poll the flag between units of work.
    async fn execute(&self, ctx: AttackContext) -> Result<()>;

    /// Request cooperative shutdown
    fn stop(&self);

    fn stats(&self) -> AttackStats;

    fn name(&self) -> &str;
}

/// Static metadata listed by `deauther protocols`
#[derive(Debug, Clone)]
pub struct AttackDescriptor {
    pub id: AttackId,
    pub name: &'static str,
    /// One-line summary
    pub description: &'static str,
    /// Keys understood by the attack's parameter parser
    pub parameters: &'static [ParamDescriptor],
}

/// Snapshot of an attack's counters
#[derive(Debug, Clone, Default)]
pub struct AttackStats {
    /// Frames accepted by the transmitter
    pub packets_sent: u64,
    /// Bytes accepted by the transmitter
    pub bytes_sent: u64,
    /// Frames the transmitter rejected
    pub errors: u64,
    pub started_at: Option<SystemTime>,
    /// Whole seconds of run time, set once the attack is over
    pub duration_secs: Option<u64>,
    pub is_running: bool,
}

/// Everything an attack needs from its launcher
pub struct AttackContext {
    /// Where frames are sent
    pub transmitter: Box<dyn Transmitter>,
    /// Cleared by the launcher to cancel; cleared by the attack when done
    pub running: Arc<AtomicBool>,
    /// Mirrored by the attack so handles can read progress
    pub stats: Arc<AttackStatsCounters>,
}

/// Lock-free counters shared between an attack and its handle
#[derive(Debug, Default)]
pub struct AttackStatsCounters {
    pub packets_sent: AtomicU64,
    pub bytes_sent: AtomicU64,
    pub errors: AtomicU64,
}

impl AttackStatsCounters {
    /// Overwrite the counters with a snapshot taken from a single owner
    pub fn record(&self, packets_sent: u64, bytes_sent: u64, errors: u64) {
        self.packets_sent.store(packets_sent, Ordering::Relaxed);
        self.bytes_sent.store(bytes_sent, Ordering::Relaxed);
        self.errors.store(errors, Ordering::Relaxed);
    }

    pub fn to_stats(&self, started_at: SystemTime, running: bool) -> AttackStats {
        let duration_secs = if !running {
            SystemTime::now()
                .duration_since(started_at)
                .ok()
                .map(|d| d.as_secs())
        } else {
            None
        };

        AttackStats {
            packets_sent: self.packets_sent.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            started_at: Some(started_at),
            duration_secs,
            is_running: running,
        }
    }
}

/// Caller-side view of a spawned attack
pub struct AttackHandle {
    /// Time-ordered (v7) id for log correlation
    pub id: uuid::Uuid,
    pub protocol: String,
    pub attack_name: String,
    /// Shared with [`AttackContext::running`]
    pub running: Arc<AtomicBool>,
    pub stats: Arc<AttackStatsCounters>,
    pub started_at: SystemTime,
    /// `None` once the task has been joined
    pub task_handle: Option<tokio::task::JoinHandle<Result<()>>>,
}

impl fmt::Debug for AttackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttackHandle")
            .field("id", &self.id)
            .field("protocol", &self.protocol)
            .field("attack_name", &self.attack_name)
            .field("running", &self.is_running())
            .field("started_at", &self.started_at)
            .field("joined", &self.task_handle.is_none())
            .finish()
    }
}

impl AttackHandle {
    /// Ask the attack to stop without waiting for it
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> AttackStats {
        self.stats.to_stats(self.started_at, self.is_running())
    }

    /// Wait for the attack task to finish
    ///
    /// Cancel safe: if the returned future is dropped early the task handle
    /// is kept and a later call waits again.
    pub async fn wait(&mut self) -> Result<()> {
        let Some(task) = self.task_handle.as_mut() else {
            return Ok(());
        };
        let result = task.await;
        self.task_handle = None;
        result.map_err(|e| crate::Error::attack(format!("Attack task failed: {}", e)))?
    }

    /// Clear the running flag and wait for the task to wind down
    pub async fn stop_and_wait(&mut self) -> Result<()> {
        self.stop();
        self.wait().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_snapshot() {
        let counters = AttackStatsCounters::default();
        counters.record(10, 260, 2);

        let stats = counters.to_stats(SystemTime::now(), true);
        assert_eq!(stats.packets_sent, 10);
        assert_eq!(stats.bytes_sent, 260);
        assert_eq!(stats.errors, 2);
        assert!(stats.is_running);
        assert!(stats.duration_secs.is_none());
    }

    #[test]
    fn test_finished_stats_have_duration() {
        let counters = AttackStatsCounters::default();
        let stats = counters.to_stats(SystemTime::now(), false);
        assert_eq!(stats.duration_secs, Some(0));
    }

    #[test]
    fn test_handle_debug_skips_task() {
        let handle = AttackHandle {
            id: uuid::Uuid::now_v7(),
            protocol: "802.11".to_string(),
            attack_name: "Deauthentication".to_string(),
            running: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(AttackStatsCounters::default()),
            started_at: SystemTime::now(),
            task_handle: None,
        };

        let text = format!("{:?}", handle);
        assert!(text.starts_with("AttackHandle"));
        assert!(text.contains("Deauthentication"));
        assert!(text.contains("joined: true"));
    }

    #[tokio::test]
    async fn test_handle_stop_and_wait() {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let task = tokio::spawn(async move {
            while flag.load(Ordering::Relaxed) {
                tokio::task::yield_now().await;
            }
            Ok(())
        });

        let mut handle = AttackHandle {
            id: uuid::Uuid::now_v7(),
            protocol: "test".to_string(),
            attack_name: "test".to_string(),
            running,
            stats: Arc::new(AttackStatsCounters::default()),
            started_at: SystemTime::now(),
            task_handle: Some(task),
        };

        assert!(handle.is_running());
        handle.stop_and_wait().await.unwrap();
        assert!(!handle.is_running());
        assert!(handle.task_handle.is_none());
    }
}
