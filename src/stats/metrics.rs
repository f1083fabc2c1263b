//! Statistics for stage sessions

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Snapshot of controller statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageStats {
    /// Join attempts, including rejected ones
    pub joins_attempted: u64,
    /// Joins that reached the stage
    pub joins_succeeded: u64,
    /// Joins the stage rejected or that failed to acquire media
    pub joins_failed: u64,
    /// Completed leaves
    pub leaves: u64,
    /// Device switches applied to a live session
    pub device_switches: u64,
    /// Participant entries created
    pub participants_added: u64,
    /// Participant entries removed by participant-left
    pub participants_left: u64,
    /// Total time spent connected, including the current connection
    pub connected_time: Duration,
}

/// Live counters behind [`StageStats`]
#[derive(Debug, Default)]
pub struct StatsTracker {
    joins_attempted: AtomicU64,
    joins_succeeded: AtomicU64,
    joins_failed: AtomicU64,
    leaves: AtomicU64,
    device_switches: AtomicU64,
    participants_added: AtomicU64,
    participants_left: AtomicU64,
    connected: Mutex<ConnectedClock>,
}

#[derive(Debug, Default)]
struct ConnectedClock {
    since: Option<Instant>,
    accumulated: Duration,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join_attempted(&self) {
        self.joins_attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn join_succeeded(&self) {
        self.joins_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn join_failed(&self) {
        self.joins_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn left(&self) {
        self.leaves.fetch_add(1, Ordering::Relaxed);
    }

    pub fn device_switched(&self) {
        self.device_switches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn participant_added(&self) {
        self.participants_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn participant_left(&self) {
        self.participants_left.fetch_add(1, Ordering::Relaxed);
    }

    /// Start or stop the connected-time clock
    pub fn set_connected(&self, connected: bool) {
        let mut clock = self
            .connected
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match (connected, clock.since) {
            (true, None) => clock.since = Some(Instant::now()),
            (false, Some(since)) => {
                clock.accumulated += since.elapsed();
                clock.since = None;
            }
            _ => {}
        }
    }

    /// Take a snapshot
    pub fn snapshot(&self) -> StageStats {
        let connected_time = {
            let clock = self
                .connected
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            clock.accumulated + clock.since.map(|s| s.elapsed()).unwrap_or_default()
        };

        StageStats {
            joins_attempted: self.joins_attempted.load(Ordering::Relaxed),
            joins_succeeded: self.joins_succeeded.load(Ordering::Relaxed),
            joins_failed: self.joins_failed.load(Ordering::Relaxed),
            leaves: self.leaves.load(Ordering::Relaxed),
            device_switches: self.device_switches.load(Ordering::Relaxed),
            participants_added: self.participants_added.load(Ordering::Relaxed),
            participants_left: self.participants_left.load(Ordering::Relaxed),
            connected_time,
        }
    }
}
