//! Per-process idle time accounting
//!
//! Each tick consumes a fresh [`WindowSnapshot`] and moves every process name
//! through these states:
//!
//! ```text
//!   Absent --(seen minimized)--> Idling(0) --(seen again)--> Idling(n + interval)
//!     ^                              |                              |
//!     +------(not seen minimized)----+------------------------------+
//!                                                                   |
//!                                       n >= threshold ---> kill requested
//! ```
//!
//! New names are seeded at `-interval`, so the increment of the same tick
//! leaves them at 0: a process must be seen minimized on two consecutive
//! ticks before its idle time is positive.
//!
//! Accounting is keyed by process name, not PID. Two processes sharing a name
//! share one timer, and a restarted process inherits the running timer if it
//! is minimized again by the next tick.

use std::collections::{BTreeMap, HashMap};

use super::exclusions::ExclusionSet;
use crate::platform::WindowSnapshot;

/// Kill decision produced by a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillRequest {
    pub name: String,
    pub pid: u32,
    pub idle_secs: u64,
}

/// What changed during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Names dropped because they are no longer minimized
    pub evicted: Vec<String>,
    /// Names that started idling this tick
    pub started: Vec<String>,
    /// Names at or above the threshold, in name order
    pub kill_requests: Vec<KillRequest>,
}

/// Idle accounting state owned by the poll loop.
#[derive(Debug, Clone)]
pub struct IdleAccounting {
    exclusions: ExclusionSet,
    threshold_secs: u64,
    interval_secs: u64,
    /// name -> elapsed idle seconds (negative only between seed and increment)
    idle: BTreeMap<String, i64>,
    /// name -> most recently observed PID, rebuilt every tick
    pids: HashMap<String, u32>,
}

impl IdleAccounting {
    pub fn new(exclusions: ExclusionSet, threshold_secs: u64, interval_secs: u64) -> Self {
        Self {
            exclusions,
            threshold_secs,
            interval_secs,
            idle: BTreeMap::new(),
            pids: HashMap::new(),
        }
    }

    /// Apply one snapshot: eviction, initialization, increment, then
    /// termination decisions, in that order.
    pub fn observe(&mut self, snapshot: &WindowSnapshot) -> TickOutcome {
        let step = self.interval_secs as i64;

        self.pids.clear();
        for entry in snapshot.entries() {
            if self.exclusions.contains(&entry.name) {
                continue;
            }
            self.pids.insert(entry.name.clone(), entry.pid);
        }

        let evicted: Vec<String> = self
            .idle
            .keys()
            .filter(|name| !self.pids.contains_key(*name))
            .cloned()
            .collect();
        for name in &evicted {
            self.idle.remove(name);
        }

        let mut started = Vec::new();
        for name in self.pids.keys() {
            if !self.idle.contains_key(name) {
                self.idle.insert(name.clone(), -step);
                started.push(name.clone());
            }
        }
        started.sort();

        for elapsed in self.idle.values_mut() {
            *elapsed += step;
        }

        let kill_requests = self
            .idle
            .iter()
            .filter(|&(_, &elapsed)| elapsed >= 0 && elapsed as u64 >= self.threshold_secs)
            .filter_map(|(name, &elapsed)| {
                self.pids.get(name).map(|&pid| KillRequest {
                    name: name.clone(),
                    pid,
                    idle_secs: elapsed as u64,
                })
            })
            .collect();

        TickOutcome {
            evicted,
            started,
            kill_requests,
        }
    }

    /// Elapsed idle seconds for a tracked name.
    pub fn idle_secs(&self, name: &str) -> Option<u64> {
        self.idle.get(name).map(|&elapsed| elapsed.max(0) as u64)
    }

    /// PID observed for `name` in the latest snapshot.
    pub fn pid_of(&self, name: &str) -> Option<u32> {
        self.pids.get(name).copied()
    }

    /// Tracked names with their idle seconds, in name order.
    pub fn tracked(&self) -> impl Iterator<Item = (&str, u64)> {
        self.idle
            .iter()
            .map(|(name, &elapsed)| (name.as_str(), elapsed.max(0) as u64))
    }

    pub fn len(&self) -> usize {
        self.idle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idle.is_empty()
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn threshold_secs(&self) -> u64 {
        self.threshold_secs
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }
}
