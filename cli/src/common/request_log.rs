//! # Request Log
//!
//! File: cli/src/common/request_log.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A bounded, in-memory FIFO of recent inbound requests, shown on the
//! diagnostic status page. It is owned by the server state and shared
//! through an `Arc`; all mutation happens behind a mutex. Nothing is
//! persisted: the log starts empty on every launch.
//!
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Maximum number of entries kept.
pub const DEFAULT_CAPACITY: usize = 50;

/// One recorded request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestLogEntry {
    pub client_address: String,
    pub method: String,
    pub url: String,
    pub received_at: DateTime<Utc>,
}

impl RequestLogEntry {
    /// Entry stamped with the current time.
    pub fn now(client_address: impl Into<String>, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            client_address: client_address.into(),
            method: method.into(),
            url: url.into(),
            received_at: Utc::now(),
        }
    }
}

/// Ring buffer of the most recent requests.
#[derive(Debug)]
pub struct RequestLog {
    capacity: usize,
    entries: Mutex<VecDeque<RequestLogEntry>>,
}

impl RequestLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A capacity of zero is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    // The buffer holds plain data, so a panic elsewhere cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, VecDeque<RequestLogEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Appends `entry`, evicting the oldest one when full.
    pub fn record(&self, entry: RequestLogEntry) {
        let mut entries = self.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Up to `n` most recent entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<RequestLogEntry> {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new()
    }
}
