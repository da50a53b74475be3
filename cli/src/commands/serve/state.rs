//! # Shared Server State
//!
//! File: cli/src/commands/serve/state.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `AppState` is cloned into every handler. The dispatcher is immutable and
//! shared read-only; the request log is the only mutable piece and guards
//! itself with a mutex.
//!
use crate::common::dispatch::Dispatcher;
use crate::common::request_log::RequestLog;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub log: Arc<RequestLog>,
    /// How many log entries the status page shows.
    pub status_entries: usize,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, log: RequestLog, status_entries: usize) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            log: Arc::new(log),
            status_entries,
        }
    }
}
