//! Counters for the realtime pipeline, shared between the worker thread
//! and the main task.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Debug, Default, Clone)]
pub struct RealtimeStats {
    /// Dispatched events by wire tag.
    pub by_tag: HashMap<String, u64>,
    pub total: u64,
    pub unknown_tags: u64,
    pub malformed: u64,
    pub reconnects: u64,
}

impl RealtimeStats {
    pub fn record_dispatched(&mut self, tag: &str) {
        self.total += 1;
        *self.by_tag.entry(tag.to_string()).or_insert(0) += 1;
    }

    pub fn record_unknown_tag(&mut self) {
        self.total += 1;
        self.unknown_tags += 1;
    }

    pub fn record_malformed(&mut self) {
        self.total += 1;
        self.malformed += 1;
    }

    pub fn record_reconnect(&mut self) {
        self.reconnects += 1;
    }
}

#[derive(Debug, Default, Clone)]
pub struct SharedRealtimeStats {
    inner: Arc<RwLock<RealtimeStats>>,
}

impl SharedRealtimeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_dispatched(&self, tag: &str) {
        self.inner.write().record_dispatched(tag);
    }

    pub fn record_unknown_tag(&self) {
        self.inner.write().record_unknown_tag();
    }

    pub fn record_malformed(&self) {
        self.inner.write().record_malformed();
    }

    pub fn record_reconnect(&self) {
        self.inner.write().record_reconnect();
    }

    pub fn snapshot(&self) -> RealtimeStats {
        self.inner.read().clone()
    }
}
