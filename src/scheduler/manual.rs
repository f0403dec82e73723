//! Wake-up service that never fires on its own
//!
//! Used where wake-ups are delivered by hand, such as tests and replaying a
//! day of wake-ups against the coordinator.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Local};

use super::{Wakeup, WakeupService, WakeupSpec};

#[derive(Debug, Default)]
pub struct ManualWakeups {
    entries: Mutex<HashMap<Wakeup, (WakeupSpec, DateTime<Local>)>>,
    creations: AtomicUsize,
    fail_lookups: AtomicBool,
    stall_lookups: AtomicBool,
}

impl ManualWakeups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduled wake-ups in their canonical order
    pub fn scheduled(&self) -> Vec<Wakeup> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Wakeup::ALL.into_iter().filter(|w| entries.contains_key(w)).collect()
    }

    pub fn spec(&self, wakeup: Wakeup) -> Option<WakeupSpec> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(&wakeup).map(|(spec, _)| *spec)
    }

    /// Total number of `create` calls so far
    pub fn creations(&self) -> usize {
        self.creations.load(Ordering::SeqCst)
    }

    pub fn set_next_fire(&self, wakeup: Wakeup, at: DateTime<Local>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = entries.get_mut(&wakeup) {
            entry.1 = at;
        }
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Make lookups never resolve
    pub fn stall_lookups(&self, stall: bool) {
        self.stall_lookups.store(stall, Ordering::SeqCst);
    }
}

#[async_trait]
impl WakeupService for ManualWakeups {
    fn create(&self, wakeup: Wakeup, spec: WakeupSpec) {
        let first = Local::now() + chrono::Duration::from_std(spec.delay).unwrap_or(chrono::Duration::zero());
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(wakeup, (spec, first));
        self.creations.fetch_add(1, Ordering::SeqCst);
    }

    fn clear(&self, wakeup: Wakeup) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(&wakeup).is_some()
    }

    fn clear_all(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn is_scheduled(&self, wakeup: Wakeup) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(&wakeup)
    }

    async fn scheduled_time(&self, wakeup: Wakeup) -> Result<Option<DateTime<Local>>, String> {
        if self.stall_lookups.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(format!("lookup of {} rejected", wakeup));
        }
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(&wakeup).map(|(_, at)| *at))
    }
}
