//! Wake-up service backed by tokio interval tasks

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use super::{Wakeup, WakeupService, WakeupSpec};

struct Entry {
    handle: JoinHandle<()>,
    next_fire: Arc<Mutex<DateTime<Local>>>,
}

/// One interval task per scheduled wake-up. Fired names are sent down the
/// channel returned from [`TokioWakeups::new`].
pub struct TokioWakeups {
    fired_tx: mpsc::UnboundedSender<Wakeup>,
    entries: Mutex<HashMap<Wakeup, Entry>>,
}

impl TokioWakeups {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Wakeup>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let service = Self {
            fired_tx,
            entries: Mutex::new(HashMap::new()),
        };
        (service, fired_rx)
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<Wakeup, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn to_chrono(duration: std::time::Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero())
}

#[async_trait]
impl WakeupService for TokioWakeups {
    fn create(&self, wakeup: Wakeup, spec: WakeupSpec) {
        let next_fire = Arc::new(Mutex::new(Local::now() + to_chrono(spec.delay)));
        let task_next_fire = Arc::clone(&next_fire);
        let fired_tx = self.fired_tx.clone();

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + spec.delay, spec.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if let Ok(mut at) = task_next_fire.lock() {
                    *at = Local::now() + to_chrono(spec.period);
                }
                if fired_tx.send(wakeup).is_err() {
                    debug!("No receiver for {}, stopping its task", wakeup);
                    break;
                }
            }
        });

        if let Some(previous) = self.entries().insert(wakeup, Entry { handle, next_fire }) {
            previous.handle.abort();
        }
        debug!("Created {} every {:?}", wakeup, spec.period);
    }

    fn clear(&self, wakeup: Wakeup) -> bool {
        match self.entries().remove(&wakeup) {
            Some(entry) => {
                entry.handle.abort();
                debug!("Cleared {}", wakeup);
                true
            }
            None => false,
        }
    }

    fn clear_all(&self) {
        for (_, entry) in self.entries().drain() {
            entry.handle.abort();
        }
    }

    fn is_scheduled(&self, wakeup: Wakeup) -> bool {
        self.entries().contains_key(&wakeup)
    }

    async fn scheduled_time(&self, wakeup: Wakeup) -> Result<Option<DateTime<Local>>, String> {
        let entries = self.entries();
        match entries.get(&wakeup) {
            Some(entry) => entry
                .next_fire
                .lock()
                .map(|at| Some(*at))
                .map_err(|e| format!("Failed to read next firing of {}: {}", wakeup, e)),
            None => Ok(None),
        }
    }
}

impl Drop for TokioWakeups {
    fn drop(&mut self) {
        self.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn fires_by_name_until_cleared() {
        let (service, mut fired) = TokioWakeups::new();
        let spec = WakeupSpec {
            delay: Duration::from_millis(5),
            period: Duration::from_millis(5),
        };
        service.create(Wakeup::Stretch, spec);

        assert_eq!(fired.recv().await, Some(Wakeup::Stretch));
        assert_eq!(fired.recv().await, Some(Wakeup::Stretch));
        assert!(service.scheduled_time(Wakeup::Stretch).await.unwrap().is_some());

        assert!(service.clear(Wakeup::Stretch));
        assert!(!service.clear(Wakeup::Stretch));
        assert!(service.scheduled_time(Wakeup::Stretch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_replaces_same_name() {
        let (service, _fired) = TokioWakeups::new();
        service.create(Wakeup::Water, WakeupSpec::every_minutes(60));
        service.create(Wakeup::Water, WakeupSpec::every_minutes(5));
        service.create(Wakeup::Pomodoro, WakeupSpec::every_minutes(1));

        let next = service.scheduled_time(Wakeup::Water).await.unwrap().unwrap();
        assert!(next <= Local::now() + chrono::Duration::minutes(5));

        service.clear_all();
        assert!(!service.is_scheduled(Wakeup::Water));
        assert!(!service.is_scheduled(Wakeup::Pomodoro));
    }
}
