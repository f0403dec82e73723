//! Main application state management
//!
//! [`AppState`] is the coordinator: the only owner of the timer and water
//! records. Every entry point (command or wake-up) locks the snapshot, runs
//! the daily rollover, applies its effect, persists and broadcasts before the
//! next one can start.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use super::{reconcile_in_place, CycleEnd, Durations, TimerState, WaterLog, WaterState, TICK_SECONDS};
use crate::{
    catalog,
    clock::Clock,
    config::ReminderIntervals,
    error::{CoordinatorError, Result},
    notify::{AlertContext, Dispatcher, FollowUp, Interaction, NotificationId, NotificationKind, Notifier, View},
    scheduler::{ReminderScheduler, Wakeup, WakeupService, LOOKUP_TIMEOUT},
    store::StateStore,
};

/// Tunables the coordinator runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub durations: Durations,
    pub intervals: ReminderIntervals,
    pub max_glasses: u32,
    /// Bound on the next-alarm lookup
    pub lookup_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            durations: Durations::default(),
            intervals: ReminderIntervals::default(),
            max_glasses: 8,
            lookup_timeout: LOOKUP_TIMEOUT,
        }
    }
}

/// Platform services the coordinator drives
pub struct Collaborators {
    pub store: Arc<dyn StateStore>,
    pub wakeups: Arc<dyn WakeupService>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
}

/// Events pushed to whichever UI surfaces are listening
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoordinatorEvent {
    PomodoroUpdate { state: TimerState },
    #[serde(rename_all = "camelCase")]
    WaterUpdate { water_count: u32 },
    OpenView { view: View },
    #[serde(rename_all = "camelCase")]
    Alert {
        notification_id: NotificationId,
        kind: NotificationKind,
    },
}

/// Next stretch and exercise reminders, as local `HH:MM` or a fallback label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmTimes {
    pub next_stretch: String,
    pub next_exercise: String,
}

/// Both records as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub timer: TimerState,
    pub water: WaterState,
}

/// The background coordinator
pub struct AppState {
    snapshot: Mutex<Snapshot>,
    settings: Settings,
    store: Arc<dyn StateStore>,
    scheduler: ReminderScheduler,
    dispatcher: Dispatcher,
    clock: Arc<dyn Clock>,
    /// Server metadata
    pub start_time: Instant,
    /// Channel for UI broadcasts
    pub event_tx: broadcast::Sender<CoordinatorEvent>,
}

impl AppState {
    /// Load (or install) the records, force the timer paused, reconcile and
    /// schedule the wake-ups. Store failures fall back to defaults.
    pub fn boot(settings: Settings, collaborators: Collaborators) -> Self {
        let Collaborators {
            store,
            wakeups,
            notifier,
            clock,
        } = collaborators;
        let today = clock.today();

        let records = match store.load() {
            Ok(Some(records)) => {
                info!("Restoring coordinator state");
                records
            }
            Ok(None) => {
                info!("No stored state, installing defaults");
                Default::default()
            }
            Err(e) => {
                warn!("Failed to load stored state, starting from defaults: {}", e);
                Default::default()
            }
        };

        let mut timer = TimerState::restore(records.pomodoro.as_ref(), settings.durations, today);
        let mut water = WaterState::restore(records.water.as_ref(), settings.max_glasses, today);
        if reconcile_in_place(&mut timer, today) {
            info!("Stored pomodoro count is from {}, reset for today", timer.last_reset_date);
        }
        if reconcile_in_place(&mut water, today) {
            info!("Stored water count is stale, reset for today");
        }

        let (event_tx, _) = broadcast::channel(100);
        let state = Self {
            scheduler: ReminderScheduler::new(wakeups, settings.intervals, settings.max_glasses),
            dispatcher: Dispatcher::new(notifier),
            snapshot: Mutex::new(Snapshot {
                timer: timer.clone(),
                water: water.clone(),
            }),
            settings,
            store,
            clock,
            start_time: Instant::now(),
            event_tx,
        };

        state.persist_timer(&timer);
        state.persist_water(&water);
        state.scheduler.resync(&water);
        info!(
            "Coordinator ready: {:?}, {}s left, {} cycles and {}/{} glasses today",
            timer.phase(),
            timer.time_left_seconds,
            timer.cycles_completed_today,
            water.glasses_logged_today,
            settings.max_glasses
        );
        state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.event_tx.subscribe()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Snapshot>> {
        self.snapshot
            .lock()
            .map_err(|e| CoordinatorError::Poisoned(e.to_string()))
    }

    /// Lock, roll over if the day changed, then run `f`
    fn with_snapshot<R>(&self, f: impl FnOnce(&mut Snapshot) -> R) -> Result<R> {
        let mut snapshot = self.lock()?;
        self.reconcile(&mut snapshot);
        Ok(f(&mut snapshot))
    }

    fn reconcile(&self, snapshot: &mut Snapshot) {
        let today = self.clock.today();
        if reconcile_in_place(&mut snapshot.timer, today) {
            info!("New day, pomodoro count reset");
            self.persist_timer(&snapshot.timer);
            self.publish(CoordinatorEvent::PomodoroUpdate {
                state: snapshot.timer.clone(),
            });
        }
        if reconcile_in_place(&mut snapshot.water, today) {
            info!("New day, water count reset");
            self.persist_water(&snapshot.water);
            self.scheduler.sync_water(&snapshot.water);
            self.publish(CoordinatorEvent::WaterUpdate { water_count: 0 });
        }
    }

    fn persist_timer(&self, timer: &TimerState) {
        if let Err(e) = self.store.save_timer(timer) {
            error!("Failed to persist pomodoro state: {}", e);
        }
    }

    fn persist_water(&self, water: &WaterState) {
        if let Err(e) = self.store.save_water(water) {
            error!("Failed to persist water intake: {}", e);
        }
    }

    /// Broadcast to listening UIs. Nobody listening is not an error.
    fn publish(&self, event: CoordinatorEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("No UI listening for updates");
        }
    }

    /// Show an alert and announce its id so listeners can route clicks back
    fn raise(&self, kind: NotificationKind, ctx: AlertContext) {
        let notification_id = self.dispatcher.notify(kind, ctx);
        self.publish(CoordinatorEvent::Alert { notification_id, kind });
    }

    fn alert_context(&self, snapshot: &Snapshot) -> AlertContext {
        AlertContext {
            cycles_today: snapshot.timer.cycles_completed_today,
            glasses_today: snapshot.water.glasses_logged_today,
            max_glasses: self.settings.max_glasses,
        }
    }

    /// Current timer record
    pub fn pomodoro_state(&self) -> Result<TimerState> {
        self.with_snapshot(|snapshot| snapshot.timer.clone())
    }

    pub fn start_pomodoro(&self) -> Result<TimerState> {
        let durations = self.settings.durations;
        self.update_timer("start", |timer| timer.start(durations))
    }

    pub fn pause_pomodoro(&self) -> Result<TimerState> {
        self.update_timer("pause", TimerState::pause)
    }

    pub fn reset_pomodoro(&self) -> Result<TimerState> {
        let durations = self.settings.durations;
        self.update_timer("reset", |timer| {
            timer.reset(durations);
            true
        })
    }

    /// Apply a timer command, then persist and broadcast
    fn update_timer<F>(&self, action: &str, updater: F) -> Result<TimerState>
    where
        F: FnOnce(&mut TimerState) -> bool,
    {
        self.with_snapshot(|snapshot| {
            if updater(&mut snapshot.timer) {
                info!(
                    "Pomodoro {}: {:?} with {}s left",
                    action,
                    snapshot.timer.phase(),
                    snapshot.timer.time_left_seconds
                );
            } else {
                debug!("Pomodoro {} had no effect", action);
            }
            self.persist_timer(&snapshot.timer);
            self.publish(CoordinatorEvent::PomodoroUpdate {
                state: snapshot.timer.clone(),
            });
            snapshot.timer.clone()
        })
    }

    pub fn water_count(&self) -> Result<u32> {
        self.with_snapshot(|snapshot| snapshot.water.glasses_logged_today)
    }

    /// Log one glass. Reaching the goal raises one alert and retires the
    /// water wake-up.
    pub fn log_water(&self) -> Result<u32> {
        let max_glasses = self.settings.max_glasses;
        self.with_snapshot(|snapshot| {
            let outcome = snapshot.water.log_glass(max_glasses);
            match outcome {
                WaterLog::Logged { count } => info!("Logged glass {}/{}", count, max_glasses),
                WaterLog::GoalReached { count } => {
                    info!("Hydration goal reached with {} glasses", count);
                    self.raise(NotificationKind::WaterGoalReached, self.alert_context(snapshot));
                    self.scheduler.retire_water();
                }
                WaterLog::AlreadyMet { .. } => debug!("Water goal already met, glass not counted"),
            }
            self.persist_water(&snapshot.water);
            self.publish(CoordinatorEvent::WaterUpdate {
                water_count: outcome.count(),
            });
            outcome.count()
        })
    }

    /// Next stretch and exercise firings. Never waits longer than the
    /// configured lookup timeout.
    pub async fn next_alarm_times(&self) -> Result<AlarmTimes> {
        self.with_snapshot(|_| ())?;
        let timeout = self.settings.lookup_timeout;
        let (next_stretch, next_exercise) = tokio::join!(
            self.scheduler.next_fire_label(Wakeup::Stretch, timeout),
            self.scheduler.next_fire_label(Wakeup::Exercise, timeout),
        );
        Ok(AlarmTimes {
            next_stretch,
            next_exercise,
        })
    }

    pub fn stretch_selection(&self) -> Result<Vec<&'static str>> {
        self.with_snapshot(|_| catalog::pick_stretches(&mut rand::thread_rng(), catalog::STRETCH_SET_SIZE))
    }

    pub fn exercise_selection(&self) -> Result<&'static str> {
        self.with_snapshot(|_| catalog::pick_exercise(&mut rand::thread_rng()))
    }

    /// Handle one fired wake-up
    pub fn handle_wakeup(&self, wakeup: Wakeup) -> Result<()> {
        self.with_snapshot(|snapshot| match wakeup {
            Wakeup::Pomodoro => self.advance_timer(snapshot),
            Wakeup::Stretch => self.raise(NotificationKind::StretchDue, self.alert_context(snapshot)),
            Wakeup::Exercise => self.raise(NotificationKind::ExerciseDue, self.alert_context(snapshot)),
            Wakeup::Water => {
                if snapshot.water.goal_met(self.settings.max_glasses) {
                    self.scheduler.retire_water();
                } else {
                    self.raise(NotificationKind::WaterDue, self.alert_context(snapshot));
                }
            }
        })
    }

    fn advance_timer(&self, snapshot: &mut Snapshot) {
        if !snapshot.timer.is_running {
            return;
        }
        match snapshot.timer.tick(TICK_SECONDS, self.settings.durations) {
            Some(CycleEnd::WorkComplete { cycles_today }) => {
                info!("Work phase complete, {} today", cycles_today);
                let ctx = self.alert_context(snapshot);
                self.raise(NotificationKind::WorkComplete, ctx);
                self.raise(NotificationKind::StretchDue, ctx);
            }
            Some(CycleEnd::BreakOver) => {
                info!("Break over");
                self.raise(NotificationKind::BreakOver, self.alert_context(snapshot));
            }
            None => debug!("Pomodoro tick, {}s left", snapshot.timer.time_left_seconds),
        }
        self.persist_timer(&snapshot.timer);
        self.publish(CoordinatorEvent::PomodoroUpdate {
            state: snapshot.timer.clone(),
        });
    }

    /// An alert body was clicked
    pub fn handle_notification_click(&self, raw_id: &str) -> Result<Option<FollowUp>> {
        match parse_notification_id(raw_id) {
            Some(id) => self.handle_interaction(id, Interaction::Clicked),
            None => Ok(None),
        }
    }

    /// An alert button was pressed
    pub fn handle_notification_button(&self, raw_id: &str, button_index: u32) -> Result<Option<FollowUp>> {
        match parse_notification_id(raw_id) {
            Some(id) => self.handle_interaction(id, Interaction::Button(button_index)),
            None => Ok(None),
        }
    }

    /// Route a click or button press on a shown alert to its follow-up
    pub fn handle_interaction(&self, id: NotificationId, interaction: Interaction) -> Result<Option<FollowUp>> {
        debug!("{:?} on {}", interaction, id);
        self.run_follow_up(self.dispatcher.respond(&id, interaction))
    }

    fn run_follow_up(&self, follow_up: Option<FollowUp>) -> Result<Option<FollowUp>> {
        match follow_up {
            Some(FollowUp::LogWater) => {
                self.log_water()?;
            }
            Some(FollowUp::OpenView { view }) => {
                info!("Requesting {:?} view", view);
                self.publish(CoordinatorEvent::OpenView { view });
            }
            None => {}
        }
        Ok(follow_up)
    }

    /// Write both records, used on shutdown
    pub fn persist_all(&self) -> Result<()> {
        let snapshot = self.lock()?;
        self.store.save_timer(&snapshot.timer)?;
        self.store.save_water(&snapshot.water)?;
        Ok(())
    }

    /// Time since boot, for the health report
    pub fn uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }
}

/// `1d 2h`, `12m 30s` or `8s`: the largest non-zero unit and the next one
fn format_uptime(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let units = [
        (total / 86_400, "d"),
        (total / 3_600 % 24, "h"),
        (total / 60 % 60, "m"),
        (total % 60, "s"),
    ];
    let first = units.iter().position(|(value, _)| *value > 0).unwrap_or(units.len() - 1);
    units[first..]
        .iter()
        .take(2)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_notification_id(raw_id: &str) -> Option<NotificationId> {
    match raw_id.parse() {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Ignoring interaction with unknown notification: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::FixedClock,
        error::StoreError,
        notify::RecordingNotifier,
        scheduler::ManualWakeups,
        store::{MemoryStore, StoredRecords, POMODORO_RECORD, WATER_RECORD},
    };
    use chrono::{Local, NaiveDate, TimeZone};
    use serde_json::{json, Value};

    struct Fixture {
        state: AppState,
        store: Arc<MemoryStore>,
        wakeups: Arc<ManualWakeups>,
        notifier: Arc<RecordingNotifier>,
        clock: Arc<FixedClock>,
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn boot_with(records: Option<Value>) -> Fixture {
        let store = Arc::new(match records {
            Some(Value::Object(map)) => MemoryStore::with_records(map),
            _ => MemoryStore::new(),
        });
        let wakeups = Arc::new(ManualWakeups::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(FixedClock::new(Local.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()));
        let state = AppState::boot(
            Settings {
                lookup_timeout: Duration::from_millis(20),
                ..Settings::default()
            },
            Collaborators {
                store: Arc::clone(&store) as Arc<dyn StateStore>,
                wakeups: Arc::clone(&wakeups) as Arc<dyn WakeupService>,
                notifier: Arc::clone(&notifier) as Arc<dyn Notifier>,
                clock: Arc::clone(&clock) as Arc<dyn Clock>,
            },
        );
        Fixture {
            state,
            store,
            wakeups,
            notifier,
            clock,
        }
    }

    fn water_record(glasses: u32, date: &str) -> Value {
        json!({ "glassesLoggedToday": glasses, "lastResetDate": date })
    }

    #[test]
    fn fresh_install_persists_defaults_and_schedules_everything() {
        let f = boot_with(None);
        let timer = f.state.pomodoro_state().unwrap();
        assert_eq!(timer, TimerState::fresh(Durations::default(), today()));
        assert_eq!(
            f.store.record(POMODORO_RECORD),
            Some(serde_json::to_value(&timer).unwrap())
        );
        assert_eq!(f.store.record(WATER_RECORD), Some(water_record(0, "2026-10-16")));
        assert_eq!(f.wakeups.scheduled(), Wakeup::ALL.to_vec());
    }

    #[test]
    fn restart_never_trusts_a_running_timer() {
        let f = boot_with(Some(json!({
            POMODORO_RECORD: {
                "timeLeftSeconds": 600,
                "isRunning": true,
                "isWorkMode": false,
                "cyclesCompletedToday": 3,
                "lastResetDate": "2026-10-16"
            },
            WATER_RECORD: water_record(8, "2026-10-16")
        })));
        let timer = f.state.pomodoro_state().unwrap();
        assert!(!timer.is_running);
        // 600s is longer than a break, so it is reset to a full break
        assert_eq!(timer.time_left_seconds, 300);
        assert_eq!(timer.cycles_completed_today, 3);
        assert!(!f.wakeups.is_scheduled(Wakeup::Water));
    }

    #[test]
    fn work_cycle_scenario() {
        let f = boot_with(None);
        let started = f.state.start_pomodoro().unwrap();
        assert!(started.is_running);
        assert_eq!(started.time_left_seconds, 1500);

        for _ in 0..25 {
            f.state.handle_wakeup(Wakeup::Pomodoro).unwrap();
        }

        let timer = f.state.pomodoro_state().unwrap();
        assert_eq!(
            (timer.is_running, timer.is_work_mode, timer.time_left_seconds, timer.cycles_completed_today),
            (false, false, 300, 1)
        );
        assert_eq!(
            f.notifier.kinds(),
            vec![NotificationKind::WorkComplete, NotificationKind::StretchDue]
        );
        assert_eq!(f.store.record(POMODORO_RECORD), Some(serde_json::to_value(&timer).unwrap()));

        // the break waits for an explicit start
        f.state.handle_wakeup(Wakeup::Pomodoro).unwrap();
        assert_eq!(f.state.pomodoro_state().unwrap().time_left_seconds, 300);
    }

    #[test]
    fn break_end_notifies_once() {
        let f = boot_with(Some(json!({
            POMODORO_RECORD: {
                "timeLeftSeconds": 60,
                "isRunning": false,
                "isWorkMode": false,
                "cyclesCompletedToday": 1,
                "lastResetDate": "2026-10-16"
            }
        })));
        f.state.start_pomodoro().unwrap();
        f.state.handle_wakeup(Wakeup::Pomodoro).unwrap();

        let timer = f.state.pomodoro_state().unwrap();
        assert!(timer.is_work_mode);
        assert_eq!(timer.time_left_seconds, 1500);
        assert_eq!(timer.cycles_completed_today, 1);
        assert_eq!(f.notifier.kinds(), vec![NotificationKind::BreakOver]);
    }

    #[test]
    fn goal_reached_alerts_once_and_retires_water() {
        let f = boot_with(Some(json!({ WATER_RECORD: water_record(7, "2026-10-16") })));
        assert!(f.wakeups.is_scheduled(Wakeup::Water));

        assert_eq!(f.state.log_water().unwrap(), 8);
        assert_eq!(f.state.log_water().unwrap(), 8);

        assert_eq!(f.notifier.count(NotificationKind::WaterGoalReached), 1);
        assert!(!f.wakeups.is_scheduled(Wakeup::Water));
        assert_eq!(f.store.record(WATER_RECORD), Some(water_record(8, "2026-10-16")));
    }

    #[test]
    fn water_wakeup_after_goal_retires_itself() {
        let f = boot_with(Some(json!({ WATER_RECORD: water_record(8, "2026-10-16") })));
        f.wakeups.create(Wakeup::Water, crate::scheduler::WakeupSpec::every_minutes(60));

        f.state.handle_wakeup(Wakeup::Water).unwrap();
        assert!(!f.wakeups.is_scheduled(Wakeup::Water));
        assert!(f.notifier.alerts().is_empty());
    }

    #[test]
    fn reminders_fire_by_name() {
        let f = boot_with(Some(json!({ WATER_RECORD: water_record(2, "2026-10-16") })));
        f.state.handle_wakeup(Wakeup::Stretch).unwrap();
        f.state.handle_wakeup(Wakeup::Exercise).unwrap();
        f.state.handle_wakeup(Wakeup::Water).unwrap();
        f.state.handle_wakeup(Wakeup::Pomodoro).unwrap();

        assert_eq!(
            f.notifier.kinds(),
            vec![
                NotificationKind::StretchDue,
                NotificationKind::ExerciseDue,
                NotificationKind::WaterDue
            ]
        );
        assert_eq!(f.notifier.alerts()[2].message, "Drank: 2/8. Log more?");
    }

    #[test]
    fn day_change_rolls_counters_and_restores_water_reminders() {
        let f = boot_with(Some(json!({
            POMODORO_RECORD: {
                "timeLeftSeconds": 900,
                "isWorkMode": true,
                "cyclesCompletedToday": 4,
                "lastResetDate": "2026-10-16"
            },
            WATER_RECORD: water_record(8, "2026-10-16")
        })));
        assert!(!f.wakeups.is_scheduled(Wakeup::Water));

        f.clock.advance(chrono::Duration::days(1));
        assert_eq!(f.state.water_count().unwrap(), 0);
        assert!(f.wakeups.is_scheduled(Wakeup::Water));

        let timer = f.state.pomodoro_state().unwrap();
        assert_eq!(timer.cycles_completed_today, 0);
        assert_eq!(timer.time_left_seconds, 900);
        assert_eq!(timer.last_reset_date, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
    }

    #[test]
    fn counters_roll_over_on_their_own_dates() {
        let f = boot_with(Some(json!({
            POMODORO_RECORD: {
                "timeLeftSeconds": 1500,
                "isWorkMode": true,
                "cyclesCompletedToday": 2,
                "lastResetDate": "2026-10-16"
            },
            WATER_RECORD: water_record(5, "2026-10-15")
        })));
        assert_eq!(f.state.pomodoro_state().unwrap().cycles_completed_today, 2);
        assert_eq!(f.state.water_count().unwrap(), 0);
        assert_eq!(f.store.record(WATER_RECORD), Some(water_record(0, "2026-10-16")));
    }

    #[test]
    fn commands_broadcast_updates() {
        let f = boot_with(None);
        let mut rx = f.state.subscribe();

        f.state.start_pomodoro().unwrap();
        f.state.log_water().unwrap();

        match rx.try_recv().unwrap() {
            CoordinatorEvent::PomodoroUpdate { state } => assert!(state.is_running),
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(rx.try_recv().unwrap(), CoordinatorEvent::WaterUpdate { water_count: 1 });
    }

    #[test]
    fn events_serialize_to_wire_shape() {
        let json = serde_json::to_value(CoordinatorEvent::WaterUpdate { water_count: 3 }).unwrap();
        assert_eq!(json, json!({ "type": "WATER_UPDATE", "waterCount": 3 }));
        let json = serde_json::to_value(CoordinatorEvent::OpenView { view: View::Stretch }).unwrap();
        assert_eq!(json, json!({ "type": "OPEN_VIEW", "view": "stretch" }));
    }

    #[test]
    fn water_button_logs_a_glass_and_clicks_request_views() {
        let f = boot_with(None);
        f.state.handle_wakeup(Wakeup::Water).unwrap();
        f.state.handle_wakeup(Wakeup::Stretch).unwrap();
        let alerts = f.notifier.alerts();
        let mut rx = f.state.subscribe();

        let follow_up = f
            .state
            .handle_notification_button(&alerts[0].id.to_string(), 0)
            .unwrap();
        assert_eq!(follow_up, Some(FollowUp::LogWater));
        assert_eq!(f.state.water_count().unwrap(), 1);

        let follow_up = f.state.handle_notification_click(&alerts[1].id.to_string()).unwrap();
        assert_eq!(follow_up, Some(FollowUp::OpenView { view: View::Stretch }));
        assert_eq!(rx.try_recv().unwrap(), CoordinatorEvent::WaterUpdate { water_count: 1 });
        assert_eq!(rx.try_recv().unwrap(), CoordinatorEvent::OpenView { view: View::Stretch });

        assert_eq!(f.state.handle_notification_click("pomodoroEndWork_123").unwrap(), None);
        assert_eq!(f.notifier.dismissed().len(), 2);
    }

    #[tokio::test]
    async fn next_alarm_times_fall_back_without_hanging() {
        let f = boot_with(None);
        f.wakeups
            .set_next_fire(Wakeup::Stretch, Local.with_ymd_and_hms(2026, 10, 16, 9, 45, 0).unwrap());
        f.wakeups.clear(Wakeup::Exercise);

        let times = f.state.next_alarm_times().await.unwrap();
        assert_eq!(times.next_stretch, "09:45");
        assert_eq!(times.next_exercise, "Pending...");

        f.wakeups.stall_lookups(true);
        let times = f.state.next_alarm_times().await.unwrap();
        assert_eq!(times.next_stretch, "Err");
        assert_eq!(times.next_exercise, "Err");
    }

    #[test]
    fn selections_come_from_the_catalog() {
        let f = boot_with(None);
        assert_eq!(f.state.stretch_selection().unwrap().len(), catalog::STRETCH_SET_SIZE);
        assert!(catalog::EXERCISE_GIFS.contains(&f.state.exercise_selection().unwrap()));
    }

    #[test]
    fn alerts_are_announced_with_their_id() {
        let f = boot_with(None);
        let mut rx = f.state.subscribe();
        f.state.handle_wakeup(Wakeup::Exercise).unwrap();

        let id = f.notifier.alerts()[0].id;
        assert_eq!(
            rx.try_recv().unwrap(),
            CoordinatorEvent::Alert {
                notification_id: id,
                kind: NotificationKind::ExerciseDue,
            }
        );
        let json = serde_json::to_value(CoordinatorEvent::Alert {
            notification_id: id,
            kind: NotificationKind::ExerciseDue,
        })
        .unwrap();
        assert_eq!(
            json,
            json!({ "type": "ALERT", "notificationId": id.to_string(), "kind": "exercise-due" })
        );
    }

    #[test]
    fn typed_interactions_follow_up_like_raw_ids() {
        let f = boot_with(None);
        f.state.handle_wakeup(Wakeup::Water).unwrap();
        let id = f.notifier.alerts()[0].id;

        assert_eq!(
            f.state.handle_interaction(id, Interaction::Button(0)).unwrap(),
            Some(FollowUp::LogWater)
        );
        assert_eq!(
            f.state.handle_interaction(id, Interaction::Clicked).unwrap(),
            Some(FollowUp::OpenView { view: View::Popup })
        );
        assert_eq!(f.state.water_count().unwrap(), 1);
    }

    #[test]
    fn uptime_shows_two_largest_units() {
        assert_eq!(format_uptime(Duration::from_secs(8)), "8s");
        assert_eq!(format_uptime(Duration::from_secs(750)), "12m 30s");
        assert_eq!(format_uptime(Duration::from_secs(3 * 3600 + 5)), "3h 0m");
        assert_eq!(format_uptime(Duration::from_secs(86_400 + 2 * 3600 + 300)), "1d 2h");
        assert_eq!(format_uptime(Duration::ZERO), "0s");
    }

    struct BrokenStore;

    impl StateStore for BrokenStore {
        fn load(&self) -> std::result::Result<Option<StoredRecords>, StoreError> {
            Err(StoreError::Poisoned("disk gone".to_string()))
        }

        fn save_record(&self, _name: &str, _record: Value) -> std::result::Result<(), StoreError> {
            Err(StoreError::Poisoned("disk gone".to_string()))
        }
    }

    #[test]
    fn store_failures_do_not_stop_the_coordinator() {
        let state = AppState::boot(
            Settings::default(),
            Collaborators {
                store: Arc::new(BrokenStore),
                wakeups: Arc::new(ManualWakeups::new()),
                notifier: Arc::new(RecordingNotifier::new()),
                clock: Arc::new(FixedClock::new(Local.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap())),
            },
        );
        assert!(state.start_pomodoro().unwrap().is_running);
        assert_eq!(state.log_water().unwrap(), 1);
        assert!(state.persist_all().is_err());
    }
}
