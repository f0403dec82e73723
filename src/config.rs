//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::state::{Durations, Settings};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "deskfit")]
#[command(about = "Background coordinator for Pomodoro, stretch, exercise and hydration reminders")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the message channel to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File holding the persisted pomodoro and water records
    #[arg(long, default_value = "deskfit-state.json")]
    pub state_file: PathBuf,

    /// Length of a work phase in minutes
    #[arg(long, default_value = "25")]
    pub work_minutes: u32,

    /// Length of a break phase in minutes
    #[arg(long, default_value = "5")]
    pub break_minutes: u32,

    /// Minutes between stretch reminders
    #[arg(long, default_value = "45")]
    pub stretch_interval: u32,

    /// Minutes between exercise reminders
    #[arg(long, default_value = "120")]
    pub exercise_interval: u32,

    /// Minutes between water reminders
    #[arg(long, default_value = "60")]
    pub water_interval: u32,

    /// Daily hydration goal in glasses
    #[arg(long, default_value = "8")]
    pub max_glasses: u32,

    /// Keep state in memory only; nothing is read from or written to disk
    #[arg(long)]
    pub ephemeral: bool,

    /// Log notifications instead of showing desktop alerts
    #[arg(long)]
    pub no_desktop_notifications: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Longest phase or reminder period accepted, one day
pub const MAX_MINUTES: u32 = 24 * 60;

/// Reminder periods in minutes, one per recurring reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderIntervals {
    pub stretch_minutes: u32,
    pub exercise_minutes: u32,
    pub water_minutes: u32,
}

impl Default for ReminderIntervals {
    fn default() -> Self {
        Self {
            stretch_minutes: 45,
            exercise_minutes: 120,
            water_minutes: 60,
        }
    }
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Reject settings the coordinator cannot run with
    pub fn validate(&self) -> Result<(), String> {
        let minutes = [
            ("work-minutes", self.work_minutes),
            ("break-minutes", self.break_minutes),
            ("stretch-interval", self.stretch_interval),
            ("exercise-interval", self.exercise_interval),
            ("water-interval", self.water_interval),
        ];
        if let Some((name, _)) = minutes.iter().find(|(_, value)| *value == 0) {
            return Err(format!("--{} must be at least 1", name));
        }
        if let Some((name, _)) = minutes.iter().find(|(_, value)| *value > MAX_MINUTES) {
            return Err(format!("--{} must be at most {}", name, MAX_MINUTES));
        }
        if self.max_glasses == 0 {
            return Err("--max-glasses must be at least 1".to_string());
        }
        Ok(())
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn durations(&self) -> Durations {
        Durations::from_minutes(self.work_minutes, self.break_minutes)
    }

    pub fn intervals(&self) -> ReminderIntervals {
        ReminderIntervals {
            stretch_minutes: self.stretch_interval,
            exercise_minutes: self.exercise_interval,
            water_minutes: self.water_interval,
        }
    }

    /// Everything the coordinator needs from the command line
    pub fn settings(&self) -> Settings {
        Settings {
            durations: self.durations(),
            intervals: self.intervals(),
            max_glasses: self.max_glasses,
            ..Settings::default()
        }
    }
}
