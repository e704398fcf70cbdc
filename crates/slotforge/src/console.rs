//! Colorful console output for scheduling runs.
//!
//! Provides a custom `tracing` layer that formats scheduler events with colors.
//!
//! ## Log Levels
//!
//! - **WARN**: Recoverable data issues
//! - **INFO**: Lifecycle events (solve/phase start/end, trims)
//! - **DEBUG**: Optimiser runs and escape steps
//! - **TRACE**: Individual placements and switches

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

const CRATES: [&str; 4] = ["slotforge", "slotforge_core", "slotforge_scoring", "slotforge_solver"];

/// Maps the configured verbosity to a level filter.
pub fn verbosity_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initializes console output.
///
/// `RUST_LOG` takes precedence over `verbosity` when set. Safe to call
/// multiple times - only the first call has effect.
pub fn init(verbosity: u8) {
    INIT.get_or_init(|| {
        let level = verbosity_level(verbosity);
        let directives = CRATES
            .iter()
            .map(|krate| format!("{krate}={level}"))
            .collect::<Vec<_>>()
            .join(",");
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(ScheduleConsoleLayer)
            .try_init();
    });
}

// Marks the start of solving for elapsed time tracking.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

/// A tracing layer that formats scheduler events with colors.
pub struct ScheduleConsoleLayer;

impl<S: Subscriber> Layer<S> for ScheduleConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("slotforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    cost: Option<String>,
    best: Option<String>,
    group: Option<String>,
    session: Option<String>,
    requirement: Option<String>,
    message: Option<String>,
    run: Option<u64>,
    runs: Option<u64>,
    moved: Option<u64>,
    duration_ms: Option<u64>,
    session_count: Option<u64>,
    timeslot_count: Option<u64>,
    max_cycles: Option<u64>,
    violations: Option<u64>,
    requested: Option<u64>,
    trimmed_to: Option<u64>,
    converged: Option<bool>,
}

fn unquote(value: &dyn std::fmt::Debug) -> String {
    format!("{:?}", value).trim_matches('"').to_string()
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "event" => self.event = Some(unquote(value)),
            "phase" => self.phase = Some(unquote(value)),
            "cost" => self.cost = Some(unquote(value)),
            "best" => self.best = Some(unquote(value)),
            "group" => self.group = Some(unquote(value)),
            "session" => self.session = Some(unquote(value)),
            "requirement" => self.requirement = Some(unquote(value)),
            "message" => self.message = Some(unquote(value)),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "run" => self.run = Some(value),
            "runs" => self.runs = Some(value),
            "moved" => self.moved = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "session_count" => self.session_count = Some(value),
            "timeslot_count" => self.timeslot_count = Some(value),
            "max_cycles" => self.max_cycles = Some(value),
            "violations" => self.violations = Some(value),
            "requested" => self.requested = Some(value),
            "trimmed_to" => self.trimmed_to = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "converged" {
            self.converged = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "phase" => self.phase = Some(value.to_string()),
            "group" => self.group = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    if level == Level::WARN || level == Level::ERROR {
        return format_warning(v);
    }
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "session_trimmed" => format_trim(v),
        "run_end" => format_run_end(v),
        "escape" => format_escape(v),
        "converged" => format_converged(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_cost(cost: &str) -> String {
    match cost.parse::<u64>() {
        Ok(0) => "0".bright_green().bold().to_string(),
        Ok(value) => value
            .to_formatted_string(&Locale::en)
            .bright_yellow()
            .to_string(),
        Err(_) => cost.bright_red().bold().to_string(),
    }
}

fn format_count(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    format!(
        "{} {} Scheduling │ {} sessions │ {} timeslots │ {} runs max",
        format_elapsed(),
        "▶".bright_green().bold(),
        format_count(v.session_count.unwrap_or(0)).bright_yellow(),
        format_count(v.timeslot_count.unwrap_or(0)).bright_yellow(),
        format_count(v.max_cycles.unwrap_or(0)).bright_yellow(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let cost = v.cost.as_deref().unwrap_or("N/A");
    let status = if v.converged.unwrap_or(false) {
        "CONVERGED".bright_green().bold().to_string()
    } else {
        "BUDGET EXHAUSTED".bright_yellow().bold().to_string()
    };

    format!(
        "{} {} Scheduling complete │ {} │ {} runs │ {} violations │ cost {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        status,
        format_count(v.runs.unwrap_or(0)).white(),
        format_count(v.violations.unwrap_or(0)).white(),
        format_cost(cost),
    )
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    format!(
        "{} {} {} started",
        format_elapsed(),
        "▶".bright_blue(),
        phase.white().bold()
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    format!(
        "{} {} {} ended │ {} │ cost {}",
        format_elapsed(),
        "◀".bright_blue(),
        phase.white().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        format_cost(v.cost.as_deref().unwrap_or("N/A")),
    )
}

fn format_trim(v: &EventVisitor) -> String {
    format!(
        "{} {} {} trimmed │ {} {} → {}",
        format_elapsed(),
        "✂".bright_yellow(),
        v.group.as_deref().unwrap_or("?").white().bold(),
        v.requirement.as_deref().unwrap_or("requirement"),
        format_count(v.requested.unwrap_or(0)).bright_red(),
        format_count(v.trimmed_to.unwrap_or(0)).bright_green(),
    )
}

fn format_run_end(v: &EventVisitor) -> String {
    format!(
        "{} {} Run {:>5} │ cost {} │ best {}",
        format_elapsed(),
        "⚡".bright_cyan(),
        format_count(v.run.unwrap_or(0)).white(),
        format_cost(v.cost.as_deref().unwrap_or("N/A")),
        format_cost(v.best.as_deref().unwrap_or("N/A")),
    )
}

fn format_escape(v: &EventVisitor) -> String {
    format!(
        "{} {} Escape │ {} sessions relocated",
        format_elapsed(),
        "↯".bright_magenta(),
        format_count(v.moved.unwrap_or(0)).bright_magenta(),
    )
}

fn format_converged(v: &EventVisitor) -> String {
    format!(
        "{} {} Zero cost reached in run {}",
        format_elapsed(),
        "✓".bright_green(),
        format_count(v.run.unwrap_or(0)).bright_green(),
    )
}

fn format_warning(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} {}",
        format_elapsed(),
        "⚠".bright_yellow().bold(),
        v.event.as_deref().unwrap_or("warning").yellow(),
    );
    if let Some(group) = &v.group {
        output.push_str(&format!(" │ {}", group.white()));
    }
    if let Some(session) = &v.session {
        output.push_str(&format!(" │ session {}", session));
    }
    if let Some(message) = &v.message {
        output.push_str(&format!(" │ {}", message));
    }
    output
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.2}s", ms as f64 / 1000.0)
    }
}
