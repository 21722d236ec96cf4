use crate::models::WeekState;
use crate::storage::KeyValueStore;
use crate::tracker::{get_week_state, load_archive};
use crate::week::{Day, WeekKey};
use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write};

const TITLE: &str = "WINTER ARC - Workout Log";
const HEADER_RULE_WIDTH: usize = 50;
const WEEK_RULE_WIDTH: usize = 30;

pub fn log_file_name(week: &WeekKey) -> String {
    format!("winter-arc-log-{week}.txt")
}

/// Plain-text log of the current week followed by archived weeks, newest first.
pub fn build_log_text<S, Tz>(store: &S, current_week: &WeekKey, exported_at: &DateTime<Tz>) -> String
where
    S: KeyValueStore + ?Sized,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut text = String::new();
    text.push_str(TITLE);
    text.push('\n');
    let _ = writeln!(text, "Exported: {}", exported_at.format("%Y-%m-%d %H:%M:%S"));
    text.push_str(&"=".repeat(HEADER_RULE_WIDTH));
    text.push_str("\n\n");

    let current = get_week_state(store, current_week);
    write_week(&mut text, current_week, &current, true);

    for entry in load_archive(store).iter().rev() {
        write_week(&mut text, &entry.week, &entry.data, false);
    }

    text
}

fn write_week(text: &mut String, week: &WeekKey, state: &WeekState, is_current: bool) {
    let marker = if is_current { " (current)" } else { "" };
    let _ = writeln!(text, "WEEK: {week}{marker}");
    text.push_str(&"-".repeat(WEEK_RULE_WIDTH));
    text.push('\n');

    let mut any_tracked = false;
    for day in Day::ALL {
        let Some(exercises) = state.get(&day) else {
            continue;
        };
        any_tracked = true;
        let _ = writeln!(text, "  {}:", day.label());
        for (exercise, done) in exercises {
            let mark = if *done { "[x]" } else { "[ ]" };
            let _ = writeln!(text, "    {mark} {}", exercise.replace('-', " "));
        }
    }

    if !any_tracked {
        text.push_str("  (no exercises tracked)\n");
    }

    text.push('\n');
}
