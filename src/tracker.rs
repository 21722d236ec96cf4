//! Week rollover and per-exercise completion flags.
//!
//! `ensure_current_week` must run before any flag is read or written so a new
//! week never sees the previous week's state.

use crate::models::{ArchiveEntry, WeekState};
use crate::storage::{load_json, save_json, tracker_key, KeyValueStore, StoreError, ARCHIVE_KEY, CURRENT_WEEK_KEY};
use crate::week::{current_week_key_at, Day, WeekKey};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde_json::Value;
use tracing::{info, warn};

pub fn ensure_current_week<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<WeekKey, StoreError> {
    ensure_current_week_at(store, &Local::now())
}

/// Archives the stored week's state if `now` falls in a different week, then
/// points storage at the current week. Idempotent within a week.
pub fn ensure_current_week_at<S, Tz>(store: &mut S, now: &DateTime<Tz>) -> Result<WeekKey, StoreError>
where
    S: KeyValueStore + ?Sized,
    Tz: TimeZone,
{
    let current = current_week_key_at(now);

    match stored_pointer(&*store) {
        Some(StoredPointer::Week(stored)) if stored != current => {
            let previous = get_week_state(&*store, &stored);
            // A day entry counts even if its exercise mapping is empty.
            if !previous.is_empty() {
                let entry = ArchiveEntry {
                    week: stored.clone(),
                    data: previous,
                    archived_at: now.with_timezone(&Utc),
                };
                let len = append_archive(store, &entry)?;
                info!("archived week {stored} ({len} weeks in archive)");
            }
            store.remove(&tracker_key(&stored));
            info!("rolled over from {stored} to {current}");
        }
        Some(StoredPointer::Unreadable(raw)) => {
            warn!("dropping state for unreadable week pointer {raw:?}");
            store.remove(&tracker_key(&raw));
        }
        _ => {}
    }

    store.set(CURRENT_WEEK_KEY, current.to_string())?;
    Ok(current)
}

enum StoredPointer {
    Week(WeekKey),
    Unreadable(String),
}

fn stored_pointer<S: KeyValueStore + ?Sized>(store: &S) -> Option<StoredPointer> {
    let raw = store.get(CURRENT_WEEK_KEY).filter(|raw| !raw.is_empty())?;
    Some(match raw.parse() {
        Ok(week) => StoredPointer::Week(week),
        Err(_) => StoredPointer::Unreadable(raw),
    })
}

/// Appends to the stored archive without reinterpreting existing entries, so
/// entries this build cannot read are carried over untouched.
fn append_archive<S: KeyValueStore + ?Sized>(store: &mut S, entry: &ArchiveEntry) -> Result<usize, StoreError> {
    let mut archive: Vec<Value> = load_json(&*store, ARCHIVE_KEY);
    let value = serde_json::to_value(entry).map_err(|source| StoreError::Serialize {
        key: ARCHIVE_KEY.to_string(),
        source,
    })?;
    archive.push(value);
    save_json(store, ARCHIVE_KEY, &archive)?;
    Ok(archive.len())
}

pub fn get_week_state<S: KeyValueStore + ?Sized>(store: &S, week: &WeekKey) -> WeekState {
    load_json(store, &tracker_key(week))
}

pub fn set_exercise_flag<S: KeyValueStore + ?Sized>(
    store: &mut S,
    week: &WeekKey,
    day: Day,
    exercise: &str,
    checked: bool,
) -> Result<WeekState, StoreError> {
    let mut state = get_week_state(&*store, week);
    state
        .entry(day)
        .or_default()
        .insert(exercise.to_string(), checked);
    save_json(store, &tracker_key(week), &state)?;
    Ok(state)
}

/// Archived weeks, oldest first. Entries that do not parse are skipped.
pub fn load_archive<S: KeyValueStore + ?Sized>(store: &S) -> Vec<ArchiveEntry> {
    let raw: Vec<Value> = load_json(store, ARCHIVE_KEY);
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("skipping unreadable archive entry {index}: {err}");
                None
            }
        })
        .collect()
}
