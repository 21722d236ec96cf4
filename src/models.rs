use crate::week::{Day, WeekKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Exercise id -> completed.
pub type DayState = BTreeMap<String, bool>;

/// Tracked days of one week. A day is present once any of its exercises has
/// been touched, even if its mapping is empty.
pub type WeekState = BTreeMap<Day, DayState>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub week: WeekKey,
    pub data: WeekState,
    #[serde(rename = "archivedAt")]
    pub archived_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseRequest {
    pub day: String,
    pub exercise: String,
    pub checked: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeekResponse {
    pub week: WeekKey,
    pub state: WeekState,
}
