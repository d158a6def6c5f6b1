use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::store;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `schedules.json` as written by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleFile {
    pub course: String,
    pub schedules: BTreeMap<String, Vec<String>>,
}

/// A validated schedule day: `[topic, morningSlot, afternoonSlot?]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub topic: String,
    pub morning_slot: String,
    pub afternoon_slot: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Schedule {
    pub course: String,
    days: BTreeMap<NaiveDate, DayEntry>,
}

impl Schedule {
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let file: ScheduleFile = store::read_json(path).await?;
        Self::try_from(file)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayEntry> {
        self.days.get(&date)
    }
}

impl TryFrom<ScheduleFile> for Schedule {
    type Error = String;

    fn try_from(file: ScheduleFile) -> Result<Self, Self::Error> {
        if file.course.trim().is_empty() {
            return Err("course name is empty".to_string());
        }

        let mut days = BTreeMap::new();
        for (key, entry) in file.schedules {
            let date = parse_day_key(&key)?;
            let day = parse_day_entry(&key, entry)?;
            days.insert(date, day);
        }

        Ok(Self {
            course: file.course,
            days,
        })
    }
}

// Keys must be canonical so that a date lookup behaves like an exact string match.
fn parse_day_key(key: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(key, DATE_FORMAT)
        .ok()
        .filter(|date| date.format(DATE_FORMAT).to_string() == key)
        .ok_or_else(|| format!("schedule key '{}' is not a YYYY-MM-DD date", key))
}

fn parse_day_entry(key: &str, entry: Vec<String>) -> Result<DayEntry, String> {
    if !(2..=3).contains(&entry.len()) {
        return Err(format!(
            "schedule entry for {} must have 2 or 3 elements, got {}",
            key,
            entry.len()
        ));
    }
    if let Some(pos) = entry.iter().position(|s| s.is_empty()) {
        return Err(format!("schedule entry for {} has an empty element at {}", key, pos));
    }

    let mut parts = entry.into_iter();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(topic), Some(morning_slot), afternoon_slot) => Ok(DayEntry {
            topic,
            morning_slot,
            afternoon_slot,
        }),
        _ => Err(format!("schedule entry for {} is incomplete", key)),
    }
}
