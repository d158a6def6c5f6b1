use chrono::{Datelike, Days, NaiveDate};

use crate::classroom::dto::{CourseWork, Date, TimeOfDay};
use crate::error::AppError;
use crate::models::coursework::{DEFAULT_MAX_POINTS, DEFAULT_WORK_TYPE};
use crate::models::{CourseworkDefinition, DueTimeSpec};

pub const PUBLISHED: &str = "PUBLISHED";

pub const DEFAULT_DUE_TIME: TimeOfDay = TimeOfDay {
    hours: 16,
    minutes: 59,
};

/// Hours subtracted from a definition's `dueTime.h`. Applied without
/// clamping, so early hours go negative. Converts a UTC+7 wall-clock hour
/// (the zone the schedule is written in) to UTC, regardless of the host `TZ`.
pub const DUE_HOUR_SHIFT: i32 = 7;

/// Builds one creation request per definition, in input order.
pub fn build_requests(
    definitions: &[CourseworkDefinition],
    today: NaiveDate,
    topic_id: &str,
) -> Result<Vec<CourseWork>, AppError> {
    definitions
        .iter()
        .map(|def| build_request(def, today, topic_id))
        .collect()
}

pub fn build_request(
    def: &CourseworkDefinition,
    today: NaiveDate,
    topic_id: &str,
) -> Result<CourseWork, AppError> {
    Ok(CourseWork {
        title: def.title.clone(),
        description: def.description.clone(),
        state: PUBLISHED.to_string(),
        due_date: due_date(today, def.due_days)?,
        due_time: due_time(def.due_time),
        max_points: def.max_points.unwrap_or(DEFAULT_MAX_POINTS),
        work_type: def
            .work_type
            .clone()
            .unwrap_or_else(|| DEFAULT_WORK_TYPE.to_string()),
        topic_id: topic_id.to_string(),
    })
}

pub fn due_time(spec: Option<DueTimeSpec>) -> TimeOfDay {
    match spec {
        Some(t) => TimeOfDay {
            hours: t.h - DUE_HOUR_SHIFT,
            minutes: t.m,
        },
        None => DEFAULT_DUE_TIME,
    }
}

/// `today` plus `due_days` calendar days; zero, negative or absent means today.
pub fn due_date(today: NaiveDate, due_days: Option<i64>) -> Result<Date, AppError> {
    let date = match due_days.filter(|d| *d > 0) {
        Some(days) => today
            .checked_add_days(Days::new(days as u64))
            .ok_or_else(|| AppError::Config(format!("dueDays {} overflows the calendar", days)))?,
        None => today,
    };

    Ok(Date {
        year: date.year(),
        month: date.month(),
        day: date.day(),
    })
}
