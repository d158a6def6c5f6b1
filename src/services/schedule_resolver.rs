use chrono::NaiveDate;

use crate::models::{DayEntry, Schedule};

/// Hours before this select the morning slot.
pub const AFTERNOON_STARTS_AT: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlot {
    pub topic: String,
    pub slot: String,
}

/// Picks today's topic and the slot active at `hour` (0-23, local).
/// `None` when today is not scheduled, or it is afternoon and the day
/// has no afternoon slot.
pub fn resolve_slot(schedule: &Schedule, today: NaiveDate, hour: u32) -> Option<ResolvedSlot> {
    let day = schedule.day(today)?;
    select_slot(day, hour).map(|slot| ResolvedSlot {
        topic: day.topic.clone(),
        slot: slot.to_string(),
    })
}

fn select_slot(day: &DayEntry, hour: u32) -> Option<&str> {
    if hour < AFTERNOON_STARTS_AT {
        Some(&day.morning_slot)
    } else {
        day.afternoon_slot.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleFile;

    fn schedule() -> Schedule {
        let raw = r#"{"course":"Math","schedules":{
            "2024-03-01":["Week1","am","pm"],
            "2024-03-02":["Week2","only"]
        }}"#;
        let file: ScheduleFile = serde_json::from_str(raw).unwrap();
        Schedule::try_from(file).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn unscheduled_day_resolves_to_none() {
        assert_eq!(resolve_slot(&schedule(), date(3), 9), None);
    }

    #[test]
    fn morning_uses_first_slot() {
        let resolved = resolve_slot(&schedule(), date(1), 9).unwrap();
        assert_eq!(resolved.topic, "Week1");
        assert_eq!(resolved.slot, "am");

        assert_eq!(resolve_slot(&schedule(), date(1), 0).unwrap().slot, "am");
        assert_eq!(resolve_slot(&schedule(), date(1), 11).unwrap().slot, "am");
    }

    #[test]
    fn afternoon_uses_second_slot_from_noon() {
        assert_eq!(resolve_slot(&schedule(), date(1), 12).unwrap().slot, "pm");
        assert_eq!(resolve_slot(&schedule(), date(1), 23).unwrap().slot, "pm");
    }

    #[test]
    fn afternoon_without_second_slot_is_a_no_op() {
        assert_eq!(resolve_slot(&schedule(), date(2), 8).unwrap().slot, "only");
        assert_eq!(resolve_slot(&schedule(), date(2), 12), None);
        assert_eq!(resolve_slot(&schedule(), date(2), 17), None);
    }
}
