use crate::models::{StreakRecord, WeekResponse};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Completed,
    Missed,
    Today,
    Pending,
    Upcoming,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub weekday: String,
    pub status: DayStatus,
}

pub fn build_week(record: &StreakRecord) -> WeekResponse {
    build_week_at(Local::now().date_naive(), record)
}

/// Sunday-first week containing `today`, each day marked against the current run.
pub fn build_week_at(today: NaiveDate, record: &StreakRecord) -> WeekResponse {
    let start = week_start(today);
    let days = (0..7)
        .map(|offset| {
            let date = start + Duration::days(offset);
            CalendarDay {
                date: date.to_string(),
                weekday: date.format("%a").to_string(),
                status: day_status(today, date, record),
            }
        })
        .collect();

    WeekResponse {
        today: today.to_string(),
        days,
    }
}

fn day_status(today: NaiveDate, date: NaiveDate, record: &StreakRecord) -> DayStatus {
    if date > today {
        DayStatus::Upcoming
    } else if date == today {
        if record.last_visit_date == Some(today) {
            DayStatus::Today
        } else {
            DayStatus::Pending
        }
    } else if in_current_run(date, record) {
        DayStatus::Completed
    } else {
        DayStatus::Missed
    }
}

fn in_current_run(date: NaiveDate, record: &StreakRecord) -> bool {
    match record.last_visit_date {
        Some(last) if date <= last => (last - date).num_days() < i64::from(record.current_streak),
        _ => false,
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}
