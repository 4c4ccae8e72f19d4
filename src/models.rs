use crate::calendar::CalendarDay;
use crate::streak::Transition;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// String-valued key/value pairs, persisted as a single JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreData {
    pub entries: BTreeMap<String, String>,
}

/// Running record of consecutive daily visits.
///
/// `last_visit_date` is `None` until the first visit and serializes as an
/// empty string in that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StreakRecord {
    #[serde(default, alias = "lastVisit", with = "visit_date")]
    pub last_visit_date: Option<NaiveDate>,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl StreakRecord {
    pub fn first_visit(today: NaiveDate) -> Self {
        Self {
            last_visit_date: Some(today),
            current_streak: 1,
            longest_streak: 1,
        }
    }

    pub fn is_consistent(&self) -> bool {
        if self.longest_streak < self.current_streak {
            return false;
        }
        match self.last_visit_date {
            Some(_) => self.current_streak > 0,
            None => self.current_streak == 0 && self.longest_streak == 0,
        }
    }
}

mod visit_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.collect_str(&date.format(FORMAT)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

/// Profile captured by the onboarding flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct VisitRequest {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierView {
    pub name: &'static str,
    pub min_days: u32,
    pub icon: &'static str,
    pub gradient: &'static str,
    pub image: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    #[serde(flatten)]
    pub record: StreakRecord,
    pub tier: Option<TierView>,
    pub next_tier: Option<TierView>,
    pub progress: f64,
    pub days_to_go: Option<u32>,
    pub message: &'static str,
    pub greeting: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
}

#[derive(Debug, Serialize)]
pub struct WeekResponse {
    pub today: String,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub greeting: String,
    pub onboarded: bool,
    pub profile: Option<UserProfile>,
}
