use crate::errors::AppError;
use crate::models::UserProfile;
use crate::storage::KeyValueStore;
use chrono::{Datelike, Local, NaiveDate};
use tracing::{info, warn};

pub const PROFILE_KEY: &str = "user-profile";
pub const ONBOARDED_KEY: &str = "onboarding-complete";
pub const DEFAULT_GREETING_NAME: &str = "there";
pub const MIN_AGE_YEARS: i32 = 15;

pub fn load_profile<S: KeyValueStore + ?Sized>(store: &S) -> Option<UserProfile> {
    let raw = store.get(PROFILE_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(profile) => Some(profile),
        Err(err) => {
            warn!("failed to parse stored profile: {err}");
            None
        }
    }
}

pub fn get_user_name<S: KeyValueStore + ?Sized>(store: &S) -> String {
    load_profile(store)
        .map(|profile| profile.name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_GREETING_NAME.to_string())
}

pub fn is_onboarded<S: KeyValueStore + ?Sized>(store: &S) -> bool {
    store.get(ONBOARDED_KEY).as_deref() == Some("true")
}

pub fn save_profile<S: KeyValueStore + ?Sized>(
    store: &mut S,
    profile: UserProfile,
) -> Result<UserProfile, AppError> {
    save_profile_at(store, profile, Local::now().date_naive())
}

/// Validates the onboarding answers against `today`, then stores them and marks
/// onboarding complete. Nothing is written when validation fails.
pub fn save_profile_at<S: KeyValueStore + ?Sized>(
    store: &mut S,
    profile: UserProfile,
    today: NaiveDate,
) -> Result<UserProfile, AppError> {
    let profile = validate_profile(profile, today)?;

    store.set(PROFILE_KEY, serde_json::to_string(&profile)?);
    store.set(ONBOARDED_KEY, "true".to_string());
    info!(name = %profile.name, "profile saved");
    Ok(profile)
}

/// Clears the onboarding flag so the flow runs again; the profile itself is kept.
pub fn restart_onboarding<S: KeyValueStore + ?Sized>(store: &mut S) {
    store.remove(ONBOARDED_KEY);
    info!("onboarding restarted");
}

fn validate_profile(mut profile: UserProfile, today: NaiveDate) -> Result<UserProfile, AppError> {
    profile.name = profile.name.trim().to_string();
    if profile.name.chars().count() < 2 {
        return Err(AppError::bad_request("Name must be at least 2 characters"));
    }

    profile.level = required(profile.level, "Please select a level")?;
    profile.department = required(profile.department, "Please select a department")?;

    let dob = required(profile.dob, "You must be at least 15 years old")?;
    if !old_enough(dob.as_deref().unwrap_or_default(), today) {
        return Err(AppError::bad_request("You must be at least 15 years old"));
    }
    profile.dob = dob;

    profile.referral = required(profile.referral, "Please select how you found us")?;
    Ok(profile)
}

fn required(value: Option<String>, message: &str) -> Result<Option<String>, AppError> {
    match value.map(|value| value.trim().to_string()) {
        Some(value) if !value.is_empty() => Ok(Some(value)),
        _ => Err(AppError::bad_request(message)),
    }
}

/// Age is counted in calendar years only, so anyone born in `today.year() - 15` passes.
fn old_enough(dob: &str, today: NaiveDate) -> bool {
    match NaiveDate::parse_from_str(dob, "%Y-%m-%d") {
        Ok(born) => today.year() - born.year() >= MIN_AGE_YEARS,
        Err(_) => false,
    }
}
