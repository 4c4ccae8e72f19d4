use crate::calendar::build_week;
use crate::errors::AppError;
use crate::models::{
    ProfileResponse, StoreData, StreakRecord, StreakSummary, TierView, UserProfile, VisitRequest,
    WeekResponse,
};
use crate::profile::{get_user_name, is_onboarded, load_profile, restart_onboarding, save_profile};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::streak::{load_streak, StreakTracker, Transition};
use crate::tiers::{
    all_tier_views, days_to_next_tier, get_next_tier, get_streak_tier, motivational_message,
    tier_progress, tier_view,
};
use axum::{body::Bytes, extract::State, Json};
use chrono::{Local, NaiveDate};

pub async fn get_streak(State(state): State<AppState>) -> Json<StreakSummary> {
    let data = state.data.lock().await;
    let record = load_streak(&*data).into_record();
    Json(summarize(record, get_user_name(&*data), None))
}

pub async fn visit(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StreakSummary>, AppError> {
    let today = match visit_date(&body)? {
        Some(date) => date,
        None => Local::now().date_naive(),
    };

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let outcome = StreakTracker::new(&mut next).record_visit_at(today)?;
    if outcome.transition.mutates() {
        commit(&state, &mut data, next).await?;
    }

    let greeting = get_user_name(&*data);
    Ok(Json(summarize(outcome.record, greeting, Some(outcome.transition))))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<StreakSummary>, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let record = StreakTracker::new(&mut next).reset_streak()?;
    commit(&state, &mut data, next).await?;

    let greeting = get_user_name(&*data);
    Ok(Json(summarize(record, greeting, None)))
}

pub async fn get_week(State(state): State<AppState>) -> Json<WeekResponse> {
    let data = state.data.lock().await;
    let record = load_streak(&*data).into_record();
    Json(build_week(&record))
}

pub async fn get_tiers() -> Json<Vec<TierView>> {
    Json(all_tier_views())
}

pub async fn get_profile(State(state): State<AppState>) -> Json<ProfileResponse> {
    let data = state.data.lock().await;
    Json(profile_response(&data))
}

pub async fn put_profile(
    State(state): State<AppState>,
    Json(payload): Json<UserProfile>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    save_profile(&mut next, payload)?;
    commit(&state, &mut data, next).await?;

    Ok(Json(profile_response(&data)))
}

pub async fn restart(State(state): State<AppState>) -> Result<Json<ProfileResponse>, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    restart_onboarding(&mut next);
    commit(&state, &mut data, next).await?;

    Ok(Json(profile_response(&data)))
}

/// Writes `next` to disk and only then makes it the live store.
async fn commit(state: &AppState, live: &mut StoreData, next: StoreData) -> Result<(), AppError> {
    persist_data(&state.data_path, &next).await?;
    *live = next;
    Ok(())
}

fn profile_response(data: &StoreData) -> ProfileResponse {
    ProfileResponse {
        greeting: get_user_name(data),
        onboarded: is_onboarded(data),
        profile: load_profile(data),
    }
}

fn summarize(record: StreakRecord, greeting: String, transition: Option<Transition>) -> StreakSummary {
    let streak = record.current_streak;
    StreakSummary {
        record,
        tier: get_streak_tier(streak).map(tier_view),
        next_tier: get_next_tier(streak).map(tier_view),
        progress: tier_progress(streak),
        days_to_go: days_to_next_tier(streak),
        message: motivational_message(streak),
        greeting,
        transition,
    }
}

/// An empty body means "today"; anything else must be a valid visit request.
fn visit_date(body: &[u8]) -> Result<Option<NaiveDate>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let request: VisitRequest = serde_json::from_slice(body)
        .map_err(|err| AppError::bad_request(format!("invalid visit request: {err}")))?;
    request.date.as_deref().map(parse_date).transpose()
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("date must be formatted as YYYY-MM-DD"))
}
