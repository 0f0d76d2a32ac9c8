// crates/server/src/routes/calendar.rs
//! Viewing-activity calendar endpoint.
//!
//! `GET /api/calendar?year=&month=` returns one entry per calendar day
//! of the requested month, each carrying the caller's watched titles
//! grouped per day. Absent parameters default to the current UTC month.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use watchdeck_core::{aggregate, CalendarMonth, MonthSpan};

use crate::auth::Identity;
use crate::error::ApiResult;
use crate::state::AppState;

/// Query parameters for GET /api/calendar.
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// Calendar year; defaults to the current UTC year.
    pub year: Option<i32>,
    /// 1-based month; defaults to the current UTC month.
    pub month: Option<u32>,
}

/// GET /api/calendar - Dense month of viewing activity.
pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Query(params): Query<CalendarQuery>,
) -> ApiResult<Json<CalendarMonth>> {
    // "now" is captured once per request, as a UTC civil date, before
    // any validation or resolution runs.
    let today = Utc::now().date_naive();
    let year = params.year.unwrap_or(today.year());
    let month = params.month.unwrap_or(today.month());

    let span = MonthSpan::resolve(year, month)?;
    let calendar = aggregate(state.store.as_ref(), &identity.user_id, &span).await?;

    Ok(Json(calendar))
}

/// Create the calendar routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/calendar", get(get_calendar))
}
