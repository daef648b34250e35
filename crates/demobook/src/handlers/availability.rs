//! Public availability view.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use demobook_core::booking::{booked_slots, build_month_availability, MonthAvailability};

use super::{today, ApiError, MonthQuery};
use crate::state::AppState;

/// GET /api/availability?month=YYYY-MM
///
/// Every day of the month with its offered slots, each flagged available or
/// booked. An unconfigured month answers `configured: false` with no days.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<MonthAvailability>, ApiError> {
    let Query(query) = query?;
    let month = query.required()?;

    let Some(settings) = state.settings.get_settings(month).await? else {
        tracing::debug!(month = %month, "Availability requested for unconfigured month");
        return Ok(Json(MonthAvailability::unconfigured(month)));
    };

    let reservations = state.reservations.list_reservations(month).await?;
    let booked = booked_slots(&reservations);
    let availability = build_month_availability(month, Some(&settings), &booked, today());

    tracing::debug!(
        month = %month,
        booked = booked.len(),
        open = availability.open_slot_count(),
        "Availability computed"
    );

    Ok(Json(availability))
}
