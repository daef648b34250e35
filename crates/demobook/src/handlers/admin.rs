//! Admin endpoints: login, bookings list/delete, settings read/replace.
//!
//! Everything except login requires an [`AdminSession`].

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use demobook_core::booking::{
    AvailabilitySettings, Reservation, SlotKey, UpdateSettingsRequest, YearMonth,
};

use super::{ApiError, MonthQuery};
use crate::{auth::AdminSession, state::AppState};

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// POST /api/admin/login
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    let issued = state.auth.login(&request.password, Utc::now())?;

    tracing::info!(expires_at = %issued.expires_at, "Admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

// ============================================================================
// Bookings
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BookingsResponse {
    pub month: YearMonth,
    pub bookings: Vec<Reservation>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// GET /api/admin/bookings?month=YYYY-MM
#[axum::debug_handler]
pub async fn list_bookings(
    _session: AdminSession,
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<BookingsResponse>, ApiError> {
    let Query(query) = query?;
    let month = query.required()?;

    let bookings = state.reservations.list_reservations(month).await?;

    Ok(Json(BookingsResponse { month, bookings }))
}

/// DELETE /api/admin/bookings/{date}/{time}
///
/// Deleting a free slot still succeeds.
#[axum::debug_handler]
pub async fn delete_booking(
    AdminSession(claims): AdminSession,
    State(state): State<AppState>,
    Path((date, time)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let slot = SlotKey::from_parts(&date, &time)?;

    state.reservations.delete_reservation(slot).await?;
    tracing::info!(admin = %claims.sub, month = %slot.month(), slot = %slot, "Booking deleted");

    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub month: YearMonth,
    pub configured: bool,
    pub settings: Option<AvailabilitySettings>,
}

#[derive(Debug, Serialize)]
pub struct SettingsUpdatedResponse {
    pub success: bool,
    pub settings: AvailabilitySettings,
}

/// GET /api/admin/settings?month=YYYY-MM
#[axum::debug_handler]
pub async fn get_settings(
    _session: AdminSession,
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let Query(query) = query?;
    let month = query.required()?;

    let settings = state.settings.get_settings(month).await?;

    Ok(Json(SettingsResponse {
        month,
        configured: settings.is_some(),
        settings,
    }))
}

/// PUT /api/admin/settings?month=YYYY-MM
///
/// Full replace. Fields missing from the body take their defaults.
#[axum::debug_handler]
pub async fn put_settings(
    AdminSession(claims): AdminSession,
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
    payload: Result<Json<UpdateSettingsRequest>, JsonRejection>,
) -> Result<Json<SettingsUpdatedResponse>, ApiError> {
    let Query(query) = query?;
    let Json(request) = payload?;

    let settings = request.into_settings(query.month.as_deref(), Utc::now())?;
    state.settings.put_settings(&settings).await?;

    tracing::info!(
        admin = %claims.sub,
        month = %settings.month,
        working_days = ?settings.working_days,
        blocked_days = settings.blocked_days.len(),
        "Availability settings updated"
    );

    Ok(Json(SettingsUpdatedResponse {
        success: true,
        settings,
    }))
}
