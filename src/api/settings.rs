//! Site settings endpoints.
//!
//! Exactly one settings record exists. The first read creates it with
//! defaults; an update replaces it wholesale (delete-all then insert, in
//! one transaction) rather than merging.

use axum::{extract::State, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::db::{SiteSettings, UpdateSettingsRequest};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_hex_color, validate_text};

fn validate_settings_request(req: &UpdateSettingsRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_text(&req.site_name, "Site name", 100) {
        errors.add("site_name", e);
    }
    if let Err(e) = validate_hex_color(&req.theme_color, "theme_color") {
        errors.add("theme_color", e);
    }
    if let Err(e) = validate_hex_color(&req.accent_color, "accent_color") {
        errors.add("accent_color", e);
    }
    if !(0..=100).contains(&req.featured_movies_count) {
        errors.add(
            "featured_movies_count",
            "Featured movies count must be between 0 and 100",
        );
    }

    errors.finish()
}

/// GET /api/settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SiteSettings>, ApiError> {
    let settings: Option<SiteSettings> = sqlx::query_as("SELECT * FROM settings LIMIT 1")
        .fetch_optional(&state.db)
        .await?;

    if let Some(settings) = settings {
        return Ok(Json(settings));
    }

    // First read: persist and return the defaults
    let defaults = SiteSettings::default_record();
    sqlx::query(
        "INSERT INTO settings (id, site_name, theme_color, accent_color, featured_movies_count, allow_user_registration, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&defaults.id)
    .bind(&defaults.site_name)
    .bind(&defaults.theme_color)
    .bind(&defaults.accent_color)
    .bind(defaults.featured_movies_count)
    .bind(defaults.allow_user_registration)
    .bind(&defaults.updated_at)
    .execute(&state.db)
    .await?;

    Ok(Json(defaults))
}

/// PUT /api/admin/settings
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    AdminUser(_claims): AdminUser,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<SiteSettings>, ApiError> {
    validate_settings_request(&req)?;

    let settings = SiteSettings {
        id: Uuid::new_v4().to_string(),
        site_name: req.site_name,
        theme_color: req.theme_color,
        accent_color: req.accent_color,
        featured_movies_count: req.featured_movies_count,
        allow_user_registration: req.allow_user_registration,
        updated_at: chrono::Utc::now().to_rfc3339(),
    };

    // Replace the singleton atomically so a reader never sees zero or two rows
    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM settings").execute(&mut *tx).await?;
    sqlx::query(
        "INSERT INTO settings (id, site_name, theme_color, accent_color, featured_movies_count, allow_user_registration, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&settings.id)
    .bind(&settings.site_name)
    .bind(&settings.theme_color)
    .bind(&settings.accent_color)
    .bind(settings.featured_movies_count)
    .bind(settings.allow_user_registration)
    .bind(&settings.updated_at)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(site_name = %settings.site_name, "Site settings replaced");
    Ok(Json(settings))
}
