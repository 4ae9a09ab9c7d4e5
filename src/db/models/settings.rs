//! Site settings: a single branding/feature-toggle record.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteSettings {
    pub id: String,
    pub site_name: String,
    pub theme_color: String,
    pub accent_color: String,
    pub featured_movies_count: i64,
    pub allow_user_registration: bool,
    pub updated_at: String,
}

impl SiteSettings {
    /// The record created on first read when no settings row exists yet
    pub fn default_record() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            site_name: default_site_name(),
            theme_color: default_theme_color(),
            accent_color: default_accent_color(),
            featured_movies_count: default_featured_count(),
            allow_user_registration: default_allow_registration(),
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Full-replacement settings body. Omitted fields fall back to the same
/// defaults as a fresh record; this is a replace, never a merge.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    #[serde(default = "default_featured_count")]
    pub featured_movies_count: i64,
    #[serde(default = "default_allow_registration")]
    pub allow_user_registration: bool,
}

fn default_site_name() -> String {
    "Ultra Cinema".to_string()
}

fn default_theme_color() -> String {
    "#1a1a1a".to_string()
}

fn default_accent_color() -> String {
    "#e50914".to_string()
}

fn default_featured_count() -> i64 {
    6
}

fn default_allow_registration() -> bool {
    true
}
