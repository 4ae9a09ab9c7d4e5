//! Movie catalog models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub release_year: i64,
    pub rating: f64,
    pub duration_minutes: Option<i64>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    /// External streaming URL, used when no file has been uploaded
    pub video_url: Option<String>,
    pub trailer_url: Option<String>,
    pub reference_url: Option<String>,
    /// Filename of an uploaded video, set by the upload endpoint
    pub video_file: Option<String>,
    /// Cover image: uploaded filename or an external URL
    pub cover_image: Option<String>,
    /// Background image: uploaded filename or an external URL
    pub background_image: Option<String>,
    pub featured: bool,
    pub premium: bool,
    pub age_rating: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub release_year: i64,
    pub rating: f64,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub reference_url: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub age_rating: Option<String>,
}

/// Sparse patch for a movie. A field is applied iff it is present and
/// non-null; null and absent both mean "no change", so optional fields
/// cannot be cleared through an update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub release_year: Option<i64>,
    pub rating: Option<f64>,
    pub duration_minutes: Option<i64>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub video_url: Option<String>,
    pub trailer_url: Option<String>,
    pub reference_url: Option<String>,
    pub video_file: Option<String>,
    pub cover_image: Option<String>,
    pub background_image: Option<String>,
    pub featured: Option<bool>,
    pub premium: Option<bool>,
    pub age_rating: Option<String>,
}

impl UpdateMovieRequest {
    /// True when the patch contributes no applicable fields
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.genre.is_none()
            && self.release_year.is_none()
            && self.rating.is_none()
            && self.duration_minutes.is_none()
            && self.director.is_none()
            && self.cast.is_none()
            && self.country.is_none()
            && self.language.is_none()
            && self.video_url.is_none()
            && self.trailer_url.is_none()
            && self.reference_url.is_none()
            && self.video_file.is_none()
            && self.cover_image.is_none()
            && self.background_image.is_none()
            && self.featured.is_none()
            && self.premium.is_none()
            && self.age_rating.is_none()
    }

    /// Merge the patch into a stored record. `id` and `created_at` are
    /// immutable and never touched.
    pub fn apply(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(description) = self.description {
            movie.description = description;
        }
        if let Some(genre) = self.genre {
            movie.genre = genre;
        }
        if let Some(release_year) = self.release_year {
            movie.release_year = release_year;
        }
        if let Some(rating) = self.rating {
            movie.rating = rating;
        }
        if let Some(duration_minutes) = self.duration_minutes {
            movie.duration_minutes = Some(duration_minutes);
        }
        if let Some(director) = self.director {
            movie.director = Some(director);
        }
        if let Some(cast) = self.cast {
            movie.cast = Some(cast);
        }
        if let Some(country) = self.country {
            movie.country = Some(country);
        }
        if let Some(language) = self.language {
            movie.language = Some(language);
        }
        if let Some(video_url) = self.video_url {
            movie.video_url = Some(video_url);
        }
        if let Some(trailer_url) = self.trailer_url {
            movie.trailer_url = Some(trailer_url);
        }
        if let Some(reference_url) = self.reference_url {
            movie.reference_url = Some(reference_url);
        }
        if let Some(video_file) = self.video_file {
            movie.video_file = Some(video_file);
        }
        if let Some(cover_image) = self.cover_image {
            movie.cover_image = Some(cover_image);
        }
        if let Some(background_image) = self.background_image {
            movie.background_image = Some(background_image);
        }
        if let Some(featured) = self.featured {
            movie.featured = featured;
        }
        if let Some(premium) = self.premium {
            movie.premium = premium;
        }
        if let Some(age_rating) = self.age_rating {
            movie.age_rating = Some(age_rating);
        }
    }
}

/// Query parameters for the public movie listing
#[derive(Debug, Default, Deserialize)]
pub struct ListMoviesQuery {
    #[serde(default)]
    pub featured_only: bool,
    pub genre: Option<String>,
    pub limit: Option<i64>,
}

/// Query parameters for free-text search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<i64>,
}
