//! Movie catalog endpoints: public listing/search and admin CRUD.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::db::{
    CreateMovieRequest, ListMoviesQuery, MessageResponse, Movie, SearchQuery, UpdateMovieRequest,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{
    effective_limit, validate_duration, validate_optional_text, validate_rating,
    validate_release_year, validate_text, validate_url,
};

fn validate_create_request(req: &CreateMovieRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_text(&req.title, "Title", 200) {
        errors.add("title", e);
    }
    if let Err(e) = validate_text(&req.description, "Description", 5000) {
        errors.add("description", e);
    }
    if let Err(e) = validate_text(&req.genre, "Genre", 100) {
        errors.add("genre", e);
    }
    if let Err(e) = validate_release_year(req.release_year) {
        errors.add("release_year", e);
    }
    if let Err(e) = validate_rating(req.rating) {
        errors.add("rating", e);
    }
    if let Err(e) = validate_duration(&req.duration_minutes) {
        errors.add("duration_minutes", e);
    }
    if let Err(e) = validate_optional_text(&req.director, "Director", 200) {
        errors.add("director", e);
    }
    if let Err(e) = validate_optional_text(&req.cast, "Cast", 2000) {
        errors.add("cast", e);
    }
    if let Err(e) = validate_optional_text(&req.country, "Country", 100) {
        errors.add("country", e);
    }
    if let Err(e) = validate_optional_text(&req.language, "Language", 100) {
        errors.add("language", e);
    }
    if let Err(e) = validate_url(&req.video_url, "video_url") {
        errors.add("video_url", e);
    }
    if let Err(e) = validate_url(&req.trailer_url, "trailer_url") {
        errors.add("trailer_url", e);
    }
    if let Err(e) = validate_url(&req.reference_url, "reference_url") {
        errors.add("reference_url", e);
    }
    if let Err(e) = validate_optional_text(&req.cover_image, "Cover image", 2048) {
        errors.add("cover_image", e);
    }
    if let Err(e) = validate_optional_text(&req.background_image, "Background image", 2048) {
        errors.add("background_image", e);
    }
    if let Err(e) = validate_optional_text(&req.age_rating, "Age rating", 16) {
        errors.add("age_rating", e);
    }

    errors.finish()
}

/// Validate an UpdateMovieRequest (only validates provided fields)
fn validate_update_request(req: &UpdateMovieRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref title) = req.title {
        if let Err(e) = validate_text(title, "Title", 200) {
            errors.add("title", e);
        }
    }
    if let Some(ref description) = req.description {
        if let Err(e) = validate_text(description, "Description", 5000) {
            errors.add("description", e);
        }
    }
    if let Some(ref genre) = req.genre {
        if let Err(e) = validate_text(genre, "Genre", 100) {
            errors.add("genre", e);
        }
    }
    if let Some(release_year) = req.release_year {
        if let Err(e) = validate_release_year(release_year) {
            errors.add("release_year", e);
        }
    }
    if let Some(rating) = req.rating {
        if let Err(e) = validate_rating(rating) {
            errors.add("rating", e);
        }
    }
    if let Err(e) = validate_duration(&req.duration_minutes) {
        errors.add("duration_minutes", e);
    }
    if let Err(e) = validate_optional_text(&req.director, "Director", 200) {
        errors.add("director", e);
    }
    if let Err(e) = validate_optional_text(&req.cast, "Cast", 2000) {
        errors.add("cast", e);
    }
    if let Err(e) = validate_optional_text(&req.country, "Country", 100) {
        errors.add("country", e);
    }
    if let Err(e) = validate_optional_text(&req.language, "Language", 100) {
        errors.add("language", e);
    }
    if let Err(e) = validate_url(&req.video_url, "video_url") {
        errors.add("video_url", e);
    }
    if let Err(e) = validate_url(&req.trailer_url, "trailer_url") {
        errors.add("trailer_url", e);
    }
    if let Err(e) = validate_url(&req.reference_url, "reference_url") {
        errors.add("reference_url", e);
    }
    if let Err(e) = validate_optional_text(&req.video_file, "Video file", 255) {
        errors.add("video_file", e);
    }
    if let Err(e) = validate_optional_text(&req.cover_image, "Cover image", 2048) {
        errors.add("cover_image", e);
    }
    if let Err(e) = validate_optional_text(&req.background_image, "Background image", 2048) {
        errors.add("background_image", e);
    }
    if let Err(e) = validate_optional_text(&req.age_rating, "Age rating", 16) {
        errors.add("age_rating", e);
    }

    errors.finish()
}

pub(crate) async fn fetch_movie(state: &AppState, id: &str) -> Result<Movie, ApiError> {
    sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Movie not found"))
}

/// List movies, optionally filtered by featured flag and genre.
///
/// GET /api/movies?featured_only=&genre=&limit=
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListMoviesQuery>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let limit = effective_limit(query.limit);

    let movies: Vec<Movie> = match (&query.genre, query.featured_only) {
        (Some(genre), true) => {
            sqlx::query_as(
                "SELECT * FROM movies WHERE featured = 1 AND genre = ? ORDER BY rowid LIMIT ?",
            )
            .bind(genre)
            .bind(limit)
            .fetch_all(&state.db)
            .await?
        }
        (Some(genre), false) => {
            sqlx::query_as("SELECT * FROM movies WHERE genre = ? ORDER BY rowid LIMIT ?")
                .bind(genre)
                .bind(limit)
                .fetch_all(&state.db)
                .await?
        }
        (None, true) => {
            sqlx::query_as("SELECT * FROM movies WHERE featured = 1 ORDER BY rowid LIMIT ?")
                .bind(limit)
                .fetch_all(&state.db)
                .await?
        }
        (None, false) => {
            sqlx::query_as("SELECT * FROM movies ORDER BY rowid LIMIT ?")
                .bind(limit)
                .fetch_all(&state.db)
                .await?
        }
    };

    Ok(Json(movies))
}

/// GET /api/movies/:id
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    Ok(Json(fetch_movie(&state, &id).await?))
}

/// POST /api/admin/movies
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    AdminUser(_claims): AdminUser,
    Json(req): Json<CreateMovieRequest>,
) -> Result<Json<Movie>, ApiError> {
    validate_create_request(&req)?;

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO movies (id, title, description, genre, release_year, rating, duration_minutes, director, "cast", country, language, video_url, trailer_url, reference_url, video_file, cover_image, background_image, featured, premium, age_rating, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.genre)
    .bind(req.release_year)
    .bind(req.rating)
    .bind(req.duration_minutes)
    .bind(&req.director)
    .bind(&req.cast)
    .bind(&req.country)
    .bind(&req.language)
    .bind(&req.video_url)
    .bind(&req.trailer_url)
    .bind(&req.reference_url)
    .bind(Option::<String>::None)
    .bind(&req.cover_image)
    .bind(&req.background_image)
    .bind(req.featured)
    .bind(req.premium)
    .bind(&req.age_rating)
    .bind(&now)
    .execute(&state.db)
    .await?;

    tracing::info!(movie_id = %id, title = %req.title, "Movie created");

    let movie = fetch_movie(&state, &id).await?;
    Ok(Json(movie))
}

/// PUT /api/admin/movies/:id
///
/// Sparse merge: only present, non-null patch fields are applied. An empty
/// patch is a no-op, not an error, and skips the write entirely. The
/// response is always the re-read stored record.
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AdminUser(_claims): AdminUser,
    Json(req): Json<UpdateMovieRequest>,
) -> Result<Json<Movie>, ApiError> {
    validate_update_request(&req)?;

    let mut movie = fetch_movie(&state, &id).await?;

    if req.is_empty() {
        return Ok(Json(movie));
    }

    req.apply(&mut movie);

    sqlx::query(
        r#"
        UPDATE movies
        SET title = ?, description = ?, genre = ?, release_year = ?, rating = ?, duration_minutes = ?, director = ?, "cast" = ?, country = ?, language = ?, video_url = ?, trailer_url = ?, reference_url = ?, video_file = ?, cover_image = ?, background_image = ?, featured = ?, premium = ?, age_rating = ?
        WHERE id = ?
        "#,
    )
    .bind(&movie.title)
    .bind(&movie.description)
    .bind(&movie.genre)
    .bind(movie.release_year)
    .bind(movie.rating)
    .bind(movie.duration_minutes)
    .bind(&movie.director)
    .bind(&movie.cast)
    .bind(&movie.country)
    .bind(&movie.language)
    .bind(&movie.video_url)
    .bind(&movie.trailer_url)
    .bind(&movie.reference_url)
    .bind(&movie.video_file)
    .bind(&movie.cover_image)
    .bind(&movie.background_image)
    .bind(movie.featured)
    .bind(movie.premium)
    .bind(&movie.age_rating)
    .bind(&id)
    .execute(&state.db)
    .await?;

    let movie = fetch_movie(&state, &id).await?;
    Ok(Json(movie))
}

/// DELETE /api/admin/movies/:id
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AdminUser(_claims): AdminUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM movies WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Movie not found"));
    }

    tracing::info!(movie_id = %id, "Movie deleted");
    Ok(Json(MessageResponse::new("Movie deleted successfully")))
}

/// Escape LIKE wildcards so the query is matched literally
fn like_pattern(q: &str) -> String {
    let escaped = q
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Case-insensitive substring search across the textual fields, OR
/// semantics, in insertion order.
///
/// GET /api/search?q=&limit=
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let limit = effective_limit(query.limit);
    let pattern = like_pattern(&query.q);

    let movies: Vec<Movie> = sqlx::query_as(
        r#"
        SELECT * FROM movies
        WHERE title LIKE ?1 ESCAPE '\'
           OR description LIKE ?1 ESCAPE '\'
           OR genre LIKE ?1 ESCAPE '\'
           OR director LIKE ?1 ESCAPE '\'
           OR "cast" LIKE ?1 ESCAPE '\'
        ORDER BY rowid
        LIMIT ?2
        "#,
    )
    .bind(&pattern)
    .bind(limit)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(movies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Claims, Role};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    async fn test_state() -> Arc<AppState> {
        let config = crate::config::Config::default();
        let pool = crate::db::open_in_memory().await.unwrap();
        Arc::new(AppState::new(config, pool))
    }

    fn admin() -> AdminUser {
        AdminUser(Claims {
            sub: "admin".to_string(),
            role: Role::Admin,
            exp: chrono::Utc::now().timestamp() + 600,
        })
    }

    fn create_req(title: &str, genre: &str, rating: f64) -> CreateMovieRequest {
        CreateMovieRequest {
            title: title.to_string(),
            description: format!("{title} description"),
            genre: genre.to_string(),
            release_year: 2010,
            rating,
            duration_minutes: None,
            director: None,
            cast: None,
            country: None,
            language: None,
            video_url: None,
            trailer_url: None,
            reference_url: None,
            cover_image: None,
            background_image: None,
            featured: false,
            premium: false,
            age_rating: None,
        }
    }

    async fn create(state: &Arc<AppState>, req: CreateMovieRequest) -> Movie {
        let Json(movie) = create_movie(State(state.clone()), admin(), Json(req))
            .await
            .unwrap();
        movie
    }

    #[tokio::test]
    async fn test_rating_bounds_on_create() {
        let state = test_state().await;

        for rating in [-1.0, 10.1] {
            let err = create_movie(
                State(state.clone()),
                admin(),
                Json(create_req("Bad", "Drama", rating)),
            )
            .await
            .unwrap_err();
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }

        for rating in [0.0, 10.0, 7.3] {
            let movie = create(&state, create_req("Good", "Drama", rating)).await;
            assert_eq!(movie.rating, rating);
        }
    }

    #[tokio::test]
    async fn test_create_then_fetch_round_trip() {
        let state = test_state().await;

        let mut req = create_req("Inception", "Sci-Fi", 8.8);
        req.director = Some("Christopher Nolan".to_string());
        req.trailer_url = Some("https://example.com/t".to_string());
        req.featured = true;
        let created = create(&state, req).await;

        assert!(!created.id.is_empty());
        assert!(!created.created_at.is_empty());

        let Json(fetched) = get_movie(State(state.clone()), Path(created.id.clone()))
            .await
            .unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.director.as_deref(), Some("Christopher Nolan"));
        assert!(fetched.featured);
        assert!(fetched.video_file.is_none());
    }

    #[tokio::test]
    async fn test_get_unknown_movie_is_not_found() {
        let state = test_state().await;
        let err = get_movie(State(state), Path("missing".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let state = test_state().await;

        let mut featured = create_req("Featured One", "Sci-Fi", 8.0);
        featured.featured = true;
        create(&state, featured).await;
        create(&state, create_req("Plain One", "Drama", 6.0)).await;

        let Json(all) = list_movies(State(state.clone()), Query(ListMoviesQuery::default()))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let Json(featured_only) = list_movies(
            State(state.clone()),
            Query(ListMoviesQuery {
                featured_only: true,
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(featured_only.len(), 1);
        assert_eq!(featured_only[0].title, "Featured One");

        let Json(dramas) = list_movies(
            State(state.clone()),
            Query(ListMoviesQuery {
                genre: Some("Drama".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(dramas.len(), 1);

        let Json(limited) = list_movies(
            State(state),
            Query(ListMoviesQuery {
                limit: Some(1),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_partial_update_changes_only_patched_field() {
        let state = test_state().await;
        let created = create(&state, create_req("Inception", "Sci-Fi", 8.8)).await;

        let patch = UpdateMovieRequest {
            rating: Some(9.0),
            ..Default::default()
        };
        let Json(updated) = update_movie(
            State(state.clone()),
            Path(created.id.clone()),
            admin(),
            Json(patch),
        )
        .await
        .unwrap();

        assert_eq!(updated.rating, 9.0);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.genre, created.genre);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_empty_patch_is_a_noop() {
        let state = test_state().await;
        let created = create(&state, create_req("Inception", "Sci-Fi", 8.8)).await;

        let Json(returned) = update_movie(
            State(state.clone()),
            Path(created.id.clone()),
            admin(),
            Json(UpdateMovieRequest::default()),
        )
        .await
        .unwrap();
        assert_eq!(returned, created);

        // The stored record is unchanged
        let stored = fetch_movie(&state, &created.id).await.unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_update_unknown_movie_is_not_found() {
        let state = test_state().await;

        let err = update_movie(
            State(state),
            Path("missing".to_string()),
            admin(),
            Json(UpdateMovieRequest {
                rating: Some(5.0),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_rejects_out_of_range_rating_before_write() {
        let state = test_state().await;
        let created = create(&state, create_req("Inception", "Sci-Fi", 8.8)).await;

        let err = update_movie(
            State(state.clone()),
            Path(created.id.clone()),
            admin(),
            Json(UpdateMovieRequest {
                rating: Some(11.0),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let stored = fetch_movie(&state, &created.id).await.unwrap();
        assert_eq!(stored.rating, 8.8);
    }

    #[tokio::test]
    async fn test_delete_movie() {
        let state = test_state().await;
        let created = create(&state, create_req("Doomed", "Drama", 5.0)).await;

        delete_movie(State(state.clone()), Path(created.id.clone()), admin())
            .await
            .unwrap();

        let err = get_movie(State(state.clone()), Path(created.id))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = delete_movie(State(state), Path("missing".to_string()), admin())
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_case_insensitive_title() {
        let state = test_state().await;
        create(&state, create_req("Inception", "Sci-Fi", 8.8)).await;
        create(&state, create_req("The Matrix", "Sci-Fi", 8.7)).await;

        let Json(hits) = search_movies(
            State(state.clone()),
            Query(SearchQuery {
                q: "inception".to_string(),
                limit: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Inception");

        // Genre substring matches every movie whose genre contains it
        let Json(hits) = search_movies(
            State(state.clone()),
            Query(SearchQuery {
                q: "sci".to_string(),
                limit: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(hits.len(), 2);

        let Json(hits) = search_movies(
            State(state),
            Query(SearchQuery {
                q: "no such thing".to_string(),
                limit: None,
            }),
        )
        .await
        .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_wildcards_are_literal() {
        let state = test_state().await;
        create(&state, create_req("Plain", "Drama", 6.0)).await;
        create(&state, create_req("100% Wolf", "Animation", 5.8)).await;

        let Json(hits) = search_movies(
            State(state),
            Query(SearchQuery {
                q: "100%".to_string(),
                limit: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "100% Wolf");
    }

    #[test]
    fn test_like_pattern_escaping() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
