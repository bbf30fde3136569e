//! Aggregate query API handlers
//!
//! Read-only endpoints: average mark, review and mark counts, and the two
//! film searches (name substring and exact average).

use crate::api::utils::parse_year;
use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;

/// Average mark response
#[derive(Debug, Serialize)]
pub struct AverageResponse {
    /// Arithmetic mean of the film's marks, 0.0 when there are none
    #[serde(rename = "AVERAGE")]
    pub average: f64,
}

/// Review count response
#[derive(Debug, Serialize)]
pub struct CountReviewsResponse {
    /// Number of reviews attached to the film
    #[serde(rename = "COUNT_REVIEWS")]
    pub count_reviews: usize,
}

/// Mark count response
#[derive(Debug, Serialize)]
pub struct CountMarksResponse {
    /// Number of marks attached to the film
    #[serde(rename = "COUNT_MARKS")]
    pub count_marks: usize,
}

/// Film search response
#[derive(Debug, Serialize)]
pub struct FilmsResponse {
    /// Matching film names in registry order, possibly empty
    #[serde(rename = "FILMS")]
    pub films: Vec<String>,
}

/// GET /get_average/{name}/{year} - Average mark of a film
pub async fn get_average(
    State(state): State<SharedState>,
    Path((name, year)): Path<(String, String)>,
    _auth: AuthenticatedUser,
) -> Result<Json<AverageResponse>, AppError> {
    let year = parse_year(&year)?;
    let state = state.read().await;
    let film = state
        .registry
        .find_film(&name, year)
        .ok_or(AppError::FilmNotFound)?;
    Ok(Json(AverageResponse {
        average: film.average(),
    }))
}

/// GET /get_count_reviews/{name}/{year} - Number of reviews of a film
pub async fn get_count_reviews(
    State(state): State<SharedState>,
    Path((name, year)): Path<(String, String)>,
    _auth: AuthenticatedUser,
) -> Result<Json<CountReviewsResponse>, AppError> {
    let year = parse_year(&year)?;
    let state = state.read().await;
    let film = state
        .registry
        .find_film(&name, year)
        .ok_or(AppError::FilmNotFound)?;
    Ok(Json(CountReviewsResponse {
        count_reviews: film.count_reviews(),
    }))
}

/// GET /get_count_marks/{name}/{year} - Number of marks of a film
pub async fn get_count_marks(
    State(state): State<SharedState>,
    Path((name, year)): Path<(String, String)>,
    _auth: AuthenticatedUser,
) -> Result<Json<CountMarksResponse>, AppError> {
    let year = parse_year(&year)?;
    let state = state.read().await;
    let film = state
        .registry
        .find_film(&name, year)
        .ok_or(AppError::FilmNotFound)?;
    Ok(Json(CountMarksResponse {
        count_marks: film.count_marks(),
    }))
}

/// GET /get_films/substring/{substring} - Films whose name contains the substring
pub async fn get_films_substring(
    State(state): State<SharedState>,
    Path(substring): Path<String>,
    _auth: AuthenticatedUser,
) -> Result<Json<FilmsResponse>, AppError> {
    let state = state.read().await;
    let films = state
        .registry
        .films_matching_substring(&substring)
        .into_iter()
        .map(str::to_owned)
        .collect();
    Ok(Json(FilmsResponse { films }))
}

/// GET /get_films/average/{average} - Films whose average equals the value exactly
pub async fn get_films_average(
    State(state): State<SharedState>,
    Path(average): Path<String>,
    _auth: AuthenticatedUser,
) -> Result<Json<FilmsResponse>, AppError> {
    let average: f64 = average
        .parse()
        .map_err(|_| AppError::InvalidNumericInput("Average rating can not be a string value"))?;
    let state = state.read().await;
    let films = state
        .registry
        .films_matching_average(average)
        .into_iter()
        .map(str::to_owned)
        .collect();
    Ok(Json(FilmsResponse { films }))
}
