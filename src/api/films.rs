//! Film management API handlers
//!
//! Handlers for creating films, listing them, and attaching reviews and marks.
//! All of them require Basic authentication; the `{username}` path segment is
//! resolved against the registry separately from the credentials.

use crate::api::utils::{value_as_i64, value_as_string};
use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Create film request
#[derive(Deserialize, Default)]
pub struct CreateFilmRequest {
    /// Film title
    #[serde(default)]
    pub name: Option<Value>,
    /// Release year, number or numeric string
    #[serde(default)]
    pub year: Option<Value>,
}

/// Create film response
#[derive(Debug, Serialize)]
pub struct CreateFilmResponse {
    /// The created film's key fields
    #[serde(rename = "FILM")]
    pub film: FilmEcho,
}

/// Echo of a created film's natural key
#[derive(Debug, Serialize)]
pub struct FilmEcho {
    /// Film title
    pub name: String,
    /// Release year
    pub year: i64,
}

/// Add review request
#[derive(Deserialize, Default)]
pub struct AddReviewRequest {
    /// Film title
    #[serde(default)]
    pub name: Option<Value>,
    /// Release year, number or numeric string
    #[serde(default)]
    pub year: Option<Value>,
    /// Review text
    #[serde(default)]
    pub review: Option<Value>,
}

/// Add review response
#[derive(Debug, Serialize)]
pub struct AddReviewResponse {
    /// The recorded review
    #[serde(rename = "ADD_REVIEW")]
    pub add_review: ReviewEcho,
}

/// Echo of a recorded review
#[derive(Debug, Serialize)]
pub struct ReviewEcho {
    /// Film title
    pub name: String,
    /// Submitted review text
    pub review: String,
}

/// Add mark request
#[derive(Deserialize, Default)]
pub struct AddMarkRequest {
    /// Film title
    #[serde(default)]
    pub name: Option<Value>,
    /// Release year, number or numeric string
    #[serde(default)]
    pub year: Option<Value>,
    /// Mark in [0, 10], number or numeric string
    #[serde(default)]
    pub mark: Option<Value>,
}

/// Add mark response
#[derive(Debug, Serialize)]
pub struct AddMarkResponse {
    /// The recorded mark
    #[serde(rename = "ADD_MARK")]
    pub add_mark: MarkEcho,
}

/// Echo of a recorded mark
#[derive(Debug, Serialize)]
pub struct MarkEcho {
    /// Film title
    pub name: String,
    /// Submitted mark
    pub mark: i64,
}

/// POST /{username}/add - Create a new film
///
/// Repeated creation of the same (name, year) pair answers 200 with an
/// ERROR body rather than a failure status.
pub async fn create_film(
    State(state): State<SharedState>,
    Path(username): Path<String>,
    _auth: AuthenticatedUser,
    Json(request): Json<CreateFilmRequest>,
) -> Result<Json<CreateFilmResponse>, AppError> {
    let (Some(name), Some(year)) = (&request.name, &request.year) else {
        return Err(AppError::MissingFields(
            "Invalid data, please give name and year of film",
        ));
    };
    let name = value_as_string(name);
    let year = value_as_i64(year, "Year of film must be a number, check it")?;

    let mut state = state.write().await;
    state
        .registry
        .find_user(&username)
        .ok_or(AppError::UserNotFound)?;
    state.registry.add_film(&name, year)?;
    info!(film = %name, year, by = %username, "film created");

    Ok(Json(CreateFilmResponse {
        film: FilmEcho { name, year },
    }))
}

/// GET /films - List all films in registry order
///
/// Response keys are FILM0, FILM1, ... in creation order, each holding the
/// full film record (name, year, reviews, marks).
pub async fn list_films(
    State(state): State<SharedState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Value>, AppError> {
    let state = state.read().await;
    let mut films = serde_json::Map::new();
    for (number, film) in state.registry.films().iter().enumerate() {
        let value = serde_json::to_value(film)
            .map_err(|err| AppError::Internal(anyhow::anyhow!("film serialization: {}", err)))?;
        films.insert(format!("FILM{}", number), value);
    }
    Ok(Json(serde_json::json!({ "LIST OF FILMS": films })))
}

/// POST /{username}/add_review - Attach a review to a film
pub async fn add_review(
    State(state): State<SharedState>,
    Path(username): Path<String>,
    _auth: AuthenticatedUser,
    Json(request): Json<AddReviewRequest>,
) -> Result<Json<AddReviewResponse>, AppError> {
    let (Some(name), Some(year), Some(review)) = (&request.name, &request.year, &request.review)
    else {
        return Err(AppError::MissingFields(
            "Invalid data, please give name and year of film and your review",
        ));
    };
    let name = value_as_string(name);
    let year = value_as_i64(year, "Year of film must be a number, check it")?;
    let review = value_as_string(review);

    let mut state = state.write().await;
    state
        .registry
        .find_user(&username)
        .ok_or(AppError::UserNotFound)?;
    state
        .registry
        .add_review(&username, &name, year, review.clone())?;

    Ok(Json(AddReviewResponse {
        add_review: ReviewEcho { name, review },
    }))
}

/// POST /{username}/add_mark - Attach a mark to a film
pub async fn add_mark(
    State(state): State<SharedState>,
    Path(username): Path<String>,
    _auth: AuthenticatedUser,
    Json(request): Json<AddMarkRequest>,
) -> Result<Json<AddMarkResponse>, AppError> {
    let (Some(name), Some(year), Some(mark)) = (&request.name, &request.year, &request.mark) else {
        return Err(AppError::MissingFields(
            "Invalid data, please give name and year of film and your mark",
        ));
    };
    let name = value_as_string(name);
    let year = value_as_i64(year, "Year of film must be a number, check it")?;
    let mark = value_as_i64(mark, "Mark must be a number, check it")?;

    let mut state = state.write().await;
    state
        .registry
        .find_user(&username)
        .ok_or(AppError::UserNotFound)?;
    state.registry.add_mark(&username, &name, year, mark)?;

    Ok(Json(AddMarkResponse {
        add_mark: MarkEcho { name, mark },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use serde_json::json;

    fn auth(username: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            username: username.to_string(),
        }
    }

    async fn state_with_user(username: &str) -> SharedState {
        let mut state = AppState::with_bcrypt_cost(4);
        state
            .registry
            .add_user(username, "hash".to_string())
            .unwrap();
        state.shared()
    }

    #[tokio::test]
    async fn test_create_film() {
        let state = state_with_user("abc").await;
        let request = CreateFilmRequest {
            name: Some(json!("film")),
            year: Some(json!(2010)),
        };

        let response = create_film(
            State(state.clone()),
            Path("abc".to_string()),
            auth("abc"),
            Json(request),
        )
        .await
        .expect("film creation should succeed");
        assert_eq!(response.film.name, "film");
        assert_eq!(response.film.year, 2010);

        let state = state.read().await;
        assert!(state.registry.find_film("film", 2010).is_some());
    }

    #[tokio::test]
    async fn test_create_film_twice_reports_error() {
        let state = state_with_user("abc").await;
        for attempt in 0..2 {
            let request = CreateFilmRequest {
                name: Some(json!("film")),
                year: Some(json!(2010)),
            };
            let result = create_film(
                State(state.clone()),
                Path("abc".to_string()),
                auth("abc"),
                Json(request),
            )
            .await;
            if attempt == 0 {
                assert!(result.is_ok());
            } else {
                assert!(matches!(result.unwrap_err(), AppError::FilmAlreadyExists));
            }
        }
    }

    #[tokio::test]
    async fn test_create_film_unknown_username() {
        let state = state_with_user("abc").await;
        let request = CreateFilmRequest {
            name: Some(json!("film")),
            year: Some(json!(2010)),
        };

        let err = create_film(
            State(state),
            Path("ghost".to_string()),
            auth("abc"),
            Json(request),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
    }

    #[tokio::test]
    async fn test_create_film_year_as_string() {
        let state = state_with_user("abc").await;
        let request = CreateFilmRequest {
            name: Some(json!("film")),
            year: Some(json!("2010")),
        };

        let response = create_film(
            State(state.clone()),
            Path("abc".to_string()),
            auth("abc"),
            Json(request),
        )
        .await
        .expect("numeric string year is accepted");
        assert_eq!(response.film.year, 2010);
    }

    #[tokio::test]
    async fn test_add_review_missing_film() {
        let state = state_with_user("abc").await;
        let request = AddReviewRequest {
            name: Some(json!("ghost")),
            year: Some(json!(1999)),
            review: Some(json!("text")),
        };

        let err = add_review(
            State(state),
            Path("abc".to_string()),
            auth("abc"),
            Json(request),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::FilmNotFound));
    }

    #[tokio::test]
    async fn test_add_review_non_numeric_year() {
        let state = state_with_user("abc").await;
        let request = AddReviewRequest {
            name: Some(json!("film")),
            year: Some(json!("this year")),
            review: Some(json!("text")),
        };

        let err = add_review(
            State(state),
            Path("abc".to_string()),
            auth("abc"),
            Json(request),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidNumericInput("Year of film must be a number, check it")
        ));
    }

    #[tokio::test]
    async fn test_add_mark_out_of_range() {
        let state = state_with_user("abc").await;
        {
            let mut state = state.write().await;
            state.registry.add_film("film", 2010).unwrap();
        }

        for bad_mark in [-1, 11] {
            let request = AddMarkRequest {
                name: Some(json!("film")),
                year: Some(json!(2010)),
                mark: Some(json!(bad_mark)),
            };
            let err = add_mark(
                State(state.clone()),
                Path("abc".to_string()),
                auth("abc"),
                Json(request),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, AppError::InvalidMark));
        }
    }

    #[tokio::test]
    async fn test_add_mark_records_on_film_and_user() {
        let state = state_with_user("abc").await;
        {
            let mut state = state.write().await;
            state.registry.add_film("film", 2010).unwrap();
        }

        let request = AddMarkRequest {
            name: Some(json!("film")),
            year: Some(json!(2010)),
            mark: Some(json!(5)),
        };
        let response = add_mark(
            State(state.clone()),
            Path("abc".to_string()),
            auth("abc"),
            Json(request),
        )
        .await
        .expect("mark should be recorded");
        assert_eq!(response.add_mark.mark, 5);

        let state = state.read().await;
        let film = state.registry.find_film("film", 2010).unwrap();
        assert_eq!(film.marks, vec![5]);
        assert_eq!(film.average(), 5.0);
        let user = state.registry.find_user("abc").unwrap();
        assert!(user.reviews.contains_key("film2010"));
    }

    #[tokio::test]
    async fn test_list_films_round_trip() {
        let state = state_with_user("abc").await;
        {
            let mut state = state.write().await;
            state.registry.add_film("film", 2010).unwrap();
            state.registry.add_mark("abc", "film", 2010, 5).unwrap();
            state
                .registry
                .add_review("abc", "film", 2010, "abcd".to_string())
                .unwrap();
        }

        let response = list_films(State(state), auth("abc")).await.unwrap();
        let films = &response.0["LIST OF FILMS"];
        assert_eq!(films["FILM0"]["name"], "film");
        assert_eq!(films["FILM0"]["year"], 2010);
        assert_eq!(films["FILM0"]["marks"], json!([5]));
        assert_eq!(films["FILM0"]["reviews"], json!(["abcd"]));
    }
}
