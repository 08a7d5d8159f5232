use std::{str::FromStr, sync::Arc};

use axum::{
    Router,
    extract::{Form, Path, State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{AddMovieForm, EditForm, NewMovie},
    templates,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/add", get(add_form).post(add_submit))
        .route("/search/{title}", get(search))
        // `/details,{id}`, `/edit,{id}` and `/delete,{id}` share one segment.
        .route("/{target}", get(target_get).post(target_post))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let movies = state.catalog.recompute_rankings().await?;
    Ok(Html(templates::index_page(&movies)))
}

pub async fn add_form() -> Html<String> {
    Html(templates::add_page("", None))
}

pub async fn add_submit(Form(form): Form<AddMovieForm>) -> Response {
    match form.validate() {
        Ok(title) => {
            Redirect::to(&format!("/search/{}", urlencoding::encode(&title))).into_response()
        },
        Err(msg) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Html(templates::add_page(&form.title, Some(&msg))))
                .into_response()
        },
    }
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> AppResult<Response> {
    let title = title.trim();
    if title.is_empty() {
        return Ok(Redirect::to("/add").into_response());
    }

    let candidates = state.metadata.search(title).await?;
    info!(title = %title, provider = state.metadata.name(), results = candidates.len(), "search");
    Ok(Html(templates::select_page(title, &candidates)).into_response())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    Details,
    Edit,
    Delete,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Target {
    pub action: Action,
    pub id: i64,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("expected `details|edit|delete,<id>`, got {0:?}")]
pub struct BadTarget(String);

impl FromStr for Target {
    type Err = BadTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BadTarget(s.to_string());
        let (action, id) = s.split_once(',').ok_or_else(bad)?;
        let action = match action {
            "details" => Action::Details,
            "edit" => Action::Edit,
            "delete" => Action::Delete,
            _ => return Err(bad()),
        };
        let id = id.trim().parse().map_err(|_| bad())?;
        Ok(Self { action, id })
    }
}

fn parse_target(raw: &str) -> AppResult<Target> {
    raw.parse().map_err(|err: BadTarget| {
        tracing::debug!(error = %err, "unroutable segment");
        AppError::NoRoute(format!("/{raw}"))
    })
}

pub async fn target_get(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> AppResult<Response> {
    let Target { action, id } = parse_target(&raw)?;
    match action {
        Action::Details => select_and_persist(&state, id).await,
        Action::Edit => edit_form(&state, id).await,
        Action::Delete => delete(&state, id).await,
    }
}

pub async fn target_post(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
    form: Result<Form<EditForm>, FormRejection>,
) -> AppResult<Response> {
    // Only edit accepts a body; the target decides before the form does.
    let id = match parse_target(&raw)? {
        Target { action: Action::Edit, id } => id,
        _ => return Err(AppError::NoRoute(format!("/{raw}"))),
    };
    match form {
        Ok(Form(form)) => edit_submit(&state, id, form).await,
        Err(rejection) => Ok(rejection.into_response()),
    }
}

async fn select_and_persist(state: &AppState, id: i64) -> AppResult<Response> {
    let detail = state.metadata.detail(id).await?;
    let movie = state.catalog.insert(NewMovie::from(detail)).await?;
    info!(movie_id = movie.id, title = %movie.title, "movie added");
    Ok(Redirect::to(&format!("/edit,{}", movie.id)).into_response())
}

async fn edit_form(state: &AppState, id: i64) -> AppResult<Response> {
    let movie = state.catalog.get(id).await?;
    let form = EditForm {
        rating: if movie.review.is_empty() { String::new() } else { movie.rating.to_string() },
        review: movie.review.clone(),
    };
    Ok(Html(templates::edit_page(&movie, &form, &[])).into_response())
}

async fn edit_submit(state: &AppState, id: i64, form: EditForm) -> AppResult<Response> {
    let movie = state.catalog.get(id).await?;
    let edit = match form.validate() {
        Ok(edit) => edit,
        Err(errors) => {
            let body = templates::edit_page(&movie, &form, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
        },
    };

    state.catalog.update_review(id, edit.rating, &edit.review).await?;
    info!(movie_id = id, rating = edit.rating, "movie reviewed");
    Ok(Redirect::to("/").into_response())
}

async fn delete(state: &AppState, id: i64) -> AppResult<Response> {
    state.catalog.delete(id).await?;
    info!(movie_id = id, "movie deleted");
    Ok(Redirect::to("/").into_response())
}
