use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    ef::{
        dto::Pagination,
        repo_types::{Ef, EfAttributes},
    },
    error::AppError,
    state::AppState,
};

pub fn ef_routes() -> Router<AppState> {
    Router::new()
        .route("/ef/", post(create_ef).get(list_efs))
        .route("/ef/:element_id", get(get_ef))
}

#[instrument(skip(state, payload))]
pub async fn create_ef(
    State(state): State<AppState>,
    Json(payload): Json<EfAttributes>,
) -> Result<(StatusCode, Json<Ef>), AppError> {
    let ef = Ef::create(&state.db, &payload).await?;
    info!(id = ef.id, element_id = ef.attributes.element_id, "ef created");
    Ok((StatusCode::CREATED, Json(ef)))
}

#[instrument(skip(state))]
pub async fn list_efs(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Ef>>, AppError> {
    let efs = Ef::list(&state.db, pagination.offset(), pagination.limit()).await?;
    Ok(Json(efs))
}

#[instrument(skip(state))]
pub async fn get_ef(
    State(state): State<AppState>,
    Path(element_id): Path<i64>,
) -> Result<Json<Ef>, AppError> {
    let ef = Ef::find_by_element_id(&state.db, element_id)
        .await?
        .ok_or(AppError::NotFound("EF"))?;
    Ok(Json(ef))
}
