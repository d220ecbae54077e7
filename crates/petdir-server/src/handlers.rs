use axum::extract::{FromRequest, FromRequestParts, Query, State};
use axum::http::StatusCode;
use axum::Json;
use petdir_core::{Pet, PetFields};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub species: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AverageAge {
    pub average: f64,
}

/// `Json` extractor whose rejections use the `{error}` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `Path` extractor whose rejections use the `{error}` body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PetId<T>(pub T);

pub(crate) async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let pets = state.pool.run(|db| db.count_pets()).await?;
    Ok(Json(json!({ "status": "ok", "pets": pets })))
}

pub(crate) async fn list_pets(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Pet>>> {
    // An empty `?species=` means no filter.
    let species = params.species.filter(|s| !s.is_empty());
    let pets = state
        .pool
        .run(move |db| db.list_pets(species.as_deref()))
        .await?;
    Ok(Json(pets))
}

pub(crate) async fn get_pet(
    State(state): State<AppState>,
    PetId(id): PetId<i64>,
) -> ApiResult<Json<Pet>> {
    state
        .pool
        .run(move |db| db.get_pet(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

pub(crate) async fn create_pet(
    State(state): State<AppState>,
    JsonBody(fields): JsonBody<PetFields>,
) -> ApiResult<(StatusCode, Json<Pet>)> {
    let pet = state.pool.run(move |db| db.create_pet(&fields)).await?;
    log::info!("Created pet {} ({})", pet.id, pet.name);
    Ok((StatusCode::CREATED, Json(pet)))
}

pub(crate) async fn update_pet(
    State(state): State<AppState>,
    PetId(id): PetId<i64>,
    JsonBody(fields): JsonBody<PetFields>,
) -> ApiResult<Json<Value>> {
    let changed = state.pool.run(move |db| db.update_pet(id, &fields)).await?;
    if changed == 0 {
        log::debug!("Update of missing pet {} ignored", id);
    }
    Ok(Json(json!({ "message": "Pet updated" })))
}

pub(crate) async fn delete_pet(
    State(state): State<AppState>,
    PetId(id): PetId<i64>,
) -> ApiResult<Json<Value>> {
    let changed = state.pool.run(move |db| db.delete_pet(id)).await?;
    if changed == 0 {
        log::debug!("Delete of missing pet {} ignored", id);
    }
    Ok(Json(json!({ "message": "Pet deleted" })))
}

pub(crate) async fn average_age(State(state): State<AppState>) -> ApiResult<Json<AverageAge>> {
    let average = state.pool.run(|db| db.average_age()).await?;
    Ok(Json(AverageAge { average }))
}
