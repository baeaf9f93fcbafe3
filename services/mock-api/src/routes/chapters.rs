//! `/api/chapters` handlers

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use common::models::ChapterPages;

use crate::{
    error::{MockError, MockResult},
    state::AppState,
};

pub async fn get_pages(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> MockResult<Json<ChapterPages>> {
    let pages = state.store.lock().await.pages(id)?;
    let urls: Vec<String> = pages
        .iter()
        .map(|filename| format!("/api/chapters/{}/pages/{}", id, filename))
        .collect();

    Ok(Json(ChapterPages {
        total: urls.len(),
        pages: urls,
    }))
}

/// Page bytes are a deterministic placeholder: `page:<chapter>:<filename>`
pub async fn get_page(
    State(state): State<AppState>,
    Path((id, filename)): Path<(i64, String)>,
) -> MockResult<impl IntoResponse> {
    let pages = state.store.lock().await.pages(id)?;
    if !pages.iter().any(|p| *p == filename) {
        return Err(MockError::not_found("Page"));
    }

    Ok((
        [(header::CONTENT_TYPE, "image/jpeg")],
        format!("page:{}:{}", id, filename).into_bytes(),
    ))
}
