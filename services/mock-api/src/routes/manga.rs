//! `/api/manga` handlers

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
};
use common::models::{Chapter, Manga, MangaSummary, MessageResponse, NewManga, UpdateManga, User};
use tracing::info;

use crate::{
    error::{MockError, MockResult},
    middleware::CurrentUser,
    state::AppState,
};

fn ensure_can_edit(user: &User, manga: &Manga) -> MockResult<()> {
    if manga.uploaded_by != Some(user.id) && !user.is_admin() {
        return Err(MockError::Forbidden("Not authorized".to_string()));
    }
    Ok(())
}

/// Published manga only
pub async fn list_manga(State(state): State<AppState>) -> Json<Vec<MangaSummary>> {
    Json(state.store.lock().await.published_manga())
}

pub async fn get_manga(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> MockResult<Json<Manga>> {
    let manga = state.store.lock().await.manga_detail(id)?;
    if !manga.is_published {
        return Err(MockError::not_found("Manga"));
    }
    Ok(Json(manga))
}

pub async fn create_manga(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<NewManga>,
) -> MockResult<Json<Manga>> {
    let user = current.require_admin()?;
    let manga = state
        .store
        .lock()
        .await
        .create_manga(&payload.title, payload.description, Some(user.id));
    info!("Created manga {} ({})", manga.id, manga.title);
    Ok(Json(manga))
}

pub async fn update_manga(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateManga>,
) -> MockResult<Json<Manga>> {
    let mut store = state.store.lock().await;
    ensure_can_edit(&user, &store.manga(id)?)?;
    Ok(Json(store.update_manga(id, update)?))
}

pub async fn delete_manga(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> MockResult<Json<MessageResponse>> {
    current.require_admin()?;
    state.store.lock().await.delete_manga(id)?;
    info!("Deleted manga {}", id);
    Ok(Json(MessageResponse {
        message: "Manga deleted successfully".to_string(),
    }))
}

pub async fn get_chapters(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> MockResult<Json<Vec<Chapter>>> {
    let store = state.store.lock().await;
    store.manga(id)?;
    Ok(Json(store.chapters_of(id)))
}

/// Chapter upload. Archives are not unpacked: a UTF-8 upload is read as a
/// newline-separated list of page filenames, anything else yields a chapter
/// without pages.
pub async fn upload_chapter(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> MockResult<Json<Chapter>> {
    let mut chapter_number = None;
    let mut chapter_title = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| MockError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| MockError::BadRequest(e.to_string()))?;
        match name.as_str() {
            "chapter_number" => {
                chapter_number = String::from_utf8_lossy(&data).trim().parse::<i32>().ok();
            }
            "chapter_title" => chapter_title = Some(String::from_utf8_lossy(&data).to_string()),
            "file" => file = Some(data),
            _ => {}
        }
    }

    let chapter_number = chapter_number
        .ok_or_else(|| MockError::BadRequest("chapter_number is required".to_string()))?;
    let file = file
        .filter(|f| !f.is_empty())
        .ok_or_else(|| MockError::BadRequest("Invalid ZIP file".to_string()))?;

    let pages = std::str::from_utf8(&file)
        .map(|text| {
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut store = state.store.lock().await;
    ensure_can_edit(&user, &store.manga(id)?)?;
    let chapter = store.upsert_chapter(id, chapter_number, chapter_title, pages)?;
    info!("Stored chapter {} of manga {}", chapter_number, id);
    Ok(Json(chapter))
}
