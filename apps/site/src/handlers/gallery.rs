//! Gallery endpoints: category listing, paged folder contents, delete, upload.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use designo_core::validation::{validate_upload, UploadFile};
use designo_core::{Category, CoreError, DeleteRequest, MediaAsset, MediaKind, MediaPage};
use designo_media::UploadPayload;

use super::current_user;
use crate::error::{SiteError, SiteResult};
use crate::AppState;

/// Header carrying the original file name of an upload.
pub const FILE_NAME_HEADER: &str = "x-file-name";

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub category: String,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub category: String,
}

/// `GET /api/categories`
pub async fn list_categories(State(state): State<AppState>) -> SiteResult<Json<Vec<String>>> {
    Ok(Json(state.store.list_folders().await?))
}

/// `GET /api/gallery?category=&cursor=&limit=`
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> SiteResult<Json<MediaPage>> {
    let category: Category = query.category.parse()?;
    if !state.config.gallery.categories.contains(&category) {
        return Err(CoreError::UnknownCategory(query.category).into());
    }

    let limit = query
        .limit
        .unwrap_or(state.config.gallery.fetch_batch)
        .clamp(1, state.config.media.max_results);

    let page = state
        .gallery
        .fetch_page(category, query.cursor.as_deref(), limit)
        .await
        .map_err(SiteError::Fetch)?;
    Ok(Json(page))
}

/// `DELETE /api/gallery/{*public_id}?kind=`
pub async fn delete_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(public_id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> SiteResult<Json<Value>> {
    let user = current_user(&state, &headers).await.ok_or(CoreError::NotSignedIn {
        action: "delete media".into(),
    })?;

    let kind = match query.kind.as_deref() {
        Some(kind) => kind.parse::<MediaKind>()?,
        None => MediaKind::Image,
    };

    let request = DeleteRequest {
        public_id: public_id.trim_start_matches('/').to_string(),
        kind,
    };
    state
        .gallery
        .delete(&request)
        .await
        .map_err(SiteError::Upstream)?;

    info!(user = %user.id, public_id = %request.public_id, "Media deleted");
    Ok(Json(json!({ "success": true, "public_id": request.public_id })))
}

/// `POST /api/upload?category=` with the raw file as body.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> SiteResult<Json<MediaAsset>> {
    let user = current_user(&state, &headers).await.ok_or(CoreError::NotSignedIn {
        action: "upload media".into(),
    })?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let file_name = headers
        .get(FILE_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or("upload")
        .to_string();

    let file = UploadFile {
        file_name: file_name.clone(),
        content_type: content_type.clone(),
        size: body.len(),
    };
    let category = validate_upload(&query.category, &[file]).map_err(CoreError::from)?;

    let asset = state
        .store
        .upload(
            category,
            UploadPayload {
                file_name,
                content_type,
                bytes: body.to_vec(),
            },
        )
        .await?;

    info!(user = %user.id, public_id = %asset.public_id, "Media uploaded");
    Ok(Json(asset))
}
