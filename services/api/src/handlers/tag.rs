use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use ladle_auth_types::identity::IdentityHeaders;

use crate::domain::types::{Tag, TagDraft};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::tag::{
    CreateTagUseCase, DeleteTagUseCase, GetTagUseCase, ListTagsUseCase, UpdateTagUseCase,
};

// ── Shapes ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

#[derive(Deserialize)]
pub struct TagUpsertRequest {
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<TagUpsertRequest> for TagDraft {
    fn from(body: TagUpsertRequest) -> Self {
        Self {
            name: body.name,
            color: body.color,
            slug: body.slug,
        }
    }
}

// ── GET /tags ────────────────────────────────────────────────────────────────

pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let usecase = ListTagsUseCase {
        tags: state.tag_repo(),
    };
    let tags = usecase.execute().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

// ── GET /tags/{id} ───────────────────────────────────────────────────────────

pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TagResponse>, ApiError> {
    let usecase = GetTagUseCase {
        tags: state.tag_repo(),
    };
    let tag = usecase.execute(id).await?;
    Ok(Json(tag.into()))
}

// ── POST /tags ───────────────────────────────────────────────────────────────

pub async fn create_tag(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<TagUpsertRequest>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    let usecase = CreateTagUseCase {
        tags: state.tag_repo(),
    };
    let tag = usecase.execute(body.into()).await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

// ── PUT /tags/{id} ───────────────────────────────────────────────────────────

pub async fn update_tag(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<TagUpsertRequest>,
) -> Result<Json<TagResponse>, ApiError> {
    let usecase = UpdateTagUseCase {
        tags: state.tag_repo(),
    };
    let tag = usecase.execute(id, body.into()).await?;
    Ok(Json(tag.into()))
}

// ── DELETE /tags/{id} ────────────────────────────────────────────────────────

pub async fn delete_tag(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteTagUseCase {
        tags: state.tag_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
