use crate::domain::repository::TagRepository;
use crate::domain::types::{Tag, TagDraft};
use crate::error::ApiError;

// ── ListTags ─────────────────────────────────────────────────────────────────

pub struct ListTagsUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> ListTagsUseCase<T> {
    pub async fn execute(&self) -> Result<Vec<Tag>, ApiError> {
        self.tags.list().await
    }
}

// ── GetTag ───────────────────────────────────────────────────────────────────

pub struct GetTagUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> GetTagUseCase<T> {
    pub async fn execute(&self, id: i32) -> Result<Tag, ApiError> {
        self.tags.find(id).await?.ok_or(ApiError::TagNotFound)
    }
}

// ── CreateTag ────────────────────────────────────────────────────────────────

pub struct CreateTagUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> CreateTagUseCase<T> {
    pub async fn execute(&self, draft: TagDraft) -> Result<Tag, ApiError> {
        if self.tags.has_conflict(&draft, None).await? {
            return Err(ApiError::validation(
                "tag name, color and slug must be unique",
            ));
        }
        self.tags.create(&draft).await
    }
}

// ── UpdateTag ────────────────────────────────────────────────────────────────

pub struct UpdateTagUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> UpdateTagUseCase<T> {
    pub async fn execute(&self, id: i32, draft: TagDraft) -> Result<Tag, ApiError> {
        if self.tags.find(id).await?.is_none() {
            return Err(ApiError::TagNotFound);
        }
        if self.tags.has_conflict(&draft, Some(id)).await? {
            return Err(ApiError::validation(
                "tag name, color and slug must be unique",
            ));
        }
        self.tags.update(id, &draft).await?;
        self.tags.find(id).await?.ok_or(ApiError::TagNotFound)
    }
}

// ── DeleteTag ────────────────────────────────────────────────────────────────

pub struct DeleteTagUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> DeleteTagUseCase<T> {
    pub async fn execute(&self, id: i32) -> Result<(), ApiError> {
        let deleted = self.tags.delete(id).await?;
        if !deleted {
            return Err(ApiError::TagNotFound);
        }
        Ok(())
    }
}
