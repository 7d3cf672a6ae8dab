//! Transactional service over the persistence gateway.

use super::SimpleService;
use crate::error::AppError;
use crate::model::{SimpleId, SimpleObject};
use crate::repository::SimpleRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Mutations run as one gateway transaction each: the precondition check and
/// the write commit together or not at all.
pub struct SimpleServiceImpl {
    repo: Arc<dyn SimpleRepository>,
}

impl SimpleServiceImpl {
    pub fn new(repo: Arc<dyn SimpleRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SimpleService for SimpleServiceImpl {
    async fn find_all(&self) -> Result<Vec<SimpleObject>, AppError> {
        self.repo.find_all().await
    }

    async fn find_one(&self, id: SimpleId) -> Result<Option<SimpleObject>, AppError> {
        self.repo.find_by_id(id).await
    }

    async fn create(&self, entity: SimpleObject) -> Result<SimpleObject, AppError> {
        // save() would overwrite an existing row; creation must let the store assign the id.
        if let Some(id) = entity.id {
            tracing::warn!(id, "create rejected: id must be null");
            return Err(AppError::AlreadyExists(format!(
                "cannot create SimpleObject with supplied id {}; id must be null",
                id
            )));
        }
        let mut tx = self.repo.begin().await?;
        let saved = tx.save(&entity).await?;
        tx.commit().await?;
        Ok(saved)
    }

    async fn update(&self, entity: SimpleObject) -> Result<SimpleObject, AppError> {
        let id = entity
            .id
            .ok_or_else(|| AppError::NotFound("SimpleObject without id".into()))?;
        let mut tx = self.repo.begin().await?;
        // save() would insert a missing row; updates only apply to stored entities.
        if tx.find_by_id(id).await?.is_none() {
            tracing::warn!(id, "update rejected: not found");
            return Err(AppError::NotFound(format!("SimpleObject {}", id)));
        }
        let saved = tx.save(&entity).await?;
        tx.commit().await?;
        Ok(saved)
    }

    async fn delete(&self, id: SimpleId) -> Result<(), AppError> {
        let mut tx = self.repo.begin().await?;
        tx.delete_by_id(id).await?;
        tx.commit().await
    }
}
