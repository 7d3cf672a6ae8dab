//! Persistence gateway for `SimpleObject`: list, lookup, upsert and delete by id.
//!
//! The gateway is permissive: `save` inserts when `id` is `None` and overwrites
//! (or inserts at that id) otherwise. Existence checks belong to the service.

mod memory;
mod postgres;

pub use memory::MemorySimpleRepository;
pub use postgres::PgSimpleRepository;

use crate::error::AppError;
use crate::model::{SimpleId, SimpleObject};
use async_trait::async_trait;

#[async_trait]
pub trait SimpleRepository: Send + Sync {
    /// All stored entities, ordered by id.
    async fn find_all(&self) -> Result<Vec<SimpleObject>, AppError>;

    async fn find_by_id(&self, id: SimpleId) -> Result<Option<SimpleObject>, AppError>;

    /// Insert (assigning an id) or overwrite by id. Returns the stored entity.
    async fn save(&self, entity: &SimpleObject) -> Result<SimpleObject, AppError>;

    /// Remove the entity if present. Absence is not an error.
    async fn delete_by_id(&self, id: SimpleId) -> Result<(), AppError>;

    /// Open a unit of work. Changes become visible only on `commit`.
    async fn begin(&self) -> Result<Box<dyn SimpleTransaction>, AppError>;

    /// Cheap reachability check behind `GET /ready`.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// A single atomic unit against the store. Dropping without `commit` rolls back.
#[async_trait]
pub trait SimpleTransaction: Send {
    /// Lookup that holds the row for the rest of the transaction.
    async fn find_by_id(&mut self, id: SimpleId) -> Result<Option<SimpleObject>, AppError>;

    async fn save(&mut self, entity: &SimpleObject) -> Result<SimpleObject, AppError>;

    async fn delete_by_id(&mut self, id: SimpleId) -> Result<(), AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}
