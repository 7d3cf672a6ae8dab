//! Process-local store. Transactions hold the store lock and stage only the ids they touch;
//! commit applies the staged writes.

use super::{SimpleRepository, SimpleTransaction};
use crate::error::AppError;
use crate::model::{SimpleId, SimpleObject};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
struct Tables {
    rows: BTreeMap<SimpleId, String>,
    /// Last id handed out; generated ids are always greater.
    last_id: SimpleId,
}

impl Tables {
    fn get(&self, id: SimpleId) -> Option<SimpleObject> {
        self.rows.get(&id).map(|text| SimpleObject::with_id(id, text.clone()))
    }

    fn save(&mut self, entity: &SimpleObject) -> SimpleObject {
        let id = next_id(&mut self.last_id, entity.id);
        self.rows.insert(id, entity.text.clone());
        SimpleObject::with_id(id, entity.text.clone())
    }
}

/// Id for a save: the explicit one (raising `last_id` past it) or a fresh one.
fn next_id(last_id: &mut SimpleId, explicit: Option<SimpleId>) -> SimpleId {
    match explicit {
        Some(id) => {
            *last_id = (*last_id).max(id);
            id
        }
        None => {
            *last_id += 1;
            *last_id
        }
    }
}

#[derive(Clone, Default)]
pub struct MemorySimpleRepository {
    inner: Arc<Mutex<Tables>>,
}

impl MemorySimpleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entities.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SimpleRepository for MemorySimpleRepository {
    async fn find_all(&self) -> Result<Vec<SimpleObject>, AppError> {
        let tables = self.inner.lock().await;
        Ok(tables
            .rows
            .iter()
            .map(|(id, text)| SimpleObject::with_id(*id, text.clone()))
            .collect())
    }

    async fn find_by_id(&self, id: SimpleId) -> Result<Option<SimpleObject>, AppError> {
        Ok(self.inner.lock().await.get(id))
    }

    async fn save(&self, entity: &SimpleObject) -> Result<SimpleObject, AppError> {
        Ok(self.inner.lock().await.save(entity))
    }

    async fn delete_by_id(&self, id: SimpleId) -> Result<(), AppError> {
        self.inner.lock().await.rows.remove(&id);
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn SimpleTransaction>, AppError> {
        let guard = self.inner.clone().lock_owned().await;
        let last_id = guard.last_id;
        Ok(Box::new(MemoryTransaction {
            guard,
            writes: BTreeMap::new(),
            last_id,
        }))
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    /// Staged row state per touched id; `None` is a delete.
    writes: BTreeMap<SimpleId, Option<String>>,
    last_id: SimpleId,
}

#[async_trait]
impl SimpleTransaction for MemoryTransaction {
    async fn find_by_id(&mut self, id: SimpleId) -> Result<Option<SimpleObject>, AppError> {
        Ok(match self.writes.get(&id) {
            Some(Some(text)) => Some(SimpleObject::with_id(id, text.clone())),
            Some(None) => None,
            None => self.guard.get(id),
        })
    }

    async fn save(&mut self, entity: &SimpleObject) -> Result<SimpleObject, AppError> {
        let id = next_id(&mut self.last_id, entity.id);
        self.writes.insert(id, Some(entity.text.clone()));
        Ok(SimpleObject::with_id(id, entity.text.clone()))
    }

    async fn delete_by_id(&mut self, id: SimpleId) -> Result<(), AppError> {
        self.writes.insert(id, None);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryTransaction {
            mut guard,
            writes,
            last_id,
        } = *self;
        for (id, row) in writes {
            match row {
                Some(text) => {
                    guard.rows.insert(id, text);
                }
                None => {
                    guard.rows.remove(&id);
                }
            }
        }
        guard.last_id = guard.last_id.max(last_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generated_ids_skip_past_explicit_ids() {
        let repo = MemorySimpleRepository::new();
        repo.save(&SimpleObject::with_id(7, "pinned")).await.unwrap();
        let generated = repo.save(&SimpleObject::new("next")).await.unwrap();
        assert_eq!(generated.id, Some(8));
    }

    #[tokio::test]
    async fn dropped_transaction_discards_changes() {
        let repo = MemorySimpleRepository::new();
        {
            let mut tx = repo.begin().await.unwrap();
            tx.save(&SimpleObject::new("staged")).await.unwrap();
        }
        assert!(repo.is_empty().await);

        let mut tx = repo.begin().await.unwrap();
        let saved = tx.save(&SimpleObject::new("kept")).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(repo.find_by_id(saved.id.unwrap()).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn transaction_reads_its_own_writes() {
        let repo = MemorySimpleRepository::new();
        let kept = repo.save(&SimpleObject::new("kept")).await.unwrap();
        let gone = repo.save(&SimpleObject::new("gone")).await.unwrap();

        let mut tx = repo.begin().await.unwrap();
        tx.delete_by_id(gone.id.unwrap()).await.unwrap();
        let added = tx.save(&SimpleObject::new("added")).await.unwrap();
        assert_eq!(tx.find_by_id(gone.id.unwrap()).await.unwrap(), None);
        assert_eq!(tx.find_by_id(added.id.unwrap()).await.unwrap(), Some(added.clone()));
        assert_eq!(tx.find_by_id(kept.id.unwrap()).await.unwrap(), Some(kept.clone()));
        tx.commit().await.unwrap();

        assert_eq!(repo.find_all().await.unwrap(), vec![kept, added]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = MemorySimpleRepository::new();
        let first = repo.save(&SimpleObject::new("a")).await.unwrap().id.unwrap();
        let last = repo.save(&SimpleObject::new("b")).await.unwrap().id.unwrap();
        repo.delete_by_id(last).await.unwrap();
        repo.save(&SimpleObject::with_id(first, "a2")).await.unwrap();

        let next = repo.save(&SimpleObject::new("c")).await.unwrap().id.unwrap();
        assert!(next > last);
    }
}
