//! The `SimpleObject` entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier assigned by the store.
pub type SimpleId = i64;

/// Persisted record: an identifier plus a free-form text payload.
///
/// `id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct SimpleObject {
    #[serde(default)]
    #[schema(value_type = Option<i64>, example = 1)]
    pub id: Option<SimpleId>,
    #[serde(default)]
    #[schema(example = "hello")]
    pub text: String,
}

impl SimpleObject {
    /// Unsaved entity with no identifier.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }

    pub fn with_id(id: SimpleId, text: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            text: text.into(),
        }
    }
}
