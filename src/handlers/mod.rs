//! HTTP handlers for SimpleObject CRUD and API docs.

pub mod docs;
pub mod simple;
