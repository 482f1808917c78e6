//! Key-value slot storage.
//!
//! A slot is a named blob that is always read and written whole. The catalog
//! keeps its entire collection in a single slot and replaces it after every
//! mutation, so backends only need to guarantee that a write either lands
//! completely or not at all.

pub mod backend;
pub mod error;
mod key;

pub use crate::backend::SlotBackend;
pub use crate::key::{SlotKey, validate as validate_key};
use std::sync::Arc;

pub type BackendHandle = Arc<dyn SlotBackend + Send + Sync>;
