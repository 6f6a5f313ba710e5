//! # Speed Camera Store
//!
//! Persistence layer for camera records.
//!
//! ```text
//! ┌───────────────────────────────┐
//! │   CameraRepository (trait)    │
//! └───────────────────────────────┘
//!          │              │
//!          ▼              ▼
//! ┌─────────────────┐ ┌────────────────────┐
//! │ JsonFile        │ │ InMemory           │
//! │ {"points":[..]} │ │ (tests, offline)   │
//! └─────────────────┘ └────────────────────┘
//! ```
//!
//! The [`import`] module loads the police CSV export; the `speedcam-migrate`
//! binary wires it to a JSON store.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod import;
pub mod repository;

pub use error::{Result, StoreError};
pub use import::{ImportStats, parse_cameras, parse_cameras_file};
pub use repository::{
    CameraRepository, InMemoryRepository, JsonFileRepository, SharedCameraRepository,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
