// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ResumeRefresh` Store
//!
//! Configuration loading and persistence.
//!
//! This crate provides:
//!
//! - **Config**: file + `APP_*` environment resolution, validation, templates
//! - **Persistence**: JSON file I/O with restrictive permissions
//!
//! ## Usage
//!
//! ```ignore
//! use resumerefresh_store::{config, resume_artifact};
//!
//! let loaded = config::load(None).await?;
//! let artifact = resume_artifact(&loaded.config)?;
//! ```

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{
    LoadedConfig, apply_env_from, ensure_resume_readable, init, load, load_with_env,
    resume_artifact, save, template, validate_http,
};
pub use error::StoreError;
pub use persistence::{
    APP_DIR, CONFIG_FILE, default_config_dir, default_config_path, load_json, save_json,
};
