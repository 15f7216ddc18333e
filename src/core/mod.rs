//! Core library components.
//!
//! Everything needed to find missing secret properties, resolve their values
//! (from templates or the operator) and write them back through a backend
//! editor. The CLI is a thin layer over these modules.

pub mod config;
pub mod constants;
pub mod domain;
pub mod editor;
pub mod input;
pub mod manifest;
pub mod names;
pub mod requirements;
pub mod resolve;
pub mod retry;
pub mod run;
pub mod schema;
pub mod store;
pub mod template;
pub mod types;
pub mod verify;
