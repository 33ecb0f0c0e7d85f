//! Image studio backed by Gemini
//!
//! Edits images (optionally masked), suggests creative ideas, generates new
//! images from text or reference images, and drafts prompt ideas. Every
//! response is normalized into a small result type before it reaches callers.

pub mod ai;
pub mod app;
pub mod auth;
pub mod canvas;
pub mod error;
pub mod image;
pub mod models;
pub mod prompts;

pub use error::{Error, Result};
