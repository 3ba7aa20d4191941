//! # Courtstats Common Library
//!
//! Shared code for the courtstats services including:
//! - Player record model (storage and display forms)
//! - Two-way field normalization
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod error;
pub mod normalize;
pub mod player;

pub use error::{Error, Result};
pub use player::{FieldValue, Hand, PlayerField, PlayerRecord, PlayerView};
