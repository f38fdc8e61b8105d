//! # besso-core
//!
//! Core types, traits, configuration, and error handling for the Besso
//! front-desk skill.

pub mod config;
pub mod document;
pub mod envelope;
pub mod error;
pub mod record;
pub mod traits;
