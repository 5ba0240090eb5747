//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Keyed registries for every id namespace of a scene document
//! - Scene clock
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
