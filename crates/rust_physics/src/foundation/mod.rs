//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the kernel:
//! - Math types and vector operations
//! - Stable handles for scene-owned storage
//! - Colors carried by bodies for the surrounding renderer
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod color;
pub mod logging;
