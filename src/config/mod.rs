//! # Configuration Module
//!
//! This module provides the split configuration, its defaults and validation.

pub mod config;

pub use config::{parse_hex_color, SplitConfig};
