//! Configuration Module
//!
//! Serializable scene configuration with named presets.

pub mod field_config;

pub use field_config::FieldConfig;
