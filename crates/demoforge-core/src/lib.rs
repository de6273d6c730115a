//! Core contracts for Demoforge.
//!
//! This crate defines the topic-config data model consumed by the generation
//! engine, config loading from YAML, and the config linter shared by the CLI
//! and the engine.

pub mod error;
pub mod schema;
pub mod validation;

pub use error::{Error, Result};
pub use schema::{
    ChoiceField, DateField, DatetimeField, FakerField, FieldDef, FieldSpec, FormulaField,
    NumericBounds, NumericField, PatternField, ReferenceField, TopicConfig, load_config,
};
pub use validation::{ConfigIssue, validate_config};

/// Current contract version for topic-config artifacts.
pub const CONFIG_VERSION: &str = "0.1";
