//! Example renderer for generating sample configuration files
//!
//! This module takes a ComposedSchema and produces a commented YAML
//! document showing every option with its type, default and example.

pub mod config;
mod example;
mod yaml;

pub use config::RenderConfig;
pub use example::{placeholder, render};
