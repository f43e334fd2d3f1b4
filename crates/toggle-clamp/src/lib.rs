//! Configuration and output formats for the `toggle-clamp` tool.

pub mod config;
pub mod render;
