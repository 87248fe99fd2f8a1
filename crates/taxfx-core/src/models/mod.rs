//! Data models: blocks, anchor rules, results, and configuration.

pub mod anchors;
pub mod block;
pub mod config;
pub mod result;
