//! MWD Agent
//!
//! Marketing/website-design agent service: prompt-driven generation
//! endpoints backed by an LLM, plus a Google Workspace client for project
//! files and deliverables.

pub mod api;
pub mod core;
pub mod integrations;
pub mod models;
