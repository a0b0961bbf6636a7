//! Core application modules
//!
//! This module contains configuration, constants, logging, the LLM provider
//! layer and the prompt-driven generator.

pub mod config;
pub mod constants;
pub mod generator;
pub mod logging;
pub mod provider;
pub mod providers;
