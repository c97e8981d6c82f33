//! Configuration module for Sumi-Robots
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_robots::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler identity: {}", config.user_agent.crawler_name);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ClientConfig, Config, SitemapConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::load_config;
pub use validation::validate;
