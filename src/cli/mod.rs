//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `migrate` - Database migrations
//! - `jobs` - Scheduled batch jobs
//! - `usuarios` - Staff account management

pub mod args;

pub use args::{Cli, Commands};
