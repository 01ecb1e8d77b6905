//! # VESTA CLI
//!
//! Command-line surface for the VESTA pipeline: the HTTP API server,
//! one-shot command dispatch, rule table tooling, and an interactive
//! dry-run console.

pub mod commands;
pub mod dry_run;
pub mod interactive;
