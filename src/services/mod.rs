//! Dashboard services used by the web routes and the CLI.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the action logic so route handlers and CLI commands
//! stay focused on protocol translation and session plumbing.

pub mod dashboard;
