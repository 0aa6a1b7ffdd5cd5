//! Terminal chat client for hosted LLMs.
//!
//! Replies can be copied to the clipboard whole or by code block, and the CLI
//! Assistant role turns requests into shell commands that run only after the
//! user confirms them.

pub mod clipboard;
pub mod codeblocks;
pub mod command;
pub mod config;
pub mod display;
pub mod error_handling;
pub mod execution;
pub mod file_input;
pub mod gate;
pub mod history;
pub mod intent;
pub mod logging;
pub mod os_context;
pub mod providers;
pub mod roles;
pub mod session;
