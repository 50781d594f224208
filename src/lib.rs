//! tmux-menu library crate.
//!
//! This library provides the core of the session menu, including:
//! - Raw terminal input decoding and event polling
//! - Running-session discovery with most-recently-used ordering
//! - The menu state machine and its renderer
//! - Hand-off files read by the orchestrating shell script

pub mod app;
pub mod config;
pub mod event_loop;
pub mod handoff;
pub mod input;
pub mod session;
pub mod terminal;
pub mod ui;
