//! Shared utilities for Shortcut Tray

pub mod fs;
pub mod paths;
