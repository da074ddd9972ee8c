// Prevents additional console window on Windows in release
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use clap::Parser;
use std::path::PathBuf;

/// Shortcut Tray - run named commands from the system tray
#[derive(Parser, Debug)]
#[command(name = "shortcut-tray")]
#[command(about = "Run named shell commands and code snippets from the system tray", long_about = None)]
struct Args {
    /// Shortcuts file to use (overrides SHORTCUT_TRAY_SHORTCUTS and the config file)
    #[arg(long, value_name = "PATH")]
    shortcuts: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    shortcut_tray_lib::run(shortcut_tray_lib::LaunchOptions {
        shortcuts_file: args.shortcuts,
        config_file: args.config,
    });
}
