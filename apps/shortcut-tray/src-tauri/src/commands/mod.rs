//! Tauri commands
//!
//! `shortcuts` is the registry API the dialog pages call; `dialogs` opens and
//! closes the dialog windows themselves.

pub mod dialogs;
pub mod shortcuts;
