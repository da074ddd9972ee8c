//! Dialog windows
//!
//! Each dialog is a small webview window with a fixed label, so asking for a
//! dialog that is already open just brings it to the front. Error windows are
//! the exception: every failure gets its own.

use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::error::{Result, ShortcutError};

pub const ADD_LABEL: &str = "add-shortcut";
pub const EDIT_LIST_LABEL: &str = "edit-shortcuts";
pub const EDIT_ONE_LABEL: &str = "edit-shortcut";
const ERROR_LABEL_PREFIX: &str = "error-";

/// Longest traceback passed to an error window, in characters
const MAX_TRACE_CHARS: usize = 8_000;

/// Open the "Add Shortcut" dialog
pub fn open_add_dialog(app: &AppHandle) -> Result<()> {
    open_dialog(app, ADD_LABEL, "add.html".to_string(), "Add Shortcut", (420.0, 420.0))
}

/// Open the "Edit Shortcuts" list
pub fn open_edit_dialog(app: &AppHandle) -> Result<()> {
    open_dialog(app, EDIT_LIST_LABEL, "edit.html".to_string(), "Edit Shortcuts", (520.0, 440.0))
}

/// Open the editor for one shortcut, replacing the list window.
#[tauri::command]
pub async fn open_edit_shortcut_dialog(app: AppHandle, name: String) -> Result<()> {
    if let Some(list) = app.get_webview_window(EDIT_LIST_LABEL) {
        list.close()?;
    }

    let url = shortcut_url(&name);
    let title = format!("Edit Shortcut: {}", name);

    // Already editing another shortcut: point the open window at this one
    if let Some(window) = app.get_webview_window(EDIT_ONE_LABEL) {
        let target = window
            .url()?
            .join(&url)
            .map_err(|e| ShortcutError::platform(e.to_string()))?;
        window.navigate(target)?;
        window.set_title(&title)?;
        return focus(&window);
    }

    open_dialog(&app, EDIT_ONE_LABEL, url, &title, (420.0, 400.0))
}

/// Close the calling dialog
#[tauri::command]
pub fn close_dialog(window: WebviewWindow) -> Result<()> {
    tracing::debug!(label = window.label(), "Closing dialog");
    window.close()?;
    Ok(())
}

/// Show a failure in a new error window
pub fn show_error_window(app: &AppHandle, message: &str, trace: Option<&str>) -> Result<()> {
    let label = format!("{}{}", ERROR_LABEL_PREFIX, uuid::Uuid::new_v4().simple());
    WebviewWindowBuilder::new(app, &label, WebviewUrl::App(error_url(message, trace).into()))
        .title("Shortcut Error")
        .inner_size(480.0, 260.0)
        .min_inner_size(320.0, 180.0)
        .center()
        .focused(true)
        .build()?;
    Ok(())
}

fn open_dialog(app: &AppHandle, label: &str, url: String, title: &str, size: (f64, f64)) -> Result<()> {
    if let Some(window) = app.get_webview_window(label) {
        return focus(&window);
    }

    tracing::debug!(label = label, url = %url, "Opening dialog");
    let (width, height) = size;
    WebviewWindowBuilder::new(app, label, WebviewUrl::App(url.into()))
        .title(title)
        .inner_size(width, height)
        .min_inner_size(320.0, 240.0)
        .center()
        .focused(true)
        .build()?;
    Ok(())
}

fn focus(window: &WebviewWindow) -> Result<()> {
    window.unminimize()?;
    window.show()?;
    window.set_focus()?;
    Ok(())
}

fn shortcut_url(name: &str) -> String {
    format!("shortcut.html?name={}", urlencoding::encode(name))
}

fn error_url(message: &str, trace: Option<&str>) -> String {
    let mut url = format!("error.html?message={}", urlencoding::encode(message));
    if let Some(trace) = trace.filter(|t| !t.is_empty()) {
        url.push_str("&trace=");
        url.push_str(&urlencoding::encode(&truncate_trace(trace)));
    }
    url
}

/// Keep the tail of an overlong traceback; the end names the error.
fn truncate_trace(trace: &str) -> String {
    let count = trace.chars().count();
    if count <= MAX_TRACE_CHARS {
        return trace.to_string();
    }
    let tail: String = trace.chars().skip(count - MAX_TRACE_CHARS).collect();
    format!("...\n{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_url_encodes_name() {
        assert_eq!(shortcut_url("Take Screenshot"), "shortcut.html?name=Take%20Screenshot");
        assert_eq!(shortcut_url("a&b=c"), "shortcut.html?name=a%26b%3Dc");
    }

    #[test]
    fn test_error_url_without_trace() {
        assert_eq!(error_url("boom", None), "error.html?message=boom");
        assert_eq!(error_url("boom", Some("")), "error.html?message=boom");
    }

    #[test]
    fn test_error_url_with_trace() {
        let url = error_url("ValueError: bad", Some("Traceback:\nValueError: bad"));
        assert_eq!(
            url,
            "error.html?message=ValueError%3A%20bad&trace=Traceback%3A%0AValueError%3A%20bad"
        );
    }

    #[test]
    fn test_truncate_trace_keeps_tail() {
        let short = "line";
        assert_eq!(truncate_trace(short), short);

        let long = format!("{}END", "é".repeat(MAX_TRACE_CHARS));
        let truncated = truncate_trace(&long);
        assert!(truncated.starts_with("...\n"));
        assert!(truncated.ends_with("END"));
        assert_eq!(truncated.chars().count(), MAX_TRACE_CHARS + 4);
    }
}
