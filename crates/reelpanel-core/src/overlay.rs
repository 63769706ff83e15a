//! Collaborators the overlay menus talk to.
//!
//! The core never renders or routes by itself. Menus receive these
//! capabilities and call them; the host decides what they do.

use std::cell::RefCell;

/// Logical page paths inside the settings overlay.
pub mod paths {
    pub const ROOT: &str = "/";
    pub const CAPTIONS: &str = "/captions";
    pub const CAPTIONS_OVERLAY: &str = "/captionsOverlay";
    pub const DOWNLOAD: &str = "/download";
    pub const DOWNLOAD_PC: &str = "/download/pc";
    pub const DOWNLOAD_IOS: &str = "/download/ios";
    pub const DOWNLOAD_ANDROID: &str = "/download/android";
}

/// Maps a logical path to an overlay page.
pub trait OverlayRouter {
    fn navigate(&self, path: &str);
}

/// Looks up display text for a message key.
pub trait Translator {
    fn translate(&self, key: &str, fallback: Option<&str>) -> String;
}

/// Copies text to the system clipboard, fire-and-forget.
pub trait Clipboard {
    fn copy(&self, text: &str);
}

/// Translator without a catalog: returns the fallback, or the key itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackTranslator;

impl Translator for FallbackTranslator {
    fn translate(&self, key: &str, fallback: Option<&str>) -> String {
        fallback.unwrap_or(key).to_string()
    }
}

/// Router that keeps the navigation history in memory.
///
/// Used by hosts that have no real overlay and by tests.
#[derive(Debug)]
pub struct MemoryRouter {
    history: RefCell<Vec<String>>,
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new(paths::ROOT)
    }
}

impl MemoryRouter {
    pub fn new(initial: &str) -> Self {
        Self {
            history: RefCell::new(vec![initial.to_string()]),
        }
    }

    /// Path of the page currently shown.
    pub fn current(&self) -> String {
        self.history
            .borrow()
            .last()
            .cloned()
            .unwrap_or_else(|| paths::ROOT.to_string())
    }

    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }
}

impl OverlayRouter for MemoryRouter {
    fn navigate(&self, path: &str) {
        tracing::debug!("Overlay navigate: {}", path);
        self.history.borrow_mut().push(path.to_string());
    }
}
