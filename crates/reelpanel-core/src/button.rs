//! Click resolution for overlay buttons.
//!
//! A button either carries an `href` or a click handler. Links without a
//! handler are followed by the button itself: absolute web links open in a
//! new browsing context, anything else is treated as an in-app path.

use crate::links::ExternalNavigator;
use crate::overlay::OverlayRouter;

/// What a button does when pressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub href: Option<String>,
    pub has_handler: bool,
    pub disabled: bool,
    pub loading: bool,
}

/// Outcome of pressing a button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Disabled or loading; nothing happens.
    Ignored,
    /// In-app navigation to a path.
    Navigate(String),
    /// Open a web link externally.
    OpenExternal(String),
    /// Run the button's own click handler.
    Handler,
}

impl ButtonState {
    pub fn link(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Default::default()
        }
    }

    pub fn handler() -> Self {
        Self {
            has_handler: true,
            ..Default::default()
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn resolve(&self) -> ButtonAction {
        if self.loading || self.disabled {
            return ButtonAction::Ignored;
        }
        match (&self.href, self.has_handler) {
            (Some(href), false) if href.contains("http") => {
                ButtonAction::OpenExternal(href.clone())
            }
            (Some(href), false) => ButtonAction::Navigate(href.clone()),
            _ => ButtonAction::Handler,
        }
    }
}

/// Carry out a resolved action. Returns true when the caller still has to
/// run its click handler.
pub fn activate(
    action: &ButtonAction,
    router: &dyn OverlayRouter,
    navigator: &dyn ExternalNavigator,
) -> bool {
    match action {
        ButtonAction::Ignored => false,
        ButtonAction::Navigate(path) => {
            router.navigate(path);
            false
        }
        ButtonAction::OpenExternal(url) => {
            navigator.open(url);
            false
        }
        ButtonAction::Handler => true,
    }
}
