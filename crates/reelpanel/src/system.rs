//! Host-side collaborators for the command line.

use std::process::{Command, Stdio};

use reelpanel_core::ExternalNavigator;
use reelpanel_core::config::NavigatorConfig;
use reelpanel_core::overlay::Clipboard;
use tracing::{debug, warn};

/// Hands URLs to the configured opener program (`xdg-open` by default).
///
/// The child is spawned detached; its exit status is never collected.
#[derive(Debug, Clone)]
pub struct SystemNavigator {
    command: String,
    args: Vec<String>,
}

impl SystemNavigator {
    pub fn new(config: &NavigatorConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
        }
    }
}

impl ExternalNavigator for SystemNavigator {
    fn open(&self, url: &str) {
        debug!("Opening {} with {}", url, self.command);
        let spawned = Command::new(&self.command)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => debug!("Spawned {} (pid {})", self.command, child.id()),
            Err(e) => warn!("Failed to run '{}': {}", self.command, e),
        }
    }
}

/// Prints URLs instead of opening them (`--dry-run`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintNavigator;

impl ExternalNavigator for PrintNavigator {
    fn open(&self, url: &str) {
        println!("{}", url);
    }
}

/// There is no clipboard on a terminal; the text goes to stdout for piping.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn copy(&self, text: &str) {
        println!("{}", text);
    }
}

/// Pick the navigator for a command.
pub fn navigator(config: &NavigatorConfig, dry_run: bool) -> Box<dyn ExternalNavigator> {
    if dry_run {
        Box::new(PrintNavigator)
    } else {
        Box::new(SystemNavigator::new(config))
    }
}
