//! Download menu view-model.
//!
//! HLS sources get the hosted downloader, a copy-playlist action and the
//! external player dropdown. File sources get the per-platform explanation
//! pages, the dropdown and a direct download. Both offer the selected
//! subtitle track as an SRT download.

use tracing::debug;

use crate::button::{self, ButtonState};
use crate::links::{self, ExternalNavigator, PlayerOption};
use crate::overlay::{Clipboard, OverlayRouter, paths};
use crate::source::{PlayerState, SourceKind};

/// Per-platform "how to download" pages for file sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadRoute {
    Pc,
    Ios,
    Android,
}

impl DownloadRoute {
    pub const ALL: [DownloadRoute; 3] = [
        DownloadRoute::Pc,
        DownloadRoute::Ios,
        DownloadRoute::Android,
    ];

    pub fn path(self) -> &'static str {
        match self {
            DownloadRoute::Pc => paths::DOWNLOAD_PC,
            DownloadRoute::Ios => paths::DOWNLOAD_IOS,
            DownloadRoute::Android => paths::DOWNLOAD_ANDROID,
        }
    }

    pub fn title_key(self) -> &'static str {
        match self {
            DownloadRoute::Pc => "player.menus.downloads.onPc.title",
            DownloadRoute::Ios => "player.menus.downloads.onIos.title",
            DownloadRoute::Android => "player.menus.downloads.onAndroid.title",
        }
    }

    /// Explanation pages all lead back to the download menu.
    pub fn back(router: &dyn OverlayRouter) {
        router.navigate(paths::DOWNLOAD);
    }
}

/// State of the download menu for the current player state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadView {
    kind: SourceKind,
    download_url: String,
    players: Vec<PlayerOption>,
    subtitle_data_url: Option<String>,
}

impl DownloadView {
    /// Build the menu, or `None` when there's nothing to download (no
    /// source, or the selected quality has no stream).
    pub fn new(state: &PlayerState, players: &[PlayerOption]) -> Option<Self> {
        let source = state.source.as_ref()?;
        let download_url =
            links::select_download_url(Some(source), state.current_quality.as_deref())?;
        let subtitle_data_url = links::build_subtitle_export_data_url(
            state
                .selected_caption
                .as_ref()
                .map(|track| track.srt_data.as_str()),
        );

        Some(Self {
            kind: source.kind(),
            download_url,
            players: players.to_vec(),
            subtitle_data_url,
        })
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// URL of the stream as the player sees it (possibly proxied).
    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    /// Stream URL with any playlist proxy removed.
    pub fn direct_url(&self) -> String {
        links::proxied_to_direct_url(&self.download_url)
    }

    /// Hosted downloader link, HLS sources only.
    pub fn hls_downloader_url(&self) -> Option<String> {
        match self.kind {
            SourceKind::Hls => Some(links::build_third_party_download_url(&self.direct_url())),
            SourceKind::File => None,
        }
    }

    /// Players listed in the "open in" dropdown.
    pub fn players(&self) -> &[PlayerOption] {
        &self.players
    }

    /// Deep links for every listed player.
    pub fn player_links(&self) -> Vec<(PlayerOption, String)> {
        self.players
            .iter()
            .map(|&option| {
                (
                    option,
                    links::build_external_player_url(option, &self.download_url),
                )
            })
            .collect()
    }

    /// Explanation pages reachable from this menu.
    pub fn explanation_routes(&self) -> &'static [DownloadRoute] {
        match self.kind {
            SourceKind::File => &DownloadRoute::ALL,
            SourceKind::Hls => &[],
        }
    }

    pub fn can_download_subtitle(&self) -> bool {
        self.subtitle_data_url.is_some()
    }

    pub fn subtitle_data_url(&self) -> Option<&str> {
        self.subtitle_data_url.as_deref()
    }

    /// The main download button: the hosted downloader for HLS, the stream
    /// itself for files.
    pub fn primary_download_button(&self) -> ButtonState {
        match self.hls_downloader_url() {
            Some(url) => ButtonState::link(url),
            None => ButtonState::link(self.download_url.clone()),
        }
    }

    /// The subtitle download button, disabled without a selected caption.
    pub fn subtitle_button(&self) -> ButtonState {
        ButtonState::handler().disabled(!self.can_download_subtitle())
    }

    pub fn back(&self, router: &dyn OverlayRouter) {
        router.navigate(paths::ROOT);
    }

    /// Open an explanation page. Ignored for routes this menu doesn't list.
    pub fn open_route(&self, route: DownloadRoute, router: &dyn OverlayRouter) {
        if self.explanation_routes().contains(&route) {
            router.navigate(route.path());
        } else {
            debug!("Route {} not offered for this source", route.path());
        }
    }

    /// Press the primary download button.
    pub fn download(&self, router: &dyn OverlayRouter, navigator: &dyn ExternalNavigator) {
        let action = self.primary_download_button().resolve();
        button::activate(&action, router, navigator);
    }

    /// Open the stream in an external player picked from the dropdown.
    pub fn open_in_player(&self, option_id: &str, navigator: &dyn ExternalNavigator) {
        links::open_external_player(navigator, option_id, Some(&self.download_url));
    }

    /// Open the selected subtitle track as an SRT file. Returns false when no
    /// caption is selected.
    pub fn download_subtitle(&self, navigator: &dyn ExternalNavigator) -> bool {
        match &self.subtitle_data_url {
            Some(url) => {
                navigator.open(url);
                true
            }
            None => false,
        }
    }

    /// Copy the playlist URL. Only offered for HLS sources.
    pub fn copy_playlist(&self, clipboard: &dyn Clipboard) -> bool {
        if self.kind != SourceKind::Hls {
            return false;
        }
        clipboard.copy(&self.download_url);
        true
    }
}
