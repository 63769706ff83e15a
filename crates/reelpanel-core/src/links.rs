//! Download and deep-link derivation for the downloads menu.
//!
//! Everything here is total: missing input comes back as `None` or an empty
//! string, which callers treat as "action unavailable".

use base64::{Engine as _, engine::general_purpose::STANDARD};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use tracing::{debug, warn};

use crate::source::PlaybackSource;

/// Characters escaped in query values: everything but `A-Z a-z 0-9` and
/// `- _ . ! ~ * ' ( )`, the same set `encodeURIComponent` leaves alone.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a URL for use as a query value.
fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Marker that precedes the percent-encoded target of a proxied playlist.
const PROXY_MARKER: &str = "m3u8-proxy?url=";

/// Endpoint of the hosted HLS downloader.
pub const HLS_DOWNLOADER_URL: &str = "https://hls-downloader.pstream.org/";

/// MIME type used for exported subtitle tracks.
pub const SRT_MIME_TYPE: &str = "application/x-subrip";

/// File name offered when saving an exported subtitle track.
pub const SUBTITLE_FILE_NAME: &str = "subtitles.srt";

/// Opens URLs in a new browsing context or the OS handler.
///
/// Fire-and-forget: there is no completion or failure reported back.
pub trait ExternalNavigator {
    fn open(&self, url: &str);
}

/// External player applications reachable through a URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerOption {
    Vlc,
    Iina,
    Outplayer,
}

impl PlayerOption {
    /// All players, in dropdown order.
    pub const ALL: [PlayerOption; 3] = [
        PlayerOption::Vlc,
        PlayerOption::Iina,
        PlayerOption::Outplayer,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PlayerOption::Vlc => "vlc",
            PlayerOption::Iina => "iina",
            PlayerOption::Outplayer => "outplayer",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.id() == id)
    }

    /// Translation key for the dropdown label.
    pub fn label_key(self) -> &'static str {
        match self {
            PlayerOption::Vlc => "player.menus.downloads.vlc",
            PlayerOption::Iina => "player.menus.downloads.iina",
            PlayerOption::Outplayer => "player.menus.downloads.outplayer",
        }
    }

    /// English label used when no translation is available.
    pub fn display_name(self) -> &'static str {
        match self {
            PlayerOption::Vlc => "VLC",
            PlayerOption::Iina => "IINA",
            PlayerOption::Outplayer => "Outplayer",
        }
    }
}

/// Unwrap a proxied playlist URL to the URL it relays.
///
/// Matches the first `m3u8-proxy?url=` and percent-decodes everything after
/// it. URLs without the marker, or whose remainder doesn't decode to UTF-8,
/// come back unchanged.
pub fn proxied_to_direct_url(playback_url: &str) -> String {
    let Some(start) = playback_url.find(PROXY_MARKER) else {
        return playback_url.to_string();
    };
    let encoded = &playback_url[start + PROXY_MARKER.len()..];
    if encoded.is_empty() {
        return playback_url.to_string();
    }
    match percent_decode_str(encoded).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            warn!("Proxied URL target is not valid UTF-8: {}", e);
            playback_url.to_string()
        }
    }
}

/// Link to the hosted HLS downloader for a (decoded) playlist URL.
pub fn build_third_party_download_url(decoded_url: &str) -> String {
    format!(
        "{}?url={}",
        HLS_DOWNLOADER_URL,
        encode_query_value(decoded_url)
    )
}

/// Deep link that hands `download_url` to an external player.
pub fn build_external_player_url(option: PlayerOption, download_url: &str) -> String {
    match option {
        PlayerOption::Vlc => format!("vlc://{}", download_url),
        PlayerOption::Iina => format!("iina://weblink?url={}", encode_query_value(download_url)),
        PlayerOption::Outplayer => format!("outplayer://{}", download_url),
    }
}

/// Same as [`build_external_player_url`], keyed by option id. Unknown ids
/// produce an empty string.
pub fn external_player_url_for_id(id: &str, download_url: &str) -> String {
    match PlayerOption::from_id(id) {
        Some(option) => build_external_player_url(option, download_url),
        None => String::new(),
    }
}

/// URL to download for the current source and quality.
pub fn select_download_url(
    source: Option<&PlaybackSource>,
    current_quality: Option<&str>,
) -> Option<String> {
    match source? {
        PlaybackSource::File { qualities } => {
            let quality = current_quality?;
            qualities.get(quality).map(|stream| stream.url.clone())
        }
        PlaybackSource::Hls { url } => Some(url.clone()),
    }
}

/// Wrap a subtitle track's SRT payload as a `data:` URL.
pub fn build_subtitle_export_data_url(srt_data: Option<&str>) -> Option<String> {
    let srt_data = srt_data?;
    Some(format!(
        "data:{};base64,{}",
        SRT_MIME_TYPE,
        STANDARD.encode(srt_data.as_bytes())
    ))
}

/// Open `download_url` in the player named by `option_id`.
///
/// Does nothing when there is no URL or the id isn't a known player.
pub fn open_external_player(
    navigator: &dyn ExternalNavigator,
    option_id: &str,
    download_url: Option<&str>,
) {
    let Some(download_url) = download_url else {
        return;
    };
    let external_url = external_player_url_for_id(option_id, download_url);
    if external_url.is_empty() {
        debug!("Unknown external player '{}'", option_id);
        return;
    }
    navigator.open(&external_url);
}
