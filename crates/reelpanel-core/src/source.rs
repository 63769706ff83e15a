//! Playback source model read by the overlay.
//!
//! These mirror what the player store exposes: the active source, the
//! selected quality for file sources, and the selected caption track.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Quality key of a file source, e.g. `"1080p"` or `"4k"`.
pub type QualityId = String;

/// One downloadable rendition of a file source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityStream {
    pub url: String,
}

/// The media the player is currently playing.
///
/// ```json
/// { "type": "file", "qualities": { "1080p": { "url": "https://..." } } }
/// { "type": "hls", "url": "https://.../index.m3u8" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlaybackSource {
    File {
        qualities: BTreeMap<QualityId, QualityStream>,
    },
    Hls {
        url: String,
    },
}

impl PlaybackSource {
    pub fn hls(url: impl Into<String>) -> Self {
        PlaybackSource::Hls { url: url.into() }
    }

    /// Build a file source from `(quality, url)` pairs.
    pub fn file<I, Q, U>(qualities: I) -> Self
    where
        I: IntoIterator<Item = (Q, U)>,
        Q: Into<QualityId>,
        U: Into<String>,
    {
        PlaybackSource::File {
            qualities: qualities
                .into_iter()
                .map(|(q, url)| (q.into(), QualityStream { url: url.into() }))
                .collect(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            PlaybackSource::File { .. } => SourceKind::File,
            PlaybackSource::Hls { .. } => SourceKind::Hls,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Hls,
}

/// A caption track with its SRT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    pub id: String,
    #[serde(default)]
    pub language: String,
    #[serde(rename = "srtData")]
    pub srt_data: String,
}

/// The slice of player state the download and caption menus read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerState {
    pub source: Option<PlaybackSource>,
    pub current_quality: Option<QualityId>,
    pub selected_caption: Option<SubtitleTrack>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hls_source() {
        let source: PlaybackSource =
            serde_json::from_str(r#"{"type":"hls","url":"https://example.com/v.m3u8"}"#).unwrap();
        assert_eq!(source, PlaybackSource::hls("https://example.com/v.m3u8"));
        assert_eq!(source.kind(), SourceKind::Hls);
    }

    #[test]
    fn test_parse_player_state() {
        let json = r#"{
            "source": {
                "type": "file",
                "qualities": {
                    "720p": { "url": "https://cdn/720.mp4" },
                    "1080p": { "url": "https://cdn/1080.mp4" }
                }
            },
            "currentQuality": "1080p",
            "selectedCaption": { "id": "en-1", "language": "en", "srtData": "1\n" }
        }"#;
        let state: PlayerState = serde_json::from_str(json).unwrap();

        let Some(PlaybackSource::File { qualities }) = &state.source else {
            panic!("expected file source");
        };
        assert_eq!(qualities.len(), 2);
        assert_eq!(state.current_quality.as_deref(), Some("1080p"));
        assert_eq!(state.selected_caption.unwrap().language, "en");
    }

    #[test]
    fn test_empty_player_state() {
        let state: PlayerState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, PlayerState::default());
    }

    #[test]
    fn test_unknown_source_type_rejected() {
        let result = serde_json::from_str::<PlaybackSource>(r#"{"type":"dash","url":"x"}"#);
        assert!(result.is_err());
    }
}
