//! reelpanel-core - view logic for a video player's settings overlay.
//!
//! Nothing in here renders anything. The crate holds the pieces of the
//! overlay that carry behavior: the bounded value slider used by the caption
//! settings, the download/deep-link derivation, the subtitle styling store,
//! and the view-models that wire them to the overlay router.

pub mod button;
pub mod caption_settings;
pub mod config;
pub mod download;
pub mod error;
pub mod links;
pub mod logging;
pub mod overlay;
pub mod slider;
pub mod source;
pub mod subtitles;

pub use config::Config;
pub use error::{Error, Result};
pub use links::{ExternalNavigator, PlayerOption};
pub use slider::{Range, Slider};
pub use source::{PlaybackSource, PlayerState, SubtitleTrack};
pub use subtitles::{SubtitleStore, SubtitleStyling};
