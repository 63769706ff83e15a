//! End-to-end flows through the overlay menus: player state in, links and
//! persisted caption settings out.

use std::cell::RefCell;
use std::rc::Rc;

use reelpanel_core::caption_settings::{CaptionSettings, CaptionSlider};
use reelpanel_core::download::DownloadView;
use reelpanel_core::overlay::MemoryRouter;
use reelpanel_core::slider::{Key, PointerPosition, TrackRect};
use reelpanel_core::{Config, ExternalNavigator, PlayerState, SubtitleStore};

#[derive(Default)]
struct Opened(RefCell<Vec<String>>);

impl ExternalNavigator for Opened {
    fn open(&self, url: &str) {
        self.0.borrow_mut().push(url.to_string());
    }
}

const STATE_JSON: &str = r#"{
    "source": {
        "type": "file",
        "qualities": {
            "480p": { "url": "https://cdn.example/480.mp4" },
            "1080p": { "url": "https://cdn.example/1080.mp4" }
        }
    },
    "currentQuality": "1080p",
    "selectedCaption": { "id": "en-1", "language": "en", "srtData": "1\n00:00:01,000 --> 00:00:02,000\nHello\n" }
}"#;

#[test]
fn test_download_menu_from_player_state() {
    let state: PlayerState = serde_json::from_str(STATE_JSON).unwrap();
    let config = Config::load_with_defaults("[players]\nenabled = [\"iina\"]\n").unwrap();

    let view = DownloadView::new(&state, &config.players.options()).unwrap();
    assert_eq!(view.download_url(), "https://cdn.example/1080.mp4");

    let navigator = Opened::default();
    let router = MemoryRouter::default();
    view.download(&router, &navigator);
    for (option, _) in view.player_links() {
        view.open_in_player(option.id(), &navigator);
    }
    assert!(view.download_subtitle(&navigator));

    let opened = navigator.0.borrow();
    assert_eq!(opened.len(), 3);
    assert_eq!(opened[0], "https://cdn.example/1080.mp4");
    assert_eq!(
        opened[1],
        "iina://weblink?url=https%3A%2F%2Fcdn.example%2F1080.mp4"
    );
    assert!(opened[2].starts_with("data:application/x-subrip;base64,"));
}

#[test]
fn test_caption_settings_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state/state.json");

    {
        let store = Rc::new(RefCell::new(SubtitleStore::load(&path).unwrap()));
        let mut settings = CaptionSettings::new(store.clone(), false).unwrap();

        let delay = settings.slider_mut(CaptionSlider::Delay);
        delay.enter_text_edit();
        delay.set_edit_buffer("-3.25");
        delay.key_press(Key::Enter);

        let track = TrackRect::new(10.0, 0.0, 200.0, 6.0);
        let background = settings.slider_mut(CaptionSlider::Background);
        background.begin_drag(PointerPosition::new(60.0, 3.0), &track);
        background.end_drag(PointerPosition::new(60.0, 3.0), &track);

        settings.toggle_bold();
        settings.select_color("#80b1fa").unwrap();

        store.borrow_mut().save().unwrap();
    }

    let store = SubtitleStore::load(&path).unwrap();
    assert_eq!(store.delay(), -3.3);
    assert_eq!(store.styling().background_opacity, 0.25);
    assert!(store.styling().bold);
    assert_eq!(store.styling().color, "#80b1fa");

    let settings = CaptionSettings::new(Rc::new(RefCell::new(store)), true).unwrap();
    assert_eq!(settings.slider(CaptionSlider::Delay).display_text(), "-3.3s");
    assert_eq!(settings.slider(CaptionSlider::Background).display_text(), "25%");
    assert_eq!(settings.back_path(), "/captionsOverlay");
}
