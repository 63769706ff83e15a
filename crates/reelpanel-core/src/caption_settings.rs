//! Caption settings view-model.
//!
//! Owns one [`Slider`] per numeric caption setting and binds each to the
//! shared [`SubtitleStore`]. The sliders work in display units (seconds,
//! percent) while the store keeps fractions, so every binding carries a scale.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::error::Result;
use crate::overlay::{OverlayRouter, paths};
use crate::slider::Slider;
use crate::subtitles::{FontStyle, StylingPatch, SubtitleStore, VerticalPosition};

/// Numeric caption settings backed by a slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptionSlider {
    Delay,
    Background,
    Blur,
    Size,
}

impl CaptionSlider {
    pub const ALL: [CaptionSlider; 4] = [
        CaptionSlider::Delay,
        CaptionSlider::Background,
        CaptionSlider::Blur,
        CaptionSlider::Size,
    ];

    pub fn label_key(self) -> &'static str {
        match self {
            CaptionSlider::Delay => "player.menus.subtitles.settings.delay",
            CaptionSlider::Background => "settings.subtitles.backgroundLabel",
            CaptionSlider::Blur => "settings.subtitles.backgroundBlurLabel",
            CaptionSlider::Size => "settings.subtitles.textSizeLabel",
        }
    }

    /// (min, max) in display units.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            CaptionSlider::Delay => (-20.0, 20.0),
            CaptionSlider::Background | CaptionSlider::Blur => (0.0, 100.0),
            CaptionSlider::Size => (1.0, 200.0),
        }
    }

    /// Display units per stored unit.
    fn scale(self) -> f64 {
        match self {
            CaptionSlider::Delay => 1.0,
            _ => 100.0,
        }
    }

    fn read(self, store: &SubtitleStore) -> f64 {
        let stored = match self {
            CaptionSlider::Delay => store.delay(),
            CaptionSlider::Background => store.styling().background_opacity,
            CaptionSlider::Blur => store.styling().background_blur,
            CaptionSlider::Size => store.styling().size,
        };
        stored * self.scale()
    }

    fn write(self, store: &mut SubtitleStore, value: f64) {
        let stored = value / self.scale();
        let patch = match self {
            CaptionSlider::Delay => {
                store.set_delay(stored);
                return;
            }
            CaptionSlider::Background => StylingPatch {
                background_opacity: Some(stored),
                ..Default::default()
            },
            CaptionSlider::Blur => StylingPatch {
                background_blur: Some(stored),
                ..Default::default()
            },
            CaptionSlider::Size => StylingPatch {
                size: Some(stored),
                ..Default::default()
            },
        };
        if let Err(e) = store.update_styling(patch) {
            warn!("Failed to apply {:?} slider value: {}", self, e);
        }
    }

    fn build(self, store: &Rc<RefCell<SubtitleStore>>) -> Result<Slider> {
        let (min, max) = self.bounds();
        let initial = self.read(&store.borrow());
        let target = store.clone();

        let builder = Slider::builder()
            .range(min, max)
            .value(initial)
            .on_change(move |value| match target.try_borrow_mut() {
                Ok(mut store) => self.write(&mut store, value),
                Err(e) => warn!("Caption store busy, dropping {:?} value {}: {}", self, value, e),
            });

        let builder = match self {
            CaptionSlider::Delay => builder.decimals(1).suffix("s").control_buttons(true),
            _ => builder.suffix("%"),
        };
        builder.build()
    }
}

/// A control row of the caption settings page, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionControl {
    NativeSubtitles,
    Slider(CaptionSlider),
    FixCapitals,
    FontStyle,
    Bold,
    Color,
    VerticalPosition,
    Reset,
}

/// The caption settings page.
pub struct CaptionSettings {
    store: Rc<RefCell<SubtitleStore>>,
    overlay_back_link: bool,
    sliders: Vec<(CaptionSlider, Slider)>,
}

impl CaptionSettings {
    /// `overlay_back_link` selects where the back link leads: the captions
    /// overlay when the page was opened from it, the captions menu otherwise.
    pub fn new(store: Rc<RefCell<SubtitleStore>>, overlay_back_link: bool) -> Result<Self> {
        let sliders = CaptionSlider::ALL
            .into_iter()
            .map(|which| Ok((which, which.build(&store)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            store,
            overlay_back_link,
            sliders,
        })
    }

    pub fn store(&self) -> &Rc<RefCell<SubtitleStore>> {
        &self.store
    }

    pub fn back_path(&self) -> &'static str {
        if self.overlay_back_link {
            paths::CAPTIONS_OVERLAY
        } else {
            paths::CAPTIONS
        }
    }

    pub fn back(&self, router: &dyn OverlayRouter) {
        router.navigate(self.back_path());
    }

    /// Visible controls. With native subtitles on, only the toggle remains.
    pub fn controls(&self) -> Vec<CaptionControl> {
        if self.store.borrow().enable_native_subtitles() {
            return vec![CaptionControl::NativeSubtitles];
        }
        vec![
            CaptionControl::NativeSubtitles,
            CaptionControl::Slider(CaptionSlider::Delay),
            CaptionControl::FixCapitals,
            CaptionControl::Slider(CaptionSlider::Background),
            CaptionControl::Slider(CaptionSlider::Blur),
            CaptionControl::Slider(CaptionSlider::Size),
            CaptionControl::FontStyle,
            CaptionControl::Bold,
            CaptionControl::Color,
            CaptionControl::VerticalPosition,
            CaptionControl::Reset,
        ]
    }

    pub fn slider(&self, which: CaptionSlider) -> &Slider {
        &self.sliders[Self::index(which)].1
    }

    pub fn slider_mut(&mut self, which: CaptionSlider) -> &mut Slider {
        &mut self.sliders[Self::index(which)].1
    }

    fn index(which: CaptionSlider) -> usize {
        match which {
            CaptionSlider::Delay => 0,
            CaptionSlider::Background => 1,
            CaptionSlider::Blur => 2,
            CaptionSlider::Size => 3,
        }
    }

    /// Re-read slider values after the store changed outside the sliders.
    pub fn sync_from_store(&mut self) {
        let store = self.store.borrow();
        for (which, slider) in &mut self.sliders {
            slider.set_value(which.read(&store));
        }
    }

    pub fn toggle_native_subtitles(&mut self) {
        let mut store = self.store.borrow_mut();
        let enabled = store.enable_native_subtitles();
        store.set_enable_native_subtitles(!enabled);
    }

    pub fn toggle_fix_capitals(&mut self) {
        let mut store = self.store.borrow_mut();
        let enabled = store.override_casing();
        store.set_override_casing(!enabled);
    }

    pub fn toggle_bold(&mut self) {
        let mut store = self.store.borrow_mut();
        let bold = store.styling().bold;
        Self::apply(
            &mut store,
            StylingPatch {
                bold: Some(!bold),
                ..Default::default()
            },
        );
    }

    pub fn select_font_style(&mut self, style: FontStyle) {
        Self::apply(
            &mut self.store.borrow_mut(),
            StylingPatch {
                font_style: Some(style),
                ..Default::default()
            },
        );
    }

    pub fn set_vertical_position(&mut self, position: VerticalPosition) {
        Self::apply(
            &mut self.store.borrow_mut(),
            StylingPatch {
                vertical_position: Some(position),
                ..Default::default()
            },
        );
    }

    /// Pick a preset or custom color. Fails for anything but a hex color.
    pub fn select_color(&mut self, color: &str) -> Result<()> {
        self.store.borrow_mut().update_styling(StylingPatch {
            color: Some(color.to_string()),
            ..Default::default()
        })
    }

    /// Restore the default look and refresh the sliders.
    pub fn reset(&mut self) {
        self.store.borrow_mut().reset_styling();
        self.sync_from_store();
    }

    fn apply(store: &mut SubtitleStore, patch: StylingPatch) {
        if let Err(e) = store.update_styling(patch) {
            warn!("Failed to update caption styling: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::MemoryRouter;
    use crate::slider::{PointerPosition, StepDirection, TrackRect};

    fn settings() -> CaptionSettings {
        let store = Rc::new(RefCell::new(SubtitleStore::new()));
        CaptionSettings::new(store, false).unwrap()
    }

    #[test]
    fn test_sliders_start_from_store() {
        let settings = settings();
        assert_eq!(settings.slider(CaptionSlider::Delay).display_text(), "0.0s");
        assert_eq!(
            settings.slider(CaptionSlider::Background).display_text(),
            "50%"
        );
        assert_eq!(settings.slider(CaptionSlider::Size).display_text(), "100%");
        assert!(settings.slider(CaptionSlider::Delay).has_control_buttons());
        assert!(!settings.slider(CaptionSlider::Blur).has_control_buttons());
    }

    #[test]
    fn test_slider_writes_scaled_value() {
        let mut settings = settings();
        let slider = settings.slider_mut(CaptionSlider::Background);
        slider.enter_text_edit();
        slider.confirm_text_edit("80");

        assert_eq!(settings.store().borrow().styling().background_opacity, 0.8);
    }

    #[test]
    fn test_delay_step_and_drag() {
        let mut settings = settings();
        settings
            .slider_mut(CaptionSlider::Delay)
            .step(StepDirection::Increment);
        assert_eq!(settings.store().borrow().delay(), 0.1);

        let track = TrackRect::new(0.0, 0.0, 400.0, 8.0);
        let slider = settings.slider_mut(CaptionSlider::Delay);
        slider.begin_drag(PointerPosition::new(300.0, 2.0), &track);
        slider.end_drag(PointerPosition::new(400.0, 2.0), &track);
        assert_eq!(settings.store().borrow().delay(), 20.0);
    }

    #[test]
    fn test_size_slider_respects_bounds() {
        let mut settings = settings();
        settings
            .slider_mut(CaptionSlider::Size)
            .confirm_text_edit("0");
        assert_eq!(settings.store().borrow().styling().size, 0.01);
        assert_eq!(settings.slider(CaptionSlider::Size).value(), 1.0);
    }

    #[test]
    fn test_commit_while_store_borrowed_is_dropped() {
        let mut settings = settings();
        let shared = settings.store().clone();
        let held = shared.borrow();

        settings
            .slider_mut(CaptionSlider::Blur)
            .confirm_text_edit("20");
        assert_eq!(held.styling().background_blur, 0.5);
        drop(held);

        assert_eq!(shared.borrow().styling().background_blur, 0.5);
        settings
            .slider_mut(CaptionSlider::Blur)
            .confirm_text_edit("30");
        assert_eq!(shared.borrow().styling().background_blur, 0.3);
    }

    #[test]
    fn test_back_path() {
        let router = MemoryRouter::default();
        settings().back(&router);
        assert_eq!(router.current(), "/captions");

        let store = Rc::new(RefCell::new(SubtitleStore::new()));
        let overlay = CaptionSettings::new(store, true).unwrap();
        overlay.back(&router);
        assert_eq!(router.current(), "/captionsOverlay");
    }

    #[test]
    fn test_native_subtitles_hide_controls() {
        let mut settings = settings();
        assert_eq!(settings.controls().len(), 11);
        settings.toggle_native_subtitles();
        assert_eq!(settings.controls(), vec![CaptionControl::NativeSubtitles]);
        settings.toggle_native_subtitles();
        assert_eq!(settings.controls().len(), 11);
    }

    #[test]
    fn test_toggles_and_selects() {
        let mut settings = settings();
        settings.toggle_bold();
        settings.toggle_fix_capitals();
        settings.select_font_style(FontStyle::Uniform);
        settings.set_vertical_position(VerticalPosition::Low);
        settings.select_color("#e2e535").unwrap();
        assert!(settings.select_color("yellow").is_err());

        let store = settings.store().borrow();
        assert!(store.styling().bold);
        assert!(store.override_casing());
        assert_eq!(store.styling().font_style, FontStyle::Uniform);
        assert_eq!(store.styling().vertical_position, VerticalPosition::Low);
        assert_eq!(store.styling().color, "#e2e535");
    }

    #[test]
    fn test_reset_refreshes_sliders() {
        let mut settings = settings();
        settings
            .slider_mut(CaptionSlider::Blur)
            .confirm_text_edit("10");
        settings
            .slider_mut(CaptionSlider::Size)
            .confirm_text_edit("150");
        settings.reset();

        assert_eq!(settings.slider(CaptionSlider::Blur).value(), 50.0);
        assert_eq!(settings.slider(CaptionSlider::Size).value(), 100.0);
        assert_eq!(settings.store().borrow().styling().size, 1.0);
    }
}
