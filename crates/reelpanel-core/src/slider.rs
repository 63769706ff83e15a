//! Bounded value slider used by the caption settings.
//!
//! A slider maps a pointer position over its track to a value in
//! `[min, max]`, and alternatively accepts typed numeric input. Every change
//! goes through [`Slider::commit`] or [`Slider::commit_value`], which store the
//! clamped value and notify the owner through the value-changed callback.
//!
//! Pointer tracking is an explicit `Idle -> Dragging -> Idle` state machine.
//! Entering `Dragging` captures the pointer through the injected
//! [`PointerCapture`] and leaving it (release, cancel, or dropping the slider)
//! releases it, so a global move listener can never outlive its session.
//!
//! # Example
//!
//! ```
//! use reelpanel_core::slider::{PointerPosition, Slider, TrackRect};
//!
//! let mut slider = Slider::builder()
//!     .range(0.0, 100.0)
//!     .suffix("%")
//!     .build()
//!     .unwrap();
//!
//! let track = TrackRect::new(10.0, 0.0, 200.0, 32.0);
//! slider.begin_drag(PointerPosition::new(110.0, 4.0), &track);
//! slider.end_drag(PointerPosition::new(160.0, 4.0), &track);
//!
//! assert_eq!(slider.display_text(), "75%");
//! ```

use std::fmt;
use std::mem;

use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Clamp a track fraction into `[0, 1]`. NaN maps to 0.
pub fn clamp_unit(percentage: f64) -> f64 {
    if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 1.0)
    }
}

/// Round `value` to `decimals` fractional digits (0 rounds to an integer).
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    if decimals == 0 {
        return value.round();
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Smallest increment representable at `decimals` precision.
pub fn step_size(decimals: u32) -> f64 {
    10f64.powi(-(decimals as i32))
}

/// Parse typed slider input. Empty, non-numeric and non-finite text is
/// rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Closed numeric range with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(Error::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp a value into the range. NaN maps to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Value at a track fraction, clamping the fraction first.
    pub fn value_at(&self, percentage: f64) -> f64 {
        self.min + self.span() * clamp_unit(percentage)
    }

    /// Track fraction of a value (not clamped).
    pub fn percentage_of(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }
}

/// Pointer coordinates in the same space as the track rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box of the slider track, re-read on every pointer event since
/// the track can move or resize during a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl TrackRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Horizontal track fraction under `pointer_x`, clamped to `[0, 1]`.
    ///
    /// A collapsed track (zero or negative size) always reports 0.
    pub fn percentage_at(&self, pointer_x: f64) -> f64 {
        // Written as a negation so NaN sizes also count as collapsed
        if !(self.width > 0.0 && self.height > 0.0) || !self.width.is_finite() {
            return 0.0;
        }
        clamp_unit((pointer_x - self.left) / self.width)
    }
}

/// Capability for grabbing pointer events outside the track while a drag is
/// in progress (a window-level move/up listener in a browser, a grab in a
/// native toolkit).
///
/// `capture` and `release` are always called in pairs, once per drag session.
pub trait PointerCapture {
    fn capture(&mut self);
    fn release(&mut self);
}

/// State of an open drag, from pointer-down until pointer-up or cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    start_percentage: f64,
    percentage: f64,
}

impl DragSession {
    /// Track fraction where the pointer went down.
    pub fn start_percentage(&self) -> f64 {
        self.start_percentage
    }

    /// Latest track fraction under the pointer.
    pub fn percentage(&self) -> f64 {
        self.percentage
    }
}

/// Display mode of the value box next to the track.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SliderMode {
    #[default]
    Direct,
    Editing {
        buffer: String,
    },
}

/// Direction of a control-button step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Decrement,
    Increment,
}

impl StepDirection {
    fn sign(self) -> f64 {
        match self {
            StepDirection::Decrement => -1.0,
            StepDirection::Increment => 1.0,
        }
    }
}

/// Keys the value box reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// Callback invoked with every committed value.
pub type ValueCallback = Box<dyn FnMut(f64)>;

/// Builder for [`Slider`].
pub struct SliderBuilder {
    min: f64,
    max: f64,
    value: Option<f64>,
    decimals: u32,
    suffix: Option<String>,
    control_buttons: bool,
    capture: Option<Box<dyn PointerCapture>>,
    on_change: Option<ValueCallback>,
}

impl Default for SliderBuilder {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            value: None,
            decimals: 0,
            suffix: None,
            control_buttons: false,
            capture: None,
            on_change: None,
        }
    }
}

impl SliderBuilder {
    /// Set the slider range (min, max).
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Initial value. Defaults to `min`; clamped into the range.
    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Fractional digits shown and kept by typed input (default 0).
    pub fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Text appended to the displayed value, e.g. `"%"` or `"s"`.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Show increment/decrement buttons around the value box.
    pub fn control_buttons(mut self, enabled: bool) -> Self {
        self.control_buttons = enabled;
        self
    }

    pub fn pointer_capture(mut self, capture: impl PointerCapture + 'static) -> Self {
        self.capture = Some(Box::new(capture));
        self
    }

    pub fn on_change(mut self, callback: impl FnMut(f64) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> Result<Slider> {
        let range = Range::new(self.min, self.max)?;
        let value = range.clamp(self.value.unwrap_or(range.min()));
        Ok(Slider {
            range,
            decimals: self.decimals,
            suffix: self.suffix,
            control_buttons: self.control_buttons,
            value,
            mode: SliderMode::Direct,
            drag: None,
            capture: self.capture,
            on_change: self.on_change,
        })
    }
}

/// A bounded numeric control with drag, typed and stepped input.
pub struct Slider {
    range: Range,
    decimals: u32,
    suffix: Option<String>,
    control_buttons: bool,
    value: f64,
    mode: SliderMode,
    drag: Option<DragSession>,
    capture: Option<Box<dyn PointerCapture>>,
    on_change: Option<ValueCallback>,
}

impl fmt::Debug for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slider")
            .field("range", &self.range)
            .field("decimals", &self.decimals)
            .field("suffix", &self.suffix)
            .field("control_buttons", &self.control_buttons)
            .field("value", &self.value)
            .field("mode", &self.mode)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

impl Slider {
    pub fn builder() -> SliderBuilder {
        SliderBuilder::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    pub fn mode(&self) -> &SliderMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, SliderMode::Editing { .. })
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn has_control_buttons(&self) -> bool {
        self.control_buttons
    }

    /// Sync the value from its owner without notifying it back.
    pub fn set_value(&mut self, value: f64) {
        if value.is_finite() {
            self.value = self.range.clamp(value);
        }
    }

    /// Commit a track fraction: clamp to `[0, 1]`, map into the range and
    /// notify the owner. Rounding is left to the owner.
    pub fn commit(&mut self, percentage: f64) {
        let value = self.range.value_at(percentage);
        self.emit(value);
    }

    /// Commit a value directly, clamped into the range.
    pub fn commit_value(&mut self, value: f64) {
        if !value.is_finite() {
            debug!("Ignoring non-finite slider value {}", value);
            return;
        }
        let value = self.range.clamp(value);
        self.emit(value);
    }

    fn emit(&mut self, value: f64) {
        trace!("Slider commit: {}", value);
        self.value = value;
        if let Some(callback) = self.on_change.as_mut() {
            callback(value);
        }
    }

    /// Pointer went down on the track: open a drag session and commit the
    /// position under the pointer.
    ///
    /// A pending text edit is confirmed first. Calling this while a session
    /// is already open just tracks the new position.
    pub fn begin_drag(&mut self, pointer: PointerPosition, track: &TrackRect) -> DragSession {
        // Second pointer-down without an up in between: keep the open session
        if let Some(session) = self.drag {
            self.drag_move(pointer, track);
            return self.drag.unwrap_or(session);
        }

        if self.is_editing() {
            self.blur();
        }

        // Track rect is re-read per event; it may have moved since the last one
        let percentage = track.percentage_at(pointer.x);
        if let Some(capture) = self.capture.as_mut() {
            capture.capture();
        }
        let session = DragSession {
            start_percentage: percentage,
            percentage,
        };
        self.drag = Some(session);
        debug!("Slider drag started at {:.3}", percentage);
        self.commit(percentage);
        session
    }

    /// Pointer moved during a drag. Ignored when no session is open.
    pub fn drag_move(&mut self, pointer: PointerPosition, track: &TrackRect) {
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        let percentage = track.percentage_at(pointer.x);
        session.percentage = percentage;
        self.commit(percentage);
    }

    /// Pointer released: commit the final position and close the session.
    pub fn end_drag(&mut self, pointer: PointerPosition, track: &TrackRect) {
        if self.drag.is_none() {
            return;
        }
        self.drag_move(pointer, track);
        self.release_drag();
    }

    /// Pointer cancelled: close the session without another commit.
    pub fn cancel_drag(&mut self) {
        self.release_drag();
    }

    fn release_drag(&mut self) {
        if self.drag.take().is_some() {
            if let Some(capture) = self.capture.as_mut() {
                capture.release();
            }
            debug!("Slider drag ended at {}", self.value);
        }
    }

    /// Filled fraction of the track: the drag position while dragging,
    /// otherwise the committed value.
    pub fn fill_fraction(&self) -> f64 {
        match self.drag {
            Some(session) => session.percentage,
            None => clamp_unit(self.range.percentage_of(self.value)),
        }
    }

    /// Value box clicked: start editing with the formatted value.
    pub fn enter_text_edit(&mut self) {
        if self.is_dragging() {
            debug!("Ignoring text edit while a drag is in progress");
            return;
        }
        self.mode = SliderMode::Editing {
            buffer: self.formatted_value(),
        };
    }

    /// Replace the edit buffer. No effect outside edit mode.
    pub fn set_edit_buffer(&mut self, text: impl Into<String>) {
        if let SliderMode::Editing { buffer } = &mut self.mode {
            *buffer = text.into();
        }
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        match &self.mode {
            SliderMode::Editing { buffer } => Some(buffer),
            SliderMode::Direct => None,
        }
    }

    /// Leave edit mode with `text` as the typed value.
    ///
    /// Text that isn't a finite number is dropped and the value stays as it
    /// was; otherwise it's rounded to the slider's precision and committed.
    pub fn confirm_text_edit(&mut self, text: &str) {
        self.mode = SliderMode::Direct;
        match parse_number(text) {
            Some(number) => self.commit_value(round_to_decimals(number, self.decimals)),
            None => debug!("Discarding non-numeric slider input {:?}", text),
        }
    }

    /// Value box lost focus: confirm whatever is in the buffer.
    pub fn blur(&mut self) {
        if let SliderMode::Editing { buffer } = mem::take(&mut self.mode) {
            self.confirm_text_edit(&buffer);
        }
    }

    pub fn key_press(&mut self, key: Key) {
        if key == Key::Enter && self.is_editing() {
            self.blur();
        }
    }

    /// Nudge the value by one unit of the displayed precision.
    ///
    /// Only sliders built with control buttons step; the result is clamped,
    /// so stepping past either end pins the value there.
    pub fn step(&mut self, direction: StepDirection) {
        if !self.control_buttons {
            debug!("Slider has no control buttons, ignoring step");
            return;
        }
        let next = self.value + direction.sign() * step_size(self.decimals);
        self.commit_value(next);
    }

    /// Value with exactly `decimals` fractional digits.
    ///
    /// Ties round away from zero, the same as typed input, so the edit
    /// buffer snapshot confirms back to the value on display.
    pub fn formatted_value(&self) -> String {
        let rounded = round_to_decimals(self.value, self.decimals);
        // -0.0 would print as "-0"
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        format!("{:.*}", self.decimals as usize, rounded)
    }

    /// Formatted value with the display suffix applied.
    pub fn display_text(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}{}", self.formatted_value(), suffix),
            None => self.formatted_value(),
        }
    }
}

impl Drop for Slider {
    fn drop(&mut self) {
        self.release_drag();
    }
}
