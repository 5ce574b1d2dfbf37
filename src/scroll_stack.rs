//! Scroll-driven card stacking.
//!
//! Card offsets are measured once per layout pass and cached in a
//! [`LayoutSnapshot`]. Every scroll tick maps the current offset to a
//! [`CardTransform`] per card with [`compute_frames`]; the [`PaintGate`] drops
//! transforms that did not move past a small epsilon, so the renderer only
//! receives writes that change pixels.

use std::str::FromStr;

pub type StackResult<T> = Result<T, StackError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StackError {
    #[error("invalid stack config: {0}")]
    InvalidConfig(String),

    #[error("invalid offset {0:?}: expected pixels or a viewport percentage")]
    InvalidOffset(String),

    #[error("card {index} starts at {top}px, not below the previous card")]
    OutOfOrder { index: usize, top: f64 },

    #[error("layout measurement for {0} is not finite")]
    NonFinite(String),
}

const TRANSLATE_EPSILON: f64 = 0.1;
const SCALE_EPSILON: f64 = 0.001;
const ROTATION_EPSILON: f64 = 0.1;
const BLUR_EPSILON: f64 = 0.1;
const SMOOTH_SNAP_PX: f64 = 0.05;

/// A trigger position, either absolute or relative to the viewport height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Offset {
    Pixels(f64),
    ViewportPercent(f64),
}

impl Offset {
    pub fn resolve(self, viewport_height: f64) -> f64 {
        match self {
            Self::Pixels(px) => px,
            Self::ViewportPercent(percent) => percent * viewport_height / 100.0,
        }
    }
}

impl FromStr for Offset {
    type Err = StackError;

    /// Accepts `"20%"`, `"120"` and `"120px"`.
    fn from_str(value: &str) -> StackResult<Self> {
        let invalid = || StackError::InvalidOffset(value.to_string());
        let trimmed = value.trim();

        let (number, percent) = match trimmed.strip_suffix('%') {
            Some(number) => (number, true),
            None => (trimmed.strip_suffix("px").unwrap_or(trimmed), false),
        };

        let parsed = number
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|parsed| parsed.is_finite())
            .ok_or_else(invalid)?;

        if percent {
            Ok(Self::ViewportPercent(parsed))
        } else {
            Ok(Self::Pixels(parsed))
        }
    }
}

/// Fixed at mount; a changed config means a new [`ScrollStack`].
#[derive(Clone, Debug, PartialEq)]
pub struct StackConfig {
    /// Gap between cards before they stack.
    pub item_distance: f64,
    /// Extra scale each deeper card keeps once fully stacked.
    pub item_scale: f64,
    /// Visual offset between successively stacked cards.
    pub item_stack_distance: f64,
    pub stack_position: Offset,
    pub scale_end_position: Offset,
    pub base_scale: f64,
    pub rotation_amount: f64,
    pub blur_amount: f64,
    /// Lerp factor applied to the window scroll offset each animation frame.
    pub smoothing: f64,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            item_distance: 100.0,
            item_scale: 0.03,
            item_stack_distance: 30.0,
            stack_position: Offset::ViewportPercent(20.0),
            scale_end_position: Offset::ViewportPercent(10.0),
            base_scale: 0.85,
            rotation_amount: 0.0,
            blur_amount: 0.0,
            smoothing: 0.1,
        }
    }
}

impl StackConfig {
    pub fn validate(&self) -> StackResult<()> {
        let finite = [
            ("item_distance", self.item_distance),
            ("item_scale", self.item_scale),
            ("item_stack_distance", self.item_stack_distance),
            ("base_scale", self.base_scale),
            ("rotation_amount", self.rotation_amount),
            ("blur_amount", self.blur_amount),
            ("smoothing", self.smoothing),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(StackError::InvalidConfig(format!("{name} must be finite")));
        }

        if self.base_scale <= 0.0 || self.base_scale > 1.0 {
            return Err(StackError::InvalidConfig(
                "base_scale must be in (0, 1]".to_string(),
            ));
        }

        if self.item_scale < 0.0 || self.item_distance < 0.0 || self.item_stack_distance < 0.0 {
            return Err(StackError::InvalidConfig(
                "distances and item_scale must not be negative".to_string(),
            ));
        }

        if self.blur_amount < 0.0 {
            return Err(StackError::InvalidConfig(
                "blur_amount must not be negative".to_string(),
            ));
        }

        if self.smoothing <= 0.0 || self.smoothing > 1.0 {
            return Err(StackError::InvalidConfig(
                "smoothing must be in (0, 1]".to_string(),
            ));
        }

        Ok(())
    }
}

/// Source of layout measurements, implemented over the DOM by the frontend.
pub trait LayoutProbe {
    fn viewport_height(&self) -> f64;

    /// Natural document offsets of the cards, in sequence order.
    fn card_offsets(&self) -> Vec<f64>;

    /// Document offset of the sentinel that follows the last card.
    fn end_offset(&self) -> f64;
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSnapshot {
    card_tops: Vec<f64>,
    end_top: f64,
    viewport_height: f64,
}

impl LayoutSnapshot {
    pub fn new(card_tops: Vec<f64>, end_top: f64, viewport_height: f64) -> StackResult<Self> {
        if let Some(index) = card_tops.iter().position(|top| !top.is_finite()) {
            return Err(StackError::NonFinite(format!("card {index}")));
        }

        if !end_top.is_finite() {
            return Err(StackError::NonFinite("end sentinel".to_string()));
        }

        if !viewport_height.is_finite() || viewport_height < 0.0 {
            return Err(StackError::NonFinite("viewport height".to_string()));
        }

        if let Some(index) = card_tops.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(StackError::OutOfOrder {
                index: index + 1,
                top: card_tops[index + 1],
            });
        }

        Ok(Self {
            card_tops,
            end_top,
            viewport_height,
        })
    }

    pub fn capture(probe: &impl LayoutProbe) -> StackResult<Self> {
        Self::new(probe.card_offsets(), probe.end_offset(), probe.viewport_height())
    }

    pub fn card_tops(&self) -> &[f64] {
        &self.card_tops
    }

    pub fn end_top(&self) -> f64 {
        self.end_top
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn len(&self) -> usize {
        self.card_tops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.card_tops.is_empty()
    }
}

/// Scroll offsets that drive a single card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardGeometry {
    /// Stick point: the card starts shrinking and is pinned from here.
    pub trigger_start: f64,
    pub trigger_end: f64,
    pub pin_start: f64,
    pub pin_end: f64,
}

impl CardGeometry {
    fn new(index: usize, top: f64, stack_px: f64, scale_end_px: f64, pin_end: f64, config: &StackConfig) -> Self {
        let trigger_start = top - stack_px - config.item_stack_distance * index as f64;

        Self {
            trigger_start,
            trigger_end: top - scale_end_px,
            pin_start: trigger_start,
            pin_end,
        }
    }

    pub fn is_pinned(&self, scroll: f64) -> bool {
        scroll >= self.pin_start && scroll <= self.pin_end
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTransform {
    pub translate_y: f64,
    pub scale: f64,
    pub rotation: f64,
    pub blur: f64,
}

impl CardTransform {
    pub const REST: Self = Self {
        translate_y: 0.0,
        scale: 1.0,
        rotation: 0.0,
        blur: 0.0,
    };

    fn differs_from(&self, other: &Self) -> bool {
        (self.translate_y - other.translate_y).abs() > TRANSLATE_EPSILON
            || (self.scale - other.scale).abs() > SCALE_EPSILON
            || (self.rotation - other.rotation).abs() > ROTATION_EPSILON
            || (self.blur - other.blur).abs() > BLUR_EPSILON
    }

    pub fn css_transform(&self) -> String {
        format!(
            "translate3d(0, {}px, 0) scale({}) rotate({}deg)",
            self.translate_y, self.scale, self.rotation
        )
    }

    pub fn css_filter(&self) -> String {
        if self.blur > 0.0 {
            format!("blur({}px)", self.blur)
        } else {
            String::new()
        }
    }
}

/// Everything computed for one card on one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardFrame {
    pub index: usize,
    pub progress: f64,
    pub pinned: bool,
    pub transform: CardTransform,
}

/// Linear progress between `start` and `end`, always within [0, 1].
pub fn progress(scroll: f64, start: f64, end: f64) -> f64 {
    if !(scroll >= start) {
        return 0.0;
    }

    if end <= start || scroll >= end {
        return 1.0;
    }

    ((scroll - start) / (end - start)).clamp(0.0, 1.0)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    // `+ 0.0` folds -0.0 so the CSS never reads "-0px".
    (value * factor).round() / factor + 0.0
}

pub fn card_geometries(layout: &LayoutSnapshot, config: &StackConfig) -> Vec<CardGeometry> {
    let stack_px = config.stack_position.resolve(layout.viewport_height);
    let scale_end_px = config.scale_end_position.resolve(layout.viewport_height);
    let pin_end = layout.end_top - layout.viewport_height / 2.0;

    layout
        .card_tops
        .iter()
        .enumerate()
        .map(|(index, &top)| CardGeometry::new(index, top, stack_px, scale_end_px, pin_end, config))
        .collect()
}

/// Maps a scroll offset to one frame per card.
///
/// Each card is independent except for depth blur, which needs the index of
/// the topmost card that reached its stick point before any blur is assigned.
pub fn compute_frames(scroll: f64, layout: &LayoutSnapshot, config: &StackConfig) -> Vec<CardFrame> {
    let geometries = card_geometries(layout, config);
    let stack_px = config.stack_position.resolve(layout.viewport_height);

    let top_index = if config.blur_amount > 0.0 {
        geometries
            .iter()
            .rposition(|geometry| scroll >= geometry.trigger_start)
            .unwrap_or(0)
    } else {
        0
    };

    geometries
        .iter()
        .zip(&layout.card_tops)
        .enumerate()
        .map(|(index, (geometry, &top))| {
            let depth = index as f64;
            let progress = progress(scroll, geometry.trigger_start, geometry.trigger_end);
            let target_scale = (config.base_scale + depth * config.item_scale).min(1.0);
            let scale = 1.0 - progress * (1.0 - target_scale);
            let rotation = depth * config.rotation_amount * progress;

            let blur = if config.blur_amount > 0.0 && index < top_index {
                (top_index - index) as f64 * config.blur_amount
            } else {
                0.0
            };

            let stacked_offset = stack_px + config.item_stack_distance * depth;
            let pinned = geometry.is_pinned(scroll);
            let translate_y = if pinned {
                scroll - top + stacked_offset
            } else if scroll > geometry.pin_end {
                geometry.pin_end - top + stacked_offset
            } else {
                0.0
            };

            CardFrame {
                index,
                progress,
                pinned,
                transform: CardTransform {
                    translate_y: round_to(translate_y, 2),
                    scale: round_to(scale, 3),
                    rotation: round_to(rotation, 2),
                    blur: round_to(blur, 2),
                },
            }
        })
        .collect()
}

/// Remembers the last transform written per card.
#[derive(Debug, Default)]
pub struct PaintGate {
    applied: Vec<Option<CardTransform>>,
}

impl PaintGate {
    /// Returns whether `next` should be written, recording it if so.
    ///
    /// While scrolling, moves under the epsilons are skipped. Once the scroll
    /// has `settled`, any difference is written so cards land exactly.
    pub fn admit(&mut self, index: usize, next: CardTransform, settled: bool) -> bool {
        if self.applied.len() <= index {
            self.applied.resize(index + 1, None);
        }

        let changed = match &self.applied[index] {
            Some(last) if settled => *last != next,
            Some(last) => last.differs_from(&next),
            None => true,
        };

        if changed {
            self.applied[index] = Some(next);
        }

        changed
    }

    pub fn applied(&self, index: usize) -> Option<CardTransform> {
        self.applied.get(index).copied().flatten()
    }

    pub fn clear(&mut self) {
        self.applied.clear();
    }
}

/// One-shot latch for the "last card fully stacked" notification.
#[derive(Debug, Default)]
pub struct CompletionLatch {
    completed: bool,
}

impl CompletionLatch {
    /// Returns true only on the tick the stack becomes complete.
    pub fn observe(&mut self, complete: bool) -> bool {
        match (complete, self.completed) {
            (true, false) => {
                self.completed = true;
                true
            }
            (false, true) => {
                self.completed = false;
                false
            }
            _ => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn reset(&mut self) {
        self.completed = false;
    }
}

/// Eased follower for the raw window scroll offset.
#[derive(Clone, Debug)]
pub struct SmoothedScroll {
    current: f64,
    factor: f64,
}

impl SmoothedScroll {
    pub fn new(initial: f64, factor: f64) -> Self {
        Self {
            current: initial,
            factor: factor.clamp(0.01, 1.0),
        }
    }

    /// Moves one frame toward `target` and returns the eased offset.
    pub fn step(&mut self, target: f64) -> f64 {
        let delta = target - self.current;
        if delta.abs() < SMOOTH_SNAP_PX {
            self.current = target;
        } else {
            self.current += delta * self.factor;
        }
        self.current
    }

    pub fn current(&self) -> f64 {
        self.current
    }
}

/// A style write for one card.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformWrite {
    pub index: usize,
    pub transform: String,
    pub filter: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutput {
    pub writes: Vec<TransformWrite>,
    /// Set on the single tick where the last card becomes fully stacked.
    pub completed: bool,
}

#[derive(Debug)]
pub struct ScrollStack {
    config: StackConfig,
    layout: Option<LayoutSnapshot>,
    gate: PaintGate,
    completion: CompletionLatch,
    last_scroll: Option<f64>,
}

impl ScrollStack {
    pub fn new(config: StackConfig) -> StackResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            layout: None,
            gate: PaintGate::default(),
            completion: CompletionLatch::default(),
            last_scroll: None,
        })
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn layout(&self) -> Option<&LayoutSnapshot> {
        self.layout.as_ref()
    }

    /// Margin below card `index` of `count`; the last card has none.
    pub fn card_margin(&self, index: usize, count: usize) -> Option<f64> {
        (index + 1 < count).then_some(self.config.item_distance)
    }

    /// Must run after layout has been committed; a failed measurement keeps
    /// the previous snapshot.
    pub fn capture_offsets(&mut self, probe: &impl LayoutProbe) -> StackResult<()> {
        self.layout = Some(LayoutSnapshot::capture(probe)?);
        self.last_scroll = None;
        Ok(())
    }

    pub fn invalidate_on_resize(&mut self, probe: &impl LayoutProbe) -> StackResult<()> {
        self.capture_offsets(probe)
    }

    /// Computes and gates one frame. Calling again with an unchanged offset
    /// marks the scroll as settled and flushes any sub-epsilon remainder.
    pub fn update(&mut self, scroll: f64) -> FrameOutput {
        let Some(layout) = self.layout.as_ref() else {
            return FrameOutput::default();
        };

        let settled = self.last_scroll == Some(scroll);
        self.last_scroll = Some(scroll);

        let frames = compute_frames(scroll, layout, &self.config);
        let writes = frames
            .iter()
            .filter(|frame| self.gate.admit(frame.index, frame.transform, settled))
            .map(|frame| TransformWrite {
                index: frame.index,
                transform: frame.transform.css_transform(),
                filter: frame.transform.css_filter(),
            })
            .collect();

        let complete = frames
            .last()
            .is_some_and(|last| last.progress >= 1.0 && last.pinned);

        FrameOutput {
            writes,
            completed: self.completion.observe(complete),
        }
    }

    pub fn applied(&self, index: usize) -> Option<CardTransform> {
        self.gate.applied(index)
    }

    pub fn is_complete(&self) -> bool {
        self.completion.is_complete()
    }

    pub fn teardown(&mut self) {
        self.layout = None;
        self.last_scroll = None;
        self.gate.clear();
        self.completion.reset();
    }
}
