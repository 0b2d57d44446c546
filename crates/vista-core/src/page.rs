//! Page composition: sections, content blocks and the animators that drive them.
//!
//! A [`PageConfig`] describes the document (read from TOML or the built-in
//! demo). [`Page::build`] lays it out top to bottom, registers one visibility
//! region per block and wires the navigator to the section tops. The
//! presentation layer then only has to feed scroll offsets, viewport size and
//! the current time.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::MotionConfig;
use crate::count_up::{format_count, staggered_delay, CountFormat, CountUpAnimator};
use crate::motion::timing::millis;
use crate::motion::{EasingType, Keyframes, VisualState};
use crate::progress::{fraction_of, ProgressBarAnimator};
use crate::reveal::{RevealAnimator, RevealItem};
use crate::scroll_spy::{NavigationRequest, ScrollSpyNavigator, Section};
use crate::typewriter::{TypewriterEngine, TypewriterTiming};
use crate::visibility::{
    Bounds, Disposer, RegionId, VisibilityChange, VisibilityObserver, VisibilityRegion, Viewport,
};
use crate::{Error, Result};

const DEMO_PAGE: &str = include_str!("../assets/demo_page.toml");

/// Navigation entries slide down into place one after another at mount
const NAV_ENTRANCE_STAGGER: Duration = Duration::from_millis(100);
const NAV_ENTRANCE_DURATION: Duration = Duration::from_millis(500);
const NAV_ENTRANCE_OFFSET: f64 = -20.0;

/// The floating action button pops in after the page settles
const ACTION_BUTTON_DELAY: Duration = Duration::from_millis(1000);
const ACTION_BUTTON_DURATION: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    pub id: String,
    pub label: String,
    /// Minimum height; grows to fit its blocks
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub blocks: Vec<BlockConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockConfig {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_block_height")]
    pub height: f64,
    /// Root margin; defaults to `motion.visibility_margin_px`
    #[serde(default)]
    pub margin_px: Option<f64>,
    #[serde(default = "default_true")]
    pub once: bool,
    /// Defaults to `motion.visibility_threshold`
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub base_delay_ms: u64,
    #[serde(default = "default_stagger")]
    pub stagger_ms: u64,
    /// Entrance time of one card; counters wait for it before counting
    #[serde(default = "default_entrance")]
    pub entrance_ms: u64,
    #[serde(default)]
    pub reveal: Vec<RevealConfig>,
    #[serde(default)]
    pub typewriter: Option<TypewriterConfig>,
    #[serde(default)]
    pub count_ups: Vec<CountUpConfig>,
    #[serde(default)]
    pub progress: Vec<ProgressConfig>,
    /// Decorations that keep moving once the block has been seen
    #[serde(default)]
    pub ambient: Vec<AmbientConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMotion {
    #[default]
    FadeUp,
    FadeDown,
    /// Enters from the left
    SlideLeft,
    /// Enters from the right
    SlideRight,
    Fade,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    pub text: String,
    #[serde(default)]
    pub motion: RevealMotion,
    #[serde(default = "default_distance")]
    pub distance: f64,
    #[serde(default = "default_reveal_duration")]
    pub duration_ms: u64,
    #[serde(default)]
    pub delay_ms: u64,
    /// Defaults to `motion.easing`
    #[serde(default)]
    pub easing: Option<EasingType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypewriterConfig {
    pub text: String,
    #[serde(default)]
    pub start_delay_ms: u64,
    #[serde(default = "default_char_interval")]
    pub char_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountUpConfig {
    pub label: String,
    pub value: f64,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub format: CountFormat,
    #[serde(default = "default_count_duration")]
    pub duration_ms: u64,
    /// Defaults to the counter's stagger slot plus the card entrance
    #[serde(default)]
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    pub label: String,
    pub value: f64,
    #[serde(default = "default_max")]
    pub max: f64,
    /// Appended to the abbreviated value in the caption
    #[serde(default)]
    pub unit: String,
    #[serde(default = "default_progress_duration")]
    pub duration_ms: u64,
    #[serde(default = "default_progress_delay")]
    pub delay_ms: u64,
}

/// A looping decoration: vertical offsets and opacities cycled as keyframes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientConfig {
    pub text: String,
    /// Vertical offsets in px, one per keyframe
    #[serde(default)]
    pub offsets: Vec<f64>,
    /// Opacity per keyframe; missing entries repeat the last one
    #[serde(default)]
    pub opacity: Vec<f64>,
    /// Length of one cycle
    #[serde(default = "default_ambient_duration")]
    pub duration_ms: u64,
    #[serde(default)]
    pub delay_ms: u64,
    /// Horizontal position as a percentage of the block width
    #[serde(default)]
    pub left_pct: f64,
    /// Distance from the block top
    #[serde(default)]
    pub top_px: f64,
    #[serde(default = "default_ambient_easing")]
    pub easing: EasingType,
}

fn default_title() -> String {
    "Vista".to_string()
}

fn default_block_height() -> f64 {
    200.0
}

fn default_true() -> bool {
    true
}

fn default_stagger() -> u64 {
    100
}

fn default_entrance() -> u64 {
    500
}

fn default_distance() -> f64 {
    30.0
}

fn default_reveal_duration() -> u64 {
    600
}

fn default_char_interval() -> u64 {
    30
}

fn default_count_duration() -> u64 {
    2000
}

fn default_max() -> f64 {
    1.0
}

fn default_progress_duration() -> u64 {
    1500
}

fn default_progress_delay() -> u64 {
    300
}

fn default_ambient_duration() -> u64 {
    4000
}

fn default_ambient_easing() -> EasingType {
    EasingType::EaseInOut
}

impl PageConfig {
    /// The page shipped with the binary
    pub fn demo() -> Result<Self> {
        Self::from_toml(DEMO_PAGE)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load `path` when given, otherwise the demo page
    pub fn load_or_demo(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::demo(),
        }
    }
}

impl RevealConfig {
    fn item(&self, default_easing: EasingType) -> RevealItem {
        let duration = millis(self.duration_ms);
        let d = self.distance;
        let item = match self.motion {
            RevealMotion::FadeUp => RevealItem::fade_up(d, duration),
            RevealMotion::FadeDown => RevealItem::fade_up(-d, duration),
            RevealMotion::SlideLeft => RevealItem::slide_in(-d, duration),
            RevealMotion::SlideRight => RevealItem::slide_in(d, duration),
            RevealMotion::Fade => RevealItem::fade_up(0.0, duration),
        };
        item.with_easing(self.easing.unwrap_or(default_easing))
            .with_delay(millis(self.delay_ms))
    }
}

impl AmbientConfig {
    fn keyframes(&self) -> Keyframes<VisualState> {
        let count = self.offsets.len().max(self.opacity.len()).max(1);
        let pick = |values: &[f64], i: usize, fallback: f64| {
            values
                .get(i)
                .or_else(|| values.last())
                .copied()
                .filter(|v| v.is_finite())
                .unwrap_or(fallback)
        };
        let frames = (0..count)
            .map(|i| VisualState {
                opacity: pick(&self.opacity, i, 1.0).clamp(0.0, 1.0),
                offset_y: pick(&self.offsets, i, 0.0),
                ..VisualState::SHOWN
            })
            .collect();
        Keyframes::new(frames, millis(self.duration_ms), self.easing)
            .with_delay(millis(self.delay_ms))
            .looping()
    }
}

/// A looping decoration placed inside a block
#[derive(Debug, Clone)]
pub struct Ambient {
    pub text: String,
    pub left_pct: f64,
    pub top_px: f64,
    motion: Keyframes<VisualState>,
}

/// An animated counter with its caption
#[derive(Debug, Clone)]
pub struct Counter {
    pub label: String,
    pub suffix: String,
    pub format: CountFormat,
    pub animator: CountUpAnimator,
}

impl Counter {
    pub fn display(&self) -> String {
        self.animator.display(self.format, &self.suffix)
    }
}

/// An animated progress bar with its caption
#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    /// Abbreviated absolute value, e.g. "2.5k hrs"
    pub caption: String,
    pub animator: ProgressBarAnimator,
}

/// A content block governed by one visibility region
#[derive(Debug)]
pub struct Block {
    id: String,
    title: Option<String>,
    section: usize,
    bounds: Bounds,
    lines: Vec<String>,
    reveal: RevealAnimator,
    typewriter: Option<TypewriterEngine>,
    counters: Vec<Counter>,
    bars: Vec<Bar>,
    ambient: Vec<Ambient>,
    region: Disposer,
    entered_at: Option<Duration>,
    frozen_at: Option<Duration>,
}

impl Block {
    fn build(
        config: &BlockConfig,
        section: usize,
        top: f64,
        motion: &MotionConfig,
        observer: &VisibilityObserver,
    ) -> Self {
        let margin = config.margin_px.unwrap_or(motion.visibility_margin_px);
        let mut region = if config.once {
            VisibilityRegion::once(margin)
        } else {
            VisibilityRegion::continuous(margin)
        };
        region = region.with_threshold(config.threshold.unwrap_or(motion.visibility_threshold));

        let bounds = Bounds::new(top, config.height);
        let handle = observer.observe(region);
        observer.set_bounds(handle.id(), Some(bounds));

        let stagger = millis(config.stagger_ms);
        let items: Vec<RevealItem> = config
            .reveal
            .iter()
            .map(|r| r.item(motion.easing))
            .collect();
        let mut reveal = RevealAnimator::new(millis(config.base_delay_ms));
        reveal.play(&items, stagger);

        let typewriter = config.typewriter.as_ref().map(|t| {
            TypewriterEngine::new(
                t.text.clone(),
                TypewriterTiming {
                    start_delay: millis(t.start_delay_ms),
                    character_interval: millis(t.char_interval_ms),
                    hold: millis(motion.typewriter_hold_ms),
                    blink_interval: millis(motion.cursor_blink_ms),
                },
            )
        });

        let entrance = millis(config.entrance_ms);
        let counters = config
            .count_ups
            .iter()
            .enumerate()
            .map(|(index, c)| {
                let delay = match c.delay_ms {
                    Some(ms) => millis(ms),
                    None => staggered_delay(index, stagger, entrance),
                };
                Counter {
                    label: c.label.clone(),
                    suffix: c.suffix.clone(),
                    format: c.format,
                    animator: CountUpAnimator::animate_to(c.value, millis(c.duration_ms), delay),
                }
            })
            .collect();

        let bars = config
            .progress
            .iter()
            .map(|p| Bar {
                label: p.label.clone(),
                caption: format_count(p.value, CountFormat::Thousands, &p.unit),
                animator: ProgressBarAnimator::animate_width(
                    fraction_of(p.value, p.max),
                    millis(p.duration_ms),
                    millis(p.delay_ms),
                ),
            })
            .collect();

        let ambient = config
            .ambient
            .iter()
            .map(|a| Ambient {
                text: a.text.clone(),
                left_pct: if a.left_pct.is_finite() { a.left_pct.clamp(0.0, 100.0) } else { 0.0 },
                top_px: if a.top_px.is_finite() { a.top_px } else { 0.0 },
                motion: a.keyframes(),
            })
            .collect();

        Self {
            id: config.id.clone(),
            title: config.title.clone(),
            section,
            bounds,
            lines: config.reveal.iter().map(|r| r.text.clone()).collect(),
            reveal,
            typewriter,
            counters,
            bars,
            ambient,
            region: handle,
            entered_at: None,
            frozen_at: None,
        }
    }

    fn enter(&mut self, now: Duration) {
        if self.entered_at.is_some() {
            return;
        }
        self.entered_at = Some(now);
        debug!(block = %self.id, "Block entered viewport");
        self.reveal.on_enter(now);
        if let Some(typewriter) = self.typewriter.as_mut() {
            typewriter.host_visible(now);
        }
        for counter in &mut self.counters {
            counter.animator.host_visible(now);
        }
        for bar in &mut self.bars {
            bar.animator.host_visible(now);
        }
    }

    fn tick(&mut self, now: Duration) {
        if let Some(typewriter) = self.typewriter.as_mut() {
            typewriter.advance(now);
        }
        for counter in &mut self.counters {
            counter.animator.advance(now);
        }
    }

    fn dispose(&mut self, now: Duration) {
        self.frozen_at.get_or_insert(now);
        self.region.dispose();
        self.reveal.dispose(now);
        if let Some(typewriter) = self.typewriter.as_mut() {
            typewriter.dispose();
        }
        for counter in &mut self.counters {
            counter.animator.dispose();
        }
        for bar in &mut self.bars {
            bar.animator.dispose(now);
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Index of the owning section
    pub fn section(&self) -> usize {
        self.section
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn region(&self) -> RegionId {
        self.region.id()
    }

    pub fn has_entered(&self) -> bool {
        self.entered_at.is_some()
    }

    /// Reveal lines paired with their visual state at `now`
    pub fn lines(&self, now: Duration) -> impl Iterator<Item = (&str, VisualState)> + '_ {
        self.lines.iter().enumerate().map(move |(i, text)| {
            let state = self.reveal.item_state(i, now).unwrap_or_default();
            (text.as_str(), state)
        })
    }

    pub fn reveal(&self) -> &RevealAnimator {
        &self.reveal
    }

    pub fn typewriter(&self) -> Option<&TypewriterEngine> {
        self.typewriter.as_ref()
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Looping decorations paired with their visual state at `now`.
    /// They hold their first frame until the block has been seen.
    pub fn ambient(&self, now: Duration) -> impl Iterator<Item = (&Ambient, VisualState)> + '_ {
        let now = match self.frozen_at {
            Some(frozen) => now.min(frozen),
            None => now,
        };
        let elapsed = self.entered_at.map(|at| now.saturating_sub(at));
        self.ambient.iter().map(move |a| {
            let state = a
                .motion
                .sample(elapsed.unwrap_or(Duration::ZERO))
                .unwrap_or_default();
            (a, state)
        })
    }

    /// Whether a finite animation is still running. Ambient loops never
    /// finish and are redrawn at the idle tick rate instead.
    pub fn is_animating(&self, now: Duration) -> bool {
        self.reveal.is_animating(now)
            || self.typewriter.as_ref().is_some_and(|t| t.is_animating())
            || self.counters.iter().any(|c| c.animator.is_animating())
            || self.bars.iter().any(|b| b.animator.is_animating(now))
    }
}

/// What a scroll or layout pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrollUpdate {
    /// New active section, when the highlight moved
    pub active_section: Option<usize>,
    /// Blocks that entered the viewport during this pass
    pub entered_blocks: Vec<String>,
}

/// A laid-out page with live animators
#[derive(Debug)]
pub struct Page {
    title: String,
    navigator: ScrollSpyNavigator,
    section_tops: Vec<f64>,
    blocks: Vec<Block>,
    by_region: HashMap<RegionId, usize>,
    observer: VisibilityObserver,
    nav_entrance: RevealAnimator,
    action_button: RevealAnimator,
    viewport: Viewport,
    document_height: f64,
    /// Latest time seen; disposal freezes animations here
    last_now: Duration,
    disposed: bool,
}

impl Page {
    /// Lay out `config` and wire every animator. Nothing is evaluated until
    /// [`Page::mount`] or the first scroll.
    pub fn build(config: &PageConfig, motion: &MotionConfig, viewport_height: f64) -> Result<Self> {
        let observer = VisibilityObserver::new();
        let mut sections = Vec::with_capacity(config.sections.len());
        let mut section_tops = Vec::with_capacity(config.sections.len());
        let mut blocks = Vec::new();
        let mut top = 0.0;

        for (index, section) in config.sections.iter().enumerate() {
            sections.push(Section::new(section.id.clone(), section.label.clone()).at(top));
            section_tops.push(top);

            let mut cursor = top;
            for block in &section.blocks {
                if block.height <= 0.0 || !block.height.is_finite() {
                    warn!(block = %block.id, height = block.height, "Block has no height and will never reveal");
                }
                blocks.push(Block::build(block, index, cursor, motion, &observer));
                cursor += block.height.max(0.0);
            }

            let content = cursor - top;
            let height = match section.height {
                Some(height) if height < content => {
                    warn!(section = %section.id, height, content, "Section is shorter than its blocks, growing it");
                    content
                }
                Some(height) => height,
                None => content,
            };
            top += height.max(0.0);
        }

        let navigator = ScrollSpyNavigator::new(sections, motion.scroll_spy_offset)?;

        let nav_items: Vec<RevealItem> = config
            .sections
            .iter()
            .map(|_| {
                RevealItem::fade_up(NAV_ENTRANCE_OFFSET, NAV_ENTRANCE_DURATION)
                    .with_easing(EasingType::EaseOutQuad)
            })
            .collect();
        let mut nav_entrance = RevealAnimator::new(Duration::ZERO);
        nav_entrance.play(&nav_items, NAV_ENTRANCE_STAGGER);

        let pop_in = RevealItem::new(
            VisualState {
                scale: 0.0,
                ..VisualState::SHOWN
            },
            VisualState::SHOWN,
            ACTION_BUTTON_DURATION,
        )
        .with_easing(EasingType::Spring);
        let mut action_button = RevealAnimator::new(ACTION_BUTTON_DELAY);
        action_button.play(&[pop_in], Duration::ZERO);

        let by_region = blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (b.region(), i))
            .collect();

        debug!(
            sections = section_tops.len(),
            blocks = blocks.len(),
            height = top,
            "Page laid out"
        );

        Ok(Self {
            title: config.title.clone(),
            navigator,
            section_tops,
            blocks,
            by_region,
            observer,
            nav_entrance,
            action_button,
            viewport: Viewport::new(0.0, viewport_height.max(0.0)),
            document_height: top,
            last_now: Duration::ZERO,
            disposed: false,
        })
    }

    /// First paint: start the navigation entrance and reveal what is already in view
    pub fn mount(&mut self, now: Duration) -> ScrollUpdate {
        self.nav_entrance.on_enter(now);
        self.action_button.on_enter(now);
        self.refresh(now)
    }

    /// Scroll to `scroll_y` and deliver every resulting change
    pub fn on_scroll(&mut self, scroll_y: f64, now: Duration) -> ScrollUpdate {
        if self.disposed || scroll_y.is_nan() {
            return ScrollUpdate::default();
        }
        self.viewport.scroll_y = scroll_y;
        self.refresh(now)
    }

    pub fn set_viewport_height(&mut self, height: f64, now: Duration) -> ScrollUpdate {
        if self.disposed {
            return ScrollUpdate::default();
        }
        self.viewport.height = height.max(0.0);
        self.refresh(now)
    }

    /// Re-evaluate the navigator and visibility regions at the current viewport
    pub fn refresh(&mut self, now: Duration) -> ScrollUpdate {
        if self.disposed {
            return ScrollUpdate::default();
        }
        self.last_now = self.last_now.max(now);
        let active_section = self.navigator.on_scroll(self.viewport.scroll_y);

        let mut entered_blocks = Vec::new();
        for event in self.observer.update(self.viewport, now) {
            if event.change != VisibilityChange::Enter {
                continue;
            }
            if let Some(&index) = self.by_region.get(&event.region) {
                let block = &mut self.blocks[index];
                if !block.has_entered() {
                    block.enter(now);
                    entered_blocks.push(block.id.clone());
                }
            }
        }

        self.tick(now);
        ScrollUpdate {
            active_section,
            entered_blocks,
        }
    }

    /// Advance the stateful animators to `now`
    pub fn tick(&mut self, now: Duration) {
        if self.disposed {
            return;
        }
        self.last_now = self.last_now.max(now);
        for block in &mut self.blocks {
            block.tick(now);
        }
    }

    /// Whether another frame is needed soon
    pub fn is_animating(&self, now: Duration) -> bool {
        !self.disposed
            && (self.nav_entrance.is_animating(now)
                || self.action_button.is_animating(now)
                || self.blocks.iter().any(|b| b.is_animating(now)))
    }

    /// Navigate to a section by id. The overlay menu closes either way.
    pub fn navigate(&mut self, id: &str) -> Option<NavigationRequest> {
        self.navigator.scroll_to_section(id)
    }

    /// Navigate to the section at `index`
    pub fn navigate_index(&mut self, index: usize) -> Option<NavigationRequest> {
        match self.navigator.sections().get(index).map(|s| s.id.clone()) {
            Some(id) => self.navigate(&id),
            None => {
                self.navigator.close_menu();
                None
            }
        }
    }

    /// Tear down every region and animator, freezing what is on screen at
    /// the last time the page was driven. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        let now = self.last_now;
        for block in &mut self.blocks {
            block.dispose(now);
        }
        self.nav_entrance.dispose(now);
        self.action_button.dispose(now);
        debug!("Page disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn navigator(&self) -> &ScrollSpyNavigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut ScrollSpyNavigator {
        &mut self.navigator
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn section_top(&self, index: usize) -> Option<f64> {
        self.section_tops.get(index).copied()
    }

    /// Visual state of the `index`-th navigation entry at `now`
    pub fn nav_entry_state(&self, index: usize, now: Duration) -> VisualState {
        self.nav_entrance.item_state(index, now).unwrap_or_default()
    }

    /// Visual state of the floating action button at `now`
    pub fn action_button_state(&self, now: Duration) -> VisualState {
        self.action_button.item_state(0, now).unwrap_or_default()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> f64 {
        self.viewport.scroll_y
    }

    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    /// Largest useful scroll offset
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport.height).max(0.0)
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count_up::CountUpPhase;
    use crate::reveal::RevealPhase;
    use crate::typewriter::TypewriterPhase;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn small_page() -> PageConfig {
        PageConfig::from_toml(
            r#"
            [[sections]]
            id = "top"
            label = "Top"
            height = 600.0

            [[sections.blocks]]
            id = "intro"
            height = 200.0
            margin_px = 0.0
            reveal = [{ text = "hello", duration_ms = 100 }]

            [[sections]]
            id = "numbers"
            label = "Numbers"
            height = 600.0

            [[sections.blocks]]
            id = "stats"
            height = 300.0
            margin_px = 0.0
            count_ups = [{ label = "Count", value = 10.0, duration_ms = 100, delay_ms = 0 }]
            progress = [{ label = "Rust", value = 2500.0, max = 3500.0, unit = " hrs", duration_ms = 100, delay_ms = 0 }]
            typewriter = { text = "ok", char_interval_ms = 10 }
            "#,
        )
        .unwrap()
    }

    fn build(config: &PageConfig) -> Page {
        Page::build(config, &MotionConfig::default(), 500.0).unwrap()
    }

    #[test]
    fn test_demo_page_parses_and_lays_out() {
        let config = PageConfig::demo().unwrap();
        let page = build(&config);
        let ids: Vec<&str> = page
            .navigator()
            .sections()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["hero", "about", "experience", "skills", "contact"]);
        assert_eq!(page.section_top(1), Some(700.0));
        assert!(page.block("contact-status").and_then(Block::typewriter).is_some());
    }

    #[test]
    fn test_sections_grow_to_fit_blocks() {
        let config = PageConfig::from_toml(
            r#"
            [[sections]]
            id = "a"
            label = "A"
            height = 100.0
            blocks = [{ id = "tall", height = 400.0 }]

            [[sections]]
            id = "b"
            label = "B"
            "#,
        )
        .unwrap();
        let page = build(&config);
        assert_eq!(page.section_top(1), Some(400.0));
        assert_eq!(page.document_height(), 400.0);
    }

    #[test]
    fn test_mount_reveals_blocks_already_in_view() {
        let mut page = build(&small_page());
        let update = page.mount(ms(0));
        assert_eq!(update.entered_blocks, vec!["intro".to_string()]);
        assert!(page.is_animating(ms(50)));
        let intro = page.block("intro").unwrap();
        assert_eq!(intro.reveal().phase(ms(100)), RevealPhase::Complete);
    }

    #[test]
    fn test_scroll_activates_section_and_starts_block() {
        let mut page = build(&small_page());
        page.mount(ms(0));

        let update = page.on_scroll(520.0, ms(1000));
        assert_eq!(update.active_section, Some(1));
        assert_eq!(update.entered_blocks, vec!["stats".to_string()]);

        page.tick(ms(1100));
        let stats = page.block("stats").unwrap();
        assert_eq!(stats.counters()[0].animator.phase(), CountUpPhase::Settled);
        assert_eq!(stats.counters()[0].display(), "10");
        assert_eq!(stats.bars()[0].caption, "2.5k hrs");
        assert!((stats.bars()[0].animator.width(ms(1100)) - 2500.0 / 3500.0).abs() < 1e-12);
        assert_eq!(
            stats.typewriter().map(TypewriterEngine::revealed_text),
            Some("ok")
        );
    }

    #[test]
    fn test_block_enters_only_once() {
        let mut page = build(&small_page());
        page.mount(ms(0));
        page.on_scroll(520.0, ms(10));
        page.on_scroll(0.0, ms(20));
        let update = page.on_scroll(520.0, ms(30));
        assert!(update.entered_blocks.is_empty());
    }

    #[test]
    fn test_navigate_returns_section_top() {
        let mut page = build(&small_page());
        page.navigator_mut().toggle_menu();
        let request = page.navigate("numbers").unwrap();
        assert_eq!(request.target_y, 600.0);
        assert!(!page.navigator().is_menu_open());
        assert_eq!(page.navigate_index(9), None);
    }

    #[test]
    fn test_nav_entrance_staggers() {
        let mut page = build(&small_page());
        page.mount(ms(0));
        assert!(page.nav_entry_state(0, ms(250)).opacity > page.nav_entry_state(1, ms(250)).opacity);
        assert_eq!(page.nav_entry_state(1, ms(600)), VisualState::SHOWN);
    }

    #[test]
    fn test_dispose_cancels_everything() {
        let mut page = build(&small_page());
        page.mount(ms(0));
        page.dispose();
        page.dispose();

        let update = page.on_scroll(520.0, ms(10));
        assert_eq!(update, ScrollUpdate::default());
        assert!(!page.is_animating(ms(10)));
        let stats = page.block("stats").unwrap();
        assert_eq!(stats.typewriter().map(TypewriterEngine::phase), Some(TypewriterPhase::WaitingToStart));
    }

    #[test]
    fn test_empty_page_rejected() {
        let config = PageConfig::from_toml("title = \"nothing\"").unwrap();
        assert!(matches!(
            Page::build(&config, &MotionConfig::default(), 500.0),
            Err(Error::EmptyPage)
        ));
    }

    #[test]
    fn test_malformed_page_is_config_error() {
        assert!(matches!(
            PageConfig::from_toml("[[sections]]\nid = 3"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_malformed_page_file_is_config_error() {
        let path = std::env::temp_dir().join(format!("vista-bad-page-{}.toml", std::process::id()));
        std::fs::write(&path, "[[sections]]\nid = 3").unwrap();
        let loaded = PageConfig::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(loaded, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_page_file_is_io_error() {
        let path = std::env::temp_dir().join("vista-no-such-page.toml");
        assert!(matches!(PageConfig::load(&path), Err(Error::Io(_))));
    }

    #[test]
    fn test_dispose_freezes_bars_and_lines_mid_animation() {
        let config = PageConfig::from_toml(
            r#"
            [[sections]]
            id = "top"
            label = "Top"

            [[sections.blocks]]
            id = "intro"
            height = 200.0
            margin_px = 0.0
            reveal = [{ text = "hello", duration_ms = 1000, easing = "linear", motion = "fade" }]
            progress = [{ label = "Rust", value = 1000.0, max = 1000.0, duration_ms = 1000, delay_ms = 0 }]
            "#,
        )
        .unwrap();
        let mut page = build(&config);
        page.mount(ms(0));
        page.tick(ms(400));
        page.dispose();

        let intro = page.block("intro").unwrap();
        let width = intro.bars()[0].animator.width(ms(400));
        assert!(width > 0.0 && width < 1.0);
        assert_eq!(intro.bars()[0].animator.width(ms(5000)), width);

        let held: Vec<VisualState> = intro.lines(ms(5000)).map(|(_, s)| s).collect();
        assert!((held[0].opacity - 0.4).abs() < 1e-9);
        assert_eq!(intro.reveal().phase(ms(5000)), RevealPhase::Running);
        assert!(!page.is_animating(ms(5000)));
    }

    #[test]
    fn test_action_button_pops_in_after_delay() {
        let mut page = build(&small_page());
        assert_eq!(page.action_button_state(ms(0)).scale, 0.0);

        page.mount(ms(0));
        assert_eq!(page.action_button_state(ms(999)).scale, 0.0);
        let mid = page.action_button_state(ms(1300)).scale;
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(page.action_button_state(ms(1600)), VisualState::SHOWN);
        assert!(page.is_animating(ms(1500)));
        assert!(!page.is_animating(ms(1600)));
    }

    #[test]
    fn test_ambient_decorations_loop_once_seen() {
        let config = PageConfig::from_toml(
            r#"
            [[sections]]
            id = "hero"
            label = "Hero"

            [[sections.blocks]]
            id = "intro"
            height = 400.0
            margin_px = 0.0
            ambient = [
                { text = "Rust", offsets = [-15.0, 15.0, -15.0], opacity = [0.4, 0.7, 0.4], duration_ms = 4000, left_pct = 20.0, top_px = 160.0 },
                { text = "Go", offsets = [-15.0, 15.0, -15.0], opacity = [0.4, 0.7, 0.4], duration_ms = 4500, delay_ms = 800, left_pct = 140.0 },
            ]

            [[sections.blocks]]
            id = "below"
            height = 400.0
            margin_px = 0.0

            [[sections.blocks]]
            id = "far"
            height = 400.0
            margin_px = 0.0
            ambient = [{ text = "hint", offsets = [0.0, 8.0, 0.0], duration_ms = 2500 }]
            "#,
        )
        .unwrap();
        let mut page = build(&config);
        page.mount(ms(100));

        let intro = page.block("intro").unwrap();
        let at = |now: u64| -> Vec<VisualState> { intro.ambient(ms(now)).map(|(_, s)| s).collect() };
        let labels: Vec<(&str, f64)> = intro.ambient(ms(100)).map(|(a, _)| (a.text.as_str(), a.left_pct)).collect();
        assert_eq!(labels, vec![("Rust", 20.0), ("Go", 100.0)]);

        assert_eq!(at(100)[0].offset_y, -15.0);
        assert!((at(2100)[0].offset_y - 15.0).abs() < 1e-9);
        assert!((at(2100)[0].opacity - 0.7).abs() < 1e-9);
        assert_eq!(at(4100)[0].offset_y, -15.0);
        assert!((at(6100)[0].offset_y - 15.0).abs() < 1e-9);

        // the second label waits out its delay on the first frame
        assert_eq!(at(850)[1].offset_y, -15.0);
        assert!(at(2000)[1].offset_y > -15.0);

        // loops never hold the page awake
        assert!(!page.is_animating(ms(10_000)));

        let far = page.block("far").unwrap();
        assert!(!far.has_entered());
        let held: Vec<VisualState> = far.ambient(ms(1350)).map(|(_, s)| s).collect();
        assert_eq!(held[0].offset_y, 0.0);
    }
}
