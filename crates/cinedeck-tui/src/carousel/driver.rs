//! Carousel driver: a cyclic window over presented records.

use std::time::{Duration, Instant};

use crate::presenter::RenderRecord;

/// Slides shown at or above the breakpoint.
pub const DEFAULT_SLIDES_TO_SHOW: usize = 3;

/// Slides shown below the breakpoint.
pub const NARROW_SLIDES_TO_SHOW: usize = 1;

/// Viewport width below which the narrow slide count applies.
pub const BREAKPOINT_WIDTH: u32 = 768;

/// Interval between automatic advances.
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_millis(3000);

/// Duration of the slide transition.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(500);

/// Carousel behavior settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselSettings {
    /// Slides shown at or above `breakpoint`.
    pub slides_to_show: usize,
    /// Slides shown below `breakpoint`.
    pub narrow_slides_to_show: usize,
    /// Breakpoint width in viewport units.
    pub breakpoint: u32,
    /// Wrap around at both ends.
    pub infinite: bool,
    /// Advance automatically.
    pub autoplay: bool,
    /// Interval between automatic advances.
    pub autoplay_interval: Duration,
    /// Slide transition duration.
    pub speed: Duration,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            slides_to_show: DEFAULT_SLIDES_TO_SHOW,
            narrow_slides_to_show: NARROW_SLIDES_TO_SHOW,
            breakpoint: BREAKPOINT_WIDTH,
            infinite: true,
            autoplay: true,
            autoplay_interval: AUTOPLAY_INTERVAL,
            speed: TRANSITION_DURATION,
        }
    }
}

impl CarouselSettings {
    /// Slide count for a viewport width, before clamping to the item count.
    #[must_use]
    pub const fn slides_for_width(&self, width: u32) -> usize {
        if width < self.breakpoint {
            self.narrow_slides_to_show
        } else {
            self.slides_to_show
        }
    }
}

/// The currently visible part of the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselWindow<'a> {
    /// Number of visible slides (never more than `items.len()`).
    pub visible_count: usize,
    /// Index of the first visible slide.
    pub offset: usize,
    /// All slides.
    pub items: &'a [RenderRecord],
    /// Whether auto-advance is active.
    pub auto_advance: bool,
}

impl<'a> CarouselWindow<'a> {
    /// Visible slides, left to right, wrapping past the end.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn visible(&self) -> impl Iterator<Item = &'a RenderRecord> + use<'a> {
        let items = self.items;
        let offset = self.offset;
        let len = items.len();
        (0..self.visible_count).filter_map(move |i| items.get((offset + i) % len))
    }
}

/// Drives the carousel: offset, responsive slide count and autoplay.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct CarouselDriver {
    settings: CarouselSettings,
    items: Vec<RenderRecord>,
    offset: usize,
    viewport_width: u32,
    autoplay: bool,
    transition_started: Option<Instant>,
}

impl CarouselDriver {
    /// Creates an empty carousel for the given viewport width.
    #[must_use]
    pub fn new(settings: CarouselSettings, viewport_width: u32) -> Self {
        let autoplay = settings.autoplay;
        Self {
            settings,
            items: Vec::new(),
            offset: 0,
            viewport_width,
            autoplay,
            transition_started: None,
        }
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &CarouselSettings {
        &self.settings
    }

    /// All slides.
    #[must_use]
    pub fn items(&self) -> &[RenderRecord] {
        &self.items
    }

    /// Index of the first visible slide.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Current viewport width.
    #[must_use]
    pub const fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    /// Replaces the slides and rewinds to the first one.
    pub fn set_items(&mut self, items: Vec<RenderRecord>) {
        self.items = items;
        self.offset = 0;
        self.transition_started = None;
    }

    /// Updates the viewport width; items and offset are kept.
    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
        if !self.settings.infinite {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    /// Number of visible slides.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.settings
            .slides_for_width(self.viewport_width)
            .min(self.items.len())
    }

    /// Whether ticks currently advance the carousel.
    #[must_use]
    pub fn auto_advance(&self) -> bool {
        self.autoplay && !self.items.is_empty()
    }

    /// Pauses or resumes autoplay. Returns the new autoplay flag.
    pub const fn toggle_autoplay(&mut self) -> bool {
        self.autoplay = !self.autoplay;
        self.autoplay
    }

    /// Handles an autoplay tick. Returns `true` if the offset moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.auto_advance() {
            return false;
        }
        self.advance(now)
    }

    /// Moves one slide forward. Returns `true` if the offset moved.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn advance(&mut self, now: Instant) -> bool {
        let len = self.items.len();
        if len == 0 {
            return false;
        }
        let next = if self.settings.infinite {
            (self.offset + 1) % len
        } else {
            (self.offset + 1).min(self.max_offset())
        };
        self.move_to(next, now)
    }

    /// Moves one slide back. Returns `true` if the offset moved.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn retreat(&mut self, now: Instant) -> bool {
        let len = self.items.len();
        if len == 0 {
            return false;
        }
        let next = if self.settings.infinite {
            (self.offset + len - 1) % len
        } else {
            self.offset.saturating_sub(1)
        };
        self.move_to(next, now)
    }

    /// Jumps to a slide (dot navigation). The index wraps modulo the item count.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn go_to(&mut self, index: usize, now: Instant) -> bool {
        let len = self.items.len();
        if len == 0 {
            return false;
        }
        let target = index % len;
        let target = if self.settings.infinite {
            target
        } else {
            target.min(self.max_offset())
        };
        self.move_to(target, now)
    }

    /// Whether a slide transition is still animating at `now`.
    #[must_use]
    pub fn in_transition(&self, now: Instant) -> bool {
        self.transition_started
            .is_some_and(|started| now.saturating_duration_since(started) < self.settings.speed)
    }

    /// Current window.
    #[must_use]
    pub fn window(&self) -> CarouselWindow<'_> {
        CarouselWindow {
            visible_count: self.visible_count(),
            offset: self.offset,
            items: &self.items,
            auto_advance: self.auto_advance(),
        }
    }

    fn max_offset(&self) -> usize {
        self.items.len().saturating_sub(self.visible_count())
    }

    fn move_to(&mut self, next: usize, now: Instant) -> bool {
        if next == self.offset {
            return false;
        }
        self.offset = next;
        self.transition_started = Some(now);
        true
    }
}
