//! Carousel: driver state and the auto-advance timer.

mod driver;
mod ticker;

pub use driver::{
    AUTOPLAY_INTERVAL, BREAKPOINT_WIDTH, CarouselDriver, CarouselSettings, CarouselWindow,
    DEFAULT_SLIDES_TO_SHOW, NARROW_SLIDES_TO_SHOW, TRANSITION_DURATION,
};
pub use ticker::{AutoAdvanceTicker, CarouselTick};
