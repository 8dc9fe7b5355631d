//! Standard registry entries, one per enhancement library.

mod carousel;
mod counters;
mod isotope;
mod lightbox;
mod reveal;
mod skills;
mod typed;

pub use carousel::{CAROUSEL_READY_CLASS, Carousel};
pub use counters::Counters;
pub use isotope::{FILTER_ACTIVE_CLASS, FilterLayout, apply_filter};
pub use lightbox::Lightbox;
pub use reveal::RevealRefresh;
pub use skills::{SkillsProgress, fill_progress, progress_bars};
pub use typed::{TypedEffect, typed_items};
