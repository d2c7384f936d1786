//! Services that coordinate stores, upstream sources and the image cache.

pub mod refresh;
pub mod summary_image;

pub use refresh::{
    FixedMultiplier, MultiplierSource, RandomMultiplier, RefreshOrchestrator, RefreshOutcome,
};
pub use summary_image::{CountriesSummary, SummaryError, SummaryImage};
