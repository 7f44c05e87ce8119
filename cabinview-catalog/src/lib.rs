pub mod cabin;
pub mod features;

pub use cabin::{lookup, CabinSpecs, DEFAULT_CABIN_SPECS};
pub use features::{Feature, FeatureIndicators, IndicatorStatus};
