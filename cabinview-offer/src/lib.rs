pub mod duration;
pub mod models;
pub mod transformer;

pub use models::{ItinerarySummary, OfferSummary, SegmentSummary, SummaryPrice};
pub use transformer::{transform_offers, OfferTransformer, TransformError};
