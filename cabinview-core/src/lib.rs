pub mod amadeus;
pub mod search;
pub mod supplier;

pub use amadeus::{Dictionaries, FlightOffer, FlightOffersResponse, TravelClass};
pub use search::SearchParams;
pub use supplier::{FlightSupplier, SupplierError, SupplierStatus};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
