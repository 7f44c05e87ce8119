use std::sync::Arc;

use cabinview_core::FlightSupplier;
use cabinview_offer::OfferTransformer;

#[derive(Clone)]
pub struct AppState {
    pub supplier: Arc<dyn FlightSupplier>,
    pub transformer: OfferTransformer,
}

impl AppState {
    pub fn new(supplier: Arc<dyn FlightSupplier>, transformer: OfferTransformer) -> Self {
        Self {
            supplier,
            transformer,
        }
    }
}
