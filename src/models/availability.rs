use crate::entities::products;

/// Point-in-time availability signal for one product of an event.
///
/// `available` is true iff at least one free ticket of the product could be
/// tentatively locked at probe time. A ticket held by another in-flight
/// reservation counts as unavailable even if that reservation later aborts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductAvailability {
    pub product: products::Model,
    pub available: bool,
}
