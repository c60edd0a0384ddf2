//! Player valuations per league format, cached with a TTL.

mod valuations_model;
mod valuations_service;
mod valuations_traits;

pub use valuations_model::{ValuationSnapshot, ValueFormat, DEFAULT_VALUES_TTL};
pub use valuations_service::ValuationService;
pub use valuations_traits::{ValuationServiceTrait, ValuationSource};
