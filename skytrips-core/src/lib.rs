pub mod search;
pub mod codec;
pub mod iata;
pub mod flight_api;
pub mod links;
pub mod repository;

pub use search::{SearchParams, Trip, TripType, TravelClass, Leg, ManualFilter};
pub use iata::Airport;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Malformed search token: {0}")]
    MalformedSearchToken(String),
    #[error("Encoded search is {len} characters, limit is {max}")]
    EncodingOverflow { len: usize, max: usize },
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
