pub mod config;
pub mod domain;
pub mod errors;
pub mod geo;
pub mod recommendations;

pub use domain::place::{Candidate, PlaceCategory, PointLocation, MUST_VISIT_BADGE};
pub use domain::trip::{CategoryPreference, TripContext};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use geo::{haversine_km, GeoPoint};
pub use recommendations::{
    CategoryScope, PriceRange, RankingEngine, RecommendationOptions, RecommendationResponse,
    SortBy,
};
