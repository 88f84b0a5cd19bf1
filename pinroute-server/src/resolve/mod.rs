//! Location resolution: free text or coordinates to a canonical point,
//! and the details of a chosen place.

mod details;
mod error;
mod resolver;

pub use details::{
    OpeningHours, PlaceDetail, PlaceDetailsProvider, PlacePhoto, PlaceReview, place_details,
};
pub use error::ResolutionError;
pub use resolver::{
    FirstResult, Geocoder, LocationResolver, PlaceSearcher, Resolution, ResolveMode,
    ResolvedLocation, SearchRecord, SearchRecorder,
};
