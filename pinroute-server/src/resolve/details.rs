//! Place details for a selected search result.
//!
//! Reviews are kept newest first and capped at [`MAX_REVIEWS`]; photos
//! carry only their reference, which the web layer turns into a URL.

use std::future::Future;

use serde::Serialize;

use crate::domain::GeoPoint;
use crate::google::{
    OpeningPeriod, PhotoDto, PlaceDetailsResponse, PlaceDetailsResult, ProviderError,
    ProviderStatus, ReviewDto,
};

use super::error::ResolutionError;

/// Most reviews shown for one place.
pub const MAX_REVIEWS: usize = 5;

/// Capability for looking up one place by id.
pub trait PlaceDetailsProvider {
    /// A response with a non-`OK` status is still `Ok` here.
    fn place_details(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<PlaceDetailsResponse, ProviderError>> + Send;
}

/// Everything the detail view shows about a place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDetail {
    pub place_id: String,
    pub name: String,
    pub formatted_address: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub website: Option<String>,

    /// Google Maps page for the place.
    pub url: Option<String>,

    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub price_level: Option<u8>,
    pub opening_hours: Option<OpeningHours>,
    pub photos: Vec<PlacePhoto>,
    pub reviews: Vec<PlaceReview>,
    pub location: Option<GeoPoint>,
    pub types: Vec<String>,
    pub wheelchair_accessible_entrance: Option<bool>,
    pub business_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpeningHours {
    /// Unknown when the provider does not say.
    pub is_open_now: Option<bool>,
    pub weekday_text: Vec<String>,
    pub periods: Vec<OpeningPeriod>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceReview {
    pub author_name: String,
    pub author_url: Option<String>,
    pub profile_photo_url: Option<String>,
    pub rating: Option<f64>,
    pub relative_time_description: Option<String>,
    pub text: String,
    pub time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacePhoto {
    /// Opaque reference for fetching the image.
    pub reference: String,
    pub width: u32,
    pub height: u32,

    /// HTML snippets that must be shown with the photo.
    pub attributions: Vec<String>,

    /// Where the image can be fetched; filled in by the web layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Look up `place_id`.
///
/// An unknown id (`NOT_FOUND` or `ZERO_RESULTS`) and a blank id are both
/// [`ResolutionError::ZeroResults`].
pub async fn place_details<P>(provider: &P, place_id: &str) -> Result<PlaceDetail, ResolutionError>
where
    P: PlaceDetailsProvider + Sync,
{
    let place_id = place_id.trim();
    let not_found = || ResolutionError::ZeroResults {
        query: place_id.to_string(),
    };

    if place_id.is_empty() {
        return Err(not_found());
    }

    let response = provider.place_details(place_id).await?;
    match response.status {
        ProviderStatus::Ok => {}
        ProviderStatus::NotFound | ProviderStatus::ZeroResults => return Err(not_found()),
        other => return Err(ResolutionError::refused(other, response.error_message)),
    }

    let result = response.result.ok_or_else(not_found)?;
    Ok(from_result(place_id, result))
}

fn from_result(requested_id: &str, result: PlaceDetailsResult) -> PlaceDetail {
    let location = result.geometry.and_then(|g| {
        GeoPoint::new(g.location.lat, g.location.lng)
            .inspect_err(|err| {
                tracing::warn!(place_id = requested_id, %err, "invalid place location");
            })
            .ok()
    });

    PlaceDetail {
        place_id: result.place_id.unwrap_or_else(|| requested_id.to_string()),
        name: result.name,
        formatted_address: result.formatted_address,
        formatted_phone_number: result.formatted_phone_number,
        international_phone_number: result.international_phone_number,
        website: result.website,
        url: result.url,
        rating: result.rating,
        user_ratings_total: result.user_ratings_total,
        price_level: result.price_level,
        opening_hours: result.opening_hours.map(|hours| OpeningHours {
            is_open_now: hours.open_now,
            weekday_text: hours.weekday_text,
            periods: hours.periods,
        }),
        photos: result.photos.into_iter().map(from_photo).collect(),
        reviews: latest_reviews(result.reviews),
        location,
        types: result.types,
        wheelchair_accessible_entrance: result.wheelchair_accessible_entrance,
        business_status: result.business_status,
    }
}

fn from_photo(photo: PhotoDto) -> PlacePhoto {
    PlacePhoto {
        reference: photo.photo_reference,
        width: photo.width,
        height: photo.height,
        attributions: photo.html_attributions,
        url: None,
    }
}

/// Newest first, at most [`MAX_REVIEWS`]. Undated reviews sort last.
fn latest_reviews(mut reviews: Vec<ReviewDto>) -> Vec<PlaceReview> {
    reviews.sort_by_key(|review| std::cmp::Reverse(review.time.unwrap_or(0)));
    reviews
        .into_iter()
        .take(MAX_REVIEWS)
        .map(|review| PlaceReview {
            author_name: review.author_name,
            author_url: review.author_url,
            profile_photo_url: review.profile_photo_url,
            rating: review.rating,
            relative_time_description: review.relative_time_description,
            text: review.text,
            time: review.time,
        })
        .collect()
}
