//! # catmap
//!
//! Categorized marker overlays for hosted map surfaces.
//!
//! Markers are grouped under category labels that share one icon, shown and
//! hidden per category, and carry a popup built from free-form location
//! metadata. The map itself, the page legend and the geolocation provider are
//! all reached through traits so the same controller drives a browser page,
//! a headless recording surface or a test double.
//!
//! The [`feed`] module carries the producer side: a restaurant search client
//! and a realtime location store that together turn a device location into
//! marker inputs.

pub mod core;
#[cfg(feature = "tokio-runtime")]
pub mod feed;
pub mod input;
pub mod layers;
pub mod prelude;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod traits;
pub mod ui;
#[cfg(feature = "wasm")]
pub mod web;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{restaurant_categories, MapOptions, MapProfile},
    geo::{LatLng, LatLngBounds},
    map::{CenterState, EventOutcome, MapMarkerController, MapState},
};

pub use layers::{
    animation::AnimationManager,
    category::{CategoryStore, Icon, MarkerStorage},
    marker::{Location, Marker, MarkerAnimation, MarkerId},
};

pub use input::{
    args::{MarkerRequest, PositionalMarkerArgs},
    events::SurfaceEvent,
    touch::TouchScrollPassthrough,
};

pub use traits::{GeolocationError, GeolocationProvider, MarkerMapSurface, PageDom};

pub use ui::{
    page::StaticPage,
    popup::{render_popup_content, Popup},
    surface::RecordingSurface,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Location is missing required field: {0}")]
    MissingLocationField(&'static str),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("No markers to fit bounds around")]
    NoMarkers,

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status}: {url}")]
    Upstream { status: u16, url: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl MapError {
    /// Whether repeating the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            MapError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            MapError::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

