//! Prelude module for common catmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use catmap::prelude::*;`

pub use crate::core::{
    config::{MapOptions, MapProfile, SurfaceOptions},
    geo::{LatLng, LatLngBounds},
    map::{CenterState, EventOutcome, MapMarkerController, MapState},
};

pub use crate::layers::{
    animation::AnimationManager,
    category::{CategoryStore, Icon, MarkerStorage},
    marker::{Location, Marker, MarkerAnimation, MarkerId, MarkerOptions},
};

pub use crate::input::{
    args::{Arg, MarkerRequest, PositionalMarkerArgs},
    events::{SurfaceEvent, TouchEventType},
    touch::TouchScrollPassthrough,
};

pub use crate::traits::{GeolocationError, GeolocationProvider, MarkerMapSurface, PageDom};

pub use crate::ui::{page::StaticPage, popup::render_popup_content, surface::RecordingSurface};

#[cfg(feature = "tokio-runtime")]
pub use crate::feed::{
    LocationPublisher, LocationStore, MarkerInput, MemoryStore, RestStore, RestaurantSource,
    RestaurantSync, ZomatoClient,
};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::{spawn, AsyncHandle};

pub use crate::{MapError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::FxHashMap as HashMap;

#[cfg(feature = "tokio-runtime")]
pub use futures::Future;

