//! Seams between the marker widget and its host
//!
//! The controller never talks to a concrete map engine, page or device API.
//! Hosts implement these traits: a browser binding, the headless
//! [`RecordingSurface`](crate::ui::surface::RecordingSurface) and
//! [`StaticPage`](crate::ui::page::StaticPage), or a test double.

use crate::{
    core::{
        config::SurfaceOptions,
        geo::{LatLng, LatLngBounds},
    },
    layers::marker::{MarkerAnimation, MarkerId, MarkerOptions},
    Result,
};
use async_trait::async_trait;

/// Map rendering surface driven by the controller.
pub trait MarkerMapSurface {
    /// Apply centre, zoom, controls and style
    fn apply_options(&mut self, options: &SurfaceOptions);

    /// Render a marker and hand back its handle. Fails when the surface
    /// cannot draw the marker, e.g. because the icon is malformed.
    fn add_marker(&mut self, options: &MarkerOptions) -> Result<MarkerId>;

    fn set_marker_visible(&mut self, marker: MarkerId, visible: bool);

    /// Start or (with `None`) stop a marker animation
    fn set_marker_animation(&mut self, marker: MarkerId, animation: Option<MarkerAnimation>);

    fn open_popup(&mut self, marker: MarkerId, content: &str);

    fn close_popup(&mut self, marker: MarkerId);

    fn set_center(&mut self, center: LatLng);

    /// Fit the viewport around the given box
    fn fit_bounds(&mut self, bounds: &LatLngBounds);
}

/// The page around the map: the category legend and the location fragment.
pub trait PageDom {
    /// Category labels of every tagged legend element in document order,
    /// duplicates included.
    fn category_tags(&self) -> Vec<String>;

    /// Whether any tagged legend element is currently displayed. Hidden
    /// legends indicate a mobile layout.
    fn any_category_tag_visible(&self) -> bool;

    /// Toggle the active marker class on every element tagged with `label`
    fn toggle_active(&mut self, label: &str);

    /// The location fragment including its leading `#`, or empty.
    fn location_hash(&self) -> String;
}

/// Why the device location could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("geolocation is not supported")]
    Unsupported,
    #[error("geolocation permission denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    Unavailable(String),
    #[error("geolocation request timed out")]
    Timeout,
}

/// Asynchronous device location lookup.
#[async_trait(?Send)]
pub trait GeolocationProvider {
    async fn current_position(&self) -> std::result::Result<LatLng, GeolocationError>;
}

/// A provider that always answers with the same position, or always fails.
#[derive(Debug, Clone)]
pub struct FixedGeolocation(pub std::result::Result<LatLng, GeolocationError>);

#[async_trait(?Send)]
impl GeolocationProvider for FixedGeolocation {
    async fn current_position(&self) -> std::result::Result<LatLng, GeolocationError> {
        self.0.clone()
    }
}

/// Delay before retry `attempt` (zero-based) under a fixed or doubling policy.
pub fn backoff_delay(
    attempt: u32,
    retry_delay_ms: u64,
    exponential_backoff: bool,
) -> std::time::Duration {
    let multiplier = if exponential_backoff {
        2_u64.saturating_pow(attempt)
    } else {
        1
    };
    std::time::Duration::from_millis(retry_delay_ms.saturating_mul(multiplier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_backoff_delay() {
        assert_eq!(backoff_delay(0, 500, true), Duration::from_millis(500));
        assert_eq!(backoff_delay(2, 500, true), Duration::from_millis(2000));
        assert_eq!(backoff_delay(2, 500, false), Duration::from_millis(500));
    }

    #[test]
    fn test_fixed_geolocation() {
        let located = FixedGeolocation(Ok(LatLng::new(-37.8, 144.9)));
        let denied = FixedGeolocation(Err(GeolocationError::PermissionDenied));

        let position = futures::executor::block_on(located.current_position());
        assert_eq!(position, Ok(LatLng::new(-37.8, 144.9)));

        let failure = futures::executor::block_on(denied.current_position());
        assert_eq!(failure, Err(GeolocationError::PermissionDenied));
    }
}
