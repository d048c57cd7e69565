use crate::{
    core::geo::LatLng, feed::store::LocationStore, prelude::Arc, traits::GeolocationProvider,
    MapError, Result,
};

/// Publishes the device location for the sync side to pick up.
#[derive(Clone)]
pub struct LocationPublisher {
    store: Arc<dyn LocationStore>,
}

impl LocationPublisher {
    pub fn new(store: Arc<dyn LocationStore>) -> Self {
        Self { store }
    }

    pub async fn publish(&self, location: LatLng) -> Result<()> {
        if !location.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "{}, {}",
                location.lat, location.lng
            )));
        }
        self.store.set_location(location).await
    }

    /// Looks the device up and publishes where it is. A failed lookup is
    /// logged and publishes nothing.
    pub async fn publish_from(&self, provider: &dyn GeolocationProvider) -> Result<Option<LatLng>> {
        match provider.current_position().await {
            Ok(location) => {
                self.publish(location).await?;
                Ok(Some(location))
            }
            Err(e) => {
                log::warn!("not publishing, device location unavailable: {}", e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        feed::store::MemoryStore,
        traits::{FixedGeolocation, GeolocationError},
    };

    #[tokio::test]
    async fn test_publish_from_provider() {
        let store = Arc::new(MemoryStore::new());
        let publisher = LocationPublisher::new(store.clone());

        let located = FixedGeolocation(Ok(LatLng::new(29.73, -95.55)));
        assert_eq!(
            publisher.publish_from(&located).await.unwrap(),
            Some(LatLng::new(29.73, -95.55))
        );
        assert_eq!(store.location().await.unwrap(), Some(LatLng::new(29.73, -95.55)));

        let denied = FixedGeolocation(Err(GeolocationError::PermissionDenied));
        assert_eq!(publisher.publish_from(&denied).await.unwrap(), None);
        assert_eq!(store.location().await.unwrap(), Some(LatLng::new(29.73, -95.55)));
    }

    #[tokio::test]
    async fn test_rejects_invalid_location() {
        let publisher = LocationPublisher::new(Arc::new(MemoryStore::new()));
        assert!(matches!(
            publisher.publish(LatLng::new(120.0, 0.0)).await,
            Err(MapError::InvalidCoordinates(_))
        ));
    }
}
