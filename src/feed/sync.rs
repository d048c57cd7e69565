use crate::{
    core::{
        geo::LatLng,
        map::{MapMarkerController, MapState},
    },
    feed::{
        search::{RestaurantRecord, RestaurantSource},
        store::LocationStore,
    },
    layers::marker::{Location, MarkerId},
    prelude::Arc,
    runtime::{spawn, AsyncHandle},
    traits::{MarkerMapSurface, PageDom},
    MapError, Result,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A marker the map side should place for one restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerInput {
    /// Lower-cased cuisines; the first registered one becomes the category
    pub categories: Vec<String>,
    pub lat: f64,
    pub lng: f64,
    pub location: Location,
}

impl From<&RestaurantRecord> for MarkerInput {
    fn from(record: &RestaurantRecord) -> Self {
        Self {
            categories: record.cuisines.clone(),
            lat: record.position.lat,
            lng: record.position.lng,
            location: record.location.clone(),
        }
    }
}

impl MarkerInput {
    /// Places the marker under its first registered cuisine. A restaurant
    /// with no registered cuisine is still drawn, uncategorized.
    ///
    /// Before the first render categorized markers start hidden for the
    /// initial filter to reveal; afterwards they follow the visibility of
    /// their category. Uncategorized markers are shown straight away since
    /// no legend toggle reaches them.
    pub fn apply<S: MarkerMapSurface, D: PageDom>(
        &self,
        map: &mut MapMarkerController<S, D>,
    ) -> Result<MarkerId> {
        let position = LatLng::new(self.lat, self.lng);
        let ready = map.state() != MapState::Uninitialized;

        let category = self
            .categories
            .iter()
            .find(|category| map.categories().contains(category));

        match category {
            Some(category) => {
                let visible = ready
                    && map
                        .markers()
                        .find(|marker| marker.category() == Some(category.as_str()))
                        .map_or(true, |marker| marker.is_visible());
                map.create_marker(category, position, &self.location, visible, None)?;
            }
            None => {
                log::debug!(
                    "no registered category among {:?} for '{}'",
                    self.categories,
                    self.location.name
                );
                map.create_uncategorized_marker(position, &self.location, true, None)?;
            }
        }

        map.last_marker().ok_or(MapError::NoMarkers)
    }
}

/// Fans restaurants near the published location out to the store and the map.
#[derive(Clone)]
pub struct RestaurantSync {
    store: Arc<dyn LocationStore>,
    source: Arc<dyn RestaurantSource>,
}

impl RestaurantSync {
    pub fn new(store: Arc<dyn LocationStore>, source: Arc<dyn RestaurantSource>) -> Self {
        Self { store, source }
    }

    /// Searches around `near` once, storing every usable restaurant under
    /// its id.
    pub async fn sync_at(&self, near: LatLng) -> Result<Vec<MarkerInput>> {
        let restaurants = self.source.search(near).await?;
        let mut inputs = Vec::with_capacity(restaurants.len());

        for restaurant in &restaurants {
            let Some(record) = RestaurantRecord::from_restaurant(restaurant) else {
                log::warn!(
                    "skipping restaurant {:?} ('{}'): missing id, name or coordinates",
                    restaurant.id,
                    restaurant.name
                );
                continue;
            };
            self.store.put_restaurant(&record.id, &record).await?;
            inputs.push(MarkerInput::from(&record));
        }

        log::info!(
            "synced {} of {} restaurants near {:?}",
            inputs.len(),
            restaurants.len(),
            near
        );
        Ok(inputs)
    }

    /// Syncs around the stored location, if there is one.
    pub async fn sync_current(&self) -> Result<Vec<MarkerInput>> {
        match self.store.location().await? {
            Some(location) => self.sync_at(location).await,
            None => {
                log::info!("no location published yet");
                Ok(Vec::new())
            }
        }
    }

    /// Syncs on every location update until the store stops publishing or
    /// the receiving side goes away. Failed batches are logged and skipped.
    pub async fn run(&self, batches: mpsc::UnboundedSender<Vec<MarkerInput>>) {
        let mut updates = self.store.watch_location();

        while let Some(location) = updates.next().await {
            match self.sync_at(location).await {
                Ok(inputs) => {
                    if batches.send(inputs).is_err() {
                        log::debug!("marker input receiver dropped, stopping sync");
                        break;
                    }
                }
                Err(e) => log::error!("restaurant sync near {:?} failed: {}", location, e),
            }
        }
    }

    /// Runs [`RestaurantSync::run`] in the background. Cancelling the
    /// handle stops the loop.
    pub fn spawn(self) -> (Box<dyn AsyncHandle>, mpsc::UnboundedReceiver<Vec<MarkerInput>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = spawn(async move { self.run(sender).await });
        (handle, receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::config::MapOptions,
        layers::category::Icon,
        ui::{page::StaticPage, surface::RecordingSurface},
    };

    fn input(categories: &[&str]) -> MarkerInput {
        MarkerInput {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            lat: 29.76,
            lng: -95.42,
            location: Location::named("Otto's"),
        }
    }

    fn map() -> MapMarkerController<RecordingSurface, StaticPage> {
        MapMarkerController::new(RecordingSurface::new(), StaticPage::new(), MapOptions::default())
    }

    #[test]
    fn test_apply_uses_first_registered_cuisine() {
        let mut map = map();
        map.register_category("american", Icon::new("/a.png", (50, 33)))
            .register_category("bbq", Icon::new("/b.png", (50, 33)));

        let id = input(&["steakhouse", "bbq", "american"]).apply(&mut map).unwrap();
        assert_eq!(map.marker(id).unwrap().category(), Some("bbq"));
        assert!(!map.marker(id).unwrap().is_visible());
    }

    #[test]
    fn test_apply_unmatched_cuisine_is_uncategorized() {
        let mut map = map();
        map.register_category("thai", Icon::new("/t.png", (50, 33)));

        let id = input(&["american"]).apply(&mut map).unwrap();
        assert_eq!(map.markers().count(), 1);
        assert_eq!(map.marker(id).unwrap().category(), None);
        assert!(map.marker(id).unwrap().is_visible());
        assert!(map.surface().marker(id).unwrap().options.icon.is_none());
    }

    #[test]
    fn test_apply_flat_map() {
        let mut map = map();
        let id = input(&["american"]).apply(&mut map).unwrap();
        assert_eq!(map.marker(id).unwrap().category(), None);
        assert!(!map.categories().is_categorized());
    }
}
