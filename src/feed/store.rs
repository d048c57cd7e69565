//! Shared location and restaurant records
//!
//! The publisher writes a single location record; the sync loop watches it
//! and files restaurants under their id. [`MemoryStore`] keeps everything in
//! process, [`RestStore`] talks to a realtime database over its REST API.

use crate::{
    core::geo::LatLng,
    feed::{
        check_status, config::RetryConfig, config::StoreConfig, search::RestaurantRecord,
        with_retry, HTTP_CLIENT,
    },
    runtime::async_delay,
    MapError, Result,
};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use indexmap::IndexMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;

#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn set_location(&self, location: LatLng) -> Result<()>;

    /// The current location, if one was ever published
    async fn location(&self) -> Result<Option<LatLng>>;

    /// The current location (when set) followed by every later change.
    fn watch_location(&self) -> BoxStream<'static, LatLng>;

    async fn put_restaurant(&self, id: &str, record: &RestaurantRecord) -> Result<()>;
}

/// In-process store backed by a watch channel.
#[derive(Debug)]
pub struct MemoryStore {
    location: watch::Sender<Option<LatLng>>,
    restaurants: Mutex<IndexMap<String, RestaurantRecord>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (location, _) = watch::channel(None);
        Self {
            location,
            restaurants: Mutex::new(IndexMap::new()),
        }
    }

    pub fn restaurant(&self, id: &str) -> Option<RestaurantRecord> {
        self.restaurants.lock().ok()?.get(id).cloned()
    }

    /// Stored restaurant ids in write order
    pub fn restaurant_ids(&self) -> Vec<String> {
        self.restaurants
            .lock()
            .map(|restaurants| restaurants.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn set_location(&self, location: LatLng) -> Result<()> {
        self.location.send_replace(Some(location));
        Ok(())
    }

    async fn location(&self) -> Result<Option<LatLng>> {
        Ok(*self.location.borrow())
    }

    fn watch_location(&self) -> BoxStream<'static, LatLng> {
        let receiver = self.location.subscribe();
        stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if first {
                let current = *receiver.borrow_and_update();
                if let Some(location) = current {
                    return Some((location, (receiver, false)));
                }
            }
            loop {
                receiver.changed().await.ok()?;
                let current = *receiver.borrow_and_update();
                if let Some(location) = current {
                    return Some((location, (receiver, false)));
                }
            }
        })
        .boxed()
    }

    async fn put_restaurant(&self, id: &str, record: &RestaurantRecord) -> Result<()> {
        let mut restaurants = self
            .restaurants
            .lock()
            .map_err(|_| MapError::Store("restaurant table lock poisoned".to_string()))?;
        restaurants.insert(id.to_string(), record.clone());
        Ok(())
    }
}

/// Realtime-database REST backend.
///
/// Records live at `{base_url}/{path}.json`; writes are `PUT`s and the
/// location is watched by polling.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    config: StoreConfig,
    retry: RetryConfig,
}

impl RestStore {
    pub fn new(config: StoreConfig, retry: RetryConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(MapError::Store("store base_url is not configured".to_string()));
        }
        Ok(Self {
            client: HTTP_CLIENT.clone(),
            config,
            retry,
        })
    }

    /// Endpoint for a record path, without the auth parameter.
    pub fn record_url(&self, path: &str) -> String {
        format!(
            "{}/{}.json",
            self.config.base_url.trim_end_matches('/'),
            path.trim_matches('/')
        )
    }

    fn auth_query(&self) -> Vec<(&'static str, &str)> {
        self.config
            .auth
            .as_deref()
            .map(|token| vec![("auth", token)])
            .unwrap_or_default()
    }

    async fn put_json<T: serde::Serialize + Sync>(&self, path: &str, value: &T) -> Result<()> {
        let url = self.record_url(path);
        let url = url.as_str();
        with_retry(&self.retry, "store write", move || async move {
            let response = self
                .client
                .put(url)
                .query(&self.auth_query())
                .json(value)
                .send()
                .await?;
            check_status(response)?;
            Ok::<_, MapError>(())
        })
        .await
    }

    async fn fetch_location(&self) -> Result<Option<LatLng>> {
        let url = self.record_url(&self.config.location_path);
        let url = url.as_str();
        with_retry(&self.retry, "store read", move || async move {
            let response = self
                .client
                .get(url)
                .query(&self.auth_query())
                .send()
                .await?;
            let location = check_status(response)?.json::<Option<LatLng>>().await?;
            Ok::<_, MapError>(location)
        })
        .await
    }
}

#[async_trait]
impl LocationStore for RestStore {
    async fn set_location(&self, location: LatLng) -> Result<()> {
        self.put_json(&self.config.location_path, &location).await?;
        log::info!("published location {:?}", location);
        Ok(())
    }

    async fn location(&self) -> Result<Option<LatLng>> {
        self.fetch_location().await
    }

    fn watch_location(&self) -> BoxStream<'static, LatLng> {
        let store = self.clone();
        let interval = Duration::from_millis(store.config.poll_interval_ms);

        stream::unfold((store, None, true), move |(store, last, first)| async move {
            let mut first = first;
            loop {
                if !first {
                    async_delay(interval).await;
                }
                first = false;

                match store.fetch_location().await {
                    Ok(Some(location)) if Some(location) != last => {
                        return Some((location, (store, Some(location), false)));
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("location poll failed: {}", e),
                }
            }
        })
        .boxed()
    }

    async fn put_restaurant(&self, id: &str, record: &RestaurantRecord) -> Result<()> {
        let path = format!("{}/{}", self.config.restaurants_path.trim_matches('/'), id);
        self.put_json(&path, record).await?;
        log::debug!("stored restaurant {}", id);
        Ok(())
    }
}
