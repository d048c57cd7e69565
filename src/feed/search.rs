use crate::{
    core::geo::LatLng,
    feed::{check_status, config::RetryConfig, config::SearchConfig, with_retry, HTTP_CLIENT},
    layers::marker::Location,
    Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Anything that can list restaurants near a position.
#[async_trait]
pub trait RestaurantSource: Send + Sync {
    async fn search(&self, near: LatLng) -> Result<Vec<Restaurant>>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub restaurants: Vec<RestaurantEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantEntry {
    pub restaurant: Restaurant,
}

/// One search result as the upstream service describes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Restaurant {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub url: String,
    /// Comma separated cuisine names
    pub cuisines: String,
    pub location: RestaurantLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantLocation {
    pub address: String,
    pub locality: String,
    pub city: String,
    #[serde(deserialize_with = "string_or_number")]
    pub latitude: String,
    #[serde(deserialize_with = "string_or_number")]
    pub longitude: String,
    #[serde(deserialize_with = "string_or_number")]
    pub zipcode: String,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(serde_json::Number),
        Null,
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Text(text) => text,
        Repr::Number(number) => number.to_string(),
        Repr::Null => String::new(),
    })
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl Restaurant {
    /// Coordinates, when present. The service reports unknown positions as
    /// `0, 0`.
    pub fn position(&self) -> Option<LatLng> {
        let position = LatLng::parse(&self.location.latitude, &self.location.longitude).ok()?;
        (position.is_valid() && (position.lat != 0.0 || position.lng != 0.0)).then_some(position)
    }

    /// Lower-cased cuisine names in listed order.
    pub fn cuisine_list(&self) -> Vec<String> {
        self.cuisines
            .split(',')
            .filter_map(non_empty)
            .map(|cuisine| cuisine.to_lowercase())
            .collect()
    }

    pub fn to_location(&self) -> Location {
        Location {
            name: self.name.trim().to_string(),
            address: non_empty(&self.location.address),
            suburb: non_empty(&self.location.locality),
            state: non_empty(&self.location.city),
            postcode: non_empty(&self.location.zipcode),
            url: non_empty(&self.url),
            map: non_empty(&self.location.address),
        }
    }
}

/// What the sync loop stores for each restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub id: String,
    pub cuisines: Vec<String>,
    pub position: LatLng,
    pub location: Location,
}

impl RestaurantRecord {
    /// `None` when the restaurant has no name, id or usable coordinates.
    pub fn from_restaurant(restaurant: &Restaurant) -> Option<Self> {
        let id = non_empty(&restaurant.id)?;
        let location = restaurant.to_location();
        location.validate().ok()?;

        Some(Self {
            id,
            cuisines: restaurant.cuisine_list(),
            position: restaurant.position()?,
            location,
        })
    }
}

/// Client for the Zomato v2.1 search API.
#[derive(Debug, Clone)]
pub struct ZomatoClient {
    client: reqwest::Client,
    search: SearchConfig,
    retry: RetryConfig,
}

impl ZomatoClient {
    pub fn new(search: SearchConfig, retry: RetryConfig) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            search,
            retry,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.search.endpoint.trim_end_matches('/'))
    }

    /// Query string for a search around `near`.
    pub fn query(&self, near: LatLng) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("lat", near.lat.to_string()),
            ("lon", near.lng.to_string()),
            ("radius", self.search.radius.to_string()),
            ("sort", self.search.sort.clone()),
        ];
        if let Some(count) = self.search.count {
            query.push(("count", count.to_string()));
        }
        if !self.search.cuisines.is_empty() {
            query.push(("cuisines", self.search.cuisines.join(",")));
        }
        query
    }

    async fn search_once(&self, near: LatLng) -> Result<Vec<Restaurant>> {
        let response = self
            .client
            .get(self.search_url())
            .query(&self.query(near))
            .header(reqwest::header::ACCEPT, "application/json")
            .header("user-key", &self.search.api_key)
            .timeout(std::time::Duration::from_secs(self.search.timeout_secs))
            .send()
            .await?;

        let body: SearchResponse = check_status(response)?.json().await?;
        Ok(body.restaurants.into_iter().map(|entry| entry.restaurant).collect())
    }
}

#[async_trait]
impl RestaurantSource for ZomatoClient {
    async fn search(&self, near: LatLng) -> Result<Vec<Restaurant>> {
        if self.search.api_key.is_empty() {
            log::warn!("searching without an API key, expect the service to refuse");
        }

        let restaurants = with_retry(&self.retry, "restaurant search", move || self.search_once(near)).await?;
        log::info!("found {} restaurants near {:?}", restaurants.len(), near);
        Ok(restaurants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "results_found": 2,
        "restaurants": [
            {"restaurant": {
                "id": "16774318",
                "name": "Otto's Barbecue",
                "url": "https://www.zomato.com/houston/ottos",
                "cuisines": "American, BBQ",
                "location": {
                    "address": "5502 Memorial Dr, Houston 77007",
                    "locality": "Memorial",
                    "city": "Houston",
                    "latitude": "29.7628000000",
                    "longitude": "-95.4224000000",
                    "zipcode": "77007"
                }
            }},
            {"restaurant": {
                "id": 17,
                "name": "Nowhere Noodles",
                "cuisines": "Thai",
                "location": {"latitude": "0.0000000000", "longitude": "0.0000000000", "zipcode": null}
            }}
        ]
    }"#;

    fn sample() -> Vec<Restaurant> {
        let response: SearchResponse = serde_json::from_str(SAMPLE).unwrap();
        response.restaurants.into_iter().map(|e| e.restaurant).collect()
    }

    #[test]
    fn test_parse_search_response() {
        let restaurants = sample();
        assert_eq!(restaurants.len(), 2);
        assert_eq!(restaurants[0].id, "16774318");
        assert_eq!(restaurants[1].id, "17");
        assert_eq!(restaurants[0].cuisine_list(), vec!["american", "bbq"]);
        assert_eq!(restaurants[0].position(), Some(LatLng::new(29.7628, -95.4224)));
    }

    #[test]
    fn test_unknown_position_is_skipped() {
        let restaurants = sample();
        assert_eq!(restaurants[1].position(), None);
        assert!(RestaurantRecord::from_restaurant(&restaurants[1]).is_none());
    }

    #[test]
    fn test_record_location_fields() {
        let record = RestaurantRecord::from_restaurant(&sample()[0]).unwrap();
        assert_eq!(record.id, "16774318");
        assert_eq!(record.location.name, "Otto's Barbecue");
        assert_eq!(record.location.suburb.as_deref(), Some("Memorial"));
        assert_eq!(record.location.state.as_deref(), Some("Houston"));
        assert_eq!(record.location.postcode.as_deref(), Some("77007"));
        assert_eq!(record.location.map.as_deref(), Some("5502 Memorial Dr, Houston 77007"));
    }

    #[test]
    fn test_nameless_restaurant_is_skipped() {
        let mut restaurant = sample()[0].clone();
        restaurant.name = "  ".to_string();
        assert!(RestaurantRecord::from_restaurant(&restaurant).is_none());
    }

    #[test]
    fn test_query_parameters() {
        let client = ZomatoClient::new(
            SearchConfig {
                count: Some(20),
                cuisines: vec!["1".to_string(), "25".to_string()],
                ..SearchConfig::default()
            },
            RetryConfig::none(),
        );
        let query = client.query(LatLng::new(29.7325483, -95.5512395));

        assert_eq!(query[0], ("lat", "29.7325483".to_string()));
        assert_eq!(query[1], ("lon", "-95.5512395".to_string()));
        assert_eq!(query[2], ("radius", "10".to_string()));
        assert_eq!(query[3], ("sort", "real_distance".to_string()));
        assert_eq!(query[4], ("count", "20".to_string()));
        assert_eq!(query[5], ("cuisines", "1,25".to_string()));
        assert_eq!(client.search_url(), "https://developers.zomato.com/api/v2.1/search");
    }
}
