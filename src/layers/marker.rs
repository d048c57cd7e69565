use crate::{core::geo::LatLng, layers::category::Icon, ui::popup::Popup, MapError, Result};
use serde::{Deserialize, Serialize};

/// Handle of a marker rendered on a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marker-{}", self.0)
    }
}

/// Entrance animations understood by map surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerAnimation {
    Bounce,
    Drop,
}

impl MarkerAnimation {
    /// Maps the numeric animation constants hosts pass around
    /// (`1` bounce, `2` drop). Anything else means no animation.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Bounce),
            2 => Some(Self::Drop),
            _ => None,
        }
    }
}

impl std::fmt::Display for MarkerAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerAnimation::Bounce => write!(f, "bounce"),
            MarkerAnimation::Drop => write!(f, "drop"),
        }
    }
}

/// Metadata describing the place a marker stands for.
///
/// Only `name` is required. The remaining fields feed the popup and the
/// directions link; `map` is a free-form address used when the structured
/// address is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suburb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
}

impl Location {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_address(
        mut self,
        address: impl Into<String>,
        suburb: impl Into<String>,
        state: impl Into<String>,
        postcode: impl Into<String>,
    ) -> Self {
        self.address = Some(address.into());
        self.suburb = Some(suburb.into());
        self.state = Some(state.into());
        self.postcode = Some(postcode.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.map = Some(map.into());
        self
    }

    /// Rejects locations a marker cannot be titled with.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MapError::MissingLocationField("name"));
        }
        Ok(())
    }
}

/// Everything a surface needs to draw a new marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions {
    pub position: LatLng,
    pub title: String,
    pub icon: Option<Icon>,
    pub visible: bool,
    pub animation: Option<MarkerAnimation>,
}

/// A positioned point on the map, optionally in a category.
#[derive(Debug, Clone)]
pub struct Marker {
    id: MarkerId,
    position: LatLng,
    title: String,
    category: Option<String>,
    visible: bool,
    popup: Popup,
}

impl Marker {
    pub fn new(id: MarkerId, position: LatLng, location: &Location) -> Self {
        Self {
            id,
            position,
            title: location.name.clone(),
            category: None,
            visible: false,
            popup: Popup::for_location(location),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn popup_mut(&mut self) -> &mut Popup {
        &mut self.popup
    }
}
