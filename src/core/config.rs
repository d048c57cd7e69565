//! Configuration for the map surface and the marker widget
//!
//! Options are resolved from presets the same way for every host: pick a
//! [`MapProfile`], resolve it to [`MapOptions`], then derive the concrete
//! [`SurfaceOptions`] handed to the map surface once the device is known.

use crate::{
    core::{constants, geo::LatLng},
    layers::category::Icon,
};
use serde::{Deserialize, Serialize};

/// Where a built-in map control is docked on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    LeftBottom,
    RightBottom,
    BottomCenter,
}

/// A single built-in control: shown or not, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ControlConfig {
    pub enabled: bool,
    pub position: Option<ControlPosition>,
}

impl ControlConfig {
    pub fn at(position: ControlPosition) -> Self {
        Self {
            enabled: true,
            position: Some(position),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            position: None,
        }
    }
}

/// Built-in controls of the map surface. `None` leaves the surface default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MapControls {
    pub map_type: Option<ControlConfig>,
    pub pan: Option<ControlConfig>,
    pub zoom: Option<ControlConfig>,
    pub street_view: Option<ControlConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    /// Where to centre the map on first load
    pub center: LatLng,
    /// Zoom level on first load
    pub zoom: f64,
    /// Mouse wheel zoom; also decides whether touch devices may drag the map
    pub scrollwheel: bool,
    /// Look-and-feel rules, passed through to the surface untouched
    pub style: Vec<serde_json::Value>,
    pub controls: MapControls,
    /// Re-centre on the device location once the map is ready
    pub use_geolocation: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: LatLng::new(constants::DEFAULT_CENTER.0, constants::DEFAULT_CENTER.1),
            zoom: constants::DEFAULT_ZOOM,
            scrollwheel: true,
            style: Vec::new(),
            controls: MapControls::default(),
            use_geolocation: false,
        }
    }
}

impl MapOptions {
    /// Options sent to the map surface when it is created.
    ///
    /// On touch devices with the scrollwheel disabled, dragging is switched
    /// off as well so the page can be scrolled past a full-screen map.
    pub fn surface_options(&self, touch_device: bool) -> SurfaceOptions {
        SurfaceOptions {
            center: self.center,
            zoom: self.zoom,
            scrollwheel: self.scrollwheel,
            draggable: !(touch_device && !self.scrollwheel),
            styles: if self.style.is_empty() {
                None
            } else {
                Some(self.style.clone())
            },
            controls: self.controls.clone(),
        }
    }
}

/// Concrete options applied to a map surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceOptions {
    pub center: LatLng,
    pub zoom: f64,
    pub scrollwheel: bool,
    pub draggable: bool,
    /// Only set when a non-empty style was configured
    pub styles: Option<Vec<serde_json::Value>>,
    pub controls: MapControls,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum MapProfile {
    #[default]
    Default,
    /// Restaurant finder: controls bottom right, legend top left
    Restaurant { mobile: bool },
    Custom(MapOptions),
}

impl MapProfile {
    pub fn resolve(&self) -> MapOptions {
        match self {
            Self::Default => MapOptions::default(),
            Self::Restaurant { mobile } => {
                let mut options = MapOptions {
                    controls: MapControls {
                        map_type: Some(ControlConfig::disabled()),
                        pan: Some(ControlConfig::at(ControlPosition::RightBottom)),
                        zoom: Some(ControlConfig::at(ControlPosition::RightBottom)),
                        street_view: Some(ControlConfig::at(ControlPosition::RightBottom)),
                    },
                    ..MapOptions::default()
                };
                if *mobile {
                    options.center = LatLng::new(
                        constants::RESTAURANT_MOBILE_CENTER.0,
                        constants::RESTAURANT_MOBILE_CENTER.1,
                    );
                    options.zoom = constants::RESTAURANT_MOBILE_ZOOM;
                }
                options
            }
            Self::Custom(options) => options.clone(),
        }
    }
}

/// The restaurant finder's cuisine categories, icons looked up under
/// `icon_dir` as `google-icon-<label>.png`.
pub fn restaurant_categories(icon_dir: &str) -> Vec<(String, Icon)> {
    constants::RESTAURANT_CATEGORIES
        .iter()
        .map(|label| {
            let icon = Icon::new(
                format!("{icon_dir}google-icon-{label}.png"),
                constants::RESTAURANT_ICON_SIZE,
            )
            .with_origin((0, 0))
            .with_anchor(constants::RESTAURANT_ICON_ANCHOR);
            (label.to_string(), icon)
        })
        .collect()
}
