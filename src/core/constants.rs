//! Widget-wide defaults and conventions shared with the host page.
//! Keeping them in a single place makes it easier to tweak the magic values.

/// Default map centre: approximate visual centre of populated Australia.
pub const DEFAULT_CENTER: (f64, f64) = (-31.5, 133.416667);

/// Zoom level when the map first loads.
pub const DEFAULT_ZOOM: f64 = 5.0;

/// How long an entrance animation plays when a category is revealed.
pub const REVEAL_ANIMATION_MS: u64 = 1400;

/// Attribute carrying a category label on legend elements.
pub const CATEGORY_ATTRIBUTE: &str = "data-location-category";

/// Class toggled on legend elements whose category is toggled.
pub const ACTIVE_CLASS: &str = "active";

/// A URL consisting only of this scheme placeholder is treated as absent.
pub const PLACEHOLDER_URL: &str = "http://";

/// Destination prefix for the "get directions" popup link.
pub const DIRECTIONS_URL: &str = "https://maps.google.com?daddr=";

/// Class wrapping the action links at the bottom of a popup.
pub const POPUP_ACTIONS_CLASS: &str = "google-map-infowindow-actions";

/// Restaurant preset: centre used on mobile layouts.
pub const RESTAURANT_MOBILE_CENTER: (f64, f64) = (29.7325483, -95.5512395);

/// Restaurant preset: zoom used on mobile layouts.
pub const RESTAURANT_MOBILE_ZOOM: f64 = 9.0;

/// Restaurant preset cuisine labels, in legend order.
pub const RESTAURANT_CATEGORIES: [&str; 8] = [
    "american",
    "mexican",
    "chinese",
    "indian",
    "japanese",
    "korean",
    "vietnamese",
    "thai",
];

/// Restaurant preset icon size in pixels.
pub const RESTAURANT_ICON_SIZE: (u32, u32) = (50, 33);

/// Anchor inside the restaurant icon (hot-spot) in pixel coords.
pub const RESTAURANT_ICON_ANCHOR: (u32, u32) = (25, 33);
