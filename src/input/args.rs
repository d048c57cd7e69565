//! Loosely typed marker arguments
//!
//! Markers described by page data attributes or JSON rows arrive as a
//! positional list where the leading category is optional. The typed
//! controller API has separate entry points for categorized and
//! uncategorized markers; this adapter decides which one a positional list
//! means. When the first two values both look like signed decimals the list
//! is read as starting at the latitude, so a category label that itself
//! looks numeric (say `"5"`) is taken for a coordinate.

use crate::{
    core::geo::LatLng,
    layers::marker::{Location, MarkerAnimation},
    MapError, Result,
};
use once_cell::sync::Lazy;
use regex::Regex;

static SIGNED_DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?[0-9]*(\.[0-9]+)?$").expect("signed decimal pattern is valid")
});

/// One positional value.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Null,
    Text(String),
    Number(f64),
    Flag(bool),
    Location(Location),
}

impl Arg {
    fn looks_numeric(&self) -> bool {
        match self {
            Arg::Text(text) => SIGNED_DECIMAL.is_match(text),
            Arg::Number(number) => SIGNED_DECIMAL.is_match(&number.to_string()),
            _ => false,
        }
    }

    fn as_coordinate(&self) -> Option<String> {
        match self {
            Arg::Text(text) => Some(text.clone()),
            Arg::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Arg::Text(text.to_string())
    }
}

impl From<f64> for Arg {
    fn from(number: f64) -> Self {
        Arg::Number(number)
    }
}

impl From<bool> for Arg {
    fn from(flag: bool) -> Self {
        Arg::Flag(flag)
    }
}

impl From<Location> for Arg {
    fn from(location: Location) -> Self {
        Arg::Location(location)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Arg::Null)
    }
}

/// A fully typed marker creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRequest {
    pub category: Option<String>,
    pub position: LatLng,
    pub location: Location,
    pub visible: bool,
    pub animation: Option<MarkerAnimation>,
}

/// Positional arguments: `[category], lat, lng, location, [visible], [animation]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionalMarkerArgs {
    args: Vec<Arg>,
}

impl PositionalMarkerArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Animation given as a host animation code (`1` bounce, `2` drop)
    pub fn animation_code(self, code: i64) -> Self {
        self.arg(Arg::Number(code as f64))
    }

    fn slot(&self, index: usize) -> &Arg {
        self.args.get(index).unwrap_or(&Arg::Null)
    }

    /// Whether the list starts at the latitude rather than a category.
    pub fn is_uncategorized(&self) -> bool {
        self.slot(0).looks_numeric() && self.slot(1).looks_numeric()
    }

    pub fn resolve(&self) -> Result<MarkerRequest> {
        let shift = usize::from(!self.is_uncategorized());

        let category = if shift == 0 {
            None
        } else {
            match self.slot(0) {
                Arg::Null => None,
                Arg::Text(text) => Some(text.clone()),
                Arg::Number(number) => Some(number.to_string()),
                other => {
                    return Err(MapError::ParseError(format!(
                        "category must be text, got {other:?}"
                    )))
                }
            }
        };

        let lat = self.slot(shift).as_coordinate();
        let lng = self.slot(shift + 1).as_coordinate();
        let position = match (lat, lng) {
            (Some(lat), Some(lng)) => LatLng::parse(&lat, &lng)?,
            _ => {
                return Err(MapError::InvalidCoordinates(format!(
                    "{:?}, {:?}",
                    self.slot(shift),
                    self.slot(shift + 1)
                )))
            }
        };

        let location = match self.slot(shift + 2) {
            Arg::Location(location) => location.clone(),
            _ => return Err(MapError::MissingLocationField("name")),
        };

        let visible = matches!(self.slot(shift + 3), Arg::Flag(true));
        let animation = match self.slot(shift + 4) {
            Arg::Number(code) if code.fract() == 0.0 => MarkerAnimation::from_code(*code as i64),
            _ => None,
        };

        Ok(MarkerRequest {
            category,
            position,
            location,
            visible,
            animation,
        })
    }
}
