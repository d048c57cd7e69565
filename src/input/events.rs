use crate::layers::marker::MarkerId;
use serde::{Deserialize, Serialize};

/// Events delivered to the controller by the map surface and the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// The surface finished rendering its tiles
    TilesLoaded,
    /// A marker was clicked or tapped
    MarkerClicked(MarkerId),
    /// A legend entry tagged with a category label was clicked
    LegendClicked(String),
}

/// Phases of a touch over the map element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchEventType {
    Start,
    Move,
    End,
    Cancel,
}
