pub mod page;
pub mod popup;
pub mod surface;

pub use page::{LegendItem, StaticPage};
pub use popup::{directions_destination, render_popup_content, Popup};
pub use surface::{RecordingSurface, RenderedMarker, SurfaceCall};
