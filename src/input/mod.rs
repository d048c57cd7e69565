pub mod args;
pub mod events;
pub mod touch;

pub use args::{MarkerRequest, PositionalMarkerArgs};
pub use events::{SurfaceEvent, TouchEventType};
pub use touch::TouchScrollPassthrough;
