use crate::input::events::TouchEventType;

/// Turns vertical swipes over a non-draggable map into page scrolling.
///
/// With dragging disabled on touch devices the map would otherwise swallow
/// the gesture and trap the user inside a full-screen map. Feed every touch
/// over the map element through [`TouchScrollPassthrough::handle`] and
/// scroll the page by the returned amount.
#[derive(Debug, Clone, Default)]
pub struct TouchScrollPassthrough {
    dragging: bool,
    last_y: f64,
}

impl TouchScrollPassthrough {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one touch event at page coordinate `page_y` and returns the
    /// vertical scroll to apply, if any.
    pub fn handle(&mut self, event: TouchEventType, page_y: f64) -> Option<f64> {
        match event {
            TouchEventType::Start => {
                self.dragging = true;
                self.last_y = page_y;
                None
            }
            TouchEventType::Move if self.dragging => {
                let delta = self.last_y - page_y;
                self.last_y = page_y;
                (delta != 0.0).then_some(delta)
            }
            TouchEventType::Move => None,
            TouchEventType::End | TouchEventType::Cancel => {
                self.dragging = false;
                None
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}
