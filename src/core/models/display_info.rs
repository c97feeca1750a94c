use super::ScreenRegion;

/// A capturable display, in logical coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayInfo {
    pub id: u32,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
    pub is_primary: bool,
}

impl DisplayInfo {
    pub fn bounds(&self) -> ScreenRegion {
        ScreenRegion::new(self.x, self.y, self.width, self.height)
    }

    /// Native pixel size of a frame captured from this display.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width as f64 * self.scale_factor).floor() as u32,
            (self.height as f64 * self.scale_factor).floor() as u32,
        )
    }

    pub fn to_global(&self, local_x: f32, local_y: f32) -> (i32, i32) {
        (
            self.x + local_x.round() as i32,
            self.y + local_y.round() as i32,
        )
    }
}

/// Picks the display backing a capture: the primary one, else the first.
pub fn select_capture_display(displays: &[DisplayInfo]) -> Option<&DisplayInfo> {
    displays
        .iter()
        .find(|display| display.is_primary)
        .or_else(|| displays.first())
}
