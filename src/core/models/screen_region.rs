use serde::{Deserialize, Serialize};

use crate::global_constants::MINIMUM_REGION_SIZE;

/// Rectangle in logical screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Physical-pixel rectangle inside a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRegion {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalizes two drag corners into a region. Returns `None` when either
    /// side is shorter than the minimum selectable size.
    pub fn from_corners(start: (i32, i32), end: (i32, i32)) -> Option<Self> {
        let x = start.0.min(end.0);
        let y = start.1.min(end.1);
        let width = start.0.abs_diff(end.0);
        let height = start.1.abs_diff(end.1);

        if width < MINIMUM_REGION_SIZE || height < MINIMUM_REGION_SIZE {
            log::debug!(
                "[SCREEN_REGION] discarding {}x{} selection, below minimum {}",
                width,
                height,
                MINIMUM_REGION_SIZE
            );
            return None;
        }

        Some(Self::new(x, y, width, height))
    }

    /// Converts the part of the region that lies on a display into native
    /// pixels of that display, flooring each component like the frame size.
    /// Returns `None` when the region does not touch the display at all.
    pub fn to_pixel_rect(
        &self,
        display_bounds: &ScreenRegion,
        scale_factor: f64,
    ) -> Option<PixelRect> {
        let visible = self.intersection(display_bounds)?;
        let relative_x = (visible.x - display_bounds.x) as f64;
        let relative_y = (visible.y - display_bounds.y) as f64;

        Some(PixelRect {
            x: (relative_x * scale_factor).floor() as u32,
            y: (relative_y * scale_factor).floor() as u32,
            width: (visible.width as f64 * scale_factor).floor() as u32,
            height: (visible.height as f64 * scale_factor).floor() as u32,
        })
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn intersection(&self, other: &ScreenRegion) -> Option<ScreenRegion> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return None;
        }

        Some(ScreenRegion::new(
            left,
            top,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

impl std::fmt::Display for ScreenRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes_reversed_drag() {
        let region = ScreenRegion::from_corners((300, 200), (100, 50)).unwrap();

        assert_eq!(region, ScreenRegion::new(100, 50, 200, 150));
    }

    #[test]
    fn test_from_corners_discards_narrow_selection() {
        assert!(ScreenRegion::from_corners((0, 0), (9, 400)).is_none());
        assert!(ScreenRegion::from_corners((0, 0), (400, 9)).is_none());
        assert!(ScreenRegion::from_corners((50, 50), (41, 10)).is_none());
    }

    #[test]
    fn test_from_corners_accepts_minimum_size() {
        let region = ScreenRegion::from_corners((0, 0), (10, 10));

        assert_eq!(region, Some(ScreenRegion::new(0, 0, 10, 10)));
    }

    #[test]
    fn test_from_corners_handles_negative_coordinates_on_left_display() {
        let region = ScreenRegion::from_corners((-1900, 100), (-1500, 400)).unwrap();

        assert_eq!(region, ScreenRegion::new(-1900, 100, 400, 300));
    }

    #[test]
    fn test_to_pixel_rect_applies_scale_factor() {
        let region = ScreenRegion::new(10, 20, 101, 51);

        let rect = region
            .to_pixel_rect(&ScreenRegion::new(0, 0, 1440, 900), 2.0)
            .unwrap();

        assert_eq!(
            rect,
            PixelRect {
                x: 20,
                y: 40,
                width: 202,
                height: 102
            }
        );
    }

    #[test]
    fn test_to_pixel_rect_floors_fractional_scale() {
        let region = ScreenRegion::new(3, 3, 11, 11);

        let rect = region
            .to_pixel_rect(&ScreenRegion::new(0, 0, 1280, 800), 1.5)
            .unwrap();

        assert_eq!(rect.x, 4);
        assert_eq!(rect.width, 16);
    }

    #[test]
    fn test_to_pixel_rect_is_relative_to_display_origin() {
        let region = ScreenRegion::new(1940, 30, 100, 100);

        let rect = region
            .to_pixel_rect(&ScreenRegion::new(1920, 0, 1920, 1080), 1.0)
            .unwrap();

        assert_eq!(rect.x, 20);
        assert_eq!(rect.y, 30);
    }

    #[test]
    fn test_to_pixel_rect_keeps_only_the_part_on_the_display() {
        let display = ScreenRegion::new(0, 0, 1920, 1080);
        let region = ScreenRegion::new(-200, 300, 350, 100);

        let rect = region.to_pixel_rect(&display, 1.0).unwrap();

        assert_eq!(
            rect,
            PixelRect {
                x: 0,
                y: 300,
                width: 150,
                height: 100
            }
        );
    }

    #[test]
    fn test_to_pixel_rect_clips_right_edge_at_scale() {
        let display = ScreenRegion::new(0, 0, 1440, 900);
        let region = ScreenRegion::new(1400, 850, 200, 200);

        let rect = region.to_pixel_rect(&display, 2.0).unwrap();

        assert_eq!(
            rect,
            PixelRect {
                x: 2800,
                y: 1700,
                width: 80,
                height: 100
            }
        );
    }

    #[test]
    fn test_to_pixel_rect_of_region_on_another_display_is_none() {
        let display = ScreenRegion::new(0, 0, 1920, 1080);
        let region = ScreenRegion::new(2000, 100, 300, 200);

        assert!(region.to_pixel_rect(&display, 1.0).is_none());
    }

    #[test]
    fn test_intersection_clips_to_overlap() {
        let display = ScreenRegion::new(0, 0, 1920, 1080);
        let selection = ScreenRegion::new(1800, 1000, 400, 300);

        let clipped = display.intersection(&selection).unwrap();

        assert_eq!(clipped, ScreenRegion::new(1800, 1000, 120, 80));
    }

    #[test]
    fn test_intersection_of_disjoint_regions_is_none() {
        let left = ScreenRegion::new(0, 0, 100, 100);
        let right = ScreenRegion::new(100, 0, 100, 100);

        assert!(left.intersection(&right).is_none());
    }
}
