//! Placement of percentage coordinates inside a target region
//!
//! Both renderers place damage markers through [`map_to_region`]: the PDF
//! renderer against the fixed diagram rectangle in points, the HTML renderer
//! against [`Region::PERCENT`] so the result is a CSS percentage.

use incident_types::MarkerPoint;

/// Rectangle with a top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    /// The unit square scaled to 0..100, for relative (CSS) placement
    pub const PERCENT: Region = Region {
        origin_x: 0.0,
        origin_y: 0.0,
        width: 100.0,
        height: 100.0,
    };

    pub fn new(origin_x: f64, origin_y: f64, width: f64, height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    pub fn far_corner(&self) -> (f64, f64) {
        (self.origin_x + self.width, self.origin_y + self.height)
    }

    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        let (max_x, max_y) = self.far_corner();
        (self.origin_x..=max_x).contains(&x) && (self.origin_y..=max_y).contains(&y)
    }
}

/// Absolute position of a 0..100 percentage point inside `region`
///
/// No clamping: points are brought into range when a report is normalized.
pub fn map_to_region(point: MarkerPoint, region: &Region) -> (f64, f64) {
    (
        region.origin_x + (point.x / 100.0) * region.width,
        region.origin_y + (point.y / 100.0) * region.height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_and_far_corner() {
        let region = Region::new(100.0, 80.0, 400.0, 300.0);
        assert_eq!(map_to_region(MarkerPoint::new(0.0, 0.0), &region), region.origin());
        assert_eq!(
            map_to_region(MarkerPoint::new(100.0, 100.0), &region),
            (500.0, 380.0)
        );
    }

    #[test]
    fn test_centre() {
        let region = Region::new(100.0, 80.0, 400.0, 300.0);
        assert_eq!(
            map_to_region(MarkerPoint::new(50.0, 50.0), &region),
            (300.0, 230.0)
        );
    }

    #[test]
    fn test_percent_region_is_identity() {
        let point = MarkerPoint::new(12.5, 87.25);
        assert_eq!(map_to_region(point, &Region::PERCENT), (12.5, 87.25));
    }
}
