//=========================================================================
// Geometry
//=========================================================================
//
// Screen-space points and axis-aligned rectangles (top-left origin,
// y grows downward). Containment is half-open: the right and bottom
// edges are outside, so adjacent rectangles never share a pixel.
//
//=========================================================================

//=== Point ===============================================================

/// Screen-space position in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

//=== Rect ================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centred on `center`.
    pub fn from_center(center: Point, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns `true` if `point` lies inside (right/bottom edges excluded).
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Returns `true` if the two rectangles overlap by a non-zero area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns a copy moved by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_point_is_half_open() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);

        assert!(rect.contains_point(Point::new(10.0, 10.0)));
        assert!(rect.contains_point(Point::new(29.9, 29.9)));
        assert!(!rect.contains_point(Point::new(30.0, 15.0)));
        assert!(!rect.contains_point(Point::new(15.0, 30.0)));
        assert!(!rect.contains_point(Point::new(9.0, 15.0)));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(5.0, 5.0, 10.0, 10.0);

        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&b));
    }

    #[test]
    fn from_center_round_trips_center() {
        let rect = Rect::from_center(Point::new(400.0, 150.0), 200.0, 50.0);
        assert_eq!(rect.top_left(), Point::new(300.0, 125.0));
        assert_eq!(rect.center(), Point::new(400.0, 150.0));
    }
}
