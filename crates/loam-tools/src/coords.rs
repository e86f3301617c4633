//! Parsers for coordinate arguments.

use loam_map::{Point, Rect};

/// Parse `x0,y0,x1,y1` into an inclusive tile rectangle.
pub fn parse_rect(s: &str) -> Result<Rect, String> {
    match parse_ints(s).as_deref() {
        Some(&[x0, y0, x1, y1]) => Ok(Rect::new(x0, y0, x1, y1)),
        _ => Err(format!("invalid rectangle: {s}")),
    }
}

/// Parse `x,y` into a tile point.
pub fn parse_point(s: &str) -> Result<Point, String> {
    match parse_ints(s).as_deref() {
        Some(&[x, y]) => Ok(Point::new(x, y)),
        _ => Err(format!("invalid tile coordinates: {s}")),
    }
}

fn parse_ints(s: &str) -> Option<Vec<i32>> {
    s.split(',')
        .map(|part| part.trim().parse().ok())
        .collect()
}
