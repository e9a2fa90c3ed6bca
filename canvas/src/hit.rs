#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HIT_SLOP_PX;
use crate::primitive::{Enclosure, Line, PatternShape, Point};

/// Whether `pt` falls inside (or within slop of) a circle or oval.
#[must_use]
pub fn hits_enclosure(pt: Point, e: &Enclosure) -> bool {
    match e {
        Enclosure::Circle(c) => pt.distance(Point::new(c.x, c.y)) <= c.radius + HIT_SLOP_PX,
        Enclosure::Oval(o) => {
            let nx = (pt.x - o.x) / (o.radius_x + HIT_SLOP_PX);
            let ny = (pt.y - o.y) / (o.radius_y + HIT_SLOP_PX);
            nx * nx + ny * ny <= 1.0
        }
    }
}

/// Whether `pt` is within slop of the line segment.
#[must_use]
pub fn hits_line(pt: Point, line: &Line) -> bool {
    distance_to_segment(pt, line.start(), line.end()) <= HIT_SLOP_PX
}

/// Whether `pt` falls inside the square extent of a pattern shape.
///
/// `size` is treated as the half-extent around the shape center.
#[must_use]
pub fn hits_shape(pt: Point, s: &PatternShape) -> bool {
    let reach = s.size + HIT_SLOP_PX;
    (pt.x - s.x).abs() <= reach && (pt.y - s.y).abs() <= reach
}

/// Index of the topmost item hit by `pt`. Later items are drawn on top.
pub fn topmost<T>(items: &[T], pt: Point, hits: impl Fn(Point, &T) -> bool) -> Option<usize> {
    items.iter().rposition(|item| hits(pt, item))
}

/// Shortest distance from `pt` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(pt: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return pt.distance(a);
    }
    let t = (((pt.x - a.x) * dx + (pt.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    pt.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
