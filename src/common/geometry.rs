//! Screen rectangles carried through snapshots and accessors.
//!
//! The engine never computes geometry itself; bounds are copied from the
//! layout model so the renderer can place separate and sliding windows.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool { self.width <= 0.0 || self.height <= 0.0 }
}

pub trait IsWithin {
    fn is_within(&self, how_much: f64, other: Self) -> bool;
}

impl IsWithin for f64 {
    fn is_within(&self, how_much: f64, other: Self) -> bool { (self - other).abs() < how_much }
}

impl IsWithin for Rect {
    fn is_within(&self, how_much: f64, other: Self) -> bool {
        self.x.is_within(how_much, other.x)
            && self.y.is_within(how_much, other.y)
            && self.width.is_within(how_much, other.width)
            && self.height.is_within(how_much, other.height)
    }
}

pub trait SameAs: IsWithin + Sized {
    fn same_as(&self, other: Self) -> bool { self.is_within(0.1, other) }
}

impl SameAs for Rect {}
