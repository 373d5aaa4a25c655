use crate::error::{non_negative, LayoutError};
use crate::units::*;

/// A point in document units. y grows upwards, so moving "down" the page
/// means subtracting from y.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Coord {
    pub x: Pt,
    pub y: Pt,
}

impl Coord {
    pub fn new<X: Into<Pt>, Y: Into<Pt>>(x: X, y: Y) -> Coord {
        Coord {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn with_x(self, x: Pt) -> Coord {
        Coord { x, y: self.y }
    }

    pub fn with_y(self, y: Pt) -> Coord {
        Coord { x: self.x, y }
    }

    pub fn plus_x(self, dx: Pt) -> Coord {
        Coord {
            x: self.x + dx,
            y: self.y,
        }
    }

    pub fn minus_y(self, dy: Pt) -> Coord {
        Coord {
            x: self.x,
            y: self.y - dy,
        }
    }

    pub fn plus_x_minus_y(self, dx: Pt, dy: Pt) -> Coord {
        Coord {
            x: self.x + dx,
            y: self.y - dy,
        }
    }
}

/// Width and height of something, in document units. Never negative.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Dim {
    pub width: Pt,
    pub height: Pt,
}

impl Dim {
    pub const ZERO: Dim = Dim {
        width: Pt(0.0),
        height: Pt(0.0),
    };

    /// Creates a dimension, rejecting negative widths or heights
    pub fn new<W: Into<Pt>, H: Into<Pt>>(width: W, height: H) -> Result<Dim, LayoutError> {
        Ok(Dim {
            width: non_negative("width", width.into())?,
            height: non_negative("height", height.into())?,
        })
    }

    pub fn with_width(self, width: Pt) -> Dim {
        Dim {
            width,
            height: self.height,
        }
    }

    pub fn with_height(self, height: Pt) -> Dim {
        Dim {
            width: self.width,
            height,
        }
    }

    /// Swaps width and height (portrait <-> landscape)
    pub fn swap_wh(self) -> Dim {
        Dim {
            width: self.height,
            height: self.width,
        }
    }

    /// Stacks dimensions vertically: the widest width and the summed heights
    pub fn sum<I: IntoIterator<Item = Dim>>(dims: I) -> Dim {
        dims.into_iter().fold(Dim::ZERO, |acc, d| Dim {
            width: acc.width.max(d.width),
            height: acc.height + d.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_dimensions_are_rejected() {
        assert!(Dim::new(Pt(-1.0), Pt(2.0)).is_err());
        let err = Dim::new(Pt(1.0), Pt(-2.0)).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn stacked_dims_sum_heights() {
        let d = Dim::sum([
            Dim::new(Pt(10.0), Pt(3.0)).unwrap(),
            Dim::new(Pt(20.0), Pt(4.0)).unwrap(),
        ]);
        assert_eq!(d, Dim::new(Pt(20.0), Pt(7.0)).unwrap());
    }

    #[test]
    fn coords_move_down_the_page() {
        let c = Coord::new(Pt(5.0), Pt(100.0)).plus_x_minus_y(Pt(1.0), Pt(10.0));
        assert_eq!(c, Coord::new(Pt(6.0), Pt(90.0)));
    }
}
