use crate::geometry::{Coord, Dim};
use crate::mapper::PageArea;
use crate::units::Pt;
use crate::LayoutError;

/// Space left empty around the body of a page
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins::trbl(value, value, value, value)
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: Pt, horizontal: Pt) -> Margins {
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    /// The part of a page of `page_size` inside the margins. Fails if the
    /// margins leave no room.
    pub fn body_area(&self, page_size: Dim) -> Result<PageArea, LayoutError> {
        let dim = Dim::new(
            page_size.width - self.left - self.right,
            page_size.height - self.top - self.bottom,
        )?;
        Ok(PageArea::new(Coord::new(self.left, self.bottom), dim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize::LETTER;

    #[test]
    fn body_sits_inside_the_margins() {
        let body = Margins::trbl(Pt(10.0), Pt(20.0), Pt(30.0), Pt(40.0))
            .body_area(LETTER)
            .unwrap();
        assert_eq!(body.bottom_left, Coord::new(Pt(40.0), Pt(30.0)));
        assert_eq!(body.width(), Pt(612.0 - 60.0));
        assert_eq!(body.top(), Pt(792.0 - 10.0));
    }

    #[test]
    fn oversized_margins_are_rejected() {
        assert!(Margins::all(Pt(400.0)).body_area(LETTER).unwrap_err().is_invalid_argument());
    }
}
