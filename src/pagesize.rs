//! Pre-defined page sizes for common paper formats.
//!
//! All sizes are provided in portrait orientation where width ≤ height.
//! Use [`Orientation`](crate::pagesize::Orientation) to lay a page out in landscape.
//!
//! # Available Sizes
//!
//! ## North American
//! `LETTER`, `HALF_LETTER`, `JUNIOR_LEGAL`, `LEGAL`, `TABLOID`
//!
//! ## ISO A-Series
//! `A0` through `A6`
//!
//! # Example
//!
//! ```
//! use pdf_flow::pagesize::{Orientation, A4};
//!
//! let landscape = Orientation::Landscape.apply(A4);
//! assert!(landscape.width > landscape.height);
//! ```

use crate::geometry::Dim;
use crate::units::*;

/// Page dimensions in points.
pub type PageSize = Dim;

const fn size(width: f32, height: f32) -> PageSize {
    Dim {
        width: Pt(width),
        height: Pt(height),
    }
}

// north american sizes
pub const LETTER: PageSize = size(8.5 * 72.0, 11.0 * 72.0);
pub const HALF_LETTER: PageSize = size(5.5 * 72.0, 8.5 * 72.0);
pub const JUNIOR_LEGAL: PageSize = size(5.0 * 72.0, 8.0 * 72.0);
pub const LEGAL: PageSize = size(8.5 * 72.0, 13.0 * 72.0);
pub const TABLOID: PageSize = size(11.0 * 72.0, 17.0 * 72.0);

// iso a-series (converted from mm to points)
pub const A0: PageSize = size(841.0 * 72.0 / 25.4, 1189.0 * 72.0 / 25.4);
pub const A1: PageSize = size(594.0 * 72.0 / 25.4, 841.0 * 72.0 / 25.4);
pub const A2: PageSize = size(420.0 * 72.0 / 25.4, 594.0 * 72.0 / 25.4);
pub const A3: PageSize = size(297.0 * 72.0 / 25.4, 420.0 * 72.0 / 25.4);
pub const A4: PageSize = size(210.0 * 72.0 / 25.4, 297.0 * 72.0 / 25.4);
pub const A5: PageSize = size(148.0 * 72.0 / 25.4, 210.0 * 72.0 / 25.4);
pub const A6: PageSize = size(105.0 * 72.0 / 25.4, 148.0 * 72.0 / 25.4);

/// Which way round a page is printed
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// width ≤ height
    #[default]
    Portrait,
    /// width ≥ height
    Landscape,
}

impl Orientation {
    /// Returns the size turned to this orientation
    pub fn apply(self, size: PageSize) -> PageSize {
        let is_portrait = size.width <= size.height;
        match (self, is_portrait) {
            (Orientation::Portrait, true) | (Orientation::Landscape, false) => size,
            _ => size.swap_wh(),
        }
    }
}
