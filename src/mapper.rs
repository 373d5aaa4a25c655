//! Maps the unbounded logical y-axis of a page grouping onto physical pages.
//!
//! A page grouping lays content out on one tall canvas. The body of its first
//! page occupies `[bottom, top]` on that canvas; each following page's body
//! sits exactly one body-height further down. [PageMapper] translates a
//! logical position into a page index and a page-local y, nudging content
//! that would straddle a page boundary down onto the next page.

use crate::error::{non_negative, LayoutError};
use crate::geometry::{Coord, Dim};
use crate::Pt;

/// The printable body of a page: where its lower-left corner sits and how big
/// it is
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct PageArea {
    pub bottom_left: Coord,
    pub dim: Dim,
}

impl PageArea {
    pub fn new(bottom_left: Coord, dim: Dim) -> PageArea {
        PageArea { bottom_left, dim }
    }

    pub fn top(&self) -> Pt {
        self.bottom_left.y + self.dim.height
    }

    pub fn bottom(&self) -> Pt {
        self.bottom_left.y
    }

    pub fn left(&self) -> Pt {
        self.bottom_left.x
    }

    pub fn right(&self) -> Pt {
        self.bottom_left.x + self.dim.width
    }

    pub fn width(&self) -> Pt {
        self.dim.width
    }

    pub fn height(&self) -> Pt {
        self.dim.height
    }

    pub fn top_left(&self) -> Coord {
        Coord {
            x: self.left(),
            y: self.top(),
        }
    }
}

/// Where a candidate position really lands
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PageIndexMapping {
    /// The page the content belongs on
    pub page_index: usize,
    /// The bottom of the content in that page's coordinates
    pub y: Pt,
    /// How far the content had to be pushed down to fit entirely within
    /// the body. Zero when no push was needed.
    pub adjustment: Pt,
}

/// The part of a vertical span that falls on a single page, in page-local
/// coordinates
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PageSlice {
    pub page_index: usize,
    pub top: Pt,
    pub bottom: Pt,
}

/// The part of a line segment that falls on a single page, in page-local
/// coordinates
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineSlice {
    pub page_index: usize,
    pub start: Coord,
    pub end: Coord,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PageMapper {
    body: PageArea,
    first_page: usize,
}

impl PageMapper {
    /// A mapper whose logical canvas starts on page `first_page`
    pub fn new(body: PageArea, first_page: usize) -> Result<PageMapper, LayoutError> {
        non_negative("body width", body.width())?;
        if body.height() <= Pt::ZERO {
            return Err(LayoutError::EmptyPageBody);
        }
        Ok(PageMapper { body, first_page })
    }

    pub fn body(&self) -> PageArea {
        self.body
    }

    pub fn first_page(&self) -> usize {
        self.first_page
    }

    /// Finds the page for something whose bottom is at logical `bottom_y`
    /// and which is `height` tall.
    ///
    /// If `bottom_y - required_space_below` is below the body, the position
    /// moves down by whole pages in one step. If the content then pokes out
    /// of the top of the body it is clamped to the top, and the distance it
    /// moved is reported as the adjustment.
    pub fn calc_page(&self, bottom_y: Pt, height: Pt, required_space_below: Pt) -> PageIndexMapping {
        let body_bottom = self.body.bottom();
        let body_top = self.body.top();
        let body_height = self.body.height();

        let mut y = bottom_y;
        let mut page_index = self.first_page;

        let lowest = bottom_y - required_space_below;
        if lowest < body_bottom {
            let pages_behind = ((body_bottom - lowest) / body_height).ceil();
            y += body_height * pages_behind;
            page_index += pages_behind as usize;
        }

        let mut adjustment = Pt::ZERO;
        if y + height > body_top {
            let clamped = body_top - height;
            adjustment = y - clamped;
            y = clamped;
        }

        PageIndexMapping {
            page_index,
            y,
            adjustment,
        }
    }

    pub fn page_num_for(&self, y: Pt) -> usize {
        self.calc_page(y, Pt::ZERO, Pt::ZERO).page_index
    }

    /// Maps the top edge of something that extends down from `y`.
    ///
    /// A page boundary is both the bottom of one body and the top of the
    /// next. [PageMapper::calc_page] puts it at the bottom of the upper page;
    /// a top edge there belongs at the top of the lower one.
    pub fn calc_top_edge(&self, y: Pt) -> PageIndexMapping {
        let mapping = self.calc_page(y, Pt::ZERO, Pt::ZERO);
        if mapping.y > self.body.bottom() {
            return mapping;
        }
        PageIndexMapping {
            page_index: mapping.page_index + 1,
            y: self.body.top(),
            adjustment: Pt::ZERO,
        }
    }

    /// Splits the vertical span `[bottom_y, top_y]` at every page boundary
    /// it crosses. Slices are ordered top to bottom. A span that starts
    /// exactly on a boundary starts on the page below it.
    pub fn split_span(&self, top_y: Pt, bottom_y: Pt) -> Vec<PageSlice> {
        let top = self.calc_top_edge(top_y);
        let bottom = self.calc_page(bottom_y, Pt::ZERO, Pt::ZERO);

        (top.page_index..=bottom.page_index)
            .map(|page_index| PageSlice {
                page_index,
                top: if page_index == top.page_index {
                    top.y
                } else {
                    self.body.top()
                },
                bottom: if page_index == bottom.page_index {
                    bottom.y
                } else {
                    self.body.bottom()
                },
            })
            .collect()
    }

    /// Splits a line segment at every page boundary it crosses. Where a
    /// sloped segment crosses a boundary its x is interpolated along the
    /// original slope. Each slice keeps the direction of the original so
    /// consecutive segments still join end to start.
    pub fn split_line(&self, start: Coord, end: Coord) -> Vec<LineSlice> {
        let flip = end.y > start.y;
        let (high, low) = if flip { (end, start) } else { (start, end) };

        let hi = if high.y > low.y {
            self.calc_top_edge(high.y)
        } else {
            self.calc_page(high.y, Pt::ZERO, Pt::ZERO)
        };
        let lo = self.calc_page(low.y, Pt::ZERO, Pt::ZERO);

        let oriented = |page_index: usize, a: Coord, b: Coord| {
            if flip {
                LineSlice {
                    page_index,
                    start: b,
                    end: a,
                }
            } else {
                LineSlice {
                    page_index,
                    start: a,
                    end: b,
                }
            }
        };

        if hi.page_index == lo.page_index {
            return vec![oriented(hi.page_index, high.with_y(hi.y), low.with_y(lo.y))];
        }

        let x_diff = low.x - high.x;
        let y_diff = high.y - low.y;

        let mut slices = Vec::with_capacity(lo.page_index - hi.page_index + 1);
        let mut xa = high.x;
        for page_index in hi.page_index..=lo.page_index {
            let ya = if page_index == hi.page_index {
                hi.y
            } else {
                self.body.top()
            };
            let (xb, yb) = if page_index == lo.page_index {
                (low.x, lo.y)
            } else {
                let yb = self.body.bottom();
                (xa + x_diff * ((ya - yb) / y_diff), yb)
            };
            slices.push(oriented(page_index, Coord { x: xa, y: ya }, Coord { x: xb, y: yb }));
            xa = xb;
        }
        slices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // a 100pt tall body starting 50pt up the page
    fn mapper() -> PageMapper {
        let body = PageArea::new(
            Coord::new(Pt(20.0), Pt(50.0)),
            Dim::new(Pt(200.0), Pt(100.0)).unwrap(),
        );
        PageMapper::new(body, 0).unwrap()
    }

    fn close(a: Pt, b: Pt) -> bool {
        (a.0 - b.0).abs() < 0.001
    }

    #[test]
    fn positions_inside_the_body_stay_put() {
        let m = mapper().calc_page(Pt(60.0), Pt(20.0), Pt::ZERO);
        assert_eq!(m.page_index, 0);
        assert_eq!(m.y, Pt(60.0));
        assert_eq!(m.adjustment, Pt::ZERO);
    }

    #[test]
    fn positions_below_the_body_move_whole_pages() {
        // 250pt below the body bottom is 3 pages on
        let m = mapper().calc_page(Pt(-200.0), Pt(10.0), Pt::ZERO);
        assert_eq!(m.page_index, 3);
        assert!(close(m.y, Pt(100.0)));
        assert_eq!(m.adjustment, Pt::ZERO);
    }

    #[test]
    fn straddling_content_is_clamped_to_the_next_top() {
        // bottom 10pt below the body, 30pt tall: would straddle the break
        let m = mapper().calc_page(Pt(40.0), Pt(30.0), Pt::ZERO);
        assert_eq!(m.page_index, 1);
        assert!(close(m.y, Pt(120.0)));
        assert!(close(m.adjustment, Pt(20.0)));
    }

    #[test]
    fn required_space_below_pushes_early() {
        let mapper = mapper();
        let without = mapper.calc_page(Pt(60.0), Pt(20.0), Pt::ZERO);
        assert_eq!(without.page_index, 0);
        let with = mapper.calc_page(Pt(60.0), Pt(20.0), Pt(30.0));
        assert_eq!(with.page_index, 1);
        // top moves from logical 80 to the next body top at logical 50
        assert!(close(with.y, Pt(130.0)));
        assert!(close(with.adjustment, Pt(30.0)));
    }

    #[test]
    fn page_numbers_never_decrease_going_down() {
        let mapper = mapper();
        let mut last = 0;
        let mut y = 150.0;
        while y > -1000.0 {
            let page = mapper.page_num_for(Pt(y));
            assert!(page >= last, "page went backwards at y={y}");
            last = page;
            y -= 7.3;
        }
        assert!(last >= 10);
    }

    #[test]
    fn zero_height_bodies_are_rejected() {
        let body = PageArea::new(Coord::default(), Dim::new(Pt(10.0), Pt(0.0)).unwrap());
        assert!(PageMapper::new(body, 0).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn spans_split_at_each_boundary() {
        let slices = mapper().split_span(Pt(80.0), Pt(-80.0));
        assert_eq!(slices.len(), 3);
        assert_eq!((slices[0].page_index, slices[0].top, slices[0].bottom), (0, Pt(80.0), Pt(50.0)));
        assert_eq!((slices[1].top, slices[1].bottom), (Pt(150.0), Pt(50.0)));
        assert_eq!(slices[2].page_index, 2);
        assert!(close(slices[2].bottom, Pt(120.0)));
    }

    #[test]
    fn diagonal_lines_interpolate_across_pages() {
        // drops 200pt while moving 100pt right, crossing two boundaries
        let slices = mapper().split_line(Coord::new(Pt(0.0), Pt(100.0)), Coord::new(Pt(100.0), Pt(-100.0)));
        assert_eq!(slices.len(), 3);

        // 50pt drop on the first page: x advances by 25
        assert_eq!(slices[0].page_index, 0);
        assert_eq!(slices[0].start, Coord::new(Pt(0.0), Pt(100.0)));
        assert!(close(slices[0].end.x, Pt(25.0)));
        assert_eq!(slices[0].end.y, Pt(50.0));

        // a whole body on the second page: x advances by 50
        assert_eq!(slices[1].page_index, 1);
        assert!(close(slices[1].start.x, Pt(25.0)));
        assert_eq!(slices[1].start.y, Pt(150.0));
        assert!(close(slices[1].end.x, Pt(75.0)));

        assert_eq!(slices[2].page_index, 2);
        assert!(close(slices[2].start.x, Pt(75.0)));
        assert_eq!(slices[2].end.x, Pt(100.0));
        assert!(close(slices[2].end.y, Pt(100.0)));
    }

    #[test]
    fn top_edges_on_a_boundary_belong_to_the_page_below() {
        let mapper = mapper();
        assert_eq!(mapper.page_num_for(Pt(50.0)), 0);
        let edge = mapper.calc_top_edge(Pt(50.0));
        assert_eq!((edge.page_index, edge.y), (1, Pt(150.0)));
        let inside = mapper.calc_top_edge(Pt(60.0));
        assert_eq!((inside.page_index, inside.y), (0, Pt(60.0)));

        // nothing is left behind on the upper page
        let slices = mapper.split_span(Pt(50.0), Pt(20.0));
        assert_eq!(slices.len(), 1);
        assert_eq!((slices[0].page_index, slices[0].top, slices[0].bottom), (1, Pt(150.0), Pt(120.0)));
        let lines = mapper.split_line(Coord::new(Pt(0.0), Pt(50.0)), Coord::new(Pt(0.0), Pt(20.0)));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].page_index, 1);
        assert_eq!(lines[0].start.y, Pt(150.0));

        // a span ending on the boundary stays on the upper page
        let slices = mapper.split_span(Pt(80.0), Pt(50.0));
        assert_eq!(slices.len(), 1);
        assert_eq!((slices[0].page_index, slices[0].bottom), (0, Pt(50.0)));
    }

    #[test]
    fn upward_lines_keep_their_direction() {
        let slices = mapper().split_line(Coord::new(Pt(100.0), Pt(-100.0)), Coord::new(Pt(0.0), Pt(100.0)));
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].end, Coord::new(Pt(0.0), Pt(100.0)));
        assert_eq!(slices[2].start.x, Pt(100.0));
    }
}
