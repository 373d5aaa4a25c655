use crate::geometry::{Coord, Dim};
use crate::layout::ScaledImage;
use crate::mapper::{PageArea, PageIndexMapping};
use crate::style::{LineStyle, TextStyle};
use crate::{Colour, LayoutError, Pt};

/// Whether a render pass only measures or really draws.
///
/// Measuring never creates pages or records drawing instructions, so it can
/// be repeated as often as needed. Both modes run exactly the same layout
/// code and therefore agree on every dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RenderMode {
    Measure,
    Draw,
}

impl RenderMode {
    pub fn is_draw(self) -> bool {
        self == RenderMode::Draw
    }
}

/// An inclusive range of page indices
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PageSpan {
    pub first: usize,
    pub last: usize,
}

impl PageSpan {
    pub fn single(page: usize) -> PageSpan {
        PageSpan {
            first: page,
            last: page,
        }
    }

    pub fn new(a: usize, b: usize) -> PageSpan {
        PageSpan {
            first: a.min(b),
            last: a.max(b),
        }
    }

    /// The smallest span covering both
    pub fn merge(self, other: PageSpan) -> PageSpan {
        PageSpan {
            first: self.first.min(other.first),
            last: self.last.max(other.last),
        }
    }

    pub fn contains(&self, page: usize) -> bool {
        self.first <= page && page <= self.last
    }

    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }
}

/// Folds `span` into an accumulator that may still be empty
pub(crate) fn extend_span(acc: &mut Option<PageSpan>, span: PageSpan) {
    *acc = Some(match acc.take() {
        Some(a) => a.merge(span),
        None => span,
    });
}

/// The height something really took (including any page-break adjustment)
/// and the page it landed on
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeightAndPage {
    pub height: Pt,
    pub page: usize,
}

impl HeightAndPage {
    pub fn with_width(self, width: Pt) -> DimAndPageNums {
        DimAndPageNums {
            dim: Dim {
                width,
                height: self.height,
            },
            pages: PageSpan::single(self.page),
        }
    }
}

/// The adjusted size of something that was rendered, and every page it touched
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DimAndPageNums {
    pub dim: Dim,
    pub pages: PageSpan,
}

/// Somewhere content can be rendered: a single fixed page, or a page
/// grouping that breaks onto new pages as needed.
///
/// All coordinates are in the target's own logical space. Draw operations
/// are no-ops in [RenderMode::Measure] apart from reporting sizes.
pub trait RenderTarget {
    /// The printable body, on the first page for a page grouping
    fn body(&self) -> PageArea;

    /// Where something with its bottom at `bottom_y` and `height` tall
    /// would land. Pure; never creates a page.
    fn mapping(&self, bottom_y: Pt, height: Pt, required_space_below: Pt) -> PageIndexMapping;

    /// Whether multi-line blocks should avoid leaving a single line alone on
    /// either side of a page break
    fn prevent_widows(&self) -> bool {
        false
    }

    /// The extra top margin needed to push something onto the next page if
    /// it won't fit on this one. Zero if it fits.
    fn page_breaking_top_margin(&self, bottom_y: Pt, height: Pt, required_space_below: Pt) -> Pt {
        self.mapping(bottom_y, height, required_space_below)
            .adjustment
    }

    fn page_num_for(&self, y: Pt) -> usize {
        self.mapping(y, Pt::ZERO, Pt::ZERO).page_index
    }

    fn draw_styled_text(
        &mut self,
        mode: RenderMode,
        baseline_left: Coord,
        text: &str,
        style: &TextStyle,
    ) -> Result<HeightAndPage, LayoutError>;

    fn draw_image(
        &mut self,
        mode: RenderMode,
        bottom_left: Coord,
        image: &ScaledImage,
    ) -> Result<HeightAndPage, LayoutError>;

    fn draw_line(
        &mut self,
        mode: RenderMode,
        start: Coord,
        end: Coord,
        style: &LineStyle,
    ) -> Result<(), LayoutError>;

    /// Draws a horizontal rule from `start` to `end_x` along the top of
    /// something that extends below it. A page-breaking target puts a rule
    /// that is exactly on a page boundary at the top of the page below.
    fn draw_top_edge(&mut self, mode: RenderMode, start: Coord, end_x: Pt, style: &LineStyle) -> Result<(), LayoutError> {
        self.draw_line(mode, start, start.with_x(end_x), style)
    }

    /// Draws connected segments through `points`
    fn draw_line_strip(
        &mut self,
        mode: RenderMode,
        points: &[Coord],
        style: &LineStyle,
    ) -> Result<(), LayoutError> {
        for pair in points.windows(2) {
            self.draw_line(mode, pair[0], pair[1], style)?;
        }
        Ok(())
    }

    /// Draws a closed polygon through `points`
    fn draw_line_loop(
        &mut self,
        mode: RenderMode,
        points: &[Coord],
        style: &LineStyle,
    ) -> Result<(), LayoutError>;

    fn fill_rect(
        &mut self,
        mode: RenderMode,
        bottom_left: Coord,
        dim: Dim,
        colour: Colour,
    ) -> Result<DimAndPageNums, LayoutError>;
}
