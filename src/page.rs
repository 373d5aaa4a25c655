use crate::geometry::{Coord, Dim};
use crate::layout::ScaledImage;
use crate::mapper::{PageArea, PageIndexMapping};
use crate::pagesize::Orientation;
use crate::style::{LineStyle, TextStyle};
use crate::target::{DimAndPageNums, HeightAndPage, PageSpan, RenderMode, RenderTarget};
use crate::{Colour, LayoutError, Pt};

/// A single drawing instruction, in page coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum PageItem {
    Text {
        baseline_left: Coord,
        text: String,
        style: TextStyle,
    },
    Image {
        bottom_left: Coord,
        image: ScaledImage,
    },
    /// An open polyline, or a closed polygon when `closed` is set
    Path {
        points: Vec<Coord>,
        style: LineStyle,
        closed: bool,
    },
    FillRect {
        bottom_left: Coord,
        dim: Dim,
        colour: Colour,
    },
}

/// One physical page and the drawing instructions placed on it, in the order
/// they were drawn (later items paint over earlier ones).
///
/// A `SinglePage` is also a [RenderTarget] in its own right: content drawn
/// onto it directly is never moved to another page. Everything drawn through
/// the target is shifted right by the page's x-offset.
#[derive(Clone, Debug, PartialEq)]
pub struct SinglePage {
    index: usize,
    size: Dim,
    orientation: Orientation,
    body: PageArea,
    x_offset: Pt,
    items: Vec<PageItem>,
}

impl SinglePage {
    pub fn new(index: usize, size: Dim, orientation: Orientation, body: PageArea) -> SinglePage {
        SinglePage {
            index,
            size,
            orientation,
            body,
            x_offset: Pt::ZERO,
            items: Vec::default(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The page size, already turned to the page's orientation
    pub fn size(&self) -> Dim {
        self.size
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// How far content drawn on this page is moved to the right
    pub fn x_offset(&self) -> Pt {
        self.x_offset
    }

    pub(crate) fn set_x_offset(&mut self, x_offset: Pt) {
        self.x_offset = x_offset;
    }

    pub fn items(&self) -> &[PageItem] {
        &self.items
    }

    pub(crate) fn push(&mut self, item: PageItem) {
        self.items.push(item);
    }

    fn shifted(&self, points: &[Coord]) -> Vec<Coord> {
        points.iter().map(|point| point.plus_x(self.x_offset)).collect()
    }

    fn here(&self, height: Pt) -> HeightAndPage {
        HeightAndPage {
            height,
            page: self.index,
        }
    }
}

impl RenderTarget for SinglePage {
    fn body(&self) -> PageArea {
        self.body
    }

    fn mapping(&self, bottom_y: Pt, _height: Pt, _required_space_below: Pt) -> PageIndexMapping {
        PageIndexMapping {
            page_index: self.index,
            y: bottom_y,
            adjustment: Pt::ZERO,
        }
    }

    fn draw_styled_text(
        &mut self,
        mode: RenderMode,
        baseline_left: Coord,
        text: &str,
        style: &TextStyle,
    ) -> Result<HeightAndPage, LayoutError> {
        if mode.is_draw() {
            self.push(PageItem::Text {
                baseline_left: baseline_left.plus_x(self.x_offset),
                text: text.to_string(),
                style: style.clone(),
            });
        }
        Ok(self.here(style.line_height()))
    }

    fn draw_image(
        &mut self,
        mode: RenderMode,
        bottom_left: Coord,
        image: &ScaledImage,
    ) -> Result<HeightAndPage, LayoutError> {
        if mode.is_draw() {
            self.push(PageItem::Image {
                bottom_left: bottom_left.plus_x(self.x_offset),
                image: image.clone(),
            });
        }
        Ok(self.here(image.dim().height))
    }

    fn draw_line(
        &mut self,
        mode: RenderMode,
        start: Coord,
        end: Coord,
        style: &LineStyle,
    ) -> Result<(), LayoutError> {
        self.draw_line_strip(mode, &[start, end], style)
    }

    fn draw_line_strip(
        &mut self,
        mode: RenderMode,
        points: &[Coord],
        style: &LineStyle,
    ) -> Result<(), LayoutError> {
        if mode.is_draw() && style.is_visible() && points.len() > 1 {
            self.push(PageItem::Path {
                points: self.shifted(points),
                style: *style,
                closed: false,
            });
        }
        Ok(())
    }

    fn draw_line_loop(
        &mut self,
        mode: RenderMode,
        points: &[Coord],
        style: &LineStyle,
    ) -> Result<(), LayoutError> {
        if mode.is_draw() && style.is_visible() && points.len() > 1 {
            self.push(PageItem::Path {
                points: self.shifted(points),
                style: *style,
                closed: true,
            });
        }
        Ok(())
    }

    fn fill_rect(
        &mut self,
        mode: RenderMode,
        bottom_left: Coord,
        dim: Dim,
        colour: Colour,
    ) -> Result<DimAndPageNums, LayoutError> {
        if mode.is_draw() {
            self.push(PageItem::FillRect {
                bottom_left: bottom_left.plus_x(self.x_offset),
                dim,
                colour,
            });
        }
        Ok(DimAndPageNums {
            dim,
            pages: PageSpan::single(self.index),
        })
    }
}
