use crate::backend::Backend;
use crate::geometry::{Coord, Dim};
use crate::layout::{LineComposer, LineWrappable, ScaledImage, Wrapped};
use crate::mapper::{PageArea, PageIndexMapping, PageMapper};
use crate::pagesize::Orientation;
use crate::session::DocumentSession;
use crate::style::{LineStyle, TextStyle};
use crate::target::{extend_span, DimAndPageNums, HeightAndPage, PageSpan, RenderMode, RenderTarget};
use crate::{Colour, LayoutError, Pt};

/// A run of pages sharing one layout, which content flows through from top
/// to bottom.
///
/// Content is placed on a single tall logical canvas; the grouping works out
/// which page each piece lands on and creates pages as they are first drawn
/// on. Measuring never creates pages. Committing consumes the grouping, so a
/// committed grouping can't be drawn on again.
pub struct PageGrouping<'s, B: Backend> {
    session: &'s mut DocumentSession<B>,
    mapper: PageMapper,
    orientation: Orientation,
    prevent_widows: bool,
    cursor: Pt,
}

impl<'s, B: Backend> PageGrouping<'s, B> {
    pub(crate) fn new(
        session: &'s mut DocumentSession<B>,
        mapper: PageMapper,
        orientation: Orientation,
        prevent_widows: bool,
    ) -> PageGrouping<'s, B> {
        PageGrouping {
            session,
            cursor: mapper.body().top(),
            mapper,
            orientation,
            prevent_widows,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Where the next appended content will start, on the logical canvas
    pub fn cursor(&self) -> Pt {
        self.cursor
    }

    pub fn first_page(&self) -> usize {
        self.mapper.first_page()
    }

    /// The pages drawn on so far
    pub fn page_count(&self) -> usize {
        self.session.page_count().saturating_sub(self.mapper.first_page())
    }

    /// Flows `content` into lines as wide as the body and draws them below
    /// everything appended so far
    pub fn append(&mut self, content: &dyn LineWrappable) -> Result<DimAndPageNums, LayoutError> {
        self.append_all(&[content])
    }

    /// Like [PageGrouping::append], but lets several pieces of content share
    /// lines, e.g. runs of text in different styles
    pub fn append_all(&mut self, contents: &[&dyn LineWrappable]) -> Result<DimAndPageNums, LayoutError> {
        let body = self.mapper.body();
        let mut composer = LineComposer::new(body.width())?;
        for content in contents.iter() {
            composer.add(*content)?;
        }
        let lines = composer.finish();

        let start = self.cursor;
        let mut pages = None;
        for line in lines.iter() {
            let rendered = self.add(Coord::new(body.left(), self.cursor), line.as_ref())?;
            self.cursor -= rendered.dim.height;
            extend_span(&mut pages, rendered.pages);
        }
        Ok(DimAndPageNums {
            dim: Dim {
                width: body.width(),
                height: start - self.cursor,
            },
            pages: pages.unwrap_or_else(|| PageSpan::single(self.page_num_for(start))),
        })
    }

    /// Draws an already wrapped item with its top-left corner at `top_left`.
    /// Doesn't move the cursor.
    pub fn add(&mut self, top_left: Coord, item: &dyn Wrapped) -> Result<DimAndPageNums, LayoutError> {
        item.render(self, top_left, RenderMode::Draw, Pt::ZERO)
    }

    /// Draws an already wrapped item at the cursor and moves the cursor below it
    pub fn append_wrapped(&mut self, item: &dyn Wrapped) -> Result<DimAndPageNums, LayoutError> {
        let top_left = Coord::new(self.mapper.body().left(), self.cursor);
        let rendered = self.add(top_left, item)?;
        self.cursor -= rendered.dim.height;
        Ok(rendered)
    }

    /// How much room `item` would take at `top_left`, page breaks included
    pub fn measure(&mut self, top_left: Coord, item: &dyn Wrapped) -> Result<DimAndPageNums, LayoutError> {
        item.render(self, top_left, RenderMode::Measure, Pt::ZERO)
    }

    /// Finishes the grouping, handing each of its pages to the backend
    pub fn commit(self) -> Result<Vec<Vec<u8>>, LayoutError> {
        let pages = self.mapper.first_page()..self.session.page_count();
        log::debug!("committing pages {:?} of a page grouping", pages);
        self.session.commit_range(pages)
    }

    fn local(&self, point: Coord) -> (usize, Coord) {
        let mapping = self.mapper.calc_page(point.y, Pt::ZERO, Pt::ZERO);
        (mapping.page_index, point.with_y(mapping.y))
    }

    /// Maps every point, or `None` if they don't all land on one page
    fn local_on_one_page(&self, points: &[Coord]) -> Option<(usize, Vec<Coord>)> {
        let mut page = None;
        let mut local = Vec::with_capacity(points.len());
        for point in points.iter() {
            let (index, at) = self.local(*point);
            if *page.get_or_insert(index) != index {
                return None;
            }
            local.push(at);
        }
        page.map(|page| (page, local))
    }
}

impl<B: Backend> RenderTarget for PageGrouping<'_, B> {
    fn body(&self) -> PageArea {
        self.mapper.body()
    }

    fn mapping(&self, bottom_y: Pt, height: Pt, required_space_below: Pt) -> PageIndexMapping {
        self.mapper.calc_page(bottom_y, height, required_space_below)
    }

    fn prevent_widows(&self) -> bool {
        self.prevent_widows
    }

    fn draw_styled_text(
        &mut self,
        mode: RenderMode,
        baseline_left: Coord,
        text: &str,
        style: &TextStyle,
    ) -> Result<HeightAndPage, LayoutError> {
        let below = style.descent_and_leading();
        let height = style.line_height();
        let mapping = self.mapper.calc_page(baseline_left.y - below, height, Pt::ZERO);
        if mode.is_draw() {
            let page = self.session.page_for_drawing(mapping.page_index, self.orientation)?;
            page.draw_styled_text(mode, baseline_left.with_y(mapping.y + below), text, style)?;
        }
        Ok(HeightAndPage {
            height: height + mapping.adjustment,
            page: mapping.page_index,
        })
    }

    fn draw_image(
        &mut self,
        mode: RenderMode,
        bottom_left: Coord,
        image: &ScaledImage,
    ) -> Result<HeightAndPage, LayoutError> {
        let height = image.dim().height;
        let mapping = self.mapper.calc_page(bottom_left.y, height, Pt::ZERO);
        if mode.is_draw() {
            let page = self.session.page_for_drawing(mapping.page_index, self.orientation)?;
            page.draw_image(mode, bottom_left.with_y(mapping.y), image)?;
        }
        Ok(HeightAndPage {
            height: height + mapping.adjustment,
            page: mapping.page_index,
        })
    }

    fn draw_line(
        &mut self,
        mode: RenderMode,
        start: Coord,
        end: Coord,
        style: &LineStyle,
    ) -> Result<(), LayoutError> {
        if !mode.is_draw() || !style.is_visible() {
            return Ok(());
        }
        for slice in self.mapper.split_line(start, end) {
            let page = self.session.page_for_drawing(slice.page_index, self.orientation)?;
            page.draw_line(mode, slice.start, slice.end, style)?;
        }
        Ok(())
    }

    fn draw_top_edge(&mut self, mode: RenderMode, start: Coord, end_x: Pt, style: &LineStyle) -> Result<(), LayoutError> {
        if !mode.is_draw() || !style.is_visible() {
            return Ok(());
        }
        let mapping = self.mapper.calc_top_edge(start.y);
        let page = self.session.page_for_drawing(mapping.page_index, self.orientation)?;
        let start = start.with_y(mapping.y);
        page.draw_line(mode, start, start.with_x(end_x), style)
    }

    fn draw_line_strip(
        &mut self,
        mode: RenderMode,
        points: &[Coord],
        style: &LineStyle,
    ) -> Result<(), LayoutError> {
        if !mode.is_draw() || !style.is_visible() {
            return Ok(());
        }
        match self.local_on_one_page(points) {
            Some((index, local)) => {
                let page = self.session.page_for_drawing(index, self.orientation)?;
                page.draw_line_strip(mode, &local, style)
            }
            None => {
                for pair in points.windows(2) {
                    self.draw_line(mode, pair[0], pair[1], style)?;
                }
                Ok(())
            }
        }
    }

    /// A loop that crosses a page break can't be closed on any one page, so
    /// it is drawn as an open strip back to its first point
    fn draw_line_loop(
        &mut self,
        mode: RenderMode,
        points: &[Coord],
        style: &LineStyle,
    ) -> Result<(), LayoutError> {
        if !mode.is_draw() || !style.is_visible() {
            return Ok(());
        }
        match self.local_on_one_page(points) {
            Some((index, local)) => {
                let page = self.session.page_for_drawing(index, self.orientation)?;
                page.draw_line_loop(mode, &local, style)
            }
            None => {
                let mut strip = points.to_vec();
                if let Some(first) = points.first() {
                    strip.push(*first);
                }
                self.draw_line_strip(mode, &strip, style)
            }
        }
    }

    fn fill_rect(
        &mut self,
        mode: RenderMode,
        bottom_left: Coord,
        dim: Dim,
        colour: Colour,
    ) -> Result<DimAndPageNums, LayoutError> {
        let slices = self.mapper.split_span(bottom_left.y + dim.height, bottom_left.y);
        if mode.is_draw() {
            for slice in slices.iter() {
                let page = self.session.page_for_drawing(slice.page_index, self.orientation)?;
                let part = Dim {
                    width: dim.width,
                    height: slice.top - slice.bottom,
                };
                page.fill_rect(mode, bottom_left.with_y(slice.bottom), part, colour)?;
            }
        }
        let first = slices.first().map_or(self.mapper.first_page(), |slice| slice.page_index);
        let last = slices.last().map_or(first, |slice| slice.page_index);
        Ok(DimAndPageNums {
            dim,
            pages: PageSpan::new(first, last),
        })
    }
}
