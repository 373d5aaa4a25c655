use super::line::wrap_lines;
use super::wrap::{LineWrappable, LineWrapper, SingleItemWrapper, Wrapped};
use crate::error::non_negative;
use crate::geometry::{Coord, Dim};
use crate::style::{CellStyle, HAlign};
use crate::target::{extend_span, DimAndPageNums, PageSpan, RenderMode, RenderTarget};
use crate::{LayoutError, Pt};
use std::rc::Rc;

/// A box of a fixed width holding content that is flowed into lines.
///
/// The box may have padding, a background and a border on each side. Its
/// height follows from the content.
#[derive(Debug)]
pub struct Cell {
    style: CellStyle,
    width: Pt,
    contents: Vec<Box<dyn LineWrappable>>,
    required_space_below: Pt,
}

impl Cell {
    pub fn new(style: CellStyle, width: Pt, contents: Vec<Box<dyn LineWrappable>>) -> Result<Cell, LayoutError> {
        Ok(Cell {
            style,
            width: non_negative("cell width", width)?,
            contents,
            required_space_below: Pt::ZERO,
        })
    }

    /// Adds content after whatever is already in the cell
    pub fn with<W: LineWrappable + 'static>(mut self, content: W) -> Cell {
        self.contents.push(Box::new(content));
        self
    }

    /// Keeps the cell together and starts it on a new page if it would leave
    /// less than `space` free at the bottom of the page
    pub fn with_required_space_below(self, space: Pt) -> Result<Cell, LayoutError> {
        Ok(Cell {
            required_space_below: non_negative("required space below", space)?,
            ..self
        })
    }

    pub fn style(&self) -> &CellStyle {
        &self.style
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    /// Flows the contents into lines that fit inside the padding and border
    pub fn wrap(&self) -> Result<WrappedCell, LayoutError> {
        let box_style = &self.style.box_style;
        let inner_width = (self.width - box_style.left_right_interior()).max(Pt::ZERO);
        let lines = wrap_lines(&self.contents, inner_width)?;
        let block = Dim::sum(lines.iter().map(|line| line.dim()));
        Ok(WrappedCell {
            style: self.style,
            dim: Dim {
                width: self.width,
                height: block.height + box_style.top_bottom_interior(),
            },
            block,
            lines,
            required_space_below: self.required_space_below,
        })
    }
}

impl LineWrappable for Cell {
    fn line_wrapper(&self) -> Box<dyn LineWrapper + '_> {
        Box::new(SingleItemWrapper::new(self.width, move || {
            Ok(Rc::new(self.wrap()?) as Rc<dyn Wrapped>)
        }))
    }
}

/// What rendering a cell produced
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CellRender {
    pub result: DimAndPageNums,
    /// The left end of the first line's baseline, after any page break
    pub first_baseline: Option<Coord>,
}

#[derive(Debug, Copy, Clone)]
struct PlacedLine {
    top: Pt,
    height: Pt,
    page: usize,
}

/// A cell whose contents have been flowed into lines
#[derive(Debug, Clone)]
pub struct WrappedCell {
    style: CellStyle,
    dim: Dim,
    /// The lines stacked together, without padding or border
    block: Dim,
    lines: Vec<Rc<dyn Wrapped>>,
    required_space_below: Pt,
}

impl WrappedCell {
    pub fn style(&self) -> &CellStyle {
        &self.style
    }

    pub fn lines(&self) -> &[Rc<dyn Wrapped>] {
        &self.lines
    }

    fn line_left(&self, inner_left: Pt, line: &dyn Wrapped) -> Pt {
        inner_left + self.style.align.left_offset(self.block.width, line.dim().width)
    }

    fn justify_width(&self, index: usize, inner_width: Pt) -> Pt {
        if self.style.align.horizontal == HAlign::Justify && index + 1 < self.lines.len() {
            inner_width
        } else {
            Pt::ZERO
        }
    }

    /// Measures where each line lands when line `i` is first moved down by
    /// `gaps[i]`
    fn place_lines(
        &self,
        target: &mut dyn RenderTarget,
        inner_top_left: Coord,
        inner_width: Pt,
        gaps: &[Pt],
    ) -> Result<Vec<PlacedLine>, LayoutError> {
        let mut y = inner_top_left.y;
        let mut placed = Vec::with_capacity(self.lines.len());
        for (i, (line, gap)) in self.lines.iter().zip(gaps).enumerate() {
            y -= *gap;
            let at = Coord {
                x: self.line_left(inner_top_left.x, line.as_ref()),
                y,
            };
            let rendered = line.render(target, at, RenderMode::Measure, self.justify_width(i, inner_width))?;
            placed.push(PlacedLine {
                top: y,
                height: rendered.dim.height,
                page: rendered.pages.first,
            });
            y -= rendered.dim.height;
        }
        Ok(placed)
    }

    /// Places the lines below `outer_top_left`. With `prevent_widows`, lines
    /// are moved down until no page break leaves a single line of the cell
    /// on either side of it.
    fn settle_lines(
        &self,
        target: &mut dyn RenderTarget,
        outer_top_left: Coord,
        inner_dim: Dim,
        prevent_widows: bool,
    ) -> Result<(Coord, Vec<PlacedLine>), LayoutError> {
        let box_style = self.style.box_style;
        let inner_top_left = self
            .style
            .align
            .inner_top_left(inner_dim, self.block, box_style.apply_top_left(outer_top_left));

        let mut gaps = vec![Pt::ZERO; self.lines.len()];
        let mut placed = self.place_lines(target, inner_top_left, inner_dim.width, &gaps)?;
        if prevent_widows {
            let body_bottom = target.body().bottom();
            for _ in 0..self.lines.len() {
                let push = match lonely_line(&placed) {
                    Some(push) => push,
                    None => break,
                };
                let height = self.lines[push].dim().height;
                let mapping = target.mapping(placed[push].top - height, height, Pt::ZERO);
                let gap = mapping.y + height - body_bottom;
                if gap <= Pt::ZERO {
                    break;
                }
                log::debug!(
                    "moving line {} of {} down {} so it isn't left alone at a page break",
                    push + 1,
                    self.lines.len(),
                    gap
                );
                gaps[push] += gap;
                placed = self.place_lines(target, inner_top_left, inner_dim.width, &gaps)?;
            }
        }
        Ok((inner_top_left, placed))
    }

    /// The top of the first line's page, when page breaks carried that line
    /// past the page the box starts on
    fn followed_top(&self, target: &dyn RenderTarget, top: Pt, placed: &[PlacedLine]) -> Option<Pt> {
        let (first, line) = placed.first().zip(self.lines.first())?;
        if first.page <= target.page_num_for(top) {
            return None;
        }
        let height = line.dim().height;
        let mapping = target.mapping(first.top - height, height, Pt::ZERO);
        let line_top = first.top - mapping.adjustment;
        let page_top = line_top + target.body().top() - (mapping.y + height);
        (page_top < top).then_some(page_top)
    }

    /// Renders the cell at least `min_height` tall.
    ///
    /// Lines are measured first so that the background and border can be
    /// drawn to the height the lines really take once page breaks are
    /// accounted for. If the first line ends up on a later page than the top
    /// of the box, the whole box follows it there.
    pub fn render_custom(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        min_height: Pt,
        mode: RenderMode,
        prevent_widows: bool,
    ) -> Result<CellRender, LayoutError> {
        let box_style = self.style.box_style;

        let adjustment = if self.required_space_below > Pt::ZERO {
            target.page_breaking_top_margin(top_left.y - self.dim.height, self.dim.height, self.required_space_below)
        } else {
            Pt::ZERO
        };
        let mut top = top_left.y - adjustment;

        let final_dim = self.dim.with_height(self.dim.height.max(min_height));
        let inner_dim = box_style.subtract_from(final_dim);
        let (mut inner_top_left, mut placed) =
            self.settle_lines(target, top_left.with_y(top), inner_dim, prevent_widows)?;
        if let Some(page_top) = self.followed_top(&*target, top, &placed) {
            log::debug!("moving a cell down {} to start with its first line", top - page_top);
            top = page_top;
            (inner_top_left, placed) = self.settle_lines(target, top_left.with_y(top), inner_dim, prevent_widows)?;
        }
        let outer_top_left = top_left.with_y(top);

        let content_bottom = placed
            .last()
            .map_or(inner_top_left.y, |line| line.top - line.height);
        let bottom = (content_bottom - box_style.interior_bottom()).min(top_left.y - final_dim.height);
        let left = top_left.x;
        let right = left + final_dim.width;

        let mut pages = None;
        if let Some(colour) = box_style.background {
            let fill = target.fill_rect(
                mode,
                Coord { x: left, y: bottom },
                Dim {
                    width: final_dim.width,
                    height: top - bottom,
                },
                colour,
            )?;
            extend_span(&mut pages, fill.pages);
        }

        let mut first_baseline = None;
        for (i, (line, place)) in self.lines.iter().zip(placed.iter()).enumerate() {
            let at = Coord {
                x: self.line_left(inner_top_left.x, line.as_ref()),
                y: place.top,
            };
            let rendered = line.render(target, at, mode, self.justify_width(i, inner_dim.width))?;
            extend_span(&mut pages, rendered.pages);
            if i == 0 {
                let height = line.dim().height;
                let pushed = target.page_breaking_top_margin(place.top - height, height, Pt::ZERO);
                first_baseline = Some(at.minus_y(pushed + line.ascent()));
            }
        }

        let border = box_style.border;
        let top_right = Coord { x: right, y: top };
        let bottom_right = Coord { x: right, y: bottom };
        let bottom_left = Coord { x: left, y: bottom };
        if border.top.is_visible() {
            target.draw_top_edge(mode, outer_top_left, right, &border.top)?;
        }
        let sides = [
            (border.right, top_right, bottom_right),
            (border.bottom, bottom_right, bottom_left),
            (border.left, bottom_left, outer_top_left),
        ];
        for (style, start, end) in sides.iter() {
            if style.is_visible() {
                target.draw_line(mode, *start, *end, style)?;
            }
        }

        if self.lines.is_empty() {
            extend_span(&mut pages, PageSpan::single(target.page_num_for(top)));
        }
        let bottom_page = PageSpan::single(target.page_num_for(bottom));
        let pages = pages.map_or(bottom_page, |pages| pages.merge(bottom_page));

        Ok(CellRender {
            result: DimAndPageNums {
                dim: Dim {
                    width: final_dim.width,
                    height: top_left.y - bottom,
                },
                pages,
            },
            first_baseline,
        })
    }
}

/// Finds a line that a page break leaves alone, and returns the line that
/// has to move to the next page to fix it
fn lonely_line(placed: &[PlacedLine]) -> Option<usize> {
    let n = placed.len();
    let on_page = |page: usize| placed.iter().filter(|line| line.page == page).count();
    for i in 1..n {
        let prev = placed[i - 1].page;
        if prev == placed[i].page {
            continue;
        }
        let before = on_page(prev);
        if before == 1 {
            return Some(i - 1);
        }
        if i == n - 1 {
            // take one more line over, unless that leaves one behind
            return Some(if before == 2 { i - 2 } else { i - 1 });
        }
    }
    None
}

impl Wrapped for WrappedCell {
    fn dim(&self) -> Dim {
        self.dim
    }

    fn ascent(&self) -> Pt {
        self.dim.height
    }

    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        mode: RenderMode,
        _justify_width: Pt,
    ) -> Result<DimAndPageNums, LayoutError> {
        let prevent_widows = target.prevent_widows();
        self.render_custom(target, top_left, self.dim.height, mode, prevent_widows)
            .map(|rendered| rendered.result)
    }
}
