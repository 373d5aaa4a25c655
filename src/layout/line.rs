//! Flowing content of mixed kinds into baseline-aligned lines.

use super::wrap::{ConTermNone, LineWrappable, Wrapped};
use crate::error::non_negative;
use crate::geometry::{Coord, Dim};
use crate::target::{extend_span, DimAndPageNums, PageSpan, RenderMode, RenderTarget};
use crate::{LayoutError, Pt};
use std::mem;
use std::rc::Rc;

/// The extra space to add after each space so that content `content_width`
/// wide fills `justify_width`.
///
/// Lines that are less than three quarters full are left alone.
pub(crate) fn justify_spacing(content_width: Pt, justify_width: Pt, spaces: usize) -> Option<Pt> {
    if justify_width <= Pt::ZERO
        || spaces == 0
        || content_width >= justify_width
        || content_width <= justify_width * 0.75
    {
        return None;
    }
    Some((justify_width - content_width) / spaces as f32)
}

/// The line currently being filled
#[derive(Default)]
struct LineBuilder {
    items: Vec<Rc<dyn Wrapped>>,
    width: Pt,
}

impl LineBuilder {
    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push(&mut self, item: Rc<dyn Wrapped>) {
        self.width += item.dim().width;
        self.items.push(item);
    }

    fn is_blank(&self) -> bool {
        self.items.iter().all(|item| item.is_blank())
    }

    /// Freezes the line. The last item loses its trailing whitespace, and a
    /// line holding a single item is that item.
    fn freeze(self) -> Rc<dyn Wrapped> {
        let mut items: Vec<Rc<dyn Wrapped>> = self.items.into_iter().filter(|item| !item.is_blank()).collect();
        if let Some(last) = items.pop() {
            items.push(last.without_trailing_space().unwrap_or(last));
        }
        if items.len() == 1 {
            if let Some(only) = items.pop() {
                return only;
            }
        }

        let mut ascent = Pt::ZERO;
        let mut descent_leading = Pt::ZERO;
        let mut width = Pt::ZERO;
        for item in items.iter() {
            let dim = item.dim();
            width += dim.width;
            ascent = ascent.max(item.ascent());
            descent_leading = descent_leading.max(dim.height - item.ascent());
        }
        Rc::new(Line {
            items,
            dim: Dim {
                width,
                height: ascent + descent_leading,
            },
            ascent,
        })
    }
}

/// Several items sharing a baseline
#[derive(Debug, Clone)]
pub struct Line {
    items: Vec<Rc<dyn Wrapped>>,
    dim: Dim,
    ascent: Pt,
}

impl Line {
    pub fn items(&self) -> &[Rc<dyn Wrapped>] {
        &self.items
    }
}

impl Wrapped for Line {
    fn dim(&self) -> Dim {
        self.dim
    }

    fn ascent(&self) -> Pt {
        self.ascent
    }

    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        mode: RenderMode,
        justify_width: Pt,
    ) -> Result<DimAndPageNums, LayoutError> {
        let line_height = self.dim.height;
        let adjustment = target.page_breaking_top_margin(top_left.y - line_height, line_height, Pt::ZERO);
        let top = top_left.y - adjustment;
        let spacing = justify_spacing(self.dim.width, justify_width, self.space_count());

        let mut x = top_left.x;
        let mut height = line_height;
        let mut pages = None;
        for item in self.items.iter() {
            let item = spacing
                .and_then(|s| item.with_word_spacing(s))
                .unwrap_or_else(|| item.clone());
            let ascent_diff = self.ascent - item.ascent();
            let rendered = item.render(target, Coord { x, y: top - ascent_diff }, mode, Pt::ZERO)?;
            height = height.max(ascent_diff + rendered.dim.height);
            extend_span(&mut pages, rendered.pages);
            x += item.dim().width;
        }

        let pages = pages.unwrap_or_else(|| {
            PageSpan::single(target.mapping(top - line_height, line_height, Pt::ZERO).page_index)
        });
        Ok(DimAndPageNums {
            dim: Dim {
                width: x - top_left.x,
                height: height + adjustment,
            },
            pages,
        })
    }

    fn space_count(&self) -> usize {
        self.items.iter().map(|item| item.space_count()).sum()
    }
}

/// An empty line left behind by a hard break. It is as tall as the last line
/// with something on it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlankLine {
    height: Pt,
    ascent: Pt,
}

impl Wrapped for BlankLine {
    fn dim(&self) -> Dim {
        Dim {
            width: Pt::ZERO,
            height: self.height,
        }
    }

    fn ascent(&self) -> Pt {
        self.ascent
    }

    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        _mode: RenderMode,
        _justify_width: Pt,
    ) -> Result<DimAndPageNums, LayoutError> {
        let mapping = target.mapping(top_left.y - self.height, self.height, Pt::ZERO);
        Ok(DimAndPageNums {
            dim: Dim {
                width: Pt::ZERO,
                height: self.height + mapping.adjustment,
            },
            pages: PageSpan::single(mapping.page_index),
        })
    }

    fn is_blank(&self) -> bool {
        true
    }
}

/// Flows content into lines no wider than `max_width`.
///
/// Each piece of content is drained through its own [LineWrapper]. The first
/// thing on a line is always taken, even if it overflows; after that only
/// what fits is added, and the line is closed as soon as something doesn't.
///
/// [LineWrapper]: super::wrap::LineWrapper
pub struct LineComposer {
    max_width: Pt,
    lines: Vec<Rc<dyn Wrapped>>,
    current: LineBuilder,
    last_non_blank: Option<BlankLine>,
    pending_break: bool,
}

impl LineComposer {
    pub fn new(max_width: Pt) -> Result<LineComposer, LayoutError> {
        Ok(LineComposer {
            max_width: non_negative("max width", max_width)?,
            lines: Vec::default(),
            current: LineBuilder::default(),
            last_non_blank: None,
            pending_break: false,
        })
    }

    pub fn add(&mut self, content: &dyn LineWrappable) -> Result<(), LayoutError> {
        let mut wrapper = content.line_wrapper();
        while wrapper.has_more() {
            let next = if self.current.is_empty() {
                ConTermNone::from(wrapper.get_something(self.max_width)?)
            } else {
                wrapper.get_if_fits(self.max_width - self.current.width)?
            };
            match next {
                ConTermNone::Continuing { item, has_more } => {
                    self.current.push(item);
                    self.pending_break = false;
                    if has_more {
                        self.close_line();
                    }
                }
                ConTermNone::Terminal(item) => {
                    self.current.push(item);
                    self.close_line();
                    self.pending_break = true;
                }
                ConTermNone::None => self.close_line(),
            }
        }
        Ok(())
    }

    fn close_line(&mut self) {
        let builder = mem::take(&mut self.current);
        if builder.is_blank() {
            let blank = self.last_non_blank.unwrap_or(BlankLine {
                height: Pt::ZERO,
                ascent: Pt::ZERO,
            });
            self.lines.push(Rc::new(blank));
            return;
        }
        let line = builder.freeze();
        self.last_non_blank = Some(BlankLine {
            height: line.dim().height,
            ascent: line.ascent(),
        });
        self.lines.push(line);
    }

    /// The finished lines, top to bottom. A hard break at the very end leaves
    /// a blank line behind.
    pub fn finish(mut self) -> Vec<Rc<dyn Wrapped>> {
        if !self.current.is_empty() || self.pending_break {
            self.close_line();
        }
        self.lines
    }
}

/// Flows every item of `contents`, in order, into lines no wider than
/// `max_width`
pub fn wrap_lines(contents: &[Box<dyn LineWrappable>], max_width: Pt) -> Result<Vec<Rc<dyn Wrapped>>, LayoutError> {
    let mut composer = LineComposer::new(max_width)?;
    for content in contents.iter() {
        composer.add(content.as_ref())?;
    }
    Ok(composer.finish())
}
