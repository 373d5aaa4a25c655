use crate::geometry::{Coord, Dim};
use crate::target::{DimAndPageNums, RenderMode, RenderTarget};
use crate::{LayoutError, Pt};
use std::fmt;
use std::rc::Rc;

/// A fixed-size piece of laid-out content.
///
/// `dim` is the natural size, before any page-break adjustment. Rendering
/// reports the adjusted size, which can only be taller.
pub trait Wrapped: fmt::Debug {
    fn dim(&self) -> Dim;

    /// Height above the baseline
    fn ascent(&self) -> Pt;

    /// Renders with the top-left corner at `top_left`. A positive
    /// `justify_width` asks text to stretch to that width.
    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        mode: RenderMode,
        justify_width: Pt,
    ) -> Result<DimAndPageNums, LayoutError>;

    /// Literal spaces that justification can widen
    fn space_count(&self) -> usize {
        0
    }

    /// A copy with `spacing` added after every space, if that means anything
    /// for this item
    fn with_word_spacing(&self, _spacing: Pt) -> Option<Rc<dyn Wrapped>> {
        None
    }

    /// A copy without trailing whitespace, if there was any to remove
    fn without_trailing_space(&self) -> Option<Rc<dyn Wrapped>> {
        None
    }

    /// `true` for items with no visible content (empty text)
    fn is_blank(&self) -> bool {
        false
    }
}

/// Result of asking a [LineWrapper] for something when the line is empty
#[derive(Clone, Debug)]
pub enum ConTerm {
    /// `has_more` means the run still has content that must start a new line
    Continuing { item: Rc<dyn Wrapped>, has_more: bool },
    /// A hard line break was consumed after `item`
    Terminal(Rc<dyn Wrapped>),
}

/// Result of asking a [LineWrapper] to fill the rest of a line
#[derive(Clone, Debug)]
pub enum ConTermNone {
    Continuing { item: Rc<dyn Wrapped>, has_more: bool },
    Terminal(Rc<dyn Wrapped>),
    /// Nothing fits in the remaining width
    None,
}

impl From<ConTerm> for ConTermNone {
    fn from(value: ConTerm) -> Self {
        match value {
            ConTerm::Continuing { item, has_more } => ConTermNone::Continuing { item, has_more },
            ConTerm::Terminal(item) => ConTermNone::Terminal(item),
        }
    }
}

impl ConTerm {
    pub fn item(&self) -> &Rc<dyn Wrapped> {
        match self {
            ConTerm::Continuing { item, .. } | ConTerm::Terminal(item) => item,
        }
    }
}

/// A cursor over one piece of content, handing it out a line's worth at a
/// time. One cursor per traversal; discarded once exhausted.
pub trait LineWrapper {
    fn has_more(&self) -> bool;

    /// Called when the line is empty. Always returns something, overflowing
    /// `max_width` if nothing smaller is possible.
    fn get_something(&mut self, max_width: Pt) -> Result<ConTerm, LayoutError>;

    /// Called when the line already has something on it. Returns
    /// [ConTermNone::None] rather than overflow `remaining`.
    fn get_if_fits(&mut self, remaining: Pt) -> Result<ConTermNone, LayoutError>;
}

/// Content that can be flowed into lines
pub trait LineWrappable: fmt::Debug {
    fn line_wrapper(&self) -> Box<dyn LineWrapper + '_>;
}

/// Hands out a single item, built on first request. Used by content that is
/// laid out as one block (images, cells, tables, lists).
pub(crate) struct SingleItemWrapper<'a> {
    width: Pt,
    build: Option<Box<dyn FnOnce() -> Result<Rc<dyn Wrapped>, LayoutError> + 'a>>,
}

impl<'a> SingleItemWrapper<'a> {
    pub(crate) fn new<F>(width: Pt, build: F) -> SingleItemWrapper<'a>
    where
        F: FnOnce() -> Result<Rc<dyn Wrapped>, LayoutError> + 'a,
    {
        SingleItemWrapper {
            width,
            build: Some(Box::new(build)),
        }
    }
}

impl LineWrapper for SingleItemWrapper<'_> {
    fn has_more(&self) -> bool {
        self.build.is_some()
    }

    fn get_something(&mut self, _max_width: Pt) -> Result<ConTerm, LayoutError> {
        let build = self.build.take().ok_or(LayoutError::WrapperExhausted)?;
        Ok(ConTerm::Continuing {
            item: build()?,
            has_more: false,
        })
    }

    fn get_if_fits(&mut self, remaining: Pt) -> Result<ConTermNone, LayoutError> {
        if self.build.is_some() && self.width <= remaining {
            self.get_something(remaining).map(ConTermNone::from)
        } else {
            Ok(ConTermNone::None)
        }
    }
}

/// Already laid-out content that should be placed on a line as is
#[derive(Clone, Debug)]
pub struct Prewrapped(pub Rc<dyn Wrapped>);

impl LineWrappable for Prewrapped {
    fn line_wrapper(&self) -> Box<dyn LineWrapper + '_> {
        let item = self.0.clone();
        Box::new(SingleItemWrapper::new(item.dim().width, move || Ok(item)))
    }
}
