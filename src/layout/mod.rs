//! Laying content out into lines, boxes, tables and lists.
//!
//! Content is anything [LineWrappable]: styled [Text], a [ScaledImage], a
//! [Cell], a [Table] or a [DisplayList]. Wrapping flows it into lines of a
//! fixed width, giving [Wrapped] items of a known size. Wrapped items are
//! then rendered onto a [RenderTarget](crate::RenderTarget), first to measure
//! them and then to draw them.
//!
//! # Example
//!
//! ```
//! use pdf_flow::layout::{Cell, Text, Wrapped};
//! use pdf_flow::{colours, CellStyle, FontKey, MonospaceMetrics, Pt, TextStyle, Typeface};
//!
//! let face = Typeface::new(FontKey(0), MonospaceMetrics::default());
//! let style = TextStyle::new(face, Pt(10.0), colours::BLACK).unwrap();
//!
//! let cell = Cell::new(CellStyle::TOP_LEFT_BORDERLESS, Pt(50.0), vec![])
//!     .unwrap()
//!     .with(Text::new(style, "one two three"));
//! let wrapped = cell.wrap().unwrap();
//! assert_eq!(wrapped.lines().len(), 2);
//! assert_eq!(wrapped.dim().height, Pt(20.0));
//! ```

mod cell;
mod line;
mod list;
mod margins;
mod scaled_image;
mod table;
mod text;
mod wrap;

pub use cell::*;
pub use line::*;
pub use list::*;
pub use margins::*;
pub use scaled_image::*;
pub use table::*;
pub use text::*;
pub use wrap::*;
