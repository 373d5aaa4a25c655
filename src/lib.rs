//! A two-pass layout engine that flows styled text, images, tables and lists
//! onto fixed-size pages.
//!
//! Content is first wrapped into lines of a known width (see [layout]), then
//! rendered onto a [RenderTarget]: once in [RenderMode::Measure] to find out
//! how much room it needs, and once in [RenderMode::Draw] to place it. A
//! [PageGrouping] is a render target spanning as many pages as the content
//! needs, breaking it between pages as it goes. Finished pages are handed to
//! a [Backend], such as the [ContentStreamBackend].

mod backend;
pub use backend::*;

mod colour;
pub use colour::*;

mod content;
pub use content::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod geometry;
pub use geometry::*;

mod grouping;
pub use grouping::*;

mod image;
pub use self::image::*;

/// Utility functions and structures to lay content out into lines and boxes
pub mod layout;

mod mapper;
pub use mapper::*;

mod page;
pub use page::*;

pub mod pagesize;
pub use pagesize::{Orientation, PageSize};

mod session;
pub use session::*;

mod style;
pub use style::*;

mod target;
pub use target::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
