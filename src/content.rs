//! A reference [Backend] that renders each committed page to a PDF content
//! stream.
//!
//! Fonts are referred to as `/F<key>` and images as `/I<n>`, where `n` is
//! the image's index in [ContentStreamBackend::images]. Building the rest of
//! the PDF (resources, fonts, the page tree) is up to the caller.

use crate::backend::Backend;
use crate::geometry::Dim;
use crate::image::{EncodedImage, Image, ImageKey};
use crate::page::{PageItem, SinglePage};
use crate::pagesize::Orientation;
use crate::{LayoutError, Pt};
use id_arena::{Arena, Id};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Content, Name, Str};
use std::collections::BTreeMap;

/// What the backend knows about a page it created
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PageInfo {
    pub index: usize,
    pub size: Dim,
    pub orientation: Orientation,
    pub committed: bool,
}

#[derive(Default)]
pub struct ContentStreamBackend {
    pub pages: Arena<PageInfo>,
    pub images: Arena<EncodedImage>,
    compress: bool,
}

impl ContentStreamBackend {
    /// Compress committed content streams with zlib (`/FlateDecode`)
    pub fn compressed(self) -> ContentStreamBackend {
        ContentStreamBackend {
            compress: true,
            ..self
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

impl Backend for ContentStreamBackend {
    type PageHandle = Id<PageInfo>;
    type ImageHandle = Id<EncodedImage>;

    fn create_page(
        &mut self,
        index: usize,
        size: Dim,
        orientation: Orientation,
    ) -> Result<Self::PageHandle, LayoutError> {
        Ok(self.pages.alloc(PageInfo {
            index,
            size,
            orientation,
            committed: false,
        }))
    }

    fn embed_image(&mut self, image: &Image) -> Result<Self::ImageHandle, LayoutError> {
        Ok(self.images.alloc(image.encode()))
    }

    fn commit_page(
        &mut self,
        handle: Self::PageHandle,
        page: &SinglePage,
        images: &BTreeMap<ImageKey, Self::ImageHandle>,
    ) -> Result<Vec<u8>, LayoutError> {
        let info = self
            .pages
            .get_mut(handle)
            .ok_or(LayoutError::PageMissing(page.index()))?;
        info.committed = true;

        let content = render_items(page.items(), images)?;
        if self.compress {
            Ok(compress_to_vec_zlib(&content, CompressionLevel::DefaultLevel as u8))
        } else {
            Ok(content)
        }
    }
}

/// Text is written one byte per character; anything outside Latin-1 becomes `?`
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}

pub(crate) fn render_items(
    items: &[PageItem],
    images: &BTreeMap<ImageKey, Id<EncodedImage>>,
) -> Result<Vec<u8>, LayoutError> {
    let mut content = Content::new();

    for item in items.iter() {
        match item {
            PageItem::Text {
                baseline_left,
                text,
                style,
            } => {
                content.save_state();
                style.colour.set_fill(&mut content);
                content.begin_text();
                let font = format!("F{}", style.typeface.key().0);
                content.set_font(Name(font.as_bytes()), style.size.0);
                if style.char_spacing != Pt::ZERO {
                    content.set_char_spacing(style.char_spacing.0);
                }
                if style.word_spacing != Pt::ZERO {
                    content.set_word_spacing(style.word_spacing.0);
                }
                if style.rise != Pt::ZERO {
                    content.set_rise(style.rise.0);
                }
                content.next_line(baseline_left.x.0, baseline_left.y.0);
                content.show(Str(&latin1(text)));
                content.end_text();
                content.restore_state();
            }
            PageItem::Image { bottom_left, image } => {
                let key = image.image().key();
                let id = images.get(&key).ok_or(LayoutError::ImageNotEmbedded(key))?;
                let dim = image.dim();
                let name = format!("I{}", id.index());
                content.save_state();
                content.transform([dim.width.0, 0.0, 0.0, dim.height.0, bottom_left.x.0, bottom_left.y.0]);
                content.x_object(Name(name.as_bytes()));
                content.restore_state();
            }
            PageItem::Path {
                points,
                style,
                closed,
            } => {
                let (colour, (first, rest)) = match (style.colour, points.split_first()) {
                    (Some(colour), Some(split)) => (colour, split),
                    _ => continue,
                };
                content.save_state();
                colour.set_stroke(&mut content);
                content.set_line_width(style.thickness().0);
                content.move_to(first.x.0, first.y.0);
                for point in rest.iter() {
                    content.line_to(point.x.0, point.y.0);
                }
                if *closed {
                    content.close_path();
                }
                content.stroke();
                content.restore_state();
            }
            PageItem::FillRect {
                bottom_left,
                dim,
                colour,
            } => {
                content.save_state();
                colour.set_fill(&mut content);
                content.rect(bottom_left.x.0, bottom_left.y.0, dim.width.0, dim.height.0);
                content.fill_nonzero();
                content.restore_state();
            }
        }
    }

    Ok(content.finish())
}
