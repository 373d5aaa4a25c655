use crate::geometry::Dim;
use crate::image::{Image, ImageKey};
use crate::page::SinglePage;
use crate::pagesize::Orientation;
use crate::LayoutError;
use std::collections::BTreeMap;

/// Turns finished pages into output.
///
/// A [DocumentSession](crate::DocumentSession) creates a page through the
/// backend the first time anything is drawn on it, embeds each distinct
/// image once, and hands every page over exactly once when it is committed.
pub trait Backend {
    /// The backend's own reference to a page it created
    type PageHandle;
    /// The backend's own reference to an embedded image
    type ImageHandle: Clone;

    /// `size` is already turned to `orientation`
    fn create_page(
        &mut self,
        index: usize,
        size: Dim,
        orientation: Orientation,
    ) -> Result<Self::PageHandle, LayoutError>;

    fn embed_image(&mut self, image: &Image) -> Result<Self::ImageHandle, LayoutError>;

    /// Renders a finished page. `images` holds a handle for every image the
    /// page draws.
    fn commit_page(
        &mut self,
        handle: Self::PageHandle,
        page: &SinglePage,
        images: &BTreeMap<ImageKey, Self::ImageHandle>,
    ) -> Result<Vec<u8>, LayoutError>;
}
