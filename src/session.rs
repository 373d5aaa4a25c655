use crate::backend::Backend;
use crate::grouping::PageGrouping;
use crate::image::{Image, ImageKey};
use crate::layout::Margins;
use crate::mapper::{PageArea, PageMapper};
use crate::page::{PageItem, SinglePage};
use crate::pagesize::{self, Orientation, PageSize};
use crate::{LayoutError, Pt};
use std::collections::BTreeMap;
use std::ops::Range;

/// Margin used on every side of a page unless configured otherwise
pub const DEFAULT_MARGIN: Pt = Pt(37.0);

/// How pages are set up in a [DocumentSession]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SessionConfig {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margins: Margins,
    /// Avoid leaving a single line of a cell alone at a page break
    pub prevent_widows: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            page_size: pagesize::LETTER,
            orientation: Orientation::Portrait,
            margins: Margins::all(DEFAULT_MARGIN),
            prevent_widows: true,
        }
    }
}

impl SessionConfig {
    pub fn with_page_size(self, page_size: PageSize) -> SessionConfig {
        SessionConfig { page_size, ..self }
    }

    pub fn with_orientation(self, orientation: Orientation) -> SessionConfig {
        SessionConfig { orientation, ..self }
    }

    pub fn with_margins(self, margins: Margins) -> SessionConfig {
        SessionConfig { margins, ..self }
    }

    pub fn with_prevent_widows(self, prevent_widows: bool) -> SessionConfig {
        SessionConfig {
            prevent_widows,
            ..self
        }
    }

    /// The body of a page in the given orientation
    pub fn body_area(&self, orientation: Orientation) -> Result<PageArea, LayoutError> {
        self.margins.body_area(orientation.apply(self.page_size))
    }
}

/// Called once for every new page, before anything else is drawn on it,
/// with the page's index. It may draw on the page (page numbers, headers and
/// footers) and returns how far everything else drawn on that page moves to
/// the right, e.g. a wider inside margin on odd pages.
pub type PageDecorator = Box<dyn FnMut(usize, &mut SinglePage) -> Result<Pt, LayoutError>>;

struct PageSlot<H> {
    /// Taken when the page is committed
    handle: Option<H>,
    page: SinglePage,
}

/// Owns every page of a document, the images embedded so far, and the
/// backend that turns finished pages into output.
///
/// Pages are created on demand as content is drawn on them. Nothing about a
/// session is thread-safe; drive it from one thread.
pub struct DocumentSession<B: Backend> {
    backend: B,
    config: SessionConfig,
    pages: Vec<PageSlot<B::PageHandle>>,
    images: BTreeMap<ImageKey, B::ImageHandle>,
    decorator: Option<PageDecorator>,
}

impl<B: Backend> DocumentSession<B> {
    pub fn new(backend: B, config: SessionConfig) -> DocumentSession<B> {
        DocumentSession {
            backend,
            config,
            pages: Vec::new(),
            images: BTreeMap::new(),
            decorator: None,
        }
    }

    /// Runs `decorator` on each page as it is created
    pub fn with_page_decorator<F>(self, decorator: F) -> DocumentSession<B>
    where
        F: FnMut(usize, &mut SinglePage) -> Result<Pt, LayoutError> + 'static,
    {
        DocumentSession {
            decorator: Some(Box::new(decorator)),
            ..self
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&SinglePage> {
        self.pages.get(index).map(|slot| &slot.page)
    }

    pub fn is_committed(&self, index: usize) -> bool {
        self.pages.get(index).map_or(false, |slot| slot.handle.is_none())
    }

    /// Makes sure the page at `index` exists, creating it and any pages
    /// before it in the configured orientation
    pub fn ensure_page_index(&mut self, index: usize) -> Result<(), LayoutError> {
        self.ensure_page(index, self.config.orientation)
    }

    pub(crate) fn ensure_page(&mut self, index: usize, orientation: Orientation) -> Result<(), LayoutError> {
        while self.pages.len() <= index {
            let page_index = self.pages.len();
            let size = orientation.apply(self.config.page_size);
            let body = self.config.margins.body_area(size)?;
            let handle = self.backend.create_page(page_index, size, orientation)?;
            log::debug!(
                "created page {} ({} x {}, {:?})",
                page_index,
                size.width,
                size.height,
                orientation
            );
            let mut page = SinglePage::new(page_index, size, orientation, body);
            if let Some(decorate) = self.decorator.as_mut() {
                let x_offset = decorate(page_index, &mut page)?;
                log::trace!("decorated page {}, offsetting its content by {}", page_index, x_offset);
                page.set_x_offset(x_offset);
            }
            self.pages.push(PageSlot {
                handle: Some(handle),
                page,
            });
        }
        Ok(())
    }

    /// The page at `index`, to draw on directly. Content drawn this way never
    /// breaks onto another page.
    pub fn page_target(&mut self, index: usize) -> Result<&mut SinglePage, LayoutError> {
        let orientation = self.config.orientation;
        self.page_for_drawing(index, orientation)
    }

    pub(crate) fn page_for_drawing(
        &mut self,
        index: usize,
        orientation: Orientation,
    ) -> Result<&mut SinglePage, LayoutError> {
        self.ensure_page(index, orientation)?;
        let slot = self.pages.get_mut(index).ok_or(LayoutError::PageMissing(index))?;
        if slot.handle.is_none() {
            return Err(LayoutError::PageCommitted(index));
        }
        Ok(&mut slot.page)
    }

    /// Starts a section that flows onto as many new pages as it needs, in the
    /// configured orientation
    pub fn start_page_grouping(&mut self) -> Result<PageGrouping<'_, B>, LayoutError> {
        let orientation = self.config.orientation;
        let body = self.config.body_area(orientation)?;
        self.start_page_grouping_with(orientation, body)
    }

    /// Starts a section on new pages of the given orientation, laying content
    /// out inside `body`
    pub fn start_page_grouping_with(
        &mut self,
        orientation: Orientation,
        body: PageArea,
    ) -> Result<PageGrouping<'_, B>, LayoutError> {
        let mapper = PageMapper::new(body, self.pages.len())?;
        let prevent_widows = self.config.prevent_widows;
        log::debug!("starting a page grouping at page {}", mapper.first_page());
        Ok(PageGrouping::new(self, mapper, orientation, prevent_widows))
    }

    /// The backend's handle for `image`, embedding it the first time it is
    /// asked for
    pub fn embed_image(&mut self, image: &Image) -> Result<B::ImageHandle, LayoutError> {
        if let Some(handle) = self.images.get(&image.key()) {
            log::trace!("image {:?} already embedded", image.key());
            return Ok(handle.clone());
        }
        log::trace!("embedding image {:?} ({}x{})", image.key(), image.width(), image.height());
        let handle = self.backend.embed_image(image)?;
        self.images.insert(image.key(), handle.clone());
        Ok(handle)
    }

    /// Hands the pages in `range` to the backend, embedding their images
    /// first. Each page can only be committed once.
    pub(crate) fn commit_range(&mut self, range: Range<usize>) -> Result<Vec<Vec<u8>>, LayoutError> {
        let mut output = Vec::with_capacity(range.len());
        for index in range {
            let images: Vec<Image> = self
                .pages
                .get(index)
                .ok_or(LayoutError::PageMissing(index))?
                .page
                .items()
                .iter()
                .filter_map(|item| match item {
                    PageItem::Image { image, .. } => Some(image.image().clone()),
                    _ => None,
                })
                .collect();
            for image in images.iter() {
                self.embed_image(image)?;
            }

            let slot = self.pages.get_mut(index).ok_or(LayoutError::PageMissing(index))?;
            let handle = slot.handle.take().ok_or(LayoutError::PageCommitted(index))?;
            let bytes = self.backend.commit_page(handle, &slot.page, &self.images)?;
            log::debug!("committed page {} ({} bytes)", index, bytes.len());
            output.push(bytes);
        }
        Ok(output)
    }

    /// Commits every page not committed yet, in page order
    pub fn commit(&mut self) -> Result<Vec<Vec<u8>>, LayoutError> {
        let mut output = Vec::new();
        for index in 0..self.pages.len() {
            if !self.is_committed(index) {
                output.extend(self.commit_range(index..index + 1)?);
            }
        }
        Ok(output)
    }
}
