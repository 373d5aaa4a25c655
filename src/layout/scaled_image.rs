use super::wrap::{LineWrappable, LineWrapper, SingleItemWrapper, Wrapped};
use crate::geometry::{Coord, Dim};
use crate::image::Image;
use crate::target::{DimAndPageNums, RenderMode, RenderTarget};
use crate::{LayoutError, Pt};
use std::rc::Rc;

/// Points per pixel for an image printed at 300 DPI
pub const IMAGE_SCALE: f32 = 72.0 / 300.0;

/// An image placed at a fixed size. It sits on the baseline like a very tall
/// letter.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledImage {
    image: Image,
    dim: Dim,
}

impl ScaledImage {
    pub fn new(image: Image, dim: Dim) -> ScaledImage {
        ScaledImage { image, dim }
    }

    /// Sizes the image as if it were printed at 300 DPI
    pub fn at_300_dpi(image: Image) -> ScaledImage {
        let dim = Dim {
            width: Pt(image.width() as f32 * IMAGE_SCALE),
            height: Pt(image.height() as f32 * IMAGE_SCALE),
        };
        ScaledImage { image, dim }
    }

    /// Scales proportionally so the image is `width` wide
    pub fn with_width(self, width: Pt) -> ScaledImage {
        let scale = if self.dim.width > Pt::ZERO {
            width / self.dim.width
        } else {
            0.0
        };
        let dim = Dim {
            width,
            height: self.dim.height * scale,
        };
        ScaledImage { dim, ..self }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn dim(&self) -> Dim {
        self.dim
    }
}

impl Wrapped for ScaledImage {
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
        let drawn = target.draw_image(mode, top_left.minus_y(self.dim.height), self)?;
        Ok(drawn.with_width(self.dim.width))
    }
}

impl LineWrappable for ScaledImage {
    fn line_wrapper(&self) -> Box<dyn LineWrapper + '_> {
        Box::new(SingleItemWrapper::new(self.dim.width, move || {
            Ok(Rc::new(self.clone()) as Rc<dyn Wrapped>)
        }))
    }
}
