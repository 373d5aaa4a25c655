use crate::LayoutError;
use image::{DynamicImage, GenericImageView};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::rc::Rc;

/// Identifies an image by its content. Two images with the same pixels in
/// the same colour type have the same key and are embedded once per session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageKey(pub u64);

/// A decoded raster image. Cloning is cheap; the pixels are shared.
#[derive(Clone, Debug)]
pub struct Image {
    key: ImageKey,
    pixels: Rc<DynamicImage>,
}

/// An image encoded for embedding: zlib-compressed 8-bit RGB samples with an
/// optional compressed alpha mask.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

impl Image {
    pub fn new_from_disk<P: AsRef<Path>>(path: P) -> Result<Image, LayoutError> {
        let data = std::fs::read(path.as_ref())?;
        Self::new_from_memory(&data)
    }

    pub fn new_from_memory(data: &[u8]) -> Result<Image, LayoutError> {
        let format = image::guess_format(data)?;
        let image = image::load_from_memory_with_format(data, format)?;
        Ok(Self::new_raster(image))
    }

    pub fn new_raster(image: DynamicImage) -> Image {
        let mut hasher = DefaultHasher::new();
        image.width().hash(&mut hasher);
        image.height().hash(&mut hasher);
        let colour = image.color();
        (colour.channel_count(), colour.bytes_per_pixel()).hash(&mut hasher);
        image.as_bytes().hash(&mut hasher);
        Image {
            key: ImageKey(hasher.finish()),
            pixels: Rc::new(image),
        }
    }

    pub fn key(&self) -> ImageKey {
        self.key
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    /// Encodes the pixels for embedding, compressing them with zlib
    pub fn encode(&self) -> EncodedImage {
        let level = CompressionLevel::DefaultLevel as u8;
        let image = self.pixels.as_ref();

        let alpha = image.color().has_alpha().then(|| {
            let alphas: Vec<u8> = image.pixels().map(|p| (p.2).0[3]).collect();
            compress_to_vec_zlib(&alphas, level)
        });

        EncodedImage {
            width: image.width(),
            height: image.height(),
            rgb: compress_to_vec_zlib(image.to_rgb8().as_raw(), level),
            alpha,
        }
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};

    fn checker(seed: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(4, 3, |x, y| {
            Rgb([seed, (x * 10) as u8, (y * 10) as u8])
        }))
    }

    #[test]
    fn identical_pixels_share_a_key() {
        let a = Image::new_raster(checker(1));
        let b = Image::new_raster(checker(1));
        let c = Image::new_raster(checker(2));
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_eq!((a.width(), a.height()), (4, 3));
    }

    #[test]
    fn colour_type_is_part_of_the_key() {
        // both are 8 zero bytes
        let grey16 = Image::new_raster(DynamicImage::ImageLuma16(ImageBuffer::new(2, 2)));
        let grey_alpha = Image::new_raster(DynamicImage::ImageLumaA8(ImageBuffer::new(2, 2)));
        assert_eq!(grey16.pixels().as_bytes(), grey_alpha.pixels().as_bytes());
        assert_ne!(grey16.key(), grey_alpha.key());
    }

    #[test]
    fn alpha_gets_a_mask() {
        let opaque = Image::new_raster(checker(1)).encode();
        assert!(opaque.alpha.is_none());
        assert!(!opaque.rgb.is_empty());

        let translucent = Image::new_raster(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            2,
            2,
            Rgba([0, 0, 0, 128]),
        )));
        assert!(translucent.encode().alpha.is_some());
    }
}
