use crate::{LayoutError, Pt};
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use std::fmt;
use std::rc::Rc;

/// Vertical metrics of a font at a particular size. All values are
/// non-negative distances: `descent` is measured *down* from the baseline.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct FontMetrics {
    pub ascent: Pt,
    pub descent: Pt,
    pub leading: Pt,
}

impl FontMetrics {
    /// The default distance from one baseline to the next
    pub fn line_height(&self) -> Pt {
        self.ascent + self.descent + self.leading
    }
}

/// Something that can tell the layout engine how big text is. The engine
/// never looks at glyphs itself; it only asks for advance widths and
/// vertical metrics through this trait.
pub trait GlyphMetrics: fmt::Debug {
    /// The advance width of `text` set at `size`, without any extra
    /// character or word spacing
    fn measure_text(&self, text: &str, size: Pt) -> Pt;

    /// Ascent, descent and leading at `size`
    fn font_metrics(&self, size: Pt) -> FontMetrics;

    /// A rough average glyph width, used to guess how many characters fit
    /// on a line before measuring
    fn average_char_width(&self, size: Pt) -> Pt {
        const SAMPLE: &str = "abcdefghijklmnopqrstuvwxyz ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        self.measure_text(SAMPLE, size) / SAMPLE.chars().count() as f32
    }
}

/// How a backend refers to a font, i.e. `/F3` in a content stream
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontKey(pub u32);

/// A font as seen by the layout engine: a key the backend understands plus
/// the metrics to measure text with. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Typeface {
    key: FontKey,
    metrics: Rc<dyn GlyphMetrics>,
}

impl Typeface {
    pub fn new<M: GlyphMetrics + 'static>(key: FontKey, metrics: M) -> Typeface {
        Typeface {
            key,
            metrics: Rc::new(metrics),
        }
    }

    pub fn key(&self) -> FontKey {
        self.key
    }

    pub fn metrics(&self) -> &dyn GlyphMetrics {
        self.metrics.as_ref()
    }
}

impl PartialEq for Typeface {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

/// A parsed TrueType or OpenType font, measured through its `hmtx` and `hhea`
/// tables.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, LayoutError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    /// The full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.lookup_name(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// The family name of the font, if it has one
    pub fn family(&self) -> Option<String> {
        self.lookup_name(owned_ttf_parser::name_id::FAMILY)
    }

    fn lookup_name(&self, id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Obtain the weight of the font, 100 (thin) to 900 (black)
    pub fn weight(&self) -> u16 {
        self.face.as_face_ref().weight().to_number()
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    fn advance(&self, ch: char) -> u16 {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .and_then(|gid| face.glyph_hor_advance(gid))
            .unwrap_or_default()
    }
}

impl GlyphMetrics for Font {
    fn measure_text(&self, text: &str, size: Pt) -> Pt {
        let units: u32 = text.chars().map(|ch| self.advance(ch) as u32).sum();
        self.scaling(size) * units as f32
    }

    fn font_metrics(&self, size: Pt) -> FontMetrics {
        let face = self.face.as_face_ref();
        let scaling = self.scaling(size);
        FontMetrics {
            ascent: scaling * face.ascender() as f32,
            // descender is negative in the font tables
            descent: scaling * -(face.descender() as f32),
            leading: scaling * face.line_gap() as f32,
        }
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.name())
            .field("weight", &self.weight())
            .finish()
    }
}

/// Metrics where every character has the same advance, given as fractions of
/// the font size. Handy for tests and for plain-text output.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MonospaceMetrics {
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        MonospaceMetrics {
            advance: 0.5,
            ascent: 0.8,
            descent: 0.2,
            leading: 0.0,
        }
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn measure_text(&self, text: &str, size: Pt) -> Pt {
        size * (self.advance * text.chars().count() as f32)
    }

    fn font_metrics(&self, size: Pt) -> FontMetrics {
        FontMetrics {
            ascent: size * self.ascent,
            descent: size * self.descent,
            leading: size * self.leading,
        }
    }

    fn average_char_width(&self, size: Pt) -> Pt {
        size * self.advance
    }
}
