use pdf_writer::Content;

/// A colour, expressed in RGB, CMYK or grey colour spaces. The layout engine
/// only carries colours through to the backend; it never interprets them.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the CMYK space. c, m, y, and k range from 0.0 to 1.0
    pub fn new_cmyk(c: f32, m: f32, y: f32, k: f32) -> Colour {
        Colour::CMYK { c, m, y, k }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// Sets this colour as the non-stroking (fill and text) colour
    pub(crate) fn set_fill(&self, content: &mut Content) {
        match *self {
            Colour::RGB { r, g, b } => content.set_fill_rgb(r, g, b),
            Colour::CMYK { c, m, y, k } => content.set_fill_cmyk(c, m, y, k),
            Colour::Grey { g } => content.set_fill_gray(g),
        };
    }

    /// Sets this colour as the stroking (line) colour
    pub(crate) fn set_stroke(&self, content: &mut Content) {
        match *self {
            Colour::RGB { r, g, b } => content.set_stroke_rgb(r, g, b),
            Colour::CMYK { c, m, y, k } => content.set_stroke_cmyk(c, m, y, k),
            Colour::Grey { g } => content.set_stroke_gray(g),
        };
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    pub const LIGHT_GREY: Colour = Colour::Grey { g: 0.85 };
    pub const RED: Colour = Colour::RGB {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
    pub const GREEN: Colour = Colour::RGB {
        r: 0.0,
        g: 1.0,
        b: 0.0,
    };
    pub const BLUE: Colour = Colour::RGB {
        r: 0.0,
        g: 0.0,
        b: 1.0,
    };
}
