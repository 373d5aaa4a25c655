//! Visual attributes: text styles, rules, padding, borders and alignment.

use crate::error::{non_negative, LayoutError};
use crate::font::Typeface;
use crate::geometry::{Coord, Dim};
use crate::{Colour, Pt};

/// Font, size and colour of a run of text, plus the spacing adjustments a
/// content stream supports (`TL`, `Ts`, `Tc` and `Tw` in PDF terms).
///
/// The vertical metrics are resolved once, when the style is built.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub typeface: Typeface,
    pub size: Pt,
    pub colour: Colour,
    /// Shifts the baseline up (superscript) or down (subscript)
    pub rise: Pt,
    /// Extra space after every character
    pub char_spacing: Pt,
    /// Extra space after every ASCII space
    pub word_spacing: Pt,
    line_height: Pt,
    ascent: Pt,
    avg_char_width: Pt,
}

impl TextStyle {
    pub fn new(typeface: Typeface, size: Pt, colour: Colour) -> Result<TextStyle, LayoutError> {
        let size = non_negative("font size", size)?;
        let metrics = typeface.metrics().font_metrics(size);
        let avg_char_width = typeface.metrics().average_char_width(size);
        Ok(TextStyle {
            typeface,
            size,
            colour,
            rise: Pt::ZERO,
            char_spacing: Pt::ZERO,
            word_spacing: Pt::ZERO,
            line_height: metrics.line_height(),
            ascent: metrics.ascent,
            avg_char_width,
        })
    }

    /// Overrides the distance from this baseline to the next
    pub fn with_line_height(self, line_height: Pt) -> Result<TextStyle, LayoutError> {
        Ok(TextStyle {
            line_height: non_negative("line height", line_height)?,
            ..self
        })
    }

    pub fn with_rise(self, rise: Pt) -> TextStyle {
        TextStyle { rise, ..self }
    }

    pub fn with_char_spacing(self, char_spacing: Pt) -> TextStyle {
        TextStyle {
            avg_char_width: self.avg_char_width - self.char_spacing + char_spacing,
            char_spacing,
            ..self
        }
    }

    pub fn with_word_spacing(self, word_spacing: Pt) -> TextStyle {
        TextStyle {
            word_spacing,
            ..self
        }
    }

    /// Distance from the baseline to the top of the line
    pub fn ascent(&self) -> Pt {
        self.ascent
    }

    /// Distance from one baseline to the next
    pub fn line_height(&self) -> Pt {
        self.line_height
    }

    /// Everything in the line below the baseline
    pub fn descent_and_leading(&self) -> Pt {
        self.line_height - self.ascent
    }

    pub fn average_char_width(&self) -> Pt {
        self.avg_char_width
    }

    /// Width of `text` in this style, including character and word spacing
    pub fn string_width(&self, text: &str) -> Pt {
        let mut width = self.typeface.metrics().measure_text(text, self.size);
        if self.char_spacing != Pt::ZERO {
            width += self.char_spacing * text.chars().count() as f32;
        }
        if self.word_spacing != Pt::ZERO {
            width += self.word_spacing * text.chars().filter(|&c| c == ' ').count() as f32;
        }
        width
    }
}

/// The colour and thickness of a rule. A zero thickness or a missing colour
/// draws nothing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineStyle {
    pub colour: Option<Colour>,
    thickness: Pt,
}

impl LineStyle {
    pub const DEFAULT_THICKNESS: Pt = Pt(1.0);

    pub const NONE: LineStyle = LineStyle {
        colour: None,
        thickness: Pt(0.0),
    };

    pub fn new(colour: Colour, thickness: Pt) -> Result<LineStyle, LayoutError> {
        Ok(LineStyle {
            colour: Some(colour),
            thickness: non_negative("line thickness", thickness)?,
        })
    }

    pub fn of(colour: Colour) -> LineStyle {
        LineStyle {
            colour: Some(colour),
            thickness: Self::DEFAULT_THICKNESS,
        }
    }

    pub fn thickness(&self) -> Pt {
        self.thickness
    }

    /// `true` when drawing this style would put ink on the page
    pub fn is_visible(&self) -> bool {
        self.colour.is_some() && self.thickness > Pt::ZERO
    }
}

/// Space between a box's border and its content
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Padding {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Padding {
    pub const NONE: Padding = Padding {
        top: Pt(0.0),
        right: Pt(0.0),
        bottom: Pt(0.0),
        left: Pt(0.0),
    };

    /// A little breathing room around text
    pub const DEFAULT_TEXT: Padding = Padding {
        top: Pt(1.5),
        right: Pt(1.5),
        bottom: Pt(2.0),
        left: Pt(1.5),
    };

    /// Clockwise from the top, like CSS
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Result<Padding, LayoutError> {
        Ok(Padding {
            top: non_negative("top padding", top)?,
            right: non_negative("right padding", right)?,
            bottom: non_negative("bottom padding", bottom)?,
            left: non_negative("left padding", left)?,
        })
    }

    pub fn all(value: Pt) -> Result<Padding, LayoutError> {
        Self::trbl(value, value, value, value)
    }
}

/// The four sides of a box's border
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BorderStyle {
    pub top: LineStyle,
    pub right: LineStyle,
    pub bottom: LineStyle,
    pub left: LineStyle,
}

impl Default for BorderStyle {
    fn default() -> Self {
        BorderStyle::NONE
    }
}

impl BorderStyle {
    pub const NONE: BorderStyle = BorderStyle {
        top: LineStyle::NONE,
        right: LineStyle::NONE,
        bottom: LineStyle::NONE,
        left: LineStyle::NONE,
    };

    pub fn all(side: LineStyle) -> BorderStyle {
        BorderStyle {
            top: side,
            right: side,
            bottom: side,
            left: side,
        }
    }

    pub fn with_top(self, top: LineStyle) -> BorderStyle {
        BorderStyle { top, ..self }
    }

    pub fn with_right(self, right: LineStyle) -> BorderStyle {
        BorderStyle { right, ..self }
    }

    pub fn with_bottom(self, bottom: LineStyle) -> BorderStyle {
        BorderStyle { bottom, ..self }
    }

    pub fn with_left(self, left: LineStyle) -> BorderStyle {
        BorderStyle { left, ..self }
    }

    pub fn all_same(&self) -> bool {
        self.top == self.right && self.right == self.bottom && self.bottom == self.left
    }
}

/// Padding, background and border of a rectangular block.
///
/// Borders straddle the edge of the box, so half of each border's thickness
/// eats into the interior.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct BoxStyle {
    pub padding: Padding,
    pub background: Option<Colour>,
    pub border: BorderStyle,
}

impl BoxStyle {
    pub const NONE: BoxStyle = BoxStyle {
        padding: Padding::NONE,
        background: None,
        border: BorderStyle::NONE,
    };

    pub fn new(padding: Padding, background: Option<Colour>, border: BorderStyle) -> BoxStyle {
        BoxStyle {
            padding,
            background,
            border,
        }
    }

    pub fn interior_top(&self) -> Pt {
        self.padding.top + self.border.top.thickness() / 2.0
    }

    pub fn interior_right(&self) -> Pt {
        self.padding.right + self.border.right.thickness() / 2.0
    }

    pub fn interior_bottom(&self) -> Pt {
        self.padding.bottom + self.border.bottom.thickness() / 2.0
    }

    pub fn interior_left(&self) -> Pt {
        self.padding.left + self.border.left.thickness() / 2.0
    }

    pub fn top_bottom_interior(&self) -> Pt {
        self.interior_top() + self.interior_bottom()
    }

    pub fn left_right_interior(&self) -> Pt {
        self.interior_left() + self.interior_right()
    }

    /// Moves an outer top-left corner to the inner one
    pub fn apply_top_left(&self, outer: Coord) -> Coord {
        outer.plus_x_minus_y(self.interior_left(), self.interior_top())
    }

    /// The room left for content inside an outer dimension, never negative
    pub fn subtract_from(&self, outer: Dim) -> Dim {
        Dim {
            width: (outer.width - self.left_right_interior()).max(Pt::ZERO),
            height: (outer.height - self.top_bottom_interior()).max(Pt::ZERO),
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
    /// Left aligned, with non-final lines stretched to the full width
    Justify,
}

/// Where content sits inside a box that is bigger than it
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Align {
    pub vertical: VAlign,
    pub horizontal: HAlign,
}

impl Align {
    pub const TOP_LEFT: Align = Align::new(VAlign::Top, HAlign::Left);
    pub const TOP_CENTER: Align = Align::new(VAlign::Top, HAlign::Center);
    pub const TOP_RIGHT: Align = Align::new(VAlign::Top, HAlign::Right);
    pub const TOP_JUSTIFY: Align = Align::new(VAlign::Top, HAlign::Justify);
    pub const MIDDLE_LEFT: Align = Align::new(VAlign::Middle, HAlign::Left);
    pub const MIDDLE_CENTER: Align = Align::new(VAlign::Middle, HAlign::Center);
    pub const MIDDLE_RIGHT: Align = Align::new(VAlign::Middle, HAlign::Right);
    pub const BOTTOM_LEFT: Align = Align::new(VAlign::Bottom, HAlign::Left);
    pub const BOTTOM_CENTER: Align = Align::new(VAlign::Bottom, HAlign::Center);
    pub const BOTTOM_RIGHT: Align = Align::new(VAlign::Bottom, HAlign::Right);

    pub const fn new(vertical: VAlign, horizontal: HAlign) -> Align {
        Align {
            vertical,
            horizontal,
        }
    }

    /// How far to move right to place `inner_width` inside `outer_width`
    pub fn left_offset(&self, outer_width: Pt, inner_width: Pt) -> Pt {
        match self.horizontal {
            HAlign::Left | HAlign::Justify => Pt::ZERO,
            HAlign::Center => (outer_width - inner_width) / 2.0,
            HAlign::Right => outer_width - inner_width,
        }
    }

    /// How far to move down to place `inner_height` inside `outer_height`
    pub fn top_offset(&self, outer_height: Pt, inner_height: Pt) -> Pt {
        match self.vertical {
            VAlign::Top => Pt::ZERO,
            VAlign::Middle => (outer_height - inner_height) / 2.0,
            VAlign::Bottom => outer_height - inner_height,
        }
    }

    /// The top-left corner of `inner` when aligned within `outer` at `top_left`
    pub fn inner_top_left(&self, outer: Dim, inner: Dim, top_left: Coord) -> Coord {
        top_left.plus_x_minus_y(
            self.left_offset(outer.width, inner.width),
            self.top_offset(outer.height, inner.height),
        )
    }
}

/// Alignment and box style of a cell
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct CellStyle {
    pub align: Align,
    pub box_style: BoxStyle,
}

impl CellStyle {
    pub const TOP_LEFT_BORDERLESS: CellStyle = CellStyle {
        align: Align::TOP_LEFT,
        box_style: BoxStyle::NONE,
    };

    pub fn new(align: Align, box_style: BoxStyle) -> CellStyle {
        CellStyle { align, box_style }
    }

    pub fn with_align(self, align: Align) -> CellStyle {
        CellStyle { align, ..self }
    }
}
