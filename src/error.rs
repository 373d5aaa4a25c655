use thiserror::Error;

/// All errors that the crate can generate.
///
/// Invalid arguments and invalid states are caller bugs and are reported
/// before any work is done. An over-wide word is *not* an error: it is laid
/// out overflowing its line so that layout always terminates.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("{what} must not be negative (got {value})")]
    /// A width, height, thickness or font size was negative
    NegativeDimension { what: &'static str, value: f32 },

    #[error("the page body must be taller than zero")]
    /// Margins left no room on the page
    EmptyPageBody,

    #[error("text of length {len} is exhausted, can't wrap from index {index}")]
    /// A text cursor was asked for more after it ran out
    TextExhausted { index: usize, len: usize },

    #[error("line wrapper has nothing more to give")]
    /// A single-item wrapper was asked for its item twice
    WrapperExhausted,

    #[error("can't add text cells without a default text style")]
    /// `add_text_cells` was called on a row of a table with no text style
    MissingTextStyle,

    #[error("can't add another cell, the table only has {columns} column widths")]
    /// More cells were added to a row than the table has columns
    TooManyCells { columns: usize },

    #[error("row has {filled} cells but the table has {columns} columns")]
    /// A row was ended before all of its cells were filled
    RowIncomplete { filled: usize, columns: usize },

    #[error("page {0} does not exist in this session")]
    /// A page index was used before the page was created
    PageMissing(usize),

    #[error("page {0} has already been committed")]
    /// A page was drawn on or committed after it was handed to the backend
    PageCommitted(usize),

    #[error("image {0:?} was drawn but never embedded")]
    /// A backend was asked to render an image it has no handle for
    ImageNotEmbedded(crate::ImageKey),

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to decode the image
    Image(#[from] image::ImageError),
}

impl LayoutError {
    /// `true` for errors caused by an out-of-range argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            LayoutError::NegativeDimension { .. } | LayoutError::EmptyPageBody
        )
    }

    /// `true` for errors caused by calling an operation at the wrong time
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            LayoutError::TextExhausted { .. }
                | LayoutError::WrapperExhausted
                | LayoutError::MissingTextStyle
                | LayoutError::TooManyCells { .. }
                | LayoutError::RowIncomplete { .. }
                | LayoutError::PageMissing(_)
                | LayoutError::PageCommitted(_)
                | LayoutError::ImageNotEmbedded(_)
        )
    }
}

/// Rejects negative lengths with [LayoutError::NegativeDimension]
pub(crate) fn non_negative(what: &'static str, value: crate::Pt) -> Result<crate::Pt, LayoutError> {
    if value.0 < 0.0 || value.0.is_nan() {
        Err(LayoutError::NegativeDimension {
            what,
            value: value.0,
        })
    } else {
        Ok(value)
    }
}
