//! Styled text runs and the segmenter that breaks them into line-sized chunks.

use super::line::justify_spacing;
use super::wrap::{ConTerm, ConTermNone, LineWrappable, LineWrapper, Wrapped};
use crate::error::non_negative;
use crate::geometry::{Coord, Dim};
use crate::style::TextStyle;
use crate::target::{DimAndPageNums, RenderMode, RenderTarget};
use crate::{LayoutError, Pt};
use std::rc::Rc;

/// Removes tabs, turns every flavour of line terminator into `\n` and drops
/// spaces that immediately precede a line terminator.
pub fn clean_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\t' => {}
            '\r' | '\n' | '\u{0085}' | '\u{2028}' | '\u{2029}' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                while out.ends_with(' ') {
                    out.pop();
                }
                out.push('\n');
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Whitespace a line may break at. Non-breaking spaces don't count.
fn is_break_space(ch: char) -> bool {
    ch.is_whitespace() && !matches!(ch, '\u{00A0}' | '\u{2007}' | '\u{202F}') && ch != '\n'
}

/// Characters a line may break after: slashes, hyphens, dashes and the
/// zero-width space
fn is_break_after(ch: char) -> bool {
    matches!(
        ch,
        '/' | '-' | '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' | '\u{200B}'
    )
}

/// A run of text in a single style, like a text node in HTML
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    style: TextStyle,
    text: String,
}

impl Text {
    pub fn new<S: AsRef<str>>(style: TextStyle, text: S) -> Text {
        Text {
            style,
            text: clean_str(text.as_ref()),
        }
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// The cleaned text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// A slightly generous guess at how many characters fit in `width`
    pub fn avg_chars_for_width(&self, width: Pt) -> usize {
        let avg = self.style.average_char_width();
        if avg <= Pt::ZERO {
            return self.text.len();
        }
        ((width / avg) * 1.22) as usize
    }

    /// The width of the whole run on a single line
    pub fn max_width(&self) -> Pt {
        self.style.string_width(self.text.trim())
    }
}

impl LineWrappable for Text {
    fn line_wrapper(&self) -> Box<dyn LineWrapper + '_> {
        Box::new(TextLineWrapper {
            text: self,
            index: 0,
        })
    }
}

/// One chunk handed out by [try_getting_text]
#[derive(Clone, Debug, PartialEq)]
pub struct TextChunk {
    pub item: WrappedText,
    /// Byte index the next chunk starts at
    pub next_index: usize,
    /// A hard line break was consumed after this chunk
    pub found_cr: bool,
    /// The chunk was cut short of the end of its segment, so whatever comes
    /// next belongs on a new line
    pub has_more: bool,
    /// The chunk is a single token too wide for the requested width
    pub overflow: bool,
}

impl TextChunk {
    fn into_con_term(self) -> ConTerm {
        let item: Rc<dyn Wrapped> = Rc::new(self.item);
        if self.found_cr {
            ConTerm::Terminal(item)
        } else {
            ConTerm::Continuing {
                item,
                has_more: self.has_more,
            }
        }
    }
}

/// Cuts the next chunk of at most `max_width` out of `text`, starting at
/// byte index `start`.
///
/// The chunk ends at a hard break, or at the last place a line may break
/// that still fits. Whitespace at an automatic break is dropped, but the
/// trailing whitespace of a run's final chunk is kept so that spacing
/// between runs survives. A single token wider than `max_width` is returned
/// whole. Every call consumes at least one byte.
pub fn try_getting_text(max_width: Pt, start: usize, text: &Text) -> Result<TextChunk, LayoutError> {
    non_negative("max width", max_width)?;
    let s = text.text();
    if start >= s.len() {
        return Err(LayoutError::TextExhausted {
            index: start,
            len: s.len(),
        });
    }

    let style = text.style();
    let rest = &s[start..];
    let (segment, found_cr) = match rest.find('\n') {
        Some(cr) => (&rest[..cr], true),
        None => (rest, false),
    };
    let after_segment = start + segment.len() + usize::from(found_cr);

    let chunk = |item: &str, next_index: usize, found_cr: bool, has_more: bool, overflow: bool| TextChunk {
        item: WrappedText::new(style.clone(), item),
        next_index,
        found_cr,
        has_more,
        overflow,
    };

    if style.string_width(segment) <= max_width {
        return Ok(chunk(segment, after_segment, found_cr, false, false));
    }

    // byte offset of every char boundary in the segment, plus the end
    let chars: Vec<(usize, char)> = segment.char_indices().collect();
    let offset = |n: usize| chars.get(n).map_or(segment.len(), |&(i, _)| i);
    let fits = |n: usize| style.string_width(&segment[..offset(n)]) <= max_width;

    // longest prefix (in chars) that fits, starting from a guess
    let mut n = text.avg_chars_for_width(max_width).min(chars.len());
    if fits(n) {
        while n < chars.len() && fits(n + 1) {
            n += 1;
        }
    } else {
        while n > 0 && !fits(n) {
            n -= 1;
        }
    }

    let first_word = chars
        .iter()
        .position(|&(_, ch)| !is_break_space(ch))
        .unwrap_or(chars.len());
    let can_break_at = |p: usize| {
        p > first_word
            && ((p < chars.len() && is_break_space(chars[p].1)) || is_break_after(chars[p - 1].1))
    };

    let (cut, overflow) = match (1..=n).rev().find(|&p| can_break_at(p)) {
        Some(p) => (p, false),
        None => {
            let p = (n.max(first_word + 1)..chars.len())
                .find(|&p| can_break_at(p))
                .unwrap_or(chars.len());
            (p, true)
        }
    };

    let mut resume = cut;
    while resume < chars.len() && is_break_space(chars[resume].1) {
        resume += 1;
    }

    let item = segment[..offset(cut)].trim_end_matches(is_break_space);
    if resume >= chars.len() {
        // only whitespace was left before the end of the segment
        Ok(chunk(item, after_segment, found_cr, true, overflow))
    } else {
        Ok(chunk(item, start + offset(resume), false, true, overflow))
    }
}

/// Walks a [Text] chunk by chunk
#[derive(Debug)]
pub struct TextLineWrapper<'a> {
    text: &'a Text,
    index: usize,
}

impl LineWrapper for TextLineWrapper<'_> {
    fn has_more(&self) -> bool {
        self.index < self.text.text().len()
    }

    fn get_something(&mut self, max_width: Pt) -> Result<ConTerm, LayoutError> {
        let chunk = try_getting_text(max_width, self.index, self.text)?;
        if chunk.overflow {
            log::warn!(
                "\"{}\" is {} wide and can't be broken to fit in {}",
                chunk.item.text(),
                chunk.item.dim().width,
                max_width
            );
        }
        self.index = chunk.next_index;
        Ok(chunk.into_con_term())
    }

    fn get_if_fits(&mut self, remaining: Pt) -> Result<ConTermNone, LayoutError> {
        let room = remaining.max(Pt::ZERO);
        let chunk = try_getting_text(room, self.index, self.text)?;
        let width = chunk.item.dim().width;
        // an empty chunk is a hard break, which ends even a full line
        if width <= room && (remaining > Pt::ZERO || width == Pt::ZERO) {
            self.index = chunk.next_index;
            Ok(chunk.into_con_term().into())
        } else {
            Ok(ConTermNone::None)
        }
    }
}

/// A chunk of text laid out on one line
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedText {
    style: TextStyle,
    text: String,
    width: Pt,
}

impl WrappedText {
    pub fn new<S: Into<String>>(style: TextStyle, text: S) -> WrappedText {
        let text = text.into();
        let width = style.string_width(&text);
        WrappedText { style, text, width }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }
}

impl Wrapped for WrappedText {
    fn dim(&self) -> Dim {
        Dim {
            width: self.width,
            height: self.style.line_height(),
        }
    }

    fn ascent(&self) -> Pt {
        self.style.ascent()
    }

    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        mode: RenderMode,
        justify_width: Pt,
    ) -> Result<DimAndPageNums, LayoutError> {
        let stretched = justify_spacing(self.width, justify_width, self.space_count())
            .and_then(|spacing| self.with_word_spacing(spacing));
        if let Some(stretched) = stretched {
            return stretched.render(target, top_left, mode, Pt::ZERO);
        }
        let drawn = target.draw_styled_text(mode, top_left.minus_y(self.ascent()), &self.text, &self.style)?;
        Ok(drawn.with_width(self.width))
    }

    fn space_count(&self) -> usize {
        self.text.chars().filter(|&c| c == ' ').count()
    }

    fn with_word_spacing(&self, spacing: Pt) -> Option<Rc<dyn Wrapped>> {
        let style = self.style.clone().with_word_spacing(self.style.word_spacing + spacing);
        Some(Rc::new(WrappedText::new(style, self.text.as_str())))
    }

    fn without_trailing_space(&self) -> Option<Rc<dyn Wrapped>> {
        let trimmed = self.text.trim_end_matches(is_break_space);
        (trimmed.len() < self.text.len())
            .then(|| Rc::new(WrappedText::new(self.style.clone(), trimmed)) as Rc<dyn Wrapped>)
    }

    fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}
