use super::cell::{Cell, WrappedCell};
use super::wrap::{LineWrappable, LineWrapper, SingleItemWrapper, Wrapped};
use crate::error::non_negative;
use crate::geometry::{Coord, Dim};
use crate::style::{CellStyle, TextStyle};
use crate::target::{extend_span, DimAndPageNums, PageSpan, RenderMode, RenderTarget};
use crate::{LayoutError, Pt};
use std::rc::Rc;

pub const BULLET: &str = "\u{2022}";

/// What goes in front of each list item
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Marker {
    /// The same glyph for every item
    Bullet(String),
    /// Sequential numbers, e.g. `1.`, `2.`, `3.`
    Number { start: i64, suffix: String },
}

impl Default for Marker {
    fn default() -> Self {
        Marker::Bullet(BULLET.to_string())
    }
}

impl Marker {
    pub fn numbered() -> Marker {
        Marker::Number {
            start: 1,
            suffix: ".".to_string(),
        }
    }

    /// The marker for the item at `index` (starting at zero)
    pub fn label(&self, index: usize) -> String {
        match self {
            Marker::Bullet(glyph) => glyph.clone(),
            Marker::Number { start, suffix } => format!("{}{}", start + index as i64, suffix),
        }
    }
}

/// A bulleted or numbered list.
///
/// Items are cells narrower than the list by the marker column. Each marker
/// is right-aligned in that column, on the baseline of its item's first line.
#[derive(Debug)]
pub struct DisplayList {
    marker: Marker,
    marker_style: TextStyle,
    marker_column: Pt,
    marker_gap: Pt,
    item_style: CellStyle,
    width: Pt,
    items: Vec<Cell>,
}

impl DisplayList {
    pub fn new(marker: Marker, marker_style: TextStyle, marker_column: Pt, width: Pt) -> Result<DisplayList, LayoutError> {
        let marker_column = non_negative("marker column", marker_column)?;
        let width = non_negative("list width", width)?;
        non_negative("list item width", width - marker_column)?;
        Ok(DisplayList {
            marker,
            marker_style,
            marker_column,
            marker_gap: Pt(4.0),
            item_style: CellStyle::TOP_LEFT_BORDERLESS,
            width,
            items: Vec::new(),
        })
    }

    /// The style of items added after this
    pub fn with_item_style(self, item_style: CellStyle) -> DisplayList {
        DisplayList { item_style, ..self }
    }

    /// Space between a marker and its item
    pub fn with_marker_gap(self, marker_gap: Pt) -> Result<DisplayList, LayoutError> {
        Ok(DisplayList {
            marker_gap: non_negative("marker gap", marker_gap)?,
            ..self
        })
    }

    pub fn add_item(mut self, contents: Vec<Box<dyn LineWrappable>>) -> Result<DisplayList, LayoutError> {
        let item = Cell::new(self.item_style, self.width - self.marker_column, contents)?;
        self.items.push(item);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn wrap(&self) -> Result<WrappedList, LayoutError> {
        let items = self.items.iter().map(Cell::wrap).collect::<Result<Vec<_>, _>>()?;
        let height = items.iter().map(|item| item.dim().height).sum();
        Ok(WrappedList {
            marker: self.marker.clone(),
            marker_style: self.marker_style.clone(),
            marker_column: self.marker_column,
            marker_gap: self.marker_gap,
            items,
            dim: Dim {
                width: self.width,
                height,
            },
        })
    }
}

impl LineWrappable for DisplayList {
    fn line_wrapper(&self) -> Box<dyn LineWrapper + '_> {
        Box::new(SingleItemWrapper::new(self.width, move || {
            Ok(Rc::new(self.wrap()?) as Rc<dyn Wrapped>)
        }))
    }
}

#[derive(Debug, Clone)]
pub struct WrappedList {
    marker: Marker,
    marker_style: TextStyle,
    marker_column: Pt,
    marker_gap: Pt,
    items: Vec<WrappedCell>,
    dim: Dim,
}

impl Wrapped for WrappedList {
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
        let item_left = top_left.x + self.marker_column;
        let prevent_widows = target.prevent_widows();
        let mut y = top_left.y;
        let mut pages = None;
        for (i, item) in self.items.iter().enumerate() {
            let at = Coord { x: item_left, y };
            let rendered = item.render_custom(target, at, item.dim().height, mode, prevent_widows)?;
            extend_span(&mut pages, rendered.result.pages);

            // an item without lines still gets a marker, just inside its top
            let baseline_y = rendered.first_baseline.map_or_else(
                || y - item.style().box_style.interior_top() - self.marker_style.ascent(),
                |baseline| baseline.y,
            );
            let label = self.marker.label(i);
            let label_width = self.marker_style.string_width(&label);
            let marker_at = Coord {
                x: item_left - self.marker_gap - label_width,
                y: baseline_y,
            };
            target.draw_styled_text(mode, marker_at, &label, &self.marker_style)?;

            y -= rendered.result.dim.height;
        }
        Ok(DimAndPageNums {
            dim: Dim {
                width: self.dim.width,
                height: top_left.y - y,
            },
            pages: pages.unwrap_or_else(|| PageSpan::single(target.page_num_for(top_left.y))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;
    use crate::font::{FontKey, MonospaceMetrics, Typeface};
    use crate::layout::Text;
    use crate::mapper::PageArea;
    use crate::page::{PageItem, SinglePage};
    use crate::pagesize::{Orientation, LETTER};

    fn style() -> TextStyle {
        let face = Typeface::new(FontKey(0), MonospaceMetrics::default());
        TextStyle::new(face, Pt(10.0), colours::BLACK).unwrap()
    }

    fn item(s: &str) -> Vec<Box<dyn LineWrappable>> {
        vec![Box::new(Text::new(style(), s))]
    }

    fn close(a: Pt, b: Pt) -> bool {
        (a.0 - b.0).abs() < 0.001
    }

    #[test]
    fn labels_count_from_the_start() {
        let numbers = Marker::Number {
            start: 3,
            suffix: ")".to_string(),
        };
        assert_eq!(numbers.label(0), "3)");
        assert_eq!(numbers.label(2), "5)");
        assert_eq!(Marker::default().label(7), BULLET);
        assert_eq!(Marker::numbered().label(0), "1.");
    }

    #[test]
    fn markers_sit_on_the_first_baseline() {
        let list = DisplayList::new(Marker::numbered(), style(), Pt(20.0), Pt(70.0))
            .unwrap()
            .add_item(item("one two three"))
            .unwrap()
            .add_item(item("four"))
            .unwrap();
        let wrapped = list.wrap().unwrap();
        // items are 50pt wide: "one two" / "three" / "four"
        assert!(close(wrapped.dim().height, Pt(30.0)));

        let body = PageArea::new(Coord::new(Pt(0.0), Pt(0.0)), LETTER);
        let mut page = SinglePage::new(0, LETTER, Orientation::Portrait, body);
        let rendered = wrapped
            .render(&mut page, Coord::new(Pt(10.0), Pt(300.0)), RenderMode::Draw, Pt::ZERO)
            .unwrap();
        assert!(close(rendered.dim.height, Pt(30.0)));

        let texts: Vec<(String, Coord)> = page
            .items()
            .iter()
            .filter_map(|item| match item {
                PageItem::Text {
                    baseline_left, text, ..
                } => Some((text.clone(), *baseline_left)),
                _ => None,
            })
            .collect();
        let names: Vec<&str> = texts.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(names, vec!["one two", "three", "1.", "four", "2."]);

        let first_line = texts[0].1;
        let first_marker = texts[2].1;
        assert!(close(first_marker.y, first_line.y));
        // "1." is 10pt wide, right-aligned 4pt before the item at x=30
        assert!(close(first_marker.x, Pt(16.0)));
        let second_line = texts[3].1;
        let second_marker = texts[4].1;
        assert!(close(second_marker.y, second_line.y));
    }

    #[test]
    fn marker_column_must_fit() {
        let err = DisplayList::new(Marker::default(), style(), Pt(30.0), Pt(20.0)).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
