use super::cell::{Cell, WrappedCell};
use super::text::Text;
use super::wrap::{LineWrappable, LineWrapper, SingleItemWrapper, Wrapped};
use crate::error::non_negative;
use crate::geometry::{Coord, Dim};
use crate::style::{Align, CellStyle, TextStyle};
use crate::target::{extend_span, DimAndPageNums, PageSpan, RenderMode, RenderTarget};
use crate::{LayoutError, Pt};
use std::rc::Rc;

#[derive(Debug)]
struct Row {
    cells: Vec<Cell>,
    min_height: Pt,
}

/// Rows of cells sharing a set of column widths.
///
/// Rows are built one at a time with [Table::start_row], which hands the
/// table to a [TableRow] until [TableRow::end_row] gives it back. A table can
/// be split into parts (a header and a body, say) with [Table::new_part].
#[derive(Debug)]
pub struct Table {
    cell_widths: Vec<Pt>,
    cell_style: CellStyle,
    text_style: Option<TextStyle>,
    min_row_height: Pt,
    parts: Vec<Vec<Row>>,
}

impl Table {
    pub fn new(cell_widths: Vec<Pt>) -> Result<Table, LayoutError> {
        for width in cell_widths.iter() {
            non_negative("column width", *width)?;
        }
        Ok(Table {
            cell_widths,
            cell_style: CellStyle::default(),
            text_style: None,
            min_row_height: Pt::ZERO,
            parts: vec![Vec::new()],
        })
    }

    /// The style for cells of rows started after this
    pub fn with_cell_style(self, cell_style: CellStyle) -> Table {
        Table { cell_style, ..self }
    }

    /// The style [TableRow::add_text_cells] uses
    pub fn with_text_style(self, text_style: TextStyle) -> Table {
        Table {
            text_style: Some(text_style),
            ..self
        }
    }

    pub fn with_min_row_height(self, min_row_height: Pt) -> Result<Table, LayoutError> {
        Ok(Table {
            min_row_height: non_negative("min row height", min_row_height)?,
            ..self
        })
    }

    /// Starts a new part. Rows added from now on belong to it.
    pub fn new_part(mut self) -> Table {
        if self.parts.last().map_or(true, |part| !part.is_empty()) {
            self.parts.push(Vec::new());
        }
        self
    }

    pub fn start_row(self) -> TableRow {
        TableRow {
            cell_style: self.cell_style,
            min_height: self.min_row_height,
            cells: Vec::with_capacity(self.cell_widths.len()),
            table: self,
        }
    }

    pub fn cell_widths(&self) -> &[Pt] {
        &self.cell_widths
    }

    pub fn width(&self) -> Pt {
        self.cell_widths.iter().copied().sum()
    }

    pub fn wrap(&self) -> Result<WrappedTable, LayoutError> {
        let mut parts = Vec::with_capacity(self.parts.len());
        for part in self.parts.iter().filter(|part| !part.is_empty()) {
            let mut rows = Vec::with_capacity(part.len());
            for row in part.iter() {
                let cells = row.cells.iter().map(Cell::wrap).collect::<Result<Vec<_>, _>>()?;
                let height = cells
                    .iter()
                    .map(|cell| cell.dim().height)
                    .fold(row.min_height, Pt::max);
                rows.push(WrappedRow {
                    cells,
                    min_height: row.min_height,
                    dim: Dim {
                        width: self.width(),
                        height,
                    },
                });
            }
            parts.push(rows);
        }
        let height = parts.iter().flatten().map(|row| row.dim.height).sum();
        Ok(WrappedTable {
            parts,
            dim: Dim {
                width: self.width(),
                height,
            },
        })
    }
}

impl LineWrappable for Table {
    fn line_wrapper(&self) -> Box<dyn LineWrapper + '_> {
        Box::new(SingleItemWrapper::new(self.width(), move || {
            Ok(Rc::new(self.wrap()?) as Rc<dyn Wrapped>)
        }))
    }
}

/// A row being built. It owns its table until the row is ended, so a table
/// can't be used with a row left open.
#[derive(Debug)]
pub struct TableRow {
    table: Table,
    cells: Vec<Cell>,
    cell_style: CellStyle,
    min_height: Pt,
}

impl TableRow {
    /// The style for cells added to this row after this
    pub fn cell_style(self, cell_style: CellStyle) -> TableRow {
        TableRow { cell_style, ..self }
    }

    pub fn align(self, align: Align) -> TableRow {
        TableRow {
            cell_style: self.cell_style.with_align(align),
            ..self
        }
    }

    pub fn min_height(self, min_height: Pt) -> Result<TableRow, LayoutError> {
        Ok(TableRow {
            min_height: non_negative("min row height", min_height)?,
            ..self
        })
    }

    fn next_width(&self) -> Result<Pt, LayoutError> {
        self.table
            .cell_widths
            .get(self.cells.len())
            .copied()
            .ok_or(LayoutError::TooManyCells {
                columns: self.table.cell_widths.len(),
            })
    }

    /// Adds a cell holding `contents` in the next column
    pub fn cell(mut self, contents: Vec<Box<dyn LineWrappable>>) -> Result<TableRow, LayoutError> {
        let cell = Cell::new(self.cell_style, self.next_width()?, contents)?;
        self.cells.push(cell);
        Ok(self)
    }

    /// Adds one cell per string, in the table's text style
    pub fn add_text_cells(mut self, texts: &[&str]) -> Result<TableRow, LayoutError> {
        let style = self.table.text_style.clone().ok_or(LayoutError::MissingTextStyle)?;
        for text in texts.iter() {
            let contents: Vec<Box<dyn LineWrappable>> = vec![Box::new(Text::new(style.clone(), text))];
            self = self.cell(contents)?;
        }
        Ok(self)
    }

    /// Closes the row and hands back the table. Every column must have a cell.
    pub fn end_row(mut self) -> Result<Table, LayoutError> {
        let columns = self.table.cell_widths.len();
        if self.cells.len() != columns {
            return Err(LayoutError::RowIncomplete {
                filled: self.cells.len(),
                columns,
            });
        }
        let row = Row {
            cells: self.cells,
            min_height: self.min_height,
        };
        match self.table.parts.last_mut() {
            Some(part) => part.push(row),
            None => self.table.parts.push(vec![row]),
        }
        Ok(self.table)
    }
}

/// A row whose cells have been wrapped
#[derive(Debug, Clone)]
pub struct WrappedRow {
    cells: Vec<WrappedCell>,
    min_height: Pt,
    dim: Dim,
}

impl Wrapped for WrappedRow {
    fn dim(&self) -> Dim {
        self.dim
    }

    fn ascent(&self) -> Pt {
        self.dim.height
    }

    /// Every cell is measured first, then all of them are rendered as tall as
    /// the tallest so that backgrounds and borders line up.
    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        mode: RenderMode,
        _justify_width: Pt,
    ) -> Result<DimAndPageNums, LayoutError> {
        let mut height = self.min_height;
        let mut x = top_left.x;
        for cell in self.cells.iter() {
            let measured = cell.render_custom(target, top_left.with_x(x), self.min_height, RenderMode::Measure, false)?;
            height = height.max(measured.result.dim.height);
            x += cell.dim().width;
        }

        let mut pages = None;
        let mut x = top_left.x;
        for cell in self.cells.iter() {
            let rendered = cell.render_custom(target, top_left.with_x(x), height, mode, false)?;
            extend_span(&mut pages, rendered.result.pages);
            x += cell.dim().width;
        }

        Ok(DimAndPageNums {
            dim: Dim {
                width: x - top_left.x,
                height,
            },
            pages: pages.unwrap_or_else(|| PageSpan::single(target.page_num_for(top_left.y - height))),
        })
    }
}

/// A table whose rows have been wrapped, grouped into parts
#[derive(Debug, Clone)]
pub struct WrappedTable {
    parts: Vec<Vec<WrappedRow>>,
    dim: Dim,
}

impl WrappedTable {
    pub fn parts(&self) -> &[Vec<WrappedRow>] {
        &self.parts
    }
}

impl Wrapped for WrappedTable {
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
        let mut y = top_left.y;
        let mut pages = None;
        for row in self.parts.iter().flatten() {
            let rendered = row.render(target, top_left.with_y(y), mode, Pt::ZERO)?;
            extend_span(&mut pages, rendered.pages);
            y -= rendered.dim.height;
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
    use crate::mapper::PageArea;
    use crate::page::{PageItem, SinglePage};
    use crate::pagesize::{Orientation, LETTER};
    use crate::style::{BorderStyle, BoxStyle, Padding};

    fn style() -> TextStyle {
        let face = Typeface::new(FontKey(0), MonospaceMetrics::default());
        TextStyle::new(face, Pt(10.0), colours::BLACK).unwrap()
    }

    fn page() -> SinglePage {
        let body = PageArea::new(Coord::new(Pt(0.0), Pt(0.0)), LETTER);
        SinglePage::new(0, LETTER, Orientation::Portrait, body)
    }

    fn table() -> Table {
        let shaded = CellStyle::new(Align::TOP_LEFT, BoxStyle::new(Padding::NONE, Some(colours::LIGHT_GREY), BorderStyle::NONE));
        Table::new(vec![Pt(30.0), Pt(100.0)])
            .unwrap()
            .with_cell_style(shaded)
            .with_text_style(style())
    }

    fn close(a: Pt, b: Pt) -> bool {
        (a.0 - b.0).abs() < 0.001
    }

    #[test]
    fn cells_share_the_tallest_height() {
        let table = table()
            .start_row()
            .add_text_cells(&["aaaa bbbb cccc", "short"])
            .unwrap()
            .end_row()
            .unwrap();
        let wrapped = table.wrap().unwrap();
        assert!(close(wrapped.dim().height, Pt(30.0)));
        assert_eq!(wrapped.dim().width, Pt(130.0));

        let mut page = page();
        let rendered = wrapped
            .render(&mut page, Coord::new(Pt(0.0), Pt(500.0)), RenderMode::Draw, Pt::ZERO)
            .unwrap();
        assert!(close(rendered.dim.height, Pt(30.0)));

        let fills: Vec<Dim> = page
            .items()
            .iter()
            .filter_map(|item| match item {
                PageItem::FillRect { dim, .. } => Some(*dim),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 2);
        assert!(close(fills[0].height, Pt(30.0)));
        assert!(close(fills[1].height, Pt(30.0)));
        assert_eq!(fills[1].width, Pt(100.0));
    }

    #[test]
    fn rows_must_be_complete() {
        let err = table().start_row().add_text_cells(&["one"]).unwrap().end_row().unwrap_err();
        assert!(matches!(err, LayoutError::RowIncomplete { filled: 1, columns: 2 }));
        assert!(err.is_invalid_state());

        let err = table().start_row().add_text_cells(&["a", "b", "c"]).unwrap_err();
        assert!(matches!(err, LayoutError::TooManyCells { columns: 2 }));
    }

    #[test]
    fn text_cells_need_a_text_style() {
        let err = Table::new(vec![Pt(10.0)])
            .unwrap()
            .start_row()
            .add_text_cells(&["x"])
            .unwrap_err();
        assert!(matches!(err, LayoutError::MissingTextStyle));
    }

    #[test]
    fn parts_stack_their_rows() {
        let table = table()
            .with_min_row_height(Pt(12.0))
            .unwrap()
            .start_row()
            .add_text_cells(&["Name", "Value"])
            .unwrap()
            .end_row()
            .unwrap()
            .new_part()
            .start_row()
            .add_text_cells(&["a", "1"])
            .unwrap()
            .end_row()
            .unwrap()
            .start_row()
            .add_text_cells(&["b", "2"])
            .unwrap()
            .end_row()
            .unwrap();
        let wrapped = table.wrap().unwrap();
        assert_eq!(wrapped.parts().len(), 2);
        assert_eq!(wrapped.parts()[1].len(), 2);
        assert!(close(wrapped.dim().height, Pt(36.0)));
    }
}
