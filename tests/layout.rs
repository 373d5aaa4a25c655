use image::{DynamicImage, RgbImage};
use pdf_flow::layout::{Cell, DisplayList, Margins, Marker, ScaledImage, Table, Text, Wrapped, BULLET};
use pdf_flow::{
    colours, Align, BorderStyle, BoxStyle, CellStyle, ContentStreamBackend, Coord, Dim, DocumentSession, FontKey, Image, LineStyle,
    MonospaceMetrics, Orientation, PageItem, PageSpan, Padding, Pt, RenderMode, RenderTarget, SessionConfig,
    SinglePage, TextStyle, Typeface,
};

// A 200 x 100 landscape page with 10pt margins leaves a body 80pt tall, from
// y = 10 to y = 90. With 10pt monospace text that is exactly 8 lines of 36
// characters.
fn config() -> SessionConfig {
    SessionConfig::default()
        .with_page_size(Dim::new(Pt(200.0), Pt(100.0)).unwrap())
        .with_orientation(Orientation::Landscape)
        .with_margins(Margins::all(Pt(10.0)))
}

fn session(config: SessionConfig) -> DocumentSession<ContentStreamBackend> {
    DocumentSession::new(ContentStreamBackend::default(), config)
}

fn style() -> TextStyle {
    let face = Typeface::new(FontKey(0), MonospaceMetrics::default());
    TextStyle::new(face, Pt(10.0), colours::BLACK).unwrap()
}

fn paragraph(text: &str) -> Cell {
    Cell::new(CellStyle::TOP_LEFT_BORDERLESS, Pt(180.0), vec![])
        .unwrap()
        .with(Text::new(style(), text))
}

fn texts(page: &SinglePage) -> Vec<&str> {
    page.items()
        .iter()
        .filter_map(|item| match item {
            PageItem::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

fn baselines(page: &SinglePage) -> Vec<(&str, Coord)> {
    page.items()
        .iter()
        .filter_map(|item| match item {
            PageItem::Text { text, baseline_left, .. } => Some((text.as_str(), *baseline_left)),
            _ => None,
        })
        .collect()
}

fn paths(page: &SinglePage) -> Vec<(&[Coord], bool)> {
    page.items()
        .iter()
        .filter_map(|item| match item {
            PageItem::Path { points, closed, .. } => Some((points.as_slice(), *closed)),
            _ => None,
        })
        .collect()
}

fn close(a: Pt, b: Pt) -> bool {
    (a.0 - b.0).abs() < 0.001
}

#[test]
fn orphaned_first_line_moves_to_the_next_page() {
    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    grouping.append(&paragraph("a\nb\nc\nd\ne\nf\ng")).unwrap();
    assert_eq!(grouping.cursor(), Pt(20.0));

    let rendered = grouping.append(&paragraph("one\ntwo\nthree\nfour")).unwrap();
    assert_eq!(rendered.pages, PageSpan::single(1));
    // the 10pt gap left at the bottom of the first page counts towards the height
    assert!(close(rendered.dim.height, Pt(50.0)));
    drop(grouping);

    assert_eq!(texts(session.page(0).unwrap()), vec!["a", "b", "c", "d", "e", "f", "g"]);
    assert_eq!(texts(session.page(1).unwrap()), vec!["one", "two", "three", "four"]);
}

#[test]
fn lines_split_freely_without_widow_prevention() {
    let mut session = session(config().with_prevent_widows(false));
    let mut grouping = session.start_page_grouping().unwrap();
    grouping.append(&paragraph("a\nb\nc\nd\ne\nf\ng")).unwrap();
    let rendered = grouping.append(&paragraph("one\ntwo\nthree\nfour")).unwrap();
    assert_eq!(rendered.pages, PageSpan::new(0, 1));
    assert!(close(rendered.dim.height, Pt(40.0)));
    drop(grouping);

    assert_eq!(texts(session.page(0).unwrap()).len(), 8);
    assert_eq!(texts(session.page(1).unwrap()), vec!["two", "three", "four"]);
}

#[test]
fn sloped_lines_are_split_at_page_breaks() {
    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    grouping
        .draw_line(
            RenderMode::Draw,
            Coord::new(Pt(10.0), Pt(50.0)),
            Coord::new(Pt(110.0), Pt(-150.0)),
            &LineStyle::of(colours::BLACK),
        )
        .unwrap();
    assert_eq!(grouping.page_count(), 3);
    drop(grouping);

    let expected = [
        ((10.0, 50.0), (30.0, 10.0)),
        ((30.0, 90.0), (70.0, 10.0)),
        ((70.0, 90.0), (110.0, 10.0)),
    ];
    for (index, ((x0, y0), (x1, y1))) in expected.iter().enumerate() {
        let items = session.page(index).unwrap().items();
        assert_eq!(items.len(), 1);
        match &items[0] {
            PageItem::Path { points, closed, .. } => {
                assert!(!closed);
                assert_eq!(points.len(), 2);
                assert!(close(points[0].x, Pt(*x0)) && close(points[0].y, Pt(*y0)));
                assert!(close(points[1].x, Pt(*x1)) && close(points[1].y, Pt(*y1)));
            }
            other => panic!("expected a path, got {:?}", other),
        }
    }
}

#[test]
fn table_rows_are_as_tall_as_their_tallest_cell() {
    let table = Table::new(vec![Pt(50.0), Pt(50.0)])
        .unwrap()
        .with_text_style(style())
        .start_row()
        .add_text_cells(&["a", "one two three"])
        .unwrap()
        .end_row()
        .unwrap()
        .start_row()
        .add_text_cells(&["b", "c"])
        .unwrap()
        .end_row()
        .unwrap();

    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    let rendered = grouping.append(&table).unwrap();
    assert_eq!(rendered.dim.width, Pt(180.0));
    assert!(close(rendered.dim.height, Pt(30.0)));
    assert!(close(grouping.cursor(), Pt(60.0)));
    drop(grouping);

    assert_eq!(texts(session.page(0).unwrap()), vec!["a", "one two", "three", "b", "c"]);
}

#[test]
fn list_markers_are_drawn_per_item() {
    let list = DisplayList::new(Marker::default(), style(), Pt(20.0), Pt(180.0))
        .unwrap()
        .add_item(vec![Box::new(Text::new(style(), "first"))])
        .unwrap()
        .add_item(vec![Box::new(Text::new(style(), "second"))])
        .unwrap();

    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    let rendered = grouping.append(&list).unwrap();
    assert!(close(rendered.dim.height, Pt(20.0)));
    drop(grouping);

    let page = texts(session.page(0).unwrap());
    assert_eq!(page.iter().filter(|text| **text == BULLET).count(), 2);
    assert!(page.contains(&"first") && page.contains(&"second"));
}

#[test]
fn long_text_flows_over_many_pages() {
    let text = lipsum::lipsum(400);
    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    let rendered = grouping.append(&Text::new(style(), &text)).unwrap();
    let pages = grouping.page_count();
    assert!(pages > 5);
    assert_eq!(rendered.pages, PageSpan::new(0, pages - 1));

    let mut last = 0;
    for step in 0..200 {
        let page = grouping.page_num_for(Pt(90.0 - step as f32 * 7.5));
        assert!(page >= last);
        last = page;
    }
    drop(grouping);

    for index in 0..pages {
        let page = session.page(index).unwrap();
        assert!(!texts(page).is_empty());
        for item in page.items() {
            if let PageItem::Text { baseline_left, .. } = item {
                assert!(baseline_left.y >= Pt(10.0) && baseline_left.y <= Pt(90.0));
            }
        }
    }
}

#[test]
fn measuring_creates_no_pages() {
    let text = (0..20).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
    let wrapped = paragraph(&text).wrap().unwrap();

    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    let at = Coord::new(Pt(10.0), Pt(90.0));
    let first = grouping.measure(at, &wrapped).unwrap();
    let second = grouping.measure(at, &wrapped).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.pages, PageSpan::new(0, 2));
    assert!(close(first.dim.height, Pt(200.0)));
    assert_eq!(grouping.page_count(), 0);
    drop(grouping);
    assert_eq!(session.page_count(), 0);
    assert_eq!(session.backend().page_count(), 0);
}

#[test]
fn committing_hands_pages_to_the_backend() {
    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    grouping.append(&Text::new(style(), "Hello world")).unwrap();
    let output = grouping.commit().unwrap();
    assert_eq!(output.len(), 1);

    let stream = String::from_utf8_lossy(&output[0]);
    assert!(stream.contains("/F0 10 Tf"));
    assert!(stream.contains("(Hello world) Tj"));
    assert!(session.is_committed(0));

    let grouping = session.start_page_grouping().unwrap();
    assert_eq!(grouping.first_page(), 1);
    assert_eq!(grouping.page_count(), 0);
}

#[test]
fn images_on_several_pages_are_embedded_once() {
    let image = Image::new_raster(DynamicImage::ImageRgb8(RgbImage::new(4, 4)));
    let scaled = ScaledImage::new(image, Dim::new(Pt(50.0), Pt(50.0)).unwrap());

    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    grouping.append(&scaled).unwrap();
    let second = grouping.append(&scaled).unwrap();
    // pushed to the top of the next page
    assert_eq!(second.pages, PageSpan::single(1));
    assert!(close(second.dim.height, Pt(80.0)));

    let output = grouping.commit().unwrap();
    assert_eq!(output.len(), 2);
    for page in output.iter() {
        assert!(String::from_utf8_lossy(page).contains("/I0 Do"));
    }
    assert_eq!(session.backend().image_count(), 1);
}

#[test]
fn wrapped_cells_report_their_size() {
    let wrapped = paragraph("one two three").wrap().unwrap();
    assert_eq!(wrapped.lines().len(), 1);
    assert_eq!(wrapped.dim(), Dim::new(Pt(180.0), Pt(10.0)).unwrap());
}

#[test]
fn a_pushed_cell_takes_its_border_and_background_along() {
    let boxed = CellStyle::new(
        Align::TOP_LEFT,
        BoxStyle::new(Padding::NONE, Some(colours::LIGHT_GREY), BorderStyle::all(LineStyle::of(colours::BLACK))),
    );
    let cell = Cell::new(boxed, Pt(180.0), vec![])
        .unwrap()
        .with(Text::new(style(), "one\ntwo\nthree\nfour"));

    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    grouping.append(&paragraph("a\nb\nc\nd\ne\nf\ng")).unwrap();
    let rendered = grouping.append(&cell).unwrap();
    assert_eq!(rendered.pages, PageSpan::single(1));
    // 40pt of text, half a border above and below, and the 10pt left behind
    assert!(close(rendered.dim.height, Pt(51.0)));
    drop(grouping);

    let first = session.page(0).unwrap();
    assert!(first.items().iter().all(|item| matches!(item, PageItem::Text { .. })));
    assert_eq!(texts(first).len(), 7);

    let second = session.page(1).unwrap();
    match &second.items()[0] {
        PageItem::FillRect { bottom_left, dim, .. } => {
            assert!(close(bottom_left.y, Pt(49.0)));
            assert!(close(dim.height, Pt(41.0)));
        }
        other => panic!("expected the background first, got {:?}", other),
    }
    let top_border = paths(second)
        .into_iter()
        .any(|(points, _)| points.len() == 2 && points.iter().all(|point| close(point.y, Pt(90.0))));
    assert!(top_border);
    assert_eq!(texts(second), vec!["one", "two", "three", "four"]);
}

#[test]
fn loops_across_a_page_break_are_left_open() {
    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    let square = [
        Coord::new(Pt(20.0), Pt(30.0)),
        Coord::new(Pt(60.0), Pt(30.0)),
        Coord::new(Pt(60.0), Pt(-10.0)),
        Coord::new(Pt(20.0), Pt(-10.0)),
    ];
    grouping
        .draw_line_loop(RenderMode::Draw, &square, &LineStyle::of(colours::BLACK))
        .unwrap();
    drop(grouping);

    for index in 0..2 {
        let paths = paths(session.page(index).unwrap());
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|(_, closed)| !closed));
    }
    // the right side is cut at the bottom of the first page
    let right = paths(session.page(0).unwrap())[1].0.to_vec();
    assert_eq!(right, vec![Coord::new(Pt(60.0), Pt(30.0)), Coord::new(Pt(60.0), Pt(10.0))]);
}

#[test]
fn required_space_below_starts_a_cell_on_the_next_page() {
    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    grouping.append(&paragraph("a\nb\nc\nd\ne\nf")).unwrap();
    assert_eq!(grouping.cursor(), Pt(30.0));

    let cell = paragraph("one\ntwo").with_required_space_below(Pt(20.0)).unwrap();
    let rendered = grouping.append(&cell).unwrap();
    assert_eq!(rendered.pages, PageSpan::single(1));
    assert!(close(rendered.dim.height, Pt(40.0)));
    drop(grouping);

    assert_eq!(texts(session.page(0).unwrap()).len(), 6);
    let second = baselines(session.page(1).unwrap());
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].0, "one");
    assert!(close(second[0].1.y, Pt(82.0)));
}

#[test]
fn a_trailing_widow_takes_a_line_with_it() {
    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    grouping.append(&paragraph("a\nb\nc\nd\ne")).unwrap();

    let rendered = grouping.append(&paragraph("one\ntwo\nthree\nfour")).unwrap();
    assert_eq!(rendered.pages, PageSpan::new(0, 1));
    assert!(close(rendered.dim.height, Pt(50.0)));
    drop(grouping);

    assert_eq!(texts(session.page(0).unwrap()), vec!["a", "b", "c", "d", "e", "one", "two"]);
    assert_eq!(texts(session.page(1).unwrap()), vec!["three", "four"]);
}

#[test]
fn table_cells_stay_level_across_a_page_break() {
    let table = Table::new(vec![Pt(50.0), Pt(50.0)])
        .unwrap()
        .with_text_style(style())
        .start_row()
        .add_text_cells(&["a", "one two three"])
        .unwrap()
        .end_row()
        .unwrap()
        .wrap()
        .unwrap();

    let mut session = session(config());
    let mut grouping = session.start_page_grouping().unwrap();
    // the first line of each cell would straddle the bottom of the first page
    let rendered = grouping.add(Coord::new(Pt(10.0), Pt(15.0)), &table).unwrap();
    assert_eq!(rendered.pages, PageSpan::single(1));
    assert!(close(rendered.dim.height, Pt(25.0)));
    drop(grouping);

    assert!(session.page(0).unwrap().items().is_empty());
    let lines = baselines(session.page(1).unwrap());
    assert_eq!(lines.iter().map(|(text, _)| *text).collect::<Vec<_>>(), vec!["a", "one two", "three"]);
    assert!(close(lines[0].1.y, Pt(82.0)));
    assert!(close(lines[1].1.y, lines[0].1.y));
    assert!(close(lines[1].1.x, Pt(60.0)));
    assert!(close(lines[2].1.y, Pt(72.0)));
}

#[test]
fn decorated_pages_offset_the_content_flowed_onto_them() {
    let mut session = session(config()).with_page_decorator(|index, page| {
        let footer = format!("page {}", index + 1);
        page.draw_styled_text(RenderMode::Draw, Coord::new(Pt(10.0), Pt(2.0)), &footer, &style())?;
        Ok(if index % 2 == 1 { Pt(5.0) } else { Pt::ZERO })
    });
    let mut grouping = session.start_page_grouping().unwrap();
    let text = (0..10).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
    grouping.append(&paragraph(&text)).unwrap();
    drop(grouping);

    assert_eq!(session.page_count(), 2);
    let first = baselines(session.page(0).unwrap());
    assert_eq!(first[0], ("page 1", Coord::new(Pt(10.0), Pt(2.0))));
    assert!(first[1..].iter().all(|(_, at)| close(at.x, Pt(10.0))));

    let second = baselines(session.page(1).unwrap());
    assert_eq!(second.len(), 3);
    assert_eq!(second[0].0, "page 2");
    assert_eq!(second[1].0, "line 8");
    assert!(close(second[1].1.x, Pt(15.0)));
}
