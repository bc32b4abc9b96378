mod common;

use common::{op, text_ops, PdfBuilder, LETTER};
use lopdf::Object;
use pdfscan::{extract_text_positions, PdfError};

#[test]
fn glyphs_carry_position_metrics_and_style() {
    let mut pdf = PdfBuilder::new();
    pdf.page(text_ops("F2", 12, 72, 720, "AB"));

    let glyphs = extract_text_positions(&pdf.finish()).unwrap();
    assert_eq!(glyphs.len(), 2);

    let a = &glyphs[0];
    assert_eq!(a.text, "A");
    assert_eq!((a.x, a.y), (72.0, 72.0));
    assert_eq!(a.page_number, 1);
    assert_eq!(a.font_size, 12.0);
    assert_eq!(a.width, 6.0);
    assert_eq!(a.height, 6.0);
    assert_eq!(a.font_name.as_deref(), Some("Custom-Regular"));
    assert!(a.is_bold);
    assert!(!a.is_italic);

    let b = &glyphs[1];
    assert_eq!(b.text, "B");
    assert_eq!(b.x, 78.0);
    assert_eq!(b.width, 3.0);
}

#[test]
fn page_numbers_follow_page_order() {
    let mut pdf = PdfBuilder::new();
    pdf.page(text_ops("F1", 10, 50, 700, "Hi"));
    pdf.page(text_ops("F3", 10, 50, 700, "x"));

    let glyphs = extract_text_positions(&pdf.finish()).unwrap();
    let pages: Vec<u32> = glyphs.iter().map(|g| g.page_number).collect();
    assert_eq!(pages, vec![1, 1, 2]);

    assert!(glyphs[0].is_bold);
    assert!(!glyphs[2].is_bold);
    assert!(glyphs[2].is_italic);
    assert_eq!(glyphs[2].font_name.as_deref(), Some("Times-Italic"));
}

#[test]
fn y_is_flipped_against_crop_box_top() {
    let mut pdf = PdfBuilder::new();
    pdf.page_with_boxes(
        text_ops("F1", 10, 100, 500, "Q"),
        LETTER,
        Some([0, 0, 612, 600]),
    );

    let glyphs = extract_text_positions(&pdf.finish()).unwrap();
    assert_eq!(glyphs[0].y, 100.0);
}

#[test]
fn ctm_scales_position_and_size() {
    let mut ops = vec![
        op("q", vec![]),
        op(
            "cm",
            vec![2.into(), 0.into(), 0.into(), 2.into(), 0.into(), 0.into()],
        ),
    ];
    ops.extend(text_ops("F2", 10, 10, 10, "A"));
    ops.push(op("Q", vec![]));

    let mut pdf = PdfBuilder::new();
    pdf.page(ops);

    let glyphs = extract_text_positions(&pdf.finish()).unwrap();
    let g = &glyphs[0];
    assert_eq!((g.x, g.y), (20.0, 772.0));
    assert_eq!(g.font_size, 20.0);
    assert_eq!(g.width, 10.0);
    assert_eq!(g.height, 10.0);
}

#[test]
fn unknown_font_yields_glyphs_without_font_or_style() {
    let mut pdf = PdfBuilder::new();
    pdf.page(text_ops("F9", 10, 10, 10, "z"));

    let glyphs = extract_text_positions(&pdf.finish()).unwrap();
    assert_eq!(glyphs.len(), 1);
    assert_eq!(glyphs[0].font_name, None);
    assert!(!glyphs[0].is_bold);
    assert!(!glyphs[0].is_italic);
    assert_eq!(glyphs[0].width, 5.0);
}

#[test]
fn kerning_array_moves_following_glyph() {
    let ops = vec![
        op("BT", vec![]),
        op("Tf", vec!["F2".into(), 10.into()]),
        op(
            "TJ",
            vec![Object::Array(vec![
                Object::string_literal("A"),
                Object::Integer(-500),
                Object::string_literal("B"),
            ])],
        ),
        op("ET", vec![]),
    ];
    let mut pdf = PdfBuilder::new();
    pdf.page(ops);

    let glyphs = extract_text_positions(&pdf.finish()).unwrap();
    // A advances 5, the kern adds another 5
    assert_eq!(glyphs[1].x, 10.0);
}

#[test]
fn json_omits_false_style_flags() {
    let mut pdf = PdfBuilder::new();
    pdf.page(text_ops("F1", 10, 10, 10, "A"));

    let glyphs = extract_text_positions(&pdf.finish()).unwrap();
    let json = serde_json::to_value(&glyphs[0]).unwrap();
    assert_eq!(json["is_bold"], serde_json::Value::Bool(true));
    assert!(json.get("is_italic").is_none());
    assert_eq!(json["font_name"], "Helvetica-Bold");
}

#[test]
fn garbage_input_is_a_parse_error() {
    let result = extract_text_positions(b"definitely not a pdf");
    assert!(matches!(result, Err(PdfError::Parse(_))));
}
