//! Export transcoder behaviour observed through the public API

use docweave::transcoder::ExportTranscoder;
use docweave::{
    export_markup, render_markup, ConversionError, HeadingLevel, MarkupTree, ModelToBinary,
    OoxmlPackageWriter, Paragraph, Run, WalkMode,
};

#[test]
fn test_supported_markup_survives_render_and_reexport() {
    // Arrange
    let markup = "<h1>Quarterly report</h1>\
                  <h2>Summary</h2>\
                  <p>Revenue grew <strong>12%</strong> in <em>Q3</em>.</p>\
                  <strong>Confidential</strong>\
                  <em>Draft</em>";

    // Act
    let first = export_markup(markup).unwrap();
    let rendered = render_markup(&first);
    let second = export_markup(&rendered).unwrap();

    // Assert
    assert_eq!(first.len(), 5);
    assert_eq!(first, second, "rendered markup was {}", rendered);
}

#[test]
fn test_paragraph_order_follows_node_order() {
    let doc = export_markup("<p>one</p><h2>two</h2><em>three</em><h1>four</h1>").unwrap();

    let texts: Vec<String> = doc.paragraphs.iter().map(Paragraph::text).collect();
    assert_eq!(texts, vec!["one", "two", "three", "four"]);
}

#[test]
fn test_unsupported_nodes_drop_without_disturbing_neighbours() {
    // Arrange
    let markup = "<p>keep</p><h3>gone</h3><ul><li>gone</li></ul><li>gone</li><div>gone</div><p>also kept</p>";

    // Act
    let report = ExportTranscoder::default().export(markup).unwrap();

    // Assert
    let texts: Vec<String> = report.document.paragraphs.iter().map(Paragraph::text).collect();
    assert_eq!(texts, vec!["keep", "also kept"]);

    let dropped_indices: Vec<usize> = report.dropped.iter().map(|d| d.index).collect();
    assert_eq!(dropped_indices, vec![1, 2, 3, 4]);
    assert_eq!(
        report.dropped_counts(),
        vec![
            ("div".to_string(), 1),
            ("h3".to_string(), 1),
            ("li".to_string(), 1),
            ("ul".to_string(), 1),
        ]
    );
}

#[test]
fn test_headings_carry_level_and_size() {
    let doc = export_markup("<h1>Big</h1><h2>Smaller</h2>").unwrap();

    assert_eq!(doc.paragraphs[0], Paragraph::heading(HeadingLevel::H1, "Big"));
    assert_eq!(doc.paragraphs[1], Paragraph::heading(HeadingLevel::H2, "Smaller"));
    assert_eq!(doc.paragraphs[0].runs[0].size, Some(32));
    assert_eq!(doc.paragraphs[1].runs[0].size, Some(28));
}

#[test]
fn test_flat_and_nested_walks_differ_only_inside_blocks() {
    // Arrange
    let markup = "<p>plain <strong>bold</strong></p><strong>all bold</strong>";

    // Act
    let flat = ExportTranscoder::new(WalkMode::Flat).export(markup).unwrap();
    let nested = ExportTranscoder::new(WalkMode::Nested).export(markup).unwrap();

    // Assert
    assert_eq!(
        flat.document.paragraphs[0],
        Paragraph::body(vec![Run::new("plain bold")])
    );
    assert_eq!(
        nested.document.paragraphs[0],
        Paragraph::body(vec![Run::new("plain "), Run::new("bold").bold()])
    );
    assert_eq!(flat.document.paragraphs[1], nested.document.paragraphs[1]);
}

#[test]
fn test_malformed_markup_is_an_error() {
    assert!(export_markup("<p>bad\0byte</p>").is_err());
}

#[test]
fn test_export_is_deterministic_end_to_end() {
    let markup = "<h1>Plan</h1><p>Ship <em>soon</em>, <strong>test</strong> first</p>\
                  <div>aside</div><em>note</em><h2>Risks</h2>";

    for walk in [WalkMode::Nested, WalkMode::Flat] {
        // Arrange
        let transcoder = ExportTranscoder::new(walk);

        // Act
        let first = transcoder.export(markup).unwrap();
        let second = transcoder.export(markup).unwrap();
        let first_bytes = OoxmlPackageWriter.serialize(&first.document).unwrap();
        let second_bytes = OoxmlPackageWriter.serialize(&second.document).unwrap();

        // Assert
        assert_eq!(first, second, "{:?} walk", walk);
        assert_eq!(first_bytes, second_bytes, "{:?} walk", walk);
    }
}

#[test]
fn test_markup_bytes_must_be_utf8() {
    let err = MarkupTree::parse_bytes(b"<p>caf\xe9</p>").unwrap_err();
    assert!(matches!(err, ConversionError::InvalidEncoding(_)));

    let tree = MarkupTree::parse_bytes("<p>café</p>".as_bytes()).unwrap();
    let report = ExportTranscoder::default().transcode(&tree);
    assert_eq!(report.document.paragraphs[0].text(), "café");
}
