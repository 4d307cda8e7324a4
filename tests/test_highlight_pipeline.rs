//! End-to-end tests: real PDFs in, annotated PDFs and metadata out.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use pdf_highlighter::api::{highlight_file, OutputPaths};
use pdf_highlighter::color::Palette;
use pdf_highlighter::config::HighlightConfig;
use pdf_highlighter::highlight::{Highlighter, TokenSource};
use pdf_highlighter::metadata::read_metadata;
use pdf_highlighter::{Error, PdfDocument};
use std::path::Path;

/// One text line: `(x, y, text)` drawn in 12pt Helvetica.
type Line<'a> = (f32, f32, &'a str);

/// Build a PDF with one page per entry of `pages`.
///
/// `None` pages point `/Contents` at a missing object.
fn create_test_pdf(pages: &[Option<Vec<Line>>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for page in pages {
        let content_id = match page {
            Some(lines) => {
                let mut operations = Vec::new();
                for (x, y, text) in lines {
                    operations.extend([
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![(*x).into(), (*y).into()]),
                        Operation::new("Tj", vec![Object::string_literal(*text)]),
                        Operation::new("ET", vec![]),
                    ]);
                }
                let data = Content { operations }.encode().unwrap();
                doc.add_object(Stream::new(dictionary! {}, data))
            },
            // Dangling reference: the content stream object does not exist
            None => (9999, 0),
        };
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Build a one-page PDF whose font `/F1` is made by `font` and whose page
/// runs `operations`.
fn create_custom_pdf(
    font: impl FnOnce(&mut Document) -> Dictionary,
    operations: Vec<Operation>,
) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_dict = font(&mut doc);
    let font_id = doc.add_object(font_dict);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let data = Content { operations }.encode().unwrap();
    let content_id = doc.add_object(Stream::new(dictionary! {}, data));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Draw raw string bytes at `(x, y)` in 12pt `/F1`.
fn show_bytes(x: f32, y: f32, bytes: Vec<u8>) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::String(bytes, StringFormat::Hexadecimal)]),
        Operation::new("ET", vec![]),
    ]
}

fn page_words(bytes: &[u8]) -> Vec<String> {
    let doc = PdfDocument::from_bytes(bytes).unwrap();
    doc.page_tokens(0).unwrap().into_iter().map(|t| t.text).collect()
}

fn write_pdf(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

mod extraction {
    use super::*;

    #[test]
    fn test_words_in_reading_order() {
        let bytes = create_test_pdf(&[Some(vec![
            (72.0, 700.0, "The quick brown fox"),
            (72.0, 680.0, "jumps over"),
        ])]);
        let doc = PdfDocument::from_bytes(&bytes).unwrap();
        let words: Vec<String> = doc.page_tokens(0).unwrap().into_iter().map(|t| t.text).collect();
        assert_eq!(words, vec!["The", "quick", "brown", "fox", "jumps", "over"]);
    }

    #[test]
    fn test_words_on_a_line_share_lower_edge() {
        let bytes = create_test_pdf(&[Some(vec![(72.0, 700.0, "The quick brown fox")])]);
        let doc = PdfDocument::from_bytes(&bytes).unwrap();
        let tokens = doc.page_tokens(0).unwrap();
        assert!(tokens.iter().all(|t| t.bbox.y0 == tokens[0].bbox.y0));
        assert!(tokens.windows(2).all(|w| w[0].bbox.x1 < w[1].bbox.x0));
    }

    #[test]
    fn test_out_of_order_drawing_is_read_visually() {
        let bytes = create_test_pdf(&[Some(vec![
            (72.0, 600.0, "closing words"),
            (100.0, 700.0, "Sat"),
            (10.0, 700.0, "The Cat"),
        ])]);
        assert_eq!(page_words(&bytes), vec!["The", "Cat", "Sat", "closing", "words"]);
    }

    #[test]
    fn test_standard_font_word_widths() {
        let bytes = create_test_pdf(&[Some(vec![(72.0, 700.0, "WWW iii")])]);
        let doc = PdfDocument::from_bytes(&bytes).unwrap();
        let tokens = doc.page_tokens(0).unwrap();
        // Helvetica AFM: W = 944, i = 222
        assert!((tokens[0].bbox.width() - 33.984).abs() < 0.01);
        assert!((tokens[1].bbox.width() - 7.992).abs() < 0.01);
    }

    #[test]
    fn test_positioned_fragments_form_one_word() {
        // Helvetica "Hel" is 18pt wide at 12pt
        let bytes = create_custom_pdf(
            |_| {
                dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                }
            },
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![10.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal("Hel")]),
                Operation::new("Td", vec![18.into(), 0.into()]),
                Operation::new("Tj", vec![Object::string_literal("lo")]),
                Operation::new("Td", vec![30.into(), 0.into()]),
                Operation::new("Tj", vec![Object::string_literal("there")]),
                Operation::new("ET", vec![]),
            ],
        );
        assert_eq!(page_words(&bytes), vec!["Hello", "there"]);
    }

    #[test]
    fn test_differences_encoding_is_decoded() {
        let bytes = create_custom_pdf(
            |_| {
                dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "ABCDEF+CMR10",
                    "Encoding" => dictionary! {
                        "Type" => "Encoding",
                        "Differences" => vec![1.into(), "C".into(), "a".into(), "t".into()],
                    },
                }
            },
            show_bytes(72.0, 700.0, vec![1, 2, 3]),
        );
        assert_eq!(page_words(&bytes), vec!["Cat"]);
    }

    #[test]
    fn test_tounicode_font_is_decoded() {
        let bytes = create_custom_pdf(
            |doc| {
                let cmap = b"/CIDInit /ProcSet findresource begin\n\
                    begincmap\n1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n\
                    1 beginbfchar\n<0005> <0043>\nendbfchar\n\
                    1 beginbfrange\n<0006> <0007> <0061>\nendbfrange\n\
                    1 beginbfchar\n<0008> <0020>\nendbfchar\nendcmap";
                let to_unicode = doc.add_object(Stream::new(dictionary! {}, cmap.to_vec()));
                let descendant = doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "CIDFontType2",
                    "BaseFont" => "ABCDEF+Calibri",
                    "DW" => 500,
                });
                dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type0",
                    "BaseFont" => "ABCDEF+Calibri",
                    "Encoding" => "Identity-H",
                    "DescendantFonts" => vec![descendant.into()],
                    "ToUnicode" => to_unicode,
                }
            },
            // "Cab ab"
            show_bytes(72.0, 700.0, vec![0, 5, 0, 6, 0, 7, 0, 8, 0, 6, 0, 7]),
        );
        assert_eq!(page_words(&bytes), vec!["Cab", "ab"]);
    }

    #[test]
    fn test_undecodable_page_is_unavailable() {
        let bytes = create_test_pdf(&[None]);
        let doc = PdfDocument::from_bytes(&bytes).unwrap();
        assert!(matches!(doc.page_tokens(0), Err(Error::SourceUnavailable { page: 0, .. })));
    }
}

mod highlighting {
    use super::*;

    #[test]
    fn test_single_line_match_is_one_annotation() {
        let bytes = create_test_pdf(&[Some(vec![(72.0, 700.0, "The Cat Sat on the mat")])]);
        let mut doc = PdfDocument::from_bytes(&bytes).unwrap();

        let run = Highlighter::default().run(&mut doc, &["Cat Sat"]).unwrap();

        assert_eq!(run.records.len(), 1);
        let record = &run.records[0];
        assert_eq!(record.group_label, "Highlight 1");
        assert_eq!(record.page, 1);
        assert_eq!(record.regions.len(), 1);
        assert_eq!(doc.highlight_count(0).unwrap(), 1);

        let tokens = doc.page_tokens(0).unwrap();
        assert_eq!(record.regions[0].x0, tokens[1].bbox.x0);
        assert_eq!(record.regions[0].x1, tokens[2].bbox.x1);
    }

    #[test]
    fn test_match_across_out_of_order_drawing() {
        let bytes = create_test_pdf(&[Some(vec![(100.0, 700.0, "Sat"), (10.0, 700.0, "The Cat")])]);
        let mut doc = PdfDocument::from_bytes(&bytes).unwrap();

        let run = Highlighter::default().run(&mut doc, &["Cat Sat"]).unwrap();

        assert_eq!(run.records.len(), 1);
        assert_eq!(run.records[0].phrase, "Cat Sat");
        assert_eq!(doc.highlight_count(0).unwrap(), 1);
    }

    #[test]
    fn test_match_in_differences_font() {
        let bytes = create_custom_pdf(
            |_| {
                dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "ABCDEF+CMR10",
                    "Encoding" => dictionary! {
                        "Differences" => vec![1.into(), "C".into(), "a".into(), "t".into(), "space".into()],
                    },
                }
            },
            show_bytes(72.0, 700.0, vec![1, 2, 3, 4, 1, 2, 3]),
        );
        let mut doc = PdfDocument::from_bytes(&bytes).unwrap();

        let run = Highlighter::default().run(&mut doc, &["Cat Cat"]).unwrap();

        assert_eq!(run.records.len(), 1);
        assert_eq!(run.records[0].regions.len(), 1);
    }

    #[test]
    fn test_wrapped_match_is_one_annotation_per_word() {
        let bytes = create_test_pdf(&[Some(vec![
            (72.0, 700.0, "at the end"),
            (72.0, 686.0, "of the day"),
        ])]);
        let mut doc = PdfDocument::from_bytes(&bytes).unwrap();

        let run = Highlighter::default().run(&mut doc, &["end of the"]).unwrap();

        assert_eq!(run.records[0].regions.len(), 3);
        assert_eq!(run.annotation_count, 3);
        assert_eq!(doc.highlight_count(0).unwrap(), 3);
    }

    #[test]
    fn test_annotations_survive_save() {
        let bytes = create_test_pdf(&[
            Some(vec![(72.0, 700.0, "alpha beta")]),
            Some(vec![(72.0, 700.0, "beta gamma")]),
        ]);
        let mut doc = PdfDocument::from_bytes(&bytes).unwrap();
        Highlighter::default().run(&mut doc, &["beta"]).unwrap();

        let reopened = PdfDocument::from_bytes(&doc.to_bytes().unwrap()).unwrap();
        assert_eq!(reopened.highlight_count(0).unwrap(), 1);
        assert_eq!(reopened.highlight_count(1).unwrap(), 1);
    }

    #[test]
    fn test_unavailable_page_skipped() {
        let bytes = create_test_pdf(&[None, Some(vec![(72.0, 700.0, "visible text")])]);
        let mut doc = PdfDocument::from_bytes(&bytes).unwrap();

        let run = Highlighter::default().run(&mut doc, &["text"]).unwrap();

        assert_eq!(run.skipped_pages, vec![0]);
        assert_eq!(run.records.len(), 1);
        assert_eq!(run.records[0].page, 2);
    }

    #[test]
    fn test_colors_follow_overrides() {
        let bytes = create_test_pdf(&[Some(vec![(72.0, 700.0, "red blue green")])]);
        let mut doc = PdfDocument::from_bytes(&bytes).unwrap();
        let config = HighlightConfig::new().with_colors(["green", "mauve"]);

        let run = Highlighter::new(config).run(&mut doc, &["red", "blue", "green"]).unwrap();

        let palette = Palette::default();
        assert_eq!(run.records[0].color, palette.get("green").unwrap());
        assert_eq!(run.records[1].color, palette.get("yellow").unwrap());
        assert_eq!(run.records[2].color, palette.get("green").unwrap());
    }
}

mod api {
    use super::*;

    #[test]
    fn test_highlight_file_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pdf(
            dir.path(),
            "input.pdf",
            &create_test_pdf(&[
                Some(vec![(72.0, 700.0, "Revenue grew while costs fell")]),
                Some(vec![(72.0, 700.0, "costs fell again")]),
            ]),
        );
        let outputs = OutputPaths::new(
            dir.path().join("output").join("highlighted.pdf"),
            dir.path().join("meta.json"),
        );

        let run = highlight_file(
            &input,
            &["costs fell", "Revenue", "absent phrase"],
            &HighlightConfig::default(),
            &outputs,
        )
        .unwrap();

        assert_eq!(run.records.len(), 3);
        let records = read_metadata(&outputs.metadata).unwrap();
        assert_eq!(records, run.records);
        let labels: Vec<&str> = records.iter().map(|r| r.group_label.as_str()).collect();
        assert_eq!(labels, vec!["Highlight 1", "Highlight 1", "Highlight 2"]);

        let output = PdfDocument::open(&outputs.document).unwrap();
        assert_eq!(output.highlight_count(0).unwrap(), 2);
        assert_eq!(output.highlight_count(1).unwrap(), 1);

        let original = PdfDocument::open(&input).unwrap();
        assert_eq!(original.highlight_count(0).unwrap(), 0);
    }

    #[test]
    fn test_metadata_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pdf(
            dir.path(),
            "input.pdf",
            &create_test_pdf(&[Some(vec![(72.0, 700.0, "hello world")])]),
        );
        let outputs = OutputPaths::new(dir.path().join("out.pdf"), dir.path().join("meta.json"));

        highlight_file(&input, &["world"], &HighlightConfig::default(), &outputs).unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&outputs.metadata).unwrap()).unwrap();
        let record = &value[0];
        assert_eq!(record["group"], "Highlight 1");
        assert_eq!(record["text"], "world");
        assert_eq!(record["page"], 1);
        assert_eq!(record["color"].as_array().unwrap().len(), 3);
        assert_eq!(record["coordinates"][0].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_no_matches_writes_empty_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pdf(
            dir.path(),
            "input.pdf",
            &create_test_pdf(&[Some(vec![(72.0, 700.0, "hello world")])]),
        );
        let outputs = OutputPaths::new(dir.path().join("out.pdf"), dir.path().join("meta.json"));

        let run = highlight_file(&input, &["", "   "], &HighlightConfig::default(), &outputs).unwrap();

        assert_eq!(run.skipped_phrases, vec![0, 1]);
        assert!(read_metadata(&outputs.metadata).unwrap().is_empty());
        assert!(outputs.document.exists());
    }
}
