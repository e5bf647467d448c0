//! Output artifact generation: combined Hinglish text → a simple PDF.
//!
//! The artifact is deliberately plain: Helvetica 12 pt with
//! WinAnsiEncoding, one text line per rendered line, 10-unit line
//! spacing, A4 pages. WinAnsi covers Latin-1, which is all the pipeline's
//! Roman-script output should need; anything outside it is replaced with
//! `?` rather than transliterated further — an accepted lossy step, since
//! a stray Devanagari character surviving to this stage means the model
//! already failed to romanise it.

use crate::error::HinglishError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

// A4 media box and text layout, in PDF units.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 40;
const FONT_SIZE: i64 = 12;
const LINE_SPACING: i64 = 10;

/// Widest line that fits the text column, in characters.
///
/// Helvetica averages just over half the point size per glyph; 85
/// characters of 12 pt text stay inside the 515-unit column.
const MAX_LINE_CHARS: usize = 85;

/// Render the combined Hinglish text as PDF bytes.
///
/// Empty input still produces a valid single-page document.
pub fn text_to_pdf(text: &str) -> Result<Vec<u8>, HinglishError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let lines = layout_lines(text);
    let lines_per_page = ((PAGE_HEIGHT - 2 * MARGIN) / LINE_SPACING) as usize;

    let mut kids: Vec<Object> = Vec::new();
    for chunk in pages_of(&lines, lines_per_page) {
        let content_id = build_page_content(&mut doc, chunk)?;
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| HinglishError::PdfEmitFailed {
            detail: e.to_string(),
        })?;
    Ok(buf)
}

/// Build one page's content stream: each line as a `Tj` at a fixed
/// left margin, stepping down by the line spacing.
fn build_page_content(
    doc: &mut Document,
    lines: &[Vec<u8>],
) -> Result<lopdf::ObjectId, HinglishError> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LINE_SPACING.into()]),
        Operation::new(
            "Td",
            vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN - FONT_SIZE).into()],
        ),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            // T* advances to the next line using the leading set by TL.
            operations.push(Operation::new("T*", vec![]));
        }
        if !line.is_empty() {
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.clone())],
            ));
        }
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| HinglishError::PdfEmitFailed {
            detail: e.to_string(),
        })?;
    Ok(doc.add_object(Stream::new(dictionary! {}, encoded)))
}

/// Split the text into Latin-1 byte lines, wrapping long lines to the
/// column width.
fn layout_lines(text: &str) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    for raw in text.split('\n') {
        if raw.is_empty() {
            out.push(Vec::new());
            continue;
        }
        for wrapped in wrap_line(raw, MAX_LINE_CHARS) {
            out.push(latin1_lossy(&wrapped));
        }
    }
    if out.is_empty() {
        out.push(Vec::new());
    }
    out
}

/// Greedy word wrap; words longer than `width` are hard-split.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
        // Hard-split oversized words so nothing escapes the column.
        while current.chars().count() > width {
            let head: String = current.chars().take(width).collect();
            let tail: String = current.chars().skip(width).collect();
            lines.push(head);
            current = tail;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encode to Latin-1, replacing anything outside it with `?`.
fn latin1_lossy(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                code as u8
            } else {
                b'?'
            }
        })
        .collect()
}

/// Chunk lines into page-sized slices. Always yields at least one chunk.
fn pages_of(lines: &[Vec<u8>], per_page: usize) -> Vec<&[Vec<u8>]> {
    if lines.is_empty() {
        return vec![&[]];
    }
    lines.chunks(per_page.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_keeps_roman_text() {
        assert_eq!(latin1_lossy("Namaste ji"), b"Namaste ji".to_vec());
    }

    #[test]
    fn latin1_replaces_devanagari_and_symbols() {
        assert_eq!(latin1_lossy("नमस्ते"), b"??????".to_vec());
        assert_eq!(latin1_lossy("Rs ₹100"), b"Rs ?100".to_vec());
    }

    #[test]
    fn latin1_keeps_accented_latin() {
        // é is U+00E9, inside Latin-1.
        assert_eq!(latin1_lossy("café"), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn wrap_respects_width() {
        let wrapped = wrap_line("aap kaise hain mera naam sourabh hai", 12);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 12));
        assert_eq!(wrapped.join(" "), "aap kaise hain mera naam sourabh hai");
    }

    #[test]
    fn wrap_hard_splits_long_words() {
        let wrapped = wrap_line(&"x".repeat(30), 10);
        assert_eq!(wrapped.len(), 3);
        assert!(wrapped.iter().all(|l| l.len() <= 10));
    }

    #[test]
    fn emitted_pdf_parses_back() {
        let text = "Namaste\n\nAap kaise hain?";
        let bytes = text_to_pdf(text).expect("emit should succeed");
        assert!(bytes.starts_with(b"%PDF"));

        let doc = Document::load_mem(&bytes).expect("lopdf should reparse its own output");
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn empty_text_yields_single_page_pdf() {
        let bytes = text_to_pdf("").expect("emit should succeed");
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn long_text_spills_to_multiple_pages() {
        let lines_per_page = ((PAGE_HEIGHT - 2 * MARGIN) / LINE_SPACING) as usize;
        let text = vec!["Yeh ek udaharan hai."; lines_per_page + 5].join("\n");
        let bytes = text_to_pdf(&text).expect("emit should succeed");
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}
