use std::io::{Cursor, Read};

use roxmltree::{Document, Node};

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";
const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Text of every paragraph in the main document part, one paragraph per line.
pub(super) fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    Ok(paragraphs(&xml)?.join("\n"))
}

fn paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let doc = Document::parse(xml)
        .map_err(|e| ExtractError::Docx(format!("{DOCUMENT_PART}: {e}")))?;

    Ok(doc
        .descendants()
        .filter(|node| is_word_element(node, "p"))
        .map(|paragraph| {
            let mut text = String::new();
            collect_runs(paragraph, &mut text);
            text
        })
        .collect())
}

/// Renders run content the way Word shows it: tabs as `\t`, line breaks as `\n`.
/// Paragraphs nested inside this one (text boxes) are rendered on their own.
fn collect_runs(node: Node<'_, '_>, out: &mut String) {
    for child in node.children().filter(Node::is_element) {
        if child.tag_name().namespace() != Some(WORDPROCESSING_NS) {
            collect_runs(child, out);
            continue;
        }
        match child.tag_name().name() {
            "t" => out.push_str(child.text().unwrap_or_default()),
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            "p" => {}
            _ => collect_runs(child, out),
        }
    }
}

fn is_word_element(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(WORDPROCESSING_NS)
}
