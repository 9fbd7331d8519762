use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts the body text of a DOCX file.
///
/// `<w:t>` runs are text, `<w:tab/>` becomes a tab, `<w:br/>` and the end of
/// each `<w:p>` paragraph become newlines.
pub fn extract_docx_text(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path)?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| ExtractError::Docx(format!("not a DOCX archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)?;

    document_xml_to_text(&xml)
}

pub(crate) fn document_xml_to_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut output = String::new();
    let mut in_text_node = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_node = true,
                b"w:tab" => output.push('\t'),
                b"w:br" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => output.push('\t'),
                b"w:br" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_node {
                    let value = e
                        .unescape()
                        .map_err(|err| ExtractError::Docx(err.to_string()))?;
                    output.push_str(&value);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_node = false,
                b"w:p" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => return Err(ExtractError::Docx(format!("malformed document XML: {err}"))),
            _ => {}
        }
    }

    Ok(output.trim().to_string())
}
