use anyhow::{anyhow, bail, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::Command;
use tracing::debug;

use super::text_processor::split_paragraphs;

/// Which tags carry paragraphs and inline whitespace in a given XML dialect.
struct XmlLayout {
    member: &'static str,
    paragraphs: &'static [&'static [u8]],
    tab: &'static [u8],
    line_break: &'static [u8],
    space: Option<&'static [u8]>,
    /// Subtrees whose text never reaches the reader (field codes, deleted runs, tab stops).
    skipped: &'static [&'static [u8]],
}

const DOCX: XmlLayout = XmlLayout {
    member: "word/document.xml",
    paragraphs: &[b"w:p"],
    tab: b"w:tab",
    line_break: b"w:br",
    space: None,
    skipped: &[b"w:instrText", b"w:delText", b"w:tabs"],
};

const ODT: XmlLayout = XmlLayout {
    member: "content.xml",
    paragraphs: &[b"text:p", b"text:h"],
    tab: b"text:tab",
    line_break: b"text:line-break",
    space: Some(b"text:s"),
    skipped: &[b"office:annotation"],
};

/// Extract paragraph elements from a Word 2007+ document.
pub fn extract_docx_elements(path: &Path) -> Result<Vec<String>> {
    extract_zipped_xml(path, &DOCX)
}

/// Extract paragraph and heading elements from an OpenDocument text file.
pub fn extract_odt_elements(path: &Path) -> Result<Vec<String>> {
    extract_zipped_xml(path, &ODT)
}

/// Extract paragraph elements from a legacy binary Word document via `antiword`.
pub fn extract_doc_elements(path: &Path, antiword_path: &str) -> Result<Vec<String>> {
    convert_to_plain_text(antiword_path, &[], path)
}

/// Extract paragraph elements from a rich-text file via `pandoc`.
pub fn extract_rtf_elements(path: &Path, pandoc_path: &str) -> Result<Vec<String>> {
    convert_to_plain_text(pandoc_path, &["-f", "rtf", "-t", "plain", "--wrap=none"], path)
}

/// Run an external converter that prints plain text on stdout.
fn convert_to_plain_text(program: &str, args: &[&str], path: &Path) -> Result<Vec<String>> {
    debug!("Converting {:?} with {}", path, program);

    let output = Command::new(program)
        .args(args)
        .arg(path)
        .output()
        .with_context(|| format!("Failed to run {} (is it installed and in PATH?)", program))?;

    if !output.status.success() {
        bail!(
            "{} failed (exit code {}): {}",
            program,
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(split_paragraphs(&String::from_utf8_lossy(&output.stdout)))
}

fn extract_zipped_xml(path: &Path, layout: &XmlLayout) -> Result<Vec<String>> {
    debug!("Reading {} from {:?}", layout.member, path);

    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("Not a valid document container: {:?}", path))?;

    let mut xml = String::new();
    archive
        .by_name(layout.member)
        .with_context(|| format!("{} is missing from {:?}", layout.member, path))?
        .read_to_string(&mut xml)
        .with_context(|| format!("Failed to read {} from {:?}", layout.member, path))?;

    paragraphs_from_xml(&xml, layout)
}

fn paragraphs_from_xml(xml: &str, layout: &XmlLayout) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut paragraph_depth = 0usize;
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if layout.skipped.contains(&name.as_ref()) {
                    skip_depth += 1;
                } else if layout.paragraphs.contains(&name.as_ref()) {
                    paragraph_depth += 1;
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if layout.skipped.contains(&name.as_ref()) {
                    skip_depth = skip_depth.saturating_sub(1);
                } else if layout.paragraphs.contains(&name.as_ref()) {
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                    if paragraph_depth == 0 {
                        let text = current.trim();
                        if !text.is_empty() {
                            paragraphs.push(text.to_string());
                        }
                        current.clear();
                    }
                }
            }
            Ok(Event::Empty(e)) if paragraph_depth > 0 && skip_depth == 0 => {
                let name = e.name();
                if name.as_ref() == layout.tab {
                    current.push('\t');
                } else if name.as_ref() == layout.line_break {
                    current.push('\n');
                } else if Some(name.as_ref()) == layout.space {
                    current.push(' ');
                }
            }
            Ok(Event::Text(t)) if paragraph_depth > 0 && skip_depth == 0 => {
                let text = t.unescape().context("Malformed XML text")?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(anyhow!(
                    "XML error at position {}: {}",
                    reader.error_position(),
                    e
                ))
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use zip::write::SimpleFileOptions;

    fn zipped(member: &str, xml: &str) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        writer.start_file(member, SimpleFileOptions::default()).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap();
        file
    }

    #[test]
    fn test_docx_paragraphs() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
      <w:r><w:t>Quarterly</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve">report &amp; outlook</w:t></w:r></w:p>
    <w:p><w:r><w:instrText>PAGE</w:instrText></w:r></w:p>
    <w:p><w:r><w:t>Line one</w:t><w:br/><w:t>Line two</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let file = zipped("word/document.xml", xml);

        let elements = extract_docx_elements(file.path()).unwrap();
        assert_eq!(
            elements,
            vec!["Quarterly\treport & outlook", "Line one\nLine two"]
        );
    }

    #[test]
    fn test_odt_paragraphs_and_headings() {
        let xml = r#"<office:document-content xmlns:office="o" xmlns:text="t">
<office:body><office:text>
<text:h>Results</text:h>
<text:p>Revenue<text:s/>grew <text:span>12%</text:span>.</text:p>
<text:p><office:annotation><text:p>reviewer note</text:p></office:annotation></text:p>
</office:text></office:body></office:document-content>"#;
        let file = zipped("content.xml", xml);

        let elements = extract_odt_elements(file.path()).unwrap();
        assert_eq!(elements, vec!["Results", "Revenue grew 12%."]);
    }

    #[test]
    fn test_docx_without_document_member() {
        let file = zipped("other.xml", "<x/>");
        let err = extract_docx_elements(file.path()).unwrap_err();
        assert!(err.to_string().contains("word/document.xml is missing"));
    }

    #[test]
    fn test_docx_not_a_zip() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"plain bytes").unwrap();
        assert!(extract_docx_elements(file.path()).is_err());
    }

    #[test]
    fn test_rtf_missing_converter() {
        let err = extract_rtf_elements(Path::new("letter.rtf"), "/nonexistent/pandoc").unwrap_err();
        assert!(err.to_string().contains("Failed to run /nonexistent/pandoc"));
    }

    #[test]
    fn test_doc_missing_converter() {
        let err = extract_doc_elements(Path::new("memo.doc"), "/nonexistent/antiword").unwrap_err();
        assert!(err.to_string().contains("Failed to run /nonexistent/antiword"));
    }
}
