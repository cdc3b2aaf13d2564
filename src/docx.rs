//! Minimal WordprocessingML (.docx) writer for [`Document`].
//!
//! The package holds only what Word needs to open the file and show the
//! title, headings, paragraphs, and bulleted or numbered list paragraphs in
//! their named styles.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::document::Document;
use crate::extract::Block;

pub const CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, thiserror::Error)]
pub enum DocxError {
    #[error("failed to write document archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to write document part: {0}")]
    Io(#[from] std::io::Error),
}

// ── Static package parts ─────────────────────────────────────────────────────

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="240"/></w:pPr><w:rPr><w:sz w:val="52"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480" w:after="0"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200" w:after="0"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200" w:after="0"/><w:outlineLvl w:val="2"/></w:pPr><w:rPr><w:b/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/><w:pPr><w:numPr><w:numId w:val="1"/></w:numPr><w:contextualSpacing/></w:pPr></w:style><w:style w:type="paragraph" w:styleId="ListNumber"><w:name w:val="List Number"/><w:basedOn w:val="Normal"/><w:pPr><w:numPr><w:numId w:val="2"/></w:numPr><w:contextualSpacing/></w:pPr></w:style></w:styles>"#;

const NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="&#8226;"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum><w:abstractNum w:abstractNumId="1"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num><w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num></w:numbering>"#;

const SECTION_XML: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

// ── Public API ───────────────────────────────────────────────────────────────

/// Serialize `document` into the bytes of a .docx package.
pub fn to_docx(document: &Document) -> Result<Vec<u8>, DocxError> {
    let parts: [(&str, String); 7] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", ROOT_RELS_XML.to_string()),
        ("docProps/core.xml", core_xml(&document.title)),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.to_string()),
        ("word/document.xml", document_xml(document)),
        ("word/styles.xml", STYLES_XML.to_string()),
        ("word/numbering.xml", NUMBERING_XML.to_string()),
    ];

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in &parts {
        zip.start_file(*name, options)?;
        zip.write_all(body.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

// ── Part builders ────────────────────────────────────────────────────────────

fn core_xml(title: &str) -> String {
    format!(
        "{XML_DECL}\n<cp:coreProperties \
         xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:dcterms=\"http://purl.org/dc/terms/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
         <dc:title>{}</dc:title><dc:creator>webpage-exporter</dc:creator></cp:coreProperties>",
        xml_text(title)
    )
}

fn document_xml(document: &Document) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push_str(
        "\n<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>",
    );

    push_paragraph(&mut xml, Some("Title"), &document.title);
    for block in &document.body {
        push_paragraph(&mut xml, style_for(block), block.text());
    }

    xml.push_str(SECTION_XML);
    xml.push_str("</w:body></w:document>");
    xml
}

fn style_for(block: &Block) -> Option<&'static str> {
    match block {
        Block::Heading { level: 1, .. } => Some("Heading1"),
        Block::Heading { level: 2, .. } => Some("Heading2"),
        Block::Heading { .. } => Some("Heading3"),
        Block::Paragraph { .. } => None,
        Block::BulletItem { .. } => Some("ListBullet"),
        Block::NumberItem { .. } => Some("ListNumber"),
    }
}

/// Append one `w:p`; newlines in `text` become `w:br` line breaks.
fn push_paragraph(xml: &mut String, style: Option<&str>, text: &str) {
    xml.push_str("<w:p>");
    if let Some(style) = style {
        xml.push_str(&format!("<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>", style));
    }
    if !text.is_empty() {
        xml.push_str("<w:r>");
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                xml.push_str("<w:br/>");
            }
            xml.push_str("<w:t xml:space=\"preserve\">");
            xml.push_str(&xml_text(line));
            xml.push_str("</w:t>");
        }
        xml.push_str("</w:r>");
    }
    xml.push_str("</w:p>");
}

/// Escape markup and drop characters XML 1.0 cannot carry.
fn xml_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || ('\u{20}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || c >= '\u{10000}'
        })
        .collect();
    escape(cleaned.as_str()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut out = String::new();
        part.read_to_string(&mut out).unwrap();
        out
    }

    fn sample() -> Document {
        let mut doc = Document::new("https://example.com/?a=1&b=2");
        doc.body = vec![
            Block::heading(1, "Intro"),
            Block::heading(3, "Detail"),
            Block::paragraph("Fish & <chips>"),
            Block::bullet("apple"),
            Block::number("first"),
        ];
        doc
    }

    #[test]
    fn test_package_has_all_parts() {
        let bytes = to_docx(&sample()).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/core.xml",
                "word/_rels/document.xml.rels",
                "word/document.xml",
                "word/numbering.xml",
                "word/styles.xml",
            ]
        );
    }

    #[test]
    fn test_blocks_map_to_styles_in_order() {
        let bytes = to_docx(&sample()).unwrap();
        let xml = read_part(&bytes, "word/document.xml");

        let title = xml.find("w:val=\"Title\"").unwrap();
        let h1 = xml.find("w:val=\"Heading1\"").unwrap();
        let h3 = xml.find("w:val=\"Heading3\"").unwrap();
        let bullet = xml.find("w:val=\"ListBullet\"").unwrap();
        let number = xml.find("w:val=\"ListNumber\"").unwrap();
        assert!(title < h1 && h1 < h3 && h3 < bullet && bullet < number);

        assert!(xml.contains("Website Content: https://example.com/?a=1&amp;b=2"));
        assert!(xml.contains("Fish &amp; &lt;chips&gt;"));
    }

    #[test]
    fn test_plain_paragraph_has_no_style() {
        let mut doc = Document::new("u");
        doc.body = vec![Block::paragraph("just text")];
        let xml = read_part(&to_docx(&doc).unwrap(), "word/document.xml");
        assert!(xml.contains("<w:p><w:r><w:t xml:space=\"preserve\">just text</w:t></w:r></w:p>"));
    }

    #[test]
    fn test_newlines_become_breaks() {
        let mut doc = Document::new("u");
        doc.body = vec![Block::paragraph("one\ntwo")];
        let xml = read_part(&to_docx(&doc).unwrap(), "word/document.xml");
        assert!(xml.contains(
            "<w:t xml:space=\"preserve\">one</w:t><w:br/><w:t xml:space=\"preserve\">two</w:t>"
        ));
    }

    #[test]
    fn test_core_properties_title() {
        let bytes = to_docx(&Document::new("https://example.com")).unwrap();
        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Website Content: https://example.com</dc:title>"));
    }

    #[test]
    fn test_control_characters_dropped() {
        assert_eq!(xml_text("a\u{0}b\u{b}c"), "abc");
        assert_eq!(xml_text("tab\there"), "tab\there");
    }
}
