//! Format-specific text extractors: document bytes in, flat text out.

use docx_rs::{
    DocumentChild, Docx, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};

use crate::resume::{DocumentFormat, ParseError};

/// Converts one document's bytes into flat text, preserving reading order.
///
/// Implementations are synchronous and may be CPU-heavy; the pipeline runs them
/// on the blocking pool, which also contains decoder panics.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ParseError>;
}

/// Pages in ascending order, one line per page, text runs on a page joined by single spaces.
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ParseError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| ParseError::extraction(DocumentFormat::Pdf, e))?;

        Ok(pages
            .iter()
            .map(|page| join_runs(page))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

fn join_runs(page: &str) -> String {
    page.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Body text of a word-processing document, one line per paragraph. Formatting is dropped.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ParseError> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| ParseError::extraction(DocumentFormat::Docx, e))?;
        Ok(docx_text(&docx))
    }
}

fn docx_text(docx: &Docx) -> String {
    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => lines.push(paragraph_text(p)),
            DocumentChild::Table(t) => push_table_lines(t, &mut lines),
            _ => {}
        }
    }
    lines.join("\n")
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_paragraph_children(&paragraph.children, &mut text);
    text
}

fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, out),
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}

fn push_run(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            _ => {}
        }
    }
}

#[allow(irrefutable_let_patterns)]
fn push_table_lines(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row else {
            continue;
        };
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(p) => lines.push(paragraph_text(p)),
                    TableCellContent::Table(nested) => push_table_lines(nested, lines),
                    _ => {}
                }
            }
        }
    }
}

/// UTF-8 text, verbatim.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ParseError> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| ParseError::extraction(DocumentFormat::PlainText, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{TableCell, TableRow};

    /// Builds a two-page PDF whose page tree lists object 5 before object 3,
    /// so page order differs from object order.
    fn two_page_pdf() -> Vec<u8> {
        let first = "BT /F1 12 Tf 72 712 Td (First page) Tj ET";
        let second = "BT /F1 12 Tf 72 712 Td (Second page) Tj ET";
        let page = |contents: u32| {
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 7 0 R >> >> /Contents {contents} 0 R >>"
            )
        };
        let stream = |body: &str| format!("<< /Length {} >>\nstream\n{body}\nendstream", body.len());
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [5 0 R 3 0 R] /Count 2 >>".to_string(),
            page(4),
            stream(second),
            page(6),
            stream(first),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref_at = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    fn sample_docx() -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Doe")))
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Skills: "))
                    .add_run(Run::new().bold().add_text("Rust, SQL")),
            )
            .add_table(Table::new(vec![TableRow::new(vec![TableCell::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("IIT Delhi")))])]))
            .build()
            .pack(&mut buf)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_pdf_pages_follow_page_tree_order() {
        let text = PdfExtractor.extract(&two_page_pdf()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2, "text was {text:?}");
        assert!(lines[0].contains("First"), "text was {text:?}");
        assert!(lines[1].contains("Second"), "text was {text:?}");
    }

    #[test]
    fn test_pdf_extraction_is_idempotent() {
        let pdf = two_page_pdf();
        assert_eq!(
            PdfExtractor.extract(&pdf).unwrap(),
            PdfExtractor.extract(&pdf).unwrap()
        );
    }

    #[test]
    fn test_pdf_garbage_fails_with_pdf_format() {
        let err = PdfExtractor.extract(b"definitely not a pdf").unwrap_err();
        assert!(matches!(
            err,
            ParseError::ExtractionFailed {
                format: DocumentFormat::Pdf,
                ..
            }
        ));
    }

    #[test]
    fn test_join_runs_collapses_whitespace() {
        assert_eq!(join_runs("\n  Jane   Doe\nRust\t "), "Jane Doe Rust");
    }

    #[test]
    fn test_docx_keeps_document_order_and_drops_formatting() {
        let text = DocxExtractor.extract(&sample_docx()).unwrap();
        let name = text.find("Jane Doe").expect("name missing");
        let skills = text.find("Skills: Rust, SQL").expect("skills missing");
        let institute = text.find("IIT Delhi").expect("table text missing");
        assert!(name < skills && skills < institute, "text was {text:?}");
    }

    #[test]
    fn test_docx_malformed_archive_fails_with_docx_format() {
        let err = DocxExtractor.extract(b"PK\x03\x04 broken").unwrap_err();
        assert!(matches!(
            err,
            ParseError::ExtractionFailed {
                format: DocumentFormat::Docx,
                ..
            }
        ));
    }

    /// A well-formed zip holding one empty `notes.txt` and no `word/document.xml`.
    fn zip_without_document() -> Vec<u8> {
        let name = b"notes.txt";
        let name_len = name.len() as u16;

        let mut zip = Vec::new();
        zip.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        for field in [20u16, 0, 0, 0, 0x21] {
            zip.extend_from_slice(&field.to_le_bytes());
        }
        for field in [0u32, 0, 0] {
            zip.extend_from_slice(&field.to_le_bytes());
        }
        zip.extend_from_slice(&name_len.to_le_bytes());
        zip.extend_from_slice(&0u16.to_le_bytes());
        zip.extend_from_slice(name);

        let directory_at = zip.len() as u32;
        zip.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        for field in [20u16, 20, 0, 0, 0, 0x21] {
            zip.extend_from_slice(&field.to_le_bytes());
        }
        for field in [0u32, 0, 0] {
            zip.extend_from_slice(&field.to_le_bytes());
        }
        for field in [name_len, 0, 0, 0, 0] {
            zip.extend_from_slice(&field.to_le_bytes());
        }
        for field in [0u32, 0] {
            zip.extend_from_slice(&field.to_le_bytes());
        }
        zip.extend_from_slice(name);
        let directory_len = zip.len() as u32 - directory_at;

        zip.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
        for field in [0u16, 0, 1, 1] {
            zip.extend_from_slice(&field.to_le_bytes());
        }
        zip.extend_from_slice(&directory_len.to_le_bytes());
        zip.extend_from_slice(&directory_at.to_le_bytes());
        zip.extend_from_slice(&0u16.to_le_bytes());
        zip
    }

    #[test]
    fn test_docx_archive_without_document_part_fails_with_docx_format() {
        let err = DocxExtractor.extract(&zip_without_document()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::ExtractionFailed {
                format: DocumentFormat::Docx,
                ..
            }
        ));
    }

    #[test]
    fn test_plain_text_is_verbatim() {
        let raw = "Skills: Python, SQL\r\n\n  indented\t";
        assert_eq!(PlainTextExtractor.extract(raw.as_bytes()).unwrap(), raw);
    }

    #[test]
    fn test_plain_text_rejects_invalid_utf8() {
        let err = PlainTextExtractor.extract(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(err.to_string().starts_with("Failed to extract text from TEXT"));
    }
}
