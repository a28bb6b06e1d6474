//! File classifier: maps a declared MIME type to exactly one text extractor.

use std::fmt;

use crate::resume::extract::{DocxExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use crate::resume::ParseError;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";

/// Document formats the intake pipeline can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Classifies a declared media type. Parameters such as `charset` are
    /// ignored and the comparison is case-insensitive.
    pub fn from_mime(mime: &str) -> Result<Self, ParseError> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(PDF_MIME) {
            Ok(DocumentFormat::Pdf)
        } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
            Ok(DocumentFormat::Docx)
        } else if essence.eq_ignore_ascii_case(TEXT_MIME) {
            Ok(DocumentFormat::PlainText)
        } else {
            Err(ParseError::UnsupportedFileType(mime.to_string()))
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::PlainText => "TEXT",
        })
    }
}

/// One extractor per supported format.
pub struct Extractors {
    pdf: Box<dyn TextExtractor>,
    docx: Box<dyn TextExtractor>,
    text: Box<dyn TextExtractor>,
}

impl Default for Extractors {
    fn default() -> Self {
        Self::new(
            Box::new(PdfExtractor),
            Box::new(DocxExtractor),
            Box::new(PlainTextExtractor),
        )
    }
}

impl Extractors {
    pub fn new(
        pdf: Box<dyn TextExtractor>,
        docx: Box<dyn TextExtractor>,
        text: Box<dyn TextExtractor>,
    ) -> Self {
        Self { pdf, docx, text }
    }

    fn for_format(&self, format: DocumentFormat) -> &dyn TextExtractor {
        match format {
            DocumentFormat::Pdf => self.pdf.as_ref(),
            DocumentFormat::Docx => self.docx.as_ref(),
            DocumentFormat::PlainText => self.text.as_ref(),
        }
    }

    /// Runs the extractor for an already-classified format. Callers classify with
    /// `DocumentFormat::from_mime` first, so unsupported types never get here.
    pub fn extract_as(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String, ParseError> {
        self.for_format(format).extract(bytes)
    }
}
