//! DOCX format detection and validation.

use crate::error::{Error, Result};
use crate::model::XmlTree;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

/// Zip local file header magic bytes.
pub const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Content types part every package carries.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Flavor of word-processing package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocxKind {
    /// Regular document (`.docx`)
    Document,
    /// Macro-enabled document (`.docm`)
    MacroEnabled,
    /// Template (`.dotx`)
    Template,
    /// Macro-enabled template (`.dotm`)
    MacroEnabledTemplate,
}

impl DocxKind {
    fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml" => {
                Some(DocxKind::Document)
            }
            "application/vnd.ms-word.document.macroEnabled.main+xml" => {
                Some(DocxKind::MacroEnabled)
            }
            "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml" => {
                Some(DocxKind::Template)
            }
            "application/vnd.ms-word.template.macroEnabledTemplate.main+xml" => {
                Some(DocxKind::MacroEnabledTemplate)
            }
            _ => None,
        }
    }
}

/// Word-processing package information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxFormat {
    /// Package flavor
    pub kind: DocxKind,
    /// Name of the main document part (e.g., "word/document.xml")
    pub main_part: String,
}

impl std::fmt::Display for DocxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DOCX {:?} ({})", self.kind, self.main_part)
    }
}

/// Detect the package format of a file.
///
/// # Example
/// ```no_run
/// use finstyle::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("report.docx").unwrap();
/// println!("Main part: {}", format.main_part);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocxFormat> {
    let data = fs::read(path)?;
    detect_format_from_bytes(&data)
}

/// Detect the package format from the complete file content.
///
/// # Returns
/// * `Ok(DocxFormat)` if the data is a zip package with a word-processing main part
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocxFormat> {
    if !has_zip_magic(data) {
        return Err(Error::UnknownFormat);
    }

    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|_| Error::UnknownFormat)?;
    let mut content_types = Vec::new();
    archive
        .by_name(CONTENT_TYPES_PART)
        .map_err(|_| Error::UnknownFormat)?
        .read_to_end(&mut content_types)?;

    main_part_from_content_types(&content_types).ok_or(Error::UnknownFormat)
}

/// Find the main document part declared in `[Content_Types].xml`.
pub fn main_part_from_content_types(xml: &[u8]) -> Option<DocxFormat> {
    let tree = XmlTree::parse(xml).ok()?;
    let root = tree.root_element()?;
    let found = tree.child_elements(root, "Override").find_map(|entry| {
        let kind = DocxKind::from_content_type(tree.attribute(entry, "ContentType")?)?;
        let part = tree.attribute(entry, "PartName")?;
        Some(DocxFormat {
            kind,
            main_part: part.trim_start_matches('/').to_string(),
        })
    });
    found
}

/// Check for the zip magic bytes.
pub fn has_zip_magic(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}

/// Check whether a path carries the `.docx` extension (case-insensitive).
pub fn has_docx_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
}

/// Check if a file is a word-processing package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes are a word-processing package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    const CONTENT_TYPES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
        <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
        <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
        <Override PartName=\"/word/document.xml\" \
        ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
        </Types>";

    #[test]
    fn test_main_part_from_content_types() {
        let format = main_part_from_content_types(CONTENT_TYPES.as_bytes()).unwrap();
        assert_eq!(format.kind, DocxKind::Document);
        assert_eq!(format.main_part, "word/document.xml");
    }

    #[test]
    fn test_detect_generated_document() {
        let data = Document::new().unwrap().to_bytes().unwrap();
        let format = detect_format_from_bytes(&data).unwrap();
        assert_eq!(format.main_part, "word/document.xml");
        assert!(is_docx_bytes(&data));
    }

    #[test]
    fn test_detect_invalid_format() {
        assert!(matches!(
            detect_format_from_bytes(b"%PDF-1.7"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_format_from_bytes(b"PK\x03\x04 truncated"),
            Err(Error::UnknownFormat)
        ));
        assert!(!is_docx_bytes(b""));
    }

    #[test]
    fn test_docx_extension() {
        assert!(has_docx_extension("report.docx"));
        assert!(has_docx_extension("REPORT.DOCX"));
        assert!(!has_docx_extension("report.pdf"));
        assert!(!has_docx_extension("report"));
    }
}
