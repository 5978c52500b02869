//! Zip container holding the package parts.

use crate::detect;
use crate::error::{Error, Result};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// A named part and its raw bytes.
#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
}

/// In-memory package. Part order is preserved on save.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Build a package from named parts.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        Self {
            parts: parts
                .into_iter()
                .map(|(name, data)| Part {
                    name: name.into(),
                    data,
                })
                .collect(),
        }
    }

    /// Read a package from the complete file content.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if !detect::has_zip_magic(data) {
            return Err(Error::UnknownFormat);
        }

        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(capacity_hint(file.size()));
            file.read_to_end(&mut data)?;
            parts.push(Part {
                name: file.name().to_string(),
                data,
            });
        }

        log::debug!("Loaded package with {} parts", parts.len());
        Ok(Self { parts })
    }

    /// Read a package from any reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Write the package, substituting the given parts.
    pub fn to_bytes_with(&self, replaced: &[(&str, Vec<u8>)]) -> Result<Vec<u8>> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for part in &self.parts {
            let data = replaced
                .iter()
                .find(|(name, _)| *name == part.name)
                .map(|(_, data)| data.as_slice())
                .unwrap_or(part.data.as_slice());
            writer.start_file(part.name.as_str(), options)?;
            writer.write_all(data)?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Write the package unchanged.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&[])
    }

    /// Raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Replace or add a part.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// Part names in package order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Resolve the target of the first relationship from `source` whose type
    /// ends with `/{kind}` (e.g. `styles`).
    pub fn related_part(&self, source: &str, kind: &str) -> Option<String> {
        let (dir, file) = match source.rsplit_once('/') {
            Some((dir, file)) => (dir, file),
            None => ("", source),
        };
        let rels_name = if dir.is_empty() {
            format!("_rels/{}.rels", file)
        } else {
            format!("{}/_rels/{}.rels", dir, file)
        };

        let tree = super::XmlTree::parse(self.part(&rels_name)?).ok()?;
        let root = tree.root_element()?;
        let suffix = format!("/{}", kind);
        let target = tree.child_elements(root, "Relationship").find_map(|rel| {
            let rel_type = tree.attribute(rel, "Type")?;
            if tree.attribute(rel, "TargetMode") == Some("External") || !rel_type.ends_with(&suffix)
            {
                return None;
            }
            tree.attribute(rel, "Target").map(str::to_string)
        })?;

        Some(resolve_target(dir, &target))
    }
}

fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Upper bound on the buffer reserved from a part's declared size.
const MAX_CAPACITY_HINT: u64 = 64 << 20;

/// The declared size comes from the archive header and is not trusted.
fn capacity_hint(declared: u64) -> usize {
    declared.min(MAX_CAPACITY_HINT) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_parts() {
        let package = Package::from_parts([
            ("[Content_Types].xml", b"<Types/>".to_vec()),
            ("word/document.xml", b"<w:document/>".to_vec()),
        ]);
        let bytes = package.to_bytes().unwrap();
        let loaded = Package::from_bytes(&bytes).unwrap();

        let names: Vec<_> = loaded.part_names().collect();
        assert_eq!(names, ["[Content_Types].xml", "word/document.xml"]);
        assert_eq!(loaded.part("word/document.xml"), Some(&b"<w:document/>"[..]));
    }

    #[test]
    fn test_replaced_parts() {
        let package = Package::from_parts([("a.xml", b"<a/>".to_vec())]);
        let bytes = package
            .to_bytes_with(&[("a.xml", b"<b/>".to_vec())])
            .unwrap();
        let loaded = Package::from_bytes(&bytes).unwrap();
        assert_eq!(loaded.part("a.xml"), Some(&b"<b/>"[..]));
    }

    #[test]
    fn test_not_a_package() {
        assert!(matches!(
            Package::from_bytes(b"plain text"),
            Err(Error::UnknownFormat)
        ));
        assert!(Package::from_bytes(b"PK\x03\x04garbage").is_err());
    }

    #[test]
    fn test_capacity_hint_is_capped() {
        assert_eq!(capacity_hint(1024), 1024);
        assert_eq!(capacity_hint(u64::MAX), 64 << 20);
    }

    #[test]
    fn test_oversized_declared_size_does_not_reserve_it() {
        let package = Package::from_parts([("word/document.xml", b"<w:document/>".to_vec())]);
        let mut data = package.to_bytes().unwrap();

        // Claim close to 4 GiB uncompressed in the central directory entry.
        let central = data
            .windows(4)
            .position(|w| w == [0x50, 0x4b, 0x01, 0x02])
            .unwrap();
        data[central + 24..central + 28].copy_from_slice(&0xF000_0000u32.to_le_bytes());

        // Reading may fail on the size mismatch, but must not abort on allocation.
        let _ = Package::from_bytes(&data);
    }

    #[test]
    fn test_related_part() {
        let rels = "<Relationships>\
            <Relationship Id=\"rId1\" Type=\"http://x/officeDocument/2006/relationships/styles\" \
            Target=\"styles.xml\"/></Relationships>";
        let package =
            Package::from_parts([("word/_rels/document.xml.rels", rels.as_bytes().to_vec())]);
        assert_eq!(
            package.related_part("word/document.xml", "styles"),
            Some("word/styles.xml".to_string())
        );
        assert_eq!(package.related_part("word/document.xml", "numbering"), None);
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("word", "styles.xml"), "word/styles.xml");
        assert_eq!(resolve_target("word", "/word/styles.xml"), "word/styles.xml");
        assert_eq!(resolve_target("word/sub", "../media/a.png"), "word/media/a.png");
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
    }
}
