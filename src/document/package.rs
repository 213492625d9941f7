/*!
 * ZIP container codec.
 *
 * Opens a ZIP-based compound document into an ordered list of named
 * parts and writes it back. Part order is preserved exactly as read,
 * unmodified parts keep their bytes and compression method untouched,
 * and rewritten parts are stored with deflate compression, which every
 * standard viewer accepts.
 */

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::ContainerError;

/// A named byte-stream entry inside the package
#[derive(Debug, Clone)]
pub struct Part {
    /// Path-like part name (e.g. `word/document.xml`)
    pub name: String,
    /// Raw part bytes
    pub bytes: Vec<u8>,
    /// Whether this part carries translatable XML text
    pub text_bearing: bool,
    /// Directory entries are carried through without data
    is_dir: bool,
    /// Compression method the entry was read with; rewritten parts
    /// switch to deflate
    compression: CompressionMethod,
}

impl Part {
    /// True for directory entries, which carry no data
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Compression method this part will be written with
    pub fn compression(&self) -> CompressionMethod {
        self.compression
    }
}

/// An ordered collection of named parts read from one container
#[derive(Debug, Clone)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Open a container from raw bytes.
    ///
    /// Fails with [`ContainerError::CorruptContainer`] when the bytes are
    /// not a well-formed archive, and with [`ContainerError::MissingPart`]
    /// when a declared entry's data cannot actually be read.
    pub fn open(bytes: &[u8]) -> Result<Self, ContainerError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ContainerError::CorruptContainer(e.to_string()))?;

        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| ContainerError::CorruptContainer(e.to_string()))?;
            let name = entry.name().to_string();
            let is_dir = entry.is_dir();
            let compression = entry.compression();

            let mut data = Vec::with_capacity(entry.size() as usize);
            if !is_dir {
                entry
                    .read_to_end(&mut data)
                    .map_err(|_| ContainerError::MissingPart(name.clone()))?;
            }

            let text_bearing = is_text_bearing(&name);
            parts.push(Part {
                name,
                bytes: data,
                text_bearing,
                is_dir,
                compression,
            });
        }

        Ok(Self { parts })
    }

    /// Write the package back to container bytes.
    ///
    /// Parts are emitted in the order they were read, each with the
    /// compression method it was read with. Only rewritten parts lose
    /// their original layout (they switch to deflate); there is no
    /// attempt to bit-match those, only to stay valid for the same
    /// class of viewer.
    pub fn write(&self) -> Result<Vec<u8>, ContainerError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for part in &self.parts {
            let options =
                SimpleFileOptions::default().compression_method(part.compression);
            if part.is_dir {
                writer
                    .add_directory(part.name.as_str(), options)
                    .map_err(|e| ContainerError::WriteFailed(e.to_string()))?;
                continue;
            }
            writer
                .start_file(part.name.as_str(), options)
                .map_err(|e| ContainerError::WriteFailed(e.to_string()))?;
            writer
                .write_all(&part.bytes)
                .map_err(|e| ContainerError::WriteFailed(e.to_string()))?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| ContainerError::WriteFailed(e.to_string()))?;
        Ok(cursor.into_inner())
    }

    /// All parts in document order
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Number of parts in the package
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// True when the package has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Indices of the text-bearing parts, in package order
    pub fn text_bearing_indices(&self) -> Vec<usize> {
        self.parts
            .iter()
            .enumerate()
            .filter(|(_, p)| p.text_bearing)
            .map(|(i, _)| i)
            .collect()
    }

    /// Borrow a part by index
    pub fn part(&self, index: usize) -> &Part {
        &self.parts[index]
    }

    /// Replace a rewritten part's bytes, keeping its position.
    ///
    /// Rewritten parts are written back with deflate regardless of how
    /// they were originally stored.
    pub fn replace_bytes(&mut self, index: usize, bytes: Vec<u8>) {
        self.parts[index].bytes = bytes;
        self.parts[index].compression = CompressionMethod::Deflated;
    }
}

/// Decide whether a part name holds translatable document text.
///
/// Body, header and footer parts of a WordprocessingML package qualify;
/// everything else (media, styles, relationships, properties) is an
/// opaque payload that is copied verbatim and never parsed.
pub fn is_text_bearing(name: &str) -> bool {
    if name == "word/document.xml" {
        return true;
    }
    if let Some(rest) = name.strip_prefix("word/") {
        if !rest.ends_with(".xml") || rest.contains('/') {
            return false;
        }
        return rest.starts_with("header") || rest.starts_with("footer");
    }
    false
}
