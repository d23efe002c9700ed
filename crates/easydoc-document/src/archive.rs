// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory zip archives for multi-file outputs (split pages, rendered
// images) and for .docx packages.

use std::io::{Cursor, Write};

use easydoc_core::config::ArchiveCompression;
use easydoc_core::error::EasydocError;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builds a zip archive entry by entry in memory.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl ArchiveBuilder {
    pub fn new(compression: ArchiveCompression) -> Self {
        let method = match compression {
            ArchiveCompression::Stored => CompressionMethod::Stored,
            ArchiveCompression::Deflated => CompressionMethod::Deflated,
        };
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(method),
            entries: 0,
        }
    }

    /// Append an entry. Names use `/` separators.
    pub fn add(&mut self, name: &str, data: &[u8]) -> Result<(), EasydocError> {
        self.writer
            .start_file(name, self.options)
            .map_err(|err| EasydocError::ArchiveError(format!("cannot start {}: {}", name, err)))?;
        self.writer
            .write_all(data)
            .map_err(|err| EasydocError::ArchiveError(format!("cannot write {}: {}", name, err)))?;
        self.entries += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Write the central directory and return the archive bytes.
    pub fn finish(self) -> Result<Vec<u8>, EasydocError> {
        let entries = self.entries;
        let cursor = self
            .writer
            .finish()
            .map_err(|err| EasydocError::ArchiveError(format!("cannot finish archive: {}", err)))?;
        let bytes = cursor.into_inner();
        debug!(entries, output_bytes = bytes.len(), "Archive finished");
        Ok(bytes)
    }
}

/// Zip `items` as `<prefix><n>.<extension>`, numbered from 1.
pub fn numbered_archive(
    items: &[Vec<u8>],
    prefix: &str,
    extension: &str,
    compression: ArchiveCompression,
) -> Result<Vec<u8>, EasydocError> {
    let mut archive = ArchiveBuilder::new(compression);
    for (index, item) in items.iter().enumerate() {
        archive.add(&format!("{}{}.{}", prefix, index + 1, extension), item)?;
    }
    archive.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn entries_are_numbered_from_one() {
        let items = vec![b"first".to_vec(), b"second".to_vec()];
        let bytes = numbered_archive(&items, "page_", "pdf", ArchiveCompression::Deflated).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut contents = String::new();
        archive
            .by_name("page_2.pdf")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "second");
    }

    #[test]
    fn stored_entries_are_uncompressed() {
        let mut builder = ArchiveBuilder::new(ArchiveCompression::Stored);
        builder.add("a.txt", b"aaaaaaaaaaaaaaaa").unwrap();
        assert_eq!(builder.len(), 1);
        let bytes = builder.finish().unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let entry = archive.by_index(0).unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Stored);
    }

    #[test]
    fn empty_archive_is_still_valid() {
        let bytes = ArchiveBuilder::new(ArchiveCompression::Deflated).finish().unwrap();
        assert_eq!(ZipArchive::new(Cursor::new(bytes)).unwrap().len(), 0);
    }
}
