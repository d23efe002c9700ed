// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open, inspect, merge, split, and password-protect existing PDF
// documents using the `lopdf` crate.

use easydoc_core::error::EasydocError;
use lopdf::encryption::{EncryptionState, EncryptionVersion, Permissions};
use lopdf::{Document, Object, ObjectId, StringFormat};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use super::assemble::PdfAssembler;

/// Reads and manipulates existing PDF files.
///
/// Wraps `lopdf::Document`. Every operation leaves the wrapped document
/// untouched and returns freshly serialised bytes.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// SHA-256 of the bytes the document was loaded from.
    fingerprint: [u8; 32],
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, EasydocError> {
        let document = Document::load_mem(data).map_err(|err| {
            EasydocError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            fingerprint: Sha256::digest(data).into(),
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page object ids in reading order.
    pub fn page_ids(&self) -> Vec<ObjectId> {
        // `get_pages` is a BTreeMap keyed by 1-indexed page number.
        self.document.get_pages().into_values().collect()
    }

    /// Whether the file carries an `/Encrypt` dictionary.
    pub fn is_encrypted(&self) -> bool {
        self.document.is_encrypted()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    // -- Extraction -----------------------------------------------------------

    /// Extract a contiguous range of pages [start..=end] (1-indexed) into a
    /// new PDF returned as bytes.
    #[instrument(skip(self), fields(start, end))]
    pub fn extract_pages(&self, start: u32, end: u32) -> Result<Vec<u8>, EasydocError> {
        let pages = self.document.get_pages();
        if start == 0 || start > end || end as usize > pages.len() {
            return Err(EasydocError::PdfError(format!(
                "page range {}..={} out of range (document has {} pages)",
                start,
                end,
                pages.len()
            )));
        }

        let page_ids: Vec<ObjectId> = (start..=end)
            .filter_map(|number| pages.get(&number).copied())
            .collect();

        let mut assembler = PdfAssembler::new();
        assembler.append_pages(&self.document, &page_ids)?;
        assembler.into_bytes()
    }

    /// Split into one single-page PDF per source page, in page order.
    #[instrument(skip(self))]
    pub fn split_pages(&self) -> Result<Vec<Vec<u8>>, EasydocError> {
        let total = self.page_count() as u32;
        info!(total, "Splitting PDF into single pages");

        let mut parts = Vec::with_capacity(total as usize);
        for page_number in 1..=total {
            parts.push(self.extract_pages(page_number, page_number)?);
        }
        Ok(parts)
    }

    /// Merge documents into a new one. Pages appear in input order, then page
    /// order within each input.
    #[instrument(skip_all, fields(documents = readers.len()))]
    pub fn merge(readers: &[PdfReader]) -> Result<Vec<u8>, EasydocError> {
        let mut assembler = PdfAssembler::new();
        for reader in readers {
            assembler.append_pages(&reader.document, &reader.page_ids())?;
        }

        info!(pages = assembler.page_count(), "Merging PDFs");

        let output = assembler.into_bytes()?;
        debug!(output_bytes = output.len(), "Merge complete");
        Ok(output)
    }

    // -- Protection -----------------------------------------------------------

    /// Encrypt the document with the standard security handler (RC4, 128-bit
    /// key). The same password opens and owns the file; only printing is
    /// permitted.
    #[instrument(skip_all)]
    pub fn lock(&self, password: &str) -> Result<Vec<u8>, EasydocError> {
        let mut doc = self.encrypted(password)?;

        let mut output = Vec::new();
        doc.save_to(&mut output).map_err(|err| {
            EasydocError::PdfError(format!("failed to serialise locked PDF: {}", err))
        })?;

        info!(output_bytes = output.len(), "PDF locked");
        Ok(output)
    }

    /// An encrypted copy of the document, before serialisation.
    fn encrypted(&self, password: &str) -> Result<Document, EasydocError> {
        if password.is_empty() {
            return Err(EasydocError::MissingPassword);
        }
        if self.is_encrypted() {
            return Err(EasydocError::PdfError(
                "document is already encrypted".to_string(),
            ));
        }

        let mut doc = self.document.clone();

        // The key derivation mixes in the first file identifier.
        if doc.trailer.get(b"ID").is_err() {
            let id = Object::String(self.fingerprint[..16].to_vec(), StringFormat::Hexadecimal);
            doc.trailer.set("ID", Object::Array(vec![id.clone(), id]));
        }

        let version = EncryptionVersion::V2 {
            document: &doc,
            owner_password: password,
            user_password: password,
            key_length: 128,
            permissions: Permissions::PRINTABLE | Permissions::PRINTABLE_IN_HIGH_QUALITY,
        };
        let state = EncryptionState::try_from(version).map_err(|err| {
            EasydocError::PdfError(format!("failed to prepare encryption: {}", err))
        })?;
        doc.encrypt(&state)
            .map_err(|err| EasydocError::PdfError(format!("failed to encrypt PDF: {}", err)))?;
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::assemble::tests::sample_pdf;
    use crate::pdf::text::{extract_text, page_text};

    #[test]
    fn rejects_garbage_bytes() {
        let err = PdfReader::from_bytes(b"definitely not a pdf").err().unwrap();
        assert!(matches!(err, EasydocError::PdfError(_)));
    }

    #[test]
    fn merge_keeps_file_then_page_order() {
        let a = PdfReader::from_bytes(&sample_pdf("Alpha", 2)).unwrap();
        let b = PdfReader::from_bytes(&sample_pdf("Beta", 1)).unwrap();

        let merged = PdfReader::merge(&[a, b]).unwrap();
        let text = extract_text(&PdfReader::from_bytes(&merged).unwrap());

        let alpha1 = text.find("Alpha 1").unwrap();
        let alpha2 = text.find("Alpha 2").unwrap();
        let beta1 = text.find("Beta 1").unwrap();
        assert!(alpha1 < alpha2 && alpha2 < beta1);
        assert!(text.contains("--- Page 3 ---"));
    }

    #[test]
    fn merge_is_associative_in_page_order() {
        let load = |label: &str, count| PdfReader::from_bytes(&sample_pdf(label, count)).unwrap();

        let ab = PdfReader::from_bytes(&PdfReader::merge(&[load("A", 1), load("B", 2)]).unwrap()).unwrap();
        let left = PdfReader::merge(&[ab, load("C", 1)]).unwrap();

        let bc = PdfReader::from_bytes(&PdfReader::merge(&[load("B", 2), load("C", 1)]).unwrap()).unwrap();
        let right = PdfReader::merge(&[load("A", 1), bc]).unwrap();

        let left_text = extract_text(&PdfReader::from_bytes(&left).unwrap());
        let right_text = extract_text(&PdfReader::from_bytes(&right).unwrap());
        assert_eq!(left_text, right_text);
    }

    #[test]
    fn split_after_merge_yields_single_pages() {
        let a = PdfReader::from_bytes(&sample_pdf("A", 3)).unwrap();
        let b = PdfReader::from_bytes(&sample_pdf("B", 2)).unwrap();
        let merged = PdfReader::from_bytes(&PdfReader::merge(&[a, b]).unwrap()).unwrap();

        let parts = merged.split_pages().unwrap();
        assert_eq!(parts.len(), 5);
        for part in &parts {
            assert_eq!(PdfReader::from_bytes(part).unwrap().page_count(), 1);
        }
    }

    #[test]
    fn extract_pages_rejects_bad_range() {
        let reader = PdfReader::from_bytes(&sample_pdf("Doc", 2)).unwrap();
        assert!(reader.extract_pages(0, 1).is_err());
        assert!(reader.extract_pages(2, 3).is_err());
        assert!(reader.extract_pages(2, 1).is_err());
    }

    #[test]
    fn lock_requires_password() {
        let reader = PdfReader::from_bytes(&sample_pdf("Secret", 1)).unwrap();
        assert!(matches!(reader.lock(""), Err(EasydocError::MissingPassword)));
    }

    #[test]
    fn locked_file_opens_only_with_its_password() {
        let reader = PdfReader::from_bytes(&sample_pdf("Secret", 1)).unwrap();
        let locked = reader.lock("hunter2").unwrap();

        let doc = Document::load_mem(&locked).unwrap();
        assert!(doc.is_encrypted());
        assert!(doc.authenticate_user_password("hunter2").is_ok());
        assert!(doc.authenticate_owner_password("hunter2").is_ok());
        assert!(doc.authenticate_user_password("letmein").is_err());
        assert!(doc.authenticate_user_password("").is_err());
    }

    #[test]
    fn encryption_hides_and_decryption_restores_pages() {
        let reader = PdfReader::from_bytes(&sample_pdf("Secret", 2)).unwrap();
        let mut doc = reader.encrypted("hunter2").unwrap();

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let scrambled = page_text(&doc, page_ids[0]);
        assert_ne!(scrambled, "Secret 1");

        assert!(doc.decrypt("letmein").is_err());
        doc.decrypt("hunter2").unwrap();
        let texts: Vec<String> = page_ids.iter().map(|&id| page_text(&doc, id)).collect();
        assert_eq!(texts, ["Secret 1", "Secret 2"]);
    }

    #[test]
    fn already_locked_documents_are_refused() {
        let reader = PdfReader::from_bytes(&sample_pdf("Secret", 1)).unwrap();
        let twice = PdfReader {
            document: reader.encrypted("hunter2").unwrap(),
            fingerprint: reader.fingerprint,
        };
        assert!(matches!(twice.lock("again"), Err(EasydocError::PdfError(_))));
    }
}
