// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF assembly — build a fresh document by copying pages (and everything they
// reference) out of other `lopdf` documents, or by appending new pages.

use std::collections::HashMap;

use easydoc_core::error::EasydocError;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, warn};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// US Letter, the PDF default when no MediaBox is found anywhere.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// A document under construction with an empty page tree.
pub struct PdfAssembler {
    document: Document,
    pages_id: ObjectId,
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfAssembler {
    /// Create a document containing only a catalog and an empty `/Pages` node.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        Self { document, pages_id }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.document
            .get_dictionary(self.pages_id)
            .ok()
            .and_then(|pages| pages.get(b"Kids").ok())
            .and_then(|kids| kids.as_array().ok())
            .map(|kids| kids.len())
            .unwrap_or(0)
    }

    /// Mutable access for adding shared objects (fonts, form XObjects).
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Copy `page_ids` from `source`, in order, appending each as a new page.
    ///
    /// Objects shared between the copied pages (fonts, images) are copied
    /// once. Inherited attributes are materialised on each copied page, since
    /// the source's intermediate page-tree nodes are not carried over.
    pub fn append_pages(
        &mut self,
        source: &Document,
        page_ids: &[ObjectId],
    ) -> Result<(), EasydocError> {
        let mut cloner = ObjectCloner::new(source);
        for &page_id in page_ids {
            let page = source.get_dictionary(page_id).map_err(|err| {
                EasydocError::PdfError(format!("cannot read page object {:?}: {}", page_id, err))
            })?;

            // Reserve the target id first so back-references (e.g. an
            // annotation's /P) resolve to the copy rather than recursing.
            let new_page_id = self.document.new_object_id();
            cloner.memo.insert(page_id, new_page_id);

            let mut new_page = Dictionary::new();
            for (key, value) in page.iter() {
                if key == b"Parent" {
                    continue;
                }
                new_page.set(key.clone(), cloner.clone_object(&mut self.document, value));
            }
            for key in INHERITABLE_KEYS {
                if new_page.has(key) {
                    continue;
                }
                if let Some(inherited) = inherited_attribute(source, page_id, key) {
                    new_page.set(key.to_vec(), cloner.clone_object(&mut self.document, &inherited));
                }
            }

            self.document
                .objects
                .insert(new_page_id, Object::Dictionary(new_page));
            self.link_page(new_page_id)?;
        }
        debug!(copied = page_ids.len(), total = self.page_count(), "Pages appended");
        Ok(())
    }

    /// Append a page built from scratch: `resources` and a content stream.
    pub fn push_page(
        &mut self,
        media_box: [f32; 4],
        resources: Dictionary,
        content: Vec<u8>,
    ) -> Result<ObjectId, EasydocError> {
        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), content));
        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.iter().map(|&v| Object::Real(v)).collect::<Vec<Object>>(),
            "Resources" => resources,
            "Contents" => content_id,
        });
        self.link_page(page_id)?;
        Ok(page_id)
    }

    /// Add `page_id` to the root `/Kids` array and point its `/Parent` at it.
    fn link_page(&mut self, page_id: ObjectId) -> Result<(), EasydocError> {
        let pages = self
            .document
            .get_object_mut(self.pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(|err| EasydocError::PdfError(format!("no /Pages node: {}", err)))?;

        if let Ok(Object::Array(kids)) = pages.get_mut(b"Kids") {
            kids.push(Object::Reference(page_id));
        }
        if let Ok(Object::Integer(count)) = pages.get_mut(b"Count") {
            *count += 1;
        }

        if let Ok(Object::Dictionary(page)) = self.document.get_object_mut(page_id) {
            page.set("Parent", Object::Reference(self.pages_id));
        }
        Ok(())
    }

    /// Serialise the assembled document.
    pub fn into_bytes(mut self) -> Result<Vec<u8>, EasydocError> {
        self.document.compress();
        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            EasydocError::PdfError(format!("failed to serialise assembled PDF: {}", err))
        })?;
        Ok(output)
    }
}

/// Deep-copies objects from one document into another, following references.
///
/// Each source object is copied at most once per cloner, so shared resources
/// stay shared and reference cycles terminate. `/Parent` links are dropped;
/// callers re-link pages into their new tree.
pub struct ObjectCloner<'a> {
    source: &'a Document,
    memo: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCloner<'a> {
    pub fn new(source: &'a Document) -> Self {
        Self {
            source,
            memo: HashMap::new(),
        }
    }

    pub fn source(&self) -> &'a Document {
        self.source
    }

    /// Copy `object` into `target`, returning the value to store there.
    pub fn clone_object(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(ref_id) => Object::Reference(self.clone_reference(target, *ref_id)),
            Object::Dictionary(dict) => Object::Dictionary(self.clone_dictionary(target, dict)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.clone_object(target, item))
                    .collect(),
            ),
            Object::Stream(stream) => {
                let dict = self.clone_dictionary(target, &stream.dict);
                // Keep the encoded bytes as-is; /Filter travels with the dict.
                Object::Stream(Stream::new(dict, stream.content.clone()).with_compression(false))
            }
            other => other.clone(),
        }
    }

    fn clone_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let mut new_dict = Dictionary::new();
        for (key, value) in dict.iter() {
            if key == b"Parent" {
                continue;
            }
            new_dict.set(key.clone(), self.clone_object(target, value));
        }
        new_dict
    }

    fn clone_reference(&mut self, target: &mut Document, ref_id: ObjectId) -> ObjectId {
        if let Some(&existing) = self.memo.get(&ref_id) {
            return existing;
        }
        let new_id = target.new_object_id();
        self.memo.insert(ref_id, new_id);

        let cloned = match self.source.get_object(ref_id) {
            Ok(referenced) => self.clone_object(target, referenced),
            Err(err) => {
                warn!(?ref_id, %err, "Cannot resolve reference, using Null");
                Object::Null
            }
        };
        target.objects.insert(new_id, cloned);
        new_id
    }
}

/// Look up `key` on the page or the nearest ancestor that defines it,
/// resolving a top-level reference.
pub fn inherited_attribute(document: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = document.get_dictionary(page_id).ok()?;
    // Guard against malformed trees whose /Parent links loop.
    for _ in 0..64 {
        if let Ok(value) = current.get(key) {
            return match value {
                Object::Reference(id) => document.get_object(*id).ok().cloned(),
                other => Some(other.clone()),
            };
        }
        let parent_id = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = document.get_dictionary(parent_id).ok()?;
    }
    None
}

/// The page's MediaBox as `[llx, lly, urx, ury]`, falling back to US Letter.
pub fn media_box(document: &Document, page_id: ObjectId) -> [f32; 4] {
    let Some(Object::Array(values)) = inherited_attribute(document, page_id, b"MediaBox") else {
        return DEFAULT_MEDIA_BOX;
    };
    let numbers: Vec<f32> = values
        .iter()
        .filter_map(|value| match value {
            Object::Integer(i) => Some(*i as f32),
            Object::Real(r) => Some(*r as f32),
            Object::Reference(id) => document
                .get_object(*id)
                .ok()
                .and_then(|obj| obj.as_float().ok()),
            _ => None,
        })
        .collect();
    match numbers.as_slice() {
        [a, b, c, d] => [a.min(*c), b.min(*d), a.max(*c), b.max(*d)],
        _ => DEFAULT_MEDIA_BOX,
    }
}

/// The page's resources dictionary, resolved through inheritance.
pub fn page_resources(document: &Document, page_id: ObjectId) -> Dictionary {
    match inherited_attribute(document, page_id, b"Resources") {
        Some(Object::Dictionary(dict)) => dict,
        _ => Dictionary::new(),
    }
}

/// Decoded content of all of a page's content streams, newline separated.
pub fn page_content(document: &Document, page_id: ObjectId) -> Vec<u8> {
    let mut content = Vec::new();
    for stream_id in document.get_page_contents(page_id) {
        let Ok(stream) = document.get_object(stream_id).and_then(Object::as_stream) else {
            continue;
        };
        match stream.decompressed_content() {
            Ok(data) => content.extend_from_slice(&data),
            Err(_) => content.extend_from_slice(&stream.content),
        }
        content.push(b'\n');
    }
    content
}
