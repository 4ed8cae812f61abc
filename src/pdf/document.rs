use crate::breakpoints::Span;
use crate::pdf::outline::{read_outline, OutlineEntry};
use anyhow::{Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        log::info!("loaded {} ({} pages)", path_str, doc.get_pages().len());
        Ok(PdfDocument {
            doc,
            path: path_str,
        })
    }

    #[cfg(test)]
    pub fn from_document(doc: Document, path: impl Into<String>) -> Self {
        PdfDocument {
            doc,
            path: path.into(),
        }
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    pub fn outline(&self) -> Result<Vec<OutlineEntry>> {
        read_outline(&self.doc)
            .with_context(|| format!("Failed to read outline of {}", self.path))
    }

    /// Copy the pages of `span` into a new document, in their original order.
    pub fn extract_span(&self, span: Span) -> Result<Document> {
        let total = self.page_count();
        if span.is_empty() {
            anyhow::bail!("Span {}-{} contains no pages", span.start, span.end);
        }
        if span.start == 0 || span.last() > total {
            anyhow::bail!(
                "Span {}-{} is out of range (1-{})",
                span.start,
                span.last(),
                total
            );
        }

        let mut new_doc = self.doc.clone();

        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .into_iter()
            .map(|(num, _)| num)
            .filter(|num| !span.contains(*num))
            .collect();

        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
        }

        // Bookmarks point into the whole source document
        drop_outline(&mut new_doc);
        new_doc.prune_objects();

        log::debug!(
            "span {}-{}: kept {} page(s), deleted {}",
            span.start,
            span.last(),
            new_doc.get_pages().len(),
            pages_to_delete.len()
        );

        Ok(new_doc)
    }

    /// Serialize to an in-memory buffer
    pub fn to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .context("Failed to serialize PDF")?;
        Ok(buffer)
    }
}

fn drop_outline(doc: &mut Document) {
    let root = match doc.trailer.get(b"Root").and_then(Object::as_reference) {
        Ok(id) => id,
        Err(_) => return,
    };
    if let Ok(catalog) = doc.get_dictionary_mut(root) {
        catalog.remove(b"Outlines");
        let shows_outline = matches!(
            catalog.get(b"PageMode"),
            Ok(Object::Name(mode)) if mode == b"UseOutlines"
        );
        if shows_outline {
            catalog.remove(b"PageMode");
        }
    }
}
