use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};

/// One bookmark from the document outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    /// Zero-based index of the page the entry jumps to. `None` for grouping
    /// labels that have no page destination of their own.
    pub page_index: Option<u32>,
    pub depth: u32,
    pub children: Vec<OutlineEntry>,
}

impl OutlineEntry {
    pub fn is_destination(&self) -> bool {
        self.page_index.is_some()
    }
}

/// Read the outline tree of a document. A document without `/Outlines`
/// yields an empty tree.
pub fn read_outline(doc: &Document) -> Result<Vec<OutlineEntry>> {
    let catalog = doc.catalog().context("Failed to get document catalog")?;

    let outlines = match catalog.get(b"Outlines") {
        Ok(obj) => match dictionary(doc, obj) {
            Some(d) => d,
            None => return Ok(Vec::new()),
        },
        Err(_) => return Ok(Vec::new()),
    };

    let first = match outlines.get(b"First") {
        Ok(Object::Reference(r)) => *r,
        _ => return Ok(Vec::new()),
    };

    let mut reader = OutlineReader::new(doc);
    let entries = reader.read_siblings(first, 0);
    log::debug!(
        "read {} top-level outline entries ({} items visited)",
        entries.len(),
        reader.visited.len()
    );
    Ok(entries)
}

struct OutlineReader<'a> {
    doc: &'a Document,
    page_indices: HashMap<ObjectId, u32>,
    visited: HashSet<ObjectId>,
}

impl<'a> OutlineReader<'a> {
    fn new(doc: &'a Document) -> Self {
        // get_pages() is keyed by 1-based page number
        let page_indices = doc
            .get_pages()
            .into_iter()
            .map(|(num, id)| (id, num - 1))
            .collect();

        OutlineReader {
            doc,
            page_indices,
            visited: HashSet::new(),
        }
    }

    fn read_siblings(&mut self, first: ObjectId, depth: u32) -> Vec<OutlineEntry> {
        let doc = self.doc;
        let mut entries = Vec::new();
        let mut current = Some(first);

        while let Some(id) = current {
            if !self.visited.insert(id) {
                log::warn!("outline item {:?} visited twice, stopping walk", id);
                break;
            }

            let dict = match doc.get_dictionary(id) {
                Ok(d) => d,
                Err(_) => break,
            };

            let title = match dict.get(b"Title") {
                Ok(obj) => match resolve(doc, obj) {
                    Some(Object::String(bytes, _)) => decode_pdf_string(bytes),
                    _ => String::new(),
                },
                Err(_) => String::new(),
            };

            let page_index = self.item_page_index(dict);

            let children = match dict.get(b"First") {
                Ok(Object::Reference(child)) => self.read_siblings(*child, depth + 1),
                _ => Vec::new(),
            };

            entries.push(OutlineEntry {
                title,
                page_index,
                depth,
                children,
            });

            current = match dict.get(b"Next") {
                Ok(Object::Reference(r)) => Some(*r),
                _ => None,
            };
        }

        entries
    }

    fn item_page_index(&self, item: &Dictionary) -> Option<u32> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.destination_page(dest, 0);
        }

        let action = dictionary(self.doc, item.get(b"A").ok()?)?;
        match action.get(b"S") {
            Ok(Object::Name(kind)) if kind == b"GoTo" => {
                self.destination_page(action.get(b"D").ok()?, 0)
            }
            _ => None,
        }
    }

    fn destination_page(&self, dest: &Object, hops: u8) -> Option<u32> {
        // Named destinations can point at each other
        if hops > 8 {
            return None;
        }

        match resolve(self.doc, dest)? {
            Object::Array(arr) => self.page_from_array(arr),
            Object::String(name, _) | Object::Name(name) => {
                let target = self.named_destination(name)?;
                self.destination_page(target, hops + 1)
            }
            Object::Dictionary(d) => self.destination_page(d.get(b"D").ok()?, hops + 1),
            _ => None,
        }
    }

    fn page_from_array(&self, arr: &[Object]) -> Option<u32> {
        match arr.first()? {
            Object::Reference(page) => self.page_indices.get(page).copied(),
            // Remote-style destinations give the page index directly
            Object::Integer(i) => u32::try_from(*i)
                .ok()
                .filter(|index| (*index as usize) < self.page_indices.len()),
            _ => None,
        }
    }

    fn named_destination(&self, name: &[u8]) -> Option<&'a Object> {
        let catalog = self.doc.catalog().ok()?;

        if let Some(names) = catalog
            .get(b"Names")
            .ok()
            .and_then(|obj| dictionary(self.doc, obj))
        {
            if let Some(tree) = names
                .get(b"Dests")
                .ok()
                .and_then(|obj| dictionary(self.doc, obj))
            {
                let mut seen = HashSet::new();
                if let Some(found) = self.search_name_tree(tree, name, &mut seen) {
                    return Some(found);
                }
            }
        }

        // Pre-1.2 style /Dests dictionary on the catalog
        let dests = dictionary(self.doc, catalog.get(b"Dests").ok()?)?;
        dests.get(name).ok()
    }

    fn search_name_tree(
        &self,
        node: &'a Dictionary,
        name: &[u8],
        seen: &mut HashSet<ObjectId>,
    ) -> Option<&'a Object> {
        if let Ok(Object::Array(pairs)) = node.get(b"Names") {
            for pair in pairs.chunks_exact(2) {
                if let Some(Object::String(key, _)) = resolve(self.doc, &pair[0]) {
                    if key.as_slice() == name {
                        return Some(&pair[1]);
                    }
                }
            }
        }

        if let Ok(Object::Array(kids)) = node.get(b"Kids") {
            for kid in kids {
                if let Object::Reference(id) = kid {
                    if !seen.insert(*id) {
                        continue;
                    }
                }
                if let Some(kid) = dictionary(self.doc, kid) {
                    if let Some(found) = self.search_name_tree(kid, name, seen) {
                        return Some(found);
                    }
                }
            }
        }

        None
    }
}

/// Follow a single reference, if any.
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn dictionary<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, obj)? {
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        // PDFDocEncoding, close enough to Latin-1 for titles
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}
