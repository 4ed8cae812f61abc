//! In-memory PDFs for tests.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

pub enum Bookmark {
    Page(&'static str, u32),
    GoTo(&'static str, u32),
    Named(&'static str, &'static str, u32),
    Group(&'static str, Vec<Bookmark>),
}

impl Bookmark {
    pub fn page(title: &'static str, index: u32) -> Self {
        Bookmark::Page(title, index)
    }

    pub fn goto(title: &'static str, index: u32) -> Self {
        Bookmark::GoTo(title, index)
    }

    pub fn named(title: &'static str, name: &'static str, index: u32) -> Self {
        Bookmark::Named(title, name, index)
    }

    pub fn group(title: &'static str, children: Vec<Bookmark>) -> Self {
        Bookmark::Group(title, children)
    }
}

/// Build a document with `num_pages` pages, each drawing "Page N", and the
/// given outline. Bookmark page indices are zero-based.
pub fn document(num_pages: u32, bookmarks: &[Bookmark]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    for i in 0..num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        page_marker(i + 1).into_bytes(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().expect("encode content"),
        ));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);

    if !bookmarks.is_empty() {
        let mut named = Vec::new();
        let outlines_id = doc.new_object_id();
        let (first, last) = add_items(&mut doc, outlines_id, bookmarks, &page_ids, &mut named);
        let outlines = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Outlines".to_vec())),
            ("First", Object::Reference(first)),
            ("Last", Object::Reference(last)),
            ("Count", Object::Integer(bookmarks.len() as i64)),
        ]);
        doc.objects.insert(outlines_id, Object::Dictionary(outlines));
        catalog.set("Outlines", Object::Reference(outlines_id));

        if !named.is_empty() {
            let dests = doc.add_object(Dictionary::from_iter(vec![("Names", Object::Array(named))]));
            let names = doc.add_object(Dictionary::from_iter(vec![("Dests", Object::Reference(dests))]));
            catalog.set("Names", Object::Reference(names));
        }
    }

    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

pub fn page_marker(page: u32) -> String {
    format!("Page {}", page)
}

/// Source page numbers of every page in `doc`, in page tree order. Pages
/// without a recognisable marker come out as 0.
pub fn source_pages(doc: &Document) -> Vec<u32> {
    doc.get_pages()
        .values()
        .map(|&id| {
            (1..=500)
                .find(|&n| page_has_marker(doc, id, n))
                .unwrap_or(0)
        })
        .collect()
}

/// Same as [`document`], serialized.
pub fn document_bytes(num_pages: u32, bookmarks: &[Bookmark]) -> Vec<u8> {
    let mut doc = document(num_pages, bookmarks);
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save fixture");
    buffer
}

/// Object ids of the top-level outline items, in order.
pub fn outline_item_ids(doc: &Document) -> Vec<ObjectId> {
    let outlines = doc
        .catalog()
        .and_then(|c| c.get(b"Outlines"))
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .expect("outline");

    let mut ids = Vec::new();
    let mut current = outlines.get(b"First").and_then(Object::as_reference).ok();
    while let Some(id) = current {
        ids.push(id);
        current = doc
            .get_dictionary(id)
            .and_then(|d| d.get(b"Next"))
            .and_then(Object::as_reference)
            .ok();
    }
    ids
}

/// Whether the page with `page_id` draws the marker for source page `page`.
pub fn page_has_marker(doc: &Document, page_id: ObjectId, page: u32) -> bool {
    let content = doc.get_page_content(page_id).expect("page content");
    // Literal strings are written in parentheses
    let marker = format!("({})", page_marker(page));
    content
        .windows(marker.len())
        .any(|w| w == marker.as_bytes())
}

fn add_items(
    doc: &mut Document,
    parent: ObjectId,
    bookmarks: &[Bookmark],
    page_ids: &[ObjectId],
    named: &mut Vec<Object>,
) -> (ObjectId, ObjectId) {
    let ids: Vec<ObjectId> = bookmarks.iter().map(|_| doc.new_object_id()).collect();

    for (i, bookmark) in bookmarks.iter().enumerate() {
        let mut item = Dictionary::new();
        item.set("Parent", Object::Reference(parent));
        if i > 0 {
            item.set("Prev", Object::Reference(ids[i - 1]));
        }
        if i + 1 < ids.len() {
            item.set("Next", Object::Reference(ids[i + 1]));
        }

        let dest = |index: u32| {
            Object::Array(vec![
                Object::Reference(page_ids[index as usize]),
                Object::Name(b"Fit".to_vec()),
            ])
        };

        let title = match bookmark {
            Bookmark::Page(title, index) => {
                item.set("Dest", dest(*index));
                title
            }
            Bookmark::GoTo(title, index) => {
                let action = Dictionary::from_iter(vec![
                    ("S", Object::Name(b"GoTo".to_vec())),
                    ("D", dest(*index)),
                ]);
                item.set("A", Object::Dictionary(action));
                title
            }
            Bookmark::Named(title, name, index) => {
                named.push(Object::string_literal(*name));
                named.push(dest(*index));
                item.set("Dest", Object::string_literal(*name));
                title
            }
            Bookmark::Group(title, children) => {
                let (first, last) = add_items(doc, ids[i], children, page_ids, named);
                item.set("First", Object::Reference(first));
                item.set("Last", Object::Reference(last));
                item.set("Count", Object::Integer(children.len() as i64));
                title
            }
        };
        item.set("Title", Object::string_literal(*title));

        doc.objects.insert(ids[i], Object::Dictionary(item));
    }

    (ids[0], ids[ids.len() - 1])
}
