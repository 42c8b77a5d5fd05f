//! Page-level plumbing shared by split and merge.
//!
//! Both operations build a brand-new document with a single flat page tree:
//! every page is hung directly off one `Pages` node, with the attributes it
//! used to inherit from its ancestors copied onto the page itself.

use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

/// Page attributes a page may inherit from its ancestors.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Object ids of all pages, in document order.
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Copy of a page dictionary with inherited attributes resolved and the
/// `Parent` link removed.
pub fn flatten_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut page = doc
        .get_dictionary(page_id)
        .with_context(|| format!("processing page object {} {}", page_id.0, page_id.1))?
        .clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(parent_id) = parent {
        if depth == MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE_KEYS {
            if !page.has(key)
                && let Ok(value) = node.get(key)
            {
                page.set(key.to_vec(), value.clone());
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    if !page.has(b"MediaBox") {
        // US Letter, what viewers assume anyway
        let media_box: Vec<Object> = vec![0.into(), 0.into(), 612.into(), 792.into()];
        page.set("MediaBox", media_box);
    }
    page.remove(b"Parent");
    Ok(page)
}

fn is_page_tree_node(object: &Object) -> bool {
    let Ok(dict) = object.as_dict() else {
        return false;
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Page") | Ok(b"Pages")
    )
}

/// Copy every object reachable from `object` into `target`.
///
/// Other pages and page tree nodes are never pulled in, so a page that links
/// to a sibling (annotations, form fields) does not drag the whole source
/// document along. Such links are left dangling and read as null.
fn copy_dependencies(target: &mut Document, source: &Document, object: &Object) {
    match object {
        Object::Reference(id) => {
            if target.objects.contains_key(id) {
                return;
            }
            let Ok(referenced) = source.get_object(*id) else {
                return;
            };
            if is_page_tree_node(referenced) {
                return;
            }
            target.objects.insert(*id, referenced.clone());
            copy_dependencies(target, source, referenced);
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter() {
                copy_dependencies(target, source, value);
            }
        }
        Object::Array(items) => {
            for item in items {
                copy_dependencies(target, source, item);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter() {
                copy_dependencies(target, source, value);
            }
        }
        _ => {}
    }
}

fn parse_version(version: &str) -> (u8, u8) {
    let (major, minor) = version.split_once('.').unwrap_or((version, "0"));
    (major.parse().unwrap_or(1), minor.parse().unwrap_or(0))
}

/// A document under construction with one flat page tree.
pub struct OutputDocument {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl OutputDocument {
    /// Empty output document.
    pub fn new(version: &str) -> Self {
        let mut doc = Document::with_version(version);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Empty output document that keeps `source` object ids, so pages can be
    /// copied from it without renumbering.
    pub fn for_source(source: &Document) -> Self {
        let mut doc = Document::with_version(source.version.as_str());
        doc.max_id = source.max_id;
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Copy one page of `source`, and everything it depends on, into this
    /// document. `self` must have been created with [`Self::for_source`].
    pub fn push_page(&mut self, source: &Document, page_id: ObjectId) -> Result<()> {
        let mut page = flatten_page(source, page_id)?;
        page.set("Parent", self.pages_id);
        let page = Object::Dictionary(page);

        self.doc.objects.insert(page_id, page.clone());
        copy_dependencies(&mut self.doc, source, &page);
        self.kids.push(page_id);
        Ok(())
    }

    /// Append every page of `source`, in order. Returns the number of pages
    /// appended.
    pub fn append_document(&mut self, source: &Document) -> Result<usize> {
        let mut incoming = source.clone();
        incoming.renumber_objects_with(self.doc.max_id + 1);

        let ids = page_ids(&incoming);
        let mut pages = Vec::with_capacity(ids.len());
        for page_id in &ids {
            pages.push((*page_id, flatten_page(&incoming, *page_id)?));
        }

        if parse_version(&incoming.version) > parse_version(&self.doc.version) {
            self.doc.version = incoming.version.clone();
        }

        let catalog_id = incoming
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .ok();
        let max_id = incoming.max_id;

        for (id, object) in incoming.objects {
            if Some(id) == catalog_id || is_page_tree_node(&object) {
                continue;
            }
            self.doc.objects.insert(id, object);
        }

        for (id, mut page) in pages {
            page.set("Parent", self.pages_id);
            self.doc.objects.insert(id, Object::Dictionary(page));
            self.kids.push(id);
        }

        self.doc.max_id = self.doc.max_id.max(max_id);
        Ok(ids.len())
    }

    /// Write the page tree and catalog, drop unreachable objects and
    /// serialize.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let count = self.kids.len() as i64;
        let kids: Vec<Object> = self.kids.iter().map(|id| Object::Reference(*id)).collect();
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        self.doc.prune_objects();
        self.doc.renumber_objects();
        self.doc.compress();

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .context("processing failed while serializing output document")?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{page_tags, sample_document};

    #[test]
    fn test_flatten_inherits_from_pages_node() {
        let doc = sample_document("a", 2);
        let first = page_ids(&doc)[0];

        // Resources and MediaBox live on the Pages node in the fixture.
        assert!(!doc.get_dictionary(first).unwrap().has(b"Resources"));

        let page = flatten_page(&doc, first).unwrap();
        assert!(page.has(b"Resources"));
        assert!(page.has(b"MediaBox"));
        assert!(!page.has(b"Parent"));
    }

    #[test]
    fn test_flatten_keeps_own_attributes() {
        let mut doc = sample_document("a", 1);
        let first = page_ids(&doc)[0];
        let own_box: Vec<Object> = vec![0.into(), 0.into(), 100.into(), 100.into()];
        doc.get_dictionary_mut(first)
            .unwrap()
            .set("MediaBox", own_box);

        let page = flatten_page(&doc, first).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_i64().unwrap(), 100);
    }

    #[test]
    fn test_push_single_page() {
        let source = sample_document("a", 3);
        let second = page_ids(&source)[1];

        let mut output = OutputDocument::for_source(&source);
        output.push_page(&source, second).unwrap();
        assert_eq!(output.page_count(), 1);

        let bytes = output.finish().unwrap();
        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
        assert_eq!(page_tags(&parsed), vec!["a-2"]);
    }

    #[test]
    fn test_append_keeps_order() {
        let a = sample_document("a", 2);
        let b = sample_document("b", 3);

        let mut output = OutputDocument::new("1.4");
        assert_eq!(output.append_document(&a).unwrap(), 2);
        assert_eq!(output.append_document(&b).unwrap(), 3);

        let parsed = Document::load_mem(&output.finish().unwrap()).unwrap();
        assert_eq!(
            page_tags(&parsed),
            vec!["a-1", "a-2", "b-1", "b-2", "b-3"]
        );
    }

    #[test]
    fn test_append_takes_newest_version() {
        let mut newer = sample_document("n", 1);
        newer.version = "1.7".to_string();

        let mut output = OutputDocument::new("1.4");
        output.append_document(&newer).unwrap();
        assert_eq!(output.doc.version, "1.7");
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("1.7"), (1, 7));
        assert_eq!(parse_version("2.0"), (2, 0));
        assert!(parse_version("1.10") > parse_version("1.9"));
    }
}
