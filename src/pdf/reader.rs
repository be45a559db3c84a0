use std::path::{Path, PathBuf};

use anyhow::Context;
use lopdf::{Object, ObjectId, dictionary};

use crate::{
    assets::decode::image_id,
    compose::pairing::paired_id,
    document::fingerprint::fingerprint_bytes,
    foundation::{
        error::{CardsheetError, CardsheetResult},
        fs::atomic_write,
    },
    pdf::writer::{PDF_VERSION, finish_trailer, save_to_bytes},
};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];
const MAX_TREE_DEPTH: usize = 32;

/// Parse the PDF at `path`.
pub fn load_pdf(path: &Path) -> CardsheetResult<lopdf::Document> {
    if !path.is_file() {
        return Err(CardsheetError::not_found(format!(
            "pdf file '{}'",
            path.display()
        )));
    }
    let doc = lopdf::Document::load(path)
        .with_context(|| format!("parse pdf '{}'", path.display()))?;
    Ok(doc)
}

/// Number of pages in an encoded PDF.
pub fn page_count(bytes: &[u8]) -> CardsheetResult<usize> {
    let doc = lopdf::Document::load_mem(bytes).context("parse pdf bytes")?;
    Ok(doc.get_pages().len())
}

/// Number of pages in the PDF at `path`.
pub fn page_count_file(path: &Path) -> CardsheetResult<usize> {
    Ok(load_pdf(path)?.get_pages().len())
}

/// New document made of the first page of each part, in order.
///
/// Attributes the first page inherits from its page tree are copied onto it so it renders the
/// same after being moved under the new tree.
pub fn merge_first_pages(parts: Vec<lopdf::Document>) -> CardsheetResult<lopdf::Document> {
    let mut out = lopdf::Document::with_version(PDF_VERSION);
    let mut next_id = 1;
    let mut kids = Vec::with_capacity(parts.len());

    for mut part in parts {
        part.renumber_objects_with(next_id);
        next_id = part
            .objects
            .keys()
            .map(|&(id, _)| id)
            .max()
            .unwrap_or(next_id)
            + 1;

        let page_id = part
            .get_pages()
            .get(&1)
            .copied()
            .ok_or_else(|| CardsheetError::invalid_input("pdf has no pages"))?;
        let inherited = inherited_attributes(&part, page_id);

        out.objects.extend(part.objects);
        let page = out
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .context("page object is not a dictionary")?;
        for (key, value) in inherited {
            if !page.has(key) {
                page.set(key, value);
            }
        }
        kids.push(page_id);
    }

    out.max_id = next_id - 1;
    let pages_id = out.new_object_id();
    for &page_id in &kids {
        if let Ok(page) = out.get_object_mut(page_id).and_then(Object::as_dict_mut) {
            page.set("Parent", pages_id);
        }
    }
    out.set_object(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
        },
    );
    let catalog_id = out.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    out.trailer.set("Root", catalog_id);
    // Drops the old catalogs, page trees and unused pages.
    out.prune_objects();
    Ok(out)
}

/// Pair existing PDFs by position into `"{front}&{back}.pdf"` files under `out_dir`.
///
/// `front` and `back` are file stems, so `a.pdf` and `b.pdf` give `a&b.pdf`, matching the
/// names [`crate::pair_documents`] produces. Tools that keep the extension in the joined name
/// (`a.pdf&b.pdf.pdf`) will not find these files under their old names.
///
/// Each output holds the first page of the front then the first page of the back. Extra files
/// on the longer side are skipped. Existing outputs are overwritten.
#[tracing::instrument(
    skip_all,
    fields(fronts = front_paths.len(), backs = back_paths.len(), out_dir = %out_dir.display())
)]
pub fn pair_pdf_files(
    front_paths: &[PathBuf],
    back_paths: &[PathBuf],
    out_dir: &Path,
) -> CardsheetResult<Vec<PathBuf>> {
    if front_paths.len() != back_paths.len() {
        tracing::warn!(
            fronts = front_paths.len(),
            backs = back_paths.len(),
            "front and back counts differ, extra files are skipped"
        );
    }
    std::fs::create_dir_all(out_dir)
        .map_err(|e| CardsheetError::io(format!("create '{}'", out_dir.display()), e))?;

    let mut written = Vec::with_capacity(front_paths.len().min(back_paths.len()));
    for (front, back) in front_paths.iter().zip(back_paths) {
        let front_bytes = read_pdf_bytes(front)?;
        let back_bytes = read_pdf_bytes(back)?;
        let parts = vec![
            lopdf::Document::load_mem(&front_bytes)
                .with_context(|| format!("parse pdf '{}'", front.display()))?,
            lopdf::Document::load_mem(&back_bytes)
                .with_context(|| format!("parse pdf '{}'", back.display()))?,
        ];

        let name = paired_id(&image_id(front), &image_id(back));
        let mut merged = merge_first_pages(parts)?;
        let fingerprint =
            fingerprint_bytes(&name, &[front_bytes.as_slice(), back_bytes.as_slice()]);
        finish_trailer(&mut merged, &name, fingerprint.to_bytes());

        let path = out_dir.join(format!("{name}.pdf"));
        atomic_write(&path, &save_to_bytes(&mut merged)?)?;
        tracing::info!(path = %path.display(), "wrote paired pdf");
        written.push(path);
    }
    Ok(written)
}

fn read_pdf_bytes(path: &Path) -> CardsheetResult<Vec<u8>> {
    if !path.is_file() {
        return Err(CardsheetError::not_found(format!(
            "pdf file '{}'",
            path.display()
        )));
    }
    std::fs::read(path).map_err(|e| CardsheetError::io(format!("read '{}'", path.display()), e))
}

fn inherited_attributes(
    doc: &lopdf::Document,
    page_id: ObjectId,
) -> Vec<(&'static [u8], Object)> {
    let mut found: Vec<(&'static [u8], Object)> = Vec::new();
    let mut parent = parent_of(doc, page_id);
    for _ in 0..MAX_TREE_DEPTH {
        let Some(node_id) = parent else {
            break;
        };
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };
        for key in INHERITABLE {
            if found.iter().any(|(k, _)| *k == key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                found.push((key, value.clone()));
            }
        }
        parent = parent_of(doc, node_id);
    }
    found
}

fn parent_of(doc: &lopdf::Document, id: ObjectId) -> Option<ObjectId> {
    doc.get_dictionary(id)
        .ok()?
        .get(b"Parent")
        .and_then(Object::as_reference)
        .ok()
}

#[cfg(test)]
#[path = "../../tests/unit/pdf/reader.rs"]
mod tests;
