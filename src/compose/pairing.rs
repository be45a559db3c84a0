use crate::{
    document::model::{Document, Page},
    foundation::error::{CardsheetError, CardsheetResult},
};

/// Name of the two-page document built from `front` and `back`.
pub fn paired_id(front: &str, back: &str) -> String {
    format!("{front}&{back}")
}

/// Zip fronts with backs by position into two-page documents.
///
/// Each output holds the first page of the front followed by the first page of the back. Extra
/// entries on the longer side are dropped. Fails when a front or back that would be paired has
/// no pages.
pub fn pair_documents(fronts: &[Document], backs: &[Document]) -> CardsheetResult<Vec<Document>> {
    if fronts.len() != backs.len() {
        tracing::warn!(
            fronts = fronts.len(),
            backs = backs.len(),
            "front and back counts differ, extra documents are skipped"
        );
    }

    fronts
        .iter()
        .zip(backs)
        .map(|(front, back)| {
            let front_page = first_page(front)?;
            let back_page = first_page(back)?;
            Ok(Document::new(
                paired_id(front.id(), back.id()),
                vec![front_page.clone(), back_page.clone()],
            ))
        })
        .collect()
}

fn first_page(doc: &Document) -> CardsheetResult<&Page> {
    doc.first_page().ok_or_else(|| {
        CardsheetError::invalid_input(format!("document '{}' has no pages", doc.id()))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/pairing.rs"]
mod tests;
