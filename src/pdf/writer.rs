use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;
use lopdf::{
    Dictionary, Object, ObjectId, Stream, StringFormat,
    content::{Content, Operation},
    dictionary,
};

use crate::{
    assets::decode::SourceImage,
    document::{
        fingerprint::fingerprint_document,
        model::{Document, GuideSegment, ImagePlacement, Page},
    },
    foundation::{
        core::{Affine, mm_to_pt},
        error::CardsheetResult,
        fs::atomic_write,
    },
};

pub(crate) const PDF_VERSION: &str = "1.5";
pub(crate) const PRODUCER: &str = "cardsheet";

/// Cut guide stroke width in points.
const GUIDE_LINE_WIDTH: f32 = 0.5;
/// Dash on, dash off in points.
const GUIDE_DASH: [f32; 2] = [6.0, 3.0];

/// Translate a composed document into an in-memory PDF object graph.
///
/// Every distinct image handle is embedded once and shared by all pages that draw it.
pub fn build_pdf(doc: &Document) -> CardsheetResult<lopdf::Document> {
    let mut pdf = lopdf::Document::with_version(PDF_VERSION);
    let pages_id = pdf.new_object_id();
    let mut images = ImageObjects::default();
    let mut kids = Vec::with_capacity(doc.page_count());

    for page in doc.pages() {
        let page_id = write_page(&mut pdf, &mut images, pages_id, page)?;
        kids.push(Object::Reference(page_id));
    }

    pdf.set_object(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        },
    );
    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);
    finish_trailer(&mut pdf, doc.id(), fingerprint_document(doc).to_bytes());
    Ok(pdf)
}

/// Encode `doc` as PDF bytes. Identical documents produce identical bytes.
pub fn render_pdf(doc: &Document) -> CardsheetResult<Vec<u8>> {
    let mut pdf = build_pdf(doc)?;
    save_to_bytes(&mut pdf)
}

/// Encode `doc` and write it to `path` atomically, creating parent directories.
#[tracing::instrument(skip_all, fields(id = doc.id(), path = %path.display()))]
pub fn write_pdf(doc: &Document, path: &Path) -> CardsheetResult<()> {
    let bytes = render_pdf(doc)?;
    atomic_write(path, &bytes)?;
    tracing::info!(pages = doc.page_count(), bytes = bytes.len(), "wrote pdf");
    Ok(())
}

/// Compress streams and serialize.
pub(crate) fn save_to_bytes(pdf: &mut lopdf::Document) -> CardsheetResult<Vec<u8>> {
    pdf.compress();
    let mut out = Vec::new();
    pdf.save_to(&mut out).context("serialize pdf")?;
    Ok(out)
}

/// Producer/title info and a file identifier derived from content rather than time.
pub(crate) fn finish_trailer(pdf: &mut lopdf::Document, title: &str, id: [u8; 16]) {
    let info_id = pdf.add_object(dictionary! {
        "Producer" => Object::string_literal(PRODUCER),
        "Title" => Object::string_literal(title),
    });
    pdf.trailer.set("Info", info_id);
    let id = Object::String(id.to_vec(), StringFormat::Hexadecimal);
    pdf.trailer.set("ID", Object::Array(vec![id.clone(), id]));
}

#[derive(Default)]
struct ImageObjects {
    by_handle: HashMap<*const SourceImage, (String, ObjectId)>,
}

impl ImageObjects {
    fn get_or_insert(
        &mut self,
        pdf: &mut lopdf::Document,
        image: &Arc<SourceImage>,
    ) -> (String, ObjectId) {
        let key = Arc::as_ptr(image);
        if let Some(found) = self.by_handle.get(&key) {
            return found.clone();
        }
        let name = format!("Im{}", self.by_handle.len());
        let id = embed_image(pdf, image);
        self.by_handle.insert(key, (name.clone(), id));
        (name, id)
    }
}

fn embed_image(pdf: &mut lopdf::Document, image: &SourceImage) -> ObjectId {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(image.width),
        "Height" => i64::from(image.height),
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };
    if let Some(alpha) = &image.alpha8 {
        let mask = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(image.width),
                "Height" => i64::from(image.height),
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            alpha.as_ref().clone(),
        );
        let mask_id = pdf.add_object(mask);
        dict.set("SMask", mask_id);
    }
    pdf.add_object(Stream::new(dict, image.rgb8.as_ref().clone()))
}

fn write_page(
    pdf: &mut lopdf::Document,
    images: &mut ImageObjects,
    pages_id: ObjectId,
    page: &Page,
) -> CardsheetResult<ObjectId> {
    let mut ops = Vec::new();
    let mut xobjects = Dictionary::new();

    for placement in page.images() {
        let (name, id) = images.get_or_insert(pdf, &placement.image);
        draw_image(&mut ops, &name, placement);
        xobjects.set(name, id);
    }
    draw_guides(&mut ops, page.guides());

    let content = Content { operations: ops }
        .encode()
        .context("encode page content")?;
    let content_id = pdf.add_object(Stream::new(Dictionary::new(), content));

    let (width, height) = page.size().to_points();
    Ok(pdf.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), real(width), real(height)],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => xobjects,
        },
    }))
}

fn draw_image(ops: &mut Vec<Operation>, name: &str, placement: &ImagePlacement) {
    let to_points = Affine::scale(mm_to_pt(1.0)) * placement.transform;
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        to_points.as_coeffs().into_iter().map(real).collect(),
    ));
    ops.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
    ops.push(Operation::new("Q", vec![]));
}

fn draw_guides(ops: &mut Vec<Operation>, guides: &[GuideSegment]) {
    if guides.is_empty() {
        return;
    }
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new("G", vec![0.into()]));
    ops.push(Operation::new("w", vec![GUIDE_LINE_WIDTH.into()]));
    ops.push(Operation::new(
        "d",
        vec![
            Object::Array(GUIDE_DASH.iter().map(|&v| v.into()).collect()),
            0.into(),
        ],
    ));
    for guide in guides {
        let (p0, p1) = (guide.line.p0, guide.line.p1);
        ops.push(Operation::new(
            "m",
            vec![real(mm_to_pt(p0.x)), real(mm_to_pt(p0.y))],
        ));
        ops.push(Operation::new(
            "l",
            vec![real(mm_to_pt(p1.x)), real(mm_to_pt(p1.y))],
        ));
        ops.push(Operation::new("S", vec![]));
    }
    ops.push(Operation::new("Q", vec![]));
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

#[cfg(test)]
#[path = "../../tests/unit/pdf/writer.rs"]
mod tests;
