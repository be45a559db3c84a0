use crate::{
    document::model::{Document, Page},
    foundation::math::Fnv1a64,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DocumentFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl DocumentFingerprint {
    /// Big-endian `hi` then `lo`, as used for the PDF file identifier.
    pub fn to_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.hi.to_be_bytes());
        out[8..].copy_from_slice(&self.lo.to_be_bytes());
        out
    }
}

pub fn fingerprint_document(doc: &Document) -> DocumentFingerprint {
    let mut a = Fnv1a64::new_default();
    let mut b = Fnv1a64::new(0x9ae16a3b2f90404f);

    write_str_pair(&mut a, &mut b, doc.id());
    write_u64_pair(&mut a, &mut b, doc.page_count() as u64);
    for page in doc.pages() {
        write_page(&mut a, &mut b, page);
    }

    DocumentFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

/// Fingerprint of a name plus raw byte blobs, for documents assembled from existing files.
pub fn fingerprint_bytes(label: &str, parts: &[&[u8]]) -> DocumentFingerprint {
    let mut a = Fnv1a64::new_default();
    let mut b = Fnv1a64::new(0x9ae16a3b2f90404f);

    write_str_pair(&mut a, &mut b, label);
    write_u64_pair(&mut a, &mut b, parts.len() as u64);
    for part in parts {
        write_u64_pair(&mut a, &mut b, part.len() as u64);
        a.write_bytes(part);
        b.write_bytes(part);
    }

    DocumentFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn write_page(a: &mut Fnv1a64, b: &mut Fnv1a64, page: &Page) {
    write_f64_pair(a, b, page.size().width);
    write_f64_pair(a, b, page.size().height);

    write_u64_pair(a, b, page.images().len() as u64);
    for placement in page.images() {
        write_str_pair(a, b, &placement.image.id);
        write_u64_pair(a, b, placement.image.content_hash);
        write_u8_pair(a, b, u8::from(placement.rotated));
        for c in placement.transform.as_coeffs() {
            write_f64_pair(a, b, c);
        }
    }

    write_u64_pair(a, b, page.guides().len() as u64);
    for guide in page.guides() {
        for p in [guide.line.p0, guide.line.p1] {
            write_f64_pair(a, b, p.x);
            write_f64_pair(a, b, p.y);
        }
    }
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_f64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: f64) {
    a.write_f64(v);
    b.write_f64(v);
}

fn write_str_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, s: &str) {
    a.write_str(s);
    b.write_str(s);
}

#[cfg(test)]
#[path = "../../tests/unit/document/fingerprint.rs"]
mod tests;
