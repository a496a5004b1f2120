//! Packing generated certificates into a single zip archive.

use crate::batch::RenderedDocument;
use crate::{CoreError, Result};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Default archive file name.
pub const ARCHIVE_NAME: &str = "certyfikaty.zip";

/// Builds a deflated zip with one entry per document, in input order.
pub fn pack(documents: &[RenderedDocument]) -> Result<Vec<u8>> {
    let mut seen = HashSet::with_capacity(documents.len());
    for doc in documents {
        if !seen.insert(doc.filename.as_str()) {
            return Err(CoreError::DuplicateEntry(doc.filename.clone()));
        }
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for doc in documents {
        zip.start_file(doc.filename.as_str(), options)?;
        zip.write_all(&doc.bytes)?;
    }

    let bytes = zip.finish()?.into_inner();
    log::info!(
        "[Archive] packed {} documents, {} bytes",
        documents.len(),
        bytes.len()
    );
    Ok(bytes)
}
