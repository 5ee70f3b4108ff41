use std::collections::HashMap;

use tracing::{debug, trace};

use super::archive::EpubArchive;
use super::parser::{
    CONTAINER_PATH, NCX_MEDIA_TYPE, OpfData, parse_container_xml, parse_ncx, parse_opf, root_dir,
};
use crate::document::{DocumentSection, ReadableFile};
use crate::error::{EpubStructureError, Result};
use crate::text::{ContentKind, markup_to_text, tokenize};

/// Walk container.xml, the OPF and the NCX of an opened archive and build
/// one section per spine item, in spine order.
///
/// Fails on the first missing entry, element, attribute or reference. The
/// archive is left open; closing it is the caller's job.
///
/// # Example
///
/// ```no_run
/// use wordpace::epub::{EpubArchive, resolve};
///
/// # async fn run() -> wordpace::Result<()> {
/// let bytes = std::fs::read("book.epub")?;
/// let mut archive = EpubArchive::open(bytes).await?;
/// let result = resolve(&mut archive, "book.epub").await;
/// archive.close();
/// let file = result?;
/// println!("{} sections", file.sections().len());
/// # Ok(())
/// # }
/// ```
pub async fn resolve(archive: &mut EpubArchive, original_file_name: &str) -> Result<ReadableFile> {
    // 1. Find the OPF file path from container.xml
    let container = read_required(archive, CONTAINER_PATH).await?;
    let opf_path = parse_container_xml(&container)?;
    let opf_dir = root_dir(&opf_path);

    // 2. Parse the OPF file
    let opf_content = read_required(archive, &opf_path).await?;
    let opf = parse_opf(&opf_path, &opf_content)?;
    debug!(
        opf = %opf_path,
        manifest = opf.manifest.len(),
        spine = opf.spine_ids.len(),
        "parsed package document"
    );

    if opf.spine_ids.is_empty() {
        return Err(EpubStructureError::EmptySpine { path: opf_path }.into());
    }

    // 3. Table of contents (NCX), keyed by content path
    let toc = read_toc(archive, &opf, opf_dir).await?;

    // 4. One section per spine item
    let mut sections = Vec::with_capacity(opf.spine_ids.len());
    for id in &opf.spine_ids {
        let item = opf
            .manifest
            .get(id)
            .ok_or_else(|| EpubStructureError::UnknownManifestItem { id: id.clone() })?;

        let full_path = format!("{}{}", opf_dir, item.href);
        let markup = read_required(archive, &full_path).await?;
        let text = markup_to_text(&markup, ContentKind::from_media_type(&item.media_type));
        let words = tokenize(&text);
        let title = toc.get(&item.href).cloned();
        trace!(path = %full_path, words = words.len(), title = ?title, "converted section");

        sections.push(DocumentSection::new(Some(item.href.clone()), title, words));
    }

    ReadableFile::new(
        original_file_name,
        Some(opf.title),
        Some(opf.creator),
        sections,
    )
}

async fn read_toc(
    archive: &mut EpubArchive,
    opf: &OpfData,
    opf_dir: &str,
) -> Result<HashMap<String, String>> {
    let Some(toc_id) = &opf.toc_id else {
        return Ok(HashMap::new());
    };
    let item = opf
        .manifest
        .get(toc_id)
        .ok_or_else(|| EpubStructureError::UnknownTocItem { id: toc_id.clone() })?;

    if !item.media_type.trim().eq_ignore_ascii_case(NCX_MEDIA_TYPE) {
        debug!(media_type = %item.media_type, "spine toc is not an NCX document, skipping");
        return Ok(HashMap::new());
    }

    let ncx_path = format!("{}{}", opf_dir, item.href);
    let ncx_content = read_required(archive, &ncx_path).await?;
    Ok(parse_ncx(&ncx_path, &ncx_content)?)
}

async fn read_required(archive: &mut EpubArchive, path: &str) -> Result<String> {
    let entry = archive
        .find_entry_lenient(path)
        .ok_or_else(|| EpubStructureError::MissingEntry {
            path: path.to_string(),
        })?;
    Ok(archive.read_text(&entry).await?)
}
