//! EPUB package parsing (container.xml, OPF, NCX)

use std::collections::HashMap;

use crate::error::EpubStructureError;
use crate::xml::XmlElement;

/// Fixed location of the container descriptor.
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Media type that marks the spine `toc` resource as an NCX document.
pub const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";

/// A manifest entry: href relative to the OPF directory, plus media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub href: String,
    pub media_type: String,
}

/// Parsed OPF package data.
#[derive(Debug)]
pub struct OpfData {
    pub title: String,
    pub creator: String,
    /// Maps manifest id -> item
    pub manifest: HashMap<String, ManifestItem>,
    /// Spine idrefs in reading order.
    pub spine_ids: Vec<String>,
    /// Manifest id named by the spine `toc` attribute.
    pub toc_id: Option<String>,
}

fn parse_xml(path: &str, content: &str) -> Result<XmlElement, EpubStructureError> {
    XmlElement::parse(content).map_err(|message| EpubStructureError::Xml {
        path: path.to_string(),
        message,
    })
}

fn required_child<'a>(
    parent: &'a XmlElement,
    path: &str,
    element: &'static str,
) -> Result<&'a XmlElement, EpubStructureError> {
    parent
        .child(element)
        .ok_or_else(|| EpubStructureError::MissingElement {
            path: path.to_string(),
            element,
        })
}

fn required_attr<'a>(
    element: &'a XmlElement,
    path: &str,
    attribute: &'static str,
) -> Result<&'a str, EpubStructureError> {
    element
        .non_empty_attr(attribute)
        .ok_or_else(|| EpubStructureError::MissingAttribute {
            path: path.to_string(),
            attribute,
            markup: element.markup(),
        })
}

/// Parse META-INF/container.xml to find the OPF path.
///
/// Only the first `rootfile` is consulted.
pub fn parse_container_xml(content: &str) -> Result<String, EpubStructureError> {
    let root = parse_xml(CONTAINER_PATH, content)?;
    let rootfile = root
        .descendant("rootfile")
        .ok_or_else(|| EpubStructureError::MissingElement {
            path: CONTAINER_PATH.to_string(),
            element: "rootfile",
        })?;
    required_attr(rootfile, CONTAINER_PATH, "full-path").map(str::to_string)
}

/// Directory part of the OPF path, with trailing slash ("" at archive root).
pub fn root_dir(opf_path: &str) -> &str {
    match opf_path.rfind('/') {
        Some(i) => &opf_path[..=i],
        None => "",
    }
}

/// Parse OPF package document.
///
/// Title and creator are both required; manifest items need `id`, `href` and
/// `media-type`; spine itemrefs need `idref`.
pub fn parse_opf(path: &str, content: &str) -> Result<OpfData, EpubStructureError> {
    let package = parse_xml(path, content)?;

    let metadata = required_child(&package, path, "metadata")?;
    let metadata_field = |field: &'static str| {
        metadata
            .child(field)
            .map(|element| element.text().trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| EpubStructureError::MissingMetadata {
                path: path.to_string(),
                field,
            })
    };
    let title = metadata_field("title")?;
    let creator = metadata_field("creator")?;

    let mut manifest = HashMap::new();
    for item in required_child(&package, path, "manifest")?.children_named("item") {
        let id = required_attr(item, path, "id")?;
        let href = required_attr(item, path, "href")?;
        let media_type = required_attr(item, path, "media-type")?;
        manifest.entry(id.to_string()).or_insert_with(|| ManifestItem {
            href: href.to_string(),
            media_type: media_type.to_string(),
        });
    }

    let spine = required_child(&package, path, "spine")?;
    let spine_ids = spine
        .children_named("itemref")
        .map(|itemref| required_attr(itemref, path, "idref").map(str::to_string))
        .collect::<Result<Vec<_>, _>>()?;
    let toc_id = spine.non_empty_attr("toc").map(str::to_string);

    Ok(OpfData {
        title,
        creator,
        manifest,
        spine_ids,
        toc_id,
    })
}

/// Parse NCX table of contents into content path -> label.
///
/// Only top-level `navPoint`s are read; nested entries are ignored. Fragments
/// (`#...`) are stripped from `src`. When two entries point at the same file
/// the first label is kept.
pub fn parse_ncx(path: &str, content: &str) -> Result<HashMap<String, String>, EpubStructureError> {
    let ncx = parse_xml(path, content)?;
    let nav_map = required_child(&ncx, path, "navMap")?;

    let mut toc = HashMap::new();
    for nav_point in nav_map.children_named("navPoint") {
        let label = required_child(nav_point, path, "navLabel")?
            .text()
            .trim()
            .to_string();
        let src = required_attr(required_child(nav_point, path, "content")?, path, "src")?;
        let content_path = src.split('#').next().unwrap_or(src);
        toc.entry(content_path.to_string()).or_insert(label);
    }
    Ok(toc)
}
