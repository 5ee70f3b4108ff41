//! EPUB resolution: container, package document, spine and NCX.

mod common;

use common::{CONTAINER_XML, minimal_epub, ncx, opf, three_chapter_epub, xhtml, zip_entries};
use wordpace::epub::{EpubArchive, resolve};
use wordpace::{ArchiveError, EpubStructureError, Error, MediaType, MemorySource, ReadableFile};

async fn load(bytes: Vec<u8>) -> wordpace::Result<ReadableFile> {
    wordpace::load_file(&MemorySource::new(bytes), MediaType::EPUB, "book.epub").await
}

fn chapter_item() -> &'static str {
    r#"    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>"#
}

fn single_spine() -> &'static str {
    r#"  <spine><itemref idref="ch1"/></spine>"#
}

#[tokio::test]
async fn test_minimal_epub() {
    let file = load(minimal_epub()).await.unwrap();

    assert_eq!(file.display_name(), "book.epub");
    assert_eq!(file.title(), Some("A Test Book"));
    assert_eq!(file.author(), Some("Jane Writer"));
    assert_eq!(file.sections().len(), 1);

    let section = &file.sections()[0];
    assert_eq!(section.source_path(), Some("ch1.xhtml"));
    assert_eq!(section.title(), None);
    assert_eq!(section.words(), ["Hello", "there"]);
}

#[tokio::test]
async fn test_spine_order_and_toc_titles() {
    let file = load(three_chapter_epub()).await.unwrap();
    let sections = file.sections();

    let paths: Vec<_> = sections.iter().map(|s| s.source_path()).collect();
    assert_eq!(
        paths,
        [
            Some("text/cover.xhtml"),
            Some("text/ch1.xhtml"),
            Some("text/ch2.html")
        ]
    );

    let titles: Vec<_> = sections.iter().map(|s| s.title()).collect();
    assert_eq!(titles, [None, Some("Chapter One"), Some("Chapter Two")]);

    assert!(sections[0].is_empty());
    assert_eq!(
        sections[1].words(),
        ["One", "It", "was", "a", "dark", "and", "stormy", "night."]
    );
    assert_eq!(sections[2].words(), ["Two", "The", "end", "at", "last"]);

    assert_eq!(file.word_count(Some(2)), 8);
    assert_eq!(file.word_count(None), 13);
    assert_eq!(file.section_label(1).as_deref(), Some("Chapter One"));
    assert_eq!(
        file.section_label(0).as_deref(),
        Some("Section 1 (text/cover.xhtml)")
    );
    assert_eq!(file.locate(8), Some((2, 0)));
}

#[tokio::test]
async fn test_head_title_not_counted() {
    let bytes = zip_entries(&[
        ("META-INF/container.xml", CONTAINER_XML),
        ("OEBPS/content.opf", &opf(chapter_item(), single_spine())),
        ("OEBPS/ch1.xhtml", &xhtml("<p>Body only</p>")),
    ]);
    let file = load(bytes).await.unwrap();

    assert_eq!(file.sections()[0].words(), ["Body", "only"]);
}

#[tokio::test]
async fn test_unknown_manifest_item() {
    let bytes = zip_entries(&[
        ("META-INF/container.xml", CONTAINER_XML),
        (
            "OEBPS/content.opf",
            &opf(
                chapter_item(),
                r#"  <spine><itemref idref="ch1"/><itemref idref="missing"/></spine>"#,
            ),
        ),
        ("OEBPS/ch1.xhtml", &xhtml("<p>Hi</p>")),
    ]);

    match load(bytes).await.unwrap_err() {
        Error::Structure(EpubStructureError::UnknownManifestItem { id }) => {
            assert_eq!(id, "missing")
        }
        other => panic!("expected UnknownManifestItem, got {other:?}"),
    }
}

#[tokio::test]
async fn test_not_a_zip() {
    let err = load(b"this is not a zip file".to_vec()).await.unwrap_err();
    assert!(
        matches!(err, Error::Archive(ArchiveError::Open(_))),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_missing_container() {
    let bytes = zip_entries(&[("OEBPS/content.opf", &opf(chapter_item(), single_spine()))]);

    match load(bytes).await.unwrap_err() {
        Error::Structure(EpubStructureError::MissingEntry { path }) => {
            assert_eq!(path, "META-INF/container.xml")
        }
        other => panic!("expected MissingEntry, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_chapter_entry() {
    let bytes = zip_entries(&[
        ("META-INF/container.xml", CONTAINER_XML),
        ("OEBPS/content.opf", &opf(chapter_item(), single_spine())),
    ]);

    match load(bytes).await.unwrap_err() {
        Error::Structure(EpubStructureError::MissingEntry { path }) => {
            assert_eq!(path, "OEBPS/ch1.xhtml")
        }
        other => panic!("expected MissingEntry, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_title_metadata() {
    let package = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:creator>Jane Writer</dc:creator>
  </metadata>
  <manifest>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine><itemref idref="ch1"/></spine>
</package>"#;
    let bytes = zip_entries(&[
        ("META-INF/container.xml", CONTAINER_XML),
        ("OEBPS/content.opf", package),
        ("OEBPS/ch1.xhtml", &xhtml("<p>Hi</p>")),
    ]);

    match load(bytes).await.unwrap_err() {
        Error::Structure(EpubStructureError::MissingMetadata { field, .. }) => {
            assert_eq!(field, "title")
        }
        other => panic!("expected MissingMetadata, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_spine() {
    let bytes = zip_entries(&[
        ("META-INF/container.xml", CONTAINER_XML),
        ("OEBPS/content.opf", &opf(chapter_item(), "  <spine/>")),
        ("OEBPS/ch1.xhtml", &xhtml("<p>Hi</p>")),
    ]);

    assert!(matches!(
        load(bytes).await,
        Err(Error::Structure(EpubStructureError::EmptySpine { .. }))
    ));
}

#[tokio::test]
async fn test_unknown_toc_item() {
    let bytes = zip_entries(&[
        ("META-INF/container.xml", CONTAINER_XML),
        (
            "OEBPS/content.opf",
            &opf(chapter_item(), r#"  <spine toc="ncx"><itemref idref="ch1"/></spine>"#),
        ),
        ("OEBPS/ch1.xhtml", &xhtml("<p>Hi</p>")),
    ]);

    match load(bytes).await.unwrap_err() {
        Error::Structure(EpubStructureError::UnknownTocItem { id }) => assert_eq!(id, "ncx"),
        other => panic!("expected UnknownTocItem, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_ncx_toc_gives_no_titles() {
    let manifest = format!(
        "{}\n{}",
        chapter_item(),
        r#"    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>"#
    );
    let bytes = zip_entries(&[
        ("META-INF/container.xml", CONTAINER_XML),
        (
            "OEBPS/content.opf",
            &opf(&manifest, r#"  <spine toc="nav"><itemref idref="ch1"/></spine>"#),
        ),
        ("OEBPS/ch1.xhtml", &xhtml("<p>Hi</p>")),
    ]);

    let file = load(bytes).await.unwrap();
    assert_eq!(file.sections()[0].title(), None);
}

#[tokio::test]
async fn test_ncx_label_missing_is_an_error() {
    let manifest = format!(
        "{}\n{}",
        chapter_item(),
        r#"    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>"#
    );
    let broken_ncx = r#"<?xml version="1.0"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <navMap>
    <navPoint id="np1" playOrder="1"><content src="ch1.xhtml"/></navPoint>
  </navMap>
</ncx>"#;
    let bytes = zip_entries(&[
        ("META-INF/container.xml", CONTAINER_XML),
        (
            "OEBPS/content.opf",
            &opf(&manifest, r#"  <spine toc="ncx"><itemref idref="ch1"/></spine>"#),
        ),
        ("OEBPS/toc.ncx", broken_ncx),
        ("OEBPS/ch1.xhtml", &xhtml("<p>Hi</p>")),
    ]);

    assert!(matches!(
        load(bytes).await,
        Err(Error::Structure(EpubStructureError::MissingElement { .. }))
    ));
}

#[tokio::test]
async fn test_percent_encoded_href() {
    let bytes = zip_entries(&[
        ("META-INF/container.xml", CONTAINER_XML),
        (
            "OEBPS/content.opf",
            &opf(
                r#"    <item id="ch1" href="chapter%201.xhtml" media-type="application/xhtml+xml"/>"#,
                single_spine(),
            ),
        ),
        ("OEBPS/chapter 1.xhtml", &xhtml("<p>Spaced out</p>")),
    ]);

    let file = load(bytes).await.unwrap();
    assert_eq!(file.sections()[0].words(), ["Spaced", "out"]);
}

#[tokio::test]
async fn test_opf_at_archive_root() {
    let container = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles><rootfile full-path="content.opf" media-type="application/oebps-package+xml"/></rootfiles>
</container>"#;
    let bytes = zip_entries(&[
        ("META-INF/container.xml", container),
        ("content.opf", &opf(chapter_item(), single_spine())),
        ("ch1.xhtml", &xhtml("<p>Root level</p>")),
    ]);

    let file = load(bytes).await.unwrap();
    assert_eq!(file.sections()[0].source_path(), Some("ch1.xhtml"));
    assert_eq!(file.sections()[0].words(), ["Root", "level"]);
}

#[tokio::test]
async fn test_resolve_leaves_archive_usable() {
    let mut archive = EpubArchive::open(three_chapter_epub()).await.unwrap();
    let file = resolve(&mut archive, "direct.epub").await.unwrap();

    assert_eq!(file.display_name(), "direct.epub");
    assert!(archive.find_entry("OEBPS/toc.ncx").is_some());
    archive.close();
}

#[tokio::test]
async fn test_ncx_fragment_matches_section() {
    let manifest = format!(
        "{}\n{}",
        chapter_item(),
        r#"    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>"#
    );
    let bytes = zip_entries(&[
        ("META-INF/container.xml", CONTAINER_XML),
        (
            "OEBPS/content.opf",
            &opf(&manifest, r#"  <spine toc="ncx"><itemref idref="ch1"/></spine>"#),
        ),
        (
            "OEBPS/toc.ncx",
            &ncx(&[("Opening", "ch1.xhtml#start"), ("Later", "ch1.xhtml#later")]),
        ),
        ("OEBPS/ch1.xhtml", &xhtml("<p>Hi</p>")),
    ]);

    let file = load(bytes).await.unwrap();
    assert_eq!(file.sections()[0].title(), Some("Opening"));
}
