//! Shared fixture builders: EPUB archives assembled in memory.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// Pack `(path, contents)` pairs into a ZIP archive, `mimetype` first and
/// stored uncompressed like a real EPUB.
pub fn zip_entries(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let deflated =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();
    for (path, contents) in entries {
        zip.start_file(*path, deflated).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn opf(manifest: &str, spine: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="id">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>A Test Book</dc:title>
    <dc:creator>Jane Writer</dc:creator>
    <dc:language>en</dc:language>
  </metadata>
  <manifest>
{manifest}
  </manifest>
{spine}
</package>"#
    )
}

pub fn xhtml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>ignored</title></head>
<body>{body}</body>
</html>"#
    )
}

pub fn ncx(nav_points: &[(&str, &str)]) -> String {
    let points: String = nav_points
        .iter()
        .enumerate()
        .map(|(i, (label, src))| {
            format!(
                r#"    <navPoint id="np{n}" playOrder="{n}">
      <navLabel><text>{label}</text></navLabel>
      <content src="{src}"/>
    </navPoint>
"#,
                n = i + 1
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head/>
  <docTitle><text>A Test Book</text></docTitle>
  <navMap>
{points}  </navMap>
</ncx>"#
    )
}

/// The smallest valid book: one chapter, no table of contents.
pub fn minimal_epub() -> Vec<u8> {
    zip_entries(&[
        ("META-INF/container.xml", CONTAINER_XML),
        (
            "OEBPS/content.opf",
            &opf(
                r#"    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>"#,
                r#"  <spine><itemref idref="ch1"/></spine>"#,
            ),
        ),
        ("OEBPS/ch1.xhtml", "<html><body>Hello there</body></html>"),
    ])
}

/// Three chapters in a non-alphabetical spine order with an NCX.
pub fn three_chapter_epub() -> Vec<u8> {
    zip_entries(&[
        ("META-INF/container.xml", CONTAINER_XML),
        (
            "OEBPS/content.opf",
            &opf(
                r#"    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="cover" href="text/cover.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch1" href="text/ch1.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch2" href="text/ch2.html" media-type="text/html"/>"#,
                r#"  <spine toc="ncx">
    <itemref idref="cover"/>
    <itemref idref="ch1"/>
    <itemref idref="ch2"/>
  </spine>"#,
            ),
        ),
        (
            "OEBPS/toc.ncx",
            &ncx(&[
                ("Chapter One", "text/ch1.xhtml"),
                ("Chapter Two", "text/ch2.html#top"),
            ]),
        ),
        ("OEBPS/text/cover.xhtml", &xhtml("<div><img src=\"c.jpg\" alt=\"Cover\"/></div>")),
        (
            "OEBPS/text/ch1.xhtml",
            &xhtml("<h1>One</h1><p>It was a <em>dark</em> and stormy night.</p>"),
        ),
        (
            "OEBPS/text/ch2.html",
            "<html><body><h1>Two<p>The end<br>at last",
        ),
    ])
}
