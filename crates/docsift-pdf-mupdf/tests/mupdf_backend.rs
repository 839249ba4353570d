use std::path::{Path, PathBuf};

use docsift_core::{BackendError, PdfBackend};
use docsift_pdf_mupdf::MupdfBackend;

/// Build a minimal PDF with one page per entry; `None` pages are blank.
fn write_pdf(dir: &Path, name: &str, pages: &[Option<&str>]) -> PathBuf {
    let font_id = 3 + pages.len() * 2;
    let mut objects: Vec<String> = vec!["<< /Type /Catalog /Pages 2 0 R >>".to_string()];
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 3 + i * 2))
        .collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    for (i, page) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R \
             /Resources << /Font << /F1 {font_id} 0 R >> >> >>",
            4 + i * 2
        ));
        let stream = page
            .map(|text| format!("BT /F1 24 Tf 72 700 Td ({text}) Tj ET"))
            .unwrap_or_default();
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
    }
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }
    let xref_at = out.len();
    out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        out.push_str(&format!("{offset:010} 00000 n \n"));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));

    let path = dir.join(name);
    std::fs::write(&path, out).unwrap();
    path
}

#[test]
fn page_texts_in_page_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "two.pdf", &[Some("First page"), Some("Second page")]);

    let pages = MupdfBackend::new().page_texts(&path).unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].index, 0);
    assert_eq!(pages[1].index, 1);
    assert!(pages[0].text.contains("First page"), "{:?}", pages[0].text);
    assert!(pages[1].text.contains("Second page"), "{:?}", pages[1].text);
    assert!(pages[0].text.ends_with('\n'));
}

#[test]
fn blank_page_has_no_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "blank.pdf", &[None]);

    let pages = MupdfBackend::new().page_texts(&path).unwrap();
    assert_eq!(pages.len(), 1);
    assert!(pages[0].text.trim().is_empty());
}

#[test]
fn render_pages_yields_one_gray_image_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "render.pdf", &[Some("Hello"), None, None]);

    let backend = MupdfBackend::new();
    let images: Vec<_> = backend
        .render_pages(&path, 72.0)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(images.len(), 3);
    for img in &images {
        // US Letter at 72 dpi is 612x792 points -> pixels.
        assert_eq!(img.width(), 612);
        assert_eq!(img.height(), 792);
    }
    // The blank page renders as pure white; the text page does not.
    assert!(images[1].pixels().all(|p| p.0[0] == 255));
    assert!(images[0].pixels().any(|p| p.0[0] < 128));
}

#[test]
fn render_scale_follows_dpi() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "dpi.pdf", &[None]);

    let backend = MupdfBackend::new();
    let img = backend
        .render_pages(&path, 144.0)
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(img.width(), 1224);
    assert_eq!(img.height(), 1584);
}

#[test]
fn corrupt_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"this is not a pdf at all").unwrap();

    let err = MupdfBackend::new().page_texts(&path).unwrap_err();
    assert!(matches!(err, BackendError::OpenError(_)), "{err:?}");
}
