//! Splitting documents end to end.

use pdfdeck::document::CandidateFile;
use pdfdeck::progress::NoProgress;
use rstest::rstest;

use crate::common::{pdf_bytes, pipeline, pipeline_without_thumbnails, tags_of};

#[tokio::test]
async fn test_split_three_pages() {
    let mut updates = Vec::new();
    let mut progress = |current: usize, total: usize| updates.push((current, total));

    let outcome = pipeline_without_thumbnails()
        .split(CandidateFile::new("report.pdf", pdf_bytes("r", 3)), &mut progress)
        .await
        .unwrap();

    let names: Vec<_> = outcome.pages.iter().map(|p| p.file_name.as_str()).collect();
    assert_eq!(
        names,
        ["report_page_01.pdf", "report_page_02.pdf", "report_page_03.pdf"]
    );
    assert_eq!(updates, vec![(1, 3), (2, 3), (3, 3)]);

    for (index, page) in outcome.pages.iter().enumerate() {
        assert_eq!(page.page_number, index + 1);
        assert_eq!(tags_of(&page.bytes), vec![format!("r-{}", index + 1)]);
        assert!(page.thumbnail.is_empty());
    }
}

#[tokio::test]
async fn test_split_keeps_inherited_media_box() {
    let outcome = pipeline_without_thumbnails()
        .split(CandidateFile::new("a4.pdf", pdf_bytes("a", 2)), &mut NoProgress)
        .await
        .unwrap();

    assert_eq!(outcome.info.page_dimensions, Some((595.0, 842.0)));
    let doc = lopdf::Document::load_mem(&outcome.pages[1].bytes).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let media_box = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(media_box, vec![0, 0, 595, 842]);
}

#[rstest]
#[case(1, "one_page_01.pdf")]
#[case(9, "one_page_09.pdf")]
#[case(12, "one_page_12.pdf")]
#[tokio::test]
async fn test_split_page_name_padding(#[case] pages: usize, #[case] last: &str) {
    let outcome = pipeline_without_thumbnails()
        .split(CandidateFile::new("one.pdf", pdf_bytes("o", pages)), &mut NoProgress)
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), pages);
    assert_eq!(outcome.pages.last().unwrap().file_name, last);
}

#[tokio::test]
async fn test_split_renders_thumbnails() {
    let outcome = pipeline()
        .split(CandidateFile::new("deck.pdf", pdf_bytes("d", 2)), &mut NoProgress)
        .await
        .unwrap();

    assert!(
        outcome
            .pages
            .iter()
            .all(|p| p.thumbnail.starts_with("data:image/jpeg;base64,"))
    );
}

#[tokio::test]
async fn test_split_upper_case_extension() {
    let outcome = pipeline_without_thumbnails()
        .split(CandidateFile::new("SCAN.PDF", pdf_bytes("s", 1)), &mut NoProgress)
        .await
        .unwrap();
    assert_eq!(outcome.pages[0].file_name, "SCAN_page_01.pdf");
}
