//! Shared helpers for the integration tests.
//!
//! Fixtures are built in memory with lopdf, so the suite needs no files on
//! disk and no pdfium library.

#![allow(dead_code)]

use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use pdfdeck::Pipeline;
use pdfdeck::config::{PipelineConfig, ThumbnailOptions};
use pdfdeck::thumbnail::PageRasterizer;
use std::sync::Arc;

/// A `pages`-page PDF whose page `i` carries the tag `"{label}-{i}"`.
pub fn pdf_bytes(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|i| {
            let tag = format!("{label}-{i}");
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Tj", vec![Object::string_literal(tag.clone())]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
                "PageTag" => Object::string_literal(tag),
            });
            page_id.into()
        })
        .collect();

    let media_box: Vec<Object> = vec![0.into(), 0.into(), 595.into(), 842.into()];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => media_box,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Page tags of a serialized PDF, in page order.
pub fn tags_of(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .filter_map(|id| match doc.get_dictionary(id).ok()?.get(b"PageTag").ok()? {
            Object::String(raw, _) => Some(String::from_utf8_lossy(raw).into_owned()),
            _ => None,
        })
        .collect()
}

/// Gray square, standing in for a rendered page.
pub struct GrayRasterizer;

impl PageRasterizer for GrayRasterizer {
    fn rasterize_first_page(&self, _pdf: &[u8], width: u32) -> anyhow::Result<DynamicImage> {
        let mut image = DynamicImage::new_rgb8(width, width * 4 / 3);
        image.invert();
        Ok(image)
    }
}

/// Pipeline with default limits and fake thumbnails.
pub fn pipeline() -> Pipeline {
    Pipeline::with_rasterizer(PipelineConfig::default(), Arc::new(GrayRasterizer))
}

/// Pipeline with default limits and thumbnails off.
pub fn pipeline_without_thumbnails() -> Pipeline {
    let config = PipelineConfig {
        thumbnails: ThumbnailOptions::disabled(),
        ..PipelineConfig::default()
    };
    Pipeline::new(config)
}

