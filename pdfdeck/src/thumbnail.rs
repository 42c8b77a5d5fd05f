//! Best-effort page previews.
//!
//! A thumbnail is page 1 of a PDF rasterised to a fixed width, encoded as
//! JPEG and wrapped in a `data:` URI. Rendering never fails the operation it
//! belongs to: whatever goes wrong, the result is an empty string and a
//! warning in the log.
//!
//! Rasterisation sits behind [`PageRasterizer`]. The default implementation
//! drives pdfium, which is a native library that may not be installed; in
//! that case every thumbnail simply comes back empty.

use anyhow::{Context, Result, anyhow};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use pdfium_render::prelude::*;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{THUMBNAIL_MIME_TYPE, ThumbnailOptions};

/// Turns the first page of a PDF into a bitmap.
pub trait PageRasterizer: Send + Sync {
    /// Render page 1 of `pdf` at `target_width` pixels wide.
    fn rasterize_first_page(&self, pdf: &[u8], target_width: u32) -> Result<DynamicImage>;
}

/// Rasteriser backed by the pdfium library.
///
/// The library is bound on every call, so a missing library only costs a
/// failed lookup per thumbnail.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library_dir: Option<String>,
}

impl PdfiumRasterizer {
    /// Use the pdfium found on the system library path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load pdfium from `dir` instead of the system library path.
    pub fn with_library_dir(dir: impl Into<String>) -> Self {
        Self {
            library_dir: Some(dir.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium> {
        let bindings = match &self.library_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                dir.as_str(),
            )),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| anyhow!("pdfium library unavailable: {e:?}"))?;
        Ok(Pdfium::new(bindings))
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize_first_page(&self, pdf: &[u8], target_width: u32) -> Result<DynamicImage> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| anyhow!("pdfium could not open document: {e:?}"))?;
        let page = document
            .pages()
            .get(0)
            .map_err(|e| anyhow!("document has no first page: {e:?}"))?;

        let config = PdfRenderConfig::new().set_target_width(target_width as i32);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| anyhow!("pdfium render failed: {e:?}"))?;
        Ok(bitmap.as_image())
    }
}

/// Encode `image` as a JPEG `data:` URI.
pub fn encode_data_uri(image: &DynamicImage, quality: u8) -> Result<String> {
    let mut buffer = Vec::new();
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))
        .context("jpeg encoding failed")?;
    Ok(format!(
        "data:{THUMBNAIL_MIME_TYPE};base64,{}",
        STANDARD.encode(&buffer)
    ))
}

/// Produces thumbnail data URIs.
#[derive(Clone)]
pub struct ThumbnailRenderer {
    rasterizer: Arc<dyn PageRasterizer>,
    options: ThumbnailOptions,
}

impl std::fmt::Debug for ThumbnailRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailRenderer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ThumbnailRenderer {
    /// Renderer using pdfium.
    pub fn new(options: ThumbnailOptions) -> Self {
        Self::with_rasterizer(Arc::new(PdfiumRasterizer::new()), options)
    }

    /// Renderer using a custom rasteriser.
    pub fn with_rasterizer(rasterizer: Arc<dyn PageRasterizer>, options: ThumbnailOptions) -> Self {
        Self {
            rasterizer,
            options,
        }
    }

    /// Options in effect.
    pub fn options(&self) -> &ThumbnailOptions {
        &self.options
    }

    /// Thumbnail of page 1 of `pdf`, or `""` if thumbnails are disabled or
    /// rendering fails for any reason.
    pub async fn render(&self, pdf: &[u8]) -> String {
        if !self.options.enabled {
            return String::new();
        }

        match self.try_render(pdf).await {
            Ok(uri) => {
                debug!(length = uri.len(), "rendered thumbnail");
                uri
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "thumbnail unavailable");
                String::new()
            }
        }
    }

    async fn try_render(&self, pdf: &[u8]) -> Result<String> {
        let rasterizer = Arc::clone(&self.rasterizer);
        let pdf = pdf.to_vec();
        let width = self.options.width;
        let quality = self.options.quality;

        let task = tokio::task::spawn_blocking(move || {
            let image = rasterizer.rasterize_first_page(&pdf, width)?;
            encode_data_uri(&image, quality)
        });

        tokio::time::timeout(self.options.timeout, task)
            .await
            .context("thumbnail render timed out")?
            .context("thumbnail render task panicked")?
    }
}
