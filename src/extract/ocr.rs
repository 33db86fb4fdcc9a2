use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{error, info};

use super::strategy::{ExtractionOutcome, ExtractionStrategy, StrategyKind};
use crate::document::DocumentRef;
use crate::utils::ocr::{pdftoppm_pages, tesseract_image, RasterizedPages};
use crate::utils::text_processor::join_units;

/// Raster formats the OCR engine reads directly.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

/// Recognizes text in one image.
pub trait OcrEngine {
    fn recognize(&self, image: &Path) -> Result<String>;
}

/// Renders a PDF into one image per page, in page order.
pub trait PageRasterizer {
    fn rasterize(&self, pdf: &Path) -> Result<RasterizedPages>;
}

/// Tesseract through its command-line interface.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    pub binary: String,
    pub language: String,
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &Path) -> Result<String> {
        tesseract_image(&self.binary, image, &self.language)
    }
}

/// Poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    pub binary: String,
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self {
            binary: "pdftoppm".to_string(),
        }
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&self, pdf: &Path) -> Result<RasterizedPages> {
        pdftoppm_pages(&self.binary, pdf)
    }
}

/// Recovers text from pixels: PDFs page by page, images in one pass.
pub struct OcrExtractor<E = TesseractEngine, R = PdftoppmRasterizer> {
    engine: E,
    rasterizer: R,
}

impl OcrExtractor {
    pub fn tesseract(engine: TesseractEngine, rasterizer: PdftoppmRasterizer) -> Self {
        Self { engine, rasterizer }
    }
}

impl<E: OcrEngine, R: PageRasterizer> OcrExtractor<E, R> {
    pub fn new(engine: E, rasterizer: R) -> Self {
        Self { engine, rasterizer }
    }

    fn extract_from_pdf(&self, path: &Path) -> Result<String> {
        info!("Running OCR on PDF {:?}...", path);

        let rasterized = self.rasterizer.rasterize(path)?;
        let total_pages = rasterized.pages.len();
        if total_pages == 0 {
            bail!("PDF rasterization produced no pages");
        }

        let mut page_texts = Vec::with_capacity(total_pages);
        for (i, page) in rasterized.pages.iter().enumerate() {
            info!("OCR on page {}/{}...", i + 1, total_pages);
            let text = self
                .engine
                .recognize(page)
                .with_context(|| format!("OCR failed on page {}", i + 1))?;
            page_texts.push(text);
        }

        let text = join_units(&page_texts);
        info!(
            "OCR completed. Extracted {} characters from {} pages",
            text.chars().count(),
            total_pages
        );
        Ok(text)
    }

    fn extract_from_image(&self, path: &Path) -> Result<String> {
        info!("Running OCR on image {:?}...", path);

        let (width, height) = image::image_dimensions(path)
            .with_context(|| format!("Unreadable image: {:?}", path))?;
        if width == 0 || height == 0 {
            bail!("Image has no pixels: {:?}", path);
        }

        let text = self.engine.recognize(path)?;
        info!("OCR completed. Extracted {} characters", text.chars().count());
        Ok(text)
    }
}

impl<E: OcrEngine, R: PageRasterizer> ExtractionStrategy for OcrExtractor<E, R> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Ocr
    }

    fn can_handle(&self, doc: &DocumentRef) -> bool {
        doc.extension() == "pdf" || doc.has_extension(IMAGE_EXTENSIONS)
    }

    fn extract(&self, doc: &DocumentRef) -> ExtractionOutcome {
        let path = doc.path();
        let result = if doc.extension() == "pdf" {
            self.extract_from_pdf(path)
        } else {
            self.extract_from_image(path)
        }
        .with_context(|| format!("OCR extraction failed for {:?}", path));

        if let Err(e) = &result {
            error!("{:#}", e);
        }

        ExtractionOutcome::from_result(self.kind(), result)
    }
}
