mod fallback;
mod ocr;
mod strategy;
mod structured;

pub use fallback::{FallbackPipeline, FallbackState};
pub use ocr::{OcrEngine, OcrExtractor, PageRasterizer, PdftoppmRasterizer, TesseractEngine, IMAGE_EXTENSIONS};
pub use strategy::{Extraction, ExtractionOutcome, ExtractionStrategy, StrategyKind};
pub use structured::{StructuredExtractor, STRUCTURED_EXTENSIONS};

use crate::config::PipelineConfig;

/// The production pipeline: native parsers first, Tesseract as the fallback.
pub type DefaultPipeline = FallbackPipeline<StructuredExtractor, OcrExtractor>;

impl DefaultPipeline {
    pub fn from_config(config: &PipelineConfig) -> Self {
        let structured =
            StructuredExtractor::new(config.antiword_path.clone(), config.pandoc_path.clone());
        let ocr = OcrExtractor::tesseract(
            TesseractEngine {
                binary: config.tesseract_path.clone(),
                language: config.ocr_language.clone(),
            },
            PdftoppmRasterizer {
                binary: config.pdftoppm_path.clone(),
            },
        );
        FallbackPipeline::new(structured, ocr, config.min_text_length)
    }
}
