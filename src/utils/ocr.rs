use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, info};

/// Page images produced from a PDF, in page order.
///
/// Holds the scratch directory so the images live as long as this value.
#[derive(Debug)]
pub struct RasterizedPages {
    pub pages: Vec<PathBuf>,
    _dir: Option<TempDir>,
}

impl RasterizedPages {
    pub fn new(pages: Vec<PathBuf>) -> Self {
        Self { pages, _dir: None }
    }

    fn in_dir(pages: Vec<PathBuf>, dir: TempDir) -> Self {
        Self {
            pages,
            _dir: Some(dir),
        }
    }
}

/// Run the Tesseract CLI on a single image and return its raw stdout.
///
/// Requires `tesseract` to be installed:
/// - Linux: sudo apt-get install tesseract-ocr
/// - Mac: brew install tesseract
/// - Windows: https://github.com/UB-Mannheim/tesseract/wiki
pub fn tesseract_image(tesseract_path: &str, image: &Path, language: &str) -> Result<String> {
    debug!("Running {} on {:?}", tesseract_path, image);

    let output = Command::new(tesseract_path)
        .arg(image)
        .arg("stdout")
        .arg("-l")
        .arg(language)
        .output()
        .with_context(|| {
            format!(
                "Failed to run tesseract (is it installed? path='{}')",
                tesseract_path
            )
        })?;

    if !output.status.success() {
        bail!(
            "Tesseract OCR failed for {:?} (exit code {}): {}",
            image,
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Render every page of a PDF to PNG with `pdftoppm` (poppler-utils).
pub fn pdftoppm_pages(pdftoppm_path: &str, pdf: &Path) -> Result<RasterizedPages> {
    let dir = tempfile::Builder::new()
        .prefix("doc_summarizer_ocr_")
        .tempdir()
        .context("Failed to create scratch directory for page images")?;

    info!("Converting PDF to images...");
    let output = Command::new(pdftoppm_path)
        .arg("-png")
        .arg(pdf)
        .arg(dir.path().join("page"))
        .output()
        .with_context(|| {
            format!(
                "PDF to image conversion failed: could not run '{}'. Install poppler-utils \
                 (Linux: sudo apt-get install poppler-utils, Mac: brew install poppler)",
                pdftoppm_path
            )
        })?;

    if !output.status.success() {
        bail!(
            "pdftoppm failed for {:?} (exit code {}): {}",
            pdf,
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let pages = page_images(dir.path())?;
    Ok(RasterizedPages::in_dir(pages, dir))
}

/// PNG page images in `dir`, ordered by page number.
fn page_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let listing = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list page images in {:?}", dir))?;

    let mut numbered = Vec::new();
    for entry in listing {
        let path = entry
            .with_context(|| format!("Failed to read page image entry in {:?}", dir))?
            .path();
        if path.extension().and_then(|s| s.to_str()) != Some("png") {
            continue;
        }
        if let Some(number) = page_number(&path) {
            numbered.push((number, path));
        }
    }

    // Directory listings are unordered.
    numbered.sort_by_key(|(number, _)| *number);
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}

/// Page number from a pdftoppm file name such as `page-7.png` or `page-007.png`.
fn page_number(path: &Path) -> Option<usize> {
    path.file_stem()?
        .to_str()?
        .rsplit('-')
        .next()?
        .parse()
        .ok()
}
