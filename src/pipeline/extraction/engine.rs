//! Orientation-trial text extraction.
//!
//! Each orientation candidate is tried in full: the embedded text layer
//! first, then an OCR pass over rotated page rasters when OCR is
//! available. The first orientation producing enough text wins.
//! Extraction never fails outright; a document nothing works on simply
//! yields an empty string and the caller decides what that means.

use std::io::Cursor;

use image::ImageFormat;
use tracing::{debug, warn};

use super::types::{ExtractionConfig, OcrEngine, Orientation, PageTextSource, PdfPageRenderer};
use super::ExtractionError;

pub struct TextExtractionEngine {
    text_source: Box<dyn PageTextSource>,
    renderer: Box<dyn PdfPageRenderer>,
    ocr: Option<Box<dyn OcrEngine>>,
    config: ExtractionConfig,
}

impl TextExtractionEngine {
    pub fn new(
        text_source: Box<dyn PageTextSource>,
        renderer: Box<dyn PdfPageRenderer>,
        ocr: Option<Box<dyn OcrEngine>>,
        config: ExtractionConfig,
    ) -> Self {
        Self {
            text_source,
            renderer,
            ocr,
            config,
        }
    }

    /// Extract text from a PDF, trying every orientation candidate.
    ///
    /// Returns an empty string when no orientation yields enough text.
    pub fn extract(&self, pdf_bytes: &[u8]) -> String {
        for orientation in Orientation::TRIAL_ORDER {
            if let Some(text) = self.try_orientation(pdf_bytes, orientation) {
                debug!(
                    orientation = orientation.degrees(),
                    chars = text.len(),
                    "Extraction succeeded"
                );
                return text;
            }
        }
        warn!("No orientation produced usable text");
        String::new()
    }

    fn try_orientation(&self, pdf_bytes: &[u8], orientation: Orientation) -> Option<String> {
        match self.text_source.extract_text(pdf_bytes, orientation) {
            Ok(text) if text.trim().chars().count() > self.config.direct_min_chars => {
                return Some(text);
            }
            Ok(_) => {}
            Err(e) => {
                // A parse failure at one orientation does not doom the rest.
                warn!(
                    orientation = orientation.degrees(),
                    "Embedded text extraction failed: {e}"
                );
                return None;
            }
        }

        let ocr = self.ocr.as_ref()?;
        let page_count = match self.renderer.page_count(pdf_bytes) {
            Ok(n) => n,
            Err(e) => {
                warn!(orientation = orientation.degrees(), "Page count failed: {e}");
                return None;
            }
        };

        let mut pages = Vec::new();
        for page in 0..page_count {
            match self.ocr_page(pdf_bytes, page, orientation, ocr.as_ref()) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    // One bad page abandons the OCR pass for this
                    // orientation; the next orientation starts fresh.
                    warn!(
                        page,
                        orientation = orientation.degrees(),
                        "OCR failed: {e}"
                    );
                    return None;
                }
            }
        }

        let combined = pages.join("\n");
        if combined.trim().chars().count() > self.config.ocr_min_chars {
            Some(combined)
        } else {
            None
        }
    }

    fn ocr_page(
        &self,
        pdf_bytes: &[u8],
        page: usize,
        orientation: Orientation,
        ocr: &dyn OcrEngine,
    ) -> Result<String, ExtractionError> {
        let png = self
            .renderer
            .render_page(pdf_bytes, page, self.config.ocr_dpi)?;
        let png = rotate_raster(&png, orientation)?;
        ocr.ocr_image(&png)
    }
}

/// Rotate a PNG raster clockwise by the given orientation.
///
/// A page scanned 90° counterclockwise reads correctly after a 90°
/// clockwise raster rotation, so the trial angle maps directly onto the
/// clockwise rotation applied here.
fn rotate_raster(png: &[u8], orientation: Orientation) -> Result<Vec<u8>, ExtractionError> {
    if orientation == Orientation::Deg0 {
        return Ok(png.to_vec());
    }

    let img = image::load_from_memory(png)
        .map_err(|e| ExtractionError::ImageProcessing(format!("PNG decode failed: {e}")))?;

    let rotated = match orientation {
        Orientation::Deg0 => img,
        Orientation::Deg90 => img.rotate90(),
        Orientation::Deg180 => img.rotate180(),
        Orientation::Deg270 => img.rotate270(),
    };

    let mut cursor = Cursor::new(Vec::new());
    rotated
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ExtractionError::ImageProcessing(format!("PNG encode failed: {e}")))?;
    Ok(cursor.into_inner())
}
