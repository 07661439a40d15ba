use std::path::Path;

use super::types::OcrEngine;
use super::ExtractionError;

/// Bundled Tesseract OCR engine.
/// Only available when compiled with the `ocr` feature flag.
#[cfg(feature = "ocr")]
pub struct BundledTesseract {
    tessdata_dir: std::path::PathBuf,
    default_lang: String,
}

#[cfg(feature = "ocr")]
impl BundledTesseract {
    /// Initialize with a tessdata directory.
    /// Defaults to "pol+eng" when Polish traineddata is installed, since
    /// queue referrals are mostly Polish. Falls back to "eng" otherwise.
    pub fn new(tessdata_dir: &Path) -> Result<Self, ExtractionError> {
        if !tessdata_dir.join("eng.traineddata").exists() {
            return Err(ExtractionError::TessdataNotFound(tessdata_dir.to_path_buf()));
        }

        let default_lang = if tessdata_dir.join("pol.traineddata").exists() {
            tracing::info!("Polish traineddata found, defaulting to pol+eng");
            "pol+eng".to_string()
        } else {
            tracing::warn!(
                "No Polish traineddata at {}, using English only",
                tessdata_dir.display()
            );
            "eng".to_string()
        };

        Ok(Self {
            tessdata_dir: tessdata_dir.to_path_buf(),
            default_lang,
        })
    }

    /// Override the language string (e.g. "eng", "pol+eng").
    pub fn with_languages(mut self, langs: &str) -> Self {
        self.default_lang = langs.to_string();
        self
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for BundledTesseract {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError> {
        let tessdata_str = self
            .tessdata_dir
            .to_str()
            .ok_or_else(|| ExtractionError::OcrInit("Invalid tessdata path".into()))?;

        let tess = tesseract::Tesseract::new(Some(tessdata_str), Some(&self.default_lang))
            .map_err(|e| ExtractionError::OcrInit(format!("{e:?}")))?;

        let mut tess = tess
            .set_image_from_mem(image_bytes)
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;

        tess.get_text()
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))
    }
}

/// Probe OCR availability at startup.
///
/// Returns `None` when the binary was built without the `ocr` feature or
/// when no usable tessdata directory exists, in which case the engine
/// skips the OCR fallback entirely.
#[cfg(feature = "ocr")]
pub fn ocr_capability(tessdata_dir: Option<&Path>) -> Option<Box<dyn OcrEngine>> {
    let dir = tessdata_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("TESSDATA_PREFIX").ok().map(Into::into))?;

    match BundledTesseract::new(&dir) {
        Ok(engine) => {
            tracing::info!(tessdata = %dir.display(), "OCR fallback enabled");
            Some(Box::new(engine))
        }
        Err(e) => {
            tracing::warn!("OCR unavailable: {e}");
            None
        }
    }
}

#[cfg(not(feature = "ocr"))]
pub fn ocr_capability(_tessdata_dir: Option<&Path>) -> Option<Box<dyn OcrEngine>> {
    tracing::info!("Built without the ocr feature, OCR fallback disabled");
    None
}

// ── Mock for testing ──────────────────────────────────────

/// Mock OCR engine returning a fixed string for every image.
pub struct MockOcrEngine {
    pub text: String,
}

impl MockOcrEngine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.text.clone())
    }
}

/// Mock OCR engine that fails every call.
pub struct FailingOcrEngine;

impl OcrEngine for FailingOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        Err(ExtractionError::OcrProcessing("engine crashed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_text() {
        let mock = MockOcrEngine::new("Wizyta kardiologiczna");
        assert_eq!(mock.ocr_image(&[]).unwrap(), "Wizyta kardiologiczna");
    }

    #[test]
    fn failing_engine_errors() {
        assert!(FailingOcrEngine.ocr_image(&[]).is_err());
    }
}
