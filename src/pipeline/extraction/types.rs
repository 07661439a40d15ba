use super::ExtractionError;

/// Page orientation candidates, in the order they are tried.
///
/// Scanned referrals frequently arrive sideways or upside down. Each
/// candidate is attempted in full (direct text, then OCR) before moving
/// to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    pub const TRIAL_ORDER: [Orientation; 4] = [
        Orientation::Deg0,
        Orientation::Deg90,
        Orientation::Deg180,
        Orientation::Deg270,
    ];

    pub fn degrees(self) -> u32 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }
}

/// Thresholds and knobs for the extraction trial loop.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Direct text extraction counts as a hit above this many trimmed chars.
    pub direct_min_chars: usize,
    /// OCR output below this many trimmed chars is treated as noise.
    pub ocr_min_chars: usize,
    /// Rendering DPI for the OCR fallback path.
    pub ocr_dpi: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            direct_min_chars: 10,
            ocr_min_chars: 20,
            ocr_dpi: 300,
        }
    }
}

/// Embedded-text extraction abstraction (allows mocking for tests).
pub trait PageTextSource: Send + Sync {
    /// Extract the text layer of every page at the given orientation,
    /// joined with newlines.
    fn extract_text(
        &self,
        pdf_bytes: &[u8],
        orientation: Orientation,
    ) -> Result<String, ExtractionError>;
}

/// PDF page rasterization abstraction.
pub trait PdfPageRenderer: Send + Sync {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError>;

    /// Render one page to PNG bytes at the given DPI, without rotation.
    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_number: usize,
        dpi: u32,
    ) -> Result<Vec<u8>, ExtractionError>;
}

/// OCR engine abstraction (allows mocking for tests).
pub trait OcrEngine: Send + Sync {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}
