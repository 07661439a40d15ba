//! Embedded text extraction via Google PDFium.
//!
//! `PdfiumTextSource` is stateless (`Send + Sync`). Each operation creates
//! a fresh `Pdfium` instance because the upstream type is `!Send`.
//! The OS caches `dlopen`/`LoadLibrary` calls, so repeat loads are near-free.

use pdfium_render::prelude::*;
use tracing::debug;

use super::types::{Orientation, PageTextSource};
use super::ExtractionError;

/// Extracts the embedded text layer of a PDF using Google PDFium.
///
/// PDFium handles the PDF complexities that trip simpler parsers:
/// CIDFont encodings, embedded fonts, form fields, transparency.
pub struct PdfiumTextSource;

impl PdfiumTextSource {
    /// Create a new text source, verifying the PDFium library is loadable.
    pub fn new() -> Result<Self, ExtractionError> {
        let _ = load_pdfium()?;
        Ok(Self)
    }
}

impl PageTextSource for PdfiumTextSource {
    fn extract_text(
        &self,
        pdf_bytes: &[u8],
        orientation: Orientation,
    ) -> Result<String, ExtractionError> {
        let pdfium = load_pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(map_load_error)?;

        let mut pages_text = Vec::new();
        for mut page in document.pages().iter() {
            page.set_rotation(orientation_to_pdfium(orientation));
            let text = page
                .text()
                .map_err(|e| ExtractionError::PdfParsing(format!("Text access failed: {e}")))?
                .all();
            pages_text.push(text);
        }

        let full_text = pages_text.join("\n");
        debug!(
            orientation = orientation.degrees(),
            pages = pages_text.len(),
            chars = full_text.len(),
            "Extracted embedded PDF text"
        );
        Ok(full_text)
    }
}

fn orientation_to_pdfium(orientation: Orientation) -> PdfPageRenderRotation {
    match orientation {
        Orientation::Deg0 => PdfPageRenderRotation::None,
        Orientation::Deg90 => PdfPageRenderRotation::Degrees90,
        Orientation::Deg180 => PdfPageRenderRotation::Degrees180,
        Orientation::Deg270 => PdfPageRenderRotation::Degrees270,
    }
}

/// Load the PDFium dynamic library.
///
/// Discovery order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` env var (explicit path to library file)
/// 2. Alongside the running executable
/// 3. System library search paths
pub(super) fn load_pdfium() -> Result<Pdfium, ExtractionError> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        debug!(path = %path, "Loading PDFium from env var");
        let bindings = Pdfium::bind_to_library(&path).map_err(|e| {
            ExtractionError::PdfParsing(format!("Failed to load PDFium from {path}: {e}"))
        })?;
        return Ok(Pdfium::new(bindings));
    }

    // pdfium_platform_library_name_at_path() handles platform-specific names:
    //   Windows -> pdfium.dll | Linux -> libpdfium.so | macOS -> libpdfium.dylib
    if let Ok(exe) = std::env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            let lib_path =
                Pdfium::pdfium_platform_library_name_at_path(exe_dir.to_string_lossy().as_ref());
            if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
                debug!(dir = %exe_dir.display(), "Loaded PDFium from executable directory");
                return Ok(Pdfium::new(bindings));
            }
        }
    }

    let bindings = Pdfium::bind_to_system_library().map_err(|e| {
        ExtractionError::PdfParsing(format!(
            "PDFium library not found. Set PDFIUM_DYNAMIC_LIB_PATH or install PDFium: {e}"
        ))
    })?;
    Ok(Pdfium::new(bindings))
}

/// Map PDF load errors. Encrypted PDFs get their own variant for
/// user-facing messaging.
pub(super) fn map_load_error(e: PdfiumError) -> ExtractionError {
    let msg = format!("{e}").to_lowercase();
    if msg.contains("password") || msg.contains("encrypt") {
        ExtractionError::PdfEncrypted
    } else {
        ExtractionError::PdfParsing(format!("Failed to load PDF: {e}"))
    }
}

// ── Mock for testing ──────────────────────────────────────

/// Mock text source returning a fixed string per orientation.
///
/// Orientations without an entry yield an empty string, mimicking a
/// scan with no embedded text layer.
pub struct MockPageTextSource {
    responses: Vec<(Orientation, String)>,
}

impl MockPageTextSource {
    pub fn empty() -> Self {
        Self {
            responses: Vec::new(),
        }
    }

    pub fn with_text(orientation: Orientation, text: &str) -> Self {
        Self {
            responses: vec![(orientation, text.to_string())],
        }
    }

    pub fn and_text(mut self, orientation: Orientation, text: &str) -> Self {
        self.responses.push((orientation, text.to_string()));
        self
    }
}

impl PageTextSource for MockPageTextSource {
    fn extract_text(
        &self,
        _pdf_bytes: &[u8],
        orientation: Orientation,
    ) -> Result<String, ExtractionError> {
        Ok(self
            .responses
            .iter()
            .find(|(o, _)| *o == orientation)
            .map(|(_, t)| t.clone())
            .unwrap_or_default())
    }
}

/// Mock text source that fails every call, mimicking a corrupt file.
pub struct FailingPageTextSource;

impl PageTextSource for FailingPageTextSource {
    fn extract_text(
        &self,
        _pdf_bytes: &[u8],
        _orientation: Orientation,
    ) -> Result<String, ExtractionError> {
        Err(ExtractionError::PdfParsing("not a PDF".into()))
    }
}
