use std::env;
use std::path::{Path, PathBuf};

use pdfium_render::prelude::*;

use crate::error::{Result, ShowError};
use crate::page::{self, Deck, Page};

/// Turns files picked by the operator into pages.
pub trait Loader {
    fn load_document(&self, path: &Path) -> Result<Deck>;
    fn load_image(&self, path: &Path) -> Result<Page>;
}

pub struct PdfiumLoader {
    // None when the PDFium shared library could not be bound
    pdfium: Option<Pdfium>,
    bind_error: String,
    scale: f32,
}

impl PdfiumLoader {
    pub fn new(scale: f32) -> Self {
        // Library next to the executable first, then the system one
        let local = bundled_library_path();
        let bindings = Pdfium::bind_to_library(&local).or_else(|e| {
            tracing::debug!("No PDFium at {} ({}), trying the system library", local.display(), e);
            Pdfium::bind_to_system_library()
        });

        match bindings {
            Ok(bindings) => Self { pdfium: Some(Pdfium::new(bindings)), bind_error: String::new(), scale },
            Err(e) => {
                tracing::warn!("PDFium library unavailable, documents cannot be opened: {}", e);
                Self { pdfium: None, bind_error: e.to_string(), scale }
            }
        }
    }
}

/// Platform PDFium library name in the directory holding the executable.
fn bundled_library_path() -> PathBuf {
    let dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    Pdfium::pdfium_platform_library_name_at_path(&dir)
}

impl Loader for PdfiumLoader {
    fn load_document(&self, path: &Path) -> Result<Deck> {
        let pdfium = self
            .pdfium
            .as_ref()
            .ok_or_else(|| ShowError::load(path, format!("PDFium library not available ({})", self.bind_error)))?;

        let document = pdfium.load_pdf_from_file(path, None).map_err(|e| ShowError::load(path, e))?;
        let config = PdfRenderConfig::new().scale_page_by_factor(self.scale);

        let mut pages = Vec::new();
        for (index, pdf_page) in document.pages().iter().enumerate() {
            let bitmap = pdf_page
                .render_with_config(&config)
                .map_err(|e| ShowError::load(path, format!("page {}: {}", index + 1, e)))?;
            let page = Page::from_rgba(bitmap.width() as u32, bitmap.height() as u32, bitmap.as_rgba_bytes())
                .map_err(|e| ShowError::load(path, format!("page {}: {}", index + 1, e)))?;
            pages.push(page);
        }

        tracing::info!("Rendered {} pages from {}", pages.len(), path.display());
        Ok(Deck::new(pages))
    }

    fn load_image(&self, path: &Path) -> Result<Page> {
        page::load_cover(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unbound() -> PdfiumLoader {
        PdfiumLoader { pdfium: None, bind_error: "libpdfium.so: cannot open shared object file".into(), scale: 2.0 }
    }

    #[test]
    fn bundled_library_sits_next_to_the_executable() {
        let exe = env::current_exe().unwrap();
        let path = bundled_library_path();
        assert_eq!(path.parent(), exe.parent());
        assert!(path.file_name().unwrap().to_string_lossy().contains("pdfium"));
    }

    #[test]
    fn missing_library_fails_every_open_with_its_reason() {
        let loader = unbound();
        for _ in 0..2 {
            match loader.load_document(Path::new("talk.pdf")) {
                Err(ShowError::Load { path, reason }) => {
                    assert_eq!(path, Path::new("talk.pdf"));
                    assert!(reason.contains("PDFium library not available"));
                    assert!(reason.contains("libpdfium.so"));
                }
                other => panic!("expected a load failure, got {:?}", other.map(|d| d.len())),
            }
        }
    }

    #[test]
    fn covers_load_without_pdfium() {
        let path = env::temp_dir().join(format!("pdfshow-cover-{}.png", std::process::id()));
        image::RgbaImage::from_pixel(4, 2, image::Rgba([9, 9, 9, 255])).save(&path).unwrap();
        let cover = unbound().load_image(&path);
        std::fs::remove_file(&path).unwrap();
        let cover = cover.unwrap();
        assert_eq!((cover.width, cover.height), (4, 2));
    }
}
