//! Locating and binding the pdfium shared library.

use crate::{RenderError, Result};
use pdfium_render::prelude::*;
use std::path::PathBuf;

/// Environment variable naming an extra directory holding pdfium.
pub const PDFIUM_DIR_ENV: &str = "CERTYFIKATY_PDFIUM_DIR";

/// Directories searched for the pdfium library, in order.
pub fn pdfium_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(dir) = std::env::var(PDFIUM_DIR_ENV) {
        paths.push(PathBuf::from(dir));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            paths.push(exe_dir.join("libs"));
            paths.push(exe_dir.to_path_buf());

            #[cfg(target_os = "macos")]
            {
                if let Some(contents_dir) = exe_dir.parent() {
                    paths.push(contents_dir.join("Resources").join("libs"));
                }
            }

            #[cfg(target_os = "linux")]
            {
                if let Ok(appdir) = std::env::var("APPDIR") {
                    paths.push(PathBuf::from(appdir).join("usr").join("lib"));
                }
            }
        }
    }

    paths.push(PathBuf::from("libs"));
    paths.push(PathBuf::from("./"));
    paths
}

/// Binds pdfium from the search paths, then from the system library.
pub fn bind_pdfium() -> Result<Pdfium> {
    for path in pdfium_search_paths() {
        let lib_path = Pdfium::pdfium_platform_library_name_at_path(&path);
        log::debug!("[Pdfium] trying {:?}", lib_path);

        if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
            log::info!("[Pdfium] loaded from {:?}", path);
            return Ok(Pdfium::new(bindings));
        }
    }

    log::debug!("[Pdfium] trying system library");
    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| {
            RenderError::Binding(format!(
                "{}; place the pdfium library in ./libs or set {}",
                e, PDFIUM_DIR_ENV
            ))
        })
}
