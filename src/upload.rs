use std::path::Path;

use crate::error::UploadError;

pub const DIAGRAM_EXTENSIONS: &[&str] = &["drawio", "xml", "mxgraph"];
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Diagram,
    /// Shown for reference only; never handed to the engine.
    Image,
}

pub fn classify_upload(path: &Path) -> Result<UploadKind, UploadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if DIAGRAM_EXTENSIONS.contains(&extension.as_str()) {
        Ok(UploadKind::Diagram)
    } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Ok(UploadKind::Image)
    } else {
        Err(UploadError::UnsupportedType(path.to_path_buf()))
    }
}

pub fn read_diagram(path: &Path) -> Result<String, UploadError> {
    std::fs::read_to_string(path).map_err(|source| UploadError::Read {
        path: path.to_path_buf(),
        source,
    })
}
