use std::path::PathBuf;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MarkupError {
    #[error("syntax error in diagram markup: unexpected `{context}`")]
    Syntax { context: String },
    #[error("diagram markup has no <root> element")]
    MissingRoot,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("unsupported file type: {}", .0.display())]
    UnsupportedType(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
