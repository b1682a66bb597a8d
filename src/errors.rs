use std::path::PathBuf;

/// Error kinds a store operation can fail with.
///
/// "Package not found" is deliberately not represented here: lookups return
/// `Option::None` and callers must check for absence explicitly.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid name: {name:?}")]
    InvalidName { name: String },

    #[error(
        "the package store at {path} is not compatible with this version of depot \
         (found format {version:?}); use a matching version or remove the store"
    )]
    IncompatibleFormat { path: PathBuf, version: String },

    #[error("unexpected package directory: {path}")]
    UnexpectedRoot { path: PathBuf },
}
