use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Surface already revealed, no new strokes are accepted")]
    AlreadyRevealed,
}

pub type Result<T> = core::result::Result<T, SurfaceError>;
