use crossbeam_channel::TrySendError;
use derive_more::Display;
use std::error::Error;

pub type GalleryResult<T> = Result<T, GalleryError>;

/// Failures of the run-loop plumbing. Examples themselves are trusted not to fail.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum GalleryError {
    /// Typically happens if nobody pumps the main thread task queue anymore.
    #[display(fmt = "main thread task queue is full")]
    TaskQueueFull,
    #[display(fmt = "main thread task queue disconnected")]
    TaskQueueDisconnected,
    #[display(fmt = "operation is only allowed in main thread")]
    NotInMainThread,
}

impl Error for GalleryError {}

impl<T> From<TrySendError<T>> for GalleryError {
    fn from(e: TrySendError<T>) -> Self {
        match e {
            TrySendError::Full(_) => GalleryError::TaskQueueFull,
            TrySendError::Disconnected(_) => GalleryError::TaskQueueDisconnected,
        }
    }
}
