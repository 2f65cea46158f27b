use thiserror::Error;

/// Faults reported by the text exchange channel. Either one leaves the store untouched.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("listing of {len} bytes exceeds the {max} byte limit")]
    BufferTooLarge { len: usize, max: usize },
    #[error("failed to read listing from caller: {0}")]
    CopyFault(#[from] std::io::Error),
}
