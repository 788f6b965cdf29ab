use thiserror::Error;

/// Errors for input-driven failures.
///
/// Contract violations (out-of-range indices, comparing relations of different
/// sizes, overflowing the index width) panic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The sequence is not a canonical group labeling: the value at `index`
    /// skips over an unused group number.
    #[error("not a canonical group labeling: unexpected group number at index {index}")]
    NotCanonical {
        /// Position of the first offending entry
        index: usize,
    },

    /// More elements were requested than the index type can address.
    #[error("{size} elements do not fit into the index type")]
    TooLarge {
        /// Requested number of elements
        size: usize,
    },

    /// The identifier was never issued by the store.
    #[error("no relation stored under id {0}")]
    UnknownId(usize),
}
