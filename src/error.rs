//! Error taxonomy.

use thiserror::Error;

/// Everything that can go wrong while reading or writing JSON.
///
/// Errors are surfaced immediately and nothing is retried or silently
/// recovered; a malformed document always fails the read instead of
/// producing a partial tree. Where a character offset is known it is the
/// cumulative count of characters consumed from the input (for the reader)
/// or emitted to the output (for the writer).
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying byte stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The input bytes could not be decoded with the configured encoding.
    #[error("invalid character encoding at character {position}")]
    Encoding {
        /// Characters read before the undecodable sequence.
        position: u64,
    },

    /// The stream ended before a structurally required token.
    #[error("premature end of data at character {position}")]
    PrematureEnd {
        /// Characters read when the stream ended.
        position: u64,
    },

    /// A token or call arrived in a state where the structural stack
    /// machine forbids it, including extra, missing and trailing
    /// separators and mismatched closes.
    #[error("invalid json structure at character {position}: {detail}")]
    Structure {
        /// What was violated.
        detail: String,
        /// Character offset at the point of failure.
        position: u64,
    },

    /// Unquoted literal text that is neither `null`, a boolean nor a
    /// number under the active dialect's rules.
    #[error("invalid json value at character {position}: {text:?}")]
    InvalidScalar {
        /// The offending literal text.
        text: String,
        /// Character offset at the point of failure.
        position: u64,
    },

    /// The writer was finalized while items were still open.
    #[error("there are still json items open: {frames}")]
    UnclosedItems {
        /// The open frames, outermost first, `/`-separated.
        frames: String,
    },
}
