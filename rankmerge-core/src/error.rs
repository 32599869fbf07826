use std::path::PathBuf;

/// Errors raised by an [`OrderingOracle`](crate::oracle::OrderingOracle).
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// A scripted oracle ran out of canned decisions.
    #[error("oracle has no more decisions (asked {asked} times)")]
    Exhausted { asked: usize },

    /// A simulated oracle was asked about an item it has no rank for.
    #[error("no hidden rank for item \"{0}\"")]
    UnknownItem(String),

    /// The input stream closed before an answer was given.
    #[error("input closed before an answer was given")]
    InputClosed,

    /// Reading the answer or writing the prompt failed.
    #[error("oracle I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from loading or saving a list of items.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file does not exist.
    #[error("storage file not found: {}", path.display())]
    Missing { path: PathBuf },

    /// Any other I/O failure against the backing file.
    #[error("storage I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from a merge run.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The ranked list was saved but the pending store could not be emptied.
    /// Its items are now in both stores.
    #[error("ranked list saved, but pending items were not cleared: {source}")]
    PendingNotCleared {
        #[source]
        source: StoreError,
    },
}
