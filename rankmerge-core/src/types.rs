use std::fmt;

/// One ranked record: an opaque line of text such as a file path or label.
///
/// Items carry no intrinsic order. Their position in a ranked list comes only
/// from pairwise decisions made by an [`OrderingOracle`](crate::oracle::OrderingOracle).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Item(String);

impl Item {
    /// Build an item from a raw record. Surrounding whitespace (including the
    /// trailing newline of a stored line) is stripped.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Item(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Item {
    fn from(raw: &str) -> Self {
        Item::new(raw)
    }
}

impl From<String> for Item {
    fn from(raw: String) -> Self {
        Item::new(raw)
    }
}

/// Where a new item belongs relative to the existing item it was compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Decision {
    /// The new item goes before (left of) the existing item.
    Before,
    /// The new item goes after (right of) the existing item.
    After,
}

impl Decision {
    pub fn flipped(self) -> Decision {
        match self {
            Decision::Before => Decision::After,
            Decision::After => Decision::Before,
        }
    }
}

impl From<bool> for Decision {
    /// `true` means "after", matching the boolean comparator the console
    /// prompt historically returned.
    fn from(after: bool) -> Self {
        if after { Decision::After } else { Decision::Before }
    }
}

/// Result of draining a pending queue into a ranked list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeReport {
    /// The ranked list after every pending item was inserted.
    pub ranked: Vec<Item>,
    /// Number of pending items consumed.
    pub inserted: usize,
    /// Total oracle comparisons asked across all insertions.
    pub comparisons: usize,
}

impl MergeReport {
    /// True when nothing was pending, so the ranked list was left as loaded.
    pub fn is_noop(&self) -> bool {
        self.inserted == 0
    }
}
