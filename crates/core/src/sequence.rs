use std::path::PathBuf;
use thiserror::Error;

use crate::record::ListingId;

/// Every `u32` index has been handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("listing index {0} is the last one; the run cannot number more listings")]
pub struct SequenceExhausted(pub u32);

/// Run-wide listing counter. It is a plain value: callers pass it into each
/// processing step and get the advanced counter back, so an index is only
/// consumed when a record is actually produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sequence(u32);

impl Sequence {
    /// The first index of a run is 1.
    pub fn start() -> Self {
        Sequence(1)
    }

    /// Resume numbering at `index` (treated as 1 when zero).
    pub fn starting_at(index: u32) -> Self {
        Sequence(index.max(1))
    }

    /// The index the next record will receive.
    pub fn peek(self) -> u32 {
        self.0
    }

    /// Consume the current index for a listing on `page`. Fails instead of
    /// wrapping or repeating once no next index exists.
    pub fn claim(self, page: u32, screenshot: PathBuf) -> Result<(ListingId, Sequence), SequenceExhausted> {
        let next = self.0.checked_add(1).ok_or(SequenceExhausted(self.0))?;
        let id = ListingId { index: self.0, page, screenshot };
        Ok((id, Sequence(next)))
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Sequence::start()
    }
}
