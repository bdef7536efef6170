//! Gap-based position allocation for vehicle photo galleries
//!
//! Positions are sparse signed integers. Appends land `gap` after the
//! current last photo; moves land halfway between the new neighbours, or
//! `gap` beyond the first/last photo. Nothing here performs I/O.

use thiserror::Error;

/// Position of the first photo appended to an empty gallery
pub const DEFAULT_OFFSET: i64 = 128;

/// Distance between consecutively appended photos
pub const DEFAULT_GAP: i64 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocatorError {
    /// No integer strictly between the neighbours (or the keyspace edge was hit)
    #[error("no free position between {lo} and {hi}")]
    Exhausted { lo: i64, hi: i64 },

    #[error("target index {index} out of range 0..={len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("position gap must be at least 2, got {0}")]
    InvalidGap(i64),
}

/// Computes positions for appended and moved photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionAllocator {
    offset: i64,
    gap: i64,
}

impl Default for PositionAllocator {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            gap: DEFAULT_GAP,
        }
    }
}

impl PositionAllocator {
    pub fn new(offset: i64, gap: i64) -> Result<Self, AllocatorError> {
        // A gap of 1 leaves no room for a single midpoint insert.
        if gap < 2 {
            return Err(AllocatorError::InvalidGap(gap));
        }
        Ok(Self { offset, gap })
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn gap(&self) -> i64 {
        self.gap
    }

    /// Position for a photo appended after `existing`.
    pub fn append_position(&self, existing: &[i64]) -> Result<i64, AllocatorError> {
        match existing.iter().max() {
            None => Ok(self.offset),
            Some(&last) => last.checked_add(self.gap).ok_or(AllocatorError::Exhausted {
                lo: last,
                hi: i64::MAX,
            }),
        }
    }

    /// Position placing a photo at `target_index` among `others`.
    ///
    /// `others` are the positions of every other photo in the gallery,
    /// sorted ascending, with the moved photo already excluded.
    pub fn move_position(&self, others: &[i64], target_index: usize) -> Result<i64, AllocatorError> {
        let len = others.len();
        if target_index > len {
            return Err(AllocatorError::IndexOutOfRange {
                index: target_index,
                len,
            });
        }
        if len == 0 {
            return Ok(self.offset);
        }

        if target_index == 0 {
            let first = others[0];
            return first.checked_sub(self.gap).ok_or(AllocatorError::Exhausted {
                lo: i64::MIN,
                hi: first,
            });
        }
        if target_index == len {
            let last = others[len - 1];
            return last.checked_add(self.gap).ok_or(AllocatorError::Exhausted {
                lo: last,
                hi: i64::MAX,
            });
        }

        midpoint(others[target_index - 1], others[target_index])
    }

    /// Evenly spaced layout used when a gallery is rebalanced.
    pub fn canonical_positions(&self, count: usize) -> Result<Vec<i64>, AllocatorError> {
        let mut positions = Vec::with_capacity(count);
        let mut next = self.offset;
        for i in 0..count {
            positions.push(next);
            if i + 1 < count {
                next = next.checked_add(self.gap).ok_or(AllocatorError::Exhausted {
                    lo: next,
                    hi: i64::MAX,
                })?;
            }
        }
        Ok(positions)
    }
}

/// `lo + floor(|hi - lo| / 2)`, rejecting results that would collide with `lo`.
fn midpoint(lo: i64, hi: i64) -> Result<i64, AllocatorError> {
    let span = (i128::from(hi) - i128::from(lo)).abs();
    if span <= 1 {
        return Err(AllocatorError::Exhausted { lo, hi });
    }
    // lo < mid < hi, so the narrowing cast cannot truncate
    Ok((i128::from(lo) + span / 2) as i64)
}
