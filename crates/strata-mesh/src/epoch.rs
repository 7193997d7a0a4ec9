//! Epoch-stamped per-cell scratch tables.
//!
//! A wavefront expansion needs per-cell "visited" state and a tentative
//! distance, but clearing `cell_count` entries before every expansion
//! dominates the cost of small expansions. [`EpochTable`] stamps each
//! entry with the epoch that wrote it; starting a new epoch invalidates
//! every entry at once. The stamp array is only cleared when the epoch
//! counter is exhausted.
//!
//! The table is an explicit value owned by the caller and passed by
//! `&mut` into each expansion.

/// Per-cell values that are only visible within the epoch that wrote them.
///
/// # Examples
///
/// ```
/// use strata_mesh::EpochTable;
///
/// let mut t = EpochTable::new(4, 0.0f64);
/// t.begin();
/// t.set(2, 1.5);
/// assert_eq!(t.get(2), Some(1.5));
/// t.begin();
/// assert_eq!(t.get(2), None);
/// ```
#[derive(Debug, Clone)]
pub struct EpochTable<T: Copy> {
    stamps: Vec<u32>,
    values: Vec<T>,
    epoch: u32,
    limit: u32,
}

impl<T: Copy> EpochTable<T> {
    /// Create a table for `len` cells. `fill` seeds the value storage and
    /// is never observable through [`get`](Self::get).
    pub fn new(len: usize, fill: T) -> Self {
        Self::with_limit(len, fill, u32::MAX)
    }

    /// Like [`new`](Self::new) but with a custom epoch limit, after which
    /// the stamps are cleared and counting restarts.
    pub fn with_limit(len: usize, fill: T, limit: u32) -> Self {
        Self {
            stamps: vec![0; len],
            values: vec![fill; len],
            epoch: 0,
            limit: limit.max(1),
        }
    }

    /// Start a new epoch, invalidating all entries. Returns the new epoch.
    pub fn begin(&mut self) -> u32 {
        if self.epoch >= self.limit {
            self.stamps.fill(0);
            self.epoch = 0;
        }
        self.epoch += 1;
        self.epoch
    }

    /// Current epoch (0 before the first [`begin`](Self::begin)).
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Value written to `cell` in the current epoch, if any.
    #[inline]
    pub fn get(&self, cell: usize) -> Option<T> {
        (self.epoch != 0 && self.stamps[cell] == self.epoch).then(|| self.values[cell])
    }

    /// Returns `true` if `cell` was written in the current epoch.
    #[inline]
    pub fn contains(&self, cell: usize) -> bool {
        self.epoch != 0 && self.stamps[cell] == self.epoch
    }

    /// Write `value` to `cell` for the current epoch.
    #[inline]
    pub fn set(&mut self, cell: usize, value: T) {
        self.stamps[cell] = self.epoch;
        self.values[cell] = value;
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Returns `true` if the table covers no cells.
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_visible_before_first_epoch() {
        let t = EpochTable::new(3, 0u8);
        assert_eq!(t.get(0), None);
        assert!(!t.contains(1));
        assert_eq!(t.epoch(), 0);
    }

    #[test]
    fn exhaustion_clears_stale_stamps() {
        let mut t = EpochTable::with_limit(2, 0u8, 3);
        assert_eq!(t.begin(), 1);
        t.set(0, 7);
        assert_eq!(t.begin(), 2);
        assert_eq!(t.begin(), 3);
        // Counter wraps back to 1; the stamp written in epoch 1 must not resurface.
        assert_eq!(t.begin(), 1);
        assert_eq!(t.get(0), None);
        t.set(1, 9);
        assert_eq!(t.get(1), Some(9));
    }

    #[test]
    fn overwrite_within_epoch() {
        let mut t = EpochTable::new(1, 0.0f64);
        t.begin();
        t.set(0, 2.0);
        t.set(0, 1.0);
        assert_eq!(t.get(0), Some(1.0));
        assert_eq!(t.len(), 1);
        assert!(!t.is_empty());
    }
}
