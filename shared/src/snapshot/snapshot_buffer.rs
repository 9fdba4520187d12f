use std::collections::{vec_deque, VecDeque};

use log::{trace, warn};

use crate::snapshot::snapshot::Snapshot;

/// Why an insert was turned down
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Older than the first buffered snapshot
    BeforeFirst,
    /// Between the first and second snapshots, which are being interpolated
    InProgressWindow,
    /// Older than the newest buffered snapshot
    OutOfOrder,
    /// A timestamp is NaN or infinite
    InvalidTimestamp,
}

/// Result of [`SnapshotBuffer::insert`]. None of these are errors: late and
/// duplicated snapshots are a normal consequence of network reordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A snapshot with the same remote timestamp is already buffered
    Duplicate,
    /// The buffer holds `limit` snapshots already
    BufferFull,
    Rejected(RejectReason),
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }
}

/// Snapshots ordered by remote timestamp, strictly increasing.
///
/// New snapshots are only ever appended after the newest one, so the two
/// oldest entries, which the interpolation runs between, never change under
/// it.
#[derive(Clone, Debug)]
pub struct SnapshotBuffer<S: Snapshot> {
    snapshots: VecDeque<S>,
    limit: usize,
}

impl<S: Snapshot> SnapshotBuffer<S> {
    /// Interpolation needs at least two snapshots, smaller limits are raised
    /// to 2
    pub fn new(limit: usize) -> Self {
        let limit = if limit < 2 {
            warn!("Snapshot buffer limit {} is too small, using 2", limit);
            2
        } else {
            limit
        };

        Self {
            snapshots: VecDeque::new(),
            limit,
        }
    }

    pub fn insert(&mut self, snapshot: S) -> InsertOutcome {
        let outcome = self.check_insert(&snapshot);
        match outcome {
            InsertOutcome::Inserted => self.snapshots.push_back(snapshot),
            _ => trace!(
                "Snapshot at remote time {} not buffered: {:?}",
                snapshot.remote_time(),
                outcome
            ),
        }
        outcome
    }

    fn check_insert(&self, snapshot: &S) -> InsertOutcome {
        let timestamp = snapshot.remote_time();
        if !timestamp.is_finite() || !snapshot.local_time().is_finite() {
            return InsertOutcome::Rejected(RejectReason::InvalidTimestamp);
        }

        let (Some(first), Some(last)) = (self.snapshots.front(), self.snapshots.back()) else {
            return InsertOutcome::Inserted;
        };

        if self
            .snapshots
            .iter()
            .any(|buffered| buffered.remote_time() == timestamp)
        {
            return InsertOutcome::Duplicate;
        }

        if timestamp < first.remote_time() {
            return InsertOutcome::Rejected(RejectReason::BeforeFirst);
        }

        if let Some(second) = self.snapshots.get(1) {
            if timestamp < second.remote_time() {
                return InsertOutcome::Rejected(RejectReason::InProgressWindow);
            }
        }

        if timestamp < last.remote_time() {
            return InsertOutcome::Rejected(RejectReason::OutOfOrder);
        }

        if self.snapshots.len() >= self.limit {
            return InsertOutcome::BufferFull;
        }

        InsertOutcome::Inserted
    }

    /// Whether at least `amount` snapshots arrived at or before `threshold`
    /// (local time)
    pub fn has_amount_older_than(&self, threshold: f64, amount: usize) -> bool {
        if amount == 0 {
            return true;
        }
        self.snapshots
            .get(amount - 1)
            .map_or(false, |snapshot| snapshot.local_time() <= threshold)
    }

    pub fn first(&self) -> Option<&S> {
        self.snapshots.front()
    }

    pub fn second(&self) -> Option<&S> {
        self.snapshots.get(1)
    }

    pub fn last(&self) -> Option<&S> {
        self.snapshots.back()
    }

    pub fn pop_front(&mut self) -> Option<S> {
        self.snapshots.pop_front()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, S> {
        self.snapshots.iter()
    }
}
