use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::api::ProductLocationChangeDescription;
use crate::location::{ProductLocationChange, ProductToLocate};
use crate::structure::ProductId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("a submission is already in flight")]
    InFlight,
    #[error("no changes to submit")]
    NothingToSubmit,
    #[error("no submission in flight")]
    NotSubmitting,
}

/// Where a change set is in its save cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Settled { success: bool },
}

/// Pending location edits for a set of products, in the order they were
/// first touched.
///
/// Only one submission may be in flight at a time; edits are refused until it
/// is finished.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    changes: IndexMap<ProductId, ProductLocationChange>,
    state: SubmissionState,
    in_flight: Vec<ProductId>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Returns the change for `product`, snapshotting it on first use.
    pub fn track(
        &mut self,
        product: &ProductToLocate,
    ) -> Result<&mut ProductLocationChange, SubmissionError> {
        self.ensure_editable()?;
        Ok(self
            .changes
            .entry(product.id)
            .or_insert_with(|| ProductLocationChange::from_product(product)))
    }

    pub fn get(&self, product: ProductId) -> Option<&ProductLocationChange> {
        self.changes.get(&product)
    }

    pub fn get_mut(
        &mut self,
        product: ProductId,
    ) -> Result<Option<&mut ProductLocationChange>, SubmissionError> {
        self.ensure_editable()?;
        Ok(self.changes.get_mut(&product))
    }

    /// Drops the pending change for `product`.
    pub fn discard(
        &mut self,
        product: ProductId,
    ) -> Result<Option<ProductLocationChange>, SubmissionError> {
        self.ensure_editable()?;
        Ok(self.changes.shift_remove(&product))
    }

    /// Changes that would be submitted.
    pub fn dirty(&self) -> impl Iterator<Item = &ProductLocationChange> {
        self.changes.values().filter(|c| c.has_changes())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Starts a submission and returns the request body for it.
    ///
    /// `date` is the wire-formatted date the changes take effect.
    pub fn begin_submission(
        &mut self,
        date: String,
    ) -> Result<ProductLocationChangeDescription, SubmissionError> {
        self.ensure_editable()?;
        let changes: Vec<ProductLocationChange> = self
            .dirty()
            .map(ProductLocationChange::prepare_for_upload)
            .collect();
        if changes.is_empty() {
            return Err(SubmissionError::NothingToSubmit);
        }

        self.in_flight = changes
            .iter()
            .map(ProductLocationChange::product_id)
            .collect();
        self.state = SubmissionState::Submitting;
        debug!(count = changes.len(), "submitting location changes");
        Ok(ProductLocationChangeDescription { date, changes })
    }

    /// Settles the submission in flight.
    ///
    /// On success the submitted changes are dropped; otherwise they stay
    /// pending so they can be retried.
    pub fn finish_submission(&mut self, success: bool) -> Result<(), SubmissionError> {
        self.settle(success, |_| success)
    }

    /// Settles a submission the server applied only in part.
    ///
    /// The server saves every change except automatic placements it could
    /// not compute, without saying which. Changes asking for an automatic
    /// placement stay pending; the rest are dropped.
    pub fn finish_partial_submission(&mut self) -> Result<(), SubmissionError> {
        self.settle(false, |change| !change.revert_auto)
    }

    /// Gives up on the submission in flight without an answer from the
    /// server, keeping every change pending.
    pub fn abort_submission(&mut self) -> Result<(), SubmissionError> {
        self.settle(false, |_| false)
    }

    fn settle(
        &mut self,
        success: bool,
        saved: impl Fn(&ProductLocationChange) -> bool,
    ) -> Result<(), SubmissionError> {
        if self.state != SubmissionState::Submitting {
            return Err(SubmissionError::NotSubmitting);
        }
        let submitted = std::mem::take(&mut self.in_flight);
        let mut dropped = 0;
        for id in &submitted {
            if self.changes.get(id).is_some_and(&saved) {
                self.changes.shift_remove(id);
                dropped += 1;
            }
        }
        debug!(
            count = submitted.len(),
            dropped,
            success,
            "location changes settled"
        );
        self.state = SubmissionState::Settled { success };
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), SubmissionError> {
        match self.state {
            SubmissionState::Submitting => Err(SubmissionError::InFlight),
            _ => Ok(()),
        }
    }
}
