//! Ledger of optimistic status moves awaiting a server answer.
//!
//! Each move writes the new status to the board straight away and leaves a
//! [`PendingMove`] behind. The matching commit or rollback removes it again,
//! so every optimistic write is resolved exactly once.

use folio_api::endpoints::{ProjectId, ProjectStatus};

use super::AppState;

/// Identifies one optimistic write; later moves get larger ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpId(u64);

impl std::fmt::Display for OpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub op_id: OpId,
    pub project_id: ProjectId,
    /// Status to restore if this move is rejected
    pub prior_status: ProjectStatus,
    pub new_status: ProjectStatus,
}

/// What a rollback did to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rollback {
    /// The project was put back to `status`
    Restored { status: ProjectStatus },
    /// A later move on the same project owns the displayed status; it now
    /// carries the prior status instead
    HandedOff { to: OpId },
    /// The project is no longer on the board
    Gone,
}

impl AppState {
    /// Applies a move to the board and records it.
    ///
    /// Returns `None` when there is nothing to send: the card did not move or
    /// the project is unknown.
    pub fn begin_move(
        &mut self,
        project_id: ProjectId,
        from_status: ProjectStatus,
        to_status: ProjectStatus,
        from_index: usize,
        to_index: usize,
    ) -> Option<PendingMove> {
        if from_status == to_status && from_index == to_index {
            return None;
        }
        if from_status == to_status {
            // Only the status is persisted
            tracing::debug!(%project_id, "Ignoring move within column {}", from_status);
            return None;
        }

        let project = self.board.project_mut(project_id)?;
        project.status = to_status;

        self.next_op_id += 1;
        let pending = PendingMove {
            op_id: OpId(self.next_op_id),
            project_id,
            prior_status: from_status,
            new_status: to_status,
        };
        self.pending_moves.insert(pending.op_id, pending.clone());
        self.board.clamp_selection();

        tracing::info!(
            op_id = %pending.op_id,
            %project_id,
            "Moved project {} -> {} (pending)",
            from_status,
            to_status
        );
        Some(pending)
    }

    /// Marks a move as accepted. The board already shows its status.
    ///
    /// Earlier moves of the same project still in flight now roll back to
    /// this status, the newest one the server accepted.
    pub fn commit_move(&mut self, op_id: OpId) -> Option<PendingMove> {
        let pending = self.pending_moves.remove(&op_id)?;
        for (_, earlier) in self.pending_moves.range_mut(..op_id) {
            if earlier.project_id == pending.project_id {
                earlier.prior_status = pending.new_status;
            }
        }
        tracing::info!(%op_id, project_id = %pending.project_id, "Move committed");
        Some(pending)
    }

    /// Reverts a rejected move without touching any other project.
    pub fn rollback_move(&mut self, op_id: OpId) -> Option<(PendingMove, Rollback)> {
        let pending = self.pending_moves.remove(&op_id)?;

        if let Some(later) = self.superseding_move(&pending) {
            later.prior_status = pending.prior_status;
            let to = later.op_id;
            tracing::info!(%op_id, superseded_by = %to, "Move rejected after being superseded");
            return Some((pending, Rollback::HandedOff { to }));
        }

        let outcome = match self.board.project_mut(pending.project_id) {
            Some(project) => {
                project.status = pending.prior_status;
                Rollback::Restored {
                    status: pending.prior_status,
                }
            }
            None => Rollback::Gone,
        };
        self.board.clamp_selection();

        tracing::warn!(%op_id, project_id = %pending.project_id, ?outcome, "Move rolled back");
        Some((pending, outcome))
    }

    /// Whether the board shows a status for this project the server has not confirmed
    pub fn has_pending_move(&self, project_id: ProjectId) -> bool {
        self.pending_moves
            .values()
            .any(|pending| pending.project_id == project_id)
    }

    /// Re-applies in-flight moves after the project list was replaced by a fetch
    pub fn reapply_pending_moves(&mut self) {
        // Ascending op order leaves the newest write on top
        for pending in self.pending_moves.values() {
            if let Some(project) = self.board.project_mut(pending.project_id) {
                project.status = pending.new_status;
            }
        }
        self.board.clamp_selection();
    }

    /// The next move of the same project issued after `pending`
    fn superseding_move(&mut self, pending: &PendingMove) -> Option<&mut PendingMove> {
        self.pending_moves
            .range_mut(pending.op_id..)
            .map(|(_, later)| later)
            .find(|later| later.project_id == pending.project_id)
    }
}
