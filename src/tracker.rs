//! Last-write-wins publication of recomputed sections
//!
//! Every change to the document or the record starts a new recomputation.
//! Only the most recently started one may publish; results of older runs are
//! dropped when they finish.

use crate::sections::Section;
use crate::SectionError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Handle for one recomputation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Outcome of the latest completed recomputation
#[derive(Debug, Clone, PartialEq)]
pub enum SectionState {
    /// Nothing has been published yet
    Idle,
    Ready(Vec<Section>),
    /// The document could not be decoded; the caller has to supply it again
    Failed(String),
}

#[derive(Debug)]
pub struct SectionTracker {
    generation: AtomicU64,
    state: Mutex<(u64, SectionState)>,
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionTracker {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            state: Mutex::new((0, SectionState::Idle)),
        }
    }

    /// Start a recomputation, invalidating every earlier ticket
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` belongs to the latest recomputation
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Store a finished recomputation; returns false if it was superseded
    pub fn publish(&self, ticket: Ticket, result: Result<Vec<Section>, SectionError>) -> bool {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Checked under the lock so a newer run that published first is never overwritten
        if !self.is_current(ticket) || guard.0 > ticket.0 {
            log::debug!("dropping stale section result from run {}", ticket.0);
            return false;
        }
        let state = match result {
            Ok(sections) => SectionState::Ready(sections),
            Err(e) => {
                log::warn!("section recomputation failed: {}", e);
                SectionState::Failed(e.to_string())
            }
        };
        *guard = (ticket.0, state);
        true
    }

    pub fn state(&self) -> SectionState {
        match self.state.lock() {
            Ok(guard) => guard.1.clone(),
            Err(poisoned) => poisoned.into_inner().1.clone(),
        }
    }

    /// Sections of the latest successful run, `None` when none are available
    pub fn sections(&self) -> Option<Vec<Section>> {
        match self.state() {
            SectionState::Ready(sections) => Some(sections),
            SectionState::Idle | SectionState::Failed(_) => None,
        }
    }
}
