//! Nullable delay scheduler — record timelock requests without waiting.

use agora_oracle::{DelayScheduler, SchedulerError};
use agora_types::ProposalId;
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory scheduler for testing.
///
/// Records every schedule request so tests can assert the engine asked
/// for the right delay. `execute` succeeds for anything scheduled; use
/// `fail_next_execute` to simulate a timelock that has not elapsed.
pub struct NullScheduler {
    queued: Mutex<HashMap<ProposalId, u64>>,
    requests: Mutex<Vec<(ProposalId, u64)>>,
    fail_next_execute: Mutex<Option<SchedulerError>>,
}

impl NullScheduler {
    pub fn new() -> Self {
        Self {
            queued: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            fail_next_execute: Mutex::new(None),
        }
    }

    /// All schedule requests received, in order (for assertions).
    pub fn requests(&self) -> Vec<(ProposalId, u64)> {
        self.requests.lock().unwrap().clone()
    }

    /// The delay requested for `proposal`, if it is queued.
    pub fn queued_delay(&self, proposal: ProposalId) -> Option<u64> {
        self.queued.lock().unwrap().get(&proposal).copied()
    }

    /// Make the next `execute` call fail with `err`.
    pub fn fail_next_execute(&self, err: SchedulerError) {
        *self.fail_next_execute.lock().unwrap() = Some(err);
    }
}

impl Default for NullScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayScheduler for NullScheduler {
    fn schedule(&self, proposal: ProposalId, delay_secs: u64) -> Result<(), SchedulerError> {
        let mut queued = self.queued.lock().unwrap();
        if queued.contains_key(&proposal) {
            return Err(SchedulerError::AlreadyScheduled(proposal));
        }
        queued.insert(proposal, delay_secs);
        self.requests.lock().unwrap().push((proposal, delay_secs));
        Ok(())
    }

    fn execute(&self, proposal: ProposalId) -> Result<(), SchedulerError> {
        if let Some(err) = self.fail_next_execute.lock().unwrap().take() {
            return Err(err);
        }
        self.queued
            .lock()
            .unwrap()
            .remove(&proposal)
            .map(|_| ())
            .ok_or(SchedulerError::NotScheduled(proposal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_records_the_requested_delay() {
        let scheduler = NullScheduler::new();
        scheduler.schedule(7, 86_400).unwrap();
        assert_eq!(scheduler.requests(), vec![(7, 86_400)]);
        assert_eq!(scheduler.queued_delay(7), Some(86_400));
    }

    #[test]
    fn double_schedule_is_rejected() {
        let scheduler = NullScheduler::new();
        scheduler.schedule(7, 3_600).unwrap();
        assert_eq!(
            scheduler.schedule(7, 3_600),
            Err(SchedulerError::AlreadyScheduled(7))
        );
    }

    #[test]
    fn execute_drains_the_queue_entry() {
        let scheduler = NullScheduler::new();
        scheduler.schedule(3, 600).unwrap();
        scheduler.execute(3).unwrap();
        assert_eq!(scheduler.execute(3), Err(SchedulerError::NotScheduled(3)));
    }

    #[test]
    fn injected_execute_failure_fires_once() {
        let scheduler = NullScheduler::new();
        scheduler.schedule(4, 600).unwrap();
        scheduler.fail_next_execute(SchedulerError::DelayNotElapsed { remaining_secs: 120 });
        assert_eq!(
            scheduler.execute(4),
            Err(SchedulerError::DelayNotElapsed { remaining_secs: 120 })
        );
        assert!(scheduler.execute(4).is_ok());
    }
}
