use agora_types::ProposalId;

use crate::SchedulerError;

/// Two-phase timelock for approved proposals.
///
/// A passed proposal is first handed over with `schedule`, naming the
/// minimum delay its category demands. `execute` may only succeed once
/// that delay has fully elapsed; until then it must fail with
/// [`SchedulerError::DelayNotElapsed`]. The engine decides which delay
/// to request, the scheduler enforces the wait.
pub trait DelayScheduler: Send + Sync {
    /// Queue `proposal` for execution no earlier than `delay_secs` from now.
    fn schedule(&self, proposal: ProposalId, delay_secs: u64) -> Result<(), SchedulerError>;

    /// Execute `proposal` now, provided its delay has elapsed.
    fn execute(&self, proposal: ProposalId) -> Result<(), SchedulerError>;
}
