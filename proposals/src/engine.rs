//! Proposal lifecycle engine.
//!
//! Holds every proposal and vote in memory, resolves voting power
//! through the injected oracle at a creation-time snapshot, escrows
//! deposits through the injected ledger, and hands succeeded proposals
//! to the injected scheduler. Callers supply the chain context (`now`,
//! `height`) explicitly; the engine never reads a clock.
//!
//! Operations run under a serialized-transaction model: one call at a
//! time, atomic to completion. Every precondition failure returns
//! before any state is written, and the ledger is the last fallible
//! step on each mutating path.

use std::collections::HashMap;
use std::sync::Arc;

use agora_access::{Role, RoleTable};
use agora_oracle::{DelayScheduler, Ledger, VotingPowerOracle};
use agora_types::{AccountId, BlockHeight, ContentRef, ProposalId, Timestamp};
use agora_utils::{CallGate, EventBus};
use agora_voting::{PowerSnapshot, QuorumRatio, Tally, VoteChoice};
use serde::{Deserialize, Serialize};

use crate::error::ProposalError;
use crate::events::ProposalEvent;
use crate::params::ProposalParams;
use crate::proposal::{
    Proposal, ProposalCategory, ProposalStatus, MAX_VOTING_DURATION_SECS,
    MIN_VOTING_DURATION_SECS,
};
use crate::vote::Vote;

/// The proposal engine.
///
/// Entities are created and mutated only through the operations below
/// and never deleted; terminal proposals are retained for audit.
pub struct ProposalEngine {
    oracle: Arc<dyn VotingPowerOracle>,
    ledger: Arc<dyn Ledger>,
    scheduler: Arc<dyn DelayScheduler>,
    params: ProposalParams,
    roles: RoleTable,
    next_id: ProposalId,
    proposals: HashMap<ProposalId, Proposal>,
    votes: HashMap<(ProposalId, AccountId), Vote>,
    /// Forfeited deposits accumulate here and never leave the engine.
    treasury: u128,
    paused: bool,
    gate: CallGate,
    events: EventBus<ProposalEvent>,
}

impl ProposalEngine {
    /// Build an engine around its collaborators, seeding `initial_admin`
    /// with the admin role.
    pub fn new(
        oracle: Arc<dyn VotingPowerOracle>,
        ledger: Arc<dyn Ledger>,
        scheduler: Arc<dyn DelayScheduler>,
        params: ProposalParams,
        initial_admin: AccountId,
    ) -> Self {
        Self {
            oracle,
            ledger,
            scheduler,
            params,
            roles: RoleTable::with_admin(initial_admin),
            next_id: 1,
            proposals: HashMap::new(),
            votes: HashMap::new(),
            treasury: 0,
            paused: false,
            gate: CallGate::new(),
            events: EventBus::new(),
        }
    }

    // ── Lifecycle operations ───────────────────────────────────────────

    /// Create a proposal and open it for voting immediately.
    ///
    /// Power is checked at `height − 1`, not `height`: power acquired in
    /// the creation block itself carries no weight, so borrow-create-repay
    /// within one block cannot satisfy the threshold.
    pub fn create_proposal(
        &mut self,
        proposer: &AccountId,
        content: ContentRef,
        duration_secs: u64,
        category: ProposalCategory,
        now: Timestamp,
        height: BlockHeight,
    ) -> Result<ProposalId, ProposalError> {
        let _permit = self.gate.enter().ok_or(ProposalError::ReentrantCall)?;
        if self.paused {
            return Err(ProposalError::Paused);
        }
        if content.is_empty() {
            return Err(ProposalError::EmptyContent);
        }
        if !(MIN_VOTING_DURATION_SECS..=MAX_VOTING_DURATION_SECS).contains(&duration_secs) {
            return Err(ProposalError::DurationOutOfBounds {
                requested: duration_secs,
                min: MIN_VOTING_DURATION_SECS,
                max: MAX_VOTING_DURATION_SECS,
            });
        }

        let snapshot_height = height.prior();
        let power = self.oracle.historical_power(proposer, snapshot_height)?;
        if power < self.params.voting_threshold {
            return Err(ProposalError::InsufficientPower {
                needed: self.params.voting_threshold,
                available: power,
            });
        }
        let total_power = self.oracle.historical_total_supply(snapshot_height)?;

        // Last fallible step before state is written.
        self.ledger.escrow(proposer, self.params.proposal_deposit)?;

        let id = self.next_id;
        self.next_id += 1;
        let end_time = now.saturating_add_secs(duration_secs);
        let snapshot = PowerSnapshot::new(snapshot_height, total_power);
        self.proposals.insert(
            id,
            Proposal {
                id,
                proposer: proposer.clone(),
                content: content.clone(),
                category,
                status: ProposalStatus::Active,
                start_time: now,
                end_time,
                snapshot,
                quorum: self.params.quorum,
                tally: Tally::default(),
                deposit: self.params.proposal_deposit,
                deposit_refunded: false,
            },
        );
        tracing::info!(
            id,
            proposer = %proposer,
            category = %category,
            end = %end_time,
            snapshot = %snapshot_height,
            "proposal created"
        );
        self.events.emit(&ProposalEvent::ProposalCreated {
            id,
            proposer: proposer.clone(),
            content,
            category,
            start: now,
            end: end_time,
            snapshot,
        });
        Ok(id)
    }

    /// Cast a vote. First vote wins; there is no changing or withdrawing.
    pub fn vote(
        &mut self,
        voter: &AccountId,
        id: ProposalId,
        choice: VoteChoice,
        reasoning: Option<ContentRef>,
        now: Timestamp,
    ) -> Result<(), ProposalError> {
        let _permit = self.gate.enter().ok_or(ProposalError::ReentrantCall)?;
        if self.paused {
            return Err(ProposalError::Paused);
        }
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(ProposalError::UnknownProposal(id))?;
        if proposal.status != ProposalStatus::Active {
            return Err(ProposalError::NotActive(id));
        }
        if now < proposal.start_time {
            return Err(ProposalError::VotingNotStarted(id));
        }
        if proposal.voting_closed(now) {
            return Err(ProposalError::VotingClosed(id));
        }
        if self.votes.contains_key(&(id, voter.clone())) {
            return Err(ProposalError::AlreadyVoted(voter.clone()));
        }

        // Weight is resolved at the proposal's snapshot height, never at
        // the current one.
        let power = self.oracle.historical_power(voter, proposal.snapshot.height)?;
        if power == 0 {
            return Err(ProposalError::InsufficientPower {
                needed: 1,
                available: 0,
            });
        }

        proposal.tally.record(choice, power)?;
        self.votes.insert(
            (id, voter.clone()),
            Vote {
                voter: voter.clone(),
                choice,
                power,
                cast_at: now,
                reasoning: reasoning.clone(),
            },
        );
        tracing::debug!(id, voter = %voter, choice = ?choice, power, "vote cast");
        self.events.emit(&ProposalEvent::VoteCast {
            id,
            voter: voter.clone(),
            choice,
            power,
            cast_at: now,
            reasoning,
        });
        Ok(())
    }

    /// Close a proposal whose voting window has ended.
    ///
    /// Pull-based: anyone may call this once `now > end_time`; nothing
    /// happens automatically when the deadline passes. The outcome is a
    /// pure function of the stored tally and the captured snapshot and
    /// quorum: participation of at least the required quorum and strictly
    /// more power for than against succeeds, anything else fails. A
    /// failed proposal forfeits its deposit to the treasury; that is the
    /// anti-spam penalty, not an error.
    pub fn finalize(
        &mut self,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<ProposalStatus, ProposalError> {
        let _permit = self.gate.enter().ok_or(ProposalError::ReentrantCall)?;
        if self.paused {
            return Err(ProposalError::Paused);
        }
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(ProposalError::UnknownProposal(id))?;
        if proposal.status != ProposalStatus::Active {
            return Err(ProposalError::NotActive(id));
        }
        if !proposal.voting_closed(now) {
            return Err(ProposalError::VotingStillOpen(id));
        }

        let required = proposal.required_quorum();
        let quorum_met = proposal.tally.total() >= required;
        let passes = proposal.tally.passes();

        if quorum_met && passes {
            if !proposal.deposit_refunded {
                self.ledger.release(&proposal.proposer, proposal.deposit)?;
                proposal.deposit_refunded = true;
                self.events.emit(&ProposalEvent::DepositRefunded {
                    id,
                    recipient: proposal.proposer.clone(),
                    amount: proposal.deposit,
                });
            }
            proposal.status = ProposalStatus::Succeeded;
        } else {
            self.treasury = self.treasury.saturating_add(proposal.deposit);
            proposal.status = ProposalStatus::Failed;
        }
        tracing::info!(
            id,
            status = %proposal.status,
            quorum_met,
            required,
            participating = proposal.tally.total(),
            "proposal finalized"
        );
        self.events.emit(&ProposalEvent::ProposalFinalized {
            id,
            status: proposal.status,
            tally: proposal.tally,
            quorum_met,
        });
        Ok(proposal.status)
    }

    /// Hand a succeeded proposal to the scheduler and mark it executed.
    ///
    /// The engine only picks the delay to request, by category; the
    /// scheduler enforces the actual wait.
    pub fn execute(&mut self, executor: &AccountId, id: ProposalId) -> Result<(), ProposalError> {
        let _permit = self.gate.enter().ok_or(ProposalError::ReentrantCall)?;
        if self.paused {
            return Err(ProposalError::Paused);
        }
        if !self.roles.has(executor, Role::Executor) {
            return Err(ProposalError::Unauthorized(executor.clone()));
        }
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(ProposalError::UnknownProposal(id))?;
        if proposal.status != ProposalStatus::Succeeded {
            return Err(ProposalError::WrongStatus {
                id,
                status: proposal.status,
                expected: ProposalStatus::Succeeded,
            });
        }

        let delay = proposal.category.recommended_delay_secs();
        self.scheduler.schedule(id, delay)?;
        proposal.status = ProposalStatus::Executed;
        tracing::info!(id, executor = %executor, delay_secs = delay, "proposal executed");
        self.events.emit(&ProposalEvent::ProposalExecuted {
            id,
            executor: executor.clone(),
        });
        Ok(())
    }

    /// Withdraw a live proposal. Cancellation is not penalized: the
    /// deposit is refunded if it has not been already.
    ///
    /// Admins may cancel any proposal, even while the engine is paused;
    /// proposers may cancel their own while it runs.
    pub fn cancel(&mut self, caller: &AccountId, id: ProposalId) -> Result<(), ProposalError> {
        let _permit = self.gate.enter().ok_or(ProposalError::ReentrantCall)?;
        let is_admin = self.roles.is_admin(caller);
        if self.paused && !is_admin {
            return Err(ProposalError::Paused);
        }
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(ProposalError::UnknownProposal(id))?;
        if !is_admin && proposal.proposer != *caller {
            return Err(ProposalError::Unauthorized(caller.clone()));
        }
        if !matches!(
            proposal.status,
            ProposalStatus::Pending | ProposalStatus::Active
        ) {
            return Err(ProposalError::NotActive(id));
        }

        if !proposal.deposit_refunded {
            self.ledger.release(&proposal.proposer, proposal.deposit)?;
            proposal.deposit_refunded = true;
            self.events.emit(&ProposalEvent::DepositRefunded {
                id,
                recipient: proposal.proposer.clone(),
                amount: proposal.deposit,
            });
        }
        proposal.status = ProposalStatus::Canceled;
        tracing::info!(id, caller = %caller, "proposal canceled");
        self.events.emit(&ProposalEvent::ProposalCanceled { id });
        Ok(())
    }

    // ── Admin surface ──────────────────────────────────────────────────
    //
    // The admin surface stays available while the engine is paused, so
    // an incident can be repaired without first unpausing.

    /// Set the creation power threshold for future proposals.
    pub fn set_voting_threshold(
        &mut self,
        caller: &AccountId,
        new: u128,
    ) -> Result<(), ProposalError> {
        self.ensure_admin(caller)?;
        let old = self.params.voting_threshold;
        self.params.voting_threshold = new;
        tracing::info!(admin = %caller, old, new, "voting threshold updated");
        self.events.emit(&ProposalEvent::ParameterUpdated {
            name: "voting_threshold".to_string(),
            old: old.to_string(),
            new: new.to_string(),
        });
        Ok(())
    }

    /// Set the quorum ratio for future proposals. In-flight proposals
    /// keep the ratio captured at their creation.
    pub fn set_quorum(
        &mut self,
        caller: &AccountId,
        numerator: u32,
        denominator: u32,
    ) -> Result<(), ProposalError> {
        self.ensure_admin(caller)?;
        let new = QuorumRatio::new(numerator, denominator)?;
        let old = self.params.quorum;
        self.params.quorum = new;
        tracing::info!(admin = %caller, numerator, denominator, "quorum updated");
        self.events.emit(&ProposalEvent::ParameterUpdated {
            name: "quorum".to_string(),
            old: format!("{}/{}", old.numerator(), old.denominator()),
            new: format!("{}/{}", numerator, denominator),
        });
        Ok(())
    }

    /// Set the deposit escrowed by future proposals.
    pub fn set_proposal_deposit(
        &mut self,
        caller: &AccountId,
        new: u128,
    ) -> Result<(), ProposalError> {
        self.ensure_admin(caller)?;
        let old = self.params.proposal_deposit;
        self.params.proposal_deposit = new;
        tracing::info!(admin = %caller, old, new, "proposal deposit updated");
        self.events.emit(&ProposalEvent::ParameterUpdated {
            name: "proposal_deposit".to_string(),
            old: old.to_string(),
            new: new.to_string(),
        });
        Ok(())
    }

    /// Halt all lifecycle operations. Returns `false` if already paused.
    pub fn pause(&mut self, caller: &AccountId) -> Result<bool, ProposalError> {
        self.ensure_admin(caller)?;
        if self.paused {
            return Ok(false);
        }
        self.paused = true;
        tracing::warn!(admin = %caller, "engine paused");
        self.events.emit(&ProposalEvent::ParameterUpdated {
            name: "paused".to_string(),
            old: "false".to_string(),
            new: "true".to_string(),
        });
        Ok(true)
    }

    /// Resume lifecycle operations. Returns `false` if not paused.
    pub fn unpause(&mut self, caller: &AccountId) -> Result<bool, ProposalError> {
        self.ensure_admin(caller)?;
        if !self.paused {
            return Ok(false);
        }
        self.paused = false;
        tracing::info!(admin = %caller, "engine unpaused");
        self.events.emit(&ProposalEvent::ParameterUpdated {
            name: "paused".to_string(),
            old: "true".to_string(),
            new: "false".to_string(),
        });
        Ok(true)
    }

    /// Grant `role` to `account`. Returns `true` if newly granted.
    pub fn grant_role(
        &mut self,
        caller: &AccountId,
        account: AccountId,
        role: Role,
    ) -> Result<bool, ProposalError> {
        self.ensure_admin(caller)?;
        let granted = self.roles.grant(account.clone(), role);
        if granted {
            tracing::info!(admin = %caller, account = %account, role = %role, "role granted");
        }
        Ok(granted)
    }

    /// Revoke `role` from `account`. Returns `true` if it was held.
    pub fn revoke_role(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        role: Role,
    ) -> Result<bool, ProposalError> {
        self.ensure_admin(caller)?;
        let revoked = self.roles.revoke(account, role);
        if revoked {
            tracing::info!(admin = %caller, account = %account, role = %role, "role revoked");
        }
        Ok(revoked)
    }

    fn ensure_admin(&self, caller: &AccountId) -> Result<(), ProposalError> {
        if self.roles.is_admin(caller) {
            Ok(())
        } else {
            Err(ProposalError::Unauthorized(caller.clone()))
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn get_proposal(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    /// Number of proposals ever created.
    pub fn proposal_count(&self) -> u64 {
        self.proposals.len() as u64
    }

    /// Proposals currently in `status`, ordered by id.
    pub fn proposals_by_status(&self, status: ProposalStatus) -> Vec<&Proposal> {
        let mut matching: Vec<&Proposal> = self
            .proposals
            .values()
            .filter(|p| p.status == status)
            .collect();
        matching.sort_by_key(|p| p.id);
        matching
    }

    pub fn get_vote(&self, id: ProposalId, voter: &AccountId) -> Option<&Vote> {
        self.votes.get(&(id, voter.clone()))
    }

    pub fn has_voted(&self, id: ProposalId, voter: &AccountId) -> bool {
        self.votes.contains_key(&(id, voter.clone()))
    }

    /// All votes cast on `id`, ordered by voter.
    pub fn votes_on(&self, id: ProposalId) -> Vec<&Vote> {
        let mut votes: Vec<&Vote> = self
            .votes
            .iter()
            .filter(|((pid, _), _)| *pid == id)
            .map(|(_, vote)| vote)
            .collect();
        votes.sort_by(|a, b| a.voter.cmp(&b.voter));
        votes
    }

    /// Forfeited deposits accumulated so far.
    pub fn treasury(&self) -> u128 {
        self.treasury
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn params(&self) -> &ProposalParams {
        &self.params
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    /// Observe every engine event from now on.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&ProposalEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener);
    }
}

// ── State snapshots ────────────────────────────────────────────────────

/// Serializable snapshot of the engine's in-memory state.
///
/// Collaborators and event listeners are wiring, not state, and are
/// re-injected on load.
#[derive(Serialize, Deserialize)]
struct EngineSnapshot {
    params: ProposalParams,
    roles: RoleTable,
    next_id: ProposalId,
    proposals: HashMap<ProposalId, Proposal>,
    votes: HashMap<(ProposalId, AccountId), Vote>,
    treasury: u128,
    paused: bool,
}

impl ProposalEngine {
    /// Serialize all engine state to bytes. The caller owns persistence.
    pub fn save_state(&self) -> Vec<u8> {
        let snapshot = EngineSnapshot {
            params: self.params.clone(),
            roles: self.roles.clone(),
            next_id: self.next_id,
            proposals: self.proposals.clone(),
            votes: self.votes.clone(),
            treasury: self.treasury,
            paused: self.paused,
        };
        bincode::serialize(&snapshot).unwrap_or_default()
    }

    /// Restore an engine from bytes produced by [`ProposalEngine::save_state`],
    /// re-injecting the collaborators.
    pub fn load_state(
        data: &[u8],
        oracle: Arc<dyn VotingPowerOracle>,
        ledger: Arc<dyn Ledger>,
        scheduler: Arc<dyn DelayScheduler>,
    ) -> Result<Self, ProposalError> {
        let snapshot: EngineSnapshot =
            bincode::deserialize(data).map_err(|e| ProposalError::Config(e.to_string()))?;
        snapshot.params.quorum.validate()?;
        Ok(Self {
            oracle,
            ledger,
            scheduler,
            params: snapshot.params,
            roles: snapshot.roles,
            next_id: snapshot.next_id,
            proposals: snapshot.proposals,
            votes: snapshot.votes,
            treasury: snapshot.treasury,
            paused: snapshot.paused,
            gate: CallGate::new(),
            events: EventBus::new(),
        })
    }
}
