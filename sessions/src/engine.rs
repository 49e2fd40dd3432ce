//! The session engine: lightweight yes/no votes with an absolute quorum.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use agora_access::{Role, RoleTable};
use agora_oracle::{Ledger, VotingPowerOracle};
use agora_types::{AccountId, BlockHeight, ContentRef, SessionId, Timestamp};
use agora_utils::{CallGate, EventBus};
use agora_voting::BinaryTally;

use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::params::SessionParams;
use crate::session::{
    SessionOutcome, SimpleVote, VoteSession, MAX_QUESTION_LEN, MAX_SESSION_DURATION_SECS,
    MIN_SESSION_DURATION_SECS,
};

/// Drives every vote session from creation to termination.
///
/// Collaborators are injected once at construction and never swapped.
/// Unlike the proposal engine there is no execution step and no
/// scheduler: a session ends with a reported boolean outcome and that
/// is all.
pub struct SessionEngine {
    oracle: Arc<dyn VotingPowerOracle>,
    ledger: Arc<dyn Ledger>,
    params: SessionParams,
    roles: RoleTable,
    next_id: SessionId,
    sessions: HashMap<SessionId, VoteSession>,
    votes: HashMap<(SessionId, AccountId), SimpleVote>,
    /// Forfeited deposits accumulate here and never leave the engine.
    treasury: u128,
    paused: bool,
    gate: CallGate,
    events: EventBus<SessionEvent>,
}

impl SessionEngine {
    /// Build an engine around its collaborators, seeding `initial_admin`
    /// with the admin role.
    pub fn new(
        oracle: Arc<dyn VotingPowerOracle>,
        ledger: Arc<dyn Ledger>,
        params: SessionParams,
        initial_admin: AccountId,
    ) -> Self {
        Self {
            oracle,
            ledger,
            params,
            roles: RoleTable::with_admin(initial_admin),
            next_id: 1,
            sessions: HashMap::new(),
            votes: HashMap::new(),
            treasury: 0,
            paused: false,
            gate: CallGate::new(),
            events: EventBus::new(),
        }
    }

    // ── Lifecycle operations ───────────────────────────────────────────

    /// Open a session for voting immediately.
    ///
    /// The creation threshold is checked against the creator's *current*
    /// power, not the snapshot: opening a session is cheap and
    /// non-binding, so it gates on what the creator holds right now.
    /// Vote weights still resolve at `height − 1`.
    pub fn create_session(
        &mut self,
        creator: &AccountId,
        question: String,
        duration_secs: u64,
        content: ContentRef,
        custom_quorum: u128,
        now: Timestamp,
        height: BlockHeight,
    ) -> Result<SessionId, SessionError> {
        let _permit = self.gate.enter().ok_or(SessionError::ReentrantCall)?;
        if self.paused {
            return Err(SessionError::Paused);
        }
        if question.trim().is_empty() {
            return Err(SessionError::EmptyQuestion);
        }
        let len = question.chars().count();
        if len > MAX_QUESTION_LEN {
            return Err(SessionError::QuestionTooLong {
                len,
                max: MAX_QUESTION_LEN,
            });
        }
        if !(MIN_SESSION_DURATION_SECS..=MAX_SESSION_DURATION_SECS).contains(&duration_secs) {
            return Err(SessionError::DurationOutOfBounds {
                requested: duration_secs,
                min: MIN_SESSION_DURATION_SECS,
                max: MAX_SESSION_DURATION_SECS,
            });
        }

        let power = self.oracle.current_power(creator)?;
        if power < self.params.creation_threshold {
            return Err(SessionError::InsufficientPower {
                needed: self.params.creation_threshold,
                available: power,
            });
        }

        // Last fallible step before state is written.
        self.ledger.escrow(creator, self.params.session_deposit)?;

        let id = self.next_id;
        self.next_id += 1;
        let end_time = now.saturating_add_secs(duration_secs);
        let snapshot_height = height.prior();
        let minimum_quorum = if custom_quorum > 0 {
            custom_quorum
        } else {
            self.params.default_minimum_quorum
        };
        self.sessions.insert(
            id,
            VoteSession {
                id,
                creator: creator.clone(),
                question: question.clone(),
                content: content.clone(),
                start_time: now,
                end_time,
                snapshot_height,
                active: true,
                tally: BinaryTally::default(),
                total_participants: 0,
                minimum_quorum,
                deposit: self.params.session_deposit,
                deposit_refunded: false,
            },
        );
        tracing::info!(
            id,
            creator = %creator,
            end = %end_time,
            snapshot = %snapshot_height,
            minimum_quorum,
            "session created"
        );
        self.events.emit(&SessionEvent::VoteSessionCreated {
            id,
            creator: creator.clone(),
            question,
            content,
            start: now,
            end: end_time,
            snapshot_height,
            minimum_quorum,
        });
        Ok(id)
    }

    /// Cast a yes/no vote. First vote wins; there is no changing it.
    pub fn vote_in_session(
        &mut self,
        voter: &AccountId,
        id: SessionId,
        approve: bool,
        now: Timestamp,
    ) -> Result<(), SessionError> {
        let _permit = self.gate.enter().ok_or(SessionError::ReentrantCall)?;
        if self.paused {
            return Err(SessionError::Paused);
        }
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        if !session.active {
            return Err(SessionError::NotActive(id));
        }
        if now < session.start_time {
            return Err(SessionError::VotingNotStarted(id));
        }
        if session.voting_closed(now) {
            return Err(SessionError::VotingClosed(id));
        }
        if self.votes.contains_key(&(id, voter.clone())) {
            return Err(SessionError::AlreadyVoted(voter.clone()));
        }

        // Weight is resolved at the session's snapshot height, never at
        // the current one.
        let weight = self.oracle.historical_power(voter, session.snapshot_height)?;
        if weight == 0 {
            return Err(SessionError::InsufficientPower {
                needed: 1,
                available: 0,
            });
        }

        session.tally.record(approve, weight)?;
        session.total_participants += 1;
        self.votes.insert(
            (id, voter.clone()),
            SimpleVote {
                voter: voter.clone(),
                approve,
                cast_at: now,
                weight,
            },
        );
        tracing::debug!(id, voter = %voter, approve, weight, "session vote cast");
        self.events.emit(&SessionEvent::SimpleVoteCast {
            id,
            voter: voter.clone(),
            approve,
            weight,
            cast_at: now,
        });
        Ok(())
    }

    /// Close a session whose voting window has ended.
    ///
    /// Pull-based: anyone may call this once `now > end_time`. The
    /// outcome is a pure function of the stored tallies and the captured
    /// quorum. The deposit is refunded whenever participation reached
    /// the quorum, regardless of which way the vote went: the creator is
    /// rewarded for drawing a valid turnout, not for winning. A session
    /// that misses quorum forfeits its deposit to the treasury.
    pub fn end_session(
        &mut self,
        id: SessionId,
        now: Timestamp,
    ) -> Result<SessionOutcome, SessionError> {
        let _permit = self.gate.enter().ok_or(SessionError::ReentrantCall)?;
        if self.paused {
            return Err(SessionError::Paused);
        }
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        if !session.active {
            return Err(SessionError::NotActive(id));
        }
        if !session.voting_closed(now) {
            return Err(SessionError::VotingStillOpen(id));
        }

        let quorum_met = session.quorum_met();
        let result = quorum_met && session.tally.passes();

        if quorum_met {
            if !session.deposit_refunded {
                self.ledger.release(&session.creator, session.deposit)?;
                session.deposit_refunded = true;
                self.events.emit(&SessionEvent::SessionDepositRefunded {
                    id,
                    recipient: session.creator.clone(),
                    amount: session.deposit,
                });
            }
        } else {
            self.treasury = self.treasury.saturating_add(session.deposit);
        }
        session.active = false;
        tracing::info!(
            id,
            result,
            quorum_met,
            participating = session.tally.participating(),
            required = session.minimum_quorum,
            "session ended"
        );
        self.events.emit(&SessionEvent::VoteSessionEnded {
            id,
            result,
            quorum_met,
            tally: session.tally,
            total_participants: session.total_participants,
        });
        Ok(SessionOutcome { result, quorum_met })
    }

    /// Withdraw a live session. Early termination is not penalized: the
    /// deposit is refunded whatever the tallies say, and the reported
    /// outcome is always a non-pass.
    ///
    /// Admins may cancel any session, even while the engine is paused;
    /// creators may cancel their own while it runs.
    pub fn cancel_session(
        &mut self,
        caller: &AccountId,
        id: SessionId,
    ) -> Result<SessionOutcome, SessionError> {
        let _permit = self.gate.enter().ok_or(SessionError::ReentrantCall)?;
        let is_admin = self.roles.is_admin(caller);
        if self.paused && !is_admin {
            return Err(SessionError::Paused);
        }
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        if !is_admin && session.creator != *caller {
            return Err(SessionError::Unauthorized(caller.clone()));
        }
        if !session.active {
            return Err(SessionError::NotActive(id));
        }

        if !session.deposit_refunded {
            self.ledger.release(&session.creator, session.deposit)?;
            session.deposit_refunded = true;
            self.events.emit(&SessionEvent::SessionDepositRefunded {
                id,
                recipient: session.creator.clone(),
                amount: session.deposit,
            });
        }
        session.active = false;
        tracing::info!(id, caller = %caller, "session canceled");
        self.events.emit(&SessionEvent::VoteSessionEnded {
            id,
            result: false,
            quorum_met: false,
            tally: session.tally,
            total_participants: session.total_participants,
        });
        self.events.emit(&SessionEvent::SessionCanceled {
            id,
            emergency: false,
        });
        Ok(SessionOutcome::STOPPED)
    }

    /// Strike a live session as a moderator action.
    ///
    /// This is itself an emergency control, so it stays callable while
    /// the engine is paused. Same settlement as a cancellation: deposit
    /// back, outcome reported as a non-pass.
    pub fn emergency_stop(
        &mut self,
        moderator: &AccountId,
        id: SessionId,
    ) -> Result<SessionOutcome, SessionError> {
        let _permit = self.gate.enter().ok_or(SessionError::ReentrantCall)?;
        if !self.roles.has(moderator, Role::Moderator) {
            return Err(SessionError::Unauthorized(moderator.clone()));
        }
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        if !session.active {
            return Err(SessionError::NotActive(id));
        }

        if !session.deposit_refunded {
            self.ledger.release(&session.creator, session.deposit)?;
            session.deposit_refunded = true;
            self.events.emit(&SessionEvent::SessionDepositRefunded {
                id,
                recipient: session.creator.clone(),
                amount: session.deposit,
            });
        }
        session.active = false;
        tracing::warn!(id, moderator = %moderator, "session emergency-stopped");
        self.events.emit(&SessionEvent::VoteSessionEnded {
            id,
            result: false,
            quorum_met: false,
            tally: session.tally,
            total_participants: session.total_participants,
        });
        self.events.emit(&SessionEvent::SessionCanceled {
            id,
            emergency: true,
        });
        Ok(SessionOutcome::STOPPED)
    }

    // ── Admin surface ──────────────────────────────────────────────────
    //
    // The admin surface stays available while the engine is paused, so
    // an incident can be repaired without first unpausing.

    /// Set the creation power threshold for future sessions.
    pub fn set_creation_threshold(
        &mut self,
        caller: &AccountId,
        new: u128,
    ) -> Result<(), SessionError> {
        self.ensure_admin(caller)?;
        let old = self.params.creation_threshold;
        self.params.creation_threshold = new;
        tracing::info!(admin = %caller, old, new, "creation threshold updated");
        self.events.emit(&SessionEvent::SessionParameterUpdated {
            name: "creation_threshold".to_string(),
            old: old.to_string(),
            new: new.to_string(),
        });
        Ok(())
    }

    /// Set the default quorum for future sessions. Live sessions keep
    /// the quorum captured at their creation.
    pub fn set_default_minimum_quorum(
        &mut self,
        caller: &AccountId,
        new: u128,
    ) -> Result<(), SessionError> {
        self.ensure_admin(caller)?;
        let old = self.params.default_minimum_quorum;
        self.params.default_minimum_quorum = new;
        tracing::info!(admin = %caller, old, new, "default minimum quorum updated");
        self.events.emit(&SessionEvent::SessionParameterUpdated {
            name: "default_minimum_quorum".to_string(),
            old: old.to_string(),
            new: new.to_string(),
        });
        Ok(())
    }

    /// Set the deposit escrowed by future sessions.
    pub fn set_session_deposit(
        &mut self,
        caller: &AccountId,
        new: u128,
    ) -> Result<(), SessionError> {
        self.ensure_admin(caller)?;
        let old = self.params.session_deposit;
        self.params.session_deposit = new;
        tracing::info!(admin = %caller, old, new, "session deposit updated");
        self.events.emit(&SessionEvent::SessionParameterUpdated {
            name: "session_deposit".to_string(),
            old: old.to_string(),
            new: new.to_string(),
        });
        Ok(())
    }

    /// Halt all lifecycle operations except emergency stops. Returns
    /// `false` if already paused.
    pub fn pause(&mut self, caller: &AccountId) -> Result<bool, SessionError> {
        self.ensure_admin(caller)?;
        if self.paused {
            return Ok(false);
        }
        self.paused = true;
        tracing::warn!(admin = %caller, "engine paused");
        self.events.emit(&SessionEvent::SessionParameterUpdated {
            name: "paused".to_string(),
            old: "false".to_string(),
            new: "true".to_string(),
        });
        Ok(true)
    }

    /// Resume lifecycle operations. Returns `false` if not paused.
    pub fn unpause(&mut self, caller: &AccountId) -> Result<bool, SessionError> {
        self.ensure_admin(caller)?;
        if !self.paused {
            return Ok(false);
        }
        self.paused = false;
        tracing::info!(admin = %caller, "engine unpaused");
        self.events.emit(&SessionEvent::SessionParameterUpdated {
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
    ) -> Result<bool, SessionError> {
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
    ) -> Result<bool, SessionError> {
        self.ensure_admin(caller)?;
        let revoked = self.roles.revoke(account, role);
        if revoked {
            tracing::info!(admin = %caller, account = %account, role = %role, "role revoked");
        }
        Ok(revoked)
    }

    fn ensure_admin(&self, caller: &AccountId) -> Result<(), SessionError> {
        if self.roles.is_admin(caller) {
            Ok(())
        } else {
            Err(SessionError::Unauthorized(caller.clone()))
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn get_session(&self, id: SessionId) -> Option<&VoteSession> {
        self.sessions.get(&id)
    }

    /// Number of sessions ever created.
    pub fn session_count(&self) -> u64 {
        self.sessions.len() as u64
    }

    /// Sessions still open for voting or awaiting their end call,
    /// ordered by id.
    pub fn active_sessions(&self) -> Vec<&VoteSession> {
        let mut active: Vec<&VoteSession> =
            self.sessions.values().filter(|s| s.active).collect();
        active.sort_by_key(|s| s.id);
        active
    }

    pub fn get_vote(&self, id: SessionId, voter: &AccountId) -> Option<&SimpleVote> {
        self.votes.get(&(id, voter.clone()))
    }

    pub fn has_voted(&self, id: SessionId, voter: &AccountId) -> bool {
        self.votes.contains_key(&(id, voter.clone()))
    }

    /// All votes cast in `id`, ordered by voter.
    pub fn votes_in(&self, id: SessionId) -> Vec<&SimpleVote> {
        let mut votes: Vec<&SimpleVote> = self
            .votes
            .iter()
            .filter(|((sid, _), _)| *sid == id)
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

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    /// Observe every engine event from now on.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
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
    params: SessionParams,
    roles: RoleTable,
    next_id: SessionId,
    sessions: HashMap<SessionId, VoteSession>,
    votes: HashMap<(SessionId, AccountId), SimpleVote>,
    treasury: u128,
    paused: bool,
}

impl SessionEngine {
    /// Serialize all engine state to bytes. The caller owns persistence.
    pub fn save_state(&self) -> Vec<u8> {
        let snapshot = EngineSnapshot {
            params: self.params.clone(),
            roles: self.roles.clone(),
            next_id: self.next_id,
            sessions: self.sessions.clone(),
            votes: self.votes.clone(),
            treasury: self.treasury,
            paused: self.paused,
        };
        bincode::serialize(&snapshot).unwrap_or_default()
    }

    /// Restore an engine from bytes produced by [`SessionEngine::save_state`],
    /// re-injecting the collaborators.
    pub fn load_state(
        data: &[u8],
        oracle: Arc<dyn VotingPowerOracle>,
        ledger: Arc<dyn Ledger>,
    ) -> Result<Self, SessionError> {
        let snapshot: EngineSnapshot =
            bincode::deserialize(data).map_err(|e| SessionError::Config(e.to_string()))?;
        Ok(Self {
            oracle,
            ledger,
            params: snapshot.params,
            roles: snapshot.roles,
            next_id: snapshot.next_id,
            sessions: snapshot.sessions,
            votes: snapshot.votes,
            treasury: snapshot.treasury,
            paused: snapshot.paused,
            gate: CallGate::new(),
            events: EventBus::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_nullables::{NullLedger, NullPowerOracle};

    fn acct(s: &str) -> AccountId {
        AccountId::from(s)
    }

    struct Fixture {
        engine: SessionEngine,
        oracle: Arc<NullPowerOracle>,
        ledger: Arc<NullLedger>,
    }

    /// Engine with carol as admin. Carol holds 60 current power but
    /// nothing at the snapshot height; dave and erin hold 300 each at
    /// height 9 only.
    fn fixture() -> Fixture {
        let oracle = Arc::new(NullPowerOracle::new());
        let ledger = Arc::new(NullLedger::new());
        oracle.set_current_power(&acct("carol"), 60);
        oracle.set_power_at(&acct("dave"), 9, 300);
        oracle.set_power_at(&acct("erin"), 9, 300);
        ledger.set_balance(&acct("carol"), 100);
        let engine = SessionEngine::new(
            oracle.clone(),
            ledger.clone(),
            SessionParams::default(),
            acct("carol"),
        );
        Fixture {
            engine,
            oracle,
            ledger,
        }
    }

    fn create_default(fx: &mut Fixture) -> SessionId {
        fx.engine
            .create_session(
                &acct("carol"),
                "Adopt the new fee schedule?".to_string(),
                3_600,
                ContentRef::new("ipfs://schedule"),
                0,
                Timestamp::new(1_000),
                BlockHeight::new(10),
            )
            .expect("create")
    }

    #[test]
    fn create_records_window_and_escrows() {
        let mut fx = fixture();
        let id = create_default(&mut fx);

        let session = fx.engine.get_session(id).unwrap();
        assert_eq!(session.snapshot_height, BlockHeight::new(9));
        assert_eq!(session.start_time, Timestamp::new(1_000));
        assert_eq!(session.end_time, Timestamp::new(4_600));
        assert_eq!(session.minimum_quorum, 500);
        assert!(session.active);
        assert_eq!(fx.ledger.balance_of(&acct("carol")), 90);
        assert_eq!(fx.ledger.total_held(), 10);
    }

    #[test]
    fn session_creation_uses_current_power_not_snapshot() {
        let mut fx = fixture();
        // carol: current 60 ≥ 50 but zero at the snapshot height
        let id = create_default(&mut fx);
        assert!(fx.engine.get_session(id).is_some());

        // frank: rich at the snapshot height, nothing current
        fx.oracle.set_power_at(&acct("frank"), 9, 1_000);
        fx.ledger.set_balance(&acct("frank"), 100);
        let err = fx
            .engine
            .create_session(
                &acct("frank"),
                "Should frank decide?".to_string(),
                3_600,
                ContentRef::new("ipfs://frank"),
                0,
                Timestamp::new(1_000),
                BlockHeight::new(10),
            )
            .unwrap_err();
        match err {
            SessionError::InsufficientPower { needed, available } => {
                assert_eq!(needed, 50);
                assert_eq!(available, 0);
            }
            other => panic!("expected InsufficientPower, got {other:?}"),
        }
    }

    #[test]
    fn custom_quorum_overrides_default() {
        let mut fx = fixture();
        let id = fx
            .engine
            .create_session(
                &acct("carol"),
                "Lower the bar?".to_string(),
                3_600,
                ContentRef::new("ipfs://bar"),
                42,
                Timestamp::new(1_000),
                BlockHeight::new(10),
            )
            .unwrap();
        assert_eq!(fx.engine.get_session(id).unwrap().minimum_quorum, 42);

        // zero means "use the default"
        let id = create_default(&mut fx);
        assert_eq!(fx.engine.get_session(id).unwrap().minimum_quorum, 500);
    }

    #[test]
    fn create_rejects_bad_questions() {
        let mut fx = fixture();
        for question in ["", "   "] {
            let err = fx
                .engine
                .create_session(
                    &acct("carol"),
                    question.to_string(),
                    3_600,
                    ContentRef::new("ipfs://q"),
                    0,
                    Timestamp::new(1_000),
                    BlockHeight::new(10),
                )
                .unwrap_err();
            assert!(matches!(err, SessionError::EmptyQuestion));
        }

        let long = "q".repeat(MAX_QUESTION_LEN + 1);
        let err = fx
            .engine
            .create_session(
                &acct("carol"),
                long,
                3_600,
                ContentRef::new("ipfs://q"),
                0,
                Timestamp::new(1_000),
                BlockHeight::new(10),
            )
            .unwrap_err();
        match err {
            SessionError::QuestionTooLong { len, max } => {
                assert_eq!(len, 501);
                assert_eq!(max, 500);
            }
            other => panic!("expected QuestionTooLong, got {other:?}"),
        }
    }

    #[test]
    fn create_rejects_out_of_bounds_duration() {
        let mut fx = fixture();
        for bad in [0, MIN_SESSION_DURATION_SECS - 1, MAX_SESSION_DURATION_SECS + 1] {
            let err = fx
                .engine
                .create_session(
                    &acct("carol"),
                    "Too short or too long?".to_string(),
                    bad,
                    ContentRef::new("ipfs://dur"),
                    0,
                    Timestamp::new(1_000),
                    BlockHeight::new(10),
                )
                .unwrap_err();
            assert!(matches!(err, SessionError::DurationOutOfBounds { .. }));
        }
    }

    #[test]
    fn failed_escrow_aborts_creation_entirely() {
        let mut fx = fixture();
        fx.ledger.set_balance(&acct("carol"), 5);
        let err = fx
            .engine
            .create_session(
                &acct("carol"),
                "Can carol afford this?".to_string(),
                3_600,
                ContentRef::new("ipfs://broke"),
                0,
                Timestamp::new(1_000),
                BlockHeight::new(10),
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::Deposit(_)));
        assert_eq!(fx.engine.session_count(), 0);
        // the id was not consumed
        fx.ledger.set_balance(&acct("carol"), 100);
        assert_eq!(create_default(&mut fx), 1);
    }

    #[test]
    fn vote_weighs_at_snapshot_and_counts_participants() {
        let mut fx = fixture();
        let id = create_default(&mut fx);
        // current balances are irrelevant at vote time
        fx.oracle.set_current_power(&acct("dave"), 0);

        fx.engine
            .vote_in_session(&acct("dave"), id, true, Timestamp::new(2_000))
            .unwrap();
        fx.engine
            .vote_in_session(&acct("erin"), id, false, Timestamp::new(2_000))
            .unwrap();

        let session = fx.engine.get_session(id).unwrap();
        assert_eq!(session.tally.yes_power, 300);
        assert_eq!(session.tally.no_power, 300);
        assert_eq!(session.total_participants, 2);

        let err = fx
            .engine
            .vote_in_session(&acct("ghost"), id, true, Timestamp::new(2_000))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::InsufficientPower {
                needed: 1,
                available: 0
            }
        ));
    }

    #[test]
    fn double_vote_is_rejected() {
        let mut fx = fixture();
        let id = create_default(&mut fx);
        fx.engine
            .vote_in_session(&acct("dave"), id, true, Timestamp::new(2_000))
            .unwrap();
        let err = fx
            .engine
            .vote_in_session(&acct("dave"), id, false, Timestamp::new(2_001))
            .unwrap_err();
        assert!(matches!(err, SessionError::AlreadyVoted(_)));

        let session = fx.engine.get_session(id).unwrap();
        assert_eq!(session.tally.yes_power, 300);
        assert_eq!(session.tally.no_power, 0);
        assert_eq!(session.total_participants, 1);
    }

    #[test]
    fn vote_rejected_outside_the_window() {
        let mut fx = fixture();
        let id = create_default(&mut fx);

        assert!(matches!(
            fx.engine
                .vote_in_session(&acct("dave"), id, true, Timestamp::new(999))
                .unwrap_err(),
            SessionError::VotingNotStarted(_)
        ));
        // end_time itself is still in the window
        fx.engine
            .vote_in_session(&acct("dave"), id, true, Timestamp::new(4_600))
            .unwrap();
        assert!(matches!(
            fx.engine
                .vote_in_session(&acct("erin"), id, true, Timestamp::new(4_601))
                .unwrap_err(),
            SessionError::VotingClosed(_)
        ));
    }

    #[test]
    fn end_gates_on_the_window_and_on_liveness() {
        let mut fx = fixture();
        let id = create_default(&mut fx);
        assert!(matches!(
            fx.engine.end_session(id, Timestamp::new(4_600)).unwrap_err(),
            SessionError::VotingStillOpen(_)
        ));
        fx.engine.end_session(id, Timestamp::new(4_601)).unwrap();
        assert!(matches!(
            fx.engine.end_session(id, Timestamp::new(4_602)).unwrap_err(),
            SessionError::NotActive(_)
        ));
    }

    #[test]
    fn quorum_met_refunds_even_when_the_vote_is_lost() {
        let mut fx = fixture();
        let id = create_default(&mut fx);
        fx.engine
            .vote_in_session(&acct("dave"), id, false, Timestamp::new(2_000))
            .unwrap();
        fx.engine
            .vote_in_session(&acct("erin"), id, false, Timestamp::new(2_000))
            .unwrap();

        let outcome = fx.engine.end_session(id, Timestamp::new(5_000)).unwrap();
        assert!(outcome.quorum_met);
        assert!(!outcome.result);
        // participation reward: deposit back despite the no-vote
        assert_eq!(fx.ledger.balance_of(&acct("carol")), 100);
        assert_eq!(fx.engine.treasury(), 0);
        assert!(fx.engine.get_session(id).unwrap().deposit_refunded);
    }

    #[test]
    fn quorum_miss_forfeits_the_deposit() {
        let mut fx = fixture();
        let id = create_default(&mut fx);
        // 300 of the required 500
        fx.engine
            .vote_in_session(&acct("dave"), id, true, Timestamp::new(2_000))
            .unwrap();

        let outcome = fx.engine.end_session(id, Timestamp::new(5_000)).unwrap();
        assert!(!outcome.quorum_met);
        assert!(!outcome.result);
        assert_eq!(fx.ledger.balance_of(&acct("carol")), 90);
        assert_eq!(fx.engine.treasury(), 10);
        assert!(!fx.engine.get_session(id).unwrap().deposit_refunded);
    }

    #[test]
    fn tie_never_passes() {
        let mut fx = fixture();
        let id = create_default(&mut fx);
        fx.engine
            .vote_in_session(&acct("dave"), id, true, Timestamp::new(2_000))
            .unwrap();
        fx.engine
            .vote_in_session(&acct("erin"), id, false, Timestamp::new(2_000))
            .unwrap();

        let outcome = fx.engine.end_session(id, Timestamp::new(5_000)).unwrap();
        assert!(outcome.quorum_met);
        assert!(!outcome.result);
    }

    #[test]
    fn cancel_refunds_and_reports_a_non_pass() {
        let mut fx = fixture();
        let id = create_default(&mut fx);
        // a landslide yes does not survive an early termination
        fx.engine
            .vote_in_session(&acct("dave"), id, true, Timestamp::new(2_000))
            .unwrap();
        fx.engine
            .vote_in_session(&acct("erin"), id, true, Timestamp::new(2_000))
            .unwrap();

        let outcome = fx.engine.cancel_session(&acct("carol"), id).unwrap();
        assert_eq!(outcome, SessionOutcome::STOPPED);
        let session = fx.engine.get_session(id).unwrap();
        assert!(!session.active);
        assert!(session.deposit_refunded);
        assert_eq!(fx.ledger.balance_of(&acct("carol")), 100);
    }

    #[test]
    fn only_creator_or_admin_may_cancel() {
        let mut fx = fixture();
        fx.oracle.set_current_power(&acct("frank"), 80);
        fx.ledger.set_balance(&acct("frank"), 100);
        let id = fx
            .engine
            .create_session(
                &acct("frank"),
                "Frank's question".to_string(),
                3_600,
                ContentRef::new("ipfs://frank"),
                0,
                Timestamp::new(1_000),
                BlockHeight::new(10),
            )
            .unwrap();

        assert!(matches!(
            fx.engine.cancel_session(&acct("dave"), id).unwrap_err(),
            SessionError::Unauthorized(_)
        ));
        // carol is the admin
        fx.engine.cancel_session(&acct("carol"), id).unwrap();
        assert_eq!(fx.ledger.balance_of(&acct("frank")), 100);
    }

    #[test]
    fn emergency_stop_requires_the_moderator_role() {
        let mut fx = fixture();
        let id = create_default(&mut fx);
        assert!(matches!(
            fx.engine.emergency_stop(&acct("dave"), id).unwrap_err(),
            SessionError::Unauthorized(_)
        ));

        fx.engine
            .grant_role(&acct("carol"), acct("mod"), Role::Moderator)
            .unwrap();
        let outcome = fx.engine.emergency_stop(&acct("mod"), id).unwrap();
        assert_eq!(outcome, SessionOutcome::STOPPED);
        assert!(!fx.engine.get_session(id).unwrap().active);
    }

    #[test]
    fn emergency_stop_works_while_paused() {
        let mut fx = fixture();
        let id = create_default(&mut fx);
        fx.engine
            .grant_role(&acct("carol"), acct("mod"), Role::Moderator)
            .unwrap();
        fx.engine.pause(&acct("carol")).unwrap();

        assert!(matches!(
            fx.engine
                .vote_in_session(&acct("dave"), id, true, Timestamp::new(2_000))
                .unwrap_err(),
            SessionError::Paused
        ));
        assert!(matches!(
            fx.engine.end_session(id, Timestamp::new(9_999)).unwrap_err(),
            SessionError::Paused
        ));
        fx.engine.emergency_stop(&acct("mod"), id).unwrap();
        assert!(!fx.engine.get_session(id).unwrap().active);
    }

    #[test]
    fn creator_cancel_blocked_while_paused_but_admin_passes() {
        let mut fx = fixture();
        fx.oracle.set_current_power(&acct("frank"), 80);
        fx.ledger.set_balance(&acct("frank"), 100);
        let id = fx
            .engine
            .create_session(
                &acct("frank"),
                "Frank again".to_string(),
                3_600,
                ContentRef::new("ipfs://frank"),
                0,
                Timestamp::new(1_000),
                BlockHeight::new(10),
            )
            .unwrap();
        fx.engine.pause(&acct("carol")).unwrap();

        assert!(matches!(
            fx.engine.cancel_session(&acct("frank"), id).unwrap_err(),
            SessionError::Paused
        ));
        fx.engine.cancel_session(&acct("carol"), id).unwrap();
    }

    #[test]
    fn quorum_change_does_not_touch_a_live_session() {
        let mut fx = fixture();
        let id = create_default(&mut fx);
        fx.engine
            .set_default_minimum_quorum(&acct("carol"), 10_000)
            .unwrap();

        fx.engine
            .vote_in_session(&acct("dave"), id, true, Timestamp::new(2_000))
            .unwrap();
        fx.engine
            .vote_in_session(&acct("erin"), id, true, Timestamp::new(2_000))
            .unwrap();
        // 600 participation against the captured 500, not the new 10_000
        let outcome = fx.engine.end_session(id, Timestamp::new(5_000)).unwrap();
        assert!(outcome.quorum_met);
        assert!(outcome.result);
    }

    #[test]
    fn setters_require_the_admin_role() {
        let mut fx = fixture();
        assert!(matches!(
            fx.engine
                .set_creation_threshold(&acct("dave"), 1)
                .unwrap_err(),
            SessionError::Unauthorized(_)
        ));
        fx.engine.set_creation_threshold(&acct("carol"), 1).unwrap();
        assert_eq!(fx.engine.params().creation_threshold, 1);
    }

    #[test]
    fn reentrant_call_is_rejected() {
        let mut fx = fixture();
        let id = create_default(&mut fx);

        let _held = fx.engine.gate.enter().expect("gate open");
        let err = fx
            .engine
            .vote_in_session(&acct("dave"), id, true, Timestamp::new(2_000))
            .unwrap_err();
        assert!(matches!(err, SessionError::ReentrantCall));
        drop(_held);
        fx.engine
            .vote_in_session(&acct("dave"), id, true, Timestamp::new(2_000))
            .unwrap();
    }

    #[test]
    fn state_survives_a_save_load_round_trip() {
        let mut fx = fixture();
        let id = create_default(&mut fx);
        fx.engine
            .vote_in_session(&acct("dave"), id, true, Timestamp::new(2_000))
            .unwrap();

        let bytes = fx.engine.save_state();
        let mut restored =
            SessionEngine::load_state(&bytes, fx.oracle.clone(), fx.ledger.clone()).unwrap();

        let session = restored.get_session(id).unwrap();
        assert_eq!(session.tally.yes_power, 300);
        assert_eq!(session.total_participants, 1);
        assert!(restored.has_voted(id, &acct("dave")));
        // the restored engine keeps running where the old one stopped
        restored
            .vote_in_session(&acct("erin"), id, false, Timestamp::new(2_500))
            .unwrap();
        assert_eq!(restored.get_session(id).unwrap().total_participants, 2);
    }
}
