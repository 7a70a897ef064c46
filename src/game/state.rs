//! The `Game` aggregate: phase machine, win arithmetic, and roster state.
//!
//! ## Phases
//!
//! `Joining → Started → TeamBuilding ⇄ TeamVote → Quest → {TeamBuilding |
//! Lady → TeamBuilding | GuessMerlin | Finished}`, with `Finished` terminal.
//! Every public operation checks the phase first and validates its inputs
//! before mutating anything, so a failed call leaves the game untouched.
//!
//! ## References
//!
//! The king and lady are stored as identity keys into the roster rather
//! than as copies of participant state, which keeps equality and
//! serialization well-defined.
//!
//! The engine performs no I/O; persistence and locking live in
//! [`store`](crate::store).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::error::{GameError, Result};
use crate::core::identity::verify_identity;
use crate::core::rng::GameRng;
use crate::game::participant::Participant;
use crate::rules::plan::{plan_for, GamePlan, RoundRule};
use crate::rules::role::{Role, EVIL_TEAM, MERLIN_SEES, PERCIVAL_SEES};

/// Glyph for a round won by the servants.
pub const SUCCESS_GLYPH: &str = "🏆";
/// Glyph for a round won by the evils.
pub const FAIL_GLYPH: &str = "🏴‍☠️";
/// Glyph for the current king.
pub const KING_GLYPH: &str = "👑";
/// Glyph for the current lady.
pub const LADY_GLYPH: &str = "👱‍♀️";

/// Game progression phases, in forward order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Roster is open; participants join and leave.
    Joining,
    /// Roles dealt, king and lady drawn; waiting for the table to proceed.
    Started,
    /// King proposes a quest team.
    TeamBuilding,
    /// Roster-wide approve/reject ballot on the proposed team.
    TeamVote,
    /// Team members cast success/fail actions.
    Quest,
    /// Current lady passes the token to an eligible participant.
    Lady,
    /// Assassin attempts a final identification of Merlin.
    GuessMerlin,
    /// Terminal; `game_result` is set.
    Finished,
}

/// The aggregate state machine for one hidden-role game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    game_id: String,
    created: DateTime<Utc>,
    last_save: DateTime<Utc>,
    phase: GamePhase,
    /// Join order; significant for king rotation.
    participants: Vec<Participant>,
    /// Identities of the currently proposed team.
    current_team: SmallVec<[String; 5]>,
    king: Option<String>,
    lady: Option<String>,
    /// Everyone who has already held the lady token, append-only.
    past_ladies: Vec<String>,
    /// Per-round outcomes; `true` = servants took the round.
    round_result: SmallVec<[bool; 5]>,
    /// Consecutive rejected team proposals.
    failed_voting_count: usize,
    /// `true` = servants won, `false` = evils won. Set once, in `Finished`.
    game_result: Option<bool>,
}

impl Game {
    /// Create an empty game in the `Joining` phase.
    pub fn new(game_id: impl Into<String>) -> Result<Self> {
        let game_id = game_id.into();
        verify_identity(&game_id)?;
        let now = Utc::now();
        Ok(Self {
            game_id,
            created: now,
            last_save: now,
            phase: GamePhase::Joining,
            participants: Vec::new(),
            current_team: SmallVec::new(),
            king: None,
            lady: None,
            past_ladies: Vec::new(),
            round_result: SmallVec::new(),
            failed_voting_count: 0,
            game_result: None,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    #[must_use]
    pub fn last_save(&self) -> DateTime<Utc> {
        self.last_save
    }

    /// Stamp the last-save timestamp; called by stores on save.
    pub fn mark_saved(&mut self) {
        self.last_save = Utc::now();
    }

    /// Roster in join order.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Look up a roster member by identity.
    pub fn participant(&self, identity: &str) -> Result<&Participant> {
        self.participants
            .iter()
            .find(|p| p.identity() == identity)
            .ok_or_else(|| GameError::UnknownParticipant(identity.to_owned()))
    }

    #[must_use]
    pub fn king(&self) -> Option<&str> {
        self.king.as_deref()
    }

    #[must_use]
    pub fn lady(&self) -> Option<&str> {
        self.lady.as_deref()
    }

    #[must_use]
    pub fn past_ladies(&self) -> &[String] {
        &self.past_ladies
    }

    /// Identities currently proposed for the quest team.
    #[must_use]
    pub fn current_team(&self) -> &[String] {
        &self.current_team
    }

    /// Outcomes of completed rounds; `true` = servants took the round.
    #[must_use]
    pub fn round_result(&self) -> &[bool] {
        &self.round_result
    }

    #[must_use]
    pub fn failed_voting_count(&self) -> usize {
        self.failed_voting_count
    }

    /// Final verdict: `Some(true)` = servants won. Absent until `Finished`.
    #[must_use]
    pub fn game_result(&self) -> Option<bool> {
        self.game_result
    }

    /// The plan for the current roster size.
    pub fn plan(&self) -> Result<&'static GamePlan> {
        plan_for(self.participants.len())
    }

    /// Rule for the round implied by the recorded results.
    pub fn current_round(&self) -> Result<RoundRule> {
        let index = self.round_result.len();
        self.plan()?
            .round(index)
            .ok_or(GameError::NoSuchRound(index + 1))
    }

    // === Joining ===

    /// Add a participant by identity. `Joining` only.
    pub fn add_participant(&mut self, identity: &str) -> Result<()> {
        self.require_phase(GamePhase::Joining)?;
        let participant = Participant::new(identity)?;
        if self.participants.contains(&participant) {
            return Err(GameError::AlreadyJoined(identity.to_owned()));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Remove a participant by identity. `Joining` only.
    pub fn remove_participant(&mut self, identity: &str) -> Result<()> {
        self.require_phase(GamePhase::Joining)?;
        let pos = self
            .participants
            .iter()
            .position(|p| p.identity() == identity)
            .ok_or_else(|| GameError::NotJoined(identity.to_owned()))?;
        self.participants.remove(pos);
        Ok(())
    }

    // === Starting ===

    /// Deal roles and draw king and lady. `Joining → Started`.
    ///
    /// The role pool is uniformly shuffled onto the roster, so every
    /// bijection between participants and the pool is equally likely. King
    /// and lady are one draw of two without replacement: never the same
    /// person, otherwise unconstrained.
    pub fn play(&mut self, rng: &mut GameRng) -> Result<()> {
        self.require_phase(GamePhase::Joining)?;
        let plan = self.plan()?;

        let mut pool = plan.roles().to_vec();
        rng.shuffle(&mut pool);
        for (participant, role) in self.participants.iter_mut().zip(pool) {
            participant.role = Some(role);
        }

        // Registered plans always cover at least two participants.
        if let Some((king, lady)) = rng.sample_two(self.participants.len()) {
            self.king = Some(self.participants[king].identity().to_owned());
            self.lady = Some(self.participants[lady].identity().to_owned());
        }
        self.phase = GamePhase::Started;
        Ok(())
    }

    /// `Started → TeamBuilding`, no other side effects.
    pub fn proceed_to_game(&mut self) -> Result<()> {
        self.require_phase(GamePhase::Started)?;
        self.phase = GamePhase::TeamBuilding;
        Ok(())
    }

    // === Team building & vote ===

    /// Toggle `target` in the proposed team. King only.
    pub fn select_for_team(&mut self, actor: &str, target: &str) -> Result<()> {
        self.require_phase(GamePhase::TeamBuilding)?;
        self.require_king(actor)?;
        let target = self.participant(target)?.identity().to_owned();
        if let Some(pos) = self.current_team.iter().position(|id| *id == target) {
            self.current_team.remove(pos);
        } else {
            self.current_team.push(target);
        }
        Ok(())
    }

    /// Put the proposed team to the vote. King only, exact team size.
    ///
    /// Clears every vote, then records the king's own approval of the team
    /// he just confirmed. `TeamBuilding → TeamVote`.
    pub fn confirm_team(&mut self, actor: &str) -> Result<()> {
        self.require_phase(GamePhase::TeamBuilding)?;
        self.require_king(actor)?;
        let rule = self.current_round()?;
        if self.current_team.len() != rule.team_size {
            return Err(GameError::WrongTeamSize {
                expected: rule.team_size,
                actual: self.current_team.len(),
            });
        }
        self.phase = GamePhase::TeamVote;
        for p in &mut self.participants {
            p.vote = None;
        }
        if let Some(king) = self.participants.iter_mut().find(|p| p.identity() == actor) {
            king.vote = Some(true);
        }
        Ok(())
    }

    /// Set, overwrite or clear a participant's ballot (tri-state toggle).
    pub fn vote(&mut self, actor: &str, approve: bool) -> Result<()> {
        self.require_phase(GamePhase::TeamVote)?;
        self.participant_mut(actor)?.cast_vote(approve);
        Ok(())
    }

    /// Resolve the team ballot once every participant has voted.
    ///
    /// Returns `None` while votes are outstanding (and changes nothing).
    /// Approval needs strictly more than half the roster; ties reject. A
    /// rejection rotates the king; the roster-size'th consecutive rejection
    /// is itself scored as a round for evil before the counter resets.
    pub fn resolve_vote(&mut self) -> Result<Option<bool>> {
        self.require_phase(GamePhase::TeamVote)?;
        if self.participants.iter().any(|p| p.vote.is_none()) {
            return Ok(None);
        }
        let approvals = self
            .participants
            .iter()
            .filter(|p| p.vote == Some(true))
            .count();
        if approvals * 2 > self.participants.len() {
            self.failed_voting_count = 0;
            self.start_quest();
            return Ok(Some(true));
        }
        self.failed_voting_count += 1;
        if self.failed_voting_count >= self.participants.len() {
            // A full cycle of rejected kings scores the round for evil.
            self.round_result.push(false);
            self.failed_voting_count = 0;
        }
        self.next_team_building();
        Ok(Some(false))
    }

    // === Quest ===

    /// Cast a success/fail action. Current team members only.
    pub fn quest_action(&mut self, actor: &str, success: bool) -> Result<()> {
        self.require_phase(GamePhase::Quest)?;
        let identity = self.participant(actor)?.identity().to_owned();
        if !self.current_team.iter().any(|id| *id == identity) {
            return Err(GameError::NotOnTeam);
        }
        self.participant_mut(actor)?.cast_quest_action(success);
        Ok(())
    }

    /// Resolve the quest once every team member has acted.
    ///
    /// Returns `None` while actions are outstanding (and changes nothing),
    /// otherwise `(succeeded, fail_count)`. The quest succeeds when fewer
    /// fail actions were cast than the round's threshold. Afterwards, in
    /// priority order: three failed rounds finish the game for evil; three
    /// successful rounds move to `GuessMerlin`; an eligible lady candidate
    /// at or past the plan's lady round moves to `Lady`; otherwise the next
    /// king starts team building.
    pub fn resolve_quest(&mut self) -> Result<Option<(bool, usize)>> {
        self.require_phase(GamePhase::Quest)?;
        let rule = self.current_round()?;
        let lady_round = self.plan()?.lady_round();

        if self.team_members().any(|p| p.quest_action.is_none()) {
            return Ok(None);
        }
        let failed_votes = self
            .team_members()
            .filter(|p| p.quest_action == Some(false))
            .count();
        let succeeded = failed_votes < rule.fail_threshold;
        self.round_result.push(succeeded);

        let failures = self.round_result.iter().filter(|r| !**r).count();
        let successes = self.round_result.len() - failures;
        if failures == 3 {
            self.finish(false);
        } else if successes == 3 {
            self.phase = GamePhase::GuessMerlin;
        } else if self.round_result.len() >= lady_round && !self.next_lady_candidates().is_empty()
        {
            self.phase = GamePhase::Lady;
        } else {
            self.next_team_building();
        }
        Ok(Some((succeeded, failed_votes)))
    }

    // === Lady of the Lake ===

    /// Roster members who may receive the lady token: everyone who is not
    /// holding it and has never held it.
    #[must_use]
    pub fn next_lady_candidates(&self) -> Vec<&Participant> {
        self.participants
            .iter()
            .filter(|p| {
                self.lady.as_deref() != Some(p.identity())
                    && !self.past_ladies.iter().any(|l| l == p.identity())
            })
            .collect()
    }

    /// Pass the lady token. Current lady only, eligible targets only.
    ///
    /// With `dry_run` the target is validated and returned without any
    /// mutation, for pre-flight confirmation. A real run archives the
    /// current lady, installs the target and rotates the king back into
    /// team building.
    pub fn set_next_lady(&mut self, actor: &str, target: &str, dry_run: bool) -> Result<&Participant> {
        self.require_phase(GamePhase::Lady)?;
        if self.lady.as_deref() != Some(actor) {
            return Err(GameError::OnlyLadyCanDo);
        }
        let target = self.participant(target)?.identity().to_owned();
        if !self
            .next_lady_candidates()
            .iter()
            .any(|p| p.identity() == target)
        {
            return Err(GameError::IneligibleLady(target));
        }
        if !dry_run {
            if let Some(previous) = self.lady.replace(target.clone()) {
                self.past_ladies.push(previous);
            }
            self.next_team_building();
        }
        self.participant(&target)
    }

    // === Assassination ===

    /// The designated assassin: the participant holding the Assassin role,
    /// or the first evil participant in roster order as fallback.
    #[must_use]
    pub fn assassin(&self) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.role == Some(Role::Assassin))
            .or_else(|| {
                self.participants
                    .iter()
                    .find(|p| p.role.is_some_and(Role::is_evil))
            })
    }

    /// Guess who Merlin is. Assassin only, good-aligned targets only.
    ///
    /// With `dry_run` the target is validated and returned without any
    /// mutation. A real run finishes the game immediately: the servants win
    /// exactly when the guess is wrong.
    pub fn guess_merlin(&mut self, actor: &str, target: &str, dry_run: bool) -> Result<&Participant> {
        self.require_phase(GamePhase::GuessMerlin)?;
        let assassin = self.assassin().ok_or(GameError::OnlyAssassinCanDo)?;
        if assassin.identity() != actor {
            return Err(GameError::OnlyAssassinCanDo);
        }
        let guessed = self.participant(target)?;
        if guessed.role.is_some_and(Role::is_evil) {
            return Err(GameError::EvilMerlinGuess);
        }
        let servants_won = guessed.role != Some(Role::Merlin);
        let target = guessed.identity().to_owned();
        if !dry_run {
            self.finish(servants_won);
        }
        self.participant(&target)
    }

    // === Viewer projection ===

    /// Per-viewer summary: own role plus role-appropriate teammate lists.
    ///
    /// Merlin is shown the evils he can see, Percival the two candidates he
    /// cannot tell apart, and every evil (except Oberon, who is in no
    /// table) the visible part of the evil team without the viewer.
    pub fn get_user_info(&self, viewer: &str) -> Result<String> {
        let viewer = self.participant(viewer)?;
        let role = viewer.role.ok_or(GameError::InvalidPhase {
            expected: GamePhase::Started,
            actual: self.phase,
        })?;

        let mut msg = format!("Your role: {role}");
        if role == Role::Merlin {
            msg.push_str(&format!(
                ", Evil: {}",
                self.names_with_roles(&MERLIN_SEES, None)
            ));
        }
        if role == Role::Percival {
            msg.push_str(&format!(
                ", Morgana/Merlin: {}",
                self.names_with_roles(&PERCIVAL_SEES, None)
            ));
        }
        if role.is_evil() {
            msg.push_str(&format!(
                ", Teammates: {}",
                self.names_with_roles(&EVIL_TEAM, Some(viewer.identity()))
            ));
        }
        Ok(msg)
    }

    fn names_with_roles(&self, roles: &[Role], exclude: Option<&str>) -> String {
        let names: Vec<&str> = self
            .participants
            .iter()
            .filter(|p| p.role.is_some_and(|r| roles.contains(&r)))
            .filter(|p| exclude != Some(p.identity()))
            .map(Participant::identity)
            .collect();
        names.join(", ")
    }

    // === Internals ===

    fn require_phase(&self, expected: GamePhase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn require_king(&self, actor: &str) -> Result<()> {
        if self.king.as_deref() == Some(actor) {
            Ok(())
        } else {
            Err(GameError::OnlyKingCanDo)
        }
    }

    fn participant_mut(&mut self, identity: &str) -> Result<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.identity() == identity)
            .ok_or_else(|| GameError::UnknownParticipant(identity.to_owned()))
    }

    fn team_members(&self) -> impl Iterator<Item = &Participant> {
        self.participants
            .iter()
            .filter(|p| self.current_team.iter().any(|id| id == p.identity()))
    }

    fn start_quest(&mut self) {
        self.phase = GamePhase::Quest;
        for p in &mut self.participants {
            p.quest_action = None;
        }
    }

    /// Clear the proposal and hand the crown to the next roster member.
    fn next_team_building(&mut self) {
        self.phase = GamePhase::TeamBuilding;
        self.current_team.clear();
        if let Some(current) = self.king.take() {
            let index = self
                .participants
                .iter()
                .position(|p| p.identity() == current)
                .unwrap_or(0);
            let next = (index + 1) % self.participants.len();
            self.king = Some(self.participants[next].identity().to_owned());
        }
    }

    fn finish(&mut self, servants_won: bool) {
        self.phase = GamePhase::Finished;
        self.game_result = Some(servants_won);
    }
}
