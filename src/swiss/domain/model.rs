//! Core data model: the entities the engine reads (`Registration`, `Match`)
//! and the entities it produces (`StandingsEntry`, `Pairing`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! opaque_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

opaque_id!(RegistrationId);
opaque_id!(PlayerId);
opaque_id!(MatchId);

/// Where a registration currently stands in the tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    Active,
    Dropped,
    LateEntry,
}

/// A player's enrollment in a tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub registration_id: RegistrationId,
    pub player_id: PlayerId,
    /// 1-based registration order, unique within the tournament.
    pub sequence_id: u32,
    pub status: RegistrationStatus,
    /// First round after which this registration no longer appears in
    /// pairings. Set only when `status == Dropped`.
    pub drop_round: Option<u32>,
    /// First round a `LateEntry` registration actually plays.
    pub entry_round: Option<u32>,
}

impl Registration {
    /// Whether this registration appears in pairings for `round_number`.
    pub fn active_at(&self, round_number: u32) -> bool {
        match self.status {
            RegistrationStatus::Dropped => self.drop_round.is_none_or(|dr| round_number <= dr),
            RegistrationStatus::LateEntry => self.entry_round.is_none_or(|er| round_number >= er),
            RegistrationStatus::Active => true,
        }
    }
}

/// One head-to-head result, or a bye when `player2_id` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: MatchId,
    pub round_number: u32,
    pub player1_id: PlayerId,
    pub player2_id: Option<PlayerId>,
    pub player1_game_wins: u32,
    pub player2_game_wins: u32,
    pub draws: u32,
    pub table_number: Option<u32>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    /// A synthetic forfeit loss recorded for a `LateEntry` player before
    /// their `entry_round`: no opponent, no bye credit, spec §4.D.
    pub is_loss_forfeit: bool,
}

impl Match {
    pub fn is_bye(&self) -> bool {
        self.player2_id.is_none() && !self.is_loss_forfeit
    }

    pub fn is_complete(&self) -> bool {
        self.end_time.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Win,
    Loss,
    Draw,
}

impl Match {
    /// Outcome for `player1_id`'s side of this match.
    pub fn outcome_for_player1(&self) -> MatchOutcome {
        use std::cmp::Ordering::*;
        match self.player1_game_wins.cmp(&self.player2_game_wins) {
            Greater => MatchOutcome::Win,
            Less => MatchOutcome::Loss,
            Equal => MatchOutcome::Draw,
        }
    }
}

/// Round lifecycle, spec §4.D(cont.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    Pending,
    Active,
    Completed,
}

impl RoundStatus {
    pub fn can_transition_to(&self, next: RoundStatus) -> bool {
        matches!(
            (self, next),
            (RoundStatus::Pending, RoundStatus::Active)
                | (RoundStatus::Active, RoundStatus::Completed)
        )
    }
}

/// One produced ranking row. `tiebreakers` preserves the declared chain's
/// order so callers can render a breakdown table without re-deriving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub registration: Registration,
    pub rank: u32,
    pub match_wins: u32,
    pub match_losses: u32,
    pub match_draws: u32,
    pub match_points: u32,
    pub game_wins: u32,
    pub game_losses: u32,
    pub game_draws: u32,
    pub matches_played: u32,
    pub bye_count: u32,
    /// Opponents faced in encounter order; byes and forfeits excluded.
    pub opponents: Vec<PlayerId>,
    pub tiebreakers: Vec<(String, f64)>,
    /// Resolves spec §9's open question on dropped-player rank visibility.
    pub dropped: bool,
}

/// One produced pairing for a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub round_number: u32,
    pub player1_id: PlayerId,
    pub player2_id: Option<PlayerId>,
    pub table_number: Option<u32>,
    pub is_pair_down: bool,
    pub is_bye: bool,
}
