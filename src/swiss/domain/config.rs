//! Typed tournament configuration, spec §6. Replaces the teacher's
//! string-keyed `TournamentTiebreakConfig` with a closed struct: presets are
//! constructor functions, not a registry entry looked up by name (spec §9,
//! "Configuration via open dictionary").

use serde::{Deserialize, Serialize};

use super::tiebreak::{BuchholzVariant, TiebreakKind};
use crate::swiss::common::error::SwissError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ByeAssignment {
    Random,
    LowestTiebreaker,
}

/// Round-1 pairing mode, spec §4.D "Round 1". Not itself in the §6 field
/// table (which documents round-N behavior); supplemented here since
/// `pair_round_1` needs a knob to pick between the two documented modes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundOneMode {
    Random,
    Seeded,
}

/// Score credited to the player who receives a bye.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ByePoints {
    pub wins: u32,
    pub draws: u32,
}

impl Default for ByePoints {
    fn default() -> Self {
        Self { wins: 2, draws: 0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwissConfig {
    pub rounds: u32,
    pub pairing_tiebreakers: Vec<TiebreakKind>,
    pub standings_tiebreakers: Vec<TiebreakKind>,
    pub avoid_repeat_pairings: bool,
    pub track_pair_downs: bool,
    /// `None` means unlimited.
    pub max_byes_per_player: Option<u32>,
    pub bye_assignment: ByeAssignment,
    pub bye_points: ByePoints,
    pub omw_floor: f64,
    pub gw_floor: f64,
    pub min_games_for_gw: u32,
    pub buchholz_variant: BuchholzVariant,
    pub seed: u64,
    pub round1_mode: RoundOneMode,
}

impl SwissConfig {
    /// Starts from spec §6's defaults; callers narrow with `with_*`.
    pub fn new(rounds: u32, seed: u64) -> Self {
        Self {
            rounds,
            pairing_tiebreakers: default_chain(),
            standings_tiebreakers: default_chain(),
            avoid_repeat_pairings: true,
            track_pair_downs: true,
            max_byes_per_player: Some(1),
            bye_assignment: ByeAssignment::Random,
            bye_points: ByePoints::default(),
            omw_floor: 0.33,
            gw_floor: 0.33,
            min_games_for_gw: 1,
            buchholz_variant: BuchholzVariant::Standard,
            seed,
            round1_mode: RoundOneMode::Random,
        }
    }

    pub fn with_round1_mode(mut self, mode: RoundOneMode) -> Self {
        self.round1_mode = mode;
        self
    }

    pub fn with_pairing_tiebreakers(mut self, chain: Vec<TiebreakKind>) -> Self {
        self.pairing_tiebreakers = chain;
        self
    }

    pub fn with_standings_tiebreakers(mut self, chain: Vec<TiebreakKind>) -> Self {
        self.standings_tiebreakers = chain;
        self
    }

    pub fn with_avoid_repeat_pairings(mut self, avoid: bool) -> Self {
        self.avoid_repeat_pairings = avoid;
        self
    }

    pub fn with_track_pair_downs(mut self, track: bool) -> Self {
        self.track_pair_downs = track;
        self
    }

    pub fn with_max_byes_per_player(mut self, max: Option<u32>) -> Self {
        self.max_byes_per_player = max;
        self
    }

    pub fn with_bye_assignment(mut self, policy: ByeAssignment) -> Self {
        self.bye_assignment = policy;
        self
    }

    pub fn with_bye_points(mut self, points: ByePoints) -> Self {
        self.bye_points = points;
        self
    }

    pub fn with_omw_floor(mut self, floor: f64) -> Self {
        self.omw_floor = floor;
        self
    }

    pub fn with_gw_floor(mut self, floor: f64) -> Self {
        self.gw_floor = floor;
        self
    }

    pub fn with_min_games_for_gw(mut self, min_games: u32) -> Self {
        self.min_games_for_gw = min_games;
        self
    }

    pub fn with_buchholz_variant(mut self, variant: BuchholzVariant) -> Self {
        self.buchholz_variant = variant;
        self
    }

    /// `InvalidConfig` checks, spec §7. Unknown-tiebreaker-name is ruled out
    /// by construction since `TiebreakKind` is a closed enum; this enforces
    /// the remaining range checks.
    pub fn validate(&self) -> Result<(), SwissError> {
        if !(1..=20).contains(&self.rounds) {
            return Err(SwissError::InvalidConfig(format!(
                "rounds must be in 1..=20, got {}",
                self.rounds
            )));
        }
        for (name, floor) in [("omw_floor", self.omw_floor), ("gw_floor", self.gw_floor)] {
            if !(0.0..=1.0).contains(&floor) {
                return Err(SwissError::InvalidConfig(format!(
                    "{name} must be in [0,1], got {floor}"
                )));
            }
        }
        if self.pairing_tiebreakers.is_empty() {
            return Err(SwissError::InvalidConfig(
                "pairing_tiebreakers must not be empty".into(),
            ));
        }
        if self.standings_tiebreakers.is_empty() {
            return Err(SwissError::InvalidConfig(
                "standings_tiebreakers must not be empty".into(),
            ));
        }
        if self.min_games_for_gw == 0 {
            return Err(SwissError::InvalidConfig(
                "min_games_for_gw must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn default_chain() -> Vec<TiebreakKind> {
    vec![
        TiebreakKind::Omw,
        TiebreakKind::Gw,
        TiebreakKind::Ogw,
        TiebreakKind::Random,
    ]
}

/// GLOSSARY preset: `[omw,gw,ogw,random]`, floor 0.33, bye 2-0, max 1 bye.
pub fn mtg_standard(rounds: u32, seed: u64) -> SwissConfig {
    SwissConfig::new(rounds, seed)
}

/// GLOSSARY preset: `[omw,ogw,random]`, floor 0.25, bye 2-0.
pub fn pokemon_standard(rounds: u32, seed: u64) -> SwissConfig {
    SwissConfig::new(rounds, seed)
        .with_pairing_tiebreakers(vec![TiebreakKind::Omw, TiebreakKind::Ogw, TiebreakKind::Random])
        .with_standings_tiebreakers(vec![
            TiebreakKind::Omw,
            TiebreakKind::Ogw,
            TiebreakKind::Random,
        ])
        .with_omw_floor(0.25)
        .with_gw_floor(0.25)
}

/// GLOSSARY preset: `[buchholz,sonneborn_berger,player_number]`, bye 1-0,
/// `bye_assignment = lowest_tiebreaker`.
pub fn chess_style(rounds: u32, seed: u64) -> SwissConfig {
    let chain = vec![
        TiebreakKind::Buchholz(BuchholzVariant::Standard),
        TiebreakKind::SonnebornBerger,
        TiebreakKind::PlayerNumber,
    ];
    SwissConfig::new(rounds, seed)
        .with_pairing_tiebreakers(chain.clone())
        .with_standings_tiebreakers(chain)
        .with_bye_points(ByePoints { wins: 1, draws: 0 })
        .with_bye_assignment(ByeAssignment::LowestTiebreaker)
}

/// GLOSSARY preset: pairing chain `[random]`, standings chain unchanged.
pub fn simple_random(rounds: u32, seed: u64) -> SwissConfig {
    SwissConfig::new(rounds, seed).with_pairing_tiebreakers(vec![TiebreakKind::Random])
}
