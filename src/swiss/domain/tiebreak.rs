//! The closed set of tiebreaker calculators spec §4.B names. A `SwissConfig`
//! can only ever reference one of these variants, so an unknown tiebreaker
//! name is a compile error rather than a runtime `InvalidConfig` (spec §9,
//! "fails at construction, not at first use").

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuchholzVariant {
    Standard,
    Median,
    Modified,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TiebreakKind {
    /// Match Win %.
    Mw,
    /// Game Win %.
    Gw,
    /// Opponent Match Win %.
    Omw,
    /// Opponent Game Win %.
    Ogw,
    Buchholz(BuchholzVariant),
    SonnebornBerger,
    /// Raw match wins, exposed as a float.
    MatchWins,
    /// Raw game wins, exposed as a float.
    GameWins,
    /// Seeded PRNG value in [0, 1), keyed by (tournament, round, player).
    Random,
    /// `1 / sequence_id` — lower sequence ranks higher.
    PlayerNumber,
}

impl TiebreakKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            TiebreakKind::Mw => "Match Win %",
            TiebreakKind::Gw => "Game Win %",
            TiebreakKind::Omw => "Opponent Match Win %",
            TiebreakKind::Ogw => "Opponent Game Win %",
            TiebreakKind::Buchholz(BuchholzVariant::Standard) => "Buchholz",
            TiebreakKind::Buchholz(BuchholzVariant::Median) => "Median Buchholz",
            TiebreakKind::Buchholz(BuchholzVariant::Modified) => "Modified Buchholz",
            TiebreakKind::SonnebornBerger => "Sonneborn-Berger",
            TiebreakKind::MatchWins => "Match Wins",
            TiebreakKind::GameWins => "Game Wins",
            TiebreakKind::Random => "Random",
            TiebreakKind::PlayerNumber => "Player Number",
        }
    }

    /// Stable key used as the map key in `StandingsEntry::tiebreakers`.
    pub fn key(&self) -> &'static str {
        match self {
            TiebreakKind::Mw => "mw",
            TiebreakKind::Gw => "gw",
            TiebreakKind::Omw => "omw",
            TiebreakKind::Ogw => "ogw",
            TiebreakKind::Buchholz(BuchholzVariant::Standard) => "buchholz",
            TiebreakKind::Buchholz(BuchholzVariant::Median) => "buchholz_median",
            TiebreakKind::Buchholz(BuchholzVariant::Modified) => "buchholz_modified",
            TiebreakKind::SonnebornBerger => "sonneborn_berger",
            TiebreakKind::MatchWins => "match_wins",
            TiebreakKind::GameWins => "game_wins",
            TiebreakKind::Random => "random",
            TiebreakKind::PlayerNumber => "player_number",
        }
    }
}
