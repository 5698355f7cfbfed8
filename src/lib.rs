//! Deterministic Swiss-system pairing and standings engine.
//!
//! Pure, synchronous, single-threaded: given a history of matches and a
//! seed, produces the next round's pairings and the current standings.
//! See `swiss::domain` for the data model and `swiss::service` for the
//! four engine components.

pub mod swiss;

pub use swiss::common::error::{RemediationSuggestion, SwissError};
pub use swiss::common::types::EngineResult;
pub use swiss::domain::config::{
    chess_style, mtg_standard, pokemon_standard, simple_random, ByeAssignment, ByePoints,
    RoundOneMode, SwissConfig,
};
pub use swiss::domain::model::{
    Match, MatchId, MatchOutcome, Pairing, PlayerId, Registration, RegistrationId,
    RegistrationStatus, RoundStatus, StandingsEntry,
};
pub use swiss::domain::tiebreak::{BuchholzVariant, TiebreakKind};
pub use swiss::repository::TournamentRepository;
pub use swiss::service::pairing::{pair_round, pair_round_1, PairingResult};
pub use swiss::service::round::{
    can_advance_to, close_dropped_match, record_late_entry_forfeits, round_status_of,
};
pub use swiss::service::standings::{calculate_standings, StandingsPurpose};
pub use swiss::service::validation::{validate_config, validate_input};
