//! `InvalidConfig`/`InvalidInput` checks, spec §7.
//!
//! Grounded on the teacher's `ResultValidationService` accumulator pattern
//! (`service/validation.rs`), repurposed from chess-result-string
//! validation to config-range and match-consistency checks.

use std::collections::{HashMap, HashSet};

use crate::swiss::common::error::SwissError;
use crate::swiss::common::types::EngineResult;
use crate::swiss::domain::config::SwissConfig;
use crate::swiss::domain::model::{Match, PlayerId, Registration};

pub fn validate_config(config: &SwissConfig) -> EngineResult<()> {
    config.validate()
}

/// Checks match scores are well-formed, no player appears who isn't
/// registered, no pair is paired twice in the same round, and round
/// numbering has no gaps.
pub fn validate_input(registrations: &[Registration], matches: &[Match]) -> EngineResult<()> {
    let registered: HashSet<PlayerId> = registrations.iter().map(|r| r.player_id).collect();
    let mut rounds_seen: HashSet<u32> = HashSet::new();

    for m in matches {
        if !registered.contains(&m.player1_id) {
            return Err(SwissError::InvalidInput(format!(
                "match {} references unregistered player {}",
                m.match_id, m.player1_id
            )));
        }
        if let Some(p2) = m.player2_id {
            if !registered.contains(&p2) {
                return Err(SwissError::InvalidInput(format!(
                    "match {} references unregistered player {}",
                    m.match_id, p2
                )));
            }
            if p2 == m.player1_id {
                return Err(SwissError::InvalidInput(format!(
                    "match {} pairs player {} against themself",
                    m.match_id, m.player1_id
                )));
            }
        }
        rounds_seen.insert(m.round_number);
    }

    let mut pairs_by_round: HashMap<u32, HashSet<(PlayerId, PlayerId)>> = HashMap::new();
    for m in matches {
        let Some(p2) = m.player2_id else { continue };
        let key = if m.player1_id < p2 {
            (m.player1_id, p2)
        } else {
            (p2, m.player1_id)
        };
        let seen_this_round = pairs_by_round.entry(m.round_number).or_default();
        if !seen_this_round.insert(key) {
            return Err(SwissError::InvalidInput(format!(
                "round {} pairs {} against {} more than once",
                m.round_number, key.0, key.1
            )));
        }
    }

    if let Some(&max_round) = rounds_seen.iter().max() {
        for round_number in 1..=max_round {
            if !rounds_seen.contains(&round_number) {
                return Err(SwissError::InvalidInput(format!(
                    "round numbering is non-contiguous: round {round_number} has no matches"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swiss::domain::model::{MatchId, RegistrationId, RegistrationStatus};
    use chrono::Utc;

    fn reg(player_id: PlayerId) -> Registration {
        Registration {
            registration_id: RegistrationId::new(),
            player_id,
            sequence_id: 1,
            status: RegistrationStatus::Active,
            drop_round: None,
            entry_round: None,
        }
    }

    fn m(round: u32, p1: PlayerId, p2: Option<PlayerId>) -> Match {
        Match {
            match_id: MatchId::new(),
            round_number: round,
            player1_id: p1,
            player2_id: p2,
            player1_game_wins: 2,
            player2_game_wins: 0,
            draws: 0,
            table_number: Some(1),
            end_time: Some(Utc::now()),
            is_loss_forfeit: false,
        }
    }

    #[test]
    fn rejects_unregistered_player() {
        let a = PlayerId::new();
        let b = PlayerId::new();
        let regs = vec![reg(a)];
        let err = validate_input(&regs, &[m(1, a, Some(b))]).unwrap_err();
        assert!(matches!(err, SwissError::InvalidInput(_)));
    }

    #[test]
    fn rejects_duplicate_pairing_in_same_round() {
        let a = PlayerId::new();
        let b = PlayerId::new();
        let regs = vec![reg(a), reg(b)];
        let matches = vec![m(1, a, Some(b)), m(1, b, Some(a))];
        let err = validate_input(&regs, &matches).unwrap_err();
        assert!(matches!(err, SwissError::InvalidInput(_)));
    }

    #[test]
    fn rejects_non_contiguous_rounds() {
        let a = PlayerId::new();
        let b = PlayerId::new();
        let regs = vec![reg(a), reg(b)];
        let matches = vec![m(1, a, Some(b)), m(3, a, Some(b))];
        let err = validate_input(&regs, &matches).unwrap_err();
        assert!(matches!(err, SwissError::InvalidInput(_)));
    }

    #[test]
    fn accepts_well_formed_history() {
        let a = PlayerId::new();
        let b = PlayerId::new();
        let regs = vec![reg(a), reg(b)];
        let matches = vec![m(1, a, Some(b))];
        assert!(validate_input(&regs, &matches).is_ok());
    }
}
