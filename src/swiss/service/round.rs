//! Round state machine and drop/late-entry closure, spec §4.D(cont.) and
//! the "Drops and late entries" section.
//!
//! Grounded on the teacher's `RoundStatus` enum and `can_transition_to`
//! guard (`service/round.rs`), and its `update_round_status`
//! force-finalize path (closing games with a default score instead of
//! leaving them open) generalized from the teacher's fixed "1-0" chess
//! default to the configurable `bye_points`.

use chrono::{DateTime, Utc};

use crate::swiss::common::error::SwissError;
use crate::swiss::common::types::EngineResult;
use crate::swiss::domain::config::ByePoints;
use crate::swiss::domain::model::{Match, MatchId, PlayerId, Registration, RoundStatus};

/// A round is `Pending` with no matches yet, `Active` while at least one
/// match is unfinished, `Completed` once every match has `end_time` set.
pub fn round_status_of(matches_in_round: &[Match]) -> RoundStatus {
    if matches_in_round.is_empty() {
        return RoundStatus::Pending;
    }
    if matches_in_round.iter().all(Match::is_complete) {
        RoundStatus::Completed
    } else {
        RoundStatus::Active
    }
}

/// Round advancement is allowed only from a `Completed` round and only if
/// the next round number doesn't exceed `config.rounds`.
pub fn can_advance_to(
    next_round: u32,
    current_round_status: RoundStatus,
    total_rounds: u32,
) -> EngineResult<()> {
    if current_round_status != RoundStatus::Completed {
        return Err(SwissError::RoundNotReady(format!(
            "cannot advance to round {next_round}: the current round is not yet Completed"
        )));
    }
    if next_round > total_rounds {
        return Err(SwissError::InvalidInput(format!(
            "round {next_round} exceeds the configured {total_rounds} rounds"
        )));
    }
    Ok(())
}

/// Closes an unfinished match for a player who dropped mid-round: the
/// opponent is credited the configured bye-equivalent score and the match
/// is marked complete at `now`. A no-op if the match is already complete.
pub fn close_dropped_match(
    m: &Match,
    dropped_player: PlayerId,
    bye_points: ByePoints,
    now: DateTime<Utc>,
) -> EngineResult<Match> {
    let mut closed = m.clone();
    if closed.is_complete() {
        return Ok(closed);
    }
    if closed.player1_id == dropped_player {
        closed.player1_game_wins = 0;
        closed.player2_game_wins = bye_points.wins;
        closed.draws = bye_points.draws;
    } else if closed.player2_id == Some(dropped_player) {
        closed.player1_game_wins = bye_points.wins;
        closed.player2_game_wins = 0;
        closed.draws = bye_points.draws;
    } else {
        return Err(SwissError::InvalidInput(format!(
            "dropped player {dropped_player} does not appear in match {}",
            m.match_id
        )));
    }
    closed.end_time = Some(now);
    Ok(closed)
}

/// Records the forfeit losses a `LateEntry` registration accrues for every
/// round before its `entry_round`. No opponent, no bye credit — these
/// matches contribute no opponent to anyone's O_W% denominators.
pub fn record_late_entry_forfeits(registration: &Registration, now: DateTime<Utc>) -> Vec<Match> {
    let Some(entry_round) = registration.entry_round else {
        return Vec::new();
    };
    (1..entry_round)
        .map(|round_number| Match {
            match_id: MatchId::new(),
            round_number,
            player1_id: registration.player_id,
            player2_id: None,
            player1_game_wins: 0,
            player2_game_wins: 0,
            draws: 0,
            table_number: None,
            end_time: Some(now),
            is_loss_forfeit: true,
        })
        .collect()
}
