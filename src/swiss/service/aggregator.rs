//! Component A — match-record aggregator, spec §4.A. Pure function: from a
//! player's matches, derive the fields of a `StandingsEntry` except rank
//! and tiebreakers.
//!
//! Grounded on the teacher's `TiebreakCalculator::calculate_player_results`
//! (`service/tiebreak.rs`), generalized from hardcoded chess result strings
//! to a game-win-count comparison so Magic, Pokémon, and chess matches all
//! aggregate the same way.

use crate::swiss::domain::config::SwissConfig;
use crate::swiss::domain::model::{Match, MatchOutcome, PlayerId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerRecord {
    pub match_wins: u32,
    pub match_losses: u32,
    pub match_draws: u32,
    pub game_wins: u32,
    pub game_losses: u32,
    pub game_draws: u32,
    pub matches_played: u32,
    pub bye_count: u32,
    pub opponents: Vec<PlayerId>,
}

impl PlayerRecord {
    pub fn match_points(&self) -> u32 {
        3 * self.match_wins + self.match_draws
    }

    pub fn total_games(&self) -> u32 {
        self.game_wins + self.game_losses + self.game_draws
    }
}

/// Aggregates `player_id`'s completed matches up to the current round.
///
/// Only `Match`es with `end_time` set are counted (spec §4.A). Byes credit
/// `config.bye_points` to wins/game-wins (or draws) without adding an
/// opponent. Forfeits recorded for a `LateEntry` player before their
/// `entry_round` count as plain losses and likewise contribute no
/// opponent.
pub fn aggregate(player_id: PlayerId, matches: &[Match], config: &SwissConfig) -> PlayerRecord {
    let mut record = PlayerRecord::default();

    for m in matches {
        if !m.is_complete() {
            continue;
        }
        let is_player1 = m.player1_id == player_id;
        let is_player2 = m.player2_id == Some(player_id);
        if !is_player1 && !is_player2 {
            continue;
        }

        if m.is_bye() {
            // Byes are only ever recorded against player1 by convention.
            record.bye_count += 1;
            record.matches_played += 1;
            record.game_wins += config.bye_points.wins;
            record.game_draws += config.bye_points.draws;
            if config.bye_points.draws > 0 && config.bye_points.wins == 0 {
                record.match_draws += 1;
            } else {
                record.match_wins += 1;
            }
            continue;
        }

        if m.is_loss_forfeit {
            record.matches_played += 1;
            record.match_losses += 1;
            continue;
        }

        record.matches_played += 1;
        let (own_games, opp_games, opponent) = if is_player1 {
            (m.player1_game_wins, m.player2_game_wins, m.player2_id)
        } else {
            (m.player2_game_wins, m.player1_game_wins, Some(m.player1_id))
        };
        record.game_wins += own_games;
        record.game_losses += opp_games;
        record.game_draws += m.draws;

        let outcome = if is_player1 {
            m.outcome_for_player1()
        } else {
            match m.outcome_for_player1() {
                MatchOutcome::Win => MatchOutcome::Loss,
                MatchOutcome::Loss => MatchOutcome::Win,
                MatchOutcome::Draw => MatchOutcome::Draw,
            }
        };
        match outcome {
            MatchOutcome::Win => record.match_wins += 1,
            MatchOutcome::Loss => record.match_losses += 1,
            MatchOutcome::Draw => record.match_draws += 1,
        }

        if let Some(opponent_id) = opponent {
            record.opponents.push(opponent_id);
        }
    }

    record
}
