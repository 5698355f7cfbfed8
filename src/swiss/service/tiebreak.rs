//! Component B — the tiebreaker library, spec §4.B. Every calculator is a
//! pure function of `(player, all_matches, all_registrations, config)`;
//! `TiebreakContext` precomputes the per-player aggregate once so the
//! O(N) calculators and the O(N·avg-opponents) OMW/OGW calculators don't
//! redo §4.A's work for every tiebreaker in the chain.
//!
//! Grounded on the teacher's `TiebreakCalculator::calculate_tiebreak_score`
//! match-arm dispatch and its private `calculate_buchholz_*`/
//! `calculate_sonneborn_berger` methods (`service/tiebreak.rs`), narrowed
//! to spec's required calculator set and made floor/guard-exact per §4.B.

use std::collections::HashMap;

use rand::Rng;
use uuid::Uuid;

use super::aggregator::{aggregate, PlayerRecord};
use super::rng::{derive_seed, rng_from_seed, uuid_parts};
use crate::swiss::domain::config::SwissConfig;
use crate::swiss::domain::model::{Match, MatchOutcome, PlayerId, Registration};
use crate::swiss::domain::tiebreak::{BuchholzVariant, TiebreakKind};

/// Shared state for evaluating a tiebreaker chain across many players.
pub struct TiebreakContext<'a> {
    pub tournament_id: Uuid,
    pub round_number: u32,
    pub config: &'a SwissConfig,
    matches: &'a [Match],
    records: HashMap<PlayerId, PlayerRecord>,
    sequence: HashMap<PlayerId, u32>,
}

impl<'a> TiebreakContext<'a> {
    pub fn new(
        tournament_id: Uuid,
        round_number: u32,
        registrations: &'a [Registration],
        matches: &'a [Match],
        config: &'a SwissConfig,
    ) -> Self {
        let records = registrations
            .iter()
            .map(|r| (r.player_id, aggregate(r.player_id, matches, config)))
            .collect();
        let sequence = registrations
            .iter()
            .map(|r| (r.player_id, r.sequence_id))
            .collect();
        Self {
            tournament_id,
            round_number,
            config,
            matches,
            records,
            sequence,
        }
    }

    pub fn record(&self, player_id: PlayerId) -> PlayerRecord {
        self.records.get(&player_id).cloned().unwrap_or_default()
    }

    fn sequence_id(&self, player_id: PlayerId) -> u32 {
        self.sequence.get(&player_id).copied().unwrap_or(1)
    }

    fn omw(&self, player_id: PlayerId) -> f64 {
        let record = self.record(player_id);
        if record.opponents.is_empty() {
            return 0.0;
        }
        let floor = self.config.omw_floor;
        let sum: f64 = record
            .opponents
            .iter()
            .map(|opp| mw(&self.record(*opp), floor))
            .sum();
        sum / record.opponents.len() as f64
    }

    fn ogw(&self, player_id: PlayerId) -> f64 {
        let record = self.record(player_id);
        if record.opponents.is_empty() {
            return 0.0;
        }
        let floor = self.config.gw_floor;
        let min_games = self.config.min_games_for_gw;
        let sum: f64 = record
            .opponents
            .iter()
            .map(|opp| gw(&self.record(*opp), floor, min_games))
            .sum();
        sum / record.opponents.len() as f64
    }

    fn buchholz(&self, player_id: PlayerId, variant: BuchholzVariant) -> f64 {
        let record = self.record(player_id);
        let mut points: Vec<f64> = record
            .opponents
            .iter()
            .map(|opp| self.record(*opp).match_points() as f64)
            .collect();
        match variant {
            BuchholzVariant::Standard => points.iter().sum(),
            BuchholzVariant::Median if points.len() >= 3 => {
                points.sort_by(f64::total_cmp);
                points[1..points.len() - 1].iter().sum()
            }
            BuchholzVariant::Modified if points.len() >= 2 => {
                points.sort_by(f64::total_cmp);
                points[1..].iter().sum()
            }
            // Too few opponents for the cut; falls back to the full sum.
            BuchholzVariant::Median | BuchholzVariant::Modified => points.iter().sum(),
        }
    }

    fn sonneborn_berger(&self, player_id: PlayerId) -> f64 {
        let mut total = 0.0;
        for m in self.matches {
            if !m.is_complete() || m.is_bye() || m.is_loss_forfeit {
                continue;
            }
            let (is_p1, opponent) = if m.player1_id == player_id {
                (true, m.player2_id)
            } else if m.player2_id == Some(player_id) {
                (false, Some(m.player1_id))
            } else {
                continue;
            };
            let Some(opponent_id) = opponent else {
                continue;
            };
            let outcome = if is_p1 {
                m.outcome_for_player1()
            } else {
                match m.outcome_for_player1() {
                    MatchOutcome::Win => MatchOutcome::Loss,
                    MatchOutcome::Loss => MatchOutcome::Win,
                    MatchOutcome::Draw => MatchOutcome::Draw,
                }
            };
            let result_value = match outcome {
                MatchOutcome::Win => 1.0,
                MatchOutcome::Draw => 0.5,
                MatchOutcome::Loss => 0.0,
            };
            total += result_value * self.record(opponent_id).match_points() as f64;
        }
        total
    }

    /// Seeded PRNG value in [0,1), keyed by `(tournament_id, round_number,
    /// player_id)` so repeated calls with the same inputs always agree.
    fn random(&self, player_id: PlayerId) -> f64 {
        let (t_hi, t_lo) = uuid_parts(self.tournament_id);
        let (p_hi, p_lo) = uuid_parts(player_id.0);
        let seed = derive_seed(&[t_hi, t_lo, self.round_number as u64, p_hi, p_lo, self.config.seed]);
        let mut rng = rng_from_seed(seed);
        rng.gen::<f64>()
    }

    fn player_number(&self, player_id: PlayerId) -> f64 {
        1.0 / self.sequence_id(player_id) as f64
    }
}

/// Match Win %, spec §4.B. `matches_played` excludes byes; zero-denominator
/// returns the floor rather than dividing by zero.
fn mw(record: &PlayerRecord, floor: f64) -> f64 {
    let denom = record.matches_played.saturating_sub(record.bye_count);
    if denom == 0 {
        return floor;
    }
    (record.match_points() as f64 / (3.0 * denom as f64)).max(floor)
}

/// Game Win %, spec §4.B. Bye games count on both sides of the ratio (per
/// MTG DCI rules); below `min_games_for_gw` total games, returns 0 rather
/// than the floor — the floor only ever raises an existing sample.
fn gw(record: &PlayerRecord, floor: f64, min_games: u32) -> f64 {
    let total = record.total_games();
    if total < min_games {
        return 0.0;
    }
    (record.game_wins as f64 / total as f64).max(floor)
}

/// Evaluates one named calculator for one player against the shared context.
pub fn calculate(kind: TiebreakKind, player_id: PlayerId, ctx: &TiebreakContext) -> f64 {
    match kind {
        TiebreakKind::Mw => mw(&ctx.record(player_id), ctx.config.omw_floor),
        TiebreakKind::Gw => gw(
            &ctx.record(player_id),
            ctx.config.gw_floor,
            ctx.config.min_games_for_gw,
        ),
        TiebreakKind::Omw => ctx.omw(player_id),
        TiebreakKind::Ogw => ctx.ogw(player_id),
        TiebreakKind::Buchholz(variant) => ctx.buchholz(player_id, variant),
        TiebreakKind::SonnebornBerger => ctx.sonneborn_berger(player_id),
        TiebreakKind::MatchWins => ctx.record(player_id).match_wins as f64,
        TiebreakKind::GameWins => ctx.record(player_id).game_wins as f64,
        TiebreakKind::Random => ctx.random(player_id),
        TiebreakKind::PlayerNumber => ctx.player_number(player_id),
    }
}
