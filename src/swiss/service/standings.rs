//! Component C — the standings calculator, spec §4.C.
//!
//! Grounded on the teacher's `TiebreakCalculator::sort_standings`/
//! `assign_ranks` (stable multi-key sort, dense ranks), generalized to the
//! full `(match_points, t1..tk, sequence_id)` sort key. The teacher breaks
//! residual ties by player name; this port breaks by ascending
//! `sequence_id`, the spec-mandated total order (§4.C step 3).

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::instrument;
use uuid::Uuid;

use super::tiebreak::{calculate, TiebreakContext};
use crate::swiss::common::types::EngineResult;
use crate::swiss::domain::config::SwissConfig;
use crate::swiss::domain::model::{PlayerId, Registration, RegistrationStatus, StandingsEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsPurpose {
    Pairing,
    Final,
}

/// Produces standings for either pairing purposes (uses
/// `config.pairing_tiebreakers`) or final standings
/// (`config.standings_tiebreakers`), per spec §4.C.
#[instrument(skip(registrations, matches, config))]
pub fn calculate_standings(
    tournament_id: Uuid,
    round_number: u32,
    registrations: &[Registration],
    matches: &[crate::swiss::domain::model::Match],
    config: &SwissConfig,
    purpose: StandingsPurpose,
) -> EngineResult<Vec<StandingsEntry>> {
    config.validate()?;
    let chain: &[crate::swiss::domain::tiebreak::TiebreakKind] = match purpose {
        StandingsPurpose::Pairing => &config.pairing_tiebreakers,
        StandingsPurpose::Final => &config.standings_tiebreakers,
    };

    let played: HashSet<PlayerId> = matches
        .iter()
        .flat_map(|m| {
            let mut ids = vec![m.player1_id];
            if let Some(p2) = m.player2_id {
                ids.push(p2);
            }
            ids
        })
        .collect();

    // Step 1: eligible registrations — ACTIVE, or has ever played (dropped
    // players remain in standings until the tournament ends, spec §4.C).
    let eligible: Vec<&Registration> = registrations
        .iter()
        .filter(|r| r.status == RegistrationStatus::Active || played.contains(&r.player_id))
        .collect();

    let ctx = TiebreakContext::new(tournament_id, round_number, registrations, matches, config);

    // Steps 1-2: aggregate and evaluate the declared tiebreaker chain.
    let mut entries: Vec<StandingsEntry> = eligible
        .into_iter()
        .map(|registration| {
            let record = ctx.record(registration.player_id);
            let tiebreakers = chain
                .iter()
                .map(|kind| (kind.key().to_string(), calculate(*kind, registration.player_id, &ctx)))
                .collect();
            StandingsEntry {
                registration: registration.clone(),
                rank: 0,
                match_wins: record.match_wins,
                match_losses: record.match_losses,
                match_draws: record.match_draws,
                match_points: record.match_points(),
                game_wins: record.game_wins,
                game_losses: record.game_losses,
                game_draws: record.game_draws,
                matches_played: record.matches_played,
                bye_count: record.bye_count,
                opponents: record.opponents,
                tiebreakers,
                dropped: registration.status == RegistrationStatus::Dropped,
            }
        })
        .collect();

    // Step 3: stable sort by (match_points, t1..tk) descending, residual
    // ties broken by ascending sequence_id.
    entries.sort_by(|a, b| {
        b.match_points
            .cmp(&a.match_points)
            .then_with(|| {
                for i in 0..chain.len() {
                    let cmp = b.tiebreakers[i]
                        .1
                        .partial_cmp(&a.tiebreakers[i].1)
                        .unwrap_or(Ordering::Equal);
                    if cmp != Ordering::Equal {
                        return cmp;
                    }
                }
                Ordering::Equal
            })
            .then_with(|| a.registration.sequence_id.cmp(&b.registration.sequence_id))
    });

    // Step 4: assign dense ranks in sort order.
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = (i + 1) as u32;
    }

    Ok(entries)
}
