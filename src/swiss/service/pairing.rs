//! Component D — the pairing engine, spec §4.D. Two entry points:
//! `pair_round_1` (seeded/random first round) and `pair_round` (bracket
//! pairing with no-rematch, pair-down, and bye-cap enforcement for round
//! N ≥ 2).
//!
//! Grounded on the teacher's `SwissPairingEngine` (`service/
//! swiss_pairing.rs`) for the score-group-via-sorted-collection shape, the
//! opponent-history `HashSet` membership test, and the general
//! "iterate brackets top-down, greedy-pair, track floats" architecture —
//! the chess-specific color-preference/float-history logic is replaced
//! here by the exact carry-down/pair-down/bye-cap algorithm spec §4.D
//! specifies (color balance is an explicit Non-goal, spec §1). Cross-
//! checked against the pack's other from-scratch Swiss pairer
//! (`other_examples/..._swiss-pairer.rs`) for the simpler
//! bye-then-pair-even-players skeleton.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::aggregator::aggregate;
use super::rng::{derive_seed, rng_from_seed};
use super::round;
use super::standings::{calculate_standings, StandingsPurpose};
use super::validation;
use crate::swiss::common::error::{RemediationSuggestion, SwissError};
use crate::swiss::common::types::EngineResult;
use crate::swiss::domain::config::{ByeAssignment, RoundOneMode, SwissConfig};
use crate::swiss::domain::model::{Match, Pairing, PlayerId, Registration, StandingsEntry};

#[derive(Debug, Clone, PartialEq)]
pub struct PairingResult {
    pub pairings: Vec<Pairing>,
}

/// Round 1: random (default) or seeded pairing, spec §4.D "Round 1".
#[instrument(skip(registrations, config))]
pub fn pair_round_1(
    registrations: &[Registration],
    config: &SwissConfig,
) -> EngineResult<PairingResult> {
    config.validate()?;

    let active: Vec<&Registration> = registrations.iter().filter(|r| r.active_at(1)).collect();
    if active.len() < 2 {
        return Err(SwissError::TooFewPlayers(format!(
            "{} eligible registrations for round 1",
            active.len()
        )));
    }

    let ordered: Vec<PlayerId> = match config.round1_mode {
        RoundOneMode::Seeded => {
            let mut sorted = active.clone();
            sorted.sort_by_key(|r| r.sequence_id);
            sorted.into_iter().map(|r| r.player_id).collect()
        }
        RoundOneMode::Random => {
            let mut shuffled = active.clone();
            let seed = derive_seed(&[config.seed, 0xA0C1]);
            let mut rng = rng_from_seed(seed);
            shuffled.shuffle(&mut rng);
            shuffled.into_iter().map(|r| r.player_id).collect()
        }
    };

    let mut pairings = Vec::with_capacity(ordered.len().div_ceil(2));
    let mut table_number = 1u32;
    let mut chunks = ordered.chunks_exact(2);
    for pair in &mut chunks {
        pairings.push(Pairing {
            round_number: 1,
            player1_id: pair[0],
            player2_id: Some(pair[1]),
            table_number: Some(table_number),
            is_pair_down: false,
            is_bye: false,
        });
        table_number += 1;
    }
    // Odd count: the last player in post-ordering gets the bye — in
    // `seeded` mode that's the highest sequence number.
    if let [bye_player] = chunks.remainder() {
        pairings.push(Pairing {
            round_number: 1,
            player1_id: *bye_player,
            player2_id: None,
            table_number: None,
            is_pair_down: false,
            is_bye: true,
        });
    }

    Ok(PairingResult { pairings })
}

/// One player carried into a bracket, either natively (originated there)
/// or carried down from a higher bracket. `origin_points` is the
/// match-point value of the bracket the player originally stood in this
/// round, used to tell `is_pair_down` apart from an in-bracket pairing.
#[derive(Debug, Clone)]
struct Candidate {
    entry: StandingsEntry,
    origin_points: u32,
}

fn build_history(matches: &[Match]) -> HashMap<PlayerId, HashSet<PlayerId>> {
    let mut history: HashMap<PlayerId, HashSet<PlayerId>> = HashMap::new();
    for m in matches {
        if m.is_bye() || m.is_loss_forfeit {
            continue;
        }
        if let Some(p2) = m.player2_id {
            history.entry(m.player1_id).or_default().insert(p2);
            history.entry(p2).or_default().insert(m.player1_id);
        }
    }
    history
}

fn build_bye_counts(matches: &[Match]) -> HashMap<PlayerId, u32> {
    let mut counts: HashMap<PlayerId, u32> = HashMap::new();
    for m in matches {
        if m.is_bye() {
            *counts.entry(m.player1_id).or_insert(0) += 1;
        }
    }
    counts
}

/// Reconstructs each player's historical pair-down count from match
/// history: a past round's match is a pair-down when the two players'
/// match-points differed as of immediately before that round. `Match`
/// records don't carry `is_pair_down` themselves (only produced `Pairing`
/// values do), so this is derived, not read back directly — spec §9's
/// "pair-down counts persist across tournaments" question is answered
/// "per-tournament, derived fresh from history every call".
fn build_pair_down_counts(
    registrations: &[Registration],
    matches: &[Match],
    config: &SwissConfig,
) -> HashMap<PlayerId, u32> {
    let mut counts: HashMap<PlayerId, u32> = HashMap::new();
    let mut rounds: Vec<u32> = matches.iter().map(|m| m.round_number).collect();
    rounds.sort_unstable();
    rounds.dedup();

    for &round_number in &rounds {
        let prior: Vec<Match> = matches
            .iter()
            .filter(|m| m.round_number < round_number)
            .cloned()
            .collect();
        for m in matches
            .iter()
            .filter(|m| m.round_number == round_number && !m.is_bye() && !m.is_loss_forfeit)
        {
            let Some(opponent) = m.player2_id else { continue };
            let my_points = aggregate(m.player1_id, &prior, config).match_points();
            let opp_points = aggregate(opponent, &prior, config).match_points();
            // Only the higher-bracket side paired down; the lower-bracket
            // side just received a pair-down pairing and was never carried.
            match my_points.cmp(&opp_points) {
                std::cmp::Ordering::Greater => {
                    *counts.entry(m.player1_id).or_insert(0) += 1;
                }
                std::cmp::Ordering::Less => {
                    *counts.entry(opponent).or_insert(0) += 1;
                }
                std::cmp::Ordering::Equal => {}
            }
        }
    }
    for r in registrations {
        counts.entry(r.player_id).or_insert(0);
    }
    counts
}

/// Groups rank-ordered standings into contiguous same-match-points runs.
fn form_brackets(standings: &[StandingsEntry]) -> Vec<Vec<StandingsEntry>> {
    let mut brackets: Vec<Vec<StandingsEntry>> = Vec::new();
    for entry in standings {
        match brackets.last_mut() {
            Some(last) if last[0].match_points == entry.match_points => last.push(entry.clone()),
            _ => brackets.push(vec![entry.clone()]),
        }
    }
    brackets
}

fn may_pair(
    a: PlayerId,
    b: PlayerId,
    history: &HashMap<PlayerId, HashSet<PlayerId>>,
    avoid_repeat_pairings: bool,
) -> bool {
    if !avoid_repeat_pairings {
        return true;
    }
    !history.get(&a).is_some_and(|opponents| opponents.contains(&b))
}

/// Greedy carry-over pairing within one pool (spec §4.D "Within-bracket
/// pairing"). Returns the pairs formed (with whether each is a pair-down)
/// and the players left unpaired, carried to the next bracket.
fn pair_pool(
    mut unpaired: Vec<Candidate>,
    history: &HashMap<PlayerId, HashSet<PlayerId>>,
    avoid_repeat_pairings: bool,
) -> (Vec<(Candidate, Candidate, bool)>, Vec<Candidate>) {
    let mut paired = Vec::new();
    let mut carried = Vec::new();

    while unpaired.len() >= 2 {
        let p = unpaired.remove(0);
        let partner_idx = unpaired.iter().position(|q| {
            may_pair(
                p.entry.registration.player_id,
                q.entry.registration.player_id,
                history,
                avoid_repeat_pairings,
            )
        });
        match partner_idx {
            Some(idx) => {
                let q = unpaired.remove(idx);
                let is_pair_down = p.origin_points != q.origin_points;
                paired.push((p, q, is_pair_down));
            }
            None => {
                carried.push(p);
            }
        }
    }
    carried.extend(unpaired);
    (paired, carried)
}

/// Tries recovery step 1 (spec §4.D "Impossible pairing recovery", step 1):
/// `stuck` has no compatible partner left in its own bracket. Look at the
/// immediately preceding bracket's already-emitted pairs; if `stuck` could
/// validly join one side of one of those pairs, dissolve that pair,
/// re-pair that side with `stuck`, and hand the displaced original partner
/// back as the new carry candidate — they lost their partner, but as a
/// different player they may have options in the next bracket that
/// `stuck` didn't have in this one.
fn try_adjacent_swap(
    prior_pairs: &mut [Pairing],
    stuck: &Candidate,
    ordered: &[StandingsEntry],
    history: &HashMap<PlayerId, HashSet<PlayerId>>,
    avoid_repeat_pairings: bool,
) -> Option<Candidate> {
    let stuck_id = stuck.entry.registration.player_id;
    for pairing in prior_pairs.iter_mut() {
        if pairing.is_bye {
            continue;
        }
        let Some(b_id) = pairing.player2_id else {
            continue;
        };
        let a_id = pairing.player1_id;
        for (keep_id, displaced_id) in [(a_id, b_id), (b_id, a_id)] {
            if keep_id == stuck_id || displaced_id == stuck_id {
                continue;
            }
            if !may_pair(keep_id, stuck_id, history, avoid_repeat_pairings) {
                continue;
            }
            let Some(displaced_entry) = ordered
                .iter()
                .find(|e| e.registration.player_id == displaced_id)
                .cloned()
            else {
                continue;
            };
            if keep_id == a_id {
                pairing.player2_id = Some(stuck_id);
            } else {
                pairing.player1_id = stuck_id;
            }
            pairing.is_pair_down = true;
            warn!(
                displaced_player = %displaced_id,
                stuck_player = %stuck_id,
                "impossible-pairing recovery: adjacent swap in prior bracket"
            );
            return Some(Candidate {
                origin_points: displaced_entry.match_points,
                entry: displaced_entry,
            });
        }
    }
    None
}

/// Round N ≥ 2: bracket pairing with no-rematch, pair-down, and bye-cap
/// enforcement, spec §4.D.
#[instrument(skip(registrations, matches, config))]
pub fn pair_round(
    tournament_id: Uuid,
    round_number: u32,
    registrations: &[Registration],
    matches: &[Match],
    config: &SwissConfig,
) -> EngineResult<PairingResult> {
    config.validate()?;
    validation::validate_input(registrations, matches)?;

    if round_number < 2 {
        return Err(SwissError::InvalidInput(
            "pair_round handles round >= 2; use pair_round_1 for the first round".into(),
        ));
    }

    let previous_round: Vec<Match> = matches
        .iter()
        .filter(|m| m.round_number == round_number - 1)
        .cloned()
        .collect();
    let previous_status = round::round_status_of(&previous_round);
    round::can_advance_to(round_number, previous_status, config.rounds)?;

    let active_ids: HashSet<PlayerId> = registrations
        .iter()
        .filter(|r| r.active_at(round_number))
        .map(|r| r.player_id)
        .collect();
    if active_ids.len() < 2 {
        return Err(SwissError::TooFewPlayers(format!(
            "{} eligible registrations for round {round_number}",
            active_ids.len()
        )));
    }

    let history = build_history(matches);
    let bye_counts = build_bye_counts(matches);
    let pair_down_counts = if config.track_pair_downs {
        build_pair_down_counts(registrations, matches, config)
    } else {
        HashMap::new()
    };

    let standings = calculate_standings(
        tournament_id,
        round_number - 1,
        registrations,
        matches,
        config,
        StandingsPurpose::Pairing,
    )?;
    let ordered: Vec<StandingsEntry> = standings
        .into_iter()
        .filter(|e| active_ids.contains(&e.registration.player_id))
        .collect();

    let brackets = form_brackets(&ordered);
    debug!(bracket_count = brackets.len(), "formed match-point brackets");

    let mut all_pairings: Vec<Pairing> = Vec::new();
    // Index range of the immediately preceding bracket's pairs in
    // `all_pairings`, kept so recovery step 1 can reach back into them.
    let mut last_bracket_range: Option<std::ops::Range<usize>> = None;
    let mut carry: Vec<Candidate> = Vec::new();
    let mut table_number = 1u32;

    for bracket in &brackets {
        let bracket_points = bracket[0].match_points;
        let mut pool: Vec<Candidate> = std::mem::take(&mut carry);
        pool.extend(bracket.iter().cloned().map(|entry| Candidate {
            entry,
            origin_points: bracket_points,
        }));

        let (paired, mut leftover) = pair_pool(pool, &history, config.avoid_repeat_pairings);

        // Recovery step 1: a single stuck player tries to displace one
        // side of a pair the previous bracket already emitted.
        if leftover.len() == 1 {
            if let Some(range) = last_bracket_range.clone() {
                let stuck = leftover[0].clone();
                if let Some(displaced) = try_adjacent_swap(
                    &mut all_pairings[range],
                    &stuck,
                    &ordered,
                    &history,
                    config.avoid_repeat_pairings,
                ) {
                    leftover = vec![displaced];
                }
            }
        }

        let start = all_pairings.len();
        for (p, q, is_pair_down) in paired {
            all_pairings.push(Pairing {
                round_number,
                player1_id: p.entry.registration.player_id,
                player2_id: Some(q.entry.registration.player_id),
                table_number: Some(table_number),
                is_pair_down,
                is_bye: false,
            });
            table_number += 1;
        }
        last_bracket_range = Some(start..all_pairings.len());

        // Pair-down fairness: order the carry so the next bracket's
        // greedy pass takes the least-carried player first, then the
        // weakest-ranked among equals (spec §4.D "Pair-down fairness").
        leftover.sort_by(|a, b| {
            let pa = pair_down_counts
                .get(&a.entry.registration.player_id)
                .copied()
                .unwrap_or(0);
            let pb = pair_down_counts
                .get(&b.entry.registration.player_id)
                .copied()
                .unwrap_or(0);
            pa.cmp(&pb).then_with(|| b.entry.rank.cmp(&a.entry.rank))
        });
        carry = leftover;
    }

    // Recovery step 2: allow one carry-down across two brackets. If more
    // than one player is left unresolved after the last bracket, retry
    // once with every bracket boundary flattened by one extra level.
    if carry.len() > 1 {
        warn!(
            stuck = carry.len(),
            "impossible-pairing recovery: retrying with two-bracket carry-down"
        );
        return pair_round_with_double_carry(
            tournament_id,
            round_number,
            &ordered,
            &history,
            &pair_down_counts,
            &bye_counts,
            config,
        );
    }

    finalize_bye(
        round_number,
        &ordered,
        carry.pop(),
        &mut all_pairings,
        &bye_counts,
        config,
        tournament_id,
    )?;

    Ok(PairingResult {
        pairings: all_pairings,
    })
}

/// Recovery step 2: re-run the whole pairing pass but merge every pair of
/// adjacent brackets into one pool before greedy-pairing, i.e. a carry may
/// now cross two match-point boundaries instead of one.
#[allow(clippy::too_many_arguments)]
fn pair_round_with_double_carry(
    tournament_id: Uuid,
    round_number: u32,
    ordered: &[StandingsEntry],
    history: &HashMap<PlayerId, HashSet<PlayerId>>,
    pair_down_counts: &HashMap<PlayerId, u32>,
    bye_counts: &HashMap<PlayerId, u32>,
    config: &SwissConfig,
) -> EngineResult<PairingResult> {
    let brackets = form_brackets(ordered);
    let merged: Vec<Vec<StandingsEntry>> = brackets
        .chunks(2)
        .map(|pair_of_brackets| pair_of_brackets.concat())
        .collect();

    let mut all_pairings: Vec<Pairing> = Vec::new();
    let mut carry: Vec<Candidate> = Vec::new();
    let mut table_number = 1u32;

    for bracket in &merged {
        let bracket_points = bracket[0].match_points;
        let mut pool: Vec<Candidate> = std::mem::take(&mut carry);
        pool.extend(bracket.iter().cloned().map(|entry| Candidate {
            entry,
            origin_points: bracket_points,
        }));
        let (paired, mut leftover) = pair_pool(pool, history, config.avoid_repeat_pairings);
        for (p, q, is_pair_down) in paired {
            all_pairings.push(Pairing {
                round_number,
                player1_id: p.entry.registration.player_id,
                player2_id: Some(q.entry.registration.player_id),
                table_number: Some(table_number),
                is_pair_down,
                is_bye: false,
            });
            table_number += 1;
        }
        leftover.sort_by(|a, b| {
            let pa = pair_down_counts
                .get(&a.entry.registration.player_id)
                .copied()
                .unwrap_or(0);
            let pb = pair_down_counts
                .get(&b.entry.registration.player_id)
                .copied()
                .unwrap_or(0);
            pa.cmp(&pb).then_with(|| b.entry.rank.cmp(&a.entry.rank))
        });
        carry = leftover;
    }

    if carry.len() > 1 {
        return Err(impossible_pairing(ordered, config));
    }

    finalize_bye(
        round_number,
        ordered,
        carry.pop(),
        &mut all_pairings,
        bye_counts,
        config,
        tournament_id,
    )?;

    Ok(PairingResult {
        pairings: all_pairings,
    })
}

fn impossible_pairing(ordered: &[StandingsEntry], config: &SwissConfig) -> SwissError {
    let mut suggestions = vec![RemediationSuggestion::EndSwissEarly];
    if let Some(lowest) = ordered.last() {
        suggestions.insert(
            0,
            RemediationSuggestion::DropPlayer {
                player_id: lowest.registration.player_id,
            },
        );
    }
    if ordered.len() >= 2 {
        suggestions.insert(
            1,
            RemediationSuggestion::AllowRematch {
                player1_id: ordered[ordered.len() - 1].registration.player_id,
                player2_id: ordered[ordered.len() - 2].registration.player_id,
            },
        );
    }
    let _ = config;
    SwissError::ImpossiblePairing {
        reason: "no-rematch constraint and the bye cap together cannot be satisfied for this round".into(),
        suggestions,
    }
}

/// Assigns the bye to the lone player left over after all brackets are
/// paired, enforcing `max_byes_per_player` and shifting the bye upward
/// when the natural recipient is already at the cap (spec §4.D "Bye
/// assignment among tied candidates").
#[allow(clippy::too_many_arguments)]
fn finalize_bye(
    round_number: u32,
    ordered: &[StandingsEntry],
    leftover: Option<Candidate>,
    all_pairings: &mut Vec<Pairing>,
    bye_counts: &HashMap<PlayerId, u32>,
    config: &SwissConfig,
    tournament_id: Uuid,
) -> EngineResult<()> {
    let Some(candidate) = leftover else {
        return Ok(());
    };
    let candidate_id = candidate.entry.registration.player_id;
    let is_eligible = |pid: PlayerId| {
        config
            .max_byes_per_player
            .is_none_or(|max| bye_counts.get(&pid).copied().unwrap_or(0) < max)
    };

    if is_eligible(candidate_id) {
        all_pairings.push(Pairing {
            round_number,
            player1_id: candidate_id,
            player2_id: None,
            table_number: None,
            is_pair_down: false,
            is_bye: true,
        });
        return Ok(());
    }

    // Shift: find the lowest-ranked bye-eligible player already paired
    // this round and swap them into the bye, re-pairing their former
    // opponent with the original (ineligible) candidate.
    let mut shift_candidates: Vec<usize> = all_pairings
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            !p.is_bye
                && p.player2_id.is_some()
                && (is_eligible(p.player1_id) || is_eligible(p.player2_id.unwrap()))
        })
        .map(|(idx, _)| idx)
        .collect();

    // The eligible side is the one that would actually receive the bye if
    // this pairing is dissolved; rank the candidates by *that* id, not by
    // `player1_id` — `pair_pool` always assigns the better-ranked remaining
    // player to `player1`, so the bye-cap-safe side is usually `player2`.
    let eligible_side_of = |pairing: &Pairing| {
        if is_eligible(pairing.player1_id) {
            pairing.player1_id
        } else {
            pairing.player2_id.unwrap()
        }
    };

    // Among tied ranks, honor the configured policy; both orderings land
    // on the lowest-ranked pairing first, so the policy mostly affects
    // which side of a genuine tie is picked.
    if config.bye_assignment == ByeAssignment::Random {
        let seed = derive_seed(&[config.seed, round_number as u64, 0xB1E]);
        let mut rng = rng_from_seed(seed);
        shift_candidates.shuffle(&mut rng);
    }
    shift_candidates.sort_by_key(|idx| {
        let p = &all_pairings[*idx];
        ordered
            .iter()
            .position(|e| e.registration.player_id == eligible_side_of(p))
            .unwrap_or(usize::MAX)
    });
    shift_candidates.reverse();

    for idx in shift_candidates {
        let pairing = all_pairings[idx].clone();
        let (eligible_side, other_side) = if is_eligible(pairing.player1_id) {
            (pairing.player1_id, pairing.player2_id.unwrap())
        } else {
            (pairing.player2_id.unwrap(), pairing.player1_id)
        };
        if other_side == candidate_id {
            continue;
        }
        all_pairings[idx] = Pairing {
            round_number,
            player1_id: other_side,
            player2_id: Some(candidate_id),
            table_number: pairing.table_number,
            is_pair_down: true,
            is_bye: false,
        };
        all_pairings.push(Pairing {
            round_number,
            player1_id: eligible_side,
            player2_id: None,
            table_number: None,
            is_pair_down: false,
            is_bye: true,
        });
        let _ = tournament_id;
        return Ok(());
    }

    Err(SwissError::ImpossiblePairing {
        reason: format!(
            "player {candidate_id} has no remaining opponent and is not eligible for a bye; \
             no bye-eligible player could be shifted in"
        ),
        suggestions: vec![
            RemediationSuggestion::DropPlayer {
                player_id: candidate_id,
            },
            RemediationSuggestion::EndSwissEarly,
        ],
    })
}
