//! Property-based invariants, spec §8. Each property drives a fresh
//! simulated tournament through the public engine entry points and checks
//! the quantified invariant holds over every round actually produced — an
//! `ImpossiblePairing` result ends the simulation early rather than failing
//! the property, since spec §8's boundary behaviors document that outcome
//! as expected once history is exhausted.

mod common;

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use uuid::Uuid;

use common::{active_reg, close_out};
use swiss_engine::{
    calculate_standings, mtg_standard, pair_round, pair_round_1, Match, Pairing, PlayerId,
    Registration, StandingsPurpose, SwissConfig,
};

fn make_players(n: usize) -> Vec<Registration> {
    (0..n)
        .map(|i| active_reg(PlayerId::new(), (i + 1) as u32))
        .collect()
}

/// Plays as many rounds as succeed (stopping at the first `ImpossiblePairing`
/// or at `rounds`), returning every pairing set produced and the full match
/// history accumulated along the way.
fn simulate(
    tournament_id: Uuid,
    regs: &[Registration],
    config: &SwissConfig,
    rounds: u32,
) -> (Vec<Vec<Pairing>>, Vec<Match>) {
    let mut matches: Vec<Match> = Vec::new();
    let mut per_round = Vec::new();

    let round1 = match pair_round_1(regs, config) {
        Ok(r) => r,
        Err(_) => return (per_round, matches),
    };
    matches.extend(close_out(&round1.pairings, 1, config));
    per_round.push(round1.pairings);

    for round_number in 2..=rounds {
        match pair_round(tournament_id, round_number, regs, &matches, config) {
            Ok(result) => {
                matches.extend(close_out(&result.pairings, round_number, config));
                per_round.push(result.pairings);
            }
            Err(_) => break,
        }
    }

    (per_round, matches)
}

fn pairing_key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Invariant 1 (no rematches): across every round actually produced, no
    /// unordered pair of players appears together in two non-bye pairings.
    #[test]
    fn no_rematches(n in 4usize..12, rounds in 1u32..4, seed in any::<u64>()) {
        let regs = make_players(n);
        let config = mtg_standard(rounds, seed);
        let tournament_id = Uuid::new_v4();
        let (per_round, _matches) = simulate(tournament_id, &regs, &config, rounds);

        let mut seen: HashSet<(PlayerId, PlayerId)> = HashSet::new();
        for round in &per_round {
            for pairing in round {
                if let Some(p2) = pairing.player2_id {
                    let key = pairing_key(pairing.player1_id, p2);
                    prop_assert!(seen.insert(key), "pair {:?} repeated across rounds", key);
                }
            }
        }
    }

    /// Invariant 2 (bye cap): no player ever accumulates more byes than
    /// `max_byes_per_player`.
    #[test]
    fn bye_cap_respected(n in 4usize..12, rounds in 1u32..4, seed in any::<u64>()) {
        let regs = make_players(n);
        let config = mtg_standard(rounds, seed);
        let tournament_id = Uuid::new_v4();
        let (per_round, _matches) = simulate(tournament_id, &regs, &config, rounds);

        let mut byes: HashMap<PlayerId, u32> = HashMap::new();
        for round in &per_round {
            for pairing in round {
                if pairing.is_bye {
                    *byes.entry(pairing.player1_id).or_insert(0) += 1;
                }
            }
        }
        let max = config.max_byes_per_player.unwrap_or(u32::MAX);
        for (player, count) in byes {
            prop_assert!(count <= max, "player {:?} received {} byes (max {})", player, count, max);
        }
    }

    /// Invariant 3 (completeness): every round's pairings cover every active
    /// registration exactly once.
    #[test]
    fn completeness_per_round(n in 4usize..12, rounds in 1u32..4, seed in any::<u64>()) {
        let regs = make_players(n);
        let config = mtg_standard(rounds, seed);
        let tournament_id = Uuid::new_v4();
        let (per_round, _matches) = simulate(tournament_id, &regs, &config, rounds);

        let active: HashSet<PlayerId> = regs.iter().map(|r| r.player_id).collect();
        for round in &per_round {
            let mut seen: Vec<PlayerId> = Vec::new();
            for pairing in round {
                seen.push(pairing.player1_id);
                if let Some(p2) = pairing.player2_id {
                    seen.push(p2);
                }
            }
            let seen_set: HashSet<PlayerId> = seen.iter().copied().collect();
            prop_assert_eq!(seen.len(), seen_set.len(), "a player appears twice in one round");
            prop_assert_eq!(&seen_set, &active, "round does not cover every active registration exactly once");
        }
    }

    /// Invariant 4 + 5 (monotone rank, total order): higher match points
    /// strictly outrank lower ones, and every standings entry has a
    /// distinct rank after the full tiebreaker chain.
    #[test]
    fn standings_are_monotone_and_total(n in 4usize..12, rounds in 1u32..4, seed in any::<u64>()) {
        let regs = make_players(n);
        let config = mtg_standard(rounds, seed);
        let tournament_id = Uuid::new_v4();
        let (_per_round, matches) = simulate(tournament_id, &regs, &config, rounds);

        let standings = calculate_standings(
            tournament_id,
            rounds,
            &regs,
            &matches,
            &config,
            StandingsPurpose::Final,
        )
        .unwrap();

        for a in &standings {
            for b in &standings {
                if a.registration.player_id == b.registration.player_id {
                    continue;
                }
                if a.match_points > b.match_points {
                    prop_assert!(a.rank < b.rank, "higher match points must outrank lower ones");
                }
            }
        }

        let mut ranks: Vec<u32> = standings.iter().map(|e| e.rank).collect();
        ranks.sort_unstable();
        ranks.dedup();
        prop_assert_eq!(ranks.len(), standings.len(), "standings must form a total order");
    }

    /// Invariant 7 (determinism): identical config (including seed) and
    /// identical inputs produce bit-identical pairings and standings.
    #[test]
    fn deterministic_given_same_seed(n in 4usize..12, rounds in 1u32..4, seed in any::<u64>()) {
        let regs = make_players(n);
        let config = mtg_standard(rounds, seed);
        let tournament_id = Uuid::new_v4();

        let (first_rounds, first_matches) = simulate(tournament_id, &regs, &config, rounds);
        let (second_rounds, second_matches) = simulate(tournament_id, &regs, &config, rounds);
        prop_assert_eq!(first_rounds, second_rounds);
        prop_assert_eq!(&first_matches.len(), &second_matches.len());

        if let (Ok(a), Ok(b)) = (
            calculate_standings(tournament_id, rounds, &regs, &first_matches, &config, StandingsPurpose::Final),
            calculate_standings(tournament_id, rounds, &regs, &second_matches, &config, StandingsPurpose::Final),
        ) {
            prop_assert_eq!(a, b);
        }
    }
}

/// Invariant 6 (bye-exclusion): a player whose only history is byes has
/// OMW% = 0 and OGW% = 0. Exercised with a direct, non-randomized fixture
/// since a property generator can't reliably steer the engine into
/// producing a bye-only history for an arbitrary player.
#[test]
fn bye_only_history_excluded_from_opponent_win_percentages() {
    let lone = PlayerId::new();
    let regs = vec![active_reg(lone, 1)];
    let config = mtg_standard(3, 1);
    let tournament_id = Uuid::new_v4();
    let bye = Match {
        match_id: swiss_engine::MatchId::new(),
        round_number: 1,
        player1_id: lone,
        player2_id: None,
        player1_game_wins: config.bye_points.wins,
        player2_game_wins: 0,
        draws: config.bye_points.draws,
        table_number: None,
        end_time: Some(chrono::Utc::now()),
        is_loss_forfeit: false,
    };
    let standings = calculate_standings(
        tournament_id,
        1,
        &regs,
        &[bye],
        &config,
        StandingsPurpose::Final,
    )
    .unwrap();
    let entry = &standings[0];
    let omw = entry.tiebreakers.iter().find(|(k, _)| k == "omw").unwrap().1;
    let ogw = entry.tiebreakers.iter().find(|(k, _)| k == "ogw").unwrap().1;
    assert_eq!(omw, 0.0);
    assert_eq!(ogw, 0.0);
}
