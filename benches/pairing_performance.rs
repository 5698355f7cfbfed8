//! Performance benchmarks for the pairing and standings engine.
//!
//! Grounded on the teacher's `benches/pairing_performance.rs` shape
//! (`BenchmarkConfig` scaling over player counts, `criterion_group!`/
//! `criterion_main!`), adapted from its async/sqlite setup to synchronous
//! in-memory fixtures since this engine never touches I/O.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use uuid::Uuid;

use swiss_engine::{
    calculate_standings, mtg_standard, pair_round, pair_round_1, MatchId, PlayerId, Registration,
    RegistrationId, RegistrationStatus, StandingsPurpose,
};

struct BenchmarkConfig {
    player_counts: Vec<usize>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            player_counts: vec![8, 16, 32, 64, 128, 256, 512, 1024],
        }
    }
}

fn make_registrations(count: usize) -> Vec<Registration> {
    (0..count)
        .map(|i| Registration {
            registration_id: RegistrationId::new(),
            player_id: PlayerId::new(),
            sequence_id: (i + 1) as u32,
            status: RegistrationStatus::Active,
            drop_round: None,
            entry_round: None,
        })
        .collect()
}

/// Plays out `rounds` rounds of a full Swiss event for `registrations`,
/// alternating who wins each match so the bracket structure actually
/// shuffles between rounds instead of staying static.
fn play_rounds(
    tournament_id: Uuid,
    registrations: &[Registration],
    rounds: u32,
) -> Vec<swiss_engine::Match> {
    let config = mtg_standard(rounds, 7);
    let mut matches = Vec::new();

    let round1 = pair_round_1(registrations, &config).unwrap();
    matches.extend(close_out(&round1.pairings, 1));

    for round_number in 2..=rounds {
        let result = pair_round(
            tournament_id,
            round_number,
            registrations,
            &matches,
            &config,
        )
        .unwrap();
        matches.extend(close_out(&result.pairings, round_number));
    }
    matches
}

fn close_out(pairings: &[swiss_engine::Pairing], round_number: u32) -> Vec<swiss_engine::Match> {
    pairings
        .iter()
        .map(|p| swiss_engine::Match {
            match_id: MatchId::new(),
            round_number,
            player1_id: p.player1_id,
            player2_id: p.player2_id,
            player1_game_wins: if p.player2_id.is_some() { 2 } else { 2 },
            player2_game_wins: 0,
            draws: 0,
            table_number: p.table_number,
            end_time: Some(chrono::Utc::now()),
            is_loss_forfeit: false,
        })
        .collect()
}

fn bench_pair_round_1(c: &mut Criterion) {
    let config = BenchmarkConfig::default();
    let mut group = c.benchmark_group("pair_round_1");
    group.measurement_time(Duration::from_secs(5));

    for &count in &config.player_counts {
        let registrations = make_registrations(count);
        let engine_config = mtg_standard(5, 7);
        group.bench_with_input(BenchmarkId::new("players", count), &count, |b, _| {
            b.iter(|| black_box(pair_round_1(&registrations, &engine_config).unwrap()));
        });
    }
    group.finish();
}

fn bench_pair_round_n(c: &mut Criterion) {
    let config = BenchmarkConfig::default();
    let mut group = c.benchmark_group("pair_round_n");
    group.measurement_time(Duration::from_secs(10));

    for &count in &config.player_counts {
        let tournament_id = Uuid::new_v4();
        let registrations = make_registrations(count);
        let engine_config = mtg_standard(6, 7);
        let round1 = pair_round_1(&registrations, &engine_config).unwrap();
        let matches = close_out(&round1.pairings, 1);

        group.bench_with_input(BenchmarkId::new("players", count), &count, |b, _| {
            b.iter(|| {
                black_box(
                    pair_round(tournament_id, 2, &registrations, &matches, &engine_config)
                        .unwrap(),
                )
            });
        });
    }
    group.finish();
}

fn bench_full_tournament(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_tournament");
    group.measurement_time(Duration::from_secs(15));
    group.sample_size(10);

    for &count in &[32usize, 128, 512, 1024] {
        group.bench_with_input(BenchmarkId::new("players", count), &count, |b, &count| {
            b.iter(|| {
                let tournament_id = Uuid::new_v4();
                let registrations = make_registrations(count);
                black_box(play_rounds(tournament_id, &registrations, 6));
            });
        });
    }
    group.finish();
}

fn bench_standings(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_standings");
    group.measurement_time(Duration::from_secs(5));

    for &count in &[32usize, 128, 512, 1024] {
        let tournament_id = Uuid::new_v4();
        let registrations = make_registrations(count);
        let matches = play_rounds(tournament_id, &registrations, 5);
        let config = mtg_standard(5, 7);

        group.bench_with_input(BenchmarkId::new("players", count), &count, |b, _| {
            b.iter(|| {
                black_box(
                    calculate_standings(
                        tournament_id,
                        5,
                        &registrations,
                        &matches,
                        &config,
                        StandingsPurpose::Final,
                    )
                    .unwrap(),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_pair_round_1,
    bench_pair_round_n,
    bench_standings,
    bench_full_tournament
);
criterion_main!(benches);
