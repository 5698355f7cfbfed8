//! Shared fixtures for the scripted scenario tests (spec §8), mirroring the
//! teacher's `tests/integration.rs` top-level scripted-flow style: build a
//! registration list, drive several rounds through the public engine entry
//! points, and assert on the resulting `Pairing`/`StandingsEntry` values
//! directly rather than through a command layer.

use chrono::Utc;
use swiss_engine::{
    Match, MatchId, Pairing, PlayerId, Registration, RegistrationId, RegistrationStatus,
    SwissConfig,
};

pub fn active_reg(player_id: PlayerId, sequence_id: u32) -> Registration {
    Registration {
        registration_id: RegistrationId::new(),
        player_id,
        sequence_id,
        status: RegistrationStatus::Active,
        drop_round: None,
        entry_round: None,
    }
}

pub fn late_entry_reg(player_id: PlayerId, sequence_id: u32, entry_round: u32) -> Registration {
    Registration {
        registration_id: RegistrationId::new(),
        player_id,
        sequence_id,
        status: RegistrationStatus::LateEntry,
        drop_round: None,
        entry_round: Some(entry_round),
    }
}

pub fn played(round: u32, p1: PlayerId, p2: PlayerId, p1w: u32, p2w: u32) -> Match {
    Match {
        match_id: MatchId::new(),
        round_number: round,
        player1_id: p1,
        player2_id: Some(p2),
        player1_game_wins: p1w,
        player2_game_wins: p2w,
        draws: 0,
        table_number: Some(1),
        end_time: Some(Utc::now()),
        is_loss_forfeit: false,
    }
}

pub fn unfinished(round: u32, p1: PlayerId, p2: PlayerId) -> Match {
    Match {
        match_id: MatchId::new(),
        round_number: round,
        player1_id: p1,
        player2_id: Some(p2),
        player1_game_wins: 1,
        player2_game_wins: 0,
        draws: 0,
        table_number: Some(1),
        end_time: None,
        is_loss_forfeit: false,
    }
}

/// Closes out a round's pairings by always crediting `player1` the win (or
/// the configured bye score for a bye) — combined with the engine always
/// placing the higher-ranked unpaired player as `player1` in a carry-over
/// pairing (`pair_pool`'s `unpaired.remove(0)`) and round 1's seeded mode
/// pairing ascending sequence order, this keeps the top seed undefeated,
/// matching spec §8 scenario S2's "P1, P3, P5, P7 all win 2-0" shape.
pub fn close_out(pairings: &[Pairing], round_number: u32, config: &SwissConfig) -> Vec<Match> {
    pairings
        .iter()
        .map(|p| {
            if p.is_bye {
                Match {
                    match_id: MatchId::new(),
                    round_number,
                    player1_id: p.player1_id,
                    player2_id: None,
                    player1_game_wins: config.bye_points.wins,
                    player2_game_wins: 0,
                    draws: config.bye_points.draws,
                    table_number: None,
                    end_time: Some(Utc::now()),
                    is_loss_forfeit: false,
                }
            } else {
                played(round_number, p.player1_id, p.player2_id.unwrap(), 2, 0)
            }
        })
        .collect()
}
