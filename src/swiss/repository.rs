//! The read-only contract the engine consumes, spec §6. Unlike the
//! teacher's `async fn`-per-operation `Db` trait (needed because it talks
//! to sqlite directly), this contract is synchronous: the engine never
//! blocks on I/O (spec §5), so an async repository implementation awaits
//! before calling in, not the other way around.

use crate::swiss::domain::model::{Match, Registration};
use uuid::Uuid;

pub trait TournamentRepository {
    fn list_registrations(&self, tournament_id: Uuid) -> Vec<Registration>;

    /// Matches with `round_number <= up_to_round`.
    fn list_matches(&self, tournament_id: Uuid, up_to_round: u32) -> Vec<Match>;
}
