use thiserror::Error;

/// One of the three operator-facing remediations spec §4.D lists for an
/// `ImpossiblePairing` result.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RemediationSuggestion {
    DropPlayer { player_id: crate::swiss::domain::model::PlayerId },
    AllowRematch { player1_id: crate::swiss::domain::model::PlayerId, player2_id: crate::swiss::domain::model::PlayerId },
    EndSwissEarly,
}

/// Global error for all Swiss engine operations, spec §7.
#[derive(Debug, Error)]
pub enum SwissError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("too few players: {0}")]
    TooFewPlayers(String),

    #[error("impossible pairing: {reason}")]
    ImpossiblePairing {
        reason: String,
        suggestions: Vec<RemediationSuggestion>,
    },

    #[error("round not ready: {0}")]
    RoundNotReady(String),

    /// Distinguishes "this tournament can't proceed" from "the engine is
    /// broken": raised only when an invariant is violated after the engine
    /// itself produced a result, never for ordinary input problems.
    #[error("internal consistency error: {0}")]
    InternalConsistencyError(String),
}
