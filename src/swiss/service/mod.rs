pub mod aggregator;
pub mod pairing;
pub mod rng;
pub mod round;
pub mod standings;
pub mod tiebreak;
pub mod validation;
