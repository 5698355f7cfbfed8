use super::error::SwissError;

pub type EngineResult<T> = std::result::Result<T, SwissError>;
