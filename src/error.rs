/// Failures local to a single dashboard query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("player not found: {0}")]
    PlayerNotFound(String),
    #[error("unknown statistic: {0}")]
    UnknownStatistic(String),
    #[error("unknown surface: {0}")]
    UnknownSurface(String),
    #[error("invalid year range: {start} > {end}")]
    InvalidYearRange { start: i32, end: i32 },
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;
