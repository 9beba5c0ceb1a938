use thiserror::Error;

//=====================================================================
// Errors raised while building or querying reactions and distributions.
//=====================================================================
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    // Bad input data, surfaced at construction time
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("value {value:e} is outside of [{lower:e}, {upper:e}]")]
    OutOfBounds { value: f64, lower: f64, upper: f64 },

    #[error("the {0} model has not been implemented")]
    UnimplementedModel(&'static str),

    #[error("{distribution} rejection loop gave up after {trials} trials")]
    RejectionLimit {
        distribution: &'static str,
        trials: u64,
    },

    #[error("random number {0} is outside of [0, 1]")]
    InvalidRandomNumber(f64),
}

pub type Result<T> = std::result::Result<T, CollisionError>;

impl CollisionError {
    pub(crate) fn configuration<S: Into<String>>(message: S) -> Self {
        CollisionError::Configuration(message.into())
    }
}
