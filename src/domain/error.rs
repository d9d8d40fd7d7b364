#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("bus {bus} references undefined stop {stop}")]
    MissingStop { bus: String, stop: String },

    #[error("unknown stop {0}")]
    UnknownStop(String),

    #[error("no road distance known between {from} and {to}")]
    MissingDistance { from: String, to: String },

    #[error("invalid routing settings: {0}")]
    InvalidSettings(&'static str),

    #[error("edge {edge} has invalid weight {weight}")]
    InvalidWeight { edge: usize, weight: f64 },

    #[error("malformed input: {0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransitError>;
