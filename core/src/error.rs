use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarginError {
    #[error("root margin is empty")]
    Empty,
    #[error("root margin has {0} components, expected 1 to 4")]
    Arity(usize),
    #[error("invalid root margin component '{0}'")]
    Component(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} threshold {value} is outside 0..=1")]
    Threshold { field: &'static str, value: f64 },
    #[error("{field} must be greater than zero")]
    NonPositive { field: &'static str },
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("{field}: {source}")]
    Margin {
        field: &'static str,
        #[source]
        source: MarginError,
    },
    #[error("site config is not valid json: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    #[error("counter has no data-target")]
    MissingTarget,
    #[error("counter target '{0}' is not a non-negative integer")]
    InvalidTarget(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("Please enter your name.")]
    MissingName,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please enter a message.")]
    MissingMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    InFlight,
}
