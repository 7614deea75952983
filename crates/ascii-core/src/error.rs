use thiserror::Error;

/// Failures of the effect bridge. Each aborts the operation that raised it;
/// the host render loop keeps running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("no overlay container available to attach the effect to")]
    MissingContainer,
    #[error("character ramp must contain at least one glyph")]
    EmptyRamp,
    #[error("previous overlay could not be removed from its container")]
    DetachFailed,
    #[error("host rejected overlay operation: {0}")]
    Host(String),
}
