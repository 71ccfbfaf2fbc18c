use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InteractionError {
    #[error("Unknown interaction model selector: {0} (expected 0-3)")]
    UnknownModel(u8),

    #[error("No continuous potential: the hard-disk-only model is selected")]
    NoContinuousPotential,
}
