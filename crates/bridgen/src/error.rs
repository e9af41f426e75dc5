use crate::config::ConfigError;
use crate::source::SourceError;
use bridgen_batch::BatchError;
use bridgen_typegen::GatherError;

/// Errors returned by the bridgen facade.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("documentation: {0}")]
    Docs(#[from] BatchError<SourceError>),
    #[error(transparent)]
    Gather(#[from] GatherError),
}
