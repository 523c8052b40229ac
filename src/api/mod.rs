// Facade for the API module; the pass itself lives in `run`.

use crate::adapters::{ConsoleConfirmer, Confirmer};
use crate::logging::{AuditSink, FactsEmitter};
use crate::types::{RunConfig, RunReport};

mod builder;
pub mod errors;
mod run;
pub mod summary;

pub use builder::ApiBuilder;

pub struct Delinker<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    config: RunConfig,
    confirmer: Box<dyn Confirmer>,
}

impl<E: FactsEmitter, A: AuditSink> Delinker<E, A> {
    pub fn new(facts: E, audit: A, config: RunConfig) -> Self {
        Self {
            facts,
            audit,
            config,
            confirmer: Box::new(ConsoleConfirmer),
        }
    }

    pub fn with_confirmer(mut self, confirmer: Box<dyn Confirmer>) -> Self {
        self.confirmer = confirmer;
        self
    }

    /// Scan, classify, and replace (or simulate) every eligible link under the
    /// configured root.
    ///
    /// Per-entry failures are recorded in the returned report and never stop
    /// the pass. A declined confirmation yields a `Cancelled` report.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRoot` before anything is scanned, or
    /// `ApiError::Prompt` when the confirmation answer cannot be read. In both
    /// cases nothing has been mutated.
    pub fn run(&self) -> Result<RunReport, errors::ApiError> {
        run::run(self)
    }
}
