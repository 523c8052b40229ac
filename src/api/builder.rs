use crate::adapters::Confirmer;
use crate::logging::{AuditSink, FactsEmitter};
use crate::types::RunConfig;

/// Builder for constructing a `Delinker` with ergonomic chaining.
pub struct ApiBuilder<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    config: RunConfig,
    confirmer: Option<Box<dyn Confirmer>>,
}

impl<E: FactsEmitter, A: AuditSink> ApiBuilder<E, A> {
    pub fn new(facts: E, audit: A, config: RunConfig) -> Self {
        Self {
            facts,
            audit,
            config,
            confirmer: None,
        }
    }

    pub fn confirmer(mut self, confirmer: Box<dyn Confirmer>) -> Self {
        self.confirmer = Some(confirmer);
        self
    }

    pub fn build(self) -> super::Delinker<E, A> {
        let api = super::Delinker::new(self.facts, self.audit, self.config);
        match self.confirmer {
            Some(c) => api.with_confirmer(c),
            None => api,
        }
    }
}
