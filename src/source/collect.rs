use std::fmt;

use super::ScoreSource;
use crate::error::LedgerError;
use crate::ledger::ParticipantLedger;

/// Non-fatal problems met while collecting sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceWarning {
    /// The source produced nothing; its events read as 0 for everyone.
    SourceUnavailable { source: String, reason: String },
    /// An observation was rejected by the ledger's identity policy.
    DuplicateIdentity { source: String, error: LedgerError },
}

impl fmt::Display for SourceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceWarning::SourceUnavailable { source, reason } => {
                write!(f, "source '{}' unavailable: {}", source, reason)
            }
            SourceWarning::DuplicateIdentity { source, error } => {
                write!(f, "source '{}': {}", source, error)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollectReport {
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub observations: usize,
    pub warnings: Vec<SourceWarning>,
}

impl CollectReport {
    /// True when sources were given but none of them could be read.
    pub fn all_failed(&self) -> bool {
        self.sources_ok == 0 && self.sources_failed > 0
    }
}

/// Read every source in turn and ingest each one as a contiguous batch.
pub fn collect<'a, I>(sources: I, ledger: &mut ParticipantLedger) -> CollectReport
where
    I: IntoIterator<Item = &'a dyn ScoreSource>,
{
    let mut report = CollectReport::default();

    for source in sources {
        let observations = match source.observations() {
            Ok(observations) => observations,
            Err(e) => {
                let warning = SourceWarning::SourceUnavailable {
                    source: source.name().to_string(),
                    reason: format!("{:#}", e),
                };
                tracing::warn!("{}", warning);
                report.sources_failed += 1;
                report.warnings.push(warning);
                continue;
            }
        };

        let count = observations.len();
        let rejected = ledger.ingest_batch(observations);
        tracing::debug!(
            source = source.name(),
            observations = count,
            rejected = rejected.len(),
            "ingested source"
        );

        report.sources_ok += 1;
        report.observations += count - rejected.len();
        for error in rejected {
            let warning = SourceWarning::DuplicateIdentity {
                source: source.name().to_string(),
                error,
            };
            tracing::warn!("{}", warning);
            report.warnings.push(warning);
        }
    }

    report
}
