//! Scan orchestration: evaluate parsed documents against their policy engines.
//!
//! Engines are warmed before any evaluation starts. Evaluations are then
//! driven concurrently on the current task and awaited together. Result
//! order follows input order, and each result also carries its input
//! position explicitly.

use crate::analyzer::iac::engine_cache::PolicyEngineCache;
use crate::analyzer::iac::policy_engine::PolicyEngineLoader;
use crate::analyzer::iac::types::{
    FailedIacFileParse, IacFileScanResult, ParsedIacFile, PolicyMetadata,
};
use crate::error::{IacError, Result};
use futures_util::future::{join_all, try_join_all};

pub struct IacScanner<L> {
    engines: PolicyEngineCache<L>,
}

impl<L: PolicyEngineLoader> IacScanner<L> {
    pub fn new(engines: PolicyEngineCache<L>) -> Self {
        Self { engines }
    }

    pub fn engines(&self) -> &PolicyEngineCache<L> {
        &self.engines
    }

    /// Scan every document. The first evaluation failure fails the whole batch.
    pub async fn scan_files_for_issues(
        &self,
        parsed_files: Vec<ParsedIacFile>,
    ) -> Result<Vec<IacFileScanResult>> {
        self.engines.warm().await?;

        let violations = try_join_all(parsed_files.iter().map(|file| self.scan_file(file))).await?;

        let results: Vec<IacFileScanResult> = parsed_files
            .into_iter()
            .zip(violations)
            .enumerate()
            .map(|(position, (parsed, violated_policies))| IacFileScanResult {
                parsed,
                violated_policies,
                position,
            })
            .collect();

        log::info!("Scanned {} document(s)", results.len());
        Ok(results)
    }

    /// Scan every document, recording evaluation failures per document.
    ///
    /// A document whose evaluation fails becomes an unscanned file and the
    /// rest of the batch is still reported. Engine construction failures
    /// remain fatal.
    pub async fn scan_files_isolated(
        &self,
        parsed_files: Vec<ParsedIacFile>,
    ) -> Result<(Vec<IacFileScanResult>, Vec<FailedIacFileParse>)> {
        self.engines.warm().await?;

        let outcomes = join_all(parsed_files.iter().map(|file| self.scan_file(file))).await;

        let mut scanned = Vec::new();
        let mut failed = Vec::new();
        for (position, (parsed, outcome)) in parsed_files.into_iter().zip(outcomes).enumerate() {
            match outcome {
                Ok(violated_policies) => scanned.push(IacFileScanResult {
                    parsed,
                    violated_policies,
                    position,
                }),
                Err(err @ IacError::PolicyEvaluation { .. }) => {
                    let reason = match parsed.doc_id {
                        Some(doc_id) => format!("{} (document {})", err, doc_id),
                        None => err.to_string(),
                    };
                    log::warn!("{}", reason);
                    failed.push(FailedIacFileParse::from_scan_failure(parsed.file, reason));
                }
                Err(err) => return Err(err),
            }
        }

        log::info!(
            "Scanned {} document(s), {} failed evaluation",
            scanned.len(),
            failed.len()
        );
        Ok((scanned, failed))
    }

    async fn scan_file(&self, file: &ParsedIacFile) -> Result<Vec<PolicyMetadata>> {
        let engine = self.engines.get(file.engine_type).await?;
        engine
            .evaluate(&file.json_content)
            .map_err(|reason| IacError::PolicyEvaluation {
                path: file.file.file_path.clone(),
                reason,
            })
    }
}
