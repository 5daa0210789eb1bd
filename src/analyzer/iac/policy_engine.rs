//! Policy evaluation backed by the `regorus` Rego interpreter.
//!
//! A `PolicyEngine` is built once per engine type from two artifacts in the
//! local cache: the policy module and a JSON metadata object that is loaded
//! as `data`. Evaluating a document runs the configured entrypoint rule with
//! the document as `input`; the rule's value is the list of violations.

use crate::analyzer::iac::local_cache::LocalCache;
use crate::analyzer::iac::types::{EngineType, PolicyMetadata};
use crate::error::{IacError, Result};
use std::fmt;
use std::future::Future;
use std::path::Path;
use thiserror::Error;

/// Rule evaluated for every document unless configured otherwise.
pub const DEFAULT_ENTRYPOINT: &str = "data.rules.deny";

/// Why a policy engine could not be built from its artifacts.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid policy module: {0}")]
    Policy(String),

    #[error("invalid policy metadata: {0}")]
    Metadata(String),
}

/// A loaded policy for a single engine type. Never mutated after construction.
#[derive(Clone)]
pub struct PolicyEngine {
    engine_type: EngineType,
    engine: regorus::Engine,
    entrypoint: String,
}

impl PolicyEngine {
    /// Build an engine from the policy source and its metadata document.
    ///
    /// `policy_name` only labels the module in interpreter diagnostics.
    pub fn new(
        engine_type: EngineType,
        policy_name: &str,
        policy_source: String,
        metadata_json: &str,
        entrypoint: impl Into<String>,
    ) -> std::result::Result<Self, EngineError> {
        let mut engine = regorus::Engine::new();
        engine
            .add_policy(policy_name.to_string(), policy_source)
            .map_err(|e| EngineError::Policy(e.to_string()))?;

        let metadata: serde_json::Value = serde_json::from_str(metadata_json)
            .map_err(|e| EngineError::Metadata(e.to_string()))?;
        if !metadata.is_object() {
            return Err(EngineError::Metadata(
                "expected a JSON object at the top level".to_string(),
            ));
        }
        let data = regorus::Value::from_json_str(metadata_json)
            .map_err(|e| EngineError::Metadata(e.to_string()))?;
        engine
            .add_data(data)
            .map_err(|e| EngineError::Metadata(e.to_string()))?;

        Ok(Self {
            engine_type,
            engine,
            entrypoint: entrypoint.into(),
        })
    }

    pub fn engine_type(&self) -> EngineType {
        self.engine_type
    }

    /// Evaluate one document and return the violations it triggers.
    ///
    /// An undefined entrypoint means no violations. Any other value must be a
    /// list (or set) of violation objects.
    pub fn evaluate(
        &self,
        input: &serde_json::Value,
    ) -> std::result::Result<Vec<PolicyMetadata>, String> {
        let input = regorus::Value::from_json_str(&input.to_string()).map_err(|e| e.to_string())?;

        let mut engine = self.engine.clone();
        engine.set_input(input);
        let value = engine
            .eval_rule(self.entrypoint.clone())
            .map_err(|e| e.to_string())?;

        if value == regorus::Value::Undefined {
            return Ok(Vec::new());
        }

        let json = value.to_json_str().map_err(|e| e.to_string())?;
        serde_json::from_str(&json)
            .map_err(|e| format!("unexpected result from {}: {}", self.entrypoint, e))
    }
}

impl fmt::Debug for PolicyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyEngine")
            .field("engine_type", &self.engine_type)
            .field("entrypoint", &self.entrypoint)
            .finish_non_exhaustive()
    }
}

/// Builds policy engines on demand for the engine cache.
pub trait PolicyEngineLoader {
    fn load(&self, engine_type: EngineType) -> impl Future<Output = Result<PolicyEngine>>;
}

/// Loads policy artifacts from the local cache directory.
#[derive(Debug, Clone)]
pub struct LocalCacheLoader {
    cache: LocalCache,
    entrypoint: String,
}

impl LocalCacheLoader {
    pub fn new(cache: LocalCache, entrypoint: impl Into<String>) -> Self {
        Self {
            cache,
            entrypoint: entrypoint.into(),
        }
    }
}

impl PolicyEngineLoader for LocalCacheLoader {
    async fn load(&self, engine_type: EngineType) -> Result<PolicyEngine> {
        let (policy_path, metadata_path) = self.cache.policy_paths(engine_type);

        let policy_source = read_artifact(&policy_path).await?;
        let metadata = read_artifact(&metadata_path).await?;

        let policy_name = policy_path.display().to_string();
        let engine = PolicyEngine::new(
            engine_type,
            &policy_name,
            policy_source,
            &metadata,
            self.entrypoint.clone(),
        )
        .map_err(|source| {
            // Name the artifact that could not be loaded.
            let path = match source {
                EngineError::Metadata(_) => metadata_path.clone(),
                EngineError::Policy(_) | EngineError::Io(_) => policy_path.clone(),
            };
            IacError::PolicyEngineBuild { path, source }
        })?;

        log::info!(
            "Built {} policy engine from {}",
            engine.engine_type(),
            self.cache.dir().display()
        );
        Ok(engine)
    }
}

async fn read_artifact(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| IacError::PolicyEngineBuild {
            path: path.to_path_buf(),
            source: EngineError::Io(e),
        })
}
