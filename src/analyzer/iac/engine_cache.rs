//! Per-engine-type cache of policy engines.
//!
//! Each engine type gets one `OnceCell`. The first caller builds the engine
//! through the loader; concurrent first callers wait on the same build rather
//! than starting a second one. A failed build leaves the cell empty.

use crate::analyzer::iac::policy_engine::{PolicyEngine, PolicyEngineLoader};
use crate::analyzer::iac::types::EngineType;
use crate::error::Result;
use tokio::sync::OnceCell;

pub struct PolicyEngineCache<L> {
    loader: L,
    engines: [OnceCell<PolicyEngine>; EngineType::COUNT],
}

impl<L: PolicyEngineLoader> PolicyEngineCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            engines: std::array::from_fn(|_| OnceCell::new()),
        }
    }

    /// Get the engine for `engine_type`, building it on first use.
    pub async fn get(&self, engine_type: EngineType) -> Result<&PolicyEngine> {
        self.engines[engine_type.index()]
            .get_or_try_init(|| self.loader.load(engine_type))
            .await
    }

    /// Build the engine for every engine type, one after another.
    pub async fn warm(&self) -> Result<()> {
        for engine_type in EngineType::ALL {
            self.get(engine_type).await?;
        }
        log::debug!("Policy engine cache warmed");
        Ok(())
    }

    pub fn is_built(&self, engine_type: EngineType) -> bool {
        self.engines[engine_type.index()].initialized()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::iac::policy_engine::{DEFAULT_ENTRYPOINT, EngineError};
    use crate::error::IacError;
    use futures_util::future::join_all;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const K8S_POLICY: &str = include_str!("../../../tests/fixtures/iac/policies/k8s_policy.rego");
    const K8S_DATA: &str = include_str!("../../../tests/fixtures/iac/policies/k8s_data.json");

    /// Loader that counts builds and yields once so concurrent callers overlap.
    #[derive(Default)]
    struct CountingLoader {
        builds: [AtomicUsize; EngineType::COUNT],
        fail: bool,
    }

    impl CountingLoader {
        fn builds(&self, engine_type: EngineType) -> usize {
            self.builds[engine_type.index()].load(Ordering::SeqCst)
        }
    }

    impl PolicyEngineLoader for CountingLoader {
        async fn load(&self, engine_type: EngineType) -> Result<PolicyEngine> {
            self.builds[engine_type.index()].fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;

            if self.fail {
                return Err(IacError::PolicyEngineBuild {
                    path: "missing".into(),
                    source: EngineError::Metadata("corrupt".to_string()),
                });
            }

            PolicyEngine::new(
                engine_type,
                "policy.rego",
                K8S_POLICY.to_string(),
                K8S_DATA,
                DEFAULT_ENTRYPOINT,
            )
            .map_err(|source| IacError::PolicyEngineBuild {
                path: "policy.rego".into(),
                source,
            })
        }
    }

    #[tokio::test]
    async fn test_get_is_memoized() {
        let cache = PolicyEngineCache::new(CountingLoader::default());
        assert!(!cache.is_built(EngineType::Kubernetes));

        let first = cache.get(EngineType::Kubernetes).await.unwrap();
        let second = cache.get(EngineType::Kubernetes).await.unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(cache.loader().builds(EngineType::Kubernetes), 1);
        assert_eq!(cache.loader().builds(EngineType::Terraform), 0);
        assert!(cache.is_built(EngineType::Kubernetes));
    }

    #[tokio::test]
    async fn test_concurrent_first_use_builds_once() {
        let cache = PolicyEngineCache::new(CountingLoader::default());

        let requests = (0..16).map(|i| {
            let engine_type = EngineType::ALL[i % 2];
            cache.get(engine_type)
        });
        let engines = join_all(requests).await;

        assert!(engines.iter().all(|engine| engine.is_ok()));
        assert_eq!(cache.loader().builds(EngineType::Kubernetes), 1);
        assert_eq!(cache.loader().builds(EngineType::Terraform), 1);
    }

    #[tokio::test]
    async fn test_warm_builds_every_engine() {
        let cache = PolicyEngineCache::new(CountingLoader::default());
        cache.warm().await.unwrap();

        for engine_type in EngineType::ALL {
            assert!(cache.is_built(engine_type));
            assert_eq!(cache.loader().builds(engine_type), 1);
            assert_eq!(
                cache.get(engine_type).await.unwrap().engine_type(),
                engine_type
            );
        }
    }

    #[tokio::test]
    async fn test_failed_build_is_fatal_and_not_cached() {
        let cache = PolicyEngineCache::new(CountingLoader {
            fail: true,
            ..Default::default()
        });

        let err = cache.warm().await.unwrap_err();
        assert!(matches!(err, IacError::PolicyEngineBuild { .. }));
        assert!(!cache.is_built(EngineType::Kubernetes));
        // Warm stops at the first failure.
        assert_eq!(cache.loader().builds(EngineType::Terraform), 0);
    }
}
