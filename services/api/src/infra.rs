use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use vendor_intake::config::{StoreBackend, StoreConfig};
use vendor_intake::error::AppError;
use vendor_intake::workflows::onboarding::{
    seed, InMemoryStore, SeedOutcome, VendorOnboardingService,
};

pub(crate) type MemoryService = VendorOnboardingService<InMemoryStore, InMemoryStore, InMemoryStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) persistence_enabled: bool,
}

pub(crate) fn service_over(store: &InMemoryStore) -> MemoryService {
    VendorOnboardingService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    )
}

/// Open the configured store, seeding it when asked to.
pub(crate) fn open_store(backend: &StoreBackend, seed_on_start: bool) -> Result<InMemoryStore, AppError> {
    let store = match backend {
        StoreBackend::Memory => InMemoryStore::new(),
    };
    if seed_on_start {
        match seed(&store)? {
            SeedOutcome::Seeded {
                users,
                vendors,
                requests,
            } => info!(users, vendors, requests, "store seeded on start"),
            SeedOutcome::AlreadyPresent => info!("store already holds data, seed skipped"),
        }
    }
    Ok(store)
}

/// Onboarding service for the configured store, or `None` when persistence is disabled.
pub(crate) fn onboarding_service(
    config: &StoreConfig,
) -> Result<Option<Arc<MemoryService>>, AppError> {
    let Some(backend) = config.backend.as_ref() else {
        return Ok(None);
    };
    let store = open_store(backend, config.seed_on_start)?;
    Ok(Some(Arc::new(service_over(&store))))
}
