//! FlowBuilder for assembling an enrollment flow

use super::{EnrollmentFlow, FlowPhase};
use crate::config::{EnrollmentConfig, StoreConfig};
use crate::core::error::EnrollError;
use crate::core::record::Provenance;
use crate::core::state::EnrollmentState;
use crate::core::view::EnrollmentView;
use crate::storage::{EnrollmentStore, UnavailableStore};
use std::sync::Arc;
use uuid::Uuid;

/// Builder for an [`EnrollmentFlow`]
///
/// Without an explicit store the builder connects to the remote store
/// described by the configuration. When that is impossible the flow still
/// builds: the view shows the store warning and every submission fails fast.
///
/// # Example
///
/// ```ignore
/// let flow = EnrollmentFlow::builder(view)
///     .with_config(EnrollmentConfig::from_yaml_file("enroll.yaml")?)
///     .with_provenance(Provenance::new(page_url, user_agent))
///     .build()?;
/// ```
pub struct FlowBuilder<V: EnrollmentView> {
    view: V,
    config: EnrollmentConfig,
    store: Option<Arc<dyn EnrollmentStore>>,
    provenance: Provenance,
}

impl<V: EnrollmentView> FlowBuilder<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            config: EnrollmentConfig::default_config(),
            store: None,
            provenance: Provenance::default(),
        }
    }

    /// Use this configuration instead of the defaults
    pub fn with_config(mut self, config: EnrollmentConfig) -> Self {
        self.config = config;
        self
    }

    /// Persist into `store` instead of connecting from the configuration
    pub fn with_store(mut self, store: impl EnrollmentStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Share an existing store handle
    pub fn with_shared_store(mut self, store: Arc<dyn EnrollmentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Validate the configuration and assemble the flow
    pub fn build(mut self) -> Result<EnrollmentFlow<V>, EnrollError> {
        self.config.validate()?;

        let store = match self.store.take() {
            Some(store) => store,
            None => connect(&self.config.store, &mut self.view),
        };

        Ok(EnrollmentFlow {
            phase: FlowPhase::Idle,
            state: EnrollmentState::new(),
            catalog: self.config.catalog(),
            payment_method: self.config.payment_method,
            timeout: self.config.store.timeout(),
            provenance: self.provenance,
            view: self.view,
            store,
            attempt_id: Uuid::new_v4(),
        })
    }
}

fn connect<V: EnrollmentView>(config: &StoreConfig, view: &mut V) -> Arc<dyn EnrollmentStore> {
    if !config.has_credentials() {
        tracing::warn!("Remote store credentials not configured");
        view.show_store_warning();
        return Arc::new(UnavailableStore::new("credentials not configured"));
    }

    #[cfg(feature = "rest-store")]
    {
        match crate::storage::RestEnrollmentStore::from_config(config) {
            Ok(store) => {
                tracing::info!(table = %config.table, "Remote store initialized");
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to initialize remote store");
                view.show_store_warning();
                Arc::new(UnavailableStore::new(e.to_string()))
            }
        }
    }

    #[cfg(not(feature = "rest-store"))]
    {
        tracing::warn!("Built without a remote store client");
        view.show_store_warning();
        Arc::new(UnavailableStore::new("remote store client not compiled in"))
    }
}
