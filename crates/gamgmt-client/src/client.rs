//! `ManagementClient`: memoized access to account summaries and metadata.
//!
//! Every request is memoized under a stable key (`accountSummaries`,
//! `columns`, `customMetrics:a:p`, `customDimensions:a:p`, `goals:a:p:v`).
//! `clear_cache` drops all of them.

use std::fmt::Display;
use std::sync::Arc;

use gamgmt_core::metadata::expand::{ColumnExpander, ExpansionContext};
use gamgmt_core::metadata::ColumnCatalog;
use gamgmt_core::model::{EntityId, TemplateSource};
use gamgmt_core::summaries::AccountSummaries;
use gamgmt_core::MgmtError;
use tracing::debug;

use crate::cache::Memo;
use crate::config::{validate_config, ClientConfig};
use crate::error::ClientResult;
use crate::metadata::{self as paths, columns_from_response, sources_from_response};
use crate::summaries::{self, fetch_account_summaries};
use crate::transport::{check_api_error, HttpTransport, ManagementTransport};

pub struct ManagementClient<T = HttpTransport> {
    transport: T,
    config: ClientConfig,
    expander: ColumnExpander,
    summaries: Memo<AccountSummaries>,
    catalogs: Memo<ColumnCatalog>,
    sources: Memo<Vec<TemplateSource>>,
}

impl ManagementClient<HttpTransport> {
    /// Client over HTTP.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(transport, config)
    }
}

impl<T: ManagementTransport> ManagementClient<T> {
    pub fn with_transport(transport: T, config: ClientConfig) -> ClientResult<Self> {
        validate_config(&config)?;
        let expander = ColumnExpander::with_config(&config.expansion)?;

        Ok(Self {
            transport,
            config,
            expander,
            summaries: Memo::new(),
            catalogs: Memo::new(),
            sources: Memo::new(),
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The full, indexed account summary list.
    ///
    /// With `no_cache` the memoized value is replaced by a fresh request.
    pub async fn account_summaries(&self, no_cache: bool) -> ClientResult<Arc<AccountSummaries>> {
        if no_cache {
            self.summaries.invalidate(summaries::CACHE_KEY);
        }
        self.summaries
            .get_or_try_init(summaries::CACHE_KEY, || {
                fetch_account_summaries(&self.transport, self.config.max_results)
            })
            .await
    }

    /// Raw column metadata, templates unexpanded.
    pub async fn metadata(&self) -> ClientResult<Arc<ColumnCatalog>> {
        self.catalogs
            .get_or_try_init(paths::COLUMNS_CACHE_KEY, || async {
                let query = [("reportType", paths::REPORT_TYPE.to_string())];
                let resp = self.transport.get_json(paths::COLUMNS_PATH, &query).await?;
                check_api_error(&resp)?;
                Ok(ColumnCatalog::new(columns_from_response(resp)?))
            })
            .await
    }

    /// Column metadata with templates expanded for one account, property and
    /// view.
    ///
    /// The four requests run concurrently; if any fails nothing is expanded.
    pub async fn authenticated_metadata(
        &self,
        account_id: impl Display,
        property_id: impl Display,
        view_id: impl Display,
        is_premium: bool,
    ) -> ClientResult<ColumnCatalog> {
        let (columns, custom_metrics, custom_dimensions, goals) = tokio::try_join!(
            self.metadata(),
            self.template_sources(
                paths::custom_metrics_key(&account_id, &property_id),
                paths::custom_metrics_path(&account_id, &property_id),
            ),
            self.template_sources(
                paths::custom_dimensions_key(&account_id, &property_id),
                paths::custom_dimensions_path(&account_id, &property_id),
            ),
            self.template_sources(
                paths::goals_key(&account_id, &property_id, &view_id),
                paths::goals_path(&account_id, &property_id, &view_id),
            ),
        )?;

        let ctx = ExpansionContext {
            custom_metrics: &custom_metrics,
            custom_dimensions: &custom_dimensions,
            goals: &goals,
            is_premium,
        };
        let report = self.expander.expand_with_report(columns.columns(), &ctx);
        debug!(
            account = %account_id,
            property = %property_id,
            view = %view_id,
            is_premium,
            columns = report.columns.len(),
            "expanded authenticated metadata"
        );
        Ok(ColumnCatalog::new(report.columns))
    }

    /// `authenticated_metadata` for a view, resolving its account, property
    /// and premium level from the account summaries.
    pub async fn metadata_for_view(&self, view_id: impl Into<EntityId>) -> ClientResult<ColumnCatalog> {
        let view_id = view_id.into();
        let summaries = self.account_summaries(false).await?;

        let (Some(account), Some(property)) = (
            summaries.get_account_by_view_id(&view_id),
            summaries.get_property_by_view_id(&view_id),
        ) else {
            return Err(MgmtError::invalid_argument(format!("unknown view id {view_id}")).into());
        };

        self.authenticated_metadata(&account.id, &property.id, &view_id, property.is_premium())
            .await
    }

    /// Drop every memoized response.
    pub fn clear_cache(&self) {
        self.summaries.clear();
        self.catalogs.clear();
        self.sources.clear();
        debug!("cleared request cache");
    }

    async fn template_sources(&self, key: String, path: String) -> ClientResult<Arc<Vec<TemplateSource>>> {
        self.sources
            .get_or_try_init(&key, || async {
                let resp = self.transport.get_json(&path, &[]).await?;
                check_api_error(&resp)?;
                sources_from_response(resp)
            })
            .await
    }
}
