//! Configuration loading and management
//!
//! A [`ServiceConfig`] starts from defaults, is optionally replaced by a YAML
//! file named by `ORDER_SERVICE_CONFIG`, and is then overridden field by field
//! from environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `ORDER_SERVICE_ADDR` | `addr` |
//! | `ORDER_STORE` | `store` (`in_memory` / `postgres`) |
//! | `DATABASE_URL` | `database_url` |
//! | `PRIORITY_POLICY` | `priority_policy` (`daily_sequence` / `unassigned`) |
//! | `TIME_ZONE` | `time_zone` (IANA name such as `America/Sao_Paulo`) |
//! | `UTC_OFFSET_MINUTES` | `utc_offset_minutes` |
//! | `NOTIFIER` | `notification.kind` (`log` / `event_bus` / `webhook`) |
//! | `NOTIFICATION_CHANNEL` | `notification.channel` |
//! | `NOTIFICATION_DISPATCH` | `notification.dispatch` (`inline` / `background`) |
//! | `WEBHOOK_URL` | `notification.webhook_url` |
//! | `SEED_ENDPOINT` | `seed_endpoint` |
//!
//! Unparsable environment values are logged and ignored.

use crate::core::events::EventBus;
use crate::core::notify::{EventBusNotifier, LogNotifier, Notifier};
use crate::core::priority::{DayZone, PriorityPolicy, PriorityRule};
use crate::core::service::DispatchMode;
use crate::core::store::OrderStore;
use crate::server::ServerBuilder;
use crate::storage::InMemoryOrderStore;
use anyhow::{Result, anyhow};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

/// Environment variable naming the optional YAML config file
pub const CONFIG_PATH_VAR: &str = "ORDER_SERVICE_CONFIG";

/// Which persistence backend the service runs on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    InMemory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in_memory" | "in-memory" | "memory" => Ok(StoreBackend::InMemory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Which notifier delivers finish notifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierKind {
    #[default]
    Log,
    EventBus,
    Webhook,
}

impl FromStr for NotifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(NotifierKind::Log),
            "event_bus" | "event-bus" | "bus" => Ok(NotifierKind::EventBus),
            "webhook" => Ok(NotifierKind::Webhook),
            other => Err(format!("unknown notifier '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub kind: NotifierKind,
    pub channel: String,
    pub dispatch: DispatchMode,
    pub webhook_url: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            kind: NotifierKind::default(),
            channel: "whatsapp".to_string(),
            dispatch: DispatchMode::default(),
            webhook_url: None,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listen address
    pub addr: String,
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub priority_policy: PriorityPolicy,
    /// Zone defining the calendar day; the host's zone when absent
    pub time_zone: Option<String>,
    /// Constant offset, takes precedence over `time_zone`
    pub utc_offset_minutes: Option<i32>,
    pub notification: NotificationConfig,
    /// Mount `POST /order/test`
    pub seed_endpoint: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            store: StoreBackend::default(),
            database_url: None,
            priority_policy: PriorityPolicy::default(),
            time_zone: None,
            utc_offset_minutes: None,
            notification: NotificationConfig::default(),
            seed_endpoint: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path, e))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => {
                tracing::info!(path = %path, "loading configuration file");
                Self::from_yaml_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(lookup);
        Ok(config)
    }

    /// Override fields from environment-style variables
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("ORDER_SERVICE_ADDR") {
            self.addr = addr;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(url) = lookup("WEBHOOK_URL") {
            self.notification.webhook_url = Some(url);
        }
        if let Some(channel) = lookup("NOTIFICATION_CHANNEL") {
            self.notification.channel = channel;
        }
        if let Some(zone) = lookup("TIME_ZONE") {
            self.time_zone = Some(zone);
        }

        override_parsed(&lookup, "ORDER_STORE", &mut self.store);
        override_parsed(&lookup, "PRIORITY_POLICY", &mut self.priority_policy);
        override_parsed(&lookup, "NOTIFIER", &mut self.notification.kind);
        override_parsed(&lookup, "NOTIFICATION_DISPATCH", &mut self.notification.dispatch);
        override_parsed(&lookup, "SEED_ENDPOINT", &mut self.seed_endpoint);

        let mut offset = self.utc_offset_minutes.unwrap_or_default();
        if override_parsed(&lookup, "UTC_OFFSET_MINUTES", &mut offset) {
            self.utc_offset_minutes = Some(offset);
        }
    }

    /// Zone whose midnight starts a new priority sequence
    pub fn day_zone(&self) -> Result<DayZone> {
        if let Some(minutes) = self.utc_offset_minutes {
            return FixedOffset::east_opt(minutes.saturating_mul(60))
                .map(DayZone::Fixed)
                .ok_or_else(|| anyhow!("UTC offset of {} minutes is out of range", minutes));
        }
        match &self.time_zone {
            Some(name) => name.parse::<DayZone>().map_err(|e| anyhow!(e)),
            None => Ok(DayZone::Local),
        }
    }

    pub fn priority_rule(&self) -> Result<PriorityRule> {
        Ok(PriorityRule::new(self.priority_policy, self.day_zone()?))
    }

    /// Open the configured store
    pub async fn build_store(&self) -> Result<Arc<dyn OrderStore>> {
        let rule = self.priority_rule()?;
        match self.store {
            StoreBackend::InMemory => Ok(Arc::new(InMemoryOrderStore::new(rule))),
            StoreBackend::Postgres => self.build_postgres_store(rule).await,
        }
    }

    #[cfg(feature = "postgres")]
    async fn build_postgres_store(&self, rule: PriorityRule) -> Result<Arc<dyn OrderStore>> {
        use crate::storage::postgres::{PostgresOrderStore, ensure_schema};

        let url = self
            .database_url
            .as_deref()
            .ok_or_else(|| anyhow!("DATABASE_URL is required for the postgres store"))?;
        let store = PostgresOrderStore::connect(url, rule).await?;
        ensure_schema(store.pool()).await?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "postgres"))]
    async fn build_postgres_store(&self, _rule: PriorityRule) -> Result<Arc<dyn OrderStore>> {
        Err(anyhow!(
            "the postgres store requires building with the `postgres` feature"
        ))
    }

    /// Build the configured notifier
    ///
    /// The `event_bus` kind also returns the bus it publishes on, so callers
    /// can subscribe before serving.
    pub fn build_notifier(&self) -> Result<(Arc<dyn Notifier>, Option<EventBus>)> {
        let channel = self.notification.channel.clone();
        match self.notification.kind {
            NotifierKind::Log => Ok((Arc::new(LogNotifier::new(channel)), None)),
            NotifierKind::EventBus => {
                let bus = EventBus::default();
                let notifier = EventBusNotifier::new(bus.clone(), channel);
                Ok((Arc::new(notifier), Some(bus)))
            }
            NotifierKind::Webhook => Ok((self.build_webhook_notifier()?, None)),
        }
    }

    #[cfg(feature = "webhook")]
    fn build_webhook_notifier(&self) -> Result<Arc<dyn Notifier>> {
        let url = self
            .notification
            .webhook_url
            .clone()
            .ok_or_else(|| anyhow!("WEBHOOK_URL is required for the webhook notifier"))?;
        Ok(Arc::new(crate::core::webhook::WebhookNotifier::new(
            url,
            self.notification.channel.clone(),
        )))
    }

    #[cfg(not(feature = "webhook"))]
    fn build_webhook_notifier(&self) -> Result<Arc<dyn Notifier>> {
        Err(anyhow!(
            "the webhook notifier requires building with the `webhook` feature"
        ))
    }

    /// Wire store, notifier and flags into a server builder
    pub async fn server_builder(&self) -> Result<ServerBuilder> {
        let store = self.build_store().await?;
        let (notifier, bus) = self.build_notifier()?;
        let mut builder = ServerBuilder::new()
            .with_shared_store(store)
            .with_shared_notifier(notifier)
            .with_dispatch(self.notification.dispatch)
            .with_seed_endpoint(self.seed_endpoint);
        if let Some(bus) = bus {
            builder = builder.with_event_bus(bus);
        }
        Ok(builder)
    }
}

/// Parse `key` into `target`; returns whether the value was replaced
fn override_parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T) -> bool
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        return false;
    };
    match raw.parse() {
        Ok(value) => {
            *target = value;
            true
        }
        Err(e) => {
            tracing::warn!(variable = key, value = %raw, error = %e, "ignoring invalid configuration value");
            false
        }
    }
}
