//! Shared fakes for application tests
//!
//! Deterministic clock and randomness, scripted provider adapters, and
//! in-memory stores that count their calls.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use dsw_application::ports::ProviderRegistry;
use dsw_domain::error::{Error, ProviderError, ProviderOperation, Result};
use dsw_domain::ports::{
    Clock, ComparisonRecord, ComparisonSink, ProviderAdapter, ProviderHealth,
    ProviderHealthStatus, RandomSource, RateLimitConfigStore, RoutingSettingsSource,
};
use dsw_domain::value_objects::{
    DepositAction, OrgCredentials, Party, PropertyAddress, ProviderKind, ProviderResponse,
    RateLimitConfig, RateLimitKey, RoutingSettings, SettingsUpdate, StandardDepositPayload,
};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Clock and Randomness
// ============================================================================

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Random source replaying a fixed sequence in a loop
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Arc<Self> {
        Arc::new(Self {
            values,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Every value of `0.0, 0.1, ..., 99.9` once, in a scrambled order
    pub fn uniform_permutation() -> Arc<Self> {
        Self::new((0..1000u32).map(|i| f64::from(i * 37 % 1000) / 10.0).collect())
    }

    pub fn draws(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl RandomSource for SequenceRandom {
    fn next_percent(&self) -> f64 {
        let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.values[idx % self.values.len()]
    }
}

// ============================================================================
// Provider Adapters
// ============================================================================

/// Adapter answering from a script, then from a default reply
pub struct FakeAdapter {
    kind: ProviderKind,
    script: Mutex<VecDeque<std::result::Result<ProviderResponse, ProviderError>>>,
    default_reply: std::result::Result<ProviderResponse, ProviderError>,
    delay: Duration,
    calls: AtomicU32,
    health: ProviderHealthStatus,
}

impl FakeAdapter {
    pub fn ok(kind: ProviderKind, body: Value) -> Self {
        Self {
            kind,
            script: Mutex::new(VecDeque::new()),
            default_reply: Ok(response(201, "DEP-1", body)),
            delay: Duration::ZERO,
            calls: AtomicU32::new(0),
            health: ProviderHealthStatus::Healthy,
        }
    }

    pub fn failing(kind: ProviderKind, error: ProviderError) -> Self {
        Self {
            default_reply: Err(error),
            health: ProviderHealthStatus::Unhealthy,
            ..Self::ok(kind, Value::Null)
        }
    }

    pub fn with_script(
        self,
        replies: Vec<std::result::Result<ProviderResponse, ProviderError>>,
    ) -> Self {
        *self.script.lock().unwrap() = replies.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> std::result::Result<ProviderResponse, ProviderError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone())
    }
}

#[async_trait]
impl ProviderAdapter for FakeAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn transform_payload(
        &self,
        payload: &StandardDepositPayload,
    ) -> std::result::Result<Value, ProviderError> {
        if payload.tenants.is_empty() {
            return Err(ProviderError::validation(
                self.kind,
                ProviderOperation::Transform,
                "at least one tenant is required",
            ));
        }
        Ok(json!({ "reference": payload.deposit_reference }))
    }

    async fn create(
        &self,
        _body: &Value,
        _credentials: &OrgCredentials,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.next_reply()
    }

    async fn status(
        &self,
        _external_id: &str,
        _credentials: &OrgCredentials,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.next_reply()
    }

    async fn health_check(&self) -> ProviderHealth {
        ProviderHealth {
            provider: self.kind,
            status: self.health,
            latency_ms: 1,
            message: None,
        }
    }
}

pub fn response(status_code: u16, external_id: &str, body: Value) -> ProviderResponse {
    ProviderResponse {
        status_code,
        external_id: Some(external_id.to_string()),
        body,
    }
}

pub fn registry(legacy: Arc<FakeAdapter>, new: Arc<FakeAdapter>) -> Arc<ProviderRegistry> {
    Arc::new(ProviderRegistry::new(legacy, new).unwrap())
}

// ============================================================================
// Stores and Sinks
// ============================================================================

/// Routing settings source counting loads
pub struct FakeSettingsSource {
    settings: Mutex<RoutingSettings>,
    loads: AtomicU32,
}

impl FakeSettingsSource {
    pub fn new(settings: RoutingSettings) -> Arc<Self> {
        Arc::new(Self {
            settings: Mutex::new(settings),
            loads: AtomicU32::new(0),
        })
    }

    pub fn loads(&self) -> u32 {
        self.loads.load(Ordering::SeqCst)
    }

    /// Change the source of truth behind the store's back
    pub fn replace(&self, settings: RoutingSettings) {
        *self.settings.lock().unwrap() = settings;
    }
}

#[async_trait]
impl RoutingSettingsSource for FakeSettingsSource {
    async fn load(&self) -> Result<RoutingSettings> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn apply(&self, update: &SettingsUpdate) -> Result<()> {
        self.settings.lock().unwrap().apply(update);
        Ok(())
    }
}

/// Rate-limit store backed by a map, optionally failing every call
#[derive(Default)]
pub struct FakeRateLimitStore {
    rows: Mutex<HashMap<RateLimitKey, RateLimitConfig>>,
    reads: AtomicU32,
    unavailable: bool,
}

impl FakeRateLimitStore {
    pub fn with_rows(rows: Vec<(RateLimitKey, RateLimitConfig)>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows.into_iter().collect()),
            ..Self::default()
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            unavailable: true,
            ..Self::default()
        })
    }

    pub fn reads(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn row(&self, key: &RateLimitKey) -> Option<RateLimitConfig> {
        self.rows.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl RateLimitConfigStore for FakeRateLimitStore {
    async fn get(&self, key: &RateLimitKey) -> Result<Option<RateLimitConfig>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(Error::store("rate limit store unreachable"));
        }
        Ok(self.rows.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &RateLimitKey, config: RateLimitConfig) -> Result<()> {
        self.rows.lock().unwrap().insert(key.clone(), config);
        Ok(())
    }

    async fn delete(&self, key: &RateLimitKey) -> Result<bool> {
        Ok(self.rows.lock().unwrap().remove(key).is_some())
    }
}

/// Sink keeping every submitted record
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<ComparisonRecord>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<ComparisonRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn mismatches(&self) -> usize {
        self.records()
            .iter()
            .filter(|r| !r.comparison.is_match())
            .count()
    }
}

impl ComparisonSink for RecordingSink {
    fn submit(&self, record: ComparisonRecord) {
        self.records.lock().unwrap().push(record);
    }
}

// ============================================================================
// Requests
// ============================================================================

pub fn credentials() -> OrgCredentials {
    OrgCredentials {
        member_id: "M-1001".to_string(),
        branch_id: "B-1".to_string(),
        api_key: "secret".to_string(),
    }
}

pub fn payload() -> StandardDepositPayload {
    StandardDepositPayload {
        deposit_reference: "TEN-42".to_string(),
        deposit_amount: 1200.0,
        rent_amount: 950.0,
        tenancy_start_date: chrono::NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        tenancy_end_date: None,
        property: PropertyAddress {
            line1: "1 High Street".to_string(),
            line2: None,
            town: "Leeds".to_string(),
            postcode: "LS1 1AA".to_string(),
        },
        landlord: Party {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: None,
        },
        tenants: vec![Party {
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            email: None,
            phone: None,
        }],
    }
}

pub fn create_action() -> DepositAction {
    DepositAction::Create { payload: payload() }
}

/// Settings for a mode with fast retries so failure tests stay quick
pub fn fast_settings(mode: &str) -> RoutingSettings {
    RoutingSettings {
        routing_mode: mode.to_string(),
        retry_count: 0,
        retry_delay_ms: 1,
        ..RoutingSettings::default()
    }
}
