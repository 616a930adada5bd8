//! One admin session: owns an independent instance of every store, built
//! from the same configuration and clock.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::audit::AuditEvent;
use crate::branding::{BrandingStats, BrandingStore};
use crate::clock::{Clock, SystemClock};
use crate::config::StudioConfig;
use crate::livestream::{LivestreamStats, LivestreamStore};
use crate::platform_ops::{PlatformOpsStore, PlatformStats};
use crate::store::{Store, StoreKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionOverview {
    pub livestream: LivestreamStats,
    pub platform_ops: PlatformStats,
    pub branding: BrandingStats,
}

/// An audit event together with the store it was recorded in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub store: StoreKind,
    #[serde(flatten)]
    pub event: AuditEvent,
}

pub struct Session {
    config: StudioConfig,
    livestream: LivestreamStore,
    platform_ops: PlatformOpsStore,
    branding: BrandingStore,
}

impl Session {
    pub fn new(config: StudioConfig, clock: Arc<dyn Clock>) -> Self {
        let options = config.store_options();
        tracing::info!(
            seed = options.seed,
            audit_capacity = options.audit_capacity,
            terminal_policy = ?options.terminal_policy,
            "Starting studio session"
        );

        Self {
            livestream: LivestreamStore::new(options.clone(), Arc::clone(&clock)),
            platform_ops: PlatformOpsStore::new(options.clone(), Arc::clone(&clock)),
            branding: BrandingStore::new(options, clock),
            config,
        }
    }

    /// Session on the wall clock.
    pub fn from_config(config: StudioConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn livestream(&self) -> &LivestreamStore {
        &self.livestream
    }

    pub fn livestream_mut(&mut self) -> &mut LivestreamStore {
        &mut self.livestream
    }

    pub fn platform_ops(&self) -> &PlatformOpsStore {
        &self.platform_ops
    }

    pub fn platform_ops_mut(&mut self) -> &mut PlatformOpsStore {
        &mut self.platform_ops
    }

    pub fn branding(&self) -> &BrandingStore {
        &self.branding
    }

    pub fn branding_mut(&mut self) -> &mut BrandingStore {
        &mut self.branding
    }

    pub fn overview(&self) -> SessionOverview {
        SessionOverview {
            livestream: self.livestream.stats(),
            platform_ops: self.platform_ops.stats(),
            branding: self.branding.stats(),
        }
    }

    /// Latest audit events across all stores, newest first.
    pub fn recent_activity(&self, limit: usize) -> Vec<Activity> {
        let mut activity = Vec::new();
        activity.extend(tagged(StoreKind::Livestream, self.livestream.snapshot().audit.recent(limit)));
        activity.extend(tagged(StoreKind::PlatformOps, self.platform_ops.snapshot().audit.recent(limit)));
        activity.extend(tagged(StoreKind::Branding, self.branding.snapshot().audit.recent(limit)));
        activity.sort_by(|a, b| b.event.at.cmp(&a.event.at));
        activity.truncate(limit);
        activity
    }

    /// Number of audited actions at or after `since`, across all stores.
    pub fn actions_since(&self, since: DateTime<Utc>) -> usize {
        self.livestream.snapshot().audit.count_since(since)
            + self.platform_ops.snapshot().audit.count_since(since)
            + self.branding.snapshot().audit.count_since(since)
    }

    pub fn reset_all(&mut self) {
        self.livestream.reset();
        self.platform_ops.reset();
        self.branding.reset();
    }
}

fn tagged(store: StoreKind, events: Vec<&AuditEvent>) -> impl Iterator<Item = Activity> + '_ {
    events.into_iter().map(move |event| Activity {
        store,
        event: event.clone(),
    })
}
