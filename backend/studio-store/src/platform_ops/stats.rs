use serde::Serialize;
use std::collections::BTreeMap;

use super::models::{AccountStatus, PlanTier, PlatformSnapshot, SiteStatus};
use crate::models::ReportPriority;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformStats {
    pub accounts: usize,
    pub active_accounts: usize,
    pub suspended_accounts: usize,
    pub banned_accounts: usize,
    pub accounts_by_plan: BTreeMap<PlanTier, usize>,
    pub published_sites: usize,
    pub flagged_sites: usize,
    pub open_tickets: usize,
    pub critical_open_tickets: usize,
    pub enabled_flags: usize,
    /// Mean uptime over published sites, 0 when none are published.
    pub average_uptime_pct: f32,
    pub audit_events: usize,
}

pub fn compute_stats(snapshot: &PlatformSnapshot) -> PlatformStats {
    let accounts_with = |status: AccountStatus| snapshot.accounts.iter().filter(|a| a.status == status).count();

    let mut accounts_by_plan: BTreeMap<PlanTier, usize> = PlanTier::ALL.iter().map(|p| (*p, 0)).collect();
    for account in &snapshot.accounts {
        *accounts_by_plan.entry(account.plan).or_default() += 1;
    }

    let published: Vec<_> = snapshot
        .sites
        .iter()
        .filter(|s| s.status == SiteStatus::Published)
        .collect();
    let average_uptime_pct = if published.is_empty() {
        0.0
    } else {
        published.iter().map(|s| s.uptime_pct).sum::<f32>() / published.len() as f32
    };

    PlatformStats {
        accounts: snapshot.accounts.len(),
        active_accounts: accounts_with(AccountStatus::Active),
        suspended_accounts: accounts_with(AccountStatus::Suspended),
        banned_accounts: accounts_with(AccountStatus::Banned),
        accounts_by_plan,
        published_sites: published.len(),
        flagged_sites: snapshot.sites.iter().filter(|s| s.is_flagged).count(),
        open_tickets: snapshot.tickets.iter().filter(|t| t.status.is_open()).count(),
        critical_open_tickets: snapshot
            .tickets
            .iter()
            .filter(|t| t.status.is_open() && t.priority == ReportPriority::Critical)
            .count(),
        enabled_flags: snapshot.flags.iter().filter(|f| f.enabled).count(),
        average_uptime_pct,
        audit_events: snapshot.audit.len(),
    }
}
