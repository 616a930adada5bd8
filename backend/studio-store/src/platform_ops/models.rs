use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::{AuditLog, AuditTarget};
use crate::models::{
    AccountId, Entity, FlagId, ModNote, ReportPriority, ReportStatus, SiteId, TeamMember,
    TeamMemberId, TicketId,
};
use crate::store::{impl_collection, StoreSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Suspended,
    Banned,
    Pending,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Banned => "banned",
            AccountStatus::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Free,
    Starter,
    Pro,
    Enterprise,
}

impl PlanTier {
    pub const ALL: [PlanTier; 4] = [PlanTier::Free, PlanTier::Starter, PlanTier::Pro, PlanTier::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Starter => "starter",
            PlanTier::Pro => "pro",
            PlanTier::Enterprise => "enterprise",
        }
    }

    pub fn included_seats(&self) -> u32 {
        match self {
            PlanTier::Free => 1,
            PlanTier::Starter => 3,
            PlanTier::Pro => 10,
            PlanTier::Enterprise => 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub handle: String,
    pub display_name: String,
    pub owner_email: String,
    pub status: AccountStatus,
    pub plan: PlanTier,
    pub seats: u32,
    pub monthly_active_users: u64,
    pub warning_count: u32,
    pub strike_count: u32,
    pub tags: Vec<String>,
    pub notes: Vec<ModNote>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    Published,
    Unpublished,
    TakenDown,
}

impl SiteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteStatus::Published => "published",
            SiteStatus::Unpublished => "unpublished",
            SiteStatus::TakenDown => "taken_down",
        }
    }
}

/// A published landing page built by an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub account_id: AccountId,
    pub name: String,
    pub domain: String,
    pub status: SiteStatus,
    pub uptime_pct: f32,
    pub error_rate_pct: f32,
    pub monthly_visits: u64,
    pub is_flagged: bool,
    pub notes: Vec<ModNote>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum TicketTarget {
    Account(AccountId),
    Site(SiteId),
}

impl From<TicketTarget> for AuditTarget {
    fn from(target: TicketTarget) -> Self {
        match target {
            TicketTarget::Account(id) => AuditTarget::Account(id),
            TicketTarget::Site(id) => AuditTarget::Site(id),
        }
    }
}

/// Support or abuse ticket raised against an account or one of its sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub account_id: AccountId,
    pub subject: String,
    pub target: TicketTarget,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub assignee: Option<TeamMemberId>,
    pub resolution_notes: Vec<ModNote>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFlag {
    pub id: FlagId,
    pub key: String,
    pub description: String,
    pub enabled: bool,
    pub rollout_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSettings {
    pub maintenance_mode: bool,
    pub signups_enabled: bool,
    pub max_sites_per_account: u32,
    pub default_plan: PlanTier,
    pub trial_days: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformSettingsPatch {
    pub signups_enabled: Option<bool>,
    pub max_sites_per_account: Option<u32>,
    pub default_plan: Option<PlanTier>,
    pub trial_days: Option<u32>,
}

impl PlatformSettingsPatch {
    pub fn apply(&self, settings: &mut PlatformSettings) {
        if let Some(v) = self.signups_enabled {
            settings.signups_enabled = v;
        }
        if let Some(v) = self.max_sites_per_account {
            settings.max_sites_per_account = v;
        }
        if let Some(v) = self.default_plan {
            settings.default_plan = v;
        }
        if let Some(v) = self.trial_days {
            settings.trial_days = v;
        }
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        [
            ("signups_enabled", self.signups_enabled.is_some()),
            ("max_sites_per_account", self.max_sites_per_account.is_some()),
            ("default_plan", self.default_plan.is_some()),
            ("trial_days", self.trial_days.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformSelection {
    pub account: Option<AccountId>,
    pub site: Option<SiteId>,
    pub ticket: Option<TicketId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSnapshot {
    pub accounts: Vec<Account>,
    pub sites: Vec<Site>,
    pub tickets: Vec<Ticket>,
    pub team: Vec<TeamMember>,
    pub flags: Vec<FeatureFlag>,
    pub audit: AuditLog,
    pub settings: PlatformSettings,
    pub selection: PlatformSelection,
}

impl StoreSnapshot for PlatformSnapshot {
    type Selection = PlatformSelection;

    fn audit(&self) -> &AuditLog {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditLog {
        &mut self.audit
    }

    fn selection_mut(&mut self) -> &mut PlatformSelection {
        &mut self.selection
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> AccountId {
        self.id
    }
}

impl Entity for Site {
    type Id = SiteId;

    fn id(&self) -> SiteId {
        self.id
    }
}

impl Entity for Ticket {
    type Id = TicketId;

    fn id(&self) -> TicketId {
        self.id
    }
}

impl Entity for FeatureFlag {
    type Id = FlagId;

    fn id(&self) -> FlagId {
        self.id
    }
}

impl_collection!(PlatformSnapshot, Account, accounts);
impl_collection!(PlatformSnapshot, Site, sites);
impl_collection!(PlatformSnapshot, Ticket, tickets);
impl_collection!(PlatformSnapshot, TeamMember, team);
impl_collection!(PlatformSnapshot, FeatureFlag, flags);
