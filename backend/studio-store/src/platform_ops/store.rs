//! Platform operations store - account enforcement, site takedowns, support
//! tickets, feature flags and platform-wide settings.

use std::sync::Arc;
use tokio::sync::broadcast;
use validator::Validate;

use super::models::*;
use super::seed::seed;
use super::stats::{compute_stats, PlatformStats};
use crate::audit::{AuditAction, AuditTarget};
use crate::clock::Clock;
use crate::config::StoreOptions;
use crate::error::Result;
use crate::models::{
    AccountId, FlagId, InviteMember, MemberStatus, ModNote, ReportPriority, ReportStatus, SiteId,
    TeamMember, TeamMemberId, TeamRole, TicketId,
};
use crate::store::{
    add_unique, can_add, has_value, remove_value, with_note, Store, StoreChange, StoreCore, StoreKind,
};

pub struct PlatformOpsStore {
    core: StoreCore<PlatformSnapshot>,
}

fn ticket_terminal(ticket: &Ticket) -> Option<&'static str> {
    ticket.status.is_terminal().then(|| ticket.status.as_str())
}

fn account_banned(account: &Account) -> Option<&'static str> {
    (account.status == AccountStatus::Banned).then(|| account.status.as_str())
}

impl PlatformOpsStore {
    pub fn new(options: StoreOptions, clock: Arc<dyn Clock>) -> Self {
        Self {
            core: StoreCore::new(StoreKind::PlatformOps, seed, clock, options),
        }
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.core.find(id)
    }

    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.core.find(id)
    }

    pub fn ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.core.find(id)
    }

    pub fn flag(&self, id: FlagId) -> Option<&FeatureFlag> {
        self.core.find(id)
    }

    pub fn flag_by_key(&self, key: &str) -> Option<&FeatureFlag> {
        self.core.state().flags.iter().find(|f| f.key == key)
    }

    pub fn member(&self, id: TeamMemberId) -> Option<&TeamMember> {
        self.core.find(id)
    }

    pub fn sites_for(&self, account_id: AccountId) -> Vec<&Site> {
        self.core
            .state()
            .sites
            .iter()
            .filter(|s| s.account_id == account_id)
            .collect()
    }

    pub fn tickets_for(&self, target: TicketTarget) -> Vec<&Ticket> {
        self.core
            .state()
            .tickets
            .iter()
            .filter(|t| t.target == target)
            .collect()
    }

    // ---- accounts ------------------------------------------------------

    pub fn warn_account(&mut self, id: AccountId, reason: &str) -> Result<bool> {
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut handle = String::new();
        let applied = self.core.update(id, |account: &mut Account| {
            account.warning_count += 1;
            account.notes.push(ModNote::new(now, &author, format!("Warning: {}", reason)));
            handle = account.handle.clone();
        });
        Ok(self.core.finish(applied, AuditAction::AccountWarned, AuditTarget::Account(id), || {
            format!("Warned {}: {}", handle, reason)
        }))
    }

    pub fn suspend_account(&mut self, id: AccountId, reason: &str) -> Result<bool> {
        self.core.guard(id, "account", account_banned)?;
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut handle = String::new();
        let applied = self.core.update(id, |account: &mut Account| {
            account.status = AccountStatus::Suspended;
            account.notes.push(ModNote::new(now, &author, format!("Suspended: {}", reason)));
            handle = account.handle.clone();
        });
        Ok(self.core.finish(applied, AuditAction::AccountSuspended, AuditTarget::Account(id), || {
            format!("Suspended {}: {}", handle, reason)
        }))
    }

    /// Ban an account. Sites are left as they are; take them down
    /// separately.
    pub fn ban_account(&mut self, id: AccountId, reason: &str) -> Result<bool> {
        self.core.guard(id, "account", account_banned)?;
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut handle = String::new();
        let applied = self.core.update(id, |account: &mut Account| {
            account.status = AccountStatus::Banned;
            account.strike_count += 1;
            account.notes.push(ModNote::new(now, &author, format!("Banned: {}", reason)));
            handle = account.handle.clone();
        });
        Ok(self.core.finish(applied, AuditAction::AccountBanned, AuditTarget::Account(id), || {
            format!("Banned {}: {}", handle, reason)
        }))
    }

    pub fn reactivate_account(&mut self, id: AccountId) -> Result<bool> {
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut handle = String::new();
        let applied = self.core.update(id, |account: &mut Account| {
            account.status = AccountStatus::Active;
            account.notes.push(ModNote::new(now, &author, "Reactivated"));
            handle = account.handle.clone();
        });
        Ok(self.core.finish(applied, AuditAction::AccountReactivated, AuditTarget::Account(id), || {
            format!("Reactivated {}", handle)
        }))
    }

    /// Switch plan. Seats are raised to the plan's included seats but never
    /// lowered.
    pub fn change_plan(&mut self, id: AccountId, plan: PlanTier) -> Result<bool> {
        let mut previous = plan;
        let applied = self.core.update(id, |account: &mut Account| {
            previous = account.plan;
            account.plan = plan;
            account.seats = account.seats.max(plan.included_seats());
        });
        Ok(self.core.finish(applied, AuditAction::PlanChanged, AuditTarget::Account(id), || {
            format!("Plan {} -> {}", previous.as_str(), plan.as_str())
        }))
    }

    pub fn add_account_tag(&mut self, id: AccountId, tag: &str) -> Result<bool> {
        let added = self.core.update_if(
            id,
            |account: &Account| can_add(&account.tags, tag),
            |account: &mut Account| {
                add_unique(&mut account.tags, tag);
            },
        );
        Ok(self.core.finish(added, AuditAction::AccountTagAdded, AuditTarget::Account(id), || {
            format!("Tag added: {}", tag.trim())
        }))
    }

    pub fn remove_account_tag(&mut self, id: AccountId, tag: &str) -> Result<bool> {
        let removed = self.core.update_if(
            id,
            |account: &Account| has_value(&account.tags, tag),
            |account: &mut Account| {
                remove_value(&mut account.tags, tag);
            },
        );
        Ok(self.core.finish(removed, AuditAction::AccountTagRemoved, AuditTarget::Account(id), || {
            format!("Tag removed: {}", tag.trim())
        }))
    }

    pub fn add_account_note(&mut self, id: AccountId, note: &str) -> Result<bool> {
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let applied = self.core.update(id, |account: &mut Account| {
            account.notes.push(ModNote::new(now, &author, note));
        });
        Ok(self.core.finish(applied, AuditAction::AccountNoteAdded, AuditTarget::Account(id), || {
            format!("Note added: {}", note)
        }))
    }

    // ---- sites ---------------------------------------------------------

    pub fn unpublish_site(&mut self, id: SiteId) -> Result<bool> {
        let mut domain = String::new();
        let applied = self.core.update(id, |site: &mut Site| {
            site.status = SiteStatus::Unpublished;
            domain = site.domain.clone();
        });
        Ok(self.core.finish(applied, AuditAction::SiteUnpublished, AuditTarget::Site(id), || {
            format!("Unpublished {}", domain)
        }))
    }

    pub fn republish_site(&mut self, id: SiteId) -> Result<bool> {
        let now = self.core.now();
        let mut domain = String::new();
        let applied = self.core.update(id, |site: &mut Site| {
            site.status = SiteStatus::Published;
            site.published_at = Some(now);
            domain = site.domain.clone();
        });
        Ok(self.core.finish(applied, AuditAction::SiteRepublished, AuditTarget::Site(id), || {
            format!("Republished {}", domain)
        }))
    }

    pub fn take_down_site(&mut self, id: SiteId, reason: &str) -> Result<bool> {
        self.core.guard(id, "site", |site: &Site| {
            (site.status == SiteStatus::TakenDown).then(|| site.status.as_str())
        })?;
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut domain = String::new();
        let applied = self.core.update(id, |site: &mut Site| {
            site.status = SiteStatus::TakenDown;
            site.monthly_visits = 0;
            site.notes.push(ModNote::new(now, &author, format!("Taken down: {}", reason)));
            domain = site.domain.clone();
        });
        Ok(self.core.finish(applied, AuditAction::SiteTakenDown, AuditTarget::Site(id), || {
            format!("Took down {}: {}", domain, reason)
        }))
    }

    pub fn flag_site(&mut self, id: SiteId, reason: &str) -> Result<bool> {
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut domain = String::new();
        let applied = self.core.update(id, |site: &mut Site| {
            site.is_flagged = true;
            site.notes.push(ModNote::new(now, &author, format!("Flagged: {}", reason)));
            domain = site.domain.clone();
        });
        Ok(self.core.finish(applied, AuditAction::SiteFlagged, AuditTarget::Site(id), || {
            format!("Flagged {}: {}", domain, reason)
        }))
    }

    pub fn unflag_site(&mut self, id: SiteId) -> Result<bool> {
        let mut domain = String::new();
        let applied = self.core.update(id, |site: &mut Site| {
            site.is_flagged = false;
            domain = site.domain.clone();
        });
        Ok(self.core.finish(applied, AuditAction::SiteUnflagged, AuditTarget::Site(id), || {
            format!("Cleared flag on {}", domain)
        }))
    }

    pub fn add_site_note(&mut self, id: SiteId, note: &str) -> Result<bool> {
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let applied = self.core.update(id, |site: &mut Site| {
            site.notes.push(ModNote::new(now, &author, note));
        });
        Ok(self.core.finish(applied, AuditAction::SiteNoteAdded, AuditTarget::Site(id), || {
            format!("Note added: {}", note)
        }))
    }

    // ---- tickets -------------------------------------------------------

    pub fn start_ticket_review(&mut self, id: TicketId) -> Result<bool> {
        self.core.guard(id, "ticket", ticket_terminal)?;
        let now = self.core.now();
        let applied = self.core.update(id, |ticket: &mut Ticket| {
            ticket.status = ReportStatus::Reviewing;
            ticket.updated_at = now;
        });
        Ok(self.core.finish(applied, AuditAction::TicketReviewStarted, AuditTarget::Ticket(id), || {
            "Review started".to_string()
        }))
    }

    pub fn resolve_ticket(&mut self, id: TicketId, note: &str) -> Result<bool> {
        self.close_ticket(id, ReportStatus::Resolved, AuditAction::TicketResolved, note)
    }

    pub fn dismiss_ticket(&mut self, id: TicketId, note: &str) -> Result<bool> {
        self.close_ticket(id, ReportStatus::Dismissed, AuditAction::TicketDismissed, note)
    }

    pub fn escalate_ticket(&mut self, id: TicketId, note: &str) -> Result<bool> {
        self.close_ticket(id, ReportStatus::Escalated, AuditAction::TicketEscalated, note)
    }

    fn close_ticket(
        &mut self,
        id: TicketId,
        status: ReportStatus,
        action: AuditAction,
        note: &str,
    ) -> Result<bool> {
        self.core.guard(id, "ticket", ticket_terminal)?;
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut subject = String::new();
        let applied = self.core.update(id, |ticket: &mut Ticket| {
            ticket.status = status;
            ticket.updated_at = now;
            if !note.trim().is_empty() {
                ticket.resolution_notes.push(ModNote::new(now, &author, note));
            }
            subject = ticket.subject.clone();
        });
        Ok(self.core.finish(applied, action, AuditTarget::Ticket(id), || {
            with_note(format!("Ticket \"{}\" {}", subject, status.as_str()), note)
        }))
    }

    pub fn assign_ticket(&mut self, id: TicketId, member: TeamMemberId) -> Result<bool> {
        self.core.guard(id, "ticket", ticket_terminal)?;
        let now = self.core.now();
        let name = self
            .member(member)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| member.to_string());
        let applied = self.core.update(id, |ticket: &mut Ticket| {
            ticket.assignee = Some(member);
            ticket.updated_at = now;
        });
        Ok(self.core.finish(applied, AuditAction::TicketAssigned, AuditTarget::Ticket(id), || {
            format!("Assigned to {}", name)
        }))
    }

    pub fn set_ticket_priority(&mut self, id: TicketId, priority: ReportPriority) -> Result<bool> {
        self.core.guard(id, "ticket", ticket_terminal)?;
        let now = self.core.now();
        let mut previous = priority;
        let applied = self.core.update(id, |ticket: &mut Ticket| {
            previous = ticket.priority;
            ticket.priority = priority;
            ticket.updated_at = now;
        });
        Ok(self.core.finish(applied, AuditAction::TicketPriorityChanged, AuditTarget::Ticket(id), || {
            format!("Priority {} -> {}", previous.as_str(), priority.as_str())
        }))
    }

    // ---- team ----------------------------------------------------------

    pub fn invite_member(&mut self, input: InviteMember) -> Result<TeamMemberId> {
        input.validate()?;
        let member = input.into_member(self.core.now());
        let id = member.id;
        let summary = format!("Invited {} <{}> as {}", member.name, member.email, member.role.as_str());
        self.core.insert(member);
        self.core.record(AuditAction::MemberInvited, AuditTarget::TeamMember(id), summary);
        Ok(id)
    }

    pub fn accept_invite(&mut self, id: TeamMemberId) -> Result<bool> {
        let now = self.core.now();
        let joined = self.core.update_if(
            id,
            |member: &TeamMember| member.status == MemberStatus::Invited,
            |member: &mut TeamMember| {
                member.status = MemberStatus::Active;
                member.joined_at = now;
                member.last_active_at = Some(now);
            },
        );
        Ok(self.core.finish(joined, AuditAction::MemberJoined, AuditTarget::TeamMember(id), || {
            "Invite accepted".to_string()
        }))
    }

    pub fn change_member_role(&mut self, id: TeamMemberId, role: TeamRole) -> Result<bool> {
        let mut name = String::new();
        let applied = self.core.update(id, |member: &mut TeamMember| {
            member.role = role;
            member.permissions = role.default_permissions();
            name = member.name.clone();
        });
        Ok(self.core.finish(applied, AuditAction::MemberRoleChanged, AuditTarget::TeamMember(id), || {
            format!("{} is now {}", name, role.as_str())
        }))
    }

    // ---- feature flags -------------------------------------------------

    pub fn toggle_feature_flag(&mut self, id: FlagId) -> Result<bool> {
        let mut key = String::new();
        let mut enabled = false;
        let applied = self.core.update(id, |flag: &mut FeatureFlag| {
            flag.enabled = !flag.enabled;
            enabled = flag.enabled;
            key = flag.key.clone();
        });
        Ok(self.core.finish(applied, AuditAction::FeatureFlagToggled, AuditTarget::FeatureFlag(id), || {
            format!("{} {}", if enabled { "Enabled" } else { "Disabled" }, key)
        }))
    }

    /// Values above 100 are clamped.
    pub fn set_flag_rollout(&mut self, id: FlagId, pct: u8) -> Result<bool> {
        let pct = pct.min(100);
        let mut key = String::new();
        let mut previous = pct;
        let applied = self.core.update(id, |flag: &mut FeatureFlag| {
            previous = flag.rollout_pct;
            flag.rollout_pct = pct;
            key = flag.key.clone();
        });
        Ok(self.core.finish(
            applied,
            AuditAction::FeatureFlagRolloutChanged,
            AuditTarget::FeatureFlag(id),
            || format!("{} rollout {}% -> {}%", key, previous, pct),
        ))
    }

    // ---- settings ------------------------------------------------------

    pub fn update_settings(&mut self, patch: PlatformSettingsPatch) -> Result<()> {
        let fields = patch.changed_fields();
        if fields.is_empty() {
            return Ok(());
        }
        self.core.update_state(|state| patch.apply(&mut state.settings));
        self.core.record(
            AuditAction::SettingsUpdated,
            AuditTarget::Settings,
            format!("Updated {}", fields.join(", ")),
        );
        Ok(())
    }

    pub fn set_maintenance_mode(&mut self, enabled: bool) -> Result<()> {
        self.core
            .update_state(|state| state.settings.maintenance_mode = enabled);
        self.core.record(
            AuditAction::MaintenanceModeChanged,
            AuditTarget::Settings,
            format!("Maintenance mode {}", if enabled { "on" } else { "off" }),
        );
        Ok(())
    }

    // ---- selection -----------------------------------------------------

    pub fn select_account(&mut self, id: Option<AccountId>) {
        self.core.select(|sel| sel.account = id);
    }

    pub fn select_site(&mut self, id: Option<SiteId>) {
        self.core.select(|sel| sel.site = id);
    }

    pub fn select_ticket(&mut self, id: Option<TicketId>) {
        self.core.select(|sel| sel.ticket = id);
    }

    pub fn clear_selection(&mut self) {
        self.core.select(|sel| *sel = PlatformSelection::default());
    }

    pub fn selection(&self) -> &PlatformSelection {
        &self.core.state().selection
    }
}

impl Store for PlatformOpsStore {
    type Snapshot = PlatformSnapshot;
    type Stats = PlatformStats;

    fn kind(&self) -> StoreKind {
        self.core.kind()
    }

    fn snapshot(&self) -> Arc<PlatformSnapshot> {
        self.core.snapshot()
    }

    fn stats(&self) -> PlatformStats {
        compute_stats(self.core.state())
    }

    fn reset(&mut self) {
        let fresh = seed(&self.core.seed_context());
        self.core.replace(fresh);
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.core.subscribe()
    }
}
