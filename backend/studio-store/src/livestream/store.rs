//! Livestream moderation store - handles user, stream, report, chat, team
//! and settings actions for the moderation dashboard.

use chrono::Duration;
use std::sync::Arc;
use tokio::sync::broadcast;
use validator::Validate;

use super::models::*;
use super::seed::seed;
use super::stats::{compute_stats, LivestreamStats};
use crate::audit::{AuditAction, AuditTarget};
use crate::clock::Clock;
use crate::config::StoreOptions;
use crate::error::Result;
use crate::models::{
    InviteMember, MemberStatus, MessageId, ModNote, ReportId, ReportPriority, ReportStatus,
    StreamId, TeamMember, TeamMemberId, TeamRole, UserId,
};
use crate::store::{
    add_unique, can_add, has_value, remove_value, with_note, Store, StoreChange, StoreCore, StoreKind,
};

pub struct LivestreamStore {
    core: StoreCore<LivestreamSnapshot>,
}

fn report_terminal(report: &Report) -> Option<&'static str> {
    report.status.is_terminal().then(|| report.status.as_str())
}

impl LivestreamStore {
    pub fn new(options: StoreOptions, clock: Arc<dyn Clock>) -> Self {
        Self {
            core: StoreCore::new(StoreKind::Livestream, seed, clock, options),
        }
    }

    // ---- lookups -------------------------------------------------------

    pub fn user(&self, id: UserId) -> Option<&StreamUser> {
        self.core.find(id)
    }

    pub fn stream(&self, id: StreamId) -> Option<&Stream> {
        self.core.find(id)
    }

    pub fn report(&self, id: ReportId) -> Option<&Report> {
        self.core.find(id)
    }

    pub fn message(&self, id: MessageId) -> Option<&ChatMessage> {
        self.core.find(id)
    }

    pub fn member(&self, id: TeamMemberId) -> Option<&TeamMember> {
        self.core.find(id)
    }

    /// Look a report's target up in the collection its tag names.
    pub fn resolve_report_target(&self, target: &ReportTarget) -> Option<ResolvedTarget<'_>> {
        match *target {
            ReportTarget::Stream(id) => self.stream(id).map(ResolvedTarget::Stream),
            ReportTarget::User(id) => self.user(id).map(ResolvedTarget::User),
            ReportTarget::ChatMessage(id) => self.message(id).map(ResolvedTarget::ChatMessage),
        }
    }

    pub fn streams_by_user(&self, user_id: UserId) -> Vec<&Stream> {
        self.core
            .state()
            .streams
            .iter()
            .filter(|s| s.user_id == user_id)
            .collect()
    }

    pub fn messages_in_stream(&self, stream_id: StreamId) -> Vec<&ChatMessage> {
        self.core
            .state()
            .messages
            .iter()
            .filter(|m| m.stream_id == stream_id)
            .collect()
    }

    pub fn reports_for(&self, target: ReportTarget) -> Vec<&Report> {
        self.core
            .state()
            .reports
            .iter()
            .filter(|r| r.target == target)
            .collect()
    }

    // ---- users ---------------------------------------------------------

    pub fn warn_user(&mut self, id: UserId, reason: &str) -> Result<bool> {
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut handle = String::new();
        let applied = self.core.update(id, |user: &mut StreamUser| {
            user.warning_count += 1;
            user.notes.push(ModNote::new(now, &author, format!("Warning: {}", reason)));
            handle = user.handle.clone();
        });
        Ok(self.core.finish(applied, AuditAction::UserWarned, AuditTarget::User(id), || {
            format!("Warned @{}: {}", handle, reason)
        }))
    }

    pub fn suspend_user(&mut self, id: UserId, reason: &str, hours: u32) -> Result<bool> {
        self.core.guard(id, "user", |user: &StreamUser| {
            (user.status == UserStatus::Banned).then(|| user.status.as_str())
        })?;
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut handle = String::new();
        let applied = self.core.update(id, |user: &mut StreamUser| {
            user.status = UserStatus::Suspended;
            user.suspended_until = Some(now + Duration::hours(i64::from(hours)));
            user.notes.push(ModNote::new(
                now,
                &author,
                format!("Suspended for {}h: {}", hours, reason),
            ));
            handle = user.handle.clone();
        });
        Ok(self.core.finish(applied, AuditAction::UserSuspended, AuditTarget::User(id), || {
            format!("Suspended @{} for {}h: {}", handle, hours, reason)
        }))
    }

    /// Ban a user. Banning an already banned user is allowed under the
    /// default policy and adds another strike, note and audit entry.
    pub fn ban_user(&mut self, id: UserId, reason: &str) -> Result<bool> {
        self.core.guard(id, "user", |user: &StreamUser| {
            (user.status == UserStatus::Banned).then(|| user.status.as_str())
        })?;
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut handle = String::new();
        let applied = self.core.update(id, |user: &mut StreamUser| {
            user.status = UserStatus::Banned;
            user.strike_count += 1;
            user.suspended_until = None;
            user.notes.push(ModNote::new(now, &author, format!("Banned: {}", reason)));
            handle = user.handle.clone();
        });
        Ok(self.core.finish(applied, AuditAction::UserBanned, AuditTarget::User(id), || {
            format!("Banned @{}: {}", handle, reason)
        }))
    }

    pub fn unban_user(&mut self, id: UserId) -> Result<bool> {
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut handle = String::new();
        let applied = self.core.update(id, |user: &mut StreamUser| {
            user.status = UserStatus::Active;
            user.suspended_until = None;
            user.notes.push(ModNote::new(now, &author, "Restored to active"));
            handle = user.handle.clone();
        });
        Ok(self.core.finish(applied, AuditAction::UserUnbanned, AuditTarget::User(id), || {
            format!("Restored @{}", handle)
        }))
    }

    pub fn add_user_note(&mut self, id: UserId, note: &str) -> Result<bool> {
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let applied = self.core.update(id, |user: &mut StreamUser| {
            user.notes.push(ModNote::new(now, &author, note));
        });
        Ok(self.core.finish(applied, AuditAction::UserNoteAdded, AuditTarget::User(id), || {
            format!("Note added: {}", note)
        }))
    }

    pub fn set_user_tier(&mut self, id: UserId, tier: UserTier) -> Result<bool> {
        let mut previous = tier;
        let applied = self.core.update(id, |user: &mut StreamUser| {
            previous = user.tier;
            user.tier = tier;
        });
        Ok(self.core.finish(applied, AuditAction::UserTierChanged, AuditTarget::User(id), || {
            format!("Tier changed {} -> {}", previous.as_str(), tier.as_str())
        }))
    }

    // ---- streams -------------------------------------------------------

    pub fn mute_stream(&mut self, id: StreamId) -> Result<bool> {
        self.set_muted(id, true)
    }

    pub fn unmute_stream(&mut self, id: StreamId) -> Result<bool> {
        self.set_muted(id, false)
    }

    fn set_muted(&mut self, id: StreamId, muted: bool) -> Result<bool> {
        let mut title = String::new();
        let applied = self.core.update(id, |stream: &mut Stream| {
            stream.is_muted = muted;
            title = stream.title.clone();
        });
        let action = if muted { AuditAction::StreamMuted } else { AuditAction::StreamUnmuted };
        Ok(self.core.finish(applied, action, AuditTarget::Stream(id), || {
            format!("{} \"{}\"", if muted { "Muted" } else { "Unmuted" }, title)
        }))
    }

    /// End a live stream. The record stays in the collection.
    pub fn end_stream(&mut self, id: StreamId, reason: &str) -> Result<bool> {
        self.core.guard(id, "stream", |stream: &Stream| {
            (stream.status != StreamStatus::Live).then(|| stream.status.as_str())
        })?;
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut title = String::new();
        let applied = self.core.update(id, |stream: &mut Stream| {
            stream.status = StreamStatus::Ended;
            stream.viewer_count = 0;
            stream.ended_at = Some(now);
            stream
                .moderation_notes
                .push(ModNote::new(now, &author, format!("Ended: {}", reason)));
            title = stream.title.clone();
        });
        Ok(self.core.finish(applied, AuditAction::StreamEnded, AuditTarget::Stream(id), || {
            format!("Ended \"{}\": {}", title, reason)
        }))
    }

    pub fn delete_stream(&mut self, id: StreamId, reason: &str) -> Result<bool> {
        self.core.guard(id, "stream", |stream: &Stream| {
            (stream.status == StreamStatus::Deleted).then(|| stream.status.as_str())
        })?;
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut title = String::new();
        let applied = self.core.update(id, |stream: &mut Stream| {
            if stream.status == StreamStatus::Live {
                stream.ended_at = Some(now);
            }
            stream.status = StreamStatus::Deleted;
            stream.viewer_count = 0;
            stream
                .moderation_notes
                .push(ModNote::new(now, &author, format!("Deleted: {}", reason)));
            title = stream.title.clone();
        });
        Ok(self.core.finish(applied, AuditAction::StreamDeleted, AuditTarget::Stream(id), || {
            format!("Deleted \"{}\": {}", title, reason)
        }))
    }

    pub fn flag_stream(&mut self, id: StreamId, reason: &str) -> Result<bool> {
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut title = String::new();
        let applied = self.core.update(id, |stream: &mut Stream| {
            stream.is_flagged = true;
            stream
                .moderation_notes
                .push(ModNote::new(now, &author, format!("Flagged: {}", reason)));
            title = stream.title.clone();
        });
        Ok(self.core.finish(applied, AuditAction::StreamFlagged, AuditTarget::Stream(id), || {
            format!("Flagged \"{}\": {}", title, reason)
        }))
    }

    pub fn unflag_stream(&mut self, id: StreamId) -> Result<bool> {
        let mut title = String::new();
        let applied = self.core.update(id, |stream: &mut Stream| {
            stream.is_flagged = false;
            title = stream.title.clone();
        });
        Ok(self.core.finish(applied, AuditAction::StreamUnflagged, AuditTarget::Stream(id), || {
            format!("Cleared flag on \"{}\"", title)
        }))
    }

    pub fn set_age_restricted(&mut self, id: StreamId, restricted: bool) -> Result<bool> {
        let applied = self.core.update(id, |stream: &mut Stream| {
            stream.is_age_restricted = restricted;
        });
        Ok(self.core.finish(
            applied,
            AuditAction::StreamAgeRestrictionChanged,
            AuditTarget::Stream(id),
            || format!("Age restriction {}", if restricted { "enabled" } else { "disabled" }),
        ))
    }

    pub fn add_stream_note(&mut self, id: StreamId, note: &str) -> Result<bool> {
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let applied = self.core.update(id, |stream: &mut Stream| {
            stream.moderation_notes.push(ModNote::new(now, &author, note));
        });
        Ok(self.core.finish(applied, AuditAction::StreamNoteAdded, AuditTarget::Stream(id), || {
            format!("Note added: {}", note)
        }))
    }

    /// Blank or duplicate tags are ignored.
    pub fn add_stream_tag(&mut self, id: StreamId, tag: &str) -> Result<bool> {
        let added = self.core.update_if(
            id,
            |stream: &Stream| can_add(&stream.tags, tag),
            |stream: &mut Stream| {
                add_unique(&mut stream.tags, tag);
            },
        );
        Ok(self.core.finish(added, AuditAction::StreamTagAdded, AuditTarget::Stream(id), || {
            format!("Tag added: {}", tag.trim())
        }))
    }

    pub fn remove_stream_tag(&mut self, id: StreamId, tag: &str) -> Result<bool> {
        let removed = self.core.update_if(
            id,
            |stream: &Stream| has_value(&stream.tags, tag),
            |stream: &mut Stream| {
                remove_value(&mut stream.tags, tag);
            },
        );
        Ok(self.core.finish(removed, AuditAction::StreamTagRemoved, AuditTarget::Stream(id), || {
            format!("Tag removed: {}", tag.trim())
        }))
    }

    // ---- reports -------------------------------------------------------

    pub fn start_review(&mut self, id: ReportId) -> Result<bool> {
        self.core.guard(id, "report", report_terminal)?;
        let now = self.core.now();
        let applied = self.core.update(id, |report: &mut Report| {
            report.status = ReportStatus::Reviewing;
            report.updated_at = now;
        });
        Ok(self.core.finish(applied, AuditAction::ReportReviewStarted, AuditTarget::Report(id), || {
            "Review started".to_string()
        }))
    }

    pub fn resolve_report(&mut self, id: ReportId, note: &str) -> Result<bool> {
        self.close_report(id, ReportStatus::Resolved, AuditAction::ReportResolved, note)
    }

    pub fn dismiss_report(&mut self, id: ReportId, note: &str) -> Result<bool> {
        self.close_report(id, ReportStatus::Dismissed, AuditAction::ReportDismissed, note)
    }

    pub fn escalate_report(&mut self, id: ReportId, note: &str) -> Result<bool> {
        self.close_report(id, ReportStatus::Escalated, AuditAction::ReportEscalated, note)
    }

    fn close_report(
        &mut self,
        id: ReportId,
        status: ReportStatus,
        action: AuditAction,
        note: &str,
    ) -> Result<bool> {
        self.core.guard(id, "report", report_terminal)?;
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut reason = String::new();
        let applied = self.core.update(id, |report: &mut Report| {
            report.status = status;
            report.updated_at = now;
            if !note.trim().is_empty() {
                report.resolution_notes.push(ModNote::new(now, &author, note));
            }
            reason = report.reason.clone();
        });
        Ok(self.core.finish(applied, action, AuditTarget::Report(id), || {
            with_note(format!("Report \"{}\" {}", reason, status.as_str()), note)
        }))
    }

    pub fn assign_report(&mut self, id: ReportId, member: TeamMemberId) -> Result<bool> {
        self.core.guard(id, "report", report_terminal)?;
        let now = self.core.now();
        let name = self
            .member(member)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| member.to_string());
        let applied = self.core.update(id, |report: &mut Report| {
            report.assignee = Some(member);
            report.updated_at = now;
        });
        Ok(self.core.finish(applied, AuditAction::ReportAssigned, AuditTarget::Report(id), || {
            format!("Assigned to {}", name)
        }))
    }

    /// Change priority. Under the default policy this also works on
    /// resolved and dismissed reports.
    pub fn set_report_priority(&mut self, id: ReportId, priority: ReportPriority) -> Result<bool> {
        self.core.guard(id, "report", report_terminal)?;
        let now = self.core.now();
        let mut previous = priority;
        let applied = self.core.update(id, |report: &mut Report| {
            previous = report.priority;
            report.priority = priority;
            report.updated_at = now;
        });
        Ok(self.core.finish(applied, AuditAction::ReportPriorityChanged, AuditTarget::Report(id), || {
            format!("Priority {} -> {}", previous.as_str(), priority.as_str())
        }))
    }

    /// Escalate every pending critical report when `auto_escalate_critical`
    /// is on. Each escalation is audited on its own. Returns how many
    /// reports were escalated.
    pub fn escalate_critical_reports(&mut self) -> Result<usize> {
        if !self.core.state().settings.auto_escalate_critical {
            return Ok(0);
        }
        let pending: Vec<ReportId> = self
            .core
            .state()
            .reports
            .iter()
            .filter(|r| r.status == ReportStatus::Pending && r.priority == ReportPriority::Critical)
            .map(|r| r.id)
            .collect();
        let mut escalated = 0;
        for id in pending {
            if self.escalate_report(id, "Auto-escalated: critical priority")? {
                escalated += 1;
            }
        }
        Ok(escalated)
    }

    // ---- chat ----------------------------------------------------------

    pub fn delete_message(&mut self, id: MessageId) -> Result<bool> {
        self.set_message_status(id, MessageStatus::Deleted, AuditAction::MessageDeleted)
    }

    pub fn restore_message(&mut self, id: MessageId) -> Result<bool> {
        self.set_message_status(id, MessageStatus::Visible, AuditAction::MessageRestored)
    }

    /// Release a held message into chat.
    pub fn approve_message(&mut self, id: MessageId) -> Result<bool> {
        self.set_message_status(id, MessageStatus::Visible, AuditAction::MessageApproved)
    }

    fn set_message_status(&mut self, id: MessageId, status: MessageStatus, action: AuditAction) -> Result<bool> {
        let mut previous = status;
        let applied = self.core.update(id, |message: &mut ChatMessage| {
            previous = message.status;
            message.status = status;
        });
        Ok(self.core.finish(applied, action, AuditTarget::ChatMessage(id), || {
            format!("Message {} -> {}", previous.as_str(), status.as_str())
        }))
    }

    /// Delete every visible or held message by `user_id`. Returns how many
    /// messages were removed from chat.
    pub fn purge_user_messages(&mut self, user_id: UserId) -> Result<usize> {
        let purged = self.core.update_where(
            |message: &ChatMessage| {
                message.user_id == user_id
                    && matches!(message.status, MessageStatus::Visible | MessageStatus::Held)
            },
            |message| message.status = MessageStatus::Deleted,
        );
        self.core.finish(purged > 0, AuditAction::MessagesPurged, AuditTarget::User(user_id), || {
            format!("Purged {} chat messages", purged)
        });
        Ok(purged)
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

    /// Changing role also resets permissions to the role defaults.
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

    pub fn grant_permission(&mut self, id: TeamMemberId, permission: &str) -> Result<bool> {
        let granted = self.core.update_if(
            id,
            |member: &TeamMember| can_add(&member.permissions, permission),
            |member: &mut TeamMember| {
                add_unique(&mut member.permissions, permission);
            },
        );
        Ok(self.core.finish(granted, AuditAction::PermissionGranted, AuditTarget::TeamMember(id), || {
            format!("Granted {}", permission.trim())
        }))
    }

    pub fn revoke_permission(&mut self, id: TeamMemberId, permission: &str) -> Result<bool> {
        let revoked = self.core.update_if(
            id,
            |member: &TeamMember| has_value(&member.permissions, permission),
            |member: &mut TeamMember| {
                remove_value(&mut member.permissions, permission);
            },
        );
        Ok(self.core.finish(revoked, AuditAction::PermissionRevoked, AuditTarget::TeamMember(id), || {
            format!("Revoked {}", permission.trim())
        }))
    }

    // ---- settings ------------------------------------------------------

    /// Last write wins, no versioning.
    pub fn update_settings(&mut self, patch: ModerationSettingsPatch) -> Result<()> {
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

    pub fn add_blocked_keyword(&mut self, keyword: &str) -> Result<bool> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty()
            || self.core.state().settings.blocked_keywords.contains(&keyword)
        {
            return Ok(false);
        }
        self.core
            .update_state(|state| state.settings.blocked_keywords.push(keyword.clone()));
        self.core.record(
            AuditAction::KeywordBlocked,
            AuditTarget::Settings,
            format!("Blocked keyword \"{}\"", keyword),
        );
        Ok(true)
    }

    pub fn remove_blocked_keyword(&mut self, keyword: &str) -> Result<bool> {
        let keyword = keyword.trim().to_lowercase();
        if !self.core.state().settings.blocked_keywords.contains(&keyword) {
            return Ok(false);
        }
        self.core
            .update_state(|state| state.settings.blocked_keywords.retain(|k| *k != keyword));
        self.core.record(
            AuditAction::KeywordUnblocked,
            AuditTarget::Settings,
            format!("Unblocked keyword \"{}\"", keyword),
        );
        Ok(true)
    }

    // ---- selection -----------------------------------------------------

    pub fn select_stream(&mut self, id: Option<StreamId>) {
        self.core.select(|sel| sel.stream = id);
    }

    pub fn select_user(&mut self, id: Option<UserId>) {
        self.core.select(|sel| sel.user = id);
    }

    pub fn select_report(&mut self, id: Option<ReportId>) {
        self.core.select(|sel| sel.report = id);
    }

    pub fn select_message(&mut self, id: Option<MessageId>) {
        self.core.select(|sel| sel.message = id);
    }

    pub fn clear_selection(&mut self) {
        self.core.select(|sel| *sel = LivestreamSelection::default());
    }

    pub fn selection(&self) -> &LivestreamSelection {
        &self.core.state().selection
    }
}

impl Store for LivestreamStore {
    type Snapshot = LivestreamSnapshot;
    type Stats = LivestreamStats;

    fn kind(&self) -> StoreKind {
        self.core.kind()
    }

    fn snapshot(&self) -> Arc<LivestreamSnapshot> {
        self.core.snapshot()
    }

    fn stats(&self) -> LivestreamStats {
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

/// A report target resolved against its collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedTarget<'a> {
    Stream(&'a Stream),
    User(&'a StreamUser),
    ChatMessage(&'a ChatMessage),
}
