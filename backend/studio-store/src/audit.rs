//! Append-only audit trail kept by every store.
//!
//! Events are only ever created as a side effect of another action. The log
//! is bounded: once `capacity` is reached the oldest event is dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::models::{
    AccountId, AssetId, AuditEventId, FlagId, FontId, MessageId, ReportId, ReviewId, SiteId,
    StreamId, SwatchId, TeamMemberId, TicketId, UserId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // Livestream users
    UserWarned,
    UserSuspended,
    UserBanned,
    UserUnbanned,
    UserNoteAdded,
    UserTierChanged,
    // Streams
    StreamMuted,
    StreamUnmuted,
    StreamEnded,
    StreamDeleted,
    StreamFlagged,
    StreamUnflagged,
    StreamAgeRestrictionChanged,
    StreamNoteAdded,
    StreamTagAdded,
    StreamTagRemoved,
    // Reports
    ReportReviewStarted,
    ReportResolved,
    ReportDismissed,
    ReportEscalated,
    ReportAssigned,
    ReportPriorityChanged,
    // Chat
    MessageDeleted,
    MessageRestored,
    MessageApproved,
    MessagesPurged,
    // Team
    MemberInvited,
    MemberJoined,
    MemberRoleChanged,
    PermissionGranted,
    PermissionRevoked,
    // Settings
    SettingsUpdated,
    KeywordBlocked,
    KeywordUnblocked,
    // Platform accounts
    AccountWarned,
    AccountSuspended,
    AccountBanned,
    AccountReactivated,
    PlanChanged,
    AccountTagAdded,
    AccountTagRemoved,
    AccountNoteAdded,
    // Sites
    SiteUnpublished,
    SiteRepublished,
    SiteTakenDown,
    SiteFlagged,
    SiteUnflagged,
    SiteNoteAdded,
    // Tickets
    TicketReviewStarted,
    TicketResolved,
    TicketDismissed,
    TicketEscalated,
    TicketAssigned,
    TicketPriorityChanged,
    // Feature flags
    FeatureFlagToggled,
    FeatureFlagRolloutChanged,
    MaintenanceModeChanged,
    // Branding
    AssetUploaded,
    AssetRenamed,
    AssetSubmitted,
    AssetApproved,
    AssetChangesRequested,
    AssetArchived,
    AssetRestored,
    AssetTagAdded,
    AssetTagRemoved,
    SwatchAdded,
    SwatchUpdated,
    SwatchLocked,
    SwatchUnlocked,
    FontChanged,
    VoiceKeywordAdded,
    VoiceKeywordRemoved,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UserWarned => "user_warned",
            AuditAction::UserSuspended => "user_suspended",
            AuditAction::UserBanned => "user_banned",
            AuditAction::UserUnbanned => "user_unbanned",
            AuditAction::UserNoteAdded => "user_note_added",
            AuditAction::UserTierChanged => "user_tier_changed",
            AuditAction::StreamMuted => "stream_muted",
            AuditAction::StreamUnmuted => "stream_unmuted",
            AuditAction::StreamEnded => "stream_ended",
            AuditAction::StreamDeleted => "stream_deleted",
            AuditAction::StreamFlagged => "stream_flagged",
            AuditAction::StreamUnflagged => "stream_unflagged",
            AuditAction::StreamAgeRestrictionChanged => "stream_age_restriction_changed",
            AuditAction::StreamNoteAdded => "stream_note_added",
            AuditAction::StreamTagAdded => "stream_tag_added",
            AuditAction::StreamTagRemoved => "stream_tag_removed",
            AuditAction::ReportReviewStarted => "report_review_started",
            AuditAction::ReportResolved => "report_resolved",
            AuditAction::ReportDismissed => "report_dismissed",
            AuditAction::ReportEscalated => "report_escalated",
            AuditAction::ReportAssigned => "report_assigned",
            AuditAction::ReportPriorityChanged => "report_priority_changed",
            AuditAction::MessageDeleted => "message_deleted",
            AuditAction::MessageRestored => "message_restored",
            AuditAction::MessageApproved => "message_approved",
            AuditAction::MessagesPurged => "messages_purged",
            AuditAction::MemberInvited => "member_invited",
            AuditAction::MemberJoined => "member_joined",
            AuditAction::MemberRoleChanged => "member_role_changed",
            AuditAction::PermissionGranted => "permission_granted",
            AuditAction::PermissionRevoked => "permission_revoked",
            AuditAction::SettingsUpdated => "settings_updated",
            AuditAction::KeywordBlocked => "keyword_blocked",
            AuditAction::KeywordUnblocked => "keyword_unblocked",
            AuditAction::AccountWarned => "account_warned",
            AuditAction::AccountSuspended => "account_suspended",
            AuditAction::AccountBanned => "account_banned",
            AuditAction::AccountReactivated => "account_reactivated",
            AuditAction::PlanChanged => "plan_changed",
            AuditAction::AccountTagAdded => "account_tag_added",
            AuditAction::AccountTagRemoved => "account_tag_removed",
            AuditAction::AccountNoteAdded => "account_note_added",
            AuditAction::SiteUnpublished => "site_unpublished",
            AuditAction::SiteRepublished => "site_republished",
            AuditAction::SiteTakenDown => "site_taken_down",
            AuditAction::SiteFlagged => "site_flagged",
            AuditAction::SiteUnflagged => "site_unflagged",
            AuditAction::SiteNoteAdded => "site_note_added",
            AuditAction::TicketReviewStarted => "ticket_review_started",
            AuditAction::TicketResolved => "ticket_resolved",
            AuditAction::TicketDismissed => "ticket_dismissed",
            AuditAction::TicketEscalated => "ticket_escalated",
            AuditAction::TicketAssigned => "ticket_assigned",
            AuditAction::TicketPriorityChanged => "ticket_priority_changed",
            AuditAction::FeatureFlagToggled => "feature_flag_toggled",
            AuditAction::FeatureFlagRolloutChanged => "feature_flag_rollout_changed",
            AuditAction::MaintenanceModeChanged => "maintenance_mode_changed",
            AuditAction::AssetUploaded => "asset_uploaded",
            AuditAction::AssetRenamed => "asset_renamed",
            AuditAction::AssetSubmitted => "asset_submitted",
            AuditAction::AssetApproved => "asset_approved",
            AuditAction::AssetChangesRequested => "asset_changes_requested",
            AuditAction::AssetArchived => "asset_archived",
            AuditAction::AssetRestored => "asset_restored",
            AuditAction::AssetTagAdded => "asset_tag_added",
            AuditAction::AssetTagRemoved => "asset_tag_removed",
            AuditAction::SwatchAdded => "swatch_added",
            AuditAction::SwatchUpdated => "swatch_updated",
            AuditAction::SwatchLocked => "swatch_locked",
            AuditAction::SwatchUnlocked => "swatch_unlocked",
            AuditAction::FontChanged => "font_changed",
            AuditAction::VoiceKeywordAdded => "voice_keyword_added",
            AuditAction::VoiceKeywordRemoved => "voice_keyword_removed",
        }
    }
}

/// What an audit event (or a change notification) points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AuditTarget {
    User(UserId),
    Stream(StreamId),
    Report(ReportId),
    ChatMessage(MessageId),
    TeamMember(TeamMemberId),
    Settings,
    Account(AccountId),
    Site(SiteId),
    Ticket(TicketId),
    FeatureFlag(FlagId),
    Asset(AssetId),
    Swatch(SwatchId),
    Font(FontId),
    Review(ReviewId),
}

impl AuditTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            AuditTarget::User(_) => "user",
            AuditTarget::Stream(_) => "stream",
            AuditTarget::Report(_) => "report",
            AuditTarget::ChatMessage(_) => "chat_message",
            AuditTarget::TeamMember(_) => "team_member",
            AuditTarget::Settings => "settings",
            AuditTarget::Account(_) => "account",
            AuditTarget::Site(_) => "site",
            AuditTarget::Ticket(_) => "ticket",
            AuditTarget::FeatureFlag(_) => "feature_flag",
            AuditTarget::Asset(_) => "asset",
            AuditTarget::Swatch(_) => "swatch",
            AuditTarget::Font(_) => "font",
            AuditTarget::Review(_) => "review",
        }
    }

    /// Id of the referenced record, `None` for singletons like settings.
    pub fn id_string(&self) -> Option<String> {
        match self {
            AuditTarget::User(id) => Some(id.to_string()),
            AuditTarget::Stream(id) => Some(id.to_string()),
            AuditTarget::Report(id) => Some(id.to_string()),
            AuditTarget::ChatMessage(id) => Some(id.to_string()),
            AuditTarget::TeamMember(id) => Some(id.to_string()),
            AuditTarget::Settings => None,
            AuditTarget::Account(id) => Some(id.to_string()),
            AuditTarget::Site(id) => Some(id.to_string()),
            AuditTarget::Ticket(id) => Some(id.to_string()),
            AuditTarget::FeatureFlag(id) => Some(id.to_string()),
            AuditTarget::Asset(id) => Some(id.to_string()),
            AuditTarget::Swatch(id) => Some(id.to_string()),
            AuditTarget::Font(id) => Some(id.to_string()),
            AuditTarget::Review(id) => Some(id.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: AuditEventId,
    pub at: DateTime<Utc>,
    pub actor: String,
    pub action: AuditAction,
    pub summary: String,
    pub target: Option<AuditTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    capacity: usize,
    events: VecDeque<AuditEvent>,
}

impl AuditLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: VecDeque::with_capacity(capacity.min(256)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, event: AuditEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &AuditEvent> {
        self.events.iter()
    }

    pub fn latest(&self) -> Option<&AuditEvent> {
        self.events.back()
    }

    /// Newest first, at most `limit` events.
    pub fn recent(&self, limit: usize) -> Vec<&AuditEvent> {
        self.events.iter().rev().take(limit).collect()
    }

    pub fn for_target(&self, target: &AuditTarget) -> Vec<&AuditEvent> {
        self.events
            .iter()
            .filter(|event| event.target.as_ref() == Some(target))
            .collect()
    }

    pub fn count_since(&self, since: DateTime<Utc>) -> usize {
        self.events.iter().filter(|event| event.at >= since).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(action: AuditAction, target: Option<AuditTarget>) -> AuditEvent {
        AuditEvent {
            id: AuditEventId::new(),
            at: Utc::now(),
            actor: "tester".to_string(),
            action,
            summary: String::new(),
            target,
        }
    }

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let mut log = AuditLog::with_capacity(2);
        let first = event(AuditAction::UserWarned, None);
        let first_id = first.id;
        log.push(first);
        log.push(event(AuditAction::UserBanned, None));
        log.push(event(AuditAction::UserUnbanned, None));

        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|e| e.id != first_id));
        assert_eq!(log.latest().unwrap().action, AuditAction::UserUnbanned);
    }

    #[test]
    fn test_recent_is_newest_first() {
        let mut log = AuditLog::with_capacity(10);
        log.push(event(AuditAction::StreamMuted, None));
        log.push(event(AuditAction::StreamUnmuted, None));
        let recent = log.recent(5);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].action, AuditAction::StreamUnmuted);
    }

    #[test]
    fn test_for_target_filters() {
        let user = UserId::new();
        let mut log = AuditLog::with_capacity(10);
        log.push(event(AuditAction::UserWarned, Some(AuditTarget::User(user))));
        log.push(event(AuditAction::SettingsUpdated, Some(AuditTarget::Settings)));
        assert_eq!(log.for_target(&AuditTarget::User(user)).len(), 1);
        assert_eq!(AuditTarget::Settings.id_string(), None);
    }

    #[test]
    fn test_action_string_matches_serde() {
        let json = serde_json::to_string(&AuditAction::UserWarned).unwrap();
        assert_eq!(json, format!("\"{}\"", AuditAction::UserWarned.as_str()));
    }
}
