use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::{AuditLog, AuditTarget};
use crate::models::{
    Entity, MessageId, ModNote, ReportId, ReportPriority, ReportStatus, StreamId, TeamMember,
    TeamMemberId, UserId,
};
use crate::store::{impl_collection, StoreSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Suspended,
    Banned,
    Pending,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
            UserStatus::Banned => "banned",
            UserStatus::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserTier {
    Viewer,
    Affiliate,
    Partner,
}

impl UserTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserTier::Viewer => "viewer",
            UserTier::Affiliate => "affiliate",
            UserTier::Partner => "partner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamUser {
    pub id: UserId,
    pub handle: String,
    pub display_name: String,
    pub status: UserStatus,
    pub tier: UserTier,
    pub followers: u64,
    pub warning_count: u32,
    pub strike_count: u32,
    pub notes: Vec<ModNote>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub suspended_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    Live,
    Ended,
    Deleted,
}

impl StreamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamStatus::Live => "live",
            StreamStatus::Ended => "ended",
            StreamStatus::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamHealth {
    pub bitrate_kbps: u32,
    pub dropped_frames_pct: f32,
    pub latency_ms: u32,
}

impl StreamHealth {
    /// Heuristic used by the overview dashboard's "needs attention" badge.
    pub fn is_degraded(&self) -> bool {
        self.dropped_frames_pct > 5.0 || self.latency_ms > 4_000 || self.bitrate_kbps < 1_500
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub id: StreamId,
    /// Owner, by reference only.
    pub user_id: UserId,
    pub title: String,
    pub category: String,
    pub status: StreamStatus,
    pub viewer_count: u32,
    pub peak_viewers: u32,
    pub health: StreamHealth,
    pub is_muted: bool,
    pub is_age_restricted: bool,
    pub is_flagged: bool,
    pub tags: Vec<String>,
    pub moderation_notes: Vec<ModNote>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// What a report points at. Resolved against the matching collection only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ReportTarget {
    Stream(StreamId),
    User(UserId),
    ChatMessage(MessageId),
}

impl From<ReportTarget> for AuditTarget {
    fn from(target: ReportTarget) -> Self {
        match target {
            ReportTarget::Stream(id) => AuditTarget::Stream(id),
            ReportTarget::User(id) => AuditTarget::User(id),
            ReportTarget::ChatMessage(id) => AuditTarget::ChatMessage(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub reporter_id: UserId,
    pub target: ReportTarget,
    pub reason: String,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub assignee: Option<TeamMemberId>,
    pub resolution_notes: Vec<ModNote>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Visible,
    Held,
    Deleted,
    AutoDeleted,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Visible => "visible",
            MessageStatus::Held => "held",
            MessageStatus::Deleted => "deleted",
            MessageStatus::AutoDeleted => "auto_deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub stream_id: StreamId,
    pub user_id: UserId,
    pub content: String,
    pub status: MessageStatus,
    /// 0.0 (clean) to 1.0 (certainly abusive), from the scripted auto-mod.
    pub moderation_score: f32,
    pub flags: Vec<String>,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationSettings {
    pub auto_mod_enabled: bool,
    pub toxicity_threshold: f32,
    pub spam_threshold: f32,
    pub hold_links_from_new_users: bool,
    pub slow_mode_seconds: u32,
    pub blocked_keywords: Vec<String>,
    pub auto_escalate_critical: bool,
}

/// Partial update for [`ModerationSettings`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModerationSettingsPatch {
    pub auto_mod_enabled: Option<bool>,
    pub toxicity_threshold: Option<f32>,
    pub spam_threshold: Option<f32>,
    pub hold_links_from_new_users: Option<bool>,
    pub slow_mode_seconds: Option<u32>,
    pub auto_escalate_critical: Option<bool>,
}

impl ModerationSettingsPatch {
    pub fn apply(&self, settings: &mut ModerationSettings) {
        if let Some(v) = self.auto_mod_enabled {
            settings.auto_mod_enabled = v;
        }
        if let Some(v) = self.toxicity_threshold {
            settings.toxicity_threshold = v.clamp(0.0, 1.0);
        }
        if let Some(v) = self.spam_threshold {
            settings.spam_threshold = v.clamp(0.0, 1.0);
        }
        if let Some(v) = self.hold_links_from_new_users {
            settings.hold_links_from_new_users = v;
        }
        if let Some(v) = self.slow_mode_seconds {
            settings.slow_mode_seconds = v;
        }
        if let Some(v) = self.auto_escalate_critical {
            settings.auto_escalate_critical = v;
        }
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.auto_mod_enabled.is_some() {
            fields.push("auto_mod_enabled");
        }
        if self.toxicity_threshold.is_some() {
            fields.push("toxicity_threshold");
        }
        if self.spam_threshold.is_some() {
            fields.push("spam_threshold");
        }
        if self.hold_links_from_new_users.is_some() {
            fields.push("hold_links_from_new_users");
        }
        if self.slow_mode_seconds.is_some() {
            fields.push("slow_mode_seconds");
        }
        if self.auto_escalate_critical.is_some() {
            fields.push("auto_escalate_critical");
        }
        fields
    }
}

/// Which record each detail drawer is showing. Fields are independent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LivestreamSelection {
    pub stream: Option<StreamId>,
    pub user: Option<UserId>,
    pub report: Option<ReportId>,
    pub message: Option<MessageId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivestreamSnapshot {
    pub users: Vec<StreamUser>,
    pub streams: Vec<Stream>,
    pub reports: Vec<Report>,
    pub messages: Vec<ChatMessage>,
    pub team: Vec<TeamMember>,
    pub audit: AuditLog,
    pub settings: ModerationSettings,
    pub selection: LivestreamSelection,
}

impl StoreSnapshot for LivestreamSnapshot {
    type Selection = LivestreamSelection;

    fn audit(&self) -> &AuditLog {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditLog {
        &mut self.audit
    }

    fn selection_mut(&mut self) -> &mut LivestreamSelection {
        &mut self.selection
    }
}

impl Entity for StreamUser {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

impl Entity for Stream {
    type Id = StreamId;

    fn id(&self) -> StreamId {
        self.id
    }
}

impl Entity for Report {
    type Id = ReportId;

    fn id(&self) -> ReportId {
        self.id
    }
}

impl Entity for ChatMessage {
    type Id = MessageId;

    fn id(&self) -> MessageId {
        self.id
    }
}

impl_collection!(LivestreamSnapshot, StreamUser, users);
impl_collection!(LivestreamSnapshot, Stream, streams);
impl_collection!(LivestreamSnapshot, Report, reports);
impl_collection!(LivestreamSnapshot, ChatMessage, messages);
impl_collection!(LivestreamSnapshot, TeamMember, team);
