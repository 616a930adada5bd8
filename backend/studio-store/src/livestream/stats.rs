// Overview dashboard statistics, recomputed by scanning every collection.
use serde::Serialize;

use super::models::{LivestreamSnapshot, MessageStatus, StreamStatus, UserStatus};
use crate::models::{MemberStatus, ReportPriority, ReportStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LivestreamStats {
    pub live_streams: usize,
    pub total_viewers: u64,
    pub peak_concurrent: u32,
    pub degraded_streams: usize,
    pub flagged_streams: usize,
    pub pending_reports: usize,
    pub escalated_reports: usize,
    pub critical_open_reports: usize,
    pub held_messages: usize,
    pub auto_deleted_messages: usize,
    pub suspended_users: usize,
    pub banned_users: usize,
    pub active_team_members: usize,
    pub audit_events: usize,
}

pub fn compute_stats(snapshot: &LivestreamSnapshot) -> LivestreamStats {
    let live = || snapshot.streams.iter().filter(|s| s.status == StreamStatus::Live);
    let reports_with = |status: ReportStatus| snapshot.reports.iter().filter(|r| r.status == status).count();
    let messages_with = |status: MessageStatus| snapshot.messages.iter().filter(|m| m.status == status).count();
    let users_with = |status: UserStatus| snapshot.users.iter().filter(|u| u.status == status).count();

    LivestreamStats {
        live_streams: live().count(),
        total_viewers: live().map(|s| u64::from(s.viewer_count)).sum(),
        peak_concurrent: live().map(|s| s.viewer_count).max().unwrap_or(0),
        degraded_streams: live().filter(|s| s.health.is_degraded()).count(),
        flagged_streams: snapshot.streams.iter().filter(|s| s.is_flagged).count(),
        pending_reports: reports_with(ReportStatus::Pending),
        escalated_reports: reports_with(ReportStatus::Escalated),
        critical_open_reports: snapshot
            .reports
            .iter()
            .filter(|r| r.priority == ReportPriority::Critical && r.status.is_open())
            .count(),
        held_messages: messages_with(MessageStatus::Held),
        auto_deleted_messages: messages_with(MessageStatus::AutoDeleted),
        suspended_users: users_with(UserStatus::Suspended),
        banned_users: users_with(UserStatus::Banned),
        active_team_members: snapshot
            .team
            .iter()
            .filter(|m| m.status == MemberStatus::Active)
            .count(),
        audit_events: snapshot.audit.len(),
    }
}
