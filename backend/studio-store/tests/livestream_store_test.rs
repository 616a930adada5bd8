mod common;

use std::fmt::Debug;
use std::sync::Arc;
use studio_store::livestream::{
    LivestreamStore, MessageStatus, ModerationSettingsPatch, ReportTarget, StreamStatus, UserStatus, UserTier,
};
use studio_store::models::{
    InviteMember, MemberStatus, MessageId, ReportId, ReportPriority, ReportStatus, StreamId, TeamRole, UserId,
};
use studio_store::{AuditAction, AuditTarget, ChangeKind, Store, StoreError, StoreKind};
use tokio::sync::broadcast::error::TryRecvError;

fn store() -> LivestreamStore {
    LivestreamStore::new(common::options(), common::fixed_clock())
}

fn active_user_without_warnings(store: &LivestreamStore) -> UserId {
    store
        .snapshot()
        .users
        .iter()
        .find(|u| u.status == UserStatus::Active && u.warning_count == 0)
        .expect("seed has a clean active user")
        .id
}

fn expect_latest(store: &LivestreamStore, target: AuditTarget, action: AuditAction) {
    let snapshot = store.snapshot();
    let latest = snapshot.audit.latest().unwrap();
    assert_eq!(latest.target, Some(target));
    assert_eq!(latest.action, action);
}

#[test]
fn test_warn_user_with_reason_spam() {
    let mut store = store();
    let id = active_user_without_warnings(&store);
    let audit_before = store.snapshot().audit.len();

    assert!(store.warn_user(id, "spam").unwrap());

    let user = store.user(id).unwrap();
    assert_eq!(user.warning_count, 1);
    assert!(user.notes.last().unwrap().body.contains("spam"));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.audit.len(), audit_before + 1);
    let event = snapshot.audit.latest().unwrap();
    assert_eq!(event.action.as_str(), "user_warned");
    assert_eq!(event.target, Some(AuditTarget::User(id)));
    assert_eq!(event.actor, "Studio Admin");
    assert_eq!(event.at, common::fixed_now());
}

#[test]
fn test_action_only_touches_target() {
    let mut store = store();
    let before = store.snapshot();
    let target = before.users[0].id;

    store.suspend_user(target, "chat spam", 24).unwrap();

    let after = store.snapshot();
    for (old, new) in before.users.iter().zip(after.users.iter()) {
        if old.id == target {
            assert_eq!(new.status, UserStatus::Suspended);
            assert_eq!(new.suspended_until, Some(common::fixed_now() + chrono::Duration::hours(24)));
        } else {
            assert_eq!(old, new);
        }
    }
    assert_eq!(before.streams, after.streams);
    assert_eq!(before.reports, after.reports);
    assert_eq!(before.messages, after.messages);
}

#[test]
fn test_unknown_id_is_a_silent_no_op() {
    let mut store = store();
    let mut changes = store.subscribe();
    let before = store.snapshot();

    assert!(!store.ban_user(UserId::new(), "nobody").unwrap());
    assert!(!store.end_stream(StreamId::new(), "nothing").unwrap());
    assert_eq!(store.purge_user_messages(UserId::new()).unwrap(), 0);

    assert_eq!(*store.snapshot(), *before);
    assert!(matches!(changes.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn test_every_action_appends_one_matching_event() {
    let mut store = store();
    let snapshot = store.snapshot();
    let stream = snapshot.streams[0].id;
    let report = snapshot
        .reports
        .iter()
        .find(|r| r.status == ReportStatus::Pending)
        .unwrap()
        .id;
    let message = snapshot.messages[0].id;

    let len = store.snapshot().audit.len();
    store.mute_stream(stream).unwrap();
    assert_eq!(store.snapshot().audit.len(), len + 1);
    expect_latest(&store, AuditTarget::Stream(stream), AuditAction::StreamMuted);

    store.flag_stream(stream, "graphic content").unwrap();
    assert_eq!(store.snapshot().audit.len(), len + 2);
    expect_latest(&store, AuditTarget::Stream(stream), AuditAction::StreamFlagged);

    store.escalate_report(report, "needs legal").unwrap();
    assert_eq!(store.snapshot().audit.len(), len + 3);
    expect_latest(&store, AuditTarget::Report(report), AuditAction::ReportEscalated);

    store.delete_message(message).unwrap();
    assert_eq!(store.snapshot().audit.len(), len + 4);
    expect_latest(&store, AuditTarget::ChatMessage(message), AuditAction::MessageDeleted);
}

#[test]
fn test_stats_follow_mutations() {
    let mut store = store();
    let before = store.stats();
    let live = store
        .snapshot()
        .streams
        .iter()
        .find(|s| s.status == StreamStatus::Live)
        .unwrap()
        .clone();

    store.end_stream(live.id, "terms violation").unwrap();

    let after = store.stats();
    assert_eq!(after.live_streams, before.live_streams - 1);
    assert_eq!(after.total_viewers, before.total_viewers - u64::from(live.viewer_count));
    assert_eq!(after.audit_events, before.audit_events + 1);

    let ended = store.stream(live.id).unwrap();
    assert_eq!(ended.status, StreamStatus::Ended);
    assert_eq!(ended.viewer_count, 0);
    assert_eq!(ended.ended_at, Some(common::fixed_now()));
}

#[test]
fn test_reset_matches_fresh_seed() {
    let fresh = store().snapshot();
    let mut store = store();
    let user = store.snapshot().users[0].id;

    store.ban_user(user, "testing").unwrap();
    store.add_blocked_keyword("giveaway").unwrap();
    store.select_user(Some(user));
    store
        .invite_member(InviteMember {
            name: "Robin".to_string(),
            email: "robin@studio.dev".to_string(),
            role: TeamRole::Moderator,
        })
        .unwrap();
    assert_ne!(*store.snapshot(), *fresh);

    store.reset();
    assert_eq!(*store.snapshot(), *fresh);
    assert_eq!(store.selection().user, None);
}

#[test]
fn test_rebanning_a_banned_user_is_allowed() {
    let mut store = store();
    let banned = store
        .snapshot()
        .users
        .iter()
        .find(|u| u.status == UserStatus::Banned)
        .unwrap()
        .clone();
    let audit_before = store.snapshot().audit.len();

    assert!(store.ban_user(banned.id, "ban evasion").unwrap());

    let user = store.user(banned.id).unwrap();
    assert_eq!(user.status, UserStatus::Banned);
    assert_eq!(user.strike_count, banned.strike_count + 1);
    assert_eq!(user.notes.len(), banned.notes.len() + 1);
    assert_eq!(store.snapshot().audit.len(), audit_before + 1);
}

#[test]
fn test_reject_policy_refuses_terminal_records() {
    let mut store = LivestreamStore::new(common::rejecting_options(), common::fixed_clock());
    let snapshot = store.snapshot();
    let banned = snapshot.users.iter().find(|u| u.status == UserStatus::Banned).unwrap().id;
    let resolved = snapshot
        .reports
        .iter()
        .find(|r| r.status == ReportStatus::Resolved)
        .unwrap()
        .id;

    let err = store.ban_user(banned, "again").unwrap_err();
    assert!(matches!(err, StoreError::TerminalState { kind: "user", status: "banned", .. }));

    let err = store.set_report_priority(resolved, ReportPriority::High).unwrap_err();
    assert_eq!(err.code(), "TERMINAL_STATE");

    assert_eq!(*store.snapshot(), *snapshot);
}

#[test]
fn test_subscribers_see_changes() {
    let mut store = store();
    let mut changes = store.subscribe();
    let user = store.snapshot().users[1].id;

    store.warn_user(user, "caps lock").unwrap();
    let change = changes.try_recv().unwrap();
    assert_eq!(change.store, StoreKind::Livestream);
    assert_eq!(change.kind, ChangeKind::Action(AuditAction::UserWarned));
    assert_eq!(change.target, Some(AuditTarget::User(user)));

    store.select_user(Some(user));
    assert_eq!(changes.try_recv().unwrap().kind, ChangeKind::Selection);

    store.reset();
    assert_eq!(changes.try_recv().unwrap().kind, ChangeKind::Reset);
}

#[test]
fn test_old_snapshots_do_not_change() {
    let mut store = store();
    let old = store.snapshot();
    let stream = old.streams[0].id;
    let was_muted = old.streams[0].is_muted;

    store.mute_stream(stream).unwrap();
    store.add_stream_tag(stream, "reviewed").unwrap();

    assert_eq!(old.streams[0].is_muted, was_muted);
    assert!(!old.streams[0].tags.contains(&"reviewed".to_string()));
    assert!(store.stream(stream).unwrap().is_muted);
}

#[test]
fn test_selection_is_not_audited_and_independent() {
    let mut store = store();
    let snapshot = store.snapshot();
    let audit_before = snapshot.audit.len();

    store.select_stream(Some(snapshot.streams[0].id));
    store.select_report(Some(snapshot.reports[0].id));
    assert_eq!(store.selection().stream, Some(snapshot.streams[0].id));
    assert_eq!(store.selection().report, Some(snapshot.reports[0].id));

    // Ids are not validated.
    let unknown = UserId::new();
    store.select_user(Some(unknown));
    assert_eq!(store.selection().user, Some(unknown));

    store.clear_selection();
    assert_eq!(store.selection().stream, None);
    assert_eq!(store.snapshot().audit.len(), audit_before);
}

#[test]
fn test_purge_user_messages() {
    let mut store = store();
    let snapshot = store.snapshot();
    let author = snapshot.messages[0].user_id;
    let expected = snapshot
        .messages
        .iter()
        .filter(|m| m.user_id == author && matches!(m.status, MessageStatus::Visible | MessageStatus::Held))
        .count();

    let purged = store.purge_user_messages(author).unwrap();
    assert_eq!(purged, expected);
    assert!(store
        .messages_in_stream(snapshot.messages[0].stream_id)
        .iter()
        .filter(|m| m.user_id == author)
        .all(|m| matches!(m.status, MessageStatus::Deleted | MessageStatus::AutoDeleted)));
    if purged > 0 {
        let event = store.snapshot().audit.latest().unwrap().clone();
        assert_eq!(event.action, AuditAction::MessagesPurged);
        assert_eq!(event.target, Some(AuditTarget::User(author)));
    }
}

#[test]
fn test_report_lookup_by_target() {
    let store = store();
    let snapshot = store.snapshot();
    let report = &snapshot.reports[0];
    let reports = store.reports_for(report.target);
    assert!(reports.iter().any(|r| r.id == report.id));
    assert!(store.resolve_report_target(&ReportTarget::User(UserId::new())).is_none());
}

#[test]
fn test_invite_validation_and_accept() {
    let mut store = store();
    let err = store
        .invite_member(InviteMember {
            name: "Kim".to_string(),
            email: "not-an-email".to_string(),
            role: TeamRole::Support,
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let id = store
        .invite_member(InviteMember {
            name: "Kim".to_string(),
            email: "kim@studio.dev".to_string(),
            role: TeamRole::Support,
        })
        .unwrap();
    assert!(store.accept_invite(id).unwrap());
    assert!(!store.accept_invite(id).unwrap());
    assert!(store.member(id).unwrap().has_permission("reports.view"));
}

#[test]
fn test_settings_patch_is_audited_once() {
    let mut store = store();
    let before = store.snapshot().audit.len();
    store
        .update_settings(ModerationSettingsPatch {
            slow_mode_seconds: Some(10),
            auto_mod_enabled: Some(false),
            ..Default::default()
        })
        .unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.settings.slow_mode_seconds, 10);
    assert!(!snapshot.settings.auto_mod_enabled);
    assert_eq!(snapshot.audit.len(), before + 1);
    assert_eq!(snapshot.audit.latest().unwrap().target, Some(AuditTarget::Settings));
}

type Action = Box<dyn FnOnce(&mut LivestreamStore) -> studio_store::Result<bool>>;

fn act(
    name: &'static str,
    target: AuditTarget,
    f: impl FnOnce(&mut LivestreamStore) -> studio_store::Result<bool> + 'static,
) -> (&'static str, AuditTarget, Action) {
    (name, target, Box::new(f))
}

/// Every status-lifecycle action, aimed at the given ids.
fn lifecycle_actions(
    user: UserId,
    stream: StreamId,
    tag: String,
    report: ReportId,
    message: MessageId,
) -> Vec<(&'static str, AuditTarget, Action)> {
    let member = store().snapshot().team[0].id;
    vec![
        act("warn_user", AuditTarget::User(user), move |s| s.warn_user(user, "spam")),
        act("suspend_user", AuditTarget::User(user), move |s| s.suspend_user(user, "spam", 24)),
        act("ban_user", AuditTarget::User(user), move |s| s.ban_user(user, "spam")),
        act("unban_user", AuditTarget::User(user), move |s| s.unban_user(user)),
        act("add_user_note", AuditTarget::User(user), move |s| s.add_user_note(user, "watch")),
        act("set_user_tier", AuditTarget::User(user), move |s| s.set_user_tier(user, UserTier::Partner)),
        act("mute_stream", AuditTarget::Stream(stream), move |s| s.mute_stream(stream)),
        act("unmute_stream", AuditTarget::Stream(stream), move |s| s.unmute_stream(stream)),
        act("end_stream", AuditTarget::Stream(stream), move |s| s.end_stream(stream, "tos")),
        act("delete_stream", AuditTarget::Stream(stream), move |s| s.delete_stream(stream, "tos")),
        act("flag_stream", AuditTarget::Stream(stream), move |s| s.flag_stream(stream, "gore")),
        act("unflag_stream", AuditTarget::Stream(stream), move |s| s.unflag_stream(stream)),
        act("set_age_restricted", AuditTarget::Stream(stream), move |s| s.set_age_restricted(stream, true)),
        act("add_stream_note", AuditTarget::Stream(stream), move |s| s.add_stream_note(stream, "ok")),
        act("add_stream_tag", AuditTarget::Stream(stream), move |s| s.add_stream_tag(stream, "reviewed")),
        act("remove_stream_tag", AuditTarget::Stream(stream), move |s| s.remove_stream_tag(stream, &tag)),
        act("start_review", AuditTarget::Report(report), move |s| s.start_review(report)),
        act("resolve_report", AuditTarget::Report(report), move |s| s.resolve_report(report, "done")),
        act("dismiss_report", AuditTarget::Report(report), move |s| s.dismiss_report(report, "noise")),
        act("escalate_report", AuditTarget::Report(report), move |s| s.escalate_report(report, "legal")),
        act("assign_report", AuditTarget::Report(report), move |s| s.assign_report(report, member)),
        act("set_report_priority", AuditTarget::Report(report), move |s| {
            s.set_report_priority(report, ReportPriority::High)
        }),
        act("delete_message", AuditTarget::ChatMessage(message), move |s| s.delete_message(message)),
        act("restore_message", AuditTarget::ChatMessage(message), move |s| s.restore_message(message)),
        act("approve_message", AuditTarget::ChatMessage(message), move |s| s.approve_message(message)),
    ]
}

fn assert_neighbours_unchanged<T: PartialEq + Debug>(
    action: &str,
    before: &[T],
    after: &[T],
    is_target: impl Fn(&T) -> bool,
) {
    assert_eq!(before.len(), after.len(), "{action} changed a collection size");
    for (old, new) in before.iter().zip(after) {
        if !is_target(old) {
            assert_eq!(old, new, "{action} touched a record it was not aimed at");
        }
    }
}

#[test]
fn test_every_lifecycle_action_ignores_unknown_ids() {
    let actions = lifecycle_actions(
        UserId::new(),
        StreamId::new(),
        "music".to_string(),
        ReportId::new(),
        MessageId::new(),
    );
    for (name, _, action) in actions {
        let mut store = store();
        let mut changes = store.subscribe();
        let before = store.snapshot();

        assert!(!action(&mut store).unwrap(), "{name} reported a change");

        let after = store.snapshot();
        assert_eq!(*after, *before, "{name} changed state");
        assert_eq!(after.audit.len(), before.audit.len(), "{name} wrote an audit entry");
        assert!(Arc::ptr_eq(&after, &before), "{name} copied the snapshot");
        assert!(matches!(changes.try_recv(), Err(TryRecvError::Empty)), "{name} notified");
    }
}

#[test]
fn test_every_lifecycle_action_only_touches_its_target() {
    let seed = store().snapshot();
    let stream = &seed.streams[0];
    let report = seed
        .reports
        .iter()
        .find(|r| r.status == ReportStatus::Pending)
        .unwrap()
        .id;
    let actions = lifecycle_actions(
        seed.users[0].id,
        stream.id,
        stream.tags[0].clone(),
        report,
        seed.messages[0].id,
    );

    for (name, target, action) in actions {
        let mut store = store();
        let before = store.snapshot();

        assert!(action(&mut store).unwrap(), "{name} did not apply");

        let after = store.snapshot();
        assert_neighbours_unchanged(name, &before.users, &after.users, |u| AuditTarget::User(u.id) == target);
        assert_neighbours_unchanged(name, &before.streams, &after.streams, |s| {
            AuditTarget::Stream(s.id) == target
        });
        assert_neighbours_unchanged(name, &before.reports, &after.reports, |r| {
            AuditTarget::Report(r.id) == target
        });
        assert_neighbours_unchanged(name, &before.messages, &after.messages, |m| {
            AuditTarget::ChatMessage(m.id) == target
        });
        assert_eq!(before.team, after.team, "{name} touched the team");
        assert_eq!(before.settings, after.settings, "{name} touched settings");
        assert_eq!(after.audit.len(), before.audit.len() + 1, "{name} audit count");
        assert_eq!(after.audit.latest().unwrap().target, Some(target), "{name} audit target");
    }
}

#[test]
fn test_rejected_conditional_updates_keep_the_snapshot() {
    let mut store = store();
    let stream = store.snapshot().streams[0].clone();
    let held = store.snapshot();

    assert!(!store.add_stream_tag(stream.id, &stream.tags[0]).unwrap());
    assert!(!store.remove_stream_tag(stream.id, "not-a-tag").unwrap());
    let active = held.team.iter().find(|m| m.status == MemberStatus::Active).unwrap();
    assert!(!store.accept_invite(active.id).unwrap());

    assert!(Arc::ptr_eq(&held, &store.snapshot()));
}
