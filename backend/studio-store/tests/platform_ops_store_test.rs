mod common;

use studio_store::models::{AccountId, ReportPriority, ReportStatus, SiteId, TicketId};
use studio_store::platform_ops::{AccountStatus, PlanTier, PlatformOpsStore, SiteStatus, TicketTarget};
use studio_store::{AuditAction, AuditTarget, ChangeKind, Store, StoreError};
use tokio::sync::broadcast::error::TryRecvError;

fn store() -> PlatformOpsStore {
    PlatformOpsStore::new(common::options(), common::fixed_clock())
}

#[test]
fn test_warn_account_updates_only_that_account() {
    let mut store = store();
    let before = store.snapshot();
    let target = before.accounts[0].id;

    assert!(store.warn_account(target, "spam").unwrap());

    let after = store.snapshot();
    for (old, new) in before.accounts.iter().zip(after.accounts.iter()) {
        if old.id == target {
            assert_eq!(new.warning_count, old.warning_count + 1);
            assert!(new.notes.last().unwrap().body.contains("spam"));
        } else {
            assert_eq!(old, new);
        }
    }
    assert_eq!(before.sites, after.sites);
    assert_eq!(after.audit.len(), before.audit.len() + 1);
    let event = after.audit.latest().unwrap();
    assert_eq!(event.action, AuditAction::AccountWarned);
    assert_eq!(event.target, Some(AuditTarget::Account(target)));
}

#[test]
fn test_unknown_ids_change_nothing() {
    let mut store = store();
    let mut changes = store.subscribe();
    let before = store.snapshot();

    assert!(!store.ban_account(AccountId::new(), "x").unwrap());
    assert!(!store.take_down_site(SiteId::new(), "x").unwrap());
    assert!(!store.resolve_ticket(TicketId::new(), "x").unwrap());

    assert_eq!(*store.snapshot(), *before);
    assert!(matches!(changes.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn test_take_down_updates_stats() {
    let mut store = store();
    let before = store.stats();
    let site = store
        .snapshot()
        .sites
        .iter()
        .find(|s| s.status == SiteStatus::Published)
        .unwrap()
        .id;

    store.take_down_site(site, "phishing").unwrap();

    let after = store.stats();
    assert_eq!(after.published_sites, before.published_sites - 1);
    assert_eq!(store.site(site).unwrap().status, SiteStatus::TakenDown);
    assert_eq!(store.site(site).unwrap().monthly_visits, 0);
}

#[test]
fn test_ban_counts_move_between_buckets() {
    let mut store = store();
    let before = store.stats();
    let account = store
        .snapshot()
        .accounts
        .iter()
        .find(|a| a.status == AccountStatus::Active)
        .unwrap()
        .id;

    store.ban_account(account, "fraud").unwrap();
    let after = store.stats();
    assert_eq!(after.active_accounts, before.active_accounts - 1);
    assert_eq!(after.banned_accounts, before.banned_accounts + 1);
    assert_eq!(after.accounts, before.accounts);

    // Re-banning is permitted by default.
    assert!(store.ban_account(account, "fraud again").unwrap());
    assert_eq!(store.account(account).unwrap().strike_count, 2);
}

#[test]
fn test_ticket_workflow() {
    let mut store = store();
    let snapshot = store.snapshot();
    let ticket = snapshot
        .tickets
        .iter()
        .find(|t| t.status == ReportStatus::Pending)
        .unwrap()
        .clone();
    let support = snapshot.team[2].id;
    let critical_before = store.stats().critical_open_tickets;
    assert_ne!(ticket.priority, ReportPriority::Critical);

    store.start_ticket_review(ticket.id).unwrap();
    store.assign_ticket(ticket.id, support).unwrap();
    store.set_ticket_priority(ticket.id, ReportPriority::Critical).unwrap();
    assert_eq!(store.stats().critical_open_tickets, critical_before + 1);

    store.resolve_ticket(ticket.id, "DNS record fixed").unwrap();
    assert_eq!(store.stats().critical_open_tickets, critical_before);
    let resolved = store.ticket(ticket.id).unwrap();
    assert_eq!(resolved.status, ReportStatus::Resolved);
    assert_eq!(resolved.assignee, Some(support));
    assert_eq!(resolved.resolution_notes.last().unwrap().body, "DNS record fixed");
    assert_eq!(resolved.updated_at, common::fixed_now());

    let events = store.snapshot().audit.for_target(&AuditTarget::Ticket(ticket.id)).len();
    assert_eq!(events, 4);
}

#[test]
fn test_reject_policy_on_closed_ticket() {
    let mut store = PlatformOpsStore::new(common::rejecting_options(), common::fixed_clock());
    let closed = store
        .snapshot()
        .tickets
        .iter()
        .find(|t| t.status == ReportStatus::Resolved)
        .unwrap()
        .id;
    let before = store.snapshot();

    let err = store.assign_ticket(closed, before.team[0].id).unwrap_err();
    assert!(matches!(err, StoreError::TerminalState { kind: "ticket", .. }));
    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn test_ticket_targets_point_at_tagged_collections() {
    let store = store();
    for ticket in &store.snapshot().tickets {
        match ticket.target {
            TicketTarget::Site(id) => assert!(store.site(id).is_some()),
            TicketTarget::Account(id) => assert!(store.account(id).is_some()),
        }
        assert!(store.tickets_for(ticket.target).iter().any(|t| t.id == ticket.id));
    }
}

#[test]
fn test_plan_change_updates_plan_buckets() {
    let mut store = store();
    let account = store
        .snapshot()
        .accounts
        .iter()
        .find(|a| a.plan == PlanTier::Free)
        .unwrap()
        .id;
    let before = store.stats();

    store.change_plan(account, PlanTier::Pro).unwrap();

    let after = store.stats();
    assert_eq!(after.accounts_by_plan[&PlanTier::Free], before.accounts_by_plan[&PlanTier::Free] - 1);
    assert_eq!(after.accounts_by_plan[&PlanTier::Pro], before.accounts_by_plan[&PlanTier::Pro] + 1);
    assert!(store.account(account).unwrap().seats >= PlanTier::Pro.included_seats());
}

#[test]
fn test_maintenance_mode_and_reset() {
    let fresh = store().snapshot();
    let mut store = store();
    let mut changes = store.subscribe();

    store.set_maintenance_mode(true).unwrap();
    assert!(store.snapshot().settings.maintenance_mode);
    let change = changes.try_recv().unwrap();
    assert_eq!(change.kind, ChangeKind::Action(AuditAction::MaintenanceModeChanged));
    assert_eq!(change.target, Some(AuditTarget::Settings));

    store.select_account(Some(fresh.accounts[0].id));
    store.reset();
    assert_eq!(*store.snapshot(), *fresh);
    assert_eq!(store.selection().account, None);
}

#[test]
fn test_account_tags_ignore_blank_and_duplicates() {
    let mut store = store();
    let account = store.snapshot().accounts[0].id;
    let before = store.snapshot().audit.len();

    assert!(store.add_account_tag(account, "at-risk").unwrap());
    assert!(!store.add_account_tag(account, "at-risk").unwrap());
    assert!(!store.add_account_tag(account, "   ").unwrap());
    assert!(store.remove_account_tag(account, "at-risk").unwrap());
    assert!(!store.remove_account_tag(account, "at-risk").unwrap());

    assert_eq!(store.snapshot().audit.len(), before + 2);
}

#[test]
fn test_enabled_flag_count_tracks_toggle() {
    let mut store = store();
    let before = store.stats().enabled_flags;
    let flag = store.snapshot().flags.iter().find(|f| !f.enabled).unwrap().id;
    store.toggle_feature_flag(flag).unwrap();
    assert_eq!(store.stats().enabled_flags, before + 1);
    assert!(store.flag_by_key(&store.flag(flag).unwrap().key).unwrap().enabled);
}
