mod common;

use studio_store::branding::{
    AssetKind, AssetStatus, BrandSettingsPatch, BrandingStore, ColorRole, FontRole, NewAsset, ReviewStatus,
};
use studio_store::models::{AssetId, SwatchId};
use studio_store::{AuditAction, AuditTarget, ChangeKind, Store, StoreError};
use tokio::sync::broadcast::error::TryRecvError;

fn store() -> BrandingStore {
    BrandingStore::new(common::options(), common::fixed_clock())
}

fn new_asset(name: &str) -> NewAsset {
    NewAsset {
        name: name.to_string(),
        kind: AssetKind::Icon,
        file_size_kb: 64,
        tags: vec!["web".to_string()],
    }
}

#[test]
fn test_upload_is_audited_and_counted() {
    let mut store = store();
    let before = store.stats();

    let id = store.upload_asset(new_asset("Notification bell")).unwrap();

    let asset = store.asset(id).unwrap();
    assert_eq!(asset.status, AssetStatus::Draft);
    assert_eq!(asset.uploaded_by, "Studio Admin");
    assert_eq!(asset.created_at, common::fixed_now());

    let after = store.stats();
    assert_eq!(after.assets, before.assets + 1);
    assert_eq!(after.draft_assets, before.draft_assets + 1);
    let event = store.snapshot().audit.latest().unwrap().clone();
    assert_eq!(event.action, AuditAction::AssetUploaded);
    assert_eq!(event.target, Some(AuditTarget::Asset(id)));
}

#[test]
fn test_upload_rejects_invalid_input() {
    let mut store = store();
    let before = store.snapshot();
    let err = store
        .upload_asset(NewAsset {
            file_size_kb: 0,
            ..new_asset("Empty file")
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn test_submit_and_approve_updates_review_counts() {
    let mut store = store();
    let draft = store
        .snapshot()
        .assets
        .iter()
        .find(|a| a.status == AssetStatus::Draft)
        .unwrap()
        .clone();
    let before = store.stats();

    let review = store.submit_for_review(draft.id).unwrap().unwrap();
    assert_eq!(store.stats().pending_reviews, before.pending_reviews + 1);
    assert_eq!(store.review(review).unwrap().asset_id, draft.id);

    store.approve_asset(draft.id).unwrap();
    let after = store.stats();
    assert_eq!(after.pending_reviews, before.pending_reviews);
    assert_eq!(after.approved_assets, before.approved_assets + 1);
    assert_eq!(store.review(review).unwrap().status, ReviewStatus::Approved);
    assert_eq!(store.asset(draft.id).unwrap().version, draft.version + 1);
}

#[test]
fn test_unknown_asset_is_a_no_op() {
    let mut store = store();
    let mut changes = store.subscribe();
    let before = store.snapshot();

    assert_eq!(store.submit_for_review(AssetId::new()).unwrap(), None);
    assert!(!store.approve_asset(AssetId::new()).unwrap());
    assert!(!store.toggle_favorite(AssetId::new()));
    assert!(!store.lock_swatch(SwatchId::new()).unwrap());

    assert_eq!(*store.snapshot(), *before);
    assert!(matches!(changes.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn test_quiet_changes_notify_without_audit() {
    let mut store = store();
    let mut changes = store.subscribe();
    let asset = store.snapshot().assets[0].id;
    let audit_before = store.snapshot().audit.len();

    store.record_usage(asset);
    let change = changes.try_recv().unwrap();
    assert_eq!(change.kind, ChangeKind::Quiet);
    assert_eq!(change.target, Some(AuditTarget::Asset(asset)));
    assert_eq!(store.snapshot().audit.len(), audit_before);
}

#[test]
fn test_archive_and_restore() {
    let mut store = store();
    let asset = store.snapshot().assets[0].id;

    assert!(store.archive_asset(asset).unwrap());
    assert_eq!(store.asset(asset).unwrap().status, AssetStatus::Archived);
    assert!(store.restore_asset(asset).unwrap());
    assert_eq!(store.asset(asset).unwrap().status, AssetStatus::Draft);
    // Only archived assets can be restored.
    assert!(!store.restore_asset(asset).unwrap());
}

#[test]
fn test_reject_policy_blocks_archived_assets() {
    let mut store = BrandingStore::new(common::rejecting_options(), common::fixed_clock());
    let archived = store
        .snapshot()
        .assets
        .iter()
        .find(|a| a.status == AssetStatus::Archived)
        .unwrap()
        .id;
    let before = store.snapshot();

    let err = store.approve_asset(archived).unwrap_err();
    assert!(matches!(err, StoreError::TerminalState { kind: "asset", status: "archived", .. }));
    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn test_contrast_stat_follows_palette() {
    let mut store = store();
    assert!(store.stats().meets_min_contrast);

    let primary = store
        .snapshot()
        .swatches
        .iter()
        .find(|s| s.role == ColorRole::Primary)
        .unwrap()
        .id;
    store.unlock_swatch(primary).unwrap();
    // Near-white on white.
    assert!(store.update_swatch_hex(primary, "#FAFAFA").unwrap());

    let stats = store.stats();
    assert!(!stats.meets_min_contrast);
    assert!(stats.primary_on_background_contrast.unwrap() < 1.1);
}

#[test]
fn test_set_font_and_voice_keywords() {
    let mut store = store();
    assert!(store.set_font(FontRole::Body, "Source Sans 3", 400, 17).unwrap());
    let body = store.font_for(FontRole::Body).unwrap();
    assert_eq!(body.family, "Source Sans 3");
    assert_eq!(body.size_px, 17);
    assert_eq!(
        store.snapshot().audit.latest().unwrap().target,
        Some(AuditTarget::Font(body.id))
    );

    assert!(store.add_voice_keyword("  Playful ").unwrap());
    assert!(!store.add_voice_keyword("playful").unwrap());
    assert!(store.snapshot().settings.voice_keywords.contains(&"playful".to_string()));
    assert!(store.remove_voice_keyword("PLAYFUL").unwrap());
}

#[test]
fn test_settings_patch_and_reset() {
    let fresh = store().snapshot();
    let mut store = store();

    store
        .update_settings(BrandSettingsPatch {
            min_contrast_ratio: Some(50.0),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(store.snapshot().settings.min_contrast_ratio, 21.0);

    store.select_swatch(Some(fresh.swatches[0].id));
    store.reset();
    assert_eq!(*store.snapshot(), *fresh);
}

#[test]
fn test_refused_edits_share_the_old_snapshot() {
    let mut store = store();
    let held = store.snapshot();
    let locked = held.swatches.iter().find(|s| s.locked).unwrap();
    let draft = held.assets.iter().find(|a| a.status == AssetStatus::Draft).unwrap();
    let tagged = held.assets.iter().find(|a| !a.tags.is_empty()).unwrap();

    assert!(!store.update_swatch_hex(locked.id, "#000000").unwrap());
    assert!(!store.restore_asset(draft.id).unwrap());
    assert!(!store.add_asset_tag(tagged.id, &tagged.tags[0]).unwrap());
    assert!(!store.remove_asset_tag(tagged.id, "not-a-tag").unwrap());

    assert!(std::sync::Arc::ptr_eq(&held, &store.snapshot()));
}
