//! Brand kit store - asset library with review workflow, palette, type
//! scale and brand voice settings.

use std::sync::Arc;
use tokio::sync::broadcast;
use validator::Validate;

use super::contrast;
use super::models::*;
use super::seed::seed;
use super::stats::{compute_stats, BrandingStats};
use crate::audit::{AuditAction, AuditTarget};
use crate::clock::Clock;
use crate::config::StoreOptions;
use crate::error::Result;
use crate::models::{AssetId, FontId, ModNote, ReviewId, SwatchId};
use crate::store::{
    add_unique, can_add, has_value, remove_value, ChangeKind, Store, StoreChange, StoreCore, StoreKind,
};

pub struct BrandingStore {
    core: StoreCore<BrandingSnapshot>,
}

#[derive(Validate)]
struct HexInput {
    #[validate(custom(function = "validate_hex"))]
    hex: String,
}

fn asset_archived(asset: &BrandAsset) -> Option<&'static str> {
    (asset.status == AssetStatus::Archived).then(|| asset.status.as_str())
}

impl BrandingStore {
    pub fn new(options: StoreOptions, clock: Arc<dyn Clock>) -> Self {
        Self {
            core: StoreCore::new(StoreKind::Branding, seed, clock, options),
        }
    }

    pub fn asset(&self, id: AssetId) -> Option<&BrandAsset> {
        self.core.find(id)
    }

    pub fn swatch(&self, id: SwatchId) -> Option<&ColorSwatch> {
        self.core.find(id)
    }

    pub fn font(&self, id: FontId) -> Option<&FontStyle> {
        self.core.find(id)
    }

    pub fn font_for(&self, role: FontRole) -> Option<&FontStyle> {
        self.core.state().fonts.iter().find(|f| f.role == role)
    }

    pub fn review(&self, id: ReviewId) -> Option<&AssetReview> {
        self.core.find(id)
    }

    pub fn reviews_for(&self, asset_id: AssetId) -> Vec<&AssetReview> {
        self.core
            .state()
            .reviews
            .iter()
            .filter(|r| r.asset_id == asset_id)
            .collect()
    }

    /// Contrast ratio between two swatches, `None` if either is unknown.
    pub fn contrast_ratio(&self, a: SwatchId, b: SwatchId) -> Option<f64> {
        contrast::contrast_ratio(&self.swatch(a)?.hex, &self.swatch(b)?.hex)
    }

    // ---- assets --------------------------------------------------------

    pub fn upload_asset(&mut self, input: NewAsset) -> Result<AssetId> {
        input.validate()?;
        let now = self.core.now();
        let mut tags = Vec::new();
        for tag in &input.tags {
            add_unique(&mut tags, tag);
        }
        let asset = BrandAsset {
            id: AssetId::new(),
            name: input.name.trim().to_string(),
            kind: input.kind,
            status: AssetStatus::Draft,
            uploaded_by: self.core.actor_name().to_string(),
            tags,
            usage_count: 0,
            file_size_kb: input.file_size_kb,
            version: 1,
            is_favorite: false,
            notes: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let id = asset.id;
        let summary = format!("Uploaded {} \"{}\" ({} KB)", asset.kind.as_str(), asset.name, asset.file_size_kb);
        self.core.insert(asset);
        self.core.record(AuditAction::AssetUploaded, AuditTarget::Asset(id), summary);
        Ok(id)
    }

    /// Blank names are ignored.
    pub fn rename_asset(&mut self, id: AssetId, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        let now = self.core.now();
        let mut previous = String::new();
        let applied = self.core.update(id, |asset: &mut BrandAsset| {
            previous = std::mem::replace(&mut asset.name, name.to_string());
            asset.updated_at = now;
        });
        Ok(self.core.finish(applied, AuditAction::AssetRenamed, AuditTarget::Asset(id), || {
            format!("Renamed \"{}\" -> \"{}\"", previous, name)
        }))
    }

    /// Move an asset into review and open a pending review for it. Returns
    /// the new review's id, `None` for an unknown asset.
    pub fn submit_for_review(&mut self, id: AssetId) -> Result<Option<ReviewId>> {
        self.core.guard(id, "asset", asset_archived)?;
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut name = String::new();
        let applied = self.core.update(id, |asset: &mut BrandAsset| {
            asset.status = AssetStatus::InReview;
            asset.updated_at = now;
            name = asset.name.clone();
        });
        if !applied {
            self.core.finish(false, AuditAction::AssetSubmitted, AuditTarget::Asset(id), String::new);
            return Ok(None);
        }

        let review = AssetReview {
            id: ReviewId::new(),
            asset_id: id,
            requested_by: author,
            status: ReviewStatus::Pending,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let review_id = review.id;
        self.core.insert(review);
        self.core.record(
            AuditAction::AssetSubmitted,
            AuditTarget::Asset(id),
            format!("Submitted \"{}\" for review", name),
        );
        Ok(Some(review_id))
    }

    /// Approve an asset, bump its version and close its pending reviews.
    pub fn approve_asset(&mut self, id: AssetId) -> Result<bool> {
        self.core.guard(id, "asset", asset_archived)?;
        let now = self.core.now();
        let mut name = String::new();
        let mut version = 0;
        let applied = self.core.update(id, |asset: &mut BrandAsset| {
            asset.status = AssetStatus::Approved;
            asset.version += 1;
            asset.updated_at = now;
            name = asset.name.clone();
            version = asset.version;
        });
        if applied {
            self.core.update_where(
                |review: &AssetReview| review.asset_id == id && review.status == ReviewStatus::Pending,
                |review| {
                    review.status = ReviewStatus::Approved;
                    review.updated_at = now;
                },
            );
        }
        Ok(self.core.finish(applied, AuditAction::AssetApproved, AuditTarget::Asset(id), || {
            format!("Approved \"{}\" (v{})", name, version)
        }))
    }

    /// Send an asset back to draft and attach `comment` to its pending
    /// reviews.
    pub fn request_changes(&mut self, id: AssetId, comment: &str) -> Result<bool> {
        self.core.guard(id, "asset", asset_archived)?;
        let now = self.core.now();
        let author = self.core.actor_name().to_string();
        let mut name = String::new();
        let applied = self.core.update(id, |asset: &mut BrandAsset| {
            asset.status = AssetStatus::Draft;
            asset.updated_at = now;
            asset.notes.push(ModNote::new(now, &author, format!("Changes requested: {}", comment)));
            name = asset.name.clone();
        });
        if applied {
            self.core.update_where(
                |review: &AssetReview| review.asset_id == id && review.status == ReviewStatus::Pending,
                |review| {
                    review.status = ReviewStatus::ChangesRequested;
                    review.comments.push(ModNote::new(now, &author, comment));
                    review.updated_at = now;
                },
            );
        }
        Ok(self.core.finish(applied, AuditAction::AssetChangesRequested, AuditTarget::Asset(id), || {
            format!("Changes requested on \"{}\": {}", name, comment)
        }))
    }

    pub fn archive_asset(&mut self, id: AssetId) -> Result<bool> {
        self.core.guard(id, "asset", asset_archived)?;
        let now = self.core.now();
        let mut name = String::new();
        let applied = self.core.update(id, |asset: &mut BrandAsset| {
            asset.status = AssetStatus::Archived;
            asset.updated_at = now;
            name = asset.name.clone();
        });
        Ok(self.core.finish(applied, AuditAction::AssetArchived, AuditTarget::Asset(id), || {
            format!("Archived \"{}\"", name)
        }))
    }

    /// Bring an archived asset back as a draft. Assets that are not
    /// archived are left alone.
    pub fn restore_asset(&mut self, id: AssetId) -> Result<bool> {
        let now = self.core.now();
        let mut name = String::new();
        let restored = self.core.update_if(
            id,
            |asset: &BrandAsset| asset.status == AssetStatus::Archived,
            |asset: &mut BrandAsset| {
                asset.status = AssetStatus::Draft;
                asset.updated_at = now;
                name = asset.name.clone();
            },
        );
        Ok(self.core.finish(restored, AuditAction::AssetRestored, AuditTarget::Asset(id), || {
            format!("Restored \"{}\"", name)
        }))
    }

    pub fn add_asset_tag(&mut self, id: AssetId, tag: &str) -> Result<bool> {
        let added = self.core.update_if(
            id,
            |asset: &BrandAsset| can_add(&asset.tags, tag),
            |asset: &mut BrandAsset| {
                add_unique(&mut asset.tags, tag);
            },
        );
        Ok(self.core.finish(added, AuditAction::AssetTagAdded, AuditTarget::Asset(id), || {
            format!("Tag added: {}", tag.trim())
        }))
    }

    pub fn remove_asset_tag(&mut self, id: AssetId, tag: &str) -> Result<bool> {
        let removed = self.core.update_if(
            id,
            |asset: &BrandAsset| has_value(&asset.tags, tag),
            |asset: &mut BrandAsset| {
                remove_value(&mut asset.tags, tag);
            },
        );
        Ok(self.core.finish(removed, AuditAction::AssetTagRemoved, AuditTarget::Asset(id), || {
            format!("Tag removed: {}", tag.trim())
        }))
    }

    /// Personal bookmark, not audited.
    pub fn toggle_favorite(&mut self, id: AssetId) -> bool {
        let applied = self.core.update(id, |asset: &mut BrandAsset| {
            asset.is_favorite = !asset.is_favorite;
        });
        self.quiet(applied, AuditTarget::Asset(id))
    }

    /// Count one more use of the asset, not audited.
    pub fn record_usage(&mut self, id: AssetId) -> bool {
        let applied = self.core.update(id, |asset: &mut BrandAsset| {
            asset.usage_count = asset.usage_count.saturating_add(1);
        });
        self.quiet(applied, AuditTarget::Asset(id))
    }

    fn quiet(&mut self, applied: bool, target: AuditTarget) -> bool {
        if applied {
            tracing::trace!(store = self.core.kind().as_str(), target_id = ?target.id_string(), "Quiet update");
            self.core.notify(ChangeKind::Quiet, Some(target));
        }
        applied
    }

    // ---- swatches ------------------------------------------------------

    pub fn add_swatch(&mut self, input: NewSwatch) -> Result<SwatchId> {
        input.validate()?;
        let swatch = ColorSwatch {
            id: SwatchId::new(),
            name: input.name.trim().to_string(),
            hex: normalize_hex(&input.hex),
            role: input.role,
            locked: false,
        };
        let id = swatch.id;
        let summary = format!("Added {} {} as {}", swatch.name, swatch.hex, swatch.role.as_str());
        self.core.insert(swatch);
        self.core.record(AuditAction::SwatchAdded, AuditTarget::Swatch(id), summary);
        Ok(id)
    }

    /// Locked swatches keep their color and report `false`.
    pub fn update_swatch_hex(&mut self, id: SwatchId, hex: &str) -> Result<bool> {
        HexInput { hex: hex.to_string() }.validate()?;
        let hex = normalize_hex(hex);
        let mut previous = String::new();
        let changed = self.core.update_if(
            id,
            |swatch: &ColorSwatch| !swatch.locked,
            |swatch: &mut ColorSwatch| {
                previous = std::mem::replace(&mut swatch.hex, hex.clone());
            },
        );
        Ok(self.core.finish(changed, AuditAction::SwatchUpdated, AuditTarget::Swatch(id), || {
            format!("Color {} -> {}", previous, hex)
        }))
    }

    pub fn lock_swatch(&mut self, id: SwatchId) -> Result<bool> {
        self.set_locked(id, true)
    }

    pub fn unlock_swatch(&mut self, id: SwatchId) -> Result<bool> {
        self.set_locked(id, false)
    }

    fn set_locked(&mut self, id: SwatchId, locked: bool) -> Result<bool> {
        let mut name = String::new();
        let applied = self.core.update(id, |swatch: &mut ColorSwatch| {
            swatch.locked = locked;
            name = swatch.name.clone();
        });
        let action = if locked { AuditAction::SwatchLocked } else { AuditAction::SwatchUnlocked };
        Ok(self.core.finish(applied, action, AuditTarget::Swatch(id), || {
            format!("{} {}", if locked { "Locked" } else { "Unlocked" }, name)
        }))
    }

    // ---- fonts ---------------------------------------------------------

    /// Replace the type style used for `role`.
    pub fn set_font(&mut self, role: FontRole, family: &str, weight: u16, size_px: u16) -> Result<bool> {
        let family = family.trim();
        let Some(id) = self.font_for(role).map(|f| f.id) else {
            return Ok(false);
        };
        if family.is_empty() {
            return Ok(false);
        }
        let applied = self.core.update(id, |font: &mut FontStyle| {
            font.family = family.to_string();
            font.weight = weight;
            font.size_px = size_px;
        });
        Ok(self.core.finish(applied, AuditAction::FontChanged, AuditTarget::Font(id), || {
            format!("{} font set to {} {} {}px", role.as_str(), family, weight, size_px)
        }))
    }

    // ---- settings ------------------------------------------------------

    pub fn update_settings(&mut self, patch: BrandSettingsPatch) -> Result<()> {
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

    pub fn add_voice_keyword(&mut self, keyword: &str) -> Result<bool> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() || self.core.state().settings.voice_keywords.contains(&keyword) {
            return Ok(false);
        }
        self.core
            .update_state(|state| state.settings.voice_keywords.push(keyword.clone()));
        self.core.record(
            AuditAction::VoiceKeywordAdded,
            AuditTarget::Settings,
            format!("Voice keyword \"{}\" added", keyword),
        );
        Ok(true)
    }

    pub fn remove_voice_keyword(&mut self, keyword: &str) -> Result<bool> {
        let keyword = keyword.trim().to_lowercase();
        if !self.core.state().settings.voice_keywords.contains(&keyword) {
            return Ok(false);
        }
        self.core
            .update_state(|state| state.settings.voice_keywords.retain(|k| *k != keyword));
        self.core.record(
            AuditAction::VoiceKeywordRemoved,
            AuditTarget::Settings,
            format!("Voice keyword \"{}\" removed", keyword),
        );
        Ok(true)
    }

    // ---- selection -----------------------------------------------------

    pub fn select_asset(&mut self, id: Option<AssetId>) {
        self.core.select(|sel| sel.asset = id);
    }

    pub fn select_swatch(&mut self, id: Option<SwatchId>) {
        self.core.select(|sel| sel.swatch = id);
    }

    pub fn select_review(&mut self, id: Option<ReviewId>) {
        self.core.select(|sel| sel.review = id);
    }

    pub fn clear_selection(&mut self) {
        self.core.select(|sel| *sel = BrandingSelection::default());
    }

    pub fn selection(&self) -> &BrandingSelection {
        &self.core.state().selection
    }
}

impl Store for BrandingStore {
    type Snapshot = BrandingSnapshot;
    type Stats = BrandingStats;

    fn kind(&self) -> StoreKind {
        self.core.kind()
    }

    fn snapshot(&self) -> Arc<BrandingSnapshot> {
        self.core.snapshot()
    }

    fn stats(&self) -> BrandingStats {
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
