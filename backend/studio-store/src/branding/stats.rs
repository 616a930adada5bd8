use serde::Serialize;
use std::collections::HashSet;

use super::contrast::contrast_ratio;
use super::models::{AssetStatus, BrandingSnapshot, ColorRole, ReviewStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandingStats {
    pub assets: usize,
    pub draft_assets: usize,
    pub in_review_assets: usize,
    pub approved_assets: usize,
    pub archived_assets: usize,
    pub favorites: usize,
    pub total_usage: u64,
    pub pending_reviews: usize,
    pub locked_swatches: usize,
    pub distinct_tags: usize,
    /// Contrast of the first primary swatch on the first background swatch.
    pub primary_on_background_contrast: Option<f64>,
    pub meets_min_contrast: bool,
    pub audit_events: usize,
}

pub fn compute_stats(snapshot: &BrandingSnapshot) -> BrandingStats {
    let assets_with = |status: AssetStatus| snapshot.assets.iter().filter(|a| a.status == status).count();
    let swatch_hex = |role: ColorRole| {
        snapshot
            .swatches
            .iter()
            .find(|s| s.role == role)
            .map(|s| s.hex.as_str())
    };

    let primary_on_background_contrast = match (swatch_hex(ColorRole::Primary), swatch_hex(ColorRole::Background)) {
        (Some(fg), Some(bg)) => contrast_ratio(fg, bg),
        _ => None,
    };
    let meets_min_contrast = primary_on_background_contrast
        .map(|ratio| ratio >= snapshot.settings.min_contrast_ratio)
        .unwrap_or(false);

    let distinct_tags = snapshot
        .assets
        .iter()
        .flat_map(|a| a.tags.iter())
        .collect::<HashSet<_>>()
        .len();

    BrandingStats {
        assets: snapshot.assets.len(),
        draft_assets: assets_with(AssetStatus::Draft),
        in_review_assets: assets_with(AssetStatus::InReview),
        approved_assets: assets_with(AssetStatus::Approved),
        archived_assets: assets_with(AssetStatus::Archived),
        favorites: snapshot.assets.iter().filter(|a| a.is_favorite).count(),
        total_usage: snapshot.assets.iter().map(|a| u64::from(a.usage_count)).sum(),
        pending_reviews: snapshot
            .reviews
            .iter()
            .filter(|r| r.status == ReviewStatus::Pending)
            .count(),
        locked_swatches: snapshot.swatches.iter().filter(|s| s.locked).count(),
        distinct_tags,
        primary_on_background_contrast,
        meets_min_contrast,
        audit_events: snapshot.audit.len(),
    }
}
