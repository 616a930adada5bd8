use chrono::Duration;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::models::*;
use crate::audit::{AuditAction, AuditEvent, AuditLog, AuditTarget};
use crate::models::{AssetId, AuditEventId, FontId, ModNote, ReviewId, SwatchId};
use crate::store::SeedContext;

const SALT: u64 = 0xB4A_4D;

const UPLOADERS: &[&str] = &["Jordan Park", "Mei Tanaka", "Luis Ortega"];

const ASSETS: &[(&str, AssetKind, AssetStatus)] = &[
    ("Primary logo", AssetKind::Logo, AssetStatus::Approved),
    ("Logo mark (mono)", AssetKind::Logo, AssetStatus::Approved),
    ("App icon", AssetKind::Icon, AssetStatus::Approved),
    ("Favicon", AssetKind::Icon, AssetStatus::InReview),
    ("Hero illustration", AssetKind::Illustration, AssetStatus::InReview),
    ("Empty state: no streams", AssetKind::Illustration, AssetStatus::Draft),
    ("Team offsite photo", AssetKind::Photo, AssetStatus::Approved),
    ("Studio backdrop", AssetKind::Photo, AssetStatus::Draft),
    ("Dot grid pattern", AssetKind::Pattern, AssetStatus::Approved),
    ("Holiday logo 2022", AssetKind::Logo, AssetStatus::Archived),
];

const TAGS: &[&str] = &["web", "print", "social", "dark-mode", "marketing", "product"];

const SWATCHES: &[(&str, &str, ColorRole)] = &[
    ("Indigo", "#4F46E5", ColorRole::Primary),
    ("Sky", "#0EA5E9", ColorRole::Secondary),
    ("Amber", "#F59E0B", ColorRole::Accent),
    ("Slate", "#475569", ColorRole::Neutral),
    ("Mist", "#F1F5F9", ColorRole::Neutral),
    ("White", "#FFFFFF", ColorRole::Background),
];

const FONTS: &[(FontRole, &str, u16, u16)] = &[
    (FontRole::Heading, "Inter", 700, 32),
    (FontRole::Body, "Inter", 400, 16),
    (FontRole::Accent, "JetBrains Mono", 500, 14),
];

pub fn seed(ctx: &SeedContext) -> BrandingSnapshot {
    let mut rng = StdRng::seed_from_u64(ctx.seed ^ SALT);
    let now = ctx.now;

    let assets: Vec<BrandAsset> = ASSETS
        .iter()
        .enumerate()
        .map(|(i, (name, kind, status))| {
            let created_at = now - Duration::days(rng.gen_range(5..400));
            let tag_count = rng.gen_range(1..=3);
            let tags = TAGS
                .choose_multiple(&mut rng, tag_count)
                .map(|t| t.to_string())
                .collect();
            BrandAsset {
                id: AssetId::seeded(i),
                name: name.to_string(),
                kind: *kind,
                status: *status,
                uploaded_by: UPLOADERS[i % UPLOADERS.len()].to_string(),
                tags,
                usage_count: match status {
                    AssetStatus::Approved => rng.gen_range(5..400),
                    AssetStatus::Archived => rng.gen_range(0..50),
                    _ => 0,
                },
                file_size_kb: rng.gen_range(8..4_096),
                version: match status {
                    AssetStatus::Approved | AssetStatus::Archived => rng.gen_range(1..4),
                    _ => 1,
                },
                is_favorite: i < 3,
                notes: Vec::new(),
                created_at,
                updated_at: created_at + Duration::days(rng.gen_range(0..5)),
            }
        })
        .collect();

    let reviews = assets
        .iter()
        .filter(|a| a.status == AssetStatus::InReview)
        .enumerate()
        .map(|(i, asset)| {
            let created_at = now - Duration::hours(rng.gen_range(2..72));
            AssetReview {
                id: ReviewId::seeded(i),
                asset_id: asset.id,
                requested_by: asset.uploaded_by.clone(),
                status: ReviewStatus::Pending,
                comments: vec![ModNote::new(created_at, asset.uploaded_by.as_str(), "Ready for review")],
                created_at,
                updated_at: created_at,
            }
        })
        .collect();

    let swatches = SWATCHES
        .iter()
        .enumerate()
        .map(|(i, (name, hex, role))| ColorSwatch {
            id: SwatchId::seeded(i),
            name: name.to_string(),
            hex: hex.to_string(),
            role: *role,
            locked: matches!(role, ColorRole::Primary | ColorRole::Background),
        })
        .collect();

    let fonts = FONTS
        .iter()
        .enumerate()
        .map(|(i, (role, family, weight, size_px))| FontStyle {
            id: FontId::seeded(i),
            role: *role,
            family: family.to_string(),
            weight: *weight,
            size_px: *size_px,
        })
        .collect();

    let mut audit = AuditLog::with_capacity(ctx.audit_capacity);
    audit.push(AuditEvent {
        id: AuditEventId::seeded(200),
        at: now - Duration::days(2),
        actor: "Jordan Park".to_string(),
        action: AuditAction::AssetApproved,
        summary: "Approved \"Primary logo\"".to_string(),
        target: Some(AuditTarget::Asset(AssetId::seeded(0))),
    });
    audit.push(AuditEvent {
        id: AuditEventId::seeded(201),
        at: now - Duration::days(1),
        actor: "Mei Tanaka".to_string(),
        action: AuditAction::SwatchLocked,
        summary: "Locked Indigo".to_string(),
        target: Some(AuditTarget::Swatch(SwatchId::seeded(0))),
    });

    BrandingSnapshot {
        assets,
        swatches,
        fonts,
        reviews,
        audit,
        settings: BrandSettings {
            brand_name: "Studio".to_string(),
            tagline: "Build, stream, grow.".to_string(),
            voice_keywords: vec!["confident".to_string(), "warm".to_string(), "plainspoken".to_string()],
            enforce_contrast: true,
            min_contrast_ratio: 4.5,
        },
        selection: BrandingSelection::default(),
    }
}
