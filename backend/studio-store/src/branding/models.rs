use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::audit::AuditLog;
use crate::models::{AssetId, Entity, FontId, ModNote, ReviewId, SwatchId};
use crate::store::{impl_collection, StoreSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Logo,
    Icon,
    Illustration,
    Photo,
    Pattern,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Logo => "logo",
            AssetKind::Icon => "icon",
            AssetKind::Illustration => "illustration",
            AssetKind::Photo => "photo",
            AssetKind::Pattern => "pattern",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Draft,
    InReview,
    Approved,
    Archived,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Draft => "draft",
            AssetStatus::InReview => "in_review",
            AssetStatus::Approved => "approved",
            AssetStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandAsset {
    pub id: AssetId,
    pub name: String,
    pub kind: AssetKind,
    pub status: AssetStatus,
    pub uploaded_by: String,
    pub tags: Vec<String>,
    pub usage_count: u32,
    pub file_size_kb: u32,
    /// Bumped on every approval.
    pub version: u32,
    pub is_favorite: bool,
    pub notes: Vec<ModNote>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRole {
    Primary,
    Secondary,
    Accent,
    Neutral,
    Background,
}

impl ColorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorRole::Primary => "primary",
            ColorRole::Secondary => "secondary",
            ColorRole::Accent => "accent",
            ColorRole::Neutral => "neutral",
            ColorRole::Background => "background",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSwatch {
    pub id: SwatchId,
    pub name: String,
    /// Uppercase `#RRGGBB`.
    pub hex: String,
    pub role: ColorRole,
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    Heading,
    Body,
    Accent,
}

impl FontRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontRole::Heading => "heading",
            FontRole::Body => "body",
            FontRole::Accent => "accent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub id: FontId,
    pub role: FontRole,
    pub family: String,
    pub weight: u16,
    pub size_px: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    ChangesRequested,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::ChangesRequested => "changes_requested",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReview {
    pub id: ReviewId,
    pub asset_id: AssetId,
    pub requested_by: String,
    pub status: ReviewStatus,
    pub comments: Vec<ModNote>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSettings {
    pub brand_name: String,
    pub tagline: String,
    pub voice_keywords: Vec<String>,
    pub enforce_contrast: bool,
    pub min_contrast_ratio: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrandSettingsPatch {
    pub brand_name: Option<String>,
    pub tagline: Option<String>,
    pub enforce_contrast: Option<bool>,
    pub min_contrast_ratio: Option<f64>,
}

impl BrandSettingsPatch {
    pub fn apply(&self, settings: &mut BrandSettings) {
        if let Some(v) = &self.brand_name {
            settings.brand_name = v.clone();
        }
        if let Some(v) = &self.tagline {
            settings.tagline = v.clone();
        }
        if let Some(v) = self.enforce_contrast {
            settings.enforce_contrast = v;
        }
        if let Some(v) = self.min_contrast_ratio {
            // WCAG ratios run from 1:1 to 21:1.
            settings.min_contrast_ratio = v.clamp(1.0, 21.0);
        }
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        [
            ("brand_name", self.brand_name.is_some()),
            ("tagline", self.tagline.is_some()),
            ("enforce_contrast", self.enforce_contrast.is_some()),
            ("min_contrast_ratio", self.min_contrast_ratio.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

/// Upload request for a new brand asset.
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct NewAsset {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub kind: AssetKind,
    #[validate(range(min = 1, max = 51200))]
    pub file_size_kb: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Validate, Deserialize)]
pub struct NewSwatch {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[validate(custom(function = "validate_hex"))]
    pub hex: String,
    pub role: ColorRole,
}

/// Parse `#RRGGBB` (either case) into its channels.
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.trim().strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

pub fn normalize_hex(hex: &str) -> String {
    hex.trim().to_ascii_uppercase()
}

/// validator crate compatible check for `#RRGGBB` colors
pub fn validate_hex(hex: &str) -> Result<(), ValidationError> {
    if parse_hex(hex).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_hex_color"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandingSelection {
    pub asset: Option<AssetId>,
    pub swatch: Option<SwatchId>,
    pub review: Option<ReviewId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandingSnapshot {
    pub assets: Vec<BrandAsset>,
    pub swatches: Vec<ColorSwatch>,
    pub fonts: Vec<FontStyle>,
    pub reviews: Vec<AssetReview>,
    pub audit: AuditLog,
    pub settings: BrandSettings,
    pub selection: BrandingSelection,
}

impl StoreSnapshot for BrandingSnapshot {
    type Selection = BrandingSelection;

    fn audit(&self) -> &AuditLog {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditLog {
        &mut self.audit
    }

    fn selection_mut(&mut self) -> &mut BrandingSelection {
        &mut self.selection
    }
}

impl Entity for BrandAsset {
    type Id = AssetId;

    fn id(&self) -> AssetId {
        self.id
    }
}

impl Entity for ColorSwatch {
    type Id = SwatchId;

    fn id(&self) -> SwatchId {
        self.id
    }
}

impl Entity for FontStyle {
    type Id = FontId;

    fn id(&self) -> FontId {
        self.id
    }
}

impl Entity for AssetReview {
    type Id = ReviewId;

    fn id(&self) -> ReviewId {
        self.id
    }
}

impl_collection!(BrandingSnapshot, BrandAsset, assets);
impl_collection!(BrandingSnapshot, ColorSwatch, swatches);
impl_collection!(BrandingSnapshot, FontStyle, fonts);
impl_collection!(BrandingSnapshot, AssetReview, reviews);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#FF8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex("#ff8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex("FF8000"), None);
        assert_eq!(parse_hex("#FFF"), None);
        assert_eq!(parse_hex("#GG0000"), None);
    }

    #[test]
    fn test_new_swatch_rejects_bad_hex() {
        let swatch = NewSwatch {
            name: "Sunset".to_string(),
            hex: "orange".to_string(),
            role: ColorRole::Accent,
        };
        let errors = swatch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("hex"));
    }

    #[test]
    fn test_new_asset_rejects_blank_name() {
        let asset = NewAsset {
            name: String::new(),
            kind: AssetKind::Logo,
            file_size_kb: 10,
            tags: Vec::new(),
        };
        assert!(asset.validate().is_err());
    }
}
