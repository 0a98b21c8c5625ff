//! Save-file DTOs
//!
//! The on-disk documents reference records by their unique names; ids are
//! re-minted during load. Keeping these shapes separate from the domain
//! types keeps the domain id-based and lets files stay tolerant: almost
//! every field defaults, so hand-edited documents load with warnings
//! instead of hard failures.

use serde::{Deserialize, Serialize};

use wayfndr_domain::{AccessKind, MapHalf, RuleOp};

// ============================================================================
// Catalog documents
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFileDto {
    pub version: u32,
    #[serde(default)]
    pub entities: Vec<EntityDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDto {
    pub type_name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFileDto {
    pub version: u32,
    #[serde(default)]
    pub items: Vec<ItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub entity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFileDto {
    pub version: u32,
    #[serde(default)]
    pub locations: Vec<LocationDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    pub entity: String,
    #[serde(default)]
    pub treasure: u32,
    #[serde(default)]
    pub treasure_keys: u32,
    #[serde(default)]
    pub treasure_etc: u32,
    #[serde(default)]
    pub is_start: bool,
    #[serde(default)]
    pub entrances: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<RequirementDto>,
    #[serde(default)]
    pub connections: Vec<ConnectionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementDto {
    #[serde(default)]
    pub entries: Vec<RequirementEntryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementEntryDto {
    pub kind: RequirementKindDto,
    pub value: String,
    #[serde(default)]
    pub optional: bool,
}

/// Discriminates what a requirement entry's `value` names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequirementKindDto {
    ProgressItem,
    ProgressLocation,
    ProgressSpecial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDto {
    pub entrances: [String; 2],
    #[serde(default)]
    pub requirements: Vec<RequirementDto>,
}

// ============================================================================
// Schema document
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFileDto {
    pub version: u32,
    #[serde(default)]
    pub rules: Vec<RuleDto>,
    #[serde(default)]
    pub regions: Vec<RegionDto>,
    #[serde(default)]
    pub checks: Vec<CheckDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDto {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<RuleEntryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEntryDto {
    pub kind: RuleKindDto,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub op: RuleOp,
    #[serde(default)]
    pub brackets_open: u32,
    #[serde(default)]
    pub brackets_close: u32,
}

/// Discriminates what a rule entry's `value` names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKindDto {
    ProgressItem,
    ProgressLocation,
    ProgressSpecial,
    Rule,
    Check,
    Region,
    Inaccessible,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDto {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckDto {
    pub name: String,
    #[serde(default)]
    pub map: MapHalf,
    #[serde(default)]
    pub position: [f32; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(default)]
    pub access: AccessKind,
}

// ============================================================================
// Session document
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFileDto {
    pub version: u32,
    #[serde(default)]
    pub checks: Vec<CheckStateDto>,
    #[serde(default)]
    pub links: Vec<LinkDto>,
    #[serde(default)]
    pub progress_items: Vec<ProgressItemDto>,
    #[serde(default)]
    pub progress_locations: Vec<ProgressLocationDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStateDto {
    pub check: String,
    #[serde(default)]
    pub required_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance: Option<String>,
    #[serde(default)]
    pub cleared: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDto {
    pub checks: [String; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressItemDto {
    pub item: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLocationDto {
    pub location: String,
    #[serde(default)]
    pub items_found: u32,
    #[serde(default)]
    pub keys_current: u32,
    #[serde(default)]
    pub keys_total: u32,
    #[serde(default)]
    pub has_map: bool,
    #[serde(default)]
    pub has_compass: bool,
    #[serde(default)]
    pub has_big_key: bool,
    #[serde(default)]
    pub pendant: bool,
    #[serde(default)]
    pub pendant_green: bool,
    #[serde(default)]
    pub crystal: bool,
    #[serde(default)]
    pub crystal_red: bool,
    #[serde(default)]
    pub cleared: bool,
}
