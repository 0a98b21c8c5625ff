//! Checks - the named slots players link locations into
//!
//! A check is one spot on the map. Its position and map half are layout
//! data only; the evaluator cares about the owning region, the gating rule,
//! and whether that rule also gates exiting through a placed link.

use serde::{Deserialize, Serialize};

use crate::ids::{RegionId, RuleId};
use crate::schema::AccessKind;

/// Which half of the world map a check is drawn on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MapHalf {
    #[default]
    Light,
    Dark,
}

/// Layout position on the map, irrelevant to reachability
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: f32,
    pub y: f32,
}

impl MapPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A named check slot on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub name: String,
    pub map: MapHalf,
    pub position: MapPoint,
    /// Region this check belongs to, if any
    pub region: Option<RegionId>,
    /// Gating rule, if any
    pub rule: Option<RuleId>,
    /// How the gating rule applies when traversing links
    pub access: AccessKind,
}

impl Check {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            map: MapHalf::Light,
            position: MapPoint::default(),
            region: None,
            rule: None,
            access: AccessKind::Entrance,
        }
    }

    pub fn on_map(mut self, map: MapHalf) -> Self {
        self.map = map;
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = MapPoint::new(x, y);
        self
    }

    pub fn in_region(mut self, region: RegionId) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_rule(mut self, rule: RuleId) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn with_access(mut self, access: AccessKind) -> Self {
        self.access = access;
        self
    }
}
