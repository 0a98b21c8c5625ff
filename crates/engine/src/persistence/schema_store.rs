//! Schema document loading and saving
//!
//! Loading is three-phase: mint every rule id, insert regions and checks
//! (their rule references now resolve), then attach rule entries - which
//! may reference any rule, region, or check, including ones defined later
//! in the document. Unresolved rule values degrade to the inaccessible
//! term, which evaluates false, matching what an unmatched name would have
//! produced at evaluation time.

use std::path::Path;

use tracing::info;

use wayfndr_domain::{
    Catalogs, Check, Milestone, Region, RuleEntry, RuleTerm, Schema,
};

use crate::error::{LoadReport, StoreError};
use crate::ports::SchemaStore;

use super::dto::{
    CheckDto, RegionDto, RuleDto, RuleEntryDto, RuleKindDto, SchemaFileDto,
};
use super::{check_version, read_json, write_json, SCHEMA_VERSION};

/// Loads and saves schema documents as JSON
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaStore;

impl JsonSchemaStore {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaStore for JsonSchemaStore {
    fn load_schema(
        &self,
        path: &Path,
        catalogs: &Catalogs,
    ) -> Result<(Schema, LoadReport), StoreError> {
        let file: SchemaFileDto = read_json(path)?;
        check_version("schema", file.version, SCHEMA_VERSION)?;

        let mut report = LoadReport::new();
        let mut schema = Schema::new();

        // Phase 1: mint every rule id so entries can cross-reference freely.
        for rule in &file.rules {
            schema.add_rule(&rule.name)?;
        }

        // Phase 2: regions and checks, resolving their gating rules.
        for region in &file.regions {
            let rule = resolve_optional_rule(&schema, region.rule.as_deref(), &region.name, &mut report);
            let mut record = Region::new(&region.name).with_color(&region.color);
            record.rule = rule;
            schema.add_region(record)?;
        }

        for check in &file.checks {
            let rule = resolve_optional_rule(&schema, check.rule.as_deref(), &check.name, &mut report);
            let region = match check.region.as_deref() {
                None => None,
                Some(name) => match schema.find_region(name) {
                    Some(id) => Some(id),
                    None => {
                        report.warn(format!(
                            "check '{}' references unknown region '{name}'",
                            check.name
                        ));
                        None
                    }
                },
            };

            let mut record = Check::new(&check.name)
                .on_map(check.map)
                .at(check.position[0], check.position[1])
                .with_access(check.access);
            record.region = region;
            record.rule = rule;
            schema.add_check(record)?;
        }

        // Phase 3: rule entries.
        for rule in &file.rules {
            let Some(id) = schema.find_rule(&rule.name) else {
                continue;
            };
            let entries: Vec<RuleEntry> = rule
                .entries
                .iter()
                .map(|entry| resolve_rule_entry(entry, &schema, catalogs, &rule.name, &mut report))
                .collect();
            schema.set_rule_entries(id, entries);
        }

        info!(
            path = %path.display(),
            rules = schema.rule_count(),
            regions = schema.region_count(),
            checks = schema.check_count(),
            warnings = report.warnings().len(),
            "schema loaded"
        );

        Ok((schema, report))
    }

    fn save_schema(
        &self,
        path: &Path,
        schema: &Schema,
        catalogs: &Catalogs,
    ) -> Result<(), StoreError> {
        let file = SchemaFileDto {
            version: SCHEMA_VERSION,
            rules: schema
                .rules()
                .map(|(_, rule)| RuleDto {
                    name: rule.name.clone(),
                    entries: rule
                        .entries
                        .iter()
                        .map(|entry| rule_entry_to_dto(entry, schema, catalogs))
                        .collect(),
                })
                .collect(),
            regions: schema
                .regions()
                .map(|(_, region)| RegionDto {
                    name: region.name.clone(),
                    color: region.color.clone(),
                    rule: region.rule.map(|id| schema.rule(id).name.clone()),
                })
                .collect(),
            checks: schema
                .checks()
                .map(|(_, check)| CheckDto {
                    name: check.name.clone(),
                    map: check.map,
                    position: [check.position.x, check.position.y],
                    region: check.region.map(|id| schema.region(id).name.clone()),
                    rule: check.rule.map(|id| schema.rule(id).name.clone()),
                    access: check.access,
                })
                .collect(),
        };

        write_json(path, &file)?;
        info!(path = %path.display(), "schema saved");
        Ok(())
    }
}

fn resolve_optional_rule(
    schema: &Schema,
    name: Option<&str>,
    owner: &str,
    report: &mut LoadReport,
) -> Option<wayfndr_domain::RuleId> {
    let name = name?;
    match schema.find_rule(name) {
        Some(id) => Some(id),
        None => {
            report.warn(format!("'{owner}' references unknown rule '{name}'"));
            None
        }
    }
}

fn resolve_rule_entry(
    entry: &RuleEntryDto,
    schema: &Schema,
    catalogs: &Catalogs,
    rule_name: &str,
    report: &mut LoadReport,
) -> RuleEntry {
    let mut unresolved = |kind: &str| {
        report.warn(format!(
            "rule '{rule_name}': unknown {kind} '{}' degrades to inaccessible",
            entry.value
        ));
        RuleTerm::Inaccessible
    };

    let term = match entry.kind {
        RuleKindDto::ProgressItem => match catalogs.items.find(&entry.value) {
            Some(item) => RuleTerm::ProgressItem(item),
            None => unresolved("item"),
        },
        RuleKindDto::ProgressLocation => match catalogs.locations.find(&entry.value) {
            Some(location) => RuleTerm::ProgressLocation(location),
            None => unresolved("location"),
        },
        RuleKindDto::ProgressSpecial => match Milestone::from_name(&entry.value) {
            Some(milestone) => RuleTerm::Milestone(milestone),
            None => unresolved("milestone"),
        },
        RuleKindDto::Rule => match schema.find_rule(&entry.value) {
            Some(rule) => RuleTerm::Rule(rule),
            None => unresolved("rule"),
        },
        RuleKindDto::Check => match schema.find_check(&entry.value) {
            Some(check) => RuleTerm::Check(check),
            None => unresolved("check"),
        },
        RuleKindDto::Region => match schema.find_region(&entry.value) {
            Some(region) => RuleTerm::Region(region),
            None => unresolved("region"),
        },
        RuleKindDto::Inaccessible => RuleTerm::Inaccessible,
    };

    RuleEntry {
        term,
        op: entry.op,
        brackets_open: entry.brackets_open,
        brackets_close: entry.brackets_close,
    }
}

fn rule_entry_to_dto(entry: &RuleEntry, schema: &Schema, catalogs: &Catalogs) -> RuleEntryDto {
    let (kind, value) = match entry.term {
        RuleTerm::ProgressItem(item) => {
            let entity = catalogs.items.get(item).entity;
            (
                RuleKindDto::ProgressItem,
                catalogs.entities.get(entity).type_name.clone(),
            )
        }
        RuleTerm::ProgressLocation(location) => {
            let entity = catalogs.locations.get(location).entity;
            (
                RuleKindDto::ProgressLocation,
                catalogs.entities.get(entity).type_name.clone(),
            )
        }
        RuleTerm::Milestone(milestone) => {
            (RuleKindDto::ProgressSpecial, milestone.name().to_string())
        }
        RuleTerm::Rule(rule) => (RuleKindDto::Rule, schema.rule(rule).name.clone()),
        RuleTerm::Check(check) => (RuleKindDto::Check, schema.check(check).name.clone()),
        RuleTerm::Region(region) => (RuleKindDto::Region, schema.region(region).name.clone()),
        RuleTerm::Inaccessible => (RuleKindDto::Inaccessible, String::new()),
    };

    RuleEntryDto {
        kind,
        value,
        op: entry.op,
        brackets_open: entry.brackets_open,
        brackets_close: entry.brackets_close,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfndr_domain::{AccessKind, Entity, Location, MapHalf, RuleOp};

    fn catalogs() -> Catalogs {
        let mut catalogs = Catalogs::new();
        let lamp = catalogs
            .entities
            .insert(Entity::new("lamp", "Lamp"))
            .unwrap();
        catalogs.items.insert(lamp, &catalogs.entities).unwrap();
        let keep = catalogs
            .entities
            .insert(Entity::new("keep", "Keep"))
            .unwrap();
        catalogs
            .locations
            .insert(Location::new(keep), &catalogs.entities)
            .unwrap();
        catalogs
    }

    fn write_schema(value: serde_json::Value) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), value.to_string()).unwrap();
        file
    }

    #[test]
    fn load_resolves_cross_references_in_any_order() {
        let file = write_schema(serde_json::json!({
            "version": 1,
            "rules": [
                {
                    // References a rule and a region defined later.
                    "name": "combined",
                    "entries": [
                        {"kind": "rule", "value": "has-lamp", "op": "and"},
                        {"kind": "region", "value": "lit"},
                    ],
                },
                {
                    "name": "has-lamp",
                    "entries": [{"kind": "progressItem", "value": "lamp"}],
                },
            ],
            "regions": [{"name": "lit", "rule": "has-lamp"}],
            "checks": [
                {
                    "name": "chest",
                    "map": "dark",
                    "position": [1.5, 2.0],
                    "region": "lit",
                    "rule": "combined",
                    "access": "entranceAndExit",
                },
            ],
        }));

        let catalogs = catalogs();
        let store = JsonSchemaStore::new();
        let (schema, report) = store.load_schema(file.path(), &catalogs).unwrap();
        assert!(report.is_clean());

        let has_lamp = schema.find_rule("has-lamp").unwrap();
        let lit = schema.find_region("lit").unwrap();
        let combined = schema.find_rule("combined").unwrap();

        let entries = &schema.rule(combined).entries;
        assert_eq!(entries[0].term, RuleTerm::Rule(has_lamp));
        assert_eq!(entries[0].op, RuleOp::And);
        assert_eq!(entries[1].term, RuleTerm::Region(lit));

        let lamp = catalogs.items.find("lamp").unwrap();
        assert_eq!(
            schema.rule(has_lamp).entries[0].term,
            RuleTerm::ProgressItem(lamp)
        );

        assert_eq!(schema.region(lit).rule, Some(has_lamp));

        let chest = schema.find_check("chest").unwrap();
        let check = schema.check(chest);
        assert_eq!(check.map, MapHalf::Dark);
        assert_eq!(check.region, Some(lit));
        assert_eq!(check.rule, Some(combined));
        assert_eq!(check.access, AccessKind::EntranceAndExit);
        assert!((check.position.x - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn unresolved_values_degrade_with_warnings() {
        let file = write_schema(serde_json::json!({
            "version": 1,
            "rules": [
                {
                    "name": "broken",
                    "entries": [{"kind": "progressItem", "value": "nope"}],
                },
            ],
            "regions": [{"name": "lost", "rule": "nope"}],
            "checks": [{"name": "orphan", "region": "nowhere"}],
        }));

        let catalogs = catalogs();
        let store = JsonSchemaStore::new();
        let (schema, report) = store.load_schema(file.path(), &catalogs).unwrap();

        let broken = schema.find_rule("broken").unwrap();
        assert_eq!(schema.rule(broken).entries[0].term, RuleTerm::Inaccessible);

        let lost = schema.find_region("lost").unwrap();
        assert_eq!(schema.region(lost).rule, None);

        let orphan = schema.find_check("orphan").unwrap();
        assert_eq!(schema.check(orphan).region, None);

        assert_eq!(report.warnings().len(), 3);
    }

    #[test]
    fn unsupported_version_aborts() {
        let file = write_schema(serde_json::json!({"version": 7}));
        let store = JsonSchemaStore::new();
        let err = store.load_schema(file.path(), &catalogs()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedVersion {
                kind: "schema",
                found: 7,
                ..
            }
        ));
    }

    #[test]
    fn save_then_load_round_trips() {
        let file = write_schema(serde_json::json!({
            "version": 1,
            "rules": [
                {
                    "name": "gate",
                    "entries": [
                        {"kind": "progressItem", "value": "lamp", "op": "and", "bracketsOpen": 1},
                        {"kind": "progressLocation", "value": "keep", "bracketsClose": 1},
                        {"kind": "progressSpecial", "value": "Crystal7", "op": "or"},
                        {"kind": "inaccessible"},
                    ],
                },
            ],
            "regions": [{"name": "deep", "color": "#224488", "rule": "gate"}],
            "checks": [{"name": "vault", "region": "deep"}],
        }));

        let catalogs = catalogs();
        let store = JsonSchemaStore::new();
        let (schema, report) = store.load_schema(file.path(), &catalogs).unwrap();
        assert!(report.is_clean());

        let saved = tempfile::NamedTempFile::new().unwrap();
        store.save_schema(saved.path(), &schema, &catalogs).unwrap();
        let (reloaded, report) = store.load_schema(saved.path(), &catalogs).unwrap();
        assert!(report.is_clean());

        let collect_rules = |s: &Schema| {
            s.rules()
                .map(|(_, rule)| rule.clone())
                .collect::<Vec<_>>()
        };
        let collect_regions = |s: &Schema| {
            s.regions()
                .map(|(_, region)| region.clone())
                .collect::<Vec<_>>()
        };
        let collect_checks = |s: &Schema| {
            s.checks()
                .map(|(_, check)| check.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(collect_rules(&schema), collect_rules(&reloaded));
        assert_eq!(collect_regions(&schema), collect_regions(&reloaded));
        assert_eq!(collect_checks(&schema), collect_checks(&reloaded));
    }
}
