//! Catalog loading from a data directory
//!
//! Three fixed documents live side by side: `entities.json`, `items.json`,
//! and `locations.json`. Entities load first since everything references
//! them. Locations resolve in two passes because a requirement can name a
//! location defined later in the same document.

use std::path::PathBuf;

use tracing::info;

use wayfndr_domain::{Catalogs, Entity, Location, LocationConnection};

use crate::error::{LoadReport, StoreError};
use crate::ports::CatalogStore;

use super::dto::{ConnectionDto, EntityFileDto, ItemFileDto, LocationDto, LocationFileDto};
use super::{check_version, read_json, resolve_requirements, CATALOG_VERSION};

const ENTITIES_FILE: &str = "entities.json";
const ITEMS_FILE: &str = "items.json";
const LOCATIONS_FILE: &str = "locations.json";

/// Loads the reference catalogs from a directory of JSON documents
#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    dir: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CatalogStore for JsonCatalogStore {
    fn load_catalogs(&self) -> Result<(Catalogs, LoadReport), StoreError> {
        let mut report = LoadReport::new();
        let mut catalogs = Catalogs::new();

        // Entities first - every other record references them.
        let entity_file: EntityFileDto = read_json(&self.dir.join(ENTITIES_FILE))?;
        check_version("catalog", entity_file.version, CATALOG_VERSION)?;
        for dto in entity_file.entities {
            let mut entity = Entity::new(dto.type_name, dto.display_name);
            entity.image = dto.image;
            catalogs.entities.insert(entity)?;
        }

        let item_file: ItemFileDto = read_json(&self.dir.join(ITEMS_FILE))?;
        check_version("catalog", item_file.version, CATALOG_VERSION)?;
        for dto in item_file.items {
            match catalogs.entities.find(&dto.entity) {
                Some(entity) => {
                    catalogs.items.insert(entity, &catalogs.entities)?;
                }
                None => report.warn(format!("item references unknown entity '{}'", dto.entity)),
            }
        }

        let location_file: LocationFileDto = read_json(&self.dir.join(LOCATIONS_FILE))?;
        check_version("catalog", location_file.version, CATALOG_VERSION)?;

        // Pass 1: insert every location so requirement references resolve
        // regardless of document order.
        let mut inserted = Vec::new();
        for dto in &location_file.locations {
            let Some(entity) = catalogs.entities.find(&dto.entity) else {
                report.warn(format!(
                    "location references unknown entity '{}'",
                    dto.entity
                ));
                continue;
            };

            let mut entrances = Vec::new();
            for entrance in &dto.entrances {
                match catalogs.entities.find(entrance) {
                    Some(id) => entrances.push(id),
                    None => report.warn(format!(
                        "location '{}' references unknown entrance '{entrance}'",
                        dto.entity
                    )),
                }
            }

            let location = Location::new(entity)
                .with_treasure(dto.treasure, dto.treasure_keys, dto.treasure_etc)
                .with_entrances(entrances);
            let location = if dto.is_start {
                location.as_start()
            } else {
                location
            };
            let id = catalogs.locations.insert(location, &catalogs.entities)?;
            inserted.push((id, dto));
        }

        // Pass 2: resolve requirement and connection gating.
        for (id, dto) in inserted {
            let requirements =
                resolve_requirements(&dto.requirements, &catalogs, &dto.entity, &mut report);
            let connections = resolve_connections(dto, &catalogs, &mut report);
            catalogs.locations.set_gating(id, requirements, connections);
        }

        info!(
            entities = catalogs.entities.len(),
            items = catalogs.items.len(),
            locations = catalogs.locations.len(),
            warnings = report.warnings().len(),
            "catalogs loaded"
        );

        Ok((catalogs, report))
    }
}

fn resolve_connections(
    dto: &LocationDto,
    catalogs: &Catalogs,
    report: &mut LoadReport,
) -> Vec<LocationConnection> {
    let mut connections = Vec::new();
    for connection in &dto.connections {
        if let Some(resolved) = resolve_connection(connection, dto, catalogs, report) {
            connections.push(resolved);
        }
    }
    connections
}

fn resolve_connection(
    connection: &ConnectionDto,
    location: &LocationDto,
    catalogs: &Catalogs,
    report: &mut LoadReport,
) -> Option<LocationConnection> {
    let mut entrances = [None, None];
    for (slot, name) in connection.entrances.iter().enumerate() {
        match catalogs.entities.find(name) {
            Some(id) => entrances[slot] = Some(id),
            None => report.warn(format!(
                "location '{}' connection references unknown entrance '{name}'",
                location.entity
            )),
        }
    }
    let (Some(first), Some(second)) = (entrances[0], entrances[1]) else {
        return None;
    };

    let requirements =
        resolve_requirements(&connection.requirements, catalogs, &location.entity, report);
    Some(LocationConnection {
        entrances: [first, second],
        requirements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use wayfndr_domain::RequirementSource;

    fn write(dir: &std::path::Path, name: &str, value: serde_json::Value) {
        std::fs::write(dir.join(name), value.to_string()).unwrap();
    }

    fn seed(dir: &std::path::Path) {
        write(
            dir,
            ENTITIES_FILE,
            serde_json::json!({
                "version": 1,
                "entities": [
                    {"typeName": "lamp", "displayName": "Lamp"},
                    {"typeName": "keep", "displayName": "Keep"},
                    {"typeName": "keep-door", "displayName": "Keep Door"},
                    {"typeName": "cave", "displayName": "Cave"},
                ],
            }),
        );
        write(
            dir,
            ITEMS_FILE,
            serde_json::json!({
                "version": 1,
                "items": [{"entity": "lamp"}, {"entity": "missing"}],
            }),
        );
        write(
            dir,
            LOCATIONS_FILE,
            serde_json::json!({
                "version": 1,
                "locations": [
                    {
                        // References "keep", defined below it in the file.
                        "entity": "cave",
                        "requirements": [
                            {"entries": [{"kind": "progressLocation", "value": "keep"}]}
                        ],
                    },
                    {
                        "entity": "keep",
                        "treasure": 5,
                        "treasureKeys": 3,
                        "isStart": true,
                        "entrances": ["keep-door", "missing-door"],
                        "connections": [
                            {"entrances": ["keep-door", "missing-door"]}
                        ],
                    },
                ],
            }),
        );
    }

    #[test]
    fn loads_and_resolves_with_warnings() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());

        let store = JsonCatalogStore::new(dir.path());
        let (catalogs, report) = store.load_catalogs().unwrap();

        assert_eq!(catalogs.entities.len(), 4);
        assert_eq!(catalogs.items.len(), 1, "unresolvable item is skipped");
        assert_eq!(catalogs.locations.len(), 2);

        let keep = catalogs.locations.find("keep").unwrap();
        let keep_record = catalogs.locations.get(keep);
        assert!(keep_record.is_start);
        assert_eq!(keep_record.treasure_keys, 3);
        assert_eq!(keep_record.entrances.len(), 1, "unknown entrance dropped");
        assert!(
            keep_record.connections.is_empty(),
            "connection with an unknown entrance is dropped"
        );

        // The forward reference from "cave" to "keep" resolved.
        let cave = catalogs.locations.find("cave").unwrap();
        let requirement = &catalogs.locations.get(cave).requirements[0];
        assert_eq!(
            requirement.entries[0].source,
            RequirementSource::Location(keep)
        );

        assert_eq!(report.warnings().len(), 3);
    }

    #[test]
    fn unsupported_version_aborts() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        write(dir.path(), ENTITIES_FILE, serde_json::json!({"version": 99, "entities": []}));

        let store = JsonCatalogStore::new(dir.path());
        let err = store.load_catalogs().unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedVersion { found: 99, .. }
        ));
    }

    #[test]
    fn missing_document_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCatalogStore::new(dir.path());
        assert!(matches!(
            store.load_catalogs().unwrap_err(),
            StoreError::Read { .. }
        ));
    }

    #[test]
    fn malformed_document_aborts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ENTITIES_FILE), "not json").unwrap();
        let store = JsonCatalogStore::new(dir.path());
        assert!(matches!(
            store.load_catalogs().unwrap_err(),
            StoreError::Parse { .. }
        ));
    }
}
