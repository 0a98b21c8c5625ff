//! Session document loading and saving
//!
//! A session document only makes sense against an already-loaded schema:
//! check states reference schema checks, links reference check pairs, and
//! progress reference catalog records - all by name. The fresh session
//! already enumerates every check and location, so loading is a patch pass
//! over that baseline.

use std::path::{Path, PathBuf};

use tracing::info;

use wayfndr_domain::{Catalogs, Schema, Session};

use crate::error::{LoadReport, StoreError};
use crate::ports::SessionStore;

use super::dto::{
    CheckStateDto, LinkDto, ProgressItemDto, ProgressLocationDto, SessionFileDto,
};
use super::{check_version, read_json, write_json, SESSION_VERSION};

/// Loads and saves session documents as JSON
#[derive(Debug, Clone, Default)]
pub struct JsonSessionStore;

impl JsonSessionStore {
    pub fn new() -> Self {
        Self
    }
}

impl SessionStore for JsonSessionStore {
    fn load_session(
        &self,
        path: &Path,
        catalogs: &Catalogs,
        schema: &Schema,
    ) -> Result<(Session, LoadReport), StoreError> {
        let file: SessionFileDto = read_json(path)?;
        check_version("session", file.version, SESSION_VERSION)?;

        let mut report = LoadReport::new();
        let mut session = Session::new(schema, &catalogs.locations);

        for dto in &file.checks {
            let Some(check) = schema.find_check(&dto.check) else {
                report.warn(format!("session references unknown check '{}'", dto.check));
                continue;
            };

            let mut required_items = Vec::new();
            for name in &dto.required_items {
                match catalogs.items.find(name) {
                    Some(item) => required_items.push(item),
                    None => report.warn(format!(
                        "check '{}' requires unknown item '{name}'",
                        dto.check
                    )),
                }
            }
            session.set_required_items(check, required_items);

            if let Some(name) = &dto.location {
                match catalogs.locations.find(name) {
                    Some(location) => session.set_location(check, Some(location)),
                    None => report.warn(format!(
                        "check '{}' assigned unknown location '{name}'",
                        dto.check
                    )),
                }
            }

            if let Some(name) = &dto.entrance {
                match catalogs.entities.find(name) {
                    Some(entrance) => session.set_entrance(check, Some(entrance)),
                    None => report.warn(format!(
                        "check '{}' uses unknown entrance '{name}'",
                        dto.check
                    )),
                }
            }

            session.set_cleared(check, dto.cleared);
        }

        for dto in &file.links {
            let ends: Vec<_> = dto
                .checks
                .iter()
                .filter_map(|name| {
                    let id = schema.find_check(name);
                    if id.is_none() {
                        report.warn(format!("link references unknown check '{name}'"));
                    }
                    id
                })
                .collect();
            if let [a, b] = ends[..] {
                if let Err(err) = session.add_link(a, b) {
                    report.warn(format!("link between '{}' and '{}': {err}", dto.checks[0], dto.checks[1]));
                }
            }
        }

        for dto in &file.progress_items {
            match catalogs.items.find(&dto.item) {
                Some(item) => session.set_item_count(item, dto.count),
                None => report.warn(format!("progress references unknown item '{}'", dto.item)),
            }
        }

        for dto in &file.progress_locations {
            let Some(location) = catalogs.locations.find(&dto.location) else {
                report.warn(format!(
                    "progress references unknown location '{}'",
                    dto.location
                ));
                continue;
            };
            let progress = session.location_progress_mut(location);
            progress.items_found = dto.items_found;
            progress.keys_current = dto.keys_current;
            progress.keys_total = dto.keys_total;
            progress.has_map = dto.has_map;
            progress.has_compass = dto.has_compass;
            progress.has_big_key = dto.has_big_key;
            progress.pendant = dto.pendant;
            progress.pendant_green = dto.pendant_green;
            progress.crystal = dto.crystal;
            progress.crystal_red = dto.crystal_red;
            progress.cleared = dto.cleared;
        }

        info!(
            path = %path.display(),
            links = session.links().len(),
            warnings = report.warnings().len(),
            "session loaded"
        );

        Ok((session, report))
    }

    fn save_session(
        &self,
        path: &Path,
        session: &Session,
        catalogs: &Catalogs,
        schema: &Schema,
    ) -> Result<(), StoreError> {
        let entity_name = |entity| catalogs.entities.get(entity).type_name.clone();
        let item_name = |item| entity_name(catalogs.items.get(item).entity);
        let location_name = |location| entity_name(catalogs.locations.get(location).entity);
        let check_name = |check| schema.check(check).name.clone();

        let file = SessionFileDto {
            version: SESSION_VERSION,
            checks: session
                .check_states()
                .map(|(id, state)| CheckStateDto {
                    check: check_name(id),
                    required_items: state.required_items.iter().copied().map(item_name).collect(),
                    location: state.location.map(location_name),
                    entrance: state.entrance.map(entity_name),
                    cleared: state.cleared,
                })
                .collect(),
            links: session
                .links()
                .iter()
                .map(|link| {
                    let [a, b] = link.ends();
                    LinkDto {
                        checks: [check_name(a), check_name(b)],
                    }
                })
                .collect(),
            progress_items: session
                .item_progress()
                .iter()
                .map(|progress| ProgressItemDto {
                    item: item_name(progress.item),
                    count: progress.count,
                })
                .collect(),
            progress_locations: session
                .location_progress_iter()
                .map(|progress| ProgressLocationDto {
                    location: location_name(progress.location()),
                    items_found: progress.items_found,
                    keys_current: progress.keys_current,
                    keys_total: progress.keys_total,
                    has_map: progress.has_map,
                    has_compass: progress.has_compass,
                    has_big_key: progress.has_big_key,
                    pendant: progress.pendant,
                    pendant_green: progress.pendant_green,
                    crystal: progress.crystal,
                    crystal_red: progress.crystal_red,
                    cleared: progress.cleared,
                })
                .collect(),
        };

        write_json(path, &file)?;
        info!(path = %path.display(), "session saved");
        Ok(())
    }

    fn save_session_auto(
        &self,
        dir: &Path,
        session: &Session,
        catalogs: &Catalogs,
        schema: &Schema,
    ) -> Result<PathBuf, StoreError> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let path = dir.join(format!("autosave-{stamp}.json"));
        self.save_session(&path, session, catalogs, schema)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfndr_domain::{Check, Entity, Location};

    fn world() -> (Catalogs, Schema) {
        let mut catalogs = Catalogs::new();
        for name in ["lamp", "bow"] {
            let entity = catalogs
                .entities
                .insert(Entity::new(name, name))
                .unwrap();
            catalogs.items.insert(entity, &catalogs.entities).unwrap();
        }
        let door = catalogs
            .entities
            .insert(Entity::new("keep-door", "Keep Door"))
            .unwrap();
        let keep = catalogs
            .entities
            .insert(Entity::new("keep", "Keep"))
            .unwrap();
        catalogs
            .locations
            .insert(
                Location::new(keep).with_entrances(vec![door]),
                &catalogs.entities,
            )
            .unwrap();

        let mut schema = Schema::new();
        schema.add_check(Check::new("chest")).unwrap();
        schema.add_check(Check::new("stump")).unwrap();
        (catalogs, schema)
    }

    #[test]
    fn save_then_load_round_trips() {
        let (catalogs, schema) = world();
        let chest = schema.find_check("chest").unwrap();
        let stump = schema.find_check("stump").unwrap();
        let lamp = catalogs.items.find("lamp").unwrap();
        let bow = catalogs.items.find("bow").unwrap();
        let keep = catalogs.locations.find("keep").unwrap();
        let door = catalogs.entities.find("keep-door").unwrap();

        let mut session = Session::new(&schema, &catalogs.locations);
        session.set_location(chest, Some(keep));
        session.set_entrance(chest, Some(door));
        session.set_cleared(chest, true);
        session.set_required_items(chest, vec![lamp, bow]);
        session.add_link(chest, stump).unwrap();
        session.add_item(lamp);
        session.add_item(lamp);
        {
            let progress = session.location_progress_mut(keep);
            progress.keys_total = 3;
            progress.keys_current = 1;
            progress.has_big_key = true;
            progress.crystal_red = true;
            progress.cleared = true;
        }

        let file = tempfile::NamedTempFile::new().unwrap();
        let store = JsonSessionStore::new();
        store
            .save_session(file.path(), &session, &catalogs, &schema)
            .unwrap();
        let (reloaded, report) = store
            .load_session(file.path(), &catalogs, &schema)
            .unwrap();
        assert!(report.is_clean());

        let states = |s: &Session| {
            s.check_states()
                .map(|(_, state)| state.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(states(&session), states(&reloaded));
        assert_eq!(session.links(), reloaded.links());
        assert_eq!(session.item_progress(), reloaded.item_progress());
        assert_eq!(
            session.location_progress_iter().cloned().collect::<Vec<_>>(),
            reloaded
                .location_progress_iter()
                .cloned()
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn unknown_names_warn_but_load() {
        let (catalogs, schema) = world();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            serde_json::json!({
                "version": 1,
                "checks": [
                    {"check": "gone", "cleared": true},
                    {"check": "chest", "location": "atlantis"},
                ],
                "links": [{"checks": ["chest", "gone"]}],
                "progressItems": [{"item": "sword"}],
                "progressLocations": [{"location": "atlantis", "cleared": true}],
            })
            .to_string(),
        )
        .unwrap();

        let store = JsonSessionStore::new();
        let (session, report) = store
            .load_session(file.path(), &catalogs, &schema)
            .unwrap();

        assert!(session.links().is_empty(), "half-resolved link dropped");
        assert!(session.item_progress().is_empty());
        assert_eq!(report.warnings().len(), 5);

        let chest = schema.find_check("chest").unwrap();
        assert!(
            session.check_state(chest).location.is_none(),
            "unknown location stays unassigned"
        );
    }

    #[test]
    fn autosave_writes_a_stamped_file() {
        let (catalogs, schema) = world();
        let session = Session::new(&schema, &catalogs.locations);
        let dir = tempfile::tempdir().unwrap();

        let store = JsonSessionStore::new();
        let path = store
            .save_session_auto(dir.path(), &session, &catalogs, &schema)
            .unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("autosave-"));
        assert!(name.ends_with(".json"));
        assert!(path.exists());

        let (_, report) = store.load_session(&path, &catalogs, &schema).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn unsupported_version_aborts() {
        let (catalogs, schema) = world();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            serde_json::json!({"version": 3}).to_string(),
        )
        .unwrap();

        let store = JsonSessionStore::new();
        let err = store
            .load_session(file.path(), &catalogs, &schema)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedVersion {
                kind: "session",
                found: 3,
                ..
            }
        ));
    }
}
