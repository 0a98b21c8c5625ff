//! Tracker Service - the mutate-then-refresh surface the UI talks to
//!
//! Owns the loaded world (catalogs + schema), the live session, and the
//! accessibility table. Every mutator applies its change, synchronously
//! reruns the full accessibility refresh, marks the service dirty, and
//! notifies observers before returning - so cached accessibility is always
//! fresh relative to the latest committed mutation by the time any caller
//! reads it. There is no pub/sub between the session and the cache; this
//! service is the single coordinator.

use std::path::{Path, PathBuf};

use tracing::debug;

use wayfndr_domain::{
    Accessibility, Catalogs, CheckId, DomainError, EntityId, ItemId, LocationId,
    LocationProgress, Schema, Session,
};

use crate::error::{LoadReport, StoreError};
use crate::ports::{CatalogStore, SchemaStore, SessionStore};

/// Receives a notification each time the accessibility table is rebuilt.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait AccessibilityObserver {
    fn accessibility_refreshed(&self, accessibility: &Accessibility);
}

/// Owns one tracking run and keeps its accessibility cache fresh
pub struct TrackerService {
    catalogs: Catalogs,
    schema: Schema,
    session: Session,
    accessibility: Accessibility,
    observers: Vec<Box<dyn AccessibilityObserver>>,
    dirty: bool,
}

impl TrackerService {
    /// Start a fresh session over the given world.
    pub fn new(catalogs: Catalogs, schema: Schema) -> Self {
        let session = Session::new(&schema, &catalogs.locations);
        Self::with_session(catalogs, schema, session)
    }

    /// Adopt an existing (e.g. loaded) session.
    pub fn with_session(catalogs: Catalogs, schema: Schema, session: Session) -> Self {
        let accessibility = Accessibility::refresh(&catalogs, &schema, &session);
        Self {
            catalogs,
            schema,
            session,
            accessibility,
            observers: Vec::new(),
            dirty: false,
        }
    }

    /// Load catalogs and a schema through the stores and start a fresh
    /// session over them.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if either load fails structurally; warnings
    /// from both loads merge into the returned report.
    pub fn load(
        catalog_store: &dyn CatalogStore,
        schema_store: &dyn SchemaStore,
        schema_path: &Path,
    ) -> Result<(Self, LoadReport), StoreError> {
        let (catalogs, mut report) = catalog_store.load_catalogs()?;
        let (schema, schema_report) = schema_store.load_schema(schema_path, &catalogs)?;
        report.merge(schema_report);
        Ok((Self::new(catalogs, schema), report))
    }

    /// Load catalogs, a schema, and a saved session through the stores.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if any load fails structurally; warnings from
    /// all three loads merge into the returned report.
    pub fn load_with_session(
        catalog_store: &dyn CatalogStore,
        schema_store: &dyn SchemaStore,
        session_store: &dyn SessionStore,
        schema_path: &Path,
        session_path: &Path,
    ) -> Result<(Self, LoadReport), StoreError> {
        let (catalogs, mut report) = catalog_store.load_catalogs()?;
        let (schema, schema_report) = schema_store.load_schema(schema_path, &catalogs)?;
        report.merge(schema_report);
        let (session, session_report) =
            session_store.load_session(session_path, &catalogs, &schema)?;
        report.merge(session_report);
        Ok((Self::with_session(catalogs, schema, session), report))
    }

    /// Save the live session and clear the dirty flag.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails; the dirty flag is left set.
    pub fn save_session(
        &mut self,
        store: &dyn SessionStore,
        path: &Path,
    ) -> Result<(), StoreError> {
        store.save_session(path, &self.session, &self.catalogs, &self.schema)?;
        self.mark_saved();
        Ok(())
    }

    /// Write a timestamped autosave. The dirty flag stays set; autosaves
    /// are a safety net, not a save.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn autosave(&self, store: &dyn SessionStore, dir: &Path) -> Result<PathBuf, StoreError> {
        store.save_session_auto(dir, &self.session, &self.catalogs, &self.schema)
    }

    // =========================================================================
    // Read side
    // =========================================================================

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The cached accessibility table, always fresh relative to the latest
    /// mutation made through this service.
    pub fn accessibility(&self) -> &Accessibility {
        &self.accessibility
    }

    /// Whether the session changed since the last `mark_saved`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reset the dirty flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Register an observer for refresh notifications.
    pub fn subscribe(&mut self, observer: Box<dyn AccessibilityObserver>) {
        self.observers.push(observer);
    }

    // =========================================================================
    // Check state mutators
    // =========================================================================

    pub fn set_check_cleared(&mut self, check: CheckId, cleared: bool) {
        self.session.set_cleared(check, cleared);
        self.touch();
    }

    /// Assign a location to a check; the chosen entrance resets with it.
    pub fn assign_location(&mut self, check: CheckId, location: Option<LocationId>) {
        self.session.set_location(check, location);
        self.touch();
    }

    /// Choose which of the assigned location's entrances this check uses.
    /// The choice is not validated against the location's entrance list;
    /// the editor UI constrains it.
    pub fn choose_entrance(&mut self, check: CheckId, entrance: Option<EntityId>) {
        self.session.set_entrance(check, entrance);
        self.touch();
    }

    pub fn set_required_items(&mut self, check: CheckId, items: Vec<ItemId>) {
        self.session.set_required_items(check, items);
        self.touch();
    }

    // =========================================================================
    // Link mutators
    // =========================================================================

    /// Place an entrance link between two distinct checks.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if both ends are the same check;
    /// nothing is mutated and no refresh runs.
    pub fn add_link(&mut self, a: CheckId, b: CheckId) -> Result<(), DomainError> {
        self.session.add_link(a, b)?;
        self.touch();
        Ok(())
    }

    /// Remove the link joining the unordered pair, if one exists.
    pub fn remove_link(&mut self, a: CheckId, b: CheckId) -> bool {
        let removed = self.session.remove_link(a, b);
        if removed {
            self.touch();
        }
        removed
    }

    // =========================================================================
    // Progress mutators
    // =========================================================================

    pub fn collect_item(&mut self, item: ItemId) {
        self.session.add_item(item);
        self.touch();
    }

    pub fn discard_item(&mut self, item: ItemId) {
        self.session.remove_item(item);
        self.touch();
    }

    /// Mutate one location's progress record. Key counters clamp to the
    /// found total, and the found total clamps to the catalog's declared
    /// treasure keys where one is declared.
    pub fn update_location_progress(
        &mut self,
        location: LocationId,
        update: impl FnOnce(&mut LocationProgress),
    ) {
        let declared_keys = self.catalogs.locations.get(location).treasure_keys;
        let progress = self.session.location_progress_mut(location);
        update(progress);
        if declared_keys > 0 {
            progress.keys_total = progress.keys_total.min(declared_keys);
        }
        progress.keys_current = progress.keys_current.min(progress.keys_total);
        self.touch();
    }

    pub fn set_location_cleared(&mut self, location: LocationId, cleared: bool) {
        self.session.location_progress_mut(location).cleared = cleared;
        self.touch();
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    fn touch(&mut self) {
        self.accessibility = Accessibility::refresh(&self.catalogs, &self.schema, &self.session);
        self.dirty = true;
        debug!(observers = self.observers.len(), "notifying refresh");
        for observer in &self.observers {
            observer.accessibility_refreshed(&self.accessibility);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockCatalogStore, MockSchemaStore, MockSessionStore};
    use wayfndr_domain::{Check, Entity, Location, Region, RuleEntry, RuleTerm};

    /// One item ("lamp"), one location ("keep", 3 small keys), one region
    /// gated on holding the lamp, one check inside that region.
    fn world() -> (Catalogs, Schema) {
        let mut catalogs = Catalogs::new();
        let lamp_entity = catalogs
            .entities
            .insert(Entity::new("lamp", "Lamp"))
            .unwrap();
        catalogs
            .items
            .insert(lamp_entity, &catalogs.entities)
            .unwrap();
        let keep_entity = catalogs
            .entities
            .insert(Entity::new("keep", "Keep"))
            .unwrap();
        catalogs
            .locations
            .insert(
                Location::new(keep_entity).with_treasure(5, 3, 0),
                &catalogs.entities,
            )
            .unwrap();

        let lamp = catalogs.items.find("lamp").unwrap();
        let mut schema = Schema::new();
        let has_lamp = schema.add_rule("has-lamp").unwrap();
        schema.set_rule_entries(
            has_lamp,
            vec![RuleEntry::new(RuleTerm::ProgressItem(lamp))],
        );
        schema
            .add_region(Region::new("lit").with_rule(has_lamp))
            .unwrap();
        let lit = schema.find_region("lit").unwrap();
        schema.add_check(Check::new("chest").in_region(lit)).unwrap();
        schema.add_check(Check::new("stump")).unwrap();

        (catalogs, schema)
    }

    #[test]
    fn mutations_keep_accessibility_fresh() {
        let (catalogs, schema) = world();
        let lamp = catalogs.items.find("lamp").unwrap();
        let chest = schema.find_check("chest").unwrap();
        let mut service = TrackerService::new(catalogs, schema);

        assert!(!service.accessibility().check(chest));
        assert!(!service.is_dirty());

        service.collect_item(lamp);
        assert!(service.accessibility().check(chest));
        assert!(service.is_dirty());

        service.discard_item(lamp);
        assert!(!service.accessibility().check(chest));

        service.mark_saved();
        assert!(!service.is_dirty());
    }

    #[test]
    fn observers_hear_every_refresh() {
        let (catalogs, schema) = world();
        let lamp = catalogs.items.find("lamp").unwrap();
        let mut service = TrackerService::new(catalogs, schema);

        let mut observer = MockAccessibilityObserver::new();
        observer
            .expect_accessibility_refreshed()
            .times(2)
            .return_const(());
        service.subscribe(Box::new(observer));

        service.collect_item(lamp);
        service.discard_item(lamp);
    }

    #[test]
    fn link_add_and_remove_round_trips_accessibility() {
        let (catalogs, schema) = world();
        let chest = schema.find_check("chest").unwrap();
        let stump = schema.find_check("stump").unwrap();
        let mut service = TrackerService::new(catalogs, schema);

        let before = service.accessibility().clone();
        assert!(!before.check(chest));
        assert!(before.check(stump));

        service.add_link(chest, stump).unwrap();
        assert!(service.accessibility().check(chest));

        assert!(service.remove_link(stump, chest));
        assert_eq!(*service.accessibility(), before);
    }

    #[test]
    fn rejected_link_neither_refreshes_nor_dirties() {
        let (catalogs, schema) = world();
        let chest = schema.find_check("chest").unwrap();
        let mut service = TrackerService::new(catalogs, schema);

        let mut observer = MockAccessibilityObserver::new();
        observer.expect_accessibility_refreshed().never();
        service.subscribe(Box::new(observer));

        assert!(service.add_link(chest, chest).is_err());
        assert!(!service.is_dirty());
    }

    #[test]
    fn location_progress_keys_clamp_to_declared_totals() {
        let (catalogs, schema) = world();
        let keep = catalogs.locations.find("keep").unwrap();
        let mut service = TrackerService::new(catalogs, schema);

        service.update_location_progress(keep, |progress| {
            progress.keys_total = 9;
            progress.keys_current = 7;
        });

        let progress = service.session().location_progress(keep);
        assert_eq!(progress.keys_total, 3, "clamped to the catalog's keys");
        assert_eq!(progress.keys_current, 3, "cannot hold more than found");
    }

    #[test]
    fn load_merges_reports_from_the_stores() {
        let (catalogs, schema) = world();

        let mut catalog_store = MockCatalogStore::new();
        let loaded_catalogs = catalogs.clone();
        catalog_store.expect_load_catalogs().returning(move || {
            let mut report = LoadReport::new();
            report.warn("catalog warning");
            Ok((loaded_catalogs.clone(), report))
        });

        let mut schema_store = MockSchemaStore::new();
        let loaded_schema = schema.clone();
        schema_store.expect_load_schema().returning(move |_, _| {
            let mut report = LoadReport::new();
            report.warn("schema warning");
            Ok((loaded_schema.clone(), report))
        });

        let (service, report) =
            TrackerService::load(&catalog_store, &schema_store, Path::new("map.json")).unwrap();

        assert_eq!(report.warnings().len(), 2);
        assert_eq!(service.schema().check_count(), 2);
        assert!(!service.is_dirty());
    }

    #[test]
    fn save_session_goes_through_the_store_and_clears_dirty() {
        let (catalogs, schema) = world();
        let lamp = catalogs.items.find("lamp").unwrap();
        let mut service = TrackerService::new(catalogs, schema);
        service.collect_item(lamp);
        assert!(service.is_dirty());

        let mut store = MockSessionStore::new();
        store
            .expect_save_session()
            .times(1)
            .returning(|_, _, _, _| Ok(()));
        service.save_session(&store, Path::new("run.json")).unwrap();
        assert!(!service.is_dirty());
    }

    #[test]
    fn clearing_a_location_unlocks_location_gated_rules() {
        let (catalogs, mut schema) = world();
        let keep = catalogs.locations.find("keep").unwrap();
        let gate = schema.add_rule("keep-cleared").unwrap();
        schema.set_rule_entries(
            gate,
            vec![RuleEntry::new(RuleTerm::ProgressLocation(keep))],
        );
        schema
            .add_region(Region::new("beyond").with_rule(gate))
            .unwrap();
        let beyond = schema.find_region("beyond").unwrap();

        let mut service = TrackerService::new(catalogs, schema);
        assert!(!service.accessibility().region(beyond));

        service.set_location_cleared(keep, true);
        assert!(service.accessibility().region(beyond));
    }
}
