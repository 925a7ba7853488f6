use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use burner_common::{map_range, ItemId, Viewport, WorldId};
use glam::Vec2;

use crate::draw::DrawTarget;
use crate::error::{ConfigError, RegistryError};
use crate::item::{AttrValue, Item, StepOutcome};
use crate::kind::{ItemKind, KindRegistry};
use crate::options::{ItemOptions, Visibility, WorldOptions};
use crate::pointer::Pointer;
use crate::stats::FrameStats;
use crate::world::{Slot, World};

/// Setup hook run once by [`Registry::create`] and again by [`Registry::reset_system`].
pub type SetupFn<T> = Box<dyn FnMut(&mut Registry<T>) -> Result<(), RegistryError>>;

/// One arena slot: the item and its kind behavior.
#[derive(Debug)]
struct Entry {
    item: Item,
    kind: Box<dyn ItemKind>,
}

/// Per-name index. Entries are marked inactive on retirement, never removed.
#[derive(Debug, Default)]
struct NameCache {
    list: Vec<ItemId>,
    active: BTreeMap<ItemId, bool>,
}

/// Which items a query scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Active items in insertion order.
    Active,
    /// Retired items parked in a world's pool.
    Pool(WorldId),
}

/// Worlds paused by a resize, waiting for resize events to stop.
#[derive(Debug)]
struct ResizeSettle {
    last: Instant,
    paused: Vec<WorldId>,
}

/// Owns every world and item and drives the per-frame update.
///
/// Items live in an arena of slots. Active items are listed in insertion
/// order; retired items stay in their slot and are parked on their world's
/// pool until [`Registry::add`] recycles them.
///
/// # Invariants
/// - Ids come from one counter shared by worlds and items and strictly increase.
/// - A recycled item keeps its id.
/// - Every slot is either in exactly one world's pool or in the active list.
pub struct Registry<T: DrawTarget> {
    target: T,
    kinds: KindRegistry,
    viewport: Viewport,
    worlds: Vec<World>,
    slots: Vec<Option<Entry>>,
    records: Vec<Slot>,
    lookup: BTreeMap<ItemId, Slot>,
    caches: BTreeMap<String, NameCache>,
    id_count: u64,
    clock: u64,
    pointer: Pointer,
    stats: Option<FrameStats>,
    running: bool,
    setup: Option<SetupFn<T>>,
    resize: Option<ResizeSettle>,
}

impl<T: DrawTarget> Registry<T> {
    /// Resize events closer together than this keep stepping paused.
    pub const RESIZE_SETTLE: Duration = Duration::from_millis(100);

    /// An empty, stopped registry with the built-in kinds.
    pub fn new(target: T, viewport: Viewport) -> Result<Self, ConfigError> {
        Self::with_kinds(target, viewport, KindRegistry::with_builtins())
    }

    pub fn with_kinds(target: T, viewport: Viewport, kinds: KindRegistry) -> Result<Self, ConfigError> {
        if !viewport.is_valid() {
            return Err(ConfigError::viewport(viewport));
        }
        Ok(Self {
            target,
            kinds,
            viewport,
            worlds: Vec::new(),
            slots: Vec::new(),
            records: Vec::new(),
            lookup: BTreeMap::new(),
            caches: BTreeMap::new(),
            id_count: 0,
            clock: 0,
            pointer: Pointer::default(),
            stats: None,
            running: false,
            setup: None,
            resize: None,
        })
    }

    /// Build the worlds (one viewport-bound world when `worlds` is empty),
    /// run `setup`, and start unless `no_start`.
    pub fn create<F>(&mut self, worlds: &[WorldOptions], setup: F, no_start: bool) -> Result<(), RegistryError>
    where
        F: FnMut(&mut Registry<T>) -> Result<(), RegistryError> + 'static,
    {
        if worlds.is_empty() {
            self.add_world(&WorldOptions::default())?;
        }
        for options in worlds {
            self.add_world(options)?;
        }
        self.setup = Some(Box::new(setup));
        self.run_setup()?;
        self.running = !no_start;
        tracing::info!(
            worlds = self.worlds.len(),
            items = self.records.len(),
            running = self.running,
            "registry created"
        );
        Ok(())
    }

    fn run_setup(&mut self) -> Result<(), RegistryError> {
        if let Some(mut setup) = self.setup.take() {
            let result = setup(self);
            self.setup = Some(setup);
            result?;
        }
        Ok(())
    }

    fn next_id(&mut self) -> u64 {
        self.id_count += 1;
        self.id_count
    }

    pub fn add_world(&mut self, options: &WorldOptions) -> Result<WorldId, RegistryError> {
        let id = WorldId(self.id_count + 1);
        let world = World::new(id, options, self.viewport)?;
        self.next_id();
        tracing::debug!(%id, bounds = ?world.bounds(), "world added");
        self.worlds.push(world);
        Ok(id)
    }

    fn world_index(&self, id: WorldId) -> Option<usize> {
        self.worlds.iter().position(|w| w.id() == id)
    }

    /// Instantiate an item of kind `kind`, recycling a pooled one of the same
    /// name from the owning world when available.
    pub fn add(&mut self, kind: &str, options: &ItemOptions) -> Result<ItemId, RegistryError> {
        let world_id = match options.world {
            Some(id) => id,
            None => self.worlds.first().ok_or(RegistryError::NoWorld)?.id(),
        };
        let wi = self
            .world_index(world_id)
            .ok_or(RegistryError::UnknownWorld(world_id))?;
        let mut behavior = self
            .kinds
            .create(kind)
            .ok_or_else(|| RegistryError::UnknownKind(kind.to_string()))?;

        let slots = &self.slots;
        let pooled = self.worlds[wi].pool.iter().position(|&slot| {
            slots[slot]
                .as_ref()
                .is_some_and(|e| e.item.name() == kind)
        });

        let recycled = match pooled {
            Some(pos) => {
                let slot = self.worlds[wi].pool.remove(pos);
                self.slots[slot].as_mut().map(|entry| (slot, entry))
            }
            None => None,
        };

        let (id, slot) = match recycled {
            Some((slot, entry)) => {
                entry.item.reset(options, &self.worlds[wi]);
                behavior.init(&mut entry.item, options);
                entry.kind = behavior;
                let id = entry.item.id();
                tracing::debug!(%id, kind, "item recycled");
                (id, slot)
            }
            None => {
                let id = ItemId(self.next_id());
                let mut item = Item::new(id, kind, &self.worlds[wi], options);
                behavior.init(&mut item, options);
                self.slots.push(Some(Entry { item, kind: behavior }));
                let slot = self.slots.len() - 1;
                self.lookup.insert(id, slot);
                tracing::debug!(%id, kind, "item created");
                (id, slot)
            }
        };

        self.records.push(slot);
        let cache = self.caches.entry(kind.to_string()).or_default();
        if !cache.active.contains_key(&id) {
            cache.list.push(id);
        }
        cache.active.insert(id, true);
        Ok(id)
    }

    /// Retire an active item into its world's pool and hide it.
    /// Returns `false` if `id` is not active.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let Some(&slot) = self.lookup.get(&id) else {
            return false;
        };
        let Some(pos) = self.records.iter().position(|&s| s == slot) else {
            return false;
        };
        self.records.remove(pos);
        self.retire(slot);
        true
    }

    /// Same as [`Registry::remove`].
    pub fn destroy_item(&mut self, id: ItemId) -> bool {
        self.remove(id)
    }

    /// Park `slot` in its world's pool. The slot must already be out of `records`.
    fn retire(&mut self, slot: Slot) {
        let Some(entry) = self.slots[slot].as_mut() else {
            return;
        };
        self.target.hide(&entry.item.label());
        entry.item.visibility = Visibility::Hidden;
        let id = entry.item.id();
        let world_id = entry.item.world();
        if let Some(world) = self.worlds.iter_mut().find(|w| w.id() == world_id) {
            world.pool.push(slot);
        }
        if let Some(cache) = self.caches.get_mut(entry.item.name()) {
            cache.active.insert(id, false);
        }
        tracing::debug!(%id, world = %world_id, "item retired");
    }

    /// Run one frame at the current time.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Run one frame: settle a pending resize, step every item of an
    /// unpaused world in reverse insertion order, draw, advance the clock.
    pub fn update_at(&mut self, now: Instant) {
        let _span = tracing::info_span!("registry_update", clock = self.clock).entered();

        self.settle_resize(now);
        self.step_pass(false);
        self.draw_pass(false);
        self.clock += 1;

        if let Some(stats) = self.stats.as_mut() {
            stats.record_frame(now, self.records.len());
        }
        tracing::trace!(items = self.records.len(), "frame complete");
    }

    fn step_pass(&mut self, force: bool) {
        // Reverse order: retiring index i only shifts entries that were already stepped.
        let mut i = self.records.len();
        while i > 0 {
            i -= 1;
            let slot = self.records[i];
            let Some(entry) = self.slots[slot].as_mut() else {
                continue;
            };
            let world_id = entry.item.world();
            let Some(world) = self.worlds.iter_mut().find(|w| w.id() == world_id) else {
                continue;
            };
            if world.pause_step && !force {
                continue;
            }
            if entry.kind.step(&mut entry.item, world) == StepOutcome::Retire {
                self.records.remove(i);
                self.retire(slot);
            }
        }
    }

    fn draw_pass(&mut self, force: bool) {
        for &slot in self.records.iter().rev() {
            let Some(entry) = self.slots[slot].as_ref() else {
                continue;
            };
            let world_id = entry.item.world();
            let paused = self
                .worlds
                .iter()
                .find(|w| w.id() == world_id)
                .is_none_or(|w| w.pause_draw);
            if force || !paused {
                self.target.draw(&entry.kind.draw_props(&entry.item));
            }
        }
        for world in &self.worlds {
            if force || !world.pause_draw {
                self.target.draw(&world.draw_props());
            }
        }
    }

    fn settle_resize(&mut self, now: Instant) {
        let Some(settle) = &self.resize else {
            return;
        };
        if now.saturating_duration_since(settle.last) <= Self::RESIZE_SETTLE {
            return;
        }
        if let Some(settle) = self.resize.take() {
            for world in &mut self.worlds {
                if settle.paused.contains(&world.id()) {
                    world.pause_step = false;
                }
            }
            tracing::debug!(worlds = settle.paused.len(), "resize settled");
        }
    }

    /// Pause stepping everywhere, then run exactly one step and draw pass
    /// over all items regardless of pause flags.
    pub fn step_forward(&mut self) {
        for world in &mut self.worlds {
            world.pause_step = true;
            world.pause_draw = true;
        }
        self.step_pass(true);
        self.draw_pass(true);
        self.clock += 1;
        tracing::debug!(clock = self.clock, "stepped forward");
    }

    /// Flip both pause flags on one world, or on every world when `world` is `None`.
    /// Returns `false` if the named world does not exist.
    pub fn toggle_pause(&mut self, world: Option<WorldId>) -> bool {
        let mut found = false;
        for w in &mut self.worlds {
            if world.is_none_or(|id| id == w.id()) {
                w.pause_step = !w.pause_step;
                w.pause_draw = !w.pause_draw;
                found = true;
            }
        }
        found
    }

    /// Turn the frame-rate counter on or off. Returns whether it is now active.
    pub fn toggle_stats(&mut self) -> bool {
        self.toggle_stats_at(Instant::now())
    }

    pub fn toggle_stats_at(&mut self, now: Instant) -> bool {
        self.stats = match self.stats {
            Some(_) => None,
            None => Some(FrameStats::new(now)),
        };
        self.stats.is_some()
    }

    pub fn stats(&self) -> Option<&FrameStats> {
        self.stats.as_ref()
    }

    pub fn resized(&mut self, viewport: Viewport) -> Result<(), ConfigError> {
        self.resized_at(viewport, Instant::now())
    }

    /// Handle a viewport change: pause stepping until resizes settle, move
    /// every active item proportionally, and recompute world bounds.
    pub fn resized_at(&mut self, viewport: Viewport, now: Instant) -> Result<(), ConfigError> {
        if !viewport.is_valid() {
            return Err(ConfigError::viewport(viewport));
        }

        let settle = self.resize.get_or_insert_with(|| ResizeSettle {
            last: now,
            paused: Vec::new(),
        });
        settle.last = now;
        for world in &mut self.worlds {
            if !world.pause_step {
                world.pause_step = true;
                settle.paused.push(world.id());
            }
        }

        for &slot in &self.records {
            let Some(entry) = self.slots[slot].as_mut() else {
                continue;
            };
            let world_id = entry.item.world();
            let Some(world) = self.worlds.iter().find(|w| w.id() == world_id) else {
                continue;
            };
            if !world.bound_to_window {
                continue;
            }
            let old = Vec2::new(world.bounds().width(), world.bounds().height());
            let new = Vec2::new(viewport.width, viewport.height);
            let loc = &mut entry.item.location;
            if old.x > 0.0 {
                loc.x = new.x * (loc.x / old.x);
            }
            if old.y > 0.0 {
                loc.y = new.y * (loc.y / old.y);
            }
        }

        self.viewport = viewport;
        for world in &mut self.worlds {
            world.set_bounds(viewport);
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
        Ok(())
    }

    /// Device orientation changes are handled as resizes.
    pub fn orientation_changed(&mut self, viewport: Viewport) -> Result<(), ConfigError> {
        self.resized(viewport)
    }

    /// Record a pointer sample given in viewport coordinates.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let location = match self.worlds.first() {
            Some(world) => {
                let b = world.bounds();
                Vec2::new(
                    map_range(x, 0.0, self.viewport.width, b.left, b.right),
                    map_range(y, 0.0, self.viewport.height, b.top, b.bottom),
                )
            }
            None => Vec2::new(x, y),
        };
        self.pointer.record(location);
    }

    pub fn touch_changed(&mut self, x: f32, y: f32) {
        self.pointer_moved(x, y);
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// Drop every item, unpause the worlds, clear pointer and stats, and run
    /// the setup hook again. Worlds and the id counter are kept.
    pub fn reset_system(&mut self) -> Result<(), RegistryError> {
        self.clear_items();
        for world in &mut self.worlds {
            world.pause_step = false;
            world.pause_draw = false;
        }
        self.pointer = Pointer::default();
        self.resize = None;
        self.stats = None;
        self.clock = 0;
        tracing::info!(worlds = self.worlds.len(), "registry reset");
        self.run_setup()
    }

    /// Remove every world and item, forget the setup hook, and stop. The id
    /// counter starts over.
    pub fn destroy_system(&mut self) {
        self.clear_items();
        self.worlds.clear();
        self.id_count = 0;
        self.clock = 0;
        self.pointer = Pointer::default();
        self.resize = None;
        self.stats = None;
        self.setup = None;
        self.running = false;
        tracing::info!("registry destroyed");
    }

    fn clear_items(&mut self) {
        self.target.clear();
        self.slots.clear();
        self.records.clear();
        self.lookup.clear();
        self.caches.clear();
        for world in &mut self.worlds {
            world.pool.clear();
        }
    }

    /// Remove a world together with its active and pooled items.
    pub fn destroy_world(&mut self, id: WorldId) -> bool {
        let Some(wi) = self.world_index(id) else {
            return false;
        };
        let world = self.worlds.remove(wi);

        let slots = &self.slots;
        self.records
            .retain(|&slot| slots[slot].as_ref().is_none_or(|e| e.item.world() != id));

        for slot in 0..self.slots.len() {
            let Some(entry) = self.slots[slot].take_if(|e| e.item.world() == id) else {
                continue;
            };
            let item_id = entry.item.id();
            self.target.hide(&entry.item.label());
            self.lookup.remove(&item_id);
            if let Some(cache) = self.caches.get_mut(entry.item.name()) {
                cache.list.retain(|&i| i != item_id);
                cache.active.remove(&item_id);
            }
        }
        self.target.hide(&world.label());
        tracing::info!(%id, "world destroyed");
        true
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the external scheduler should keep calling [`Registry::update`].
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn entry(&self, slot: Slot) -> Option<&Entry> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn active_entries(&self) -> impl DoubleEndedIterator<Item = &Entry> {
        self.records.iter().filter_map(|&slot| self.entry(slot))
    }

    fn active_slot(&self, id: ItemId) -> Option<Slot> {
        let slot = *self.lookup.get(&id)?;
        self.records.contains(&slot).then_some(slot)
    }

    /// An active item by id.
    pub fn get_item(&self, id: ItemId) -> Option<&Item> {
        let slot = self.active_slot(id)?;
        self.entry(slot).map(|e| &e.item)
    }

    pub fn get_item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        let slot = self.active_slot(id)?;
        self.slots[slot].as_mut().map(|e| &mut e.item)
    }

    pub fn has_item(&self, id: ItemId) -> bool {
        self.active_slot(id).is_some()
    }

    /// Active items in insertion order.
    pub fn all_items(&self) -> impl DoubleEndedIterator<Item = &Item> {
        self.active_entries().map(|e| &e.item)
    }

    pub fn first_item(&self) -> Option<&Item> {
        self.all_items().next()
    }

    pub fn last_item(&self) -> Option<&Item> {
        self.all_items().next_back()
    }

    /// Number of active items.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Number of active items named `name`, from the name cache.
    pub fn count_by_name(&self, name: &str) -> usize {
        self.caches
            .get(name)
            .map_or(0, |c| {
                c.list
                    .iter()
                    .filter(|&id| c.active.get(id).copied().unwrap_or(false))
                    .count()
            })
    }

    /// Entries in `scope`. An unknown world has an empty pool.
    fn scoped_entries(&self, scope: Scope) -> Vec<&Entry> {
        match scope {
            Scope::Active => self.active_entries().collect(),
            Scope::Pool(world) => self.get_world(world).map_or_else(Vec::new, |w| {
                w.pool.iter().filter_map(|&slot| self.entry(slot)).collect()
            }),
        }
    }

    pub fn get_items_by_name(&self, scope: Scope, name: &str) -> Vec<&Item> {
        self.scoped_entries(scope)
            .into_iter()
            .map(|e| &e.item)
            .filter(|i| i.name() == name)
            .collect()
    }

    pub fn get_all_items_by_name(&self, name: &str) -> Vec<&Item> {
        self.get_items_by_name(Scope::Active, name)
    }

    /// Retired items named `name` waiting in `world`'s pool.
    pub fn get_pooled_items_by_name(&self, world: WorldId, name: &str) -> Vec<&Item> {
        self.get_items_by_name(Scope::Pool(world), name)
    }

    /// Items in `scope` that expose `attr`, and whose value matches `value` when one is given.
    pub fn get_items_by_attribute(
        &self,
        scope: Scope,
        attr: &str,
        value: Option<&AttrValue>,
    ) -> Vec<&Item> {
        self.scoped_entries(scope)
            .into_iter()
            .filter(|e| {
                let found = e.item.attribute(attr).or_else(|| e.kind.attribute(attr));
                match (found, value) {
                    (Some(found), Some(want)) => found.matches(want),
                    (Some(_), None) => true,
                    (None, _) => false,
                }
            })
            .map(|e| &e.item)
            .collect()
    }

    pub fn get_all_items_by_attribute(&self, attr: &str, value: Option<&AttrValue>) -> Vec<&Item> {
        self.get_items_by_attribute(Scope::Active, attr, value)
    }

    /// Patch every active item named `name`. Returns how many were updated.
    pub fn update_item_props_by_name(&mut self, name: &str, patch: &ItemOptions) -> usize {
        let mut updated = 0;
        for &slot in &self.records {
            let Some(entry) = self.slots[slot].as_mut() else {
                continue;
            };
            if entry.item.name() == name {
                entry.item.apply(patch);
                updated += 1;
            }
        }
        updated
    }

    /// Patch one active item.
    pub fn update_item(&mut self, id: ItemId, patch: &ItemOptions) -> Option<&Item> {
        let item = self.get_item_mut(id)?;
        item.apply(patch);
        Some(&*item)
    }

    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    pub fn get_world(&self, id: WorldId) -> Option<&World> {
        self.worlds.iter().find(|w| w.id() == id)
    }

    pub fn get_world_mut(&mut self, id: WorldId) -> Option<&mut World> {
        self.worlds.iter_mut().find(|w| w.id() == id)
    }

    pub fn has_world(&self, id: WorldId) -> bool {
        self.get_world(id).is_some()
    }

    pub fn first_world(&self) -> Option<&World> {
        self.worlds.first()
    }

    pub fn last_world(&self) -> Option<&World> {
        self.worlds.last()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Frames run since creation or the last reset.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// The last id handed out.
    pub fn id_count(&self) -> u64 {
        self.id_count
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn kinds(&self) -> &KindRegistry {
        &self.kinds
    }

    pub fn kinds_mut(&mut self) -> &mut KindRegistry {
        &mut self.kinds
    }
}

impl<T: DrawTarget + fmt::Debug> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("target", &self.target)
            .field("kinds", &self.kinds)
            .field("viewport", &self.viewport)
            .field("worlds", &self.worlds.len())
            .field("items", &self.records.len())
            .field("id_count", &self.id_count)
            .field("clock", &self.clock)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawProps;
    use crate::options::Lifespan;

    #[derive(Debug, Default)]
    struct Recorder {
        drawn: Vec<String>,
        hidden: Vec<String>,
        clears: usize,
    }

    impl DrawTarget for Recorder {
        fn draw(&mut self, props: &DrawProps) {
            self.drawn.push(props.label.clone());
        }

        fn hide(&mut self, label: &str) {
            self.hidden.push(label.to_string());
        }

        fn clear(&mut self) {
            self.clears += 1;
        }
    }

    const EPS: f32 = 1e-4;

    fn registry() -> Registry<Recorder> {
        let mut r = Registry::new(Recorder::default(), Viewport::new(400.0, 300.0)).unwrap();
        r.create(&[WorldOptions::sized(400.0, 300.0)], |_| Ok(()), false)
            .unwrap();
        r
    }

    fn at(x: f32, y: f32) -> ItemOptions {
        ItemOptions {
            location: Some(Vec2::new(x, y)),
            ..Default::default()
        }
    }

    #[test]
    fn create_defaults_to_one_world() {
        let mut r = Registry::new(Recorder::default(), Viewport::new(640.0, 480.0)).unwrap();
        r.create(&[], |_| Ok(()), true).unwrap();
        assert_eq!(r.worlds().len(), 1);
        assert!(r.first_world().unwrap().bound_to_window);
        assert!(!r.is_running());
        assert_eq!(r.id_count(), 1);
    }

    #[test]
    fn invalid_viewport_is_rejected() {
        let res = Registry::new(Recorder::default(), Viewport::new(f32::NAN, 10.0));
        assert!(res.is_err());
    }

    #[test]
    fn setup_runs_on_create() {
        let mut r = Registry::new(Recorder::default(), Viewport::default()).unwrap();
        r.create(
            &[],
            |r| {
                r.add("Ball", &ItemOptions::default())?;
                Ok(())
            },
            false,
        )
        .unwrap();
        assert_eq!(r.count(), 1);
        assert!(r.is_running());
    }

    #[test]
    fn add_requires_a_world_and_a_kind() {
        let mut r = Registry::new(Recorder::default(), Viewport::default()).unwrap();
        assert!(matches!(r.add("Item", &ItemOptions::default()), Err(RegistryError::NoWorld)));
        r.add_world(&WorldOptions::default()).unwrap();
        assert!(matches!(
            r.add("Dragon", &ItemOptions::default()),
            Err(RegistryError::UnknownKind(_))
        ));
        let opts = ItemOptions {
            world: Some(WorldId(99)),
            ..Default::default()
        };
        assert!(matches!(r.add("Item", &opts), Err(RegistryError::UnknownWorld(WorldId(99)))));
    }

    #[test]
    fn ids_strictly_increase() {
        let mut r = registry();
        let a = r.add("Item", &ItemOptions::default()).unwrap();
        let b = r.add("Ball", &ItemOptions::default()).unwrap();
        r.remove(a);
        let c = r.add("Box", &ItemOptions::default()).unwrap();
        assert!(a < b && b < c);
        assert_eq!(r.id_count(), c.0);
    }

    #[test]
    fn pooling_preserves_identity_and_resets_state() {
        let mut r = registry();
        let a = r.add(
            "Item",
            &ItemOptions {
                velocity: Some(Vec2::new(3.0, 1.0)),
                ..at(10.0, 10.0)
            },
        )
        .unwrap();
        let wid = r.first_world().unwrap().id();
        let label = r.get_item(a).unwrap().label();

        assert!(r.remove(a));
        assert!(!r.has_item(a));
        assert_eq!(r.count(), 0);
        assert_eq!(r.first_world().unwrap().pool_len(), 1);
        assert_eq!(r.get_pooled_items_by_name(wid, "Item").len(), 1);
        assert_eq!(r.target().hidden, vec![label]);

        let b = r.add("Item", &at(50.0, 60.0)).unwrap();
        assert_eq!(a, b);
        let item = r.get_item(b).unwrap();
        assert_eq!(item.velocity, Vec2::ZERO);
        assert_eq!(item.location, Vec2::new(50.0, 60.0));
        assert_eq!(item.visibility, Visibility::Visible);
        assert_eq!(r.first_world().unwrap().pool_len(), 0);
    }

    #[test]
    fn pool_only_recycles_matching_names() {
        let mut r = registry();
        let a = r.add("Ball", &ItemOptions::default()).unwrap();
        r.remove(a);
        let b = r.add("Box", &ItemOptions::default()).unwrap();
        assert_ne!(a, b);
        assert_eq!(r.first_world().unwrap().pool_len(), 1);
        let recycled = r.add("Ball", &ItemOptions::default()).unwrap();
        assert_eq!(recycled, a);
        assert_eq!(r.get_item(recycled).unwrap().width, 20.0);
    }

    #[test]
    fn double_remove_is_a_no_op() {
        let mut r = registry();
        let a = r.add("Item", &ItemOptions::default()).unwrap();
        assert!(r.remove(a));
        assert!(!r.destroy_item(a));
        assert!(!r.remove(ItemId(1234)));
        assert_eq!(r.first_world().unwrap().pool_len(), 1);
    }

    #[test]
    fn name_cache_tracks_active_items() {
        let mut r = registry();
        let a = r.add("Ball", &ItemOptions::default()).unwrap();
        r.add("Ball", &ItemOptions::default()).unwrap();
        r.add("Box", &ItemOptions::default()).unwrap();
        assert_eq!(r.count_by_name("Ball"), 2);
        r.remove(a);
        assert_eq!(r.count_by_name("Ball"), 1);
        assert_eq!(r.get_all_items_by_name("Ball").len(), 1);
        assert_eq!(r.count_by_name("World"), 0);
        r.add("Ball", &ItemOptions::default()).unwrap();
        assert_eq!(r.count_by_name("Ball"), 2);
    }

    #[test]
    fn single_frame_matches_hand_integration() {
        let mut r = registry();
        let a = r.add("Item", &at(100.0, 100.0)).unwrap();
        r.update();
        let item = r.get_item(a).unwrap();
        assert_eq!(item.acceleration, Vec2::ZERO);
        assert!((item.velocity.y - 0.1).abs() < EPS);
        assert!((item.location.y - 100.1).abs() < EPS);
        assert_eq!(r.clock(), 1);
    }

    #[test]
    fn retirement_during_step_does_not_skip_others() {
        let mut r = registry();
        let mut ids = Vec::new();
        for i in 0..5 {
            let opts = ItemOptions {
                lifespan: Some(if i % 2 == 0 { 0 } else { -1 }),
                ..at(100.0 + i as f32, 100.0)
            };
            ids.push(r.add("Item", &opts).unwrap());
        }
        r.update();
        assert_eq!(r.count(), 2);
        for (i, id) in ids.iter().enumerate() {
            if i % 2 == 1 {
                let item = r.get_item(*id).unwrap();
                assert!((item.location.y - 100.1).abs() < EPS, "item {i} stepped once");
            } else {
                assert!(!r.has_item(*id));
            }
        }
        assert_eq!(r.first_world().unwrap().pool_len(), 3);
    }

    #[test]
    fn lifespan_retires_through_the_frame_loop() {
        let mut r = registry();
        let a = r
            .add(
                "Item",
                &ItemOptions {
                    lifespan: Some(3),
                    ..Default::default()
                },
            )
            .unwrap();
        for _ in 0..3 {
            r.update();
            assert!(r.has_item(a));
        }
        r.update();
        assert!(!r.has_item(a));
    }

    #[test]
    fn paused_step_freezes_but_still_draws() {
        let mut r = registry();
        let a = r.add("Item", &at(100.0, 100.0)).unwrap();
        let wid = r.first_world().unwrap().id();
        r.get_world_mut(wid).unwrap().pause_step = true;
        r.update();
        assert_eq!(r.get_item(a).unwrap().location, Vec2::new(100.0, 100.0));
        assert!(r.target().drawn.contains(&format!("Item{a}")));
    }

    #[test]
    fn paused_draw_still_steps() {
        let mut r = registry();
        let a = r.add("Item", &at(100.0, 100.0)).unwrap();
        let wid = r.first_world().unwrap().id();
        r.get_world_mut(wid).unwrap().pause_draw = true;
        r.update();
        assert!(r.get_item(a).unwrap().location.y > 100.0);
        assert!(r.target().drawn.is_empty());
    }

    #[test]
    fn worlds_are_drawn_with_items() {
        let mut r = registry();
        r.add("Item", &ItemOptions::default()).unwrap();
        r.update();
        assert_eq!(r.target().drawn, vec!["Item2".to_string(), "World1".to_string()]);
    }

    #[test]
    fn items_draw_newest_first_then_worlds() {
        let mut r = registry();
        r.add("Item", &ItemOptions::default()).unwrap();
        r.add("Ball", &ItemOptions::default()).unwrap();
        r.add("Box", &ItemOptions::default()).unwrap();
        r.update();
        assert_eq!(r.target().drawn, vec!["Box4", "Ball3", "Item2", "World1"]);
    }

    #[test]
    fn toggle_pause_flips_both_flags() {
        let mut r = registry();
        assert!(r.toggle_pause(None));
        let w = r.first_world().unwrap();
        assert!(w.pause_step && w.pause_draw);
        let id = w.id();
        assert!(r.toggle_pause(Some(id)));
        assert!(!r.first_world().unwrap().pause_step);
        assert!(!r.toggle_pause(Some(WorldId(77))));
    }

    #[test]
    fn step_forward_advances_one_frame_while_paused() {
        let mut r = registry();
        let a = r.add("Item", &at(100.0, 100.0)).unwrap();
        r.step_forward();
        assert!(r.first_world().unwrap().pause_step);
        let item = r.get_item(a).unwrap();
        assert!((item.location.y - 100.1).abs() < EPS);
        assert_eq!(item.acceleration, Vec2::ZERO);

        r.update();
        assert!((r.get_item(a).unwrap().location.y - 100.1).abs() < EPS);
        r.step_forward();
        assert!(r.get_item(a).unwrap().location.y > 100.2);
        assert_eq!(r.clock(), 3);
    }

    #[test]
    fn resize_rescales_and_settles() {
        let mut r = Registry::new(Recorder::default(), Viewport::new(400.0, 300.0)).unwrap();
        r.create(&[], |_| Ok(()), false).unwrap();
        let a = r.add("Item", &at(100.0, 150.0)).unwrap();

        let t0 = Instant::now();
        r.resized_at(Viewport::new(800.0, 600.0), t0).unwrap();
        let item = r.get_item(a).unwrap();
        assert_eq!(item.location, Vec2::new(200.0, 300.0));
        assert_eq!(r.first_world().unwrap().bounds().right, 800.0);
        assert!(r.first_world().unwrap().pause_step);

        r.update_at(t0 + Duration::from_millis(50));
        assert!(r.first_world().unwrap().pause_step);
        assert_eq!(r.get_item(a).unwrap().location, Vec2::new(200.0, 300.0));

        r.update_at(t0 + Duration::from_millis(150));
        assert!(!r.first_world().unwrap().pause_step);
        assert!(r.get_item(a).unwrap().location.y > 300.0);
    }

    #[test]
    fn resize_keeps_user_paused_worlds_paused() {
        let mut r = Registry::new(Recorder::default(), Viewport::new(400.0, 300.0)).unwrap();
        r.create(&[WorldOptions::default(), WorldOptions::default()], |_| Ok(()), false)
            .unwrap();
        let second = r.last_world().unwrap().id();
        r.get_world_mut(second).unwrap().pause_step = true;

        let t0 = Instant::now();
        r.resized_at(Viewport::new(500.0, 300.0), t0).unwrap();
        r.update_at(t0 + Duration::from_millis(200));
        assert!(!r.first_world().unwrap().pause_step);
        assert!(r.get_world(second).unwrap().pause_step);
    }

    #[test]
    fn detached_worlds_ignore_resize() {
        let mut r = registry();
        let a = r.add("Item", &at(100.0, 100.0)).unwrap();
        r.resized_at(Viewport::new(800.0, 600.0), Instant::now()).unwrap();
        assert_eq!(r.get_item(a).unwrap().location, Vec2::new(100.0, 100.0));
        assert_eq!(r.first_world().unwrap().bounds().right, 400.0);
    }

    #[test]
    fn invalid_resize_is_rejected() {
        let mut r = registry();
        assert!(r.resized(Viewport::new(-5.0, 10.0)).is_err());
        assert_eq!(r.viewport(), Viewport::new(400.0, 300.0));
    }

    #[test]
    fn pointer_maps_into_world_space() {
        let mut r = Registry::new(Recorder::default(), Viewport::new(200.0, 100.0)).unwrap();
        r.create(&[WorldOptions::sized(400.0, 300.0)], |_| Ok(()), false)
            .unwrap();
        r.pointer_moved(100.0, 50.0);
        assert_eq!(r.pointer().location, Vec2::new(200.0, 150.0));
    }

    #[test]
    fn pointer_velocity_points_backwards() {
        let mut r = registry();
        r.pointer_moved(90.0, 10.0);
        r.touch_changed(100.0, 10.0);
        let p = r.pointer();
        assert!(p.last_location.abs_diff_eq(Vec2::new(90.0, 10.0), EPS));
        assert!(p.velocity.abs_diff_eq(Vec2::new(-10.0, 0.0), EPS));
    }

    #[test]
    fn queries_by_attribute() {
        let mut r = registry();
        let a = r
            .add(
                "Item",
                &ItemOptions {
                    angle: Some(0.0),
                    ..Default::default()
                },
            )
            .unwrap();
        r.add(
            "Item",
            &ItemOptions {
                angle: Some(45.0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(r.get_all_items_by_attribute("angle", None).len(), 2);
        let zero = r.get_all_items_by_attribute("angle", Some(&AttrValue::Number(0.0)));
        assert_eq!(zero.len(), 1);
        assert_eq!(zero[0].id(), a);
        assert!(r.get_all_items_by_attribute("sparkle", None).is_empty());
    }

    #[test]
    fn attribute_values_match_decimal_literals() {
        let mut r = registry();
        r.add("Item", &ItemOptions::default()).unwrap();
        let faded = r
            .add(
                "Item",
                &ItemOptions {
                    opacity: Some(0.3),
                    ..Default::default()
                },
            )
            .unwrap();
        let bouncy = r.get_all_items_by_attribute("bounciness", Some(&AttrValue::Number(0.8)));
        assert_eq!(bouncy.len(), 2);
        let dim = r.get_all_items_by_attribute("opacity", Some(&AttrValue::Number(0.3)));
        assert_eq!(dim.len(), 1);
        assert_eq!(dim[0].id(), faded);
    }

    #[test]
    fn attribute_query_scans_a_pool() {
        let mut r = registry();
        let wid = r.first_world().unwrap().id();
        let a = r.add("Ball", &ItemOptions::default()).unwrap();
        r.add("Ball", &ItemOptions::default()).unwrap();
        r.remove(a);

        let pooled = r.get_items_by_attribute(Scope::Pool(wid), "name", Some(&AttrValue::from("Ball")));
        assert_eq!(pooled.len(), 1);
        assert_eq!(pooled[0].id(), a);
        assert_eq!(r.get_items_by_attribute(Scope::Active, "name", None).len(), 1);
        assert_eq!(r.get_items_by_name(Scope::Pool(wid), "Ball").len(), 1);
        assert!(r.get_items_by_attribute(Scope::Pool(WorldId(99)), "name", None).is_empty());
    }

    #[test]
    fn updates_patch_items() {
        let mut r = registry();
        let a = r.add("Ball", &ItemOptions::default()).unwrap();
        r.add("Ball", &ItemOptions::default()).unwrap();
        r.add("Box", &ItemOptions::default()).unwrap();
        let patch = ItemOptions {
            mass: Some(2.0),
            ..Default::default()
        };
        assert_eq!(r.update_item_props_by_name("Ball", &patch), 2);
        assert_eq!(r.get_item(a).unwrap().mass, 2.0);
        assert_eq!(r.get_all_items_by_name("Box")[0].mass, 10.0);

        let life = ItemOptions {
            lifespan: Some(9),
            ..Default::default()
        };
        assert_eq!(r.update_item(a, &life).unwrap().lifespan, Lifespan::Frames(9));
        assert!(r.update_item(ItemId(999), &life).is_none());
    }

    #[test]
    fn first_and_last_follow_insertion_order() {
        let mut r = registry();
        let a = r.add("Item", &ItemOptions::default()).unwrap();
        let b = r.add("Ball", &ItemOptions::default()).unwrap();
        assert_eq!(r.first_item().unwrap().id(), a);
        assert_eq!(r.last_item().unwrap().id(), b);
        assert_eq!(r.last_world().unwrap().id(), WorldId(1));
        assert!(r.get_item(ItemId(55)).is_none());
        assert!(r.get_world(WorldId(55)).is_none());
    }

    #[test]
    fn stats_count_frames() {
        let mut r = registry();
        let t0 = Instant::now();
        assert!(r.toggle_stats_at(t0));
        r.add("Item", &ItemOptions::default()).unwrap();
        r.update_at(t0 + Duration::from_millis(500));
        r.update_at(t0 + Duration::from_millis(1000));
        let stats = r.stats().unwrap();
        assert_eq!(stats.fps, 2);
        assert_eq!(stats.total_items, 1);
        assert!(!r.toggle_stats());
        assert!(r.stats().is_none());
    }

    #[test]
    fn reset_reruns_setup_and_keeps_worlds() {
        let mut r = Registry::new(Recorder::default(), Viewport::default()).unwrap();
        r.create(
            &[],
            |r| {
                r.add("Ball", &ItemOptions::default())?;
                r.add("Box", &ItemOptions::default())?;
                Ok(())
            },
            false,
        )
        .unwrap();
        let first_ids: Vec<_> = r.all_items().map(Item::id).collect();
        r.toggle_pause(None);
        r.update();

        r.reset_system().unwrap();
        assert_eq!(r.worlds().len(), 1);
        assert!(!r.first_world().unwrap().pause_step);
        assert_eq!(r.count(), 2);
        assert_eq!(r.clock(), 0);
        assert_eq!(r.first_world().unwrap().pool_len(), 0);
        assert_eq!(r.target().clears, 1);
        let ids: Vec<_> = r.all_items().map(Item::id).collect();
        assert!(ids.iter().all(|id| first_ids.iter().all(|old| id > old)));
    }

    #[test]
    fn destroy_system_clears_everything() {
        let mut r = registry();
        r.add("Item", &ItemOptions::default()).unwrap();
        r.destroy_system();
        assert!(r.worlds().is_empty());
        assert_eq!(r.count(), 0);
        assert_eq!(r.id_count(), 0);
        assert!(!r.is_running());
    }

    #[test]
    fn reset_after_destroy_does_not_rerun_old_setup() {
        let mut r = Registry::new(Recorder::default(), Viewport::new(400.0, 300.0)).unwrap();
        r.create(
            &[WorldOptions::sized(400.0, 300.0)],
            |r| {
                r.add("Ball", &ItemOptions::default())?;
                Ok(())
            },
            false,
        )
        .unwrap();
        r.destroy_system();
        r.reset_system().unwrap();
        assert_eq!(r.count(), 0);
        assert!(r.worlds().is_empty());
    }

    #[test]
    fn destroy_world_takes_its_items() {
        let mut r = registry();
        let second = r.add_world(&WorldOptions::sized(100.0, 100.0)).unwrap();
        let keep = r.add("Item", &ItemOptions::default()).unwrap();
        let gone = r
            .add(
                "Item",
                &ItemOptions {
                    world: Some(second),
                    ..Default::default()
                },
            )
            .unwrap();
        let pooled = r
            .add(
                "Ball",
                &ItemOptions {
                    world: Some(second),
                    ..Default::default()
                },
            )
            .unwrap();
        r.remove(pooled);

        assert!(r.destroy_world(second));
        assert!(!r.has_world(second));
        assert!(r.has_item(keep));
        assert!(!r.has_item(gone));
        assert_eq!(r.count(), 1);
        assert_eq!(r.count_by_name("Ball"), 0);
        assert!(r.target().hidden.contains(&format!("World{second}")));
        assert!(!r.destroy_world(second));

        let fresh = r.add("Ball", &ItemOptions::default()).unwrap();
        assert!(fresh > pooled);
    }

    #[test]
    fn start_and_stop() {
        let mut r = registry();
        assert!(r.is_running());
        r.stop();
        assert!(!r.is_running());
        r.start();
        assert!(r.is_running());
    }
}
