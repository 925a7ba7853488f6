use std::fmt;

use burner_common::{ItemId, WorldId};
use burner_kernel::{DrawTarget, Item, Lifespan, Registry};
use glam::Vec2;
use serde::Serialize;

/// Read-only queries against a registry for debugging and CLI output.
pub struct RegistryInspector;

impl RegistryInspector {
    /// Produce a summary of the registry state.
    pub fn summary<T: DrawTarget>(registry: &Registry<T>) -> RegistrySummary {
        RegistrySummary {
            clock: registry.clock(),
            id_count: registry.id_count(),
            worlds: registry.worlds().len(),
            items: registry.count(),
            pooled: registry.worlds().iter().map(|w| w.pool_len()).sum(),
            running: registry.is_running(),
        }
    }

    pub fn inspect_item<T: DrawTarget>(registry: &Registry<T>, id: ItemId) -> Option<ItemInfo> {
        registry.get_item(id).map(ItemInfo::from)
    }

    /// Active item ids in insertion order.
    pub fn list_items<T: DrawTarget>(registry: &Registry<T>) -> Vec<ItemId> {
        registry.all_items().map(Item::id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrySummary {
    pub clock: u64,
    pub id_count: u64,
    pub worlds: usize,
    pub items: usize,
    pub pooled: usize,
    pub running: bool,
}

impl fmt::Display for RegistrySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Registry: clock={} ids={} worlds={} items={} pooled={} running={}",
            self.clock, self.id_count, self.worlds, self.items, self.pooled, self.running
        )
    }
}

/// Detailed info about a single item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemInfo {
    pub id: ItemId,
    pub label: String,
    pub world: WorldId,
    pub location: Vec2,
    pub velocity: Vec2,
    pub life: u32,
    /// `-1` for infinite.
    pub lifespan: i64,
}

impl From<&Item> for ItemInfo {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id(),
            label: item.label(),
            world: item.world(),
            location: item.location,
            velocity: item.velocity,
            life: item.life,
            lifespan: item.lifespan.as_frames(),
        }
    }
}

impl fmt::Display for ItemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (world {}) pos=({:.2}, {:.2}) vel=({:.2}, {:.2})",
            self.label, self.world, self.location.x, self.location.y, self.velocity.x, self.velocity.y,
        )?;
        match Lifespan::from_frames(self.lifespan) {
            Lifespan::Infinite => Ok(()),
            Lifespan::Frames(n) => write!(f, " life={}/{n}", self.life),
        }
    }
}
