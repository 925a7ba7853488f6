//! Declarative scene description: viewport, worlds, and items to spawn.

use burner_common::{ItemId, Viewport};
use serde::{Deserialize, Serialize};

use crate::draw::DrawTarget;
use crate::error::RegistryError;
use crate::options::{ItemOptions, WorldOptions};
use crate::registry::Registry;

/// A batch of identical items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpawnSpec {
    /// Registered kind name, e.g. `Ball`.
    pub kind: String,
    #[serde(default = "SpawnSpec::default_count")]
    pub count: usize,
    #[serde(default)]
    pub options: ItemOptions,
}

impl SpawnSpec {
    fn default_count() -> usize {
        1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub viewport: Option<Viewport>,
    /// Empty means one world bound to the viewport.
    pub worlds: Vec<WorldOptions>,
    pub spawn: Vec<SpawnSpec>,
}

impl SceneConfig {
    pub fn viewport(&self) -> Viewport {
        self.viewport.unwrap_or_default()
    }

    /// Create the scene's worlds on `registry` and install the spawn list as
    /// its setup hook, so a system reset spawns the same items again.
    pub fn install<T>(&self, registry: &mut Registry<T>, no_start: bool) -> Result<(), RegistryError>
    where
        T: DrawTarget + 'static,
    {
        let spawn = self.spawn.clone();
        registry.create(&self.worlds, move |r| spawn_all(r, &spawn).map(drop), no_start)
    }
}

/// Add every item in `spawn`, in order.
pub fn spawn_all<T: DrawTarget>(registry: &mut Registry<T>, spawn: &[SpawnSpec]) -> Result<Vec<ItemId>, RegistryError> {
    let mut ids = Vec::new();
    for spec in spawn {
        for _ in 0..spec.count {
            ids.push(registry.add(&spec.kind, &spec.options)?);
        }
    }
    tracing::debug!(items = ids.len(), "scene spawned");
    Ok(ids)
}
