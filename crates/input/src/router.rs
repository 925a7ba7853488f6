use burner_kernel::{ConfigError, DrawTarget, Registry, RegistryError};

use crate::action::{Command, InputEvent};
use crate::bindings::KeyBindings;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("host reported an unusable viewport: {0}")]
    Viewport(#[from] ConfigError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Delivers normalized events to a registry.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    pub bindings: KeyBindings,
}

impl InputRouter {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Apply `event` to `registry`. Returns the command a key press ran, if any.
    pub fn dispatch<T: DrawTarget>(
        &self,
        registry: &mut Registry<T>,
        event: InputEvent,
    ) -> Result<Option<Command>, InputError> {
        match event {
            InputEvent::PointerMoved { x, y } => registry.pointer_moved(x, y),
            InputEvent::TouchChanged { x, y } => registry.touch_changed(x, y),
            InputEvent::Resized(viewport) => registry.resized(viewport)?,
            InputEvent::OrientationChanged(viewport) => registry.orientation_changed(viewport)?,
            InputEvent::KeyPressed(code) => {
                let Some(command) = self.bindings.resolve(code) else {
                    tracing::trace!(code, "unbound key");
                    return Ok(None);
                };
                Self::run(registry, command)?;
                return Ok(Some(command));
            }
        }
        Ok(None)
    }

    /// Run a debug command directly, bypassing key bindings.
    pub fn run<T: DrawTarget>(registry: &mut Registry<T>, command: Command) -> Result<(), InputError> {
        tracing::debug!(?command, "running command");
        match command {
            Command::StepForward => registry.step_forward(),
            Command::TogglePause => {
                registry.toggle_pause(None);
            }
            Command::ResetSystem => registry.reset_system()?,
            Command::ToggleStats => {
                registry.toggle_stats();
            }
        }
        Ok(())
    }
}
