//! The game session state machine.

use std::sync::Arc;

use boreal_ai::AiController;
use boreal_foundation::{AreaId, EngineFamily, Error, ObjectId, Result};
use boreal_nav::NavMesh;
use boreal_world::World;
use tracing::info;

use crate::loader::{LoadReport, ModuleLoader, ProgressSink, StagedModule, report_progress};
use crate::provider::ResourceProvider;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No module loaded; updates are no-ops.
    Idle,
    /// A module is loaded but has not ticked yet.
    ModuleLoaded,
    /// The module is ticking.
    ModuleRunning,
}

/// One running game: a module, its world, and the AI driving it.
///
/// Sessions are created by [`crate::Engine::create_game_session`]. Loading a
/// module replaces the whole world; the previous module's state is gone once
/// the swap happens, so anything worth keeping across modules goes through
/// the save layer first.
pub struct GameSession {
    family: EngineFamily,
    loader: ModuleLoader,
    world: World,
    ai: Option<AiController>,
    player: Option<ObjectId>,
    state: SessionState,
    ai_seed: u64,
    on_unload: Arc<dyn Fn(&str) + Send + Sync>,
}

impl GameSession {
    pub(crate) fn new(
        family: EngineFamily,
        provider: Arc<dyn ResourceProvider>,
        ai_seed: u64,
        on_unload: Arc<dyn Fn(&str) + Send + Sync>,
    ) -> Self {
        Self {
            family,
            loader: ModuleLoader::new(provider),
            world: World::new(),
            ai: None,
            player: None,
            state: SessionState::Idle,
            ai_seed,
            on_unload,
        }
    }

    /// The engine family this session runs under.
    #[must_use]
    pub fn family(&self) -> EngineFamily {
        self.family
    }

    /// The session's lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The live world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The live world, mutably.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The player creature, once a module is loaded.
    #[must_use]
    pub fn player(&self) -> Option<ObjectId> {
        self.player
    }

    /// The loaded module's name.
    #[must_use]
    pub fn current_module(&self) -> Option<&str> {
        self.loader.current_module()
    }

    /// The loaded module's entry area.
    #[must_use]
    pub fn current_area(&self) -> Option<AreaId> {
        self.loader.current_area()
    }

    /// The entry area's walkmesh.
    #[must_use]
    pub fn navmesh(&self) -> Option<Arc<NavMesh>> {
        self.loader.current_navmesh()
    }

    /// Whether the resource provider knows the named module.
    #[must_use]
    pub fn has_module(&self, name: &str) -> bool {
        self.loader.has_module(name)
    }

    /// Reseeds the AI stream for subsequent loads. The running module's
    /// controller keeps its current stream.
    pub fn set_ai_seed(&mut self, seed: u64) {
        self.ai_seed = seed;
    }

    /// Loads a module, replacing whatever was running.
    ///
    /// The incoming module is staged completely before the session changes at
    /// all, so on failure the prior module keeps running untouched. The
    /// unload hook fires for the outgoing module only after staging succeeds.
    /// Spawn-time events from staging stay in the world's queue for the
    /// embedder to drain.
    ///
    /// # Errors
    ///
    /// Returns [`boreal_foundation::ErrorKind::ModuleLoad`] wrapping the
    /// failure, with the module name attached.
    pub async fn load_module(
        &mut self,
        name: &str,
        mut progress: ProgressSink<'_>,
    ) -> Result<LoadReport> {
        report_progress(&mut progress, 0.0);
        let staged = self
            .loader
            .stage(name, &mut progress)
            .await
            .map_err(|cause| Error::module_load(name, cause))?;

        if let Some(previous) = self.loader.current_module() {
            (self.on_unload)(previous);
        }
        let StagedModule {
            name,
            world,
            player,
            entry_area,
            navmesh,
            report,
        } = staged;
        self.world = world;
        self.ai = Some(AiController::new(self.family, self.ai_seed));
        self.player = Some(player);
        self.loader.commit(name, entry_area, navmesh);
        self.state = SessionState::ModuleLoaded;
        report_progress(&mut progress, 1.0);
        info!(
            module = self.loader.current_module().unwrap_or_default(),
            spawned = report.instances_spawned,
            skipped = report.instances_skipped,
            "module loaded"
        );
        Ok(report)
    }

    /// Unloads the current module, dropping its world. Idempotent.
    pub fn unload_module(&mut self) {
        if let Some(name) = self.loader.current_module().map(str::to_owned) {
            (self.on_unload)(&name);
            info!(module = %name, "module unloaded");
        }
        self.loader.clear();
        self.world = World::new();
        self.ai = None;
        self.player = None;
        self.state = SessionState::Idle;
    }

    /// Advances the session by `dt` seconds: one AI pass, then one world
    /// tick. A no-op while idle; the first tick after a load moves the
    /// session to [`SessionState::ModuleRunning`].
    ///
    /// # Errors
    ///
    /// Returns [`boreal_foundation::ErrorKind::Argument`] when `dt` is
    /// negative or non-finite.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        if self.state == SessionState::Idle {
            return Ok(());
        }
        self.state = SessionState::ModuleRunning;
        if let Some(ai) = self.ai.as_mut() {
            ai.update(&mut self.world, dt)?;
        }
        self.world.update(dt)
    }

    /// Tears the session down. Equivalent to unloading the module.
    pub fn shutdown(&mut self) {
        self.unload_module();
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("family", &self.family)
            .field("state", &self.state)
            .field("module", &self.loader.current_module())
            .finish_non_exhaustive()
    }
}
