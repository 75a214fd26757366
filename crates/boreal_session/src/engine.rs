//! Engine construction and family profiles.
//!
//! Families differ by composition, not inheritance: a [`FamilyProfile`]
//! bundles the family id with the closures that vary per engine (resource
//! provider construction, creature sizing, unload notification), and one
//! shared [`Engine`] implementation carries everything else.

use std::path::Path;
use std::sync::Arc;

use boreal_foundation::{EngineFamily, Error, Result};
use boreal_world::Entity;
use glam::Vec3;
use tracing::info;

use crate::provider::ResourceProvider;
use crate::session::GameSession;

type ProviderFactory = Box<dyn Fn(&Path) -> Result<Box<dyn ResourceProvider>> + Send + Sync>;
type CreatureBounds = Box<dyn Fn(&Entity) -> Vec3 + Send + Sync>;
type UnloadHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Everything family-specific, injected as closures.
pub struct FamilyProfile {
    family: EngineFamily,
    provider_factory: ProviderFactory,
    creature_bounds: CreatureBounds,
    on_unload: UnloadHook,
}

impl FamilyProfile {
    /// The built-in profile for a family.
    ///
    /// Native resource decoding lives outside this crate, so the built-in
    /// provider factory always fails with an unsupported-operation error;
    /// wire a decoder with [`FamilyProfile::with_provider_factory`] or hand
    /// the engine a ready provider via [`Engine::with_provider`].
    #[must_use]
    pub fn for_family(family: EngineFamily) -> Self {
        let base = match family {
            EngineFamily::Aurora | EngineFamily::Electron => Vec3::new(0.5, 0.5, 0.9),
            EngineFamily::Odyssey => Vec3::new(0.4, 0.4, 0.9),
            EngineFamily::Eclipse => Vec3::new(0.6, 0.6, 1.0),
        };
        Self {
            family,
            provider_factory: Box::new(move |_| {
                Err(Error::unsupported(family, "native resource decoding"))
            }),
            creature_bounds: Box::new(move |entity| {
                let scale = entity.transform().map_or(1.0, |transform| transform.scale);
                base * scale
            }),
            on_unload: Arc::new(|_| {}),
        }
    }

    /// The profile's family.
    #[must_use]
    pub fn family(&self) -> EngineFamily {
        self.family
    }

    /// Replaces the resource-provider factory.
    #[must_use]
    pub fn with_provider_factory(
        mut self,
        factory: impl Fn(&Path) -> Result<Box<dyn ResourceProvider>> + Send + Sync + 'static,
    ) -> Self {
        self.provider_factory = Box::new(factory);
        self
    }

    /// Replaces the creature sizing hook.
    #[must_use]
    pub fn with_creature_bounds(
        mut self,
        bounds: impl Fn(&Entity) -> Vec3 + Send + Sync + 'static,
    ) -> Self {
        self.creature_bounds = Box::new(bounds);
        self
    }

    /// Installs a hook that runs with the module name whenever a session
    /// unloads a module.
    #[must_use]
    pub fn with_unload_hook(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_unload = Arc::new(hook);
        self
    }

    /// Bounding half-extents for a creature, in world units.
    #[must_use]
    pub fn creature_bounds(&self, entity: &Entity) -> Vec3 {
        (self.creature_bounds)(entity)
    }
}

impl std::fmt::Debug for FamilyProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FamilyProfile")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

/// A configured runtime for one engine family.
///
/// The engine owns the family profile and the resource provider; sessions
/// borrow both. [`Engine::initialize`] gates session creation so embedders
/// cannot hand out sessions from a half-configured engine.
pub struct Engine {
    profile: FamilyProfile,
    provider: Arc<dyn ResourceProvider>,
    ai_seed: u64,
    initialized: bool,
}

impl Engine {
    /// Builds an engine for a game install via the profile's provider
    /// factory.
    ///
    /// # Errors
    ///
    /// Propagates the factory's failure, e.g.
    /// [`boreal_foundation::ErrorKind::Unsupported`] from a built-in profile
    /// with no decoder wired.
    pub fn new(profile: FamilyProfile, install_path: &Path) -> Result<Self> {
        let provider = (profile.provider_factory)(install_path)?;
        Ok(Self::from_parts(profile, Arc::from(provider)))
    }

    /// Builds an engine around an already-constructed provider.
    pub fn with_provider(
        profile: FamilyProfile,
        provider: impl ResourceProvider + 'static,
    ) -> Self {
        Self::from_parts(profile, Arc::new(provider))
    }

    fn from_parts(profile: FamilyProfile, provider: Arc<dyn ResourceProvider>) -> Self {
        Self {
            profile,
            provider,
            ai_seed: 0,
            initialized: false,
        }
    }

    /// The engine family.
    #[must_use]
    pub fn family(&self) -> EngineFamily {
        self.profile.family
    }

    /// The family profile in effect.
    #[must_use]
    pub fn profile(&self) -> &FamilyProfile {
        &self.profile
    }

    /// Whether [`Engine::initialize`] has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Seeds the AI stream handed to sessions created afterwards.
    pub fn set_ai_seed(&mut self, seed: u64) {
        self.ai_seed = seed;
    }

    /// Readies the engine for session creation.
    pub fn initialize(&mut self) {
        self.initialized = true;
        info!(family = %self.profile.family, "engine initialized");
    }

    /// Creates a session bound to this engine's family and provider.
    ///
    /// # Errors
    ///
    /// Returns [`boreal_foundation::ErrorKind::Argument`] when the engine is
    /// not initialized.
    pub fn create_game_session(&self) -> Result<GameSession> {
        if !self.initialized {
            return Err(Error::argument("engine is not initialized"));
        }
        Ok(GameSession::new(
            self.profile.family,
            Arc::clone(&self.provider),
            self.ai_seed,
            Arc::clone(&self.profile.on_unload),
        ))
    }

    /// Shuts the engine down. Existing sessions keep their provider handle;
    /// no new sessions can be created until the next `initialize`.
    pub fn shutdown(&mut self) {
        self.initialized = false;
        info!(family = %self.profile.family, "engine shut down");
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("family", &self.profile.family)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
