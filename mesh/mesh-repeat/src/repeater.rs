//! Caller-driven rebuild of a repeated mesh.
//!
//! [`Repeater`] owns the settings of one repeated object and the last mesh
//! built from them. The host tool calls [`Repeater::rebuild`] after it
//! notices a change; nothing here reacts to ambient state on its own.

use mesh_types::{Aabb, BufferMesh};
use tracing::{debug, info, warn};

use crate::collider::{BoxVolume, derive_box_volume};
use crate::error::RepeatResult;
use crate::params::RepeatParams;
use crate::replicate::replicate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings of one repeated object.
///
/// # Examples
///
/// ```
/// use mesh_repeat::{RepeatParams, RepeatSettings};
///
/// let settings = RepeatSettings::new(RepeatParams::along_x(8, 2.0))
///     .with_box_collider(true);
/// assert!(settings.create_box_collider);
/// assert!(!settings.lock);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepeatSettings {
    /// Grid counts and spacing.
    pub params: RepeatParams,

    /// Derive a collider box around the combined mesh.
    pub create_box_collider: bool,

    /// Freeze the current output; rebuilds become no-ops.
    pub lock: bool,
}

impl RepeatSettings {
    /// Settings with the given parameters, no collider, unlocked.
    #[must_use]
    pub fn new(params: RepeatParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Enables or disables the collider box.
    #[must_use]
    pub const fn with_box_collider(mut self, enable: bool) -> Self {
        self.create_box_collider = enable;
        self
    }

    /// Locks or unlocks rebuilding.
    #[must_use]
    pub const fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }
}

/// The installed result of a rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatOutput {
    /// Combined mesh, named after the owner.
    pub mesh: BufferMesh,

    /// Bounds of the combined mesh.
    pub bounds: Aabb,

    /// Collider box, when requested.
    pub box_volume: Option<BoxVolume>,
}

/// What [`Repeater::rebuild`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// A new mesh replaced the previous output.
    Rebuilt,
    /// Nothing changed since the last rebuild; output kept.
    Unchanged,
    /// Settings are locked; output kept.
    Locked,
}

/// Rebuild driver for one repeated object.
///
/// # Examples
///
/// ```
/// use mesh_repeat::{RebuildOutcome, RepeatParams, RepeatSettings, Repeater};
/// use mesh_types::unit_cube;
///
/// let mut repeater = Repeater::new("Fence");
/// repeater.set_settings(RepeatSettings::new(RepeatParams::along_x(3, 1.0)));
///
/// let cube = unit_cube();
/// assert_eq!(repeater.rebuild(&cube).unwrap(), RebuildOutcome::Rebuilt);
/// assert_eq!(repeater.rebuild(&cube).unwrap(), RebuildOutcome::Unchanged);
///
/// let output = repeater.output().unwrap();
/// assert_eq!(output.mesh.name.as_deref(), Some("Fence_mesh"));
/// ```
#[derive(Debug, Clone)]
pub struct Repeater {
    mesh_name: String,
    settings: RepeatSettings,
    dirty: bool,
    output: Option<RepeatOutput>,
}

impl Repeater {
    /// Creates a driver whose meshes are named `"{owner}_mesh"`.
    #[must_use]
    pub fn new(owner: &str) -> Self {
        Self {
            mesh_name: format!("{owner}_mesh"),
            settings: RepeatSettings::default(),
            dirty: true,
            output: None,
        }
    }

    /// Name given to combined meshes.
    #[must_use]
    pub fn mesh_name(&self) -> &str {
        &self.mesh_name
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &RepeatSettings {
        &self.settings
    }

    /// Replaces the settings, marking the driver dirty if they differ.
    ///
    /// Toggling only `lock` does not force a rebuild on unlock.
    pub fn set_settings(&mut self, settings: RepeatSettings) {
        let unlocked_before = RepeatSettings {
            lock: false,
            ..self.settings.clone()
        };
        let unlocked_after = RepeatSettings {
            lock: false,
            ..settings.clone()
        };
        if unlocked_before != unlocked_after {
            self.dirty = true;
        }
        self.settings = settings;
    }

    /// Replaces only the replication parameters.
    pub fn set_params(&mut self, params: RepeatParams) {
        let settings = RepeatSettings {
            params,
            ..self.settings.clone()
        };
        self.set_settings(settings);
    }

    /// Records that the source mesh changed.
    pub fn mark_source_changed(&mut self) {
        self.dirty = true;
    }

    /// Whether the next unlocked rebuild will run the replicator.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuilds the combined mesh from `source` if anything changed.
    ///
    /// A successful rebuild replaces the previous output entirely. On error
    /// the previous output stays installed and the driver stays dirty, so a
    /// later call retries.
    ///
    /// # Errors
    ///
    /// Propagates [`RepeatError`](crate::RepeatError) from
    /// [`replicate`](crate::replicate).
    pub fn rebuild(&mut self, source: &BufferMesh) -> RepeatResult<RebuildOutcome> {
        if self.settings.lock {
            debug!(mesh = %self.mesh_name, "Rebuild skipped: locked");
            return Ok(RebuildOutcome::Locked);
        }
        if !self.dirty && self.output.is_some() {
            debug!(mesh = %self.mesh_name, "Rebuild skipped: unchanged");
            return Ok(RebuildOutcome::Unchanged);
        }

        let replication = replicate(source, &self.settings.params).inspect_err(|e| {
            warn!(mesh = %self.mesh_name, "Rebuild failed: {e}");
        })?;

        let box_volume = self
            .settings
            .create_box_collider
            .then(|| derive_box_volume(&replication.bounds));
        let bounds = replication.bounds;
        let mut mesh = replication.into_mesh();
        mesh.name = Some(self.mesh_name.clone());

        info!(
            mesh = %self.mesh_name,
            collider = box_volume.is_some(),
            "Rebuilt repeated mesh"
        );

        self.output = Some(RepeatOutput {
            mesh,
            bounds,
            box_volume,
        });
        self.dirty = false;
        Ok(RebuildOutcome::Rebuilt)
    }

    /// The most recently built output.
    #[must_use]
    pub const fn output(&self) -> Option<&RepeatOutput> {
        self.output.as_ref()
    }

    /// Removes and returns the output, leaving the driver dirty.
    pub fn take_output(&mut self) -> Option<RepeatOutput> {
        self.dirty = true;
        self.output.take()
    }
}
