//! Scoped injection of scripting define symbols.
//!
//! Extra symbols are merged into the host's persistent define string for the
//! duration of a build and the original string is written back afterwards.
//! [`DefineScope`] owns the captured [`DefineSnapshot`]; the snapshot is
//! restored exactly once, either by [`DefineScope::restore`] or when the
//! scope is dropped, so every exit path (including errors and panics)
//! leaves the host as it was found.

use std::ops::{Deref, DerefMut};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DefineSet;
use crate::host::{Host, HostError};
use crate::target::TargetGroup;

#[derive(Debug, Error)]
pub enum DefineError {
  #[error(transparent)]
  Host(#[from] HostError),

  #[error("defines already injected for {expected}, cannot inject for {actual} in the same build")]
  GroupMismatch { expected: TargetGroup, actual: TargetGroup },
}

/// The define string of a target group as it was before injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineSnapshot {
  pub group: TargetGroup,
  pub previous: String,
}

/// Write a snapshot back to the host, consuming it.
pub fn restore<H: Host + ?Sized>(host: &mut H, snapshot: DefineSnapshot) -> Result<(), DefineError> {
  info!(group = %snapshot.group, defines = %snapshot.previous, "restoring scripting defines");
  host.set_scripting_defines(snapshot.group, &snapshot.previous)?;
  Ok(())
}

/// Holds the host while defines are injected and restores them on release.
///
/// Dereferences to the host so the build can keep using it inside the scope.
pub struct DefineScope<'h, H: Host + ?Sized> {
  host: &'h mut H,
  snapshot: Option<DefineSnapshot>,
}

impl<'h, H: Host + ?Sized> DefineScope<'h, H> {
  pub fn new(host: &'h mut H) -> Self {
    Self { host, snapshot: None }
  }

  /// Merge `additional` into the group's defines.
  ///
  /// The first injection in a scope captures the snapshot; later injections
  /// add symbols but never replace it. The snapshot is captured before the
  /// write, so a failed write is still restored. Returns `false` when there
  /// was nothing to inject.
  pub fn inject(&mut self, group: TargetGroup, additional: &DefineSet) -> Result<bool, DefineError> {
    if additional.is_empty() {
      debug!(group = %group, "no additional defines to inject");
      return Ok(false);
    }

    if let Some(snapshot) = &self.snapshot
      && snapshot.group != group
    {
      return Err(DefineError::GroupMismatch {
        expected: snapshot.group,
        actual: group,
      });
    }

    let current = self.host.scripting_defines(group)?;
    if self.snapshot.is_none() {
      self.snapshot = Some(DefineSnapshot {
        group,
        previous: current.clone(),
      });
    }

    let merged = DefineSet::parse(&current).union(additional).to_host_string();
    info!(group = %group, defines = %merged, "injecting scripting defines");
    self.host.set_scripting_defines(group, &merged)?;
    Ok(true)
  }

  /// Restore the captured snapshot now.
  ///
  /// Returns `false` if there was nothing to restore; calling it again after
  /// a restore is a no-op.
  pub fn restore(&mut self) -> Result<bool, DefineError> {
    match self.snapshot.take() {
      Some(snapshot) => restore(&mut *self.host, snapshot).map(|()| true),
      None => Ok(false),
    }
  }

  pub fn snapshot(&self) -> Option<&DefineSnapshot> {
    self.snapshot.as_ref()
  }
}

impl<H: Host + ?Sized> Deref for DefineScope<'_, H> {
  type Target = H;

  fn deref(&self) -> &H {
    self.host
  }
}

impl<H: Host + ?Sized> DerefMut for DefineScope<'_, H> {
  fn deref_mut(&mut self) -> &mut H {
    self.host
  }
}

impl<H: Host + ?Sized> Drop for DefineScope<'_, H> {
  fn drop(&mut self) {
    if let Some(snapshot) = self.snapshot.take()
      && let Err(e) = restore(&mut *self.host, snapshot)
    {
      warn!(error = %e, "failed to restore scripting defines");
    }
  }
}
