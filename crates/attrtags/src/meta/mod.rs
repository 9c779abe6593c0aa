//! # Host Object Model
//!
//! Attribute tags are an extension to an object system, not an object system
//! of their own. This module is the thin host they extend: classes with
//! single inheritance, roles that can be applied to classes or other roles,
//! attribute declarations with free-form options, and instances.
//!
//! The host knows nothing about tags. It offers one extension seam,
//! [`MetaHook`], which a target can carry and which fires:
//!
//! - on every attribute declared on that target ([`Meta::has`]),
//! - when that target (a role) is applied somewhere ([`Meta::apply_role`]),
//! - when that target (a class) is extended by a subclass ([`Meta::extends`]).
//!
//! ## Hook Protocol
//!
//! Each host operation runs its hooks in two passes, in install order:
//!
//! ```text
//! check_*   every hook may veto; nothing has changed yet
//! after_*   every hook reacts; the operation can no longer be vetoed
//! commit    the host records the change
//! ```
//!
//! A vetoed operation leaves the host and every hook untouched. An error
//! from an `after_*` hook still aborts the call before the host records
//! anything, but effects earlier hooks already had are not undone, so
//! `after_*` hooks should only fail where their `check_*` could not look.
//!
//! ## Resolution Order
//!
//! Inheritance is single, so the linearized resolution order of a class is
//! just its parent chain ([`Meta::ancestors`]).

mod decl;

pub use decl::{Application, AttributeDecl, AttributeName, Instance, TargetId, TargetKind};

use crate::error::{AttrTagsError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Extension seam of the host model.
///
/// Every method has a no-op default so a hook only implements what it needs.
/// `after_*` methods get `&mut Meta` so they can install further hooks on the
/// targets they touch.
pub trait MetaHook: Send + Sync {
    /// May `target` declare `decl`?
    fn check_attribute(
        &self,
        _meta: &Meta,
        _target: &TargetId,
        _decl: &AttributeDecl,
    ) -> Result<()> {
        Ok(())
    }

    /// May the role carrying this hook be applied to `dest`?
    fn check_applied(
        &self,
        _meta: &Meta,
        _role: &TargetId,
        _dest: &TargetId,
        _application: Application,
    ) -> Result<()> {
        Ok(())
    }

    /// May the class carrying this hook be extended by `child`?
    fn check_extended(&self, _meta: &Meta, _parent: &TargetId, _child: &TargetId) -> Result<()> {
        Ok(())
    }

    /// `target` is declaring `decl`.
    fn after_attribute(
        &self,
        _meta: &mut Meta,
        _target: &TargetId,
        _decl: &AttributeDecl,
    ) -> Result<()> {
        Ok(())
    }

    /// The role carrying this hook is being applied to `dest`.
    fn after_applied(
        &self,
        _meta: &mut Meta,
        _role: &TargetId,
        _dest: &TargetId,
        _application: Application,
    ) -> Result<()> {
        Ok(())
    }

    /// The class carrying this hook is being extended by `child`.
    fn after_extended(
        &self,
        _meta: &mut Meta,
        _parent: &TargetId,
        _child: &TargetId,
    ) -> Result<()> {
        Ok(())
    }
}

struct Target {
    kind: TargetKind,
    parent: Option<TargetId>,
    roles: Vec<(TargetId, Application)>,
    attributes: Vec<AttributeDecl>,
    hooks: Vec<Arc<dyn MetaHook>>,
}

impl Target {
    fn new(kind: TargetKind) -> Self {
        Self {
            kind,
            parent: None,
            roles: Vec::new(),
            attributes: Vec::new(),
            hooks: Vec::new(),
        }
    }
}

/// All classes and roles of one program.
#[derive(Default)]
pub struct Meta {
    targets: BTreeMap<TargetId, Target>,
}

impl fmt::Debug for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meta")
            .field("targets", &self.targets.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_class(&mut self, name: impl Into<TargetId>) -> Result<TargetId> {
        self.define(name.into(), TargetKind::Class)
    }

    pub fn define_role(&mut self, name: impl Into<TargetId>) -> Result<TargetId> {
        self.define(name.into(), TargetKind::Role)
    }

    fn define(&mut self, id: TargetId, kind: TargetKind) -> Result<TargetId> {
        if self.targets.contains_key(&id) {
            return Err(AttrTagsError::DuplicateTarget(id));
        }
        self.targets.insert(id.clone(), Target::new(kind));
        Ok(id)
    }

    fn target(&self, id: &TargetId) -> Result<&Target> {
        self.targets
            .get(id)
            .ok_or_else(|| AttrTagsError::UnknownTarget(id.clone()))
    }

    fn target_mut(&mut self, id: &TargetId) -> Result<&mut Target> {
        self.targets
            .get_mut(id)
            .ok_or_else(|| AttrTagsError::UnknownTarget(id.clone()))
    }

    pub fn contains(&self, id: &TargetId) -> bool {
        self.targets.contains_key(id)
    }

    pub fn kind_of(&self, id: &TargetId) -> Result<TargetKind> {
        Ok(self.target(id)?.kind)
    }

    pub fn parent_of(&self, id: &TargetId) -> Option<&TargetId> {
        self.targets.get(id).and_then(|t| t.parent.as_ref())
    }

    /// Parent chain of `id`, nearest first. Does not include `id`.
    pub fn ancestors(&self, id: &TargetId) -> Vec<TargetId> {
        let mut chain = Vec::new();
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            chain.push(parent.clone());
            current = self.parent_of(parent);
        }
        chain
    }

    /// Roles applied directly to `id`, in application order.
    pub fn roles_of(&self, id: &TargetId) -> &[(TargetId, Application)] {
        self.targets
            .get(id)
            .map(|t| t.roles.as_slice())
            .unwrap_or_default()
    }

    /// Attributes declared on `id` or copied into it by role application.
    pub fn attributes_of(&self, id: &TargetId) -> &[AttributeDecl] {
        self.targets
            .get(id)
            .map(|t| t.attributes.as_slice())
            .unwrap_or_default()
    }

    pub fn install_hook(&mut self, id: &TargetId, hook: Arc<dyn MetaHook>) -> Result<()> {
        self.target_mut(id)?.hooks.push(hook);
        Ok(())
    }

    fn hooks_of(&self, id: &TargetId) -> Vec<Arc<dyn MetaHook>> {
        self.targets
            .get(id)
            .map(|t| t.hooks.clone())
            .unwrap_or_default()
    }

    /// Declare an attribute on a class or role.
    ///
    /// The declaration is recorded only once every hook on the target has
    /// accepted it.
    pub fn has(&mut self, id: &TargetId, decl: AttributeDecl) -> Result<()> {
        self.target(id)?;
        let hooks = self.hooks_of(id);
        for hook in &hooks {
            hook.check_attribute(self, id, &decl)?;
        }
        for hook in &hooks {
            hook.after_attribute(self, id, &decl)?;
        }
        self.target_mut(id)?.attributes.push(decl);
        Ok(())
    }

    /// Make `child` a subclass of `parent`.
    pub fn extends(&mut self, child: &TargetId, parent: &TargetId) -> Result<()> {
        for id in [child, parent] {
            if self.kind_of(id)? != TargetKind::Class {
                return Err(AttrTagsError::NotAClass(id.clone()));
            }
        }
        if let Some(existing) = self.parent_of(child) {
            return Err(AttrTagsError::ParentAlreadySet {
                child: child.clone(),
                parent: existing.clone(),
            });
        }
        if child == parent || self.ancestors(parent).contains(child) {
            return Err(AttrTagsError::InheritanceCycle {
                child: child.clone(),
                parent: parent.clone(),
            });
        }

        let hooks = self.hooks_of(parent);
        for hook in &hooks {
            hook.check_extended(self, parent, child)?;
        }
        for hook in &hooks {
            hook.after_extended(self, parent, child)?;
        }
        self.target_mut(child)?.parent = Some(parent.clone());
        Ok(())
    }

    /// Merge `role` into `dest`. Applying the same role twice is a no-op.
    pub fn apply_role(
        &mut self,
        role: &TargetId,
        dest: &TargetId,
        application: Application,
    ) -> Result<()> {
        if self.kind_of(role)? != TargetKind::Role {
            return Err(AttrTagsError::NotARole(role.clone()));
        }
        self.target(dest)?;
        if role == dest || self.composes(role, dest) {
            return Err(AttrTagsError::CompositionCycle {
                role: role.clone(),
                dest: dest.clone(),
            });
        }
        if self.roles_of(dest).iter().any(|(r, _)| r == role) {
            return Ok(());
        }

        let hooks = self.hooks_of(role);
        for hook in &hooks {
            hook.check_applied(self, role, dest, application)?;
        }
        for hook in &hooks {
            hook.after_applied(self, role, dest, application)?;
        }

        let copied = self.attributes_of(role).to_vec();
        let target = self.target_mut(dest)?;
        target.roles.push((role.clone(), application));
        target.attributes.extend(copied);
        Ok(())
    }

    /// Whether `outer` has `inner` applied to it, directly or through other roles.
    pub fn composes(&self, outer: &TargetId, inner: &TargetId) -> bool {
        let mut pending: Vec<&TargetId> = vec![outer];
        let mut visited = Vec::new();
        while let Some(current) = pending.pop() {
            if visited.contains(&current) {
                continue;
            }
            visited.push(current);
            for (role, _) in self.roles_of(current) {
                if role == inner {
                    return true;
                }
                pending.push(role);
            }
        }
        false
    }

    pub fn new_instance(&self, class: &TargetId) -> Result<Instance> {
        match self.kind_of(class)? {
            TargetKind::Class => Ok(Instance::new(class.clone())),
            TargetKind::Role => Err(AttrTagsError::NotAClass(class.clone())),
        }
    }
}
