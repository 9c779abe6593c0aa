//! # Attribute Interceptor
//!
//! The [`MetaHook`]s the tag service installs on targets.
//!
//! [`AttributeInterceptor`] is carried by every tag tracking target, at most
//! once per target:
//!
//! | Host event | Effect |
//! |------------|--------|
//! | attribute declared | append `Declared` with the records for recognized tags |
//! | role applied, propagating | register the destination, append `Composed(role)` |
//! | role applied, copy-only | append a `Baked` snapshot of the role's chain |
//! | class extended | register the subclass with the parent's tags |
//!
//! [`ChainCarrier`] is carried by a role that holds records without tracking
//! tags itself, which only happens after a copy-only application into it.
//! It forwards those records on every later application of the role, in the
//! same two forms, but never registers the destination.

use crate::chain::Contributor;
use crate::error::Result;
use crate::meta::{Application, AttributeDecl, Meta, MetaHook, TargetId};
use crate::service::TagService;
use crate::tags::records_for;
use tracing::trace;

pub struct AttributeInterceptor {
    service: TagService,
}

impl AttributeInterceptor {
    pub(crate) fn new(service: TagService) -> Self {
        Self { service }
    }
}

impl MetaHook for AttributeInterceptor {
    fn after_attribute(
        &self,
        _meta: &mut Meta,
        target: &TargetId,
        decl: &AttributeDecl,
    ) -> Result<()> {
        let recognized = self.service.recognized_tags(target);
        let records = records_for(&recognized, decl);
        if records.is_empty() {
            return Ok(());
        }
        trace!(
            %target,
            attributes = ?decl.names(),
            count = records.len(),
            "intercepted tagged attribute"
        );
        self.service
            .chains()
            .append(target, Contributor::Declared(records));
        Ok(())
    }

    fn after_applied(
        &self,
        meta: &mut Meta,
        role: &TargetId,
        dest: &TargetId,
        application: Application,
    ) -> Result<()> {
        match application {
            Application::Propagating => {
                let tags = self.service.recognized_tags(role);
                self.service.activate(meta, dest, &tags)?;
                self.service
                    .chains()
                    .append(dest, Contributor::Composed(role.clone()));
                Ok(())
            }
            Application::CopyOnly => bake(&self.service, meta, role, dest),
        }
    }

    fn after_extended(&self, meta: &mut Meta, parent: &TargetId, child: &TargetId) -> Result<()> {
        let tags = self.service.recognized_tags(parent);
        self.service.activate(meta, child, &tags)
    }
}

pub struct ChainCarrier {
    service: TagService,
}

impl ChainCarrier {
    pub(crate) fn new(service: TagService) -> Self {
        Self { service }
    }
}

impl MetaHook for ChainCarrier {
    fn after_applied(
        &self,
        meta: &mut Meta,
        role: &TargetId,
        dest: &TargetId,
        application: Application,
    ) -> Result<()> {
        // Once the role tracks tags its interceptor forwards the chain.
        if self.service.is_tracking(role) {
            return Ok(());
        }
        match application {
            Application::Propagating => {
                trace!(%role, %dest, "carrying chain without tag tracking");
                self.service
                    .chains()
                    .append(dest, Contributor::Composed(role.clone()));
                self.service.carry(meta, dest)
            }
            Application::CopyOnly => bake(&self.service, meta, role, dest),
        }
    }
}

/// Snapshot `role`'s chain into `dest` and make sure `dest` passes it on.
fn bake(service: &TagService, meta: &mut Meta, role: &TargetId, dest: &TargetId) -> Result<()> {
    let levels = service.chains().levels(meta, role);
    if levels.is_empty() {
        return Ok(());
    }
    service.chains().append(
        dest,
        Contributor::Baked {
            origin: role.clone(),
            levels,
        },
    );
    service.carry(meta, dest)
}
