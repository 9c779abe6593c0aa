use crate::meta::{Application, AttributeDecl, Meta, TargetId};
use crate::service::TagService;
use serde_json::Value;

/// Builder for class/role graphs in tests. Panics on any definition error.
pub struct MetaFixture {
    pub meta: Meta,
    pub service: TagService,
}

impl Default for MetaFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaFixture {
    pub fn new() -> Self {
        Self {
            meta: Meta::new(),
            service: TagService::new(),
        }
    }

    pub fn role(mut self, name: &str) -> Self {
        self.meta.define_role(name).expect("define role");
        self
    }

    pub fn class(mut self, name: &str) -> Self {
        self.meta.define_class(name).expect("define class");
        self
    }

    pub fn track(mut self, target: &str, tags: &[&str]) -> Self {
        self.service
            .track_tags(&mut self.meta, &TargetId::from(target), tags.iter().copied())
            .expect("track tags");
        self
    }

    pub fn with(mut self, dest: &str, role: &str) -> Self {
        self.meta
            .apply_role(
                &TargetId::from(role),
                &TargetId::from(dest),
                Application::Propagating,
            )
            .expect("apply role");
        self
    }

    pub fn copy(mut self, dest: &str, role: &str) -> Self {
        self.meta
            .apply_role(
                &TargetId::from(role),
                &TargetId::from(dest),
                Application::CopyOnly,
            )
            .expect("apply role");
        self
    }

    pub fn extends(mut self, child: &str, parent: &str) -> Self {
        self.meta
            .extends(&TargetId::from(child), &TargetId::from(parent))
            .expect("extends");
        self
    }

    /// Declare `attribute` on `target` with `(option, value)` pairs.
    pub fn has(mut self, target: &str, attribute: &str, options: &[(&str, Value)]) -> Self {
        let decl = options
            .iter()
            .fold(AttributeDecl::new(attribute), |decl, (key, value)| {
                decl.option(*key, value.clone())
            });
        self.meta
            .has(&TargetId::from(target), decl)
            .expect("declare attribute");
        self
    }
}
