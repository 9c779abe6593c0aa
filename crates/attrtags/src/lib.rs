//! # Attribute Tags
//!
//! Lets a class or a role mark individual declared attributes with named
//! tags carrying arbitrary values, and later ask, per class or per instance,
//! for the aggregate mapping `tag -> {attribute -> value}`.
//!
//! The interesting part is propagation. Tags declared on a role show up in
//! every role and class that role is applied to, at any depth, and tags
//! declared on a class show up in its subclasses.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Tag Service (service.rs)                                   │
//! │  - track(): the opt-in directive                            │
//! │  - tags_for_class() / tags_for_instance(): the query side   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Tag Cache (cache/)            memoized, locked indices     │
//! │  Chain Accumulator (chain.rs)  contributor lists + walk     │
//! │  Attribute Interceptor         host hook that feeds chains  │
//! │  Tag Registry (registry.rs)    recognized tags per target   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host Object Model (meta/)                                  │
//! │  - classes, roles, attributes, instances                    │
//! │  - MetaHook: the only extension seam                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use attrtags::meta::{Application, AttributeDecl, Meta};
//! use attrtags::service::TagService;
//! use serde_json::json;
//!
//! let mut meta = Meta::new();
//! let tags = TagService::new();
//!
//! let t1 = meta.define_role("T1")?;
//! tags.track(&mut meta, &t1, &json!({"tags": ["tag1", "tag2"]}))?;
//!
//! let c1 = meta.define_class("C1")?;
//! meta.apply_role(&t1, &c1, Application::Propagating)?;
//! meta.has(
//!     &c1,
//!     AttributeDecl::new("c1_1")
//!         .option("tag1", "c1_1.t1")
//!         .option("tag2", "c1_1.t2"),
//! )?;
//! meta.has(&c1, AttributeDecl::new("c1_2").option("tag2", "c1_2.t2"))?;
//!
//! let cache = tags.tags_for_class(&meta, &c1)?;
//! assert_eq!(cache.by_tag("tag1")["c1_1"], "c1_1.t1");
//! assert_eq!(cache.by_tag("tag2").len(), 2);
//! # Ok::<(), attrtags::error::AttrTagsError>(())
//! ```
//!
//! ## Concurrency
//!
//! The service is `Send + Sync`. Registry and contributor lists sit behind
//! `RwLock`s; caches use one once-initialized cell per class.
//!
//! ## Module Overview
//!
//! - [`service`]: the facade
//! - [`cache`]: per-class indices and read-only maps
//! - [`chain`]: contributor lists and the graph walk
//! - [`interceptor`]: the host hook
//! - [`registry`]: recognized tag names per target
//! - [`tags`]: tag records, directive options, name validation
//! - [`meta`]: the host object model
//! - [`config`]: service settings
//! - [`error`]: error types

pub mod cache;
pub mod chain;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod meta;
pub mod registry;
pub mod service;
pub mod tags;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use cache::{LockedMap, TagCache};
pub use error::{AttrTagsError, Result};
pub use service::TagService;
