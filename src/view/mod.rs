//! # View Data Model
//!
//! Everything the navigation core knows about a view:
//!
//! - [`config`]: the immutable registration record (`ViewConfig`) — layer
//!   kind, template reference, cache policy, animation ids, modality.
//! - [`controller`]: the lifecycle contract views implement. All hooks have
//!   default empty bodies; controllers override only what they need.
//! - [`instance`]: a live view — node handle + controller + config. Owned by
//!   exactly one of {stack, cache, in-transit local} at any time.
//! - [`hooks`]: the two injected collaborators — instantiation
//!   (`ViewFactory`) and enter/exit effects (`ViewAnimator`).

pub mod config;
pub mod controller;
pub mod hooks;
pub mod instance;

pub use config::{CachePolicy, OverlayKind, ViewConfig, ViewKind, ViewTarget};
pub use controller::{ViewController, ViewParams};
pub use hooks::{ViewAnimator, ViewFactory};
pub use instance::ViewInstance;
