//! # strata
//!
//! View navigation and lifecycle manager for layered UI surfaces: a single
//! full-viewport Screen, a back-navigable Page stack, a Popup stack with a
//! coordinated modal mask, and an Overlay root for transient surfaces.
//!
//! The crate owns the layering topology, the open/close/back algorithm
//! (including re-entrant navigation that truncates back to an already-open
//! view), per-layer instance caching with three eviction policies, and the
//! mask bookkeeping that stays in sync with asynchronous enter/exit
//! animations. Rendering, asset loading and animation playback live with
//! the embedder behind the [`scene::SceneGraph`], [`view::ViewFactory`] and
//! [`view::ViewAnimator`] seams.

pub mod logging;
pub mod nav;
pub mod scene;
pub mod settings;
pub mod view;

#[cfg(test)]
pub mod test_support;

pub use nav::NavigationController;
pub use scene::{NodeId, SceneGraph};
pub use settings::NavSettings;
pub use view::{
    CachePolicy, ViewAnimator, ViewConfig, ViewController, ViewFactory, ViewInstance, ViewKind,
    ViewParams, ViewTarget,
};
