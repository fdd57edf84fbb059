//! # Injected Collaborators
//!
//! The navigation core does not load assets and does not animate; it awaits
//! these two hooks and trusts them to resolve. Both are injected into the
//! `NavigationController` at construction.

use std::sync::Arc;

use async_trait::async_trait;

use super::config::ViewConfig;
use super::controller::ViewParams;
use super::instance::ViewInstance;
use crate::scene::NodeId;

/// Instantiation hook: loads `config.template`, creates the node under
/// `parent`, and builds the controller (typically via
/// `config.new_controller()`).
#[async_trait]
pub trait ViewFactory: Send + Sync {
    /// Returns `None` on asset-load failure; the navigator logs and aborts
    /// the open without mutating its stack. Do not fire lifecycle hooks
    /// here — the navigator fires `on_created` itself.
    async fn create_instance(&self, config: &Arc<ViewConfig>, parent: NodeId)
    -> Option<ViewInstance>;
}

/// Animation hook. Only called when the config carries an effect id; a view
/// with no effect configured appears and vanishes instantly.
#[async_trait]
pub trait ViewAnimator: Send + Sync {
    async fn play_enter(&self, effect: &str, node: NodeId, params: &ViewParams);

    async fn play_exit(&self, effect: &str, node: NodeId);
}
