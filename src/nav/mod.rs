//! # Navigation Core
//!
//! The layered view manager. Four layers over one scene root:
//!
//! ```text
//! stage
//! ├── screen_root   (full-viewport, single instance)
//! ├── page_root     (back-navigable stack)
//! ├── popup_root    (stack + modal mask, mask kept one sibling below the top)
//! └── overlay_root  (transient surfaces; no stack logic here)
//! ```
//!
//! - [`cache`]: per-layer instance retention (DestroyImmediately / LRU /
//!   Persistent).
//! - [`stack`]: push/pop/truncate/close-by-identity, shared by Page and Popup.
//! - [`screen`]: single-slot Screen layer.
//! - `NavigationController` (this file): config registry, layer topology,
//!   popup mask coordination, `back()`, and the public navigation surface.
//!
//! Anticipated failures (unknown key, duplicate registration, template load
//! failure, re-entrant back) degrade to logged no-ops — navigation calls do
//! not return errors.

pub mod cache;
pub mod screen;
pub mod stack;

pub use cache::ViewCache;
pub use screen::ScreenSlot;
pub use stack::StackNavigator;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::scene::{NodeId, SceneGraph};
use crate::settings::NavSettings;
use crate::view::{ViewAnimator, ViewConfig, ViewFactory, ViewKind, ViewParams, ViewTarget};

/// Root nodes created by `ensure_root`.
#[derive(Debug, Clone, Copy)]
struct LayerRoots {
    screen: NodeId,
    page: NodeId,
    popup: NodeId,
    overlay: NodeId,
    popup_mask: NodeId,
}

pub struct NavigationController {
    scene: Arc<dyn SceneGraph>,
    settings: NavSettings,
    registry: Mutex<HashMap<String, Arc<ViewConfig>>>,
    roots: Mutex<Option<LayerRoots>>,
    screen: ScreenSlot,
    pages: StackNavigator,
    popups: StackNavigator,
    /// Guards the `back()` entry point only; direct layer calls are the
    /// caller's responsibility to sequence.
    back_in_flight: AtomicBool,
}

impl NavigationController {
    pub fn new(
        scene: Arc<dyn SceneGraph>,
        factory: Arc<dyn ViewFactory>,
        animator: Arc<dyn ViewAnimator>,
        settings: NavSettings,
    ) -> Self {
        let timeout = settings.transition_timeout;
        Self {
            screen: ScreenSlot::new(scene.clone(), factory.clone(), animator.clone(), timeout),
            pages: StackNavigator::new(
                ViewKind::Page,
                settings.page_cache_capacity,
                scene.clone(),
                factory.clone(),
                animator.clone(),
                timeout,
            ),
            popups: StackNavigator::new(
                ViewKind::Popup,
                settings.popup_cache_capacity,
                scene.clone(),
                factory,
                animator,
                timeout,
            ),
            scene,
            settings,
            registry: Mutex::new(HashMap::new()),
            roots: Mutex::new(None),
            back_in_flight: AtomicBool::new(false),
        }
    }

    // ========================================================================
    // Topology
    // ========================================================================

    /// Create the four layer roots and the popup mask under `stage`.
    /// Idempotent: a second call is a no-op.
    pub fn ensure_root(&self, stage: NodeId) {
        let mut roots = self.roots.lock();
        if roots.is_some() {
            return;
        }

        let screen = self.scene.create_node("screen_root");
        let page = self.scene.create_node("page_root");
        let popup = self.scene.create_node("popup_root");
        let overlay = self.scene.create_node("overlay_root");
        // Attach order is paint order: screens lowest, overlays on top.
        self.scene.add_child(stage, screen);
        self.scene.add_child(stage, page);
        self.scene.add_child(stage, popup);
        self.scene.add_child(stage, overlay);

        let popup_mask = self.scene.create_node("popup_mask");
        self.scene.add_child(popup, popup_mask);
        self.scene.set_visible(popup_mask, false);

        *roots = Some(LayerRoots {
            screen,
            page,
            popup,
            overlay,
            popup_mask,
        });
        self.screen.set_root(Some(screen));
        self.pages.set_root(Some(page));
        self.popups.set_root(Some(popup));
        info!("navigation roots created under {stage}");
    }

    /// Tear everything down: stacks cleared without animation, caches
    /// flushed, roots destroyed. `ensure_root` may be called again after.
    pub fn destroy(&self) {
        self.popups.clear();
        self.pages.clear();
        self.screen.clear();
        self.popups.clear_cache();
        self.pages.clear_cache();

        let mut roots = self.roots.lock();
        if let Some(r) = roots.take() {
            for node in [r.screen, r.page, r.popup, r.overlay] {
                self.scene.destroy(node);
            }
        }
        self.screen.set_root(None);
        self.pages.set_root(None);
        self.popups.set_root(None);
        info!("navigation destroyed");
    }

    /// The Overlay sub-root, for embedders to parent toasts/drawers/guides
    /// under. Overlay surfaces are not stack-managed by this core.
    pub fn overlay_root(&self) -> Option<NodeId> {
        self.roots.lock().map(|r| r.overlay)
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Register a view config. A duplicate key is a logged no-op; the first
    /// registration wins.
    pub fn register(&self, config: ViewConfig) {
        let mut registry = self.registry.lock();
        if registry.contains_key(&config.key) {
            warn!("duplicate registration for '{}', ignoring", config.key);
            return;
        }
        debug!("registered {} '{}' ({})", config.kind, config.key, config.controller_name());
        registry.insert(config.key.clone(), Arc::new(config));
    }

    pub fn register_many(&self, configs: Vec<ViewConfig>) {
        for config in configs {
            self.register(config);
        }
    }

    /// Resolve a target to its registered config: by key first, then by
    /// controller type (linear scan). Logs and returns `None` on a miss, at
    /// which point the navigation call silently does nothing.
    pub fn fetch_config(&self, target: &ViewTarget) -> Option<Arc<ViewConfig>> {
        let registry = self.registry.lock();
        let found = match target {
            ViewTarget::Key(key) => registry.get(key).cloned(),
            ViewTarget::Controller(tid) => {
                registry.values().find(|c| c.controller_type() == *tid).cloned()
            }
        };
        if found.is_none() {
            warn!("no view config registered for {target}");
        }
        found
    }

    // ========================================================================
    // Screen layer
    // ========================================================================

    pub async fn open_screen(&self, target: impl Into<ViewTarget>, params: ViewParams) {
        let Some(config) = self.resolve(target.into(), ViewKind::Screen) else {
            return;
        };
        self.screen.open(config, params).await;
    }

    pub async fn close_screen(&self) {
        self.screen.close(false).await;
    }

    /// Forced teardown of the current screen, skipping the exit animation.
    pub async fn clear_screen(&self) {
        self.screen.close(true).await;
    }

    pub fn current_screen_key(&self) -> Option<String> {
        self.screen.current_key()
    }

    // ========================================================================
    // Page layer
    // ========================================================================

    pub async fn open_page(&self, target: impl Into<ViewTarget>, params: ViewParams) {
        let Some(config) = self.resolve(target.into(), ViewKind::Page) else {
            return;
        };
        self.pages.open(config, params).await;
    }

    pub async fn close_page(&self, target: impl Into<ViewTarget>) {
        let Some(config) = self.resolve(target.into(), ViewKind::Page) else {
            return;
        };
        self.pages.close_by(&config).await;
    }

    pub async fn close_top_page(&self) {
        self.pages.close().await;
    }

    pub fn clear_pages(&self) {
        self.pages.clear();
    }

    pub fn page_stack_keys(&self) -> Vec<String> {
        self.pages.stack_keys()
    }

    // ========================================================================
    // Popup layer
    // ========================================================================

    pub async fn open_popup(&self, target: impl Into<ViewTarget>, params: ViewParams) {
        let Some(config) = self.resolve(target.into(), ViewKind::Popup) else {
            return;
        };
        self.popups.open(config, params).await;
        self.update_popup_mask();
    }

    pub async fn close_popup(&self, target: impl Into<ViewTarget>) {
        let Some(config) = self.resolve(target.into(), ViewKind::Popup) else {
            return;
        };
        self.popups.close_by(&config).await;
        self.update_popup_mask();
    }

    pub async fn close_top_popup(&self) {
        self.popups.close().await;
        self.update_popup_mask();
    }

    pub fn clear_popups(&self) {
        self.popups.clear();
        self.update_popup_mask();
    }

    pub fn popup_stack_keys(&self) -> Vec<String> {
        self.popups.stack_keys()
    }

    // ========================================================================
    // Back navigation
    // ========================================================================

    /// Unified back: closes the top popup if any, else the top page, else
    /// nothing. A `back()` while another is in flight is ignored with a
    /// warning — the flag guards this entry point only.
    pub async fn back(&self) {
        if self.back_in_flight.swap(true, Ordering::SeqCst) {
            warn!("back() ignored: a back navigation is already in flight");
            return;
        }

        if !self.popups.is_empty() {
            self.popups.close().await;
            self.update_popup_mask();
        } else if !self.pages.is_empty() {
            self.pages.close().await;
        } else {
            // Screens do not participate in back navigation.
            // TODO: decide whether the screen layer should keep its own
            // back-history; until then this is an explicit no-op.
            debug!("back() with empty page and popup stacks: no-op");
        }

        self.back_in_flight.store(false, Ordering::SeqCst);
    }

    pub fn is_back_in_flight(&self) -> bool {
        self.back_in_flight.load(Ordering::SeqCst)
    }

    // ========================================================================
    // Popup mask
    // ========================================================================

    /// Input hook for the embedder: a click landed on the popup mask.
    /// Closes the top popup iff it is non-modal and opted in via
    /// `close_on_mask_click`; modal popups never close this way.
    pub async fn on_mask_click(&self) {
        let Some((_, config)) = self.popups.top_entry() else {
            return;
        };
        if !config.modal && config.close_on_mask_click {
            debug!("mask click closes '{}'", config.key);
            self.close_top_popup().await;
        }
    }

    /// Re-sync the mask with the popup stack. Runs after every popup
    /// mutation, synchronously, once the transition chain has resolved.
    fn update_popup_mask(&self) {
        let Some(roots) = *self.roots.lock() else {
            return;
        };
        let mask = roots.popup_mask;
        match self.popups.top_entry() {
            None => {
                self.scene.set_visible(mask, false);
            }
            Some((top_node, config)) => {
                self.scene.set_visible(mask, true);
                if config.modal {
                    self.scene.draw_mask_rect(mask, self.settings.mask_color);
                } else {
                    // Invisible click-blocking plane only.
                    self.scene.clear_drawing(mask);
                }
                let top_index = self.scene.sibling_index(top_node);
                self.scene.set_sibling_index(mask, top_index.saturating_sub(1));
            }
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Read-only stack snapshot at debug level.
    pub fn debug_log_stacks(&self, tag: &str) {
        debug!(
            "[{tag}] screen={:?} pages={:?} popups={:?}",
            self.screen.current_key(),
            self.pages.stack_keys(),
            self.popups.stack_keys()
        );
    }

    /// Read-only cache snapshot at debug level.
    pub fn debug_log_caches(&self, tag: &str) {
        debug!(
            "[{tag}] page_cache={:?} popup_cache={:?}",
            self.pages.cache_snapshot(),
            self.popups.cache_snapshot()
        );
    }

    pub fn page_cache_snapshot(&self) -> Vec<String> {
        self.pages.cache_snapshot()
    }

    pub fn popup_cache_snapshot(&self) -> Vec<String> {
        self.popups.cache_snapshot()
    }

    /// Resolve a target and check it belongs to `expected`. A config on the
    /// wrong layer is a logged no-op, same as an unknown key.
    fn resolve(&self, target: ViewTarget, expected: ViewKind) -> Option<Arc<ViewConfig>> {
        let config = self.fetch_config(&target)?;
        if config.kind != expected {
            warn!(
                "'{}' is registered as a {}, not a {expected}; ignoring",
                config.key, config.kind
            );
            return None;
        }
        Some(config)
    }
}
