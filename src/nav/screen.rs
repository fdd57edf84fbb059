//! # Screen Slot
//!
//! Single-instance equivalent of the stack navigator for the Screen layer.
//! Screens are replaced wholesale and never cached: the outgoing instance is
//! destroyed unconditionally, whatever its config's cache policy says.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};
use parking_lot::Mutex;

use crate::scene::{NodeId, SceneGraph};
use crate::view::{ViewAnimator, ViewConfig, ViewFactory, ViewInstance, ViewParams};

struct SlotState {
    current: Option<ViewInstance>,
    root: Option<NodeId>,
}

pub struct ScreenSlot {
    state: Mutex<SlotState>,
    scene: Arc<dyn SceneGraph>,
    factory: Arc<dyn ViewFactory>,
    animator: Arc<dyn ViewAnimator>,
    transition_timeout: Option<Duration>,
}

impl ScreenSlot {
    pub fn new(
        scene: Arc<dyn SceneGraph>,
        factory: Arc<dyn ViewFactory>,
        animator: Arc<dyn ViewAnimator>,
        transition_timeout: Option<Duration>,
    ) -> Self {
        Self {
            state: Mutex::new(SlotState {
                current: None,
                root: None,
            }),
            scene,
            factory,
            animator,
            transition_timeout,
        }
    }

    pub fn set_root(&self, node: Option<NodeId>) {
        self.state.lock().root = node;
    }

    /// Replace the current screen with `config`.
    ///
    /// The outgoing screen runs its full disappear sequence and is then
    /// destroyed. If instantiation of the new screen fails, the slot is left
    /// empty (the old screen is already gone at that point).
    pub async fn open(&self, config: Arc<ViewConfig>, params: ViewParams) {
        let outgoing = self.state.lock().current.take();
        if let Some(outgoing) = outgoing {
            self.dismiss(outgoing, false).await;
        }

        let Some(root) = self.state.lock().root else {
            warn!("screen: open '{}' before ensure_root, ignoring", config.key);
            return;
        };

        let created = self.factory.create_instance(&config, root);
        let created = match self.transition_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, created).await {
                Ok(result) => result,
                Err(_) => {
                    error!("screen: instantiation of '{}' timed out after {timeout:?}", config.key);
                    return;
                }
            },
            None => created.await,
        };
        let Some(mut instance) = created else {
            error!("screen: template load failed for '{}'", config.key);
            return;
        };

        instance.controller.on_created();
        instance.controller.on_will_appear(&params);
        if let Some(effect) = &config.enter_effect {
            let fut = self.animator.play_enter(effect, instance.node, &params);
            match self.transition_timeout {
                Some(timeout) => {
                    if tokio::time::timeout(timeout, fut).await.is_err() {
                        error!("screen: enter effect '{effect}' timed out after {timeout:?}");
                    }
                }
                None => fut.await,
            }
        }
        instance.controller.on_did_appear();
        instance.active = true;

        debug!("screen: opened '{}' ({})", config.key, instance.id);
        self.state.lock().current = Some(instance);
    }

    /// Close the current screen. With `force`, the exit animation is
    /// skipped — used during teardown.
    pub async fn close(&self, force: bool) {
        let Some(instance) = self.state.lock().current.take() else {
            debug!("screen: close with no current screen, ignoring");
            return;
        };
        self.dismiss(instance, force).await;
    }

    /// Synchronous teardown: disappear hooks fire, no animation.
    pub fn clear(&self) {
        let Some(mut instance) = self.state.lock().current.take() else {
            return;
        };
        instance.controller.on_will_disappear();
        instance.controller.on_did_disappear();
        instance.controller.on_disposed();
        self.scene.destroy(instance.node);
    }

    pub fn current_key(&self) -> Option<String> {
        self.state.lock().current.as_ref().map(|v| v.key().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().current.is_none()
    }

    /// Full disappear sequence, then unconditional destruction. No caching
    /// on this layer.
    async fn dismiss(&self, mut instance: ViewInstance, force: bool) {
        instance.controller.on_will_disappear();
        if !force && let Some(effect) = instance.config.exit_effect.clone() {
            let fut = self.animator.play_exit(&effect, instance.node);
            match self.transition_timeout {
                Some(timeout) => {
                    if tokio::time::timeout(timeout, fut).await.is_err() {
                        error!("screen: exit effect '{effect}' timed out after {timeout:?}");
                    }
                }
                None => fut.await,
            }
        }
        instance.controller.on_did_disappear();
        instance.controller.on_disposed();
        debug!("screen: destroyed '{}'", instance.key());
        self.scene.destroy(instance.node);
    }
}
