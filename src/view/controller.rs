//! # View Lifecycle Contract
//!
//! Controllers receive lifecycle callbacks from the navigators. Every hook
//! has a default empty body, so a controller implements only the hooks it
//! cares about. All hooks run synchronously between the navigator's
//! suspension points — never during an animation await.

/// Parameters passed to a view on open. Loose JSON, same as tool arguments
/// elsewhere in this stack: views decide their own schema.
pub type ViewParams = serde_json::Value;

/// Lifecycle hooks for a view controller.
///
/// Call order for a fresh open:
/// `on_created` → `on_will_appear` → (enter animation) → `on_did_appear`.
///
/// Call order for a close:
/// `on_will_disappear` → (exit animation) → `on_did_disappear`, then
/// `on_disposed` only when the instance is actually destroyed (immediately
/// for `DestroyImmediately`, at eviction for `Lru`, at cache flush for
/// `Persistent`).
///
/// `on_focus` fires when a view regains the top of its stack without being
/// re-opened — after the view above it closes, or after a re-entrant
/// navigation truncates the stack back down to it. It never re-fires the
/// appear hooks.
pub trait ViewController: Send {
    /// Instance freshly created by the factory. Fires once per instance,
    /// before the first `on_will_appear`. Cache hits skip it.
    fn on_created(&mut self) {}

    fn on_will_appear(&mut self, _params: &ViewParams) {}

    fn on_did_appear(&mut self) {}

    fn on_will_disappear(&mut self) {}

    fn on_did_disappear(&mut self) {}

    /// The view became the active top of its stack again.
    fn on_focus(&mut self) {}

    /// The instance's node is about to be destroyed. Last call ever.
    fn on_disposed(&mut self) {}
}

/// A controller with no behavior. Useful for purely declarative views.
#[derive(Default)]
pub struct NoopController;

impl ViewController for NoopController {}
