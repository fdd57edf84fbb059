//! # View Configuration
//!
//! A `ViewConfig` is the immutable registration record for a view: which
//! layer it lives on, which template the factory should load, how its
//! instances are cached, and which animation ids play on enter/exit.
//! Configs are registered once with the `NavigationController` and handed
//! around as `Arc<ViewConfig>` afterwards.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use super::controller::ViewController;

/// Which layer a view belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Full-viewport, single-instance. Replaced wholesale, never cached.
    Screen,
    /// Stacked, back-navigable.
    Page,
    /// Stacked above pages, optionally modal, coordinated with the mask.
    Popup,
    /// Transient surfaces above popups. No stack logic in this core.
    Overlay,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewKind::Screen => "screen",
            ViewKind::Page => "page",
            ViewKind::Popup => "popup",
            ViewKind::Overlay => "overlay",
        };
        f.write_str(name)
    }
}

/// Flavor of an Overlay view. Informational only; overlays are parented by
/// the embedder under the overlay root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Toast,
    Drawer,
    Marquee,
    Guide,
}

/// What happens to a view instance when it leaves its stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Never retained: disposed and destroyed on close.
    #[default]
    DestroyImmediately,
    /// Retained up to the layer's capacity; least-recently-used evicted.
    Lru,
    /// Retained until an explicit cache flush. Exempt from LRU capacity.
    Persistent,
}

type ControllerBuilder = Arc<dyn Fn() -> Box<dyn ViewController> + Send + Sync>;

/// Immutable registration record for a view.
pub struct ViewConfig {
    /// Unique identity across the registry.
    pub key: String,
    pub kind: ViewKind,
    pub overlay_kind: Option<OverlayKind>,
    /// Opaque template reference, consumed by the `ViewFactory` (typically
    /// an asset path or prefab id).
    pub template: String,
    pub cache_policy: CachePolicy,
    /// Animation id played on enter. `None` = appear instantly.
    pub enter_effect: Option<String>,
    /// Animation id played on exit. `None` = vanish instantly.
    pub exit_effect: Option<String>,
    /// Modal popups dim and block everything beneath them.
    pub modal: bool,
    /// Non-modal popups with this set close when the mask is clicked.
    pub close_on_mask_click: bool,
    controller_type: TypeId,
    controller_name: &'static str,
    build_controller: ControllerBuilder,
}

impl ViewConfig {
    /// A config whose controller is `C::default()`.
    pub fn new<C>(key: impl Into<String>, kind: ViewKind, template: impl Into<String>) -> Self
    where
        C: ViewController + Default + 'static,
    {
        Self::with_builder::<C, _>(key, kind, template, || Box::new(C::default()))
    }

    /// A config with an explicit controller builder, for controllers that
    /// need captured state (services, channels) at construction time.
    pub fn with_builder<C, F>(
        key: impl Into<String>,
        kind: ViewKind,
        template: impl Into<String>,
        builder: F,
    ) -> Self
    where
        C: ViewController + 'static,
        F: Fn() -> Box<dyn ViewController> + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            kind,
            overlay_kind: None,
            template: template.into(),
            cache_policy: CachePolicy::default(),
            enter_effect: None,
            exit_effect: None,
            modal: false,
            close_on_mask_click: false,
            controller_type: TypeId::of::<C>(),
            controller_name: std::any::type_name::<C>(),
            build_controller: Arc::new(builder),
        }
    }

    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    pub fn enter_effect(mut self, effect: impl Into<String>) -> Self {
        self.enter_effect = Some(effect.into());
        self
    }

    pub fn exit_effect(mut self, effect: impl Into<String>) -> Self {
        self.exit_effect = Some(effect.into());
        self
    }

    pub fn modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    pub fn close_on_mask_click(mut self, close: bool) -> Self {
        self.close_on_mask_click = close;
        self
    }

    pub fn overlay_kind(mut self, overlay: OverlayKind) -> Self {
        self.overlay_kind = Some(overlay);
        self
    }

    /// Build a fresh controller for a new instance of this view.
    pub fn new_controller(&self) -> Box<dyn ViewController> {
        (self.build_controller)()
    }

    pub fn controller_type(&self) -> TypeId {
        self.controller_type
    }

    pub fn controller_name(&self) -> &'static str {
        self.controller_name
    }
}

impl fmt::Debug for ViewConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewConfig")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("template", &self.template)
            .field("cache_policy", &self.cache_policy)
            .field("modal", &self.modal)
            .field("controller", &self.controller_name)
            .finish()
    }
}

/// How a navigation call names its target view.
///
/// The `key` is the primary identity. Controller-type lookup is a
/// convenience fallback resolved by linear scan over the registry — fine
/// for registry sizes in the tens, not indexed.
#[derive(Debug, Clone)]
pub enum ViewTarget {
    Key(String),
    Controller(TypeId),
}

impl ViewTarget {
    /// Target the view registered with controller type `C`.
    pub fn of<C: ViewController + 'static>() -> Self {
        ViewTarget::Controller(TypeId::of::<C>())
    }
}

impl From<&str> for ViewTarget {
    fn from(key: &str) -> Self {
        ViewTarget::Key(key.to_string())
    }
}

impl From<String> for ViewTarget {
    fn from(key: String) -> Self {
        ViewTarget::Key(key)
    }
}

impl From<&Arc<ViewConfig>> for ViewTarget {
    fn from(config: &Arc<ViewConfig>) -> Self {
        ViewTarget::Key(config.key.clone())
    }
}

impl fmt::Display for ViewTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewTarget::Key(key) => write!(f, "key '{key}'"),
            ViewTarget::Controller(tid) => write!(f, "controller type {tid:?}"),
        }
    }
}
