//! Nabu UI: markup-driven widget runtime on top of `nabu-engine`.
//!
//! A `.uiml` document is parsed by `nabu-markup`, compiled into widgets on a
//! [`UiHost`](nabu_engine::host::UiHost), and then driven at runtime by name:
//! commands animate or mutate widgets, declared `onXxx` handlers are
//! forwarded to the application, and resource slots push shared text or
//! images into every widget bound to them.
//!
//! | Module        | Role                                                    |
//! |---------------|---------------------------------------------------------|
//! | [`attrs`]     | typed, never-failing attribute coercion + parse caches  |
//! | [`compiler`]  | markup tree → widgets, one builder per element kind     |
//! | [`registry`]  | name → widget lookup, global and per kind               |
//! | [`commands`]  | built-in command table, event forwarding                |
//! | [`anim`]      | tick-driven tweens and timed steps                      |
//! | [`resources`] | indexed slots, async image loading                      |
//! | [`session`]   | owns all of the above plus the host                     |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use nabu_ui::prelude::*;
//!
//! let mut ui = Session::new(SceneTree::new(), SessionConfig::default());
//! ui.load_str(r#"
//!     <UIML>
//!       <Panel name="root" size="400,300">
//!         <Button name="go" text="Go" onClick="startGame" />
//!       </Panel>
//!     </UIML>"#)?;
//!
//! ui.execute("go", "bounce", &["0.4"])?;
//! // In your frame callback:
//! ui.tick(dt);
//! ```

pub mod anim;
pub mod attrs;
pub mod commands;
pub mod compiler;
pub mod config;
pub mod error;
pub mod registry;
pub mod resources;
pub mod session;
pub mod widget;

pub use session::Session;

/// Everything an application embedding the runtime usually needs.
pub mod prelude {
    pub use crate::anim::{Animator, Property, Step, TweenValue};
    pub use crate::attrs::{AttrEnum, AttributeResolver, FromAttr};
    pub use crate::commands::{CommandBus, EventInvocation, EventQueue};
    pub use crate::compiler::CompileStats;
    pub use crate::config::{SessionConfig, Theme};
    pub use crate::error::{BuildError, CommandError, ConfigError, FetchError, LoadError, LoadResult};
    pub use crate::registry::ElementRegistry;
    pub use crate::resources::{
        DefaultFetcher, FetchRequest, Fetcher, LoadState, ResourceBindingManager, SlotKind, SourceKind,
    };
    pub use crate::session::Session;
    pub use crate::widget::{WidgetHandle, WidgetId, WidgetParts};

    pub use nabu_engine::coords::{Vec2, Vec3, Vec4};
    pub use nabu_engine::host::{NodeId, SceneTree, UiHost};
    pub use nabu_engine::paint::Color;
    pub use nabu_markup::{ElementKind, MarkupDocument, MarkupNode};
}
