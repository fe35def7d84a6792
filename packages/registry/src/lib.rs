//! # Pagecraft Registry
//!
//! Total mapping from a widget type tag to its three contracts:
//!
//! - a **defaults factory** producing the widget's `content`/`style` settings
//! - a **settings editor** describing the controls a settings panel shows
//! - a **display** contract turning settings into virtual DOM
//!
//! Every lookup resolves. A tag that was never registered, or that was
//! registered without all three contracts, resolves to the fallback
//! definition, which renders an "unsupported widget" notice. Documents that
//! reference widget types removed in a later version therefore still render.
//!
//! The registry also owns node creation policy: a new section gets one empty
//! column, and container-like widgets are created with their declared number
//! of columns.

mod definition;
mod display;
mod editor;
mod error;
mod registry;
mod theme;
pub mod widgets;

pub use definition::{ContainerPolicy, DefaultsFactory, WidgetCategory, WidgetDefinition, WidgetRegistration};
pub use display::{safe_url, DisplayContext, FallbackDisplay, WidgetDisplay};
pub use editor::{advanced_tab, Control, ControlKind, ControlSection, EditorTab, MediaKind, SettingsEditor, TabKind};
pub use error::RegistryError;
pub use registry::{PaletteEntry, Registry, RegistryBuilder, FALLBACK_WIDGET_TYPE};
pub use theme::Theme;
