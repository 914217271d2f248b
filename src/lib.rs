//! keystudio - A terminal music studio.
//!
//! This library provides the core functionality for the studio app: the
//! computer-keyboard to piano mapping, the session state machine, the mock
//! sound and beat catalogs, and the persisted theme.

pub mod app;
pub mod catalog;
pub mod keys;
pub mod session;
pub mod settings;
pub mod theme;
pub mod ui;

// Re-export commonly used types
pub use app::{App, AppConfig, FocusedPanel, ToastLevel};
pub use catalog::{Beat, CatalogError, CatalogSource, Catalogs, Sound};
pub use keys::{detect_layout, generate_keys, KeyboardMapping, LayoutId, PianoKey};
pub use session::{LoadState, Precondition, Session};
pub use theme::{Theme, ThemeStore};
