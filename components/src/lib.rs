// Category widgets library
// Category tab bar and lazily paged container for ratatui applications

// Core infrastructure (geometry, tweens, scroll surface)
pub mod core;
// GUI elements (visual components)
pub mod elements;
// YAML configuration and widget construction
pub mod managers;
// Utilities and helpers
pub mod utilities;

// Re-export commonly used items
// Note: the tab_bar module exists in both elements and managers, so reach it by path
#[allow(ambiguous_glob_reexports)]
pub use crate::core::*;
#[allow(ambiguous_glob_reexports)]
pub use elements::*;
#[allow(ambiguous_glob_reexports)]
pub use managers::*;
pub use utilities::*;
