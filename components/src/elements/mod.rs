// GUI Elements module
// Visual components that render UI elements

pub mod paged_container;
pub mod tab_bar;
pub mod tab_item;

pub use paged_container::*;
pub use tab_bar::*;
pub use tab_item::*;
