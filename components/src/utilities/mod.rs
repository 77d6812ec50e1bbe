// Utilities module
// Helper functions shared by the widgets and their configuration loaders

pub mod helpers;

pub use helpers::*;
