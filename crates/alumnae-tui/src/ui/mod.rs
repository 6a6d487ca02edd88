//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, overlays and forms
//! - `input`: keyboard event handling
//! - `styles`: color palette and text styling
//! - `tabs`: dashboard, directory, gatherings and archive content

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
