//! Layout engine for the virtualized grid.
//!
//! This module handles:
//! - The viewport window over the logical rows and its scroll policy
//! - The scrollbar model
//! - Column geometry and pixel to cell hit testing

mod grid_layout;
mod viewport;

pub use grid_layout::{CellRect, GridLayout};
pub use viewport::{ScrollIndicator, ScrollSource, ViewportWindow, WHEEL_ROWS};
