//! TUI module: Terminal User Interface using Ratatui.
//!
//! One page: patient details form, prediction results, usage sidebar and a
//! toggleable feature descriptions panel.

mod app;
mod styles;
mod ui;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
