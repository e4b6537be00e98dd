//! Savings goals and how far along they are.

mod core;
mod draft;
mod progress;
mod view;

pub use core::Goal;
pub use draft::GoalDraft;
pub use progress::{progress_label, progress_percent};
