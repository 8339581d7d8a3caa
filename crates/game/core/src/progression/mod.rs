//! XP/level model.
//!
//! Levels are never stored on their own: a [`ProgressRecord`] keeps cumulative
//! XP and derives its level through the cumulative threshold table in
//! [`table`], so the two can never disagree.

pub mod record;
pub mod table;

pub use record::{LevelChange, ProgressBook, ProgressRecord};
pub use table::{XP_TABLE, level_for_xp, perk_levels_crossed, xp_for_level};
