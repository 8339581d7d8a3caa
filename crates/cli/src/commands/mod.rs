//! Command implementations for classctl
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod character;
mod classes;
mod replay;
mod simulate_bonus;
mod xp_table;

pub use character::{AddXp, Reset, SetClass, Show};
pub use classes::Classes;
pub use replay::Replay;
pub use simulate_bonus::SimulateBonus;
pub use xp_table::XpTable;
