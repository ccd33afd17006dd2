//! Grid Tactics - deterministic turn-based tactical combat

pub mod battle;
pub mod core;
