//! Cumulative XP thresholds.
//!
//! Entry `N - 1` holds the total XP required to reach level `N`. The curve is
//! `round(50·N² + 10.6·N)`: early levels cost a few hundred XP, the last ones
//! several thousand each.

use arrayvec::ArrayVec;

use crate::config::ProgressionConfig;

/// Total XP required for levels 1 through 50.
pub const XP_TABLE: [f64; ProgressionConfig::MAX_LEVEL as usize] = [
    61.0, 221.0, 482.0, 842.0, 1303.0, 1864.0, 2524.0, 3285.0, 4145.0, 5106.0, //
    6167.0, 7327.0, 8588.0, 9948.0, 11409.0, 12970.0, 14630.0, 16391.0, 18251.0, 20212.0, //
    22273.0, 24433.0, 26694.0, 29054.0, 31515.0, 34076.0, 36736.0, 39497.0, 42357.0, 45318.0, //
    48379.0, 51539.0, 54800.0, 58160.0, 61621.0, 65182.0, 68842.0, 72603.0, 76463.0, 80424.0, //
    84485.0, 88645.0, 92906.0, 97266.0, 101727.0, 106288.0, 110948.0, 115709.0, 120569.0, 125530.0,
];

/// Level reached with `xp` cumulative experience, clamped to the max level.
///
/// Non-finite or negative XP maps to level 0.
pub fn level_for_xp(xp: f64) -> u8 {
    if !xp.is_finite() || xp <= 0.0 {
        return 0;
    }
    XP_TABLE.partition_point(|&threshold| threshold <= xp) as u8
}

/// Total XP needed to reach `level` (0 for level 0, saturating at the max level).
pub fn xp_for_level(level: u8) -> f64 {
    match level {
        0 => 0.0,
        n => XP_TABLE[(n.min(ProgressionConfig::MAX_LEVEL) - 1) as usize],
    }
}

/// Perk unlock levels in `(old, new]`, ascending.
pub fn perk_levels_crossed(old: u8, new: u8) -> ArrayVec<u8, 5> {
    let interval = ProgressionConfig::PERK_INTERVAL;
    (old.saturating_add(1)..=new)
        .filter(|level| level % interval == 0)
        .collect()
}
