//! Frontline target selection.
//!
//! Within a row only the unit nearest the attacker can be engaged. When the
//! target army stands on the left flank the attacker comes from the right,
//! so the live unit with the largest x is exposed; when it stands on the
//! right flank, the one with the smallest x.

use crate::board::Flank;
use crate::unit::Unit;

/// Return the exposed unit of every row, in row order.
///
/// Rows with no living, placed unit contribute nothing. When two units
/// share the extremal column the first one in the row wins.
#[must_use]
pub fn suitable_targets<'a, R>(rows: &[R], target_flank: Flank) -> Vec<&'a Unit>
where
    R: AsRef<[&'a Unit]>,
{
    rows.iter()
        .filter_map(|row| frontmost(row.as_ref(), target_flank))
        .collect()
}

/// The exposed unit of a single row.
#[must_use]
pub fn frontmost<'a>(row: &[&'a Unit], target_flank: Flank) -> Option<&'a Unit> {
    let mut best: Option<(&'a Unit, i32)> = None;

    for &unit in row {
        if !unit.is_alive() {
            continue;
        }
        let Some(pos) = unit.position else {
            continue;
        };

        let closer = match best {
            None => true,
            Some((_, best_x)) => match target_flank {
                Flank::Left => pos.x > best_x,
                Flank::Right => pos.x < best_x,
            },
        };
        if closer {
            best = Some((unit, pos.x));
        }
    }

    best.map(|(unit, _)| unit)
}
