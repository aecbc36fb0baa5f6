//! Row generation
//!
//! Each round drops one new row at the top of the field: exactly one item and
//! a handful of bricks, each in its own lane.

use glam::Vec2;
use rand::Rng;

use super::collision::Rect;
use super::state::{Brick, Item, ItemKind};
use crate::tuning::Tuning;

/// Items placed per row
pub const ITEMS_PER_ROW: usize = 1;

/// One freshly generated row
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub bricks: Vec<Brick>,
    pub items: Vec<Item>,
}

/// Brick count and hit points for a round.
///
/// Round 1 is fixed at two single-hit bricks; later rounds give bricks as
/// many hit points as the round number, with a wider count range after round 3.
pub fn row_difficulty<R: Rng + ?Sized>(round: u32, rng: &mut R) -> (usize, u32) {
    match round {
        0 | 1 => (2, 1),
        2..=3 => (rng.random_range(1..=3), round),
        _ => (rng.random_range(1..=5), round),
    }
}

/// Take a random lane out of `free`
fn claim_lane<R: Rng + ?Sized>(free: &mut Vec<usize>, rng: &mut R) -> Option<usize> {
    if free.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..free.len());
    Some(free.remove(idx))
}

/// Generate the row for `round`
pub fn spawn_row<R: Rng + ?Sized>(round: u32, tuning: &Tuning, rng: &mut R) -> Row {
    let (brick_count, hp) = row_difficulty(round, rng);
    let lane_width = tuning.lane_width();
    let top = tuning.row_top;
    let inset = tuning.brick_inset;

    let mut free: Vec<usize> = (0..tuning.lane_count).collect();
    let mut row = Row::default();

    // Item goes first so it always gets a lane
    for _ in 0..ITEMS_PER_ROW {
        let Some(lane) = claim_lane(&mut free, rng) else {
            break;
        };
        row.items.push(Item {
            pos: Vec2::new(
                lane as f32 * lane_width + lane_width / 2.0,
                top + tuning.row_height / 2.0,
            ),
            radius: tuning.item_radius,
            kind: ItemKind::ExtraBall,
            wobble: rng.random_range(0.0..std::f32::consts::TAU),
        });
    }

    for _ in 0..brick_count {
        let Some(lane) = claim_lane(&mut free, rng) else {
            break;
        };
        row.bricks.push(Brick::new(
            Rect::new(
                lane as f32 * lane_width + inset,
                top + inset,
                lane_width - inset * 2.0,
                tuning.row_height - inset * 2.0,
            ),
            hp,
        ));
    }

    row
}
