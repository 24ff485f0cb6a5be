// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-dimensional constraint solver shared by box, grid and splitter layouts.

use alloc::vec::Vec;

use crate::sizing::Constraint;

#[derive(Copy, Clone, Debug)]
struct Slot {
    constraint: Constraint,
    size: Option<i64>,
    pinned: bool,
}

impl Slot {
    fn size(&self) -> i64 {
        self.size.unwrap_or(0)
    }
}

/// Splits `extent` into one slot per constraint.
///
/// The slots always sum to exactly `extent` (or 0 when `extent` is negative).
///
/// Children with a preferred extent start there; the rest share what is left
/// equally, with earlier children taking the rounded-down share. Any child
/// pushed against its minimum or maximum is pinned and the remaining space is
/// shared again among the others. Once every free child has a size, surplus
/// or deficit is spread over the children that are not pinned.
///
/// If every child is pinned and the slots still do not add up, the trailing
/// slot absorbs the difference: surplus is added to it, and a deficit is taken
/// from the trailing slots, emptying each before moving to the one before it.
#[must_use]
pub fn solve(constraints: &[Constraint], extent: i32) -> Vec<i32> {
    let extent = i64::from(extent.max(0));
    let mut slots: Vec<Slot> = constraints
        .iter()
        .map(|&constraint| Slot {
            constraint,
            size: None,
            pinned: false,
        })
        .collect();

    // Seed preferred sizes. A preferred size above the maximum pins the
    // child; one below the minimum is raised but left free to grow.
    for slot in &mut slots {
        if let Some(preferred) = slot.constraint.preferred {
            let min = i64::from(slot.constraint.minimum);
            let max = i64::from(slot.constraint.maximum);
            if i64::from(preferred) > max {
                slot.size = Some(max);
                slot.pinned = true;
            } else {
                slot.size = Some(i64::from(preferred).max(min));
            }
        }
    }

    share_free_space(&mut slots, extent);
    shrink_to_fit(&mut slots, extent);
    grow_to_fill(&mut slots, extent);
    absorb_residual(&mut slots, extent);

    slots
        .iter()
        .map(|slot| i32::try_from(slot.size()).unwrap_or(i32::MAX))
        .collect()
}

/// Gives every child without a preferred size an equal share of the space left.
fn share_free_space(slots: &mut [Slot], extent: i64) {
    loop {
        for slot in slots.iter_mut() {
            if !slot.pinned && slot.constraint.preferred.is_none() {
                slot.size = None;
            }
        }
        let mut remaining = extent;
        let mut count = 0_i64;
        for slot in slots.iter() {
            match slot.size {
                Some(size) => remaining -= size,
                None => count += 1,
            }
        }
        let mut restart = false;
        for slot in slots.iter_mut().filter(|s| s.size.is_none()) {
            let min = i64::from(slot.constraint.minimum);
            let max = i64::from(slot.constraint.maximum);
            let mut size = remaining.div_euclid(count);
            if size < min {
                size = min;
                slot.pinned = true;
                restart = true;
            } else if size > max {
                size = max;
                slot.pinned = true;
                restart = true;
            }
            slot.size = Some(size);
            remaining -= size;
            count -= 1;
            if restart {
                break;
            }
        }
        if !restart {
            return;
        }
    }
}

/// Takes an oversized total back from children that are not pinned.
fn shrink_to_fit(slots: &mut [Slot], extent: i64) {
    loop {
        let total: i64 = slots.iter().map(Slot::size).sum();
        if total <= extent {
            return;
        }
        let mut count = free_count(slots);
        if count == 0 {
            return;
        }
        let mut excess = total - extent;
        let mut restart = false;
        for slot in slots.iter_mut().filter(|s| !s.pinned) {
            let min = i64::from(slot.constraint.minimum);
            let current = slot.size();
            let mut size = current - excess.div_euclid(count);
            if size < min {
                size = min;
                slot.pinned = true;
                restart = true;
            }
            excess -= current - size;
            count -= 1;
            slot.size = Some(size);
            if restart {
                break;
            }
        }
        if !restart {
            return;
        }
    }
}

/// Hands an undersized total to children that are not pinned.
fn grow_to_fill(slots: &mut [Slot], extent: i64) {
    loop {
        let total: i64 = slots.iter().map(Slot::size).sum();
        if total >= extent {
            return;
        }
        let mut count = free_count(slots);
        if count == 0 {
            return;
        }
        let mut shortfall = extent - total;
        let mut restart = false;
        for slot in slots.iter_mut().filter(|s| !s.pinned) {
            let max = i64::from(slot.constraint.maximum);
            let current = slot.size();
            let mut size = current + shortfall.div_euclid(count);
            if size > max {
                size = max;
                slot.pinned = true;
                restart = true;
            }
            shortfall -= size - current;
            count -= 1;
            slot.size = Some(size);
            if restart {
                break;
            }
        }
        if !restart {
            return;
        }
    }
}

fn free_count(slots: &[Slot]) -> i64 {
    slots.iter().fold(0, |n, s| if s.pinned { n } else { n + 1 })
}

fn absorb_residual(slots: &mut [Slot], extent: i64) {
    let total: i64 = slots.iter().map(Slot::size).sum();
    let residual = extent - total;
    if residual == 0 || slots.is_empty() {
        return;
    }
    tracing::trace!(residual, extent, "box solver residual absorbed by trailing slot");
    if residual > 0 {
        if let Some(last) = slots.last_mut() {
            last.size = Some(last.size() + residual);
        }
        return;
    }
    let mut deficit = -residual;
    for slot in slots.iter_mut().rev() {
        if deficit == 0 {
            break;
        }
        let take = slot.size().min(deficit);
        slot.size = Some(slot.size() - take);
        deficit -= take;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free() -> Constraint {
        Constraint::UNCONSTRAINED
    }

    fn with_min(minimum: i32) -> Constraint {
        Constraint {
            minimum,
            ..Constraint::UNCONSTRAINED
        }
    }

    fn with_max(maximum: i32) -> Constraint {
        Constraint {
            maximum,
            ..Constraint::UNCONSTRAINED
        }
    }

    fn fixed(px: i32) -> Constraint {
        Constraint {
            minimum: px,
            maximum: px,
            preferred: Some(px),
        }
    }

    #[test]
    fn unconstrained_children_share_equally_with_remainder_last() {
        assert_eq!(solve(&[free(), free(), free()], 640), [213, 213, 214]);
        assert_eq!(solve(&[free(), free(), free()], 100), [33, 33, 34]);
        assert_eq!(solve(&[free(), free()], 640), [320, 320]);
    }

    #[test]
    fn empty_input_yields_no_slots() {
        assert!(solve(&[], 100).is_empty(), "no constraints, no slots");
    }

    #[test]
    fn minimum_pins_and_others_share_the_rest() {
        assert_eq!(solve(&[with_min(50), free()], 60), [50, 10]);
        assert_eq!(solve(&[free(), with_min(50)], 60), [10, 50]);
    }

    #[test]
    fn maximum_pins_and_others_share_the_rest() {
        assert_eq!(solve(&[with_max(20), free(), free()], 100), [20, 40, 40]);
    }

    #[test]
    fn preferred_is_honored_when_space_allows() {
        let preferred = Constraint {
            preferred: Some(30),
            ..Constraint::UNCONSTRAINED
        };
        assert_eq!(solve(&[preferred, free()], 100), [30, 70]);
    }

    #[test]
    fn preferred_less_than_min_expands() {
        let c = Constraint {
            minimum: 20,
            maximum: i32::MAX,
            preferred: Some(10),
        };
        assert_eq!(
            solve(&[c, fixed(30)], 100),
            [70, 30],
            "child raised to its minimum may still grow into free space"
        );
    }

    #[test]
    fn preferred_children_shrink_when_oversized() {
        let big = Constraint {
            preferred: Some(80),
            ..Constraint::UNCONSTRAINED
        };
        assert_eq!(solve(&[big, big], 100), [50, 50]);
        let floor = Constraint {
            minimum: 70,
            maximum: i32::MAX,
            preferred: Some(80),
        };
        assert_eq!(solve(&[floor, big], 100), [70, 30]);
    }

    #[test]
    fn overconstrained_deficit_comes_from_trailing_slots() {
        assert_eq!(solve(&[with_min(60), with_min(60)], 100), [60, 40]);
        assert_eq!(
            solve(&[with_min(60), with_min(30), with_min(30)], 50),
            [50, 0, 0],
            "deficit empties trailing slots before earlier ones"
        );
    }

    #[test]
    fn underconstrained_surplus_goes_to_last_slot() {
        assert_eq!(solve(&[with_max(10), with_max(10)], 100), [10, 90]);
        assert_eq!(solve(&[fixed(20), fixed(20)], 100), [20, 80]);
    }

    #[test]
    fn negative_extent_behaves_as_zero() {
        assert_eq!(solve(&[free(), free()], -10), [0, 0]);
    }

    #[test]
    fn slots_always_sum_to_extent() {
        let sets: [&[Constraint]; 4] = [
            &[free(), with_min(300), with_max(5)],
            &[fixed(100), fixed(100), fixed(100)],
            &[with_min(10), free(), with_max(1), free()],
            &[fixed(7)],
        ];
        for set in sets {
            for extent in [0, 1, 17, 250, 999] {
                let sum: i32 = solve(set, extent).iter().sum();
                assert_eq!(sum, extent, "slots of {set:?} at {extent}");
            }
        }
    }
}
