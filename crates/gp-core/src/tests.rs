//! Unit tests for gp-core.

// ── Cell arithmetic ───────────────────────────────────────────────────────────

#[cfg(test)]
mod cells {
    use crate::cell::*;

    #[test]
    fn offset_and_difference_roundtrip() {
        let a = CPos::new(3, 7);
        let v = CVec::new(-1, 1);
        let b = a.offset(v);
        assert_eq!(b, CPos::new(2, 8));
        assert_eq!(b - a, v);
    }

    #[test]
    fn adjacency() {
        let c = CPos::new(5, 5);
        assert!(c.is_adjacent_to(CPos::new(6, 6)));
        assert!(c.is_adjacent_to(c)); // a cell is adjacent to itself
        assert!(!c.is_adjacent_to(CPos::new(7, 5)));
        // Different layers are never adjacent.
        assert!(!c.is_adjacent_to(CPos::with_layer(5, 5, 1)));
    }

    #[test]
    fn direction_index_covers_neighborhood() {
        // The 8 neighborhood vectors map to indices 0..=8 skipping 4.
        let mut seen = [false; 9];
        for v in CVec::FULL_NEIGHBORHOOD {
            seen[v.direction_index()] = true;
        }
        assert!(!seen[4]);
        assert_eq!(seen.iter().filter(|&&s| s).count(), 8);
        assert_eq!(CVec::ZERO.direction_index(), 4);
    }

    #[test]
    fn cell_center_and_containment() {
        let c = CPos::new(2, -1);
        let center = WPos::center_of(c);
        assert_eq!(center, WPos::new(2 * 1024 + 512, -1024 + 512));
        assert_eq!(center.containing_cell(), c);
        // Corners still resolve to the owning cell.
        assert_eq!(WPos::new(2 * 1024, -1024).containing_cell(), c);
    }

    #[test]
    fn lerp_endpoints() {
        let a = WPos::new(0, 0);
        let b = WPos::new(1024, -512);
        assert_eq!(a.lerp(b, 0, 4), a);
        assert_eq!(a.lerp(b, 4, 4), b);
        assert_eq!(a.lerp(b, 2, 4), WPos::new(512, -256));
    }
}

// ── Cost model ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod costs {
    use crate::cell::*;

    #[test]
    fn diagonal_ratio() {
        assert_eq!(diagonal_cost(100), 141);
        assert_eq!(diagonal_cost(24), 34);
    }

    #[test]
    fn octile_straight_line() {
        let h = octile_estimate(CPos::new(0, 0), CPos::new(9, 0), 100, 100);
        assert_eq!(h, 900);
    }

    #[test]
    fn octile_pure_diagonal() {
        let h = octile_estimate(CPos::new(0, 0), CPos::new(4, 4), 100, 100);
        assert_eq!(h, 4 * 141);
    }

    #[test]
    fn octile_mixed() {
        // 5 across, 2 down: 2 diagonals + 3 straights.
        let h = octile_estimate(CPos::new(0, 0), CPos::new(5, 2), 100, 100);
        assert_eq!(h, 3 * 100 + 2 * 141);
    }

    #[test]
    fn octile_weight_scales() {
        let base = octile_estimate(CPos::new(0, 0), CPos::new(10, 0), 100, 100);
        let inflated = octile_estimate(CPos::new(0, 0), CPos::new(10, 0), 100, 125);
        assert_eq!(inflated, base * 125 / 100);
    }

    #[test]
    fn octile_never_saturates_to_invalid() {
        let h = octile_estimate(
            CPos::new(i32::MIN / 2, i32::MIN / 2),
            CPos::new(i32::MAX / 2, i32::MAX / 2),
            u32::MAX - 1,
            100,
        );
        assert!(h < COST_INVALID);
    }
}

// ── Facing ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod facing {
    use crate::cell::CVec;
    use crate::facing::Facing;

    #[test]
    fn from_vec_cardinals() {
        assert_eq!(Facing::from_vec(CVec::new(0, -1)), Some(Facing::NORTH));
        assert_eq!(Facing::from_vec(CVec::new(1, 0)), Some(Facing::EAST));
        assert_eq!(Facing::from_vec(CVec::new(0, 1)), Some(Facing::SOUTH));
        assert_eq!(Facing::from_vec(CVec::new(-1, 0)), Some(Facing::WEST));
        assert_eq!(Facing::from_vec(CVec::ZERO), None);
    }

    #[test]
    fn delta_takes_shortest_arc() {
        assert_eq!(Facing::NORTH.delta(Facing::EAST), 256);
        assert_eq!(Facing::NORTH.delta(Facing::WEST), -256);
        assert_eq!(Facing::new(1000).delta(Facing::new(24)), 48);
    }

    #[test]
    fn rotate_toward_stops_on_target() {
        let mut f = Facing::NORTH;
        for _ in 0..3 {
            f = f.rotate_toward(Facing::EAST, 100);
        }
        assert_eq!(f, Facing::EAST); // 256 in 100-unit steps: 100, 200, 256
    }

    #[test]
    fn rotate_toward_counterclockwise() {
        let f = Facing::NORTH.rotate_toward(Facing::WEST, 100);
        assert_eq!(f.units(), 924);
    }

    #[test]
    fn sharp_turn_band() {
        // East → south-west is 384 units clockwise: sharp.
        let east = Facing::EAST;
        let sw = Facing::from_vec(CVec::new(-1, 1)).unwrap();
        assert!(east.is_sharp_turn_to(sw));
        // East → north is 256 counterclockwise: not sharp.
        assert!(!east.is_sharp_turn_to(Facing::NORTH));
        // Full reversal (512) is sharp.
        assert!(east.is_sharp_turn_to(Facing::WEST));
    }

    #[test]
    fn ticks_to_turn_rounds_up() {
        assert_eq!(Facing::NORTH.ticks_to_turn(Facing::EAST, 100), 3);
        assert_eq!(Facing::NORTH.ticks_to_turn(Facing::NORTH, 100), 0);
        assert_eq!(Facing::NORTH.ticks_to_turn(Facing::SOUTH, 0), 0);
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use crate::config::PathConfig;
    use crate::Tick;

    #[test]
    fn defaults() {
        let c = PathConfig::default();
        assert_eq!(c.time_length, 4999);
        assert_eq!(c.heuristic_weight_pct, 100);
        assert_eq!(c.lane_bias, 1);
    }

    #[test]
    fn rejects_degenerate_modulus() {
        assert!(PathConfig::new(8, 8, 1, 100, 1).is_err());
        assert!(PathConfig::new(9, 8, 1, 100, 1).is_ok());
        assert!(PathConfig::new(100, 0, 1, 100, 1).is_err());
    }

    #[test]
    fn rewindow_boundaries() {
        let c = PathConfig::new(4999, 8, 2, 100, 1).unwrap();
        assert_eq!(c.rewindow_period(), 16);
        assert!(c.is_rewindow_boundary(Tick(0)));
        assert!(c.is_rewindow_boundary(Tick(32)));
        assert!(!c.is_rewindow_boundary(Tick(33)));
    }
}
