//! Unit tests for gp-grid.
//!
//! All tests use hand-built maps so no fixture files are needed.

#[cfg(test)]
mod helpers {
    use gp_core::COST_INVALID;

    use crate::{GridMap, GridMapBuilder, Locomotor, LocomotorProfile};

    /// Terrain ids used throughout: 0 = clear, 1 = rough, 2 = wall.
    pub const CLEAR: u8 = 0;
    pub const ROUGH: u8 = 1;
    pub const WALL: u8 = 2;

    /// A 10×10 map, all clear.
    pub fn open_map() -> GridMap {
        GridMapBuilder::new(10, 10).build().unwrap()
    }

    /// A foot locomotor: clear 100, rough 150, wall impassable; rough at
    /// half speed.
    pub fn foot() -> Locomotor {
        Locomotor::new(LocomotorProfile {
            terrain_cost: vec![100, 150, COST_INVALID],
            terrain_speed_pct: vec![100, 50, 0],
        })
    }
}

// ── Map structure ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod map {
    use gp_core::{CPos, Facing, WPos};

    use super::helpers::*;
    use crate::{GridError, GridMapBuilder, MovementLayer};

    #[test]
    fn bounds() {
        let map = open_map();
        assert!(map.contains(CPos::new(0, 0)));
        assert!(map.contains(CPos::new(9, 9)));
        assert!(!map.contains(CPos::new(-1, 0)));
        assert!(!map.contains(CPos::new(10, 0)));
    }

    #[test]
    fn terrain_lookup() {
        let mut b = GridMapBuilder::new(4, 4);
        b.set_terrain(2, 1, ROUGH);
        let map = b.build().unwrap();
        assert_eq!(map.terrain(CPos::new(2, 1)), Some(ROUGH));
        assert_eq!(map.terrain(CPos::new(0, 0)), Some(CLEAR));
        assert_eq!(map.terrain(CPos::new(5, 5)), None);
    }

    #[test]
    fn heights_are_optional() {
        let flat = open_map();
        assert!(!flat.has_heights());
        assert_eq!(flat.cell_height(CPos::new(3, 3)), 0);

        let mut b = GridMapBuilder::new(4, 4);
        b.set_height(1, 1, 2);
        let hilly = b.build().unwrap();
        assert!(hilly.has_heights());
        assert_eq!(hilly.cell_height(CPos::new(1, 1)), 2);
        assert_eq!(hilly.cell_height(CPos::new(0, 0)), 0);
    }

    #[test]
    fn custom_layer_membership() {
        let mut tunnel = MovementLayer::new(1, 200, 200);
        tunnel.add_cell(3, 3, CLEAR).add_cell(4, 3, CLEAR);

        let mut b = GridMapBuilder::new(10, 10);
        b.add_movement_layer(tunnel);
        let map = b.build().unwrap();

        assert!(map.contains(CPos::with_layer(3, 3, 1)));
        assert!(!map.contains(CPos::with_layer(5, 3, 1)));
        assert_eq!(map.terrain(CPos::with_layer(4, 3, 1)), Some(CLEAR));
        // Layer cells are flat regardless of ground heights.
        assert_eq!(map.cell_height(CPos::with_layer(3, 3, 1)), 0);
    }

    #[test]
    fn layer_id_validation() {
        let mut b = GridMapBuilder::new(4, 4);
        b.add_movement_layer(MovementLayer::new(0, 1, 1));
        assert!(matches!(b.build(), Err(GridError::ReservedLayerId)));

        let mut b = GridMapBuilder::new(4, 4);
        b.add_movement_layer(MovementLayer::new(1, 1, 1));
        b.add_movement_layer(MovementLayer::new(1, 2, 2));
        assert!(matches!(b.build(), Err(GridError::DuplicateLayerId(1))));
    }

    #[test]
    fn world_space_roundtrip() {
        let map = open_map();
        let c = CPos::new(7, 2);
        assert_eq!(map.cell_containing(map.center_of_cell(c)), c);
        // The between-cells point of a horizontal step sits on the border.
        let mid = map.between_cells(CPos::new(1, 0), CPos::new(2, 0));
        assert_eq!(mid, WPos::new(2 * 1024, 512));
    }

    #[test]
    fn facing_between_uses_fallback_for_same_cell() {
        let map = open_map();
        let f = map.facing_between(CPos::new(1, 1), CPos::new(1, 1), Facing::WEST);
        assert_eq!(f, Facing::WEST);
        let east = map.facing_between(CPos::new(1, 1), CPos::new(2, 1), Facing::NORTH);
        assert_eq!(east, Facing::EAST);
    }

    #[test]
    fn tiles_in_circle_clips_and_orders() {
        let map = open_map();
        let tiles = map.tiles_in_circle(CPos::new(0, 0), 1);
        // Corner: only the in-bounds cells of the 3×3 block, minus the
        // diagonal (distance √2 > 1).
        assert_eq!(
            tiles,
            vec![CPos::new(0, 0), CPos::new(1, 0), CPos::new(0, 1)]
        );
        assert_eq!(map.tiles_in_circle(CPos::new(5, 5), 0), vec![CPos::new(5, 5)]);
    }
}

// ── Locomotor ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod locomotor {
    use gp_core::{AgentId, CPos, PlayerId, COST_INVALID};

    use super::helpers::*;
    use crate::{ActorMap, BlockedByActor, GridMapBuilder, Occupant, OccupantKind};

    #[test]
    fn terrain_costs() {
        let loco = foot();
        assert_eq!(loco.movement_cost(CLEAR), 100);
        assert_eq!(loco.movement_cost(ROUGH), 150);
        assert_eq!(loco.movement_cost(WALL), COST_INVALID);
        assert_eq!(loco.movement_cost(77), COST_INVALID); // off the table
        assert_eq!(loco.min_terrain_cost(), 100);
    }

    #[test]
    fn entry_respects_bounds_terrain_and_blockers() {
        let mut b = GridMapBuilder::new(4, 1);
        b.set_terrain(2, 0, WALL);
        let map = b.build().unwrap();
        let loco = foot();
        let mut actors = ActorMap::new();
        let me = AgentId(0);

        assert_eq!(
            loco.movement_cost_to_enter(&map, &actors, me, CPos::new(1, 0), BlockedByActor::All, None),
            100
        );
        // Wall terrain.
        assert_eq!(
            loco.movement_cost_to_enter(&map, &actors, me, CPos::new(2, 0), BlockedByActor::All, None),
            COST_INVALID
        );
        // Out of bounds.
        assert_eq!(
            loco.movement_cost_to_enter(&map, &actors, me, CPos::new(4, 0), BlockedByActor::All, None),
            COST_INVALID
        );

        // A stationary occupant blocks under Stationary but not Immovable.
        actors.add(
            CPos::new(1, 0),
            Occupant { agent: AgentId(1), owner: PlayerId(0), kind: OccupantKind::Stationary },
        );
        assert!(!loco.can_move_freely_into(&map, &actors, me, CPos::new(1, 0), BlockedByActor::Stationary, None));
        assert!(loco.can_move_freely_into(&map, &actors, me, CPos::new(1, 0), BlockedByActor::Immovable, None));
        // The ignore filter exempts the blocker.
        assert!(loco.can_move_freely_into(
            &map, &actors, me, CPos::new(1, 0), BlockedByActor::Stationary, Some(AgentId(1))
        ));
    }

    #[test]
    fn cooperative_check_consults_reservations() {
        use gp_core::Tick;

        use crate::ReservationTable;

        let map = super::helpers::open_map();
        let loco = foot();
        let actors = ActorMap::new();
        let mut reservations = ReservationTable::new(4999);
        let (me, other) = (AgentId(0), AgentId(1));
        let cell = CPos::new(2, 2);

        let free = |loco: &crate::Locomotor, res: &ReservationTable, agent, t| {
            loco.can_move_freely_into_coop(
                &map, &actors, res, agent, cell, BlockedByActor::All, None, Tick(t),
            )
        };

        assert!(free(&loco, &reservations, me, 5));
        reservations.reserve(cell, Tick(5), other);
        // Someone else's claim blocks exactly its tick, nothing more.
        assert!(!free(&loco, &reservations, me, 5));
        assert!(free(&loco, &reservations, me, 6));
        // The owner passes through its own reservation.
        assert!(free(&loco, &reservations, other, 5));
    }

    #[test]
    fn speed_scales_with_terrain() {
        let mut b = GridMapBuilder::new(3, 1);
        b.set_terrain(1, 0, ROUGH);
        let map = b.build().unwrap();
        let loco = foot();

        assert_eq!(loco.movement_speed_for_cell(&map, 128, CPos::new(0, 0)), 128);
        assert_eq!(loco.movement_speed_for_cell(&map, 128, CPos::new(1, 0)), 64);
        assert_eq!(loco.movement_speed_for_cell(&map, 128, CPos::new(9, 0)), 0);
    }
}

// ── Blocker regimes ───────────────────────────────────────────────────────────

#[cfg(test)]
mod blockers {
    use gp_core::{AgentId, CPos, PlayerId};

    use crate::{ActorMap, BlockedByActor, Occupant, OccupantKind};

    fn occupant(id: u32, kind: OccupantKind) -> Occupant {
        Occupant { agent: AgentId(id), owner: PlayerId(0), kind }
    }

    #[test]
    fn regime_ordering() {
        assert!(!BlockedByActor::None.blocks(OccupantKind::Immovable));
        assert!(BlockedByActor::Immovable.blocks(OccupantKind::Immovable));
        assert!(!BlockedByActor::Immovable.blocks(OccupantKind::Stationary));
        assert!(BlockedByActor::Stationary.blocks(OccupantKind::Stationary));
        assert!(!BlockedByActor::Stationary.blocks(OccupantKind::Moving));
        assert!(BlockedByActor::All.blocks(OccupantKind::Moving));
    }

    #[test]
    fn self_never_blocks() {
        let mut actors = ActorMap::new();
        let cell = CPos::new(2, 2);
        actors.add(cell, occupant(7, OccupantKind::Stationary));
        assert!(!actors.is_blocked(cell, BlockedByActor::All, AgentId(7), Option::None));
        assert!(actors.is_blocked(cell, BlockedByActor::All, AgentId(8), Option::None));
    }

    #[test]
    fn move_agent_preserves_identity() {
        let mut actors = ActorMap::new();
        let (a, b) = (CPos::new(0, 0), CPos::new(1, 0));
        actors.add(a, occupant(3, OccupantKind::Moving));
        actors.move_agent(a, b, AgentId(3));
        assert!(actors.occupants_at(a).is_empty());
        assert_eq!(actors.occupants_at(b).len(), 1);
        assert_eq!(actors.occupants_at(b)[0].agent, AgentId(3));
    }

    #[test]
    fn set_kind_updates_blocking() {
        let mut actors = ActorMap::new();
        let cell = CPos::new(4, 4);
        actors.add(cell, occupant(1, OccupantKind::Moving));
        assert!(!actors.is_blocked(cell, BlockedByActor::Stationary, AgentId(0), Option::None));
        actors.set_kind(cell, AgentId(1), OccupantKind::Stationary);
        assert!(actors.is_blocked(cell, BlockedByActor::Stationary, AgentId(0), Option::None));
    }
}

// ── Reservation table ─────────────────────────────────────────────────────────

#[cfg(test)]
mod reservation {
    use gp_core::{AgentId, CPos, Tick};

    use crate::ReservationTable;

    #[test]
    fn reserve_check_free() {
        let mut table = ReservationTable::new(4999);
        let cell = CPos::new(3, 4);
        let (a, b) = (AgentId(0), AgentId(1));

        table.reserve(cell, Tick(10), a);
        assert!(table.is_reserved(cell, Tick(10)));
        assert!(table.reserved_by_other(cell, Tick(10), b));
        assert!(!table.reserved_by_other(cell, Tick(10), a));
        assert!(!table.is_reserved(cell, Tick(11)));

        // Only the owner's free releases the slot.
        table.free(cell, Tick(10), b);
        assert!(table.is_reserved(cell, Tick(10)));
        table.free(cell, Tick(10), a);
        assert!(!table.is_reserved(cell, Tick(10)));
    }

    #[test]
    fn modulus_wraps() {
        let mut table = ReservationTable::new(4999);
        let cell = CPos::new(0, 0);
        table.reserve(cell, Tick(7), AgentId(2));
        // t + T lands in the same slot.
        assert!(table.is_reserved(cell, Tick(7 + 4999)));
        // Neighbouring ticks are untouched.
        assert!(!table.is_reserved(cell, Tick(6)));
        assert!(!table.is_reserved(cell, Tick(8)));
    }

    #[test]
    fn free_all_releases_only_that_agent() {
        let mut table = ReservationTable::new(100);
        table.reserve(CPos::new(0, 0), Tick(1), AgentId(0));
        table.reserve(CPos::new(1, 0), Tick(1), AgentId(0));
        table.reserve(CPos::new(2, 0), Tick(1), AgentId(1));
        table.free_all(AgentId(0));
        assert_eq!(table.len(), 1);
        assert_eq!(table.owner(CPos::new(2, 0), Tick(1)), Some(AgentId(1)));
    }

    #[test]
    fn later_claim_displaces() {
        let mut table = ReservationTable::new(100);
        let cell = CPos::new(5, 5);
        table.reserve(cell, Tick(3), AgentId(0));
        table.reserve(cell, Tick(103), AgentId(1)); // same slot after wrap
        assert_eq!(table.owner(cell, Tick(3)), Some(AgentId(1)));
    }
}
