//! Fluent builder for constructing a [`World`].

use gp_core::{AgentId, PathConfig, Tick};
use gp_grid::{ActorMap, GridMap, Locomotor, Occupant, OccupantKind, ReservationTable};
use gp_move::{ActivityStack, Agent};
use gp_search::{CellInfoPool, Pathfinder};

use crate::{SimError, SimResult, World};

/// Fluent builder for [`World`].
///
/// # Required inputs
///
/// - a [`GridMap`] (hand the builder output of [`gp_grid::GridMapBuilder`])
/// - at least one [`Locomotor`]
/// - the agents, added in ascending id order via [`agent`](Self::agent)
///
/// # Example
///
/// ```rust,ignore
/// let world = WorldBuilder::new(map, PathConfig::default())
///     .locomotor(foot)
///     .agent(Agent::new(AgentId(0), PlayerId(0), CPos::new(0, 0)))
///     .build()?;
/// ```
pub struct WorldBuilder {
    map: GridMap,
    config: PathConfig,
    locomotors: Vec<Locomotor>,
    agents: Vec<Agent>,
}

impl WorldBuilder {
    pub fn new(map: GridMap, config: PathConfig) -> WorldBuilder {
        WorldBuilder { map, config, locomotors: Vec::new(), agents: Vec::new() }
    }

    /// Register a locomotor; agents reference it by index.
    pub fn locomotor(mut self, locomotor: Locomotor) -> WorldBuilder {
        self.locomotors.push(locomotor);
        self
    }

    /// Add an agent.  Ids must be dense and ascending from zero — the id
    /// doubles as the index in the world's agent vector and as the
    /// deterministic tick order.
    pub fn agent(mut self, agent: Agent) -> WorldBuilder {
        self.agents.push(agent);
        self
    }

    /// Validate placements and freeze the world.
    ///
    /// # Errors
    ///
    /// Fails when an agent's id does not match its position in the list,
    /// references an unknown locomotor, or is placed on a cell its
    /// locomotor cannot occupy.
    pub fn build(self) -> SimResult<World> {
        let mut actors = ActorMap::new();
        let mut max_player = 0usize;

        for (i, agent) in self.agents.iter().enumerate() {
            if agent.id != AgentId(i as u32) {
                return Err(SimError::DuplicateAgent(agent.id));
            }
            let Some(locomotor) = self.locomotors.get(agent.locomotor as usize) else {
                return Err(SimError::UnknownLocomotor {
                    agent: agent.id,
                    locomotor: agent.locomotor,
                });
            };
            let cell = agent.to_cell;
            let passable = self
                .map
                .terrain(cell)
                .is_some_and(|t| locomotor.movement_cost(t) != gp_core::COST_INVALID);
            if !passable {
                return Err(SimError::InvalidPlacement { agent: agent.id, cell });
            }
            actors.add(
                cell,
                Occupant { agent: agent.id, owner: agent.owner, kind: OccupantKind::Stationary },
            );
            max_player = max_player.max(agent.owner.index());
        }

        let reservations = (0..=max_player)
            .map(|_| ReservationTable::new(self.config.time_length))
            .collect();
        let pool = CellInfoPool::new(self.map.width(), self.map.height());
        let stacks = self.agents.iter().map(|_| ActivityStack::new()).collect();

        Ok(World {
            config: self.config,
            map: self.map,
            locomotors: self.locomotors,
            actors,
            reservations,
            pool,
            pathfinder: Pathfinder::new(),
            agents: self.agents,
            stacks,
            now: Tick::ZERO,
        })
    }
}
