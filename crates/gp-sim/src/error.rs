use gp_core::{AgentId, CPos};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("agent {agent} placed on {cell}, which it cannot occupy")]
    InvalidPlacement { agent: AgentId, cell: CPos },

    #[error("agent {agent} references unknown locomotor {locomotor}")]
    UnknownLocomotor { agent: AgentId, locomotor: u8 },

    #[error("agent id {0} registered twice")]
    DuplicateAgent(AgentId),

    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;
