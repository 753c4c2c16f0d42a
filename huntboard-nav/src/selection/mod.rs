mod model;
mod state;

pub use model::{
    SelectionDepth, SelectionObserver, SelectionPath, SelectionTransition,
};
pub(crate) use model::chain_transitions;
pub use state::{SelectionMachine, SelectionState};
