//! Offline tooling for neovegas: balance management and automated round simulation.

mod simulate;
pub use simulate::{simulate, Summary};

mod state;
pub use state::{
    SimulatorConfig, Strategy, DEFAULT_HILO_GUESSES, DEFAULT_MINES_REVEALS, DEFAULT_ROUNDS,
    DEFAULT_TOWER_CLIMB, DEFAULT_WAGER, MAX_HILO_GUESSES,
};
