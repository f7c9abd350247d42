pub mod policy;
pub mod reports;
pub mod scenarios;
pub mod seeds;
pub mod simulation;
pub mod tester;

pub use policy::AnglerStrategy;
pub use scenarios::{expand_scenarios, find_scenario, list_scenarios};
pub use seeds::parse_seeds;
pub use simulation::AnglerSimulator;
pub use tester::*;
