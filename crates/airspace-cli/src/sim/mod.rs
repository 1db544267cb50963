//! Built-in traffic sources for the monitor.

mod scenarios;

pub use scenarios::{
    create_converging_scenario, create_random_scenario, create_split_sector_scenario, Scenario,
};
