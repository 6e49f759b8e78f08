pub mod catalog;
pub mod config;
pub mod constants;
pub mod csv_reader;
pub mod error;
pub mod model;
pub mod render;
pub mod solution;

pub use catalog::{Catalog, DemandSite, DemandTruckLink, Economics, LinkKey, TruckSite};
pub use config::Config;
pub use csv_reader::{data_folder, read_catalog};
pub use error::{PlannerError, Result, SolverStatus};
pub use model::{SolveOptions, solve_placement};
pub use render::{RenderOptions, render_solution};
pub use solution::{PlacementSolution, ServedCustomer, SolutionTruck};
