//! Randomized half-sort population search for the Euclidean TSP.
//! The engine never performs I/O; the `io` helpers feed it cities and
//! render its improvement stream.

mod algo;
mod city;
mod error;
mod io;
pub mod logging;
mod tour;

pub use algo::construct::half_sort;
pub use algo::perturb::Perturbation;
pub use algo::search::{
    DEFAULT_POPULATION_SIZE, Improvement, OperatorSet, PopulationSearch, SearchConfig,
    SearchObserver,
};
pub use city::City;
pub use error::{Error, Result};
pub use io::input::{FirstCity, SolverInput};
pub use io::options::{LogFormat, LogLevel, SolverOptions};
pub use io::progress::ProgressWriter;
pub use tour::{Tour, TourMetrics};
