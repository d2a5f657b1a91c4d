use log::info;

use tsp_hs_core::{PopulationSearch, ProgressWriter, Result, SolverInput, SolverOptions, logging};

fn main() -> Result<()> {
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;
    let input = SolverInput::from_options(&options)?;

    info!("input: {input}");
    info!("options: {options}");

    let config = options.search_config();
    let mut search = PopulationSearch::new(input.into_cities(), &config)?;
    let mut progress = ProgressWriter::from_options(&options)?;

    match search.run(&mut progress)? {}
}
