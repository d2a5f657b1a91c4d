use std::{
    convert::Infallible,
    time::{Duration, Instant},
};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use rayon::prelude::*;
use tsp_hs_derive::CliValue;

use crate::{City, Error, Result, Tour, algo::construct::half_sort, algo::perturb::Perturbation};

pub const DEFAULT_POPULATION_SIZE: usize = 100;
pub const DEFAULT_SEED: u64 = 12_345;

const MIN_CITIES: usize = 2;
const SPIKE_THRESHOLD_FACTOR: f64 = 10.0;

const ERR_EMPTY_POPULATION: &str = "population_size must be > 0";
const ERR_NON_FINITE_CITY: &str = "Input contains non-finite coordinates";

/// Which perturbations a step evaluates.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, CliValue)]
#[cli_value(option = "operators")]
pub enum OperatorSet {
    /// Symmetric and independent-half swap, accepted in sequence against the
    /// slot's current tour.
    #[default]
    Pair,
    /// All of [`Perturbation::EXTENDED`]; the shortest result replaces the
    /// slot if it beats the current tour.
    Extended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub population_size: usize,
    pub seed: u64,
    pub operators: OperatorSet,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            seed: DEFAULT_SEED,
            operators: OperatorSet::Pair,
        }
    }
}

/// Emitted whenever a step produces a tour strictly shorter than every tour
/// seen before.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Improvement {
    /// 1-based step that produced the tour.
    pub step: u64,
    pub distance: f64,
    /// Time since the first step began.
    pub elapsed: Duration,
}

/// Consumer of the improvement stream. An error stops the search and is
/// returned to the caller.
pub trait SearchObserver {
    fn observe(&mut self, improvement: &Improvement) -> Result<()>;
}

impl<F> SearchObserver for F
where
    F: FnMut(&Improvement) -> Result<()>,
{
    fn observe(&mut self, improvement: &Improvement) -> Result<()> {
        self(improvement)
    }
}

/// Outcome of comparing the two swap variants against the slot's tour.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Accepted {
    Current,
    Symmetric,
    Independent,
}

/// Both variants are compared with `current`, not with each other: a shorter
/// independent variant wins even when the symmetric one is shorter still.
pub(crate) fn accept_pair(current: f64, symmetric: f64, independent: f64) -> Accepted {
    let mut accepted = Accepted::Current;
    if symmetric < current {
        accepted = Accepted::Symmetric;
    }
    if independent < current {
        accepted = Accepted::Independent;
    }
    accepted
}

/// Hill climbing over a fixed population of half-sorted tours.
///
/// Each step picks one slot at random, perturbs its tour and writes back the
/// accepted result; no other slot changes. The best distance only ever goes
/// down and always equals the shortest tour in the population.
#[derive(Debug)]
pub struct PopulationSearch {
    population: Vec<Tour>,
    best_distance: f64,
    operators: OperatorSet,
    rng: StdRng,
    steps: u64,
    started: Option<Instant>,
}

impl PopulationSearch {
    /// Builds every slot from its own shuffle of `cities`.
    ///
    /// Slot seeds are drawn from `config.seed` up front, so the population is
    /// the same whatever the number of worker threads.
    #[tsp_hs_derive::timer("search.init")]
    pub fn new(cities: Vec<City>, config: &SearchConfig) -> Result<Self> {
        if cities.len() < MIN_CITIES {
            return Err(Error::TooFewCities {
                found: cities.len(),
            });
        }
        if config.population_size == 0 {
            return Err(Error::invalid_input(ERR_EMPTY_POPULATION));
        }
        if cities.iter().any(|city| !city.is_finite()) {
            return Err(Error::invalid_data(ERR_NON_FINITE_CITY));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let slot_seeds: Vec<u64> = (0..config.population_size)
            .map(|_| rng.random::<u64>())
            .collect();

        let population: Vec<Tour> = slot_seeds
            .into_par_iter()
            .map(|seed| {
                let mut order = cities.clone();
                order.shuffle(&mut StdRng::seed_from_u64(seed));
                half_sort(order)
            })
            .collect();

        let best_distance = population
            .iter()
            .map(Tour::distance)
            .fold(f64::INFINITY, f64::min);

        log::info!(
            "search: init n={} population={} operators={} seed={} best={best_distance:.4}",
            cities.len(),
            population.len(),
            config.operators,
            config.seed,
        );

        Ok(Self {
            population,
            best_distance,
            operators: config.operators,
            rng,
            steps: 0,
            started: None,
        })
    }

    pub fn best_distance(&self) -> f64 {
        self.best_distance
    }

    pub fn best_tour(&self) -> &Tour {
        // `new` guarantees at least one slot
        let mut best = &self.population[0];
        for tour in &self.population[1..] {
            if tour.distance() < best.distance() {
                best = tour;
            }
        }
        best
    }

    pub fn population(&self) -> &[Tour] {
        &self.population
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Runs until the observer fails.
    pub fn run<O: SearchObserver + ?Sized>(&mut self, observer: &mut O) -> Result<Infallible> {
        loop {
            self.step(observer)?;
        }
    }

    pub fn run_steps<O: SearchObserver + ?Sized>(
        &mut self,
        steps: u64,
        observer: &mut O,
    ) -> Result<()> {
        for _ in 0..steps {
            self.step(observer)?;
        }
        Ok(())
    }

    pub fn step<O: SearchObserver + ?Sized>(&mut self, observer: &mut O) -> Result<()> {
        let started = *self.started.get_or_insert_with(Instant::now);
        self.steps += 1;

        let idx = self.rng.random_range(0..self.population.len());
        let current = &self.population[idx];
        let winner = match self.operators {
            OperatorSet::Pair => {
                let symmetric = Perturbation::SymmetricSwap.apply(current, &mut self.rng);
                let independent = Perturbation::IndependentSwap.apply(current, &mut self.rng);
                match accept_pair(
                    current.distance(),
                    symmetric.distance(),
                    independent.distance(),
                ) {
                    Accepted::Current => None,
                    Accepted::Symmetric => Some(symmetric),
                    Accepted::Independent => Some(independent),
                }
            }
            OperatorSet::Extended => Perturbation::EXTENDED
                .iter()
                .map(|op| op.apply(current, &mut self.rng))
                .min_by(|a, b| a.distance().total_cmp(&b.distance()))
                .filter(|best| best.distance() < current.distance()),
        };

        let Some(winner) = winner else {
            return Ok(());
        };
        let improved = winner.distance() < self.best_distance;
        self.population[idx] = winner;
        if !improved {
            return Ok(());
        }

        let tour = &self.population[idx];
        self.best_distance = tour.distance();
        let improvement = Improvement {
            step: self.steps,
            distance: self.best_distance,
            elapsed: started.elapsed(),
        };

        if log::log_enabled!(log::Level::Debug) {
            let metrics = tour.metrics(SPIKE_THRESHOLD_FACTOR);
            log::debug!(
                "search: improved step={} slot={idx} best={:.4} longest={:.4} avg={:.4} spikes={}",
                improvement.step,
                improvement.distance,
                metrics.longest,
                metrics.average,
                metrics.spikes,
            );
        }

        observer.observe(&improvement)
    }
}
