use crate::City;

/// A closed visiting order over every city, with its cached cyclic length.
///
/// The length always includes the edge from the last city back to the first.
/// It is computed once when the tour is built and never patched afterwards;
/// every change of order goes through a new `Tour`.
#[derive(Clone, Debug)]
pub struct Tour {
    cities: Vec<City>,
    distance: f64,
}

impl Tour {
    pub fn new(cities: Vec<City>) -> Self {
        let distance = cycle_length(&cities);
        Self { cities, distance }
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn into_cities(self) -> Vec<City> {
        self.cities
    }

    pub fn metrics(&self, threshold_factor: f64) -> TourMetrics {
        let n = self.len();
        if n < 2 {
            return TourMetrics::default();
        }

        let edges: Vec<f64> = (0..n)
            .map(|i| self.cities[i].dist(&self.cities[(i + 1) % n]))
            .collect();
        let total: f64 = edges.iter().sum();
        let average = total / n as f64;
        let threshold = average * threshold_factor;

        TourMetrics {
            total,
            longest: edges.iter().copied().fold(0.0_f64, f64::max),
            average,
            threshold,
            spikes: edges.iter().filter(|d| **d > threshold).count(),
        }
    }
}

/// Edge statistics of a tour, used for debug logging.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TourMetrics {
    pub total: f64,
    pub longest: f64,
    pub average: f64,
    pub threshold: f64,
    pub spikes: usize,
}

/// Sum of consecutive distances plus the closing edge from last to first.
pub(crate) fn cycle_length(cities: &[City]) -> f64 {
    let (Some(first), Some(last)) = (cities.first(), cities.last()) else {
        return 0.0;
    };
    cities.windows(2).map(|w| w[0].dist(&w[1])).sum::<f64>() + last.dist(first)
}

#[cfg(test)]
mod tests {
    use super::{Tour, cycle_length};
    use crate::City;

    fn square() -> Vec<City> {
        vec![
            City::new("A", 0.0, 0.0),
            City::new("B", 10.0, 0.0),
            City::new("C", 10.0, 10.0),
            City::new("D", 0.0, 10.0),
        ]
    }

    #[test]
    fn new_caches_cyclic_length() {
        let tour = Tour::new(square());
        assert_eq!(tour.distance(), 40.0);
        assert_eq!(tour.len(), 4);
    }

    #[test]
    fn cycle_length_closes_the_loop() {
        let path = vec![City::new("a", 0.0, 0.0), City::new("b", 3.0, 4.0)];
        // there and back
        assert_eq!(cycle_length(&path), 10.0);
    }

    #[test]
    fn cycle_length_of_trivial_sequences_is_zero() {
        assert_eq!(cycle_length(&[]), 0.0);
        assert_eq!(cycle_length(&[City::new("a", 5.0, 5.0)]), 0.0);
    }

    #[test]
    fn metrics_report_longest_edge_and_spikes() {
        let cities = vec![
            City::new("a", 0.0, 0.0),
            City::new("b", 1.0, 0.0),
            City::new("c", 2.0, 0.0),
            City::new("d", 100.0, 0.0),
        ];
        let tour = Tour::new(cities);

        let metrics = tour.metrics(1.5);
        assert_eq!(metrics.total, 200.0);
        assert_eq!(metrics.longest, 100.0);
        assert_eq!(metrics.average, 50.0);
        assert_eq!(metrics.threshold, 75.0);
        assert_eq!(metrics.spikes, 2);
    }

    #[test]
    fn metrics_are_empty_below_two_cities() {
        let tour = Tour::new(vec![City::new("a", 1.0, 1.0)]);
        assert_eq!(tour.metrics(10.0).spikes, 0);
        assert_eq!(tour.metrics(10.0).total, 0.0);
    }
}
