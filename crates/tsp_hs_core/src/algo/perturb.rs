use rand::{Rng, seq::SliceRandom};

use crate::{City, Tour, algo::construct::half_sort};

/// A single modification of a tour's order. The modified order is only a seed:
/// [`Perturbation::apply`] always rebuilds it with [`half_sort`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Perturbation {
    /// Swap `i` in `[0, n/2)` with its mirror `n - i - 1`.
    SymmetricSwap,
    /// Swap `i` in `[0, n/2)` with an unrelated `j` in `[n/2, n)`.
    IndependentSwap,
    /// Move the city at `i` in `[0, n/2)` to the end.
    FrontToBack,
    /// Move the city at `i` in `[n/2, n)` to the front.
    BackToFront,
    /// Random permutation of the whole tour.
    Reshuffle,
}

impl Perturbation {
    pub const PAIR: [Self; 2] = [Self::SymmetricSwap, Self::IndependentSwap];
    pub const EXTENDED: [Self; 5] = [
        Self::SymmetricSwap,
        Self::IndependentSwap,
        Self::FrontToBack,
        Self::BackToFront,
        Self::Reshuffle,
    ];

    /// Builds a new tour; `tour` itself is left untouched.
    pub fn apply<R: Rng + ?Sized>(self, tour: &Tour, rng: &mut R) -> Tour {
        half_sort(self.reorder(tour.cities(), rng))
    }

    /// The perturbed order before reconstruction. Sequences shorter than two
    /// cities have nothing to perturb and are returned as-is.
    pub(crate) fn reorder<R: Rng + ?Sized>(self, cities: &[City], rng: &mut R) -> Vec<City> {
        let mut order = cities.to_vec();
        let len = order.len();
        if len < 2 {
            return order;
        }

        match self {
            Self::SymmetricSwap => {
                let (i, j) = symmetric_pair(len, rng);
                order.swap(i, j);
            }
            Self::IndependentSwap => {
                let (i, j) = independent_pair(len, rng);
                order.swap(i, j);
            }
            Self::FrontToBack => {
                let city = order.remove(rng.random_range(0..len / 2));
                order.push(city);
            }
            Self::BackToFront => {
                let city = order.remove(rng.random_range(len / 2..len));
                order.insert(0, city);
            }
            Self::Reshuffle => order.shuffle(rng),
        }
        order
    }
}

/// For odd `len` the middle index `len / 2` is never chosen.
pub(crate) fn symmetric_pair<R: Rng + ?Sized>(len: usize, rng: &mut R) -> (usize, usize) {
    let i = rng.random_range(0..len / 2);
    (i, len - i - 1)
}

/// `j` ranges over the whole second half, middle index included.
pub(crate) fn independent_pair<R: Rng + ?Sized>(len: usize, rng: &mut R) -> (usize, usize) {
    let i = rng.random_range(0..len / 2);
    let j = rng.random_range(len / 2..len);
    (i, j)
}
