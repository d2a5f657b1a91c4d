//! Half-sort tour construction.
//!
//! The sequence is split at `mid = n / 2`. Each half is stable-sorted by
//! ascending distance to its own first city (`seq[0]` and `seq[mid]`), and the
//! halves are joined in order. Anchors are read before either half moves, and
//! since an anchor is at distance zero from itself it stays at the front of
//! its half. Equal distances keep their input order, so the result depends only
//! on the input ordering.

use crate::{City, Tour};

pub fn half_sort(mut cities: Vec<City>) -> Tour {
    let mid = cities.len() / 2;
    let (first, second) = cities.split_at_mut(mid);
    sort_by_anchor(first);
    sort_by_anchor(second);
    Tour::new(cities)
}

fn sort_by_anchor(half: &mut [City]) {
    let Some(anchor) = half.first().cloned() else {
        return;
    };
    // slice::sort_by is stable
    half.sort_by(|a, b| a.dist(&anchor).total_cmp(&b.dist(&anchor)));
}
