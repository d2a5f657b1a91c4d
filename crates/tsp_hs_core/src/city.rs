use std::{fmt, sync::Arc};

/// A named point in the plane.
///
/// The name is an opaque label carried along for output; it never takes part
/// in distance computations. Cloning only bumps the name's reference count.
#[derive(Clone, Debug, PartialEq)]
pub struct City {
    name: Arc<str>,
    pub x: f64,
    pub y: f64,
}

impl City {
    pub fn new(name: impl Into<Arc<str>>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }

    /// Placeholder for the first city of the reference input layout, which
    /// never reads coordinates for it.
    pub fn origin() -> Self {
        Self::new("origin", 0.0, 0.0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Euclidean distance.
    #[inline]
    pub fn dist(&self, rhs: &Self) -> f64 {
        let dx = self.x - rhs.x;
        let dy = self.y - rhs.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bx = ryu::Buffer::new();
        let mut by = ryu::Buffer::new();
        write!(f, "{} {} {}", bx.format(self.x), by.format(self.y), self.name)
    }
}
