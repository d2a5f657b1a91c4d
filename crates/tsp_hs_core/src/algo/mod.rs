pub mod construct;
pub mod perturb;
pub mod search;
