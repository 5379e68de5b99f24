pub mod point;
pub mod vector;

/// Geometric precision (display units)
const EPS: f64 = 1e-13;
