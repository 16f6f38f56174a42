mod calculation;

pub use calculation::{Calculation, NewCalculation};
