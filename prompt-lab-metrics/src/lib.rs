pub mod analysis;
pub mod calculators;
pub mod statistical;

pub use analysis::*;
pub use calculators::*;
pub use statistical::*;
