use crate::error::Result;

/// A scoring function over borrowed input, producing an aggregate output.
pub trait MetricCalculator {
    type Input: ?Sized;
    type Output;

    fn calculate(&self, input: &Self::Input) -> Result<Self::Output>;
}
