//! Arithmetic mean of sample sequences.

pub trait Average {
    type Result;
    fn average(self) -> Self::Result;
}

/// `None` for an empty slice.
impl Average for &[f64] {
    type Result = Option<f64>;
    fn average(self) -> Self::Result {
        if self.is_empty() {
            None
        } else {
            Some(self.iter().sum::<f64>() / self.len() as f64)
        }
    }
}

/// `None` for an empty slice or if any value is missing; partial
/// means are never computed.
impl Average for &[Option<f64>] {
    type Result = Option<f64>;
    fn average(self) -> Self::Result {
        let values: Option<Vec<f64>> = self.iter().copied().collect();
        values?.as_slice().average()
    }
}
