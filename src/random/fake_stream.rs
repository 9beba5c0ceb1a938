use crate::random::RandomNumberStream;

// Replays a fixed sequence of random numbers so that sampling routines can be
// checked against known outcomes.
#[derive(Debug, Clone)]
pub struct FakeStream {
    values: Vec<f64>,
    index: usize,
}

impl FakeStream {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, index: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.values.len() - self.index
    }
}

impl RandomNumberStream for FakeStream {
    fn random_number(&mut self) -> f64 {
        if self.index >= self.values.len() {
            panic!("FakeStream: Ran out of values to return");
        }
        let value = self.values[self.index];
        self.index += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_values_in_order() {
        let mut stream = FakeStream::new(vec![0.1, 0.5, 0.9]);
        assert_eq!(stream.random_number(), 0.1);
        assert_eq!(stream.random_number(), 0.5);
        assert_eq!(stream.remaining(), 1);
        assert_eq!(stream.random_number(), 0.9);
        assert_eq!(stream.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "Ran out of values")]
    fn test_panics_when_exhausted() {
        let mut stream = FakeStream::new(vec![0.5]);
        stream.random_number();
        stream.random_number();
    }
}
