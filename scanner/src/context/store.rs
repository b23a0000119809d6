// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

/// The latest reading for every plan position.
///
/// Created once and overwritten in place. A slot keeps its previous value
/// when a measurement fails, so a row always has one value per position.
#[derive(Debug)]
pub struct SampleBuffer {
    samples: Vec<i32>,
}

impl SampleBuffer {
    pub fn new(positions: usize) -> Self {
        Self {
            samples: vec![0; positions],
        }
    }

    pub fn record(&mut self, position: usize, strength: i32) {
        if let Some(slot) = self.samples.get_mut(position) {
            *slot = strength;
        }
    }

    #[cfg(test)]
    pub fn get(&self, position: usize) -> Option<i32> {
        self.samples.get(position).copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Readings in position order with `offset` added.
    pub fn row(&self, offset: i32) -> Vec<i32> {
        self.samples.iter().map(|s| s.saturating_add(offset)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_overwrites_in_place() {
        let mut buffer = SampleBuffer::new(3);
        buffer.record(1, -40);
        buffer.record(1, -20);
        buffer.record(7, 5);
        assert_eq!(buffer.get(1), Some(-20));
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.row(60), vec![60, 40, 60]);
    }
}
