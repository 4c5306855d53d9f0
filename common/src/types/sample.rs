use crate::constants::N_AXES;

/// Accelerometer axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; N_AXES] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of the axis in a reading, starting at 0.
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis number as reported to users, starting at 1 (1=X, 2=Y, 3=Z).
    pub fn number(&self) -> usize {
        self.index() + 1
    }
}

/// One instantaneous 3-axis reading, in raw device counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Sample {
    x: i16,
    y: i16,
    z: i16,
}

impl Sample {
    pub fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    pub fn x(&self) -> i16 {
        self.x
    }

    pub fn y(&self) -> i16 {
        self.y
    }

    pub fn z(&self) -> i16 {
        self.z
    }

    pub fn get(&self, axis: Axis) -> i16 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn inner(&self) -> [i16; N_AXES] {
        [self.x, self.y, self.z]
    }
}

impl From<[i16; N_AXES]> for Sample {
    fn from(value: [i16; N_AXES]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<(i16, i16, i16)> for Sample {
    fn from(value: (i16, i16, i16)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<Sample> for [i16; N_AXES] {
    fn from(value: Sample) -> Self {
        value.inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_new() {
        let sample = Sample::new(1, -2, 3);

        assert_eq!(sample.x(), 1);
        assert_eq!(sample.y(), -2);
        assert_eq!(sample.z(), 3);
        assert_eq!(sample.inner(), [1, -2, 3]);
    }

    #[test]
    fn test_sample_default_is_zero() {
        assert_eq!(Sample::default(), Sample::new(0, 0, 0));
    }

    #[test]
    fn test_sample_get_by_axis() {
        let sample = Sample::from((i16::MIN, 0, i16::MAX));

        assert_eq!(sample.get(Axis::X), i16::MIN);
        assert_eq!(sample.get(Axis::Y), 0);
        assert_eq!(sample.get(Axis::Z), i16::MAX);
    }

    #[test]
    fn test_axis_numbering() {
        let numbers: Vec<usize> = Axis::ALL.iter().map(|axis| axis.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
