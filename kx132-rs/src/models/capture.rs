use std::path::PathBuf;

use common::{AcquisitionMode, Sample, TriggerConfig};

/// Upper bound on the samples reserved up front. The count comes from the device.
const MAX_RESERVED_SAMPLES: u32 = 1 << 16;

/// Trigger-gated capture episode while it is being read from the device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureBlock {
    id: u32,
    normalized: Sample,
    sample_count: u32,
    trigger_index: u32,
    samples: Vec<Sample>,
    trigger: TriggerConfig,
}

impl CaptureBlock {
    pub fn new(
        id: u32,
        normalized: Sample,
        sample_count: u32,
        trigger_index: u32,
        trigger: TriggerConfig,
    ) -> Self {
        Self {
            id,
            normalized,
            sample_count,
            trigger_index,
            samples: Vec::with_capacity(sample_count.min(MAX_RESERVED_SAMPLES) as usize),
            trigger,
        }
    }

    /// Appends a sample and returns its 1-based position in the block.
    pub fn push(&mut self, sample: Sample) -> usize {
        self.samples.push(sample);
        self.samples.len()
    }

    pub fn is_complete(&self) -> bool {
        self.samples.len() >= self.sample_count as usize
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn normalized(&self) -> Sample {
        self.normalized
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn trigger_index(&self) -> u32 {
        self.trigger_index
    }

    pub fn trigger(&self) -> &TriggerConfig {
        &self.trigger
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Closes the block. No sample can be appended afterwards.
    pub fn seal(self) -> SealedBlock {
        SealedBlock(self)
    }
}

/// Capture block whose sample count is exhausted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedBlock(CaptureBlock);

impl SealedBlock {
    pub fn id(&self) -> u32 {
        self.0.id
    }

    pub fn sample_count(&self) -> u32 {
        self.0.sample_count
    }

    pub fn trigger_index(&self) -> u32 {
        self.0.trigger_index
    }

    pub fn samples(&self) -> &[Sample] {
        &self.0.samples
    }
}

/// Outcome of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: AcquisitionMode,
    /// Data rows written in stream mode.
    pub rows_written: u64,
    /// Blocks written completely in triggered mode.
    pub blocks_written: u32,
    /// Reads taken after the stop signal and dropped without being recorded.
    pub discarded_reads: u32,
    pub output: Option<PathBuf>,
}

impl RunSummary {
    pub(crate) fn new(mode: AcquisitionMode) -> Self {
        Self {
            mode,
            rows_written: 0,
            blocks_written: 0,
            discarded_reads: 0,
            output: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_fills_up_to_sample_count() {
        let mut block = CaptureBlock::new(1, Sample::new(1, 2, 3), 2, 1, TriggerConfig::default());
        assert!(!block.is_complete());

        assert_eq!(block.push(Sample::new(4, 5, 6)), 1);
        assert_eq!(block.push(Sample::new(7, 8, 9)), 2);
        assert!(block.is_complete());

        let sealed = block.seal();
        assert_eq!(sealed.id(), 1);
        assert_eq!(sealed.samples().len(), 2);
        assert_eq!(sealed.trigger_index(), 1);
    }

    #[test]
    fn test_empty_block_is_complete() {
        let block = CaptureBlock::new(4, Sample::default(), 0, 0, TriggerConfig::default());
        assert!(block.is_complete());
        assert_eq!(block.seal().sample_count(), 0);
    }

    #[test]
    fn test_huge_sample_count_is_not_reserved() {
        let mut block =
            CaptureBlock::new(1, Sample::default(), u32::MAX, 0, TriggerConfig::default());
        assert!(block.samples.capacity() <= MAX_RESERVED_SAMPLES as usize);
        assert!(!block.is_complete());

        assert_eq!(block.push(Sample::new(1, 1, 1)), 1);
        assert_eq!(block.sample_count(), u32::MAX);
    }
}
