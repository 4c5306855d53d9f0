//! Capture record serialization.
//!
//! A record is plain UTF-8 text. Stream runs write one header followed by indexed rows;
//! triggered runs write one `START_OF_BLOCK_<n>` .. `END_OF_BLOCK_<n>` section per
//! captured block. Every record is flushed as soon as it is written.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::{Clock, InitConfig, Sample};

use crate::constants::{FILE_TIMESTAMP_FORMAT, RECORD_TIMESTAMP_FORMAT};
use crate::models::capture::CaptureBlock;
use crate::models::errors::Kx132Error;

fn column_header() -> String {
    format!("{:>6},{:>6},{:>6},{:>6}\n", "index", "x", "y", "z")
}

fn row(index: u64, sample: Sample) -> String {
    format!(
        "{:>6},{:>6},{:>6},{:>6}\n",
        index,
        sample.x(),
        sample.y(),
        sample.z()
    )
}

/// Append-only writer of capture records.
pub struct CaptureRecorder<W: Write> {
    sink: W,
    init: InitConfig,
    clock: Arc<dyn Clock>,
}

impl<W: Write> CaptureRecorder<W> {
    pub fn new(sink: W, init: InitConfig, clock: Arc<dyn Clock>) -> Self {
        Self { sink, init, clock }
    }

    fn write_record(&mut self, record: &str) -> Result<(), Kx132Error> {
        self.sink
            .write_all(record.as_bytes())
            .and_then(|_| self.sink.flush())
            .map_err(Kx132Error::SinkWrite)
    }

    fn timestamp(&self) -> String {
        self.clock.now().format(RECORD_TIMESTAMP_FORMAT).to_string()
    }

    /// Writes the header of a stream run. Called once, before the first row.
    pub fn write_stream_header(&mut self) -> Result<(), Kx132Error> {
        let mut record = String::new();
        record.push_str(&format!("{}\n", self.timestamp()));
        record.push_str(&format!("Modus:             {}\n", self.init.mode));
        record.push_str(&format!("Frequenz:          {}\n", self.init.odr));
        record.push_str(&format!("Empfindlichkeit:   {}\n", self.init.g_range));
        record.push('\n');
        record.push_str(&column_header());
        self.write_record(&record)
    }

    /// Writes one data row. `index` is 1-based.
    pub fn write_row(&mut self, index: u64, sample: Sample) -> Result<(), Kx132Error> {
        self.write_record(&row(index, sample))
    }

    /// Writes everything of a block up to and including the column header.
    pub fn write_block_header(&mut self, block: &CaptureBlock) -> Result<(), Kx132Error> {
        let trigger = block.trigger();
        let normalized = block.normalized();
        let thresholds = trigger.thresholds;

        let mut record = String::new();
        record.push_str(&format!("START_OF_BLOCK_{}\n\n", block.id()));
        record.push_str(&format!("{}\n", self.timestamp()));
        record.push_str(&format!("Modus:                     {}\n", self.init.mode));
        record.push_str(&format!("Frequenz:                  {}\n", self.init.odr));
        record.push_str(&format!("Empfindlichkeit:           {}\n", self.init.g_range));
        record.push('\n');
        record.push_str(&format!("Trigger-Modus:             {}\n", trigger.trigger_mode));
        record.push_str(&format!("Flankenerkennung:          {}\n", trigger.edge));
        record.push_str(&format!("Logik:                     {}\n", trigger.logic));
        record.push_str(&format!("Bitmaske:                  {}\n", trigger.axes));
        record.push('\n');
        record.push_str(&format!("Zeit vor Trigger  (ms): {}\n", trigger.time_before_ms));
        record.push_str(&format!("Zeit nach Trigger (ms): {}\n", trigger.time_after_ms));
        record.push('\n');
        record.push_str(&format!("X_Normalized:  {:>6}\n", normalized.x()));
        record.push_str(&format!("Y_Normalized:  {:>6}\n", normalized.y()));
        record.push_str(&format!("Z_Normalized:  {:>6}\n", normalized.z()));
        record.push('\n');
        record.push_str(&format!("X_Threshold:   {:>6}\n", thresholds.x));
        record.push_str(&format!("Y_Threshold:   {:>6}\n", thresholds.y));
        record.push_str(&format!("Z_Threshold:   {:>6}\n", thresholds.z));
        record.push('\n');
        record.push_str(&format!("Anzahl Samples:    {}\n", block.sample_count()));
        record.push_str(&format!("Trigger bei Index: {}\n", block.trigger_index()));
        record.push('\n');
        record.push_str(&column_header());
        self.write_record(&record)
    }

    pub fn write_block_trailer(&mut self, block_id: u32) -> Result<(), Kx132Error> {
        self.write_record(&format!("\nEND_OF_BLOCK_{}\n\n", block_id))
    }

    /// Flushes and releases the sink.
    pub fn close(mut self) -> Result<(), Kx132Error> {
        self.sink.flush().map_err(Kx132Error::SinkWrite)
    }
}

/// `<name>_<DD>_<MM>_<YYYY>__<HH>_<MM>_<SS>.txt`
pub fn output_file_name(name: &str, clock: &dyn Clock) -> String {
    format!("{}_{}.txt", name, clock.now().format(FILE_TIMESTAMP_FORMAT))
}

/// Creates the output directory if needed and opens a fresh output file in it.
pub fn create_output_file(
    directory: &Path,
    name: &str,
    clock: &dyn Clock,
) -> Result<(File, PathBuf), Kx132Error> {
    std::fs::create_dir_all(directory).map_err(Kx132Error::SinkWrite)?;
    let path = directory.join(output_file_name(name, clock));
    let file = File::create(&path).map_err(Kx132Error::SinkWrite)?;
    log::info!("Recording to {}", path.display());
    Ok((file, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{AcquisitionMode, FixedClock, Thresholds, TriggerConfig};
    use once_cell::sync::Lazy;

    // 2024-03-05 14:07:09 UTC
    static CLOCK: Lazy<Arc<dyn Clock>> =
        Lazy::new(|| Arc::new(FixedClock::from_timestamp(1_709_647_629).unwrap()));

    fn recorder(mode: AcquisitionMode) -> CaptureRecorder<Vec<u8>> {
        let init = InitConfig {
            mode,
            ..InitConfig::default()
        };
        CaptureRecorder::new(Vec::new(), init, CLOCK.clone())
    }

    fn text(recorder: CaptureRecorder<Vec<u8>>) -> String {
        String::from_utf8(recorder.sink).unwrap()
    }

    #[test]
    fn test_stream_header_and_rows() {
        let mut recorder = recorder(AcquisitionMode::Stream);
        recorder.write_stream_header().unwrap();
        recorder.write_row(1, Sample::new(1, 2, 3)).unwrap();
        recorder.write_row(2, Sample::new(-4, 5, -32768)).unwrap();

        assert_eq!(
            text(recorder),
            "2024-03-05 14:07:09.000000\n\
             Modus:             Stream\n\
             Frequenz:          25600 Hz\n\
             Empfindlichkeit:   8 g\n\
             \n \
             index,     x,     y,     z\n     \
             1,     1,     2,     3\n     \
             2,    -4,     5,-32768\n"
        );
    }

    #[test]
    fn test_block_layout() {
        let trigger = TriggerConfig {
            thresholds: Thresholds::new(100, 32000, 8000),
            ..TriggerConfig::default()
        };
        let mut block = CaptureBlock::new(3, Sample::new(10, -20, 4096), 2, 1, trigger);
        block.push(Sample::new(1, 1, 1));
        block.push(Sample::new(2, 2, 2));

        let mut recorder = recorder(AcquisitionMode::Triggered);
        recorder.write_block_header(&block).unwrap();
        for (i, sample) in block.samples().iter().enumerate() {
            recorder.write_row(i as u64 + 1, *sample).unwrap();
        }
        recorder.write_block_trailer(block.id()).unwrap();

        let expected = [
            "START_OF_BLOCK_3",
            "",
            "2024-03-05 14:07:09.000000",
            "Modus:                     Triggered",
            "Frequenz:                  25600 Hz",
            "Empfindlichkeit:           8 g",
            "",
            "Trigger-Modus:             offset",
            "Flankenerkennung:          both",
            "Logik:                     AND",
            "Bitmaske:                  X",
            "",
            "Zeit vor Trigger  (ms): 1",
            "Zeit nach Trigger (ms): 10",
            "",
            "X_Normalized:      10",
            "Y_Normalized:     -20",
            "Z_Normalized:    4096",
            "",
            "X_Threshold:      100",
            "Y_Threshold:    32000",
            "Z_Threshold:     8000",
            "",
            "Anzahl Samples:    2",
            "Trigger bei Index: 1",
            "",
            " index,     x,     y,     z",
            "     1,     1,     1,     1",
            "     2,     2,     2,     2",
            "",
            "END_OF_BLOCK_3",
            "",
            "",
        ]
        .join("\n");
        assert_eq!(text(recorder), expected);
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("kx132_output", CLOCK.as_ref()),
            "kx132_output_05_03_2024__14_07_09.txt"
        );
    }

    #[test]
    fn test_create_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");
        let (_file, path) = create_output_file(&target, "run", CLOCK.as_ref()).unwrap();

        assert!(path.exists());
        assert_eq!(path.parent(), Some(target.as_path()));
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_sink_error() {
        let mut recorder =
            CaptureRecorder::new(BrokenSink, InitConfig::default(), CLOCK.clone());
        let result = recorder.write_row(1, Sample::default());

        assert!(matches!(result, Err(Kx132Error::SinkWrite(_))));
    }
}
