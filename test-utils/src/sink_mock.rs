use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// In-memory capture sink that stays readable after being moved into a session.
#[derive(Clone, Debug, Default)]
pub struct SharedSink {
    buffer: Arc<Mutex<Vec<u8>>>,
    failing: bool,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose every write fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.failing {
            return Err(io::Error::new(io::ErrorKind::Other, "sink unavailable"));
        }
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
