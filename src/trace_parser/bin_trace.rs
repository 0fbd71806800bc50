use std::{fs::File, io::Read};

use crate::{
    trace_parser::{IoRecord, RECORD_SIZE},
    ConvError, ConvResult,
};

/// Iterates the fixed-width records of a binary trace.
///
/// Iteration ends at the first record that cannot be read in full, whether
/// because of end-of-file or a read error. The leftover bytes of a truncated
/// record are reported by [`BinTraceParser::trailing_bytes`].
pub struct BinTraceParser<R = std::io::BufReader<File>> {
    trace_file: R,
    buf: [u8; RECORD_SIZE],
    trailing: usize,
    done: bool,
}

impl BinTraceParser {
    pub fn open(path: &std::path::Path) -> ConvResult<Self> {
        let f = File::open(path).map_err(|e| ConvError::open(path, e))?;
        Ok(Self::from_reader(std::io::BufReader::new(f)))
    }
}

impl<R: Read> BinTraceParser<R> {
    pub fn from_reader(reader: R) -> Self {
        BinTraceParser {
            trace_file: reader,
            buf: [0; RECORD_SIZE],
            trailing: 0,
            done: false,
        }
    }

    /// Number of bytes ignored after the last complete record.
    /// Only meaningful once the iterator is exhausted.
    pub fn trailing_bytes(&self) -> usize {
        self.trailing
    }

    /// Fill the record buffer, returning how many bytes were read.
    fn fill(&mut self) -> usize {
        let mut filled = 0;
        while filled < RECORD_SIZE {
            match self.trace_file.read(&mut self.buf[filled..]) {
                Ok(0) => break, // EOF
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::debug!("read error treated as end of trace: {e}");
                    break;
                }
            }
        }
        filled
    }
}

impl<R: Read> Iterator for BinTraceParser<R> {
    type Item = IoRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let filled = self.fill();
        if filled < RECORD_SIZE {
            self.done = true;
            self.trailing = filled;
            return None;
        }
        Some(IoRecord::decode(&self.buf))
    }
}
