//! Writer for the fio "version 2" iolog replay format.

use std::io::{BufWriter, Write};

use crate::{trace_parser::IoRecord, ConvResult};

pub const IOLOG_VERSION_LINE: &str = "fio version 2 iolog";

/// Device every event is attributed to.
pub const DEVICE_NAME: &str = "/dev/mapper/dm_foo";

pub struct IologWriter<W: Write> {
    out: BufWriter<W>,
}

impl<W: Write> IologWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: BufWriter::new(out),
        }
    }

    /// Version line followed by the device `add` and `open` events.
    pub fn header(&mut self) -> ConvResult<()> {
        writeln!(self.out, "{IOLOG_VERSION_LINE}")?;
        writeln!(self.out, "{DEVICE_NAME} add")?;
        writeln!(self.out, "{DEVICE_NAME} open")?;
        Ok(())
    }

    pub fn record(&mut self, record: &IoRecord) -> ConvResult<()> {
        writeln!(
            self.out,
            "{DEVICE_NAME} {} {} {}",
            record.op(),
            record.byte_offset(),
            record.size
        )?;
        Ok(())
    }

    /// Device `close` event. Flushes the underlying writer.
    pub fn footer(&mut self) -> ConvResult<()> {
        writeln!(self.out, "{DEVICE_NAME} close")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> ConvResult<W> {
        self.out
            .into_inner()
            .map_err(|e| crate::ConvError::Io(e.into_error()))
    }
}
