use std::{io::Write, path::PathBuf};

use crate::{
    iolog::IologWriter,
    trace_parser::{BinTraceParser, IoRecord, Operation},
    ConvError, ConvResult,
};

/// Counters gathered while converting one trace.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertStats {
    pub records: usize,
    pub reads: usize,
    pub writes: usize,
    /// bytes of a truncated record left at the end of the trace
    pub trailing_bytes: usize,
}

impl ConvertStats {
    fn count(&mut self, record: &IoRecord) {
        self.records += 1;
        match record.op() {
            Operation::Read => self.reads += 1,
            Operation::Write => self.writes += 1,
        }
    }
}

impl std::fmt::Display for ConvertStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "records: {}, reads: {}, writes: {}, trailing bytes: {}",
            self.records, self.reads, self.writes, self.trailing_bytes
        )
    }
}

/// Converts a binary trace into a fio iolog.
#[derive(Debug, Default)]
pub struct Converter {
    input: Option<PathBuf>,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&mut self, input: impl AsRef<std::path::Path>) -> &mut Self {
        self.input = Some(input.as_ref().to_path_buf());
        self
    }

    /// Write the iolog of the input trace to `out`.
    ///
    /// Nothing is written if the input cannot be opened.
    pub fn run<W: Write>(&self, out: W) -> ConvResult<ConvertStats> {
        let input = self
            .input
            .as_deref()
            .ok_or_else(|| ConvError::invalid_arg("input trace not set"))?;
        let mut parser = BinTraceParser::open(input)?;
        let mut writer = IologWriter::new(out);
        let mut stats = ConvertStats::default();
        writer.header()?;
        for record in parser.by_ref() {
            stats.count(&record);
            writer.record(&record)?;
        }
        stats.trailing_bytes = parser.trailing_bytes();
        if stats.trailing_bytes != 0 {
            log::debug!(
                "ignored {} trailing bytes of {}",
                stats.trailing_bytes,
                input.display()
            );
        }
        writer.footer()?;
        Ok(stats)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn write_trace(dir: &std::path::Path, records: &[IoRecord], extra: &[u8]) -> PathBuf {
        let path = dir.join("trace.bin");
        let mut data = Vec::new();
        records.iter().for_each(|r| r.encode(&mut data));
        data.extend_from_slice(extra);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_convert() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_trace(
            dir.path(),
            &[IoRecord::new(1, 4096, 0), IoRecord::new(100, 512, 1)],
            &[],
        );
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 26);
        let mut out = Vec::new();
        let stats = Converter::new().input(&path).run(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "fio version 2 iolog
/dev/mapper/dm_foo add
/dev/mapper/dm_foo open
/dev/mapper/dm_foo read 512 4096
/dev/mapper/dm_foo write 51200 512
/dev/mapper/dm_foo close
"
        );
        assert_eq!(
            stats,
            ConvertStats {
                records: 2,
                reads: 1,
                writes: 1,
                trailing_bytes: 0
            }
        );
    }

    #[test]
    fn test_convert_empty_and_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_trace(dir.path(), &[], &[0; 12]);
        let mut out = Vec::new();
        let stats = Converter::new().input(&path).run(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "fio version 2 iolog
/dev/mapper/dm_foo add
/dev/mapper/dm_foo open
/dev/mapper/dm_foo close
"
        );
        assert_eq!(stats.records, 0);
        assert_eq!(stats.trailing_bytes, 12);
    }

    #[test]
    fn test_convert_random() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let records = (0..500)
            .map(|_| IoRecord::new(rng.gen(), rng.gen(), rng.gen()))
            .collect::<Vec<_>>();
        let dir = tempfile::tempdir().unwrap();
        let path = write_trace(dir.path(), &records, &[1, 2, 3]);
        let mut out = Vec::new();
        let stats = Converter::new().input(&path).run(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), records.len() + 4);
        assert_eq!(lines.last(), Some(&"/dev/mapper/dm_foo close"));
        lines[3..lines.len() - 1]
            .iter()
            .zip(records.iter())
            .for_each(|(line, r)| {
                let fields = line.split(' ').collect::<Vec<_>>();
                assert_eq!(fields.len(), 4);
                assert_eq!(fields[0], "/dev/mapper/dm_foo");
                assert_eq!(fields[1], if r.io_type == 0 { "read" } else { "write" });
                assert_eq!(fields[2].parse::<u64>().unwrap(), r.offset.wrapping_mul(512));
                assert_eq!(fields[3].parse::<u32>().unwrap(), r.size);
            });
        assert_eq!(stats.reads + stats.writes, records.len());
        assert_eq!(stats.trailing_bytes, 3);
    }

    #[test]
    fn test_convert_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = Converter::new()
            .input(dir.path().join("nope.bin"))
            .run(&mut out)
            .unwrap_err();
        assert!(matches!(err, ConvError::Open { .. }));
        assert!(out.is_empty());
        assert!(matches!(
            Converter::new().run(&mut out),
            Err(ConvError::InvalidArg(_))
        ));
    }
}
