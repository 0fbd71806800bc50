use std::{fs::File, io::BufRead};

use crate::{trace_parser::IoRecord, ConvError, ConvResult};

/// One line of a Tencent block trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeTrace {
    pub timestamp: u64,
    pub record: IoRecord,
    pub volume_id: u64,
}

/// Parses Tencent block traces, one `timestamp,offset,size,io_type,volume_id` per line.
pub struct TencentTraceParser<R = std::io::BufReader<File>> {
    trace_file: R,
    source: String,
    line_no: usize,
    buf: Vec<u8>,
}

impl TencentTraceParser {
    pub fn open(path: &std::path::Path) -> ConvResult<Self> {
        let f = File::open(path).map_err(|e| ConvError::open(path, e))?;
        Ok(Self::from_reader(
            std::io::BufReader::new(f),
            path.display().to_string(),
        ))
    }
}

impl<R: BufRead> TencentTraceParser<R> {
    /// `source` names the input in error messages.
    pub fn from_reader(reader: R, source: impl ToString) -> Self {
        TencentTraceParser {
            trace_file: reader,
            source: source.to_string(),
            line_no: 0,
            buf: Vec::default(),
        }
    }

    fn parse_line(&self, line: &str) -> ConvResult<VolumeTrace> {
        let err = || ConvError::invalid_trace(&self.source, self.line_no, line);
        let split = line.trim().split(',').collect::<Vec<_>>();
        if split.len() != 5 {
            return Err(err());
        }
        let timestamp: u64 = split[0].trim().parse().map_err(|_| err())?;
        let offset: u64 = split[1].trim().parse().map_err(|_| err())?;
        let size: u32 = split[2].trim().parse().map_err(|_| err())?;
        let io_type: u8 = split[3].trim().parse().map_err(|_| err())?;
        if io_type > 1 {
            return Err(err());
        }
        let volume_id: u64 = split[4].trim().parse().map_err(|_| err())?;
        Ok(VolumeTrace {
            timestamp,
            record: IoRecord::new(offset, size, io_type),
            volume_id,
        })
    }
}

impl<R: BufRead> Iterator for TencentTraceParser<R> {
    type Item = ConvResult<VolumeTrace>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            return match self.trace_file.read_until(b'\n', &mut self.buf) {
                Ok(0) => None, // EOF
                Ok(_) => {
                    self.line_no += 1;
                    let line = String::from_utf8_lossy(&self.buf).into_owned();
                    if line.chars().all(char::is_whitespace) {
                        // skip whitespace line
                        continue;
                    }
                    Some(self.parse_line(&line))
                }
                Err(e) => Some(Err(e.into())),
            };
        }
    }
}

#[test]
fn test_tencent_trace() {
    let dir = tempfile::tempdir().unwrap();
    let f_path = {
        let mut dir = dir.path().to_owned();
        dir.push("TEST.csv");
        dir
    };
    let mut f = std::fs::File::create(f_path.as_path()).unwrap();
    const FILE_DATA: &'static str = "1538323200,12032,4096,0,1063

1538323200,286533296,8192,1,1063


1538323201,0,512,1,27

    ";
    std::io::Write::write_all(&mut f, FILE_DATA.as_bytes()).unwrap();
    drop(f);
    let parser = TencentTraceParser::open(f_path.as_path()).unwrap();
    let traces = parser.collect::<ConvResult<Vec<_>>>().unwrap();
    assert_eq!(
        traces,
        vec![
            VolumeTrace {
                timestamp: 1538323200,
                record: IoRecord::new(12032, 4096, 0),
                volume_id: 1063,
            },
            VolumeTrace {
                timestamp: 1538323200,
                record: IoRecord::new(286533296, 8192, 1),
                volume_id: 1063,
            },
            VolumeTrace {
                timestamp: 1538323201,
                record: IoRecord::new(0, 512, 1),
                volume_id: 27,
            },
        ]
    );
}

#[test]
fn test_tencent_trace_invalid() {
    const FILE_DATA: &[u8] = b"1,2,3,0,4\n\n1,4\n1,2,3,2,4\n1,2,x,0,4\n1,2,3,0,4\xff\n";
    let mut parser = TencentTraceParser::from_reader(FILE_DATA, "mem");
    assert_eq!(
        parser.next().unwrap().unwrap().record,
        IoRecord::new(2, 3, 0)
    );
    // wrong field count, reported on the third line
    let err = parser.next().unwrap().unwrap_err();
    assert!(err.to_string().contains("mem:3"), "{err}");
    // io type out of range
    assert!(matches!(
        parser.next().unwrap(),
        Err(ConvError::InvalidTrace(_))
    ));
    // unparsable size
    assert!(parser.next().unwrap().is_err());
    // replacement char makes the volume id unparsable
    assert!(parser.next().unwrap().is_err());
    assert!(parser.next().is_none());
}
