use bytes::{Buf, BufMut};

mod bin_trace;
mod tencent_trace;

pub use bin_trace::BinTraceParser;
pub use tencent_trace::{TencentTraceParser, VolumeTrace};

/// Sector size in bytes, the unit of [`IoRecord::offset`].
pub const SECTOR_SIZE: u64 = 512;

/// Size of one encoded [`IoRecord`]: `offset(8) + size(4) + io_type(1)`.
pub const RECORD_SIZE: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Write => "write",
        }
    }
}

impl From<u8> for Operation {
    /// `0` is a read, anything else is a write.
    fn from(io_type: u8) -> Self {
        if io_type == 0 {
            Operation::Read
        } else {
            Operation::Write
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fixed-width I/O event of a binary trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoRecord {
    /// block offset, in sectors
    pub offset: u64,
    /// bytes transferred
    pub size: u32,
    pub io_type: u8,
}

impl IoRecord {
    pub fn new(offset: u64, size: u32, io_type: u8) -> Self {
        Self {
            offset,
            size,
            io_type,
        }
    }

    /// Decode a record from its little-endian wire form.
    pub fn decode(buf: &[u8; RECORD_SIZE]) -> Self {
        let mut buf = &buf[..];
        let offset = buf.get_u64_le();
        let size = buf.get_u32_le();
        let io_type = buf.get_u8();
        Self {
            offset,
            size,
            io_type,
        }
    }

    /// Append the little-endian wire form of the record to `buf`.
    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u64_le(self.offset);
        buf.put_u32_le(self.size);
        buf.put_u8(self.io_type);
    }

    pub fn op(&self) -> Operation {
        Operation::from(self.io_type)
    }

    /// Offset in bytes. Wraps on overflow, like plain unsigned arithmetic.
    pub fn byte_offset(&self) -> u64 {
        self.offset.wrapping_mul(SECTOR_SIZE)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode() {
        let raw: [u8; RECORD_SIZE] = hex::decode("0100000000000000001000000a")
            .unwrap()
            .try_into()
            .unwrap();
        let record = IoRecord::decode(&raw);
        assert_eq!(record, IoRecord::new(1, 4096, 10));
        assert_eq!(record.op(), Operation::Write);
        assert_eq!(record.byte_offset(), 512);

        let mut buf = bytes::BytesMut::new();
        record.encode(&mut buf);
        assert_eq!(buf.as_ref(), raw.as_slice());
    }

    #[test]
    fn test_operation() {
        assert_eq!(Operation::from(0), Operation::Read);
        (1..=u8::MAX).for_each(|t| assert_eq!(Operation::from(t), Operation::Write));
        assert_eq!(Operation::Write.to_string(), "write");
    }

    #[test]
    fn test_byte_offset_wraps() {
        assert_eq!(IoRecord::new(100, 512, 1).byte_offset(), 51200);
        assert_eq!(
            IoRecord::new(u64::MAX, 0, 0).byte_offset(),
            u64::MAX.wrapping_mul(512)
        );
    }
}
