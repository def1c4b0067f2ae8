use crate::error::Error;
use crate::platform::FnCrc32;

/// Total size of the persisted record.
pub const RECORD_SIZE: usize = 128;
/// Maximum number of value bytes the TLV region can hold.
pub const TLV_CAPACITY: usize = RECORD_SIZE - HEADER_SIZE - TAIL_SIZE;

pub const MAGIC: u16 = 0xBEEF;
pub const VERSION_MAJOR: u8 = 1;
pub const VERSION_MINOR: u8 = 0;

pub(crate) const HEADER_SIZE: usize = 6;
pub(crate) const TAIL_SIZE: usize = 4;

const OFFSET_MAGIC: usize = 0;
const OFFSET_MAJOR_VERSION: usize = 2;
const OFFSET_MINOR_VERSION: usize = 3;
const OFFSET_TLV_LENGTH: usize = 4;

// Zlib-compatible CRC-32 starts from 0.
const CRC_INIT: u32 = 0;

// Compile-time assertion to ensure every possible value length fits the
// one-byte length field
const _: () = assert!(TLV_CAPACITY - 2 <= u8::MAX as usize);

/// The in-memory record image. Layout:
///
/// ```text
/// | magic:u16 | major:u8 | minor:u8 | tlv_length:u16 | tlv entries... | crc:u32 |
/// ```
///
/// TLV entries are `{tag:1, length:1, value:length}`, packed contiguously,
/// ordered by time of first write. Scalars are little-endian. The checksum
/// covers bytes `0 .. HEADER_SIZE + tlv_length` and sits directly behind the
/// last entry; bytes past it are unused.
#[derive(Clone)]
pub(crate) struct Record {
    bytes: [u8; RECORD_SIZE],
}

impl Record {
    pub(crate) const fn zeroed() -> Self {
        Self {
            bytes: [0; RECORD_SIZE],
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub(crate) fn magic(&self) -> u16 {
        u16::from_le_bytes([self.bytes[OFFSET_MAGIC], self.bytes[OFFSET_MAGIC + 1]])
    }

    pub(crate) fn major_version(&self) -> u8 {
        self.bytes[OFFSET_MAJOR_VERSION]
    }

    pub(crate) fn tlv_length(&self) -> u16 {
        u16::from_le_bytes([
            self.bytes[OFFSET_TLV_LENGTH],
            self.bytes[OFFSET_TLV_LENGTH + 1],
        ])
    }

    fn set_tlv_length(&mut self, len: u16) {
        self.bytes[OFFSET_TLV_LENGTH..OFFSET_TLV_LENGTH + 2].copy_from_slice(&len.to_le_bytes());
    }

    /// Writes the compiled-in magic and version and empties the TLV region.
    /// Does not touch the checksum.
    pub(crate) fn stamp_defaults(&mut self) {
        self.bytes[OFFSET_MAGIC..OFFSET_MAGIC + 2].copy_from_slice(&MAGIC.to_le_bytes());
        self.bytes[OFFSET_MAJOR_VERSION] = VERSION_MAJOR;
        self.bytes[OFFSET_MINOR_VERSION] = VERSION_MINOR;
        self.set_tlv_length(0);
    }

    fn tlv(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..HEADER_SIZE + TLV_CAPACITY]
    }

    fn tlv_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[HEADER_SIZE..HEADER_SIZE + TLV_CAPACITY]
    }

    /// Linear scan for `tag`, returning its entry offset within the TLV
    /// region. An entry whose header or declared value extends past
    /// `tlv_length` aborts the scan; the region can no longer be walked
    /// reliably past that point.
    pub(crate) fn find(&self, tag: u8) -> Result<Option<usize>, Error> {
        // The image may hold an unvalidated record (see `Config::refresh`).
        let used = self.tlv_length() as usize;
        if used > TLV_CAPACITY {
            return Err(Error::CorruptLength);
        }
        let tlv = self.tlv();

        let mut pos = 0;
        while pos < used {
            if pos + 2 > used {
                return Err(Error::CorruptEntry);
            }
            let length = tlv[pos + 1] as usize;
            if pos + 2 + length > used {
                return Err(Error::CorruptEntry);
            }
            if tlv[pos] == tag {
                return Ok(Some(pos));
            }
            pos += 2 + length;
        }

        Ok(None)
    }

    /// Value bytes of the entry with `tag`.
    pub(crate) fn field_bytes(&self, tag: u8) -> Result<&[u8], Error> {
        let pos = self.find(tag)?.ok_or(Error::FieldNotFound)?;
        let length = self.tlv()[pos + 1] as usize;
        Ok(&self.tlv()[pos + 2..pos + 2 + length])
    }

    pub(crate) fn field_size(&self, tag: u8) -> Result<u8, Error> {
        let pos = self.find(tag)?.ok_or(Error::FieldNotFound)?;
        Ok(self.tlv()[pos + 1])
    }

    /// Inserts or updates the entry for `tag`. Returns whether the record
    /// content changed. Capacity is checked before any byte is touched, so a
    /// failed write leaves the record exactly as it was. Resizing an existing
    /// value shifts everything behind it by `value.len() - old_size`.
    pub(crate) fn write_field(&mut self, tag: u8, value: &[u8]) -> Result<bool, Error> {
        let size = value.len();
        debug_assert!(size + 2 <= TLV_CAPACITY);

        let used = self.tlv_length() as usize;
        match self.find(tag)? {
            Some(pos) => {
                let old_size = self.tlv()[pos + 1] as usize;
                if old_size == size && &self.tlv()[pos + 2..pos + 2 + size] == value {
                    return Ok(false);
                }

                let new_used = used - old_size + size;
                if new_used > TLV_CAPACITY {
                    return Err(Error::CapacityExceeded);
                }

                let tlv = self.tlv_mut();
                if size != old_size {
                    tlv.copy_within(pos + 2 + old_size..used, pos + 2 + size);
                }
                tlv[pos + 1] = size as u8;
                tlv[pos + 2..pos + 2 + size].copy_from_slice(value);
                self.set_tlv_length(new_used as u16);
            }
            None => {
                let new_used = used + 2 + size;
                if new_used > TLV_CAPACITY {
                    return Err(Error::CapacityExceeded);
                }

                let tlv = self.tlv_mut();
                tlv[used] = tag;
                tlv[used + 1] = size as u8;
                tlv[used + 2..used + 2 + size].copy_from_slice(value);
                self.set_tlv_length(new_used as u16);
            }
        }

        debug_assert!(self.tlv_consistent());
        Ok(true)
    }

    pub(crate) fn calculate_checksum(&self, crc32: FnCrc32) -> u32 {
        crc32(
            CRC_INIT,
            &self.bytes[..HEADER_SIZE + self.tlv_length() as usize],
        )
    }

    fn stored_checksum(&self) -> u32 {
        let tail = HEADER_SIZE + self.tlv_length() as usize;
        u32::from_le_bytes([
            self.bytes[tail],
            self.bytes[tail + 1],
            self.bytes[tail + 2],
            self.bytes[tail + 3],
        ])
    }

    /// Recomputes the checksum and writes it directly behind the last entry.
    /// Must be the last step before every persist.
    pub(crate) fn stamp_checksum(&mut self, crc32: FnCrc32) {
        let checksum = self.calculate_checksum(crc32);
        let tail = HEADER_SIZE + self.tlv_length() as usize;
        self.bytes[tail..tail + TAIL_SIZE].copy_from_slice(&checksum.to_le_bytes());
    }

    /// Checks magic and major version, then the `tlv_length` bound, then the
    /// checksum. Ordered cheapest first; blank or erased storage already
    /// fails the magic check.
    pub(crate) fn validate(&self, crc32: FnCrc32) -> Result<(), Error> {
        if self.magic() != MAGIC || self.major_version() != VERSION_MAJOR {
            return Err(Error::CorruptMagic);
        }
        if self.tlv_length() as usize > TLV_CAPACITY {
            return Err(Error::CorruptLength);
        }
        if self.stored_checksum() != self.calculate_checksum(crc32) {
            return Err(Error::CorruptChecksum);
        }

        Ok(())
    }

    /// Entry sizes sum to `tlv_length`, no duplicate tags, length in bounds.
    fn tlv_consistent(&self) -> bool {
        let used = self.tlv_length() as usize;
        if used > TLV_CAPACITY {
            return false;
        }

        let tlv = self.tlv();
        let mut seen = [false; 256];
        let mut pos = 0;
        while pos < used {
            if pos + 2 > used || pos + 2 + tlv[pos + 1] as usize > used {
                return false;
            }
            let tag = tlv[pos] as usize;
            if seen[tag] {
                return false;
            }
            seen[tag] = true;
            pos += 2 + tlv[pos + 1] as usize;
        }

        pos == used
    }
}
