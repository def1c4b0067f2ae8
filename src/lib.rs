#![doc = include_str!("../README.md")]
#![no_std]

pub mod error;
mod get;
pub mod platform;
mod raw;
mod set;

pub use get::Get;
pub use raw::{MAGIC, RECORD_SIZE, TLV_CAPACITY, VERSION_MAJOR, VERSION_MINOR};
pub use set::Set;

use crate::error::Error;
use crate::platform::Platform;
use crate::raw::Record;
#[cfg(feature = "defmt")]
use defmt::{info, warn};

/// Blob-device record id the configuration lives under.
const RECORD_ID: u16 = 0;

/// Configuration fields. Each tag appears at most once in the record; the
/// `Test*` tags are reserved scratch slots without assigned meaning.
#[derive(strum::FromRepr, strum::Display, Debug, Eq, PartialEq, Copy, Clone)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Mode = 0,
    Address = 1,
    AnchorX = 2,
    AnchorY = 3,
    Test1 = 4,
    Test2 = 5,
    Test3 = 6,
    Test4 = 7,
    Test5 = 8,
    Test6 = 9,
    Test7 = 10,
    Test8 = 11,
    Test9 = 12,
    Test10 = 13,
    Test11 = 14,
    Test12 = 15,
    Test13 = 16,
    Test14 = 17,
    Test15 = 18,
    Test16 = 19,
    Test17 = 20,
    Test18 = 21,
    Test19 = 22,
    Test20 = 23,
    Test21 = 24,
    Test22 = 25,
    Test23 = 26,
    Test24 = 27,
    Test25 = 28,
    Test26 = 29,
    Test27 = 30,
    Test28 = 31,
    Test29 = 32,
    Test30 = 33,
    Test31 = 34,
    Test32 = 35,
    Test33 = 36,
    Test34 = 37,
    Test35 = 38,
    Test36 = 39,
    Test37 = 40,
    Test38 = 41,
    Test39 = 42,
    Test40 = 43,
    Test41 = 44,
    Test42 = 45,
    Test43 = 46,
    Test44 = 47,
}

/// Operating role stored under [`Field::Mode`]. `Dummy` neither initiates
/// nor answers ranging exchanges and is the fallback for unknown stored
/// values.
#[derive(strum::FromRepr, strum::Display, Debug, Eq, PartialEq, Copy, Clone)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Tag = 0,
    Anchor = 1,
    Dummy = 2,
}

/// The persistent configuration store: one fixed-size, checksummed record on
/// a blob device, mirrored in memory.
///
/// The device identity (mode, address, anchor position) survives power loss
/// here. Access is single-threaded per instance; wrap the whole store in a
/// mutex if several tasks share it, since the persist-and-confirm step must
/// not interleave with other accessors.
pub struct Config<T: Platform> {
    store: T,
    record: Record,
}

impl<T: Platform> Config<T> {
    /// Wraps an already-mounted blob device. The in-memory image starts
    /// zeroed and performs no I/O until [`Config::init`].
    pub fn new(store: T) -> Self {
        Self {
            store,
            record: Record::zeroed(),
        }
    }

    /// Loads and validates the stored record. An invalid record (blank or
    /// erased storage, bit rot, torn write, version change) is replaced by a
    /// freshly stamped empty record; all previously stored fields are lost.
    ///
    /// The rebuild is attempted once. If persisting or re-validating the
    /// defaults fails, `init` returns [`Error::CannotInitialize`].
    pub fn init(&mut self) -> Result<(), Error> {
        if self.load().is_err() {
            // Absent or unreadable record. Validation below fails on the
            // zeroed image and the defaults are rebuilt.
            self.record = Record::zeroed();
        }

        match self.record.validate(T::crc32) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                info!("configuration read and verified");
                Ok(())
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                warn!("stored configuration invalid ({}), rebuilding", _e);
                self.rebuild_defaults()
            }
        }
    }

    fn rebuild_defaults(&mut self) -> Result<(), Error> {
        self.record = Record::zeroed();
        self.record.stamp_defaults();
        self.record.stamp_checksum(T::crc32);

        self.persist().map_err(|_| Error::CannotInitialize)?;
        self.load().map_err(|_| Error::CannotInitialize)?;
        self.record
            .validate(T::crc32)
            .map_err(|_| Error::CannotInitialize)?;

        #[cfg(feature = "defmt")]
        info!("wrote default configuration");
        Ok(())
    }

    /// Reloads the in-memory image from storage without validating it. Used
    /// to resync after external tooling may have altered the record.
    pub fn refresh(&mut self) -> Result<(), Error> {
        self.load()
    }

    /// Deletes the stored record. The in-memory image is left untouched, so
    /// accessors keep returning the stale values until [`Config::init`] or
    /// [`Config::refresh`] runs again.
    pub fn erase(&mut self) -> Result<(), Error> {
        self.store
            .delete(RECORD_ID)
            .map_err(|_| Error::StorageUnavailable)
    }

    /// Copies up to `out.len()` raw record bytes into `out` for diagnostics.
    /// Returns the number of bytes copied.
    pub fn dump(&self, out: &mut [u8]) -> usize {
        let n = out.len().min(RECORD_SIZE);
        out[..n].copy_from_slice(&self.record.as_bytes()[..n]);
        n
    }

    /// Stored width of `field` in bytes.
    pub fn field_size(&self, field: Field) -> Result<u8, Error> {
        self.record.field_size(field as u8)
    }

    /// Reads a field. Supported types are `u8`/`u16`/`u32`/`u64`/`f32`/`f64`
    /// and fixed-size arrays of each; the stored width must match the
    /// requested type exactly.
    pub fn get<R>(&self, field: Field) -> Result<R, Error>
    where
        Self: Get<R>,
    {
        Get::get(self, field)
    }

    /// Writes a field and persists the record. The write is confirmed by
    /// re-reading and re-validating the stored record before reporting
    /// success; writing an unchanged value performs no storage I/O.
    pub fn set<R>(&mut self, field: Field, value: R) -> Result<(), Error>
    where
        Self: Set<R>,
    {
        Set::set(self, field, value)
    }

    /// Operating role, with unknown stored values falling back to
    /// [`Mode::Dummy`].
    pub fn mode(&self) -> Result<Mode, Error> {
        let raw: u8 = self.get(Field::Mode)?;
        Ok(Mode::from_repr(raw).unwrap_or(Mode::Dummy))
    }

    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        self.set(Field::Mode, mode as u8)
    }

    /// The 8-byte device address used in ranging frames.
    pub fn address(&self) -> Result<[u8; 8], Error> {
        self.get(Field::Address)
    }

    pub fn set_address(&mut self, address: [u8; 8]) -> Result<(), Error> {
        self.set(Field::Address, address)
    }

    /// Anchor surveyed position as `(x, y)` in millimetres.
    pub fn anchor_position(&self) -> Result<(u32, u32), Error> {
        Ok((self.get(Field::AnchorX)?, self.get(Field::AnchorY)?))
    }

    pub fn set_anchor_position(&mut self, x_mm: u32, y_mm: u32) -> Result<(), Error> {
        self.set(Field::AnchorX, x_mm)?;
        self.set(Field::AnchorY, y_mm)
    }

    /// Value bytes of `field`, checked against the caller's expected width.
    pub(crate) fn field_bytes(&self, field: Field, expected: usize) -> Result<&[u8], Error> {
        let value = self.record.field_bytes(field as u8)?;
        if value.len() != expected {
            return Err(Error::SizeMismatch {
                expected: expected as u8,
                stored: value.len() as u8,
            });
        }
        Ok(value)
    }

    /// Like [`Config::field_bytes`], returned as a fixed-size array.
    pub(crate) fn field_array<const W: usize>(&self, field: Field) -> Result<[u8; W], Error> {
        let raw = self.field_bytes(field, W)?;
        let mut bytes = [0u8; W];
        bytes.copy_from_slice(raw);
        Ok(bytes)
    }

    pub(crate) fn write_field(&mut self, field: Field, value: &[u8]) -> Result<(), Error> {
        if !self.record.write_field(field as u8, value)? {
            return Ok(());
        }

        self.record.stamp_checksum(T::crc32);
        self.persist()?;

        // Confirm the write landed before reporting success.
        self.load()?;
        self.record.validate(T::crc32)
    }

    fn load(&mut self) -> Result<(), Error> {
        self.store
            .read(RECORD_ID, self.record.as_bytes_mut())
            .map_err(|_| Error::StorageUnavailable)?;
        Ok(())
    }

    fn persist(&mut self) -> Result<(), Error> {
        let written = self
            .store
            .write(RECORD_ID, self.record.as_bytes())
            .map_err(|_| Error::StorageUnavailable)?;
        if written != RECORD_SIZE {
            return Err(Error::StorageUnavailable);
        }
        Ok(())
    }
}
