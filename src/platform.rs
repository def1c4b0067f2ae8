/// See README.md for an example implementation.
pub trait Platform: Crc + BlobStore {}

impl<T: Crc + BlobStore> Platform for T {}

/// A mounted key/value blob device holding whole records under small integer
/// ids (e.g. a Zephyr NVS partition). All operations are synchronous and
/// blocking; sector management and wear leveling happen below this interface.
pub trait BlobStore {
    type Error;

    /// Reads record `id` into `buf`, returning the number of bytes copied.
    /// Reading an absent record is an error.
    fn read(&mut self, id: u16, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Writes `buf` as record `id`, returning the number of bytes stored.
    fn write(&mut self, id: u16, buf: &[u8]) -> Result<usize, Self::Error>;

    /// Deletes record `id`.
    fn delete(&mut self, id: u16) -> Result<(), Self::Error>;
}

impl<T: BlobStore> BlobStore for &mut T {
    type Error = T::Error;

    fn read(&mut self, id: u16, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (*self).read(id, buf)
    }

    fn write(&mut self, id: u16, buf: &[u8]) -> Result<usize, Self::Error> {
        (*self).write(id, buf)
    }

    fn delete(&mut self, id: u16) -> Result<(), Self::Error> {
        (*self).delete(id)
    }
}

pub type FnCrc32 = fn(init: u32, data: &[u8]) -> u32;

/// CRC-32 (IEEE polynomial, zlib-compatible) supplied by the platform so
/// targets can route it to a ROM or hardware CRC engine.
pub trait Crc {
    fn crc32(init: u32, data: &[u8]) -> u32;
}

impl<T: Crc> Crc for &mut T {
    fn crc32(init: u32, data: &[u8]) -> u32 {
        T::crc32(init, data)
    }
}
