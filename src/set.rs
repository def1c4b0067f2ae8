use crate::error::Error;
use crate::platform::Platform;
use crate::raw::TLV_CAPACITY;
use crate::{Config, Field};

pub trait Set<T> {
    fn set(&mut self, field: Field, value: T) -> Result<(), Error>;
}

impl<T, S: Set<T>> Set<T> for &mut S {
    fn set(&mut self, field: Field, value: T) -> Result<(), Error> {
        (*self).set(field, value)
    }
}

impl<T: Platform> Set<u8> for Config<T> {
    fn set(&mut self, field: Field, value: u8) -> Result<(), Error> {
        self.write_field(field, &value.to_le_bytes())
    }
}

impl<T: Platform> Set<u16> for Config<T> {
    fn set(&mut self, field: Field, value: u16) -> Result<(), Error> {
        self.write_field(field, &value.to_le_bytes())
    }
}

impl<T: Platform> Set<u32> for Config<T> {
    fn set(&mut self, field: Field, value: u32) -> Result<(), Error> {
        self.write_field(field, &value.to_le_bytes())
    }
}

impl<T: Platform> Set<u64> for Config<T> {
    fn set(&mut self, field: Field, value: u64) -> Result<(), Error> {
        self.write_field(field, &value.to_le_bytes())
    }
}

impl<T: Platform> Set<f32> for Config<T> {
    fn set(&mut self, field: Field, value: f32) -> Result<(), Error> {
        self.write_field(field, &value.to_le_bytes())
    }
}

impl<T: Platform> Set<f64> for Config<T> {
    fn set(&mut self, field: Field, value: f64) -> Result<(), Error> {
        self.write_field(field, &value.to_le_bytes())
    }
}

impl<T: Platform, const N: usize> Set<[u8; N]> for Config<T> {
    fn set(&mut self, field: Field, value: [u8; N]) -> Result<(), Error> {
        if 2 + N > TLV_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        self.write_field(field, &value)
    }
}

impl<T: Platform, const N: usize> Set<[u16; N]> for Config<T> {
    fn set(&mut self, field: Field, value: [u16; N]) -> Result<(), Error> {
        if 2 + N * 2 > TLV_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        let mut scratch = [0u8; TLV_CAPACITY];
        for (dst, src) in scratch.chunks_exact_mut(2).zip(&value) {
            dst.copy_from_slice(&src.to_le_bytes());
        }
        self.write_field(field, &scratch[..N * 2])
    }
}

impl<T: Platform, const N: usize> Set<[u32; N]> for Config<T> {
    fn set(&mut self, field: Field, value: [u32; N]) -> Result<(), Error> {
        if 2 + N * 4 > TLV_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        let mut scratch = [0u8; TLV_CAPACITY];
        for (dst, src) in scratch.chunks_exact_mut(4).zip(&value) {
            dst.copy_from_slice(&src.to_le_bytes());
        }
        self.write_field(field, &scratch[..N * 4])
    }
}

impl<T: Platform, const N: usize> Set<[u64; N]> for Config<T> {
    fn set(&mut self, field: Field, value: [u64; N]) -> Result<(), Error> {
        if 2 + N * 8 > TLV_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        let mut scratch = [0u8; TLV_CAPACITY];
        for (dst, src) in scratch.chunks_exact_mut(8).zip(&value) {
            dst.copy_from_slice(&src.to_le_bytes());
        }
        self.write_field(field, &scratch[..N * 8])
    }
}

impl<T: Platform, const N: usize> Set<[f32; N]> for Config<T> {
    fn set(&mut self, field: Field, value: [f32; N]) -> Result<(), Error> {
        if 2 + N * 4 > TLV_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        let mut scratch = [0u8; TLV_CAPACITY];
        for (dst, src) in scratch.chunks_exact_mut(4).zip(&value) {
            dst.copy_from_slice(&src.to_le_bytes());
        }
        self.write_field(field, &scratch[..N * 4])
    }
}

impl<T: Platform, const N: usize> Set<[f64; N]> for Config<T> {
    fn set(&mut self, field: Field, value: [f64; N]) -> Result<(), Error> {
        if 2 + N * 8 > TLV_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        let mut scratch = [0u8; TLV_CAPACITY];
        for (dst, src) in scratch.chunks_exact_mut(8).zip(&value) {
            dst.copy_from_slice(&src.to_le_bytes());
        }
        self.write_field(field, &scratch[..N * 8])
    }
}
