//! The `Get<T>` trait and its implementations provide a single generic,
//! overloaded `get<T>()` for all supported field types.

use crate::error::Error;
use crate::platform::Platform;
use crate::raw::TLV_CAPACITY;
use crate::{Config, Field};

pub trait Get<T> {
    fn get(&self, field: Field) -> Result<T, Error>;
}

impl<T, G: Get<T>> Get<T> for &G {
    fn get(&self, field: Field) -> Result<T, Error> {
        (*self).get(field)
    }
}

impl<T: Platform> Get<u8> for Config<T> {
    fn get(&self, field: Field) -> Result<u8, Error> {
        self.field_array(field).map(u8::from_le_bytes)
    }
}

impl<T: Platform> Get<u16> for Config<T> {
    fn get(&self, field: Field) -> Result<u16, Error> {
        self.field_array(field).map(u16::from_le_bytes)
    }
}

impl<T: Platform> Get<u32> for Config<T> {
    fn get(&self, field: Field) -> Result<u32, Error> {
        self.field_array(field).map(u32::from_le_bytes)
    }
}

impl<T: Platform> Get<u64> for Config<T> {
    fn get(&self, field: Field) -> Result<u64, Error> {
        self.field_array(field).map(u64::from_le_bytes)
    }
}

impl<T: Platform> Get<f32> for Config<T> {
    fn get(&self, field: Field) -> Result<f32, Error> {
        self.field_array(field).map(f32::from_le_bytes)
    }
}

impl<T: Platform> Get<f64> for Config<T> {
    fn get(&self, field: Field) -> Result<f64, Error> {
        self.field_array(field).map(f64::from_le_bytes)
    }
}

impl<T: Platform, const N: usize> Get<[u8; N]> for Config<T> {
    fn get(&self, field: Field) -> Result<[u8; N], Error> {
        if 2 + N > TLV_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        self.field_array(field)
    }
}

impl<T: Platform, const N: usize> Get<[u16; N]> for Config<T> {
    fn get(&self, field: Field) -> Result<[u16; N], Error> {
        if 2 + N * 2 > TLV_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        let raw = self.field_bytes(field, N * 2)?;
        let mut out = [0u16; N];
        let (chunks, _) = raw.as_chunks::<2>();
        for (dst, src) in out.iter_mut().zip(chunks) {
            *dst = u16::from_le_bytes(*src);
        }
        Ok(out)
    }
}

impl<T: Platform, const N: usize> Get<[u32; N]> for Config<T> {
    fn get(&self, field: Field) -> Result<[u32; N], Error> {
        if 2 + N * 4 > TLV_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        let raw = self.field_bytes(field, N * 4)?;
        let mut out = [0u32; N];
        let (chunks, _) = raw.as_chunks::<4>();
        for (dst, src) in out.iter_mut().zip(chunks) {
            *dst = u32::from_le_bytes(*src);
        }
        Ok(out)
    }
}

impl<T: Platform, const N: usize> Get<[u64; N]> for Config<T> {
    fn get(&self, field: Field) -> Result<[u64; N], Error> {
        if 2 + N * 8 > TLV_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        let raw = self.field_bytes(field, N * 8)?;
        let mut out = [0u64; N];
        let (chunks, _) = raw.as_chunks::<8>();
        for (dst, src) in out.iter_mut().zip(chunks) {
            *dst = u64::from_le_bytes(*src);
        }
        Ok(out)
    }
}

impl<T: Platform, const N: usize> Get<[f32; N]> for Config<T> {
    fn get(&self, field: Field) -> Result<[f32; N], Error> {
        if 2 + N * 4 > TLV_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        let raw = self.field_bytes(field, N * 4)?;
        let mut out = [0f32; N];
        let (chunks, _) = raw.as_chunks::<4>();
        for (dst, src) in out.iter_mut().zip(chunks) {
            *dst = f32::from_le_bytes(*src);
        }
        Ok(out)
    }
}

impl<T: Platform, const N: usize> Get<[f64; N]> for Config<T> {
    fn get(&self, field: Field) -> Result<[f64; N], Error> {
        if 2 + N * 8 > TLV_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        let raw = self.field_bytes(field, N * 8)?;
        let mut out = [0f64; N];
        let (chunks, _) = raw.as_chunks::<8>();
        for (dst, src) in out.iter_mut().zip(chunks) {
            *dst = f64::from_le_bytes(*src);
        }
        Ok(out)
    }
}
