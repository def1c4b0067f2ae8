#![allow(dead_code)]

// filename according to https://doc.rust-lang.org/book/ch11-03-test-organization.html
use std::collections::BTreeMap;

use uwb_config::platform::{BlobStore, Crc};
use uwb_config::{MAGIC, RECORD_SIZE, VERSION_MAJOR, VERSION_MINOR};

pub const RECORD_ID: u16 = 0;

/// In-memory blob device: whole records under integer ids, an operation log
/// and optional fault injection.
#[derive(Default)]
pub struct Store {
    pub records: BTreeMap<u16, Vec<u8>>,
    pub fail_after_operation: usize,
    pub operations: Vec<Operation>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Operation {
    Read { id: u16, len: usize },
    Write { id: u16, len: usize },
    Delete { id: u16 },
}

impl Store {
    pub fn new() -> Self {
        Self {
            fail_after_operation: usize::MAX,
            ..Default::default()
        }
    }

    pub fn new_with_fault(fail_after_operation: usize) -> Self {
        Self {
            fail_after_operation,
            ..Default::default()
        }
    }

    pub fn new_with_record(record: Vec<u8>) -> Self {
        Self {
            records: BTreeMap::from([(RECORD_ID, record)]),
            fail_after_operation: usize::MAX,
            ..Default::default()
        }
    }

    pub fn disable_faults(&mut self) {
        self.fail_after_operation = usize::MAX;
    }

    pub fn record(&self) -> &[u8] {
        self.records.get(&RECORD_ID).unwrap()
    }

    pub fn writes(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::Write { .. }))
            .count()
    }
}

#[derive(Debug)]
pub struct StoreError;

impl BlobStore for Store {
    type Error = StoreError;

    fn read(&mut self, id: u16, buf: &mut [u8]) -> Result<usize, StoreError> {
        if self.operations.len() >= self.fail_after_operation {
            return Err(StoreError);
        }
        self.operations.push(Operation::Read { id, len: buf.len() });

        let record = self.records.get(&id).ok_or(StoreError)?;
        let n = record.len().min(buf.len());
        buf[..n].copy_from_slice(&record[..n]);
        Ok(n)
    }

    fn write(&mut self, id: u16, buf: &[u8]) -> Result<usize, StoreError> {
        if self.operations.len() >= self.fail_after_operation {
            return Err(StoreError);
        }
        self.operations.push(Operation::Write { id, len: buf.len() });

        self.records.insert(id, buf.to_vec());
        Ok(buf.len())
    }

    fn delete(&mut self, id: u16) -> Result<(), StoreError> {
        if self.operations.len() >= self.fail_after_operation {
            return Err(StoreError);
        }
        self.operations.push(Operation::Delete { id });

        self.records.remove(&id).map(|_| ()).ok_or(StoreError)
    }
}

impl Crc for Store {
    fn crc32(init: u32, data: &[u8]) -> u32 {
        unsafe { libz_sys::crc32(init as u64, data.as_ptr(), data.len() as u32) as u32 }
    }
}

/// Reference CRC-32 (IEEE, init 0), matching the store's checksum contract.
pub fn crc32(data: &[u8]) -> u32 {
    unsafe { libz_sys::crc32(0, data.as_ptr(), data.len() as u32) as u32 }
}

/// Builds a well-formed record image from `(tag, value)` pairs.
pub fn raw_record(fields: &[(u8, &[u8])]) -> Vec<u8> {
    let mut buf = vec![0u8; RECORD_SIZE];
    buf[0..2].copy_from_slice(&MAGIC.to_le_bytes());
    buf[2] = VERSION_MAJOR;
    buf[3] = VERSION_MINOR;

    let mut pos = 6;
    for (tag, value) in fields {
        buf[pos] = *tag;
        buf[pos + 1] = value.len() as u8;
        buf[pos + 2..pos + 2 + value.len()].copy_from_slice(value);
        pos += 2 + value.len();
    }
    buf[4..6].copy_from_slice(&((pos - 6) as u16).to_le_bytes());

    let checksum = crc32(&buf[..pos]);
    buf[pos..pos + 4].copy_from_slice(&checksum.to_le_bytes());
    buf
}
