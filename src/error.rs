use thiserror::Error;

/// Errors that can occur during configuration store operations. Marked as
/// non-exhaustive to allow for future additions without breaking the API. A
/// caller would typically only handle `FieldNotFound` (fall back to a
/// compiled-in default) as the other errors are static.
#[derive(Error, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The blob device failed to read, write or delete the record. Fatal
    /// during `init`, surfaced to the caller otherwise.
    #[error("storage unavailable")]
    StorageUnavailable,

    /// The record's magic or major version does not match the compiled-in
    /// constants. The usual cause is blank or erased storage.
    #[error("record magic mismatch")]
    CorruptMagic,

    /// The record's `tlv_length` exceeds the TLV region capacity.
    #[error("record length out of bounds")]
    CorruptLength,

    /// The stored checksum does not match the CRC-32 of the record contents.
    #[error("record checksum mismatch")]
    CorruptChecksum,

    /// A TLV entry's declared length extends past `tlv_length`, so the scan
    /// lost alignment. The record is not rebuilt outside `init`.
    #[error("malformed tlv entry")]
    CorruptEntry,

    /// Rebuilding the default record during `init` failed verification. Not
    /// retried; the device needs operator attention.
    #[error("cannot initialize configuration")]
    CannotInitialize,

    /// No entry with the requested tag exists. Either the record was rebuilt
    /// from defaults or the field has never been written.
    #[error("field not found")]
    FieldNotFound,

    /// The stored value width differs from the caller's requested width,
    /// which indicates a schema mismatch. Never auto-corrected.
    #[error("size mismatch: expected {expected} bytes, stored {stored}")]
    SizeMismatch { expected: u8, stored: u8 },

    /// The write would overflow the TLV region. The record is left unchanged.
    #[error("tlv region full")]
    CapacityExceeded,
}
