mod common;

mod init {
    use crate::common;
    use pretty_assertions::assert_eq;
    use uwb_config::error::Error;
    use uwb_config::{Config, Field, MAGIC, RECORD_SIZE, VERSION_MAJOR, VERSION_MINOR};

    #[test]
    fn blank_storage_writes_defaults() {
        let mut store = common::Store::new();

        {
            let mut config = Config::new(&mut store);
            config.init().unwrap();
        }

        let record = store.record();
        assert_eq!(record.len(), RECORD_SIZE);
        assert_eq!(record[0..2], MAGIC.to_le_bytes());
        assert_eq!(record[2], VERSION_MAJOR);
        assert_eq!(record[3], VERSION_MINOR);
        assert_eq!(record[4..6], 0u16.to_le_bytes());
        assert_eq!(record[6..10], common::crc32(&record[..6]).to_le_bytes());
    }

    #[test]
    fn valid_record_is_left_untouched() {
        let mut store = common::Store::new_with_record(common::raw_record(&[(0, &[1])]));

        {
            let mut config = Config::new(&mut store);
            config.init().unwrap();
            assert_eq!(config.get::<u8>(Field::Mode).unwrap(), 1);
        }

        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn flipped_magic_rebuilds_defaults() {
        let mut record = common::raw_record(&[(0, &[1])]);
        record[0] ^= 0xFF;
        let mut store = common::Store::new_with_record(record);

        let mut config = Config::new(&mut store);
        config.init().unwrap();

        let mut out = [0u8; RECORD_SIZE];
        config.dump(&mut out);
        assert_eq!(out[4..6], 0u16.to_le_bytes());
        assert_eq!(
            config.get::<u8>(Field::Mode).unwrap_err(),
            Error::FieldNotFound
        );
    }

    #[test]
    fn oversized_length_rebuilds_defaults() {
        let mut record = common::raw_record(&[(0, &[1])]);
        record[4..6].copy_from_slice(&200u16.to_le_bytes());
        let mut store = common::Store::new_with_record(record);

        let mut config = Config::new(&mut store);
        config.init().unwrap();
        assert_eq!(
            config.get::<u8>(Field::Mode).unwrap_err(),
            Error::FieldNotFound
        );
    }

    #[test]
    fn corrupt_value_byte_rebuilds_defaults() {
        let mut record = common::raw_record(&[(0, &[1])]);
        record[8] ^= 0x01;
        let mut store = common::Store::new_with_record(record);

        let mut config = Config::new(&mut store);
        config.init().unwrap();
        assert_eq!(
            config.get::<u8>(Field::Mode).unwrap_err(),
            Error::FieldNotFound
        );
    }

    #[test]
    fn wrong_major_version_rebuilds_defaults() {
        // The checksum is valid; only the version stamp disagrees.
        let mut record = common::raw_record(&[(0, &[1])]);
        record[2] = VERSION_MAJOR + 1;
        let tail = 6 + 3;
        let crc = common::crc32(&record[..tail]).to_le_bytes();
        record[tail..tail + 4].copy_from_slice(&crc);
        let mut store = common::Store::new_with_record(record);

        let mut config = Config::new(&mut store);
        config.init().unwrap();
        assert_eq!(
            config.get::<u8>(Field::Mode).unwrap_err(),
            Error::FieldNotFound
        );
    }

    #[test]
    fn rebuild_persist_failure_is_fatal() {
        // Operation 0 is the failed load of the missing record; the fault
        // hits the default-record write.
        let mut store = common::Store::new_with_fault(1);

        let mut config = Config::new(&mut store);
        assert_eq!(config.init().unwrap_err(), Error::CannotInitialize);
    }

    #[test]
    fn rebuild_readback_failure_is_fatal() {
        // The defaults are persisted, then the confirming re-read faults.
        let mut store = common::Store::new_with_fault(2);

        let mut config = Config::new(&mut store);
        assert_eq!(config.init().unwrap_err(), Error::CannotInitialize);
    }
}

mod erase {
    use crate::common;
    use pretty_assertions::assert_eq;
    use uwb_config::error::Error;
    use uwb_config::{Config, Field};

    #[test]
    fn reads_stay_stale_until_reinit() {
        let mut store = common::Store::new();

        let mut config = Config::new(&mut store);
        config.init().unwrap();
        config.set(Field::Mode, 1u8).unwrap();

        config.erase().unwrap();
        // The in-memory image is explicitly left untouched by erase.
        assert_eq!(config.get::<u8>(Field::Mode).unwrap(), 1);

        config.init().unwrap();
        assert_eq!(
            config.get::<u8>(Field::Mode).unwrap_err(),
            Error::FieldNotFound
        );
    }

    #[test]
    fn missing_record_errors() {
        let mut store = common::Store::new();

        let mut config = Config::new(&mut store);
        assert_eq!(config.erase().unwrap_err(), Error::StorageUnavailable);
    }
}

mod refresh {
    use crate::common;
    use pretty_assertions::assert_eq;
    use uwb_config::error::Error;
    use uwb_config::{Config, Field};

    #[test]
    fn picks_up_external_record_changes() {
        let mut store = common::Store::new();

        {
            let mut config = Config::new(&mut store);
            config.init().unwrap();
            config.set(Field::Mode, 1u8).unwrap();
        }

        // External tooling rewrites the record behind the store's back.
        store
            .records
            .insert(common::RECORD_ID, common::raw_record(&[(0, &[7])]));

        let mut config = Config::new(&mut store);
        config.refresh().unwrap();
        assert_eq!(config.get::<u8>(Field::Mode).unwrap(), 7);
    }

    #[test]
    fn does_not_validate() {
        let mut record = common::raw_record(&[(0, &[5])]);
        // Corrupt the checksum tail; init would rebuild, refresh must not.
        record[9] ^= 0xFF;
        let mut store = common::Store::new_with_record(record);

        let mut config = Config::new(&mut store);
        config.refresh().unwrap();
        assert_eq!(config.get::<u8>(Field::Mode).unwrap(), 5);
    }

    #[test]
    fn missing_record_errors() {
        let mut store = common::Store::new();

        let mut config = Config::new(&mut store);
        assert_eq!(config.refresh().unwrap_err(), Error::StorageUnavailable);
    }
}

mod dump {
    use crate::common;
    use pretty_assertions::assert_eq;
    use uwb_config::{Config, Field, RECORD_SIZE};

    #[test]
    fn copies_at_most_record_size() {
        let mut store = common::Store::new();

        let mut config = Config::new(&mut store);
        config.init().unwrap();
        config.set(Field::Mode, 1u8).unwrap();

        let mut full = [0u8; RECORD_SIZE * 2];
        assert_eq!(config.dump(&mut full), RECORD_SIZE);

        let mut head = [0u8; 16];
        assert_eq!(config.dump(&mut head), 16);
        assert_eq!(head, full[..16]);
    }
}
