// ═══════════════════════════════════════════════════════════════════
// Storage Tests — snapshot format, backends, StorageManager
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use uuid::Uuid;

use finance_tracker_core::errors::CoreError;
use finance_tracker_core::models::finance::FinanceData;
use finance_tracker_core::models::settings::SnapshotFormat;
use finance_tracker_core::models::transaction::{InstallmentPlan, Transaction, TransactionType};
use finance_tracker_core::storage::backend::{FileBackend, KeyValueBackend, MemoryBackend};
use finance_tracker_core::storage::format::{self, BINARY_HEADER_SIZE, CURRENT_VERSION, MAGIC};
use finance_tracker_core::storage::manager::StorageManager;

const KEY: &str = "finance-storage";

/// Amounts produced by division and repeated arithmetic, whose shortest
/// decimal form needs all 17 significant digits.
fn computed_amounts() -> FinanceData {
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let transactions = (1..=2_000u32)
        .map(|n| {
            let total = 1234.56 + f64::from(n) * 0.37;
            let count = 7 + n % 17;
            Transaction {
                id: Uuid::new_v4(),
                kind: TransactionType::Expense,
                amount: f64::from(n) / 7.0 * 1.37,
                description: format!("Compra {n}"),
                category: "Outros".into(),
                date,
                is_recurring: false,
                installments: Some(InstallmentPlan::new(count, total / f64::from(count))),
            }
        })
        .collect();
    FinanceData {
        transactions,
        ..FinanceData::default()
    }
}

// ═══════════════════════════════════════════════════════════════════
// Snapshot format
// ═══════════════════════════════════════════════════════════════════

mod snapshot_format {
    use super::*;

    #[test]
    fn json_envelope_wraps_state_with_version() {
        let bytes = format::encode(&FinanceData::demo(), SnapshotFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], u64::from(CURRENT_VERSION));
        for key in ["transactions", "assets", "goals", "investments"] {
            assert!(value["state"][key].is_array(), "missing {key}");
        }
    }

    #[test]
    fn binary_header_layout() {
        let bytes = format::encode(&FinanceData::default(), SnapshotFormat::Binary).unwrap();
        assert!(bytes.len() > BINARY_HEADER_SIZE);
        assert_eq!(&bytes[..4], MAGIC);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), CURRENT_VERSION);
    }

    #[test]
    fn both_encodings_restore_the_same_state() {
        let data = FinanceData::demo();
        for fmt in [SnapshotFormat::Json, SnapshotFormat::Binary] {
            let bytes = format::encode(&data, fmt).unwrap();
            assert_eq!(format::detect_format(&bytes).unwrap(), fmt);
            assert_eq!(format::decode(&bytes).unwrap(), data);
        }
    }

    #[test]
    fn json_keeps_every_float_bit() {
        let data = computed_amounts();
        let bytes = format::encode(&data, SnapshotFormat::Json).unwrap();
        let decoded = format::decode(&bytes).unwrap();
        for (before, after) in data.transactions.iter().zip(&decoded.transactions) {
            assert_eq!(before.amount.to_bits(), after.amount.to_bits());
            let (p, q) = (
                before.installments.as_ref().unwrap(),
                after.installments.as_ref().unwrap(),
            );
            assert_eq!(p.installment_value.to_bits(), q.installment_value.to_bits());
        }
        assert_eq!(decoded, data);
    }

    #[test]
    fn leading_whitespace_is_still_json() {
        let mut bytes = b"  \n".to_vec();
        bytes.extend(format::encode(&FinanceData::default(), SnapshotFormat::Json).unwrap());
        assert_eq!(format::detect_format(&bytes).unwrap(), SnapshotFormat::Json);
        assert_eq!(format::decode(&bytes).unwrap(), FinanceData::default());
    }

    #[test]
    fn empty_and_unknown_input_is_invalid() {
        assert!(matches!(
            format::decode(b""),
            Err(CoreError::InvalidSnapshot(_))
        ));
        assert!(matches!(
            format::decode(b"   "),
            Err(CoreError::InvalidSnapshot(_))
        ));
        assert!(matches!(
            format::decode(b"PK\x03\x04"),
            Err(CoreError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn newer_or_zero_versions_are_rejected() {
        assert!(matches!(
            format::decode(br#"{"state":{},"version":2}"#),
            Err(CoreError::UnsupportedVersion(2))
        ));
        assert!(matches!(
            format::decode(br#"{"state":{},"version":0}"#),
            Err(CoreError::UnsupportedVersion(0))
        ));

        let mut bin = MAGIC.to_vec();
        bin.extend_from_slice(&99u16.to_le_bytes());
        assert!(matches!(
            format::decode(&bin),
            Err(CoreError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn truncated_binary_fails() {
        assert!(matches!(
            format::decode(b"FNTK\x01"),
            Err(CoreError::InvalidSnapshot(_))
        ));

        let bytes = format::encode(&FinanceData::demo(), SnapshotFormat::Binary).unwrap();
        let cut = &bytes[..bytes.len() / 2];
        assert!(matches!(
            format::decode(cut),
            Err(CoreError::Deserialization(_))
        ));
    }

    #[test]
    fn malformed_json_fails_to_deserialize() {
        assert!(matches!(
            format::decode(br#"{"state": [1, 2"#),
            Err(CoreError::Deserialization(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// MemoryBackend
// ═══════════════════════════════════════════════════════════════════

mod memory_backend {
    use super::*;

    #[test]
    fn write_read_remove() {
        let mut b = MemoryBackend::new();
        assert_eq!(b.read("k").unwrap(), None);
        b.write("k", b"abc").unwrap();
        assert!(b.contains_key("k"));
        assert_eq!(b.read("k").unwrap(), Some(b"abc".to_vec()));
        assert_eq!(b.used_bytes(), 3);
        assert!(b.remove("k").unwrap());
        assert!(!b.remove("k").unwrap());
    }

    #[test]
    fn writes_overwrite() {
        let mut b = MemoryBackend::new();
        b.write("k", b"first").unwrap();
        b.write("k", b"2").unwrap();
        assert_eq!(b.read("k").unwrap(), Some(b"2".to_vec()));
        assert_eq!(b.used_bytes(), 1);
    }

    #[test]
    fn quota_rejects_oversized_writes() {
        let mut b = MemoryBackend::with_quota(8);
        b.write("k", b"12345678").unwrap();
        // replacing the same key may reuse its space
        b.write("k", b"abcdefgh").unwrap();
        let err = b.write("other", b"x").unwrap_err();
        assert!(matches!(
            err,
            CoreError::StorageFull {
                needed: 1,
                available: 0
            }
        ));
        assert!(err.is_storage_error());
        assert_eq!(b.read("k").unwrap(), Some(b"abcdefgh".to_vec()));
    }
}

// ═══════════════════════════════════════════════════════════════════
// FileBackend
// ═══════════════════════════════════════════════════════════════════

mod file_backend {
    use super::*;

    #[test]
    fn creates_root_and_roundtrips_values() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("store");
        let mut b = FileBackend::new(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(b.root(), root.as_path());

        assert_eq!(b.read(KEY).unwrap(), None);
        b.write(KEY, b"payload").unwrap();
        assert_eq!(b.read(KEY).unwrap(), Some(b"payload".to_vec()));
        assert!(b.path_for(KEY).unwrap().exists());
        assert!(b.remove(KEY).unwrap());
        assert!(!b.remove(KEY).unwrap());
    }

    #[test]
    fn no_temporary_file_is_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = FileBackend::new(dir.path()).unwrap();
        b.write(KEY, b"one").unwrap();
        b.write(KEY, b"two").unwrap();
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, [format!("{KEY}.snapshot")]);
    }

    #[test]
    fn rejects_keys_that_escape_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let b = FileBackend::new(dir.path()).unwrap();
        for key in ["", ".", "..", "a/b", "a\\b"] {
            assert!(
                matches!(b.path_for(key), Err(CoreError::Storage(_))),
                "accepted {key:?}"
            );
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// StorageManager
// ═══════════════════════════════════════════════════════════════════

mod storage_manager {
    use super::*;

    #[test]
    fn load_from_empty_backend_is_none() {
        let b = MemoryBackend::new();
        assert_eq!(StorageManager::load(&b, KEY).unwrap(), None);
    }

    #[test]
    fn save_then_load_in_both_formats() {
        let data = FinanceData::demo();
        for fmt in [SnapshotFormat::Json, SnapshotFormat::Binary] {
            let mut b = MemoryBackend::new();
            StorageManager::save(&mut b, KEY, &data, fmt).unwrap();
            assert_eq!(StorageManager::load(&b, KEY).unwrap(), Some(data.clone()));
        }
    }

    #[test]
    fn binary_snapshots_are_smaller() {
        let data = FinanceData::demo();
        let mut json = MemoryBackend::new();
        let mut bin = MemoryBackend::new();
        StorageManager::save(&mut json, KEY, &data, SnapshotFormat::Json).unwrap();
        StorageManager::save(&mut bin, KEY, &data, SnapshotFormat::Binary).unwrap();
        assert!(bin.used_bytes() < json.used_bytes());
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let mut b = MemoryBackend::new();
        StorageManager::save(&mut b, KEY, &FinanceData::demo(), SnapshotFormat::Json).unwrap();
        StorageManager::save(&mut b, KEY, &FinanceData::default(), SnapshotFormat::Json).unwrap();
        assert_eq!(
            StorageManager::load(&b, KEY).unwrap(),
            Some(FinanceData::default())
        );
    }

    #[test]
    fn clear_removes_the_snapshot() {
        let mut b = MemoryBackend::new();
        StorageManager::save(&mut b, KEY, &FinanceData::default(), SnapshotFormat::Json).unwrap();
        assert!(StorageManager::clear(&mut b, KEY).unwrap());
        assert_eq!(StorageManager::load(&b, KEY).unwrap(), None);
    }

    #[test]
    fn file_backend_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let data = FinanceData::demo();
        {
            let mut b = FileBackend::new(dir.path()).unwrap();
            StorageManager::save(&mut b, KEY, &data, SnapshotFormat::Binary).unwrap();
        }
        let b = FileBackend::new(dir.path()).unwrap();
        assert_eq!(StorageManager::load(&b, KEY).unwrap(), Some(data));
    }

    #[test]
    fn corrupt_snapshot_surfaces_an_error() {
        let mut b = MemoryBackend::new();
        b.write(KEY, b"not a snapshot").unwrap();
        assert!(StorageManager::load(&b, KEY).is_err());
    }
}
