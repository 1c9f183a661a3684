//! Stable binary layout for stored bounty records
//!
//! Records are persisted as fixed-layout byte blobs so the store stays
//! compatible with existing deployments. The layout is frozen:
//!
//! ```text
//! offset   0..32   creator account id
//! offset  32..64   worker account id (all-zero = unset)
//! offset  64..96   verifier account id
//! offset  96..104  amount   (u64, big-endian)
//! offset 104..112  deadline (u64, big-endian)
//! offset 112       status   (u8 wire code)
//! offset 113..     description (remaining bytes)
//! ```
//!
//! All interpretation of these bytes happens here, at the store boundary;
//! everything above it operates on the typed [`BountyRecord`]. Decode
//! failures are reported as [`EscrowError::Corrupted`], never panics.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::Cursor;
use taskvault_core::record::{BountyRecord, Status};
use taskvault_core::types::{AccountId, ACCOUNT_ID_LEN};
use taskvault_core::{EscrowError, Result};

/// Byte offset of the creator account id.
pub const CREATOR_OFFSET: usize = 0;
/// Byte offset of the worker account id (all-zero when unset).
pub const WORKER_OFFSET: usize = 32;
/// Byte offset of the verifier account id.
pub const VERIFIER_OFFSET: usize = 64;
/// Byte offset of the big-endian amount.
pub const AMOUNT_OFFSET: usize = 96;
/// Byte offset of the big-endian deadline.
pub const DEADLINE_OFFSET: usize = 104;
/// Byte offset of the status code.
pub const STATUS_OFFSET: usize = 112;
/// Byte offset where the variable-length description starts.
pub const DESCRIPTION_OFFSET: usize = 113;
/// Size of the fixed-layout header preceding the description.
pub const FIXED_HEADER_LEN: usize = DESCRIPTION_OFFSET;

/// Encoded size of a record: fixed header plus its description.
pub fn encoded_len(record: &BountyRecord) -> usize {
    FIXED_HEADER_LEN + record.description.len()
}

/// Encode a record into the stable byte layout.
pub fn encode_record(record: &BountyRecord) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(record));
    buf.extend_from_slice(record.creator.as_bytes());
    buf.extend_from_slice(record.worker.unwrap_or(AccountId::ZERO).as_bytes());
    buf.extend_from_slice(record.verifier.as_bytes());
    buf.extend_from_slice(&record.amount.to_be_bytes());
    buf.extend_from_slice(&record.deadline.to_be_bytes());
    buf.push(record.status.as_u8());
    buf.extend_from_slice(&record.description);
    buf
}

/// Decode a record from stored bytes.
///
/// The bounty id is not part of the blob (it is the storage key), so the
/// caller supplies it. Besides shape checks, the decoded record is run
/// through [`BountyRecord::check_consistency`] so bytes describing an
/// impossible state (terminal with value, live without, worker mismatch)
/// are refused here and never reach the engine.
pub fn decode_record(id: u64, bytes: &[u8]) -> Result<BountyRecord> {
    if bytes.len() < FIXED_HEADER_LEN {
        return Err(EscrowError::Corrupted {
            reason: format!(
                "bounty {}: {} bytes is shorter than the {}-byte header",
                id,
                bytes.len(),
                FIXED_HEADER_LEN
            ),
        });
    }

    let creator = read_account(bytes, CREATOR_OFFSET);
    let worker_raw = read_account(bytes, WORKER_OFFSET);
    let verifier = read_account(bytes, VERIFIER_OFFSET);

    let mut numbers = Cursor::new(&bytes[AMOUNT_OFFSET..STATUS_OFFSET]);
    let amount = numbers
        .read_u64::<BigEndian>()
        .map_err(|e| corrupt(id, "amount", e))?;
    let deadline = numbers
        .read_u64::<BigEndian>()
        .map_err(|e| corrupt(id, "deadline", e))?;

    let status_code = bytes[STATUS_OFFSET];
    let status = Status::from_u8(status_code).ok_or_else(|| EscrowError::Corrupted {
        reason: format!("bounty {}: unknown status code {}", id, status_code),
    })?;

    let record = BountyRecord {
        id,
        creator,
        verifier,
        worker: if worker_raw.is_zero() {
            None
        } else {
            Some(worker_raw)
        },
        amount,
        deadline,
        status,
        description: bytes[DESCRIPTION_OFFSET..].to_vec(),
    };
    record.check_consistency()?;
    Ok(record)
}

fn read_account(bytes: &[u8], offset: usize) -> AccountId {
    let mut raw = [0u8; ACCOUNT_ID_LEN];
    raw.copy_from_slice(&bytes[offset..offset + ACCOUNT_ID_LEN]);
    AccountId::from_bytes(raw)
}

fn corrupt(id: u64, field: &str, err: std::io::Error) -> EscrowError {
    EscrowError::Corrupted {
        reason: format!("bounty {}: unreadable {}: {}", id, field, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; ACCOUNT_ID_LEN])
    }

    fn record() -> BountyRecord {
        BountyRecord::new(3, acct(1), acct(2), 1_500_000, 7_777, b"logo".to_vec())
    }

    #[test]
    fn test_layout_offsets() {
        let mut r = record();
        r.worker = Some(acct(9));
        r.status = Status::Accepted;
        let bytes = encode_record(&r);

        assert_eq!(bytes.len(), FIXED_HEADER_LEN + 4);
        assert_eq!(&bytes[CREATOR_OFFSET..WORKER_OFFSET], &[1u8; 32]);
        assert_eq!(&bytes[WORKER_OFFSET..VERIFIER_OFFSET], &[9u8; 32]);
        assert_eq!(&bytes[VERIFIER_OFFSET..AMOUNT_OFFSET], &[2u8; 32]);
        assert_eq!(
            &bytes[AMOUNT_OFFSET..DEADLINE_OFFSET],
            &1_500_000u64.to_be_bytes()
        );
        assert_eq!(
            &bytes[DEADLINE_OFFSET..STATUS_OFFSET],
            &7_777u64.to_be_bytes()
        );
        assert_eq!(bytes[STATUS_OFFSET], 1);
        assert_eq!(&bytes[DESCRIPTION_OFFSET..], b"logo");
    }

    #[test]
    fn test_unset_worker_encodes_as_zero() {
        let bytes = encode_record(&record());
        assert_eq!(&bytes[WORKER_OFFSET..VERIFIER_OFFSET], &[0u8; 32]);

        let decoded = decode_record(3, &bytes).unwrap();
        assert_eq!(decoded.worker, None);
    }

    #[test]
    fn test_decode_restores_record() {
        let mut r = record();
        r.worker = Some(acct(5));
        r.status = Status::Submitted;
        let decoded = decode_record(r.id, &encode_record(&r)).unwrap();
        assert_eq!(decoded, r);
    }

    #[test]
    fn test_empty_description_is_valid() {
        let r = BountyRecord::new(0, acct(1), acct(1), 10, 99, Vec::new());
        let bytes = encode_record(&r);
        assert_eq!(bytes.len(), FIXED_HEADER_LEN);
        assert_eq!(decode_record(0, &bytes).unwrap().description, Vec::<u8>::new());
    }

    #[test]
    fn test_truncated_header_is_corrupt() {
        let bytes = encode_record(&record());
        let err = decode_record(3, &bytes[..FIXED_HEADER_LEN - 1]).unwrap_err();
        assert!(err.is_corruption(), "got {:?}", err);
    }

    #[test]
    fn test_unknown_status_code_is_corrupt() {
        let mut bytes = encode_record(&record());
        bytes[STATUS_OFFSET] = 42;
        let err = decode_record(3, &bytes).unwrap_err();
        assert!(err.to_string().contains("unknown status code"));
    }

    #[test]
    fn test_stale_amount_on_terminal_record_is_corrupt() {
        // Refunded status with the amount bytes left untouched: the exact
        // stuck-funds shape the decoder must refuse.
        let mut bytes = encode_record(&record());
        bytes[STATUS_OFFSET] = Status::Refunded.as_u8();
        let err = decode_record(3, &bytes).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_worker_status_mismatch_is_corrupt() {
        // Accepted status but an all-zero worker field.
        let mut bytes = encode_record(&record());
        bytes[STATUS_OFFSET] = Status::Accepted.as_u8();
        let err = decode_record(3, &bytes).unwrap_err();
        assert!(err.is_corruption());
    }
}
