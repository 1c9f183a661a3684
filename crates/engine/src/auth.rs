//! Role predicates
//!
//! Pure functions comparing a calling principal against the roles recorded
//! on a bounty. No side effects; used only as guards inside the transition
//! engine.

use taskvault_core::record::BountyRecord;
use taskvault_core::types::AccountId;

/// Is the principal the record's creator?
pub fn is_creator(principal: &AccountId, record: &BountyRecord) -> bool {
    *principal == record.creator
}

/// Is the principal the record's committed worker?
///
/// Always false while no worker is set.
pub fn is_worker(principal: &AccountId, record: &BountyRecord) -> bool {
    record.worker.as_ref() == Some(principal)
}

/// Is the principal the record's verifier?
pub fn is_verifier(principal: &AccountId, record: &BountyRecord) -> bool {
    *principal == record.verifier
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 32])
    }

    fn record() -> BountyRecord {
        BountyRecord::new(0, acct(1), acct(2), 100, 10, Vec::new())
    }

    #[test]
    fn test_roles_match_record_fields() {
        let mut r = record();
        assert!(is_creator(&acct(1), &r));
        assert!(!is_creator(&acct(2), &r));

        assert!(is_verifier(&acct(2), &r));
        assert!(!is_verifier(&acct(1), &r));

        assert!(!is_worker(&acct(3), &r), "no worker set yet");
        r.worker = Some(acct(3));
        assert!(is_worker(&acct(3), &r));
        assert!(!is_worker(&acct(1), &r));
    }

    #[test]
    fn test_one_principal_can_hold_two_roles() {
        // A creator acting as its own verifier is representable; whether
        // it is allowed is the engine's decision, not this module's.
        let r = BountyRecord::new(0, acct(1), acct(1), 100, 10, Vec::new());
        assert!(is_creator(&acct(1), &r));
        assert!(is_verifier(&acct(1), &r));
    }
}
