// MockContracts tests
// End-to-end marketplace flows through the facade the UI calls

use career_ledger::bounty::BountyStatus;
use career_ledger::chain::FixedClock;
use career_ledger::gig::GigStatus;
use career_ledger::storage::MemoryStore;
use career_ledger::token::{TokenLedger, DEFAULT_BALANCE};
use career_ledger::{Amount, LedgerConfig, LedgerError, MockContracts};
use std::sync::Arc;

const NOW: u64 = 1_700_000_000;
const USDT_100: Amount = Amount::new(100_000000);
const USDT_50: Amount = Amount::new(50_000000);

fn contracts() -> MockContracts {
    let config = LedgerConfig::default();
    MockContracts::with_clock(MemoryStore::new(), FixedClock::new(NOW), config).unwrap()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_full_bounty_lifecycle() {
    let mut c = contracts();
    let deadline = NOW + 7 * 86_400;

    let id = c
        .create_bounty("0xA", "Fix bug", "desc", 1, deadline, USDT_100)
        .unwrap();
    assert_eq!(id, 1);
    assert_eq!(c.get_balance("0xA"), DEFAULT_BALANCE.checked_sub(USDT_100).unwrap());

    c.submit_to_bounty(1, "0xB", "ipfs://Qm1", &[]).unwrap();
    assert_eq!(c.get_bounty(1).unwrap().submission_count(), 1);

    c.select_winners(1, ["0xB"], &[100]).unwrap();
    assert_eq!(c.get_bounty(1).unwrap().status(), BountyStatus::Completed);
    assert_eq!(c.get_balance("0xB"), DEFAULT_BALANCE.checked_add(USDT_100).unwrap());
}

#[test]
fn test_duplicate_proposal_scenario() {
    let mut c = contracts();

    let id = c
        .post_gig("0xC", "Title", "short", "ipfs://details", USDT_50, Amount::ZERO, 30, 7)
        .unwrap();
    assert_eq!(id, 1);

    c.submit_proposal(1, "0xD", "ipfs://p1").unwrap();
    let result = c.submit_proposal(1, "0xD", "ipfs://p2");

    assert!(matches!(result, Err(LedgerError::DuplicateSubmission { .. })));
}

#[test]
fn test_full_gig_lifecycle() {
    let mut c = contracts();

    let id = c
        .post_gig("0xC", "Title", "short", "ipfs://details", USDT_50, Amount::ZERO, 30, 7)
        .unwrap();
    c.submit_proposal(id, "0xD", "ipfs://p1").unwrap();
    c.submit_proposal(id, "0xE", "ipfs://p2").unwrap();
    c.select_proposal(id, 1, "0xC").unwrap();
    assert_eq!(c.get_gig(id).unwrap().status(), GigStatus::InProgress);

    let paid = c.complete_gig(id, "0xC").unwrap();

    assert_eq!(paid.map(|(_, a)| a), Some(USDT_50));
    assert_eq!(c.get_balance("0xD"), DEFAULT_BALANCE.checked_add(USDT_50).unwrap());
    assert_eq!(c.get_balance("0xC"), DEFAULT_BALANCE.checked_sub(USDT_50).unwrap());
    assert_eq!(c.get_gig(id).unwrap().status(), GigStatus::Completed);
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_escrow_conservation() {
    for reward in [0u128, 1, 999, 100_000000, 1_000_000_000] {
        let mut c = contracts();
        c.mint("0xB", Amount::new(3)).unwrap();
        let before_a = c.get_balance("0xA");
        let before_b = c.get_balance("0xB");

        c.create_bounty("0xA", "n", "d", 0, NOW, Amount::new(reward)).unwrap();

        assert_eq!(
            c.get_balance("0xA"),
            before_a.checked_sub(Amount::new(reward)).unwrap()
        );
        assert_eq!(c.get_balance("0xB"), before_b);
    }
}

#[test]
fn test_cancellation_penalty() {
    for reward in [1u128, 9, 10, 11, 100_000000, 123_456_789] {
        let mut c = contracts();
        let id = c.create_bounty("0xA", "n", "d", 0, NOW, Amount::new(reward)).unwrap();
        let before = c.get_balance("0xA");

        c.cancel_bounty(id, "0xA").unwrap();

        let refund = Amount::new(reward - reward / 10);
        assert_eq!(c.get_balance("0xA"), before.checked_add(refund).unwrap());
        assert_eq!(c.get_bounty(id).unwrap().status(), BountyStatus::Cancelled);
    }
}

#[test]
fn test_configured_penalty_applies() {
    let config = LedgerConfig::new().with_cancel_penalty_percent(25);
    let mut c =
        MockContracts::with_clock(MemoryStore::new(), FixedClock::new(NOW), config).unwrap();
    let id = c.create_bounty("0xA", "n", "d", 0, NOW, Amount::new(1_000)).unwrap();

    let refund = c.cancel_bounty(id, "0xA").unwrap();

    assert_eq!(refund, Amount::new(750));
    assert_eq!(c.escrow_balance(), Amount::new(250));
}

#[test]
fn test_authorization_enforced_without_mutation() {
    let mut c = contracts();
    let bounty = c.create_bounty("0xA", "n", "d", 0, NOW, USDT_100).unwrap();
    let gig = c
        .post_gig("0xC", "t", "s", "ipfs://d", USDT_50, Amount::ZERO, 30, 7)
        .unwrap();
    c.submit_proposal(gig, "0xD", "ipfs://p").unwrap();

    let tokens_before = c.tokens().clone();
    let bounties_before = c.bounty_ledger().clone();
    let gigs_before = c.gig_ledger().clone();

    assert!(matches!(c.cancel_bounty(bounty, "0xEVE"), Err(LedgerError::Unauthorized { .. })));
    assert!(matches!(c.cancel_gig(gig, "0xEVE"), Err(LedgerError::Unauthorized { .. })));
    assert!(matches!(c.select_proposal(gig, 1, "0xEVE"), Err(LedgerError::Unauthorized { .. })));
    assert!(matches!(c.complete_gig(gig, "0xEVE"), Err(LedgerError::Unauthorized { .. })));

    assert_eq!(c.tokens(), &tokens_before);
    assert_eq!(c.bounty_ledger(), &bounties_before);
    assert_eq!(c.gig_ledger(), &gigs_before);
}

#[test]
fn test_authorization_ignores_case() {
    let mut c = contracts();
    let gig = c
        .post_gig("0xabcDEF", "t", "s", "ipfs://d", USDT_50, Amount::ZERO, 30, 7)
        .unwrap();

    c.cancel_gig(gig, "0xABCdef").unwrap();

    assert_eq!(c.get_gig(gig).unwrap().status(), GigStatus::Cancelled);
}

// ============================================================================
// TOKEN FACADE
// ============================================================================

#[test]
fn test_approve_and_read_allowance() {
    let mut c = contracts();

    c.approve("0xA", "0xB", Amount::new(10));
    c.approve("0xa", "0xb", Amount::new(4));

    assert_eq!(c.get_allowance("0xA", "0xB"), Amount::new(4));
}

#[test]
fn test_strict_allowances_gate_escrow() {
    let config = LedgerConfig::new().with_strict_allowances(true);
    let mut c =
        MockContracts::with_clock(MemoryStore::new(), FixedClock::new(NOW), config).unwrap();
    let escrow = TokenLedger::escrow_address();

    let denied = c.create_bounty("0xA", "n", "d", 0, NOW, USDT_100);
    assert!(matches!(denied, Err(LedgerError::InsufficientAllowance { .. })));
    assert!(c.get_bounty(1).is_none());

    c.approve("0xA", escrow.clone(), USDT_100);
    c.create_bounty("0xA", "n", "d", 0, NOW, USDT_100).unwrap();

    assert_eq!(c.get_allowance("0xA", escrow), Amount::ZERO);
}

#[test]
fn test_transfer_insufficient_balance() {
    let mut c = contracts();
    let too_much = DEFAULT_BALANCE.checked_add(Amount::new(1)).unwrap();

    let result = c.transfer("0xA", "0xB", too_much);

    assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
    assert_eq!(c.get_balance("0xB"), DEFAULT_BALANCE);
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

#[test]
fn test_timestamps_follow_clock() {
    let clock = Arc::new(FixedClock::new(NOW));
    let config = LedgerConfig::default();
    let mut c =
        MockContracts::with_clock(MemoryStore::new(), Arc::clone(&clock), config).unwrap();

    let bounty = c.create_bounty("0xA", "n", "d", 0, NOW + 100, Amount::new(1)).unwrap();
    clock.advance(60);
    c.submit_to_bounty(bounty, "0xB", "ipfs://s", &["ipfs://e1", "ipfs://e2"]).unwrap();
    let gig = c
        .post_gig("0xC", "t", "s", "ipfs://d", Amount::ZERO, Amount::ZERO, 30, 2)
        .unwrap();

    assert_eq!(c.get_bounty(bounty).unwrap().created_at(), NOW);
    assert_eq!(c.submissions(bounty)[0].timestamp(), NOW + 60);
    assert_eq!(c.submissions(bounty)[0].evidence_uris().len(), 2);
    assert_eq!(c.get_gig(gig).unwrap().posted_at(), NOW + 60);
    assert_eq!(c.get_gig(gig).unwrap().deadline(), NOW + 60 + 2 * 86_400);
}

#[test]
fn test_invalid_config_rejected() {
    let config = LedgerConfig::new().with_cancel_penalty_percent(150);

    let result = MockContracts::open(MemoryStore::new(), config);

    assert!(matches!(result, Err(LedgerError::InvalidConfig(_))));
}

#[test]
fn test_in_memory_starts_empty() {
    let c = MockContracts::in_memory();

    assert!(c.get_bounty(1).is_none());
    assert!(c.get_gig(1).is_none());
    assert_eq!(c.escrow_balance(), Amount::ZERO);
}
