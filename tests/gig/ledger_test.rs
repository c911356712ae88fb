// Gig ledger tests
// Posting with escrow, proposals, selection, completion and cancellation

use career_ledger::gig::{GigLedger, GigStatus, NewGig, SECONDS_PER_DAY};
use career_ledger::token::{TokenLedger, DEFAULT_BALANCE};
use career_ledger::types::{Address, Amount};
use career_ledger::LedgerError;

const NOW: u64 = 1_700_000_000;

fn addr(s: &str) -> Address {
    Address::new(s)
}

fn new_gig(amount: u128) -> NewGig {
    NewGig {
        title: "Title".to_string(),
        short_description: "short".to_string(),
        details_uri: "ipfs://details".to_string(),
        usdt_amount: Amount::new(amount),
        native_stake: Amount::ZERO,
        duration: 30,
        proposal_duration: 7,
    }
}

fn setup(amount: u128) -> (TokenLedger, GigLedger, u64) {
    let mut tokens = TokenLedger::default();
    let mut gigs = GigLedger::new();
    let id = gigs.post(&mut tokens, &addr("0xC"), new_gig(amount), NOW).unwrap();
    (tokens, gigs, id)
}

fn propose(gigs: &mut GigLedger, id: u64, who: &str) {
    gigs.submit_proposal(id, &addr(who), format!("ipfs://{}", who), NOW + 1)
        .unwrap();
}

// ============================================================================
// POST
// ============================================================================

#[test]
fn test_post_builds_open_record() {
    let (tokens, gigs, id) = setup(50_000000);
    let gig = gigs.get(id).unwrap();

    assert_eq!(id, 1);
    assert_eq!(gig.poster(), &addr("0xc"));
    assert_eq!(gig.status(), GigStatus::Open);
    assert_eq!(gig.posted_at(), NOW);
    assert_eq!(gig.deadline(), NOW + 7 * SECONDS_PER_DAY);
    assert_eq!(gig.duration(), 30);
    assert_eq!(gig.selected_proposal(), 0);
    assert_eq!(gig.proposal_count(), 0);
    assert_eq!(
        tokens.balance(&addr("0xC")),
        DEFAULT_BALANCE.checked_sub(Amount::new(50_000000)).unwrap()
    );
    assert_eq!(tokens.escrow_balance(), Amount::new(50_000000));
}

#[test]
fn test_native_stake_recorded_not_escrowed() {
    let mut tokens = TokenLedger::default();
    let mut gigs = GigLedger::new();
    let mut draft = new_gig(0);
    draft.native_stake = Amount::new(5_000);

    let id = gigs.post(&mut tokens, &addr("0xC"), draft, NOW).unwrap();

    assert_eq!(gigs.get(id).unwrap().native_stake(), Amount::new(5_000));
    assert_eq!(tokens.balance(&addr("0xC")), DEFAULT_BALANCE);
}

#[test]
fn test_post_without_funds_fails_cleanly() {
    let mut tokens = TokenLedger::new(Amount::new(10), false);
    let mut gigs = GigLedger::new();

    let result = gigs.post(&mut tokens, &addr("0xC"), new_gig(11), NOW);

    assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
    assert_eq!(gigs.gigs().count(), 0);
    assert_eq!(gigs.next_id(), 1);
}

#[test]
fn test_gigs_by_poster() {
    let mut tokens = TokenLedger::default();
    let mut gigs = GigLedger::new();
    gigs.post(&mut tokens, &addr("0xC"), new_gig(0), NOW).unwrap();
    gigs.post(&mut tokens, &addr("0xE"), new_gig(0), NOW).unwrap();

    let poster = addr("0xE");
    let ids: Vec<u64> = gigs.gigs_by_poster(&poster).map(|g| g.id()).collect();

    assert_eq!(ids, vec![2]);
}

// ============================================================================
// PROPOSALS
// ============================================================================

#[test]
fn test_submit_proposal_appends() {
    let (_, mut gigs, id) = setup(100);

    propose(&mut gigs, id, "0xD");

    let proposals = gigs.proposals(id);
    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].proposer(), &addr("0xd"));
    assert_eq!(proposals[0].proposal_uri(), "ipfs://0xD");
    assert_eq!(proposals[0].submitted_at(), NOW + 1);
    assert!(!proposals[0].is_withdrawn());
    assert_eq!(gigs.get(id).unwrap().proposal_count(), 1);
}

#[test]
fn test_duplicate_proposal_rejected() {
    let (_, mut gigs, id) = setup(100);
    propose(&mut gigs, id, "0xD");

    let result = gigs.submit_proposal(id, &addr("0xD"), "ipfs://p2".to_string(), NOW);

    assert!(matches!(result, Err(LedgerError::DuplicateSubmission { .. })));
    assert_eq!(gigs.get(id).unwrap().proposal_count(), 1);
}

#[test]
fn test_proposal_to_missing_gig() {
    let mut gigs = GigLedger::new();

    let result = gigs.submit_proposal(4, &addr("0xD"), "ipfs://p".to_string(), NOW);

    assert!(matches!(result, Err(LedgerError::NotFound { id: 4, .. })));
}

#[test]
fn test_proposal_after_selection_rejected() {
    let (_, mut gigs, id) = setup(100);
    propose(&mut gigs, id, "0xD");
    gigs.select_proposal(id, 1, &addr("0xC")).unwrap();

    let result = gigs.submit_proposal(id, &addr("0xE"), "ipfs://late".to_string(), NOW);

    assert!(matches!(result, Err(LedgerError::InvalidState { .. })));
}

#[test]
fn test_withdraw_proposal() {
    let (_, mut gigs, id) = setup(100);
    propose(&mut gigs, id, "0xD");

    gigs.withdraw_proposal(id, &addr("0xD")).unwrap();

    assert!(gigs.proposals(id)[0].is_withdrawn());
    assert!(matches!(
        gigs.withdraw_proposal(id, &addr("0xD")),
        Err(LedgerError::InvalidProposal(_))
    ));
}

#[test]
fn test_withdrawn_proposer_cannot_repropose() {
    let (_, mut gigs, id) = setup(100);
    propose(&mut gigs, id, "0xD");
    gigs.withdraw_proposal(id, &addr("0xD")).unwrap();

    let result = gigs.submit_proposal(id, &addr("0xD"), "ipfs://again".to_string(), NOW);

    assert!(matches!(result, Err(LedgerError::DuplicateSubmission { .. })));
}

#[test]
fn test_withdraw_without_proposal() {
    let (_, mut gigs, id) = setup(100);

    let result = gigs.withdraw_proposal(id, &addr("0xD"));

    assert!(matches!(result, Err(LedgerError::InvalidProposal(_))));
}

// ============================================================================
// SELECT
// ============================================================================

#[test]
fn test_select_proposal_moves_to_in_progress() {
    let (_, mut gigs, id) = setup(100);
    propose(&mut gigs, id, "0xD");
    propose(&mut gigs, id, "0xE");

    gigs.select_proposal(id, 2, &addr("0xC")).unwrap();

    let gig = gigs.get(id).unwrap();
    assert_eq!(gig.status(), GigStatus::InProgress);
    assert_eq!(gig.selected_proposal(), 2);
}

#[test]
fn test_select_by_stranger_unauthorized() {
    let (_, mut gigs, id) = setup(100);
    propose(&mut gigs, id, "0xD");

    let result = gigs.select_proposal(id, 1, &addr("0xD"));

    assert!(matches!(result, Err(LedgerError::Unauthorized { .. })));
    assert_eq!(gigs.get(id).unwrap().status(), GigStatus::Open);
}

#[test]
fn test_select_out_of_range() {
    let (_, mut gigs, id) = setup(100);
    propose(&mut gigs, id, "0xD");

    let result = gigs.select_proposal(id, 2, &addr("0xC"));

    assert!(matches!(result, Err(LedgerError::InvalidProposal(_))));
    assert_eq!(gigs.get(id).unwrap().selected_proposal(), 0);
}

#[test]
fn test_select_withdrawn_rejected() {
    let (_, mut gigs, id) = setup(100);
    propose(&mut gigs, id, "0xD");
    gigs.withdraw_proposal(id, &addr("0xD")).unwrap();

    let result = gigs.select_proposal(id, 1, &addr("0xC"));

    assert!(matches!(result, Err(LedgerError::InvalidProposal(_))));
}

// ============================================================================
// COMPLETE
// ============================================================================

#[test]
fn test_complete_pays_selected_freelancer() {
    let (mut tokens, mut gigs, id) = setup(50_000000);
    propose(&mut gigs, id, "0xD");
    propose(&mut gigs, id, "0xE");
    gigs.select_proposal(id, 2, &addr("0xC")).unwrap();

    let paid = gigs.complete(&mut tokens, id, &addr("0xC")).unwrap();

    assert_eq!(paid, Some((addr("0xE"), Amount::new(50_000000))));
    assert_eq!(
        tokens.balance(&addr("0xE")),
        DEFAULT_BALANCE.checked_add(Amount::new(50_000000)).unwrap()
    );
    assert_eq!(tokens.balance(&addr("0xD")), DEFAULT_BALANCE);
    assert_eq!(tokens.escrow_balance(), Amount::ZERO);
    assert_eq!(gigs.get(id).unwrap().status(), GigStatus::Completed);
}

#[test]
fn test_complete_twice_does_not_double_pay() {
    let (mut tokens, mut gigs, id) = setup(100);
    propose(&mut gigs, id, "0xD");
    gigs.select_proposal(id, 1, &addr("0xC")).unwrap();
    gigs.complete(&mut tokens, id, &addr("0xC")).unwrap();

    let result = gigs.complete(&mut tokens, id, &addr("0xC"));

    assert!(matches!(result, Err(LedgerError::InvalidState { .. })));
    assert_eq!(
        tokens.balance(&addr("0xD")),
        DEFAULT_BALANCE.checked_add(Amount::new(100)).unwrap()
    );
}

#[test]
fn test_complete_before_selection_rejected() {
    let (mut tokens, mut gigs, id) = setup(100);

    let result = gigs.complete(&mut tokens, id, &addr("0xC"));

    assert!(matches!(result, Err(LedgerError::InvalidState { .. })));
    assert_eq!(tokens.escrow_balance(), Amount::new(100));
}

#[test]
fn test_complete_by_stranger_unauthorized() {
    let (mut tokens, mut gigs, id) = setup(100);
    propose(&mut gigs, id, "0xD");
    gigs.select_proposal(id, 1, &addr("0xC")).unwrap();

    let result = gigs.complete(&mut tokens, id, &addr("0xD"));

    assert!(matches!(result, Err(LedgerError::Unauthorized { .. })));
    assert_eq!(gigs.get(id).unwrap().status(), GigStatus::InProgress);
}

// ============================================================================
// CANCEL
// ============================================================================

#[test]
fn test_cancel_refunds_in_full() {
    let (mut tokens, mut gigs, id) = setup(50_000000);

    let refund = gigs.cancel(&mut tokens, id, &addr("0xC")).unwrap();

    assert_eq!(refund, Amount::new(50_000000));
    assert_eq!(tokens.balance(&addr("0xC")), DEFAULT_BALANCE);
    assert_eq!(gigs.get(id).unwrap().status(), GigStatus::Cancelled);
}

#[test]
fn test_cancel_twice_does_not_double_refund() {
    let (mut tokens, mut gigs, id) = setup(100);
    gigs.cancel(&mut tokens, id, &addr("0xC")).unwrap();

    let result = gigs.cancel(&mut tokens, id, &addr("0xC"));

    assert!(matches!(result, Err(LedgerError::InvalidState { .. })));
    assert_eq!(tokens.balance(&addr("0xC")), DEFAULT_BALANCE);
}

#[test]
fn test_cancel_in_progress_rejected() {
    let (mut tokens, mut gigs, id) = setup(100);
    propose(&mut gigs, id, "0xD");
    gigs.select_proposal(id, 1, &addr("0xC")).unwrap();

    let result = gigs.cancel(&mut tokens, id, &addr("0xC"));

    assert!(matches!(result, Err(LedgerError::InvalidState { .. })));
}

#[test]
fn test_cancel_by_stranger_unauthorized() {
    let (mut tokens, mut gigs, id) = setup(100);

    let result = gigs.cancel(&mut tokens, id, &addr("0xD"));

    assert!(matches!(result, Err(LedgerError::Unauthorized { .. })));
    assert_eq!(tokens.escrow_balance(), Amount::new(100));
}
