// Snapshot save/load for the whole ledger
//
// One key per map, written in a single batch. The store is a rebuildable
// cache of the in-memory ledgers, never a second source of truth.

use crate::bounty::{Bounty, BountyLedger, Submission};
use crate::contracts::LedgerConfig;
use crate::gig::{Gig, GigLedger, Proposal};
use crate::storage::{
    decode_decimal, decode_entries, encode_decimal, encode_entries, keys, CodecError, KvStore,
    StoreError,
};
use crate::token::TokenLedger;
use crate::types::{Address, Amount};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from reading or writing a snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// The three ledgers restored from a snapshot
pub struct LoadedState {
    pub tokens: TokenLedger,
    pub bounties: BountyLedger,
    pub gigs: GigLedger,
}

/// Write every map to the store in one batch
pub fn save(
    store: &dyn KvStore,
    tokens: &TokenLedger,
    bounties: &BountyLedger,
    gigs: &GigLedger,
) -> Result<(), SnapshotError> {
    let allowances: Vec<(&Address, Vec<(&Address, &Amount)>)> = tokens
        .allowances()
        .iter()
        .map(|(owner, spenders)| (owner, spenders.iter().collect()))
        .collect();

    let entries = [
        (
            keys::BOUNTIES,
            encode_entries(keys::BOUNTIES, bounties.records())?,
        ),
        (keys::NEXT_BOUNTY_ID, encode_decimal(&bounties.next_id())),
        (keys::GIGS, encode_entries(keys::GIGS, gigs.records())?),
        (keys::NEXT_GIG_ID, encode_decimal(&gigs.next_id())),
        (
            keys::BALANCES,
            encode_entries(keys::BALANCES, tokens.balances())?,
        ),
        (
            keys::ALLOWANCES,
            encode_entries(keys::ALLOWANCES, allowances.iter().map(|(o, s)| (*o, s)))?,
        ),
        (
            keys::SUBMISSIONS,
            encode_entries(keys::SUBMISSIONS, bounties.submission_lists())?,
        ),
        (
            keys::PROPOSALS,
            encode_entries(keys::PROPOSALS, gigs.proposal_lists())?,
        ),
        (keys::ESCROW, encode_decimal(&tokens.escrow_balance())),
    ];

    store.put_batch(&entries)?;
    store.flush()?;
    Ok(())
}

/// Read a snapshot back
///
/// Returns `None` when the store holds no ledger keys at all (first run).
/// Keys missing from a partial snapshot start empty.
pub fn load(
    store: &dyn KvStore,
    config: &LedgerConfig,
) -> Result<Option<LoadedState>, SnapshotError> {
    let mut raw = BTreeMap::new();
    for key in keys::ALL {
        if let Some(text) = store.get_raw(key)? {
            raw.insert(key, text);
        }
    }
    if raw.is_empty() {
        return Ok(None);
    }

    let bounties: BTreeMap<u64, Bounty> = decode_map(&raw, keys::BOUNTIES)?;
    let submissions: BTreeMap<u64, Vec<Submission>> = decode_map(&raw, keys::SUBMISSIONS)?;
    let next_bounty_id = decode_counter(&raw, keys::NEXT_BOUNTY_ID, &bounties)?;

    let gigs: BTreeMap<u64, Gig> = decode_map(&raw, keys::GIGS)?;
    let proposals: BTreeMap<u64, Vec<Proposal>> = decode_map(&raw, keys::PROPOSALS)?;
    let next_gig_id = decode_counter(&raw, keys::NEXT_GIG_ID, &gigs)?;

    let balances: BTreeMap<Address, Amount> = decode_map(&raw, keys::BALANCES)?;
    let allowances: BTreeMap<Address, Vec<(Address, Amount)>> = decode_map(&raw, keys::ALLOWANCES)?;
    let allowances = allowances
        .into_iter()
        .map(|(owner, spenders)| (owner, spenders.into_iter().collect()))
        .collect();
    let escrow = match raw.get(keys::ESCROW) {
        Some(text) => decode_decimal::<Amount>(keys::ESCROW, text)?,
        None => Amount::ZERO,
    };

    Ok(Some(LoadedState {
        tokens: TokenLedger::from_parts(
            balances,
            allowances,
            escrow,
            config.default_balance,
            config.strict_allowances,
        ),
        bounties: BountyLedger::from_parts(bounties, submissions, next_bounty_id),
        gigs: GigLedger::from_parts(gigs, proposals, next_gig_id),
    }))
}

/// Remove every ledger key
pub fn clear(store: &dyn KvStore) -> Result<(), StoreError> {
    store.delete_keys(&keys::ALL)?;
    store.flush()?;
    Ok(())
}

fn decode_map<K, V>(
    raw: &BTreeMap<&'static str, String>,
    key: &'static str,
) -> Result<BTreeMap<K, V>, CodecError>
where
    K: serde::de::DeserializeOwned + Ord,
    V: serde::de::DeserializeOwned,
{
    match raw.get(key) {
        Some(text) => decode_entries(key, text),
        None => Ok(BTreeMap::new()),
    }
}

/// Next id, never at or below an id already in use
fn decode_counter<V>(
    raw: &BTreeMap<&'static str, String>,
    key: &'static str,
    records: &BTreeMap<u64, V>,
) -> Result<u64, CodecError> {
    let floor = match records.keys().next_back() {
        Some(max) => max.checked_add(1).ok_or_else(|| CodecError::DecodeError {
            key,
            reason: "id space exhausted".to_string(),
        })?,
        None => 1,
    };
    match raw.get(key) {
        Some(text) => Ok(decode_decimal::<u64>(key, text)?.max(floor)),
        None => Ok(floor),
    }
}
