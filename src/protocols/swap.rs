use std::collections::HashSet;

use alloy_primitives::{Address, B256};

use crate::assets::TokenResolver;
use crate::decoder::ordering::place_adjacent;
use crate::decoder::{CorrelationOutcome, DecodingOutput};
use crate::error::Error;
use crate::protocols::CPT_AERODROME;
use crate::types::{HistoryEventSubtype, HistoryEventType, LedgerEvent};

/// The two legs of a swap located in a transaction's event sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapLegs {
    pub spend: Option<usize>,
    pub receive: Option<usize>,
}

/// Finds the first unclaimed spend and the first unclaimed receive whose
/// counterparty is a protocol address. The router counts as one, so swaps
/// routed through it are recognized even though the pool differs.
pub fn find_swap_legs(events: &[LedgerEvent], protocol_addresses: &HashSet<Address>) -> SwapLegs {
    let mut legs = SwapLegs {
        spend: None,
        receive: None,
    };
    for (index, event) in events.iter().enumerate() {
        if !event
            .address
            .is_some_and(|address| protocol_addresses.contains(&address))
        {
            continue;
        }
        if legs.spend.is_none() && event.is_raw_spend() {
            legs.spend = Some(index);
        } else if legs.receive.is_none() && event.is_raw_receive() {
            legs.receive = Some(index);
        }
        if legs.spend.is_some() && legs.receive.is_some() {
            break;
        }
    }
    legs
}

/// Turns a spend and a receive into a trade pair placed next to each other.
///
/// A missing leg leaves the sequence untouched and is reported as
/// [`CorrelationOutcome::Uncorrelated`].
pub fn decode_swap(
    tx_hash: B256,
    events: &mut Vec<LedgerEvent>,
    protocol_addresses: &HashSet<Address>,
    tokens: &dyn TokenResolver,
) -> Result<DecodingOutput, Error> {
    let legs = find_swap_legs(events, protocol_addresses);
    let (Some(spend), Some(receive)) = (legs.spend, legs.receive) else {
        let reason = format!(
            "A swap in {CPT_AERODROME} pool must have both a spend and a receive event but \
             one or both of them are missing for transaction hash: {tx_hash}. \
             Spend event: {}, receive event: {}.",
            describe_leg(events, legs.spend),
            describe_leg(events, legs.receive),
        );
        tracing::error!(tx_hash = %tx_hash, "{reason}");
        return Ok(DecodingOutput {
            refresh_balances: false,
            correlation: CorrelationOutcome::Uncorrelated { reason },
        });
    };

    let spend_symbol = tokens.resolve(&events[spend].asset)?.symbol;
    let receive_symbol = tokens.resolve(&events[receive].asset)?.symbol;

    let spend_event = &mut events[spend];
    let notes = format!(
        "Swap {} {spend_symbol} in {CPT_AERODROME}",
        spend_event.balance.amount.normalize()
    );
    spend_event.classify(
        HistoryEventType::Trade,
        HistoryEventSubtype::Spend,
        CPT_AERODROME,
        notes,
    );

    let receive_event = &mut events[receive];
    let notes = format!(
        "Receive {} {receive_symbol} as the result of a swap in {CPT_AERODROME}",
        receive_event.balance.amount.normalize()
    );
    receive_event.classify(
        HistoryEventType::Trade,
        HistoryEventSubtype::Receive,
        CPT_AERODROME,
        notes,
    );

    let (spend_index, receive_index) = place_adjacent(events, spend, receive);
    tracing::debug!(tx_hash = %tx_hash, spend_index, receive_index, "correlated swap legs");
    Ok(DecodingOutput {
        refresh_balances: false,
        correlation: CorrelationOutcome::Correlated {
            spend_index,
            receive_index,
        },
    })
}

fn describe_leg(events: &[LedgerEvent], index: Option<usize>) -> String {
    index
        .and_then(|i| events.get(i))
        .map_or_else(
            || "None".to_string(),
            |e| format!("{} {} (sequence index {})", e.balance.amount, e.asset, e.sequence_index),
        )
}
