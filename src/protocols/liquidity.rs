use std::collections::HashSet;

use alloy_primitives::Address;

use crate::assets::TokenResolver;
use crate::decoder::DecodingOutput;
use crate::error::Error;
use crate::protocols::{AERODROME_POOL_PROTOCOL, CPT_AERODROME, ZERO_ADDRESS};
use crate::types::{EvmProduct, HistoryEventSubtype, HistoryEventType, LedgerEvent, RawLog};

fn is_pool(event: &LedgerEvent, pools: &HashSet<Address>) -> bool {
    event.address.is_some_and(|address| pools.contains(&address))
}

fn display_address(address: Option<Address>) -> String {
    address.map_or_else(|| "unknown".to_string(), |a| a.to_string())
}

/// Reclassifies the transfers of a pool `Mint`: assets sent to the pool become
/// deposits and the LP tokens minted from the zero address become wrapped receipts.
pub fn decode_add_liquidity(
    tx_log: &RawLog,
    events: &mut [LedgerEvent],
    pools: &HashSet<Address>,
    tokens: &dyn TokenResolver,
) -> Result<DecodingOutput, Error> {
    for event in events.iter_mut() {
        if event.is_raw_spend() && is_pool(event, pools) {
            let symbol = tokens.resolve(&event.asset)?.symbol;
            let notes = format!(
                "Deposit {} {symbol} in {CPT_AERODROME} pool {}",
                event.balance.amount.normalize(),
                display_address(event.address),
            );
            event.classify(
                HistoryEventType::Deposit,
                HistoryEventSubtype::DepositAsset,
                CPT_AERODROME,
                notes,
            );
            event.product = Some(EvmProduct::Pool);
        } else if event.is_raw_receive() && event.address == Some(ZERO_ADDRESS) {
            let symbol = tokens.resolve_token(&event.asset)?.symbol;
            let notes = format!(
                "Receive {} {symbol} after depositing in {CPT_AERODROME} pool {}",
                event.balance.amount.normalize(),
                tx_log.address,
            );
            event.classify(
                HistoryEventType::Receive,
                HistoryEventSubtype::ReceiveWrapped,
                CPT_AERODROME,
                notes,
            );
            event.product = Some(EvmProduct::Pool);
            tokens.set_protocol_if_missing(&event.asset, AERODROME_POOL_PROTOCOL)?;
        }
    }
    Ok(DecodingOutput::default())
}

/// Reclassifies the transfers of a pool `Burn`: LP tokens returned to the pool
/// and the underlying assets paid out by it.
pub fn decode_remove_liquidity(
    tx_log: &RawLog,
    events: &mut [LedgerEvent],
    pools: &HashSet<Address>,
    tokens: &dyn TokenResolver,
) -> Result<DecodingOutput, Error> {
    for event in events.iter_mut() {
        if !is_pool(event, pools) {
            continue;
        }
        if event.is_raw_spend() {
            let symbol = tokens.resolve(&event.asset)?.symbol;
            let notes = format!("Return {} {symbol}", event.balance.amount.normalize());
            event.classify(
                HistoryEventType::Spend,
                HistoryEventSubtype::ReturnWrapped,
                CPT_AERODROME,
                notes,
            );
            event.product = Some(EvmProduct::Pool);
        } else if event.is_raw_receive() {
            let symbol = tokens.resolve(&event.asset)?.symbol;
            let notes = format!(
                "Remove {} {symbol} from {CPT_AERODROME} pool {}",
                event.balance.amount.normalize(),
                tx_log.address,
            );
            event.classify(
                HistoryEventType::Withdrawal,
                HistoryEventSubtype::RemoveAsset,
                CPT_AERODROME,
                notes,
            );
            event.product = Some(EvmProduct::Pool);
        }
    }
    Ok(DecodingOutput::default())
}
