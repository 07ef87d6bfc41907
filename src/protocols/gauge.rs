use crate::assets::{TokenResolver, asset_normalized_value};
use crate::decoder::DecodingOutput;
use crate::error::Error;
use crate::protocols::{
    AERODROME_POOL_PROTOCOL, CPT_AERODROME, TopicKind, data_as_uint, topic_address,
};
use crate::types::{EvmProduct, HistoryEventSubtype, HistoryEventType, LedgerEvent, RawLog};

/// Reclassifies the transfer behind a gauge `Deposit`, `Withdraw` or
/// `ClaimRewards` log.
///
/// The log names the acting account in its second topic and the raw amount in
/// its payload. An event correlates when it belongs to that account, points at
/// the emitting gauge and carries exactly the normalized amount. Events that
/// do not correlate are left as they are.
pub fn decode_gauge_event(
    tx_log: &RawLog,
    events: &mut [LedgerEvent],
    tokens: &dyn TokenResolver,
) -> Result<DecodingOutput, Error> {
    let kind = TopicKind::from_log(tx_log);
    if !kind.is_gauge_topic() {
        return Ok(DecodingOutput::default());
    }

    let account = topic_address(tx_log, 1)?;
    let gauge = tx_log.address;
    let raw_amount = data_as_uint(tx_log)?;

    let mut modified = false;
    for event in events.iter_mut() {
        if !(event.is_raw_spend() || event.is_raw_receive())
            || event.location_label != Some(account)
            || event.address != Some(gauge)
        {
            continue;
        }
        let info = tokens.resolve(&event.asset)?;
        let expected = match asset_normalized_value(raw_amount, info.decimals) {
            Ok(amount) => amount,
            // no representable amount can equal the event balance
            Err(Error::Amount { reason }) => {
                tracing::debug!(
                    %gauge,
                    asset = %event.asset,
                    "gauge amount not comparable: {reason}"
                );
                continue;
            }
            Err(e) => return Err(e),
        };
        if event.balance.amount != expected {
            continue;
        }

        let amount = event.balance.amount.normalize();
        let symbol = info.symbol;
        match kind {
            TopicKind::GaugeDeposit => {
                event.classify(
                    HistoryEventType::Deposit,
                    HistoryEventSubtype::DepositAsset,
                    CPT_AERODROME,
                    format!("Deposit {amount} {symbol} into {gauge} {CPT_AERODROME} gauge"),
                );
                tokens.set_protocol_if_missing(&event.asset, AERODROME_POOL_PROTOCOL)?;
            }
            TopicKind::GaugeWithdraw => event.classify(
                HistoryEventType::Withdrawal,
                HistoryEventSubtype::RemoveAsset,
                CPT_AERODROME,
                format!("Withdraw {amount} {symbol} from {gauge} {CPT_AERODROME} gauge"),
            ),
            _ => event.classify(
                HistoryEventType::Withdrawal,
                HistoryEventSubtype::Reward,
                CPT_AERODROME,
                format!("Receive {amount} {symbol} rewards from {gauge} {CPT_AERODROME} gauge"),
            ),
        }
        event.product = Some(EvmProduct::Gauge);
        modified = true;
    }

    Ok(DecodingOutput {
        refresh_balances: modified,
        ..DecodingOutput::default()
    })
}
