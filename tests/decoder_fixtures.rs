#![expect(
    clippy::unwrap_used,
    clippy::panic,
    reason = "test code uses unwrap/panic for concise assertions"
)]

use std::collections::HashMap;
use std::str::FromStr;

use aerodrome_decoder::{
    AddressSource, AerodromeDecoder, CacheType, CorrelationOutcome, DecoderContext,
    DecoderSettings, DecodingOutput, Error, EvmProduct, HistoryEventSubtype, HistoryEventType,
    InMemoryTokens, LedgerEvent, PoolsAndGauges, RawLog, TokenInfo,
};
use alloy_primitives::{Address, B256, address};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

const USER: Address = address!("15718b9B0DAdE1C17d8329A13bB9553f3B38e172");
const WETH_USDBC_POOL: Address = address!("B4885Bc63399BF5518b994c1d0C153334Ee579D0");
const GAUGE: Address = address!("eca7Ff920E7162334634c721133F3183B83B0323");
const LP: &str = "eip155:8453/erc20:0xb4885bc63399bf5518b994c1d0c153334ee579d0";
const AERO: &str = "eip155:8453/erc20:0x940181a94a35a4569e4529a3cdfb74e38fd98631";

#[derive(Deserialize)]
struct FixtureTransaction {
    name: String,
    tx_hash: B256,
    logs: Vec<RawLog>,
    events: Vec<LedgerEvent>,
}

struct FixtureSource(PoolsAndGauges);

impl AddressSource for FixtureSource {
    fn last_queried(&self, _cache: CacheType) -> Result<Option<DateTime<Utc>>, Error> {
        Ok(Some(Utc::now()))
    }

    fn query(&self) -> Result<PoolsAndGauges, Error> {
        Ok(self.0.clone())
    }

    fn save(&self, _data: &PoolsAndGauges) -> Result<(), Error> {
        Ok(())
    }

    fn read_cache(&self) -> Result<PoolsAndGauges, Error> {
        Ok(self.0.clone())
    }
}

fn load_fixture<T: serde::de::DeserializeOwned>(filename: &str) -> T {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = format!("{manifest_dir}/tests/fixtures/{filename}");
    let data =
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"));
    serde_json::from_str(&data).unwrap_or_else(|e| panic!("failed to parse {path}: {e}"))
}

fn load_transaction(name: &str) -> FixtureTransaction {
    let transactions: Vec<FixtureTransaction> = load_fixture("transactions.json");
    transactions
        .into_iter()
        .find(|tx| tx.name == name)
        .unwrap_or_else(|| panic!("no fixture transaction named {name}"))
}

fn decoder() -> AerodromeDecoder<FixtureSource, InMemoryTokens> {
    let registry: PoolsAndGauges = load_fixture("registry.json");
    let tokens: HashMap<String, TokenInfo> = load_fixture("tokens.json");
    AerodromeDecoder::new(
        FixtureSource(registry),
        tokens.into_iter().collect(),
        &DecoderSettings::default(),
    )
    .unwrap()
}

/// Feeds every log of the transaction to the decoder, in order.
fn decode_all(
    decoder: &AerodromeDecoder<FixtureSource, InMemoryTokens>,
    tx: &mut FixtureTransaction,
) -> Vec<DecodingOutput> {
    let mut outputs = Vec::with_capacity(tx.logs.len());
    for tx_log in &tx.logs {
        let output = decoder
            .decode_log(DecoderContext {
                tx_hash: tx.tx_hash,
                tx_log,
                events: &mut tx.events,
            })
            .unwrap_or_else(|e| panic!("decode failed for {}: {e}", tx.name));
        outputs.push(output);
    }
    outputs
}

fn by_sequence(events: &[LedgerEvent], sequence_index: u32) -> &LedgerEvent {
    events
        .iter()
        .find(|e| e.sequence_index == sequence_index)
        .unwrap_or_else(|| panic!("no event with sequence index {sequence_index}"))
}

fn classification(event: &LedgerEvent) -> (HistoryEventType, HistoryEventSubtype) {
    (event.event_type, event.event_subtype)
}

fn assert_untouched(before: &LedgerEvent, after: &LedgerEvent) {
    assert_eq!(before, after, "event {} was modified", before.sequence_index);
}

// ──────────────────── Pools ────────────────────

#[test]
fn add_liquidity_from_fixture() {
    let decoder = decoder();
    let mut tx = load_transaction("add_liquidity");
    let before = tx.events.clone();

    let outputs = decode_all(&decoder, &mut tx);
    assert_eq!(outputs, vec![DecodingOutput::default()]);

    // gas, the router leg of the ETH deposit and the approval stay as they were
    for index in [0, 1, 6] {
        assert_untouched(by_sequence(&before, index), by_sequence(&tx.events, index));
    }

    let deposit = by_sequence(&tx.events, 7);
    assert_eq!(
        classification(deposit),
        (HistoryEventType::Deposit, HistoryEventSubtype::DepositAsset)
    );
    assert_eq!(deposit.counterparty.as_deref(), Some("aerodrome"));
    assert_eq!(deposit.product, Some(EvmProduct::Pool));
    assert_eq!(
        deposit.notes.as_deref(),
        Some(format!("Deposit 0.16186 USDbC in aerodrome pool {WETH_USDBC_POOL}").as_str())
    );

    let minted = by_sequence(&tx.events, 10);
    assert_eq!(
        classification(minted),
        (HistoryEventType::Receive, HistoryEventSubtype::ReceiveWrapped)
    );
    assert_eq!(minted.product, Some(EvmProduct::Pool));
    assert_eq!(
        minted.notes.as_deref(),
        Some(
            format!(
                "Receive 0.000000004023175857 vAMM-WETH/USDbC after depositing in aerodrome pool {WETH_USDBC_POOL}"
            )
            .as_str()
        )
    );
    assert_eq!(
        decoder.tokens().protocol_of(LP).as_deref(),
        Some("aerodrome_pool")
    );
}

#[test]
fn remove_liquidity_from_fixture() {
    let decoder = decoder();
    let mut tx = load_transaction("remove_liquidity");
    let before = tx.events.clone();

    decode_all(&decoder, &mut tx);

    assert_untouched(by_sequence(&before, 0), by_sequence(&tx.events, 0));
    assert_untouched(by_sequence(&before, 423), by_sequence(&tx.events, 423));

    let returned = by_sequence(&tx.events, 424);
    assert_eq!(
        classification(returned),
        (HistoryEventType::Spend, HistoryEventSubtype::ReturnWrapped)
    );
    assert_eq!(
        returned.notes.as_deref(),
        Some("Return 0.000000004023175857 vAMM-WETH/USDbC")
    );

    for (index, expected) in [
        (426, format!("Remove 0.000099213494388347 WETH from aerodrome pool {WETH_USDBC_POOL}")),
        (427, format!("Remove 0.163143 USDbC from aerodrome pool {WETH_USDBC_POOL}")),
    ] {
        let withdrawn = by_sequence(&tx.events, index);
        assert_eq!(
            classification(withdrawn),
            (HistoryEventType::Withdrawal, HistoryEventSubtype::RemoveAsset)
        );
        assert_eq!(withdrawn.product, Some(EvmProduct::Pool));
        assert_eq!(withdrawn.notes.as_deref(), Some(expected.as_str()));
    }
}

// ──────────────────── Swaps ────────────────────

#[test]
fn swap_eth_through_router_from_fixture() {
    let decoder = decoder();
    let mut tx = load_transaction("swap_eth_to_token");

    let outputs = decode_all(&decoder, &mut tx);
    assert_eq!(
        outputs[0].correlation,
        CorrelationOutcome::Correlated {
            spend_index: 1,
            receive_index: 2
        }
    );
    assert!(!outputs[0].refresh_balances);

    let spend = &tx.events[1];
    assert_eq!(
        classification(spend),
        (HistoryEventType::Trade, HistoryEventSubtype::Spend)
    );
    assert_eq!(spend.notes.as_deref(), Some("Swap 0.0001 ETH in aerodrome"));
    assert_eq!(spend.product, None);

    let receive = &tx.events[2];
    assert_eq!(
        classification(receive),
        (HistoryEventType::Trade, HistoryEventSubtype::Receive)
    );
    assert_eq!(
        receive.notes.as_deref(),
        Some("Receive 0.163519 USDbC as the result of a swap in aerodrome")
    );
}

#[test]
fn multi_hop_swap_correlates_once_from_fixture() {
    let decoder = decoder();
    let mut tx = load_transaction("swap_tokens");

    let outputs = decode_all(&decoder, &mut tx);
    assert_eq!(outputs.len(), 2);
    assert_eq!(
        outputs[0].correlation,
        CorrelationOutcome::Correlated {
            spend_index: 1,
            receive_index: 2
        }
    );
    // the second hop finds no unclaimed legs and leaves the trade pair alone
    let CorrelationOutcome::Uncorrelated { reason } = &outputs[1].correlation else {
        panic!("expected the second hop to be uncorrelated");
    };
    assert!(reason.contains(&tx.tx_hash.to_string()));

    assert_eq!(
        tx.events[1].notes.as_deref(),
        Some("Swap 0.01 USDC in aerodrome")
    );
    assert_eq!(
        tx.events[2].notes.as_deref(),
        Some("Receive 0.429198109072566355 AERO as the result of a swap in aerodrome")
    );
}

#[test]
fn swap_with_receive_listed_first_is_reordered() {
    let decoder = decoder();
    let mut tx = load_transaction("swap_tokens");
    tx.events.swap(1, 2);
    let mut approval = tx.events[0].clone();
    approval.sequence_index = 8;
    approval.event_type = HistoryEventType::Informational;
    approval.event_subtype = HistoryEventSubtype::Approve;
    tx.events.insert(2, approval);
    tx.logs.truncate(1);

    let outputs = decode_all(&decoder, &mut tx);
    assert_eq!(
        outputs[0].correlation,
        CorrelationOutcome::Correlated {
            spend_index: 1,
            receive_index: 2
        }
    );
    assert_eq!(tx.events[1].event_subtype, HistoryEventSubtype::Spend);
    assert_eq!(tx.events[2].event_subtype, HistoryEventSubtype::Receive);
    assert_eq!(tx.events[3].event_subtype, HistoryEventSubtype::Approve);
    assert!(
        tx.events
            .windows(2)
            .all(|pair| pair[0].sequence_index < pair[1].sequence_index),
        "sequence indices must follow list order"
    );
}

// ──────────────────── Gauges ────────────────────

#[test]
fn stake_lp_token_from_fixture() {
    let decoder = decoder();
    let mut tx = load_transaction("stake_lp_token_to_gauge");
    let before = tx.events.clone();

    let outputs = decode_all(&decoder, &mut tx);
    assert!(outputs[0].refresh_balances);
    assert_eq!(outputs[0].correlation, CorrelationOutcome::NotRequired);

    assert_untouched(by_sequence(&before, 58), by_sequence(&tx.events, 58));
    let staked = by_sequence(&tx.events, 59);
    assert_eq!(
        classification(staked),
        (HistoryEventType::Deposit, HistoryEventSubtype::DepositAsset)
    );
    assert_eq!(staked.product, Some(EvmProduct::Gauge));
    assert_eq!(staked.location_label, Some(USER));
    assert_eq!(
        staked.notes.as_deref(),
        Some(
            format!("Deposit 0.000000004023175857 vAMM-WETH/USDbC into {GAUGE} aerodrome gauge")
                .as_str()
        )
    );
    assert_eq!(
        decoder.tokens().protocol_of(LP).as_deref(),
        Some("aerodrome_pool")
    );
}

#[test]
fn unstake_lp_token_from_fixture() {
    let decoder = decoder();
    let mut tx = load_transaction("unstake_lp_token_from_gauge");

    let outputs = decode_all(&decoder, &mut tx);
    assert!(outputs[0].refresh_balances);

    let unstaked = by_sequence(&tx.events, 17);
    assert_eq!(
        classification(unstaked),
        (HistoryEventType::Withdrawal, HistoryEventSubtype::RemoveAsset)
    );
    assert_eq!(
        unstaked.notes.as_deref(),
        Some(
            format!("Withdraw 0.000000004023175857 vAMM-WETH/USDbC from {GAUGE} aerodrome gauge")
                .as_str()
        )
    );
    assert_eq!(decoder.tokens().protocol_of(LP), None);
}

#[test]
fn claim_rewards_from_fixture() {
    let decoder = decoder();
    let mut tx = load_transaction("get_reward_from_gauge");

    let outputs = decode_all(&decoder, &mut tx);
    assert!(outputs[0].refresh_balances);

    let reward = by_sequence(&tx.events, 12);
    assert_eq!(
        classification(reward),
        (HistoryEventType::Withdrawal, HistoryEventSubtype::Reward)
    );
    assert_eq!(reward.asset, AERO);
    assert_eq!(
        reward.balance.amount,
        Decimal::from_str("0.002217484317583327").unwrap()
    );
    assert_eq!(
        reward.notes.as_deref(),
        Some(
            format!("Receive 0.002217484317583327 AERO rewards from {GAUGE} aerodrome gauge")
                .as_str()
        )
    );
}

#[test]
fn gauge_log_for_another_account_changes_nothing() {
    let decoder = decoder();
    let mut tx = load_transaction("get_reward_from_gauge");
    tx.logs[0].topics[1] = address!("00000000000000000000000000000000000000aa").into_word();
    let before = tx.events.clone();

    let outputs = decode_all(&decoder, &mut tx);
    assert!(!outputs[0].refresh_balances);
    assert_eq!(tx.events, before);
}

// ──────────────────── Routing ────────────────────

#[test]
fn routing_table_from_fixture_registry() {
    let decoder = decoder();
    let table = decoder.addresses_to_decoders();
    assert_eq!(table.len(), 5);
    assert_eq!(
        table[&WETH_USDBC_POOL],
        aerodrome_decoder::DecoderKind::Pool
    );
    assert_eq!(table[&GAUGE], aerodrome_decoder::DecoderKind::Gauge);
}
