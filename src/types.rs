use alloy_primitives::{Address, B256, Bytes};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HistoryEventType {
    Spend,
    Receive,
    Deposit,
    Withdrawal,
    Trade,
    Informational,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HistoryEventSubtype {
    None,
    Fee,
    Approve,
    DepositAsset,
    RemoveAsset,
    ReceiveWrapped,
    ReturnWrapped,
    Reward,
    Spend,
    Receive,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EvmProduct {
    Pool,
    Gauge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Amount already scaled to the asset's human units.
    pub amount: Decimal,
}

impl Balance {
    pub fn new(amount: Decimal) -> Self {
        Self { amount }
    }
}

/// A ledger event produced by the generic per-transaction decoder.
///
/// Events arrive as raw `Spend/None` or `Receive/None` transfers and are
/// reclassified in place by the protocol handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub tx_hash: B256,
    /// Position of the event inside its transaction.
    pub sequence_index: u32,
    pub event_type: HistoryEventType,
    pub event_subtype: HistoryEventSubtype,
    /// Asset identifier, resolvable through a [`crate::assets::TokenResolver`].
    pub asset: String,
    pub balance: Balance,
    /// Tracked account the event belongs to.
    #[serde(default)]
    pub location_label: Option<Address>,
    /// Counterparty contract observed in the triggering log.
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub counterparty: Option<String>,
    #[serde(default)]
    pub product: Option<EvmProduct>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LedgerEvent {
    /// True for an upstream `Spend` that no decoder has claimed yet.
    pub fn is_raw_spend(&self) -> bool {
        self.event_type == HistoryEventType::Spend
            && self.event_subtype == HistoryEventSubtype::None
    }

    /// True for an upstream `Receive` that no decoder has claimed yet.
    pub fn is_raw_receive(&self) -> bool {
        self.event_type == HistoryEventType::Receive
            && self.event_subtype == HistoryEventSubtype::None
    }

    pub(crate) fn classify(
        &mut self,
        event_type: HistoryEventType,
        event_subtype: HistoryEventSubtype,
        counterparty: &str,
        notes: String,
    ) {
        self.event_type = event_type;
        self.event_subtype = event_subtype;
        self.counterparty = Some(counterparty.to_string());
        self.notes = Some(notes);
    }
}

/// A raw receipt log as returned by the chain client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    /// Emitting contract.
    pub address: Address,
    pub topics: Vec<B256>,
    #[serde(default)]
    pub data: Bytes,
}

impl RawLog {
    pub fn topic0(&self) -> Option<&B256> {
        self.topics.first()
    }
}

/// Everything a handler needs to decode one log of a transaction.
///
/// `events` is the transaction-scoped sequence; handlers hold it exclusively
/// for the duration of one dispatch call.
pub struct DecoderContext<'a> {
    pub tx_hash: B256,
    pub tx_log: &'a RawLog,
    pub events: &'a mut Vec<LedgerEvent>,
}
