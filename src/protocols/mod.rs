pub mod gauge;
pub mod liquidity;
pub mod swap;

use alloy_primitives::{Address, B256, U256, address, b256};
use serde::Serialize;

use crate::error::Error;
use crate::types::RawLog;

pub const CPT_AERODROME: &str = "aerodrome";
pub const AERODROME_LABEL: &str = "aerodrome_finance";
pub const AERODROME_IMAGE: &str = "aerodrome.svg";
/// Protocol tag written on Aerodrome LP tokens.
pub const AERODROME_POOL_PROTOCOL: &str = "aerodrome_pool";

pub const ROUTER: Address = address!("cF77a3Ba9A5CA399B7c97c74d54e5b1Beb874E43");
pub const ZERO_ADDRESS: Address = Address::ZERO;

/// Pool `Mint`: LP tokens minted against deposited assets.
pub const ADD_LIQUIDITY_TOPIC: B256 =
    b256!("4c209b5fc8ad50758f13e2e1088ba56a560dff690a1c6fef26394f4c03821c4f");
/// Pool `Burn`: LP tokens burned for the underlying assets.
pub const REMOVE_LIQUIDITY_TOPIC: B256 =
    b256!("5d624aa9c148153ab3446c1b154f660ee7701e549fe9b62dab7171b1c80e6fa2");
pub const SWAP_TOPIC: B256 =
    b256!("b3e2773606abfd36b5bd91394b3a54d1398336c65005baf7bf7a05efeffaf75b");
pub const GAUGE_DEPOSIT_TOPIC: B256 =
    b256!("5548c837ab068cf56a2c2479df0882a4922fd203edb7517321831d95078c5f62");
pub const GAUGE_WITHDRAW_TOPIC: B256 =
    b256!("884edad9ce6fa2440d8a54cc123490eb96d2768479d49ff9c7366125a9424364");
pub const CLAIM_REWARDS_TOPIC: B256 =
    b256!("1f89f96333d3133000ee447473151fa9606543368f02271c9d95ae14f13bcc67");

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TopicKind {
    AddLiquidity,
    RemoveLiquidity,
    Swap,
    GaugeDeposit,
    GaugeWithdraw,
    ClaimRewards,
    Unknown,
}

const TOPIC_TABLE: [(B256, TopicKind); 6] = [
    (ADD_LIQUIDITY_TOPIC, TopicKind::AddLiquidity),
    (REMOVE_LIQUIDITY_TOPIC, TopicKind::RemoveLiquidity),
    (SWAP_TOPIC, TopicKind::Swap),
    (GAUGE_DEPOSIT_TOPIC, TopicKind::GaugeDeposit),
    (GAUGE_WITHDRAW_TOPIC, TopicKind::GaugeWithdraw),
    (CLAIM_REWARDS_TOPIC, TopicKind::ClaimRewards),
];

impl TopicKind {
    pub fn from_topic(topic: &B256) -> Self {
        TOPIC_TABLE
            .iter()
            .find(|(known, _)| known == topic)
            .map_or(Self::Unknown, |(_, kind)| *kind)
    }

    /// Classifies a log by its first topic; anonymous logs are `Unknown`.
    pub fn from_log(log: &RawLog) -> Self {
        log.topic0().map_or(Self::Unknown, Self::from_topic)
    }

    pub fn is_pool_topic(self) -> bool {
        matches!(self, Self::AddLiquidity | Self::RemoveLiquidity | Self::Swap)
    }

    pub fn is_gauge_topic(self) -> bool {
        matches!(
            self,
            Self::GaugeDeposit | Self::GaugeWithdraw | Self::ClaimRewards
        )
    }

    pub fn all_topics() -> impl Iterator<Item = (B256, TopicKind)> {
        TOPIC_TABLE.into_iter()
    }
}

/// Reads the indexed address stored in topic `index`.
pub fn topic_address(log: &RawLog, index: usize) -> Result<Address, Error> {
    log.topics
        .get(index)
        .map(|word| Address::from_word(*word))
        .ok_or_else(|| Error::MalformedLog {
            reason: format!(
                "log from {} has {} topics, expected at least {}",
                log.address,
                log.topics.len(),
                index + 1
            ),
        })
}

/// Interprets the whole log payload as one big-endian unsigned integer.
pub fn data_as_uint(log: &RawLog) -> Result<U256, Error> {
    U256::try_from_be_slice(&log.data).ok_or_else(|| Error::MalformedLog {
        reason: format!(
            "log from {} carries {} data bytes, expected at most 32",
            log.address,
            log.data.len()
        ),
    })
}
