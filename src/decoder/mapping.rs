use std::collections::HashMap;

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::protocols::{AERODROME_IMAGE, AERODROME_LABEL, CPT_AERODROME};
use crate::types::{EvmProduct, HistoryEventSubtype, HistoryEventType};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventCategory {
    SwapOut,
    SwapIn,
    Withdraw,
    Receive,
    ClaimReward,
    Send,
    Deposit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterpartyDetails {
    pub identifier: &'static str,
    pub label: &'static str,
    pub image: &'static str,
}

pub type EventMapping = HashMap<HistoryEventType, HashMap<HistoryEventSubtype, EventCategory>>;

/// Display category of a decoded Aerodrome event.
pub fn event_category(
    event_type: HistoryEventType,
    event_subtype: HistoryEventSubtype,
) -> Option<EventCategory> {
    match (event_type, event_subtype) {
        (HistoryEventType::Trade, HistoryEventSubtype::Spend) => Some(EventCategory::SwapOut),
        (HistoryEventType::Trade, HistoryEventSubtype::Receive) => Some(EventCategory::SwapIn),
        (HistoryEventType::Withdrawal, HistoryEventSubtype::RemoveAsset) => {
            Some(EventCategory::Withdraw)
        }
        (HistoryEventType::Withdrawal, HistoryEventSubtype::Reward) => {
            Some(EventCategory::ClaimReward)
        }
        (HistoryEventType::Receive, HistoryEventSubtype::ReceiveWrapped) => {
            Some(EventCategory::Receive)
        }
        (HistoryEventType::Spend, HistoryEventSubtype::ReturnWrapped) => Some(EventCategory::Send),
        (HistoryEventType::Deposit, HistoryEventSubtype::DepositAsset) => {
            Some(EventCategory::Deposit)
        }
        _ => None,
    }
}

/// Every `(type, subtype)` pair the pool and gauge handlers can produce.
pub fn decoded_classifications() -> impl Iterator<Item = (HistoryEventType, HistoryEventSubtype)> {
    HistoryEventType::iter().flat_map(|event_type| {
        HistoryEventSubtype::iter()
            .filter(move |event_subtype| event_category(event_type, *event_subtype).is_some())
            .map(move |event_subtype| (event_type, event_subtype))
    })
}

pub fn possible_events() -> HashMap<&'static str, EventMapping> {
    let mut mapping = EventMapping::new();
    for event_type in HistoryEventType::iter() {
        for event_subtype in HistoryEventSubtype::iter() {
            if let Some(category) = event_category(event_type, event_subtype) {
                mapping
                    .entry(event_type)
                    .or_default()
                    .insert(event_subtype, category);
            }
        }
    }
    HashMap::from([(CPT_AERODROME, mapping)])
}

pub fn possible_products() -> HashMap<&'static str, Vec<EvmProduct>> {
    HashMap::from([(CPT_AERODROME, vec![EvmProduct::Pool, EvmProduct::Gauge])])
}

pub fn counterparties() -> Vec<CounterpartyDetails> {
    vec![CounterpartyDetails {
        identifier: CPT_AERODROME,
        label: AERODROME_LABEL,
        image: AERODROME_IMAGE,
    }]
}
