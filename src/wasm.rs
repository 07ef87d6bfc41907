use std::collections::HashMap;

use alloy_primitives::{Address, B256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::assets::{InMemoryTokens, TokenInfo};
use crate::decoder::registry::{AddressSource, CacheType, PoolsAndGauges};
use crate::decoder::{AerodromeDecoder, DecodingOutput, mapping};
use crate::error::Error;
use crate::protocols::TopicKind;
use crate::settings::DecoderSettings;
use crate::types::{DecoderContext, LedgerEvent, RawLog};

fn to_js<T: Serialize>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

fn error_result(msg: &str) -> JsValue {
    to_js(&serde_json::json!({ "error": msg }))
}

/// Address sets handed in by the caller; always considered fresh.
struct FixedAddresses(PoolsAndGauges);

impl AddressSource for FixedAddresses {
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

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecodeRequest {
    tx_hash: B256,
    log: RawLog,
    events: Vec<LedgerEvent>,
    pools: Vec<Address>,
    #[serde(default)]
    gauges: Vec<Address>,
    tokens: HashMap<String, TokenInfo>,
    #[serde(default)]
    router: Option<Address>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodeResponse {
    events: Vec<LedgerEvent>,
    output: DecodingOutput,
    tokens: HashMap<String, Option<String>>,
}

/// Name of the operation a raw topic hash stands for, `unknown` otherwise.
#[wasm_bindgen]
pub fn classify_topic(topic: &str) -> String {
    topic
        .parse::<B256>()
        .map_or(TopicKind::Unknown, |t| TopicKind::from_topic(&t))
        .to_string()
}

/// Counterparty → event type → subtype → category.
#[wasm_bindgen]
pub fn get_possible_events() -> JsValue {
    to_js(&mapping::possible_events())
}

#[wasm_bindgen]
pub fn get_counterparties() -> JsValue {
    to_js(&mapping::counterparties())
}

/// Decodes one log against a JSON snapshot of the transaction's events.
///
/// The response carries the reclassified events, the decoding output and the
/// protocol tag of every supplied token after decoding.
#[wasm_bindgen]
pub fn decode_log(request: &str) -> JsValue {
    match run_decode(request) {
        Ok(response) => to_js(&response),
        Err(e) => error_result(&e.to_string()),
    }
}

fn run_decode(request: &str) -> Result<DecodeResponse, Error> {
    let request: DecodeRequest = serde_json::from_str(request)?;
    let DecodeRequest {
        tx_hash,
        log,
        mut events,
        pools,
        gauges,
        tokens,
        router,
    } = request;

    let identifiers: Vec<String> = tokens.keys().cloned().collect();
    let source = FixedAddresses(PoolsAndGauges {
        pools: pools.into_iter().collect(),
        gauges: gauges.into_iter().collect(),
    });
    let mut settings = DecoderSettings::default();
    if let Some(router) = router {
        settings.router = router;
    }
    let tokens: InMemoryTokens = tokens.into_iter().collect();
    let decoder = AerodromeDecoder::new(source, tokens, &settings)?;

    let output = decoder.decode_log(DecoderContext {
        tx_hash,
        tx_log: &log,
        events: &mut events,
    })?;

    let tokens = identifiers
        .into_iter()
        .map(|id| {
            let protocol = decoder.tokens().protocol_of(&id);
            (id, protocol)
        })
        .collect();
    Ok(DecodeResponse {
        events,
        output,
        tokens,
    })
}
