#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod assets;
pub mod decoder;
pub mod error;
pub mod protocols;
pub mod settings;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use assets::{AssetKind, InMemoryTokens, TokenInfo, TokenResolver, asset_normalized_value};
pub use decoder::mapping::{
    CounterpartyDetails, EventCategory, counterparties, decoded_classifications, event_category,
    possible_events, possible_products,
};
pub use decoder::ordering::place_adjacent;
pub use decoder::registry::{
    AddressRegistry, AddressSnapshot, AddressSource, CacheType, PoolsAndGauges,
};
pub use decoder::{AerodromeDecoder, CorrelationOutcome, DecoderKind, DecodingOutput};
pub use error::Error;
pub use protocols::{CPT_AERODROME, ROUTER, TopicKind};
pub use settings::{DecoderSettings, RegistrySettings};
pub use types::{
    Balance, DecoderContext, EvmProduct, HistoryEventSubtype, HistoryEventType, LedgerEvent,
    RawLog,
};
