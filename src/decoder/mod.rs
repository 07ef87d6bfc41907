pub mod mapping;
pub mod ordering;
pub mod registry;

use std::collections::HashMap;

use alloy_primitives::Address;
use serde::Serialize;

use crate::assets::TokenResolver;
use crate::decoder::registry::{AddressRegistry, AddressSnapshot, AddressSource};
use crate::error::Error;
use crate::protocols::{TopicKind, gauge, liquidity, swap};
use crate::settings::DecoderSettings;
use crate::types::DecoderContext;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorrelationOutcome {
    #[default]
    NotRequired,
    Correlated {
        spend_index: usize,
        receive_index: usize,
    },
    Uncorrelated {
        reason: String,
    },
}

/// Result of decoding one log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodingOutput {
    /// A balance-affecting event was reclassified; dependent balances must be recomputed.
    pub refresh_balances: bool,
    pub correlation: CorrelationOutcome,
}

/// Which handler family an emitting address routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DecoderKind {
    Pool,
    Gauge,
}

pub struct AerodromeDecoder<S, T> {
    registry: AddressRegistry<S>,
    tokens: T,
}

impl<S: AddressSource, T: TokenResolver> AerodromeDecoder<S, T> {
    pub fn new(source: S, tokens: T, settings: &DecoderSettings) -> Result<Self, Error> {
        let registry = AddressRegistry::new(source, settings.router, &settings.registry)?;
        Ok(Self { registry, tokens })
    }

    pub fn registry(&self) -> &AddressRegistry<S> {
        &self.registry
    }

    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    /// Routes a log to the pool or gauge handler depending on its emitter.
    pub fn decode_log(&self, ctx: DecoderContext<'_>) -> Result<DecodingOutput, Error> {
        let snapshot = self.registry.snapshot();
        let emitter = ctx.tx_log.address;
        if snapshot.is_pool(&emitter) {
            self.decode_pool_events(&snapshot, ctx)
        } else if snapshot.is_gauge(&emitter) {
            gauge::decode_gauge_event(ctx.tx_log, ctx.events, &self.tokens)
        } else {
            tracing::debug!(
                %emitter,
                tx_hash = %ctx.tx_hash,
                "log emitter is not a registered pool or gauge"
            );
            Ok(DecodingOutput::default())
        }
    }

    fn decode_pool_events(
        &self,
        snapshot: &AddressSnapshot,
        ctx: DecoderContext<'_>,
    ) -> Result<DecodingOutput, Error> {
        match TopicKind::from_log(ctx.tx_log) {
            TopicKind::AddLiquidity => liquidity::decode_add_liquidity(
                ctx.tx_log,
                ctx.events,
                &snapshot.pools,
                &self.tokens,
            ),
            TopicKind::RemoveLiquidity => liquidity::decode_remove_liquidity(
                ctx.tx_log,
                ctx.events,
                &snapshot.pools,
                &self.tokens,
            ),
            TopicKind::Swap => swap::decode_swap(
                ctx.tx_hash,
                ctx.events,
                &snapshot.protocol_addresses,
                &self.tokens,
            ),
            TopicKind::GaugeDeposit
            | TopicKind::GaugeWithdraw
            | TopicKind::ClaimRewards
            | TopicKind::Unknown => Ok(DecodingOutput::default()),
        }
    }

    /// Every registered address and the handler family its logs route to.
    pub fn addresses_to_decoders(&self) -> HashMap<Address, DecoderKind> {
        mapping_for(&self.registry.snapshot())
    }

    /// Refreshes the registry; returns the new routing table when it changed.
    pub fn reload_data(&self) -> Result<Option<HashMap<Address, DecoderKind>>, Error> {
        if self.registry.ensure_fresh()? {
            Ok(Some(self.addresses_to_decoders()))
        } else {
            Ok(None)
        }
    }
}

fn mapping_for(snapshot: &AddressSnapshot) -> HashMap<Address, DecoderKind> {
    let pools = snapshot
        .pools
        .iter()
        .map(|address| (*address, DecoderKind::Pool));
    let gauges = snapshot
        .gauges
        .iter()
        .map(|address| (*address, DecoderKind::Gauge));
    pools.chain(gauges).collect()
}
