use std::collections::HashMap;

use alloy_primitives::U256;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Decimal places `rust_decimal` can carry.
const MAX_DECIMALS: u32 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Native,
    Erc20,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u32,
    pub kind: AssetKind,
    /// Protocol that issued the token, e.g. `aerodrome_pool` for LP tokens.
    #[serde(default)]
    pub protocol: Option<String>,
}

/// Token metadata lookups needed while writing notes and normalizing amounts.
pub trait TokenResolver: Sync {
    fn resolve(&self, asset: &str) -> Result<TokenInfo, Error>;

    /// Tags `asset` with `protocol` only when it carries no tag yet.
    /// Returns whether the tag was written.
    fn set_protocol_if_missing(&self, asset: &str, protocol: &str) -> Result<bool, Error>;

    /// Resolves `asset` and fails unless it is an ERC-20 token.
    fn resolve_token(&self, asset: &str) -> Result<TokenInfo, Error> {
        let info = self.resolve(asset)?;
        if info.kind != AssetKind::Erc20 {
            return Err(Error::WrongAssetType {
                identifier: asset.to_string(),
                expected: "erc20 token",
            });
        }
        Ok(info)
    }
}

/// Thread-safe token store backed by a map keyed by asset identifier.
#[derive(Debug, Default)]
pub struct InMemoryTokens {
    tokens: RwLock<HashMap<String, TokenInfo>>,
}

impl InMemoryTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, identifier: impl Into<String>, info: TokenInfo) {
        self.tokens.write().insert(identifier.into(), info);
    }

    pub fn protocol_of(&self, identifier: &str) -> Option<String> {
        self.tokens
            .read()
            .get(identifier)
            .and_then(|info| info.protocol.clone())
    }
}

impl FromIterator<(String, TokenInfo)> for InMemoryTokens {
    fn from_iter<I: IntoIterator<Item = (String, TokenInfo)>>(iter: I) -> Self {
        Self {
            tokens: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl TokenResolver for InMemoryTokens {
    fn resolve(&self, asset: &str) -> Result<TokenInfo, Error> {
        self.tokens
            .read()
            .get(asset)
            .cloned()
            .ok_or_else(|| Error::UnknownAsset {
                identifier: asset.to_string(),
            })
    }

    fn set_protocol_if_missing(&self, asset: &str, protocol: &str) -> Result<bool, Error> {
        let mut tokens = self.tokens.write();
        let info = tokens.get_mut(asset).ok_or_else(|| Error::UnknownAsset {
            identifier: asset.to_string(),
        })?;
        if info.kind != AssetKind::Erc20 {
            return Err(Error::WrongAssetType {
                identifier: asset.to_string(),
                expected: "erc20 token",
            });
        }
        if info.protocol.is_some() {
            return Ok(false);
        }
        info.protocol = Some(protocol.to_string());
        Ok(true)
    }
}

/// Scales a raw on-chain integer down by `decimals` places.
pub fn asset_normalized_value(raw: U256, decimals: u32) -> Result<Decimal, Error> {
    if decimals > MAX_DECIMALS {
        return Err(Error::Amount {
            reason: format!("{decimals} decimals exceed the supported precision"),
        });
    }
    let value = u128::try_from(raw)
        .ok()
        .and_then(|v| i128::try_from(v).ok())
        .ok_or_else(|| Error::Amount {
            reason: format!("raw amount {raw} does not fit in 128 bits"),
        })?;
    Decimal::try_from_i128_with_scale(value, decimals).map_err(|e| Error::Amount {
        reason: format!("raw amount {raw} with {decimals} decimals: {e}"),
    })
}
