//! Static token registry.
//!
//! Token metadata is fixed at compile time: the set of symbols a chain
//! variant can carry is known, so lookups never fail for configured chains
//! and the registry is immutable after construction.
//!
//! DOT is the one token whose decimal exponent is height-dependent: the
//! Polkadot redenomination took effect at block 1,248,328, moving the
//! display scale from 10^12 to 10^10 plancks per DOT. Transfers at or after
//! that block use the new exponent.

/// Block height at which the DOT redenomination took effect.
pub const DOT_REDENOMINATION_BLOCK: u64 = 1_248_328;

/// Decimal exponent behaviour of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decimals {
    /// Exponent constant over the whole chain history.
    Fixed(u32),
    /// Exponent changed at a known block height: `before` applies below
    /// `at_block`, `after` applies at and above it.
    Redenominated {
        at_block: u64,
        before: u32,
        after: u32,
    },
}

/// Metadata for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    /// Token symbol (e.g., "DOT").
    pub symbol: &'static str,
    /// Display name of the network the token belongs to.
    pub name: &'static str,
    decimals: Decimals,
}

impl TokenInfo {
    /// Decimal exponent in effect at `block`.
    pub fn exponent_at(&self, block: u64) -> u32 {
        match self.decimals {
            Decimals::Fixed(exp) => exp,
            Decimals::Redenominated {
                at_block,
                before,
                after,
            } => {
                if block >= at_block {
                    after
                } else {
                    before
                }
            }
        }
    }

    /// Scaling divisor (10^exponent) in effect at `block`.
    ///
    /// This is the value stored on transfer records: dividing the raw
    /// amount by it yields the display-unit quantity at the transfer's
    /// point in history.
    pub fn divisor_at(&self, block: u64) -> u128 {
        10u128.pow(self.exponent_at(block))
    }
}

/// Immutable symbol → metadata table.
///
/// Built once at startup and shared by reference; there is no mutation API.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    entries: &'static [TokenInfo],
}

const BUILTIN_TOKENS: &[TokenInfo] = &[
    TokenInfo {
        symbol: "DOT",
        name: "Polkadot",
        decimals: Decimals::Redenominated {
            at_block: DOT_REDENOMINATION_BLOCK,
            before: 12,
            after: 10,
        },
    },
    TokenInfo {
        symbol: "KSM",
        name: "Kusama",
        decimals: Decimals::Fixed(12),
    },
    TokenInfo {
        symbol: "WND",
        name: "Westend",
        decimals: Decimals::Fixed(12),
    },
    TokenInfo {
        symbol: "KAR",
        name: "Karura",
        decimals: Decimals::Fixed(12),
    },
    TokenInfo {
        symbol: "PLD",
        name: "Dusty",
        decimals: Decimals::Fixed(15),
    },
    TokenInfo {
        symbol: "SBY",
        name: "Shibuya",
        decimals: Decimals::Fixed(18),
    },
];

impl TokenRegistry {
    /// Registry over the built-in token table.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_TOKENS,
        }
    }

    /// Look up a token by symbol.
    pub fn get(&self, symbol: &str) -> Option<&TokenInfo> {
        self.entries.iter().find(|t| t.symbol == symbol)
    }

    /// All registered symbols.
    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|t| t.symbol)
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
