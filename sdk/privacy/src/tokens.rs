//! Token registry.
//!
//! Memos carry a one-byte token index instead of the 20-byte token address.
//! Index 0 is always the native asset (address zero).

use zkor_config::TokenConfig;

use crate::error::NoteError;
use crate::field::Field;

/// Maximum number of tokens addressable by a one-byte index.
pub const MAX_TOKENS: usize = 256;

/// Maps token addresses to memo indices and back.
pub trait TokenRegistry {
    fn token_id(&self, token: &Field) -> Option<u8>;
    fn token_address(&self, id: u8) -> Option<Field>;
}

/// Fixed, ordered list of token addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTokenRegistry {
    tokens: Vec<Field>,
}

impl StaticTokenRegistry {
    /// Registry that only knows the native asset.
    pub fn native_only() -> Self {
        Self {
            tokens: vec![Field::zero()],
        }
    }

    /// Native asset first, then `tokens` in order. Zero and duplicate
    /// addresses are skipped.
    pub fn new<I>(tokens: I) -> Result<Self, NoteError>
    where
        I: IntoIterator<Item = Field>,
    {
        let mut registry = Self::native_only();
        for token in tokens {
            if registry.tokens.contains(&token) {
                continue;
            }
            registry.tokens.push(token);
        }

        if registry.tokens.len() > MAX_TOKENS {
            return Err(NoteError::TooManyTokens {
                max: MAX_TOKENS,
                got: registry.tokens.len(),
            });
        }
        Ok(registry)
    }

    pub fn from_config(config: &TokenConfig) -> Result<Self, NoteError> {
        let tokens = config
            .registered
            .iter()
            .map(|addr| addr.parse::<Field>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(tokens)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for StaticTokenRegistry {
    fn default() -> Self {
        Self::native_only()
    }
}

impl TokenRegistry for StaticTokenRegistry {
    fn token_id(&self, token: &Field) -> Option<u8> {
        self.tokens
            .iter()
            .position(|t| t == token)
            .and_then(|idx| u8::try_from(idx).ok())
    }

    fn token_address(&self, id: u8) -> Option<Field> {
        self.tokens.get(id as usize).cloned()
    }
}
