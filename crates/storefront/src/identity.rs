//! Identity resolution from the stored bearer token.
//!
//! The token is decoded without verifying its signature. The resulting
//! identity only partitions storage; nothing here is an authorization
//! decision.
//!
//! Resolution order:
//! 1. `sub` claim
//! 2. `id` claim (number or string)
//! 3. `email` claim
//! 4. stored guest id, generated and persisted on first use
//!
//! A missing, malformed, or expired token resolves to the guest identity.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::instrument;

use storefront_state_core::{GuestId, Identity, IdentitySource};

use crate::storage::{KeyValueStore, keys, read_text, write_text};

/// Length of the random base36 part of a guest id.
const GUEST_SUFFIX_LEN: usize = 16;

const PADDING_INDIFFERENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

/// base64url, padded or not.
const URL_SAFE_LENIENT: GeneralPurpose =
    GeneralPurpose::new(&alphabet::URL_SAFE, PADDING_INDIFFERENT);

/// Standard alphabet, for tokens produced by non-conforming issuers.
const STANDARD_LENIENT: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, PADDING_INDIFFERENT);

/// Claims read from a token payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenClaims {
    /// `sub` claim.
    pub subject: Option<String>,
    /// `id` claim, numeric ids rendered as decimal text.
    pub user_id: Option<String>,
    /// `email` claim.
    pub email: Option<String>,
    /// `exp` claim in seconds since the Unix epoch.
    pub expires_at: Option<i64>,
}

impl TokenClaims {
    fn from_payload(payload: &Map<String, Value>) -> Self {
        Self {
            subject: payload.get("sub").and_then(claim_text),
            user_id: payload.get("id").and_then(claim_text),
            email: payload.get("email").and_then(claim_text),
            expires_at: payload.get("exp").and_then(claim_seconds),
        }
    }

    /// Whether the `exp` claim lies before `now`. Tokens without `exp` never
    /// expire.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now.timestamp())
    }

    /// Identity from the first usable claim, in precedence order.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        [
            (IdentitySource::Subject, &self.subject),
            (IdentitySource::UserId, &self.user_id),
            (IdentitySource::Email, &self.email),
        ]
        .into_iter()
        .find_map(|(source, claim)| {
            claim.as_deref().map(|key| Identity::from_claim(source, key))
        })
    }
}

/// Text of a claim value. Blank strings and non-scalar values are unusable.
fn claim_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)] // exp values are far inside i64 range
fn claim_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        _ => None,
    }
}

/// Decode the payload of a three-segment token without verifying it.
///
/// Returns `None` for anything that is not `header.payload.signature` with a
/// base64-encoded JSON object as payload. An optional `Bearer ` prefix is
/// ignored.
#[must_use]
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let token = token.trim();
    let token = token
        .strip_prefix("Bearer ")
        .or_else(|| token.strip_prefix("bearer "))
        .unwrap_or(token)
        .trim();

    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };
    if payload.is_empty() {
        return None;
    }

    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .or_else(|_| STANDARD_LENIENT.decode(payload))
        .ok()?;
    let payload: Map<String, Value> = serde_json::from_slice(&bytes).ok()?;
    Some(TokenClaims::from_payload(&payload))
}

/// Generate a fresh guest id: `guest_` followed by random base36 characters.
#[must_use]
pub fn generate_guest_id() -> GuestId {
    let mut rng = rand::rng();
    let suffix: String = (0..GUEST_SUFFIX_LEN)
        .map(|_| char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
        .collect();
    GuestId::new(format!("{}{suffix}", GuestId::PREFIX))
}

/// Resolves the storage identity from a key-value store.
#[derive(Debug)]
pub struct IdentityResolver<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> IdentityResolver<'a, S> {
    /// Create a resolver over `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolve the current identity.
    ///
    /// Never fails. Storage problems while reading the token are treated as
    /// "no token"; a guest id that cannot be persisted is still returned, so
    /// the caller gets a usable (if short-lived) identity.
    #[must_use]
    pub fn resolve(&self) -> Identity {
        self.resolve_at(Utc::now())
    }

    /// Resolve the identity, judging token expiry against `now`.
    #[must_use]
    #[instrument(skip(self))]
    pub fn resolve_at(&self, now: DateTime<Utc>) -> Identity {
        if let Some(identity) = self.token_identity(now) {
            tracing::debug!(source = %identity.source(), "Resolved identity from token");
            return identity;
        }
        self.guest_identity()
    }

    /// The stored bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        match read_text(self.store, keys::TOKEN) {
            Ok(token) => token.map(SecretString::from),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read token, continuing as guest");
                None
            }
        }
    }

    fn token_identity(&self, now: DateTime<Utc>) -> Option<Identity> {
        let token = self.token()?;
        let Some(claims) = decode_claims(token.expose_secret()) else {
            tracing::debug!("Stored token is not decodable, using guest identity");
            return None;
        };
        if claims.is_expired(now) {
            tracing::debug!("Stored token has expired, using guest identity");
            return None;
        }
        let identity = claims.identity();
        if identity.is_none() {
            tracing::debug!("Stored token has no identity claim, using guest identity");
        }
        identity
    }

    fn guest_identity(&self) -> Identity {
        match read_text(self.store, keys::GUEST_ID) {
            Ok(Some(existing)) => return Identity::guest(GuestId::new(existing)),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read guest id"),
        }

        let guest = generate_guest_id();
        match write_text(self.store, keys::GUEST_ID, guest.as_str()) {
            Ok(()) => tracing::info!("Created guest identity"),
            Err(e) => tracing::warn!(error = %e, "Failed to persist guest id"),
        }
        Identity::guest(guest)
    }
}
