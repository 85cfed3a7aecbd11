//! Provider profiles: per-provider request builders and response parsers.
//!
//! A profile is the (builder, parser) pair for one provider wire schema.
//! Selection walks a fixed-priority pattern table instead of branching on
//! substrings: the most specific provider-version prefix is tested first,
//! the provider family second, and the generic passthrough profile catches
//! everything else. Adding a provider means adding a table entry and a
//! submodule, not another conditional.

pub mod claude;
pub mod generic;
pub mod titan;

use crate::error::{BuildError, ParseError};
use crate::types::InvocationRequest;

/// Identifies one provider wire schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileId {
    /// Anthropic messages API (Claude 3 and later).
    ClaudeMessages,
    /// Anthropic legacy completion API (Claude 2 and earlier).
    ClaudeLegacy,
    /// Amazon Titan text generation.
    TitanText,
    /// Generic passthrough for unrecognized identifiers.
    Generic,
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileId::ClaudeMessages => write!(f, "claude-messages"),
            ProfileId::ClaudeLegacy => write!(f, "claude-legacy"),
            ProfileId::TitanText => write!(f, "titan-text"),
            ProfileId::Generic => write!(f, "generic"),
        }
    }
}

/// A request-builder / response-parser pair for one provider schema.
pub struct ProviderProfile {
    id: ProfileId,
    build: fn(&InvocationRequest) -> Result<Vec<u8>, BuildError>,
    parse: fn(&[u8]) -> Result<String, ParseError>,
}

impl ProviderProfile {
    /// The profile identifier.
    pub fn id(&self) -> ProfileId {
        self.id
    }

    /// Build the serialized provider payload for a request.
    pub fn build_payload(&self, request: &InvocationRequest) -> Result<Vec<u8>, BuildError> {
        (self.build)(request)
    }

    /// Extract the generated text from a provider response body.
    pub fn parse_text(&self, body: &[u8]) -> Result<String, ParseError> {
        (self.parse)(body)
    }

    /// Select the profile for a model identifier.
    ///
    /// Never fails: identifiers that match no pattern get the generic
    /// passthrough profile.
    pub fn for_model(model_id: &str) -> &'static ProviderProfile {
        let id = select_profile(model_id);
        PROFILES
            .iter()
            .find(|p| p.id == id)
            .unwrap_or(&GENERIC_PROFILE)
    }
}

impl std::fmt::Debug for ProviderProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderProfile")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Pattern table, in priority order. Versioned prefixes come before family
/// prefixes so an identifier matching both resolves to the specific one.
const PATTERNS: &[(&str, ProfileId)] = &[
    ("anthropic.claude-3", ProfileId::ClaudeMessages),
    ("anthropic.", ProfileId::ClaudeLegacy),
    ("amazon.titan", ProfileId::TitanText),
];

static PROFILES: &[ProviderProfile] = &[
    ProviderProfile {
        id: ProfileId::ClaudeMessages,
        build: claude::build_messages_payload,
        parse: claude::parse_messages_response,
    },
    ProviderProfile {
        id: ProfileId::ClaudeLegacy,
        build: claude::build_legacy_payload,
        parse: claude::parse_legacy_response,
    },
    ProviderProfile {
        id: ProfileId::TitanText,
        build: titan::build_payload,
        parse: titan::parse_response,
    },
    GENERIC_PROFILE,
];

const GENERIC_PROFILE: ProviderProfile = ProviderProfile {
    id: ProfileId::Generic,
    build: generic::build_payload,
    parse: generic::parse_response,
};

/// Match a model identifier against the pattern table.
///
/// Identifiers are normalized first: an ARN
/// (`arn:aws:bedrock:region:account:model/model-id`) is reduced to its
/// model-id segment, and matching is case-insensitive. Patterns are exact
/// prefixes, not substrings.
fn select_profile(model_id: &str) -> ProfileId {
    let effective = effective_model_id(model_id).to_lowercase();
    for (pattern, id) in PATTERNS {
        if effective.starts_with(pattern) {
            return *id;
        }
    }
    ProfileId::Generic
}

/// Strip the ARN wrapper from a model identifier, if present.
fn effective_model_id(model_id: &str) -> &str {
    if model_id.starts_with("arn:") {
        model_id.rsplit('/').next().unwrap_or(model_id)
    } else {
        model_id
    }
}
