//! # Trusted Key Registry
//!
//! The host supplies the trust anchors at initialization as an index →
//! public key table — there is no network fetch and no mutation after
//! load. Every anchor is validated at construction so a lookup can never
//! hand the verifier unusable key material.
//!
//! The registry is plain immutable data: concurrent verification calls
//! share it read-only with no locking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use nzcp_core::error::CryptoError;
use nzcp_crypto::CurvePoint;

/// A trust-anchor public key, identified by an opaque index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustAnchor {
    /// The P-256 public key point.
    #[serde(flatten)]
    pub point: CurvePoint,
    /// The key id this anchor is published under, if any. Only consulted
    /// by the strict key-id policy.
    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
}

impl TrustAnchor {
    /// An anchor with no published key id.
    pub fn new(point: CurvePoint) -> Self {
        Self {
            point,
            key_id: None,
        }
    }

    /// An anchor published under `kid`.
    pub fn with_key_id(point: CurvePoint, key_id: impl Into<String>) -> Self {
        Self {
            point,
            key_id: Some(key_id.into()),
        }
    }
}

/// An immutable index → trust anchor table.
#[derive(Debug, Clone)]
pub struct TrustedKeyRegistry {
    anchors: HashMap<u32, TrustAnchor>,
}

impl TrustedKeyRegistry {
    /// Build a registry, validating that every anchor is a point on the
    /// curve.
    pub fn from_anchors(
        anchors: impl IntoIterator<Item = (u32, TrustAnchor)>,
    ) -> Result<Self, CryptoError> {
        let anchors: HashMap<u32, TrustAnchor> = anchors.into_iter().collect();
        for (index, anchor) in &anchors {
            if !anchor.point.is_on_curve() {
                return Err(CryptoError::KeyError(format!(
                    "trust anchor {index} is not a valid P-256 point"
                )));
            }
        }
        Ok(Self { anchors })
    }

    /// Load from a host-supplied JSON table:
    /// `{"<index>": {"x": "<hex>", "y": "<hex>", "kid": "…"}}`.
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        let anchors: HashMap<u32, TrustAnchor> = serde_json::from_str(json)
            .map_err(|e| CryptoError::KeyError(format!("invalid registry document: {e}")))?;
        Self::from_anchors(anchors)
    }

    /// Look up an anchor by its opaque index.
    pub fn lookup(&self, index: u32) -> Option<&TrustAnchor> {
        self.anchors.get(&index)
    }

    /// Number of anchors in the registry.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// True when the registry holds no anchors.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nzcp_crypto::U256;

    fn example_point() -> CurvePoint {
        CurvePoint::new(
            U256::from_hex("cd147e5c6b02a75d95bdb82e8b80c3e8ee9caa685f3ee5cc862d4ec4f97cefad")
                .unwrap(),
            U256::from_hex("22fe5253a16e5be4d1621e7f18eac995c57f82917f1a9150842383f0b4a4dd3d")
                .unwrap(),
        )
    }

    #[test]
    fn test_from_anchors_and_lookup() {
        let registry = TrustedKeyRegistry::from_anchors([(
            119,
            TrustAnchor::with_key_id(example_point(), "key-1"),
        )])
        .unwrap();
        assert_eq!(registry.len(), 1);
        let anchor = registry.lookup(119).unwrap();
        assert_eq!(anchor.point, example_point());
        assert_eq!(anchor.key_id.as_deref(), Some("key-1"));
        assert!(registry.lookup(120).is_none());
    }

    #[test]
    fn test_off_curve_anchor_rejected() {
        let mut point = example_point();
        point.y = U256::from_u64(1);
        let err = TrustedKeyRegistry::from_anchors([(0, TrustAnchor::new(point))]).unwrap_err();
        assert!(matches!(err, CryptoError::KeyError(_)));
    }

    #[test]
    fn test_from_json() {
        let json = format!(
            r#"{{"119": {{"x": "{}", "y": "{}", "kid": "key-1"}}}}"#,
            example_point().x.to_hex(),
            example_point().y.to_hex()
        );
        let registry = TrustedKeyRegistry::from_json(&json).unwrap();
        assert_eq!(
            registry.lookup(119).unwrap().key_id.as_deref(),
            Some("key-1")
        );
    }

    #[test]
    fn test_from_json_without_kid() {
        let json = format!(
            r#"{{"7": {{"x": "{}", "y": "{}"}}}}"#,
            example_point().x.to_hex(),
            example_point().y.to_hex()
        );
        let registry = TrustedKeyRegistry::from_json(&json).unwrap();
        assert_eq!(registry.lookup(7).unwrap().key_id, None);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(TrustedKeyRegistry::from_json("not json").is_err());
        assert!(TrustedKeyRegistry::from_json(r#"{"0": {"x": "00"}}"#).is_err());
    }

    #[test]
    fn test_anchor_serde_roundtrip() {
        let anchor = TrustAnchor::with_key_id(example_point(), "key-1");
        let json = serde_json::to_string(&anchor).unwrap();
        let parsed: TrustAnchor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, anchor);
    }
}
