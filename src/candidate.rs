//! Asset ids and the anonymity set of issuance candidates.

use crate::{hashing::field_elem_from_try_and_incr, serde_utils::ArkObjectBytes};
use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Domain separator when mapping an asset id into the scalar field
const ASSET_ID_DOMAIN: &[u8] = b"confidential-issuance : asset-id";

/// Fixed-width identifier of an asset type. Equality is byte-exact.
#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct AssetId(pub [u8; 32]);

impl AssetId {
    /// Map the asset id into the scalar field with domain separation
    pub fn to_scalar<F: PrimeField, D: Digest>(&self) -> F {
        field_elem_from_try_and_incr::<F, D>(&crate::concat_slices![ASSET_ID_DOMAIN, self.0])
    }
}

impl From<[u8; 32]> for AssetId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AssetId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// One entry of the anonymity set. Any type exposing an asset id and an issuance public key can
/// participate; the order of the candidate list is meaningful and must not change between proof
/// creation and verification.
pub trait AssetIssuanceCandidate<G: AffineRepr> {
    fn asset_id(&self) -> &AssetId;
    fn issuance_key(&self) -> &G;
}

impl<G: AffineRepr, T: AssetIssuanceCandidate<G>> AssetIssuanceCandidate<G> for &T {
    fn asset_id(&self) -> &AssetId {
        (*self).asset_id()
    }

    fn issuance_key(&self) -> &G {
        (*self).issuance_key()
    }
}

/// Plain record candidate for callers who don't bring their own type
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct IssuanceCandidate<G: AffineRepr> {
    pub asset_id: AssetId,
    #[serde_as(as = "ArkObjectBytes")]
    pub issuance_key: G,
}

impl<G: AffineRepr> AssetIssuanceCandidate<G> for IssuanceCandidate<G> {
    fn asset_id(&self) -> &AssetId {
        &self.asset_id
    }

    fn issuance_key(&self) -> &G {
        &self.issuance_key
    }
}
