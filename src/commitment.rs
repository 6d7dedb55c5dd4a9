//! Pedersen commitment to an asset id under a blinding factor derived from an asset
//! encryption key.

use crate::{
    candidate::AssetId, hashing::field_elem_from_seed, serde_utils::ArkObjectBytes,
    setup::IssuanceParams,
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Domain separator for deriving the blinding factor from the asset encryption key
const BLINDING_SALT: &[u8] = b"confidential-issuance : asset-commitment-blinding";

/// Blinding factor of an asset commitment. Derived deterministically from
/// `(asset encryption key, asset id)`, so it is never transmitted or stored; the key holder
/// regenerates it on demand.
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Zeroize, ZeroizeOnDrop,
)]
pub struct AssetBlinding<F: PrimeField>(pub F);

impl<F: PrimeField> AsRef<F> for AssetBlinding<F> {
    fn as_ref(&self) -> &F {
        &self.0
    }
}

/// Hiding and binding commitment to an asset id,
/// `asset_base * H(asset_id) + key_base * blinding`.
#[serde_as]
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct AssetCommitment<G: AffineRepr>(#[serde_as(as = "ArkObjectBytes")] pub G);

impl<G: AffineRepr> AssetCommitment<G> {
    /// Commit to `asset_id` under the asset encryption key `aek`. Deterministic; recomputing
    /// with the same `(asset_id, aek)` yields the same commitment and blinding factor.
    pub fn new<D: Digest>(
        asset_id: &AssetId,
        aek: &[u8],
        params: &IssuanceParams<G>,
    ) -> (Self, AssetBlinding<G::ScalarField>) {
        let blinding = field_elem_from_seed::<G::ScalarField>(
            &crate::concat_slices![aek, asset_id.0],
            BLINDING_SALT,
        );
        let commitment = (params.asset_base * asset_id.to_scalar::<G::ScalarField, D>()
            + params.key_base * blinding)
            .into_affine();
        (Self(commitment), AssetBlinding(blinding))
    }
}

impl<G: AffineRepr> AsRef<G> for AssetCommitment<G> {
    fn as_ref(&self) -> &G {
        &self.0
    }
}
