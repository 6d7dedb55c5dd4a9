use crate::{hashing::affine_group_elem_from_try_and_incr, serde_utils::ArkObjectBytes};
use ark_ec::AffineRepr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Public parameters for asset commitments and issuance proofs. Mutually agreed upon by the
/// prover and all verifiers.
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct IssuanceParams<G: AffineRepr> {
    /// Generator the asset id term of the commitment is bound to. Hash-derived so its discrete
    /// log wrt. `key_base` is unknown, which keeps the identity term and the blinding term of a
    /// commitment from being confused for each other.
    #[serde_as(as = "ArkObjectBytes")]
    pub asset_base: G,
    /// Generator for the blinding factor. Issuance public keys are ordinary `key_base * y` keys.
    #[serde_as(as = "ArkObjectBytes")]
    pub key_base: G,
}

impl<G: AffineRepr> IssuanceParams<G> {
    /// Generate params by hashing a known label
    pub fn new<D: Digest>(label: &[u8]) -> Self {
        let asset_base = affine_group_elem_from_try_and_incr::<G, D>(&crate::concat_slices![
            label,
            b" : asset-base"
        ]);
        Self {
            asset_base,
            key_base: G::generator(),
        }
    }

    /// Params shouldn't contain the zero point. A verifier on receiving these must first check
    /// that they are valid before using them for any verification.
    pub fn is_valid(&self) -> bool {
        !(self.asset_base.is_zero() || self.key_base.is_zero())
    }
}
