#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! # Anonymous asset issuance proofs
//!
//! Protocols letting an issuer mint a unit of an asset without revealing which of several
//! candidate asset types was minted nor which of several issuance authorities authorized it:
//!
//! 1. [`AssetCommitment`](commitment::AssetCommitment) - Pedersen commitment to an asset id with
//!    a blinding factor derived deterministically from an asset encryption key, so the holder of
//!    the key can re-open the commitment without storing extra state.
//! 2. [`ConfidentialIarp`](iarp::ConfidentialIarp) - issuance asset-range proof, a ring proof
//!    over an anonymity set of candidate asset ids showing the commitment is to one of them,
//!    without revealing which.
//! 3. [`IssuanceProof`](issuance_proof::IssuanceProof) - ring proof of knowledge of the private
//!    key behind one of the candidates' issuance public keys, transcript-bound to the commitment,
//!    the asset-range proof, the transaction message and a nonce so that both rings are forced to
//!    agree on the same secret index.
//!
//! Verification returns a pair of booleans `(valid, index_matches)`; a verifier with an
//! out-of-band belief about which candidate was issued can cross-check that belief without the
//! proof carrying the index. All challenges are derived through a merlin transcript.
//!
//! The caller supplies the 32-byte nonce and must keep it unique per issuance; nothing here
//! enforces uniqueness.

pub mod candidate;
pub mod commitment;
pub mod error;
pub mod hashing;
pub mod iarp;
pub mod issuance_proof;
pub mod serde_utils;
pub mod setup;
pub mod transcript;

pub mod prelude {
    pub use crate::{
        candidate::{AssetId, AssetIssuanceCandidate, IssuanceCandidate},
        commitment::{AssetBlinding, AssetCommitment},
        error::IssuanceError,
        iarp::ConfidentialIarp,
        issuance_proof::IssuanceProof,
        setup::IssuanceParams,
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! test_serialization {
    ($obj_type:ty, $obj: ident) => {
        let mut serz = vec![];
        ark_serialize::CanonicalSerialize::serialize_compressed(&$obj, &mut serz).unwrap();
        let deserz: $obj_type =
            ark_serialize::CanonicalDeserialize::deserialize_compressed(&serz[..]).unwrap();
        assert_eq!(deserz, $obj);

        let mut serz = vec![];
        $obj.serialize_uncompressed(&mut serz).unwrap();
        let deserz: $obj_type =
            ark_serialize::CanonicalDeserialize::deserialize_uncompressed(&serz[..]).unwrap();
        assert_eq!(deserz, $obj);

        // Test JSON serialization with serde
        let obj_ser = serde_json::to_string(&$obj).unwrap();
        let obj_deser = serde_json::from_str::<$obj_type>(&obj_ser).unwrap();
        assert_eq!($obj, obj_deser);

        // Test Message Pack serialization
        let ser = rmp_serde::to_vec_named(&$obj).unwrap();
        let deser = rmp_serde::from_slice::<$obj_type>(&ser).unwrap();
        assert_eq!($obj, deser);
    };
}
