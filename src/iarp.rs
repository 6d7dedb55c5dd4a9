//! Confidential issuance asset-range proof (IARP): a ring proof over an anonymity set of
//! candidate asset ids showing that an [`AssetCommitment`] commits to one of them, without
//! revealing which.
//!
//! For candidates with asset id scalars `m_i`, the ring statements are
//! `P_i = commitment - asset_base * m_i`; at the real index `P_j = key_base * blinding`, so
//! knowing the blinding factor lets the prover close a hash chain of per-index challenges
//! `e_{i+1} = H(context, i+1, key_base * s_i - P_i * e_i)` around the full cycle. The proof is
//! the challenge at index 0 plus one response per candidate; verification re-walks the chain
//! and accepts iff it returns to the starting challenge.

use crate::{
    candidate::AssetIssuanceCandidate,
    commitment::{AssetBlinding, AssetCommitment},
    error::IssuanceError,
    serde_utils::ArkObjectBytes,
    setup::IssuanceParams,
    transcript::{new_merlin_transcript, Transcript},
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_into_iter, rand::RngCore, vec, vec::Vec, UniformRand};
use digest::Digest;
use merlin::Transcript as Merlin;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Ring proof that an asset commitment is to one of the candidates' asset ids. Sized by the
/// candidate count, which is not carried in the proof and must be known out-of-band.
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct ConfidentialIarp<G: AffineRepr> {
    /// Challenge of the hash chain at index 0
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: G::ScalarField,
    /// One response per candidate
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub responses: Vec<G::ScalarField>,
}

impl<G: AffineRepr> ConfidentialIarp<G> {
    /// Create the ring proof. `secret_index` is the position of the committed asset id in
    /// `candidates` and `blinding` the factor returned by [`AssetCommitment::new`]. A blinding
    /// inconsistent with the commitment is not detected here; the resulting proof simply fails
    /// verification.
    pub fn new<R: RngCore, D: Digest, C: AssetIssuanceCandidate<G>>(
        rng: &mut R,
        commitment: &AssetCommitment<G>,
        blinding: &AssetBlinding<G::ScalarField>,
        candidates: &[C],
        nonce: &[u8; 32],
        msg: &[u8],
        secret_index: usize,
        params: &IssuanceParams<G>,
    ) -> Result<Self, IssuanceError> {
        let n = candidates.len();
        if n == 0 {
            return Err(IssuanceError::NoCandidates);
        }
        if secret_index >= n {
            return Err(IssuanceError::SecretIndexOutOfBounds(secret_index, n));
        }
        let statements = ring_statements::<G, D, C>(commitment, candidates, params);
        let transcript = seeded_transcript(commitment, candidates, nonce, msg, params);

        let mut challenges = vec![G::ScalarField::zero(); n];
        let mut responses = vec![G::ScalarField::zero(); n];
        let k = G::ScalarField::rand(rng);
        challenges[(secret_index + 1) % n] =
            chain_challenge::<G>(&transcript, (secret_index + 1) % n, &(params.key_base * k));
        // Walk the remaining indices with random responses; the chain arrives back at the
        // secret index, where knowledge of the blinding factor closes it
        for step in 1..n {
            let i = (secret_index + step) % n;
            responses[i] = G::ScalarField::rand(rng);
            let r = params.key_base * responses[i] - statements[i] * challenges[i];
            challenges[(i + 1) % n] = chain_challenge::<G>(&transcript, (i + 1) % n, &r);
        }
        responses[secret_index] = k + challenges[secret_index] * blinding.0;

        Ok(Self {
            challenge: challenges[0],
            responses,
        })
    }

    /// Re-walk the hash chain over all candidates and accept iff it closes. Pure predicate,
    /// malformed input returns false.
    pub fn verify<D: Digest, C: AssetIssuanceCandidate<G>>(
        &self,
        commitment: &AssetCommitment<G>,
        candidates: &[C],
        nonce: &[u8; 32],
        msg: &[u8],
        params: &IssuanceParams<G>,
    ) -> bool {
        let n = candidates.len();
        if n == 0 || self.responses.len() != n {
            return false;
        }
        let statements = ring_statements::<G, D, C>(commitment, candidates, params);
        let transcript = seeded_transcript(commitment, candidates, nonce, msg, params);

        let mut challenge = self.challenge;
        for i in 0..n {
            let r = params.key_base * self.responses[i] - statements[i] * challenge;
            challenge = chain_challenge::<G>(&transcript, (i + 1) % n, &r);
        }
        challenge == self.challenge
    }
}

/// `P_i = commitment - asset_base * m_i`; the statement with a known discrete log wrt.
/// `key_base` at the real index
fn ring_statements<G: AffineRepr, D: Digest, C: AssetIssuanceCandidate<G>>(
    commitment: &AssetCommitment<G>,
    candidates: &[C],
    params: &IssuanceParams<G>,
) -> Vec<G::Group> {
    let asset_scalars = candidates
        .iter()
        .map(|c| c.asset_id().to_scalar::<G::ScalarField, D>())
        .collect::<Vec<_>>();
    let commitment = commitment.0.into_group();
    cfg_into_iter!(asset_scalars)
        .map(|m_i| commitment - params.asset_base * m_i)
        .collect()
}

/// Transcript seeded with the full static context of the ring
fn seeded_transcript<G: AffineRepr, C: AssetIssuanceCandidate<G>>(
    commitment: &AssetCommitment<G>,
    candidates: &[C],
    nonce: &[u8; 32],
    msg: &[u8],
    params: &IssuanceParams<G>,
) -> Merlin {
    let mut transcript = new_merlin_transcript(b"confidential-issuance : IARP");
    transcript.append(b"asset-base", &params.asset_base);
    transcript.append(b"key-base", &params.key_base);
    transcript.append(b"commitment", &commitment.0);
    transcript.append_message(b"nonce", nonce);
    transcript.append_message(b"msg", msg);
    for candidate in candidates {
        transcript.append_message(b"candidate-asset-id", &candidate.asset_id().0);
        transcript.append(b"candidate-issuance-key", candidate.issuance_key());
    }
    transcript
}

/// Challenge at `index`, bound to the full static context and the previous index's commitment
/// to randomness
pub(crate) fn chain_challenge<G: AffineRepr>(
    seeded: &Merlin,
    index: usize,
    r: &G::Group,
) -> G::ScalarField {
    let mut transcript = seeded.clone();
    transcript.append_message(b"index", &(index as u64).to_be_bytes());
    transcript.append(b"R", &r.into_affine());
    transcript.challenge_scalar(b"challenge")
}
