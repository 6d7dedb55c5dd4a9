//! Ring proof of knowledge of the private key behind one of the candidates' issuance public
//! keys, coupled to a [`ConfidentialIarp`] through a shared transcript.
//!
//! The proof carries two challenge/response legs `(e1, s1)` and `(e2, s2)`, each a compressed
//! hash-chain ring over the issuance keys: the responses at non-secret indices are re-derived
//! from the transcript by both sides, so only the starting challenge and the secret slot's
//! response travel on the wire and the proof stays four fixed-width scalars for any anonymity
//! set size. The transcript absorbs the commitment, the serialized IARP, the candidate list,
//! the message and the nonce; the second leg additionally absorbs the first leg, so legs of
//! proofs built for different contexts cannot be recombined.
//!
//! Verification finds the unique index at which both chains close. That index never appears in
//! the proof bytes; a verifier holding an out-of-band claim about which candidate was issued
//! supplies it and learns whether it matches.

use crate::{
    candidate::AssetIssuanceCandidate,
    commitment::AssetCommitment,
    error::IssuanceError,
    iarp::{chain_challenge, ConfidentialIarp},
    serde_utils::ArkObjectBytes,
    setup::IssuanceParams,
    transcript::{new_merlin_transcript, Transcript},
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec, vec::Vec, UniformRand};
use digest::Digest;
use merlin::Transcript as Merlin;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Labels separating the two legs in the transcript
const ASSET_LEG: &[u8] = b"asset-leg";
const KEY_LEG: &[u8] = b"key-leg";

/// Proof of knowledge of one of the candidates' issuance private keys, bound to an asset
/// commitment, an IARP, a message and a nonce. Serializes as four fixed-width scalars
/// `(e1, s1, e2, s2)`; flipping any bit of any field invalidates the proof.
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct IssuanceProof<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub e1: G::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s1: G::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub e2: G::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s2: G::ScalarField,
}

impl<G: AffineRepr> IssuanceProof<G> {
    /// Create the proof. The secret index is located by matching `key_base * secret_key`
    /// against the candidates' issuance keys; a key not in the candidate list is caller misuse
    /// and an explicit error. Secrets inconsistent with `commitment` or `iarp` are not detected
    /// here and yield a proof that fails verification.
    pub fn new<R: RngCore, D: Digest, C: AssetIssuanceCandidate<G>>(
        rng: &mut R,
        commitment: &AssetCommitment<G>,
        iarp: &ConfidentialIarp<G>,
        candidates: &[C],
        msg: &[u8],
        nonce: &[u8; 32],
        secret_key: &G::ScalarField,
        params: &IssuanceParams<G>,
    ) -> Result<Self, IssuanceError> {
        if candidates.is_empty() {
            return Err(IssuanceError::NoCandidates);
        }
        let keys = issuance_keys(candidates);
        let public_key = (params.key_base * secret_key).into_affine();
        let secret_index = keys
            .iter()
            .position(|key| *key == public_key)
            .ok_or(IssuanceError::SecretKeyNotInCandidates)?;

        let transcript = seeded_transcript(commitment, iarp, candidates, msg, nonce, params);
        let (e1, s1) = prove_leg(
            rng,
            &transcript,
            ASSET_LEG,
            &keys,
            secret_index,
            secret_key,
            &params.key_base,
        );
        let mut transcript = transcript;
        transcript.append(b"asset-leg-challenge", &e1);
        transcript.append(b"asset-leg-response", &s1);
        let (e2, s2) = prove_leg(
            rng,
            &transcript,
            KEY_LEG,
            &keys,
            secret_index,
            secret_key,
            &params.key_base,
        );
        Ok(Self { e1, s1, e2, s2 })
    }

    /// Check the proof against the exact context it was created for and a claimed secret index.
    /// Returns `(valid, index_matches)`: `valid` iff the IARP ring and both legs close at one
    /// common index; `index_matches` iff additionally that index is `claimed_index`. A wrong
    /// claim leaves `valid` untouched. Pure predicate over its inputs, never an error.
    pub fn validate<D: Digest, C: AssetIssuanceCandidate<G>>(
        &self,
        commitment: &AssetCommitment<G>,
        iarp: &ConfidentialIarp<G>,
        candidates: &[C],
        msg: &[u8],
        nonce: &[u8; 32],
        claimed_index: usize,
        params: &IssuanceParams<G>,
    ) -> (bool, bool) {
        if candidates.is_empty() || iarp.responses.len() != candidates.len() {
            return (false, false);
        }
        let iarp_valid = iarp.verify::<D, C>(commitment, candidates, nonce, msg, params);

        let keys = issuance_keys(candidates);
        let transcript = seeded_transcript(commitment, iarp, candidates, msg, nonce, params);
        let asset_leg_index =
            recover_leg_index(&transcript, ASSET_LEG, &keys, &self.e1, &self.s1, &params.key_base);
        let mut transcript = transcript;
        transcript.append(b"asset-leg-challenge", &self.e1);
        transcript.append(b"asset-leg-response", &self.s1);
        let key_leg_index =
            recover_leg_index(&transcript, KEY_LEG, &keys, &self.e2, &self.s2, &params.key_base);

        let rings_close = match (asset_leg_index, key_leg_index) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        let valid = iarp_valid && rings_close;
        let index_matches = valid && asset_leg_index == Some(claimed_index);
        (valid, index_matches)
    }
}

fn issuance_keys<G: AffineRepr, C: AssetIssuanceCandidate<G>>(candidates: &[C]) -> Vec<G> {
    candidates.iter().map(|c| *c.issuance_key()).collect()
}

/// Transcript seeded with the full shared context of both legs
fn seeded_transcript<G: AffineRepr, C: AssetIssuanceCandidate<G>>(
    commitment: &AssetCommitment<G>,
    iarp: &ConfidentialIarp<G>,
    candidates: &[C],
    msg: &[u8],
    nonce: &[u8; 32],
    params: &IssuanceParams<G>,
) -> Merlin {
    let mut transcript = new_merlin_transcript(b"confidential-issuance : issuance-proof");
    transcript.append(b"asset-base", &params.asset_base);
    transcript.append(b"key-base", &params.key_base);
    transcript.append(b"commitment", &commitment.0);
    transcript.append(b"iarp", iarp);
    transcript.append_message(b"msg", msg);
    transcript.append_message(b"nonce", nonce);
    for candidate in candidates {
        transcript.append_message(b"candidate-asset-id", &candidate.asset_id().0);
        transcript.append(b"candidate-issuance-key", candidate.issuance_key());
    }
    transcript
}

/// Response at a non-secret index, re-derivable by the verifier
fn derived_response<G: AffineRepr>(
    seeded: &Merlin,
    leg: &'static [u8],
    index: usize,
) -> G::ScalarField {
    let mut transcript = seeded.clone();
    transcript.append_message(b"leg", leg);
    transcript.append_message(b"response-index", &(index as u64).to_be_bytes());
    transcript.challenge_scalar(b"derived-response")
}

/// Challenge at `index` of one leg's hash chain
fn leg_challenge<G: AffineRepr>(
    seeded: &Merlin,
    leg: &'static [u8],
    index: usize,
    r: &G::Group,
) -> G::ScalarField {
    let mut transcript = seeded.clone();
    transcript.append_message(b"leg", leg);
    chain_challenge::<G>(&transcript, index, r)
}

/// Close one leg's ring at `secret_index`, returning `(e, s)`: the chain's challenge at index
/// 0 and the response of the secret slot. All other responses are transcript-derived.
fn prove_leg<R: RngCore, G: AffineRepr>(
    rng: &mut R,
    seeded: &Merlin,
    leg: &'static [u8],
    keys: &[G],
    secret_index: usize,
    secret_key: &G::ScalarField,
    key_base: &G,
) -> (G::ScalarField, G::ScalarField) {
    let n = keys.len();
    let mut challenges = vec![G::ScalarField::zero(); n];
    let k = G::ScalarField::rand(rng);
    challenges[(secret_index + 1) % n] =
        leg_challenge::<G>(seeded, leg, (secret_index + 1) % n, &(*key_base * k));
    for step in 1..n {
        let i = (secret_index + step) % n;
        let s = derived_response::<G>(seeded, leg, i);
        let r = *key_base * s - keys[i].into_group() * challenges[i];
        challenges[(i + 1) % n] = leg_challenge::<G>(seeded, leg, (i + 1) % n, &r);
    }
    let s = k + challenges[secret_index] * secret_key;
    (challenges[0], s)
}

/// Walk one leg's chain under every index hypothesis and return the unique index at which it
/// closes, if any
fn recover_leg_index<G: AffineRepr>(
    seeded: &Merlin,
    leg: &'static [u8],
    keys: &[G],
    challenge: &G::ScalarField,
    response: &G::ScalarField,
    key_base: &G,
) -> Option<usize> {
    let n = keys.len();
    let derived = (0..n)
        .map(|i| derived_response::<G>(seeded, leg, i))
        .collect::<Vec<_>>();
    (0..n).find(|&hypothesis| {
        let mut e = *challenge;
        for i in 0..n {
            let s = if i == hypothesis { *response } else { derived[i] };
            let r = *key_base * s - keys[i].into_group() * e;
            e = leg_challenge::<G>(seeded, leg, (i + 1) % n, &r);
        }
        e == *challenge
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        candidate::{AssetId, IssuanceCandidate},
        test_serialization,
    };
    use ark_bls12_381::{Fr, G1Affine};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;

    struct Fixture {
        params: IssuanceParams<G1Affine>,
        secret_keys: Vec<Fr>,
        candidates: Vec<IssuanceCandidate<G1Affine>>,
    }

    fn setup(rng: &mut StdRng, n: usize) -> Fixture {
        let params = IssuanceParams::<G1Affine>::new::<Blake2b512>(b"test-issuance-proof");
        let secret_keys = (0..n).map(|_| Fr::rand(rng)).collect::<Vec<_>>();
        let candidates = secret_keys
            .iter()
            .enumerate()
            .map(|(i, y)| {
                let mut id = AssetId::default();
                id.0[0] = 20 + i as u8;
                IssuanceCandidate {
                    asset_id: id,
                    issuance_key: (params.key_base * y).into_affine(),
                }
            })
            .collect();
        Fixture {
            params,
            secret_keys,
            candidates,
        }
    }

    // Full protocol with 3 candidates and secret index 1, then every context mutation
    // checked independently
    #[test]
    fn issuance_proof_protocol() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let Fixture {
            params,
            secret_keys,
            candidates,
        } = setup(&mut rng, 3);

        let mut nonce = [0u8; 32];
        nonce[..5].copy_from_slice(b"nonce");
        let msg = b"message";
        let j = 1usize;
        let aek = b"asset encryption key";

        let (ac, blinding) =
            AssetCommitment::new::<Blake2b512>(&candidates[j].asset_id, aek, &params);
        let iarp = ConfidentialIarp::new::<_, Blake2b512, _>(
            &mut rng, &ac, &blinding, &candidates, &nonce, msg, j, &params,
        )
        .unwrap();
        let ip = IssuanceProof::new::<_, Blake2b512, _>(
            &mut rng,
            &ac,
            &iarp,
            &candidates,
            msg,
            &nonce,
            &secret_keys[j],
            &params,
        )
        .unwrap();

        let (valid, index_matches) =
            ip.validate::<Blake2b512, _>(&ac, &iarp, &candidates, msg, &nonce, j, &params);
        assert!(valid);
        assert!(index_matches);

        // Truncated message
        let (valid, index_matches) =
            ip.validate::<Blake2b512, _>(&ac, &iarp, &candidates, &msg[1..], &nonce, j, &params);
        assert!(!valid);
        assert!(!index_matches);

        // Wrong claimed index: the ring is valid regardless of the claim, only the claim
        // check fails
        let (valid, index_matches) =
            ip.validate::<Blake2b512, _>(&ac, &iarp, &candidates, msg, &nonce, 0, &params);
        assert!(valid);
        assert!(!index_matches);

        // Nonce altered by one bit
        let mut nonce2 = nonce;
        nonce2[0] ^= 1;
        let (valid, _) =
            ip.validate::<Blake2b512, _>(&ac, &iarp, &candidates, msg, &nonce2, j, &params);
        assert!(!valid);

        // Every proof field is independently forgery-sensitive
        let mut ip2 = ip.clone();
        ip2.e1 += Fr::from(1u64);
        let (valid, _) =
            ip2.validate::<Blake2b512, _>(&ac, &iarp, &candidates, msg, &nonce, j, &params);
        assert!(!valid);
        let mut ip2 = ip.clone();
        ip2.s1 += Fr::from(1u64);
        let (valid, _) =
            ip2.validate::<Blake2b512, _>(&ac, &iarp, &candidates, msg, &nonce, j, &params);
        assert!(!valid);
        let mut ip2 = ip.clone();
        ip2.e2 += Fr::from(1u64);
        let (valid, _) =
            ip2.validate::<Blake2b512, _>(&ac, &iarp, &candidates, msg, &nonce, j, &params);
        assert!(!valid);
        let mut ip2 = ip.clone();
        ip2.s2 += Fr::from(1u64);
        let (valid, _) =
            ip2.validate::<Blake2b512, _>(&ac, &iarp, &candidates, msg, &nonce, j, &params);
        assert!(!valid);

        test_serialization!(IssuanceProof<G1Affine>, ip);
    }

    #[test]
    fn issuance_proof_bit_flip_in_serialized_form() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let Fixture {
            params,
            secret_keys,
            candidates,
        } = setup(&mut rng, 3);
        let nonce = [7u8; 32];
        let msg = b"message";
        let j = 2usize;
        let (ac, blinding) =
            AssetCommitment::new::<Blake2b512>(&candidates[j].asset_id, b"aek", &params);
        let iarp = ConfidentialIarp::new::<_, Blake2b512, _>(
            &mut rng, &ac, &blinding, &candidates, &nonce, msg, j, &params,
        )
        .unwrap();
        let ip = IssuanceProof::new::<_, Blake2b512, _>(
            &mut rng,
            &ac,
            &iarp,
            &candidates,
            msg,
            &nonce,
            &secret_keys[j],
            &params,
        )
        .unwrap();

        // Flip one bit in each scalar's byte range of the wire form; proofs that still
        // deserialize must fail validation
        let mut bytes = vec![];
        ip.serialize_compressed(&mut bytes).unwrap();
        let field_width = bytes.len() / 4;
        for field in 0..4 {
            let mut tampered_bytes = bytes.clone();
            tampered_bytes[field * field_width] ^= 1;
            if let Ok(tampered) =
                IssuanceProof::<G1Affine>::deserialize_compressed(&tampered_bytes[..])
            {
                let (valid, _) = tampered
                    .validate::<Blake2b512, _>(&ac, &iarp, &candidates, msg, &nonce, j, &params);
                assert!(!valid);
            }
        }
    }

    #[test]
    fn issuance_proof_single_candidate() {
        let mut rng = StdRng::seed_from_u64(4u64);
        let Fixture {
            params,
            secret_keys,
            candidates,
        } = setup(&mut rng, 1);
        let nonce = [9u8; 32];
        let msg = b"single";
        let (ac, blinding) =
            AssetCommitment::new::<Blake2b512>(&candidates[0].asset_id, b"aek", &params);
        let iarp = ConfidentialIarp::new::<_, Blake2b512, _>(
            &mut rng, &ac, &blinding, &candidates, &nonce, msg, 0, &params,
        )
        .unwrap();
        let ip = IssuanceProof::new::<_, Blake2b512, _>(
            &mut rng,
            &ac,
            &iarp,
            &candidates,
            msg,
            &nonce,
            &secret_keys[0],
            &params,
        )
        .unwrap();
        let (valid, index_matches) =
            ip.validate::<Blake2b512, _>(&ac, &iarp, &candidates, msg, &nonce, 0, &params);
        assert!(valid);
        assert!(index_matches);
    }

    #[test]
    fn issuance_proof_any_secret_index() {
        let mut rng = StdRng::seed_from_u64(5u64);
        let n = 5;
        let Fixture {
            params,
            secret_keys,
            candidates,
        } = setup(&mut rng, n);
        let nonce = [11u8; 32];
        let msg = b"message";
        for j in 0..n {
            let (ac, blinding) =
                AssetCommitment::new::<Blake2b512>(&candidates[j].asset_id, b"aek", &params);
            let iarp = ConfidentialIarp::new::<_, Blake2b512, _>(
                &mut rng, &ac, &blinding, &candidates, &nonce, msg, j, &params,
            )
            .unwrap();
            let ip = IssuanceProof::new::<_, Blake2b512, _>(
                &mut rng,
                &ac,
                &iarp,
                &candidates,
                msg,
                &nonce,
                &secret_keys[j],
                &params,
            )
            .unwrap();
            for claim in 0..n {
                let (valid, index_matches) = ip.validate::<Blake2b512, _>(
                    &ac,
                    &iarp,
                    &candidates,
                    msg,
                    &nonce,
                    claim,
                    &params,
                );
                assert!(valid);
                assert_eq!(index_matches, claim == j);
            }
        }
    }

    #[test]
    fn issuance_proof_leg_recombination() {
        // Legs taken from proofs for two different contexts can't be mixed
        let mut rng = StdRng::seed_from_u64(6u64);
        let Fixture {
            params,
            secret_keys,
            candidates,
        } = setup(&mut rng, 3);
        let nonce = [13u8; 32];
        let j = 1usize;
        let (ac, blinding) =
            AssetCommitment::new::<Blake2b512>(&candidates[j].asset_id, b"aek", &params);

        let mut prove = |msg: &[u8]| {
            let iarp = ConfidentialIarp::new::<_, Blake2b512, _>(
                &mut rng, &ac, &blinding, &candidates, &nonce, msg, j, &params,
            )
            .unwrap();
            let ip = IssuanceProof::new::<_, Blake2b512, _>(
                &mut rng,
                &ac,
                &iarp,
                &candidates,
                msg,
                &nonce,
                &secret_keys[j],
                &params,
            )
            .unwrap();
            (iarp, ip)
        };
        let (iarp_a, ip_a) = prove(b"message a");
        let (_iarp_b, ip_b) = prove(b"message b");

        let mixed = IssuanceProof {
            e1: ip_a.e1,
            s1: ip_a.s1,
            e2: ip_b.e2,
            s2: ip_b.s2,
        };
        let (valid, _) = mixed.validate::<Blake2b512, _>(
            &ac,
            &iarp_a,
            &candidates,
            b"message a",
            &nonce,
            j,
            &params,
        );
        assert!(!valid);
    }

    #[test]
    fn issuance_proof_caller_misuse() {
        let mut rng = StdRng::seed_from_u64(7u64);
        let Fixture {
            params,
            secret_keys: _,
            candidates,
        } = setup(&mut rng, 3);
        let nonce = [15u8; 32];
        let msg = b"message";
        let (ac, blinding) =
            AssetCommitment::new::<Blake2b512>(&candidates[1].asset_id, b"aek", &params);
        let iarp = ConfidentialIarp::new::<_, Blake2b512, _>(
            &mut rng, &ac, &blinding, &candidates, &nonce, msg, 1, &params,
        )
        .unwrap();

        // A secret key whose public key is not in the candidate list
        let stranger = Fr::rand(&mut rng);
        assert!(matches!(
            IssuanceProof::new::<_, Blake2b512, _>(
                &mut rng,
                &ac,
                &iarp,
                &candidates,
                msg,
                &nonce,
                &stranger,
                &params,
            ),
            Err(IssuanceError::SecretKeyNotInCandidates)
        ));
        assert!(matches!(
            IssuanceProof::new::<_, Blake2b512, _>(
                &mut rng,
                &ac,
                &iarp,
                &candidates[..0],
                msg,
                &nonce,
                &stranger,
                &params,
            ),
            Err(IssuanceError::NoCandidates)
        ));
    }
}
