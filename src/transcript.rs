//! Fiat-Shamir transcript used to derive all ring-proof challenges.

use ark_ff::PrimeField;
use ark_serialize::CanonicalSerialize;
use ark_std::{vec, vec::Vec};
use merlin::Transcript as Merlin;

/// Label must be specific to the application.
pub fn new_merlin_transcript(label: &'static [u8]) -> Merlin {
    Merlin::new(label)
}

/// Application level transcript for deriving Fiat-Shamir challenges. Both the prover and the
/// verifier feed it the full public context in the same order, so ad hoc byte concatenation
/// never appears in the protocols. Ring proofs clone the seeded transcript to derive the
/// per-index challenges of the hash chain.
pub trait Transcript: Clone {
    fn append<S: CanonicalSerialize>(&mut self, label: &'static [u8], element: &S);
    fn append_message(&mut self, label: &'static [u8], bytes: &[u8]);
    fn challenge_scalar<F: PrimeField>(&mut self, label: &'static [u8]) -> F;
}

impl Transcript for Merlin {
    fn append<S: CanonicalSerialize>(&mut self, label: &'static [u8], element: &S) {
        let mut buff: Vec<u8> = vec![0; element.compressed_size()];
        element
            .serialize_compressed(&mut buff[..])
            .expect("serialization failed");
        self.append_message(label, &buff);
    }

    fn append_message(&mut self, label: &'static [u8], bytes: &[u8]) {
        Merlin::append_message(self, label, bytes)
    }

    fn challenge_scalar<F: PrimeField>(&mut self, label: &'static [u8]) -> F {
        // Reduce a double-width output to keep the distribution uniform
        let mut buf = [0; 64];
        self.challenge_bytes(label, &mut buf);
        F::from_be_bytes_mod_order(&buf)
    }
}
