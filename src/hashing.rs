//! Hashing to field elements and curve points, and deterministic field elements from a
//! low-entropy seed.

use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_std::{vec, vec::Vec};
use digest::Digest;
use hkdf::Hkdf;
use sha2::Sha256;

/// Concatenates supplied slices into one continuous vector.
#[macro_export]
macro_rules! concat_slices {
    ($($slice: expr),+) => {
        [$(&$slice[..]),+].concat()
    }
}

/// Hash bytes to a field element using try-and-increment. Variable time, only used on public
/// input like challenges and asset ids.
pub fn field_elem_from_try_and_incr<F: PrimeField, D: Digest>(bytes: &[u8]) -> F {
    let mut hash = D::digest(bytes);
    let mut f = F::from_random_bytes(&hash);
    let mut j = 1u64;
    while f.is_none() {
        hash = D::digest(&concat_slices![bytes, b"-attempt-", j.to_be_bytes()]);
        f = F::from_random_bytes(&hash);
        j += 1;
    }
    f.unwrap()
}

/// Hash bytes to a point on the curve using try-and-increment. Variable time, only used on
/// public input like generator labels.
pub fn affine_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(bytes: &[u8]) -> G {
    let mut hash = D::digest(bytes);
    let mut g = G::from_random_bytes(&hash);
    let mut j = 1u64;
    while g.is_none() {
        hash = D::digest(&concat_slices![bytes, b"-attempt-", j.to_be_bytes()]);
        g = G::from_random_bytes(&hash);
        j += 1;
    }
    g.unwrap().clear_cofactor()
}

/// Deterministically generate a field element from the given seed, following the key generation
/// procedure of <https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bls-signature-04#section-2.3>.
/// Lets a secret of limited entropy (like an asset encryption key) be stretched into a blinding
/// factor that is regenerable without any other source of randomness. `salt` is for domain
/// separation.
pub fn field_elem_from_seed<F: PrimeField>(ikm: &[u8], salt: &[u8]) -> F {
    // IKM || I2OSP(0, 1)
    let mut ikm_appended = ikm.to_vec();
    ikm_appended.push(0u8);

    let field_size_in_bytes = ((F::MODULUS_BIT_SIZE as usize) + 7) / 8;

    // I2OSP(L, 2) where L = ceil(3 * log_2(r) / 16)
    let l: u16 = (3 * field_size_in_bytes as u16 + 15) / 16;
    let l_as_bytes = l.to_be_bytes();

    let mut counter = 0u8;
    loop {
        let salt_hash = Sha256::digest(&concat_slices![salt, [counter]]);
        let (_, hkdf) = Hkdf::<Sha256>::extract(Some(&salt_hash), &ikm_appended);
        let mut okm = vec![0u8; field_size_in_bytes];
        // Cannot fail, `okm` is far shorter than 255 hash outputs
        hkdf.expand(&l_as_bytes, &mut okm).unwrap();
        let f = F::from_be_bytes_mod_order(&okm);
        if !f.is_zero() {
            return f;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Affine};
    use blake2::Blake2b512;

    #[test]
    fn deterministic_hashing() {
        let f1 = field_elem_from_try_and_incr::<Fr, Blake2b512>(b"some input");
        let f2 = field_elem_from_try_and_incr::<Fr, Blake2b512>(b"some input");
        let f3 = field_elem_from_try_and_incr::<Fr, Blake2b512>(b"some other input");
        assert_eq!(f1, f2);
        assert_ne!(f1, f3);

        let g1 = affine_group_elem_from_try_and_incr::<G1Affine, Blake2b512>(b"label");
        let g2 = affine_group_elem_from_try_and_incr::<G1Affine, Blake2b512>(b"label");
        assert_eq!(g1, g2);
        assert!(g1.is_on_curve());
    }

    #[test]
    fn seeded_field_elem() {
        let f1 = field_elem_from_seed::<Fr>(b"seed", b"salt");
        let f2 = field_elem_from_seed::<Fr>(b"seed", b"salt");
        assert_eq!(f1, f2);
        assert_ne!(f1, field_elem_from_seed::<Fr>(b"seed", b"salt-2"));
        assert_ne!(f1, field_elem_from_seed::<Fr>(b"seed-2", b"salt"));
    }
}
