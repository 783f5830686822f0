//! End-to-end ML-DSA coverage: sign/verify round trips and the two
//! unforgeability-relevant negative cases (flipped signature bit, flipped
//! public key bit), across every linked parameter set.

#![cfg(feature = "dilithium")]

use pqc_core::traits::{Sign, SerDes, Verify};

#[cfg(feature = "ml-dsa-44")]
mod ml_dsa_44 {
    use super::*;
    use pqc_core::dilithium::ml_dsa_44::{Signature, VerifyingKey, KG};

    #[test]
    fn round_trip() {
        let (vk, sk) = KG::try_keygen().expect("keygen succeeds");
        let sig = sk.sign_deterministic(b"hello, post-quantum world", b"").expect("signing succeeds");
        assert!(vk.verify(b"hello, post-quantum world", &sig, b""));
    }

    #[test]
    fn rejects_wrong_message() {
        let (vk, sk) = KG::try_keygen().expect("keygen succeeds");
        let sig = sk.sign_deterministic(b"original", b"").expect("signing succeeds");
        assert!(!vk.verify(b"tampered", &sig, b""));
    }

    #[test]
    fn rejects_flipped_signature_bit() {
        let (vk, sk) = KG::try_keygen().expect("keygen succeeds");
        let sig = sk.sign_deterministic(b"sign this message", b"").expect("signing succeeds");
        let mut bytes = sig.into_bytes();
        bytes[32] ^= 1;
        let sig = Signature::try_from_bytes(bytes).expect("signature length unchanged");
        assert!(!vk.verify(b"sign this message", &sig, b""));
    }

    #[test]
    fn rejects_flipped_public_key_bit() {
        let (vk, sk) = KG::try_keygen().expect("keygen succeeds");
        let sig = sk.sign_deterministic(b"sign this message", b"").expect("signing succeeds");
        let mut vk_bytes = vk.into_bytes();
        vk_bytes[0] ^= 1;
        let vk = VerifyingKey::try_from_bytes(vk_bytes).expect("key length unchanged");
        assert!(!vk.verify(b"sign this message", &sig, b""));
    }

    #[test]
    fn rejects_context_too_long() {
        let (_vk, sk) = KG::try_keygen().expect("keygen succeeds");
        let long_context = [0u8; 256];
        assert!(sk.sign_deterministic(b"msg", &long_context).is_err());
    }

    #[test]
    fn keygen_from_seed_is_deterministic() {
        let seed = [17u8; 32];
        let (vk1, sk1) = KG::keygen_from_seed(&seed);
        let (vk2, sk2) = KG::keygen_from_seed(&seed);
        assert_eq!(vk1.into_bytes(), vk2.into_bytes());
        assert_eq!(sk1.into_bytes(), sk2.into_bytes());
    }

    #[test]
    fn sign_from_seed_is_deterministic_and_verifies() {
        let (vk, sk) = KG::try_keygen().expect("keygen succeeds");
        let seed = [23u8; 32];
        let sig1 = sk.sign_from_seed(b"seeded signature", b"", &seed).expect("signing succeeds");
        let sig2 = sk.sign_from_seed(b"seeded signature", b"", &seed).expect("signing succeeds");
        assert_eq!(sig1.clone().into_bytes(), sig2.into_bytes());
        assert!(vk.verify(b"seeded signature", &sig1, b""));
    }

    #[test]
    fn validate_keypair_accepts_matching_pair_and_rejects_mismatched() {
        let (vk1, sk1) = KG::try_keygen().expect("keygen succeeds");
        let (vk2, _sk2) = KG::try_keygen().expect("keygen succeeds");
        assert!(KG::validate_keypair(&vk1, &sk1));
        assert!(!KG::validate_keypair(&vk2, &sk1));
    }
}

#[cfg(feature = "ml-dsa-65")]
mod ml_dsa_65 {
    use super::*;
    use pqc_core::dilithium::ml_dsa_65::{Signature, KG};

    #[test]
    fn round_trip() {
        let (vk, sk) = KG::try_keygen().expect("keygen succeeds");
        let sig = sk.sign_deterministic(b"category 3 message", b"ctx").expect("signing succeeds");
        assert!(vk.verify(b"category 3 message", &sig, b"ctx"));
    }

    #[test]
    fn rejects_mismatched_context() {
        let (vk, sk) = KG::try_keygen().expect("keygen succeeds");
        let sig = sk.sign_deterministic(b"bound to alpha", b"alpha").expect("signing succeeds");
        assert!(!vk.verify(b"bound to alpha", &sig, b"beta"));
    }

    #[test]
    fn rejects_flipped_signature_bit() {
        let (vk, sk) = KG::try_keygen().expect("keygen succeeds");
        let sig = sk.sign_deterministic(b"sign this message", b"").expect("signing succeeds");
        let mut bytes = sig.into_bytes();
        bytes[32] ^= 1;
        let sig = Signature::try_from_bytes(bytes).expect("signature length unchanged");
        assert!(!vk.verify(b"sign this message", &sig, b""));
    }
}

#[cfg(feature = "ml-dsa-87")]
mod ml_dsa_87 {
    use super::*;
    use pqc_core::dilithium::ml_dsa_87::KG;

    #[test]
    fn round_trip() {
        let (vk, sk) = KG::try_keygen().expect("keygen succeeds");
        let sig = sk.sign_deterministic(b"category 5 message", b"").expect("signing succeeds");
        assert!(vk.verify(b"category 5 message", &sig, b""));
    }

    #[test]
    #[cfg(feature = "default-rng")]
    fn hedged_signing_with_rng_also_verifies() {
        use pqc_core::traits::Sign;
        let (vk, sk) = KG::try_keygen().expect("keygen succeeds");
        let sig = sk.try_sign(b"hedged signature", b"").expect("signing succeeds");
        assert!(vk.verify(b"hedged signature", &sig, b""));
    }
}
