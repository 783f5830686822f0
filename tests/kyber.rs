//! End-to-end ML-KEM coverage: round-trip correctness and implicit rejection
//! on a tampered ciphertext, across every linked parameter set.

#![cfg(feature = "kyber")]

use pqc_core::traits::{Decaps, Encaps, KeyGen, SerDes};

#[cfg(feature = "ml-kem-512")]
mod ml_kem_512 {
    use super::*;
    use pqc_core::kyber::ml_kem_512::{CipherText, EncapsKey, KG};

    #[test]
    fn round_trip() {
        let (ek, dk) = KG::try_keygen().expect("keygen succeeds");
        let (ssk_sender, ct) = ek.try_encaps().expect("encaps succeeds");
        let ssk_receiver = dk.try_decaps(&ct).expect("decaps succeeds");
        assert_eq!(ssk_sender, ssk_receiver);
    }

    #[test]
    fn rejects_tampered_ciphertext() {
        let (ek, dk) = KG::try_keygen().expect("keygen succeeds");
        let (ssk_honest, ct) = ek.try_encaps().expect("encaps succeeds");
        let mut tampered = ct.into_bytes();
        tampered[0] ^= 1;
        let ct = CipherText::try_from_bytes(tampered).expect("ciphertext length unchanged");
        let ssk_implicit = dk.try_decaps(&ct).expect("decaps never errors (FO implicit rejection)");
        assert_ne!(ssk_honest, ssk_implicit);
    }

    #[test]
    fn encaps_key_serdes_round_trip() {
        let (ek, _dk) = KG::try_keygen().expect("keygen succeeds");
        let bytes = ek.into_bytes();
        let ek2 = EncapsKey::try_from_bytes(bytes.clone()).expect("round-trips through bytes");
        assert_eq!(ek2.into_bytes(), bytes);
    }

    #[test]
    fn keygen_from_seed_is_deterministic() {
        let d = [5u8; 32];
        let z = [9u8; 32];
        let (ek1, dk1) = KG::keygen_from_seed(&d, &z);
        let (ek2, dk2) = KG::keygen_from_seed(&d, &z);
        assert_eq!(ek1.into_bytes(), ek2.into_bytes());
        assert_eq!(dk1.into_bytes(), dk2.into_bytes());
    }
}

#[cfg(feature = "ml-kem-768")]
mod ml_kem_768 {
    use super::*;
    use pqc_core::kyber::ml_kem_768::{CipherText, KG};

    #[test]
    fn round_trip() {
        let (ek, dk) = KG::try_keygen().expect("keygen succeeds");
        let (ssk_sender, ct) = ek.try_encaps().expect("encaps succeeds");
        let ssk_receiver = dk.try_decaps(&ct).expect("decaps succeeds");
        assert_eq!(ssk_sender, ssk_receiver);
    }

    #[test]
    fn rejects_tampered_ciphertext() {
        let (ek, dk) = KG::try_keygen().expect("keygen succeeds");
        let (ssk_honest, ct) = ek.try_encaps().expect("encaps succeeds");
        let mut tampered = ct.into_bytes();
        tampered[0] ^= 1;
        let ct = CipherText::try_from_bytes(tampered).expect("ciphertext length unchanged");
        let ssk_implicit = dk.try_decaps(&ct).expect("decaps never errors (FO implicit rejection)");
        assert_ne!(ssk_honest, ssk_implicit);
    }

    #[test]
    fn validate_keypair_accepts_matching_pair() {
        use pqc_core::kyber::ml_kem_768::KG;
        use rand_core::OsRng;

        let (ek, dk) = KG::try_keygen().expect("keygen succeeds");
        let ek_bytes = ek.into_bytes();
        let dk_bytes = dk.into_bytes();
        assert!(KG::validate_keypair_with_rng_vartime(&mut OsRng, &ek_bytes, &dk_bytes));
    }
}

#[cfg(feature = "ml-kem-1024")]
mod ml_kem_1024 {
    use super::*;
    use pqc_core::kyber::ml_kem_1024::{CipherText, KG};

    #[test]
    fn round_trip() {
        let (ek, dk) = KG::try_keygen().expect("keygen succeeds");
        let (ssk_sender, ct) = ek.try_encaps().expect("encaps succeeds");
        let ssk_receiver = dk.try_decaps(&ct).expect("decaps succeeds");
        assert_eq!(ssk_sender, ssk_receiver);
    }

    #[test]
    fn rejects_tampered_ciphertext() {
        let (ek, dk) = KG::try_keygen().expect("keygen succeeds");
        let (ssk_honest, ct) = ek.try_encaps().expect("encaps succeeds");
        let mut tampered = ct.into_bytes();
        tampered[0] ^= 1;
        let ct = CipherText::try_from_bytes(tampered).expect("ciphertext length unchanged");
        let ssk_implicit = dk.try_decaps(&ct).expect("decaps never errors (FO implicit rejection)");
        assert_ne!(ssk_honest, ssk_implicit);
    }
}
