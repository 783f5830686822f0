//! End-to-end Classic McEliece coverage. Only the smallest parameter set
//! (`mceliece-348864`) runs by default in this suite — key generation over
//! the larger fields is multiple seconds of Gaussian elimination per run,
//! so the wider parameter sets are exercised by the benchmark harness
//! instead of on every `cargo test`.

#![cfg(feature = "mceliece")]

#[cfg(feature = "mceliece-348864")]
mod mceliece_348864 {
    use pqc_core::mceliece::mceliece_348864::{CipherText, KG};
    use pqc_core::traits::{Decaps, Encaps, KeyGen, SerDes};

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
        let ssk_implicit = dk.try_decaps(&ct).expect("decaps never errors (implicit rejection)");
        assert_ne!(ssk_honest, ssk_implicit);
    }

    #[test]
    fn keygen_from_seed_is_deterministic() {
        let d = [3u8; 32];
        let (ek1, dk1) = KG::keygen_from_seed(&d, &[]);
        let (ek2, dk2) = KG::keygen_from_seed(&d, &[]);
        assert_eq!(ek1.into_bytes(), ek2.into_bytes());
        assert_eq!(dk1.into_bytes(), dk2.into_bytes());
    }

    #[test]
    fn encaps_key_rejects_wrong_length() {
        use pqc_core::mceliece::mceliece_348864::EncapsKey;

        let too_short = vec![0u8; 10];
        assert!(EncapsKey::try_from_bytes(too_short).is_err());
    }
}
