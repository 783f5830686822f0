use criterion::{criterion_group, criterion_main, Criterion};

#[cfg(feature = "kyber")]
use pqc_core::traits::{Decaps, Encaps, KeyGen};
#[cfg(feature = "dilithium")]
use pqc_core::traits::{Sign, Verify};

#[allow(clippy::redundant_closure)]
pub fn criterion_benchmark(c: &mut Criterion) {
    #[cfg(feature = "ml-kem-512")]
    {
        use pqc_core::kyber::ml_kem_512::KG;
        let (ek, dk) = KG::try_keygen().unwrap();
        let (_, ct) = ek.try_encaps().unwrap();
        c.bench_function("ml_kem_512 KeyGen", |b| b.iter(|| KG::try_keygen()));
        c.bench_function("ml_kem_512 Encaps", |b| b.iter(|| ek.try_encaps()));
        c.bench_function("ml_kem_512 Decaps", |b| b.iter(|| dk.try_decaps(&ct)));
    }

    #[cfg(feature = "ml-kem-768")]
    {
        use pqc_core::kyber::ml_kem_768::KG;
        let (ek, dk) = KG::try_keygen().unwrap();
        let (_, ct) = ek.try_encaps().unwrap();
        c.bench_function("ml_kem_768 KeyGen", |b| b.iter(|| KG::try_keygen()));
        c.bench_function("ml_kem_768 Encaps", |b| b.iter(|| ek.try_encaps()));
        c.bench_function("ml_kem_768 Decaps", |b| b.iter(|| dk.try_decaps(&ct)));
    }

    #[cfg(feature = "ml-kem-1024")]
    {
        use pqc_core::kyber::ml_kem_1024::KG;
        let (ek, dk) = KG::try_keygen().unwrap();
        let (_, ct) = ek.try_encaps().unwrap();
        c.bench_function("ml_kem_1024 KeyGen", |b| b.iter(|| KG::try_keygen()));
        c.bench_function("ml_kem_1024 Encaps", |b| b.iter(|| ek.try_encaps()));
        c.bench_function("ml_kem_1024 Decaps", |b| b.iter(|| dk.try_decaps(&ct)));
    }

    #[cfg(feature = "mceliece-348864")]
    {
        use pqc_core::mceliece::mceliece_348864::KG;
        let (ek, dk) = KG::try_keygen().unwrap();
        let (_, ct) = ek.try_encaps().unwrap();
        c.bench_function("mceliece_348864 KeyGen", |b| b.iter(|| KG::try_keygen()));
        c.bench_function("mceliece_348864 Encaps", |b| b.iter(|| ek.try_encaps()));
        c.bench_function("mceliece_348864 Decaps", |b| b.iter(|| dk.try_decaps(&ct)));
    }

    #[cfg(feature = "ml-dsa-44")]
    {
        use pqc_core::dilithium::ml_dsa_44::KG;
        let (vk, sk) = KG::try_keygen().unwrap();
        let sig = sk.sign_deterministic(b"benchmark message", b"").unwrap();
        c.bench_function("ml_dsa_44 KeyGen", |b| b.iter(|| KG::try_keygen()));
        c.bench_function("ml_dsa_44 Sign", |b| {
            b.iter(|| sk.sign_deterministic(b"benchmark message", b""))
        });
        c.bench_function("ml_dsa_44 Verify", |b| b.iter(|| vk.verify(b"benchmark message", &sig, b"")));
    }

    #[cfg(feature = "ml-dsa-65")]
    {
        use pqc_core::dilithium::ml_dsa_65::KG;
        let (vk, sk) = KG::try_keygen().unwrap();
        let sig = sk.sign_deterministic(b"benchmark message", b"").unwrap();
        c.bench_function("ml_dsa_65 KeyGen", |b| b.iter(|| KG::try_keygen()));
        c.bench_function("ml_dsa_65 Sign", |b| {
            b.iter(|| sk.sign_deterministic(b"benchmark message", b""))
        });
        c.bench_function("ml_dsa_65 Verify", |b| b.iter(|| vk.verify(b"benchmark message", &sig, b"")));
    }

    #[cfg(feature = "ml-dsa-87")]
    {
        use pqc_core::dilithium::ml_dsa_87::KG;
        let (vk, sk) = KG::try_keygen().unwrap();
        let sig = sk.sign_deterministic(b"benchmark message", b"").unwrap();
        c.bench_function("ml_dsa_87 KeyGen", |b| b.iter(|| KG::try_keygen()));
        c.bench_function("ml_dsa_87 Sign", |b| {
            b.iter(|| sk.sign_deterministic(b"benchmark message", b""))
        });
        c.bench_function("ml_dsa_87 Verify", |b| b.iter(|| vk.verify(b"benchmark message", &sig, b"")));
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
