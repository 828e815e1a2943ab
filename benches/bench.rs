use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::OsRng;

use ndn_throughput_server::data::{ContentBlock, Data, SignatureInfo, SignatureType};
use ndn_throughput_server::keymaterial::KeyMaterial;
use ndn_throughput_server::name::Name;
use ndn_throughput_server::signer::Signer;

fn build_content(size: usize) -> Arc<ContentBlock> {
    let mut rng = OsRng;
    Arc::new(ContentBlock::random(size, &mut rng))
}

fn bench_sign_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("Digest-mode signing");
    for size in [256usize, 1024, 4096, 8192].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        let signer = Signer::new(KeyMaterial::Digest);
        let content = build_content(*size);
        let info = Arc::new(SignatureInfo::digest());
        group.bench_with_input(BenchmarkId::new("sign_into", size), size, |b, _| {
            b.iter(|| {
                let mut data = Data::new(Name::from_uri("/throughput/a"), 0, content.clone(), info.clone());
                let sig = signer.sign_into(&mut data).unwrap();
                data.finish_with_signature(sig)
            })
        });
    }
    group.finish();
}

fn bench_sign_rsa(c: &mut Criterion) {
    let mut group = c.benchmark_group("RSA-2048 signing");
    let cert_name = Name::from_uri("/throughput/KEY/1/self/1");
    let signer = Signer::new(KeyMaterial::generate_rsa(2048, cert_name.clone()).unwrap());
    let info = Arc::new(SignatureInfo::asymmetric(SignatureType::RsaSha256, &cert_name));
    for size in [256usize, 1024, 4096, 8192].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        let content = build_content(*size);
        group.bench_with_input(BenchmarkId::new("sign_into", size), size, |b, _| {
            b.iter(|| {
                let mut data = Data::new(Name::from_uri("/throughput/a"), 0, content.clone(), info.clone());
                let sig = signer.sign_into(&mut data).unwrap();
                data.finish_with_signature(sig)
            })
        });
    }
    group.finish();
}

fn bench_sign_ecdsa(c: &mut Criterion) {
    let mut group = c.benchmark_group("ECDSA-P256 signing");
    let cert_name = Name::from_uri("/throughput/KEY/1/self/1");
    let signer = Signer::new(KeyMaterial::generate_ecdsa(256, cert_name.clone()).unwrap());
    let info = Arc::new(SignatureInfo::asymmetric(SignatureType::EcdsaSha256, &cert_name));
    for size in [256usize, 1024, 4096, 8192].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        let content = build_content(*size);
        group.bench_with_input(BenchmarkId::new("sign_into", size), size, |b, _| {
            b.iter(|| {
                let mut data = Data::new(Name::from_uri("/throughput/a"), 0, content.clone(), info.clone());
                let sig = signer.sign_into(&mut data).unwrap();
                data.finish_with_signature(sig)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sign_digest, bench_sign_rsa, bench_sign_ecdsa);
criterion_main!(benches);
