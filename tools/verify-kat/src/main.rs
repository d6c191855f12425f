use aes_kw::Kek;
use serde::Deserialize;
use sha3::{Digest, Sha3_256};

/// Known-answer vectors for the two primitives `pgp-core` treats as
/// load-bearing but doesn't own: AES key wrap (RFC 3394) and the
/// composite-KEM combiner hash. Neither primitive is exercised end to
/// end by the main crate's unit tests, since both sit at a seam between
/// `pgp-core` and the upstream crates it delegates to.
#[derive(Deserialize)]
struct Kat {
    aes_kw: Option<AesKwKat>,
    composite_combiner: Option<CombinerKat>,
}

#[derive(Deserialize)]
struct AesKwKat {
    kek_hex: String,
    key_data_hex: String,
    wrapped_hex: String,
}

#[derive(Deserialize)]
struct CombinerKat {
    ecc_share_hex: String,
    ecc_ct_hex: String,
    ecc_pub_hex: String,
    mlkem_share_hex: String,
    mlkem_ct_hex: String,
    mlkem_pub_hex: String,
    algo_id: u8,
    expected_hex: String,
}

const KDF_LABEL: &[u8] = b"OpenPGPCompositeKDFv1";

fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).expect("usage: verify-kat file.json");
    let data = std::fs::read_to_string(path)?;
    let kat: Kat = serde_json::from_str(&data)?;

    if let Some(v) = &kat.aes_kw {
        verify_aes_kw(v)?;
        println!("AES-KW KAT OK");
    }
    if let Some(v) = &kat.composite_combiner {
        verify_combiner(v)?;
        println!("composite combiner KAT OK");
    }
    Ok(())
}

fn verify_aes_kw(kat: &AesKwKat) -> anyhow::Result<()> {
    let kek_bytes = hex::decode(&kat.kek_hex)?;
    let key_data = hex::decode(&kat.key_data_hex)?;
    let expected = hex::decode(&kat.wrapped_hex)?;

    let kek: [u8; 16] = kek_bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow::anyhow!("this tool only checks 128-bit KEKs"))?;
    let kek = Kek::from(kek);
    let mut wrapped = vec![0u8; key_data.len() + 8];
    kek.wrap(&key_data, &mut wrapped)
        .map_err(|_| anyhow::anyhow!("wrap failed"))?;

    anyhow::ensure!(wrapped == expected, "AES-KW mismatch");
    Ok(())
}

fn verify_combiner(kat: &CombinerKat) -> anyhow::Result<()> {
    let mut hasher = Sha3_256::new();
    hasher.update([0u8, 0, 0, 1]);
    hasher.update(hex::decode(&kat.ecc_share_hex)?);
    hasher.update(hex::decode(&kat.ecc_ct_hex)?);
    hasher.update(hex::decode(&kat.ecc_pub_hex)?);
    hasher.update(hex::decode(&kat.mlkem_share_hex)?);
    hasher.update(hex::decode(&kat.mlkem_ct_hex)?);
    hasher.update(hex::decode(&kat.mlkem_pub_hex)?);
    hasher.update([kat.algo_id]);
    hasher.update(KDF_LABEL);
    let got = hasher.finalize();

    let expected = hex::decode(&kat.expected_hex)?;
    anyhow::ensure!(got.as_slice() == expected.as_slice(), "combiner mismatch");
    Ok(())
}
