//! Thin demo CLI over `pgp-core`: generate keys, pack/unpack a secret key
//! packet under a passphrase, and pack/unpack a PKESK. Not a full OpenPGP
//! client — there's no armor, no message assembly, no keyring. It exists
//! to exercise the library end to end. All subcommands below fix the
//! public-key algorithm to X25519 to keep CLI argument plumbing small;
//! the other algorithms are reachable from `genkey` only.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pgp_core::{AlgoId, Config, Pkesk, PrivateParams, PublicParams, Recipient, SecretKeyPacket, SymAlgoId};

#[derive(Parser)]
#[command(name = "pgp-cli", about = "Demo CLI for the pgp-core dispatcher")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a keypair and print its public and (optionally locked)
    /// private parameters as hex-encoded wire fields.
    Genkey {
        #[arg(long, value_enum, default_value = "x25519")]
        algo: KeyAlgo,
        /// Protect the generated secret key under a passphrase (prompted
        /// interactively, never accepted as a bare argument).
        #[arg(long)]
        protect: bool,
    },
    /// Wrap a session key into a PKESK for an X25519 recipient and print
    /// the packet's wire bytes.
    PackPkesk {
        #[arg(long)]
        recipient_public: String,
        #[arg(long)]
        session_key: String,
        #[arg(long, value_enum, default_value = "aes256")]
        sym_algo: SymAlgoArg,
        #[arg(long, default_value_t = 6)]
        version: u8,
    },
    /// Parse a PKESK's wire bytes and recover its session key against an
    /// X25519 recipient's secret key.
    UnpackPkesk {
        #[arg(long)]
        recipient_secret: String,
        #[arg(long)]
        recipient_public: String,
        #[arg(long)]
        wire: String,
    },
    /// Protect an X25519 secret key under a passphrase and print the
    /// packet's wire bytes (everything from `s2kUsage` onward).
    PackSecretKey {
        #[arg(long)]
        secret: String,
        #[arg(long)]
        public: String,
        #[arg(long, default_value_t = 6)]
        version: u8,
        #[arg(long)]
        protect: bool,
    },
    /// Parse a secret-key packet's wire bytes and unlock it against an
    /// X25519 public key.
    UnpackSecretKey {
        #[arg(long)]
        public: String,
        #[arg(long, default_value_t = 6)]
        version: u8,
        #[arg(long)]
        wire: String,
    },
}

#[derive(Clone, clap::ValueEnum)]
enum SymAlgoArg {
    Aes128,
    Aes192,
    Aes256,
}

impl From<SymAlgoArg> for SymAlgoId {
    fn from(a: SymAlgoArg) -> Self {
        match a {
            SymAlgoArg::Aes128 => SymAlgoId::Aes128,
            SymAlgoArg::Aes192 => SymAlgoId::Aes192,
            SymAlgoArg::Aes256 => SymAlgoId::Aes256,
        }
    }
}

#[derive(Clone, clap::ValueEnum)]
enum KeyAlgo {
    X25519,
    Ed25519,
    MlkemX25519,
    MldsaEd25519,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Genkey { algo, protect } => genkey(algo, protect),
        Command::PackPkesk {
            recipient_public,
            session_key,
            sym_algo,
            version,
        } => pack_pkesk(&recipient_public, &session_key, sym_algo.into(), version),
        Command::UnpackPkesk {
            recipient_secret,
            recipient_public,
            wire,
        } => unpack_pkesk(&recipient_secret, &recipient_public, &wire),
        Command::PackSecretKey {
            secret,
            public,
            version,
            protect,
        } => pack_secret_key(&secret, &public, version, protect),
        Command::UnpackSecretKey { public, version, wire } => unpack_secret_key(&public, version, &wire),
    }
}

fn parse_hex32(label: &str, s: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(s).with_context(|| format!("{label} is not valid hex"))?;
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("{label} must be exactly 32 bytes"))
}

fn pack_pkesk(recipient_public: &str, session_key: &str, sym_algo: SymAlgoId, version: u8) -> Result<()> {
    let a = parse_hex32("recipient-public", recipient_public)?;
    let public = PublicParams::X25519 { a };
    let session_key = hex::decode(session_key).context("session-key is not valid hex")?;
    let config = Config::default();
    let recipient = if version == 3 {
        Recipient::KeyId([0u8; 8])
    } else {
        Recipient::Fingerprint {
            version: 6,
            fingerprint: vec![0u8; 32],
        }
    };
    let pkesk = pgp_core::pkesk::build_pkesk(&config, version, recipient, &public, sym_algo, &session_key)?;
    println!("{}", hex::encode(pkesk.serialize()));
    Ok(())
}

fn unpack_pkesk(recipient_secret: &str, recipient_public: &str, wire: &str) -> Result<()> {
    let k = parse_hex32("recipient-secret", recipient_secret)?;
    let a = parse_hex32("recipient-public", recipient_public)?;
    let public = PublicParams::X25519 { a };
    let private = PrivateParams::X25519 { k };

    let wire = hex::decode(wire).context("wire is not valid hex")?;
    let mut buf = bytes::Bytes::from(wire);
    let pkesk = Pkesk::parse(&mut buf)?;

    let (sym_algo, session_key) = pgp_core::pkesk::decrypt_pkesk(&pkesk, &public, &private, None)?;
    println!("sym_algo: {sym_algo:?}");
    println!("session_key: {}", hex::encode(session_key));
    Ok(())
}

fn pack_secret_key(secret: &str, public: &str, version: u8, protect: bool) -> Result<()> {
    let k = parse_hex32("secret", secret)?;
    let a = parse_hex32("public", public)?;
    let public = PublicParams::X25519 { a };
    let private = PrivateParams::X25519 { k };

    let config = Config::default();
    let passphrase = if protect {
        Some(rpassword::prompt_password("passphrase: ").context("failed to read passphrase from terminal")?)
    } else {
        None
    };
    let packet = pgp_core::secret_key::generate(
        &config,
        version,
        now_unix(),
        public,
        private,
        passphrase.as_deref().map(str::as_bytes),
    )?;
    println!("created: {}", packet.created);
    println!("{}", hex::encode(packet.serialize()));
    Ok(())
}

fn unpack_secret_key(public: &str, version: u8, wire: &str) -> Result<()> {
    let a = parse_hex32("public", public)?;
    let public = PublicParams::X25519 { a };
    let wire = hex::decode(wire).context("wire is not valid hex")?;
    let mut buf = bytes::Bytes::from(wire);
    let config = Config::default();
    let packet = SecretKeyPacket::parse(&mut buf, &config, AlgoId::X25519, public, version, now_unix())?;
    print_locked(&packet);

    let passphrase = rpassword::prompt_password("passphrase (blank if unprotected): ")
        .context("failed to read passphrase from terminal")?;
    match packet.unlock(passphrase.as_bytes())? {
        Some(private) => print_private(&private),
        None => println!("  (private fields not recognized by this build; material preserved verbatim)"),
    }
    Ok(())
}

fn genkey(algo: KeyAlgo, protect: bool) -> Result<()> {
    let (public, private) = match algo {
        KeyAlgo::X25519 => pgp_core::adapters::x25519::generate(),
        KeyAlgo::Ed25519 => pgp_core::adapters::ed25519::generate(),
        KeyAlgo::MlkemX25519 => pgp_core::pqc::kem::generate(),
        KeyAlgo::MldsaEd25519 => pgp_core::pqc::dsa::generate(),
    };

    println!("algorithm: {:?}", public.algo());
    print_public(&public);

    if protect {
        let passphrase = rpassword::prompt_password("passphrase: ")
            .context("failed to read passphrase from terminal")?;
        let config = Config::default();
        let packet = pgp_core::secret_key::generate(
            &config,
            6,
            now_unix(),
            public,
            private,
            Some(passphrase.as_bytes()),
        )?;
        print_locked(&packet);
    } else {
        print_private(&private);
    }
    Ok(())
}

fn print_public(public: &PublicParams) {
    match public {
        PublicParams::X25519 { a } => println!("  public a: {}", hex::encode(a)),
        PublicParams::Ed25519 { a } => println!("  public a: {}", hex::encode(a)),
        PublicParams::MlKemX25519 {
            ecc_public,
            mlkem_public,
        } => {
            println!("  ecc public: {}", hex::encode(ecc_public));
            println!("  mlkem public: {}", hex::encode(mlkem_public));
        }
        PublicParams::MlDsaEd25519 {
            ecc_public,
            mldsa_public,
        } => {
            println!("  ecc public: {}", hex::encode(ecc_public));
            println!("  mldsa public: {}", hex::encode(mldsa_public));
        }
        other => println!("  {other:?}"),
    }
}

fn print_private(private: &PrivateParams) {
    match private {
        PrivateParams::X25519 { k } => println!("  secret k: {}", hex::encode(k)),
        PrivateParams::Ed25519 { seed } => println!("  secret seed: {}", hex::encode(seed)),
        _ => println!("  (secret material omitted from unlocked printout)"),
    }
}

fn print_locked(packet: &SecretKeyPacket) {
    println!("  protection: {:?}", packet.protection);
    println!("  protected material: {}", hex::encode(&packet.protected_material));
}

fn now_unix() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_secs() as u32
}
