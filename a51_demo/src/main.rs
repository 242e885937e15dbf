use a51_core::{
    BURST_KEYSTREAM_BYTES, CipherSession, GSM_BURST_BITS, HexCodec, KeyByteOrder,
    KeystreamVector, parse_frame,
};
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{LevelFilter, debug};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "a51",
    author,
    version,
    about = "A5/1 keystream generator (educational, not secure)"
)]
struct Cli {
    #[arg(long, global = true)]
    debug: bool,
    /// How the 8 key bytes are packed into the 64-bit key value.
    #[arg(long, global = true, value_enum, default_value = "little-endian")]
    key_order: KeyOrderArg,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyOrderArg {
    LittleEndian,
    BigEndian,
}

impl From<KeyOrderArg> for KeyByteOrder {
    fn from(arg: KeyOrderArg) -> Self {
        match arg {
            KeyOrderArg::LittleEndian => KeyByteOrder::LittleEndian,
            KeyOrderArg::BigEndian => KeyByteOrder::BigEndian,
        }
    }
}

#[derive(Args)]
struct KeyArgs {
    /// Key material, at least 16 hex digits (64 bits).
    #[arg(long, value_name = "HEX")]
    key: String,
    /// Frame number; only the low 22 bits are used.
    #[arg(long, value_name = "N", default_value = "0")]
    frame: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print keystream bytes as hex.
    Keystream {
        #[command(flatten)]
        keys: KeyArgs,
        #[arg(long, value_name = "N", default_value_t = BURST_KEYSTREAM_BYTES)]
        bytes: usize,
    },
    /// Print keystream bits as a 0/1 string.
    Bits {
        #[command(flatten)]
        keys: KeyArgs,
        #[arg(long, value_name = "N", default_value_t = GSM_BURST_BITS)]
        count: usize,
    },
    /// XOR text or a file with the keystream and print the result as hex.
    Encrypt {
        #[command(flatten)]
        keys: KeyArgs,
        #[arg(long, value_name = "TEXT")]
        message: Option<String>,
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// XOR hex ciphertext with the keystream.
    Decrypt {
        #[command(flatten)]
        keys: KeyArgs,
        #[arg(long, value_name = "HEX")]
        cipher: String,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Stream a file through the keystream (encrypts and decrypts).
    EncryptFile {
        #[command(flatten)]
        keys: KeyArgs,
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Emit a JSON keystream vector.
    Vector {
        #[command(flatten)]
        keys: KeyArgs,
        #[arg(long, value_name = "N", default_value_t = BURST_KEYSTREAM_BYTES)]
        bytes: usize,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Check a JSON keystream vector against the engine.
    Verify {
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let order: KeyByteOrder = cli.key_order.into();
    match cli.command {
        Commands::Keystream { keys, bytes } => cmd_keystream(&keys, order, bytes),
        Commands::Bits { keys, count } => cmd_bits(&keys, order, count),
        Commands::Encrypt {
            keys,
            message,
            input,
        } => cmd_encrypt(&keys, order, message, input),
        Commands::Decrypt { keys, cipher, out } => cmd_decrypt(&keys, order, &cipher, out),
        Commands::EncryptFile { keys, input, out } => cmd_encrypt_file(&keys, order, &input, &out),
        Commands::Vector { keys, bytes, out } => cmd_vector(&keys, order, bytes, out),
        Commands::Verify { file } => cmd_verify(&file),
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn ready_session(keys: &KeyArgs, order: KeyByteOrder) -> Result<CipherSession> {
    let mut session = CipherSession::new(order);
    session
        .initialize(&keys.key, &keys.frame)
        .context("initializing keystream engine")?;
    Ok(session)
}

fn cmd_keystream(keys: &KeyArgs, order: KeyByteOrder, bytes: usize) -> Result<()> {
    let mut session = ready_session(keys, order)?;
    println!("{}", session.keystream_hex(bytes));
    debug!("keystream cmd bytes={} bits={}", bytes, bytes * 8);
    Ok(())
}

fn cmd_bits(keys: &KeyArgs, order: KeyByteOrder, count: usize) -> Result<()> {
    let mut session = ready_session(keys, order)?;
    println!("{}", render_bits(&session.keystream_bits(count)));
    Ok(())
}

fn cmd_encrypt(
    keys: &KeyArgs,
    order: KeyByteOrder,
    message: Option<String>,
    input: Option<PathBuf>,
) -> Result<()> {
    let plaintext = resolve_plaintext(message, input)?;
    let mut session = ready_session(keys, order)?;
    let ciphertext = session.encrypt_bytes(&plaintext);
    println!("{}", HexCodec::encode(ciphertext));
    debug!("encrypt cmd plaintext_len={}", plaintext.len());
    Ok(())
}

fn cmd_decrypt(
    keys: &KeyArgs,
    order: KeyByteOrder,
    cipher: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    let mut session = ready_session(keys, order)?;
    let plaintext = session
        .xor_hex(cipher)
        .context("parsing hex ciphertext")?;
    match out {
        Some(path) => {
            fs::write(&path, &plaintext)
                .with_context(|| format!("writing plaintext to {}", path.display()))?;
            println!(
                "Recovered {} bytes and wrote them to {}",
                plaintext.len(),
                path.display()
            );
        }
        None => println!("{}", String::from_utf8_lossy(&plaintext)),
    }
    Ok(())
}

fn cmd_encrypt_file(keys: &KeyArgs, order: KeyByteOrder, input: &Path, out: &Path) -> Result<()> {
    let mut session = ready_session(keys, order)?;
    let total = session
        .encrypt_file(input, out)
        .with_context(|| format!("processing {} into {}", input.display(), out.display()))?;
    println!("Processed {} bytes into {}", total, out.display());
    Ok(())
}

fn cmd_vector(
    keys: &KeyArgs,
    order: KeyByteOrder,
    bytes: usize,
    out: Option<PathBuf>,
) -> Result<()> {
    let json = vector_json(keys, order, bytes)?;
    match out {
        Some(path) => {
            fs::write(&path, &json)
                .with_context(|| format!("writing vector to {}", path.display()))?;
            println!("Wrote keystream vector to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_verify(path: &Path) -> Result<()> {
    let vector = load_vector(path)?;
    vector
        .verify()
        .with_context(|| format!("verifying {}", path.display()))?;
    println!(
        "Vector {} (frame {}) matches the engine",
        path.display(),
        vector.frame
    );
    Ok(())
}

fn vector_json(keys: &KeyArgs, order: KeyByteOrder, bytes: usize) -> Result<String> {
    let frame = parse_frame(&keys.frame)?;
    let vector = KeystreamVector::generate(&keys.key, frame, order, bytes)?;
    Ok(vector.to_json_pretty()?)
}

fn load_vector(path: &Path) -> Result<KeystreamVector> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading vector from {}", path.display()))?;
    let vector: KeystreamVector = serde_json::from_str(&data)
        .with_context(|| format!("parsing vector from {}", path.display()))?;
    Ok(vector)
}

fn resolve_plaintext(message: Option<String>, input: Option<PathBuf>) -> Result<Vec<u8>> {
    match (message, input) {
        (Some(text), None) => Ok(text.into_bytes()),
        (None, Some(path)) => {
            fs::read(&path).with_context(|| format!("reading plaintext from {}", path.display()))
        }
        (Some(_), Some(_)) => bail!("Provide either --message or --input, not both."),
        (None, None) => bail!("Provide --message TEXT or --input FILE for data to encrypt."),
    }
}

fn render_bits(bits: &[bool]) -> String {
    bits.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::NamedTempFile;

    fn reference_keys() -> KeyArgs {
        KeyArgs {
            key: "0123456789ABCDEF".into(),
            frame: "0".into(),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_follow_burst_layout() {
        let cli = Cli::parse_from(["a51", "keystream", "--key", "0123456789ABCDEF"]);
        assert!(matches!(cli.key_order, KeyOrderArg::LittleEndian));
        match cli.command {
            Commands::Keystream { keys, bytes } => {
                assert_eq!(bytes, 15);
                assert_eq!(keys.frame, "0");
            }
            _ => panic!("expected keystream command"),
        }
    }

    #[test]
    fn big_endian_flag_is_global() {
        let cli = Cli::parse_from([
            "a51",
            "bits",
            "--key",
            "0123456789ABCDEF",
            "--key-order",
            "big-endian",
        ]);
        assert!(matches!(cli.key_order, KeyOrderArg::BigEndian));
    }

    #[test]
    fn render_bits_is_msb_first_text() {
        let mut session = ready_session(&reference_keys(), KeyByteOrder::LittleEndian).unwrap();
        assert_eq!(render_bits(&session.keystream_bits(16)), "1101101010011011");
    }

    #[test]
    fn plaintext_sources_are_exclusive() {
        assert_eq!(
            resolve_plaintext(Some("hi".into()), None).unwrap(),
            b"hi".to_vec()
        );
        assert!(resolve_plaintext(None, None).is_err());
        assert!(resolve_plaintext(Some("hi".into()), Some(PathBuf::from("x"))).is_err());
    }

    #[test]
    fn bad_key_is_reported_with_context() {
        let keys = KeyArgs {
            key: "0123".into(),
            frame: "0".into(),
        };
        let err = ready_session(&keys, KeyByteOrder::LittleEndian).unwrap_err();
        assert!(format!("{err:#}").contains("at least 16 hex digits"));
    }

    #[test]
    fn written_vector_verifies() {
        let file = NamedTempFile::new().unwrap();
        let json = vector_json(&reference_keys(), KeyByteOrder::LittleEndian, 15).unwrap();
        fs::write(file.path(), json).unwrap();
        let vector = load_vector(file.path()).unwrap();
        assert_eq!(vector.keystream_hex, "DA9B5622C57E795DCE8A9880531101");
        cmd_verify(file.path()).unwrap();
    }
}
