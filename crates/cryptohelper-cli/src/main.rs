//! Cryptohelper command-line binary.
//!
//! # Usage
//!
//! ```bash
//! # Digest text (or stdin when INPUT is omitted)
//! cryptohelper hash sha256 abc
//!
//! # HMAC-SHA256 under a hex key (JWT HS256)
//! cryptohelper mac hs256 --key 6b6579 payload
//!
//! # Kerberos encryption, MAC printed separately
//! cryptohelper encrypt aes256-cts-hmac-sha1-96 --key 0001..1f --usage 2 hello --split
//!
//! # Derive a key from a password
//! cryptohelper string-to-key aes256-cts-hmac-sha1-96 --password pw --salt EXAMPLE.COMuser
//! ```
//!
//! Results go to stdout as lower-case hex; logs go to stderr.

use std::io::{self, Read, Write};

use clap::{Parser, Subcommand};
use cryptohelper_core::{
    AlgorithmKind, CryptoHelper, DEFAULT_ITERATIONS, Environment, HelperError, Output,
    Request, string_to_key,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Hashing and Kerberos AES encryption helper
#[derive(Parser, Debug)]
#[command(name = "cryptohelper")]
#[command(about = "Digests, HMACs and Kerberos aes-cts-hmac-sha1-96 from the command line")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Digest input with md5, sha1, sha256, sha384 or sha512
    Hash {
        /// Digest algorithm
        algorithm: AlgorithmKind,
        /// Text to hash; read from stdin when omitted
        input: Option<String>,
        /// Treat input as hex
        #[arg(long)]
        hex: bool,
    },

    /// Encrypt with an aes*-cts-hmac-sha1-96 enctype
    Encrypt {
        /// Encryption type
        algorithm: AlgorithmKind,
        #[command(flatten)]
        key: KeyOptions,
        /// Payload; read from stdin when omitted
        payload: Option<String>,
        /// Treat payload as hex
        #[arg(long)]
        hex: bool,
        /// Print ciphertext and MAC on separate lines
        #[arg(long)]
        split: bool,
    },

    /// Verify and decrypt hex `ciphertext ‖ mac`
    Decrypt {
        /// Encryption type
        algorithm: AlgorithmKind,
        #[command(flatten)]
        key: KeyOptions,
        /// Hex ciphertext with trailing MAC
        data: String,
    },

    /// HMAC under a raw hex key with hmac-sha256 or hmac-sha512
    Mac {
        /// MAC algorithm
        algorithm: AlgorithmKind,
        /// Key as hex, any length
        #[arg(long)]
        key: String,
        /// Payload; read from stdin when omitted
        payload: Option<String>,
        /// Treat payload as hex
        #[arg(long)]
        hex: bool,
    },

    /// Keyed hmac-sha1-96-aes* checksum
    Checksum {
        /// Checksum type
        algorithm: AlgorithmKind,
        #[command(flatten)]
        key: KeyOptions,
        /// Payload; read from stdin when omitted
        payload: Option<String>,
        /// Treat payload as hex
        #[arg(long)]
        hex: bool,
    },

    /// Derive a key from a password and salt
    StringToKey {
        /// Encryption type the key is for
        algorithm: AlgorithmKind,
        /// Password
        #[arg(long)]
        password: String,
        /// Salt, conventionally realm followed by principal
        #[arg(long)]
        salt: String,
        /// PBKDF2 iteration count
        #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: u32,
    },
}

/// Key and usage shared by the keyed subcommands
#[derive(clap::Args, Debug)]
struct KeyOptions {
    /// Base key as hex
    #[arg(long)]
    key: String,
    /// Kerberos key usage number
    #[arg(long, allow_hyphen_values = true)]
    usage: i64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let helper = CryptoHelper::system();
    let mut stdout = io::stdout().lock();

    if let Err(e) = run(args.command, &helper, &mut stdout) {
        tracing::error!(error = %e, "Command failed");
        return Err(e);
    }

    Ok(())
}

/// Execute one subcommand, writing results to `out`.
fn run<E: Environment>(
    command: Command,
    helper: &CryptoHelper<E>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Hash { algorithm, input, hex } => {
            require(algorithm, algorithm.hash_algorithm().is_some())?;
            let input = input_bytes("input", input, hex)?;
            let output = helper.process(&Request::hash(algorithm, &input))?;
            writeln!(out, "{output}")?;
        },
        Command::Encrypt { algorithm, key, payload, hex, split } => {
            require(algorithm, is_enctype(algorithm))?;
            let payload = input_bytes("payload", payload, hex)?;
            let output =
                helper.process(&Request::encrypt(algorithm, &key.key, key.usage, &payload))?;
            write_ciphertext(out, &output, split)?;
        },
        Command::Decrypt { algorithm, key, data } => {
            require(algorithm, is_enctype(algorithm))?;
            let data = decode("data", &data)?;
            let output =
                helper.process(&Request::decrypt(algorithm, &key.key, key.usage, &data))?;
            writeln!(out, "{output}")?;
        },
        Command::Mac { algorithm, key, payload, hex } => {
            require(algorithm, algorithm.mac_algorithm().is_some())?;
            let payload = input_bytes("payload", payload, hex)?;
            let output = helper.process(&Request::mac(algorithm, &key, &payload))?;
            writeln!(out, "{output}")?;
        },
        Command::Checksum { algorithm, key, payload, hex } => {
            require(algorithm, algorithm.is_checksum())?;
            let payload = input_bytes("payload", payload, hex)?;
            let output =
                helper.process(&Request::encrypt(algorithm, &key.key, key.usage, &payload))?;
            writeln!(out, "{output}")?;
        },
        Command::StringToKey { algorithm, password, salt, iterations } => {
            let key = string_to_key(algorithm, password.as_bytes(), salt.as_bytes(), iterations)?;
            writeln!(out, "{key}")?;
        },
    }
    Ok(())
}

/// Reject `algorithm` unless the subcommand accepts it.
fn require(algorithm: AlgorithmKind, accepted: bool) -> Result<(), HelperError> {
    if accepted {
        Ok(())
    } else {
        Err(HelperError::UnsupportedAlgorithm { name: algorithm.to_string() })
    }
}

fn is_enctype(algorithm: AlgorithmKind) -> bool {
    algorithm.encryption_type().is_some() && !algorithm.is_checksum()
}

/// Argument bytes: text as UTF-8, or hex-decoded. Stdin when absent.
fn input_bytes(
    field: &'static str,
    value: Option<String>,
    hex: bool,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let text = match value {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        },
    };

    if hex { Ok(decode(field, &text)?) } else { Ok(text.into_bytes()) }
}

fn decode(field: &'static str, value: &str) -> Result<Vec<u8>, HelperError> {
    hex::decode(value.trim()).map_err(|e| HelperError::InvalidHex { field, reason: e.to_string() })
}

fn write_ciphertext(out: &mut impl Write, output: &Output, split: bool) -> io::Result<()> {
    match output.split_mac() {
        Some((ciphertext, mac)) if split => {
            writeln!(out, "ciphertext: {}", hex::encode(ciphertext))?;
            writeln!(out, "mac: {}", hex::encode(mac))
        },
        _ => writeln!(out, "{output}"),
    }
}
