//! Fuzz target for the hex boundary
//!
//! Feeds arbitrary algorithm names, hex keys, usages and payloads through
//! name parsing and `CryptoHelper::process`.
//!
//! # Invariants
//!
//! - Parsing and dispatch never panic
//! - Every failure is a typed `HelperError`
//! - Successful encryption has the documented shape
//! - Raw-key MACs are full digest length

#![no_main]

use arbitrary::Arbitrary;
use cryptohelper_core::{AlgorithmKind, CryptoHelper, FixedEnv, OutputKind, Request};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct DispatchScenario {
    name: String,
    key: Option<String>,
    usage: Option<i64>,
    decrypt: bool,
    input: Vec<u8>,
    confounder: u8,
}

fuzz_target!(|scenario: DispatchScenario| {
    let Ok(algorithm) = scenario.name.parse::<AlgorithmKind>() else {
        return;
    };

    let helper = CryptoHelper::new(FixedEnv::new(scenario.confounder));
    let base = Request::hash(algorithm, &scenario.input);
    let request = Request {
        key: scenario.key.as_deref(),
        usage: scenario.usage,
        mode: if scenario.decrypt {
            cryptohelper_core::KrbMode::Decrypt
        } else {
            cryptohelper_core::KrbMode::Encrypt
        },
        ..base
    };

    let Ok(output) = helper.process(&request) else {
        return;
    };

    assert_eq!(output.algorithm(), algorithm);
    if output.kind() == OutputKind::Ciphertext {
        assert_eq!(output.as_bytes().len(), 16 + scenario.input.len() + 12);
        let (_, mac) = output.split_mac().expect("ciphertext always carries a MAC");
        assert_eq!(mac.len(), 12);
    }
    if let Some(hash) = algorithm.mac_algorithm() {
        assert_eq!(output.kind(), OutputKind::Mac);
        assert_eq!(output.as_bytes().len(), hash.output_len());
    }
});
