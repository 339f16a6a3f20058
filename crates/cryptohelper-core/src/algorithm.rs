//! Algorithm names accepted at the boundary

use std::{fmt, str::FromStr};

use cryptohelper_crypto::{EncryptionType, HashAlgorithm};

use crate::error::HelperError;

/// Every algorithm the helper dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    /// MD5 digest, legacy fingerprints only
    Md5,
    /// SHA-1 digest
    Sha1,
    /// SHA-256 digest
    Sha256,
    /// SHA-384 digest
    Sha384,
    /// SHA-512 digest
    Sha512,
    /// HMAC-SHA256 under a raw key (JWT `HS256`)
    HmacSha256,
    /// HMAC-SHA512 under a raw key (JWT `HS512`)
    HmacSha512,
    /// Kerberos etype 17
    Aes128CtsHmacSha196,
    /// Kerberos etype 18
    Aes256CtsHmacSha196,
    /// Kerberos checksum type 15
    HmacSha196Aes128,
    /// Kerberos checksum type 16
    HmacSha196Aes256,
}

impl AlgorithmKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 11] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::HmacSha256,
        Self::HmacSha512,
        Self::Aes128CtsHmacSha196,
        Self::Aes256CtsHmacSha196,
        Self::HmacSha196Aes128,
        Self::HmacSha196Aes256,
    ];

    /// Canonical lower-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::HmacSha256 => "hmac-sha256",
            Self::HmacSha512 => "hmac-sha512",
            Self::Aes128CtsHmacSha196 => "aes128-cts-hmac-sha1-96",
            Self::Aes256CtsHmacSha196 => "aes256-cts-hmac-sha1-96",
            Self::HmacSha196Aes128 => "hmac-sha1-96-aes128",
            Self::HmacSha196Aes256 => "hmac-sha1-96-aes256",
        }
    }

    /// Hash function, for the digest kinds.
    pub const fn hash_algorithm(self) -> Option<HashAlgorithm> {
        match self {
            Self::Md5 => Some(HashAlgorithm::Md5),
            Self::Sha1 => Some(HashAlgorithm::Sha1),
            Self::Sha256 => Some(HashAlgorithm::Sha256),
            Self::Sha384 => Some(HashAlgorithm::Sha384),
            Self::Sha512 => Some(HashAlgorithm::Sha512),
            Self::HmacSha256
            | Self::HmacSha512
            | Self::Aes128CtsHmacSha196
            | Self::Aes256CtsHmacSha196
            | Self::HmacSha196Aes128
            | Self::HmacSha196Aes256 => None,
        }
    }

    /// Underlying hash, for the raw-key HMAC kinds.
    pub const fn mac_algorithm(self) -> Option<HashAlgorithm> {
        match self {
            Self::HmacSha256 => Some(HashAlgorithm::Sha256),
            Self::HmacSha512 => Some(HashAlgorithm::Sha512),
            _ => None,
        }
    }

    /// Kerberos enctype whose keys this kind takes.
    ///
    /// The checksum kinds map to the enctype of the same key size.
    pub const fn encryption_type(self) -> Option<EncryptionType> {
        match self {
            Self::Aes128CtsHmacSha196 | Self::HmacSha196Aes128 => {
                Some(EncryptionType::Aes128CtsHmacSha196)
            },
            Self::Aes256CtsHmacSha196 | Self::HmacSha196Aes256 => {
                Some(EncryptionType::Aes256CtsHmacSha196)
            },
            _ => None,
        }
    }

    /// True for the keyed Kerberos checksum kinds.
    pub const fn is_checksum(self) -> bool {
        matches!(self, Self::HmacSha196Aes128 | Self::HmacSha196Aes256)
    }

    /// True for the kinds that take a key.
    pub const fn is_keyed(self) -> bool {
        self.encryption_type().is_some() || self.mac_algorithm().is_some()
    }

    /// True for the Kerberos kinds, which also take a key usage.
    pub const fn takes_usage(self) -> bool {
        self.encryption_type().is_some()
    }

    /// Kind for a Kerberos etype or checksum type number.
    ///
    /// The two IANA registries do not overlap for the AES types, so
    /// `18` resolves to the enctype and `16` to its checksum.
    pub fn from_kerberos_number(number: i32) -> Option<Self> {
        if let Some(etype) = EncryptionType::from_etype_number(number) {
            return Some(match etype {
                EncryptionType::Aes128CtsHmacSha196 => Self::Aes128CtsHmacSha196,
                EncryptionType::Aes256CtsHmacSha196 => Self::Aes256CtsHmacSha196,
            });
        }
        EncryptionType::from_checksum_type_number(number).map(|etype| match etype {
            EncryptionType::Aes128CtsHmacSha196 => Self::HmacSha196Aes128,
            EncryptionType::Aes256CtsHmacSha196 => Self::HmacSha196Aes256,
        })
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = HelperError;

    /// Parse a name case-insensitively. Underscores are accepted in place of
    /// hyphens, so `aes256_cts_hmac_sha1_96` also resolves. JWT names
    /// (`HS256`, `HS512`) and Kerberos type numbers (`18`, `16`) are
    /// accepted as aliases.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        let found = match normalized.as_str() {
            "hs256" => Some(Self::HmacSha256),
            "hs512" => Some(Self::HmacSha512),
            other => match other.parse::<i32>() {
                Ok(number) => Self::from_kerberos_number(number),
                Err(_) => Self::ALL.into_iter().find(|kind| kind.name() == other),
            },
        };
        found.ok_or_else(|| HelperError::UnsupportedAlgorithm { name: name.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for kind in AlgorithmKind::ALL {
            assert_eq!(kind.name().parse::<AlgorithmKind>(), Ok(kind));
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("SHA256".parse(), Ok(AlgorithmKind::Sha256));
        assert_eq!("MD5".parse(), Ok(AlgorithmKind::Md5));
        assert_eq!("AES256-CTS-HMAC-SHA1-96".parse(), Ok(AlgorithmKind::Aes256CtsHmacSha196));
        assert_eq!("aes256_cts_hmac_sha1_96".parse(), Ok(AlgorithmKind::Aes256CtsHmacSha196));
    }

    #[test]
    fn jwt_aliases() {
        assert_eq!("HS256".parse(), Ok(AlgorithmKind::HmacSha256));
        assert_eq!("hs512".parse(), Ok(AlgorithmKind::HmacSha512));
    }

    #[test]
    fn kerberos_numbers_resolve() {
        assert_eq!("17".parse(), Ok(AlgorithmKind::Aes128CtsHmacSha196));
        assert_eq!("18".parse(), Ok(AlgorithmKind::Aes256CtsHmacSha196));
        assert_eq!("15".parse(), Ok(AlgorithmKind::HmacSha196Aes128));
        assert_eq!(" 16 ".parse(), Ok(AlgorithmKind::HmacSha196Aes256));
        assert_eq!(
            "23".parse::<AlgorithmKind>(),
            Err(HelperError::UnsupportedAlgorithm { name: "23".to_string() })
        );
    }

    #[test]
    fn unknown_name_rejected() {
        assert_eq!(
            "bcrypt".parse::<AlgorithmKind>(),
            Err(HelperError::UnsupportedAlgorithm { name: "bcrypt".to_string() })
        );
        assert!("".parse::<AlgorithmKind>().is_err());
    }

    #[test]
    fn every_kind_has_exactly_one_family() {
        for kind in AlgorithmKind::ALL {
            let families = [
                kind.hash_algorithm().is_some(),
                kind.mac_algorithm().is_some(),
                kind.encryption_type().is_some(),
            ];
            assert_eq!(families.iter().filter(|&&f| f).count(), 1, "{kind}");
            assert_eq!(kind.is_keyed(), kind.hash_algorithm().is_none(), "{kind}");
        }
    }

    #[test]
    fn only_kerberos_kinds_take_usage() {
        assert!(AlgorithmKind::Aes128CtsHmacSha196.takes_usage());
        assert!(AlgorithmKind::HmacSha196Aes256.takes_usage());
        assert!(!AlgorithmKind::HmacSha256.takes_usage());
        assert!(AlgorithmKind::HmacSha256.is_keyed());
    }

    #[test]
    fn checksum_kinds_share_enctype_keys() {
        assert_eq!(
            AlgorithmKind::HmacSha196Aes256.encryption_type(),
            Some(EncryptionType::Aes256CtsHmacSha196)
        );
        assert_eq!(
            AlgorithmKind::HmacSha196Aes128.encryption_type(),
            Some(EncryptionType::Aes128CtsHmacSha196)
        );
        assert!(AlgorithmKind::HmacSha196Aes128.is_checksum());
        assert!(!AlgorithmKind::Aes128CtsHmacSha196.is_checksum());
        assert!(!AlgorithmKind::HmacSha256.is_checksum());
    }
}
