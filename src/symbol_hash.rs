// =============================================================================
// Stable symbol hashing
// =============================================================================
//
// Maps an instrument symbol to a number that is identical across runs,
// processes and platforms. Used wherever a per-symbol value must look varied
// across the universe yet stay fixed for any one symbol (base prices,
// recommendation bias, synthetic series seeds).
//
// First eight bytes of the SHA-256 digest of the symbol, big-endian.

use sha2::{Digest, Sha256};

/// 64-bit stable hash of the symbol's UTF-8 bytes.
pub fn stable_hash(symbol: &str) -> u64 {
    let digest = Sha256::digest(symbol.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head)
}

/// Map the symbol into `[0.0, 1.0)`.
pub fn unit_interval(symbol: &str) -> f64 {
    // Top 53 bits fill an f64 mantissa exactly.
    (stable_hash(symbol) >> 11) as f64 / (1u64 << 53) as f64
}

/// Map the symbol into `[-0.5, 0.5)`.
pub fn centered_unit(symbol: &str) -> f64 {
    unit_interval(symbol) - 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest_prefixes() {
        assert_eq!(stable_hash(""), 0xe3b0_c442_98fc_1c14);
        assert_eq!(stable_hash("a"), 0xca97_8112_ca1b_bdca);
        assert_eq!(stable_hash("AAPL"), 0x1eb4_4d62_5271_a4eb);
    }

    #[test]
    fn stable_across_calls() {
        assert_eq!(stable_hash("AAPL"), stable_hash("AAPL"));
        assert_ne!(stable_hash("AAPL"), stable_hash("MSFT"));
    }

    #[test]
    fn ranges_hold() {
        for sym in ["AAPL", "MSFT", "BRK.B", "T", "V", ""] {
            let u = unit_interval(sym);
            assert!((0.0..1.0).contains(&u), "{sym}: {u}");
            let c = centered_unit(sym);
            assert!((-0.5..0.5).contains(&c), "{sym}: {c}");
        }
    }
}
