//! Join-code generation.
//!
//! The code a prospective member types is a random 6-character string,
//! distinct from the company's primary key so the document id never doubles
//! as a shared secret.

use rand::Rng;

/// Alphabet without easily-confused characters (0/O, 1/I/L).
const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

pub const JOIN_CODE_LEN: usize = 6;

/// Generate a random join code (e.g. `K7N2QD`).
pub fn generate_join_code() -> String {
    let mut rng = rand::thread_rng();
    (0..JOIN_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_has_expected_shape() {
        for _ in 0..100 {
            let code = generate_join_code();
            assert_eq!(code.len(), JOIN_CODE_LEN);
            assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn codes_are_not_constant() {
        let first = generate_join_code();
        let distinct = (0..32).any(|_| generate_join_code() != first);
        assert!(distinct);
    }
}
