//! Hash helpers – abstracción para poder cambiar de algoritmo sin tocar el resto del core.

use sha1::{Digest, Sha1};

/// Longitud del prefijo hexadecimal usado como identificador.
const SHORT_HASH_LEN: usize = 8;

/// Hashea un string y devuelve el prefijo hex estable.
pub fn short_hash(input: &str) -> String {
    let mut h = Sha1::new();
    h.update(input.as_bytes());
    let hex = format!("{:x}", h.finalize());
    hex[..SHORT_HASH_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_is_stable_and_short() {
        let a = short_hash("cars");
        let b = short_hash("cars");
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn short_hash_differs_for_different_input() {
        assert_ne!(short_hash("cars"), short_hash("trucks"));
    }
}
