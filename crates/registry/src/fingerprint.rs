use std::io::Read;

/// Length of a fingerprint in bytes (128 bits).
pub const FINGERPRINT_LEN: usize = 16;

/// Content fingerprint used as the dataset etag:
/// first 128 bits of BLAKE3 over the full content, as 32 lowercase hex chars.
pub fn fingerprint(bytes: &[u8]) -> String {
    encode(&blake3::hash(bytes))
}

/// Streams `reader` through the hasher. Returns the byte count and the
/// fingerprint, equal to `fingerprint` over the same bytes.
pub fn fingerprint_reader<R: Read>(mut reader: R) -> std::io::Result<(u64, String)> {
    let mut hasher = blake3::Hasher::new();
    let size = std::io::copy(&mut reader, &mut hasher)?;
    Ok((size, encode(&hasher.finalize())))
}

fn encode(hash: &blake3::Hash) -> String {
    hex::encode(&hash.as_bytes()[..FINGERPRINT_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let a = fingerprint(b"name,dept\nada,math\n");
        let b = fingerprint(b"name,dept\nada,math\n");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_fingerprint_changes_on_content() {
        assert_ne!(fingerprint(b"a,b\n1,2\n"), fingerprint(b"a,b\n1,3\n"));
        assert_ne!(fingerprint(b""), fingerprint(b"\n"));
    }

    #[test]
    fn test_streamed_fingerprint_matches_in_memory() {
        // larger than io::copy's buffer so several chunks go through the hasher
        let content: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        let (size, etag) = fingerprint_reader(content.as_slice()).unwrap();
        assert_eq!(size, content.len() as u64);
        assert_eq!(etag, fingerprint(&content));
    }
}
