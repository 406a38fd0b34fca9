/// Plain text files pass through verbatim — no trimming, UTF-8 with a lossy
/// fallback for stray legacy encodings.
pub fn extract_txt(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
}
