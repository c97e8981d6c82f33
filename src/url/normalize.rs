/// Normalizes a robots.txt path or pattern for comparison
///
/// Patterns and request paths go through the same normalisation so that
/// comparisons are symmetric.
///
/// # Normalization Steps
///
/// 1. Re-escape an encoded slash (`%2F` / `%2f`) so it decodes to `%2F` and
///    never compares equal to a literal `/`
/// 2. Decode every other `%XX` octet (hex digits are case-insensitive)
/// 3. Leave malformed escapes (`%`, `%4`, `%zz`) untouched
/// 4. Replace invalid UTF-8 produced by decoding with U+FFFD
///
/// `+` is kept as is. These are paths, not form data, so unlike a
/// form-urlencoded decoder it is never turned into a space.
///
/// # Examples
///
/// ```
/// use sumi_robots::url::normalize_path;
///
/// assert_eq!(normalize_path("/some/path%7e"), "/some/path~");
/// assert_eq!(normalize_path("/some/path%3C"), "/some/path<");
/// assert_eq!(normalize_path("/some/path%2f"), "/some/path%2F");
/// ```
pub fn normalize_path(value: &str) -> String {
    let escaped = value.replace("%2F", "%252F").replace("%2f", "%252F");
    let decoded = urlencoding::decode_binary(escaped.as_bytes());
    String::from_utf8_lossy(&decoded).into_owned()
}
