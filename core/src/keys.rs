use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref NON_KEY: Regex = Regex::new(r"[^a-z0-9]+").expect("valid regex");
}

/// Canonical lookup key for a display name or URL slug.
///
/// NFKD-decomposes, drops combining marks, lowercases and strips everything
/// that is not an ASCII letter or digit, so `"Thunder Punch"`, `"thunder-punch"`
/// and `"thunder_punch"` all map to `"thunderpunch"`.
pub fn to_key(name: &str) -> String {
    let folded: String = name.nfkd().filter(|c| !is_combining_mark(*c)).collect::<String>().to_lowercase();
    NON_KEY.replace_all(&folded, "").into_owned()
}

/// Key of the last non-empty path segment of a link such as `/dex/sm/moves/thunder_punch/`.
pub fn key_from_link(link: &str) -> String {
    let segment = link.trim_matches('/').rsplit('/').next().unwrap_or("");
    to_key(segment)
}
