use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use engine_logging::engine_debug;

/// Decode a response body into UTF-8 using: BOM -> Content-Type charset -> chardetng guess.
///
/// An empty or unrecognized charset label falls through to detection.
///
/// Malformed sequences are replaced rather than rejected; career sites often
/// mislabel their charset and partially readable text still counts.
pub(crate) fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(charset_param) {
        match Encoding::for_label(label.as_bytes()) {
            Some(encoding) => return decode_with(bytes, encoding),
            None => engine_debug!("Ignoring unknown charset label {:?}", label),
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_header_wins_over_detection() {
        let html = decode_body(b"caf\xe9", Some("text/html; Charset=\"ISO-8859-1\""));
        assert_eq!(html, "café");
    }

    #[test]
    fn bom_wins_over_header() {
        let html = decode_body(b"\xEF\xBB\xBFhello", Some("text/html; charset=latin1"));
        assert_eq!(html, "hello");
    }

    #[test]
    fn empty_or_unknown_charset_falls_back_to_detection() {
        for content_type in ["text/html; charset=", "text/html; charset=utf8mb4"] {
            let html = decode_body(b"<p>Senior engineer</p>", Some(content_type));
            assert_eq!(html, "<p>Senior engineer</p>", "{content_type}");
        }
    }

    #[test]
    fn missing_header_falls_back_to_detection() {
        assert_eq!(decode_body(b"plain ascii", None), "plain ascii");
    }
}
