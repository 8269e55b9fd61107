use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::{form_urlencoded, Position, Url};

// RFC 3986 unreserved characters plus sub-delims and gen-delims.
const SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'@');

fn unquote_quote(segment: &str) -> String {
    let unquoted = percent_decode_str(segment).decode_utf8_lossy();
    utf8_percent_encode(&unquoted, SAFE).to_string()
}

fn push_query_and_fragment(quoted: &mut String, query: Option<&str>, fragment: Option<&str>) {
    if let Some(query) = query {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form_urlencoded::parse(query.as_bytes()))
            .finish();
        if !query.is_empty() {
            quoted.push('?');
            quoted.push_str(&query);
        }
    }
    if let Some(fragment) = fragment {
        quoted.push('#');
        quoted.push_str(&unquote_quote(fragment));
    }
}

/// Quotes a URL so it can be embedded in an HTML attribute.
///
/// The host is IDNA-encoded, the path and fragment are unquoted and quoted
/// again, and the query is re-encoded as form data. Relative and
/// protocol-relative URLs get the same path, query and fragment treatment.
/// Already quoted input comes back unchanged.
pub fn smart_urlquote(raw: &str) -> String {
    let Ok(url) = Url::parse(raw) else {
        let (rest, fragment) = match raw.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (raw, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };
        let mut quoted = unquote_quote(path);
        push_query_and_fragment(&mut quoted, query, fragment);
        return quoted;
    };

    let mut quoted = url[..Position::BeforePath].to_string();
    quoted.push_str(&unquote_quote(url.path()));
    push_query_and_fragment(&mut quoted, url.query(), url.fragment());
    quoted
}
