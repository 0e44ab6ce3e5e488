use url::Url;

const ACCEPTED_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Literal prefix check; anything further is left for the renderer to reject.
pub fn is_accepted_url(candidate: &str) -> bool {
    ACCEPTED_PREFIXES
        .iter()
        .any(|prefix| candidate.starts_with(prefix))
}

/// Split inputs into (accepted, rejected), preserving input order in both.
pub fn partition_urls<I, S>(inputs: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    inputs
        .into_iter()
        .map(Into::into)
        .partition(|url| is_accepted_url(url))
}

/// One URL per line; surrounding whitespace trimmed, blank lines dropped.
pub fn parse_url_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Host component (with port when present) of a URL, if it parses.
pub fn source_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
