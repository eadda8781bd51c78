//! Parsing of paths pasted by the terminal when files are dropped onto it.
//!
//! Terminals disagree on the format: some quote each path, some escape
//! spaces with backslashes, some send `file://` URIs one per line.

use std::path::PathBuf;

use url::Url;

pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') => {
                if let Some(n) = chars.next() {
                    cur.push(n);
                }
            }
            (Some(_), c) => cur.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_token = true;
            }
            (None, '\\') => {
                if let Some(n) = chars.next() {
                    cur.push(n);
                    in_token = true;
                }
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    out.push(to_path(&cur));
                    cur.clear();
                    in_token = false;
                }
            }
            (None, c) => {
                cur.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        out.push(to_path(&cur));
    }

    out.retain(|p| !p.as_os_str().is_empty());
    out
}

fn to_path(token: &str) -> PathBuf {
    if !token.starts_with("file:") {
        return PathBuf::from(token);
    }
    match Url::parse(token).map(|url| url.to_file_path()) {
        Ok(Ok(path)) => path,
        _ => {
            log::debug!("not a local file URI: {token}");
            PathBuf::new()
        }
    }
}
