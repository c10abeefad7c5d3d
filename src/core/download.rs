use crate::error::{MirrorError, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::Url;
use tracing::debug;

/// Response body together with the filename the server suggests for it
#[derive(Debug)]
pub struct Payload {
    pub bytes: Vec<u8>,
    pub remote_name: String,
}

pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self::with_client(client))
    }

    fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn fetch(&self, url: &str) -> Result<Payload> {
        debug!(url, "sending GET");
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let remote_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(content_disposition_filename)
            .unwrap_or_else(|| url_file_name(url));

        let bytes = response.bytes()?.to_vec();
        debug!(url, remote_name = %remote_name, size = bytes.len(), "download finished");
        Ok(Payload { bytes, remote_name })
    }
}

/// Extract the `filename` parameter of a Content-Disposition header value.
/// Only the basename is kept.
pub fn content_disposition_filename(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in split_params(header).into_iter().skip(1) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let value = unquote(value.trim());
        match key.trim().to_ascii_lowercase().as_str() {
            "filename" => plain = Some(value),
            // RFC 5987: charset'lang'value
            "filename*" => {
                let name = value.splitn(3, '\'').nth(2).map(str::to_string);
                extended = Some(name.unwrap_or(value));
            }
            _ => {}
        }
    }

    plain.or(extended).map(|name| basename(&name).to_string())
}

/// Split header parameters on `;`, ignoring separators inside quoted strings
fn split_params(header: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&header[start..]);
    params
}

fn unquote(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\\\\", "\\").replace("\\\"", "\""),
        None => value.to_string(),
    }
}

/// Last path segment of a URL, empty when the path ends in `/`
pub fn url_file_name(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("")
            .to_string(),
        Err(_) => basename(url).to_string(),
    }
}

fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}
