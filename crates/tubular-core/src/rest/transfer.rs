//! One blocking curl transfer: method, URL, headers and optional body in; status and body out.

use curl::easy::{Easy, List};
use std::time::Duration;

/// HTTP methods the service clients use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs the request on the current thread. Non-2xx statuses are returned,
/// not turned into errors; only curl failures are.
pub fn perform(
    method: Method,
    url: &str,
    headers: &[String],
    body: Option<&[u8]>,
) -> Result<RawResponse, curl::Error> {
    let mut easy = Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(120))?;

    match (method, body) {
        (Method::Get, _) => easy.get(true)?,
        (_, Some(bytes)) => {
            easy.post_field_size(bytes.len() as u64)?;
            easy.post_fields_copy(bytes)?;
        }
        (_, None) => {
            easy.post(true)?;
            easy.post_field_size(0)?;
        }
    }
    if method == Method::Patch {
        easy.custom_request("PATCH")?;
    }

    let mut list = List::new();
    for h in headers {
        list.append(h)?;
    }
    // Keep curl from waiting on 100-continue for larger bodies.
    list.append("Expect:")?;
    easy.http_headers(list)?;

    let mut buf = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            buf.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()? as u16;
    Ok(RawResponse { status, body: buf })
}
