//! Minimal `multipart/form-data` parsing for file uploads.
use memchr::memmem;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MultipartError {
    #[error("Expected a multipart/form-data request")]
    NotMultipart,

    #[error("Missing multipart boundary")]
    MissingBoundary,

    #[error("Malformed multipart body")]
    Malformed,

    #[error("Missing form field '{0}'")]
    MissingField(String),
}

/// A file field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// Extract the boundary from a `Content-Type` header value.
pub fn boundary(content_type: &str) -> Result<String, MultipartError> {
    let mut params = content_type.split(';');
    let mime = params.next().unwrap_or("").trim();
    if !mime.eq_ignore_ascii_case("multipart/form-data") {
        return Err(MultipartError::NotMultipart);
    }
    params
        .filter_map(|p| p.split_once('='))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .filter(|b| !b.is_empty())
        .ok_or(MultipartError::MissingBoundary)
}

/// Find the part named `field` in a multipart body.
pub fn find_field(body: &[u8], boundary: &str, field: &str) -> Result<FilePart, MultipartError> {
    for part in parts(body, boundary)? {
        if part.field == field {
            return Ok(part);
        }
    }
    Err(MultipartError::MissingField(field.to_string()))
}

/// Split a multipart body into its parts.
pub fn parts(body: &[u8], boundary: &str) -> Result<Vec<FilePart>, MultipartError> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();
    let finder = memmem::Finder::new(delimiter);

    let first = finder.find(body).ok_or(MultipartError::Malformed)?;
    let mut rest = &body[first + delimiter.len()..];
    let mut parts = Vec::new();

    loop {
        if rest.starts_with(b"--") {
            return Ok(parts);
        }
        rest = rest
            .strip_prefix(b"\r\n")
            .ok_or(MultipartError::Malformed)?;

        let header_end = memmem::find(rest, b"\r\n\r\n").ok_or(MultipartError::Malformed)?;
        let headers =
            std::str::from_utf8(&rest[..header_end]).map_err(|_| MultipartError::Malformed)?;
        let content = &rest[header_end + 4..];

        // Part data ends at CRLF followed by the next delimiter
        let end = find_part_end(content, delimiter).ok_or(MultipartError::Malformed)?;
        let (field, filename) = disposition(headers).ok_or(MultipartError::Malformed)?;
        parts.push(FilePart {
            field,
            filename,
            data: content[..end].to_vec(),
        });
        rest = &content[end + 2 + delimiter.len()..];
    }
}

fn find_part_end(content: &[u8], delimiter: &[u8]) -> Option<usize> {
    let mut needle = Vec::with_capacity(delimiter.len() + 2);
    needle.extend_from_slice(b"\r\n");
    needle.extend_from_slice(delimiter);
    memmem::find(content, &needle)
}

/// Field name and optional file name from the part's `Content-Disposition`.
fn disposition(headers: &str) -> Option<(String, Option<String>)> {
    let value = headers.split("\r\n").find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("content-disposition")
            .then_some(value)
    })?;

    let mut field = None;
    let mut filename = None;
    for param in value.split(';').skip(1) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let raw = raw.trim().trim_matches('"').to_string();
        match key.trim().to_ascii_lowercase().as_str() {
            "name" => field = Some(raw),
            "filename" => filename = Some(raw),
            _ => {},
        }
    }
    Some((field?, filename))
}
