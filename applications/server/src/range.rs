//! HTTP byte-range resolution
//!
//! Single `bytes=` ranges only. Anything this server does not understand
//! (other units, multiple ranges, malformed syntax) is ignored and the full
//! payload is served, as RFC 9110 allows.

/// A satisfiable inclusive byte range: `0 <= start <= end < total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl ByteRange {
    /// Number of bytes in the range
    pub fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value for the `Content-Range` header
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

/// Outcome of resolving a `Range` header against a payload size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// Serve the whole payload with 200
    Full,
    /// Serve a slice with 206
    Partial(ByteRange),
    /// Answer 416
    Unsatisfiable,
}

/// Resolve an optional `Range` header value against `total` bytes
pub fn resolve_range(header: Option<&str>, total: u64) -> RangeRequest {
    let Some(header) = header else {
        return RangeRequest::Full;
    };

    let Some(spec) = header.trim().strip_prefix("bytes=") else {
        return RangeRequest::Full;
    };

    if spec.contains(',') {
        return RangeRequest::Full;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeRequest::Full;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // Suffix form: last N bytes
    if start_str.is_empty() {
        let Ok(suffix) = end_str.parse::<u64>() else {
            return RangeRequest::Full;
        };
        if suffix == 0 || total == 0 {
            return RangeRequest::Unsatisfiable;
        }
        return RangeRequest::Partial(ByteRange {
            start: total.saturating_sub(suffix),
            end: total - 1,
            total,
        });
    }

    let Ok(start) = start_str.parse::<u64>() else {
        return RangeRequest::Full;
    };

    let end = if end_str.is_empty() {
        None
    } else {
        match end_str.parse::<u64>() {
            Ok(end) => Some(end),
            Err(_) => return RangeRequest::Full,
        }
    };

    if start >= total {
        return RangeRequest::Unsatisfiable;
    }

    if end.is_some_and(|end| end < start) {
        return RangeRequest::Unsatisfiable;
    }

    RangeRequest::Partial(ByteRange {
        start,
        end: end.map_or(total - 1, |end| end.min(total - 1)),
        total,
    })
}
