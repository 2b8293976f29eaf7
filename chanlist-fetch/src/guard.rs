//! Anti-bot content detection
//!
//! Challenge and captcha interstitials come back as ordinary pages, often
//! with a 200 status. Only a bounded prefix of the body is inspected; the
//! markers all live in the page head or the top of the body.

/// Markers of challenge, captcha and "unusual traffic" pages
pub const DEFAULT_BLOCK_MARKERS: &[&str] = &[
    "g-recaptcha",
    "recaptcha/api.js",
    "captcha-form",
    "/sorry/index",
    "our systems have detected unusual traffic",
    "cf-browser-verification",
    "challenge-platform",
    "verify you are human",
    "are you a robot",
];

/// Case-insensitive marker scan over a body prefix
#[derive(Debug, Clone)]
pub struct ContentGuard {
    markers: Vec<(String, String)>,
    scan_bytes: usize,
}

impl ContentGuard {
    /// Guard over a custom marker list; blank markers are ignored
    pub fn new<I, S>(markers: I, scan_bytes: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = markers
            .into_iter()
            .filter_map(|marker| {
                let marker = marker.as_ref().trim();
                (!marker.is_empty()).then(|| (marker.to_string(), marker.to_lowercase()))
            })
            .collect();
        Self {
            markers,
            scan_bytes,
        }
    }

    /// Guard over [`DEFAULT_BLOCK_MARKERS`]
    pub fn with_default_markers(scan_bytes: usize) -> Self {
        Self::new(DEFAULT_BLOCK_MARKERS, scan_bytes)
    }

    /// Bytes of body inspected
    pub fn scan_bytes(&self) -> usize {
        self.scan_bytes
    }

    /// First marker (in list order) found in the body prefix
    pub fn inspect(&self, body: &str) -> Option<&str> {
        if self.markers.is_empty() {
            return None;
        }
        let prefix = body[..floor_char_boundary(body, self.scan_bytes)].to_lowercase();
        self.markers
            .iter()
            .find(|(_, folded)| prefix.contains(folded.as_str()))
            .map(|(marker, _)| marker.as_str())
    }
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut boundary = index;
    while !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    boundary
}
