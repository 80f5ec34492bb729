//! HTTP clients for the external services, one submodule per vendor.
//!
//! All four services are keyless JSON APIs treated as black boxes: the
//! forecast endpoint, the IP-geolocation endpoint, and the forward/reverse
//! geocoding endpoints. Clients check the HTTP status before decoding and
//! never retry; recovery policy belongs to the callers.

pub mod geocoding;
pub mod ipapi;
pub mod openmeteo;

/// Cap response bodies quoted in error messages.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_caps_long_payloads() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
