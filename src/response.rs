//! HTTP-style response wrapping for rendered PDFs
//!
//! Framework-agnostic: carries status, headers and body so callers can map
//! it onto whatever web stack they use.

/// A ready-to-serve PDF response (status 200, `Content-Type: application/pdf`).
#[derive(Debug, Clone, PartialEq)]
pub struct PdfResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl PdfResponse {
    /// Response for inline display.
    pub fn inline(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/pdf".to_string())],
            body,
        }
    }

    /// Response forcing a download under the given filename.
    pub fn attachment(body: Vec<u8>, filename: &str) -> Self {
        let mut response = Self::inline(body);
        response.headers.push((
            "Content-Disposition".to_string(),
            format!("attachment; filename=\"{}\"", filename),
        ));
        response
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_response() {
        let response = PdfResponse::inline(vec![1, 2, 3]);
        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("application/pdf"));
        assert_eq!(response.header("content-disposition"), None);
        assert_eq!(response.body, vec![1, 2, 3]);
    }

    #[test]
    fn test_attachment_response() {
        let response = PdfResponse::attachment(vec![9], "report.pdf");
        assert_eq!(response.status, 200);
        assert_eq!(response.header("Content-Type"), Some("application/pdf"));
        assert_eq!(
            response.header("Content-Disposition"),
            Some("attachment; filename=\"report.pdf\"")
        );
    }
}
