//! PDF text extraction module

/// Extract text content from an uploaded PDF.
pub fn extract_text(bytes: &[u8]) -> Result<String, String> {
    if bytes.is_empty() {
        return Err("Empty upload".to_string());
    }

    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| format!("Failed to extract text: {}", e))
}

/// Extraction failures are logged and treated as an empty document.
pub fn extract_text_or_empty(file_name: &str, bytes: &[u8]) -> String {
    match extract_text(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Error reading PDF {}: {}", file_name, e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_upload_is_an_error() {
        assert!(extract_text(&[]).is_err());
    }

    #[test]
    fn garbage_bytes_become_empty_text() {
        let text = extract_text_or_empty("junk.pdf", b"definitely not a pdf");
        assert!(text.is_empty());
    }
}
