//! PDF text extraction. `lopdf` reads the document page by page; `pdf-extract`
//! is the fallback when lopdf cannot load it or finds no text at all.
//!
//! lopdf pages are trimmed, empty pages dropped, and the rest joined with `\n`.
//! pdf-extract returns the whole document as one string with no reliable page
//! boundary, so its output is normalized line by line instead.

use std::panic;

use tracing::warn;

use super::ExtractError;

pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let primary = match extract_with_lopdf(bytes) {
        Ok(pages) => {
            let text = join_pages(pages);
            if !text.is_empty() {
                return Ok(text);
            }
            "lopdf found no text".to_string()
        }
        Err(e) => e,
    };

    warn!("{primary}; falling back to pdf-extract");
    let text = extract_with_pdf_extract(bytes)
        .map_err(|fallback| ExtractError::Pdf(format!("{primary}; {fallback}")))?;
    Ok(join_pages(text.lines().map(str::to_string)))
}

fn extract_with_lopdf(bytes: &[u8]) -> Result<Vec<String>, String> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| format!("lopdf: {e}"))?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().into_keys() {
        match doc.extract_text(&[page_number]) {
            Ok(text) => pages.push(text),
            Err(e) => warn!("lopdf could not read page {page_number}: {e}"),
        }
    }
    Ok(pages)
}

fn extract_with_pdf_extract(bytes: &[u8]) -> Result<String, String> {
    // pdf-extract panics on some malformed documents; treat that like any other failure.
    panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| "pdf-extract panicked".to_string())?
        .map_err(|e| format!("pdf-extract: {e}"))
}

/// Trims every segment, drops the empty ones, joins the rest with `\n`.
fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    pages
        .into_iter()
        .map(|page| page.trim().to_string())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::pdf_with_pages;

    #[test]
    fn test_join_pages_trims_and_drops_blank_pages() {
        let pages = vec![
            "  first page \n".to_string(),
            "   ".to_string(),
            "\nsecond page".to_string(),
        ];
        assert_eq!(join_pages(pages), "first page\nsecond page");
    }

    #[test]
    fn test_join_pages_of_nothing_is_empty() {
        assert_eq!(join_pages(Vec::new()), "");
    }

    #[test]
    fn test_multi_page_document_is_one_line_per_page() {
        let bytes = pdf_with_pages(&["Alpha page", "Omega page"]);
        assert_eq!(extract_pdf_text(&bytes).unwrap(), "Alpha page\nOmega page");
    }

    #[test]
    fn test_blank_page_is_dropped() {
        let bytes = pdf_with_pages(&["Alpha page", "   ", "Omega page"]);
        assert_eq!(extract_pdf_text(&bytes).unwrap(), "Alpha page\nOmega page");
    }

    #[test]
    fn test_lopdf_reader_reads_every_page() {
        let bytes = pdf_with_pages(&["One", "Two", "Three"]);
        let pages = extract_with_lopdf(&bytes).unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages[1].contains("Two"));
    }

    #[test]
    fn test_whole_document_text_has_no_blank_runs() {
        let text = "Alpha page\n\n\n\u{c}  Omega page  \n\n";
        assert_eq!(join_pages(text.lines().map(str::to_string)), "Alpha page\nOmega page");
    }

    #[test]
    fn test_garbage_fails_both_readers() {
        let err = extract_pdf_text(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
