//! Supported document kinds and their MIME types.

use serde::Serialize;

use docopener_core::{DocOpenerError, DocOpenerResult};

/// A document type the opener accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Csv,
}

impl DocumentKind {
    /// Classify a path by case-insensitive suffix.
    ///
    /// Only the suffix is inspected, so `"/tmp/.pdf"` is accepted and
    /// `"/tmp/report.pdf.bak"` is not.
    pub fn from_path(path: &str) -> DocOpenerResult<Self> {
        let lower = path.to_lowercase();
        if lower.ends_with(".pdf") {
            Ok(DocumentKind::Pdf)
        } else if lower.ends_with(".csv") {
            Ok(DocumentKind::Csv)
        } else {
            Err(DocOpenerError::UnsupportedType)
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Csv => "text/csv",
        }
    }
}

/// MIME type for the text after the last `.` in `path`.
///
/// Returns an empty string for anything other than `pdf` or `csv`.
pub fn mime_type_for(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match extension.to_lowercase().as_str() {
        "pdf" => DocumentKind::Pdf.mime_type(),
        "csv" => DocumentKind::Csv.mime_type(),
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_pdf_and_csv_any_case() {
        assert_eq!(DocumentKind::from_path("/tmp/report.pdf").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path("/tmp/FILE.PDF").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path("/tmp/data.csv").unwrap(), DocumentKind::Csv);
        assert_eq!(DocumentKind::from_path("C:\\Data.CsV").unwrap(), DocumentKind::Csv);
    }

    #[test]
    fn rejects_other_extensions() {
        for path in ["/tmp/report.doc", "/tmp/noext", "", "/tmp/report.pdf.bak", "pdf"] {
            let err = DocumentKind::from_path(path).unwrap_err();
            assert!(
                matches!(err, DocOpenerError::UnsupportedType),
                "{path} should be unsupported"
            );
        }
    }

    #[test]
    fn mime_types() {
        assert_eq!(mime_type_for("report.pdf"), "application/pdf");
        assert_eq!(mime_type_for("data.csv"), "text/csv");
        assert_eq!(mime_type_for("DATA.CSV"), "text/csv");
        assert_eq!(mime_type_for("notes.txt"), "");
        assert_eq!(mime_type_for("noext"), "");
    }

    proptest! {
        #[test]
        fn prop_suffix_decides_acceptance(stem in "[a-zA-Z0-9_/ -]{0,24}", ext in "[a-zA-Z]{1,5}") {
            let path = format!("{stem}.{ext}");
            let lower = ext.to_lowercase();
            let accepted = DocumentKind::from_path(&path).is_ok();
            prop_assert_eq!(accepted, lower == "pdf" || lower == "csv");
        }

        #[test]
        fn prop_kind_and_mime_agree(stem in "[a-z0-9]{1,16}", upper in any::<bool>(), pdf in any::<bool>()) {
            let ext = if pdf { "pdf" } else { "csv" };
            let ext = if upper { ext.to_uppercase() } else { ext.to_string() };
            let path = format!("/tmp/{stem}.{ext}");
            let kind = DocumentKind::from_path(&path).unwrap();
            prop_assert_eq!(kind.mime_type(), mime_type_for(&path));
        }
    }
}
