//! Source locators: where a dataset comes from and how to read it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::error::{IngestError, Result};

/// Inclusive, zero-based column span of a worksheet (`A:AH` is `0..=33`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRange {
    pub first: u32,
    pub last: u32,
}

impl ColumnRange {
    pub fn contains(&self, column: u32) -> bool {
        (self.first..=self.last).contains(&column)
    }
}

impl FromStr for ColumnRange {
    type Err = IngestError;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = || IngestError::InvalidColumnRange {
            value: value.to_string(),
        };
        let (first, last) = match value.split_once(':') {
            Some((first, last)) => (first, last),
            None => (value, value),
        };
        let first = column_index(first).ok_or_else(invalid)?;
        let last = column_index(last).ok_or_else(invalid)?;
        if first > last {
            return Err(invalid());
        }
        Ok(Self { first, last })
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", column_letters(self.first), column_letters(self.last))
    }
}

/// Zero-based index of a column label (`A` = 0, `AA` = 26).
pub fn column_index(letters: &str) -> Option<u32> {
    let letters = letters.trim();
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        index = index * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    Some(index - 1)
}

/// Column label of a zero-based index.
pub fn column_letters(index: u32) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Identifies a dataset source. Equal locators are the same cached table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceLocator {
    /// Delimited text with a header row.
    Delimited { path: PathBuf, delimiter: u8 },
    /// One sheet of a spreadsheet workbook.
    Workbook {
        path: PathBuf,
        /// First sheet when `None`.
        sheet: Option<String>,
        columns: Option<ColumnRange>,
        /// Data rows read after the header row.
        max_rows: Option<usize>,
    },
    /// A replacement dataset uploaded as bytes, identified by content.
    Upload {
        file_name: String,
        sha256: String,
        /// Workbook uploads only; first sheet when `None`.
        sheet: Option<String>,
    },
}

impl SourceLocator {
    pub fn delimited(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let delimiter = default_delimiter(&path);
        Self::Delimited { path, delimiter }
    }

    pub fn workbook(path: impl Into<PathBuf>, sheet: Option<String>) -> Self {
        Self::Workbook {
            path: path.into(),
            sheet,
            columns: None,
            max_rows: None,
        }
    }

    /// Picks delimited or workbook reading from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match SourceKind::from_extension(&path) {
            Some(SourceKind::Workbook) => Self::workbook(path, None),
            _ => Self::delimited(path),
        }
    }

    pub fn upload(file_name: impl Into<String>, bytes: &[u8], sheet: Option<String>) -> Self {
        Self::Upload {
            file_name: file_name.into(),
            sha256: hex::encode(Sha256::digest(bytes)),
            sheet,
        }
    }

    /// Name used for messages and for the export file name.
    pub fn display_name(&self) -> String {
        match self {
            Self::Delimited { path, .. } | Self::Workbook { path, .. } => path.display().to_string(),
            Self::Upload { file_name, .. } => file_name.clone(),
        }
    }

    /// Dataset name: the file stem of the source.
    pub fn dataset_name(&self) -> String {
        let stem = match self {
            Self::Delimited { path, .. } | Self::Workbook { path, .. } => path.file_stem(),
            Self::Upload { file_name, .. } => Path::new(file_name).file_stem(),
        };
        stem.and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or("dataset")
            .to_string()
    }
}

const DELIMITED_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Extensions [`SourceKind::from_extension`] accepts, as `.csv, .tsv, ...`.
pub(crate) fn supported_extensions() -> String {
    DELIMITED_EXTENSIONS
        .iter()
        .chain(WORKBOOK_EXTENSIONS.iter())
        .map(|extension| format!(".{extension}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reader family chosen for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Delimited,
    Workbook,
}

impl SourceKind {
    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        let extension = extension.as_str();
        if DELIMITED_EXTENSIONS.contains(&extension) {
            Some(Self::Delimited)
        } else if WORKBOOK_EXTENSIONS.contains(&extension) {
            Some(Self::Workbook)
        } else {
            None
        }
    }
}

/// Tab for `.tsv`, comma otherwise.
pub fn default_delimiter(path: &Path) -> u8 {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_column_ranges() {
        let range: ColumnRange = "A:AH".parse().unwrap();
        assert_eq!(range, ColumnRange { first: 0, last: 33 });
        assert_eq!(range.to_string(), "A:AH");
        assert_eq!("c".parse::<ColumnRange>().unwrap().first, 2);
        assert!("B:A".parse::<ColumnRange>().is_err());
        assert!("1:3".parse::<ColumnRange>().is_err());
    }

    #[test]
    fn column_letters_round_trip() {
        for index in [0, 25, 26, 27, 51, 52, 701, 702] {
            assert_eq!(column_index(&column_letters(index)), Some(index));
        }
        assert_eq!(column_letters(33), "AH");
    }

    #[test]
    fn uploads_are_keyed_by_content() {
        let a = SourceLocator::upload("sales.csv", b"x,y\n1,2\n", None);
        let b = SourceLocator::upload("sales.csv", b"x,y\n1,2\n", None);
        let c = SourceLocator::upload("sales.csv", b"x,y\n1,3\n", None);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.dataset_name(), "sales");
    }

    #[test]
    fn every_supported_extension_dispatches() {
        let listed = supported_extensions();
        assert_eq!(listed, ".csv, .tsv, .txt, .xlsx, .xlsm, .xlsb, .xls, .ods");
        for extension in listed.split(", ") {
            let path = format!("upload{extension}");
            assert!(
                SourceKind::from_extension(Path::new(&path)).is_some(),
                "{path}"
            );
        }
        assert_eq!(
            SourceKind::from_extension(Path::new("book.XLSB")),
            Some(SourceKind::Workbook)
        );
        assert_eq!(SourceKind::from_extension(Path::new("notes.pdf")), None);
    }

    #[test]
    fn dispatches_on_extension() {
        assert!(matches!(
            SourceLocator::from_path("data.xlsx"),
            SourceLocator::Workbook { .. }
        ));
        assert_eq!(
            SourceLocator::from_path("export.tsv"),
            SourceLocator::Delimited {
                path: PathBuf::from("export.tsv"),
                delimiter: b'\t'
            }
        );
        assert_eq!(SourceLocator::from_path("data.xlsx").dataset_name(), "data");
    }
}
