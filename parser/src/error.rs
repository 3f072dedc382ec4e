use std::io::Error as IoError;
use thiserror::Error;

/// Ошибки при парсинге G11-файла
#[derive(Debug, Error)]
pub enum ParseError {
    // обёртки

    /// обёртка std::io::Error
    #[error("io error: {0}")]
    Io(#[from] IoError),
    /// обёртка csv::Error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ошибки формата

    /// во входных данных нет ни одной строки
    #[error("empty input: at least one line is required")]
    EmptyFile,
    /// обращение к несуществующей строке
    #[error("line index {index} out of range (file has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },
    /// поле выходит за пределы строки
    #[error("line {line}: field '{field}' [{start}, {end}) out of range (line length {len})")]
    FieldOutOfRange {
        line: usize,
        field: &'static str,
        start: usize,
        end: usize,
        len: usize,
    },
    /// поле не является целым числом
    #[error("line {line}: field '{field}' is not a number: '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    /// поле не является датой YYYYMMDD
    #[error("line {line}: field '{field}' is not a YYYYMMDD date: '{value}'")]
    InvalidDate {
        line: usize,
        field: &'static str,
        value: String,
    },

    // логические ошибки

    /// код отказа отсутствует в таблице причин
    #[error("line {line}: unknown reject code '{code}'")]
    UnknownRejectCode { line: usize, code: String },
    /// последняя строка файла не является G11-трейлером
    #[error("not a G11 file: last line is not a '097' trailer")]
    UnrecognizedFormat,
}

impl ParseError {
    /// Ошибки разметки и содержимого полей (смещения, числа, даты)
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            ParseError::EmptyFile
                | ParseError::LineOutOfRange { .. }
                | ParseError::FieldOutOfRange { .. }
                | ParseError::InvalidNumber { .. }
                | ParseError::InvalidDate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_errors_are_grouped() {
        let err = ParseError::InvalidNumber {
            line: 1,
            field: "amount",
            value: "12a".into(),
        };
        assert!(err.is_format_error());

        let err = ParseError::UnknownRejectCode {
            line: 3,
            code: "99".into(),
        };
        assert!(!err.is_format_error());
    }

    #[test]
    fn display_mentions_line_and_field() {
        let err = ParseError::FieldOutOfRange {
            line: 2,
            field: "reject_code",
            start: 128,
            end: 130,
            len: 120,
        };
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "got: {msg}");
        assert!(msg.contains("reject_code"), "got: {msg}");
    }
}
