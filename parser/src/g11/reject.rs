use crate::error::ParseError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Таблица причин отказа по умолчанию (английский текст).
///
/// Строится один раз на процесс, дальше только читается.
pub static DEFAULT_REJECT_REASONS: Lazy<RejectReasonTable> = Lazy::new(|| {
    RejectReasonTable::from_entries([
        ("01", "Insufficient cover funds."),
        ("02", "Debtor protestation."),
        ("03", "Debtor’s account number and address do not match."),
        ("04", "Postal account closed."),
        ("05", "Postal account blocked/frozen."),
        ("06", "Postal account holder deceased."),
        ("07", "Postal account number non-existent."),
    ])
});

/// Соответствие двухсимвольного кода отказа и текста причины.
///
/// Принимающая система может собрать свою таблицу с переведёнными текстами
/// и передать её в [`crate::G11Parser::with_reject_reasons`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectReasonTable {
    reasons: HashMap<String, String>,
}

impl RejectReasonTable {
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        RejectReasonTable {
            reasons: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Текст причины или `None`, если кода нет в таблице
    pub fn get(&self, code: &str) -> Option<&str> {
        self.reasons.get(code).map(String::as_str)
    }

    /// Как [`RejectReasonTable::get`], но неизвестный код это ошибка.
    ///
    /// `line` нужен только для текста ошибки.
    pub fn lookup(&self, code: &str, line: usize) -> Result<&str, ParseError> {
        self.get(code).ok_or_else(|| ParseError::UnknownRejectCode {
            line,
            code: code.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_codes_01_to_07() {
        assert_eq!(DEFAULT_REJECT_REASONS.len(), 7);
        for code in ["01", "02", "03", "04", "05", "06", "07"] {
            assert!(DEFAULT_REJECT_REASONS.get(code).is_some(), "missing {code}");
        }
        assert_eq!(DEFAULT_REJECT_REASONS.get("02"), Some("Debtor protestation."));
    }

    #[test]
    fn lookup_fails_loudly_on_unknown_code() {
        let err = DEFAULT_REJECT_REASONS.lookup("99", 12).unwrap_err();
        match err {
            ParseError::UnknownRejectCode { line, code } => {
                assert_eq!(line, 12);
                assert_eq!(code, "99");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn custom_table_overrides_texts() {
        let table = RejectReasonTable::from_entries([("01", "Couverture insuffisante.")]);
        assert_eq!(table.lookup("01", 1).unwrap(), "Couverture insuffisante.");
        assert!(table.get("02").is_none());
    }
}
