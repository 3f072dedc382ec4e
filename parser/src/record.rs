//! Чтение файла фиксированной ширины: строки и поля по байтовым смещениям.
//!
//! Здесь нет никакой семантики G11, только нарезка.

use crate::error::ParseError;
use chrono::NaiveDate;
use std::borrow::Cow;
use std::io::Read;

/// Как интерпретировать содержимое поля
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// строка как есть
    Text,
    /// целое число в сотых долях (копейки/раппены)
    Cents,
    /// неотрицательный счётчик
    Count,
    /// дата `YYYYMMDD`
    Date,
    /// один символ-флаг
    Flag,
}

/// Описание поля в разметке записи: имя, полуоткрытый диапазон байтов, тип.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(name: &'static str, start: usize, end: usize, kind: FieldKind) -> Self {
        Field {
            name,
            start,
            end,
            kind,
        }
    }
}

/// Значение поля после разбора
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Cents(i64),
    Count(u64),
    Date(NaiveDate),
    Flag(char),
}

/// Одна запись файла. Номер строки считается с 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    number: usize,
    bytes: Vec<u8>,
}

impl RawLine {
    pub fn new(number: usize, bytes: Vec<u8>) -> Self {
        RawLine { number, bytes }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Первые три байта строки, либо `None`, если строка короче
    pub fn prefix(&self) -> Option<&[u8]> {
        self.bytes.get(0..3)
    }

    /// Срез `[start, end)` как текст.
    ///
    /// Байты не из UTF-8 заменяются, смещения при этом считаются по исходным байтам.
    pub fn field(&self, start: usize, end: usize) -> Result<Cow<'_, str>, ParseError> {
        self.slice("field", start, end)
    }

    fn slice(&self, name: &'static str, start: usize, end: usize) -> Result<Cow<'_, str>, ParseError> {
        let bytes = self
            .bytes
            .get(start..end)
            .ok_or(ParseError::FieldOutOfRange {
                line: self.number,
                field: name,
                start,
                end,
                len: self.bytes.len(),
            })?;
        Ok(String::from_utf8_lossy(bytes))
    }

    /// Извлекает и разбирает поле согласно его описанию
    pub fn decode(&self, field: &Field) -> Result<FieldValue, ParseError> {
        let raw = self.slice(field.name, field.start, field.end)?;

        let value = match field.kind {
            FieldKind::Text => FieldValue::Text(raw.into_owned()),
            FieldKind::Cents => {
                let cents = raw.trim().parse::<i64>().map_err(|_| self.bad_number(field, &raw))?;
                FieldValue::Cents(cents)
            }
            FieldKind::Count => {
                let count = raw.trim().parse::<u64>().map_err(|_| self.bad_number(field, &raw))?;
                FieldValue::Count(count)
            }
            FieldKind::Date => {
                let date = NaiveDate::parse_from_str(raw.trim(), "%Y%m%d").map_err(|_| {
                    ParseError::InvalidDate {
                        line: self.number,
                        field: field.name,
                        value: raw.to_string(),
                    }
                })?;
                FieldValue::Date(date)
            }
            FieldKind::Flag => {
                // пустой диапазон даёт пробел
                FieldValue::Flag(raw.chars().next().unwrap_or(' '))
            }
        };

        Ok(value)
    }

    pub fn text(&self, field: &Field) -> Result<String, ParseError> {
        match self.decode(&Field { kind: FieldKind::Text, ..*field })? {
            FieldValue::Text(s) => Ok(s),
            _ => unreachable!("text field decoded as non-text"),
        }
    }

    pub fn cents(&self, field: &Field) -> Result<i64, ParseError> {
        match self.decode(&Field { kind: FieldKind::Cents, ..*field })? {
            FieldValue::Cents(c) => Ok(c),
            _ => unreachable!("cents field decoded as non-cents"),
        }
    }

    pub fn count(&self, field: &Field) -> Result<u64, ParseError> {
        match self.decode(&Field { kind: FieldKind::Count, ..*field })? {
            FieldValue::Count(c) => Ok(c),
            _ => unreachable!("count field decoded as non-count"),
        }
    }

    pub fn date(&self, field: &Field) -> Result<NaiveDate, ParseError> {
        match self.decode(&Field { kind: FieldKind::Date, ..*field })? {
            FieldValue::Date(d) => Ok(d),
            _ => unreachable!("date field decoded as non-date"),
        }
    }

    pub fn flag(&self, field: &Field) -> Result<char, ParseError> {
        match self.decode(&Field { kind: FieldKind::Flag, ..*field })? {
            FieldValue::Flag(c) => Ok(c),
            _ => unreachable!("flag field decoded as non-flag"),
        }
    }

    fn bad_number(&self, field: &Field, raw: &str) -> ParseError {
        ParseError::InvalidNumber {
            line: self.number,
            field: field.name,
            value: raw.to_string(),
        }
    }
}

/// Файл фиксированной ширины, целиком в памяти.
///
/// Для чтения используйте [`FixedWidthFile::parse`] или [`FixedWidthFile::from_bytes`].
///
/// Пример:
/// ```rust
/// use g11_parser::FixedWidthFile;
/// # use g11_parser::ParseError;
/// # fn main() -> Result<(), ParseError> {
/// let file = FixedWidthFile::from_bytes(b"0810000\n0970000\n")?;
/// assert_eq!(file.len(), 2);
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FixedWidthFile {
    lines: Vec<RawLine>,
}

impl FixedWidthFile {
    /// Читает весь reader и делит содержимое на строки
    ///
    /// При ошибке возвращает [`ParseError`]
    pub fn parse<R: Read>(mut reader: R) -> Result<Self, ParseError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Self::from_bytes(&buf)
    }

    /// Делит байты на строки по `\r\n`, `\n` или одиночному `\r`.
    ///
    /// Пустой хвост после последнего перевода строки строкой не считается.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        let mut lines: Vec<RawLine> = Vec::new();
        let mut start = 0;
        let mut pos = 0;

        while pos < data.len() {
            match data[pos] {
                b'\n' => {
                    lines.push(RawLine::new(lines.len() + 1, data[start..pos].to_vec()));
                    pos += 1;
                    start = pos;
                }
                b'\r' => {
                    lines.push(RawLine::new(lines.len() + 1, data[start..pos].to_vec()));
                    pos += 1;
                    if data.get(pos) == Some(&b'\n') {
                        pos += 1;
                    }
                    start = pos;
                }
                _ => pos += 1,
            }
        }

        if start < data.len() {
            lines.push(RawLine::new(lines.len() + 1, data[start..].to_vec()));
        }

        if lines.is_empty() {
            return Err(ParseError::EmptyFile);
        }

        Ok(FixedWidthFile { lines })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Всегда `false`: пустой файл не создаётся
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_at(&self, index: usize) -> Result<&RawLine, ParseError> {
        self.lines.get(index).ok_or(ParseError::LineOutOfRange {
            index,
            len: self.lines.len(),
        })
    }

    pub fn last_line(&self) -> &RawLine {
        // конструктор гарантирует хотя бы одну строку
        &self.lines[self.lines.len() - 1]
    }

    pub fn lines(&self) -> impl Iterator<Item = &RawLine> {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMOUNT: Field = Field::new("amount", 2, 6, FieldKind::Cents);

    #[test]
    fn from_bytes_splits_lines_and_strips_cr() {
        let file = FixedWidthFile::from_bytes(b"abc\r\ndef\nghi").unwrap();
        assert_eq!(file.len(), 3);
        assert_eq!(file.line_at(0).unwrap().as_bytes(), b"abc");
        assert_eq!(file.line_at(1).unwrap().as_bytes(), b"def");
        assert_eq!(file.last_line().as_bytes(), b"ghi");
        assert_eq!(file.last_line().number(), 3);
    }

    #[test]
    fn from_bytes_splits_on_lone_cr() {
        let file = FixedWidthFile::from_bytes(b"abc\rdef\r\rghi\r").unwrap();
        assert_eq!(file.len(), 4);
        assert_eq!(file.line_at(1).unwrap().as_bytes(), b"def");
        assert!(file.line_at(2).unwrap().is_empty());
        assert_eq!(file.last_line().as_bytes(), b"ghi");
        assert_eq!(file.last_line().number(), 4);
    }

    #[test]
    fn from_bytes_keeps_single_empty_line() {
        let file = FixedWidthFile::from_bytes(b"\r\n").unwrap();
        assert_eq!(file.len(), 1);
        assert!(file.last_line().is_empty());
    }

    #[test]
    fn from_bytes_drops_only_final_empty_segment() {
        let file = FixedWidthFile::from_bytes(b"abc\n\n").unwrap();
        assert_eq!(file.len(), 2);
        assert!(file.last_line().is_empty());
    }

    #[test]
    fn from_bytes_errors_on_empty_input() {
        let err = FixedWidthFile::from_bytes(b"").unwrap_err();
        assert!(matches!(err, ParseError::EmptyFile), "got {err:?}");
    }

    #[test]
    fn line_at_errors_out_of_range() {
        let file = FixedWidthFile::from_bytes(b"abc\n").unwrap();
        let err = file.line_at(5).unwrap_err();
        assert!(
            matches!(err, ParseError::LineOutOfRange { index: 5, len: 1 }),
            "got {err:?}"
        );
    }

    #[test]
    fn field_returns_half_open_range() {
        let line = RawLine::new(1, b"0123456789".to_vec());
        assert_eq!(line.field(2, 5).unwrap(), "234");
        assert_eq!(line.field(0, 10).unwrap(), "0123456789");
    }

    #[test]
    fn field_errors_when_range_exceeds_line() {
        let line = RawLine::new(7, b"0123".to_vec());
        let err = line.field(2, 6).unwrap_err();
        match err {
            ParseError::FieldOutOfRange { line, start, end, len, .. } => {
                assert_eq!((line, start, end, len), (7, 2, 6, 4));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn field_keeps_byte_offsets_for_non_utf8() {
        // 0xE9 = 'é' в latin-1
        let line = RawLine::new(1, vec![b'a', 0xE9, b'b', b'c']);
        assert_eq!(line.field(2, 4).unwrap(), "bc");
    }

    #[test]
    fn cents_parses_zero_padded_integer() {
        let line = RawLine::new(1, b"xx0042yy".to_vec());
        assert_eq!(line.cents(&AMOUNT).unwrap(), 42);
    }

    #[test]
    fn cents_errors_on_garbage() {
        let line = RawLine::new(4, b"xx00a2yy".to_vec());
        let err = line.cents(&AMOUNT).unwrap_err();
        assert!(
            matches!(err, ParseError::InvalidNumber { line: 4, field: "amount", .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn decode_dispatches_on_kind() {
        let line = RawLine::new(1, b"20130626X".to_vec());
        let date = Field::new("date", 0, 8, FieldKind::Date);
        let flag = Field::new("flag", 8, 9, FieldKind::Flag);

        assert_eq!(
            line.decode(&date).unwrap(),
            FieldValue::Date(NaiveDate::from_ymd_opt(2013, 6, 26).unwrap())
        );
        assert_eq!(line.decode(&flag).unwrap(), FieldValue::Flag('X'));
    }

    #[test]
    fn date_errors_on_invalid_calendar_date() {
        let line = RawLine::new(2, b"20131399".to_vec());
        let date = Field::new("date", 0, 8, FieldKind::Date);
        let err = line.date(&date).unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate { line: 2, .. }), "got {err:?}");
    }

    #[test]
    fn count_rejects_negative_values() {
        let line = RawLine::new(1, b"-1".to_vec());
        let count = Field::new("count", 0, 2, FieldKind::Count);
        assert!(line.count(&count).is_err());
    }
}
