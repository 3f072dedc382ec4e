use crate::error::ParseError;
use crate::model::{Amount, Statement};
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;

/// Строка CSV-выгрузки, одна на операцию
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: String,
    name: &'a str,
    reference: &'a str,
    currency: &'a str,
    amount: Amount,
    note: &'a str,
}

impl Statement {
    /// Записывает операции выписки в CSV с заголовком.
    ///
    /// Суммы пишутся с точкой и двумя знаками, референс без хвостовых пробелов.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ParseError> {
        let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);

        for tx in &self.transactions {
            wtr.serialize(CsvRow {
                date: tx.date.format("%Y-%m-%d").to_string(),
                name: &tx.name,
                reference: tx.reference.trim_end(),
                currency: tx.currency.code(),
                amount: tx.amount,
                note: tx.note.as_deref().unwrap_or(""),
            })?;
        }

        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Currency, RecordKind, Statement, Transaction};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn tx(reference: &str, cents: i64, note: Option<&str>) -> Transaction {
        Transaction {
            name: Transaction::UNSET_NAME.into(),
            reference: reference.into(),
            unique_import_id: reference.into(),
            currency: Currency::CHF,
            amount: Decimal::new(cents, 2),
            date: NaiveDate::from_ymd_opt(2013, 6, 26).unwrap(),
            note: note.map(str::to_string),
            kind: RecordKind::Normal,
            is_test: false,
        }
    }

    fn statement(transactions: Vec<Transaction>) -> Statement {
        Statement::new(
            Currency::CHF,
            Decimal::new(0, 2),
            Decimal::new(0, 2),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            transactions,
            Vec::new(),
        )
    }

    #[test]
    fn writes_header_and_rows() {
        let stmt = statement(vec![tx("REF1   ", 150000, None), tx("REF2", -1250, Some("a\nb"))]);

        let mut out = Vec::new();
        stmt.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("date,name,reference,currency,amount,note"));
        assert_eq!(lines.next(), Some("2013-06-26,/,REF1,CHF,1500.00,"));
        // примечание с переводом строки уходит в кавычки
        assert_eq!(lines.next(), Some("2013-06-26,/,REF2,CHF,-12.50,\"a"));
        assert_eq!(lines.next(), Some("b\""));
    }

    #[test]
    fn empty_statement_writes_nothing() {
        let mut out = Vec::new();
        statement(Vec::new()).write_csv(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
