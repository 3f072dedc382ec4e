pub(crate) mod layout;
pub mod reject;

use crate::error::ParseError;
use crate::format::StatementFormat;
use crate::model::{Amount, Attachment, Currency, RecordKind, Statement, Transaction};
use crate::record::{FixedWidthFile, RawLine};
use chrono::{Local, NaiveDate};
use layout::*;
use log::{debug, info, warn};
use reject::{DEFAULT_REJECT_REASONS, RejectReasonTable};
use std::io::Read;

/// Идентификатор формата для принимающей системы
pub const G11_FTYPE: &str = "g11";

/// Первая строка примечания у тестовых операций.
///
/// Если другого примечания нет, отметка стоит одна, без завершающего `\n`.
pub const TEST_TRANSACTION_MARKER: &str = "-- Test transaction --";

/// Начало строки примечания с исходной суммой неуспешного списания.
///
/// Сумма после метки всегда с двумя знаками (`CHF 12.50`), не `12.500000`.
pub const FAILED_DEBIT_LABEL: &str = "Amount to debit was";

/// Перевод целого числа сотых долей в сумму с двумя знаками
fn cents_to_amount(cents: i64) -> Amount {
    Amount::new(cents, 2)
}

/// Результат импорта, который получает принимающая система.
///
/// Номер счёта в G11 не передаётся, поэтому `account_number` всегда `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct G11Import {
    pub ftype: &'static str,
    pub currency_code: Currency,
    pub account_number: Option<String>,
    pub statements: Vec<Statement>,
    /// совпало ли число операций со счётчиками трейлера
    pub valid: bool,
}

impl G11Import {
    /// Единственная выписка файла
    pub fn statement(&self) -> Option<&Statement> {
        self.statements.first()
    }
}

/// Парсер выписок Postfinance BVR DD type 2 (файлы G11).
///
/// Состояния не хранит: один экземпляр можно использовать для любого числа файлов.
///
/// Пример:
/// ```rust,no_run
/// use std::fs::File;
/// use g11_parser::{FixedWidthFile, G11Parser};
/// # use g11_parser::ParseError;
/// # fn main() -> Result<(), ParseError> {
/// let file = FixedWidthFile::parse(File::open("statement.g11")?)?;
/// let import = G11Parser::new().import(&file)?;
/// if !import.valid {
///     eprintln!("transaction count does not match the trailer");
/// }
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct G11Parser<'a> {
    reasons: &'a RejectReasonTable,
    statement_date: Option<NaiveDate>,
}

impl Default for G11Parser<'static> {
    fn default() -> Self {
        G11Parser::new()
    }
}

impl G11Parser<'static> {
    /// Парсер с таблицей причин по умолчанию и текущей датой обработки
    pub fn new() -> Self {
        G11Parser {
            reasons: &DEFAULT_REJECT_REASONS,
            statement_date: None,
        }
    }
}

impl<'a> G11Parser<'a> {
    /// Подменяет таблицу причин отказа (например, переведённой)
    pub fn with_reject_reasons<'b>(self, reasons: &'b RejectReasonTable) -> G11Parser<'b> {
        G11Parser {
            reasons,
            statement_date: self.statement_date,
        }
    }

    /// Фиксирует дату выписки вместо текущей
    pub fn with_statement_date(self, date: NaiveDate) -> Self {
        G11Parser {
            statement_date: Some(date),
            ..self
        }
    }

    /// Файл распознаётся, если его последняя строка начинается с `097`
    pub fn file_is_known(&self, file: &FixedWidthFile) -> bool {
        file.last_line().prefix() == Some(TRAILER_CODE.as_bytes())
    }

    /// Читает reader и выполняет [`G11Parser::import`]
    pub fn import_reader<R: Read>(&self, reader: R) -> Result<G11Import, ParseError> {
        let file = FixedWidthFile::parse(reader)?;
        self.import(&file)
    }

    /// Полный разбор файла: выписка плюс результат сверки с трейлером.
    ///
    /// Ошибки разбора прерывают импорт целиком. Несовпадение счётчиков
    /// ошибкой не считается и возвращается в [`G11Import::valid`].
    pub fn import(&self, file: &FixedWidthFile) -> Result<G11Import, ParseError> {
        if !self.file_is_known(file) {
            return Err(ParseError::UnrecognizedFormat);
        }

        let trailer = file.last_line();
        let currency_code = self.parse_currency_code(trailer)?;
        let statement = self.parse_statement(file, currency_code.clone())?;

        let mut statements = Vec::with_capacity(1);
        statements.push(statement);

        let valid = self.validate_counts(trailer, &statements[0])?;

        info!(
            "g11 import done: {} transactions, closing balance {} {}, valid: {valid}",
            statements[0].transactions.len(),
            statements[0].closing_balance,
            currency_code,
        );

        Ok(G11Import {
            ftype: G11_FTYPE,
            currency_code,
            account_number: None,
            statements,
            valid,
        })
    }

    fn parse_statement(
        &self,
        file: &FixedWidthFile,
        currency: Currency,
    ) -> Result<Statement, ParseError> {
        let trailer = file.last_line();

        let opening_balance = cents_to_amount(0);
        let closing_balance = self.parse_closing_balance(trailer)?;
        let date = self.statement_date();
        let attachments: Vec<Attachment> = Vec::new();
        let transactions = self.parse_transactions(file)?;

        Ok(Statement::new(
            currency,
            opening_balance,
            closing_balance,
            date,
            transactions,
            attachments,
        ))
    }

    /// ISO-код валюты всего файла, из трейлера
    pub fn parse_currency_code(&self, trailer: &RawLine) -> Result<Currency, ParseError> {
        Ok(Currency::from_code(&trailer.text(&TRAILER_CURRENCY)?))
    }

    /// Сумма зачислений минус сумма списаний/отказов из трейлера
    pub fn parse_closing_balance(&self, trailer: &RawLine) -> Result<Amount, ParseError> {
        let credited = cents_to_amount(trailer.cents(&CREDIT_TOTAL)?);
        let debited = cents_to_amount(trailer.cents(&DEBIT_TOTAL)?);
        Ok(credited - debited)
    }

    /// Дата обработки. В самом файле даты выписки нет.
    pub fn statement_date(&self) -> NaiveDate {
        self.statement_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Разбирает все строки, кроме строк с типом `097`, в порядке файла
    pub fn parse_transactions(&self, file: &FixedWidthFile) -> Result<Vec<Transaction>, ParseError> {
        let mut transactions = Vec::with_capacity(file.len().saturating_sub(1));

        for line in file.lines() {
            let record_type = line.text(&RECORD_TYPE)?;
            let kind = RecordKind::from_code(&record_type);
            if kind == RecordKind::Trailer {
                continue;
            }

            let tx = self.decode_transaction(line, kind)?;
            debug!(
                "line {}: {record_type} {} {} {}",
                line.number(),
                tx.reference.trim(),
                tx.currency,
                tx.amount,
            );
            transactions.push(tx);
        }

        Ok(transactions)
    }

    fn decode_transaction(&self, line: &RawLine, kind: RecordKind) -> Result<Transaction, ParseError> {
        let reference = line.text(&REFERENCE)?;
        let currency = line.text(&CURRENCY)?;
        let mut amount = cents_to_amount(line.cents(&AMOUNT)?);
        let date = line.date(&DATE)?;
        let mut note = String::new();

        if kind == RecordKind::FailedDebit {
            let reject_code = line.text(&REJECT_CODE)?;
            let reason = self.reasons.lookup(&reject_code, line.number())?;

            if reject_code == PROTESTATION_CODE {
                // возврат списания: сумма уходит с обратным знаком
                amount = -amount;
                note = reason.to_string();
            } else {
                // неуспешное списание не должно влиять на баланс
                note = format!("{reason}\n{FAILED_DEBIT_LABEL} {currency} {amount}");
                amount = cents_to_amount(0);
            }
        }

        let is_test = line.flag(&TEST_FLAG)? == TEST_MARK;
        if is_test {
            note = if note.is_empty() {
                TEST_TRANSACTION_MARKER.to_string()
            } else {
                format!("{TEST_TRANSACTION_MARKER}\n{note}")
            };
        }

        Ok(Transaction {
            name: Transaction::UNSET_NAME.to_string(),
            unique_import_id: reference.clone(),
            reference,
            currency: Currency::from_code(&currency),
            amount,
            date,
            note: (!note.is_empty()).then_some(note),
            kind,
            is_test,
        })
    }

    /// Сверяет число операций с суммой трёх счётчиков трейлера.
    ///
    /// Несовпадение даёт `Ok(false)`, ошибка только если счётчики не читаются.
    pub fn validate_counts(&self, trailer: &RawLine, statement: &Statement) -> Result<bool, ParseError> {
        let mut declared: u64 = 0;
        for field in &TRAILER_COUNTS {
            declared += trailer.count(field)?;
        }

        let actual = statement.transactions.len() as u64;
        if actual != declared {
            warn!("g11 trailer declares {declared} transactions, parsed {actual}");
        }

        Ok(actual == declared)
    }
}

impl StatementFormat for G11Parser<'_> {
    fn ftype(&self) -> &'static str {
        G11_FTYPE
    }

    fn recognizes(&self, file: &FixedWidthFile) -> bool {
        self.file_is_known(file)
    }

    fn parse(&self, file: &FixedWidthFile) -> Result<Statement, ParseError> {
        let currency = self.parse_currency_code(file.last_line())?;
        self.parse_statement(file, currency)
    }

    fn validate(&self, file: &FixedWidthFile, statement: &Statement) -> Result<bool, ParseError> {
        self.validate_counts(file.last_line(), statement)
    }
}
