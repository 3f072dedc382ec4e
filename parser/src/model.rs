use crate::g11::layout::{FAILED_DEBIT_CODE, TRAILER_CODE};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

/// Денежная сумма в единицах валюты с двумя знаками после запятой
pub type Amount = Decimal;

/// Валюта выписки или операции
///
/// Важно:
/// [`Currency::Other`] хранит код в верхнем регистре, без проверки по ISO 4217.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Currency {
    /// Швейцарский франк
    CHF,
    /// Евро
    EUR,
    /// Американский доллар
    USD,

    /// Прочая валюта
    ///
    /// Содержится как строка
    Other(String),
}

impl Currency {
    /// Разбирает трёхбуквенный код валюты из файла
    pub fn from_code(raw: &str) -> Self {
        let s = raw.trim();
        match s.to_uppercase().as_str() {
            "CHF" => Currency::CHF,
            "EUR" => Currency::EUR,
            "USD" => Currency::USD,
            _ => Currency::Other(s.to_uppercase()),
        }
    }

    /// ISO-код валюты
    pub fn code(&self) -> &str {
        match self {
            Currency::CHF => "CHF",
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::Other(code) => code,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Тип записи G11 по первым трём символам строки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// `097`: итоговая строка (трейлер)
    Trailer,
    /// `084`: неуспешное списание или возврат
    FailedDebit,
    /// всё остальное
    Normal,
}

impl RecordKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            TRAILER_CODE => RecordKind::Trailer,
            FAILED_DEBIT_CODE => RecordKind::FailedDebit,
            _ => RecordKind::Normal,
        }
    }
}

/// Вложение выписки. Формат G11 вложений не содержит.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content: Vec<u8>,
}

/// Центральная структура библиотеки, содержащая одну банковскую выписку.
///
/// Создаётся один раз при разборе файла и после проверки не меняется.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// валюта выписки (из трейлера)
    pub currency: Currency,
    /// открывающий баланс, в G11 всегда 0.00
    pub opening_balance: Amount,
    /// закрывающий баланс: сумма зачислений минус сумма списаний/отказов
    pub closing_balance: Amount,
    /// дата обработки (в самом файле даты выписки нет)
    pub date: NaiveDate,
    /// транзакции в порядке строк файла, без трейлера
    pub transactions: Vec<Transaction>,
    /// вложения, для G11 всегда пусто
    pub attachments: Vec<Attachment>,
}

impl Statement {
    /// Go to [`Statement`]
    pub fn new(
        currency: Currency,
        opening_balance: Amount,
        closing_balance: Amount,
        date: NaiveDate,
        transactions: Vec<Transaction>,
        attachments: Vec<Attachment>,
    ) -> Self {
        Statement {
            currency,
            opening_balance,
            closing_balance,
            date,
            transactions,
            attachments,
        }
    }
}

/// Одна операция из G11-файла.
///
/// `name` остаётся заглушкой `/`: человекочитаемое название назначает
/// принимающая система.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// заглушка `/`
    pub name: String,
    /// референс операции, байты [15, 42)
    pub reference: String,
    /// ключ импорта, совпадает с `reference`
    pub unique_import_id: String,
    /// валюта операции, байты [42, 45)
    pub currency: Currency,
    /// сумма, может быть отрицательной (возврат) или нулевой (отказ)
    pub amount: Amount,
    /// дата операции
    pub date: NaiveDate,
    /// примечание (OBI): причина отказа и/или отметка тестовой операции
    pub note: Option<String>,
    /// тип исходной строки
    pub kind: RecordKind,
    /// тестовая операция (символ `3` в позиции 5)
    pub is_test: bool,
}

impl Transaction {
    /// Заглушка имени операции
    pub const UNSET_NAME: &'static str = "/";
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let note_str = self
            .note
            .as_deref()
            .map(|n| n.replace('\n', " | "))
            .unwrap_or_default();

        write!(
            f,
            "{:<10} {:<27} {:<3} {:>15} {}",
            self.date, self.reference, self.currency, self.amount, note_str,
        )
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} opening {} closing {} ({} transactions)",
            self.date,
            self.currency,
            self.opening_balance,
            self.closing_balance,
            self.transactions.len(),
        )?;
        for tx in &self.transactions {
            writeln!(f, "{tx}")?;
        }
        Ok(())
    }
}
