//! Общий интерфейс форматов выписок.
//!
//! Реестр форматов живёт у принимающей системы: она перебирает
//! зарегистрированные реализации и берёт первую, для которой
//! [`StatementFormat::recognizes`] вернул `true`.

use crate::error::ParseError;
use crate::model::Statement;
use crate::record::FixedWidthFile;

pub trait StatementFormat {
    /// Короткий идентификатор формата, например `g11`
    fn ftype(&self) -> &'static str;

    /// Подходит ли файл этому формату. Никогда не завершается ошибкой.
    fn recognizes(&self, file: &FixedWidthFile) -> bool;

    /// Разбирает файл в выписку
    fn parse(&self, file: &FixedWidthFile) -> Result<Statement, ParseError>;

    /// Сверяет выписку с контрольными данными файла.
    ///
    /// Несовпадение это `Ok(false)`, а не ошибка.
    fn validate(&self, file: &FixedWidthFile, statement: &Statement) -> Result<bool, ParseError>;
}
