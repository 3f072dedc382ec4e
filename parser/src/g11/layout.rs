//! Разметка записей G11 (BVR DD type 2): все смещения в одном месте.

use crate::record::{Field, FieldKind};

pub(crate) const TRAILER_CODE: &str = "097";
pub(crate) const FAILED_DEBIT_CODE: &str = "084";

/// Код отказа, который означает возврат списания, а не неудачу
pub(crate) const PROTESTATION_CODE: &str = "02";

/// Символ тестовой операции в [`TEST_FLAG`]
pub(crate) const TEST_MARK: char = '3';

// общие для всех строк

pub(crate) const RECORD_TYPE: Field = Field::new("record_type", 0, 3, FieldKind::Text);
pub(crate) const TEST_FLAG: Field = Field::new("test_flag", 5, 6, FieldKind::Flag);

// строки операций

pub(crate) const REFERENCE: Field = Field::new("reference", 15, 42, FieldKind::Text);
pub(crate) const CURRENCY: Field = Field::new("currency", 42, 45, FieldKind::Text);
pub(crate) const AMOUNT: Field = Field::new("amount", 45, 57, FieldKind::Cents);
pub(crate) const DATE: Field = Field::new("date", 108, 116, FieldKind::Date);
pub(crate) const REJECT_CODE: Field = Field::new("reject_code", 128, 130, FieldKind::Text);

// трейлер

pub(crate) const CREDIT_TOTAL: Field = Field::new("credit_total", 45, 57, FieldKind::Cents);
pub(crate) const COUNT_1: Field = Field::new("count_1", 57, 69, FieldKind::Count);
pub(crate) const COUNT_2: Field = Field::new("count_2", 89, 101, FieldKind::Count);
pub(crate) const DEBIT_TOTAL: Field = Field::new("debit_total", 101, 113, FieldKind::Cents);
pub(crate) const COUNT_3: Field = Field::new("count_3", 113, 125, FieldKind::Count);
pub(crate) const TRAILER_CURRENCY: Field = Field::new("trailer_currency", 128, 131, FieldKind::Text);

/// Счётчики трейлера, сумма которых равна числу операций
pub(crate) const TRAILER_COUNTS: [Field; 3] = [COUNT_1, COUNT_2, COUNT_3];
