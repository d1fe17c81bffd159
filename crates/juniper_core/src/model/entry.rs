//! Front-desk entities.
//!
//! # Responsibility
//! - Define the payload shapes recorded by the ledger.
//! - Validate the minimal form rules before anything is written.
//!
//! # Invariants
//! - Every entity carries an opaque `id` assigned at creation.
//! - `part` and `lesson_type` stay free text; no taxonomy is enforced.
//! - Serialized field names are camelCase to match persisted documents.

use crate::model::record::{new_entry_id, EntryId, Identified};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Form-level validation failure for a ledger entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// A required text field is empty or whitespace only.
    MissingField {
        entry: &'static str,
        field: &'static str,
    },
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { entry, field } => {
                write!(f, "{entry} requires a non-empty `{field}`")
            }
        }
    }
}

impl Error for EntryValidationError {}

fn require(
    entry: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), EntryValidationError> {
    if value.trim().is_empty() {
        return Err(EntryValidationError::MissingField { entry, field });
    }
    Ok(())
}

/// Walk-in or phone consultation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Consultation {
    pub id: EntryId,
    pub name: String,
    pub phone: String,
    /// Instrument or course the visitor asked about.
    pub part: String,
    pub content: String,
}

impl Consultation {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        part: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: new_entry_id(),
            name: name.into(),
            phone: phone.into(),
            part: part.into(),
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        require("consultation", "name", &self.name)
    }
}

/// Trial-lesson reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reservation {
    pub id: EntryId,
    /// Lesson date as entered (`YYYY-MM-DD`), may be empty.
    pub date: String,
    /// Lesson time slot such as `14:30`.
    pub time: String,
    pub name: String,
    pub phone: String,
    pub part: String,
}

impl Reservation {
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
        part: impl Into<String>,
    ) -> Self {
        Self {
            id: new_entry_id(),
            date: date.into(),
            time: time.into(),
            name: name.into(),
            phone: phone.into(),
            part: part.into(),
        }
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        self.validate_as("reservation")
    }

    fn validate_as(&self, entry: &'static str) -> Result<(), EntryValidationError> {
        require(entry, "name", &self.name)?;
        require(entry, "time", &self.time)
    }
}

/// Checkbox flags on a first-lesson booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstLessonFlag {
    /// Tuition for the first lesson has been paid.
    Paid,
    /// Enrollment form has been submitted.
    FormSubmitted,
}

/// First regular lesson booked after enrollment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstLesson {
    #[serde(flatten)]
    pub booking: Reservation,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub is_form_submitted: bool,
}

impl FirstLesson {
    /// Wraps a booking with both checkboxes cleared.
    pub fn from_booking(booking: Reservation) -> Self {
        Self {
            booking,
            is_paid: false,
            is_form_submitted: false,
        }
    }

    pub fn flag(&self, flag: FirstLessonFlag) -> bool {
        match flag {
            FirstLessonFlag::Paid => self.is_paid,
            FirstLessonFlag::FormSubmitted => self.is_form_submitted,
        }
    }

    pub fn set_flag(&mut self, flag: FirstLessonFlag, value: bool) {
        match flag {
            FirstLessonFlag::Paid => self.is_paid = value,
            FirstLessonFlag::FormSubmitted => self.is_form_submitted = value,
        }
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        self.booking.validate_as("first lesson")
    }
}

/// How a payment was settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "카드")]
    Card,
    #[serde(rename = "계좌이체")]
    Transfer,
    #[serde(rename = "현금")]
    Cash,
}

impl PaymentMethod {
    /// Label shown on receipts and stored in documents.
    pub fn label(self) -> &'static str {
        match self {
            Self::Card => "카드",
            Self::Transfer => "계좌이체",
            Self::Cash => "현금",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrecognized payment method text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPaymentMethod(pub String);

impl Display for UnknownPaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown payment method `{}`; expected card|transfer|cash",
            self.0
        )
    }
}

impl Error for UnknownPaymentMethod {}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "card" | "카드" => Ok(Self::Card),
            "transfer" | "계좌이체" => Ok(Self::Transfer),
            "cash" | "현금" => Ok(Self::Cash),
            _ => Err(UnknownPaymentMethod(value.to_string())),
        }
    }
}

/// Bookkeeping checkboxes on a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFlag {
    /// Entered into the Clbiz academy management system.
    Clbiz,
    /// Entered into the paper journal.
    Journal,
}

/// Tuition or fee received on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Payment {
    pub id: EntryId,
    pub name: String,
    pub part: String,
    pub lesson_type: String,
    /// Whole won.
    pub amount: u64,
    pub method: PaymentMethod,
    pub is_clbiz: bool,
    pub is_journal: bool,
}

impl Payment {
    pub fn new(
        name: impl Into<String>,
        part: impl Into<String>,
        lesson_type: impl Into<String>,
        amount: u64,
        method: PaymentMethod,
    ) -> Self {
        Self {
            id: new_entry_id(),
            name: name.into(),
            part: part.into(),
            lesson_type: lesson_type.into(),
            amount,
            method,
            is_clbiz: false,
            is_journal: false,
        }
    }

    pub fn flag(&self, flag: PaymentFlag) -> bool {
        match flag {
            PaymentFlag::Clbiz => self.is_clbiz,
            PaymentFlag::Journal => self.is_journal,
        }
    }

    pub fn set_flag(&mut self, flag: PaymentFlag, value: bool) {
        match flag {
            PaymentFlag::Clbiz => self.is_clbiz = value,
            PaymentFlag::Journal => self.is_journal = value,
        }
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        require("payment", "name", &self.name)
    }
}

/// Money spent on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Expense {
    pub id: EntryId,
    pub amount: u64,
    pub description: String,
}

impl Expense {
    pub fn new(amount: u64, description: impl Into<String>) -> Self {
        Self {
            id: new_entry_id(),
            amount,
            description: description.into(),
        }
    }
}

/// Item on the shared shopping list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShoppingItem {
    pub id: EntryId,
    pub text: String,
    pub completed: bool,
}

impl ShoppingItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_entry_id(),
            text: text.into(),
            completed: false,
        }
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        require("shopping item", "text", &self.text)
    }
}

/// Free-text notice body.
pub type NoticeText = String;

macro_rules! impl_identified {
    ($($ty:ty => $($field:ident).+;)+) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.$($field).+
                }

                fn assign_id(&mut self, id: EntryId) {
                    self.$($field).+ = id;
                }
            }
        )+
    };
}

impl_identified! {
    Consultation => id;
    Reservation => id;
    FirstLesson => booking.id;
    Payment => id;
    Expense => id;
    ShoppingItem => id;
}
