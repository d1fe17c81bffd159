//! CLI argument definitions using clap.
//!
//! Every command that records something takes `--date`, the viewed date the
//! mutation is filed under. It defaults to today.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use juniper_core::format::parse_formatted_number;
use juniper_core::{FirstLessonFlag, PaymentFlag, PaymentMethod};
use std::path::PathBuf;

/// Front-desk ledger for the Juniper academy.
#[derive(Parser, Debug)]
#[command(name = "juniper")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the ledger database and logs
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show everything visible on one date
    Report {
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Override the manager on duty
    Manager {
        #[arg(long)]
        date: Option<NaiveDate>,
        name: String,
    },

    /// Walk-in and phone consultations
    Consultation {
        #[command(subcommand)]
        action: ConsultationAction,
    },

    /// Trial-lesson reservations
    Reservation {
        #[command(subcommand)]
        action: BookingAction,
    },

    /// First-lesson bookings with paid/form checkboxes
    FirstLesson {
        #[command(subcommand)]
        action: FirstLessonAction,
    },

    /// Payments received on a date
    Payment {
        #[command(subcommand)]
        action: PaymentAction,
    },

    /// Money spent on a date
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// Shared shopping list
    Shopping {
        #[command(subcommand)]
        action: ShoppingAction,
    },

    /// Write the fixed or new notice
    Notice {
        #[command(subcommand)]
        slot: NoticeAction,
    },

    /// Search every recorded date
    Search {
        #[arg(value_enum)]
        section: SearchSection,
        query: String,
        #[arg(long)]
        json: bool,
    },

    /// Suggest part, lesson type and amount from past payments
    Suggest { name: String },

    /// Ask the AI service for a one-line synopsis of a date
    Summary {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConsultationAction {
    Add {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        part: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Rewrite fields of an existing consultation; omitted fields are kept
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        part: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    Delete {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

/// Booking fields shared by reservations and first lessons.
#[derive(clap::Args, Debug, Clone)]
pub struct BookingArgs {
    /// Lesson date, free text such as 2024-01-20
    #[arg(long, default_value = "")]
    pub lesson_date: String,
    /// Lesson time slot such as 14:30
    #[arg(long)]
    pub time: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub part: String,
}

/// Booking fields to rewrite; omitted fields are kept.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BookingEditArgs {
    #[arg(long)]
    pub lesson_date: Option<String>,
    #[arg(long)]
    pub time: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub part: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum BookingAction {
    Add {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[command(flatten)]
        booking: BookingArgs,
    },
    /// Rewrite fields of an existing reservation; omitted fields are kept
    Edit {
        id: String,
        #[command(flatten)]
        changes: BookingEditArgs,
    },
    Delete {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FirstLessonAction {
    Add {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[command(flatten)]
        booking: BookingArgs,
    },
    /// Rewrite booking fields; the checkboxes are kept
    Edit {
        id: String,
        #[command(flatten)]
        changes: BookingEditArgs,
    },
    Delete {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Set or toggle a checkbox
    Flag {
        id: String,
        #[arg(value_enum)]
        flag: LessonFlagArg,
        /// Explicit value; toggles when omitted
        #[arg(long)]
        set: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PaymentAction {
    Add {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        part: String,
        #[arg(long, default_value = "")]
        lesson_type: String,
        /// Whole won, commas allowed
        #[arg(long, value_parser = parse_formatted_number)]
        amount: u64,
        /// card|transfer|cash
        #[arg(long, default_value = "card")]
        method: PaymentMethod,
    },
    /// Rewrite fields of a payment; omitted fields and checkboxes are kept
    Edit {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        part: Option<String>,
        #[arg(long)]
        lesson_type: Option<String>,
        #[arg(long, value_parser = parse_formatted_number)]
        amount: Option<u64>,
        #[arg(long)]
        method: Option<PaymentMethod>,
    },
    Delete {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Set or toggle a bookkeeping checkbox
    Flag {
        id: String,
        #[arg(value_enum)]
        flag: PaymentFlagArg,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Explicit value; toggles when omitted
        #[arg(long)]
        set: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExpenseAction {
    Add {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_formatted_number)]
        amount: u64,
        #[arg(long, default_value = "")]
        description: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_formatted_number)]
        amount: Option<u64>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShoppingAction {
    Add {
        #[arg(long)]
        date: Option<NaiveDate>,
        text: String,
    },
    Edit {
        id: String,
        text: String,
    },
    Toggle {
        id: String,
    },
    Delete {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
pub enum NoticeAction {
    /// Standing instructions carried forward
    Fixed {
        #[arg(long)]
        date: Option<NaiveDate>,
        text: String,
    },
    /// Hand-over notes for the day
    New {
        #[arg(long)]
        date: Option<NaiveDate>,
        text: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonFlagArg {
    Paid,
    Form,
}

impl From<LessonFlagArg> for FirstLessonFlag {
    fn from(value: LessonFlagArg) -> Self {
        match value {
            LessonFlagArg::Paid => Self::Paid,
            LessonFlagArg::Form => Self::FormSubmitted,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFlagArg {
    Clbiz,
    Journal,
}

impl From<PaymentFlagArg> for PaymentFlag {
    fn from(value: PaymentFlagArg) -> Self {
        match value {
            PaymentFlagArg::Clbiz => Self::Clbiz,
            PaymentFlagArg::Journal => Self::Journal,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSection {
    Consultations,
    Reservations,
    FirstLessons,
    Payments,
    Expenses,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
