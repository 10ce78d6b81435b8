//! Built-in custom field types.
//!
//! A type decides two things the compiler cares about: which value table
//! stores the field's values and which filter operators make sense on it.

use super::operator::Operator;

use Operator as Op;

/// Storage class of a field value. One value table exists per storage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Text,
    DateTime,
    Option,
}

impl ValueKind {
    /// Unprefixed name of the value table.
    pub fn table_name(&self) -> &'static str {
        match self {
            ValueKind::Int => "custom_field_value_int",
            ValueKind::Text => "custom_field_value_text",
            ValueKind::DateTime => "custom_field_value_datetime",
            ValueKind::Option => "custom_field_value_option",
        }
    }
}

/// Field types registered by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Country,
    Date,
    DateTime,
    Email,
    Hidden,
    Int,
    Phone,
    Select,
    MultiSelect,
    Text,
    Textarea,
    Url,
}

const ALL: [FieldType; 12] = [
    FieldType::Country,
    FieldType::Date,
    FieldType::DateTime,
    FieldType::Email,
    FieldType::Hidden,
    FieldType::Int,
    FieldType::Phone,
    FieldType::Select,
    FieldType::MultiSelect,
    FieldType::Text,
    FieldType::Textarea,
    FieldType::Url,
];

const NUMERIC_OPERATORS: &[Operator] = &[
    Op::Eq,
    Op::Neq,
    Op::Gt,
    Op::Gte,
    Op::Lt,
    Op::Lte,
    Op::Empty,
    Op::NotEmpty,
    Op::In,
    Op::NotIn,
];
const DATE_OPERATORS: &[Operator] = &[
    Op::Eq,
    Op::Neq,
    Op::Gt,
    Op::Gte,
    Op::Lt,
    Op::Lte,
    Op::Empty,
    Op::NotEmpty,
];
const TEXT_OPERATORS: &[Operator] = &[
    Op::Eq,
    Op::Neq,
    Op::Empty,
    Op::NotEmpty,
    Op::Like,
    Op::NotLike,
    Op::StartsWith,
    Op::EndsWith,
    Op::Contains,
    Op::In,
    Op::NotIn,
    Op::Regexp,
    Op::NotRegexp,
];
const CHOICE_OPERATORS: &[Operator] = &[
    Op::Eq,
    Op::Neq,
    Op::Empty,
    Op::NotEmpty,
    Op::In,
    Op::NotIn,
];
const MULTI_CHOICE_OPERATORS: &[Operator] = &[
    Op::Empty,
    Op::NotEmpty,
    Op::In,
    Op::NotIn,
];

impl FieldType {
    pub fn all() -> &'static [FieldType] {
        &ALL
    }

    /// Key used in stored field definitions and segment filters.
    pub fn key(&self) -> &'static str {
        match self {
            FieldType::Country => "country",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Email => "email",
            FieldType::Hidden => "hidden",
            FieldType::Int => "int",
            FieldType::Phone => "phone",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multiselect",
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Url => "url",
        }
    }

    pub fn from_key(key: &str) -> Option<FieldType> {
        ALL.iter().copied().find(|t| t.key() == key)
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            FieldType::Int => ValueKind::Int,
            FieldType::Date | FieldType::DateTime => ValueKind::DateTime,
            FieldType::Select | FieldType::MultiSelect => ValueKind::Option,
            FieldType::Country
            | FieldType::Email
            | FieldType::Hidden
            | FieldType::Phone
            | FieldType::Text
            | FieldType::Textarea
            | FieldType::Url => ValueKind::Text,
        }
    }

    /// Operators a segment filter may use on this type.
    pub fn operators(&self) -> &'static [Operator] {
        match self {
            FieldType::Int => NUMERIC_OPERATORS,
            FieldType::Date | FieldType::DateTime => DATE_OPERATORS,
            FieldType::Select | FieldType::Country => CHOICE_OPERATORS,
            FieldType::MultiSelect => MULTI_CHOICE_OPERATORS,
            FieldType::Email
            | FieldType::Hidden
            | FieldType::Phone
            | FieldType::Text
            | FieldType::Textarea
            | FieldType::Url => TEXT_OPERATORS,
        }
    }

    pub fn supports(&self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
