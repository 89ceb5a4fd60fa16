//! Select expression construction.
//!
//! The catalog document is one JSON array, which S3 Select sees as
//! `S3Object[*]` wrapping that array, so every expression selects from
//! `S3Object[*][*]`. Only `select` statements are built here.
//!
//! Values are placed in single-quoted literals with embedded quotes doubled.
//! Values without a `'` produce exactly the text they would with plain
//! interpolation.

use crate::domain::DragonFilter;

/// Expression that selects every dragon.
pub const BASE_EXPRESSION: &str = "select * from S3Object[*][*] s";

/// Path of the family field within a record.
pub const FAMILY_FIELD: &str = "s.family_str";

/// Path of the name field within a record.
pub const NAME_FIELD: &str = "s.dragon_name_str";

/// Build the list expression for `filter`.
///
/// - no fields: [`BASE_EXPRESSION`]
/// - family only: `... where s.family_str = 'Red'`
/// - name only: `... where s.dragon_name_str = 'Bahamethut'`
/// - both: `... where s.family_str = 'Red' or s.dragon_name_str = 'Bahamethut'`
///
/// The combined form is a union. Family is always emitted first.
#[must_use]
pub fn list_expression(filter: &DragonFilter) -> String {
    let mut expression = String::from(BASE_EXPRESSION);
    let mut joiner = " where ";

    if let Some(family) = &filter.family {
        push_equals(&mut expression, joiner, FAMILY_FIELD, family);
        joiner = " or ";
    }

    if let Some(name) = &filter.dragon_name {
        push_equals(&mut expression, joiner, NAME_FIELD, name);
    }

    expression
}

/// Build the expression that matches dragons named `name`.
#[must_use]
pub fn name_expression(name: &str) -> String {
    let mut expression = String::from(BASE_EXPRESSION);
    push_equals(&mut expression, " where ", NAME_FIELD, name);
    expression
}

fn push_equals(expression: &mut String, joiner: &str, field: &str, value: &str) {
    expression.push_str(joiner);
    expression.push_str(field);
    expression.push_str(" = ");
    expression.push_str(&quote_literal(value));
}

/// Quote `value` as a string literal, doubling embedded single quotes.
#[must_use]
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
