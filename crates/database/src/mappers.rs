//! Row mappers: pure projections between result rows and entity values.
//!
//! The column contract is fixed by the schema: `id`, `nombre`, `email`,
//! `direccion`, `telefono`, `notas`. Every repository materialises its rows
//! through the single mapper for its entity.

use core_types::{Courier, Customer, CustomerDetails, SalesAgent};
use sqlx::Row;
use sqlx::postgres::PgRow;

pub fn customer_from_row(row: &PgRow) -> Result<Customer, sqlx::Error> {
    Ok(Customer {
        id: row.try_get("id")?,
        name: row.try_get("nombre")?,
        email: row.try_get("email")?,
    })
}

pub fn details_from_row(row: &PgRow) -> Result<CustomerDetails, sqlx::Error> {
    Ok(CustomerDetails {
        id: row.try_get("id")?,
        address: row.try_get("direccion")?,
        phone: row.try_get("telefono")?,
        notes: row.try_get("notas")?,
    })
}

pub fn agent_from_row(row: &PgRow) -> Result<SalesAgent, sqlx::Error> {
    Ok(SalesAgent {
        id: row.try_get("id")?,
        name: row.try_get("nombre")?,
        email: row.try_get("email")?,
    })
}

pub fn courier_from_row(row: &PgRow) -> Result<Courier, sqlx::Error> {
    Ok(Courier {
        id: row.try_get("id")?,
        name: row.try_get("nombre")?,
        phone: row.try_get("telefono")?,
    })
}

/// Prepares an optional text field for binding.
///
/// A null or all-whitespace value is bound as SQL NULL, never as an empty
/// string; a real value is bound unchanged.
pub fn text_param(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_param_binds_null_for_blank_input() {
        assert_eq!(text_param(None), None);
        assert_eq!(text_param(Some("")), None);
        assert_eq!(text_param(Some("   ")), None);
        assert_eq!(text_param(Some("\t\n")), None);
    }

    #[test]
    fn text_param_passes_real_values_through_unchanged() {
        assert_eq!(text_param(Some("600111222")), Some("600111222"));
        assert_eq!(text_param(Some(" padded ")), Some(" padded "));
    }
}
