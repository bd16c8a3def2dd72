use serde::{Deserialize, Serialize};

/// A customer of the business.
///
/// The primary key is chosen by the operator when the record is created;
/// it is never generated by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// The optional one-to-one record attached to a customer.
///
/// Shares the customer's primary key: a details row with id `n` belongs to
/// the customer with id `n`, and never exists without it. All three text
/// attributes are optional; blank input is stored as the null marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub id: i32,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl CustomerDetails {
    /// Builds a details record, normalising blank optional input to absent.
    pub fn new(
        id: i32,
        address: Option<String>,
        phone: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id,
            address: blank_to_none(address),
            phone: blank_to_none(phone),
            notes: blank_to_none(notes),
        }
    }
}

/// A sales agent. Same shape and rules as `Customer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesAgent {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// A courier. The phone number is optional; blank input is stored as the
/// null marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Courier {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
}

impl Courier {
    /// Builds a courier, normalising a blank phone number to absent.
    pub fn new(id: i32, name: String, phone: Option<String>) -> Self {
        Self {
            id,
            name,
            phone: blank_to_none(phone),
        }
    }
}

/// The inner join of a customer and its details row, used for bulk display.
/// Read-only: this type is derived from the two stored entities and is never
/// written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFullView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl CustomerFullView {
    /// Joins a customer with its details row into a single display record.
    pub fn from_parts(customer: &Customer, details: &CustomerDetails) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.clone(),
            address: details.address.clone(),
            phone: details.phone.clone(),
            notes: details.notes.clone(),
        }
    }
}

/// Treats empty-or-whitespace text as absent.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
