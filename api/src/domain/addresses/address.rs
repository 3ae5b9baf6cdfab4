use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: i64,
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub is_default: bool,
    pub customer_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-editable part of an address, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFields {
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
}

impl Address {
    pub fn apply(&mut self, fields: &AddressFields) {
        self.street1 = fields.street1.clone();
        self.street2 = fields.street2.clone();
        self.city = fields.city.clone();
        self.zip = fields.zip.clone();
        self.country = fields.country.clone();
    }
}
