use serde_json::Value;

use super::{ValidationErrors, Validator};
use crate::domain::addresses::address::AddressFields;
use crate::domain::catalog::category::CategoryFields;
use crate::domain::catalog::product::ProductFields;

pub fn address_fields(body: &Value) -> Result<AddressFields, ValidationErrors> {
    let mut v = Validator::new(body);
    let street1 = v.required_string("street1");
    let street2 = v.optional_string("street2");
    let city = v.required_string("city");
    let zip = v.required_string("zip");
    let country = v.required_string("country");
    v.finish()?;
    Ok(AddressFields {
        street1,
        street2,
        city,
        zip,
        country,
    })
}

pub fn category_fields(body: &Value) -> Result<CategoryFields, ValidationErrors> {
    let mut v = Validator::new(body);
    let name = v.required_string("name");
    let description = v.required_string("description");
    v.finish()?;
    Ok(CategoryFields { name, description })
}

pub fn product_fields(body: &Value) -> Result<ProductFields, ValidationErrors> {
    let mut v = Validator::new(body);
    let name = v.required_string("name");
    let description = v.required_string("description");
    let category_ids = v.optional_ids("categories");
    v.finish()?;
    Ok(ProductFields {
        name,
        description,
        category_ids,
    })
}

#[derive(Debug, Clone)]
pub struct SettingInput {
    pub key: String,
    pub value: String,
}

pub fn setting_input(body: &Value) -> Result<SettingInput, ValidationErrors> {
    let mut v = Validator::new(body);
    let key = v.required_trimmed("key");
    let value = v.required_string("value");
    v.finish()?;
    Ok(SettingInput { key, value })
}

#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub fn customer_input(body: &Value) -> Result<CustomerInput, ValidationErrors> {
    let mut v = Validator::new(body);
    let email = v.required_trimmed("email");
    v.email("email", &email);
    let first_name = v.required_string("first_name");
    v.alpha("first_name", &first_name);
    let last_name = v.required_string("last_name");
    v.alpha("last_name", &last_name);
    v.finish()?;
    Ok(CustomerInput {
        email,
        first_name,
        last_name,
    })
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

pub fn register_input(body: &Value) -> Result<RegisterInput, ValidationErrors> {
    let mut v = Validator::new(body);
    let email = v.required_trimmed("email");
    v.email("email", &email);
    let password = v.required_string("password");
    let role = v.optional_string("role");
    if let Some(r) = role.as_deref() {
        if crate::domain::users::user::Role::parse(r).is_none() {
            v.reject("enum", "role");
        }
    }
    v.finish()?;
    Ok(RegisterInput {
        email,
        password,
        role,
    })
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub fn credentials(body: &Value) -> Result<Credentials, ValidationErrors> {
    let mut v = Validator::new(body);
    let email = v.required_trimmed("email");
    let password = v.required_string("password");
    v.finish()?;
    Ok(Credentials { email, password })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn address_requires_the_four_main_fields_in_order() {
        let errors = address_fields(&json!({})).unwrap_err().0;
        let fields: Vec<_> = errors.iter().filter_map(|e| e.field.as_deref()).collect();
        assert_eq!(fields, ["street1", "city", "zip", "country"]);
        assert!(errors.iter().all(|e| e.code == "required"));
    }

    #[test]
    fn address_street2_is_optional() {
        let fields = address_fields(&json!({
            "street1": "rue de la paix",
            "city": "Paris",
            "zip": "75000",
            "country": "France"
        }))
        .unwrap();
        assert_eq!(fields.street2, None);
        assert_eq!(fields.zip, "75000");
    }

    #[test]
    fn customer_names_must_be_alphabetic() {
        let errors = customer_input(&json!({
            "email": "john@domain.tld",
            "first_name": "John2",
            "last_name": "Doe"
        }))
        .unwrap_err()
        .0;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "alpha");
        assert_eq!(errors[0].field.as_deref(), Some("first_name"));
    }

    #[test]
    fn customer_email_is_trimmed() {
        let input = customer_input(&json!({
            "email": "  john@domain.tld ",
            "first_name": "John",
            "last_name": "Doe"
        }))
        .unwrap();
        assert_eq!(input.email, "john@domain.tld");
    }

    #[test]
    fn register_rejects_unknown_role() {
        let errors = register_input(&json!({
            "email": "john@domain.tld",
            "password": "secret",
            "role": "root"
        }))
        .unwrap_err()
        .0;
        assert_eq!(errors[0].code, "enum");
    }
}
