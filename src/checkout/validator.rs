//! Checkout Validator
//!
//! Gates order submission on structurally valid input. Whole-object
//! validation and live per-field validation share the same rule table, and
//! both keep a field-keyed error map up to date for display.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::checkout::{
    form::{CheckoutFormData, PaymentMethod},
    schema::{Field, Schema},
};
use crate::pricing::ShippingOption;

/// Field-keyed validation messages; one message per field, the first violated rule.
pub type FieldErrors = BTreeMap<Field, String>;

/// Checkout data that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCheckout {
    /// Customer name, trimmed. Empty when an identity supplies it.
    pub customer_name: String,

    /// Customer email, trimmed. Empty when an identity supplies it.
    pub customer_email: String,

    /// Customer phone, trimmed. Empty when an identity supplies it.
    pub customer_phone: String,

    /// Delivery address.
    pub shipping_address: String,

    /// Billing address; the shipping address when billing is the same.
    pub billing_address: Option<String>,

    /// Chosen payment method.
    pub payment_method: PaymentMethod,

    /// Chosen shipping option.
    pub shipping_option: ShippingOption,

    /// Notes, if any were given.
    pub notes: Option<String>,
}

/// Validates checkout input and tracks per-field errors.
#[derive(Debug, Clone, Default)]
pub struct CheckoutValidator {
    schema: Schema,
    errors: FieldErrors,
}

impl CheckoutValidator {
    /// A validator for the given schema with no errors recorded.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            errors: FieldErrors::new(),
        }
    }

    /// The schema this validator applies.
    #[must_use]
    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Current error map.
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validate a whole form object.
    ///
    /// Replaces the error map with the result. Anything that is not a JSON
    /// object is treated as an empty one.
    ///
    /// # Errors
    ///
    /// Returns the field-keyed messages when any field violates its rules.
    pub fn validate(&mut self, data: &Value) -> Result<ValidCheckout, FieldErrors> {
        self.errors = check_all(self.schema, data);

        if !self.errors.is_empty() {
            return Err(self.errors.clone());
        }

        Ok(parse_valid(data))
    }

    /// Validate one field as a partial object and update its entry in the error map.
    ///
    /// Fields outside the schema are never in error. Returns the field's
    /// message, if any.
    pub fn validate_field(&mut self, field: Field, value: &Value) -> Option<&str> {
        self.clear_field_error(field);

        if !self.schema.includes(field) {
            return None;
        }

        let message = field.check(Some(value))?;

        self.errors.insert(field, message.to_string());

        self.errors.get(&field).map(String::as_str)
    }

    /// Drop a field's entry from the error map.
    pub fn clear_field_error(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    /// Overall form validity: the schema passes and the terms were accepted.
    ///
    /// Does not touch the error map.
    #[must_use]
    pub fn is_form_valid(&self, data: &Value, agreed_to_terms: bool) -> bool {
        agreed_to_terms && check_all(self.schema, data).is_empty()
    }

    /// Validate typed form data.
    ///
    /// # Errors
    ///
    /// Returns the field-keyed messages when any field violates its rules.
    pub fn validate_form(&mut self, form: &CheckoutFormData) -> Result<ValidCheckout, FieldErrors> {
        self.validate(&form.to_value())
    }
}

fn check_all(schema: Schema, data: &Value) -> FieldErrors {
    let empty = Map::new();
    let object = data.as_object().unwrap_or(&empty);

    schema
        .fields()
        .filter_map(|field| {
            field
                .check(object.get(field.name()))
                .map(|message| (field, message.to_string()))
        })
        .collect()
}

fn parse_valid(data: &Value) -> ValidCheckout {
    let text = |field: Field| {
        data.get(field.name())
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    };

    let optional = |field: Field| Some(text(field)).filter(|value| !value.is_empty());

    let shipping_address = text(Field::ShippingAddress);
    let same_as_shipping = data
        .get("same_as_shipping")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let billing_address = if same_as_shipping {
        Some(shipping_address.clone())
    } else {
        optional(Field::BillingAddress)
    };

    ValidCheckout {
        customer_name: text(Field::CustomerName),
        customer_email: text(Field::CustomerEmail),
        customer_phone: text(Field::CustomerPhone),
        billing_address,
        shipping_address,
        payment_method: text(Field::PaymentMethod).parse().unwrap_or_default(),
        shipping_option: text(Field::ShippingOption).parse().unwrap_or_default(),
        notes: optional(Field::Notes),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn valid_form() -> Value {
        json!({
            "customer_name": "Ana Vera",
            "customer_email": "ana@example.com",
            "customer_phone": "+593 99 123 4567",
            "shipping_address": "Av. Amazonas N34-12, Quito",
            "payment_method": "bank_transfer",
            "shipping_option": "express",
        })
    }

    #[test]
    fn validate_empty_object_reports_every_required_field() {
        let mut validator = CheckoutValidator::new(Schema::Full);

        let errors = validator.validate(&json!({})).err().unwrap_or_default();

        let fields: Vec<Field> = errors.keys().copied().collect();

        assert_eq!(
            fields,
            vec![
                Field::CustomerName,
                Field::CustomerEmail,
                Field::CustomerPhone,
                Field::ShippingAddress,
                Field::PaymentMethod,
                Field::ShippingOption,
            ]
        );
        assert_eq!(validator.errors(), &errors);
    }

    #[test]
    fn validate_valid_object_succeeds_without_errors() -> TestResult {
        let mut validator = CheckoutValidator::new(Schema::Full);

        let valid = validator.validate(&valid_form()).map_err(|errors| format!("{errors:?}"))?;

        assert!(validator.errors().is_empty());
        assert_eq!(valid.customer_name, "Ana Vera");
        assert_eq!(valid.payment_method, PaymentMethod::BankTransfer);
        assert_eq!(valid.shipping_option, ShippingOption::Express);
        assert_eq!(valid.billing_address, None);
        assert_eq!(valid.notes, None);

        Ok(())
    }

    #[test]
    fn validate_resolves_billing_to_shipping_when_same() -> TestResult {
        let mut validator = CheckoutValidator::new(Schema::Full);
        let mut form = valid_form();

        if let Some(object) = form.as_object_mut() {
            object.insert("same_as_shipping".to_string(), json!(true));
            object.insert("billing_address".to_string(), json!("Somewhere else"));
        }

        let valid = validator.validate(&form).map_err(|errors| format!("{errors:?}"))?;

        assert_eq!(valid.billing_address.as_deref(), Some("Av. Amazonas N34-12, Quito"));

        Ok(())
    }

    #[test]
    fn validate_field_adds_and_removes_entries() {
        let mut validator = CheckoutValidator::new(Schema::Full);

        assert_eq!(
            validator.validate_field(Field::CustomerEmail, &json!("not-an-email")),
            Some("Enter a valid email address")
        );
        assert!(validator.errors().contains_key(&Field::CustomerEmail));

        assert_eq!(
            validator.validate_field(Field::CustomerEmail, &json!("ok@example.com")),
            None
        );
        assert!(!validator.errors().contains_key(&Field::CustomerEmail));
    }

    #[test]
    fn validate_field_leaves_other_entries_alone() {
        let mut validator = CheckoutValidator::new(Schema::Full);

        let _errors = validator.validate(&json!({}));

        validator.validate_field(Field::CustomerName, &json!("Ana"));

        assert!(!validator.errors().contains_key(&Field::CustomerName));
        assert!(validator.errors().contains_key(&Field::CustomerPhone));
    }

    #[test]
    fn clear_field_error_removes_entry() {
        let mut validator = CheckoutValidator::new(Schema::Full);

        let _errors = validator.validate(&json!({}));

        validator.clear_field_error(Field::ShippingAddress);

        assert!(!validator.errors().contains_key(&Field::ShippingAddress));
        assert_eq!(validator.errors().len(), 5);
    }

    #[test]
    fn identified_schema_ignores_identity_fields() -> TestResult {
        let mut validator = CheckoutValidator::new(Schema::Identified);

        let valid = validator.validate(&json!({
            "shipping_address": "Calle Larga 4-56, Cuenca",
            "payment_method": "cash_on_delivery",
            "shipping_option": "pickup",
        })).map_err(|errors| format!("{errors:?}"))?;

        assert_eq!(valid.shipping_address, "Calle Larga 4-56, Cuenca");
        assert_eq!(
            validator.validate_field(Field::CustomerEmail, &json!("nope")),
            None
        );

        Ok(())
    }

    #[test]
    fn form_validity_requires_terms() {
        let validator = CheckoutValidator::new(Schema::Full);

        assert!(validator.is_form_valid(&valid_form(), true));
        assert!(!validator.is_form_valid(&valid_form(), false));
        assert!(!validator.is_form_valid(&json!({}), true));
    }

    #[test]
    fn validate_form_checks_typed_data() {
        let mut validator = CheckoutValidator::new(Schema::Full);

        let result = validator.validate_form(&CheckoutFormData::new());

        let errors = result.err().unwrap_or_default();

        assert!(errors.contains_key(&Field::CustomerName));
        assert!(!errors.contains_key(&Field::PaymentMethod));
    }
}
