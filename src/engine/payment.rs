use std::fmt;

use serde::Deserialize;

use crate::error::AppError;
use crate::models::order::PaymentMethod;

/// Card form submitted for a simulated payment. Only the shape of each field
/// is checked; nothing is authorized against a processor.
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentForm {
    pub payment_method: String,
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
}

/// The part of a payment form that is kept after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedPayment {
    pub method: PaymentMethod,
    pub last_four: String,
}

impl fmt::Debug for PaymentForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentForm")
            .field("payment_method", &self.payment_method)
            .field("cardholder_name", &self.cardholder_name)
            .field("card_number", &"<redacted>")
            .field("expiry_date", &self.expiry_date)
            .field("cvv", &"<redacted>")
            .finish()
    }
}

impl PaymentForm {
    pub fn validate(&self) -> Result<AcceptedPayment, AppError> {
        let method = parse_method(&self.payment_method)?;

        if self.cardholder_name.trim().chars().count() < 2 {
            return Err(AppError::validation(
                "cardholderName",
                "must be at least 2 characters",
            ));
        }

        let card_number: String = self
            .card_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if card_number.len() != 16 || !all_digits(&card_number) {
            return Err(AppError::validation("cardNumber", "must be 16 digits"));
        }

        if !valid_expiry(self.expiry_date.trim()) {
            return Err(AppError::validation("expiryDate", "must be in MM/YY format"));
        }

        let cvv = self.cvv.trim();
        if !(3..=4).contains(&cvv.len()) || !all_digits(cvv) {
            return Err(AppError::validation("cvv", "must be 3 or 4 digits"));
        }

        Ok(AcceptedPayment {
            method,
            last_four: card_number[card_number.len() - 4..].to_string(),
        })
    }
}

fn parse_method(raw: &str) -> Result<PaymentMethod, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "credit" => Ok(PaymentMethod::Credit),
        "debit" => Ok(PaymentMethod::Debit),
        "paypal" => Ok(PaymentMethod::Paypal),
        "" => Err(AppError::missing("paymentMethod")),
        other => Err(AppError::validation(
            "paymentMethod",
            format!("unknown method {other}, expected credit/debit/paypal"),
        )),
    }
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn valid_expiry(value: &str) -> bool {
    let Some((month, year)) = value.split_once('/') else {
        return false;
    };
    if month.len() != 2 || year.len() != 2 || !all_digits(month) || !all_digits(year) {
        return false;
    }
    matches!(month.parse::<u8>(), Ok(1..=12))
}

#[cfg(test)]
mod tests {
    use super::PaymentForm;
    use crate::error::AppError;
    use crate::models::order::PaymentMethod;

    fn form() -> PaymentForm {
        PaymentForm {
            payment_method: "credit".to_string(),
            cardholder_name: "John Doe".to_string(),
            card_number: "4111111111111234".to_string(),
            expiry_date: "09/27".to_string(),
            cvv: "123".to_string(),
        }
    }

    fn rejected_field(form: PaymentForm) -> String {
        match form.validate() {
            Err(AppError::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_form_keeps_only_last_four() {
        let accepted = form().validate().unwrap();
        assert_eq!(accepted.method, PaymentMethod::Credit);
        assert_eq!(accepted.last_four, "1234");
    }

    #[test]
    fn card_number_may_be_grouped_with_spaces() {
        let mut grouped = form();
        grouped.card_number = "4111 1111 1111 9876".to_string();
        assert_eq!(grouped.validate().unwrap().last_four, "9876");
    }

    #[test]
    fn each_malformed_field_is_named() {
        let mut bad = form();
        bad.payment_method = "cheque".to_string();
        assert_eq!(rejected_field(bad), "paymentMethod");

        let mut bad = form();
        bad.cardholder_name = "J".to_string();
        assert_eq!(rejected_field(bad), "cardholderName");

        let mut bad = form();
        bad.card_number = "4111-1111".to_string();
        assert_eq!(rejected_field(bad), "cardNumber");

        let mut bad = form();
        bad.expiry_date = "13/27".to_string();
        assert_eq!(rejected_field(bad), "expiryDate");

        let mut bad = form();
        bad.cvv = "12a".to_string();
        assert_eq!(rejected_field(bad), "cvv");
    }

    #[test]
    fn debug_output_hides_card_secrets() {
        let rendered = format!("{:?}", form());
        assert!(!rendered.contains("4111111111111234"));
        assert!(!rendered.contains("\"123\""));
    }
}
