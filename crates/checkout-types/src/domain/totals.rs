use serde::{Deserialize, Serialize};

use crate::domain::quote::{Address, Quote, QuoteId};

/// Postal part of a shipping address as accepted from callers.
///
/// Carries no shipping method or amount; those are only ever set by the cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShippingDestination {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub street: Vec<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postcode: Option<String>,
    pub country_id: Option<String>,
    pub telephone: Option<String>,
}

impl ShippingDestination {
    pub fn new(country_id: impl Into<String>, postcode: impl Into<String>) -> Self {
        Self {
            country_id: Some(country_id.into()),
            postcode: Some(postcode.into()),
            ..Self::default()
        }
    }
}

impl From<ShippingDestination> for Address {
    fn from(dest: ShippingDestination) -> Self {
        Address {
            firstname: dest.firstname,
            lastname: dest.lastname,
            street: dest.street,
            city: dest.city,
            region: dest.region,
            postcode: dest.postcode,
            country_id: dest.country_id,
            telephone: dest.telephone,
            ..Address::default()
        }
    }
}

/// Input of a totals estimate: where the cart ships and, optionally, how.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TotalsInformation {
    pub address: ShippingDestination,
    #[serde(default)]
    pub shipping_carrier_code: Option<String>,
    #[serde(default)]
    pub shipping_method_code: Option<String>,
}

impl TotalsInformation {
    pub fn new(address: ShippingDestination) -> Self {
        Self {
            address,
            shipping_carrier_code: None,
            shipping_method_code: None,
        }
    }

    pub fn with_shipping(mut self, carrier_code: Option<&str>, method_code: Option<&str>) -> Self {
        self.shipping_carrier_code = carrier_code.map(str::to_string);
        self.shipping_method_code = method_code.map(str::to_string);
        self
    }

    /// `<carrier>_<method>` when both codes are present and non-empty.
    pub fn shipping_method(&self) -> Option<String> {
        let carrier = non_empty(&self.shipping_carrier_code)?;
        let method = non_empty(&self.shipping_method_code)?;
        Some(format!("{carrier}_{method}"))
    }
}

fn non_empty(code: &Option<String>) -> Option<&str> {
    code.as_deref().filter(|c| !c.is_empty())
}

/// Computed breakdown of a cart at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TotalsSnapshot {
    pub cart_id: QuoteId,
    pub items_qty: u32,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub tax_cents: i64,
    pub grand_total_cents: i64,
    pub shipping_method: Option<String>,
}

impl TotalsSnapshot {
    pub fn from_quote(cart_id: QuoteId, quote: &Quote) -> Self {
        let totals = &quote.totals;
        Self {
            cart_id,
            items_qty: totals.items_qty,
            subtotal_cents: totals.subtotal_cents,
            shipping_cents: totals.shipping_cents,
            tax_cents: totals.tax_cents,
            grand_total_cents: totals.grand_total_cents,
            shipping_method: quote
                .shipping_address
                .as_ref()
                .and_then(|a| a.shipping_method.clone()),
        }
    }
}
