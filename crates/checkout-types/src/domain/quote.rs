use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::store::StoreId;

pub type CustomerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(pub u64);

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shipping address of a cart, including the selected method and its amount.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Address {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub street: Vec<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postcode: Option<String>,
    pub country_id: Option<String>,
    pub telephone: Option<String>,
    pub shipping_method: Option<String>,
    pub collect_shipping_rates: bool,
    pub shipping_amount_cents: i64,
}

impl Address {
    pub fn new(country_id: impl Into<String>, postcode: impl Into<String>) -> Self {
        Self {
            country_id: Some(country_id.into()),
            postcode: Some(postcode.into()),
            ..Self::default()
        }
    }

    pub fn set_collect_shipping_rates(&mut self, collect: bool) -> &mut Self {
        self.collect_shipping_rates = collect;
        self
    }

    pub fn set_shipping_method(&mut self, method: impl Into<String>) -> &mut Self {
        self.shipping_method = Some(method.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteItem {
    pub sku: String,
    pub qty: u32,
    pub unit_price_cents: i64,
    /// Whole percent applied to the row total.
    #[serde(default)]
    pub tax_percent: u32,
}

impl QuoteItem {
    pub fn row_total_cents(&self) -> i64 {
        i64::from(self.qty) * self.unit_price_cents
    }

    pub fn row_tax_cents(&self) -> i64 {
        (self.row_total_cents() * i64::from(self.tax_percent) + 50) / 100
    }
}

/// A rate quoted by a carrier for this cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingRate {
    pub carrier_code: String,
    pub method_code: String,
    pub price_cents: i64,
}

impl ShippingRate {
    /// `<carrier>_<method>`, the form stored on the shipping address.
    pub fn code(&self) -> String {
        format!("{}_{}", self.carrier_code, self.method_code)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteTotals {
    pub items_qty: u32,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub tax_cents: i64,
    pub grand_total_cents: i64,
}

/// An in-progress cart. The cart repository and the checkout session share it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub id: Option<QuoteId>,
    pub is_active: bool,
    pub reserved_order_id: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub customer_is_guest: bool,
    pub is_checkout_cart: bool,
    pub store_id: Option<StoreId>,
    pub is_virtual: bool,
    pub items: Vec<QuoteItem>,
    pub shipping_address: Option<Address>,
    pub shipping_rates: Vec<ShippingRate>,
    pub totals: QuoteTotals,
    pub totals_collected: bool,
    pub updated_at: DateTime<Utc>,
}

impl Default for Quote {
    fn default() -> Self {
        Self::new()
    }
}

impl Quote {
    /// A fresh, unsaved, active quote.
    pub fn new() -> Self {
        Self {
            id: None,
            is_active: true,
            reserved_order_id: None,
            customer_id: None,
            customer_is_guest: false,
            is_checkout_cart: false,
            store_id: None,
            is_virtual: false,
            items: Vec::new(),
            shipping_address: None,
            shipping_rates: Vec::new(),
            totals: QuoteTotals::default(),
            totals_collected: false,
            updated_at: Utc::now(),
        }
    }

    pub fn with_id(id: QuoteId) -> Self {
        Self {
            id: Some(id),
            ..Self::new()
        }
    }

    pub fn items_count(&self) -> usize {
        self.items.len()
    }

    pub fn items_qty(&self) -> u32 {
        self.items.iter().map(|it| it.qty).sum()
    }

    /// Makes an ordered quote usable as a cart again.
    pub fn reactivate(&mut self) {
        self.is_active = true;
        self.reserved_order_id = None;
    }

    pub fn set_customer(&mut self, customer_id: Option<CustomerId>) {
        self.customer_id = customer_id;
    }

    pub fn set_shipping_address(&mut self, address: Address) {
        self.shipping_address = Some(address);
    }

    pub fn shipping_address_mut(&mut self) -> &mut Address {
        self.shipping_address.get_or_insert_with(Address::default)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Recomputes the cart totals.
    ///
    /// Shipping rates are only re-read when the shipping address asks for it; the
    /// request flag is consumed. Virtual carts never carry shipping.
    pub fn collect_totals(&mut self) -> &QuoteTotals {
        let subtotal: i64 = self.items.iter().map(QuoteItem::row_total_cents).sum();
        let tax: i64 = self.items.iter().map(QuoteItem::row_tax_cents).sum();

        let rates = &self.shipping_rates;
        let shipping = match self.shipping_address.as_mut() {
            Some(_) if self.is_virtual => 0,
            Some(address) => {
                if address.collect_shipping_rates {
                    address.shipping_amount_cents = address
                        .shipping_method
                        .as_deref()
                        .and_then(|method| rates.iter().find(|r| r.code() == method))
                        .map(|r| r.price_cents)
                        .unwrap_or(0);
                    address.collect_shipping_rates = false;
                }
                address.shipping_amount_cents
            }
            None => 0,
        };

        self.totals = QuoteTotals {
            items_qty: self.items_qty(),
            subtotal_cents: subtotal,
            shipping_cents: shipping,
            tax_cents: tax,
            grand_total_cents: subtotal + shipping + tax,
        };
        self.totals_collected = true;
        &self.totals
    }
}
