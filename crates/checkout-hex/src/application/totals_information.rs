use checkout_types::domain::quote::QuoteId;
use checkout_types::domain::totals::{TotalsInformation, TotalsSnapshot};
use checkout_types::ports::cart_repository::{CartRepository, CartTotalRepository};
use checkout_types::ports::quote_id_mask::QuoteIdMaskRepository;

use crate::errors::AppError;

/// Estimates cart totals for a shipping destination.
pub struct TotalsInformationManagement<C: CartRepository, T: CartTotalRepository> {
    carts: C,
    totals: T,
}

impl<C: CartRepository, T: CartTotalRepository> TotalsInformationManagement<C, T> {
    pub fn new(carts: C, totals: T) -> Self {
        Self { carts, totals }
    }

    /// Applies the address, pins the shipping method when both codes are given,
    /// recollects totals and returns the fresh snapshot.
    ///
    /// Empty and virtual carts take the same path.
    pub async fn calculate(
        &self,
        cart_id: QuoteId,
        info: TotalsInformation,
    ) -> Result<TotalsSnapshot, AppError> {
        let mut cart = self
            .carts
            .get(cart_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("cart {}", cart_id)))?;
        tracing::debug!(
            %cart_id,
            items_count = cart.items_count(),
            is_virtual = cart.is_virtual,
            "estimating totals"
        );

        let shipping_method = info.shipping_method();
        cart.set_shipping_address(info.address.into());
        match shipping_method {
            Some(method) => {
                cart.shipping_address_mut()
                    .set_collect_shipping_rates(true)
                    .set_shipping_method(method);
            }
            None => tracing::debug!(%cart_id, "no shipping method selected"),
        }
        cart.collect_totals();
        self.carts.save(cart).await?;

        self.totals
            .get(cart_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("totals for cart {}", cart_id)))
    }
}

/// Totals estimate addressed by the masked id handed to guests.
pub struct GuestTotalsInformationManagement<M, C, T>
where
    M: QuoteIdMaskRepository,
    C: CartRepository,
    T: CartTotalRepository,
{
    masks: M,
    inner: TotalsInformationManagement<C, T>,
}

impl<M, C, T> GuestTotalsInformationManagement<M, C, T>
where
    M: QuoteIdMaskRepository,
    C: CartRepository,
    T: CartTotalRepository,
{
    pub fn new(masks: M, inner: TotalsInformationManagement<C, T>) -> Self {
        Self { masks, inner }
    }

    pub fn inner(&self) -> &TotalsInformationManagement<C, T> {
        &self.inner
    }

    pub async fn calculate(
        &self,
        masked_id: &str,
        info: TotalsInformation,
    ) -> Result<TotalsSnapshot, AppError> {
        let mask = self
            .masks
            .load_by_masked_id(masked_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("cart {}", masked_id)))?;
        self.inner.calculate(mask.quote_id, info).await
    }
}
