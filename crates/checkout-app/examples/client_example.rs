///  To run :
///  cargo r --example client_example
use checkout_client::CheckoutClient;
use checkout_hex::application::totals_information::{
    GuestTotalsInformationManagement, TotalsInformationManagement,
};
use checkout_hex::inbound::http::{HttpServer, HttpServerConfig};
use checkout_repo::build_repo;
use checkout_types::domain::mask::QuoteIdMask;
use checkout_types::domain::quote::{Quote, QuoteId, QuoteItem, ShippingRate};
use checkout_types::domain::totals::{ShippingDestination, TotalsInformation};
use checkout_types::ports::cart_repository::CartRepository;
use checkout_types::ports::quote_id_mask::QuoteIdMaskRepository;
use reqwest::StatusCode;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    // Seed one cart with two items and a flat rate, plus a guest mask for it.
    let repo = build_repo();
    let mut cart = Quote::new();
    cart.items.push(QuoteItem {
        sku: "WIDGET".into(),
        qty: 2,
        unit_price_cents: 500,
        tax_percent: 10,
    });
    cart.shipping_rates.push(ShippingRate {
        carrier_code: "flatrate".into(),
        method_code: "flatrate".into(),
        price_cents: 300,
    });
    let cart = CartRepository::save(&repo, cart).await?;
    let cart_id = cart.id.unwrap_or(QuoteId(1));
    let mask = QuoteIdMaskRepository::save(&repo, QuoteIdMask::new(cart_id)).await?;

    let service = GuestTotalsInformationManagement::new(
        repo.clone(),
        TotalsInformationManagement::new(repo.clone(), repo),
    );
    let server = HttpServer::new(
        service,
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = CheckoutClient::new(&addr)?;
    println!("Health: {:?}", client.health().await?);

    let info = TotalsInformation::new(ShippingDestination::new("DE", "10115"));
    let estimate = client.estimate_totals(cart_id, &info).await?;
    println!(
        "Without method: subtotal={} shipping={} grand_total={}",
        estimate.subtotal_cents, estimate.shipping_cents, estimate.grand_total_cents
    );

    let info = info.with_shipping(Some("flatrate"), Some("flatrate"));
    if let Some(masked_id) = mask.masked_id.as_deref() {
        let estimate = client.estimate_guest_totals(masked_id, &info).await?;
        println!(
            "Guest with {:?}: shipping={} grand_total={}",
            estimate.shipping_method, estimate.shipping_cents, estimate.grand_total_cents
        );
    }

    match client.estimate_totals(QuoteId(999), &info).await {
        Ok(_) => println!("Unexpected estimate for unknown cart"),
        Err(err) => {
            let status = err
                .downcast_ref::<reqwest::Error>()
                .and_then(|e| e.status());
            assert_eq!(status, Some(StatusCode::NOT_FOUND));
            println!("Unknown cart returned 404");
        }
    }

    handle.abort();
    Ok(())
}
