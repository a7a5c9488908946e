use checkout_hex::config::Config;
use checkout_repo::{build_repo, Repo};
use checkout_types::domain::quote::{Quote, QuoteId};
use checkout_types::ports::cart_repository::{CartRepository, CartTotalRepository};
use std::env;

#[tokio::test]
async fn builds_memory_repo_and_config_from_env() {
    env::set_var("SERVER_PORT", "4010");
    env::set_var("STORE_ID", "2");
    env::set_var("WEBSITE_ID", "3");

    let config = Config::from_env().expect("config");
    assert_eq!(config.server_port, "4010");
    let store = config.store();
    assert_eq!(store.store_id, 2);
    assert_eq!(store.website_id, 3);

    let repo: Repo = build_repo();
    let saved = CartRepository::save(&repo, Quote::new()).await.expect("save");
    let id = saved.id.expect("assigned id");
    assert_eq!(id, QuoteId(1));

    let totals = CartTotalRepository::get(&repo, id)
        .await
        .expect("totals")
        .expect("present");
    assert_eq!(totals.grand_total_cents, 0);
}
