use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use ledger_api::config::Config;
use ledger_api::envelope::Envelope;
use ledger_domain::{AccessScope, AccountAction, TransactionAuthorization, TransactionRequest, TransactionResult};
use ledger_engine::{HistoryProcessor, ProcessorState};
use ledger_store::{SledTransactionStore, TransactionStore};
use log::info;
use rand::RngCore;

const ROOT_ACCOUNT: &str = "@root";

#[tokio::main]
async fn main() {
    env_logger::init();

    Config::load().expect("error loading configuration");
    let config = Config::build().expect("error building configuration");

    let store = SledTransactionStore::open(&config.store_path).expect("failed to open ledger store");
    let transactions = store.scan().expect("failed to read ledger");
    let next_id = transactions.iter().map(|t| t.id).max().map_or(0, |max| max + 1);

    let seeded = ProcessorState::empty().with_root_seeded(ROOT_ACCOUNT);
    let state = HistoryProcessor::new(&store).replay(seeded).expect("failed to replay ledger");
    let root_has_tokens = state.accounts.get(ROOT_ACCOUNT).map(|a| !a.tokens.is_empty()).unwrap_or(false);

    let envelope = Arc::new(Envelope::new(store, state, next_id));

    if !root_has_tokens {
        mint_root_token(&envelope).await;
    }

    let bind_addr: SocketAddr = config.bind_addr.parse().expect("invalid bind address");
    info!("ledger-api listening on {}", bind_addr);

    let routes = ledger_api::routes(Arc::clone(&envelope));
    warp::serve(routes).run(bind_addr).await;
}

async fn mint_root_token(envelope: &Arc<Envelope<SledTransactionStore>>) {
    let token_id = random_token_id();
    let request = TransactionRequest {
        account: ROOT_ACCOUNT.to_string(),
        authorization: TransactionAuthorization::SelfAuthorized,
        access_token: None,
        action: AccountAction::CreateToken { token_id: token_id.clone(), scopes: BTreeSet::from([AccessScope::Unbounded]) },
    };

    match envelope.apply_trusted(request).await {
        Ok(TransactionResult::AccessToken { id }) => {
            println!("Root tokens:");
            println!("- {} unbounded", id);
        }
        Ok(other) => panic!("unexpected result minting root token: {:?}", other),
        Err(err) => panic!("failed to mint root token: {:?}", err),
    }
}

fn random_token_id() -> String {
    let mut bytes = [0u8; 40];
    rand::thread_rng().fill_bytes(&mut bytes);
    general_purpose::STANDARD.encode(bytes)
}
