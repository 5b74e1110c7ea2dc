//! The HTTP service envelope (C6): config loading, the reader/writer-locked
//! ledger state, and the `warp` routes that front it.

pub mod config;
pub mod credential;
pub mod envelope;
pub mod handler;

use std::sync::Arc;

use ledger_domain::TransactionRequest;
use ledger_store::TransactionStore;
use warp::{Filter, Rejection, Reply};

use envelope::Envelope;
use handler::{with_handler, TransactionHandler};

pub fn routes<S: TransactionStore + Send + Sync + 'static>(
    envelope: Arc<Envelope<S>>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    health_route(Arc::clone(&envelope)).or(send_transaction_route(Arc::clone(&envelope)))
}

fn health_route<S: TransactionStore + Send + Sync + 'static>(
    envelope: Arc<Envelope<S>>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("health")
        .and(warp::get())
        .and(with_handler(envelope))
        .and_then(|handler: TransactionHandler<S>| async move { handler.health().await })
}

fn send_transaction_route<S: TransactionStore + Send + Sync + 'static>(
    envelope: Arc<Envelope<S>>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "transaction")
        .and(warp::post())
        .and(with_handler(envelope))
        .and(warp::body::json())
        .and_then(|handler: TransactionHandler<S>, request: TransactionRequest| async move {
            handler.submit_transaction(request).await
        })
}
