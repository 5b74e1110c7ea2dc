use std::sync::Arc;

use ledger_domain::{wire, TransactionRequest};
use ledger_store::TransactionStore;
use warp::{http::StatusCode, reply::json, Rejection, Reply};

use crate::envelope::Envelope;

type Result<T> = std::result::Result<T, Rejection>;

pub struct TransactionHandler<S: TransactionStore> {
    envelope: Arc<Envelope<S>>,
}

impl<S: TransactionStore> TransactionHandler<S> {
    pub fn new(envelope: Arc<Envelope<S>>) -> Self {
        TransactionHandler { envelope }
    }

    pub async fn submit_transaction(&self, request: TransactionRequest) -> Result<impl Reply> {
        let outcome = self.envelope.apply_untrusted(request).await;
        Ok(json(&wire::result_to_value(&outcome)))
    }

    pub async fn health(&self) -> Result<impl Reply> {
        Ok(StatusCode::OK)
    }
}

pub fn with_handler<S: TransactionStore + Send + Sync + 'static>(
    envelope: Arc<Envelope<S>>,
) -> impl warp::Filter<Extract = (TransactionHandler<S>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || TransactionHandler::new(Arc::clone(&envelope)))
}
