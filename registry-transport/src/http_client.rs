use std::sync::Arc;

use hyper::client::HttpConnector;
use hyper::{Body, Client};
use hyper_rustls::HttpsConnector;
use rustls::ClientConfig;

/// HTTP client type produced by [`crate::RestService::http_client`].
pub type HyperClient = Client<HttpsConnector<HttpConnector>, Body>;

pub(crate) fn build_https_client(tls: Arc<ClientConfig>) -> HyperClient {
    let mut http = HttpConnector::new();
    http.enforce_http(false);

    let connector = HttpsConnector::from((http, tls));

    Client::builder().build::<_, Body>(connector)
}
