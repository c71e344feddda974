//! Loopback stand-in for the Forge API used by action tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::http::{Method, Uri};
use axum::response::Response;
use forge_gate_api::{ForgeClient, ForgeClientConfig};

/// Requests seen by the fake, as (method, path, body).
pub(crate) type Recorder = Arc<Mutex<Vec<(Method, String, String)>>>;

/// Serve `respond` on an ephemeral port. The third argument is how many
/// earlier requests hit the same method and path.
pub(crate) async fn spawn<F>(respond: F) -> (ForgeClient, Recorder)
where
    F: Fn(&Method, &str, usize) -> Response + Clone + Send + Sync + 'static,
{
    let recorder: Recorder = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&recorder);
    let router = Router::new().fallback(move |method: Method, uri: Uri, body: String| {
        let captured = Arc::clone(&captured);
        let respond = respond.clone();
        async move {
            let path = uri.path().to_string();
            let earlier = {
                let mut requests = captured.lock().unwrap();
                let earlier = requests
                    .iter()
                    .filter(|(seen, seen_path, _)| *seen == method && *seen_path == path)
                    .count();
                requests.push((method.clone(), path.clone(), body));
                earlier
            };
            respond(&method, &path, earlier)
        }
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    let client =
        ForgeClient::new(ForgeClientConfig::new("test-token").with_base_url(format!("http://{address}/api/v1"))).unwrap();
    (client, recorder)
}

/// Method and path of every recorded request, in arrival order.
pub(crate) fn routes(recorder: &Recorder) -> Vec<(String, String)> {
    recorder
        .lock()
        .unwrap()
        .iter()
        .map(|(method, path, _)| (method.to_string(), path.clone()))
        .collect()
}
