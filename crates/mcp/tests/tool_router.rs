//! Raw JSON-RPC through the tool router, the way an MCP client sends it.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use forge_gate_api::{ForgeClient, ForgeClientConfig};
use forge_gate_mcp::{ActionRegistry, ForgeMcpCore, ForgeServices, ToolCategorySet};
use rmcp::ServiceExt;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf};

type Recorder = Arc<Mutex<Vec<(Method, String)>>>;

async fn spawn_forge_stub() -> (ForgeClient, Recorder) {
    let recorder: Recorder = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&recorder);
    let router = Router::new().fallback(move |method: Method, uri: Uri| {
        let captured = Arc::clone(&captured);
        async move {
            captured.lock().unwrap().push((method, uri.path().to_string()));
            StatusCode::OK.into_response()
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

struct Session {
    writer: WriteHalf<DuplexStream>,
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    next_id: u64,
}

impl Session {
    async fn open(client: ForgeClient) -> Self {
        let (client_end, server_end) = tokio::io::duplex(64 * 1024);
        let services = Arc::new(ForgeServices::new(client, ActionRegistry::default()));
        let core = ForgeMcpCore::new(services, ToolCategorySet::ALL);
        tokio::spawn(async move {
            if let Ok(running) = core.serve(server_end).await {
                let _ = running.waiting().await;
            }
        });

        let (reader, writer) = tokio::io::split(client_end);
        let mut session = Self {
            writer,
            lines: BufReader::new(reader).lines(),
            next_id: 0,
        };
        session
            .request(
                "initialize",
                json!({
                    "protocolVersion": "2025-03-26",
                    "capabilities": {},
                    "clientInfo": {"name": "router-test", "version": "0.0.0"}
                }),
            )
            .await;
        session
            .send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await;
        session
    }

    async fn send(&mut self, message: Value) {
        let mut line = message.to_string();
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.flush().await.unwrap();
    }

    /// Send a request and return the response carrying its id.
    async fn request(&mut self, method: &str, params: Value) -> Value {
        self.next_id += 1;
        let id = self.next_id;
        self.send(json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))
            .await;
        loop {
            let line = self.lines.next_line().await.unwrap().expect("server closed the session");
            let message: Value = serde_json::from_str(&line).unwrap();
            if message["id"] == id {
                return message;
            }
        }
    }

    async fn call_tool(&mut self, name: &str, arguments: Value) -> Value {
        self.request("tools/call", json!({"name": name, "arguments": arguments}))
            .await
    }
}

#[tokio::test]
async fn numeric_proposal_binds_string_ids_on_execute() {
    let (client, recorder) = spawn_forge_stub().await;
    let mut session = Session::open(client).await;

    let proposal = session
        .call_tool(
            "confirm_delete_database",
            json!({"serverId": 1, "serverName": "web-1", "databaseId": 9, "databaseName": "prod"}),
        )
        .await;
    let receipt = &proposal["result"]["structuredContent"];
    let token = receipt["confirmationId"].as_str().unwrap().to_string();
    assert_eq!(receipt["executeTool"], "delete_database");
    assert!(recorder.lock().unwrap().is_empty());

    let executed = session
        .call_tool(
            "delete_database",
            json!({
                "serverId": "1",
                "serverName": "web-1",
                "databaseId": "9",
                "databaseName": "prod",
                "confirmationId": token
            }),
        )
        .await;
    assert_ne!(executed["result"]["isError"], true);
    assert_ne!(executed["result"]["structuredContent"]["performed"], false);
    assert_eq!(
        *recorder.lock().unwrap(),
        vec![(Method::DELETE, "/api/v1/servers/1/databases/9".to_string())]
    );
}

#[tokio::test]
async fn dot_segment_ids_are_refused_before_any_remote_call() {
    let (client, recorder) = spawn_forge_stub().await;
    let mut session = Session::open(client).await;

    let response = session
        .call_tool(
            "confirm_delete_database",
            json!({"serverId": "..", "serverName": "web-1", "databaseId": "..", "databaseName": "prod"}),
        )
        .await;
    assert!(response.get("error").is_some());
    assert!(response.get("result").is_none());
    assert!(recorder.lock().unwrap().is_empty());
}
