use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use keyhole_client::{AccessGate, ClientConfig, ClientError, GateError, GateState, KeyholeClient};
use keyhole_core::{AccessCode, AccessRecord, ContextTag, RecordKey, Repository};
use keyhole_gateway::{App, AppState};
use keyhole_resolver::ResolverService;
use keyhole_storage::InMemoryRepository;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

struct Gateway {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl Gateway {
    async fn start(records: &[(&str, &str, AccessRecord)]) -> Self {
        let repo = InMemoryRepository::new();
        for (context, code, record) in records {
            let key = RecordKey::new(
                ContextTag::new(*context).unwrap(),
                AccessCode::new(*code).unwrap(),
            );
            repo.insert(&key, record.clone()).await.unwrap();
        }
        let state = AppState::new(Arc::new(ResolverService::new(repo)));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(App::serve(listener, state, async move {
            let _ = rx.await;
        }));

        Self {
            addr,
            shutdown: Some(tx),
            handle,
        }
    }

    fn client(&self) -> KeyholeClient {
        client_for(&format!("http://{}", self.addr), Duration::from_secs(5))
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

fn client_for(base: &str, timeout: Duration) -> KeyholeClient {
    KeyholeClient::new(
        ClientConfig::builder()
            .base_url(Url::parse(base).unwrap())
            .timeout(timeout)
            .build(),
    )
    .unwrap()
}

fn sample_records() -> Vec<(&'static str, &'static str, AccessRecord)> {
    vec![
        ("default", "abc123", AccessRecord::new("https://example.com/x")),
        (
            "main",
            "abc123",
            AccessRecord {
                link: "https://main.example/x".into(),
                encrypted_link: Some("enc:main".into()),
                expire_at: None,
            },
        ),
    ]
}

#[tokio::test]
async fn verify_password_returns_stored_link() {
    let gateway = Gateway::start(&sample_records()).await;
    let client = gateway.client();

    let unlocked = client.verify_password("abc123", None).await.unwrap();
    assert_eq!(unlocked.link, "https://example.com/x");
    assert_eq!(unlocked.encrypted_link, None);

    let again = client.verify_password("abc123", None).await.unwrap();
    assert_eq!(again, unlocked);

    let main = client.verify_password("abc123", Some("main")).await.unwrap();
    assert_eq!(main.link, "https://main.example/x");
    assert_eq!(main.encrypted_link.as_deref(), Some("enc:main"));

    gateway.stop().await;
}

#[tokio::test]
async fn wrong_password_surfaces_server_message() {
    let gateway = Gateway::start(&sample_records()).await;

    let err = gateway
        .client()
        .verify_password("wrong", None)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Rejected { status: 401, .. }));
    assert_eq!(err.user_message(), "Wrong password");

    gateway.stop().await;
}

#[tokio::test]
async fn blank_password_sent_directly_is_a_bad_request() {
    let gateway = Gateway::start(&sample_records()).await;

    let err = gateway
        .client()
        .verify_password("  ", None)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Rejected { status: 400, .. }));
    assert_eq!(err.user_message(), "Password is required");

    gateway.stop().await;
}

#[tokio::test]
async fn verify_link_versions_and_health() {
    let gateway = Gateway::start(&sample_records()).await;
    let client = gateway.client();

    assert!(client.verify_link("https://example.com/x").await.unwrap());
    assert!(client.verify_link("enc:main").await.unwrap());
    assert!(!client.verify_link("https://evil.example").await.unwrap());

    assert_eq!(
        client.game_versions().await.unwrap(),
        vec!["default".to_string(), "main".to_string()]
    );

    assert_eq!(client.health().await.unwrap().status, "ok");

    gateway.stop().await;
}

#[tokio::test]
async fn gate_trims_input_and_settles() {
    let gateway = Gateway::start(&sample_records()).await;
    let gate = AccessGate::new(gateway.client());

    let state = gate.submit("  abc123\n", None).await.unwrap();
    assert_eq!(
        state,
        GateState::Granted {
            link: "https://example.com/x".into()
        }
    );

    let state = gate.submit("nope", None).await.unwrap();
    assert_eq!(
        state,
        GateState::Denied {
            message: "Wrong password".into()
        }
    );

    gate.reset();
    assert_eq!(gate.state(), GateState::Idle);

    gateway.stop().await;
}

#[tokio::test]
async fn unreachable_gateway_gives_generic_message() {
    // bind then drop so the port is closed
    let addr = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap();
    let gate = AccessGate::new(client_for(
        &format!("http://{addr}"),
        Duration::from_secs(2),
    ));

    let state = gate.submit("abc123", None).await.unwrap();

    assert_eq!(
        state,
        GateState::Denied {
            message: "Connection error. Please try again.".into()
        }
    );
}

#[tokio::test]
async fn second_submit_while_verifying_is_busy() {
    // accepts connections into the backlog but never answers
    let silent = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = silent.local_addr().unwrap();
    let gate = Arc::new(AccessGate::new(client_for(
        &format!("http://{addr}"),
        Duration::from_secs(30),
    )));

    let pending = tokio::spawn({
        let gate = gate.clone();
        async move { gate.submit("abc123", None).await }
    });

    for _ in 0..100 {
        if gate.state() == GateState::Verifying {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(gate.state(), GateState::Verifying);
    assert_eq!(gate.submit("abc123", None).await, Err(GateError::Busy));

    pending.abort();
    let _ = pending.await;
    assert_eq!(gate.state(), GateState::Idle);

    drop(silent);
}
