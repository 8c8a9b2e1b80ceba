use std::convert::Infallible;
use std::net::SocketAddr;

use bytes::Bytes;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};

use dgdrive::core::{PinningConfig, PinningProvider};
use dgdrive::pinning::{self, PinataClient};
use dgdrive::{DriveError, PinningService};

async fn pinata_api(req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let authorized = req.headers().get("pinata_api_key").map(|v| v.as_bytes()) == Some(b"key".as_slice())
        && req.headers().get("pinata_secret_api_key").map(|v| v.as_bytes()) == Some(b"secret".as_slice());
    let path = req.uri().path().to_string();
    let body = hyper::body::to_bytes(req.into_body()).await.unwrap_or_default();
    let body = String::from_utf8_lossy(&body);

    let resp = if !authorized {
        Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .body(Body::from(r#"{"error":"Invalid API key"}"#))
            .unwrap()
    } else if path == "/pinning/pinFileToIPFS"
        && body.contains("name=\"pinataMetadata\"")
        && body.contains("{\"name\":\"hello.txt\"}")
        && body.contains("{\"cidVersion\":1}")
        && body.contains("hello pinata")
    {
        Response::new(Body::from(
            r#"{"IpfsHash":"bafkreihello","PinSize":12,"Timestamp":"2024-05-01T10:00:00.000Z"}"#,
        ))
    } else {
        Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .body(Body::from("unexpected request"))
            .unwrap()
    };
    Ok(resp)
}

fn spawn_pinata() -> String {
    let make_svc = make_service_fn(|_conn| async { Ok::<_, Infallible>(service_fn(pinata_api)) });
    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(server);
    format!("http://{}/", addr)
}

fn pinata_config(api_url: String, key: Option<&str>, secret: Option<&str>) -> PinningConfig {
    PinningConfig {
        api_url,
        api_key: key.map(str::to_string),
        secret_key: secret.map(str::to_string),
        ..PinningConfig::default()
    }
}

#[tokio::test]
async fn test_pinata_upload() {
    let client = PinataClient::new(pinata_config(spawn_pinata(), Some("key"), Some("secret"))).unwrap();

    let receipt = client
        .pin_bytes("hello.txt", Bytes::from_static(b"hello pinata"))
        .await
        .unwrap();
    assert_eq!(receipt.content_id, "bafkreihello");
    assert_eq!(receipt.size, 12);
    assert_eq!(receipt.timestamp.as_deref(), Some("2024-05-01T10:00:00.000Z"));
}

#[tokio::test]
async fn test_pinata_rejected_credentials() {
    let client = PinataClient::new(pinata_config(spawn_pinata(), Some("key"), Some("wrong"))).unwrap();

    let err = client
        .pin_bytes("hello.txt", Bytes::from_static(b"hello pinata"))
        .await
        .unwrap_err();
    match err {
        DriveError::Pinning(message) => assert!(message.contains("401")),
        other => panic!("expected a pinning error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_pinata_requires_credentials() {
    let service = pinning::from_config(&pinata_config("http://127.0.0.1:9".to_string(), Some("key"), None)).unwrap();
    assert_eq!(service.name(), "Pinata");

    let err = service.pin_bytes("a.txt", Bytes::from_static(b"a")).await.unwrap_err();
    assert!(matches!(err, DriveError::Config(_)));
}

#[cfg(feature = "ipfs")]
#[tokio::test]
async fn test_kubo_unreachable_node() {
    let config = PinningConfig {
        provider: PinningProvider::Kubo,
        kubo_api_url: "http://127.0.0.1:9".to_string(),
        ..PinningConfig::default()
    };
    let service = pinning::from_config(&config).unwrap();
    assert_eq!(service.name(), "IPFS node");

    let err = service.pin_bytes("a.txt", Bytes::from_static(b"a")).await.unwrap_err();
    assert!(matches!(err, DriveError::Pinning(_)));
}

#[cfg(not(feature = "ipfs"))]
#[test]
fn test_kubo_needs_feature() {
    let config = PinningConfig {
        provider: PinningProvider::Kubo,
        ..PinningConfig::default()
    };
    assert!(pinning::from_config(&config).is_err());
}
