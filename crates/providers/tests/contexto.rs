use providers::contexto::{ContextoClient, WordSource};
use std::collections::HashMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves canned `(status, body)` pairs keyed by request path; unknown paths get 404.
async fn serve(routes: HashMap<String, (u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut sock, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                loop {
                    let n = sock.read(&mut buf[read..]).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let head = String::from_utf8_lossy(&buf[..read]);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or((404, String::new()));
                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    _ => "Error",
                };
                let resp = format!(
                    "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = sock.write_all(resp.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

fn routes(entries: &[(&str, u16, &str)]) -> HashMap<String, (u16, String)> {
    entries
        .iter()
        .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
        .collect()
}

#[tokio::test]
async fn fetch_words_reads_words_on_ok() {
    let base = serve(routes(&[(
        "/en/top/1",
        200,
        r#"{"words": ["cat", "dog"], "extra": 1}"#,
    )]))
    .await;
    let client = ContextoClient::new();
    let words = client.fetch_words(&format!("{base}/en/top/1")).await.unwrap();
    assert_eq!(words, vec!["cat".to_string(), "dog".to_string()]);
}

#[tokio::test]
async fn missing_words_field_is_empty() {
    let base = serve(routes(&[("/en/top/2", 200, r#"{"other": []}"#)])).await;
    let client = ContextoClient::new();
    let words = client.fetch_words(&format!("{base}/en/top/2")).await.unwrap();
    assert!(words.is_empty());
}

#[tokio::test]
async fn non_success_status_is_empty_not_error() {
    let base = serve(routes(&[("/en/top/3", 500, r#"{"words": ["x"]}"#)])).await;
    let client = ContextoClient::new();
    let words = client.fetch_words(&format!("{base}/en/top/3")).await.unwrap();
    assert!(words.is_empty());

    let words = client.fetch_words(&format!("{base}/en/top/99")).await.unwrap();
    assert!(words.is_empty());
}

#[tokio::test]
async fn transport_failure_is_an_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ContextoClient::new();
    let err = client
        .fetch_words(&format!("http://{addr}/en/top/1"))
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("request failed"));
}
