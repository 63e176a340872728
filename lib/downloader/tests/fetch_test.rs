// cargo test -p downloader --test fetch_test

use anyhow::Result;
use downloader::{DownloadError, ImageFetcher};
use std::time::{Duration, Instant};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

/// Serve a single canned HTTP response on a loopback port and return its URL.
async fn serve_once(
    status: &'static str,
    content_type: Option<&'static str>,
    body: Vec<u8>,
) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let mut head = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n",
            body.len()
        );
        if let Some(content_type) = content_type {
            head.push_str(&format!("Content-Type: {content_type}\r\n"));
        }
        head.push_str("\r\n");

        _ = socket.write_all(head.as_bytes()).await;
        _ = socket.write_all(&body).await;
        _ = socket.shutdown().await;
    });

    Ok(format!("http://{addr}/picture"))
}

#[tokio::test]
async fn test_fetch_image() -> Result<()> {
    let body = vec![0x89, b'P', b'N', b'G', 1, 2, 3, 4];
    let url = serve_once("200 OK", Some("image/png"), body.clone()).await?;

    let fetched = ImageFetcher::new().fetch(&url).await?;
    assert_eq!(fetched.bytes, body);
    assert_eq!(fetched.content_type, "image/png");
    assert_eq!(fetched.url, url);
    Ok(())
}

#[tokio::test]
async fn test_html_is_rejected() -> Result<()> {
    let body = b"<html></html>".to_vec();
    let url = serve_once("200 OK", Some("text/html; charset=utf-8"), body).await?;

    let err = ImageFetcher::new().fetch(&url).await.unwrap_err();
    assert!(matches!(err, DownloadError::Validation { .. }), "{err}");
    assert!(err.to_string().contains("URL does not reference a valid image"));
    Ok(())
}

#[tokio::test]
async fn test_missing_content_type_is_rejected() -> Result<()> {
    let url = serve_once("200 OK", None, vec![1, 2, 3]).await?;

    let err = ImageFetcher::new().fetch(&url).await.unwrap_err();
    assert!(matches!(err, DownloadError::Validation { .. }), "{err}");
    Ok(())
}

#[tokio::test]
async fn test_http_error_status() -> Result<()> {
    let url = serve_once("404 Not Found", Some("image/jpeg"), Vec::new()).await?;

    let err = ImageFetcher::new().fetch(&url).await.unwrap_err();
    assert!(matches!(err, DownloadError::Network { status: 404, .. }), "{err}");
    Ok(())
}

#[tokio::test]
async fn test_connection_refused() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let err = ImageFetcher::new()
        .fetch(&format!("http://{addr}/picture.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::Fetch { .. }), "{err}");
    Ok(())
}

#[tokio::test]
async fn test_stalled_server_times_out() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    // Accept and hold the connection without ever answering.
    tokio::spawn(async move {
        if let Ok((socket, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        }
    });

    let start = Instant::now();
    let err = ImageFetcher::new()
        .with_timeout(Duration::from_millis(300))
        .fetch(&format!("http://{addr}/slow.png"))
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Fetch { .. }), "{err}");
    assert!(start.elapsed() < Duration::from_secs(5));
    Ok(())
}
