use std::error::Error as StdError;
use std::io::ErrorKind;

use crate::model::ChatError;

fn error_chain_has(
    err: &(dyn StdError + 'static),
    kind: ErrorKind,
    needle: &str,
) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<std::io::Error>()
            && io_err.kind() == kind
        {
            return true;
        }

        if source.to_string().to_ascii_lowercase().contains(needle) {
            return true;
        }

        current = source.source();
    }

    false
}

fn error_chain_has_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    error_chain_has(err, ErrorKind::ConnectionRefused, "connection refused")
}

fn error_chain_has_timeout(err: &(dyn StdError + 'static)) -> bool {
    error_chain_has(err, ErrorKind::TimedOut, "timed out")
}

fn error_chain_has_dns_failure(err: &(dyn StdError + 'static)) -> bool {
    error_chain_has(err, ErrorKind::NotFound, "dns error")
}

pub(crate) fn chat_request_error(
    err: reqwest::Error,
    api_url: &str,
    timeout_secs: u64,
) -> ChatError {
    if err.is_timeout() || error_chain_has_timeout(&err) {
        return ChatError::Network(format!(
            "Chat request timed out after {}s while calling '{}'. \
             Increase REQUEST_TIMEOUT_SECS or retry later.",
            timeout_secs, api_url
        ));
    }

    if err.is_connect() {
        if error_chain_has_connection_refused(&err) {
            return ChatError::Network(format!(
                "Connection refused by chat API at '{}'. \
                 Check DEEPSEEK_API_URL.",
                api_url
            ));
        }

        if error_chain_has_dns_failure(&err) {
            return ChatError::Network(format!(
                "Could not resolve chat API host for '{}'. \
                 Check DEEPSEEK_API_URL and DNS settings.",
                api_url
            ));
        }

        return ChatError::Network(format!(
            "Failed to connect to chat API at '{}'. \
             Check DEEPSEEK_API_URL and network connectivity.",
            api_url
        ));
    }

    ChatError::Network(format!("Failed to call chat API at '{}': {}", api_url, err))
}

#[cfg(test)]
mod tests {
    use super::{chat_request_error, error_chain_has_timeout};
    use crate::model::ChatError;
    use reqwest::Client;
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    fn free_local_addr() -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        let addr = listener.local_addr().expect("address should be available");
        drop(listener);
        addr
    }

    #[tokio::test]
    async fn maps_connection_refused_errors_to_network_error() {
        let addr = free_local_addr();
        let api_url = format!("http://{}/v1/chat/completions", addr);
        let client = Client::builder()
            .timeout(Duration::from_millis(300))
            .build()
            .expect("client should build");

        let req_err = client
            .post(&api_url)
            .send()
            .await
            .expect_err("request should fail with connection-refused");
        let mapped = chat_request_error(req_err, &api_url, 1);

        let ChatError::Network(msg) = mapped else {
            panic!("expected network error, got {mapped:?}");
        };
        assert!(
            msg.contains("Connection refused by chat API"),
            "unexpected message: {msg}"
        );
        assert!(msg.contains("DEEPSEEK_API_URL"), "unexpected message: {msg}");
    }

    #[tokio::test]
    async fn maps_timeout_errors_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        let addr = listener.local_addr().expect("address should be available");
        let server = thread::spawn(move || {
            let (_stream, _) = listener.accept().expect("accept should succeed");
            thread::sleep(Duration::from_secs(1));
        });

        let api_url = format!("http://{}/v1/chat/completions", addr);
        let client = Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("client should build");

        let req_err = client
            .post(&api_url)
            .send()
            .await
            .expect_err("request should fail with timeout");
        let mapped = chat_request_error(req_err, &api_url, 30);
        let msg = mapped.to_string();

        assert!(
            msg.contains("Chat request timed out after 30s"),
            "unexpected message: {msg}"
        );
        assert!(
            msg.contains("REQUEST_TIMEOUT_SECS"),
            "unexpected message: {msg}"
        );

        server.join().expect("server thread should join");
    }

    #[test]
    fn detects_timeout_from_error_kind() {
        let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        assert!(error_chain_has_timeout(&err));
    }
}
