//! Minimal JSON-over-HTTP front end.
//!
//! One tokio task per connection, one request per connection. Each request
//! builds its own estimator from the shared, read-only [`ServiceConfig`].

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use sw_types::{Stablecoin, SwError, SwResult};

use crate::config::ServiceConfig;
use crate::view::{coin_summaries, render_dashboard, scenario_rows, DashboardRequest};

const SERVICE_NAME: &str = "stablewatch";
const MAX_REQUEST_BYTES: usize = 4096;

/// Status line plus JSON body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> SwResult<Self> {
        Ok(Self {
            status,
            body: serde_json::to_string(value)?,
        })
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }

    fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            _ => "Internal Server Error",
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.reason(),
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}

/// Map a method and path to a response.
pub fn route(method: &str, path: &str, config: &ServiceConfig, now: DateTime<Local>) -> HttpResponse {
    if method != "GET" {
        return HttpResponse::error(405, "only GET is supported");
    }

    let path = path.split('?').next().unwrap_or_default().trim_end_matches('/');
    let result = match path {
        "/health" => HttpResponse::json(200, &serde_json::json!({ "status": "ok", "service": SERVICE_NAME })),
        "/api/coins" => HttpResponse::json(200, &coin_summaries()),
        "/api/scenarios" => HttpResponse::json(200, &scenario_rows()),
        _ => match path.strip_prefix("/api/dashboard/") {
            Some(symbol) => dashboard(symbol, config, now),
            None => Ok(HttpResponse::error(404, "not found")),
        },
    };

    result.unwrap_or_else(|e| {
        warn!("Request for {} failed: {}", path, e);
        HttpResponse::error(500, &e.to_string())
    })
}

fn dashboard(symbol: &str, config: &ServiceConfig, now: DateTime<Local>) -> SwResult<HttpResponse> {
    let coin = match symbol.parse::<Stablecoin>() {
        Ok(coin) => coin,
        Err(e) => return Ok(HttpResponse::error(404, &e.to_string())),
    };

    let mut estimator = config.estimator()?;
    let view = render_dashboard(&DashboardRequest::new(coin, now), &mut estimator)?;
    info!("Served {} dashboard: score {}", coin, view.assessment.score);
    HttpResponse::json(200, &view)
}

/// Read one request from `socket`, answer it and close.
pub async fn handle_connection<S>(mut socket: S, config: Arc<ServiceConfig>) -> SwResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // The request line may arrive over several reads; stop at the first newline.
    let mut line = Vec::new();
    BufReader::new((&mut socket).take(MAX_REQUEST_BYTES as u64))
        .read_until(b'\n', &mut line)
        .await?;
    let complete = line.ends_with(b"\n");
    let request_line = String::from_utf8_lossy(&line);

    let mut parts = request_line.split_whitespace();
    let response = match (complete, parts.next(), parts.next()) {
        (true, Some(method), Some(path)) => {
            debug!("{} {}", method, path);
            route(method, path, &config, Local::now())
        }
        _ => HttpResponse::error(400, "malformed request line"),
    };

    socket.write_all(&response.to_bytes()).await?;
    socket.shutdown().await?;
    Ok(())
}

/// Accept connections forever.
pub async fn serve(listener: TcpListener, config: Arc<ServiceConfig>) -> SwResult<()> {
    loop {
        let (socket, peer) = listener.accept().await.map_err(SwError::Io)?;
        let config = Arc::clone(&config);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, config).await {
                warn!("Connection from {} failed: {}", peer, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tokio::io::duplex;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap()
    }

    fn seeded() -> ServiceConfig {
        ServiceConfig {
            seed: Some(99),
            ..ServiceConfig::default()
        }
    }

    fn body(response: &HttpResponse) -> serde_json::Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[test]
    fn health_route() {
        let response = route("GET", "/health", &seeded(), now());
        assert_eq!(response.status, 200);
        assert_eq!(body(&response)["service"], "stablewatch");
    }

    #[test]
    fn coins_route_lists_instruments() {
        let response = route("GET", "/api/coins", &seeded(), now());
        let json = body(&response);
        assert_eq!(json.as_array().unwrap().len(), 5);
        assert_eq!(json[0]["coin"], "USDC");
    }

    #[test]
    fn scenarios_route() {
        let response = route("GET", "/api/scenarios/", &seeded(), now());
        assert_eq!(response.status, 200);
        assert_eq!(body(&response)[1]["risk_delta"], "-10 pts");
    }

    #[test]
    fn dashboard_route_is_reproducible_with_seed() {
        let a = route("GET", "/api/dashboard/dai", &seeded(), now());
        let b = route("GET", "/api/dashboard/DAI?refresh=1", &seeded(), now());
        assert_eq!(a.status, 200);
        assert_eq!(a, b);

        let json = body(&a);
        assert_eq!(json["coin"], "DAI");
        assert_eq!(json["chart"]["points"].as_array().unwrap().len(), 7);
        assert_eq!(json["last_updated"], "2024-05-10 09:00:00");
    }

    #[test]
    fn unknown_coin_is_404() {
        let response = route("GET", "/api/dashboard/BUSD", &seeded(), now());
        assert_eq!(response.status, 404);
        assert!(body(&response)["error"].as_str().unwrap().contains("BUSD"));
    }

    #[test]
    fn unknown_path_and_method() {
        assert_eq!(route("GET", "/nope", &seeded(), now()).status, 404);
        assert_eq!(route("POST", "/health", &seeded(), now()).status, 405);
    }

    #[test]
    fn response_bytes_carry_length() {
        let response = HttpResponse::error(404, "not found");
        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains(&format!("Content-Length: {}", response.body.len())));
    }

    #[tokio::test]
    async fn handles_connection_end_to_end() {
        let (mut client, server) = duplex(MAX_REQUEST_BYTES * 4);
        client
            .write_all(b"GET /api/dashboard/USDT HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();

        handle_connection(server, Arc::new(seeded())).await.unwrap();

        let mut raw = String::new();
        client.read_to_string(&mut raw).await.unwrap();
        assert!(raw.starts_with("HTTP/1.1 200 OK"));
        let (_, json) = raw.split_once("\r\n\r\n").unwrap();
        let view: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(view["coin"], "USDT");
        assert!(view["score_text"].as_str().unwrap().ends_with("/100"));
    }

    #[tokio::test]
    async fn request_line_split_across_writes() {
        let (mut client, server) = duplex(MAX_REQUEST_BYTES * 4);
        let handler = tokio::spawn(handle_connection(server, Arc::new(seeded())));

        client.write_all(b"GET /api").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        client.write_all(b"/coins HTTP/1.1\r\n\r\n").await.unwrap();

        let mut raw = String::new();
        client.read_to_string(&mut raw).await.unwrap();
        handler.await.unwrap().unwrap();
        assert!(raw.starts_with("HTTP/1.1 200 OK"));
        assert!(raw.contains("\"USDC\""));
    }

    #[tokio::test]
    async fn oversized_request_line_is_400() {
        let (mut client, server) = duplex(MAX_REQUEST_BYTES * 4);
        let mut request = b"GET /".to_vec();
        request.extend(std::iter::repeat(b'a').take(MAX_REQUEST_BYTES));
        client.write_all(&request).await.unwrap();

        handle_connection(server, Arc::new(seeded())).await.unwrap();

        let mut raw = String::new();
        client.read_to_string(&mut raw).await.unwrap();
        assert!(raw.starts_with("HTTP/1.1 400 Bad Request"));
    }

    #[tokio::test]
    async fn malformed_request_is_400() {
        let (mut client, server) = duplex(1024);
        client.write_all(b"\r\n").await.unwrap();

        handle_connection(server, Arc::new(seeded())).await.unwrap();

        let mut raw = String::new();
        client.read_to_string(&mut raw).await.unwrap();
        assert!(raw.starts_with("HTTP/1.1 400 Bad Request"));
    }
}
