// Homarr onboarding client over its tRPC HTTP API
use crate::application::onboarding_client::OnboardingClient;
use crate::domain::api_key::ApiKey;
use crate::domain::error::OnboardingError;
use crate::domain::onboarding::{AnalyticsSettings, BoardSpec, CrawlingSettings, ThemeSettings};
use crate::domain::secret::Secret;
use crate::infrastructure::assets::served_path;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;

const API_KEY_HEADER: &str = "ApiKey";

#[derive(Debug, Clone)]
pub struct HomarrClient {
    base_url: String,
    api_key: ApiKey,
    asset_dir: PathBuf,
    asset_url_base: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TrpcResponse {
    result: TrpcResult,
}

#[derive(Debug, Deserialize)]
struct TrpcResult {
    #[serde(default)]
    data: Option<TrpcData>,
}

#[derive(Debug, Deserialize)]
struct TrpcData {
    #[serde(default)]
    json: Value,
}

impl HomarrClient {
    pub fn new(
        base_url: String,
        api_key: ApiKey,
        asset_dir: PathBuf,
        asset_url_base: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            asset_dir,
            asset_url_base: asset_url_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn procedure_url(&self, procedure: &str) -> String {
        format!("{}/api/trpc/{}", self.base_url, procedure)
    }

    /// Public URL of an installed asset. The asset directory is served under
    /// `asset_url_base`, so only files inside it have a URL.
    fn asset_url(&self, path: &Path) -> Result<String, OnboardingError> {
        let relative = served_path(&self.asset_dir, path)
            .ok_or_else(|| OnboardingError::AssetNotServed(path.to_path_buf()))?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(format!("{}/{}", self.asset_url_base, segments.join("/")))
    }

    async fn mutate(&self, procedure: &str, input: Value) -> Result<Value, OnboardingError> {
        let url = self.procedure_url(procedure);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.header_value())
            .header("Accept", "application/json")
            .json(&json!({ "json": input }))
            .send()
            .await
            .map_err(|source| OnboardingError::Http {
                procedure: procedure.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OnboardingError::Status {
                procedure: procedure.to_string(),
                status,
                body,
            });
        }

        let data = response
            .json::<TrpcResponse>()
            .await
            .map_err(|e| OnboardingError::Response {
                procedure: procedure.to_string(),
                reason: e.to_string(),
            })?;

        Ok(data.result.data.map(|d| d.json).unwrap_or(Value::Null))
    }

    async fn save_setting(&self, key: &str, value: Value) -> Result<(), OnboardingError> {
        self.mutate("serverSettings.saveSettings", setting_input(key, value))
            .await
            .map(|_| ())
    }
}

fn init_user_input(username: &str, password: &Secret) -> Value {
    json!({
        "username": username,
        "password": password.expose(),
        "confirmPassword": password.expose(),
    })
}

fn appearance_input(theme: &ThemeSettings, logo_url: String, favicon_url: String) -> Value {
    json!({
        "pageTitle": theme.product_name,
        "defaultColorScheme": theme.mode.as_str(),
        "primaryColor": theme.primary_color.as_str(),
        "secondaryColor": theme.secondary_color.as_str(),
        "logoImageUrl": logo_url,
        "faviconImageUrl": favicon_url,
    })
}

fn create_board_input(board: &BoardSpec) -> Value {
    json!({
        "name": board.name,
        "columnCount": board.columns,
        "isPublic": true,
    })
}

fn create_app_input(board: &BoardSpec) -> Value {
    json!({
        "name": board.tile.title,
        "href": board.tile.href,
        "description": null,
        "iconUrl": null,
    })
}

fn save_board_input(board_id: &str, board: &BoardSpec, app_id: &str) -> Value {
    json!({
        "id": board_id,
        "layout": board.layout.as_str(),
        "items": [{
            "kind": board.tile.kind.as_str(),
            "appId": app_id,
            "title": board.tile.title,
            "href": board.tile.href,
        }],
    })
}

fn setting_input(key: &str, value: Value) -> Value {
    json!({ "settingsKey": key, "value": value })
}

/// First of `keys` holding a string id in a mutation result.
fn response_id(procedure: &str, data: &Value, keys: &[&str]) -> Result<String, OnboardingError> {
    keys.iter()
        .find_map(|key| data.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| OnboardingError::Response {
            procedure: procedure.to_string(),
            reason: format!("no id in {}", data),
        })
}

/// Saved items echoed back by `board.saveBoard`; an empty echo means the tile
/// was dropped.
fn check_saved_items(procedure: &str, data: &Value) -> Result<(), OnboardingError> {
    match data.get("items").and_then(Value::as_array) {
        Some(items) if items.is_empty() => Err(OnboardingError::Response {
            procedure: procedure.to_string(),
            reason: "board saved without its tile".to_string(),
        }),
        _ => Ok(()),
    }
}

#[async_trait]
impl OnboardingClient for HomarrClient {
    async fn create_admin(&self, username: &str, password: &Secret) -> Result<(), OnboardingError> {
        self.mutate("user.initUser", init_user_input(username, password))
            .await
            .map(|_| ())
    }

    async fn apply_theme(&self, theme: &ThemeSettings) -> Result<(), OnboardingError> {
        let input = appearance_input(theme, self.asset_url(&theme.logo)?, self.asset_url(&theme.favicon)?);
        self.save_setting("appearance", input).await
    }

    /// The board, its tile's app and the tile placement are three mutations;
    /// each returned id is checked before the next call uses it.
    async fn create_board(&self, board: &BoardSpec) -> Result<String, OnboardingError> {
        let data = self.mutate("board.createBoard", create_board_input(board)).await?;
        let board_id = response_id("board.createBoard", &data, &["boardId", "id"])?;

        let data = self.mutate("app.create", create_app_input(board)).await?;
        let app_id = response_id("app.create", &data, &["appId", "id"])?;

        let data = self
            .mutate("board.saveBoard", save_board_input(&board_id, board, &app_id))
            .await?;
        check_saved_items("board.saveBoard", &data)?;

        Ok(board_id)
    }

    async fn set_homepage(&self, board_id: &str) -> Result<(), OnboardingError> {
        self.mutate("board.setHomeBoard", json!({ "id": board_id }))
            .await
            .map(|_| ())
    }

    async fn apply_settings(
        &self,
        analytics: &AnalyticsSettings,
        crawling: &CrawlingSettings,
    ) -> Result<(), OnboardingError> {
        let analytics = serde_json::to_value(analytics).map_err(|e| OnboardingError::Response {
            procedure: "serverSettings.saveSettings".to_string(),
            reason: e.to_string(),
        })?;
        let crawling = serde_json::to_value(crawling).map_err(|e| OnboardingError::Response {
            procedure: "serverSettings.saveSettings".to_string(),
            reason: e.to_string(),
        })?;

        self.save_setting("analytics", analytics).await?;
        self.save_setting("crawlingAndIndexing", crawling).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::branding::{BoardLayout, ThemeMode, TileType};
    use crate::domain::color::Color;
    use crate::domain::onboarding::TileSpec;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const ASSET_DIR: &str = "/usr/share/halos-homarr-branding";

    fn client(base_url: &str) -> HomarrClient {
        HomarrClient::new(
            base_url.to_string(),
            ApiKey::parse("halos-bootstrap.token").unwrap(),
            PathBuf::from(ASSET_DIR),
            "/branding/".to_string(),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    fn board() -> BoardSpec {
        BoardSpec {
            name: "Home".to_string(),
            layout: BoardLayout::Grid,
            columns: 4,
            tile: TileSpec {
                title: "Cockpit".to_string(),
                kind: TileType::App,
                href: "http://localhost:9090/".to_string(),
            },
        }
    }

    fn theme(logo: &str, favicon: &str) -> ThemeSettings {
        ThemeSettings {
            product_name: "HaLOS".to_string(),
            mode: ThemeMode::Light,
            primary_color: Color::parse("#112233").unwrap(),
            secondary_color: Color::parse("#445566").unwrap(),
            logo: PathBuf::from(logo),
            favicon: PathBuf::from(favicon),
        }
    }

    fn trpc(json: Value) -> String {
        json!({ "result": { "data": { "json": json } } }).to_string()
    }

    /// Local dashboard stand-in: answers one connection per canned response
    /// and hands back the raw requests it saw.
    async fn fake_dashboard(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);

                let reason = match status {
                    200 => "OK",
                    401 => "Unauthorized",
                    _ => "Error",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
            requests
        });

        (base_url, handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn request_body(request: &str) -> Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_procedure_url_strips_trailing_slash() {
        let client = client("http://localhost:7575/");
        assert_eq!(
            client.procedure_url("board.createBoard"),
            "http://localhost:7575/api/trpc/board.createBoard"
        );
    }

    #[test]
    fn test_asset_url_relative_to_asset_dir() {
        let client = client("http://localhost:7575");
        assert_eq!(
            client.asset_url(Path::new("/usr/share/halos-homarr-branding/logo.svg")).unwrap(),
            "/branding/logo.svg"
        );
        assert_eq!(
            client
                .asset_url(Path::new("/usr/share/halos-homarr-branding/icons/favicon.svg"))
                .unwrap(),
            "/branding/icons/favicon.svg"
        );
    }

    #[test]
    fn test_asset_url_rejects_files_outside_asset_dir() {
        let client = client("http://localhost:7575");
        match client.asset_url(Path::new("/opt/icons/favicon.svg")) {
            Err(OnboardingError::AssetNotServed(path)) => {
                assert_eq!(path, PathBuf::from("/opt/icons/favicon.svg"))
            }
            other => panic!("expected unserved asset, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_apply_theme_refuses_unserved_favicon_before_sending() {
        // Nothing listens here; the call must fail before any request is made
        let client = client("http://127.0.0.1:9");
        let theme = theme(
            "/usr/share/halos-homarr-branding/logo.svg",
            "/opt/icons/favicon.svg",
        );
        assert!(matches!(
            client.apply_theme(&theme).await,
            Err(OnboardingError::AssetNotServed(_))
        ));
    }

    #[test]
    fn test_init_user_input_confirms_password() {
        let input = init_user_input("admin", &Secret::new("halos"));
        assert_eq!(input["username"], "admin");
        assert_eq!(input["password"], "halos");
        assert_eq!(input["confirmPassword"], "halos");
    }

    #[test]
    fn test_appearance_input() {
        let theme = theme("/x/logo.svg", "/x/favicon.svg");
        let input = appearance_input(&theme, "/branding/logo.svg".into(), "/branding/favicon.svg".into());
        assert_eq!(input["defaultColorScheme"], "light");
        assert_eq!(input["primaryColor"], "#112233");
        assert_eq!(input["pageTitle"], "HaLOS");
        assert_eq!(input["faviconImageUrl"], "/branding/favicon.svg");
    }

    #[test]
    fn test_response_id() {
        let keys = &["boardId", "id"];
        assert_eq!(response_id("p", &json!({ "boardId": "abc" }), keys).unwrap(), "abc");
        assert_eq!(response_id("p", &json!({ "id": "def" }), keys).unwrap(), "def");
        assert!(matches!(
            response_id("p", &Value::Null, keys),
            Err(OnboardingError::Response { .. })
        ));
    }

    #[test]
    fn test_setting_input_shape() {
        let value = serde_json::to_value(AnalyticsSettings::all(false)).unwrap();
        let input = setting_input("analytics", value);
        assert_eq!(input["settingsKey"], "analytics");
        assert_eq!(input["value"]["enableGeneral"], false);
    }

    #[tokio::test]
    async fn test_create_board_places_tile() {
        let (base_url, server) = fake_dashboard(vec![
            (200, trpc(json!({ "boardId": "b1" }))),
            (200, trpc(json!({ "appId": "a1" }))),
            (200, trpc(json!({ "items": [{ "id": "i1" }] }))),
        ])
        .await;

        let id = client(&base_url).create_board(&board()).await.unwrap();
        assert_eq!(id, "b1");

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].starts_with("POST /api/trpc/board.createBoard "));
        assert!(requests[1].starts_with("POST /api/trpc/app.create "));
        assert!(requests[2].starts_with("POST /api/trpc/board.saveBoard "));
        assert!(requests[0].to_lowercase().contains("apikey: halos-bootstrap.token\r\n"));

        let created = request_body(&requests[0]);
        assert_eq!(created["json"]["name"], "Home");
        assert_eq!(created["json"]["columnCount"], 4);

        let app = request_body(&requests[1]);
        assert_eq!(app["json"]["href"], "http://localhost:9090/");

        let saved = request_body(&requests[2]);
        assert_eq!(saved["json"]["id"], "b1");
        assert_eq!(saved["json"]["layout"], "grid");
        assert_eq!(saved["json"]["items"][0]["appId"], "a1");
        assert_eq!(saved["json"]["items"][0]["kind"], "app");
    }

    #[tokio::test]
    async fn test_dropped_tile_is_an_error() {
        let (base_url, server) = fake_dashboard(vec![
            (200, trpc(json!({ "boardId": "b1" }))),
            (200, trpc(json!({ "appId": "a1" }))),
            (200, trpc(json!({ "items": [] }))),
        ])
        .await;

        match client(&base_url).create_board(&board()).await {
            Err(OnboardingError::Response { procedure, .. }) => assert_eq!(procedure, "board.saveBoard"),
            other => panic!("expected response error, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_request_is_status_error() {
        let (base_url, server) = fake_dashboard(vec![(401, "unauthorized".to_string())]).await;

        match client(&base_url).set_homepage("b1").await {
            Err(OnboardingError::Status {
                procedure,
                status,
                body,
            }) => {
                assert_eq!(procedure, "board.setHomeBoard");
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("expected status error, got {:?}", other),
        }

        let requests = server.await.unwrap();
        assert_eq!(request_body(&requests[0]), json!({ "json": { "id": "b1" } }));
    }

    #[tokio::test]
    async fn test_non_trpc_body_is_response_error() {
        let (base_url, server) = fake_dashboard(vec![(200, "<html>hello</html>".to_string())]).await;

        match client(&base_url).create_admin("admin", &Secret::new("halos")).await {
            Err(OnboardingError::Response { procedure, .. }) => assert_eq!(procedure, "user.initUser"),
            other => panic!("expected response error, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_dashboard_is_http_error() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = client(&format!("http://{}", addr));

        match client.set_homepage("abc").await {
            Err(OnboardingError::Http { procedure, .. }) => assert_eq!(procedure, "board.setHomeBoard"),
            other => panic!("expected http error, got {:?}", other),
        }
    }
}
