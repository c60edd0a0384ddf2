#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use rosterhub_core::avatars::{
    AvatarCache, AvatarService, AvatarSettings, FetchedImage, ObjectStore, PageFetcher,
    ProbeStrategy, ProfileScraper,
};
use rosterhub_core::errors::{Error, Result, SourceError};
use rosterhub_core::players::{PlayerRecord, PlayerRepositoryTrait, PlayerService};
use rosterhub_core::sleeper::{
    League, LeagueMember, LeagueSettings, Roster, SleeperApi, SleeperService, SleeperUser,
};
use rosterhub_core::slug::SlugNormalizer;
use rosterhub_core::trade::Asset;
use rosterhub_core::valuations::{ValuationService, ValuationSource, ValueFormat};
use rosterhub_server::{api::app_router, config::Config, config::LogFormat, AppState};
use serde_json::Value;
use tower::ServiceExt;

pub const CDN: &str = "https://cdn.test/avatars";

// =========================================================================
// Fake collaborators
// =========================================================================

#[derive(Default)]
pub struct FakeStore {
    pub keys: Mutex<HashSet<String>>,
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn probe_exists(&self, key: &str) -> Result<bool> {
        Ok(self.keys.lock().unwrap().contains(key))
    }

    async fn list_by_key(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .keys
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.contains(key))
            .cloned()
            .collect())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{CDN}/{key}")
    }

    async fn upload(&self, key: &str, _: Vec<u8>, _: &str, _: bool) -> Result<()> {
        self.keys.lock().unwrap().insert(key.to_string());
        Ok(())
    }
}

/// Every profile page is missing.
pub struct MissingPages;

#[async_trait]
impl PageFetcher for MissingPages {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        Err(SourceError::NotFound {
            service: "WEB".into(),
            what: url.to_string(),
        }
        .into())
    }

    async fn fetch_image(&self, url: &str) -> Result<FetchedImage> {
        self.fetch_page(url).await.map(|_| FetchedImage {
            bytes: Vec::new(),
            content_type: String::new(),
        })
    }
}

pub struct FakeValues {
    pub fail: bool,
}

#[async_trait]
impl ValuationSource for FakeValues {
    async fn fetch_values(&self, format: ValueFormat) -> Result<Vec<Asset>> {
        if self.fail {
            return Err(SourceError::Unavailable {
                service: "FANTASYCALC".into(),
                message: "down".into(),
            }
            .into());
        }
        let bump = if format.superflex { 1000.0 } else { 0.0 };
        Ok(vec![
            Asset::new("4984", "Josh Allen", "QB", 9800.0 + bump).with_team("BUF"),
            Asset::new("6794", "Justin Jefferson", "WR", 9000.0 + bump),
            Asset::new("9509", "Bijan Robinson", "RB", 8900.0),
            Asset::new("9493", "Puka Nacua", "WR", 800.0),
            Asset::new("9999", "Rashee Rice", "WR", 700.0),
            Asset::new("0000", "Retired Guy", "WR", 0.0),
            Asset::draft_pick(1, 5400.0),
        ])
    }
}

/// Dynasty and redraft formats value different players; Josh Allen is in both.
pub struct SplitValues;

#[async_trait]
impl ValuationSource for SplitValues {
    async fn fetch_values(&self, format: ValueFormat) -> Result<Vec<Asset>> {
        let only = if format.dynasty {
            Asset::new("1001", "Dynasty Only", "WR", 500.0)
        } else {
            Asset::new("1002", "Redraft Vet", "RB", 400.0)
        };
        Ok(vec![
            Asset::new("4984", "Josh Allen", "QB", 9800.0),
            only,
            Asset::draft_pick(1, 5400.0),
        ])
    }
}

#[derive(Default)]
pub struct FakeSleeper {
    pub users: HashMap<String, SleeperUser>,
    pub leagues: HashMap<String, Vec<League>>,
    pub rosters: HashMap<String, Vec<Roster>>,
    pub members: HashMap<String, Vec<LeagueMember>>,
}

#[async_trait]
impl SleeperApi for FakeSleeper {
    async fn get_user(&self, username: &str) -> Result<SleeperUser> {
        self.users
            .get(username)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("user '{username}'")))
    }

    async fn get_leagues(&self, user_id: &str, _season: i32) -> Result<Vec<League>> {
        Ok(self.leagues.get(user_id).cloned().unwrap_or_default())
    }

    async fn get_rosters(&self, league_id: &str) -> Result<Vec<Roster>> {
        Ok(self.rosters.get(league_id).cloned().unwrap_or_default())
    }

    async fn get_league_users(&self, league_id: &str) -> Result<Vec<LeagueMember>> {
        Ok(self.members.get(league_id).cloned().unwrap_or_default())
    }

    async fn get_players(&self) -> Result<Vec<PlayerRecord>> {
        Ok(vec![
            PlayerRecord::new("4984", "Josh Allen", Some("QB")),
            PlayerRecord::new("6794", "Justin Jefferson", Some("WR")),
            PlayerRecord::new("9493", "Puka Nacua", Some("WR")),
        ])
    }
}

#[derive(Default)]
pub struct FakePlayers {
    pub records: Mutex<Vec<PlayerRecord>>,
}

#[async_trait]
impl PlayerRepositoryTrait for FakePlayers {
    fn get_all(&self) -> Result<Vec<PlayerRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn get_by_ids(&self, ids: &[String]) -> Result<Vec<PlayerRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    fn search(&self, query: &str, limit: i64) -> Result<Vec<PlayerRecord>> {
        let query = query.to_lowercase();
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&query))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<i64> {
        Ok(self.records.lock().unwrap().len() as i64)
    }

    async fn upsert_all(&self, records: Vec<PlayerRecord>) -> Result<usize> {
        let mut stored = self.records.lock().unwrap();
        let written = records.len();
        for record in records {
            stored.retain(|r| r.id != record.id);
            stored.push(record);
        }
        Ok(written)
    }
}

// =========================================================================
// Fixtures
// =========================================================================

fn roster(owner: &str, players: &[&str]) -> Roster {
    Roster {
        roster_id: 1,
        owner_id: Some(owner.to_string()),
        players: players.iter().map(|p| p.to_string()).collect(),
        starters: players.first().map(|p| vec![p.to_string()]).unwrap_or_default(),
    }
}

pub fn sleeper_fixture() -> FakeSleeper {
    let mut api = FakeSleeper::default();
    api.users.insert(
        "coach".into(),
        SleeperUser {
            user_id: "u1".into(),
            username: Some("coach".into()),
            display_name: Some("Coach".into()),
        },
    );
    api.leagues.insert(
        "u1".into(),
        vec![
            League {
                league_id: "L1".into(),
                name: "Dynasty Bros".into(),
                status: "in_season".into(),
                season: Some("2026".into()),
                settings: LeagueSettings { best_ball: Some(0) },
            },
            League {
                league_id: "L2".into(),
                name: "Best Ball Mania".into(),
                status: "in_season".into(),
                season: Some("2026".into()),
                settings: LeagueSettings { best_ball: Some(1) },
            },
        ],
    );
    api.rosters.insert(
        "L1".into(),
        vec![roster("u1", &["4984", "9999"]), roster("u2", &["6794", "9493"])],
    );
    api.rosters
        .insert("L2".into(), vec![roster("u1", &["4984"]), roster("u3", &["9509"])]);
    api.members.insert(
        "L1".into(),
        vec![
            LeagueMember {
                user_id: "u1".into(),
                display_name: Some("Coach".into()),
            },
            LeagueMember {
                user_id: "u2".into(),
                display_name: Some("Rival".into()),
            },
        ],
    );
    api
}

pub fn test_config() -> Config {
    Config {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        db_path: "unused.db".into(),
        cors_allow: vec!["*".into()],
        request_timeout: Duration::from_secs(10),
        log_format: LogFormat::Text,
        supabase_url: None,
        supabase_key: None,
        avatar_bucket: "avatars".into(),
        avatar_extension: "jpg".into(),
        avatar_probe: ProbeStrategy::Head,
        default_avatar_url: "/default-avatar.png".into(),
        profile_base_url: None,
        scrape_timeout: Duration::from_secs(1),
        avatar_concurrency: 2,
        avatar_negative_ttl: None,
        name_overrides_path: None,
        safe_margin: 50.0,
        values_ttl: Duration::from_secs(3600),
        values_base_url: None,
        sleeper_base_url: None,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<FakeStore>,
    pub players: Arc<FakePlayers>,
}

pub fn test_app_with(values: impl ValuationSource + 'static) -> TestApp {
    let config = test_config();
    let store = Arc::new(FakeStore::default());
    store.keys.lock().unwrap().insert("josh-allen.jpg".into());
    let players = Arc::new(FakePlayers::default());
    players
        .records
        .lock()
        .unwrap()
        .push(PlayerRecord::new("4984", "Josh Allen", Some("QB")));
    let sleeper: Arc<dyn SleeperApi> = Arc::new(sleeper_fixture());

    let scraper =
        ProfileScraper::new(Arc::new(MissingPages), store.clone(), "https://profiles.test")
            .unwrap();
    let avatar_service = AvatarService::new(
        Arc::new(SlugNormalizer::with_builtin_overrides()),
        Arc::new(AvatarCache::new()),
        store.clone(),
        scraper,
        AvatarSettings {
            probe: ProbeStrategy::Head,
            concurrency: config.avatar_concurrency,
            ..AvatarSettings::default()
        },
    );

    let state = Arc::new(AppState {
        avatar_service: Arc::new(avatar_service),
        valuation_service: Arc::new(ValuationService::new(
            Arc::new(values),
            config.values_ttl,
        )),
        sleeper_service: Arc::new(SleeperService::new(sleeper.clone(), players.clone())),
        player_service: Arc::new(PlayerService::new(players.clone(), sleeper)),
        safe_margin: config.safe_margin,
    });

    TestApp {
        router: app_router(state, &config),
        store,
        players,
    }
}

pub fn test_app() -> TestApp {
    test_app_with(FakeValues { fail: false })
}

// =========================================================================
// Request helpers
// =========================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
    send(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(router: &Router, uri: &str, body: Value) -> TestResponse {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}
