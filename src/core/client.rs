use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::{Mutex, RwLock};

use crate::contract::{FileRegistry, RpcFileRegistry};
use crate::core::{AccessGrant, ContentReference, DriveConfig, DriveError, Result};
use crate::gateway::{GatewayResolver, Retrieved};
use crate::history::{AccessHistory, AccessHistoryEntry, Favorites};
use crate::inventory::{self, Listing};
use crate::market::{ChartPeriod, PriceClient, PricePoint, PriceQuote};
use crate::pinning::{self, PinningService};
use crate::store::{DocumentStore, JsonFileStore};
use crate::wallet::{WalletRpc, WalletSummary};

/// Who is connected in this session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Account acting on the registry
    pub account: Option<String>,
    /// Every account connected during this session, in connection order
    pub connected_accounts: Vec<String>,
}

/// Result of uploading one file
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub path: PathBuf,
    pub name: String,
    pub content_id: Option<String>,
    pub tx_hash: Option<String>,
    pub error: Option<String>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Wallet dashboard data
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub summary: WalletSummary,
    pub quote: Option<PriceQuote>,
    pub period: ChartPeriod,
    pub chart: Vec<PricePoint>,
}

/// Components used to assemble a client
pub struct DriveParts {
    pub config: DriveConfig,
    pub resolver: Arc<GatewayResolver>,
    pub store: Arc<dyn DocumentStore>,
    pub pinning: Arc<dyn PinningService>,
    /// Registry to use; when absent one is built over JSON-RPC on connect
    pub registry: Option<Arc<dyn FileRegistry>>,
    /// Account to start connected as
    pub account: Option<String>,
}

/// Application state: the session plus every boundary client, passed
/// explicitly to whoever needs it
pub struct DriveClient {
    config: DriveConfig,
    session: RwLock<Session>,
    resolver: Arc<GatewayResolver>,
    history: Mutex<AccessHistory>,
    favorites: Mutex<Favorites>,
    wallet: Arc<WalletRpc>,
    registry: RwLock<Option<Arc<dyn FileRegistry>>>,
    pinning: Arc<dyn PinningService>,
    market: PriceClient,
}

impl DriveClient {
    /// Create a client using the provided configuration
    pub fn new(config: DriveConfig) -> Result<Self> {
        log::info!(
            "Creating DgDrive client: {} gateway(s), data in {}",
            config.gateway.endpoints.len(),
            config.data_dir.display()
        );

        let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(&config.data_dir));
        let resolver = Arc::new(GatewayResolver::from_config(&config.gateway)?);
        let pinning = pinning::from_config(&config.pinning)?;

        Self::from_parts(DriveParts {
            config,
            resolver,
            store,
            pinning,
            registry: None,
            account: None,
        })
    }

    /// Assemble a client from explicit components
    pub fn from_parts(parts: DriveParts) -> Result<Self> {
        let history = AccessHistory::open_or_empty(parts.store.clone(), parts.config.history.capacity);
        let favorites = Favorites::open_or_empty(parts.store.clone());
        let wallet = Arc::new(WalletRpc::new(&parts.config.wallet)?);
        let market = PriceClient::new(parts.config.market.clone())?;

        let session = Session {
            account: parts.account.clone(),
            connected_accounts: parts.account.into_iter().collect(),
        };

        Ok(Self {
            config: parts.config,
            session: RwLock::new(session),
            resolver: parts.resolver,
            history: Mutex::new(history),
            favorites: Mutex::new(favorites),
            wallet,
            registry: RwLock::new(parts.registry),
            pinning: parts.pinning,
            market,
        })
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    pub fn resolver(&self) -> &Arc<GatewayResolver> {
        &self.resolver
    }

    // ----------------- Wallet -----------------

    /// Connect to the wallet and remember the account for this session
    pub async fn connect_wallet(&self) -> Result<String> {
        let account = self.wallet.connect(self.config.wallet.account.as_deref()).await?;
        log::info!("Connected wallet account {}", account);

        {
            let mut session = self.session.write();
            session.account = Some(account.clone());
            if !session.connected_accounts.contains(&account) {
                session.connected_accounts.push(account.clone());
            }
        }

        let registry_missing = self.registry.read().is_none();
        if registry_missing {
            let registry = RpcFileRegistry::new(self.wallet.clone(), self.config.contract.clone(), &account)?;
            *self.registry.write() = Some(Arc::new(registry));
        }

        Ok(account)
    }

    async fn account(&self) -> Result<String> {
        let current = self.session.read().account.clone();
        match current {
            Some(account) => Ok(account),
            None => self.connect_wallet().await,
        }
    }

    async fn registry(&self) -> Result<Arc<dyn FileRegistry>> {
        let current = self.registry.read().clone();
        if let Some(registry) = current {
            return Ok(registry);
        }

        self.connect_wallet().await?;
        self.registry
            .read()
            .clone()
            .ok_or_else(|| DriveError::WalletUnavailable("No registry available".to_string()))
    }

    pub async fn wallet_summary(&self) -> Result<WalletSummary> {
        let account = self.account().await?;
        self.wallet.summary(&account).await
    }

    /// Wallet summary plus market data; market failures only leave gaps
    pub async fn dashboard(&self, period: ChartPeriod) -> Result<Dashboard> {
        let account = self.account().await?;
        let (summary, quote, chart) = futures::join!(
            self.wallet.summary(&account),
            self.market.spot_price(),
            self.market.market_chart(period)
        );

        let quote = quote
            .map_err(|e| log::warn!("Price quote unavailable: {}", e))
            .ok();
        let chart = chart.unwrap_or_else(|e| {
            log::warn!("Price chart unavailable: {}", e);
            Vec::new()
        });

        Ok(Dashboard {
            summary: summary?,
            quote,
            period,
            chart,
        })
    }

    // ----------------- Upload -----------------

    /// Pin each file and record it on the registry.
    ///
    /// A failure for one file is reported in its outcome and does not stop the others.
    pub async fn upload_files(&self, paths: &[PathBuf], is_public: bool) -> Result<Vec<UploadOutcome>> {
        if paths.is_empty() {
            return Err(DriveError::InvalidArgument("Please select files to upload".to_string()));
        }

        let registry = self.registry().await?;
        let mut outcomes = Vec::with_capacity(paths.len());

        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let mut outcome = UploadOutcome {
                path: path.clone(),
                name: name.clone(),
                content_id: None,
                tx_hash: None,
                error: None,
            };

            match self.upload_one(registry.as_ref(), path, &name, is_public, &mut outcome).await {
                Ok(()) => log::info!("Uploaded {} with CID {:?}", name, outcome.content_id),
                Err(e) => {
                    log::error!("Upload of {} failed: {}", name, e);
                    outcome.error = Some(e.to_string());
                }
            }
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    async fn upload_one(
        &self,
        registry: &dyn FileRegistry,
        path: &Path,
        name: &str,
        is_public: bool,
        outcome: &mut UploadOutcome,
    ) -> Result<()> {
        let data = tokio::fs::read(path).await?;
        let receipt = self.pinning.pin_bytes(name, Bytes::from(data)).await?;
        outcome.content_id = Some(receipt.content_id.clone());

        let tx = registry.upload_file(name, &receipt.content_id, is_public).await?;
        outcome.tx_hash = Some(tx.tx_hash);
        Ok(())
    }

    // ----------------- Listings -----------------

    /// Files owned by the connected account
    pub async fn my_files(&self) -> Result<Listing> {
        let registry = self.registry().await?;
        let account = self.account().await?;

        match registry.my_files().await {
            Ok(files) => Ok(Listing::from_files(&account, files)),
            Err(e) => {
                log_listing_failure(&account, &e);
                Ok(Listing::failed(&account, "Failed to load your files. Please try again."))
            }
        }
    }

    /// Files of another owner; a successful fetch is remembered in the history
    pub async fn owner_files(&self, owner: &str) -> Result<Listing> {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(DriveError::InvalidArgument("Enter a user address".to_string()));
        }

        let registry = self.registry().await?;
        let files = match registry.files_of(owner).await {
            Ok(files) => files,
            Err(e @ DriveError::InvalidArgument(_)) => return Err(e),
            Err(e) => {
                log_listing_failure(owner, &e);
                return Ok(Listing::failed(
                    owner,
                    "You don't have access to this user's files or an error occurred.",
                ));
            }
        };

        let mut listing = Listing::from_files(owner, files);
        if let Err(e) = self.history.lock().record_access(owner, listing.files().len()) {
            listing.history_error = Some(e.to_string());
        }
        Ok(listing)
    }

    // ----------------- Retrieval -----------------

    pub fn resolve_url(&self, content_id: &str) -> Result<String> {
        let reference = ContentReference::new(content_id)?;
        Ok(self.resolver.resolve_url(reference.content_id()))
    }

    /// Fetch content for inline display
    pub async fn preview(&self, content_id: &str) -> Result<Retrieved> {
        let reference = ContentReference::new(content_id)?;
        self.resolver.fetch_with_fallback(reference.content_id()).await
    }

    /// Fetch several items concurrently through the shared resolver
    pub async fn preview_many(&self, content_ids: &[String]) -> Vec<Result<Retrieved>> {
        futures::future::join_all(content_ids.iter().map(|id| self.preview(id))).await
    }

    /// Fetch content and save it under `dest_dir`; returns the written path
    pub async fn download(&self, reference: &ContentReference, dest_dir: &Path) -> Result<PathBuf> {
        let retrieved = self.resolver.fetch_with_fallback(reference.content_id()).await?;

        // Only the final component of a remote name is trusted
        let file_name = Path::new(reference.display_name())
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| reference.content_id().into());
        let target = dest_dir.join(file_name);

        tokio::fs::create_dir_all(dest_dir).await?;
        tokio::fs::write(&target, &retrieved.bytes).await?;

        log::info!(
            "Downloaded {} ({} bytes) from {} to {}",
            reference,
            retrieved.bytes.len(),
            retrieved.url,
            target.display()
        );
        Ok(target)
    }

    // ----------------- Sharing -----------------

    pub async fn grant_access(&self, user: &str) -> Result<String> {
        let user = non_empty_address(user)?;
        let registry = self.registry().await?;
        let receipt = registry.grant_access(user).await?;
        Ok(receipt.tx_hash)
    }

    pub async fn revoke_access(&self, user: &str) -> Result<String> {
        let user = non_empty_address(user)?;
        let registry = self.registry().await?;
        let receipt = registry.revoke_access(user).await?;
        Ok(receipt.tx_hash)
    }

    pub async fn access_list(&self) -> Result<Vec<AccessGrant>> {
        self.registry().await?.access_list().await
    }

    /// Previously granted addresses matching `input`
    pub async fn access_suggestions(&self, input: &str) -> Result<Vec<AccessGrant>> {
        let grants = self.access_list().await?;
        Ok(inventory::suggest(&grants, input).into_iter().cloned().collect())
    }

    // ----------------- History & favorites -----------------

    pub fn history(&self) -> Vec<AccessHistoryEntry> {
        self.history.lock().list().to_vec()
    }

    /// Why the stored history could not be loaded, if it could not
    pub fn history_load_error(&self) -> Option<String> {
        self.history.lock().load_error().map(str::to_string)
    }

    /// Rename a remembered owner; false when the owner is not in the history
    pub fn label_owner(&self, owner: &str, label: &str) -> Result<bool> {
        self.history.lock().set_label(owner, label)
    }

    pub fn forget_owner(&self, owner: &str) -> Result<()> {
        self.history.lock().remove(owner)
    }

    pub fn favorites_load_error(&self) -> Option<String> {
        self.favorites.lock().load_error().map(str::to_string)
    }

    pub fn favorites(&self) -> Vec<String> {
        self.favorites.lock().list().to_vec()
    }

    pub fn add_favorite(&self, content_id: &str) -> Result<bool> {
        let reference = ContentReference::new(content_id)?;
        self.favorites.lock().add(reference.content_id())
    }

    pub fn remove_favorite(&self, content_id: &str) -> Result<bool> {
        self.favorites.lock().remove(content_id)
    }

    pub fn toggle_favorite(&self, content_id: &str) -> Result<bool> {
        let reference = ContentReference::new(content_id)?;
        self.favorites.lock().toggle(reference.content_id())
    }
}

/// Remote call failures are logged as warnings, local ones as errors
fn log_listing_failure(owner: &str, e: &DriveError) {
    if e.is_remote_call() {
        log::warn!("Listing files of {} failed: {}", owner, e);
    } else {
        log::error!("Error fetching files of {}: {}", owner, e);
    }
}

fn non_empty_address(address: &str) -> Result<&str> {
    let address = address.trim();
    if address.is_empty() {
        return Err(DriveError::InvalidArgument("Enter a valid address".to_string()));
    }
    Ok(address)
}
