//! Indexed resource slots bound to widgets.
//!
//! Text payloads are applied synchronously. Image loads run on a worker
//! thread (fetch + decode only) and come back over a channel; nothing touches
//! widgets until [`ResourceBindingManager::poll_loads`] runs on the owning
//! thread. Loads on one slot are not coalesced: whichever resolves last is
//! what the slot ends up showing.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, error, info, warn};
use parking_lot::RwLock;

use nabu_engine::host::{ImageContent, UiHost};

use crate::attrs::AttrEnum;
use crate::config::SessionConfig;
use crate::error::FetchError;
use crate::widget::{WidgetId, Widgets};

/// Largest remote body accepted.
const MAX_REMOTE_BYTES: u64 = 10 * 1024 * 1024;

/// Extensions tried, in order, for logical resource paths without one.
const PROBE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

// ── Slot model ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotKind {
    #[default]
    Unbound,
    Text,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

/// Where [`ResourceBindingManager::load_image`] gets its bytes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    LocalFile,
    BundledAsset,
    LogicalResourcePath,
    RemoteUrl,
    ManagedAddressable,
}

impl AttrEnum for SourceKind {
    const TYPE_NAME: &'static str = "source kind";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("localfile",           SourceKind::LocalFile),
        ("file",                SourceKind::LocalFile),
        ("bundledasset",        SourceKind::BundledAsset),
        ("bundle",              SourceKind::BundledAsset),
        ("logicalresourcepath", SourceKind::LogicalResourcePath),
        ("resource",            SourceKind::LogicalResourcePath),
        ("remoteurl",           SourceKind::RemoteUrl),
        ("url",                 SourceKind::RemoteUrl),
        ("managedaddressable",  SourceKind::ManagedAddressable),
        ("address",             SourceKind::ManagedAddressable),
    ];
}

#[derive(Debug, Clone, Default)]
pub struct ResourceSlot {
    pub kind: SlotKind,
    pub state: LoadState,
    text: Option<String>,
    image: Option<ImageContent>,
    source: Option<String>,
    bindings: Vec<WidgetId>,
    /// Newest load request issued for this slot.
    latest_request: u64,
    in_flight: u32,
}

impl ResourceSlot {
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn image(&self) -> Option<&ImageContent> {
        self.image.as_ref()
    }

    /// Source string of the last image applied.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn bindings(&self) -> &[WidgetId] {
        &self.bindings
    }
}

// ── Fetching ──────────────────────────────────────────────────────────────

/// In-memory assets addressable by name. Cloning shares the store.
#[derive(Debug, Clone, Default)]
pub struct Bundles(Arc<RwLock<HashMap<String, Arc<[u8]>>>>);

impl Bundles {
    pub fn insert(&self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.0.write().insert(name.into(), bytes.into());
    }

    pub fn get(&self, name: &str) -> Option<Arc<[u8]>> {
        self.0.read().get(name).cloned()
    }

    pub fn remove(&self, name: &str) -> bool {
        self.0.write().remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }
}

/// Everything a worker needs to produce bytes for one load.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub source: String,
    pub kind: SourceKind,
    pub bundles: Bundles,
}

/// Byte transport for image loads. Runs on worker threads.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError>;
}

/// Filesystem, bundle, resource-root, HTTP and address-catalog fetching.
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    resource_root: PathBuf,
    addressables: BTreeMap<String, String>,
    timeout: Duration,
}

impl DefaultFetcher {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            resource_root: config.resource_root.clone(),
            addressables: config.addressables.clone(),
            timeout: Duration::from_secs(config.http_timeout_secs),
        }
    }

    fn read_file(path: &Path) -> Result<Vec<u8>, FetchError> {
        fs::read(path).map_err(|source| FetchError::Io { path: path.display().to_string(), source })
    }

    /// `name` under the resource root; without an extension the known
    /// image extensions are probed in order.
    fn read_resource(&self, name: &str) -> Result<Vec<u8>, FetchError> {
        let base = self.resource_root.join(name.trim_start_matches('/'));
        if base.extension().is_some() && base.is_file() {
            return Self::read_file(&base);
        }
        for ext in PROBE_EXTENSIONS {
            let candidate = base.with_extension(ext);
            if candidate.is_file() {
                return Self::read_file(&candidate);
            }
        }
        Err(FetchError::ResourceNotFound(name.to_string()))
    }

    fn http_get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = ureq::get(url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| FetchError::Http { url: url.to_string(), reason: e.to_string() })?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_REMOTE_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|source| FetchError::Io { path: url.to_string(), source })?;
        Ok(bytes)
    }
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

impl Fetcher for DefaultFetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError> {
        let source = request.source.as_str();
        match request.kind {
            SourceKind::LocalFile           => Self::read_file(Path::new(source)),
            SourceKind::BundledAsset        => request
                .bundles
                .get(source)
                .map(|b| b.to_vec())
                .ok_or_else(|| FetchError::MissingBundle(source.to_string())),
            SourceKind::LogicalResourcePath => self.read_resource(source),
            SourceKind::RemoteUrl           => self.http_get(source),
            SourceKind::ManagedAddressable  => {
                let location = self
                    .addressables
                    .get(source)
                    .ok_or_else(|| FetchError::UnknownAddress(source.to_string()))?;
                if is_url(location) {
                    self.http_get(location)
                } else {
                    self.read_resource(location)
                }
            }
        }
    }
}

fn decode(bytes: &[u8]) -> Result<ImageContent, FetchError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ImageContent::new(width, height, rgba.into_raw()))
}

#[derive(Debug)]
struct LoadOutcome {
    slot: usize,
    request: u64,
    source: String,
    result: Result<ImageContent, FetchError>,
}

// ── ResourceBindingManager ────────────────────────────────────────────────

pub struct ResourceBindingManager {
    slots: Vec<ResourceSlot>,
    fetcher: Arc<dyn Fetcher>,
    bundles: Bundles,
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
    in_flight: usize,
    next_request: u64,
}

impl ResourceBindingManager {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_fetcher(config.slot_count, Arc::new(DefaultFetcher::new(config)))
    }

    pub fn with_fetcher(slot_count: usize, fetcher: Arc<dyn Fetcher>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            slots: vec![ResourceSlot::default(); slot_count],
            fetcher,
            bundles: Bundles::default(),
            tx,
            rx,
            in_flight: 0,
            next_request: 0,
        }
    }

    /// Replaces the transport used by later loads.
    pub fn set_fetcher(&mut self, fetcher: Arc<dyn Fetcher>) {
        self.fetcher = fetcher;
    }

    pub fn bundles(&self) -> &Bundles {
        &self.bundles
    }

    pub fn register_bundle(&self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.bundles.insert(name, bytes);
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Option<&ResourceSlot> {
        self.slots.get(index)
    }

    fn slot_mut(&mut self, index: usize, op: &str) -> Option<&mut ResourceSlot> {
        let count = self.slots.len();
        let slot = self.slots.get_mut(index);
        if slot.is_none() {
            warn!("{}: resource slot {} out of range (0..{})", op, index, count);
        }
        slot
    }

    // ── Bindings ──────────────────────────────────────────────────────────

    /// Binds `id` to `slot`, moving it off any slot it was bound to, and
    /// pushes the slot's current payload to it.
    pub fn bind(&mut self, slot: usize, id: WidgetId, widgets: &mut Widgets, host: &mut dyn UiHost) -> bool {
        if self.slot_mut(slot, "bind").is_none() {
            return false;
        }
        self.unbind(id, widgets);

        let Some(handle) = widgets.get_mut(id) else {
            warn!("bind: no widget {}", id);
            return false;
        };
        let s = &mut self.slots[slot];
        s.bindings.push(id);
        handle.slot = Some(slot);

        if s.kind == SlotKind::Unbound {
            if handle.has_text_surface() {
                s.kind = SlotKind::Text;
            } else if handle.has_image_surface() {
                s.kind = SlotKind::Image;
            }
        }
        if let Some(text) = &s.text {
            handle.show_text(host, text);
        }
        if let Some(image) = &s.image {
            handle.show_image(host, image);
        }
        debug!("bound '{}' to slot {}", handle.name, slot);
        true
    }

    /// Detaches `id` from whatever slot holds it.
    pub fn unbind(&mut self, id: WidgetId, widgets: &mut Widgets) -> bool {
        let recorded = widgets.get_mut(id).and_then(|h| h.slot.take());
        let mut removed = false;
        match recorded.and_then(|i| self.slots.get_mut(i)) {
            Some(slot) => {
                let before = slot.bindings.len();
                slot.bindings.retain(|b| *b != id);
                removed = slot.bindings.len() != before;
            }
            None => {
                for slot in &mut self.slots {
                    let before = slot.bindings.len();
                    slot.bindings.retain(|b| *b != id);
                    removed |= slot.bindings.len() != before;
                }
            }
        }
        removed
    }

    /// Unbinds `id`, then binds it to `slot`.
    pub fn change_binding(&mut self, id: WidgetId, slot: usize, widgets: &mut Widgets, host: &mut dyn UiHost) -> bool {
        self.unbind(id, widgets);
        self.bind(slot, id, widgets, host)
    }

    /// Moves the `index`-th binding of `from` over to `to`.
    pub fn move_binding(
        &mut self,
        from: usize,
        to: usize,
        index: usize,
        widgets: &mut Widgets,
        host: &mut dyn UiHost,
    ) -> bool {
        if self.slot_mut(to, "move_binding").is_none() {
            return false;
        }
        let Some(source) = self.slot_mut(from, "move_binding") else {
            return false;
        };
        let Some(&id) = source.bindings.get(index) else {
            warn!("move_binding: slot {} has no binding #{}", from, index);
            return false;
        };
        self.bind(to, id, widgets, host)
    }

    /// Drops every binding. Payloads stay in their slots; handles keep a
    /// stale back-reference until the caller discards them.
    pub fn clear_bindings(&mut self) {
        for slot in &mut self.slots {
            slot.bindings.clear();
        }
    }

    // ── Payloads ──────────────────────────────────────────────────────────

    /// Stores `text` in `slot` and shows it on every bound handle with a
    /// text surface. Returns how many handles were updated.
    pub fn set_text(&mut self, slot: usize, text: &str, widgets: &mut Widgets, host: &mut dyn UiHost) -> usize {
        let Some(s) = self.slot_mut(slot, "set_text") else {
            return 0;
        };
        s.kind = SlotKind::Text;
        s.text = Some(text.to_string());
        s.state = LoadState::Loaded;

        let mut updated = 0;
        for &id in &s.bindings {
            if let Some(h) = widgets.get_mut(id) {
                if h.show_text(host, text) {
                    updated += 1;
                } else {
                    debug!("slot {}: '{}' has no text surface", slot, h.name);
                }
            }
        }
        updated
    }

    /// Starts an asynchronous image load into `slot`. Returns the request
    /// number, or `None` if the slot does not exist or no worker could start.
    pub fn load_image(&mut self, slot: usize, source: &str, kind: SourceKind) -> Option<u64> {
        self.slot_mut(slot, "load_image")?;
        self.next_request += 1;
        let request = self.next_request;

        let fetch = FetchRequest { source: source.to_string(), kind, bundles: self.bundles.clone() };
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("nabu-load-{}", request))
            .spawn(move || {
                let result = fetcher.fetch(&fetch).and_then(|bytes| decode(&bytes));
                // The manager may be gone already; nothing to report to.
                let _ = tx.send(LoadOutcome { slot, request, source: fetch.source, result });
            });
        if let Err(e) = spawned {
            error!("slot {}: could not start loader for {:?}: {}", slot, source, e);
            return None;
        }

        let s = &mut self.slots[slot];
        s.kind = SlotKind::Image;
        s.latest_request = request;
        s.in_flight += 1;
        s.state = LoadState::Loading;
        self.in_flight += 1;
        debug!("slot {}: loading {:?} as {:?} (request {})", slot, source, kind, request);
        Some(request)
    }

    pub fn pending_loads(&self) -> usize {
        self.in_flight
    }

    /// Applies every finished load. Returns how many were applied.
    pub fn poll_loads(&mut self, widgets: &mut Widgets, host: &mut dyn UiHost) -> usize {
        let ready: Vec<LoadOutcome> = self.rx.try_iter().collect();
        let n = ready.len();
        for outcome in ready {
            self.apply(outcome, widgets, host);
        }
        n
    }

    /// Blocks until every outstanding load has finished or `timeout` passes,
    /// applying results as they arrive.
    pub fn wait_for_loads(&mut self, timeout: Duration, widgets: &mut Widgets, host: &mut dyn UiHost) -> usize {
        let deadline = Instant::now() + timeout;
        let mut applied = 0;
        while self.in_flight > 0 {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(left) {
                Ok(outcome) => {
                    self.apply(outcome, widgets, host);
                    applied += 1;
                }
                Err(_) => {
                    warn!("{} image load(s) still pending after {:?}", self.in_flight, timeout);
                    break;
                }
            }
        }
        applied
    }

    fn apply(&mut self, outcome: LoadOutcome, widgets: &mut Widgets, host: &mut dyn UiHost) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let LoadOutcome { slot, request, source, result } = outcome;
        let Some(s) = self.slots.get_mut(slot) else { return };
        s.in_flight = s.in_flight.saturating_sub(1);

        if request < s.latest_request {
            debug!(
                "slot {}: request {} resolved after newer request {}; applying it anyway",
                slot, request, s.latest_request
            );
        }

        match result {
            Ok(image) => {
                info!("slot {}: loaded {:?} ({}x{})", slot, source, image.width, image.height);
                for &id in &s.bindings {
                    if let Some(h) = widgets.get_mut(id) {
                        h.show_image(host, &image);
                    }
                }
                s.image = Some(image);
                s.source = Some(source);
            }
            Err(e) => error!("slot {}: failed to load {:?}: {}", slot, source, e),
        }

        s.state = if s.in_flight > 0 {
            LoadState::Loading
        } else if s.image.is_some() {
            LoadState::Loaded
        } else {
            LoadState::Unloaded
        };
    }
}

impl std::fmt::Debug for ResourceBindingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceBindingManager")
            .field("slots", &self.slots.len())
            .field("bundles", &self.bundles.len())
            .field("in_flight", &self.in_flight)
            .finish()
    }
}
