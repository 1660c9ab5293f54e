use std::sync::Arc;

use chrono::Duration;

use crate::adapters::{
    AppConfig, AvidemuxEditorAdapter, FsLocalAdapter, HttpReqwestAdapter, MplayerPlayerAdapter,
    StdioPromptAdapter,
};
use crate::app::{
    batch_interactor::{BatchInteractor, BatchSettings},
    preview_interactor::PreviewInteractor,
    selection_interactor::{SelectionInteractor, SelectionSettings},
};
use crate::cache::{CacheSettings, ContentCache};
use crate::domain::errors::DomainError;
use crate::planner::PreviewPlanner;
use crate::ports::{EditorPort, FsPort, PlayerPort, PromptPort, TransportPort};
use crate::sources::{CutlistSource, FileSystemSource, LocalAuthoredSource, NetworkSource, SourceSet};

pub const SEARCH_CACHE: &str = "search";
pub const CUTLIST_CACHE: &str = "cutlist";
pub const AUTHORED_CACHE: &str = "mycutlist";

pub trait AppContainer: Send + Sync {
    fn selection_interactor(&self) -> Arc<SelectionInteractor>;
    fn batch_interactor(&self) -> Arc<BatchInteractor>;
    fn preview_interactor(&self) -> Arc<PreviewInteractor>;
}

/// Ports the container wires into every interactor
pub struct ContainerPorts {
    pub transport: Arc<dyn TransportPort>,
    pub prompt: Arc<dyn PromptPort>,
    pub editor: Arc<dyn EditorPort>,
    pub player: Arc<dyn PlayerPort>,
    pub fs: Arc<dyn FsPort>,
}

impl ContainerPorts {
    /// Real adapters for `config`
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        let fs: Arc<dyn FsPort> = Arc::new(FsLocalAdapter::new());
        Ok(Self {
            transport: Arc::new(HttpReqwestAdapter::new()?),
            prompt: Arc::new(StdioPromptAdapter::new()),
            editor: Arc::new(AvidemuxEditorAdapter::new(
                config.editor_command.clone(),
                config.editor_save_workbench,
                Arc::clone(&fs),
            )),
            player: Arc::new(MplayerPlayerAdapter::new(config.player_command.clone())),
            fs,
        })
    }
}

pub struct DefaultAppContainer {
    selection_interactor: Arc<SelectionInteractor>,
    batch_interactor: Arc<BatchInteractor>,
    preview_interactor: Arc<PreviewInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        Self::with_ports(config, ContainerPorts::from_config(config)?)
    }

    pub fn with_ports(config: &AppConfig, ports: ContainerPorts) -> Result<Self, DomainError> {
        let cache_dir = config.cache_dir_path();
        let search_cache = Arc::new(ContentCache::open(
            CacheSettings::new(SEARCH_CACHE)
                .in_directory(cache_dir.clone())
                .expiring_after(Duration::hours(i64::from(config.search_expiry_hours))),
        )?);
        let cutlist_cache = Arc::new(ContentCache::open(
            CacheSettings::new(CUTLIST_CACHE)
                .in_directory(cache_dir.clone())
                .expiring_after(Duration::days(i64::from(config.cutlist_expiry_days))),
        )?);
        let authored_store = Arc::new(ContentCache::open(
            CacheSettings::new(AUTHORED_CACHE).in_directory(cache_dir),
        )?);

        let sources = Arc::new(SourceSet::new(vec![
            CutlistSource::Network(NetworkSource::new(
                Arc::clone(&ports.transport),
                Arc::clone(&ports.prompt),
                search_cache,
                cutlist_cache,
                config.service_url.clone(),
                config.rate_after_use,
            )),
            CutlistSource::LocalAuthored(LocalAuthoredSource::new(
                authored_store,
                Arc::clone(&ports.editor),
                Arc::clone(&ports.prompt),
                config.author.clone(),
            )),
            CutlistSource::FileSystem(FileSystemSource::new(Arc::clone(&ports.fs))),
        ]));

        let priority = config
            .source_order()
            .map_err(|e| DomainError::BadArgs(e.to_string()))?;
        let selection_interactor = Arc::new(SelectionInteractor::new(
            Arc::clone(&sources),
            Arc::clone(&ports.prompt),
            Arc::clone(&ports.fs),
            Arc::clone(&ports.player),
            SelectionSettings {
                priority,
                planner: PreviewPlanner::new(
                    f64::from(config.lead_seconds),
                    f64::from(config.trail_seconds),
                ),
                cut_name: config.cut_name.clone(),
            },
        ));

        let batch_interactor = Arc::new(BatchInteractor::new(
            Arc::clone(&selection_interactor),
            Arc::clone(&sources),
            Arc::clone(&ports.prompt),
            Arc::clone(&ports.fs),
            Arc::clone(&ports.player),
            BatchSettings {
                cut_dir: config.cut_dir_path(),
                check: config.check_cuts,
            },
        ));

        let preview_interactor = Arc::new(PreviewInteractor::new(
            Arc::clone(&sources),
            Arc::clone(&ports.player),
        ));

        Ok(Self {
            selection_interactor,
            batch_interactor,
            preview_interactor,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn selection_interactor(&self) -> Arc<SelectionInteractor> {
        Arc::clone(&self.selection_interactor)
    }

    fn batch_interactor(&self) -> Arc<BatchInteractor> {
        Arc::clone(&self.batch_interactor)
    }

    fn preview_interactor(&self) -> Arc<PreviewInteractor> {
        Arc::clone(&self.preview_interactor)
    }
}
