// Adapters - External system implementations

pub mod avidemux_editor;
pub mod fs_local;
pub mod http_reqwest;
pub mod mock;
pub mod mplayer_player;
pub mod stdio_prompt;
pub mod toml_config;

// Re-export adapters
pub use avidemux_editor::AvidemuxEditorAdapter;
pub use fs_local::FsLocalAdapter;
pub use http_reqwest::HttpReqwestAdapter;
pub use mock::{
    MockEditorAdapter, MockFsAdapter, MockTransportAdapter, RecordingPlayerAdapter,
    ScriptedPromptAdapter,
};
pub use mplayer_player::MplayerPlayerAdapter;
pub use stdio_prompt::StdioPromptAdapter;
pub use toml_config::{AppConfig, TomlConfigAdapter};
