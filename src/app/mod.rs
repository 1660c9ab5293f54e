// Application layer - Use case interactors

pub mod batch_interactor;
pub mod container;
pub mod preview_interactor;
pub mod selection_interactor;

// Re-export interactors
pub use batch_interactor::{BatchInteractor, BatchReport, BatchSettings};
pub use container::{AppContainer, DefaultAppContainer};
pub use preview_interactor::{PreviewInteractor, PreviewReport, PreviewRequest};
pub use selection_interactor::{SelectionInteractor, SelectionSettings};
