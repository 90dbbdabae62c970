pub mod config_service;
pub mod paths;
pub mod replay_camera;
pub mod sidecar_landmarker;

pub use crate::config_service::ConfigService;
pub use crate::paths::PagewavePaths;
pub use crate::replay_camera::ReplayCamera;
pub use crate::sidecar_landmarker::SidecarLandmarker;
