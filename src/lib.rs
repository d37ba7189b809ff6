//! # Ambience
//!
//! 装饰性的桌面氛围页：启动时并行预加载图片与背景音乐，之后循环播放
//! 幻灯片、打字机文本，并在内容后方渲染轻量粒子效果（持续落雪、点击
//! 触发雨滴）。
//!
//! ## 架构说明
//!
//! - 资源加载在工作线程中解码，主循环逐帧收取完成事件并更新进度
//! - 打字机 / 粒子 / 幻灯片三个组件各自持有 dt 驱动的状态机
//! - 运行期三者互不依赖，仅在暂停 / 恢复时被统一协调

pub mod app;
pub mod audio;
pub mod config;
pub mod input;
pub mod render;
pub mod resources;
pub mod slideshow;
pub mod state;
pub mod texts;

pub use audio::AudioManager;
pub use config::{
    AppConfig, AudioConfig, ConfigError, DebugConfig, ParticleConfig, SlideshowConfig, SpeedRange,
    TextConfig, WindowConfig,
};
pub use input::{InputFrame, InputManager, ResizeDebouncer};
pub use render::particles::ParticleField;
pub use render::typewriter::TextTypist;
pub use render::{DrawMode, Renderer};
pub use resources::{AssetLoader, AssetStore, ProgressCounter, ResourceError};
pub use slideshow::{SlideshowAction, SlideshowController};
pub use state::{AppPhase, RunState};
pub use texts::{GeneratorKind, TextEntry};
