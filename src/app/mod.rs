//! # App 模块
//!
//! 应用状态与主循环逻辑。

mod bootstrap;
mod draw;
mod update;

pub use bootstrap::*;
pub use draw::*;
pub use update::*;

use crate::audio::AudioManager;
use crate::config::AppConfig;
use crate::input::{InputManager, ResizeDebouncer};
use crate::render::Renderer;
use crate::render::particles::ParticleField;
use crate::render::typewriter::TextTypist;
use crate::resources::{AssetLoader, AssetStore};
use crate::slideshow::SlideshowController;
use crate::state::{AppPhase, RunState};

/// 应用状态
pub struct AppState {
    /// 应用配置
    pub config: AppConfig,
    pub run_state: RunState,
    pub phase: AppPhase,
    /// 启动期加载器（完成后换取 assets）
    pub loader: Option<AssetLoader>,
    /// 加载结果仓库
    pub assets: Option<AssetStore>,
    pub renderer: Renderer,
    pub typist: TextTypist,
    pub particles: ParticleField,
    pub controller: SlideshowController,
    pub audio_manager: AudioManager,
    pub input_manager: InputManager,
    pub resize_debouncer: ResizeDebouncer,
    /// 加载界面的揭幕状态
    pub reveal: RevealPhase,
    /// 当前显示的图片路径（None 表示占位图）
    pub current_image: Option<String>,
    /// 加载覆盖层透明度（完成后从 1 淡出到 0）
    pub overlay_alpha: f32,
    /// 主内容透明度（揭幕时从 0 淡入到 1）
    pub content_alpha: f32,
}

impl AppState {
    /// 创建应用状态（`width`/`height` 为初始视口尺寸）
    pub fn new(config: AppConfig, width: f32, height: f32) -> Self {
        let typist = TextTypist::new(config.text.typing_speed);
        let particles = ParticleField::new(&config.particles, width, height);
        let controller = SlideshowController::new(
            config.text.entries.clone(),
            config.text.fallback.clone(),
            config.slideshow.image_interval,
            config.text.interval,
            config.slideshow.fade_duration,
        );
        let audio_manager = AudioManager::new(config.audio.volume, config.audio.muted);
        let run_state = RunState::new(config.debug.debug_mode);

        Self {
            config,
            run_state,
            phase: AppPhase::Loading,
            loader: None,
            assets: None,
            renderer: Renderer::new(),
            typist,
            particles,
            controller,
            audio_manager,
            input_manager: InputManager::new(),
            resize_debouncer: ResizeDebouncer::new(width, height),
            reveal: RevealPhase::Loading,
            current_image: None,
            overlay_alpha: 1.0,
            content_alpha: 0.0,
        }
    }

    /// 彻底停止：取消轮换、清空文本与粒子、停止音频
    ///
    /// 可重复调用；启动尚未完成时调用也安全。
    pub fn cleanup(&mut self) {
        self.controller.cleanup();
        self.typist.clear();
        self.particles.cleanup();
        self.audio_manager.shutdown();
        self.run_state.stop();
    }
}
