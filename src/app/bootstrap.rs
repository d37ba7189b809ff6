//! 启动与资源引导（bootstrap）
//!
//! 加载阶段的驱动：逐帧收取加载事件、更新进度界面，全部结算后做
//! 揭幕过渡（进度层淡出、主内容淡入）并完成资源交接。
//! 资源失败只降级画面，永远不会阻塞进入主内容。

use macroquad::prelude::{screen_height, screen_width};
use tracing::{info, warn};

use super::AppState;
use crate::input::InputFrame;
use crate::resources::AssetLoader;
use crate::state::AppPhase;

/// 揭幕过渡每个阶段的时长（秒）
const REVEAL_FADE_SECONDS: f32 = 0.5;

/// 揭幕状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealPhase {
    /// 仍在加载
    Loading,
    /// 加载完成，进度层淡出中
    OverlayFadeOut {
        /// 阶段计时器
        timer: f32,
    },
    /// 主内容淡入中
    ContentFadeIn {
        /// 阶段计时器
        timer: f32,
    },
    /// 揭幕完成
    Done,
}

/// 启动所有资源加载任务
pub fn begin_loading(app: &mut AppState) {
    info!("开始加载资源");
    app.loader = Some(AssetLoader::start(&app.config));
}

/// 加载阶段的每帧更新
pub fn update_loading(app: &mut AppState, dt: f32, frame: &InputFrame) {
    // 粒子在加载期间照常运行，点击同样触发雨滴
    if let Some((x, y)) = frame.clicked_at {
        app.particles.spawn_raindrops(x, y);
    }
    if let Some((width, height)) = app
        .resize_debouncer
        .update(dt, screen_width(), screen_height())
    {
        app.particles.resize(width, height);
    }
    app.particles.update(dt);

    if let Some(ref mut loader) = app.loader {
        loader.pump();
    }

    match app.reveal {
        RevealPhase::Loading => {
            let complete = app.loader.as_ref().map(|l| l.is_complete()).unwrap_or(true);
            if complete {
                app.reveal = RevealPhase::OverlayFadeOut { timer: 0.0 };
            }
        }
        RevealPhase::OverlayFadeOut { timer } => {
            let timer = timer + dt;
            app.overlay_alpha = (1.0 - timer / REVEAL_FADE_SECONDS).clamp(0.0, 1.0);
            if timer >= REVEAL_FADE_SECONDS {
                hand_off(app);
            } else {
                app.reveal = RevealPhase::OverlayFadeOut { timer };
            }
        }
        // 后续阶段在展示模式下推进
        _ => {}
    }
}

/// 加载结果交接：音频给音频管理器，图片列表交给编排器，进入展示模式
fn hand_off(app: &mut AppState) {
    let Some(loader) = app.loader.take() else {
        warn!("加载器缺失，以空资源进入展示模式");
        app.phase = AppPhase::Displaying;
        app.reveal = RevealPhase::ContentFadeIn { timer: 0.0 };
        let actions = app.controller.start(Vec::new());
        super::update::apply_actions(app, actions);
        return;
    };

    let mut store = loader.finish();

    if let Some(bytes) = store.take_audio() {
        app.audio_manager.attach(bytes);
    } else {
        info!("没有可用音轨，本次保持静音");
    }

    let images = store.image_paths().to_vec();
    if images.is_empty() {
        warn!("没有加载成功的图片，将显示占位图");
    }

    app.assets = Some(store);
    app.overlay_alpha = 0.0;
    app.phase = AppPhase::Displaying;
    app.reveal = RevealPhase::ContentFadeIn { timer: 0.0 };

    let actions = app.controller.start(images);
    super::update::apply_actions(app, actions);
}
