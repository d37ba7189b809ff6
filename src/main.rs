//! Ambience - 桌面氛围页
//!
//! 启动时并行预加载图片与音乐，之后循环幻灯片、打字机文本与粒子
//! 效果。main 只保留入口、配置装载与主循环胶水。

use std::path::PathBuf;

use clap::Parser;
use macroquad::prelude::*;
use tracing::warn;

use ambience::app::{AppState, begin_loading, draw, update};
use ambience::config::AppConfig;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "ambience", about = "桌面氛围页：幻灯片 + 打字机文本 + 粒子效果")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 资源根目录（覆盖配置文件中的 assets_root）
    #[arg(long)]
    assets: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config);
    if let Some(assets) = cli.assets {
        config.assets_root = assets;
    }

    // 配置问题只降级画面，不阻止启动
    if let Err(e) = config.validate() {
        warn!(error = %e, "配置验证未通过，继续以当前值运行");
    }

    let conf = window_conf(&config);
    macroquad::Window::from_config(conf, run(config));
}

/// 由配置构建窗口参数
fn window_conf(config: &AppConfig) -> Conf {
    Conf {
        window_title: config.window.title.clone(),
        window_width: config.window.width as i32,
        window_height: config.window.height as i32,
        fullscreen: config.window.fullscreen,
        high_dpi: config.window.high_dpi,
        window_resizable: true,
        ..Default::default()
    }
}

/// 主循环
async fn run(config: AppConfig) {
    macroquad::rand::srand(macroquad::miniquad::date::now() as u64);

    let font_path = config.font_full_path();
    let mut app = AppState::new(config, screen_width(), screen_height());

    // 字体加载失败会在内部记日志并回退到默认字体
    let _ = app.renderer.init(&font_path.to_string_lossy()).await;

    begin_loading(&mut app);

    loop {
        update(&mut app);
        draw(&mut app);

        if !app.run_state.running {
            break;
        }
        next_frame().await;
    }

    app.cleanup();
}
