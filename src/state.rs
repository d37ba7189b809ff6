//! # State 模块
//!
//! 应用级运行状态。

/// 应用所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// 启动加载中（显示进度条）
    Loading,
    /// 正常展示中（幻灯片 + 文本 + 粒子）
    Displaying,
}

/// 运行开关集合
///
/// `paused` 只记录暂停意图；音频、粒子与轮换的统一停走由应用层的
/// 同一入口执行。
#[derive(Debug, Clone, Copy)]
pub struct RunState {
    /// 主循环是否继续
    pub running: bool,
    /// 是否处于统一暂停
    pub paused: bool,
    /// 调试面板开关
    pub debug_mode: bool,
}

impl RunState {
    pub fn new(debug_mode: bool) -> Self {
        Self {
            running: true,
            paused: false,
            debug_mode,
        }
    }

    /// 请求退出主循环
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn toggle_debug(&mut self) {
        self.debug_mode = !self.debug_mode;
    }
}
