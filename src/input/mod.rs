//! # Input 模块
//!
//! 输入采集与视口尺寸防抖。
//!
//! ## 设计说明
//!
//! - `InputManager` 每帧采集 macroquad 的鼠标和键盘事件
//! - 任何点击或按键都算"用户手势"，用于解锁音频播放
//! - `ResizeDebouncer` 把连续拖拽缩放合并为一次生效

use macroquad::prelude::*;

/// 视口尺寸防抖窗口（秒）
const RESIZE_DEBOUNCE_SECONDS: f32 = 0.25;

/// 单帧输入快照
#[derive(Debug, Clone, Copy, Default)]
pub struct InputFrame {
    /// 左键点击位置（本帧按下时）
    pub clicked_at: Option<(f32, f32)>,
    /// 本帧是否有用户手势（点击或任意按键）
    pub gesture: bool,
    /// 是否请求切换暂停（空格）
    pub toggle_pause: bool,
    /// 是否请求切换调试模式（F1）
    pub toggle_debug: bool,
    /// 是否请求退出（Esc）
    pub quit: bool,
}

/// 输入管理器
#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    /// 创建新的输入管理器
    pub fn new() -> Self {
        Self
    }

    /// 采集本帧输入
    pub fn poll(&mut self) -> InputFrame {
        let clicked = is_mouse_button_pressed(MouseButton::Left);
        let clicked_at = if clicked { Some(mouse_position()) } else { None };
        let key_pressed = get_last_key_pressed().is_some();

        InputFrame {
            clicked_at,
            gesture: clicked || key_pressed,
            toggle_pause: is_key_pressed(KeyCode::Space),
            toggle_debug: is_key_pressed(KeyCode::F1),
            quit: is_key_pressed(KeyCode::Escape),
        }
    }
}

/// 视口尺寸防抖器
///
/// 尺寸变化后等待一个安静窗口才生效，拖拽缩放期间不会反复触发重排。
#[derive(Debug)]
pub struct ResizeDebouncer {
    last: (f32, f32),
    pending: bool,
    timer: f32,
}

impl ResizeDebouncer {
    /// 以当前尺寸创建防抖器
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            last: (width, height),
            pending: false,
            timer: 0.0,
        }
    }

    /// 喂入本帧尺寸，安静窗口结束时返回一次最终尺寸
    pub fn update(&mut self, dt: f32, width: f32, height: f32) -> Option<(f32, f32)> {
        if (width, height) != self.last {
            self.last = (width, height);
            self.pending = true;
            self.timer = 0.0;
            return None;
        }

        if self.pending {
            self.timer += dt;
            if self.timer >= RESIZE_DEBOUNCE_SECONDS {
                self.pending = false;
                self.timer = 0.0;
                return Some(self.last);
            }
        }
        None
    }
}
