//! # Slideshow 模块
//!
//! 幻灯片编排器：驱动图片轮换（交叉淡入淡出）与文本轮换两个独立
//! 定时器，产出动作由应用层执行。
//!
//! ## 状态机
//!
//! **加载 → 展示（可暂停） → 已销毁**
//!
//! 图片切换流程：淡出半个淡变时长 → 切换到下一张（完成顺序循环，
//! 列表为空时用占位图）→ 预取再下一张 → 纹理就绪后淡入。

use macroquad::rand::gen_range;
use tracing::{debug, info};

use crate::texts::TextEntry;

/// 编排器产出的动作，由应用层执行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideshowAction {
    /// 切换显示的图片（None 表示占位图）
    ShowImage {
        /// 图片路径
        path: Option<String>,
    },
    /// 预取纹理（隐藏下一次切换的上传延迟）
    Prefetch {
        /// 图片路径
        path: String,
    },
    /// 开始打一条新文本
    TypeText {
        /// 已解析的字面文本
        text: String,
    },
}

/// 交叉淡入淡出阶段
#[derive(Debug, Clone, Copy, PartialEq)]
enum CrossfadePhase {
    /// 稳定显示中
    Idle,
    /// 当前图片淡出中
    FadeOut { timer: f32 },
    /// 已切换，等待应用层确认纹理就绪
    AwaitReady,
    /// 新图片淡入中
    FadeIn { timer: f32 },
}

/// 幻灯片编排器
///
/// 独占持有轮换状态；音频与粒子的暂停恢复由应用层在同一入口协调。
pub struct SlideshowController {
    /// 图片路径（加载完成顺序）
    images: Vec<String>,
    /// 文本条目
    entries: Vec<TextEntry>,
    /// 生成器失败时的替代文本
    fallback: String,
    image_interval: f32,
    text_interval: f32,
    fade_duration: f32,
    /// 下一次切换要显示的列表位置
    next_cursor: usize,
    image_timer: f32,
    text_timer: f32,
    crossfade: CrossfadePhase,
    image_alpha: f32,
    running: bool,
    paused: bool,
    disposed: bool,
}

impl SlideshowController {
    /// 创建编排器（尚未开始轮换）
    pub fn new(
        entries: Vec<TextEntry>,
        fallback: String,
        image_interval: f32,
        text_interval: f32,
        fade_duration: f32,
    ) -> Self {
        Self {
            images: Vec::new(),
            entries,
            fallback,
            image_interval: image_interval.max(0.01),
            text_interval: text_interval.max(0.01),
            fade_duration: fade_duration.max(0.01),
            next_cursor: 0,
            image_timer: 0.0,
            text_timer: 0.0,
            crossfade: CrossfadePhase::Idle,
            image_alpha: 0.0,
            running: false,
            paused: false,
            disposed: false,
        }
    }

    /// 开始轮换
    ///
    /// `images` 为加载成功的图片路径（完成顺序）。立即产出第一张图片
    /// 与第一条文本的动作；重复调用无动作。
    pub fn start(&mut self, images: Vec<String>) -> Vec<SlideshowAction> {
        if self.running || self.disposed {
            return Vec::new();
        }
        self.running = true;
        self.images = images;
        self.image_timer = 0.0;
        self.text_timer = 0.0;

        info!(images = self.images.len(), "幻灯片开始");

        let mut actions = self.advance_image();
        if let Some(text) = self.pick_text() {
            actions.push(SlideshowAction::TypeText { text });
        }
        actions
    }

    /// 推进定时器与淡变状态机（每帧调用）
    pub fn update(&mut self, dt: f32) -> Vec<SlideshowAction> {
        if !self.running || self.paused || self.disposed {
            return Vec::new();
        }

        let mut actions = Vec::new();
        let half_fade = self.fade_duration / 2.0;

        match self.crossfade {
            CrossfadePhase::Idle => {
                self.image_timer += dt;
                if self.image_timer >= self.image_interval {
                    self.image_timer = 0.0;
                    self.crossfade = CrossfadePhase::FadeOut { timer: 0.0 };
                }
            }
            CrossfadePhase::FadeOut { timer } => {
                let timer = timer + dt;
                self.image_alpha = (1.0 - timer / half_fade).clamp(0.0, 1.0);
                if timer >= half_fade {
                    actions.extend(self.advance_image());
                } else {
                    self.crossfade = CrossfadePhase::FadeOut { timer };
                }
            }
            CrossfadePhase::AwaitReady => {
                // 等待应用层调用 confirm_image_ready
            }
            CrossfadePhase::FadeIn { timer } => {
                let timer = timer + dt;
                self.image_alpha = (timer / half_fade).clamp(0.0, 1.0);
                if timer >= half_fade {
                    self.crossfade = CrossfadePhase::Idle;
                    self.image_alpha = 1.0;
                } else {
                    self.crossfade = CrossfadePhase::FadeIn { timer };
                }
            }
        }

        self.text_timer += dt;
        if self.text_timer >= self.text_interval {
            self.text_timer = 0.0;
            if let Some(text) = self.pick_text() {
                actions.push(SlideshowAction::TypeText { text });
            }
        }

        actions
    }

    /// 应用层确认新图片的纹理已就绪，开始淡入
    pub fn confirm_image_ready(&mut self) {
        if self.crossfade == CrossfadePhase::AwaitReady {
            self.crossfade = CrossfadePhase::FadeIn { timer: 0.0 };
        }
    }

    /// 暂停轮换（定时器与淡变状态原样冻结）
    pub fn pause(&mut self) {
        if self.running && !self.disposed {
            self.paused = true;
            debug!("幻灯片已暂停");
        }
    }

    /// 恢复轮换
    pub fn resume(&mut self) {
        if self.disposed {
            return;
        }
        self.paused = false;
    }

    /// 当前图片透明度（0.0 - 1.0）
    pub fn image_alpha(&self) -> f32 {
        self.image_alpha
    }

    /// 是否已开始且未销毁
    pub fn is_running(&self) -> bool {
        self.running && !self.disposed
    }

    /// 是否处于暂停状态
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// 销毁编排器：停止一切轮换
    ///
    /// 可重复调用，启动前调用也安全。
    pub fn cleanup(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.running = false;
        self.paused = false;
        self.crossfade = CrossfadePhase::Idle;
        self.image_timer = 0.0;
        self.text_timer = 0.0;
        self.image_alpha = 0.0;
        info!("幻灯片已销毁");
    }

    /// 切换到下一张图片，产出显示与预取动作
    fn advance_image(&mut self) -> Vec<SlideshowAction> {
        let mut actions = Vec::new();

        if self.images.is_empty() {
            actions.push(SlideshowAction::ShowImage { path: None });
        } else {
            let index = self.next_cursor % self.images.len();
            self.next_cursor = self.next_cursor.wrapping_add(1);
            actions.push(SlideshowAction::ShowImage {
                path: Some(self.images[index].clone()),
            });

            // 预取下一张，隐藏切换时的上传延迟
            if self.images.len() > 1 {
                let next = self.images[self.next_cursor % self.images.len()].clone();
                actions.push(SlideshowAction::Prefetch { path: next });
            }
        }

        self.crossfade = CrossfadePhase::AwaitReady;
        self.image_alpha = 0.0;
        actions
    }

    /// 随机挑选并解析一条文本
    fn pick_text(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let index = gen_range(0, self.entries.len());
        Some(self.entries[index].resolve(&self.fallback))
    }
}
