//! # Typewriter 模块
//!
//! 打字机文本状态机：逐字符显示排队的文本，字符间隔在配置区间内
//! 随机抖动，光标在空闲时自主闪烁。

use std::collections::VecDeque;

use macroquad::rand::gen_range;

use crate::config::SpeedRange;

/// 光标闪烁半周期（秒）
const CURSOR_BLINK_INTERVAL: f32 = 0.5;

/// 一条文本打完后的停顿时长（秒），之后才取下一条
const SETTLE_DELAY: f32 = 0.5;

/// 打字机状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypistState {
    /// 空闲（光标闪烁）
    Idle,
    /// 正在逐字符显示
    Typing,
    /// 一条刚打完，停顿中
    Settling,
}

/// 打字机文本效果
///
/// `type_text` 取消当前动画并立即开始新文本（队列也被清空）；
/// `queue_text` 按先进先出排队。`update` 返回本帧是否有文本刚好打完。
#[derive(Debug)]
pub struct TextTypist {
    /// 每字符延迟区间（毫秒）
    speed: SpeedRange,
    state: TypistState,
    /// 当前已显示的文本
    visible: String,
    /// 当前任务剩余的字符
    remaining: VecDeque<char>,
    /// 排队中的后续任务
    queue: VecDeque<String>,
    /// 字符计时器
    char_timer: f32,
    /// 当前字符的随机延迟（秒）
    char_delay: f32,
    /// 停顿计时器
    settle_timer: f32,
    /// 光标计时器
    cursor_timer: f32,
    /// 光标当前是否可见
    cursor_on: bool,
}

impl TextTypist {
    /// 创建打字机，`speed` 为每字符延迟区间（毫秒）
    pub fn new(speed: SpeedRange) -> Self {
        Self {
            speed,
            state: TypistState::Idle,
            visible: String::new(),
            remaining: VecDeque::new(),
            queue: VecDeque::new(),
            char_timer: 0.0,
            char_delay: 0.0,
            settle_timer: 0.0,
            cursor_timer: 0.0,
            cursor_on: true,
        }
    }

    /// 立即开始新文本
    ///
    /// 取消进行中的动画（被打断的任务不会再报告完成），清空队列。
    pub fn type_text(&mut self, text: impl Into<String>) {
        self.queue.clear();
        self.begin(text.into());
    }

    /// 排队一条文本（空闲时立即开始）
    pub fn queue_text(&mut self, text: impl Into<String>) {
        match self.state {
            TypistState::Idle => self.begin(text.into()),
            _ => self.queue.push_back(text.into()),
        }
    }

    /// 取消所有任务并清空显示（任何状态下都安全，包括字符中途）
    pub fn clear(&mut self) {
        self.state = TypistState::Idle;
        self.visible.clear();
        self.remaining.clear();
        self.queue.clear();
        self.char_timer = 0.0;
        self.settle_timer = 0.0;
        self.cursor_timer = 0.0;
        self.cursor_on = true;
    }

    /// 推进状态机（每帧调用），返回本帧是否有任务刚好完成
    pub fn update(&mut self, dt: f32) -> bool {
        let mut completed = false;

        match self.state {
            TypistState::Typing => {
                // 打字期间光标常亮
                self.cursor_on = true;
                self.cursor_timer = 0.0;

                self.char_timer += dt;
                if self.char_timer >= self.char_delay {
                    if let Some(ch) = self.remaining.pop_front() {
                        self.visible.push(ch);
                        self.char_timer = 0.0;
                        self.char_delay = self.roll_delay();
                    }
                    if self.remaining.is_empty() {
                        completed = true;
                        self.state = TypistState::Settling;
                        self.settle_timer = 0.0;
                    }
                }
            }
            TypistState::Settling => {
                self.blink(dt);
                self.settle_timer += dt;
                if self.settle_timer >= SETTLE_DELAY {
                    if let Some(next) = self.queue.pop_front() {
                        self.begin(next);
                    } else {
                        self.state = TypistState::Idle;
                    }
                }
            }
            TypistState::Idle => {
                self.blink(dt);
            }
        }

        completed
    }

    /// 当前显示的文本
    pub fn visible_text(&self) -> &str {
        &self.visible
    }

    /// 光标当前是否可见
    pub fn cursor_visible(&self) -> bool {
        self.cursor_on
    }

    /// 是否正在打字
    pub fn is_typing(&self) -> bool {
        self.state == TypistState::Typing
    }

    /// 排队中的任务数量
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// 开始一条新文本
    fn begin(&mut self, text: String) {
        self.visible.clear();
        self.remaining = text.chars().collect();
        self.char_timer = 0.0;
        self.char_delay = self.roll_delay();
        self.state = TypistState::Typing;
    }

    /// 抽取下一个字符的延迟（秒），每字符重新随机
    fn roll_delay(&self) -> f32 {
        let lo = self.speed.min.min(self.speed.max).max(0.0);
        let hi = self.speed.max.max(self.speed.min);
        if hi <= lo {
            return lo / 1000.0;
        }
        gen_range(lo, hi) / 1000.0
    }

    /// 推进光标闪烁
    fn blink(&mut self, dt: f32) {
        self.cursor_timer += dt;
        while self.cursor_timer >= CURSOR_BLINK_INTERVAL {
            self.cursor_timer -= CURSOR_BLINK_INTERVAL;
            self.cursor_on = !self.cursor_on;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> SpeedRange {
        SpeedRange { min: 0.0, max: 0.0 }
    }

    #[test]
    fn test_type_abc_char_by_char() {
        let mut typist = TextTypist::new(instant());
        typist.type_text("abc");

        assert!(!typist.update(0.016));
        assert_eq!(typist.visible_text(), "a");
        assert!(!typist.update(0.016));
        assert_eq!(typist.visible_text(), "ab");
        // 最后一个字符落下时报告完成，且只报告一次
        assert!(typist.update(0.016));
        assert_eq!(typist.visible_text(), "abc");
        assert!(!typist.update(0.016));
        assert_eq!(typist.visible_text(), "abc");
    }

    #[test]
    fn test_clear_mid_typing() {
        let mut typist = TextTypist::new(instant());
        typist.type_text("hello");
        typist.update(0.016);
        typist.update(0.016);
        assert_eq!(typist.visible_text(), "he");

        typist.clear();
        assert_eq!(typist.visible_text(), "");
        assert!(!typist.is_typing());

        // 清空后不会再有字符出现
        assert!(!typist.update(0.016));
        assert_eq!(typist.visible_text(), "");
    }

    #[test]
    fn test_type_text_cancels_active_job() {
        let mut typist = TextTypist::new(instant());
        typist.type_text("aaaa");
        typist.update(0.016);
        assert_eq!(typist.visible_text(), "a");

        // 新任务取消当前动画并立即开始；被打断的任务不报告完成
        typist.type_text("bb");
        assert!(!typist.update(0.016));
        assert_eq!(typist.visible_text(), "b");
        assert!(typist.update(0.016));
        assert_eq!(typist.visible_text(), "bb");
    }

    #[test]
    fn test_queue_drains_after_settle() {
        let mut typist = TextTypist::new(instant());
        typist.queue_text("ab");
        typist.queue_text("cd");
        assert_eq!(typist.queued(), 1);

        typist.update(0.016);
        assert!(typist.update(0.016));
        assert_eq!(typist.visible_text(), "ab");

        // 停顿期内第二条还未开始
        assert!(!typist.update(0.3));
        assert_eq!(typist.visible_text(), "ab");

        // 停顿结束，第二条开始
        typist.update(0.3);
        typist.update(0.016);
        assert_eq!(typist.visible_text(), "c");
    }

    #[test]
    fn test_type_text_skips_queue() {
        let mut typist = TextTypist::new(instant());
        typist.queue_text("ab");
        typist.queue_text("cd");

        // 替换语义：队列剩余部分被丢弃
        typist.type_text("xy");
        assert_eq!(typist.queued(), 0);
        typist.update(0.016);
        assert_eq!(typist.visible_text(), "x");
    }

    #[test]
    fn test_cursor_blink_when_idle() {
        let mut typist = TextTypist::new(instant());
        assert!(typist.cursor_visible());

        typist.update(0.3);
        assert!(typist.cursor_visible());
        typist.update(0.3);
        assert!(!typist.cursor_visible());
        typist.update(0.5);
        assert!(typist.cursor_visible());
    }

    #[test]
    fn test_cursor_steady_while_typing() {
        let mut typist = TextTypist::new(SpeedRange {
            min: 1000.0,
            max: 1000.0,
        });
        typist.type_text("ab");

        // 打字期间光标不闪烁
        for _ in 0..10 {
            typist.update(0.09);
            assert!(typist.cursor_visible());
        }
    }

    #[test]
    fn test_unicode_chars() {
        let mut typist = TextTypist::new(instant());
        typist.type_text("静谧");

        typist.update(0.016);
        assert_eq!(typist.visible_text(), "静");
        typist.update(0.016);
        assert_eq!(typist.visible_text(), "静谧");
    }
}
