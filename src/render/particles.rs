//! # Particles 模块
//!
//! 背景粒子模拟：持续落雪 + 点击触发的雨滴迸发。
//!
//! ## 设计说明
//!
//! - 帧间隔换算为基准帧倍数并钳制上限，暂停恢复后的大间隔不会让
//!   模拟跳变
//! - 雪花数量目标由视口宽度推导并受配置上限约束，低于目标的 80%
//!   时补充，高于目标时裁剪
//! - 雨滴迸发带 100ms 防抖，防止连点导致粒子失控
//! - 绘制顺序固定：先雨滴后雪花

use std::f32::consts::PI;

use macroquad::prelude::*;
use macroquad::rand::gen_range;
use tracing::warn;

use crate::config::ParticleConfig;

/// 基准帧时长（秒），配置中的速度均以此为单位
const BASE_FRAME_SECONDS: f32 = 0.016;

/// 单帧模拟步长上限（基准帧倍数）
const MAX_TIME_SCALE: f32 = 2.0;

/// 雨滴迸发防抖窗口（秒，模拟时钟）
const BURST_DEBOUNCE_SECONDS: f64 = 0.1;

/// 粒子离开视口的移除余量（像素）
const EXIT_MARGIN: f32 = 50.0;

/// 每 40 像素视口宽度对应一片雪花
const SNOWFLAKE_DENSITY_DIVISOR: f32 = 40.0;

/// 低于目标数量的该比例时触发补充
const REFILL_THRESHOLD: f32 = 0.8;

/// 雪花
#[derive(Debug, Clone)]
struct Snowflake {
    x: f32,
    y: f32,
    size: f32,
    speed: f32,
    sway: f32,
    sway_speed: f32,
    rotation: f32,
    rotation_speed: f32,
    opacity: f32,
}

/// 雨滴
#[derive(Debug, Clone)]
struct Raindrop {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    life: f32,
    decay: f32,
}

/// 粒子场
///
/// 独占持有两类粒子集合。`pause`/`resume` 冻结与恢复模拟而不丢失
/// 状态，`cleanup` 永久停止并清空。
pub struct ParticleField {
    snowflakes: Vec<Snowflake>,
    raindrops: Vec<Raindrop>,
    width: f32,
    height: f32,
    /// 模拟是否推进中
    running: bool,
    /// cleanup 后置为 false，之后所有操作都是空操作
    alive: bool,
    /// 模拟时钟（秒），用于迸发防抖
    clock: f64,
    /// 上次迸发时刻
    last_burst: f64,
    burst_count: usize,
    snowflake_max: usize,
    raindrop_speed: (f32, f32),
    snowflake_speed: (f32, f32),
    raindrop_color: Color,
    snowflake_color: Color,
}

impl ParticleField {
    /// 创建粒子场并生成初始雪花
    pub fn new(config: &ParticleConfig, width: f32, height: f32) -> Self {
        let mut field = Self {
            snowflakes: Vec::new(),
            raindrops: Vec::new(),
            width,
            height,
            running: true,
            alive: true,
            clock: 0.0,
            last_burst: -1.0,
            burst_count: config.raindrop_count as usize,
            snowflake_max: config.snowflake_count as usize,
            raindrop_speed: (config.raindrop_speed.min, config.raindrop_speed.max),
            snowflake_speed: (config.snowflake_speed.min, config.snowflake_speed.max),
            raindrop_color: parse_hex_color(&config.raindrop_color).unwrap_or_else(|| {
                warn!(color = %config.raindrop_color, "雨滴颜色无法解析，使用白色");
                WHITE
            }),
            snowflake_color: parse_hex_color(&config.snowflake_color).unwrap_or_else(|| {
                warn!(color = %config.snowflake_color, "雪花颜色无法解析，使用白色");
                WHITE
            }),
        };

        let target = field.snowflake_target();
        for _ in 0..target {
            let flake = field.spawn_snowflake();
            field.snowflakes.push(flake);
        }
        field
    }

    /// 推进模拟（每帧调用；暂停或已清理时无动作）
    pub fn update(&mut self, dt: f32) {
        if !self.alive || !self.running {
            return;
        }

        self.clock += dt as f64;
        let scale = (dt / BASE_FRAME_SECONDS).min(MAX_TIME_SCALE);

        // 雨滴：积分速度、衰减生命，出界或耗尽则移除
        let (width, height) = (self.width, self.height);
        self.raindrops.retain_mut(|drop| {
            drop.x += drop.vx * scale;
            drop.y += drop.vy * scale;
            drop.life -= drop.decay * scale;

            drop.life > 0.0
                && drop.y < height + EXIT_MARGIN
                && drop.x < width + EXIT_MARGIN
                && drop.x > -EXIT_MARGIN
        });

        // 雪花：下落 + 正弦横摆 + 自转，落出底部后回到顶部重生
        for flake in &mut self.snowflakes {
            flake.y += flake.speed * scale;
            flake.x += flake.sway.sin() * 0.3;
            flake.sway += flake.sway_speed * scale;
            flake.rotation += flake.rotation_speed * scale;

            if flake.y > self.height + 20.0 {
                flake.y = -10.0;
                flake.x = gen_range(0.0, self.width);
                flake.opacity = gen_range(0.3, 0.8);
            }
        }

        // 数量向目标收敛：超出则裁剪，低于 80% 则补满
        let target = self.snowflake_target();
        if self.snowflakes.len() > target {
            self.snowflakes.truncate(target);
        } else if (self.snowflakes.len() as f32) < target as f32 * REFILL_THRESHOLD {
            while self.snowflakes.len() < target {
                let flake = self.spawn_snowflake();
                self.snowflakes.push(flake);
            }
        }
    }

    /// 在点击位置迸发一组雨滴（100ms 防抖窗口内的点击被忽略）
    pub fn spawn_raindrops(&mut self, x: f32, y: f32) {
        if !self.alive {
            return;
        }
        if self.clock - self.last_burst < BURST_DEBOUNCE_SECONDS {
            return;
        }
        self.last_burst = self.clock;

        for _ in 0..self.burst_count {
            let offset_x = gen_range(-40.0, 40.0);
            let offset_y = gen_range(-20.0, 20.0);
            let drop = self.spawn_raindrop(x + offset_x, y + offset_y);
            self.raindrops.push(drop);
        }
    }

    /// 暂停模拟（粒子状态原样保留）
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// 恢复模拟
    pub fn resume(&mut self) {
        if self.alive {
            self.running = true;
        }
    }

    /// 视口尺寸变化：更新边界并把出界雪花拉回范围内
    pub fn resize(&mut self, width: f32, height: f32) {
        if !self.alive {
            return;
        }
        self.width = width;
        self.height = height;

        for flake in &mut self.snowflakes {
            if flake.x > width {
                flake.x = gen_range(0.0, width);
            }
            if flake.y > height {
                flake.y = -10.0;
            }
        }
    }

    /// 永久停止并清空（可重复调用）
    pub fn cleanup(&mut self) {
        self.alive = false;
        self.running = false;
        self.snowflakes.clear();
        self.raindrops.clear();
    }

    /// 绘制所有粒子（先雨滴后雪花）
    pub fn draw(&self) {
        if !self.alive {
            return;
        }

        for drop in &self.raindrops {
            let mut color = self.raindrop_color;
            color.a = drop.life.clamp(0.0, 1.0);
            // 长边沿速度方向
            let rotation = drop.vy.atan2(drop.vx) - PI / 2.0;
            draw_rectangle_ex(
                drop.x,
                drop.y,
                2.0,
                15.0,
                DrawRectangleParams {
                    offset: vec2(0.5, 0.5),
                    rotation,
                    color,
                },
            );
        }

        for flake in &self.snowflakes {
            let mut color = self.snowflake_color;
            color.a = flake.opacity;
            draw_rectangle_ex(
                flake.x,
                flake.y,
                flake.size,
                flake.size,
                DrawRectangleParams {
                    offset: vec2(0.5, 0.5),
                    rotation: flake.rotation,
                    color,
                },
            );
        }
    }

    /// 当前雪花数量
    pub fn snowflake_count(&self) -> usize {
        self.snowflakes.len()
    }

    /// 当前存活雨滴数量
    pub fn raindrop_count(&self) -> usize {
        self.raindrops.len()
    }

    /// 模拟是否推进中
    pub fn is_running(&self) -> bool {
        self.alive && self.running
    }

    /// 雪花数量目标：`min(配置上限, 视口宽度 / 40)`
    pub fn snowflake_target(&self) -> usize {
        let by_width = (self.width / SNOWFLAKE_DENSITY_DIVISOR).floor() as usize;
        self.snowflake_max.min(by_width)
    }

    /// 在顶部生成一片新雪花
    fn spawn_snowflake(&self) -> Snowflake {
        Snowflake {
            x: gen_range(0.0, self.width),
            y: -10.0,
            size: gen_range(2.0, 6.0),
            speed: gen_range(self.snowflake_speed.0, self.snowflake_speed.1),
            sway: gen_range(-0.25, 0.25),
            sway_speed: gen_range(0.01, 0.03),
            rotation: gen_range(0.0, PI * 2.0),
            rotation_speed: gen_range(-0.025, 0.025),
            opacity: gen_range(0.3, 0.8),
        }
    }

    /// 生成单颗雨滴：速度取自配置区间，角度偏向下方的锥形
    fn spawn_raindrop(&self, x: f32, y: f32) -> Raindrop {
        let speed = gen_range(self.raindrop_speed.0, self.raindrop_speed.1);
        let angle = gen_range(75.0_f32, 105.0_f32).to_radians();

        Raindrop {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            life: 1.0,
            decay: 0.02 + gen_range(0.0, 0.01),
        }
    }
}

/// 解析 `#rrggbb` 形式的颜色
fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    let r = ((value >> 16) & 0xff) as f32 / 255.0;
    let g = ((value >> 8) & 0xff) as f32 / 255.0;
    let b = (value & 0xff) as f32 / 255.0;
    Some(Color::new(r, g, b, 1.0))
}
